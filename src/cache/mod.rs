//! Path-keyed view revalidation.
//!
//! Actions mark a rendered view stale by path; the rendering layer compares
//! the generation it rendered against [`PathCache::generation`] and refetches
//! when it has moved.

use dashmap::DashMap;
use tracing::debug;

/// Invalidation boundary used by the actions
pub trait Revalidator: Send + Sync {
    fn revalidate_path(&self, path: &str);
}

/// Generation counter per path
#[derive(Debug, Default)]
pub struct PathCache {
    generations: DashMap<String, u64>,
}

impl PathCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of times `path` has been revalidated
    pub fn generation(&self, path: &str) -> u64 {
        self.generations.get(path).map(|g| *g).unwrap_or(0)
    }
}

impl Revalidator for PathCache {
    fn revalidate_path(&self, path: &str) {
        let mut generation = self.generations.entry(path.to_string()).or_insert(0);
        *generation += 1;
        debug!(path, generation = *generation, "Revalidated path");
    }
}
