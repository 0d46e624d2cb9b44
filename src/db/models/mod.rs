//! Database models split into domain-specific modules.

pub mod customer;
pub mod invoice;
pub mod session;
pub mod user;

pub use customer::*;
pub use invoice::*;
pub use session::*;
pub use user::*;
