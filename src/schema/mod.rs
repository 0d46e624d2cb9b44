//! Validation schemas for submitted forms.
//!
//! Each schema turns the raw field -> string mapping of a form submission into
//! a typed value, or into every failing-rule message grouped by field. The
//! narrower variants (create/update invoice, credentials, create user) only
//! pick a subset of the field rules defined here.

use lazy_static::lazy_static;
use regex::Regex;
use serde::Deserialize;
use std::collections::HashMap;

use crate::db::InvoiceStatus;

pub const CUSTOMER_REQUIRED: &str = "Please select a customer.";
pub const AMOUNT_POSITIVE: &str = "Please enter an amount greater than $0.";
pub const AMOUNT_TOO_LARGE: &str = "Please enter a smaller amount.";
pub const STATUS_REQUIRED: &str = "Please select an invoice status.";
pub const EMAIL_REQUIRED: &str = "This field has to be filled.";
pub const EMAIL_INVALID: &str = "This is not a valid email.";
pub const USERNAME_TOO_SHORT: &str = "Username must be more than 3 letters";
pub const PASSWORD_TOO_SHORT: &str = "Password must be more than 6 letters";

const USERNAME_MIN_CHARS: usize = 3;
const PASSWORD_MIN_CHARS: usize = 6;
/// Cent values at or above this do not fit the `amount` column
const CENTS_LIMIT: f64 = i64::MAX as f64;

lazy_static! {
    /// Local part of dot-separated atoms, domain of labels ending in an alphabetic TLD
    static ref EMAIL_REGEX: Regex = Regex::new(
        r"^[A-Za-z0-9_'+\-]+(\.[A-Za-z0-9_'+\-]+)*@([A-Za-z0-9]([A-Za-z0-9\-]*[A-Za-z0-9])?\.)+[A-Za-z]{2,}$"
    ).unwrap();
}

/// Raw form submission: field name -> submitted string
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct FormData(HashMap<String, String>);

impl FormData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn with(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.insert(field.into(), value.into());
        self
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FormData {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// Failing-rule messages per field, in rule order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors {
    errors: HashMap<String, Vec<String>>,
}

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) -> &mut Self {
        self.errors
            .entry(field.to_string())
            .or_default()
            .push(message.into());
        self
    }

    fn extend(&mut self, field: &str, messages: Vec<String>) {
        for message in messages {
            self.add(field, message);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.errors.get(field).map(Vec::as_slice)
    }

    pub fn into_map(self) -> HashMap<String, Vec<String>> {
        self.errors
    }
}

/// Collects the outcome of one field rule, keeping the value when it passed
fn check<T>(errors: &mut FieldErrors, field: &str, result: Result<T, Vec<String>>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(messages) => {
            errors.extend(field, messages);
            None
        }
    }
}

// -------------------------------------------------------------------------
// Field rules
// -------------------------------------------------------------------------

pub fn validate_customer_id(value: Option<&str>) -> Result<String, Vec<String>> {
    match value {
        Some(id) if !id.trim().is_empty() => Ok(id.to_string()),
        _ => Err(vec![CUSTOMER_REQUIRED.to_string()]),
    }
}

/// Coerce the submitted amount to dollars. A missing or blank value coerces
/// to zero; anything unparseable, non-finite, or under one cent fails, and so
/// does an amount whose cent value would not fit in an `i64`.
pub fn coerce_amount(value: Option<&str>) -> Result<f64, Vec<String>> {
    let raw = value.unwrap_or("").trim();
    let amount = if raw.is_empty() {
        0.0
    } else {
        raw.parse::<f64>().unwrap_or(f64::NAN)
    };

    if !(amount.is_finite() && amount > 0.0) {
        return Err(vec![AMOUNT_POSITIVE.to_string()]);
    }
    if amount * 100.0 >= CENTS_LIMIT {
        return Err(vec![AMOUNT_TOO_LARGE.to_string()]);
    }
    if to_cents(amount) > 0 {
        Ok(amount)
    } else {
        Err(vec![AMOUNT_POSITIVE.to_string()])
    }
}

pub fn validate_status(value: Option<&str>) -> Result<InvoiceStatus, Vec<String>> {
    value
        .and_then(|s| s.parse().ok())
        .ok_or_else(|| vec![STATUS_REQUIRED.to_string()])
}

/// Both rules run, so an empty address reports both messages.
pub fn validate_email(value: Option<&str>) -> Result<String, Vec<String>> {
    let email = value.unwrap_or("");
    let mut messages = Vec::new();
    if email.is_empty() {
        messages.push(EMAIL_REQUIRED.to_string());
    }
    if !EMAIL_REGEX.is_match(email) {
        messages.push(EMAIL_INVALID.to_string());
    }
    if messages.is_empty() {
        Ok(email.to_string())
    } else {
        Err(messages)
    }
}

pub fn validate_username(value: Option<&str>) -> Result<String, Vec<String>> {
    let username = value.unwrap_or("");
    if username.chars().count() < USERNAME_MIN_CHARS {
        return Err(vec![USERNAME_TOO_SHORT.to_string()]);
    }
    Ok(username.to_string())
}

pub fn validate_password(value: Option<&str>) -> Result<String, Vec<String>> {
    let password = value.unwrap_or("");
    if password.chars().count() < PASSWORD_MIN_CHARS {
        return Err(vec![PASSWORD_TOO_SHORT.to_string()]);
    }
    Ok(password.to_string())
}

/// Dollars to whole cents, rounded to the nearest cent
pub fn to_cents(amount: f64) -> i64 {
    (amount * 100.0).round() as i64
}

// -------------------------------------------------------------------------
// Schemas
// -------------------------------------------------------------------------

/// Invoice fields accepted from the create and edit forms (id and date are
/// never taken from user input)
#[derive(Debug, Clone, PartialEq)]
pub struct InvoiceInput {
    pub customer_id: String,
    /// Dollars as submitted
    pub amount: f64,
    pub status: InvoiceStatus,
}

impl InvoiceInput {
    pub fn amount_in_cents(&self) -> i64 {
        to_cents(self.amount)
    }
}

pub fn parse_invoice_form(form: &FormData) -> Result<InvoiceInput, FieldErrors> {
    let mut errors = FieldErrors::new();

    let customer_id = check(&mut errors, "customerId", validate_customer_id(form.get("customerId")));
    let amount = check(&mut errors, "amount", coerce_amount(form.get("amount")));
    let status = check(&mut errors, "status", validate_status(form.get("status")));

    match (customer_id, amount, status) {
        (Some(customer_id), Some(amount), Some(status)) => Ok(InvoiceInput {
            customer_id,
            amount,
            status,
        }),
        _ => Err(errors),
    }
}

/// Sign-up fields (everything but id)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignUpInput {
    pub email: String,
    pub username: String,
    pub password: String,
}

pub fn parse_sign_up_form(form: &FormData) -> Result<SignUpInput, FieldErrors> {
    let mut errors = FieldErrors::new();

    let email = check(&mut errors, "email", validate_email(form.get("email")));
    let username = check(&mut errors, "username", validate_username(form.get("username")));
    let password = check(&mut errors, "password", validate_password(form.get("password")));

    match (email, username, password) {
        (Some(email), Some(username), Some(password)) => Ok(SignUpInput {
            email,
            username,
            password,
        }),
        _ => Err(errors),
    }
}

/// Credentials fields (sign-up without id and username)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialsInput {
    pub email: String,
    pub password: String,
}

pub fn parse_credentials_form(form: &FormData) -> Result<CredentialsInput, FieldErrors> {
    let mut errors = FieldErrors::new();

    let email = check(&mut errors, "email", validate_email(form.get("email")));
    let password = check(&mut errors, "password", validate_password(form.get("password")));

    match (email, password) {
        (Some(email), Some(password)) => Ok(CredentialsInput { email, password }),
        _ => Err(errors),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn invoice_form(customer_id: &str, amount: &str, status: &str) -> FormData {
        FormData::new()
            .with("customerId", customer_id)
            .with("amount", amount)
            .with("status", status)
    }

    #[test]
    fn test_valid_invoice_form() {
        let input = parse_invoice_form(&invoice_form("c1", "45.50", "paid")).unwrap();
        assert_eq!(input.customer_id, "c1");
        assert_eq!(input.status, InvoiceStatus::Paid);
        assert_eq!(input.amount_in_cents(), 4550);
    }

    #[test]
    fn test_non_positive_amounts_fail() {
        for amount in ["0", "-1", "-0.01", "", "   ", "abc", "NaN", "inf", "0.001"] {
            let errors = parse_invoice_form(&invoice_form("c1", amount, "pending")).unwrap_err();
            assert_eq!(
                errors.get("amount"),
                Some(&[AMOUNT_POSITIVE.to_string()][..]),
                "amount {:?} should be rejected",
                amount
            );
            assert!(errors.get("customerId").is_none());
            assert!(errors.get("status").is_none());
        }
    }

    #[test]
    fn test_amounts_beyond_cent_range_fail() {
        for amount in ["1e20", "92233720368547758.08", "1e300"] {
            let errors = parse_invoice_form(&invoice_form("c1", amount, "paid")).unwrap_err();
            assert_eq!(
                errors.get("amount"),
                Some(&[AMOUNT_TOO_LARGE.to_string()][..]),
                "amount {:?} should be rejected",
                amount
            );
        }

        let input = parse_invoice_form(&invoice_form("c1", "1000000000", "paid")).unwrap();
        assert_eq!(input.amount_in_cents(), 100_000_000_000);
    }

    #[test]
    fn test_cents_are_rounded() {
        assert_eq!(to_cents(0.29), 29);
        assert_eq!(to_cents(19.99), 1999);
        assert_eq!(to_cents(1.005), 100);
        assert_eq!(to_cents(100.0), 10000);
    }

    #[test]
    fn test_unknown_status_fails() {
        for status in ["", "overdue", "PAID", "Pending"] {
            let errors = parse_invoice_form(&invoice_form("c1", "10", status)).unwrap_err();
            assert_eq!(errors.get("status"), Some(&[STATUS_REQUIRED.to_string()][..]));
        }
    }

    #[test]
    fn test_empty_form_reports_every_field() {
        let errors = parse_invoice_form(&FormData::new()).unwrap_err();
        assert_eq!(errors.get("customerId"), Some(&[CUSTOMER_REQUIRED.to_string()][..]));
        assert_eq!(errors.get("amount"), Some(&[AMOUNT_POSITIVE.to_string()][..]));
        assert_eq!(errors.get("status"), Some(&[STATUS_REQUIRED.to_string()][..]));
        assert_eq!(errors.into_map().len(), 3);
    }

    #[test]
    fn test_invoice_form_ignores_id_and_date() {
        let form = invoice_form("c1", "12", "pending")
            .with("id", "forged")
            .with("date", "1999-01-01");
        let input = parse_invoice_form(&form).unwrap();
        assert_eq!(input.amount_in_cents(), 1200);
    }

    #[test]
    fn test_empty_email_reports_both_rules_in_order() {
        let errors = validate_email(Some("")).unwrap_err();
        assert_eq!(errors, vec![EMAIL_REQUIRED.to_string(), EMAIL_INVALID.to_string()]);

        let errors = validate_email(None).unwrap_err();
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn test_email_syntax() {
        assert!(validate_email(Some("user@nextmail.com")).is_ok());
        assert!(validate_email(Some("first.last+tag@mail.example.co")).is_ok());

        assert_eq!(
            validate_email(Some("not-an-email")).unwrap_err(),
            vec![EMAIL_INVALID.to_string()]
        );
        assert!(validate_email(Some("a@b")).is_err());
        assert!(validate_email(Some("a..b@example.com")).is_err());
        assert!(validate_email(Some("@example.com")).is_err());
    }

    #[test]
    fn test_sign_up_lengths() {
        let form = FormData::new()
            .with("email", "user@nextmail.com")
            .with("username", "al")
            .with("password", "12345");
        let errors = parse_sign_up_form(&form).unwrap_err();
        assert_eq!(errors.get("username"), Some(&[USERNAME_TOO_SHORT.to_string()][..]));
        assert_eq!(errors.get("password"), Some(&[PASSWORD_TOO_SHORT.to_string()][..]));
        assert!(errors.get("email").is_none());

        let form = FormData::new()
            .with("email", "user@nextmail.com")
            .with("username", "ali")
            .with("password", "123456");
        let input = parse_sign_up_form(&form).unwrap();
        assert_eq!(input.username, "ali");
    }

    #[test]
    fn test_lengths_count_characters_not_bytes() {
        assert!(validate_username(Some("éé")).is_err());
        assert!(validate_username(Some("ééé")).is_ok());
    }

    #[test]
    fn test_credentials_form_does_not_require_username() {
        let form = FormData::new()
            .with("email", "user@nextmail.com")
            .with("password", "123456");
        let input = parse_credentials_form(&form).unwrap();
        assert_eq!(input.email, "user@nextmail.com");
        assert_eq!(input.password, "123456");
    }

    #[test]
    fn test_form_data_deserializes_from_urlencoded_map() {
        let form: FormData = serde_json::from_str(r#"{"customerId":"c1","amount":"3"}"#).unwrap();
        assert_eq!(form.get("customerId"), Some("c1"));
        assert_eq!(form.get("status"), None);
    }
}
