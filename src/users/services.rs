use lazy_static::lazy_static;
use regex::Regex;

use super::dto::SignupRequest;
use crate::{auth::Role, error::AppError};

pub const MIN_PASSWORD_LEN: usize = 8;

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex =
            Regex::new(r"^[a-z0-9._%+\-]+@[a-z0-9.\-]+\.[a-z]{2,4}$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

pub(crate) fn is_valid_phone(phone: &str) -> bool {
    phone.len() == 10 && phone.bytes().all(|b| b.is_ascii_digit())
}

pub(crate) fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Normalizes the request in place and checks it field by field, stopping
/// at the first failure.
pub fn validate_signup(req: &mut SignupRequest) -> Result<Role, AppError> {
    req.email = normalize_email(&req.email);
    req.username = req.username.trim().to_string();
    req.phone = req.phone.trim().to_string();

    if !is_valid_email(&req.email) {
        return Err(AppError::bad_request("Invalid email format"));
    }
    if req.username.is_empty() {
        return Err(AppError::bad_request("Username field should not be empty"));
    }
    let role = Role::parse(&req.role).ok_or_else(|| {
        AppError::bad_request("Invalid value for role field. Only 'user' and 'admin' are allowed.")
    })?;
    // Byte length, so multi-byte characters count more than once.
    if req.password.len() < MIN_PASSWORD_LEN {
        return Err(AppError::bad_request(format!(
            "Password should be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    if !is_valid_phone(&req.phone) {
        return Err(AppError::bad_request("Invalid phone number format"));
    }
    Ok(role)
}
