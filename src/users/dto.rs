use serde::{Deserialize, Serialize};

use super::repo::User;

/// Request body for signup. Missing fields decode as empty and fail validation.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SignupRequest {
    pub username: String,
    pub email: String,
    #[serde(alias = "phonenumber", alias = "phone_number")]
    pub phone: String,
    pub password: String,
    pub role: String,
}

/// Request body for login.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Returned after a successful login.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: User,
}
