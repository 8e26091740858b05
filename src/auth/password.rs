use argon2::{
    password_hash::{self, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use rand::rngs::OsRng;
use tracing::error;

/// PHC string for `users.password_hash`; salt and parameters travel inside it.
pub fn hash_password(plain: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map(|phc| phc.to_string())
        .map_err(|e| argon2_failure("hash", e))
}

/// `Ok(false)` on a mismatch. `Err` only when the stored digest is unreadable
/// or argon2 itself fails.
pub fn verify_password(plain: &str, stored: &str) -> anyhow::Result<bool> {
    let phc = PasswordHash::new(stored).map_err(|e| argon2_failure("parse", e))?;
    match Argon2::default().verify_password(plain.as_bytes(), &phc) {
        Ok(()) => Ok(true),
        Err(password_hash::Error::Password) => Ok(false),
        Err(e) => Err(argon2_failure("verify", e)),
    }
}

fn argon2_failure(step: &'static str, e: password_hash::Error) -> anyhow::Error {
    error!(error = %e, step, "argon2 failure");
    anyhow::anyhow!("argon2 {step}: {e}")
}
