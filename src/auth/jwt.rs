use axum::extract::FromRef;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use time::{Duration, OffsetDateTime};
use tracing::debug;

use super::claims::{Claims, Role};
use crate::{
    config::{JwtConfig, MAX_TTL_MINUTES},
    state::AppState,
};

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("Invalid token")]
    Invalid,
    #[error("Expired token")]
    Expired,
}

/// HMAC keys and token lifetime, built once from [`JwtConfig`].
#[derive(Clone)]
pub struct JwtKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl FromRef<AppState> for JwtKeys {
    fn from_ref(state: &AppState) -> Self {
        state.jwt.clone()
    }
}

impl JwtKeys {
    pub fn new(config: &JwtConfig) -> Self {
        Self {
            encoding: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding: DecodingKey::from_secret(config.secret.as_bytes()),
            ttl: Duration::minutes(config.ttl_minutes.clamp(0, MAX_TTL_MINUTES)),
        }
    }

    pub fn sign(&self, email: &str, role: Role) -> anyhow::Result<String> {
        let now = OffsetDateTime::now_utc();
        let exp = now
            .checked_add(self.ttl)
            .ok_or_else(|| anyhow::anyhow!("token expiry out of range"))?;
        let claims = Claims {
            email: email.to_string(),
            role,
            iat: Some(now.unix_timestamp()),
            exp: Some(exp.unix_timestamp()),
        };
        self.sign_claims(&claims)
    }

    pub fn sign_claims(&self, claims: &Claims) -> anyhow::Result<String> {
        let token = encode(&Header::new(Algorithm::HS256), claims, &self.encoding)?;
        debug!(email = %claims.email, role = claims.role.as_str(), "jwt signed");
        Ok(token)
    }

    /// Checks signature and structure, then rejects a present `exp` that is
    /// already in the past. Tokens without `exp` never expire.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.required_spec_claims.clear();

        let data = decode::<Claims>(token, &self.decoding, &validation).map_err(|e| {
            debug!(error = %e, "jwt rejected");
            TokenError::Invalid
        })?;

        if let Some(exp) = data.claims.exp {
            if exp < OffsetDateTime::now_utc().unix_timestamp() {
                return Err(TokenError::Expired);
            }
        }
        debug!(email = %data.claims.email, role = data.claims.role.as_str(), "jwt verified");
        Ok(data.claims)
    }
}

/// Drops the scheme: everything up to and including the first space.
pub fn strip_scheme(header: &str) -> &str {
    match header.split_once(' ') {
        Some((_, token)) => token,
        None => header,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(secret: &str) -> JwtKeys {
        JwtKeys::new(&JwtConfig {
            secret: secret.into(),
            ttl_minutes: 60 * 24,
        })
    }

    fn now() -> i64 {
        OffsetDateTime::now_utc().unix_timestamp()
    }

    #[test]
    fn sign_and_verify_roundtrip() {
        let keys = keys("dev-secret");
        let token = keys.sign("alice@x.com", Role::Admin).expect("sign");
        let claims = keys.verify(&token).expect("verify");
        assert_eq!(claims.email, "alice@x.com");
        assert_eq!(claims.role, Role::Admin);
        let exp = claims.exp.expect("exp set");
        assert!(exp - now() > 60 * 60 * 23);
    }

    #[test]
    fn oversized_ttl_is_clamped() {
        let keys = JwtKeys::new(&JwtConfig {
            secret: "dev-secret".into(),
            ttl_minutes: i64::MAX,
        });
        let claims = keys
            .verify(&keys.sign("a@x.com", Role::User).unwrap())
            .unwrap();
        let exp = claims.exp.unwrap();
        assert!(exp - now() <= MAX_TTL_MINUTES * 60 + 5);
    }

    #[test]
    fn verify_rejects_past_expiry() {
        let keys = keys("dev-secret");
        for age in [1, 120, 60 * 60 * 24 * 30] {
            let token = keys
                .sign_claims(&Claims {
                    email: "old@x.com".into(),
                    role: Role::User,
                    iat: None,
                    exp: Some(now() - age),
                })
                .unwrap();
            assert_eq!(keys.verify(&token).unwrap_err(), TokenError::Expired);
        }
    }

    #[test]
    fn verify_accepts_token_without_expiry() {
        let keys = keys("dev-secret");
        let token = keys
            .sign_claims(&Claims {
                email: "forever@x.com".into(),
                role: Role::User,
                iat: None,
                exp: None,
            })
            .unwrap();
        assert!(keys.verify(&token).is_ok());
    }

    #[test]
    fn verify_rejects_other_secret_and_garbage() {
        let token = keys("secret-a").sign("a@x.com", Role::User).unwrap();
        assert_eq!(keys("secret-b").verify(&token).unwrap_err(), TokenError::Invalid);
        assert_eq!(keys("secret-a").verify("not.a.jwt").unwrap_err(), TokenError::Invalid);
        assert_eq!(keys("secret-a").verify("").unwrap_err(), TokenError::Invalid);
    }

    #[test]
    fn strip_scheme_drops_only_first_word() {
        assert_eq!(strip_scheme("Bearer abc.def"), "abc.def");
        assert_eq!(strip_scheme("Token abc.def"), "abc.def");
        assert_eq!(strip_scheme("abc.def"), "abc.def");
        assert_eq!(strip_scheme("Bearer  abc"), " abc");
    }
}
