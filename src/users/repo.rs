use serde::Serialize;
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;

/// User record in the database.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub phone: String,
    #[serde(skip_serializing)]
    pub password_hash: String, // Argon2 hash, not exposed in JSON
    pub role: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// Validated signup data ready for insertion.
#[derive(Debug)]
pub struct NewUser<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub phone: &'a str,
    pub password_hash: &'a str,
    pub role: &'a str,
}

impl User {
    pub async fn find_by_email(db: &PgPool, email: &str) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, phone, password_hash, role, created_at, updated_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    pub async fn find_by_phone(db: &PgPool, phone: &str) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, phone, password_hash, role, created_at, updated_at
            FROM users
            WHERE phone = $1
            "#,
        )
        .bind(phone)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    /// Unique constraints on email and phone reject duplicates that slip
    /// past the lookups.
    pub async fn create(db: &PgPool, new: &NewUser<'_>) -> anyhow::Result<User> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, email, phone, password_hash, role)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, username, email, phone, password_hash, role, created_at, updated_at
            "#,
        )
        .bind(new.username)
        .bind(new.email)
        .bind(new.phone)
        .bind(new.password_hash)
        .bind(new.role)
        .fetch_one(db)
        .await?;
        Ok(user)
    }

    pub async fn list_emails(db: &PgPool) -> anyhow::Result<Vec<String>> {
        let emails = sqlx::query_scalar::<_, String>(r#"SELECT email FROM users ORDER BY id"#)
            .fetch_all(db)
            .await?;
        Ok(emails)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::{
        db::is_unique_violation,
        state::testing::{live, unique_suffix, RecordingNotifier},
    };

    #[tokio::test]
    #[ignore = "requires TEST_DATABASE_URL"]
    async fn second_insert_with_taken_email_or_phone_is_unique_violation() {
        let state = live(Arc::new(RecordingNotifier::default())).await;
        let suffix = unique_suffix();
        let email = format!("race{suffix}@x.com");
        let other_email = format!("race-other{suffix}@x.com");
        let phone = format!("7{suffix}");
        let other_phone = format!("6{suffix}");

        let first = NewUser {
            username: "race",
            email: &email,
            phone: &phone,
            password_hash: "$argon2id$placeholder",
            role: "user",
        };
        let created = User::create(&state.db, &first).await.expect("first insert");
        assert_eq!(created.email, email);

        let same_email = NewUser {
            phone: &other_phone,
            ..first
        };
        let err = User::create(&state.db, &same_email).await.unwrap_err();
        assert!(is_unique_violation(&err), "{err:#}");

        let same_phone = NewUser {
            email: &other_email,
            ..first
        };
        let err = User::create(&state.db, &same_phone).await.unwrap_err();
        assert!(is_unique_violation(&err), "{err:#}");

        let emails = User::list_emails(&state.db).await.unwrap();
        assert_eq!(emails.iter().filter(|e| **e == email).count(), 1);
        assert!(!emails.contains(&other_email));
    }
}
