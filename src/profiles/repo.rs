use serde::Serialize;
use sqlx::{FromRow, PgPool};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct Profile {
    pub user_id: i64,
    pub full_name: String,
    pub age: i32,
    pub gender: String,
    pub address: String,
}

impl Profile {
    /// Fails with a foreign-key violation when `user_id` has no account and a
    /// unique violation when the account already has a profile.
    pub async fn create(db: &PgPool, profile: &Profile) -> anyhow::Result<Profile> {
        let created = sqlx::query_as::<_, Profile>(
            r#"
            INSERT INTO profile (user_id, full_name, age, gender, address)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING user_id, full_name, age, gender, address
            "#,
        )
        .bind(profile.user_id)
        .bind(&profile.full_name)
        .bind(profile.age)
        .bind(&profile.gender)
        .bind(&profile.address)
        .fetch_one(db)
        .await?;
        Ok(created)
    }

    pub async fn find(db: &PgPool, user_id: i64) -> anyhow::Result<Option<Profile>> {
        let profile = sqlx::query_as::<_, Profile>(
            r#"
            SELECT user_id, full_name, age, gender, address
            FROM profile
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(db)
        .await?;
        Ok(profile)
    }

    pub async fn list(db: &PgPool) -> anyhow::Result<Vec<Profile>> {
        let rows = sqlx::query_as::<_, Profile>(
            r#"
            SELECT user_id, full_name, age, gender, address
            FROM profile
            ORDER BY user_id
            "#,
        )
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    pub async fn update(db: &PgPool, profile: &Profile) -> anyhow::Result<Option<Profile>> {
        let updated = sqlx::query_as::<_, Profile>(
            r#"
            UPDATE profile
               SET full_name = $2, age = $3, gender = $4, address = $5
             WHERE user_id = $1
            RETURNING user_id, full_name, age, gender, address
            "#,
        )
        .bind(profile.user_id)
        .bind(&profile.full_name)
        .bind(profile.age)
        .bind(&profile.gender)
        .bind(&profile.address)
        .fetch_optional(db)
        .await?;
        Ok(updated)
    }

    pub async fn delete(db: &PgPool, user_id: i64) -> anyhow::Result<Option<Profile>> {
        let deleted = sqlx::query_as::<_, Profile>(
            r#"
            DELETE FROM profile
            WHERE user_id = $1
            RETURNING user_id, full_name, age, gender, address
            "#,
        )
        .bind(user_id)
        .fetch_optional(db)
        .await?;
        Ok(deleted)
    }
}
