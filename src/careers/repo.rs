use serde::Serialize;
use sqlx::{FromRow, PgPool};
use time::Date;

use super::dates;

/// Career posting as stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct Career {
    pub job_id: i64,
    pub company: String,
    pub position: String,
    pub job_type: String,
    pub description: String,
    #[serde(with = "dates")]
    pub start_date: Date,
    #[serde(with = "dates")]
    pub end_date: Date,
}

/// A validated posting that has no id yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCareer {
    pub company: String,
    pub position: String,
    pub job_type: String,
    pub description: String,
    pub start_date: Date,
    pub end_date: Date,
}

const COLUMNS: &str = "job_id, company, position, job_type, description, start_date, end_date";

pub async fn insert(db: &PgPool, new: &NewCareer) -> anyhow::Result<Career> {
    let career = sqlx::query_as::<_, Career>(&format!(
        r#"
        INSERT INTO career (company, position, job_type, description, start_date, end_date)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING {COLUMNS}
        "#
    ))
    .bind(&new.company)
    .bind(&new.position)
    .bind(&new.job_type)
    .bind(&new.description)
    .bind(new.start_date)
    .bind(new.end_date)
    .fetch_one(db)
    .await?;
    Ok(career)
}

pub async fn find(db: &PgPool, job_id: i64) -> anyhow::Result<Option<Career>> {
    let career = sqlx::query_as::<_, Career>(&format!(
        "SELECT {COLUMNS} FROM career WHERE job_id = $1"
    ))
    .bind(job_id)
    .fetch_optional(db)
    .await?;
    Ok(career)
}

pub async fn list(db: &PgPool) -> anyhow::Result<Vec<Career>> {
    let rows = sqlx::query_as::<_, Career>(&format!(
        "SELECT {COLUMNS} FROM career ORDER BY job_id"
    ))
    .fetch_all(db)
    .await?;
    Ok(rows)
}

/// Overwrites every column of `career.job_id`; `None` when the row is gone.
pub async fn update(db: &PgPool, career: &Career) -> anyhow::Result<Option<Career>> {
    let updated = sqlx::query_as::<_, Career>(&format!(
        r#"
        UPDATE career
           SET company = $2, position = $3, job_type = $4, description = $5,
               start_date = $6, end_date = $7
         WHERE job_id = $1
        RETURNING {COLUMNS}
        "#
    ))
    .bind(career.job_id)
    .bind(&career.company)
    .bind(&career.position)
    .bind(&career.job_type)
    .bind(&career.description)
    .bind(career.start_date)
    .bind(career.end_date)
    .fetch_optional(db)
    .await?;
    Ok(updated)
}

pub async fn delete(db: &PgPool, job_id: i64) -> anyhow::Result<Option<Career>> {
    let deleted = sqlx::query_as::<_, Career>(&format!(
        "DELETE FROM career WHERE job_id = $1 RETURNING {COLUMNS}"
    ))
    .bind(job_id)
    .fetch_optional(db)
    .await?;
    Ok(deleted)
}
