use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

/// Stored broker credentials; the journal keeps a single configuration row.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct BrokerSettings {
    pub id: Uuid,
    pub username: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub environment: String,
    pub last_sync_at: Option<DateTime<Utc>>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

pub async fn get_settings(pool: &PgPool) -> anyhow::Result<Option<BrokerSettings>> {
    let settings =
        sqlx::query_as::<_, BrokerSettings>("SELECT * FROM broker_settings LIMIT 1")
            .fetch_optional(pool)
            .await?;

    Ok(settings)
}

/// Create or replace the single settings row.
pub async fn upsert_settings(
    pool: &PgPool,
    username: &str,
    password: &str,
    environment: &str,
) -> anyhow::Result<BrokerSettings> {
    let existing = get_settings(pool).await?;

    let settings = match existing {
        Some(current) => {
            sqlx::query_as::<_, BrokerSettings>(
                r#"
                UPDATE broker_settings
                SET username = $2, password = $3, environment = $4, updated_at = now()
                WHERE id = $1
                RETURNING *
                "#,
            )
            .bind(current.id)
            .bind(username)
            .bind(password)
            .bind(environment)
            .fetch_one(pool)
            .await?
        }
        None => {
            sqlx::query_as::<_, BrokerSettings>(
                r#"
                INSERT INTO broker_settings (username, password, environment)
                VALUES ($1, $2, $3)
                RETURNING *
                "#,
            )
            .bind(username)
            .bind(password)
            .bind(environment)
            .fetch_one(pool)
            .await?
        }
    };

    Ok(settings)
}

pub async fn touch_last_sync(pool: &PgPool, id: Uuid) -> anyhow::Result<()> {
    sqlx::query("UPDATE broker_settings SET last_sync_at = now(), updated_at = now() WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(())
}

pub async fn delete_settings(pool: &PgPool) -> anyhow::Result<()> {
    sqlx::query("DELETE FROM broker_settings").execute(pool).await?;
    Ok(())
}
