use anyhow::Context;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool, Postgres, Transaction};
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRecord {
    pub id: Uuid,
    pub account_id: Uuid,
    pub original_image: Option<String>,
    pub result_image: String,
    pub prompt: Option<String>,
    pub title: Option<String>,
    pub subtitle: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// Fields of a record that the caller supplies; id and created_at are
/// assigned at insert time.
#[derive(Debug, Clone, Default)]
pub struct NewGeneration {
    pub original_image: Option<String>,
    pub result_image: String,
    pub prompt: Option<String>,
    pub title: Option<String>,
    pub subtitle: Option<String>,
}

/// Conditional one-credit debit. Returns false when the balance was already
/// below 1, in which case nothing was written.
pub async fn debit_one_credit_tx(
    tx: &mut Transaction<'_, Postgres>,
    account_id: Uuid,
) -> anyhow::Result<bool> {
    let result = sqlx::query(
        r#"
        UPDATE accounts
        SET credits = credits - 1, updated_at = now()
        WHERE id = $1 AND credits >= 1
        "#,
    )
    .bind(account_id)
    .execute(&mut **tx)
    .await
    .context("debit credit")?;

    Ok(result.rows_affected() == 1)
}

pub async fn insert_record_tx(
    tx: &mut Transaction<'_, Postgres>,
    account_id: Uuid,
    new: &NewGeneration,
) -> anyhow::Result<GenerationRecord> {
    let record = sqlx::query_as::<_, GenerationRecord>(
        r#"
        INSERT INTO generations (id, account_id, original_image, result_image, prompt, title, subtitle)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING id, account_id, original_image, result_image, prompt, title, subtitle, created_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(account_id)
    .bind(new.original_image.as_deref())
    .bind(&new.result_image)
    .bind(new.prompt.as_deref())
    .bind(new.title.as_deref())
    .bind(new.subtitle.as_deref())
    .fetch_one(&mut **tx)
    .await
    .context("insert generation record")?;

    Ok(record)
}

/// Newest first, id as tiebreak so equal timestamps still order stably.
pub async fn list_by_account(
    db: &PgPool,
    account_id: Uuid,
) -> anyhow::Result<Vec<GenerationRecord>> {
    let rows = sqlx::query_as::<_, GenerationRecord>(
        r#"
        SELECT id, account_id, original_image, result_image, prompt, title, subtitle, created_at
        FROM generations
        WHERE account_id = $1
        ORDER BY created_at DESC, id
        "#,
    )
    .bind(account_id)
    .fetch_all(db)
    .await
    .context("list generations by account")?;

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_serializes_camel_case() {
        let record = GenerationRecord {
            id: Uuid::new_v4(),
            account_id: Uuid::new_v4(),
            original_image: None,
            result_image: "https://img.test/cover.png".into(),
            prompt: None,
            title: Some("双11必买清单".into()),
            subtitle: None,
            created_at: OffsetDateTime::now_utc(),
        };
        let json = serde_json::to_value(&record).unwrap();
        assert!(json.get("accountId").is_some());
        assert!(json.get("resultImage").is_some());
        assert!(json.get("originalImage").is_some());
        assert_eq!(json["title"], "双11必买清单");
    }
}
