use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "account_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: Uuid,
    pub open_id: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub login_method: Option<String>,
    pub role: Role,
    pub credits: i32,
    pub is_vip: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub last_signed_in: OffsetDateTime,
}

const ACCOUNT_COLUMNS: &str = r#"
    id, open_id, name, email, login_method, role, credits, is_vip,
    created_at, updated_at, last_signed_in
"#;

pub async fn find_by_id(db: &PgPool, id: Uuid) -> anyhow::Result<Option<Account>> {
    let account = sqlx::query_as::<_, Account>(&format!(
        r#"
        SELECT {ACCOUNT_COLUMNS}
        FROM accounts
        WHERE id = $1
        "#,
    ))
    .bind(id)
    .fetch_optional(db)
    .await?;
    Ok(account)
}

/// Create the account on first login, refresh profile fields and
/// `last_signed_in` on every subsequent one. Credits keep their current value.
pub async fn upsert_on_login(
    db: &PgPool,
    open_id: &str,
    name: Option<&str>,
    email: Option<&str>,
    login_method: Option<&str>,
) -> anyhow::Result<Account> {
    let account = sqlx::query_as::<_, Account>(&format!(
        r#"
        INSERT INTO accounts (open_id, name, email, login_method)
        VALUES ($1, $2, $3, $4)
        ON CONFLICT (open_id) DO UPDATE SET
            name = COALESCE(EXCLUDED.name, accounts.name),
            email = COALESCE(EXCLUDED.email, accounts.email),
            login_method = COALESCE(EXCLUDED.login_method, accounts.login_method),
            last_signed_in = now(),
            updated_at = now()
        RETURNING {ACCOUNT_COLUMNS}
        "#,
    ))
    .bind(open_id)
    .bind(name)
    .bind(email)
    .bind(login_method)
    .fetch_one(db)
    .await?;
    Ok(account)
}
