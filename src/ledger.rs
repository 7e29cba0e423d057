use axum::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::accounts;
use crate::generation::repo::{self, GenerationRecord, NewGeneration};

/// Outcome of the atomic debit + record step.
#[derive(Debug)]
pub enum DebitOutcome {
    Recorded(GenerationRecord),
    InsufficientCredits,
}

/// The ledger is the only shared mutable state: account balances plus the
/// generation history. Balances change only through `debit_and_record`.
#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// Current balance, or `None` when the account does not exist.
    async fn account_credits(&self, account_id: Uuid) -> anyhow::Result<Option<i32>>;

    /// One-credit debit and history insert as a single unit. Returns
    /// `InsufficientCredits` without writing anything when the balance is
    /// empty at commit time.
    async fn debit_and_record(
        &self,
        account_id: Uuid,
        new: NewGeneration,
    ) -> anyhow::Result<DebitOutcome>;

    async fn history(&self, account_id: Uuid) -> anyhow::Result<Vec<GenerationRecord>>;
}

#[derive(Clone)]
pub struct PgLedger {
    db: PgPool,
}

impl PgLedger {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl LedgerStore for PgLedger {
    async fn account_credits(&self, account_id: Uuid) -> anyhow::Result<Option<i32>> {
        let account = accounts::repo::find_by_id(&self.db, account_id).await?;
        Ok(account.map(|a| a.credits))
    }

    async fn debit_and_record(
        &self,
        account_id: Uuid,
        new: NewGeneration,
    ) -> anyhow::Result<DebitOutcome> {
        let mut tx = self.db.begin().await?;

        // The conditional update is the authoritative balance check.
        // Dropping the transaction on the false branch rolls everything back.
        if !repo::debit_one_credit_tx(&mut tx, account_id).await? {
            return Ok(DebitOutcome::InsufficientCredits);
        }

        let record = repo::insert_record_tx(&mut tx, account_id, &new).await?;
        tx.commit().await?;
        Ok(DebitOutcome::Recorded(record))
    }

    async fn history(&self, account_id: Uuid) -> anyhow::Result<Vec<GenerationRecord>> {
        repo::list_by_account(&self.db, account_id).await
    }
}
