//! In-process [`KvBackend`] used by tests and the local demo server.

use std::collections::HashMap;

use tokio::sync::Mutex;

use crate::backend::{KvBackend, ProfileRow, WriteBatch, WriteOp, fields};
use crate::{StoreError, UserKey};

/// One account's stored data.
#[derive(Debug, Default, Clone)]
struct Account {
    text: HashMap<String, String>,
    ints: HashMap<String, i64>,
    currencies: HashMap<String, i64>,
}

/// A [`KvBackend`] backed by a process-local map.
///
/// Semantics match the external service where it matters:
/// - batches apply atomically (debit validation happens before any write),
/// - currency adjustments are incremental, never read-modify-write,
/// - a debit that would push a balance negative fails the whole batch.
///
/// Everything is lost on process exit — this is a stand-in, not storage.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    accounts: Mutex<HashMap<UserKey, Account>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KvBackend for MemoryBackend {
    async fn read_profile(
        &self,
        key: &UserKey,
    ) -> Result<ProfileRow, StoreError> {
        let accounts = self.accounts.lock().await;
        let Some(account) = accounts.get(key) else {
            return Ok(ProfileRow::default());
        };

        let int = |field: &str| account.ints.get(field).copied();
        Ok(ProfileRow {
            nickname: account.text.get(fields::NICKNAME).cloned(),
            level: int(fields::LEVEL),
            experience: int(fields::EXPERIENCE),
            element_metal: int(fields::ELEMENT_METAL),
            element_wood: int(fields::ELEMENT_WOOD),
            element_water: int(fields::ELEMENT_WATER),
            element_fire: int(fields::ELEMENT_FIRE),
            element_earth: int(fields::ELEMENT_EARTH),
        })
    }

    async fn read_currency(
        &self,
        key: &UserKey,
        currency: &str,
    ) -> Result<i64, StoreError> {
        let accounts = self.accounts.lock().await;
        Ok(accounts
            .get(key)
            .and_then(|a| a.currencies.get(currency).copied())
            .unwrap_or(0))
    }

    async fn apply(
        &self,
        key: &UserKey,
        batch: WriteBatch,
    ) -> Result<(), StoreError> {
        let mut accounts = self.accounts.lock().await;
        let account = accounts.entry(key.clone()).or_default();

        // Validate every debit before mutating anything, so a failing
        // batch leaves the account untouched. Net effect per currency is
        // checked, not individual ops: a batch may credit and debit the
        // same balance.
        let mut deltas: HashMap<&str, i64> = HashMap::new();
        for op in batch.ops() {
            match op {
                WriteOp::Credit { currency, amount } => {
                    *deltas.entry(*currency).or_default() += *amount;
                }
                WriteOp::Debit { currency, amount } => {
                    *deltas.entry(*currency).or_default() -= *amount;
                }
                _ => {}
            }
        }
        for (currency, delta) in &deltas {
            let balance =
                account.currencies.get(*currency).copied().unwrap_or(0);
            if balance + delta < 0 {
                tracing::warn!(
                    %key,
                    currency = *currency,
                    balance,
                    delta = *delta,
                    "rejecting batch: balance would go negative"
                );
                return Err(StoreError::InsufficientBalance {
                    currency: currency.to_string(),
                });
            }
        }

        for op in batch.ops() {
            match op {
                WriteOp::SetText { field, value } => {
                    account.text.insert(field.to_string(), value.clone());
                }
                WriteOp::SetInt { field, value } => {
                    account.ints.insert(field.to_string(), *value);
                }
                WriteOp::Credit { currency, amount } => {
                    *account
                        .currencies
                        .entry(currency.to_string())
                        .or_default() += amount;
                }
                WriteOp::Debit { currency, amount } => {
                    *account
                        .currencies
                        .entry(currency.to_string())
                        .or_default() -= amount;
                }
            }
        }

        tracing::debug!(
            %key,
            ops = batch.ops().len(),
            description = batch.description(),
            "applied write batch"
        );
        Ok(())
    }
}
