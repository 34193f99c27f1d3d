//! fintra-storage-json
//!
//! Filesystem-backed [`LedgerStore`]: one JSON file per collection in a
//! data directory, every write going through a temp file then a rename.
//! All users share a file; rows are filtered per call.

use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use serde::{de::DeserializeOwned, Serialize};
use tracing::debug;
use uuid::Uuid;

use fintra_core::{CoreError, CoreResult, LedgerStore};
use fintra_domain::{Budget, Transaction};

const TRANSACTIONS_FILE: &str = "transactions.json";
const BUDGETS_FILE: &str = "budgets.json";
const TMP_SUFFIX: &str = "tmp";

/// JSON-file persistence for transactions and budgets.
///
/// Each call rereads the backing file, so concurrent writers to the same
/// data directory follow last-write-wins semantics with no cross-call
/// transaction.
#[derive(Debug, Clone)]
pub struct JsonLedgerStore {
    data_dir: PathBuf,
}

impl JsonLedgerStore {
    pub fn new(data_dir: PathBuf) -> CoreResult<Self> {
        fs::create_dir_all(&data_dir)?;
        Ok(Self { data_dir })
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn transactions_path(&self) -> PathBuf {
        self.data_dir.join(TRANSACTIONS_FILE)
    }

    pub fn budgets_path(&self) -> PathBuf {
        self.data_dir.join(BUDGETS_FILE)
    }

    fn read_all_transactions(&self) -> CoreResult<Vec<Transaction>> {
        read_collection(&self.transactions_path())
    }

    fn write_all_transactions(&self, rows: &[Transaction]) -> CoreResult<()> {
        write_collection(&self.transactions_path(), rows)?;
        debug!(count = rows.len(), "transactions file rewritten");
        Ok(())
    }

    fn read_all_budgets(&self) -> CoreResult<Vec<Budget>> {
        read_collection(&self.budgets_path())
    }

    fn write_all_budgets(&self, rows: &[Budget]) -> CoreResult<()> {
        write_collection(&self.budgets_path(), rows)?;
        debug!(count = rows.len(), "budgets file rewritten");
        Ok(())
    }
}

impl LedgerStore for JsonLedgerStore {
    fn list_transactions(&self, user_id: Uuid) -> CoreResult<Vec<Transaction>> {
        Ok(self
            .read_all_transactions()?
            .into_iter()
            .filter(|txn| txn.user_id == user_id)
            .collect())
    }

    fn transaction(&self, user_id: Uuid, id: Uuid) -> CoreResult<Option<Transaction>> {
        Ok(self
            .read_all_transactions()?
            .into_iter()
            .find(|txn| txn.user_id == user_id && txn.id == id))
    }

    fn insert_transaction(&self, transaction: Transaction) -> CoreResult<()> {
        let mut rows = self.read_all_transactions()?;
        rows.push(transaction);
        self.write_all_transactions(&rows)
    }

    fn replace_transaction(&self, transaction: Transaction) -> CoreResult<bool> {
        let mut rows = self.read_all_transactions()?;
        match rows
            .iter_mut()
            .find(|row| row.user_id == transaction.user_id && row.id == transaction.id)
        {
            Some(slot) => {
                *slot = transaction;
                self.write_all_transactions(&rows)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn delete_transaction(&self, user_id: Uuid, id: Uuid) -> CoreResult<bool> {
        let mut rows = self.read_all_transactions()?;
        let before = rows.len();
        rows.retain(|txn| !(txn.user_id == user_id && txn.id == id));
        if rows.len() == before {
            return Ok(false);
        }
        self.write_all_transactions(&rows)?;
        Ok(true)
    }

    fn list_budgets(&self, user_id: Uuid) -> CoreResult<Vec<Budget>> {
        Ok(self
            .read_all_budgets()?
            .into_iter()
            .filter(|budget| budget.user_id == user_id)
            .collect())
    }

    fn budget(&self, user_id: Uuid, id: Uuid) -> CoreResult<Option<Budget>> {
        Ok(self
            .read_all_budgets()?
            .into_iter()
            .find(|budget| budget.user_id == user_id && budget.id == id))
    }

    fn insert_budget(&self, budget: Budget) -> CoreResult<()> {
        let mut rows = self.read_all_budgets()?;
        rows.push(budget);
        self.write_all_budgets(&rows)
    }

    fn replace_budget(&self, budget: Budget) -> CoreResult<bool> {
        let mut rows = self.read_all_budgets()?;
        match rows
            .iter_mut()
            .find(|row| row.user_id == budget.user_id && row.id == budget.id)
        {
            Some(slot) => {
                *slot = budget;
                self.write_all_budgets(&rows)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn delete_budget(&self, user_id: Uuid, id: Uuid) -> CoreResult<bool> {
        let mut rows = self.read_all_budgets()?;
        let before = rows.len();
        rows.retain(|budget| !(budget.user_id == user_id && budget.id == id));
        if rows.len() == before {
            return Ok(false);
        }
        self.write_all_budgets(&rows)?;
        Ok(true)
    }
}

fn read_collection<T: DeserializeOwned>(path: &Path) -> CoreResult<Vec<T>> {
    match fs::read_to_string(path) {
        Ok(data) => serde_json::from_str(&data).map_err(|err| CoreError::Serde(err.to_string())),
        // A collection that was never written reads as empty.
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
        Err(err) => Err(err.into()),
    }
}

fn write_collection<T: Serialize>(path: &Path, rows: &[T]) -> CoreResult<()> {
    let json =
        serde_json::to_string_pretty(rows).map_err(|err| CoreError::Serde(err.to_string()))?;
    let tmp = tmp_path(path);
    write_atomic(&tmp, &json)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_atomic(path: &Path, data: &str) -> CoreResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}
