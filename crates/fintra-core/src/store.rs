//! Persistence abstractions and in-memory reference implementations.

use std::sync::{Mutex, PoisonError};

use fintra_domain::{Budget, Transaction, User};
use uuid::Uuid;

use crate::error::{CoreError, CoreResult};

/// Abstraction over persistence backends holding per-user transactions
/// and budgets.
///
/// Each call is independent with at-least-once semantics; there is no
/// transaction spanning a read-modify-write cycle, so concurrent writers
/// to the same user may lose updates. Callers tolerate this by contract.
pub trait LedgerStore: Send + Sync {
    fn list_transactions(&self, user_id: Uuid) -> CoreResult<Vec<Transaction>>;
    fn transaction(&self, user_id: Uuid, id: Uuid) -> CoreResult<Option<Transaction>>;
    fn insert_transaction(&self, transaction: Transaction) -> CoreResult<()>;
    /// Replaces the stored row matching the transaction's user and id.
    /// Returns `false` when no such row exists.
    fn replace_transaction(&self, transaction: Transaction) -> CoreResult<bool>;
    fn delete_transaction(&self, user_id: Uuid, id: Uuid) -> CoreResult<bool>;

    fn list_budgets(&self, user_id: Uuid) -> CoreResult<Vec<Budget>>;
    fn budget(&self, user_id: Uuid, id: Uuid) -> CoreResult<Option<Budget>>;
    fn insert_budget(&self, budget: Budget) -> CoreResult<()>;
    fn replace_budget(&self, budget: Budget) -> CoreResult<bool>;
    /// Deletes the budget only. Transactions referencing its category are
    /// left untouched.
    fn delete_budget(&self, user_id: Uuid, id: Uuid) -> CoreResult<bool>;
}

/// Registry of known users with an explicit lifecycle: seeded once at
/// process start and injected wherever user lookups are needed.
pub trait UserStore: Send + Sync {
    fn user(&self, id: Uuid) -> CoreResult<Option<User>>;
    fn user_by_email(&self, email: &str) -> CoreResult<Option<User>>;
    fn register(&self, user: User) -> CoreResult<()>;
    fn list_users(&self) -> CoreResult<Vec<User>>;
}

#[derive(Debug, Default)]
struct LedgerState {
    transactions: Vec<Transaction>,
    budgets: Vec<Budget>,
}

/// Mutex-guarded in-memory [`LedgerStore`] for tests and embedding.
#[derive(Debug, Default)]
pub struct MemoryLedgerStore {
    state: Mutex<LedgerState>,
}

impl MemoryLedgerStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_state<T>(&self, f: impl FnOnce(&mut LedgerState) -> T) -> T {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut state)
    }
}

impl LedgerStore for MemoryLedgerStore {
    fn list_transactions(&self, user_id: Uuid) -> CoreResult<Vec<Transaction>> {
        Ok(self.with_state(|state| {
            state
                .transactions
                .iter()
                .filter(|txn| txn.user_id == user_id)
                .cloned()
                .collect()
        }))
    }

    fn transaction(&self, user_id: Uuid, id: Uuid) -> CoreResult<Option<Transaction>> {
        Ok(self.with_state(|state| {
            state
                .transactions
                .iter()
                .find(|txn| txn.user_id == user_id && txn.id == id)
                .cloned()
        }))
    }

    fn insert_transaction(&self, transaction: Transaction) -> CoreResult<()> {
        self.with_state(|state| state.transactions.push(transaction));
        Ok(())
    }

    fn replace_transaction(&self, transaction: Transaction) -> CoreResult<bool> {
        Ok(self.with_state(|state| {
            match state
                .transactions
                .iter_mut()
                .find(|txn| txn.user_id == transaction.user_id && txn.id == transaction.id)
            {
                Some(slot) => {
                    *slot = transaction;
                    true
                }
                None => false,
            }
        }))
    }

    fn delete_transaction(&self, user_id: Uuid, id: Uuid) -> CoreResult<bool> {
        Ok(self.with_state(|state| {
            let before = state.transactions.len();
            state
                .transactions
                .retain(|txn| !(txn.user_id == user_id && txn.id == id));
            state.transactions.len() != before
        }))
    }

    fn list_budgets(&self, user_id: Uuid) -> CoreResult<Vec<Budget>> {
        Ok(self.with_state(|state| {
            state
                .budgets
                .iter()
                .filter(|budget| budget.user_id == user_id)
                .cloned()
                .collect()
        }))
    }

    fn budget(&self, user_id: Uuid, id: Uuid) -> CoreResult<Option<Budget>> {
        Ok(self.with_state(|state| {
            state
                .budgets
                .iter()
                .find(|budget| budget.user_id == user_id && budget.id == id)
                .cloned()
        }))
    }

    fn insert_budget(&self, budget: Budget) -> CoreResult<()> {
        self.with_state(|state| state.budgets.push(budget));
        Ok(())
    }

    fn replace_budget(&self, budget: Budget) -> CoreResult<bool> {
        Ok(self.with_state(|state| {
            match state
                .budgets
                .iter_mut()
                .find(|row| row.user_id == budget.user_id && row.id == budget.id)
            {
                Some(slot) => {
                    *slot = budget;
                    true
                }
                None => false,
            }
        }))
    }

    fn delete_budget(&self, user_id: Uuid, id: Uuid) -> CoreResult<bool> {
        Ok(self.with_state(|state| {
            let before = state.budgets.len();
            state
                .budgets
                .retain(|budget| !(budget.user_id == user_id && budget.id == id));
            state.budgets.len() != before
        }))
    }
}

/// Mutex-guarded in-memory [`UserStore`].
#[derive(Debug, Default)]
pub struct MemoryUserStore {
    users: Mutex<Vec<User>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the registry at process start.
    pub fn with_users(users: Vec<User>) -> Self {
        Self {
            users: Mutex::new(users),
        }
    }
}

impl UserStore for MemoryUserStore {
    fn user(&self, id: Uuid) -> CoreResult<Option<User>> {
        let users = self.users.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(users.iter().find(|user| user.id == id).cloned())
    }

    fn user_by_email(&self, email: &str) -> CoreResult<Option<User>> {
        let users = self.users.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(users
            .iter()
            .find(|user| user.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    fn register(&self, user: User) -> CoreResult<()> {
        let mut users = self.users.lock().unwrap_or_else(PoisonError::into_inner);
        if users
            .iter()
            .any(|existing| existing.email.eq_ignore_ascii_case(&user.email))
        {
            return Err(CoreError::UserAlreadyExists(user.email));
        }
        users.push(user);
        Ok(())
    }

    fn list_users(&self) -> CoreResult<Vec<User>> {
        let users = self.users.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(users.clone())
    }
}
