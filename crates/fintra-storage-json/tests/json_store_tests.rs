use chrono::NaiveDate;
use fintra_core::{CoreError, LedgerStore};
use fintra_domain::{Budget, Transaction, TransactionKind};
use fintra_storage_json::JsonLedgerStore;
use tempfile::tempdir;
use uuid::Uuid;

fn sample_transaction(user_id: Uuid) -> Transaction {
    Transaction::new(
        user_id,
        "Weekly shop",
        "Food",
        -82.4,
        NaiveDate::from_ymd_opt(2025, 6, 7).unwrap(),
        TransactionKind::Expense,
    )
}

#[test]
fn missing_files_read_as_empty_collections() {
    let temp = tempdir().unwrap();
    let store = JsonLedgerStore::new(temp.path().to_path_buf()).unwrap();
    let user = Uuid::new_v4();

    assert!(store.list_transactions(user).unwrap().is_empty());
    assert!(store.list_budgets(user).unwrap().is_empty());
    assert!(!store.transactions_path().exists());
}

#[test]
fn rows_survive_a_store_reopen() {
    let temp = tempdir().unwrap();
    let user = Uuid::new_v4();
    let txn = sample_transaction(user);
    let budget = Budget::new(user, "Food", 350.0, "cart", "#16a34a");

    {
        let store = JsonLedgerStore::new(temp.path().to_path_buf()).unwrap();
        store.insert_transaction(txn.clone()).unwrap();
        store.insert_budget(budget.clone()).unwrap();
    }

    let reopened = JsonLedgerStore::new(temp.path().to_path_buf()).unwrap();
    assert_eq!(reopened.list_transactions(user).unwrap(), vec![txn]);
    assert_eq!(reopened.list_budgets(user).unwrap(), vec![budget]);
}

#[test]
fn users_are_filtered_out_of_each_others_rows() {
    let temp = tempdir().unwrap();
    let store = JsonLedgerStore::new(temp.path().to_path_buf()).unwrap();
    let alice = Uuid::new_v4();
    let bob = Uuid::new_v4();
    store.insert_transaction(sample_transaction(alice)).unwrap();
    store.insert_transaction(sample_transaction(bob)).unwrap();

    let alices = store.list_transactions(alice).unwrap();
    assert_eq!(alices.len(), 1);
    assert!(alices.iter().all(|txn| txn.user_id == alice));
    // Lookups scoped to the wrong user miss.
    assert!(store.transaction(bob, alices[0].id).unwrap().is_none());
}

#[test]
fn replace_and_delete_rewrite_the_backing_file() {
    let temp = tempdir().unwrap();
    let store = JsonLedgerStore::new(temp.path().to_path_buf()).unwrap();
    let user = Uuid::new_v4();
    let txn = sample_transaction(user);
    store.insert_transaction(txn.clone()).unwrap();

    let mut updated = txn.clone();
    updated.name = "Corner shop".into();
    assert!(store.replace_transaction(updated).unwrap());
    let stored = store.transaction(user, txn.id).unwrap().unwrap();
    assert_eq!(stored.name, "Corner shop");

    assert!(store.delete_transaction(user, txn.id).unwrap());
    assert!(!store.delete_transaction(user, txn.id).unwrap());
    assert!(store.list_transactions(user).unwrap().is_empty());
}

#[test]
fn replace_of_unknown_budget_reports_false() {
    let temp = tempdir().unwrap();
    let store = JsonLedgerStore::new(temp.path().to_path_buf()).unwrap();
    let budget = Budget::new(Uuid::new_v4(), "Food", 350.0, "cart", "#16a34a");
    assert!(!store.replace_budget(budget).unwrap());
}

#[test]
fn corrupt_files_surface_serde_errors() {
    let temp = tempdir().unwrap();
    let store = JsonLedgerStore::new(temp.path().to_path_buf()).unwrap();
    std::fs::write(store.transactions_path(), "{ not json").unwrap();

    let err = store
        .list_transactions(Uuid::new_v4())
        .expect_err("corrupt file must fail");
    assert!(matches!(err, CoreError::Serde(_)), "unexpected error: {err:?}");
}
