use shared::domain::{Customer, CustomerId};

use super::*;
use crate::{
    fake_service::{sample_customer, Call, FakeCustomerService},
    field_path::{CustomerField, PhoneField},
};

#[tokio::test]
async fn load_stores_the_fetched_customer() {
    let service = FakeCustomerService::with_customers(vec![sample_customer(7)]);
    let mut store = DraftStore::new();

    let outcome = store.load(&service, CustomerId(7)).await.expect("load");

    assert_eq!(outcome, LoadOutcome::Applied);
    assert_eq!(store.status(), DraftStatus::Loaded);
    assert_eq!(store.record(), Some(&sample_customer(7)));
}

#[tokio::test]
async fn load_of_missing_customer_stays_empty() {
    let service = FakeCustomerService::empty();
    let mut store = DraftStore::new();

    let err = store.load(&service, CustomerId(999)).await.expect_err("missing");

    assert_eq!(err, WorkflowError::NotFound { id: CustomerId(999) });
    assert_eq!(store.status(), DraftStatus::Empty);
    assert!(store.is_empty());
}

#[tokio::test]
async fn load_transport_failure_stays_empty() {
    let service = FakeCustomerService::with_customers(vec![sample_customer(1)]);
    service.set_failure(Some("connection refused")).await;
    let mut store = DraftStore::new();

    let err = store.load(&service, CustomerId(1)).await.expect_err("failure");

    assert!(matches!(
        err,
        WorkflowError::Remote {
            operation: Operation::FetchCustomer,
            ..
        }
    ));
    assert_eq!(store.status(), DraftStatus::Empty);
}

#[test]
fn begin_load_marks_the_store_loading() {
    let mut store = DraftStore::new();
    store.seed(Customer::blank());
    let ticket = store.begin_load(CustomerId(4));
    assert_eq!(ticket.id(), CustomerId(4));
    assert_eq!(store.status(), DraftStatus::Loading);
    assert!(store.is_empty());
}

#[test]
fn result_arriving_after_clear_is_discarded() {
    let mut store = DraftStore::new();
    let ticket = store.begin_load(CustomerId(4));
    store.clear();

    let outcome = store
        .finish_load(ticket, Ok(Some(sample_customer(4))))
        .expect("discarded quietly");

    assert_eq!(outcome, LoadOutcome::Discarded);
    assert_eq!(store.status(), DraftStatus::Empty);
    assert!(store.is_empty());
}

#[test]
fn only_the_latest_ticket_is_honoured() {
    let mut store = DraftStore::new();
    let stale = store.begin_load(CustomerId(1));
    let current = store.begin_load(CustomerId(2));

    assert_eq!(
        store.finish_load(stale, Ok(Some(sample_customer(1)))),
        Ok(LoadOutcome::Discarded)
    );
    assert_eq!(
        store.finish_load(current, Ok(Some(sample_customer(2)))),
        Ok(LoadOutcome::Applied)
    );
    assert_eq!(store.record().and_then(|c| c.id), Some(CustomerId(2)));
}

#[test]
fn apply_change_on_empty_store_is_a_no_op() {
    let mut store = DraftStore::new();
    assert!(!store.apply_change(FieldPath::Customer(CustomerField::Name), "Ana"));
    assert_eq!(store.status(), DraftStatus::Empty);
}

#[test]
fn apply_change_marks_the_draft_dirty() {
    let mut store = DraftStore::new();
    store.seed(sample_customer(2));
    assert!(store.apply_change(FieldPath::Customer(CustomerField::Name), "Ana"));
    assert_eq!(store.status(), DraftStatus::Dirty);
    assert_eq!(store.record().map(|c| c.name.as_str()), Some("Ana"));
}

#[test]
fn ignored_phone_change_keeps_status() {
    let mut store = DraftStore::new();
    store.seed(Customer::default());
    assert!(!store.apply_change(FieldPath::first_phone(PhoneField::AreaCode), "11"));
    assert_eq!(store.status(), DraftStatus::Loaded);
    assert_eq!(store.record(), Some(&Customer::default()));
}

#[tokio::test]
async fn unedited_update_sends_the_loaded_record() {
    let service = FakeCustomerService::with_customers(vec![sample_customer(5)]);
    let mut store = DraftStore::new();
    store.load(&service, CustomerId(5)).await.expect("load");

    let outcome = store.commit(&service, Commit::Update).await.expect("update");

    assert_eq!(outcome, CommitOutcome::Updated);
    assert_eq!(
        service.calls().await,
        vec![Call::Fetch(CustomerId(5)), Call::Update(sample_customer(5))]
    );
    assert!(store.is_empty());
}

#[tokio::test]
async fn failed_commit_keeps_the_draft_for_retry() {
    let service = FakeCustomerService::with_customers(vec![sample_customer(5)]);
    let mut store = DraftStore::new();
    store.load(&service, CustomerId(5)).await.expect("load");
    store.apply_change(FieldPath::Customer(CustomerField::Name), "Renamed");

    service.set_failure(Some("server error")).await;
    let err = store.commit(&service, Commit::Update).await.expect_err("fails");
    assert_eq!(err.category(), crate::error::ErrorCategory::Remote);
    assert_eq!(store.status(), DraftStatus::Dirty);
    assert_eq!(store.record().map(|c| c.name.as_str()), Some("Renamed"));

    service.set_failure(None).await;
    store.commit(&service, Commit::Update).await.expect("retry");
    assert_eq!(service.customers().await[0].name, "Renamed");
}

#[tokio::test]
async fn commit_without_draft_is_rejected() {
    let service = FakeCustomerService::empty();
    let mut store = DraftStore::new();
    assert_eq!(
        store.commit(&service, Commit::Create).await,
        Err(WorkflowError::NoDraft)
    );
    assert!(service.calls().await.is_empty());
}

#[tokio::test]
async fn update_requires_a_persisted_record() {
    let service = FakeCustomerService::empty();
    let mut store = DraftStore::new();
    store.seed(Customer::blank());
    assert_eq!(
        store.commit(&service, Commit::Update).await,
        Err(WorkflowError::Unsaved)
    );
    assert!(service.calls().await.is_empty());
}

#[tokio::test]
async fn create_returns_the_record_echoed_by_the_store() {
    let service = FakeCustomerService::empty();
    let mut store = DraftStore::new();
    store.seed(Customer::blank());
    store.apply_change(FieldPath::Customer(CustomerField::Name), "Ana");

    let outcome = store.commit(&service, Commit::Create).await.expect("create");

    let CommitOutcome::Created(Some(created)) = outcome else {
        panic!("expected created record, got {outcome:?}");
    };
    assert_eq!(created.id, Some(CustomerId(1)));
    assert_eq!(created.name, "Ana");
    assert!(store.is_empty());
}

#[tokio::test]
async fn delete_does_not_need_a_draft() {
    let service = FakeCustomerService::with_customers(vec![sample_customer(3)]);
    let mut store = DraftStore::new();
    assert_eq!(
        store.commit(&service, Commit::Delete(CustomerId(3))).await,
        Ok(CommitOutcome::Deleted(CustomerId(3)))
    );
    assert!(service.customers().await.is_empty());
}
