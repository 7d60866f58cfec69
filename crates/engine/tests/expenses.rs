mod support;

use api_types::expense::ExpenseCategory;
use engine::{
    Applied, CategoryFilter, DeleteRequest, EditorMode, EngineError, ExpenseStore, Field,
    ListController, LoadState, RecordEditor, RemoteError, SortDirection, SortField, fetcher,
    summary,
};

use support::{MemorySession, MemoryStore, day, input, january};

async fn refresh(list: &mut ListController, store: &MemoryStore) -> Applied {
    let ticket = list.request();
    let fetched = fetcher::fetch(store, ticket).await;
    list.apply(fetched)
}

#[tokio::test]
async fn every_filter_returns_only_matching_categories() {
    let store = MemoryStore::new();
    store.seed(&january()).await;

    for filter in [CategoryFilter::All, CategoryFilter::Credit, CategoryFilter::Debit] {
        let mut list = ListController::new();
        list.query_mut().set_filter(filter);
        assert_eq!(refresh(&mut list, &store).await, Applied::Updated);

        assert!(!list.records().is_empty());
        assert!(list.records().iter().all(|e| filter.matches(e.category)));
        let expected_total = match filter {
            CategoryFilter::All => 25,
            CategoryFilter::Credit => 12,
            CategoryFilter::Debit => 13,
        };
        assert_eq!(list.total_count(), expected_total);
    }
}

#[tokio::test]
async fn default_order_is_newest_first() {
    let store = MemoryStore::new();
    store.seed(&january()).await;

    let mut list = ListController::new();
    refresh(&mut list, &store).await;

    let dates: Vec<_> = list.records().iter().map(|e| e.date).collect();
    assert_eq!(dates.len(), 10);
    assert_eq!(dates[0], day(2025, 1, 25));
    assert!(dates.windows(2).all(|w| w[0] >= w[1]));
}

#[tokio::test]
async fn sorting_by_another_column_starts_ascending() {
    let store = MemoryStore::new();
    store.seed(&january()).await;

    let mut list = ListController::new();
    list.query_mut().toggle_sort(SortField::Amount);
    assert_eq!(list.query().sort_direction(), SortDirection::Ascending);
    refresh(&mut list, &store).await;

    let amounts: Vec<_> = list.records().iter().map(|e| e.amount).collect();
    assert_eq!(amounts.first(), Some(&1000));
    assert!(amounts.windows(2).all(|w| w[0] <= w[1]));

    list.query_mut().toggle_sort(SortField::Amount);
    refresh(&mut list, &store).await;
    assert_eq!(list.records().first().map(|e| e.amount), Some(25_000));
}

#[tokio::test]
async fn pages_cover_the_whole_list() {
    let store = MemoryStore::new();
    store.seed(&january()).await;

    let mut list = ListController::new();
    refresh(&mut list, &store).await;
    assert_eq!(list.total_pages(), 3);
    assert!(!list.query().has_prev());
    assert!(list.has_next());

    let mut seen = list.records().len();
    while list.next_page() {
        refresh(&mut list, &store).await;
        seen += list.records().len();
    }
    assert_eq!(seen, 25);
    assert_eq!(list.query().page(), 3);
    assert!(!list.has_next());
    assert_eq!(list.records().len(), 5);
}

#[tokio::test]
async fn create_then_list_round_trip() {
    let store = MemoryStore::new();
    let session = MemorySession::signed_in();

    let mut editor = RecordEditor::new(EditorMode::Create, day(2025, 1, 1));
    editor.form.date = "2025-01-01".to_string();
    editor.form.description = "Coffee".to_string();
    editor.form.category = Some(ExpenseCategory::Outcome);
    editor.form.amount = "15000".to_string();
    let created = editor.submit(&store, &session).await.unwrap();
    assert!(created.id > 0);

    let mut list = ListController::new();
    refresh(&mut list, &store).await;
    let found = list
        .records()
        .iter()
        .find(|e| e.id == created.id)
        .expect("created record listed");
    assert_eq!(found.date, day(2025, 1, 1));
    assert_eq!(found.description, "Coffee");
    assert_eq!(found.category, ExpenseCategory::Outcome);
    assert_eq!(found.amount, 15000);
}

#[tokio::test]
async fn edit_round_trip_changes_only_amount() {
    let store = MemoryStore::new();
    let session = MemorySession::signed_in();
    let original = store
        .insert(&input(day(2025, 1, 1), "Coffee", ExpenseCategory::Outcome, 15000))
        .await
        .unwrap();

    let mut editor = RecordEditor::new(EditorMode::Edit(original.id), day(2025, 3, 3));
    editor.load(&store).await;
    assert_eq!(editor.form.description, "Coffee");
    assert_eq!(editor.form.date, "2025-01-01");
    editor.form.amount = "20000".to_string();
    editor.submit(&store, &session).await.unwrap();

    let refetched = store.get(original.id).await.unwrap();
    assert_eq!(refetched.amount, 20000);
    assert_eq!(refetched.id, original.id);
    assert_eq!(refetched.date, original.date);
    assert_eq!(refetched.description, original.description);
    assert_eq!(refetched.category, original.category);
}

#[tokio::test]
async fn invalid_form_is_not_submitted() {
    let store = MemoryStore::new();
    let session = MemorySession::signed_in();

    let mut editor = RecordEditor::new(EditorMode::Create, day(2025, 1, 1));
    editor.form.amount = "0".to_string();
    let err = editor.submit(&store, &session).await.unwrap_err();
    assert!(matches!(err, EngineError::Validation(_)));
    assert!(editor.errors().get(Field::Description).is_some());
    assert!(editor.errors().get(Field::Amount).is_some());

    let mut list = ListController::new();
    refresh(&mut list, &store).await;
    assert_eq!(list.total_count(), 0);
}

#[tokio::test]
async fn writes_require_a_session() {
    let store = MemoryStore::new();
    let session = MemorySession::signed_out();

    let mut editor = RecordEditor::new(EditorMode::Create, day(2025, 1, 1));
    editor.form.description = "Coffee".to_string();
    editor.form.amount = "15000".to_string();
    assert_eq!(
        editor.submit(&store, &session).await.unwrap_err(),
        EngineError::Unauthenticated
    );

    let existing = store
        .insert(&input(day(2025, 1, 1), "Coffee", ExpenseCategory::Outcome, 15000))
        .await
        .unwrap();
    let result = DeleteRequest::new(existing.id, "Coffee")
        .confirm()
        .execute(&store, &session)
        .await;
    assert_eq!(result, Err(EngineError::Unauthenticated));
    assert!(store.get(existing.id).await.is_ok());
}

#[tokio::test]
async fn failed_save_unlocks_the_form() {
    let store = MemoryStore::new();
    let session = MemorySession::signed_in();

    let mut editor = RecordEditor::new(EditorMode::Create, day(2025, 1, 1));
    editor.form.description = "Coffee".to_string();
    editor.form.amount = "15000".to_string();
    store.fail_next(RemoteError::Server("boom".to_string()));

    let err = editor.submit(&store, &session).await.unwrap_err();
    assert_eq!(err, EngineError::Remote(RemoteError::Server("boom".to_string())));
    assert!(!editor.is_busy());

    editor.submit(&store, &session).await.unwrap();
}

#[tokio::test]
async fn deleting_missing_id_leaves_list_unchanged() {
    let store = MemoryStore::new();
    let session = MemorySession::signed_in();
    store.seed(&january()).await;

    let mut list = ListController::new();
    refresh(&mut list, &store).await;
    let before = list.records().to_vec();

    let result = DeleteRequest::new(9_999, "ghost")
        .confirm()
        .execute(&store, &session)
        .await;
    assert_eq!(result, Err(EngineError::Remote(RemoteError::NotFound)));

    refresh(&mut list, &store).await;
    assert_eq!(list.records(), before.as_slice());
    assert_eq!(list.total_count(), 25);
}

#[tokio::test]
async fn delete_then_refetch_drops_the_record() {
    let store = MemoryStore::new();
    let session = MemorySession::signed_in();
    store.seed(&january()).await;

    let mut list = ListController::new();
    refresh(&mut list, &store).await;
    let target = list.record(0).cloned().unwrap();

    let request = DeleteRequest::new(target.id, target.description.clone());
    assert_eq!(request.description(), target.description);
    request.confirm().execute(&store, &session).await.unwrap();

    refresh(&mut list, &store).await;
    assert_eq!(list.total_count(), 24);
    assert!(list.records().iter().all(|e| e.id != target.id));
}

#[tokio::test]
async fn emptied_last_page_moves_back() {
    let store = MemoryStore::new();
    let session = MemorySession::signed_in();
    store.seed(&january()[..11]).await;

    let mut list = ListController::new();
    refresh(&mut list, &store).await;
    assert!(list.next_page());
    refresh(&mut list, &store).await;
    assert_eq!(list.records().len(), 1);

    let last = list.record(0).cloned().unwrap();
    DeleteRequest::new(last.id, last.description)
        .confirm()
        .execute(&store, &session)
        .await
        .unwrap();

    assert_eq!(refresh(&mut list, &store).await, Applied::OutOfRange);
    assert_eq!(list.query().page(), 1);
    assert_eq!(refresh(&mut list, &store).await, Applied::Updated);
    assert_eq!(list.records().len(), 10);
}

#[tokio::test]
async fn latest_request_wins_over_slower_older_one() {
    let store = MemoryStore::new();
    store.seed(&january()).await;

    let mut list = ListController::new();
    let old_ticket = list.request();
    list.query_mut().set_filter(CategoryFilter::Credit);
    let new_ticket = list.request();

    let (old, new) = tokio::join!(
        fetcher::fetch(&store, old_ticket),
        fetcher::fetch(&store, new_ticket)
    );

    assert_eq!(list.apply(new), Applied::Updated);
    assert_eq!(list.apply(old), Applied::Stale);
    assert_eq!(list.total_count(), 12);
    assert!(
        list.records()
            .iter()
            .all(|e| e.category == ExpenseCategory::Income)
    );
}

#[tokio::test]
async fn failed_fetch_shows_nothing() {
    let store = MemoryStore::new();
    store.seed(&january()).await;

    let mut list = ListController::new();
    refresh(&mut list, &store).await;
    assert_eq!(list.records().len(), 10);

    store.fail_next(RemoteError::Transport("connection refused".to_string()));
    let applied = refresh(&mut list, &store).await;
    assert!(matches!(applied, Applied::Failed(RemoteError::Transport(_))));
    assert!(list.records().is_empty());
    assert!(matches!(list.state(), LoadState::Error(_)));
}

#[tokio::test]
async fn balance_reflects_credit_minus_debit() {
    let store = MemoryStore::new();
    store
        .seed(&[
            input(day(2025, 1, 1), "Salary", ExpenseCategory::Income, 100_000),
            input(day(2025, 1, 2), "Coffee", ExpenseCategory::Outcome, 15_000),
        ])
        .await;

    let balance = summary::fetch_balance(&store).await.unwrap();
    assert_eq!(balance.total_credit.value(), 100_000);
    assert_eq!(balance.total_debit.value(), 15_000);
    assert_eq!(balance.balance.value(), 85_000);
    assert_eq!(balance.balance.to_string(), "Rp 85.000");
}
