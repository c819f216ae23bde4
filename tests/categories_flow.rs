//! End-to-end category flows: services driving a [`common::StubBackend`]
//! through a cached list view, the way the route handlers do.

use std::sync::Arc;
use std::time::Duration;

use backoffice::domain::page::Page;
use backoffice::domain::types::{CategoryId, CategoryName};
use backoffice::fetch::{Debounced, ListKey, ListView};
use backoffice::forms::categories::AddCategoryFormPayload;
use backoffice::services::categories::{
    add_category, delete_category, show_categories, toggle_category_status,
};
use backoffice::services::ServiceError;

mod common;

use common::StubBackend;

fn list_view() -> ListView<Page<backoffice::domain::category::Category>> {
    ListView::new(Duration::from_millis(500), Duration::from_secs(300))
}

#[tokio::test(start_paused = true)]
async fn seventeen_categories_span_three_pages() {
    let backend = StubBackend::new().with_categories(common::categories(17));
    let operator = common::operator_session();
    let view = list_view();

    let first = show_categories(&operator, &view, ListKey::new(1, ""), &backend)
        .await
        .expect("should list the first page");
    assert_eq!(first.items.len(), 8);
    assert_eq!(first.total, 17);
    assert_eq!(first.last_page, 3);
    assert_eq!(first.from, Some(1));
    assert_eq!(first.to, Some(8));

    let last = show_categories(&operator, &view, ListKey::new(3, ""), &backend)
        .await
        .expect("should list the last page");
    assert_eq!(last.items.len(), 1);
    assert_eq!(last.from, Some(17));
    assert_eq!(last.to, Some(17));

    assert_eq!(backend.category_list_count(), 2);
}

#[tokio::test(start_paused = true)]
async fn cached_page_is_reused_until_a_mutation_invalidates_it() {
    let backend = StubBackend::new().with_categories(common::categories(3));
    let operator = common::operator_session();
    let view = list_view();
    let key = ListKey::new(1, "");

    show_categories(&operator, &view, key.clone(), &backend)
        .await
        .expect("first listing should succeed");
    show_categories(&operator, &view, key.clone(), &backend)
        .await
        .expect("second listing should succeed");
    assert_eq!(
        backend.category_list_count(),
        1,
        "re-render must come out of the cache"
    );

    let payload = AddCategoryFormPayload {
        name: CategoryName::new("Minuman").expect("valid category name"),
        description: Some("Teh dan kopi".to_string()),
        is_active: true,
    };
    add_category(payload, &operator, &view, &backend)
        .await
        .expect("should create the category");

    let page = show_categories(&operator, &view, key, &backend)
        .await
        .expect("listing after create should succeed");
    assert_eq!(page.total, 4);
    assert_eq!(backend.category_list_count(), 2, "create must invalidate");
    assert!(
        page.items.iter().any(|c| c.name.as_str() == "Minuman"),
        "new category should be visible"
    );
}

#[tokio::test(start_paused = true)]
async fn failed_create_keeps_the_cached_listing() {
    let backend = StubBackend::new().with_categories(common::categories(2));
    let operator = common::operator_session();
    let view = list_view();
    let key = ListKey::new(1, "");

    show_categories(&operator, &view, key.clone(), &backend)
        .await
        .expect("listing should succeed");
    assert_eq!(backend.category_list_count(), 1);

    backend.set_failure(Some(backoffice::api::ApiError::Validation(
        "Nama kategori sudah digunakan".to_string(),
    )));
    let payload = AddCategoryFormPayload {
        name: CategoryName::new("Kategori 01").expect("valid category name"),
        description: None,
        is_active: true,
    };
    let err = add_category(payload, &operator, &view, &backend)
        .await
        .expect_err("duplicate create should fail");
    assert_eq!(
        err,
        ServiceError::Form("Nama kategori sudah digunakan".to_string())
    );

    backend.set_failure(None);
    show_categories(&operator, &view, key, &backend)
        .await
        .expect("listing should still succeed");
    assert_eq!(
        backend.category_list_count(),
        1,
        "a failed create must not throw the cache away"
    );
}

#[tokio::test(start_paused = true)]
async fn deleting_a_category_refetches_the_listing() {
    let backend = StubBackend::new().with_categories(common::categories(9));
    let operator = common::operator_session();
    let view = list_view();
    let key = ListKey::new(1, "");

    let before = show_categories(&operator, &view, key.clone(), &backend)
        .await
        .expect("listing should succeed");
    assert_eq!(before.total, 9);

    let id = CategoryId::new(9).expect("valid category id");
    delete_category(id, &operator, &view, &backend)
        .await
        .expect("should delete the category");

    let after = show_categories(&operator, &view, key, &backend)
        .await
        .expect("listing after delete should succeed");
    assert_eq!(after.total, 8);
    assert_eq!(after.last_page, 1);
    assert_eq!(backend.category_list_count(), 2);
}

#[tokio::test(start_paused = true)]
async fn typing_quickly_supersedes_the_earlier_search() {
    let backend = StubBackend::new().with_categories(common::categories(12));
    let operator = common::operator_session();
    let view = Arc::new(list_view());

    let stale = tokio::spawn({
        let view = Arc::clone(&view);
        async move { view.debounce_search("Kat".to_string()).await }
    });
    tokio::task::yield_now().await;

    let settled = view.debounce_search("Kategori 01".to_string()).await;
    assert_eq!(settled, Debounced::Settled("Kategori 01".to_string()));
    assert_eq!(
        stale.await.expect("debounce task should not panic"),
        Debounced::Superseded
    );

    let page = show_categories(&operator, &view, ListKey::new(1, "Kategori 01"), &backend)
        .await
        .expect("search listing should succeed");
    assert_eq!(page.total, 1);
    assert_eq!(page.items[0].name.as_str(), "Kategori 01");
}

#[tokio::test(start_paused = true)]
async fn toggling_status_only_affects_the_chosen_category() {
    let backend = StubBackend::new().with_categories(common::categories(3));
    let operator = common::operator_session();
    let view = list_view();
    let key = ListKey::new(1, "");

    show_categories(&operator, &view, key.clone(), &backend)
        .await
        .expect("listing should succeed");

    let id = CategoryId::new(2).expect("valid category id");
    let toggled = toggle_category_status(id, &operator, &view, &backend)
        .await
        .expect("should toggle the category");
    assert!(!toggled.is_active);

    let page = show_categories(&operator, &view, key, &backend)
        .await
        .expect("listing after toggle should succeed");
    for category in &page.items {
        assert_eq!(
            category.is_active,
            category.id != 2,
            "only the toggled category may be inactive"
        );
    }
}
