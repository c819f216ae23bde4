use crate::api::{CategoryReader, CategoryWriter, ListQuery};
use crate::domain::auth::SessionUser;
use crate::domain::category::Category;
use crate::domain::page::Page;
use crate::domain::types::CategoryId;
use crate::fetch::{FetchError, ListKey, ListView};
use crate::forms::categories::{AddCategoryFormPayload, UpdateCategoryFormPayload};

use super::{ServiceError, ServiceResult};

/// Loads one page of categories through the operator's list view.
///
/// Cache, single-flight and cancellation behavior all live in the view;
/// the loader only runs when the view decides a request is needed.
pub async fn show_categories<R>(
    user: &SessionUser,
    view: &ListView<Page<Category>>,
    key: ListKey,
    backend: &R,
) -> ServiceResult<Page<Category>>
where
    R: CategoryReader,
{
    let query = ListQuery::default()
        .page(key.page)
        .search(key.search.clone());

    match view
        .fetch(key, backend.list_categories(&user.access_token, &query))
        .await
    {
        Ok(page) => Ok(page),
        Err(FetchError::Cancelled) => Err(ServiceError::Cancelled),
        Err(FetchError::Api(e)) => {
            log::error!("Failed to list categories: {e}");
            Err(e.into())
        }
    }
}

pub async fn show_category<R>(
    user: &SessionUser,
    category_id: CategoryId,
    backend: &R,
) -> ServiceResult<Category>
where
    R: CategoryReader,
{
    match backend
        .get_category_by_id(&user.access_token, category_id)
        .await
    {
        Ok(category) => Ok(category),
        Err(e) => {
            log::error!("Failed to get category: {e}");
            Err(e.into())
        }
    }
}

pub async fn add_category<R>(
    payload: AddCategoryFormPayload,
    user: &SessionUser,
    view: &ListView<Page<Category>>,
    backend: &R,
) -> ServiceResult<Category>
where
    R: CategoryWriter,
{
    let category = payload.into_new_category();
    match backend.create_category(&user.access_token, &category).await {
        Ok(created) => {
            view.invalidate().await;
            Ok(created)
        }
        Err(e) => {
            log::error!("Failed to create category: {e}");
            Err(e.into())
        }
    }
}

pub async fn update_category<R>(
    category_id: CategoryId,
    payload: UpdateCategoryFormPayload,
    user: &SessionUser,
    view: &ListView<Page<Category>>,
    backend: &R,
) -> ServiceResult<Category>
where
    R: CategoryWriter,
{
    let update = payload.into_update();
    match backend
        .update_category(&user.access_token, category_id, &update)
        .await
    {
        Ok(updated) => {
            view.invalidate().await;
            Ok(updated)
        }
        Err(e) => {
            log::error!("Failed to update category: {e}");
            Err(e.into())
        }
    }
}

pub async fn delete_category<R>(
    category_id: CategoryId,
    user: &SessionUser,
    view: &ListView<Page<Category>>,
    backend: &R,
) -> ServiceResult<()>
where
    R: CategoryWriter,
{
    match backend
        .delete_category(&user.access_token, category_id)
        .await
    {
        Ok(()) => {
            view.invalidate().await;
            Ok(())
        }
        Err(e) => {
            log::error!("Failed to delete category: {e}");
            Err(e.into())
        }
    }
}

pub async fn restore_category<R>(
    category_id: CategoryId,
    user: &SessionUser,
    view: &ListView<Page<Category>>,
    backend: &R,
) -> ServiceResult<Category>
where
    R: CategoryWriter,
{
    match backend
        .restore_category(&user.access_token, category_id)
        .await
    {
        Ok(restored) => {
            view.invalidate().await;
            Ok(restored)
        }
        Err(e) => {
            log::error!("Failed to restore category: {e}");
            Err(e.into())
        }
    }
}

pub async fn toggle_category_status<R>(
    category_id: CategoryId,
    user: &SessionUser,
    view: &ListView<Page<Category>>,
    backend: &R,
) -> ServiceResult<Category>
where
    R: CategoryWriter,
{
    match backend
        .toggle_category_status(&user.access_token, category_id)
        .await
    {
        Ok(toggled) => {
            view.invalidate().await;
            Ok(toggled)
        }
        Err(e) => {
            log::error!("Failed to toggle category status: {e}");
            Err(e.into())
        }
    }
}
