use crate::api::{ListQuery, UserReader, UserWriter};
use crate::domain::auth::SessionUser;
use crate::domain::page::Page;
use crate::domain::types::UserId;
use crate::domain::user::User;
use crate::fetch::{FetchError, ListKey, ListView};
use crate::forms::users::{AddUserFormPayload, UpdateUserFormPayload, UpdateUserRoleFormPayload};

use super::{ServiceError, ServiceResult};

/// Account management is restricted to administrators.
fn check_admin(user: &SessionUser) -> ServiceResult<()> {
    if user.is_admin() {
        Ok(())
    } else {
        Err(ServiceError::Forbidden)
    }
}

pub async fn show_users<R>(
    user: &SessionUser,
    view: &ListView<Page<User>>,
    key: ListKey,
    backend: &R,
) -> ServiceResult<Page<User>>
where
    R: UserReader,
{
    check_admin(user)?;

    let query = ListQuery::default()
        .page(key.page)
        .search(key.search.clone());

    match view
        .fetch(key, backend.list_users(&user.access_token, &query))
        .await
    {
        Ok(page) => Ok(page),
        Err(FetchError::Cancelled) => Err(ServiceError::Cancelled),
        Err(FetchError::Api(e)) => {
            log::error!("Failed to list users: {e}");
            Err(e.into())
        }
    }
}

pub async fn show_user<R>(
    user: &SessionUser,
    user_id: UserId,
    backend: &R,
) -> ServiceResult<User>
where
    R: UserReader,
{
    check_admin(user)?;

    match backend.get_user_by_id(&user.access_token, user_id).await {
        Ok(record) => Ok(record),
        Err(e) => {
            log::error!("Failed to get user: {e}");
            Err(e.into())
        }
    }
}

pub async fn add_user<R>(
    payload: AddUserFormPayload,
    user: &SessionUser,
    view: &ListView<Page<User>>,
    backend: &R,
) -> ServiceResult<User>
where
    R: UserWriter,
{
    check_admin(user)?;

    let new_user = payload.into_new_user();
    match backend.create_user(&user.access_token, &new_user).await {
        Ok(created) => {
            view.invalidate().await;
            Ok(created)
        }
        Err(e) => {
            log::error!("Failed to create user: {e}");
            Err(e.into())
        }
    }
}

pub async fn update_user<R>(
    user_id: UserId,
    payload: UpdateUserFormPayload,
    user: &SessionUser,
    view: &ListView<Page<User>>,
    backend: &R,
) -> ServiceResult<User>
where
    R: UserWriter,
{
    check_admin(user)?;

    let update = payload.into_update();
    match backend
        .update_user(&user.access_token, user_id, &update)
        .await
    {
        Ok(updated) => {
            view.invalidate().await;
            Ok(updated)
        }
        Err(e) => {
            log::error!("Failed to update user: {e}");
            Err(e.into())
        }
    }
}

pub async fn delete_user<R>(
    user_id: UserId,
    user: &SessionUser,
    view: &ListView<Page<User>>,
    backend: &R,
) -> ServiceResult<()>
where
    R: UserWriter,
{
    check_admin(user)?;

    match backend.delete_user(&user.access_token, user_id).await {
        Ok(()) => {
            view.invalidate().await;
            Ok(())
        }
        Err(e) => {
            log::error!("Failed to delete user: {e}");
            Err(e.into())
        }
    }
}

pub async fn restore_user<R>(
    user_id: UserId,
    user: &SessionUser,
    view: &ListView<Page<User>>,
    backend: &R,
) -> ServiceResult<User>
where
    R: UserWriter,
{
    check_admin(user)?;

    match backend.restore_user(&user.access_token, user_id).await {
        Ok(restored) => {
            view.invalidate().await;
            Ok(restored)
        }
        Err(e) => {
            log::error!("Failed to restore user: {e}");
            Err(e.into())
        }
    }
}

pub async fn toggle_user_status<R>(
    user_id: UserId,
    user: &SessionUser,
    view: &ListView<Page<User>>,
    backend: &R,
) -> ServiceResult<User>
where
    R: UserWriter,
{
    check_admin(user)?;

    match backend.toggle_user_status(&user.access_token, user_id).await {
        Ok(toggled) => {
            view.invalidate().await;
            Ok(toggled)
        }
        Err(e) => {
            log::error!("Failed to toggle user status: {e}");
            Err(e.into())
        }
    }
}

pub async fn update_user_role<R>(
    user_id: UserId,
    payload: UpdateUserRoleFormPayload,
    user: &SessionUser,
    view: &ListView<Page<User>>,
    backend: &R,
) -> ServiceResult<User>
where
    R: UserWriter,
{
    check_admin(user)?;

    match backend
        .update_user_role(&user.access_token, user_id, payload.role)
        .await
    {
        Ok(updated) => {
            view.invalidate().await;
            Ok(updated)
        }
        Err(e) => {
            log::error!("Failed to update user role: {e}");
            Err(e.into())
        }
    }
}
