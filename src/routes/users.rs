use actix_identity::Identity;
use actix_session::Session;
use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::IncomingFlashMessages;
use serde::Deserialize;
use tera::{Context, Tera};

use crate::api::RestBackend;
use crate::domain::auth::SessionUser;
use crate::domain::page::Page;
use crate::domain::types::UserId;
use crate::domain::user::User;
use crate::dto;
use crate::dto::users::UserDto;
use crate::fetch::{Debounced, FetchState, ListKey};
use crate::forms::FormIssue;
use crate::forms::users::{
    AddUserForm, AddUserFormPayload, UpdateUserForm, UpdateUserFormPayload, UpdateUserRoleForm,
    UpdateUserRoleFormPayload,
};
use crate::models::config::ServerConfig;
use crate::notify::{Entity, Notice};
use crate::routes::{base_context, expire_session, incoming_alerts, redirect, render_template};
use crate::services::ServiceError;
use crate::services::users::{
    add_user as add_user_service, delete_user as delete_user_service,
    restore_user as restore_user_service, show_user as show_user_service,
    show_users as show_users_service, toggle_user_status as toggle_user_status_service,
    update_user as update_user_service, update_user_role as update_user_role_service,
};
use crate::store::{self, Selection};

#[derive(Debug, Deserialize)]
struct ListingParams {
    page: Option<usize>,
    modal: Option<String>,
    id: Option<i32>,
}

#[derive(Debug, Deserialize)]
struct TableParams {
    #[serde(default)]
    search: String,
}

/// Passwords never enter the session draft; a failed submit re-renders
/// the modal with both password fields empty.
fn draft_values(name: &str, email: &str, role: &str, is_active: bool) -> serde_json::Value {
    serde_json::json!({
        "name": name,
        "email": email,
        "role": role,
        "is_active": is_active,
    })
}

fn forbidden() -> HttpResponse {
    Notice::Unauthorized.send();
    redirect("/")
}

#[get("/users")]
pub async fn show_users(
    user: SessionUser,
    identity: Option<Identity>,
    session: Session,
    params: web::Query<ListingParams>,
    flash_messages: IncomingFlashMessages,
    backend: web::Data<RestBackend>,
    fetch_state: web::Data<FetchState>,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let mut state = store::load_state(&session, store::USERS_UI);
    if let Some(page) = params.page {
        state.set_page(page);
    }
    match params.modal.as_deref() {
        Some("create") => state.open_create(),
        Some("edit") => {
            if let Some(id) = params.id {
                state.open_edit(id);
            }
        }
        Some("view") => {
            if let Some(id) = params.id {
                state.open_view(id);
            }
        }
        Some("close") => state.close(),
        _ => {}
    }
    store::store_state(&session, store::USERS_UI, &state);

    let mut alerts = incoming_alerts(&flash_messages);

    let view = fetch_state.users.scoped(user.id).await;
    let key = ListKey::new(state.page, state.search.clone());
    let page = match show_users_service(&user, &view, key, backend.get_ref()).await {
        Ok(page) => page,
        Err(ServiceError::Cancelled) => return redirect("/users"),
        Err(ServiceError::Forbidden) => return forbidden(),
        Err(ServiceError::Unauthorized) => return expire_session(identity, &session),
        Err(ServiceError::Network) => {
            alerts.push(Notice::NetworkError.alert());
            Page::new(Vec::new(), 1, server_config.per_page, 0)
        }
        Err(ServiceError::Server) => {
            alerts.push(Notice::ServerError.alert());
            Page::new(Vec::new(), 1, server_config.per_page, 0)
        }
        Err(e) => {
            log::error!("Failed to render users page: {e}");
            alerts.push(Notice::FetchError(Entity::User).alert());
            Page::new(Vec::new(), 1, server_config.per_page, 0)
        }
    };

    let mut selected: Option<UserDto> = None;
    if let Selection::Edit(id) | Selection::View(id) = state.selection {
        match UserId::try_from(id) {
            Ok(user_id) => match show_user_service(&user, user_id, backend.get_ref()).await {
                Ok(record) => selected = Some(UserDto::from(&record)),
                Err(ServiceError::Forbidden) => return forbidden(),
                Err(ServiceError::Unauthorized) => return expire_session(identity, &session),
                Err(_) => {
                    alerts.push(Notice::FetchError(Entity::User).alert());
                    state.close();
                    store::store_state(&session, store::USERS_UI, &state);
                }
            },
            Err(_) => {
                state.close();
                store::store_state(&session, store::USERS_UI, &state);
            }
        }
    }

    let modal = match state.selection {
        Selection::None => "none",
        Selection::Create => "create",
        Selection::Edit(_) => "edit",
        Selection::View(_) => "view",
    };
    let form_values = match (&state.draft, &selected) {
        (Some(draft), _) => draft.clone(),
        (None, Some(dto)) if modal == "edit" => serde_json::json!({
            "name": dto.name,
            "email": dto.email,
            "role": dto.role,
            "is_active": dto.is_active,
        }),
        _ => serde_json::json!({
            "name": "",
            "email": "",
            "role": "",
            "is_active": true,
        }),
    };

    let mut context = base_context(&alerts, &user, "users");
    context.insert("table", &dto::users::table(&page, state.submitting));
    context.insert("search", &state.search);
    context.insert("submitting", &state.submitting);
    context.insert("modal", modal);
    context.insert("selected", &selected);
    context.insert("form_values", &form_values);
    context.insert("resource_url", "/users");
    context.insert("entity_label", "user");
    context.insert("fetch_error", &Notice::FetchError(Entity::User).alert());
    render_template(&tera, "users/index.html", &context)
}

/// Search fragment, registered before `/users/{user_id}`.
#[get("/users/table")]
pub async fn users_table(
    user: SessionUser,
    identity: Option<Identity>,
    session: Session,
    params: web::Query<TableParams>,
    backend: web::Data<RestBackend>,
    fetch_state: web::Data<FetchState>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let view = fetch_state.users.scoped(user.id).await;
    let term = match view.debounce_search(params.into_inner().search).await {
        Debounced::Settled(term) => term,
        Debounced::Superseded => return HttpResponse::NoContent().finish(),
    };

    let mut state = store::load_state(&session, store::USERS_UI);
    state.set_search(term);
    store::store_state(&session, store::USERS_UI, &state);

    let key = ListKey::new(state.page, state.search.clone());
    match show_users_service(&user, &view, key, backend.get_ref()).await {
        Ok(page) => {
            let mut context = Context::new();
            context.insert("table", &dto::users::table(&page, state.submitting));
            context.insert("resource_url", "/users");
            context.insert("entity_label", "user");
            render_template(&tera, "shared/table.html", &context)
        }
        Err(ServiceError::Cancelled) => HttpResponse::NoContent().finish(),
        Err(ServiceError::Forbidden) => forbidden(),
        Err(ServiceError::Unauthorized) => expire_session(identity, &session),
        Err(ServiceError::Network) => HttpResponse::BadGateway().finish(),
        Err(e) => {
            log::error!("Failed to refresh users table: {e}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/users/{user_id}")]
pub async fn show_user(
    _user: SessionUser,
    session: Session,
    user_id: web::Path<i32>,
) -> impl Responder {
    let mut state = store::load_state(&session, store::USERS_UI);
    state.open_view(user_id.into_inner());
    store::store_state(&session, store::USERS_UI, &state);
    redirect("/users")
}

#[post("/users")]
pub async fn add_user(
    user: SessionUser,
    identity: Option<Identity>,
    session: Session,
    backend: web::Data<RestBackend>,
    fetch_state: web::Data<FetchState>,
    web::Form(form): web::Form<AddUserForm>,
) -> impl Responder {
    let mut state = store::load_state(&session, store::USERS_UI);
    state.begin_submit();
    store::store_state(&session, store::USERS_UI, &state);
    let draft = draft_values(&form.name, &form.email, &form.role, form.is_active.is_some());

    let payload: AddUserFormPayload = match form.try_into() {
        Ok(payload) => payload,
        Err(e) => {
            Notice::InvalidInput(e.issue()).send();
            state.open_create();
            state.save_draft(draft);
            state.end_submit();
            store::store_state(&session, store::USERS_UI, &state);
            return redirect("/users");
        }
    };

    let view = fetch_state.users.scoped(user.id).await;
    match add_user_service(payload, &user, &view, backend.get_ref()).await {
        Ok(_) => {
            Notice::CreateSuccess(Entity::User).send();
            state.close();
        }
        Err(ServiceError::Forbidden) => return forbidden(),
        Err(ServiceError::Unauthorized) => return expire_session(identity, &session),
        Err(ServiceError::Form(message)) => {
            Notice::InvalidInput(FormIssue::Other(message)).send();
            state.open_create();
            state.save_draft(draft);
        }
        Err(e) => {
            log::error!("Failed to create user: {e}");
            Notice::CreateError(Entity::User).send();
            state.open_create();
            state.save_draft(draft);
        }
    }
    state.end_submit();
    store::store_state(&session, store::USERS_UI, &state);
    redirect("/users")
}

#[post("/users/{user_id}/update")]
pub async fn update_user(
    user: SessionUser,
    identity: Option<Identity>,
    session: Session,
    user_id: web::Path<i32>,
    backend: web::Data<RestBackend>,
    fetch_state: web::Data<FetchState>,
    web::Form(form): web::Form<UpdateUserForm>,
) -> impl Responder {
    let user_id = match UserId::try_from(user_id.into_inner()) {
        Ok(id) => id,
        Err(e) => {
            Notice::InvalidInput(FormIssue::Other(e.to_string())).send();
            return redirect("/users");
        }
    };

    let mut state = store::load_state(&session, store::USERS_UI);
    state.begin_submit();
    store::store_state(&session, store::USERS_UI, &state);
    let draft = draft_values(&form.name, &form.email, &form.role, form.is_active.is_some());

    let payload: UpdateUserFormPayload = match form.try_into() {
        Ok(payload) => payload,
        Err(e) => {
            Notice::InvalidInput(e.issue()).send();
            state.open_edit(user_id.get());
            state.save_draft(draft);
            state.end_submit();
            store::store_state(&session, store::USERS_UI, &state);
            return redirect("/users");
        }
    };

    let view = fetch_state.users.scoped(user.id).await;
    match update_user_service(user_id, payload, &user, &view, backend.get_ref()).await {
        Ok(_) => {
            Notice::UpdateSuccess(Entity::User).send();
            state.close();
        }
        Err(ServiceError::Forbidden) => return forbidden(),
        Err(ServiceError::Unauthorized) => return expire_session(identity, &session),
        Err(ServiceError::NotFound) => {
            Notice::UpdateError(Entity::User).send();
            state.close();
        }
        Err(ServiceError::Form(message)) => {
            Notice::InvalidInput(FormIssue::Other(message)).send();
            state.open_edit(user_id.get());
            state.save_draft(draft);
        }
        Err(e) => {
            log::error!("Failed to update user: {e}");
            Notice::UpdateError(Entity::User).send();
            state.open_edit(user_id.get());
            state.save_draft(draft);
        }
    }
    state.end_submit();
    store::store_state(&session, store::USERS_UI, &state);
    redirect("/users")
}

#[post("/users/{user_id}/delete")]
pub async fn delete_user(
    user: SessionUser,
    identity: Option<Identity>,
    session: Session,
    user_id: web::Path<i32>,
    backend: web::Data<RestBackend>,
    fetch_state: web::Data<FetchState>,
) -> impl Responder {
    let user_id = match UserId::try_from(user_id.into_inner()) {
        Ok(id) => id,
        Err(e) => {
            Notice::InvalidInput(FormIssue::Other(e.to_string())).send();
            return redirect("/users");
        }
    };

    let view = fetch_state.users.scoped(user.id).await;
    match delete_user_service(user_id, &user, &view, backend.get_ref()).await {
        Ok(()) => Notice::DeleteSuccess(Entity::User).send(),
        Err(ServiceError::Forbidden) => return forbidden(),
        Err(ServiceError::Unauthorized) => return expire_session(identity, &session),
        Err(e) => {
            log::error!("Failed to delete user: {e}");
            Notice::DeleteError(Entity::User).send();
        }
    }
    redirect("/users")
}

#[post("/users/{user_id}/restore")]
pub async fn restore_user(
    user: SessionUser,
    identity: Option<Identity>,
    session: Session,
    user_id: web::Path<i32>,
    backend: web::Data<RestBackend>,
    fetch_state: web::Data<FetchState>,
) -> impl Responder {
    let user_id = match UserId::try_from(user_id.into_inner()) {
        Ok(id) => id,
        Err(e) => {
            Notice::InvalidInput(FormIssue::Other(e.to_string())).send();
            return redirect("/users");
        }
    };

    let view = fetch_state.users.scoped(user.id).await;
    match restore_user_service(user_id, &user, &view, backend.get_ref()).await {
        Ok(_) => Notice::RestoreSuccess(Entity::User).send(),
        Err(ServiceError::Forbidden) => return forbidden(),
        Err(ServiceError::Unauthorized) => return expire_session(identity, &session),
        Err(e) => {
            log::error!("Failed to restore user: {e}");
            Notice::RestoreError(Entity::User).send();
        }
    }
    redirect("/users")
}

#[post("/users/{user_id}/toggle")]
pub async fn toggle_user_status(
    user: SessionUser,
    identity: Option<Identity>,
    session: Session,
    user_id: web::Path<i32>,
    backend: web::Data<RestBackend>,
    fetch_state: web::Data<FetchState>,
) -> impl Responder {
    let user_id = match UserId::try_from(user_id.into_inner()) {
        Ok(id) => id,
        Err(e) => {
            Notice::InvalidInput(FormIssue::Other(e.to_string())).send();
            return redirect("/users");
        }
    };

    let view = fetch_state.users.scoped(user.id).await;
    match toggle_user_status_service(user_id, &user, &view, backend.get_ref()).await {
        Ok(User { is_active: true, .. }) => Notice::Activated(Entity::User).send(),
        Ok(_) => Notice::Deactivated(Entity::User).send(),
        Err(ServiceError::Forbidden) => return forbidden(),
        Err(ServiceError::Unauthorized) => return expire_session(identity, &session),
        Err(e) => {
            log::error!("Failed to toggle user status: {e}");
            Notice::StatusChangeError(Entity::User).send();
        }
    }
    redirect("/users")
}

#[post("/users/{user_id}/role")]
pub async fn update_user_role(
    user: SessionUser,
    identity: Option<Identity>,
    session: Session,
    user_id: web::Path<i32>,
    backend: web::Data<RestBackend>,
    fetch_state: web::Data<FetchState>,
    web::Form(form): web::Form<UpdateUserRoleForm>,
) -> impl Responder {
    let user_id = match UserId::try_from(user_id.into_inner()) {
        Ok(id) => id,
        Err(e) => {
            Notice::InvalidInput(FormIssue::Other(e.to_string())).send();
            return redirect("/users");
        }
    };

    let payload: UpdateUserRoleFormPayload = match form.try_into() {
        Ok(payload) => payload,
        Err(e) => {
            Notice::InvalidInput(e.issue()).send();
            return redirect("/users");
        }
    };

    let view = fetch_state.users.scoped(user.id).await;
    match update_user_role_service(user_id, payload, &user, &view, backend.get_ref()).await {
        Ok(_) => Notice::UpdateSuccess(Entity::User).send(),
        Err(ServiceError::Forbidden) => return forbidden(),
        Err(ServiceError::Unauthorized) => return expire_session(identity, &session),
        Err(e) => {
            log::error!("Failed to update user role: {e}");
            Notice::UpdateError(Entity::User).send();
        }
    }
    redirect("/users")
}
