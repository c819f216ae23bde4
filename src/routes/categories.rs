use actix_identity::Identity;
use actix_session::Session;
use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::IncomingFlashMessages;
use serde::Deserialize;
use tera::{Context, Tera};

use crate::api::RestBackend;
use crate::domain::auth::SessionUser;
use crate::domain::category::Category;
use crate::domain::page::Page;
use crate::domain::types::CategoryId;
use crate::dto;
use crate::dto::categories::CategoryDto;
use crate::fetch::{Debounced, FetchState, ListKey};
use crate::forms::FormIssue;
use crate::forms::categories::{
    AddCategoryForm, AddCategoryFormPayload, UpdateCategoryForm, UpdateCategoryFormPayload,
};
use crate::models::config::ServerConfig;
use crate::notify::{Entity, Notice};
use crate::routes::{base_context, expire_session, incoming_alerts, redirect, render_template};
use crate::services::ServiceError;
use crate::services::categories::{
    add_category as add_category_service, delete_category as delete_category_service,
    restore_category as restore_category_service, show_categories as show_categories_service,
    show_category as show_category_service,
    toggle_category_status as toggle_category_status_service,
    update_category as update_category_service,
};
use crate::store::{self, Selection};

#[derive(Debug, Deserialize)]
struct ListingParams {
    page: Option<usize>,
    /// `create`, `edit`, `view` or `close`.
    modal: Option<String>,
    id: Option<i32>,
}

#[derive(Debug, Deserialize)]
struct TableParams {
    #[serde(default)]
    search: String,
}

fn draft_values(form: &AddCategoryForm) -> serde_json::Value {
    serde_json::json!({
        "name": form.name,
        "description": form.description,
        "is_active": form.is_active.is_some(),
    })
}

fn update_draft_values(form: &UpdateCategoryForm) -> serde_json::Value {
    serde_json::json!({
        "name": form.name,
        "description": form.description,
        "is_active": form.is_active.is_some(),
    })
}

#[get("/categories")]
pub async fn show_categories(
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
    let mut state = store::load_state(&session, store::CATEGORIES_UI);
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
    store::store_state(&session, store::CATEGORIES_UI, &state);

    let mut alerts = incoming_alerts(&flash_messages);

    let view = fetch_state.categories.scoped(user.id).await;
    let key = ListKey::new(state.page, state.search.clone());
    let page = match show_categories_service(&user, &view, key, backend.get_ref()).await {
        Ok(page) => page,
        Err(ServiceError::Cancelled) => return redirect("/categories"),
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
            log::error!("Failed to render categories page: {e}");
            alerts.push(Notice::FetchError(Entity::Category).alert());
            Page::new(Vec::new(), 1, server_config.per_page, 0)
        }
    };

    // The open modal needs its record; losing it closes the modal instead
    // of rendering stale fields.
    let mut selected: Option<CategoryDto> = None;
    if let Selection::Edit(id) | Selection::View(id) = state.selection {
        match CategoryId::try_from(id) {
            Ok(category_id) => {
                match show_category_service(&user, category_id, backend.get_ref()).await {
                    Ok(category) => selected = Some(CategoryDto::from(&category)),
                    Err(ServiceError::Unauthorized) => {
                        return expire_session(identity, &session);
                    }
                    Err(_) => {
                        alerts.push(Notice::FetchError(Entity::Category).alert());
                        state.close();
                        store::store_state(&session, store::CATEGORIES_UI, &state);
                    }
                }
            }
            Err(_) => {
                state.close();
                store::store_state(&session, store::CATEGORIES_UI, &state);
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
            "description": dto.description,
            "is_active": dto.is_active,
        }),
        _ => serde_json::json!({
            "name": "",
            "description": "",
            "is_active": true,
        }),
    };

    let mut context = base_context(&alerts, &user, "categories");
    context.insert("table", &dto::categories::table(&page, state.submitting));
    context.insert("search", &state.search);
    context.insert("submitting", &state.submitting);
    context.insert("modal", modal);
    context.insert("selected", &selected);
    context.insert("form_values", &form_values);
    context.insert("resource_url", "/categories");
    context.insert("entity_label", "kategori");
    context.insert("fetch_error", &Notice::FetchError(Entity::Category).alert());
    render_template(&tera, "categories/index.html", &context)
}

/// Search fragment polled by the listing page on every keystroke.
///
/// Registered before `/categories/{category_id}` so the literal segment
/// wins. Superseded and cancelled requests answer 204 and the client
/// keeps whatever table it already shows.
#[get("/categories/table")]
pub async fn categories_table(
    user: SessionUser,
    identity: Option<Identity>,
    session: Session,
    params: web::Query<TableParams>,
    backend: web::Data<RestBackend>,
    fetch_state: web::Data<FetchState>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let view = fetch_state.categories.scoped(user.id).await;
    let term = match view.debounce_search(params.into_inner().search).await {
        Debounced::Settled(term) => term,
        Debounced::Superseded => return HttpResponse::NoContent().finish(),
    };

    let mut state = store::load_state(&session, store::CATEGORIES_UI);
    state.set_search(term);
    store::store_state(&session, store::CATEGORIES_UI, &state);

    let key = ListKey::new(state.page, state.search.clone());
    match show_categories_service(&user, &view, key, backend.get_ref()).await {
        Ok(page) => {
            let mut context = Context::new();
            context.insert("table", &dto::categories::table(&page, state.submitting));
            context.insert("resource_url", "/categories");
            context.insert("entity_label", "kategori");
            render_template(&tera, "shared/table.html", &context)
        }
        Err(ServiceError::Cancelled) => HttpResponse::NoContent().finish(),
        Err(ServiceError::Unauthorized) => expire_session(identity, &session),
        Err(ServiceError::Network) => HttpResponse::BadGateway().finish(),
        Err(e) => {
            log::error!("Failed to refresh categories table: {e}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/categories/{category_id}")]
pub async fn show_category(
    _user: SessionUser,
    session: Session,
    category_id: web::Path<i32>,
) -> impl Responder {
    let mut state = store::load_state(&session, store::CATEGORIES_UI);
    state.open_view(category_id.into_inner());
    store::store_state(&session, store::CATEGORIES_UI, &state);
    redirect("/categories")
}

#[post("/categories")]
pub async fn add_category(
    user: SessionUser,
    identity: Option<Identity>,
    session: Session,
    backend: web::Data<RestBackend>,
    fetch_state: web::Data<FetchState>,
    web::Form(form): web::Form<AddCategoryForm>,
) -> impl Responder {
    let mut state = store::load_state(&session, store::CATEGORIES_UI);
    state.begin_submit();
    store::store_state(&session, store::CATEGORIES_UI, &state);
    let draft = draft_values(&form);

    let payload: AddCategoryFormPayload = match form.try_into() {
        Ok(payload) => payload,
        Err(e) => {
            Notice::InvalidInput(e.issue()).send();
            state.open_create();
            state.save_draft(draft);
            state.end_submit();
            store::store_state(&session, store::CATEGORIES_UI, &state);
            return redirect("/categories");
        }
    };

    let view = fetch_state.categories.scoped(user.id).await;
    match add_category_service(payload, &user, &view, backend.get_ref()).await {
        Ok(_) => {
            Notice::CreateSuccess(Entity::Category).send();
            state.close();
        }
        Err(ServiceError::Unauthorized) => return expire_session(identity, &session),
        Err(ServiceError::Form(message)) => {
            Notice::InvalidInput(FormIssue::Other(message)).send();
            state.open_create();
            state.save_draft(draft);
        }
        Err(e) => {
            log::error!("Failed to create category: {e}");
            Notice::CreateError(Entity::Category).send();
            state.open_create();
            state.save_draft(draft);
        }
    }
    state.end_submit();
    store::store_state(&session, store::CATEGORIES_UI, &state);
    redirect("/categories")
}

#[post("/categories/{category_id}/update")]
pub async fn update_category(
    user: SessionUser,
    identity: Option<Identity>,
    session: Session,
    category_id: web::Path<i32>,
    backend: web::Data<RestBackend>,
    fetch_state: web::Data<FetchState>,
    web::Form(form): web::Form<UpdateCategoryForm>,
) -> impl Responder {
    let category_id = match CategoryId::try_from(category_id.into_inner()) {
        Ok(id) => id,
        Err(e) => {
            Notice::InvalidInput(FormIssue::Other(e.to_string())).send();
            return redirect("/categories");
        }
    };

    let mut state = store::load_state(&session, store::CATEGORIES_UI);
    state.begin_submit();
    store::store_state(&session, store::CATEGORIES_UI, &state);
    let draft = update_draft_values(&form);

    let payload: UpdateCategoryFormPayload = match form.try_into() {
        Ok(payload) => payload,
        Err(e) => {
            Notice::InvalidInput(e.issue()).send();
            state.open_edit(category_id.get());
            state.save_draft(draft);
            state.end_submit();
            store::store_state(&session, store::CATEGORIES_UI, &state);
            return redirect("/categories");
        }
    };

    let view = fetch_state.categories.scoped(user.id).await;
    match update_category_service(category_id, payload, &user, &view, backend.get_ref()).await {
        Ok(_) => {
            Notice::UpdateSuccess(Entity::Category).send();
            state.close();
        }
        Err(ServiceError::Unauthorized) => return expire_session(identity, &session),
        Err(ServiceError::NotFound) => {
            Notice::UpdateError(Entity::Category).send();
            state.close();
        }
        Err(ServiceError::Form(message)) => {
            Notice::InvalidInput(FormIssue::Other(message)).send();
            state.open_edit(category_id.get());
            state.save_draft(draft);
        }
        Err(e) => {
            log::error!("Failed to update category: {e}");
            Notice::UpdateError(Entity::Category).send();
            state.open_edit(category_id.get());
            state.save_draft(draft);
        }
    }
    state.end_submit();
    store::store_state(&session, store::CATEGORIES_UI, &state);
    redirect("/categories")
}

#[post("/categories/{category_id}/delete")]
pub async fn delete_category(
    user: SessionUser,
    identity: Option<Identity>,
    session: Session,
    category_id: web::Path<i32>,
    backend: web::Data<RestBackend>,
    fetch_state: web::Data<FetchState>,
) -> impl Responder {
    let category_id = match CategoryId::try_from(category_id.into_inner()) {
        Ok(id) => id,
        Err(e) => {
            Notice::InvalidInput(FormIssue::Other(e.to_string())).send();
            return redirect("/categories");
        }
    };

    let view = fetch_state.categories.scoped(user.id).await;
    match delete_category_service(category_id, &user, &view, backend.get_ref()).await {
        Ok(()) => Notice::DeleteSuccess(Entity::Category).send(),
        Err(ServiceError::Unauthorized) => return expire_session(identity, &session),
        Err(e) => {
            log::error!("Failed to delete category: {e}");
            Notice::DeleteError(Entity::Category).send();
        }
    }
    redirect("/categories")
}

#[post("/categories/{category_id}/restore")]
pub async fn restore_category(
    user: SessionUser,
    identity: Option<Identity>,
    session: Session,
    category_id: web::Path<i32>,
    backend: web::Data<RestBackend>,
    fetch_state: web::Data<FetchState>,
) -> impl Responder {
    let category_id = match CategoryId::try_from(category_id.into_inner()) {
        Ok(id) => id,
        Err(e) => {
            Notice::InvalidInput(FormIssue::Other(e.to_string())).send();
            return redirect("/categories");
        }
    };

    let view = fetch_state.categories.scoped(user.id).await;
    match restore_category_service(category_id, &user, &view, backend.get_ref()).await {
        Ok(_) => Notice::RestoreSuccess(Entity::Category).send(),
        Err(ServiceError::Unauthorized) => return expire_session(identity, &session),
        Err(e) => {
            log::error!("Failed to restore category: {e}");
            Notice::RestoreError(Entity::Category).send();
        }
    }
    redirect("/categories")
}

#[post("/categories/{category_id}/toggle")]
pub async fn toggle_category_status(
    user: SessionUser,
    identity: Option<Identity>,
    session: Session,
    category_id: web::Path<i32>,
    backend: web::Data<RestBackend>,
    fetch_state: web::Data<FetchState>,
) -> impl Responder {
    let category_id = match CategoryId::try_from(category_id.into_inner()) {
        Ok(id) => id,
        Err(e) => {
            Notice::InvalidInput(FormIssue::Other(e.to_string())).send();
            return redirect("/categories");
        }
    };

    let view = fetch_state.categories.scoped(user.id).await;
    match toggle_category_status_service(category_id, &user, &view, backend.get_ref()).await {
        Ok(Category { is_active: true, .. }) => Notice::Activated(Entity::Category).send(),
        Ok(_) => Notice::Deactivated(Entity::Category).send(),
        Err(ServiceError::Unauthorized) => return expire_session(identity, &session),
        Err(e) => {
            log::error!("Failed to toggle category status: {e}");
            Notice::StatusChangeError(Entity::Category).send();
        }
    }
    redirect("/categories")
}
