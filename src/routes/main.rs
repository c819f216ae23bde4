use actix_identity::Identity;
use actix_session::Session;
use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::IncomingFlashMessages;
use serde::Deserialize;
use tera::Tera;

use crate::api::RestBackend;
use crate::domain::auth::SessionUser;
use crate::dto::users::UserDto;
use crate::forms::FormIssue;
use crate::notify::{Entity, Notice};
use crate::routes::{
    SESSION_USER_KEY, base_context, expire_session, incoming_alerts, redirect, render_template,
};
use crate::services::ServiceError;
use crate::services::main::show_profile as show_profile_service;

#[get("/")]
pub async fn index(
    user: SessionUser,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let alerts = incoming_alerts(&flash_messages);
    let context = base_context(&alerts, &user, "dashboard");
    render_template(&tera, "main/index.html", &context)
}

#[get("/analytics")]
pub async fn analytics(
    user: SessionUser,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let alerts = incoming_alerts(&flash_messages);
    let context = base_context(&alerts, &user, "analytics");
    render_template(&tera, "main/analytics.html", &context)
}

/// Settings revalidates the account against the backend. A role change
/// made by another administrator lands here: the session copy is
/// rewritten and the operator told about the new role.
#[get("/settings")]
pub async fn settings(
    user: SessionUser,
    identity: Option<Identity>,
    session: Session,
    flash_messages: IncomingFlashMessages,
    backend: web::Data<RestBackend>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let mut alerts = incoming_alerts(&flash_messages);

    let mut current = user.clone();
    let mut profile: Option<UserDto> = None;
    match show_profile_service(&user, backend.get_ref()).await {
        Ok(data) => {
            if let Some(role) = data.role_changed {
                current.role = role;
                if let Err(e) = session.insert(SESSION_USER_KEY, &current) {
                    log::error!("Failed to refresh session role: {e}");
                }
                alerts.push(
                    Notice::RoleChanged {
                        role: role.to_string(),
                    }
                    .alert(),
                );
            }
            profile = Some(UserDto::from(&data.user));
        }
        Err(ServiceError::Unauthorized) => return expire_session(identity, &session),
        Err(_) => {
            // Transport trouble falls back to the session copy.
            alerts.push(Notice::NetworkError.alert());
        }
    }

    let mut context = base_context(&alerts, &current, "settings");
    context.insert("profile", &profile);
    render_template(&tera, "main/settings.html", &context)
}

#[get("/toasts")]
pub async fn toasts(
    user: SessionUser,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let alerts = incoming_alerts(&flash_messages);
    let context = base_context(&alerts, &user, "toasts");
    render_template(&tera, "main/toasts.html", &context)
}

#[derive(Debug, Deserialize)]
pub struct DemoToastForm {
    kind: String,
}

/// Demo buttons go through the same flash pipeline as the real flows.
fn sample_notice(kind: &str) -> Option<Notice> {
    let notice = match kind {
        "login_success" => Notice::LoginSuccess {
            username: "John Doe".to_string(),
        },
        "login_error" => Notice::LoginError { message: None },
        "register_success" => Notice::RegisterSuccess,
        "logout_success" => Notice::LogoutSuccess,
        "session_expired" => Notice::SessionExpired,
        "unauthorized" => Notice::Unauthorized,
        "create_success" => Notice::CreateSuccess(Entity::Category),
        "create_error" => Notice::CreateError(Entity::Category),
        "update_success" => Notice::UpdateSuccess(Entity::Category),
        "delete_success" => Notice::DeleteSuccess(Entity::User),
        "restore_success" => Notice::RestoreSuccess(Entity::Category),
        "activated" => Notice::Activated(Entity::Category),
        "deactivated" => Notice::Deactivated(Entity::Category),
        "status_error" => Notice::StatusChangeError(Entity::User),
        "fetch_error" => Notice::FetchError(Entity::Category),
        "network_error" => Notice::NetworkError,
        "server_error" => Notice::ServerError,
        "validation_required" => Notice::InvalidInput(FormIssue::Required { field: "Nama" }),
        "validation_too_short" => Notice::InvalidInput(FormIssue::TooShort {
            field: "Password",
            min: 8,
        }),
        "validation_too_long" => Notice::InvalidInput(FormIssue::TooLong {
            field: "Nama",
            max: 100,
        }),
        "validation_mismatch" => Notice::InvalidInput(FormIssue::Mismatch {
            field: "Konfirmasi Password",
        }),
        "upload_success" => Notice::UploadSuccess {
            file_name: "laporan.xlsx".to_string(),
        },
        "upload_error" => Notice::UploadError {
            file_name: "laporan.xlsx".to_string(),
        },
        "file_too_big" => Notice::FileTooBig {
            max_size: "10MB".to_string(),
        },
        "invalid_file_type" => Notice::InvalidFileType {
            allowed: "PDF, DOCX".to_string(),
        },
        "batch_delete_success" => Notice::BatchDeleteSuccess {
            count: 5,
            entity: Entity::Category,
        },
        "batch_delete_error" => Notice::BatchDeleteError {
            count: 3,
            entity: Entity::User,
        },
        "export_success" => Notice::ExportSuccess {
            entity: Entity::User,
            format: "Excel".to_string(),
        },
        "export_error" => Notice::ExportError(Entity::Category),
        "import_success" => Notice::ImportSuccess {
            count: 25,
            entity: Entity::Category,
        },
        "import_error" => Notice::ImportError { message: None },
        "access_denied" => Notice::AccessDenied {
            resource: "halaman admin".to_string(),
        },
        "role_changed" => Notice::RoleChanged {
            role: "admin".to_string(),
        },
        "permission_granted" => Notice::PermissionGranted {
            permission: "akses edit kategori".to_string(),
        },
        "new_message" => Notice::NewMessage {
            sender: "Admin".to_string(),
        },
        "data_updated" => Notice::DataUpdated(Entity::Category),
        "notification" => Notice::Notification {
            title: "Pemberitahuan Sistem".to_string(),
            message: "Maintenance dijadwalkan pukul 02:00".to_string(),
        },
        _ => return None,
    };
    Some(notice)
}

#[post("/toasts")]
pub async fn demo_toast(_user: SessionUser, web::Form(form): web::Form<DemoToastForm>) -> impl Responder {
    if let Some(notice) = sample_notice(&form.kind) {
        notice.send();
    }
    redirect("/toasts")
}

/// Default service for unmatched paths. Anonymous requests still bounce
/// to the login page through the extractor.
pub async fn not_found(
    user: SessionUser,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let alerts = incoming_alerts(&flash_messages);
    let context = base_context(&alerts, &user, "");
    match tera.render("main/not_found.html", &context) {
        Ok(body) => HttpResponse::NotFound()
            .content_type("text/html; charset=utf-8")
            .body(body),
        Err(e) => {
            log::error!("Failed to render template 'main/not_found.html': {e}");
            HttpResponse::NotFound().finish()
        }
    }
}
