use std::future::{Ready, ready};

use actix_identity::Identity;
use actix_session::{Session, SessionExt};
use actix_web::dev::Payload;
use actix_web::http::{StatusCode, header};
use actix_web::{FromRequest, HttpRequest, HttpResponse, ResponseError};
use actix_web_flash_messages::IncomingFlashMessages;
use tera::{Context, Tera};

use crate::domain::auth::SessionUser;
use crate::dto::users::ProfileDto;
use crate::notify::{Alert, Notice, decode_alert};

pub mod auth;
pub mod categories;
pub mod main;
pub mod users;

/// Session key holding the authenticated operator.
pub const SESSION_USER_KEY: &str = "auth:user";
/// Where anonymous requests are sent.
pub const LOGIN_URL: &str = "/auth/login";

pub fn redirect(to: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, to))
        .finish()
}

pub fn render_template(tera: &Tera, template: &str, context: &Context) -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(tera.render(template, context).unwrap_or_else(|e| {
            log::error!("Failed to render template '{template}': {e}");
            String::new()
        }))
}

/// Decodes the flash cookie into the alerts rendered as toasts.
pub fn incoming_alerts(flash_messages: &IncomingFlashMessages) -> Vec<Alert> {
    flash_messages
        .iter()
        .map(|f| decode_alert(f.content(), f.level()))
        .collect()
}

/// Context shared by every signed-in page.
///
/// Flash messages only carry alerts sent on a previous request, so
/// handlers that render directly instead of redirecting push their own
/// alerts into the slice before calling this.
pub fn base_context(alerts: &[Alert], user: &SessionUser, current_page: &str) -> Context {
    let mut context = Context::new();
    context.insert("alerts", alerts);
    context.insert("current_user", &ProfileDto::from(user));
    context.insert("current_page", current_page);
    context
}

/// Context for the pages rendered before sign-in.
pub fn anonymous_context(alerts: &[Alert]) -> Context {
    let mut context = Context::new();
    context.insert("alerts", alerts);
    context
}

/// Tears down the local session after the backend rejected the bearer
/// token, then bounces to the login page.
pub fn expire_session(identity: Option<Identity>, session: &Session) -> HttpResponse {
    if let Some(identity) = identity {
        identity.logout();
    }
    session.purge();
    Notice::SessionExpired.send();
    redirect(LOGIN_URL)
}

/// Rejection answered with a redirect to the login page.
#[derive(Debug)]
pub struct AuthRedirect;

impl std::fmt::Display for AuthRedirect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("authentication required")
    }
}

impl ResponseError for AuthRedirect {
    fn status_code(&self) -> StatusCode {
        StatusCode::SEE_OTHER
    }

    fn error_response(&self) -> HttpResponse {
        redirect(LOGIN_URL)
    }
}

/// Pulls the operator out of the session; anonymous requests bounce to
/// the login page. Handlers taking `Option<SessionUser>` opt out of the
/// bounce.
impl FromRequest for SessionUser {
    type Error = AuthRedirect;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let user = req
            .get_session()
            .get::<SessionUser>(SESSION_USER_KEY)
            .ok()
            .flatten();
        ready(user.ok_or(AuthRedirect))
    }
}
