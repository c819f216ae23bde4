use actix_identity::Identity;
use actix_session::Session;
use actix_web::{HttpMessage, HttpRequest, Responder, get, post, web};
use actix_web_flash_messages::IncomingFlashMessages;
use tera::Tera;

use crate::api::RestBackend;
use crate::domain::auth::SessionUser;
use crate::fetch::FetchState;
use crate::forms::auth::{LoginForm, LoginFormPayload, RegisterForm, RegisterFormPayload};
use crate::notify::Notice;
use crate::routes::{
    LOGIN_URL, SESSION_USER_KEY, anonymous_context, incoming_alerts, redirect, render_template,
};
use crate::services::ServiceError;
use crate::services::auth as auth_service;
use crate::store;

#[get("/auth/login")]
pub async fn show_login(
    user: Option<SessionUser>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    if user.is_some() {
        return redirect("/");
    }
    let alerts = incoming_alerts(&flash_messages);
    render_template(&tera, "auth/login.html", &anonymous_context(&alerts))
}

#[post("/auth/login")]
pub async fn login(
    request: HttpRequest,
    user: Option<SessionUser>,
    session: Session,
    backend: web::Data<RestBackend>,
    web::Form(form): web::Form<LoginForm>,
) -> impl Responder {
    if user.is_some() {
        return redirect("/");
    }

    let payload: LoginFormPayload = match form.try_into() {
        Ok(payload) => payload,
        Err(e) => {
            Notice::InvalidInput(e.issue()).send();
            return redirect(LOGIN_URL);
        }
    };

    match auth_service::login(payload, backend.get_ref()).await {
        Ok(session_user) => {
            if let Err(e) = Identity::login(&request.extensions(), session_user.id.to_string()) {
                log::error!("Failed to establish identity: {e}");
                Notice::LoginError { message: None }.send();
                return redirect(LOGIN_URL);
            }
            if let Err(e) = session.insert(SESSION_USER_KEY, &session_user) {
                log::error!("Failed to persist session user: {e}");
                Notice::LoginError { message: None }.send();
                return redirect(LOGIN_URL);
            }
            session.renew();
            Notice::LoginSuccess {
                username: session_user.name.clone(),
            }
            .send();
            redirect("/")
        }
        Err(ServiceError::Unauthorized) => {
            Notice::LoginError { message: None }.send();
            redirect(LOGIN_URL)
        }
        Err(ServiceError::Form(message)) => {
            Notice::LoginError {
                message: Some(message),
            }
            .send();
            redirect(LOGIN_URL)
        }
        Err(ServiceError::Network) => {
            Notice::NetworkError.send();
            redirect(LOGIN_URL)
        }
        Err(e) => {
            log::error!("Failed to process login: {e}");
            Notice::ServerError.send();
            redirect(LOGIN_URL)
        }
    }
}

#[get("/auth/register")]
pub async fn show_register(
    user: Option<SessionUser>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    if user.is_some() {
        return redirect("/");
    }
    let alerts = incoming_alerts(&flash_messages);
    render_template(&tera, "auth/register.html", &anonymous_context(&alerts))
}

#[post("/auth/register")]
pub async fn register(
    user: Option<SessionUser>,
    backend: web::Data<RestBackend>,
    web::Form(form): web::Form<RegisterForm>,
) -> impl Responder {
    if user.is_some() {
        return redirect("/");
    }

    let payload: RegisterFormPayload = match form.try_into() {
        Ok(payload) => payload,
        Err(e) => {
            Notice::InvalidInput(e.issue()).send();
            return redirect("/auth/register");
        }
    };

    match auth_service::register(payload, backend.get_ref()).await {
        Ok(_) => {
            Notice::RegisterSuccess.send();
            redirect(LOGIN_URL)
        }
        Err(ServiceError::Form(message)) => {
            Notice::RegisterError {
                message: Some(message),
            }
            .send();
            redirect("/auth/register")
        }
        Err(ServiceError::Network) => {
            Notice::NetworkError.send();
            redirect("/auth/register")
        }
        Err(e) => {
            log::error!("Failed to register account: {e}");
            Notice::RegisterError { message: None }.send();
            redirect("/auth/register")
        }
    }
}

#[post("/auth/logout")]
pub async fn logout(
    user: SessionUser,
    identity: Option<Identity>,
    session: Session,
    backend: web::Data<RestBackend>,
    fetch_state: web::Data<FetchState>,
) -> impl Responder {
    // Local state is cleared whether or not the backend revokes the token.
    match auth_service::logout(&user, backend.get_ref()).await {
        Ok(()) => Notice::LogoutSuccess.send(),
        Err(_) => Notice::LogoutError.send(),
    }

    fetch_state.purge_user(user.id).await;
    if let Some(identity) = identity {
        identity.logout();
    }
    store::clear_states(&session);
    session.remove(SESSION_USER_KEY);
    redirect(LOGIN_URL)
}
