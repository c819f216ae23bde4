use crate::api::{ApiError, AuthGateway};
use crate::domain::auth::SessionUser;
use crate::domain::user::User;
use crate::forms::auth::{LoginFormPayload, RegisterFormPayload};

use super::{ServiceError, ServiceResult};

/// Exchanges credentials for a backend session.
///
/// A rejected login surfaces as [`ServiceError::Unauthorized`] without any
/// log noise; everything else is unexpected and logged.
pub async fn login<G>(payload: LoginFormPayload, backend: &G) -> ServiceResult<SessionUser>
where
    G: AuthGateway,
{
    let credentials = payload.into_credentials();
    match backend.login(&credentials).await {
        Ok(session) => Ok(SessionUser::from(session)),
        Err(ApiError::Unauthorized) => Err(ServiceError::Unauthorized),
        Err(e) => {
            log::error!("Failed to sign in: {e}");
            Err(e.into())
        }
    }
}

pub async fn register<G>(payload: RegisterFormPayload, backend: &G) -> ServiceResult<User>
where
    G: AuthGateway,
{
    let registration = payload.into_registration();
    match backend.register(&registration).await {
        Ok(user) => Ok(user),
        Err(e @ ApiError::Validation(_)) => Err(e.into()),
        Err(e) => {
            log::error!("Failed to register account: {e}");
            Err(e.into())
        }
    }
}

/// Revokes the token on the backend. The caller clears the session either way.
pub async fn logout<G>(user: &SessionUser, backend: &G) -> ServiceResult<()>
where
    G: AuthGateway,
{
    match backend.logout(&user.access_token).await {
        Ok(()) => Ok(()),
        Err(e) => {
            log::error!("Failed to sign out: {e}");
            Err(e.into())
        }
    }
}

/// Re-checks the stored token against the backend and returns the fresh
/// account record.
pub async fn validate_session<G>(user: &SessionUser, backend: &G) -> ServiceResult<User>
where
    G: AuthGateway,
{
    match backend.current_user(&user.access_token).await {
        Ok(fresh) => Ok(fresh),
        Err(ApiError::Unauthorized) => Err(ServiceError::Unauthorized),
        Err(e) => {
            log::error!("Failed to validate session: {e}");
            Err(e.into())
        }
    }
}
