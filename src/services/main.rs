use crate::api::{ApiError, AuthGateway};
use crate::domain::auth::SessionUser;
use crate::domain::types::UserRole;
use crate::domain::user::User;

use super::{ServiceError, ServiceResult};

/// Data backing the settings profile card.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileData {
    /// Account record as the backend currently sees it.
    pub user: User,
    /// Set when the backend role no longer matches the session role.
    pub role_changed: Option<UserRole>,
}

/// Fetches the operator's fresh account record for the settings page.
///
/// Only a rejected token ends the session. A backend that is briefly
/// unreachable must not log the operator out, so transport failures are
/// reported and the route falls back to the session copy.
pub async fn show_profile<G>(user: &SessionUser, backend: &G) -> ServiceResult<ProfileData>
where
    G: AuthGateway,
{
    match backend.current_user(&user.access_token).await {
        Ok(fresh) => {
            let role_changed = (fresh.role != user.role).then_some(fresh.role);
            Ok(ProfileData {
                user: fresh,
                role_changed,
            })
        }
        Err(ApiError::Unauthorized) => Err(ServiceError::Unauthorized),
        Err(e) => {
            log::error!("Failed to refresh account record: {e}");
            Err(e.into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::test::TestBackend;
    use crate::domain::types::{Email, UserId, UserName};
    use chrono::{TimeZone, Utc};

    fn backend_user(role: UserRole) -> User {
        let created = Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap();
        User {
            id: UserId::new(7).unwrap(),
            name: UserName::new("Admin Utama").unwrap(),
            email: Email::new("admin@example.com").unwrap(),
            role,
            is_active: true,
            created_at: created,
            updated_at: created,
            deleted_at: None,
        }
    }

    fn session_user(role: UserRole) -> SessionUser {
        SessionUser {
            id: 7,
            name: "Admin Utama".to_string(),
            email: "admin@example.com".to_string(),
            role,
            access_token: "test-token".to_string(),
        }
    }

    #[tokio::test]
    async fn profile_reports_role_change() {
        let backend = TestBackend::new().with_current_user(backend_user(UserRole::User));

        let data = show_profile(&session_user(UserRole::Admin), &backend)
            .await
            .unwrap();
        assert_eq!(data.role_changed, Some(UserRole::User));
    }

    #[tokio::test]
    async fn unchanged_role_stays_quiet() {
        let backend = TestBackend::new().with_current_user(backend_user(UserRole::Admin));

        let data = show_profile(&session_user(UserRole::Admin), &backend)
            .await
            .unwrap();
        assert_eq!(data.role_changed, None);
    }

    #[tokio::test]
    async fn rejected_token_ends_the_session() {
        let backend = TestBackend::new();

        let err = show_profile(&session_user(UserRole::Admin), &backend)
            .await
            .unwrap_err();
        assert_eq!(err, ServiceError::Unauthorized);
    }
}
