use crate::api::client::Envelope;
use crate::api::{ApiResult, AuthGateway, RestBackend};
use crate::domain::auth::{AuthSession, Credentials, Registration};
use crate::domain::user::User;

/// Login response of the backend. Unknown fields such as `token_type` and
/// `expires_in` are ignored; session lifetime is governed by the cookie.
#[derive(Debug, serde::Deserialize)]
struct LoginResponse {
    data: LoginData,
}

#[derive(Debug, serde::Deserialize)]
struct LoginData {
    access_token: String,
    user: User,
}

impl AuthGateway for RestBackend {
    async fn login(&self, credentials: &Credentials) -> ApiResult<AuthSession> {
        let response: LoginResponse = self
            .client()
            .post_json(None, "/auth/login", credentials)
            .await?;
        Ok(AuthSession {
            access_token: response.data.access_token,
            user: response.data.user,
        })
    }

    async fn register(&self, registration: &Registration) -> ApiResult<User> {
        let envelope: Envelope<User> = self
            .client()
            .post_json(None, "/auth/register", registration)
            .await?;
        Ok(envelope.data)
    }

    async fn logout(&self, token: &str) -> ApiResult<()> {
        self.client().post_unit(token, "/auth/logout").await
    }

    async fn current_user(&self, token: &str) -> ApiResult<User> {
        let envelope: Envelope<User> = self.client().get_json(token, "/auth/user").await?;
        Ok(envelope.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::UserRole;

    #[test]
    fn decodes_login_response_ignoring_extras() {
        let json = serde_json::json!({
            "success": true,
            "message": "Login berhasil",
            "data": {
                "access_token": "token-abc",
                "token_type": "Bearer",
                "expires_in": 3600,
                "user": {
                    "id": 1,
                    "name": "Admin Utama",
                    "email": "admin@example.com",
                    "role": "admin",
                    "is_active": true,
                    "created_at": "2024-01-01T00:00:00Z",
                    "updated_at": "2024-01-01T00:00:00Z",
                    "deleted_at": null,
                }
            }
        });
        let response: LoginResponse = serde_json::from_value(json).unwrap();
        assert_eq!(response.data.access_token, "token-abc");
        assert_eq!(response.data.user.role, UserRole::Admin);
    }
}
