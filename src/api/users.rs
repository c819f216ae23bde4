use crate::api::client::Envelope;
use crate::api::{ApiResult, ListQuery, RestBackend, UserReader, UserWriter};
use crate::domain::page::Page;
use crate::domain::types::{UserId, UserRole};
use crate::domain::user::{NewUser, User, UserUpdate};

#[derive(serde::Serialize)]
struct RolePayload {
    role: UserRole,
}

impl UserReader for RestBackend {
    async fn list_users(&self, token: &str, query: &ListQuery) -> ApiResult<Page<User>> {
        self.client().get_json_query(token, "/users", query).await
    }

    async fn get_user_by_id(&self, token: &str, id: UserId) -> ApiResult<User> {
        let envelope: Envelope<User> =
            self.client().get_json(token, &format!("/users/{id}")).await?;
        Ok(envelope.data)
    }
}

impl UserWriter for RestBackend {
    async fn create_user(&self, token: &str, user: &NewUser) -> ApiResult<User> {
        let envelope: Envelope<User> = self
            .client()
            .post_json(Some(token), "/users", user)
            .await?;
        Ok(envelope.data)
    }

    async fn update_user(&self, token: &str, id: UserId, update: &UserUpdate) -> ApiResult<User> {
        let envelope: Envelope<User> = self
            .client()
            .put_json(token, &format!("/users/{id}"), update)
            .await?;
        Ok(envelope.data)
    }

    async fn delete_user(&self, token: &str, id: UserId) -> ApiResult<()> {
        self.client().delete_unit(token, &format!("/users/{id}")).await
    }

    async fn restore_user(&self, token: &str, id: UserId) -> ApiResult<User> {
        let envelope: Envelope<User> = self
            .client()
            .post_json_empty(token, &format!("/users/{id}/restore"))
            .await?;
        Ok(envelope.data)
    }

    async fn toggle_user_status(&self, token: &str, id: UserId) -> ApiResult<User> {
        let envelope: Envelope<User> = self
            .client()
            .patch_json_empty(token, &format!("/users/{id}/toggle-status"))
            .await?;
        Ok(envelope.data)
    }

    async fn update_user_role(&self, token: &str, id: UserId, role: UserRole) -> ApiResult<User> {
        let envelope: Envelope<User> = self
            .client()
            .patch_json(token, &format!("/users/{id}/role"), &RolePayload { role })
            .await?;
        Ok(envelope.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_payload_serializes_snake_case() {
        let payload = RolePayload {
            role: UserRole::Admin,
        };
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json, serde_json::json!({ "role": "admin" }));
    }

    #[test]
    fn decodes_enveloped_user() {
        let json = serde_json::json!({
            "data": {
                "id": 4,
                "name": "Rina Wijaya",
                "email": "rina@example.com",
                "role": "user",
                "is_active": false,
                "created_at": "2024-02-01T10:00:00Z",
                "updated_at": "2024-02-05T11:00:00Z",
                "deleted_at": null,
            }
        });
        let envelope: Envelope<User> = serde_json::from_value(json).unwrap();
        assert_eq!(envelope.data.id, 4);
        assert_eq!(envelope.data.role, UserRole::User);
        assert!(!envelope.data.is_active);
    }
}
