use crate::api::client::Envelope;
use crate::api::{ApiResult, CategoryReader, CategoryWriter, ListQuery, RestBackend};
use crate::domain::category::{Category, CategoryUpdate, NewCategory};
use crate::domain::page::Page;
use crate::domain::types::CategoryId;

impl CategoryReader for RestBackend {
    async fn list_categories(&self, token: &str, query: &ListQuery) -> ApiResult<Page<Category>> {
        self.client()
            .get_json_query(token, "/categories", query)
            .await
    }

    async fn get_category_by_id(&self, token: &str, id: CategoryId) -> ApiResult<Category> {
        let envelope: Envelope<Category> = self
            .client()
            .get_json(token, &format!("/categories/{id}"))
            .await?;
        Ok(envelope.data)
    }
}

impl CategoryWriter for RestBackend {
    async fn create_category(&self, token: &str, category: &NewCategory) -> ApiResult<Category> {
        let envelope: Envelope<Category> = self
            .client()
            .post_json(Some(token), "/categories", category)
            .await?;
        Ok(envelope.data)
    }

    async fn update_category(
        &self,
        token: &str,
        id: CategoryId,
        update: &CategoryUpdate,
    ) -> ApiResult<Category> {
        let envelope: Envelope<Category> = self
            .client()
            .put_json(token, &format!("/categories/{id}"), update)
            .await?;
        Ok(envelope.data)
    }

    async fn delete_category(&self, token: &str, id: CategoryId) -> ApiResult<()> {
        self.client()
            .delete_unit(token, &format!("/categories/{id}"))
            .await
    }

    async fn restore_category(&self, token: &str, id: CategoryId) -> ApiResult<Category> {
        let envelope: Envelope<Category> = self
            .client()
            .post_json_empty(token, &format!("/categories/{id}/restore"))
            .await?;
        Ok(envelope.data)
    }

    async fn toggle_category_status(&self, token: &str, id: CategoryId) -> ApiResult<Category> {
        let envelope: Envelope<Category> = self
            .client()
            .patch_json_empty(token, &format!("/categories/{id}/toggle-status"))
            .await?;
        Ok(envelope.data)
    }
}

#[cfg(test)]
mod tests {
    use crate::domain::category::Category;
    use crate::domain::page::Page;

    #[test]
    fn decodes_category_paginator_payload() {
        let json = serde_json::json!({
            "data": [{
                "id": 1,
                "name": "Berita",
                "description": "Kategori berita utama",
                "is_active": true,
                "created_at": "2024-01-10T08:00:00Z",
                "updated_at": "2024-01-12T09:30:00Z",
                "deleted_at": null,
            }],
            "current_page": 1,
            "last_page": 3,
            "per_page": 8,
            "total": 17,
            "from": 1,
            "to": 8,
        });
        let page: Page<Category> = serde_json::from_value(json).unwrap();
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].name.as_str(), "Berita");
        assert_eq!(page.total, 17);
    }
}
