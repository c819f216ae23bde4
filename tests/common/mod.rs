//! Helpers for integration tests.
//!
//! [`StubBackend`] stands in for the remote REST API: mutations change the
//! stored records so follow-up fetches observe them, and the list counters
//! make cache hits and misses visible to the flow tests.

#![allow(dead_code)]

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use chrono::{TimeZone, Utc};

use backoffice::api::{
    ApiError, ApiResult, AuthGateway, CategoryReader, CategoryWriter, ListQuery, UserReader,
    UserWriter,
};
use backoffice::domain::auth::{AuthSession, Credentials, Registration, SessionUser};
use backoffice::domain::category::{Category, CategoryUpdate, NewCategory};
use backoffice::domain::page::{DEFAULT_ITEMS_PER_PAGE, Page};
use backoffice::domain::types::{CategoryId, CategoryName, Email, UserId, UserName, UserRole};
use backoffice::domain::user::{NewUser, User, UserUpdate};

pub const PASSWORD: &str = "rahasia123";
pub const TOKEN: &str = "stub-token";

pub fn category(id: i32, name: &str) -> Category {
    let at = Utc.with_ymd_and_hms(2024, 1, 15, 10, 0, 0).unwrap();
    Category {
        id: CategoryId::new(id).expect("valid category id"),
        name: CategoryName::new(name.to_string()).expect("valid category name"),
        description: None,
        is_active: true,
        created_at: at,
        updated_at: at,
        deleted_at: None,
    }
}

pub fn categories(count: usize) -> Vec<Category> {
    (1..=count)
        .map(|i| category(i as i32, &format!("Kategori {i:02}")))
        .collect()
}

pub fn user_record(id: i32, name: &str, email: &str, role: UserRole) -> User {
    let at = Utc.with_ymd_and_hms(2024, 1, 15, 10, 0, 0).unwrap();
    User {
        id: UserId::new(id).expect("valid user id"),
        name: UserName::new(name.to_string()).expect("valid user name"),
        email: Email::new(email.to_string()).expect("valid email"),
        role,
        is_active: true,
        created_at: at,
        updated_at: at,
        deleted_at: None,
    }
}

pub fn admin_session() -> SessionUser {
    SessionUser {
        id: 1,
        name: "Admin".to_string(),
        email: "admin@example.com".to_string(),
        role: UserRole::Admin,
        access_token: TOKEN.to_string(),
    }
}

pub fn operator_session() -> SessionUser {
    SessionUser {
        id: 2,
        name: "Budi".to_string(),
        email: "budi@example.com".to_string(),
        role: UserRole::User,
        access_token: TOKEN.to_string(),
    }
}

#[derive(Default)]
pub struct StubBackend {
    categories: Mutex<Vec<Category>>,
    users: Mutex<Vec<User>>,
    current_user: Mutex<Option<User>>,
    fail_with: Mutex<Option<ApiError>>,
    category_lists: AtomicUsize,
    user_lists: AtomicUsize,
}

impl StubBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_categories(self, records: Vec<Category>) -> Self {
        *self.categories.lock().unwrap() = records;
        self
    }

    pub fn with_users(self, records: Vec<User>) -> Self {
        *self.users.lock().unwrap() = records;
        self
    }

    pub fn with_current_user(self, record: User) -> Self {
        *self.current_user.lock().unwrap() = Some(record);
        self
    }

    /// Make every following call fail; `None` restores normal behavior.
    pub fn set_failure(&self, error: Option<ApiError>) {
        *self.fail_with.lock().unwrap() = error;
    }

    /// How many category listings hit this backend.
    pub fn category_list_count(&self) -> usize {
        self.category_lists.load(Ordering::SeqCst)
    }

    /// How many user listings hit this backend.
    pub fn user_list_count(&self) -> usize {
        self.user_lists.load(Ordering::SeqCst)
    }

    fn check(&self) -> ApiResult<()> {
        match &*self.fail_with.lock().unwrap() {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }

    fn paginate<T: Clone>(items: Vec<T>, page: usize) -> Page<T> {
        let total = items.len();
        let slice = items
            .into_iter()
            .skip((page - 1) * DEFAULT_ITEMS_PER_PAGE)
            .take(DEFAULT_ITEMS_PER_PAGE)
            .collect();
        Page::new(slice, page, DEFAULT_ITEMS_PER_PAGE, total)
    }
}

impl CategoryReader for StubBackend {
    async fn list_categories(&self, _token: &str, query: &ListQuery) -> ApiResult<Page<Category>> {
        self.check()?;
        self.category_lists.fetch_add(1, Ordering::SeqCst);
        let mut items = self.categories.lock().unwrap().clone();
        if let Some(search) = &query.search {
            let needle = search.to_lowercase();
            items.retain(|c| c.name.as_str().to_lowercase().contains(&needle));
        }
        Ok(Self::paginate(items, query.page.unwrap_or(1)))
    }

    async fn get_category_by_id(&self, _token: &str, id: CategoryId) -> ApiResult<Category> {
        self.check()?;
        self.categories
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.id == id)
            .cloned()
            .ok_or(ApiError::NotFound)
    }
}

impl CategoryWriter for StubBackend {
    async fn create_category(&self, _token: &str, category: &NewCategory) -> ApiResult<Category> {
        self.check()?;
        let mut records = self.categories.lock().unwrap();
        let id = records.iter().map(|c| c.id.get()).max().unwrap_or(0) + 1;
        let now = Utc::now();
        let created = Category {
            id: CategoryId::new(id).expect("generated id is positive"),
            name: category.name.clone(),
            description: category.description.clone(),
            is_active: category.is_active,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        records.push(created.clone());
        Ok(created)
    }

    async fn update_category(
        &self,
        _token: &str,
        id: CategoryId,
        update: &CategoryUpdate,
    ) -> ApiResult<Category> {
        self.check()?;
        let mut records = self.categories.lock().unwrap();
        let record = records
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or(ApiError::NotFound)?;
        record.name = update.name.clone();
        record.description = update.description.clone();
        record.is_active = update.is_active;
        record.updated_at = Utc::now();
        Ok(record.clone())
    }

    async fn delete_category(&self, _token: &str, id: CategoryId) -> ApiResult<()> {
        self.check()?;
        let mut records = self.categories.lock().unwrap();
        let before = records.len();
        records.retain(|c| c.id != id);
        if records.len() == before {
            return Err(ApiError::NotFound);
        }
        Ok(())
    }

    async fn restore_category(&self, _token: &str, id: CategoryId) -> ApiResult<Category> {
        self.check()?;
        let mut records = self.categories.lock().unwrap();
        let record = records
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or(ApiError::NotFound)?;
        record.deleted_at = None;
        Ok(record.clone())
    }

    async fn toggle_category_status(&self, _token: &str, id: CategoryId) -> ApiResult<Category> {
        self.check()?;
        let mut records = self.categories.lock().unwrap();
        let record = records
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or(ApiError::NotFound)?;
        record.is_active = !record.is_active;
        record.updated_at = Utc::now();
        Ok(record.clone())
    }
}

impl UserReader for StubBackend {
    async fn list_users(&self, _token: &str, query: &ListQuery) -> ApiResult<Page<User>> {
        self.check()?;
        self.user_lists.fetch_add(1, Ordering::SeqCst);
        let mut items = self.users.lock().unwrap().clone();
        if let Some(search) = &query.search {
            let needle = search.to_lowercase();
            items.retain(|u| {
                u.name.as_str().to_lowercase().contains(&needle)
                    || u.email.as_str().to_lowercase().contains(&needle)
            });
        }
        Ok(Self::paginate(items, query.page.unwrap_or(1)))
    }

    async fn get_user_by_id(&self, _token: &str, id: UserId) -> ApiResult<User> {
        self.check()?;
        self.users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.id == id)
            .cloned()
            .ok_or(ApiError::NotFound)
    }
}

impl UserWriter for StubBackend {
    async fn create_user(&self, _token: &str, user: &NewUser) -> ApiResult<User> {
        self.check()?;
        let mut records = self.users.lock().unwrap();
        let id = records.iter().map(|u| u.id.get()).max().unwrap_or(0) + 1;
        let now = Utc::now();
        let created = User {
            id: UserId::new(id).expect("generated id is positive"),
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role,
            is_active: user.is_active,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        records.push(created.clone());
        Ok(created)
    }

    async fn update_user(&self, _token: &str, id: UserId, update: &UserUpdate) -> ApiResult<User> {
        self.check()?;
        let mut records = self.users.lock().unwrap();
        let record = records
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or(ApiError::NotFound)?;
        record.name = update.name.clone();
        record.email = update.email.clone();
        record.role = update.role;
        record.is_active = update.is_active;
        record.updated_at = Utc::now();
        Ok(record.clone())
    }

    async fn delete_user(&self, _token: &str, id: UserId) -> ApiResult<()> {
        self.check()?;
        let mut records = self.users.lock().unwrap();
        let before = records.len();
        records.retain(|u| u.id != id);
        if records.len() == before {
            return Err(ApiError::NotFound);
        }
        Ok(())
    }

    async fn restore_user(&self, _token: &str, id: UserId) -> ApiResult<User> {
        self.check()?;
        let mut records = self.users.lock().unwrap();
        let record = records
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or(ApiError::NotFound)?;
        record.deleted_at = None;
        Ok(record.clone())
    }

    async fn toggle_user_status(&self, _token: &str, id: UserId) -> ApiResult<User> {
        self.check()?;
        let mut records = self.users.lock().unwrap();
        let record = records
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or(ApiError::NotFound)?;
        record.is_active = !record.is_active;
        record.updated_at = Utc::now();
        Ok(record.clone())
    }

    async fn update_user_role(&self, _token: &str, id: UserId, role: UserRole) -> ApiResult<User> {
        self.check()?;
        let mut records = self.users.lock().unwrap();
        let record = records
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or(ApiError::NotFound)?;
        record.role = role;
        record.updated_at = Utc::now();
        Ok(record.clone())
    }
}

impl AuthGateway for StubBackend {
    async fn login(&self, credentials: &Credentials) -> ApiResult<AuthSession> {
        self.check()?;
        if credentials.password != PASSWORD {
            return Err(ApiError::Unauthorized);
        }
        let user = self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.email.as_str() == credentials.email)
            .cloned()
            .ok_or(ApiError::Unauthorized)?;
        Ok(AuthSession {
            access_token: TOKEN.to_string(),
            user,
        })
    }

    async fn register(&self, registration: &Registration) -> ApiResult<User> {
        self.check()?;
        let exists = self
            .users
            .lock()
            .unwrap()
            .iter()
            .any(|u| u.email.as_str() == registration.email);
        if exists {
            return Err(ApiError::Validation("Email sudah terdaftar".to_string()));
        }
        let new_user = NewUser {
            name: UserName::new(registration.name.clone())
                .map_err(|e| ApiError::Validation(e.to_string()))?,
            email: Email::new(registration.email.clone())
                .map_err(|e| ApiError::Validation(e.to_string()))?,
            role: UserRole::User,
            is_active: true,
            password: registration.password.clone(),
        };
        self.create_user("", &new_user).await
    }

    async fn logout(&self, _token: &str) -> ApiResult<()> {
        self.check()?;
        Ok(())
    }

    async fn current_user(&self, _token: &str) -> ApiResult<User> {
        self.check()?;
        self.current_user
            .lock()
            .unwrap()
            .clone()
            .ok_or(ApiError::Unauthorized)
    }
}
