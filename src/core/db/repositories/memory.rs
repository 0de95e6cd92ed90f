//! In-memory user store
//!
//! Used when no `DATABASE_URL` is configured and throughout the test suite. Email uniqueness
//! is enforced by claiming the email index entry before the record is inserted.

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use uuid::Uuid;

use crate::core::db::models::{CreateUser, User, UserProfile};
use crate::core::db::store::{UserRepositoryError, UserStore};

#[derive(Default)]
pub struct MemoryUserStore {
    users: DashMap<Uuid, User>,
    /// email -> user id
    emails: DashMap<String, Uuid>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored users
    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn create(&self, user: &CreateUser) -> Result<User, UserRepositoryError> {
        match self.emails.entry(user.email.clone()) {
            Entry::Occupied(_) => Err(UserRepositoryError::EmailAlreadyExists),
            Entry::Vacant(slot) => {
                let now = Utc::now();
                let record = User {
                    id: Uuid::new_v4(),
                    email: user.email.clone(),
                    fullname: user.fullname.clone(),
                    password_hash: user.password_hash.clone(),
                    member: user.member.clone(),
                    created_at: now,
                    updated_at: now,
                };

                self.users.insert(record.id, record.clone());
                slot.insert(record.id);

                Ok(record)
            }
        }
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserRepositoryError> {
        let Some(id) = self.emails.get(email).map(|entry| *entry.value()) else {
            return Ok(None);
        };

        Ok(self.users.get(&id).map(|entry| entry.value().clone()))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<UserProfile>, UserRepositoryError> {
        Ok(self
            .users
            .get(&id)
            .map(|entry| UserProfile::from(entry.value().clone())))
    }
}
