//! User persistence consumed by the user tools.

use crate::types::*;
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHasher, SaltString};
use argon2::Argon2;
use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum UserStoreError {
    #[error("User not found")]
    NotFound,
    #[error("Email already taken")]
    EmailTaken,
    #[error("Password hashing failed: {0}")]
    Hash(String),
}

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn create(&self, user: NewUser) -> Result<User, UserStoreError>;

    async fn query(
        &self,
        filter: UserFilter,
        options: QueryOptions,
    ) -> Result<Page<User>, UserStoreError>;

    async fn get_by_id(&self, id: u64) -> Result<Option<User>, UserStoreError>;

    async fn get_by_email(&self, email: &str) -> Result<Option<User>, UserStoreError>;

    async fn update(&self, id: u64, update: UserUpdate) -> Result<User, UserStoreError>;

    async fn delete(&self, id: u64) -> Result<(), UserStoreError>;
}

struct StoredUser {
    user: User,
    password_hash: String,
}

struct Inner {
    users: BTreeMap<u64, StoredUser>,
    next_id: u64,
}

/// Process-local user table. Ids start at 1 and are never reused.
pub struct InMemoryUserStore {
    inner: RwLock<Inner>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner {
                users: BTreeMap::new(),
                next_id: 1,
            }),
        }
    }

    pub fn len(&self) -> usize {
        self.inner.read().users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[cfg(test)]
    fn password_hash(&self, id: u64) -> Option<String> {
        self.inner
            .read()
            .users
            .get(&id)
            .map(|stored| stored.password_hash.clone())
    }
}

impl Default for InMemoryUserStore {
    fn default() -> Self {
        Self::new()
    }
}

async fn hash_password(password: String) -> Result<String, UserStoreError> {
    tokio::task::spawn_blocking(move || {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| UserStoreError::Hash(e.to_string()))
    })
    .await
    .map_err(|e| UserStoreError::Hash(e.to_string()))?
}

fn compare(a: &User, b: &User, sort: SortOrder) -> Ordering {
    let ordering = match sort.field {
        SortField::Id => a.id.cmp(&b.id),
        SortField::Email => a.email.cmp(&b.email),
        SortField::Name => a.name.cmp(&b.name),
        SortField::Role => a.role.cmp(&b.role),
        SortField::CreatedAt => a.created_at.cmp(&b.created_at),
        SortField::UpdatedAt => a.updated_at.cmp(&b.updated_at),
    };
    let ordering = ordering.then_with(|| a.id.cmp(&b.id));
    match sort.direction {
        SortDirection::Asc => ordering,
        SortDirection::Desc => ordering.reverse(),
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn create(&self, user: NewUser) -> Result<User, UserStoreError> {
        let password_hash = hash_password(user.password).await?;

        let mut inner = self.inner.write();
        if inner.users.values().any(|s| s.user.email == user.email) {
            return Err(UserStoreError::EmailTaken);
        }

        let id = inner.next_id;
        inner.next_id += 1;
        let now = Utc::now();
        let created = User {
            id,
            email: user.email,
            name: user.name,
            role: user.role,
            is_email_verified: false,
            created_at: now,
            updated_at: now,
        };
        inner.users.insert(
            id,
            StoredUser {
                user: created.clone(),
                password_hash,
            },
        );
        tracing::debug!(user_id = id, "Created user");
        Ok(created)
    }

    async fn query(
        &self,
        filter: UserFilter,
        options: QueryOptions,
    ) -> Result<Page<User>, UserStoreError> {
        let page = options.page.max(1);
        let limit = options.limit.max(1);

        let mut matching: Vec<User> = self
            .inner
            .read()
            .users
            .values()
            .map(|stored| &stored.user)
            .filter(|user| filter.name.as_deref().map_or(true, |name| user.name == name))
            .filter(|user| filter.role.map_or(true, |role| user.role == role))
            .cloned()
            .collect();
        matching.sort_by(|a, b| compare(a, b, options.sort));

        let total_results = matching.len() as u64;
        let total_pages = total_results.div_ceil(u64::from(limit));
        let skip = (page as usize - 1).saturating_mul(limit as usize);
        let results = matching.into_iter().skip(skip).take(limit as usize).collect();

        Ok(Page {
            results,
            page,
            limit,
            total_pages,
            total_results,
        })
    }

    async fn get_by_id(&self, id: u64) -> Result<Option<User>, UserStoreError> {
        Ok(self.inner.read().users.get(&id).map(|s| s.user.clone()))
    }

    async fn get_by_email(&self, email: &str) -> Result<Option<User>, UserStoreError> {
        Ok(self
            .inner
            .read()
            .users
            .values()
            .find(|s| s.user.email == email)
            .map(|s| s.user.clone()))
    }

    async fn update(&self, id: u64, update: UserUpdate) -> Result<User, UserStoreError> {
        if !self.inner.read().users.contains_key(&id) {
            return Err(UserStoreError::NotFound);
        }
        let password_hash = match update.password {
            Some(password) => Some(hash_password(password).await?),
            None => None,
        };

        let mut inner = self.inner.write();
        if let Some(email) = &update.email {
            let taken = inner
                .users
                .values()
                .any(|s| s.user.id != id && &s.user.email == email);
            if taken {
                return Err(UserStoreError::EmailTaken);
            }
        }

        let stored = inner.users.get_mut(&id).ok_or(UserStoreError::NotFound)?;
        if let Some(email) = update.email {
            stored.user.email = email;
        }
        if let Some(name) = update.name {
            stored.user.name = name;
        }
        if let Some(hash) = password_hash {
            stored.password_hash = hash;
        }
        stored.user.updated_at = Utc::now();
        Ok(stored.user.clone())
    }

    async fn delete(&self, id: u64) -> Result<(), UserStoreError> {
        self.inner
            .write()
            .users
            .remove(&id)
            .map(|_| ())
            .ok_or(UserStoreError::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use toolgate_policy::Role;

    fn new_user(email: &str, name: &str) -> NewUser {
        NewUser {
            email: email.to_string(),
            password: "password1".to_string(),
            name: name.to_string(),
            role: Role::User,
        }
    }

    #[tokio::test]
    async fn test_create_assigns_ids_and_hashes_password() {
        let store = InMemoryUserStore::new();
        let alice = store.create(new_user("alice@example.com", "Alice")).await.unwrap();
        let bob = store.create(new_user("bob@example.com", "Bob")).await.unwrap();

        assert_eq!(alice.id, 1);
        assert_eq!(bob.id, 2);
        assert!(!alice.is_email_verified);

        let hash = store.password_hash(alice.id).unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(!hash.contains("password1"));
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let store = InMemoryUserStore::new();
        store.create(new_user("a@example.com", "A")).await.unwrap();
        let err = store.create(new_user("a@example.com", "B")).await.unwrap_err();
        assert!(matches!(err, UserStoreError::EmailTaken));
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_query_paginates_and_filters() {
        let store = InMemoryUserStore::new();
        for (email, name) in [
            ("c@example.com", "Carol"),
            ("a@example.com", "Alice"),
            ("b@example.com", "Bob"),
        ] {
            store.create(new_user(email, name)).await.unwrap();
        }

        let options = QueryOptions {
            page: 1,
            limit: 2,
            sort: SortOrder::parse("name:asc").unwrap(),
        };
        let page = store.query(UserFilter::default(), options).await.unwrap();
        assert_eq!(page.total_results, 3);
        assert_eq!(page.total_pages, 2);
        let names: Vec<_> = page.results.iter().map(|u| u.name.as_str()).collect();
        assert_eq!(names, ["Alice", "Bob"]);

        let second = store
            .query(UserFilter::default(), QueryOptions { page: 2, ..options })
            .await
            .unwrap();
        assert_eq!(second.results.len(), 1);
        assert_eq!(second.results[0].name, "Carol");

        let filtered = store
            .query(
                UserFilter {
                    name: Some("Bob".into()),
                    role: None,
                },
                QueryOptions::default(),
            )
            .await
            .unwrap();
        assert_eq!(filtered.total_results, 1);
    }

    #[tokio::test]
    async fn test_default_order_is_newest_first() {
        let store = InMemoryUserStore::new();
        store.create(new_user("1@example.com", "First")).await.unwrap();
        store.create(new_user("2@example.com", "Second")).await.unwrap();

        let page = store
            .query(UserFilter::default(), QueryOptions::default())
            .await
            .unwrap();
        assert_eq!(page.results[0].name, "Second");
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let store = InMemoryUserStore::new();
        let user = store.create(new_user("x@example.com", "X")).await.unwrap();
        store.create(new_user("y@example.com", "Y")).await.unwrap();

        let err = store
            .update(
                user.id,
                UserUpdate {
                    email: Some("y@example.com".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, UserStoreError::EmailTaken));

        let updated = store
            .update(
                user.id,
                UserUpdate {
                    name: Some("Xavier".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.name, "Xavier");
        assert!(updated.updated_at >= user.updated_at);

        store.delete(user.id).await.unwrap();
        assert!(store.get_by_id(user.id).await.unwrap().is_none());
        assert!(matches!(
            store.delete(user.id).await,
            Err(UserStoreError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_update_missing_user() {
        let store = InMemoryUserStore::new();
        let err = store.update(42, UserUpdate::default()).await.unwrap_err();
        assert!(matches!(err, UserStoreError::NotFound));
    }
}
