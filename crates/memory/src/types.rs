use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use toolgate_policy::Role;

/// A user record as exposed to callers. Never carries the password hash.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: u64,
    pub email: String,
    pub name: String,
    pub role: Role,
    pub is_email_verified: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password: String,
    pub name: String,
    pub role: Role,
}

/// Partial update. `None` leaves the field untouched.
#[derive(Debug, Clone, Default)]
pub struct UserUpdate {
    pub email: Option<String>,
    pub password: Option<String>,
    pub name: Option<String>,
}

impl UserUpdate {
    pub fn is_empty(&self) -> bool {
        self.email.is_none() && self.password.is_none() && self.name.is_none()
    }
}

/// Exact-match filter for queries.
#[derive(Debug, Clone, Default)]
pub struct UserFilter {
    pub name: Option<String>,
    pub role: Option<Role>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Id,
    Email,
    Name,
    Role,
    CreatedAt,
    UpdatedAt,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortOrder {
    pub field: SortField,
    pub direction: SortDirection,
}

impl Default for SortOrder {
    fn default() -> Self {
        Self {
            field: SortField::CreatedAt,
            direction: SortDirection::Desc,
        }
    }
}

impl SortOrder {
    /// Parses `field:asc` / `field:desc`. Anything else yields `None` and the
    /// caller falls back to the default order.
    pub fn parse(value: &str) -> Option<Self> {
        let (field, direction) = value.split_once(':')?;
        let field = match field {
            "id" => SortField::Id,
            "email" => SortField::Email,
            "name" => SortField::Name,
            "role" => SortField::Role,
            "createdAt" => SortField::CreatedAt,
            "updatedAt" => SortField::UpdatedAt,
            _ => return None,
        };
        let direction = match direction {
            "asc" => SortDirection::Asc,
            "desc" => SortDirection::Desc,
            _ => return None,
        };
        Some(Self { field, direction })
    }
}

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_LIMIT: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryOptions {
    pub page: u32,
    pub limit: u32,
    pub sort: SortOrder,
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
            sort: SortOrder::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub results: Vec<T>,
    pub page: u32,
    pub limit: u32,
    pub total_pages: u64,
    pub total_results: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_order_parse() {
        assert_eq!(
            SortOrder::parse("name:asc"),
            Some(SortOrder {
                field: SortField::Name,
                direction: SortDirection::Asc
            })
        );
        assert_eq!(SortOrder::parse("name:sideways"), None);
        assert_eq!(SortOrder::parse("password:asc"), None);
        assert_eq!(SortOrder::parse("name"), None);
    }

    #[test]
    fn test_update_is_empty() {
        assert!(UserUpdate::default().is_empty());
        let update = UserUpdate {
            name: Some("x".into()),
            ..Default::default()
        };
        assert!(!update.is_empty());
    }
}
