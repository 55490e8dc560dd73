use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PolicyError {
    #[error("Unknown role: {0}")]
    UnknownRole(String),
    #[error("Forbidden: role {role} lacks the {right} right")]
    Forbidden { role: Role, right: Right },
}

/// Account role. Serialized in upper case to match the stored records.
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq, Eq, PartialOrd, Ord, Hash,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    User,
    Admin,
}

/// Named capability granted to roles.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum Right {
    GetUsers,
    ManageUsers,
    GetMcp,
    ManageMcp,
}

const USER_RIGHTS: &[Right] = &[Right::GetMcp];
const ADMIN_RIGHTS: &[Right] = &[
    Right::GetUsers,
    Right::ManageUsers,
    Right::GetMcp,
    Right::ManageMcp,
];

impl Role {
    pub const ALL: [Role; 2] = [Role::User, Role::Admin];

    pub fn rights(self) -> &'static [Right] {
        match self {
            Role::User => USER_RIGHTS,
            Role::Admin => ADMIN_RIGHTS,
        }
    }

    pub fn has_right(self, right: Right) -> bool {
        self.rights().contains(&right)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Role::User => "USER",
            Role::Admin => "ADMIN",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = PolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "USER" => Ok(Role::User),
            "ADMIN" => Ok(Role::Admin),
            _ => Err(PolicyError::UnknownRole(s.to_string())),
        }
    }
}

impl fmt::Display for Right {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Right::GetUsers => "getUsers",
            Right::ManageUsers => "manageUsers",
            Right::GetMcp => "getMcp",
            Right::ManageMcp => "manageMcp",
        };
        f.write_str(name)
    }
}

/// Checks that `role` carries `right`.
pub fn authorize(role: Role, right: Right) -> Result<(), PolicyError> {
    if role.has_right(right) {
        Ok(())
    } else {
        Err(PolicyError::Forbidden { role, right })
    }
}
