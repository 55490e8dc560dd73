//! User management tools backed by a [`UserStore`].

use crate::context::ToolContext;
use crate::descriptor::ToolDescriptor;
use crate::error::ToolError;
use crate::traits::Tool;
use async_trait::async_trait;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use toolgate_memory::{
    NewUser, Page, QueryOptions, SortOrder, User, UserFilter, UserStore, UserStoreError,
    UserUpdate, DEFAULT_LIMIT, DEFAULT_PAGE,
};
use toolgate_policy::Role;
use validator::Validate;

/// Every user tool, in the order they are listed to clients.
pub fn user_tools(store: Arc<dyn UserStore>) -> Vec<ToolDescriptor> {
    vec![
        ToolDescriptor::new(GetUserTool::new(Arc::clone(&store))),
        ToolDescriptor::new(FindUserByEmailTool::new(Arc::clone(&store))),
        ToolDescriptor::new(ListUsersTool::new(Arc::clone(&store))),
        ToolDescriptor::new(CreateUserTool::new(Arc::clone(&store))),
        ToolDescriptor::new(UpdateUserTool::new(Arc::clone(&store))),
        ToolDescriptor::new(DeleteUserTool::new(store)),
    ]
}

fn validate_user_id(value: &str) -> Result<(), validator::ValidationError> {
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) || value.parse::<u64>().is_err() {
        return Err(validator::ValidationError::new("user_id"));
    }
    Ok(())
}

fn validate_password(value: &str) -> Result<(), validator::ValidationError> {
    let has_letter = value.chars().any(|c| c.is_ascii_alphabetic());
    let has_digit = value.chars().any(|c| c.is_ascii_digit());
    if value.len() < 8 || !has_letter || !has_digit {
        return Err(validator::ValidationError::new("password"));
    }
    Ok(())
}

fn parse_user_id(value: &str) -> Result<u64, ToolError> {
    value
        .parse()
        .map_err(|_| ToolError::execution("User ID must be a valid number"))
}

fn store_error(error: UserStoreError) -> ToolError {
    match error {
        UserStoreError::NotFound => ToolError::NotFound(error.to_string()),
        UserStoreError::EmailTaken => ToolError::Conflict(error.to_string()),
        UserStoreError::Hash(_) => ToolError::internal(error),
    }
}

#[derive(Debug, Deserialize, JsonSchema, Validate)]
#[serde(deny_unknown_fields)]
#[schemars(description = "Identifies a single user")]
pub struct UserIdInput {
    // Named as on the wire so validation errors report `userId`.
    #[allow(non_snake_case)]
    #[validate(custom(function = "validate_user_id", message = "User ID must be a valid number"))]
    #[schemars(description = "Numeric user id, as a string")]
    pub userId: String,
}

#[derive(Debug, Serialize, JsonSchema)]
pub struct UserLookup {
    pub success: bool,
    pub data: User,
}

pub struct GetUserTool {
    store: Arc<dyn UserStore>,
}

impl GetUserTool {
    pub fn new(store: Arc<dyn UserStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Tool for GetUserTool {
    type Input = UserIdInput;
    type Output = UserLookup;

    fn id(&self) -> &str {
        "user_tool"
    }

    fn name(&self) -> &str {
        "User Tool"
    }

    fn description(&self) -> &str {
        "Fetch a user by id"
    }

    async fn call(&self, _ctx: ToolContext, input: UserIdInput) -> Result<UserLookup, ToolError> {
        let id = parse_user_id(&input.userId)?;
        let user = self
            .store
            .get_by_id(id)
            .await
            .map_err(store_error)?
            .ok_or_else(|| ToolError::NotFound("User not found".into()))?;
        Ok(UserLookup {
            success: true,
            data: user,
        })
    }
}

#[derive(Debug, Deserialize, JsonSchema, Validate)]
#[serde(deny_unknown_fields)]
pub struct EmailInput {
    #[validate(email(message = "must be a valid email"))]
    pub email: String,
}

pub struct FindUserByEmailTool {
    store: Arc<dyn UserStore>,
}

impl FindUserByEmailTool {
    pub fn new(store: Arc<dyn UserStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Tool for FindUserByEmailTool {
    type Input = EmailInput;
    type Output = UserLookup;

    fn id(&self) -> &str {
        "user_by_email"
    }

    fn name(&self) -> &str {
        "Find User By Email"
    }

    fn description(&self) -> &str {
        "Fetch a user by email address"
    }

    async fn call(&self, _ctx: ToolContext, input: EmailInput) -> Result<UserLookup, ToolError> {
        let user = self
            .store
            .get_by_email(&input.email)
            .await
            .map_err(store_error)?
            .ok_or_else(|| ToolError::NotFound("User not found".into()))?;
        Ok(UserLookup {
            success: true,
            data: user,
        })
    }
}

#[derive(Debug, Default, Deserialize, JsonSchema, Validate)]
#[serde(deny_unknown_fields)]
pub struct ListUsersInput {
    /// Exact name match.
    pub name: Option<String>,
    pub role: Option<Role>,
    /// `field:asc` or `field:desc`.
    #[serde(rename = "sortBy")]
    pub sort_by: Option<String>,
    #[validate(range(min = 1, max = 100, message = "must be between 1 and 100"))]
    pub limit: Option<u32>,
    #[validate(range(min = 1, message = "must be at least 1"))]
    pub page: Option<u32>,
}

pub struct ListUsersTool {
    store: Arc<dyn UserStore>,
}

impl ListUsersTool {
    pub fn new(store: Arc<dyn UserStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Tool for ListUsersTool {
    type Input = ListUsersInput;
    type Output = Page<User>;

    fn id(&self) -> &str {
        "user_list"
    }

    fn name(&self) -> &str {
        "List Users"
    }

    fn description(&self) -> &str {
        "Query users with optional filters, sorting and pagination"
    }

    async fn call(&self, _ctx: ToolContext, input: ListUsersInput) -> Result<Page<User>, ToolError> {
        let filter = UserFilter {
            name: input.name,
            role: input.role,
        };
        let options = QueryOptions {
            page: input.page.unwrap_or(DEFAULT_PAGE),
            limit: input.limit.unwrap_or(DEFAULT_LIMIT),
            sort: input
                .sort_by
                .as_deref()
                .and_then(SortOrder::parse)
                .unwrap_or_default(),
        };
        self.store.query(filter, options).await.map_err(store_error)
    }
}

#[derive(Debug, Deserialize, JsonSchema, Validate)]
#[serde(deny_unknown_fields)]
pub struct CreateUserInput {
    #[validate(email(message = "must be a valid email"))]
    pub email: String,
    #[validate(custom(
        function = "validate_password",
        message = "password must be at least 8 characters and contain at least 1 letter and 1 number"
    ))]
    pub password: String,
    #[validate(length(min = 1, message = "must not be empty"))]
    pub name: String,
    pub role: Role,
}

pub struct CreateUserTool {
    store: Arc<dyn UserStore>,
}

impl CreateUserTool {
    pub fn new(store: Arc<dyn UserStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Tool for CreateUserTool {
    type Input = CreateUserInput;
    type Output = User;

    fn id(&self) -> &str {
        "user_create"
    }

    fn name(&self) -> &str {
        "Create User"
    }

    fn description(&self) -> &str {
        "Create a user; the email must not already be registered"
    }

    async fn call(&self, _ctx: ToolContext, input: CreateUserInput) -> Result<User, ToolError> {
        self.store
            .create(NewUser {
                email: input.email,
                password: input.password,
                name: input.name,
                role: input.role,
            })
            .await
            .map_err(store_error)
    }
}

fn require_update(input: &UpdateUserInput) -> Result<(), validator::ValidationError> {
    if input.email.is_none() && input.password.is_none() && input.name.is_none() {
        let mut error = validator::ValidationError::new("require_update");
        error.message = Some("at least one of email, password or name is required".into());
        return Err(error);
    }
    Ok(())
}

#[derive(Debug, Deserialize, JsonSchema, Validate)]
#[serde(deny_unknown_fields)]
#[validate(schema(function = "require_update", skip_on_field_errors = false))]
pub struct UpdateUserInput {
    #[allow(non_snake_case)]
    #[validate(custom(function = "validate_user_id", message = "User ID must be a valid number"))]
    pub userId: String,
    #[validate(email(message = "must be a valid email"))]
    pub email: Option<String>,
    #[validate(custom(
        function = "validate_password",
        message = "password must be at least 8 characters and contain at least 1 letter and 1 number"
    ))]
    pub password: Option<String>,
    #[validate(length(min = 1, message = "must not be empty"))]
    pub name: Option<String>,
}

pub struct UpdateUserTool {
    store: Arc<dyn UserStore>,
}

impl UpdateUserTool {
    pub fn new(store: Arc<dyn UserStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Tool for UpdateUserTool {
    type Input = UpdateUserInput;
    type Output = User;

    fn id(&self) -> &str {
        "user_update"
    }

    fn name(&self) -> &str {
        "Update User"
    }

    fn description(&self) -> &str {
        "Update a user's email, password or name"
    }

    async fn call(&self, _ctx: ToolContext, input: UpdateUserInput) -> Result<User, ToolError> {
        let id = parse_user_id(&input.userId)?;
        let update = UserUpdate {
            email: input.email,
            password: input.password,
            name: input.name,
        };
        self.store.update(id, update).await.map_err(store_error)
    }
}

#[derive(Debug, Serialize, JsonSchema)]
pub struct Deleted {
    pub success: bool,
}

pub struct DeleteUserTool {
    store: Arc<dyn UserStore>,
}

impl DeleteUserTool {
    pub fn new(store: Arc<dyn UserStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Tool for DeleteUserTool {
    type Input = UserIdInput;
    type Output = Deleted;

    fn id(&self) -> &str {
        "user_delete"
    }

    fn name(&self) -> &str {
        "Delete User"
    }

    fn description(&self) -> &str {
        "Delete a user by id"
    }

    async fn call(&self, _ctx: ToolContext, input: UserIdInput) -> Result<Deleted, ToolError> {
        let id = parse_user_id(&input.userId)?;
        self.store.delete(id).await.map_err(store_error)?;
        Ok(Deleted { success: true })
    }
}
