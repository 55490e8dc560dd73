use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Failure raised by a tool function after its input was accepted.
#[derive(Error, Debug)]
pub enum ToolError {
    /// Recognized failure; the message is safe to show to callers.
    #[error("{0}")]
    Execution(String),

    /// Domain error: the referenced record does not exist.
    #[error("{0}")]
    NotFound(String),

    /// Domain error: the request conflicts with existing state.
    #[error("{0}")]
    Conflict(String),

    /// Unrecognized fault. Only ever logged, never shown to callers.
    #[error("internal error: {0}")]
    Internal(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ToolError {
    pub fn execution(message: impl Into<String>) -> Self {
        Self::Execution(message.into())
    }

    pub fn internal<E>(error: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        Self::Internal(error.into())
    }
}

/// One rejected field. `field` is `None` for whole-object problems.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    pub message: String,
}

/// Input rejected by a tool's schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationError {
    pub errors: Vec<FieldError>,
}

impl ValidationError {
    pub fn new(errors: Vec<FieldError>) -> Self {
        Self { errors }
    }

    pub fn message(message: impl Into<String>) -> Self {
        Self::new(vec![FieldError {
            field: None,
            message: message.into(),
        }])
    }

    pub fn field(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(vec![FieldError {
            field: Some(field.into()),
            message: message.into(),
        }])
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.errors.iter().filter_map(|e| e.field.as_deref())
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, error) in self.errors.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            match &error.field {
                Some(field) => write!(f, "{field}: {}", error.message)?,
                None => f.write_str(&error.message)?,
            }
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

impl From<serde_json::Error> for ValidationError {
    fn from(error: serde_json::Error) -> Self {
        // serde reports "missing field `x`" and friends; the location suffix
        // is meaningless for an in-memory value.
        let message = error.to_string();
        let message = match message.find(" at line ") {
            Some(idx) => message[..idx].to_string(),
            None => message,
        };
        Self::message(message)
    }
}

impl From<validator::ValidationErrors> for ValidationError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields: Vec<FieldError> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                let field = field.to_string();
                errs.iter().map(move |e| FieldError {
                    field: (field != "__all__").then(|| field.clone()),
                    message: e
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("failed `{}` check", e.code)),
                })
            })
            .collect();
        fields.sort_by(|a, b| a.field.cmp(&b.field));
        Self::new(fields)
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Duplicate tool id: {0}")]
    DuplicateTool(String),
}
