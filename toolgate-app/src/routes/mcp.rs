//! `/mcp`: execute, list and reset tools.

use crate::auth::{require, Principal};
use crate::error::ApiError;
use crate::server::AppState;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::{Extension, Json};
use serde::Deserialize;
use toolgate_core::{ExecuteRequest, ExecuteResponse, ResetResponse, ToolList};
use toolgate_policy::Right;

pub async fn execute_tool(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    payload: Result<Json<ExecuteRequest>, JsonRejection>,
) -> Result<Json<ExecuteResponse>, ApiError> {
    require(&principal, Right::ManageMcp)?;
    let Json(request) = payload.map_err(|rejection| ApiError::bad_request(rejection.body_text()))?;
    let response = state.gateway.execute(request).await?;
    Ok(Json(response))
}

pub async fn list_tools(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> Result<Json<ToolList>, ApiError> {
    require(&principal, Right::GetMcp)?;
    Ok(Json(state.gateway.list_tools()))
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetQuery {
    pub session_id: Option<String>,
}

pub async fn reset_tools(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    query: Result<Query<ResetQuery>, QueryRejection>,
) -> Result<Json<ResetResponse>, ApiError> {
    require(&principal, Right::ManageMcp)?;
    let Query(query) = query.map_err(|rejection| ApiError::bad_request(rejection.body_text()))?;
    Ok(Json(state.gateway.reset(query.session_id.as_deref())))
}
