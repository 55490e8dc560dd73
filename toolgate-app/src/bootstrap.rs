use crate::auth::ApiKeys;
use crate::config::Config;
use crate::server::AppState;
use anyhow::{Context, Result};
use std::sync::Arc;
use toolgate_core::Gateway;
use toolgate_memory::{InMemoryUserStore, NewUser, SessionStateStore, UserStore};
use toolgate_policy::Role;
use toolgate_tools::{user_tools, ToolRegistry};

/// Assembles the store, registry and gateway described by `config`.
pub async fn build_state(config: &Config) -> Result<AppState> {
    let store: Arc<dyn UserStore> = Arc::new(InMemoryUserStore::new());
    seed_admin(config, store.as_ref()).await?;

    let mut registry = ToolRegistry::new();
    registry
        .register(user_tools(Arc::clone(&store)))
        .context("Failed to register user tools")?;
    tracing::info!(tools = ?registry.ids(), "Tool registry ready");

    let gateway = Gateway::new(
        Arc::new(registry),
        Arc::new(SessionStateStore::new()),
        config.request_timeout(),
    );

    let keys = ApiKeys::new(&config.auth.api_keys);
    if keys.is_empty() {
        tracing::warn!("No API keys configured; every /mcp request will be rejected");
    }

    Ok(AppState::new(Arc::new(gateway), keys))
}

async fn seed_admin(config: &Config, store: &dyn UserStore) -> Result<()> {
    let Some(admin) = &config.seed.admin else {
        return Ok(());
    };
    if store.get_by_email(&admin.email).await?.is_some() {
        return Ok(());
    }
    let user = store
        .create(NewUser {
            email: admin.email.clone(),
            password: admin.password.clone(),
            name: admin.name.clone(),
            role: Role::Admin,
        })
        .await
        .context("Failed to seed admin user")?;
    tracing::info!(user_id = user.id, email = %user.email, "Seeded admin user");
    Ok(())
}
