//! Safepath server wiring: configuration, restart recovery and the top-level
//! router. The binary in `main.rs` only adds logging and the listener.

use std::{path::PathBuf, sync::Arc};

use axum::{Json, Router, extract::State, routing::get};
use safepath_api::{ApiState, DEFAULT_ALERT_LIMIT, api_router};
use safepath_core::{
  manager::ZoneManager,
  repository::Repository,
  store::ZoneStore,
  zone::AuthorityId,
};
use serde::Deserialize;
use serde_json::{Value, json};
use tower_http::trace::TraceLayer;

// ─── Configuration ───────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `SAFEPATH_*` environment variables. Every field has a default.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
  pub host:                String,
  pub port:                u16,
  pub store_path:          PathBuf,
  /// Authorities allowed to deactivate any zone.
  pub super_authorities:   Vec<String>,
  /// Alerts returned by `GET /api/alerts` without a `limit`.
  pub alert_history_limit: usize,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:                "127.0.0.1".to_string(),
      port:                3001,
      store_path:          PathBuf::from("safepath.db"),
      super_authorities:   Vec::new(),
      alert_history_limit: DEFAULT_ALERT_LIMIT,
    }
  }
}

// ─── State ───────────────────────────────────────────────────────────────────

/// Build the API state over `repo`, restoring every persisted zone into a
/// fresh zone store first.
pub async fn build_state<R>(repo: Arc<R>, config: &ServerConfig) -> Result<ApiState<R>, R::Error>
where
  R: Repository,
{
  let manager = ZoneManager::new(Arc::new(ZoneStore::new()))
    .with_super_authorities(config.super_authorities.iter().map(AuthorityId::new));

  let persisted = repo.load_zones().await?;
  let found = persisted.len();
  let restored = manager.restore(persisted);
  let active = manager.store().list_active(None).len();
  tracing::info!(found, restored, active, "zones restored");

  Ok(ApiState::new(repo, manager).with_alert_history_limit(config.alert_history_limit))
}

// ─── Router ──────────────────────────────────────────────────────────────────

/// `/health` plus the API nested under `/api`, with request tracing.
pub fn router<R>(state: ApiState<R>) -> Router
where
  R: Repository + 'static,
{
  Router::new()
    .route("/health", get(health::<R>))
    .with_state(state.clone())
    .nest("/api", api_router(state))
    .layer(TraceLayer::new_for_http())
}

/// `GET /health`
async fn health<R>(State(state): State<ApiState<R>>) -> Json<Value>
where
  R: Repository + 'static,
{
  let active_zones = state.store().snapshot().active().count();
  Json(json!({ "status": "ok", "activeZones": active_zones }))
}
