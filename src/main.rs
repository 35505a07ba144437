//! SkillShareHub · Playbook Backend
//!
//! - Axum HTTP API serving practice exercises to the SkillShareHub UI
//! - Multiple choice: predefined match → hosted text generation → generic fallback
//! - Open answer: OpenAI chat completion → predefined → generic fallback
//!
//! Important env variables:
//!   PORT                  : u16 (default 3000)
//!   HF_API_KEY            : enables text generation (alias HUGGINGFACE_API_KEY)
//!   HF_API_URL            : text-generation endpoint (default: hosted Mistral-7B-Instruct)
//!   OPENAI_API_KEY        : enables open-answer generation
//!   OPENAI_BASE_URL       : default "https://api.openai.com/v1"
//!   OPENAI_MODEL          : default "gpt-4o-mini"
//!   PLAYBOOK_CONFIG_PATH  : path to TOML config (prompts, generation params, extra exercises)
//!   LOG_LEVEL             : tracing filter, e.g. "debug" or full directives
//!   LOG_FORMAT            : "pretty" (default) or "json"

mod bank;
mod config;
mod domain;
mod error;
mod logic;
mod matcher;
mod openai;
mod parser;
mod protocol;
mod routes;
mod seeds;
mod state;
mod telemetry;
mod textgen;
mod util;

use std::{net::SocketAddr, sync::Arc};
use tokio::net::TcpListener;
use tracing::info;

use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
  telemetry::init_tracing();

  // Shared read-only state: exercise bank, prompts, provider clients.
  let state = Arc::new(AppState::from_env());

  let app = build_router(state);

  // Read port from env or default to 3000.
  let addr: SocketAddr = std::env::var("PORT")
    .ok()
    .and_then(|p| p.parse::<u16>().ok())
    .map(|port| SocketAddr::from(([0, 0, 0, 0], port)))
    .unwrap_or_else(|| SocketAddr::from(([0, 0, 0, 0], 3000)));

  let listener = TcpListener::bind(addr).await?;
  info!(target: "skillshare_backend", %addr, "HTTP server listening");
  axum::serve(listener, app)
    .with_graceful_shutdown(shutdown_signal())
    .await?;
  info!(target: "skillshare_backend", "HTTP server stopped");
  Ok(())
}

async fn shutdown_signal() {
  if let Err(e) = tokio::signal::ctrl_c().await {
    tracing::error!(target: "skillshare_backend", error = %e, "Failed to listen for shutdown signal");
    std::future::pending::<()>().await;
  }
  info!(target: "skillshare_backend", "Shutdown signal received");
}
