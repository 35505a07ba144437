//! Application state: exercise bank, prompts and the optional provider clients.
//!
//! Everything here is read-only after startup, so requests share it through `Arc<AppState>`
//! without any locking.

use tracing::{info, instrument};

use crate::bank::ExerciseBank;
use crate::config::{load_playbook_config_from_env, Prompts};
use crate::openai::OpenAI;
use crate::textgen::TextGenClient;

pub struct AppState {
    pub bank: ExerciseBank,
    pub prompts: Prompts,
    pub textgen: Option<TextGenClient>,
    pub openai: Option<OpenAI>,
}

impl AppState {
    /// Build state from env: load config, build the bank, init provider clients.
    #[instrument(level = "info", skip_all)]
    pub fn from_env() -> Self {
        let cfg = load_playbook_config_from_env().unwrap_or_default();
        let bank = ExerciseBank::with_configured(&cfg.exercises);

        let textgen = TextGenClient::from_env(cfg.generation.clone());
        if let Some(tg) = &textgen {
            info!(target: "skillshare_backend", api_url = %tg.api_url, max_new_tokens = tg.params.max_new_tokens, timeout_secs = tg.params.timeout_secs, "Text generation enabled.");
        } else {
            info!(target: "skillshare_backend", "Text generation disabled (no HF_API_KEY). Using predefined/fallback exercises.");
        }

        let openai = OpenAI::from_env();
        if let Some(oa) = &openai {
            info!(target: "skillshare_backend", base_url = %oa.base_url, model = %oa.model, "OpenAI enabled for open-answer exercises.");
        } else {
            info!(target: "skillshare_backend", "OpenAI disabled (no OPENAI_API_KEY). Using predefined open-answer exercises.");
        }

        Self::from_parts(bank, cfg.prompts, textgen, openai)
    }

    pub fn from_parts(
        bank: ExerciseBank,
        prompts: Prompts,
        textgen: Option<TextGenClient>,
        openai: Option<OpenAI>,
    ) -> Self {
        Self { bank, prompts, textgen, openai }
    }
}
