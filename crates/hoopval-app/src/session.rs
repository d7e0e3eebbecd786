// Session: one load of the datasets plus the model used to value them.
//
// Loading never panics or retries. A failed load is kept as
// `LoadState::Failed` so the caller can show it once and move on.

use hoopval_core::config::{Config, ModelConfig};
use hoopval_core::{
    compare, merge_canonical, value_player, Assumptions, Comparison, PlayerDirectory, PlayerRecord,
    ValuationResult,
};
use tracing::{error, info};

use crate::ingest::{self, IngestError};

#[derive(Debug)]
pub enum LoadState {
    Ready(PlayerDirectory),
    Failed(String),
}

impl LoadState {
    pub fn is_ready(&self) -> bool {
        matches!(self, LoadState::Ready(_))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("player data failed to load: {0}")]
    NotLoaded(String),

    #[error("no player matches '{0}'")]
    PlayerNotFound(String),
}

pub struct Session {
    config: Config,
    state: LoadState,
}

impl Session {
    /// Load both datasets and merge them into a directory.
    pub async fn load(config: Config) -> Self {
        let state = Self::load_state(&config).await;
        Session { config, state }
    }

    /// Build a ready session from records that are already merged.
    pub fn from_players(config: Config, players: Vec<PlayerRecord>) -> Self {
        Session {
            config,
            state: LoadState::Ready(PlayerDirectory::new(players)),
        }
    }

    /// Discard the current directory and load everything again.
    pub async fn reload(&mut self) {
        self.state = Self::load_state(&self.config).await;
    }

    async fn load_state(config: &Config) -> LoadState {
        match Self::load_players(config).await {
            Ok(players) => {
                info!("Session ready with {} players", players.len());
                LoadState::Ready(PlayerDirectory::new(players))
            }
            Err(e) => {
                error!("Failed to load player data: {}", e);
                LoadState::Failed(e.to_string())
            }
        }
    }

    async fn load_players(config: &Config) -> Result<Vec<PlayerRecord>, IngestError> {
        let datasets = ingest::load_datasets(&config.data_paths).await?;
        Ok(merge_canonical(&datasets.performance, &datasets.salaries))
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    pub fn model(&self) -> &ModelConfig {
        &self.config.model
    }

    pub fn directory(&self) -> Result<&PlayerDirectory, SessionError> {
        match &self.state {
            LoadState::Ready(directory) => Ok(directory),
            LoadState::Failed(message) => Err(SessionError::NotLoaded(message.clone())),
        }
    }

    /// Resolve free text (id or name) to a player.
    pub fn find(&self, query: &str) -> Result<&PlayerRecord, SessionError> {
        self.directory()?
            .resolve(query)
            .ok_or_else(|| SessionError::PlayerNotFound(query.to_string()))
    }

    pub fn value(&self, player: &PlayerRecord, assumptions: &Assumptions) -> ValuationResult {
        value_player(&self.config.model, player, assumptions)
    }

    pub fn compare(
        &self,
        left: &PlayerRecord,
        right: &PlayerRecord,
        assumptions: &Assumptions,
    ) -> Comparison {
        compare(&self.config.model, left, right, assumptions)
    }
}
