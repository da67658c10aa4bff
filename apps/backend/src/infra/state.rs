use std::path::PathBuf;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tombola_core::DrawEngine;

use crate::error::AppError;
use crate::infra::seed::SeedFile;
use crate::state::app_state::AppState;

/// Builder for AppState, used by `main` and by tests.
#[derive(Default)]
pub struct StateBuilder {
    seed: Option<SeedFile>,
    seed_file: Option<PathBuf>,
    rng_seed: Option<u64>,
}

impl StateBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load games and cards from an in-memory seed.
    pub fn with_seed(mut self, seed: SeedFile) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Load games and cards from a JSON file at build time.
    pub fn with_seed_file(mut self, path: Option<PathBuf>) -> Self {
        self.seed_file = path;
        self
    }

    /// Make random draws reproducible.
    pub fn with_rng_seed(mut self, seed: u64) -> Self {
        self.rng_seed = Some(seed);
        self
    }

    pub fn build(self) -> Result<AppState, AppError> {
        let engine = match self.rng_seed {
            Some(seed) => DrawEngine::new(StdRng::seed_from_u64(seed)),
            None => DrawEngine::from_os_rng(),
        };
        let state = AppState::new(engine);

        if let Some(path) = &self.seed_file {
            SeedFile::load(path)?.apply(&state)?;
        }
        if let Some(seed) = self.seed {
            seed.apply(&state)?;
        }

        Ok(state)
    }
}

pub fn build_state() -> StateBuilder {
    StateBuilder::new()
}
