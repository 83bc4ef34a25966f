use thiserror::Error;

use crate::backend::PersistenceError;
use crate::engine::EngineError;

/// Unified application error.
///
/// Every layer the binary touches (config, engine, storage) fails
/// through one of these variants.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Config error: {0}")]
    Config(String),

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}
