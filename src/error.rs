use std::path::PathBuf;
use thiserror::Error;

use crate::pins::PinError;

#[derive(Error, Debug)]
pub enum TempMonError {
    #[error("Cannot open configuration file {path:?}: {source}")]
    ConfigUnreadable {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid configuration: {0}")]
    ConfigInvalid(String),

    #[error("No conditions supplied in '{0}'")]
    EmptyRuleSet(String),

    #[error("Cannot initialize output interface: {0}")]
    OutputInit(#[source] PinError),

    #[error("Cannot install signal handlers: {0}")]
    SignalSetup(#[source] std::io::Error),
}

impl TempMonError {
    /// Process exit status reported for a fatal startup error.
    pub fn exit_code(&self) -> u8 {
        match self {
            TempMonError::ConfigUnreadable { .. } | TempMonError::ConfigInvalid(_) => 1,
            TempMonError::EmptyRuleSet(_) => 2,
            TempMonError::OutputInit(_) => 3,
            TempMonError::SignalSetup(_) => 4,
        }
    }
}

pub type Result<T> = std::result::Result<T, TempMonError>;
