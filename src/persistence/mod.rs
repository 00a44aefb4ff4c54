//! Save slot and score ledger persistence
//!
//! Both stores are best-effort: every failure surfaces as a recoverable
//! error value, gameplay continues unaffected, and nothing here is
//! fatal to the process.

pub mod ledger;
pub mod save;

pub use ledger::{Ledger, ScoreRecord};
pub use save::{SaveData, SaveSlot};

use thiserror::Error;

/// Persistence failure taxonomy
#[derive(Debug, Error)]
pub enum PersistError {
    /// Load requested with no prior save
    #[error("no save data")]
    NoSaveData,
    /// Malformed or truncated save record; the load aborts and the
    /// simulation state is untouched
    #[error("corrupt save data: {0}")]
    CorruptSaveData(&'static str),
    /// Read/write failure on a slot or ledger file
    #[error("i/o fault: {0}")]
    Io(#[from] std::io::Error),
    /// Best-record query against an empty ledger
    #[error("no score records")]
    NoRecords,
}
