use thiserror::Error;

/// Errors from the fallible edges of the crate: parsing user input,
/// strict catalog lookups and custom tuning files. The voicing engine
/// itself never fails; it substitutes defaults or returns `None`.
#[derive(Error, Debug)]
pub enum FretboardError {
    #[error("unknown note name: {0:?}")]
    UnknownNote(String),

    #[error("unknown scale: {0:?}")]
    UnknownScale(String),

    #[error("unknown tuning: {0:?}")]
    UnknownTuning(String),

    #[error("unknown progression: {0:?}")]
    UnknownProgression(String),

    /// Position numbers on the command line are 1-based.
    #[error("position {position} out of range for {scale} (1-{count})")]
    PositionOutOfRange {
        scale: String,
        position: usize,
        count: usize,
    },

    #[error("unsupported string count {0} (expected 4, 6, 7 or 8)")]
    UnsupportedStringCount(usize),

    #[error("read tuning file: {0}")]
    Io(#[from] std::io::Error),

    #[error("parse tuning file: {0}")]
    Json(#[from] serde_json::Error),
}
