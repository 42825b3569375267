use crate::error::FretboardError;
use crate::types::*;
use log::{info, warn};
use std::fs;
use std::path::Path;

/// E-A-D-G-B-E, lowest string first.
pub const STANDARD_TUNING: [Note; 6] = [Note::E, Note::A, Note::D, Note::G, Note::B, Note::E];

/// Key substituted for unknown tuning names.
pub const DEFAULT_TUNING_KEY: &str = "standard";

use Note::*;

/// Every built-in tuning, grouped by string count.
pub static TUNINGS: &[TuningConfig] = &[
    // 4-string bass
    TuningConfig {
        key: "bassStandard",
        name: "Bass Standard (E-A-D-G)",
        notes: &[E, A, D, G],
    },
    TuningConfig {
        key: "bassDropD",
        name: "Bass Drop D (D-A-D-G)",
        notes: &[D, A, D, G],
    },
    TuningConfig {
        key: "bassDStandard",
        name: "Bass D Standard (D-G-C-F)",
        notes: &[D, G, C, F],
    },
    // 6-string guitar
    TuningConfig {
        key: "standard",
        name: "Standard (E-A-D-G-B-E)",
        notes: &STANDARD_TUNING,
    },
    TuningConfig {
        key: "dropD",
        name: "Drop D (D-A-D-G-B-E)",
        notes: &[D, A, D, G, B, E],
    },
    TuningConfig {
        key: "dStandard",
        name: "D Standard (D-G-C-F-A-D)",
        notes: &[D, G, C, F, A, D],
    },
    TuningConfig {
        key: "dropC",
        name: "Drop C (C-G-C-F-A-D)",
        notes: &[C, G, C, F, A, D],
    },
    TuningConfig {
        key: "openG",
        name: "Open G (D-G-D-G-B-D)",
        notes: &[D, G, D, G, B, D],
    },
    TuningConfig {
        key: "openD",
        name: "Open D (D-A-D-F#-A-D)",
        notes: &[D, A, D, Fs, A, D],
    },
    // 7-string guitar
    TuningConfig {
        key: "standard7",
        name: "7-String Standard (B-E-A-D-G-B-E)",
        notes: &[B, E, A, D, G, B, E],
    },
    TuningConfig {
        key: "dropA7",
        name: "7-String Drop A (A-E-A-D-G-B-E)",
        notes: &[A, E, A, D, G, B, E],
    },
    TuningConfig {
        key: "aStandard7",
        name: "7-String A Standard (A-D-G-C-F-A-D)",
        notes: &[A, D, G, C, F, A, D],
    },
    // 8-string guitar
    TuningConfig {
        key: "standard8",
        name: "8-String Standard (F#-B-E-A-D-G-B-E)",
        notes: &[Fs, B, E, A, D, G, B, E],
    },
    TuningConfig {
        key: "dropE8",
        name: "8-String Drop E (E-B-E-A-D-G-B-E)",
        notes: &[E, B, E, A, D, G, B, E],
    },
    TuningConfig {
        key: "eStandard8",
        name: "8-String E Standard (E-A-D-G-C-F-A-D)",
        notes: &[E, A, D, G, C, F, A, D],
    },
];

pub fn find_tuning(key: &str) -> Option<&'static TuningConfig> {
    TUNINGS.iter().find(|t| t.key == key)
}

/// Strict lookup for callers that want to surface typos.
pub fn lookup_tuning(key: &str) -> Result<&'static TuningConfig, FretboardError> {
    find_tuning(key).ok_or_else(|| FretboardError::UnknownTuning(key.to_string()))
}

/// Lenient lookup: unknown keys fall back to standard tuning.
pub fn tuning(key: &str) -> &'static TuningConfig {
    find_tuning(key).unwrap_or_else(|| {
        warn!("Unknown tuning {:?}, using {}", key, DEFAULT_TUNING_KEY);
        &TUNINGS[3]
    })
}

/// Open-string notes for `key`, with the same fallback as [`tuning`].
pub fn tuning_notes(key: &str) -> &'static [Note] {
    tuning(key).notes
}

pub fn tunings_by_string_count(string_count: usize) -> Vec<&'static TuningConfig> {
    TUNINGS
        .iter()
        .filter(|t| t.string_count() == string_count)
        .collect()
}

/// Tuning key selected when the instrument changes to `string_count` strings.
pub fn default_tuning(string_count: usize) -> &'static str {
    match string_count {
        4 => "bassStandard",
        6 => "standard",
        7 => "standard7",
        8 => "standard8",
        _ => DEFAULT_TUNING_KEY,
    }
}

/// Check a user-supplied tuning before it reaches the voicing engine.
pub fn validate_custom(tuning: &CustomTuning) -> Result<(), FretboardError> {
    match InstrumentType::from_string_count(tuning.notes.len()) {
        Some(_) => Ok(()),
        None => Err(FretboardError::UnsupportedStringCount(tuning.notes.len())),
    }
}

/// Read and validate a tuning file such as
/// `{"name": "DADGAD", "notes": ["D","A","D","G","A","D"]}`.
pub fn load_custom(path: &Path) -> Result<CustomTuning, FretboardError> {
    let text = fs::read_to_string(path)?;
    let tuning: CustomTuning = serde_json::from_str(&text)?;
    validate_custom(&tuning)?;
    info!(
        "Loaded tuning {:?} ({} strings) from {}",
        tuning.name,
        tuning.notes.len(),
        path.display()
    );
    Ok(tuning)
}
