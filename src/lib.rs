//! CAGED chord voicings, scale positions and progressions on fretted
//! instruments with 4, 6, 7 or 8 strings.

pub mod diagram;
pub mod error;
pub mod fretboard;
pub mod pitch;
pub mod progressions;
pub mod scales;
pub mod selector;
pub mod tunings;
pub mod types;
pub mod voicings;

pub use error::FretboardError;
pub use fretboard::FretboardState;
pub use selector::{select_voicing_for_position, select_voicing_for_progression_step};
pub use types::{CagedShape, ChordVoicing, Note, Quality};
