use crate::error::FretboardError;
use crate::types::*;
use log::warn;

/// Key substituted for unknown scale names.
pub const DEFAULT_SCALE_KEY: &str = "minorPentatonic";

/// Fret count of a full neck.
pub const DEFAULT_FRET_COUNT: u8 = 24;

use CagedShape::{A, C, D, E, G};

// ─── Shape sequences ────────────────────────────────────────────────────────

const MINOR_SHAPES_5: [CagedShape; 5] = [E, D, C, A, G];
const MAJOR_SHAPES_5: [CagedShape; 5] = [C, A, G, E, D];
const MINOR_SHAPES_7: [CagedShape; 7] = [E, D, C, A, G, E, D];
const MAJOR_SHAPES_7: [CagedShape; 7] = [C, A, G, E, D, C, A];

// ─── Position windows ───────────────────────────────────────────────────────

const BOX_POSITIONS: [ScalePosition; 5] = [
    ScalePosition::new(0, 3),
    ScalePosition::new(3, 6),
    ScalePosition::new(5, 8),
    ScalePosition::new(7, 10),
    ScalePosition::new(10, 13),
];

const MAJOR_PENTATONIC_POSITIONS: [ScalePosition; 5] = [
    ScalePosition::new(0, 4),
    ScalePosition::new(2, 5),
    ScalePosition::new(4, 7),
    ScalePosition::new(7, 10),
    ScalePosition::new(9, 12),
];

const MINOR_FORMS: [ScalePosition; 5] = [
    ScalePosition::named(0, 3, "Form 1 (Box)"),
    ScalePosition::named(2, 5, "Form 2"),
    ScalePosition::named(4, 8, "Form 3"),
    ScalePosition::named(7, 10, "Form 4"),
    ScalePosition::named(9, 12, "Form 5"),
];

// Same physical boxes as the minor forms. The major root sits three
// semitones above the relative minor root, so every window starts 3 lower.
const MAJOR_FORMS: [ScalePosition; 5] = [
    ScalePosition::named(-3, 0, "Form 1"),
    ScalePosition::named(-1, 2, "Form 2"),
    ScalePosition::named(1, 5, "Form 3"),
    ScalePosition::named(4, 7, "Form 4"),
    ScalePosition::named(6, 9, "Form 5"),
];

/// Three-notes-per-string windows for seven-note scales, given the start
/// offset of each of the seven positions. Every window spans four frets.
const fn three_nps(starts: [i32; 7]) -> [ScalePosition; 7] {
    [
        ScalePosition::new(starts[0], starts[0] + 4),
        ScalePosition::new(starts[1], starts[1] + 4),
        ScalePosition::new(starts[2], starts[2] + 4),
        ScalePosition::new(starts[3], starts[3] + 4),
        ScalePosition::new(starts[4], starts[4] + 4),
        ScalePosition::new(starts[5], starts[5] + 4),
        ScalePosition::new(starts[6], starts[6] + 4),
    ]
}

const MAJOR_POSITIONS: [ScalePosition; 7] = three_nps([0, 2, 4, 5, 7, 9, 11]);
const MINOR_POSITIONS: [ScalePosition; 7] = three_nps([0, 2, 3, 5, 7, 8, 10]);
const DORIAN_POSITIONS: [ScalePosition; 7] = three_nps([0, 2, 3, 5, 7, 9, 10]);
const PHRYGIAN_POSITIONS: [ScalePosition; 7] = three_nps([0, 1, 3, 5, 7, 8, 10]);
const LYDIAN_POSITIONS: [ScalePosition; 7] = three_nps([0, 2, 4, 6, 7, 9, 11]);
const MIXOLYDIAN_POSITIONS: [ScalePosition; 7] = three_nps([0, 2, 4, 5, 7, 9, 10]);
const LOCRIAN_POSITIONS: [ScalePosition; 7] = three_nps([0, 1, 3, 5, 6, 8, 10]);
const HARMONIC_MINOR_POSITIONS: [ScalePosition; 7] = three_nps([0, 2, 3, 5, 7, 8, 11]);
const MELODIC_MINOR_POSITIONS: [ScalePosition; 7] = three_nps([0, 2, 3, 5, 7, 9, 11]);

// ─── Catalog ────────────────────────────────────────────────────────────────

pub static SCALES: &[Scale] = &[
    Scale {
        key: "major",
        name: "Major",
        formula: &[0, 2, 4, 5, 7, 9, 11],
        positions: &MAJOR_POSITIONS,
        shapes: &MAJOR_SHAPES_7,
    },
    Scale {
        key: "minor",
        name: "Natural Minor",
        formula: &[0, 2, 3, 5, 7, 8, 10],
        positions: &MINOR_POSITIONS,
        shapes: &MINOR_SHAPES_7,
    },
    Scale {
        key: "majorPentatonic",
        name: "Major Pentatonic",
        formula: &[0, 2, 4, 7, 9],
        positions: &MAJOR_PENTATONIC_POSITIONS,
        shapes: &MAJOR_SHAPES_5,
    },
    Scale {
        key: "minorPentatonic",
        name: "Minor Pentatonic",
        formula: &[0, 3, 5, 7, 10],
        positions: &BOX_POSITIONS,
        shapes: &MINOR_SHAPES_5,
    },
    Scale {
        key: "pentatonicForms",
        name: "Minor Pentatonic Forms (Fret Science)",
        formula: &[0, 3, 5, 7, 10],
        positions: &MINOR_FORMS,
        shapes: &MINOR_SHAPES_5,
    },
    Scale {
        key: "pentatonicFormsMajor",
        name: "Major Pentatonic Forms (Fret Science)",
        formula: &[0, 2, 4, 7, 9],
        positions: &MAJOR_FORMS,
        shapes: &MAJOR_SHAPES_5,
    },
    Scale {
        key: "blues",
        name: "Blues",
        formula: &[0, 3, 5, 6, 7, 10],
        positions: &BOX_POSITIONS,
        shapes: &MINOR_SHAPES_5,
    },
    Scale {
        key: "dorian",
        name: "Dorian",
        formula: &[0, 2, 3, 5, 7, 9, 10],
        positions: &DORIAN_POSITIONS,
        shapes: &MINOR_SHAPES_7,
    },
    Scale {
        key: "phrygian",
        name: "Phrygian",
        formula: &[0, 1, 3, 5, 7, 8, 10],
        positions: &PHRYGIAN_POSITIONS,
        shapes: &MINOR_SHAPES_7,
    },
    Scale {
        key: "lydian",
        name: "Lydian",
        formula: &[0, 2, 4, 6, 7, 9, 11],
        positions: &LYDIAN_POSITIONS,
        shapes: &MAJOR_SHAPES_7,
    },
    Scale {
        key: "mixolydian",
        name: "Mixolydian",
        formula: &[0, 2, 4, 5, 7, 9, 10],
        positions: &MIXOLYDIAN_POSITIONS,
        shapes: &MAJOR_SHAPES_7,
    },
    Scale {
        key: "locrian",
        name: "Locrian",
        formula: &[0, 1, 3, 5, 6, 8, 10],
        positions: &LOCRIAN_POSITIONS,
        shapes: &MINOR_SHAPES_7,
    },
    Scale {
        key: "harmonicMinor",
        name: "Harmonic Minor",
        formula: &[0, 2, 3, 5, 7, 8, 11],
        positions: &HARMONIC_MINOR_POSITIONS,
        shapes: &MINOR_SHAPES_7,
    },
    Scale {
        key: "melodicMinor",
        name: "Melodic Minor",
        formula: &[0, 2, 3, 5, 7, 9, 11],
        positions: &MELODIC_MINOR_POSITIONS,
        shapes: &MINOR_SHAPES_7,
    },
];

pub fn find_scale(key: &str) -> Option<&'static Scale> {
    SCALES.iter().find(|s| s.key == key)
}

/// Strict lookup for callers that want to surface typos.
pub fn lookup_scale(key: &str) -> Result<&'static Scale, FretboardError> {
    find_scale(key).ok_or_else(|| FretboardError::UnknownScale(key.to_string()))
}

/// Lenient lookup: unknown keys fall back to minor pentatonic.
pub fn scale(key: &str) -> &'static Scale {
    find_scale(key).unwrap_or_else(|| {
        warn!("Unknown scale {:?}, using {}", key, DEFAULT_SCALE_KEY);
        &SCALES[3]
    })
}

pub fn scale_formula(key: &str) -> &'static [u8] {
    scale(key).formula
}

/// Number of position windows; 5 for unknown scales.
pub fn position_count(key: &str) -> usize {
    find_scale(key).map(|s| s.positions.len()).unwrap_or(5)
}

impl Scale {
    /// Minor if the formula has a minor third, major if it has a major
    /// third, major when it has neither.
    pub fn quality(&self) -> Quality {
        // A major third and an ambiguous formula both read as major.
        if self.formula.contains(&3) {
            Quality::Minor
        } else {
            Quality::Major
        }
    }

    /// R-3-5 of the scale's own quality.
    pub fn chord_intervals(&self) -> [u8; 3] {
        self.quality().triad()
    }

    pub fn position(&self, index: usize) -> Option<&'static ScalePosition> {
        self.positions.get(index)
    }

    /// CAGED shape played at position `index`; E past the end of the sequence.
    pub fn caged_shape(&self, index: usize) -> CagedShape {
        self.shapes.get(index).copied().unwrap_or(E)
    }

    /// Absolute fret window `(start, end)` of position `index` on the lowest
    /// string, before clamping at the nut.
    pub fn window(&self, index: usize, root_fret: u8) -> Option<(i32, i32)> {
        self.position(index)
            .map(|p| (root_fret as i32 + p.start, root_fret as i32 + p.end))
    }

    /// Whether `fret` falls inside position `index`.
    ///
    /// `None` shows the whole neck. An index with no window fails open.
    /// Besides the primary window (clamped at the nut), a window also
    /// matches one octave up when that still fits on the neck, and windows
    /// that start behind the nut wrap around to the twelfth fret.
    pub fn is_in_position(
        &self,
        fret: u8,
        index: Option<usize>,
        root_fret: u8,
        max_fret: u8,
    ) -> bool {
        let Some(index) = index else {
            return fret <= max_fret;
        };
        let Some(pos) = self.position(index) else {
            return true;
        };
        let fret = fret as i32;
        let start = root_fret as i32 + pos.start;
        let end = root_fret as i32 + pos.end;

        if fret >= start.max(0) && fret <= end {
            return true;
        }
        if start + 12 <= max_fret as i32 && fret >= start + 12 && fret <= end + 12 {
            return true;
        }
        if start < 0 && fret >= 12 + start && fret <= 12 + pos.end {
            return true;
        }
        false
    }
}
