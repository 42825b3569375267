use crate::error::FretboardError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ─── Pitch classes ──────────────────────────────────────────────────────────

/// One of the twelve equal-tempered pitch classes.
/// Output spelling is always sharps-only; flats are accepted when parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Note {
    C,
    #[serde(rename = "C#")]
    Cs,
    D,
    #[serde(rename = "D#")]
    Ds,
    E,
    F,
    #[serde(rename = "F#")]
    Fs,
    G,
    #[serde(rename = "G#")]
    Gs,
    A,
    #[serde(rename = "A#")]
    As,
    B,
}

/// Chromatic order starting from C. `NOTES[n.index()] == n`.
pub const NOTES: [Note; 12] = [
    Note::C,
    Note::Cs,
    Note::D,
    Note::Ds,
    Note::E,
    Note::F,
    Note::Fs,
    Note::G,
    Note::Gs,
    Note::A,
    Note::As,
    Note::B,
];

impl Note {
    /// Semitones above C (0-11).
    pub fn index(self) -> u8 {
        self as u8
    }

    pub fn from_index(index: u32) -> Self {
        NOTES[(index % 12) as usize]
    }

    /// The pitch class `semitones` above this one, wrapping at the octave.
    pub fn transpose(self, semitones: u32) -> Self {
        Self::from_index(self.index() as u32 + semitones)
    }

    pub fn name(self) -> &'static str {
        match self {
            Note::C => "C",
            Note::Cs => "C#",
            Note::D => "D",
            Note::Ds => "D#",
            Note::E => "E",
            Note::F => "F",
            Note::Fs => "F#",
            Note::G => "G",
            Note::Gs => "G#",
            Note::A => "A",
            Note::As => "A#",
            Note::B => "B",
        }
    }
}

impl fmt::Display for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Note {
    type Err = FretboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let note = match s.trim() {
            "C" | "c" | "B#" | "b#" => Note::C,
            "C#" | "c#" | "Db" | "db" => Note::Cs,
            "D" | "d" => Note::D,
            "D#" | "d#" | "Eb" | "eb" => Note::Ds,
            "E" | "e" | "Fb" | "fb" => Note::E,
            "F" | "f" | "E#" | "e#" => Note::F,
            "F#" | "f#" | "Gb" | "gb" => Note::Fs,
            "G" | "g" => Note::G,
            "G#" | "g#" | "Ab" | "ab" => Note::Gs,
            "A" | "a" => Note::A,
            "A#" | "a#" | "Bb" | "bb" => Note::As,
            "B" | "b" | "Cb" | "cb" => Note::B,
            other => return Err(FretboardError::UnknownNote(other.to_string())),
        };
        Ok(note)
    }
}

// ─── Chord shapes and qualities ─────────────────────────────────────────────

/// The five movable chord forms named after the open chords C, A, G, E, D.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CagedShape {
    C,
    A,
    G,
    E,
    D,
}

/// CAGED order, as the shapes follow each other up the neck.
pub const CAGED_SHAPES: [CagedShape; 5] = [
    CagedShape::C,
    CagedShape::A,
    CagedShape::G,
    CagedShape::E,
    CagedShape::D,
];

impl CagedShape {
    /// String (0 = lowest, six-string layout) carrying the shape's defining root.
    pub fn anchor_string(self) -> usize {
        match self {
            CagedShape::E | CagedShape::G => 0,
            CagedShape::A | CagedShape::C => 1,
            CagedShape::D => 2,
        }
    }

    /// Fret of the anchor-string root in the open chord this shape is named after.
    pub fn open_fret(self) -> u8 {
        match self {
            CagedShape::E | CagedShape::A | CagedShape::D => 0,
            CagedShape::C | CagedShape::G => 3,
        }
    }
}

impl fmt::Display for CagedShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CagedShape::C => "C",
            CagedShape::A => "A",
            CagedShape::G => "G",
            CagedShape::E => "E",
            CagedShape::D => "D",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Quality {
    Major,
    Minor,
}

impl Quality {
    /// Chord-symbol suffix: "" for major, "m" for minor.
    pub fn suffix(self) -> &'static str {
        match self {
            Quality::Major => "",
            Quality::Minor => "m",
        }
    }

    /// Root, third and fifth as semitone offsets.
    pub fn triad(self) -> [u8; 3] {
        match self {
            Quality::Major => [0, 4, 7],
            Quality::Minor => [0, 3, 7],
        }
    }
}

// ─── Voicings ───────────────────────────────────────────────────────────────

/// A concrete chord fingering across every string of an instrument.
///
/// `frets[i] == None` means string `i` is muted. Open strings are `Some(0)`
/// and carry no finger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChordVoicing {
    /// Per string, lowest first.
    pub frets: Vec<Option<u8>>,
    /// Fretting finger 1-4 per string; `None` for open and muted strings.
    pub fingers: Vec<Option<u8>>,
    /// Lowest numeric fret in `frets`, 0 if every string is muted.
    pub base_fret: u8,
    /// Fret pressed by a single finger across two or more strings.
    pub barre: Option<u8>,
    pub shape: CagedShape,
    /// String index carrying the shape's root.
    pub root_string: usize,
    /// Fret of the root on `root_string`.
    pub root_fret: u8,
}

impl ChordVoicing {
    /// Assemble a voicing, deriving `base_fret` and `barre` from the
    /// fret/finger vectors. Fingers on muted or open strings are dropped
    /// and `fingers` is resized to match `frets`.
    pub fn new(
        frets: Vec<Option<u8>>,
        fingers: Vec<Option<u8>>,
        shape: CagedShape,
        root_string: usize,
        root_fret: u8,
    ) -> Self {
        let fingers: Vec<Option<u8>> = frets
            .iter()
            .enumerate()
            .map(|(i, fret)| match fret {
                Some(n) if *n > 0 => fingers.get(i).copied().flatten(),
                _ => None,
            })
            .collect();
        let base_fret = frets.iter().flatten().copied().min().unwrap_or(0);
        let barre = detect_barre(&frets, &fingers);
        Self {
            frets,
            fingers,
            base_fret,
            barre,
            shape,
            root_string,
            root_fret,
        }
    }

    pub fn string_count(&self) -> usize {
        self.frets.len()
    }

    /// Highest fretted position, used to size chord diagrams.
    pub fn top_fret(&self) -> u8 {
        self.frets.iter().flatten().copied().max().unwrap_or(0)
    }
}

/// Find a fret where one finger holds down two or more strings.
/// Finger 1 is checked first since it is the one that normally barres.
pub fn detect_barre(frets: &[Option<u8>], fingers: &[Option<u8>]) -> Option<u8> {
    for finger in 1..=4u8 {
        let mut held: Vec<u8> = frets
            .iter()
            .zip(fingers)
            .filter(|(_, f)| **f == Some(finger))
            .filter_map(|(fret, _)| *fret)
            .collect();
        held.sort_unstable();
        if let Some(pair) = held.windows(2).find(|w| w[0] == w[1]) {
            return Some(pair[0]);
        }
    }
    None
}

impl fmt::Display for ChordVoicing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let frets: Vec<String> = self
            .frets
            .iter()
            .map(|fr| match fr {
                Some(n) => n.to_string(),
                None => "x".to_string(),
            })
            .collect();
        write!(f, "{} shape  [{}]", self.shape, frets.join(" "))?;
        if let Some(b) = self.barre {
            write!(f, "  barre@{}", b)?;
        }
        Ok(())
    }
}

// ─── Catalog entry types ────────────────────────────────────────────────────

/// A fret window relative to the root's first fret on the lowest string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScalePosition {
    pub start: i32,
    pub end: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<&'static str>,
}

impl ScalePosition {
    pub const fn new(start: i32, end: i32) -> Self {
        Self {
            start,
            end,
            name: None,
        }
    }

    pub const fn named(start: i32, end: i32, name: &'static str) -> Self {
        Self {
            start,
            end,
            name: Some(name),
        }
    }
}

/// Named scale: formula, position windows and the CAGED shape that goes
/// with each window.
#[derive(Debug, Serialize)]
pub struct Scale {
    pub key: &'static str,
    pub name: &'static str,
    /// Ascending semitone offsets from the root, always starting at 0.
    pub formula: &'static [u8],
    pub positions: &'static [ScalePosition],
    pub shapes: &'static [CagedShape],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InstrumentType {
    #[serde(rename = "4-string")]
    FourString,
    #[serde(rename = "6-string")]
    SixString,
    #[serde(rename = "7-string")]
    SevenString,
    #[serde(rename = "8-string")]
    EightString,
}

impl InstrumentType {
    pub fn from_string_count(count: usize) -> Option<Self> {
        match count {
            4 => Some(InstrumentType::FourString),
            6 => Some(InstrumentType::SixString),
            7 => Some(InstrumentType::SevenString),
            8 => Some(InstrumentType::EightString),
            _ => None,
        }
    }

    pub fn string_count(self) -> usize {
        match self {
            InstrumentType::FourString => 4,
            InstrumentType::SixString => 6,
            InstrumentType::SevenString => 7,
            InstrumentType::EightString => 8,
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            InstrumentType::FourString => "4-String Bass",
            InstrumentType::SixString => "6-String Guitar",
            InstrumentType::SevenString => "7-String Guitar",
            InstrumentType::EightString => "8-String Guitar",
        }
    }
}

/// Built-in tuning: open-string pitches, lowest string first.
#[derive(Debug, Serialize)]
pub struct TuningConfig {
    pub key: &'static str,
    pub name: &'static str,
    pub notes: &'static [Note],
}

impl TuningConfig {
    pub fn string_count(&self) -> usize {
        self.notes.len()
    }
}

/// User-supplied tuning, read from JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomTuning {
    pub name: String,
    pub notes: Vec<Note>,
}

/// Scale-degree sequence for a chord progression. Degrees are 1-based.
#[derive(Debug, Serialize)]
pub struct ChordProgression {
    pub key: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    /// Used when the governing scale is major-quality.
    pub degrees_major: &'static [usize],
    /// Used when the governing scale is minor-quality.
    pub degrees_minor: &'static [usize],
}

impl ChordProgression {
    pub fn degrees(&self, scale_quality: Quality) -> &'static [usize] {
        match scale_quality {
            Quality::Major => self.degrees_major,
            Quality::Minor => self.degrees_minor,
        }
    }
}
