use crate::error::FretboardError;
use crate::scales::scale;
use crate::types::*;

/// Common progressions. Degrees are the same in both roles; the chord
/// quality for each degree comes from [`chord_quality_for_degree`].
pub static PROGRESSIONS: &[ChordProgression] = &[
    ChordProgression {
        key: "1-4-5",
        name: "I-IV-V",
        description: "Classic rock and blues progression",
        degrees_major: &[1, 4, 5],
        degrees_minor: &[1, 4, 5],
    },
    ChordProgression {
        key: "1-5-6-4",
        name: "I-V-vi-IV",
        description: "Popular pop progression",
        degrees_major: &[1, 5, 6, 4],
        degrees_minor: &[1, 5, 6, 4],
    },
    ChordProgression {
        key: "6-4-1-5",
        name: "vi-IV-I-V",
        description: "Emotional/sad progression",
        degrees_major: &[6, 4, 1, 5],
        degrees_minor: &[6, 4, 1, 5],
    },
    ChordProgression {
        key: "2-5-1",
        name: "ii-V-I",
        description: "Jazz turnaround",
        degrees_major: &[2, 5, 1],
        degrees_minor: &[2, 5, 1],
    },
    ChordProgression {
        key: "1-6-4-5",
        name: "I-vi-IV-V",
        description: "50s doo-wop progression",
        degrees_major: &[1, 6, 4, 5],
        degrees_minor: &[1, 6, 4, 5],
    },
    ChordProgression {
        key: "1-4-1-5",
        name: "I-IV-I-V",
        description: "Simple blues progression",
        degrees_major: &[1, 4, 1, 5],
        degrees_minor: &[1, 4, 1, 5],
    },
];

pub fn find_progression(key: &str) -> Option<&'static ChordProgression> {
    PROGRESSIONS.iter().find(|p| p.key == key)
}

pub fn lookup_progression(key: &str) -> Result<&'static ChordProgression, FretboardError> {
    find_progression(key).ok_or_else(|| FretboardError::UnknownProgression(key.to_string()))
}

/// Root of the chord built on `degree` (1-based) of the scale.
/// Degrees outside the formula fall back to the scale root.
pub fn chord_root_for_degree(root: Note, formula: &[u8], degree: usize) -> Note {
    match degree.checked_sub(1).and_then(|i| formula.get(i)) {
        Some(&offset) => root.transpose(offset as u32),
        None => root,
    }
}

/// Quality of the chord on `degree` under a scale of `scale_quality`.
///
/// Major keys: I, IV, V major; ii, iii, vi, vii minor.
/// Minor keys: i, iv, v minor; III, VI, VII major.
/// Diminished chords are treated as minor.
pub fn chord_quality_for_degree(scale_quality: Quality, degree: usize) -> Quality {
    let minor = match scale_quality {
        Quality::Major => matches!(degree, 2 | 3 | 6 | 7),
        Quality::Minor => matches!(degree, 1 | 4 | 5),
    };
    if minor {
        Quality::Minor
    } else {
        Quality::Major
    }
}

/// One resolved step of a progression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct ProgressionStep {
    pub degree: usize,
    pub root: Note,
    pub quality: Quality,
}

impl ProgressionStep {
    /// Chord symbol, e.g. "Am" or "F".
    pub fn name(&self) -> String {
        format!("{}{}", self.root, self.quality.suffix())
    }
}

/// Resolve the chord at `position` of a progression in the key of
/// `root`/`scale_key`. The progression loops when the scale has more
/// positions than the progression has steps.
pub fn resolve_step(
    root: Note,
    scale_key: &str,
    position: usize,
    progression: &ChordProgression,
) -> Option<ProgressionStep> {
    resolve_step_in(root, scale(scale_key), position, progression)
}

/// [`resolve_step`] against an already resolved scale.
pub fn resolve_step_in(
    root: Note,
    scale: &Scale,
    position: usize,
    progression: &ChordProgression,
) -> Option<ProgressionStep> {
    let scale_quality = scale.quality();
    let degrees = progression.degrees(scale_quality);
    if degrees.is_empty() {
        return None;
    }
    let degree = degrees[position % degrees.len()];
    Some(ProgressionStep {
        degree,
        root: chord_root_for_degree(root, scale.formula, degree),
        quality: chord_quality_for_degree(scale_quality, degree),
    })
}

/// Chord symbol for `position` of the named progression; empty when the
/// progression is unknown.
pub fn progression_chord_name(
    root: Note,
    scale_key: &str,
    position: usize,
    progression_key: &str,
) -> String {
    find_progression(progression_key)
        .and_then(|p| resolve_step(root, scale_key, position, p))
        .map(|step| step.name())
        .unwrap_or_default()
}

/// Label for the fixed-shape chord at `position`, e.g. "Am (E shape)".
pub fn chord_name_for_position(root: Note, scale_key: &str, position: usize) -> String {
    let scale = scale(scale_key);
    format!(
        "{}{} ({} shape)",
        root,
        scale.quality().suffix(),
        scale.caged_shape(position)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_four_five_in_a_minor_pentatonic() {
        assert_eq!(progression_chord_name(Note::A, "minorPentatonic", 0, "1-4-5"), "Am");
        // Degree 4 of a five-note formula is the fifth (E).
        assert_eq!(progression_chord_name(Note::A, "minorPentatonic", 1, "1-4-5"), "Em");
    }

    #[test]
    fn test_one_four_five_in_c_major() {
        assert_eq!(progression_chord_name(Note::C, "major", 0, "1-4-5"), "C");
        assert_eq!(progression_chord_name(Note::C, "major", 1, "1-4-5"), "F");
        assert_eq!(progression_chord_name(Note::C, "major", 2, "1-4-5"), "G");
        // Loops on position 3.
        assert_eq!(progression_chord_name(Note::C, "major", 3, "1-4-5"), "C");
    }

    #[test]
    fn test_pop_progression_in_g_major() {
        let names: Vec<String> = (0..4)
            .map(|p| progression_chord_name(Note::G, "major", p, "1-5-6-4"))
            .collect();
        assert_eq!(names, vec!["G", "D", "Em", "C"]);
    }

    #[test]
    fn test_minor_key_relative_major_chords() {
        // A natural minor: vi-IV-I-V read as degrees 6,4,1,5 → F, Dm, Am, Em.
        let names: Vec<String> = (0..4)
            .map(|p| progression_chord_name(Note::A, "minor", p, "6-4-1-5"))
            .collect();
        assert_eq!(names, vec!["F", "Dm", "Am", "Em"]);
    }

    #[test]
    fn test_unknown_progression_is_empty() {
        assert_eq!(progression_chord_name(Note::C, "major", 0, "9-9-9"), "");
        assert!(lookup_progression("9-9-9").is_err());
    }

    #[test]
    fn test_degree_out_of_range_falls_back_to_root() {
        let pent = [0u8, 3, 5, 7, 10];
        assert_eq!(chord_root_for_degree(Note::A, &pent, 6), Note::A);
        assert_eq!(chord_root_for_degree(Note::A, &pent, 0), Note::A);
        assert_eq!(chord_root_for_degree(Note::A, &pent, 2), Note::C);
    }

    #[test]
    fn test_quality_role_table() {
        use Quality::*;
        let major: Vec<_> = (1..=7).map(|d| chord_quality_for_degree(Major, d)).collect();
        assert_eq!(major, vec![Major, Minor, Minor, Major, Major, Minor, Minor]);
        let minor: Vec<_> = (1..=7).map(|d| chord_quality_for_degree(Minor, d)).collect();
        assert_eq!(minor, vec![Minor, Major, Major, Minor, Minor, Major, Major]);
    }

    #[test]
    fn test_chord_name_for_position() {
        assert_eq!(chord_name_for_position(Note::A, "minorPentatonic", 0), "Am (E shape)");
        assert_eq!(chord_name_for_position(Note::C, "major", 1), "C (A shape)");
        assert_eq!(chord_name_for_position(Note::C, "major", 20), "C (E shape)");
    }
}
