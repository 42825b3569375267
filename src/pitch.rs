//! Twelve-tone pitch-class arithmetic used for every fretboard cell.

use crate::types::Note;

/// Interval labels indexed by semitone distance from the root.
pub const INTERVAL_NAMES: [&str; 12] = [
    "R", "b2", "2", "b3", "3", "4", "b5", "5", "b6", "6", "b7", "7",
];

/// Frets that carry an inlay marker.
pub const FRET_MARKERS: [u8; 10] = [3, 5, 7, 9, 12, 15, 17, 19, 21, 24];
/// Frets that carry a double inlay.
pub const DOUBLE_MARKERS: [u8; 2] = [12, 24];

/// Pitch class sounding at `fret` on a string tuned to `open`.
pub fn note_at_fret(open: Note, fret: u32) -> Note {
    open.transpose(fret)
}

/// Ascending distance in semitones from `root` to `note` (0-11).
pub fn interval(root: Note, note: Note) -> u8 {
    (note.index() + 12 - root.index()) % 12
}

pub fn is_in_scale(note: Note, root: Note, formula: &[u8]) -> bool {
    formula.contains(&interval(root, note))
}

/// 1-based position of `note` in `formula` relative to `root`, or 0 when the
/// note is not in the scale.
pub fn scale_degree(note: Note, root: Note, formula: &[u8]) -> usize {
    let iv = interval(root, note);
    formula
        .iter()
        .position(|&o| o == iv)
        .map(|i| i + 1)
        .unwrap_or(0)
}

pub fn interval_name(root: Note, note: Note) -> &'static str {
    INTERVAL_NAMES[interval(root, note) as usize]
}

/// Fret on `open` where `note` first sounds (0-11).
pub fn fret_of(note: Note, open: Note) -> u8 {
    interval(open, note)
}

/// Fret on the lowest string where `root` first sounds (0-11).
/// An empty tuning has no lowest string; fret 0 is returned.
pub fn root_fret(root: Note, tuning: &[Note]) -> u8 {
    tuning.first().map(|&low| fret_of(root, low)).unwrap_or(0)
}

pub fn is_fret_marker(fret: u8) -> bool {
    FRET_MARKERS.contains(&fret)
}

pub fn is_double_marker(fret: u8) -> bool {
    DOUBLE_MARKERS.contains(&fret)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tunings::STANDARD_TUNING;
    use crate::types::NOTES;

    #[test]
    fn test_note_at_fret_wraps() {
        assert_eq!(note_at_fret(Note::E, 0), Note::E);
        assert_eq!(note_at_fret(Note::E, 5), Note::A);
        assert_eq!(note_at_fret(Note::E, 12), Note::E);
        assert_eq!(note_at_fret(Note::E, 13), Note::F);
        assert_eq!(note_at_fret(Note::B, 1), Note::C);
    }

    #[test]
    fn test_interval_unison_and_inverse() {
        for &a in &NOTES {
            assert_eq!(interval(a, a), 0);
            for &b in &NOTES {
                assert_eq!((interval(a, b) + interval(b, a)) % 12, 0);
            }
        }
    }

    #[test]
    fn test_interval_from_a() {
        assert_eq!(interval(Note::A, Note::C), 3);
        assert_eq!(interval(Note::A, Note::E), 7);
        assert_eq!(interval(Note::A, Note::G), 10);
        assert_eq!(interval(Note::A, Note::Gs), 11);
    }

    #[test]
    fn test_scale_membership_matches_degree() {
        let minor_pent = [0u8, 3, 5, 7, 10];
        for &root in &NOTES {
            for &note in &NOTES {
                assert_eq!(
                    is_in_scale(note, root, &minor_pent),
                    scale_degree(note, root, &minor_pent) > 0
                );
            }
        }
    }

    #[test]
    fn test_scale_degree_major() {
        let major = [0u8, 2, 4, 5, 7, 9, 11];
        assert_eq!(scale_degree(Note::C, Note::C, &major), 1);
        assert_eq!(scale_degree(Note::E, Note::C, &major), 3);
        assert_eq!(scale_degree(Note::B, Note::C, &major), 7);
        assert_eq!(scale_degree(Note::Cs, Note::C, &major), 0);
    }

    #[test]
    fn test_interval_names() {
        assert_eq!(interval_name(Note::A, Note::A), "R");
        assert_eq!(interval_name(Note::A, Note::C), "b3");
        assert_eq!(interval_name(Note::C, Note::Fs), "b5");
    }

    #[test]
    fn test_root_fret_round_trip() {
        for t in crate::tunings::TUNINGS {
            for &root in &NOTES {
                let f = root_fret(root, t.notes);
                assert!(f < 12, "{} {}", t.key, root);
                assert_eq!(note_at_fret(t.notes[0], f as u32), root, "{}", t.key);
            }
        }
    }

    #[test]
    fn test_root_fret_known_values() {
        assert_eq!(root_fret(Note::E, &STANDARD_TUNING), 0);
        assert_eq!(root_fret(Note::A, &STANDARD_TUNING), 5);
        assert_eq!(root_fret(Note::C, &STANDARD_TUNING), 8);
        assert_eq!(root_fret(Note::A, &[Note::C, Note::G, Note::C]), 9);
    }

    #[test]
    fn test_markers() {
        assert!(is_fret_marker(12));
        assert!(!is_fret_marker(4));
        assert!(is_double_marker(24));
        assert!(!is_double_marker(7));
    }
}
