//! CAGED chord templates.
//!
//! Every (shape, quality) pair has one template. Anchored at the fret of
//! its root on the shape's anchor string, a template produces a complete
//! voicing:
//!
//!   - at the shape's natural open fret (0 for E/A/D, 3 for C/G) it returns
//!     the familiar open-chord grip;
//!   - anywhere else it returns the movable form, each fretted string a fixed
//!     offset from the anchor, with finger 1 barring where the shape allows.
//!
//! Templates are written for six strings. Wider necks get the pattern on
//! their top six strings with the extra bass strings muted; a four-string
//! bass keeps the bottom four strings of the pattern.

use crate::types::*;

/// Per-string value for the six-string pattern, lowest string first.
type Row<T> = [Option<T>; 6];

const STANDARD_STRINGS: usize = 6;

/// A fixed chord shape that can be moved to any anchor fret.
#[derive(Debug)]
pub struct VoicingTemplate {
    pub shape: CagedShape,
    pub quality: Quality,
    /// Absolute frets and fingers of the open grip.
    open: (Row<u8>, Row<u8>),
    /// Fret offsets from the anchor and fingers of the movable form.
    movable: (Row<i8>, Row<u8>),
}

impl VoicingTemplate {
    /// String carrying the root once the pattern is laid out on
    /// `string_count` strings.
    pub fn anchor_string(&self, string_count: usize) -> usize {
        self.shape.anchor_string() + string_count.saturating_sub(STANDARD_STRINGS)
    }

    /// Whether `anchor_fret` selects the open grip rather than the movable form.
    pub fn is_open(&self, anchor_fret: u8) -> bool {
        anchor_fret == self.shape.open_fret()
    }

    /// Build the voicing with the root at `anchor_fret` on the anchor string.
    ///
    /// Returns `None` when the movable form would need a fret behind the nut
    /// (e.g. the C shape anchored at fret 1), or when the instrument has too
    /// few strings to hold the anchor.
    pub fn voicing(&self, anchor_fret: u8, string_count: usize) -> Option<ChordVoicing> {
        let root_string = self.anchor_string(string_count);
        if root_string >= string_count {
            return None;
        }

        let pattern: Row<u8> = if self.is_open(anchor_fret) {
            self.open.0
        } else {
            let mut row = [None; 6];
            for (dst, off) in row.iter_mut().zip(self.movable.0) {
                if let Some(off) = off {
                    let fret = anchor_fret as i16 + off as i16;
                    if fret < 0 {
                        return None;
                    }
                    *dst = Some(fret as u8);
                }
            }
            row
        };
        let fingers = if self.is_open(anchor_fret) {
            self.open.1
        } else {
            self.movable.1
        };

        let extra = string_count.saturating_sub(STANDARD_STRINGS);
        let mut frets = vec![None; string_count];
        let mut fingering = vec![None; string_count];
        for (i, (fret, finger)) in pattern.iter().zip(fingers).enumerate() {
            let string = i + extra;
            if string >= string_count {
                break;
            }
            frets[string] = *fret;
            // Open and muted strings are never fingered.
            fingering[string] = match fret {
                Some(n) if *n > 0 => finger,
                _ => None,
            };
        }

        Some(ChordVoicing::new(
            frets,
            fingering,
            self.shape,
            root_string,
            anchor_fret,
        ))
    }
}

const X: Option<i8> = None;
const N: Option<u8> = None;

const fn o(v: i8) -> Option<i8> {
    Some(v)
}

const fn f(v: u8) -> Option<u8> {
    Some(v)
}

/// Major templates, indexed in [`CAGED_SHAPES`] order.
pub static MAJOR_TEMPLATES: [VoicingTemplate; 5] = [
    VoicingTemplate {
        shape: CagedShape::C,
        quality: Quality::Major,
        open: ([N, f(3), f(2), f(0), f(1), f(0)], [N, f(3), f(2), N, f(1), N]),
        movable: (
            [X, o(0), o(-1), o(-3), o(-2), o(-3)],
            [N, f(4), f(3), f(1), f(2), f(1)],
        ),
    },
    VoicingTemplate {
        shape: CagedShape::A,
        quality: Quality::Major,
        open: ([N, f(0), f(2), f(2), f(2), f(0)], [N, N, f(1), f(2), f(3), N]),
        movable: (
            [X, o(0), o(2), o(2), o(2), o(0)],
            [N, f(1), f(3), f(3), f(3), f(1)],
        ),
    },
    VoicingTemplate {
        shape: CagedShape::G,
        quality: Quality::Major,
        open: ([f(3), f(2), f(0), f(0), f(0), f(3)], [f(2), f(1), N, N, N, f(3)]),
        movable: (
            [o(0), o(-1), o(-3), o(-3), o(-3), o(0)],
            [f(3), f(2), f(1), f(1), f(1), f(4)],
        ),
    },
    VoicingTemplate {
        shape: CagedShape::E,
        quality: Quality::Major,
        open: ([f(0), f(2), f(2), f(1), f(0), f(0)], [N, f(2), f(3), f(1), N, N]),
        movable: (
            [o(0), o(2), o(2), o(1), o(0), o(0)],
            [f(1), f(3), f(4), f(2), f(1), f(1)],
        ),
    },
    VoicingTemplate {
        shape: CagedShape::D,
        quality: Quality::Major,
        open: ([N, N, f(0), f(2), f(3), f(2)], [N, N, N, f(1), f(3), f(2)]),
        movable: (
            [X, X, o(0), o(2), o(3), o(2)],
            [N, N, f(1), f(2), f(4), f(3)],
        ),
    },
];

/// Minor templates, indexed in [`CAGED_SHAPES`] order.
pub static MINOR_TEMPLATES: [VoicingTemplate; 5] = [
    VoicingTemplate {
        shape: CagedShape::C,
        quality: Quality::Minor,
        open: ([N, f(3), f(1), f(0), f(1), N], [N, f(3), f(1), N, f(2), N]),
        movable: (
            [X, o(0), o(-2), o(-3), o(-2), X],
            [N, f(4), f(2), f(1), f(3), N],
        ),
    },
    VoicingTemplate {
        shape: CagedShape::A,
        quality: Quality::Minor,
        open: ([N, f(0), f(2), f(2), f(1), f(0)], [N, N, f(2), f(3), f(1), N]),
        movable: (
            [X, o(0), o(2), o(2), o(1), o(0)],
            [N, f(1), f(3), f(4), f(2), f(1)],
        ),
    },
    VoicingTemplate {
        shape: CagedShape::G,
        quality: Quality::Minor,
        open: ([f(3), f(1), f(0), f(0), f(3), f(3)], [f(2), f(1), N, N, f(3), f(4)]),
        movable: (
            [o(0), o(-2), o(-3), o(-3), o(0), o(0)],
            [f(3), f(2), f(1), f(1), f(4), f(4)],
        ),
    },
    VoicingTemplate {
        shape: CagedShape::E,
        quality: Quality::Minor,
        open: ([f(0), f(2), f(2), f(0), f(0), f(0)], [N, f(2), f(3), N, N, N]),
        movable: (
            [o(0), o(2), o(2), o(0), o(0), o(0)],
            [f(1), f(3), f(4), f(1), f(1), f(1)],
        ),
    },
    VoicingTemplate {
        shape: CagedShape::D,
        quality: Quality::Minor,
        open: ([N, N, f(0), f(2), f(3), f(1)], [N, N, N, f(2), f(3), f(1)]),
        movable: (
            [X, X, o(0), o(2), o(3), o(1)],
            [N, N, f(1), f(3), f(4), f(2)],
        ),
    },
];

pub fn template(shape: CagedShape, quality: Quality) -> &'static VoicingTemplate {
    let idx = match shape {
        CagedShape::C => 0,
        CagedShape::A => 1,
        CagedShape::G => 2,
        CagedShape::E => 3,
        CagedShape::D => 4,
    };
    match quality {
        Quality::Major => &MAJOR_TEMPLATES[idx],
        Quality::Minor => &MINOR_TEMPLATES[idx],
    }
}

/// Shorthand for `template(shape, quality).voicing(anchor_fret, string_count)`.
pub fn build_voicing(
    shape: CagedShape,
    quality: Quality,
    anchor_fret: u8,
    string_count: usize,
) -> Option<ChordVoicing> {
    template(shape, quality).voicing(anchor_fret, string_count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pitch::{interval, note_at_fret};
    use crate::tunings::STANDARD_TUNING;

    /// Every sounding note of `v` must be a chord tone of the anchor note.
    fn assert_chord_tones(v: &ChordVoicing, tuning: &[Note], quality: Quality) {
        let root = note_at_fret(tuning[v.root_string], v.root_fret as u32);
        let triad = quality.triad();
        for (s, fret) in v.frets.iter().enumerate() {
            if let Some(fret) = fret {
                let n = note_at_fret(tuning[s], *fret as u32);
                assert!(
                    triad.contains(&interval(root, n)),
                    "{} {:?} at {}: string {} fret {} sounds {}",
                    v.shape,
                    quality,
                    v.root_fret,
                    s,
                    fret,
                    n
                );
            }
        }
        assert_eq!(v.frets[v.root_string], Some(v.root_fret));
    }

    #[test]
    fn test_open_c_major() {
        let v = build_voicing(CagedShape::C, Quality::Major, 3, 6).unwrap();
        assert_eq!(v.frets, vec![None, Some(3), Some(2), Some(0), Some(1), Some(0)]);
        assert_eq!(v.fingers, vec![None, Some(3), Some(2), None, Some(1), None]);
        assert_eq!(v.base_fret, 0);
        assert_eq!(v.barre, None);
        assert_eq!(v.root_string, 1);
        assert_eq!(v.root_fret, 3);
    }

    #[test]
    fn test_open_e_major() {
        let v = build_voicing(CagedShape::E, Quality::Major, 0, 6).unwrap();
        assert_eq!(v.frets, vec![Some(0), Some(2), Some(2), Some(1), Some(0), Some(0)]);
        assert_eq!(v.barre, None);
    }

    #[test]
    fn test_barred_e_major_at_fifth() {
        let v = build_voicing(CagedShape::E, Quality::Major, 5, 6).unwrap();
        assert_eq!(v.frets, vec![Some(5), Some(7), Some(7), Some(6), Some(5), Some(5)]);
        assert_eq!(v.fingers, vec![Some(1), Some(3), Some(4), Some(2), Some(1), Some(1)]);
        assert_eq!(v.barre, Some(5));
        assert_eq!(v.base_fret, 5);
    }

    #[test]
    fn test_barred_a_minor_shape() {
        let v = build_voicing(CagedShape::A, Quality::Minor, 3, 6).unwrap();
        assert_eq!(v.frets, vec![None, Some(3), Some(5), Some(5), Some(4), Some(3)]);
        assert_eq!(v.barre, Some(3));
    }

    #[test]
    fn test_moved_c_shape_barres_below_root() {
        let v = build_voicing(CagedShape::C, Quality::Major, 8, 6).unwrap();
        assert_eq!(v.frets, vec![None, Some(8), Some(7), Some(5), Some(6), Some(5)]);
        assert_eq!(v.barre, Some(5));
        assert_eq!(v.base_fret, 5);
    }

    #[test]
    fn test_shape_behind_nut_is_unplayable() {
        assert!(build_voicing(CagedShape::C, Quality::Major, 1, 6).is_none());
        assert!(build_voicing(CagedShape::G, Quality::Major, 2, 6).is_none());
        assert!(build_voicing(CagedShape::G, Quality::Minor, 0, 6).is_none());
    }

    #[test]
    fn test_every_template_sounds_its_triad() {
        for quality in [Quality::Major, Quality::Minor] {
            for shape in CAGED_SHAPES {
                for anchor in 0..=15u8 {
                    if let Some(v) = build_voicing(shape, quality, anchor, 6) {
                        assert_chord_tones(&v, &STANDARD_TUNING, quality);
                    }
                }
            }
        }
    }

    #[test]
    fn test_muted_strings_carry_no_finger() {
        for quality in [Quality::Major, Quality::Minor] {
            for shape in CAGED_SHAPES {
                for anchor in 0..=15u8 {
                    if let Some(v) = build_voicing(shape, quality, anchor, 6) {
                        for (fret, finger) in v.frets.iter().zip(&v.fingers) {
                            if fret.is_none() || *fret == Some(0) {
                                assert!(finger.is_none());
                            }
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn test_seven_string_mutes_low_b() {
        let seven = [Note::B, Note::E, Note::A, Note::D, Note::G, Note::B, Note::E];
        let v = build_voicing(CagedShape::E, Quality::Major, 5, 7).unwrap();
        assert_eq!(v.frets.len(), 7);
        assert_eq!(v.fingers.len(), 7);
        assert_eq!(v.frets[0], None);
        assert_eq!(v.root_string, 1);
        assert_chord_tones(&v, &seven, Quality::Major);
    }

    #[test]
    fn test_bass_keeps_low_four_strings() {
        let v = build_voicing(CagedShape::A, Quality::Major, 3, 4).unwrap();
        assert_eq!(v.frets, vec![None, Some(3), Some(5), Some(5)]);
        assert_eq!(v.fingers, vec![None, Some(1), Some(3), Some(3)]);
        // Finger 3 lies across the D and G strings.
        assert_eq!(v.barre, Some(5));
    }

    #[test]
    fn test_template_lookup_matches_key() {
        for quality in [Quality::Major, Quality::Minor] {
            for shape in CAGED_SHAPES {
                let t = template(shape, quality);
                assert_eq!(t.shape, shape);
                assert_eq!(t.quality, quality);
            }
        }
    }
}
