use crate::pitch::{interval, interval_name, is_in_scale, note_at_fret, root_fret, scale_degree};
use crate::progressions::{find_progression, resolve_step};
use crate::scales::{scale, DEFAULT_FRET_COUNT, DEFAULT_SCALE_KEY};
use crate::selector::{
    all_position_voicings, all_progression_voicings, select_voicing_for_position,
    select_voicing_for_progression_step,
};
use crate::tunings::STANDARD_TUNING;
use crate::types::*;
use serde::{Deserialize, Serialize};

/// Root, major/minor third and fifth: the tones kept by the R-3-5 filter.
pub const R35_INTERVALS: [u8; 4] = [0, 3, 4, 7];

/// What a note marker shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DisplayMode {
    #[default]
    Notes,
    Intervals,
    Degrees,
}

/// Which overlay is active on the neck.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ViewMode {
    /// Scale tones only.
    #[default]
    Scale,
    /// Fixed-shape chord voicing for the position.
    Chords,
    /// Progression chord voicing for the position.
    ProgressionChord,
    /// Scale tones re-rooted on the progression chord for the position.
    ProgressionScale,
}

/// Every display-affecting choice, passed to the renderer as one value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FretboardState {
    pub root: Note,
    pub scale: String,
    /// Open-string notes, lowest first.
    pub tuning: Vec<Note>,
    /// 0-based position; `None` shows the whole neck.
    pub position: Option<usize>,
    pub frets: u8,
    pub display: DisplayMode,
    pub view: ViewMode,
    /// Only show root, thirds and fifth.
    pub chord_tones_only: bool,
    pub progression: Option<String>,
    /// Chord views draw finger numbers instead of note labels.
    #[serde(default = "show_fingerings_default")]
    pub show_fingerings: bool,
}

fn show_fingerings_default() -> bool {
    true
}

impl Default for FretboardState {
    fn default() -> Self {
        Self {
            root: Note::A,
            scale: DEFAULT_SCALE_KEY.to_string(),
            tuning: STANDARD_TUNING.to_vec(),
            position: None,
            frets: DEFAULT_FRET_COUNT,
            display: DisplayMode::Notes,
            view: ViewMode::Scale,
            chord_tones_only: false,
            progression: None,
            show_fingerings: show_fingerings_default(),
        }
    }
}

/// Chord overlay for one cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
pub struct ChordMark {
    pub shown: bool,
    pub finger: Option<u8>,
    pub muted: bool,
}

/// Everything the renderer needs for one (string, fret) cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Cell {
    pub string: usize,
    pub fret: u8,
    pub note: Note,
    pub in_scale: bool,
    pub is_root: bool,
    pub interval: u8,
    pub degree: usize,
    pub in_position: bool,
    pub chord: ChordMark,
    /// Whether the marker is drawn at all.
    pub visible: bool,
    /// Marker text for the current display mode.
    pub label: String,
}

impl FretboardState {
    fn chord_view(&self) -> bool {
        matches!(self.view, ViewMode::Chords | ViewMode::ProgressionChord)
    }

    fn progression_key(&self) -> Option<&str> {
        self.progression.as_deref()
    }

    /// Root used for labels: the progression chord's root in
    /// progression-scale view with a position, else the scale root.
    pub fn effective_root(&self) -> Note {
        if let (ViewMode::ProgressionScale, Some(pos), Some(key)) =
            (self.view, self.position, self.progression_key())
        {
            if let Some(step) =
                find_progression(key).and_then(|p| resolve_step(self.root, &self.scale, pos, p))
            {
                return step.root;
            }
        }
        self.root
    }

    /// Voicings to overlay for the current view; empty outside chord views.
    pub fn voicings(&self) -> Vec<ChordVoicing> {
        match (self.view, self.progression_key()) {
            (ViewMode::ProgressionChord, Some(key)) => match self.position {
                Some(p) => select_voicing_for_progression_step(
                    self.root,
                    &self.scale,
                    p,
                    key,
                    &self.tuning,
                )
                .into_iter()
                .collect(),
                None => all_progression_voicings(self.root, &self.scale, key, &self.tuning),
            },
            (ViewMode::Chords, _) | (ViewMode::ProgressionChord, None) => match self.position {
                Some(p) => select_voicing_for_position(self.root, &self.scale, p, &self.tuning)
                    .into_iter()
                    .collect(),
                None => all_position_voicings(self.root, &self.scale, &self.tuning),
            },
            _ => Vec::new(),
        }
    }

    /// Whether `fret` lies in the selected position window.
    pub fn is_in_position(&self, fret: u8) -> bool {
        let rf = root_fret(self.effective_root(), &self.tuning);
        scale(&self.scale).is_in_position(fret, self.position, rf, self.frets)
    }

    /// A fretted match in any voicing wins. A string shows as muted (at
    /// the nut only) when every voicing mutes it.
    fn chord_mark(voicings: &[ChordVoicing], string: usize, fret: u8) -> ChordMark {
        let fretted = voicings
            .iter()
            .find(|v| v.frets.get(string).copied().flatten() == Some(fret));
        if let Some(v) = fretted {
            return ChordMark {
                shown: true,
                finger: v.fingers.get(string).copied().flatten(),
                muted: false,
            };
        }
        let muted = fret == 0
            && !voicings.is_empty()
            && voicings
                .iter()
                .all(|v| matches!(v.frets.get(string), Some(None)));
        ChordMark {
            shown: muted,
            finger: None,
            muted,
        }
    }

    fn build_cell(&self, string: usize, fret: u8, voicings: &[ChordVoicing]) -> Cell {
        let formula = scale(&self.scale).formula;
        let root = self.effective_root();
        let note = note_at_fret(self.tuning[string], fret as u32);
        let iv = interval(root, note);
        let in_scale = is_in_scale(note, root, formula);
        let degree = scale_degree(note, root, formula);
        let in_position = self.is_in_position(fret);
        let chord = Self::chord_mark(voicings, string, fret);

        // Chord tones may fall outside the scale, so chord views skip the
        // scale filter.
        let visible = if self.chord_view() {
            chord.shown
        } else {
            in_scale && in_position && (!self.chord_tones_only || R35_INTERVALS.contains(&iv))
        };
        let label = match self.display {
            DisplayMode::Notes => note.to_string(),
            DisplayMode::Intervals => interval_name(root, note).to_string(),
            DisplayMode::Degrees => degree.to_string(),
        };

        Cell {
            string,
            fret,
            note,
            in_scale,
            is_root: note == root,
            interval: iv,
            degree,
            in_position,
            chord,
            visible,
            label,
        }
    }

    /// Cell at `string` (0 = lowest) and `fret`. `None` off the neck.
    pub fn cell(&self, string: usize, fret: u8) -> Option<Cell> {
        if string >= self.tuning.len() || fret > self.frets {
            return None;
        }
        Some(self.build_cell(string, fret, &self.voicings()))
    }

    /// All cells, one row per string from the lowest, frets 0..=`frets`.
    /// Voicings are computed once for the whole grid.
    pub fn grid(&self) -> Vec<Vec<Cell>> {
        let voicings = self.voicings();
        (0..self.tuning.len())
            .map(|s| {
                (0..=self.frets)
                    .map(|f| self.build_cell(s, f, &voicings))
                    .collect()
            })
            .collect()
    }

    /// False when the R-3-5 filter hides every scale tone in the window.
    /// Chord views manage their own visibility and always report true.
    pub fn has_visible_notes(&self) -> bool {
        if !self.chord_tones_only || self.chord_view() {
            return true;
        }
        self.grid().iter().flatten().any(|c| c.visible)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn a_minor() -> FretboardState {
        FretboardState::default()
    }

    #[test]
    fn test_default_state_is_a_minor_pentatonic() {
        let s = a_minor();
        assert_eq!(s.root, Note::A);
        assert_eq!(s.scale, "minorPentatonic");
        assert_eq!(s.tuning.len(), 6);
        assert_eq!(s.frets, 24);
    }

    #[test]
    fn test_cell_on_low_e() {
        let s = a_minor();
        let c = s.cell(0, 5).unwrap();
        assert_eq!(c.note, Note::A);
        assert!(c.is_root);
        assert!(c.in_scale);
        assert_eq!(c.degree, 1);
        assert!(c.visible);

        let c = s.cell(0, 6).unwrap();
        assert_eq!(c.note, Note::As);
        assert!(!c.in_scale);
        assert!(!c.visible);
    }

    #[test]
    fn test_cell_off_the_neck() {
        let s = a_minor();
        assert!(s.cell(6, 0).is_none());
        assert!(s.cell(0, 25).is_none());
    }

    #[test]
    fn test_position_hides_cells_outside_window() {
        let mut s = a_minor();
        s.position = Some(0);
        // G on the low E string, fret 3, is in the scale but outside 5-8.
        let c = s.cell(0, 3).unwrap();
        assert!(c.in_scale);
        assert!(!c.in_position);
        assert!(!c.visible);
        assert!(s.cell(0, 8).unwrap().visible);
    }

    #[test]
    fn test_labels_follow_display_mode() {
        let mut s = a_minor();
        s.display = DisplayMode::Intervals;
        assert_eq!(s.cell(0, 8).unwrap().label, "b3");
        s.display = DisplayMode::Degrees;
        assert_eq!(s.cell(0, 8).unwrap().label, "2");
        s.display = DisplayMode::Notes;
        assert_eq!(s.cell(0, 8).unwrap().label, "C");
    }

    #[test]
    fn test_chord_tones_filter() {
        let mut s = a_minor();
        s.chord_tones_only = true;
        // D (the fourth) is filtered, C (b3) is kept.
        assert!(!s.cell(0, 10).unwrap().visible);
        assert!(s.cell(0, 8).unwrap().visible);
        assert!(s.has_visible_notes());
    }

    #[test]
    fn test_chords_view_shows_voicing_only() {
        let mut s = a_minor();
        s.view = ViewMode::Chords;
        s.position = Some(0);
        let v = s.voicings();
        assert_eq!(v.len(), 1);
        let c = s.cell(0, 5).unwrap();
        assert!(c.chord.shown);
        assert_eq!(c.chord.finger, Some(1));
        assert!(c.visible);
        // Fret 8 is in the box but not in the barred E-shape Am.
        assert!(!s.cell(0, 8).unwrap().visible);
    }

    #[test]
    fn test_muted_string_marked_at_nut_only() {
        let mut s = a_minor();
        s.view = ViewMode::Chords;
        s.position = Some(1);
        // D-shape Am at the seventh fret: [x, x, 7, 9, 10, 8].
        let nut = s.cell(0, 0).unwrap();
        assert!(nut.chord.muted);
        assert!(nut.visible);
        assert!(!s.cell(0, 7).unwrap().visible);
        let c = s.cell(3, 9).unwrap();
        assert!(c.visible);
        assert!(!c.chord.muted);
    }

    #[test]
    fn test_chords_view_without_position_lists_all() {
        let mut s = a_minor();
        s.view = ViewMode::Chords;
        assert_eq!(s.voicings().len(), 5);
    }

    #[test]
    fn test_progression_scale_view_reroots() {
        let mut s = FretboardState {
            root: Note::C,
            scale: "major".into(),
            view: ViewMode::ProgressionScale,
            progression: Some("1-4-5".into()),
            position: Some(1),
            ..FretboardState::default()
        };
        assert_eq!(s.effective_root(), Note::F);
        s.position = None;
        assert_eq!(s.effective_root(), Note::C);
    }

    #[test]
    fn test_progression_chord_view() {
        let s = FretboardState {
            root: Note::C,
            scale: "major".into(),
            view: ViewMode::ProgressionChord,
            progression: Some("1-4-5".into()),
            position: Some(0),
            ..FretboardState::default()
        };
        let v = s.voicings();
        assert_eq!(v.len(), 1);
        assert_eq!(v[0].shape, CagedShape::E);
    }

    #[test]
    fn test_scale_view_has_no_voicings() {
        assert!(a_minor().voicings().is_empty());
    }

    #[test]
    fn test_state_json_without_fingerings_flag_shows_them() {
        let mut json = serde_json::to_value(FretboardState::default()).unwrap();
        json.as_object_mut().unwrap().remove("show_fingerings");
        let s: FretboardState = serde_json::from_value(json).unwrap();
        assert!(s.show_fingerings);
    }

    #[test]
    fn test_grid_dimensions() {
        let s = FretboardState {
            frets: 12,
            ..FretboardState::default()
        };
        let g = s.grid();
        assert_eq!(g.len(), 6);
        assert!(g.iter().all(|row| row.len() == 13));
    }
}
