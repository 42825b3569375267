use crate::fretboard::{Cell, FretboardState, ViewMode};
use crate::pitch::{is_double_marker, is_fret_marker};
use crate::types::*;

/// Frets drawn in a chord box when the shape fits in fewer.
const MIN_BOX_FRETS: u8 = 4;

fn column(s: &str) -> String {
    format!("{:^3}", s)
}

/// First fret row of a chord box. Shapes that fit under the fourth fret
/// are drawn from the nut.
fn box_start(voicing: &ChordVoicing) -> u8 {
    let lowest = voicing.frets.iter().flatten().copied().filter(|&f| f > 0).min();
    match lowest {
        Some(low) if voicing.top_fret() > MIN_BOX_FRETS => low,
        _ => 1,
    }
}

/// Vertical chord box: strings left to right from the lowest, frets
/// top to bottom, finger numbers on fretted notes.
pub fn render_chord(voicing: &ChordVoicing, tuning: &[Note]) -> String {
    let start = box_start(voicing);
    let rows = (voicing.top_fret().saturating_sub(start) + 1).max(MIN_BOX_FRETS);
    let width = voicing.string_count() * 3;
    let mut lines = Vec::new();

    lines.push(
        tuning
            .iter()
            .take(voicing.string_count())
            .map(|n| column(n.name()))
            .collect::<String>(),
    );
    lines.push(
        voicing
            .frets
            .iter()
            .map(|f| match f {
                None => column("x"),
                Some(0) => column("o"),
                Some(_) => column(""),
            })
            .collect::<String>(),
    );
    lines.push(if start == 1 { "═".repeat(width) } else { "─".repeat(width) });

    for fret in start..start + rows {
        let mut row: String = voicing
            .frets
            .iter()
            .zip(&voicing.fingers)
            .map(|(f, finger)| match (f, finger) {
                (Some(n), Some(d)) if *n == fret => column(&d.to_string()),
                (Some(n), None) if *n == fret => column("●"),
                _ => column("│"),
            })
            .collect();
        row.push_str(&format!(" {}", fret));
        lines.push(row);
    }
    lines.join("\n")
}

fn cell_text(state: &FretboardState, cell: &Cell) -> String {
    if !cell.visible {
        return if cell.fret == 0 { column("") } else { column("─") };
    }
    if cell.chord.muted {
        return column("x");
    }
    match cell.chord.finger {
        Some(d) if state.show_fingerings && state.view != ViewMode::Scale => {
            column(&d.to_string())
        }
        _ => column(&cell.label),
    }
}

/// Horizontal neck, highest string on top, with the nut after the open
/// column and an inlay row underneath.
pub fn render_neck(state: &FretboardState) -> String {
    let grid = state.grid();
    let mut lines: Vec<String> = grid
        .iter()
        .rev()
        .map(|row| {
            let mut line = match row.first() {
                Some(c) => format!("{:<3}", state.tuning[c.string].name()),
                None => String::new(),
            };
            for cell in row {
                line.push_str(&cell_text(state, cell));
                line.push(if cell.fret == 0 { '║' } else { '│' });
            }
            line
        })
        .collect();

    let mut inlays = String::from("   ");
    for fret in 0..=state.frets {
        let mark = if is_double_marker(fret) {
            ":"
        } else if is_fret_marker(fret) {
            "•"
        } else {
            ""
        };
        inlays.push_str(&column(mark));
        inlays.push(' ');
    }
    lines.push(inlays.trim_end().to_string());
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tunings::STANDARD_TUNING;
    use crate::voicings::build_voicing;

    #[test]
    fn test_open_c_box() {
        let v = build_voicing(CagedShape::C, Quality::Major, 3, 6).unwrap();
        let text = render_chord(&v, &STANDARD_TUNING);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3 + 4);
        assert_eq!(lines[0], " E  A  D  G  B  E ");
        assert_eq!(lines[1], [" x ", "   ", "   ", " o ", "   ", " o "].concat());
        assert!(lines[2].starts_with('═'));
        assert_eq!(lines[3], " │  │  │  │  1  │  1");
        assert_eq!(lines[5], " │  3  │  │  │  │  3");
    }

    #[test]
    fn test_barred_box_starts_at_barre() {
        let v = build_voicing(CagedShape::E, Quality::Major, 5, 6).unwrap();
        let text = render_chord(&v, &STANDARD_TUNING);
        let lines: Vec<&str> = text.lines().collect();
        assert!(lines[2].starts_with('─'));
        assert_eq!(lines[3], " 1  │  │  │  1  1  5");
        assert_eq!(lines[4], " │  │  │  2  │  │  6");
        assert_eq!(lines.last().copied(), Some(" │  │  │  │  │  │  8"));
    }

    #[test]
    fn test_neck_has_row_per_string() {
        let state = FretboardState {
            frets: 12,
            ..FretboardState::default()
        };
        let text = render_neck(&state);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 7);
        // High E on top, low E at the bottom.
        assert!(lines[0].starts_with("E "));
        assert!(lines[5].starts_with("E "));
        assert!(lines[4].starts_with("A "));
        assert!(lines[6].contains(':'));
    }

    #[test]
    fn test_neck_shows_labels_in_position() {
        let state = FretboardState {
            frets: 12,
            position: Some(0),
            ..FretboardState::default()
        };
        let text = render_neck(&state);
        let low = text.lines().nth(5).unwrap_or_default();
        assert!(low.contains(" A │"));
        assert!(low.contains(" C │"));
        // G at fret 3 is outside box one.
        assert!(!low.contains(" G │"));
    }

    #[test]
    fn test_neck_shows_fingers_in_chord_view() {
        let state = FretboardState {
            frets: 12,
            position: Some(0),
            view: ViewMode::Chords,
            ..FretboardState::default()
        };
        let text = render_neck(&state);
        let low = text.lines().nth(5).unwrap_or_default();
        assert!(low.contains(" 1 │"));
    }

    #[test]
    fn test_neck_shows_notes_when_fingerings_hidden() {
        let state = FretboardState {
            frets: 12,
            position: Some(0),
            view: ViewMode::Chords,
            show_fingerings: false,
            ..FretboardState::default()
        };
        let text = render_neck(&state);
        let low = text.lines().nth(5).unwrap_or_default();
        // Am barred at the fifth fret: the barre reads as its note.
        assert!(low.contains(" A │"));
        assert!(!low.contains(" 1 │"));
    }
}
