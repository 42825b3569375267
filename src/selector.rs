//! Picks one concrete voicing for a scale position.
//!
//! Two searches share the same scoring: every candidate is an octave
//! instance of a template, scored by how far its lowest fret sits from the
//! middle of the position's fret window.
//!
//! - [`select_voicing_for_position`] plays the single shape assigned to the
//!   position and only chooses the octave.
//! - [`select_voicing_for_progression_step`] resolves the progression chord
//!   for the position and searches all five shapes, preferring the more
//!   common grips when two candidates are within [`PREFERENCE_BAND`] frets
//!   of each other.
//!
//! The progression order is pairwise and not transitive (E can beat A, A
//! beat G and G beat E), so the winner is defined by the search order in
//! [`SEARCH_ORDER`] together with the sort in [`run_insertion_sort`].

use crate::pitch::{fret_of, root_fret};
use crate::progressions::{find_progression, resolve_step_in};
use crate::scales::{position_count, scale};
use crate::types::*;
use crate::voicings::{template, VoicingTemplate};
use log::{debug, trace};
use std::cmp::Ordering;

/// Highest anchor fret for the first three positions and for progressions.
pub const MAX_FRET_LOW: u8 = 22;
/// Highest anchor fret for positions 4 and up.
pub const MAX_FRET_HIGH: u8 = 24;

/// Distance difference within which shape preference beats proximity.
pub const PREFERENCE_BAND: u32 = 2;

/// Most to least common grip.
pub const SHAPE_PREFERENCE: [CagedShape; 5] = [
    CagedShape::E,
    CagedShape::A,
    CagedShape::G,
    CagedShape::C,
    CagedShape::D,
];

/// Order in which shapes are enumerated for progression search.
pub const SEARCH_ORDER: [CagedShape; 5] = [
    CagedShape::E,
    CagedShape::A,
    CagedShape::D,
    CagedShape::C,
    CagedShape::G,
];

#[derive(Debug, Clone)]
struct Candidate {
    voicing: ChordVoicing,
    distance: u32,
}

/// Middle of the position window on the lowest string, rounded down.
/// `None` when the scale has no window at `position`.
pub fn target_fret(root: Note, scale_key: &str, position: usize, tuning: &[Note]) -> Option<i32> {
    window_target(scale(scale_key), root, position, tuning)
}

fn window_target(scale: &Scale, root: Note, position: usize, tuning: &[Note]) -> Option<i32> {
    let (start, end) = scale.window(position, root_fret(root, tuning))?;
    Some((start + end).div_euclid(2))
}

/// Octave instances of `template` with `chord_root` on its anchor string,
/// anchored no higher than `max_fret`.
fn octave_candidates(
    template: &VoicingTemplate,
    chord_root: Note,
    tuning: &[Note],
    target: i32,
    max_fret: u8,
) -> Vec<Candidate> {
    let anchor_string = template.anchor_string(tuning.len());
    let Some(&open) = tuning.get(anchor_string) else {
        return Vec::new();
    };
    let first = fret_of(chord_root, open);

    [first, first + 12, first + 24]
        .into_iter()
        .filter(|&fret| fret <= max_fret)
        .filter_map(|fret| template.voicing(fret, tuning.len()))
        .map(|voicing| {
            let distance = (voicing.base_fret as i32 - target).unsigned_abs();
            trace!(
                "candidate {} {:?} at {}: base {} distance {}",
                voicing.shape,
                template.quality,
                voicing.root_fret,
                voicing.base_fret,
                distance
            );
            Candidate { voicing, distance }
        })
        .collect()
}

fn preference_rank(shape: CagedShape, order: &[CagedShape]) -> usize {
    order.iter().position(|&s| s == shape).unwrap_or(order.len())
}

/// Progression order: by distance, except that candidates within
/// [`PREFERENCE_BAND`] of each other are ordered by shape rank.
fn preference_order(a: &Candidate, b: &Candidate, order: &[CagedShape]) -> Ordering {
    if a.distance.abs_diff(b.distance) <= PREFERENCE_BAND {
        preference_rank(a.voicing.shape, order).cmp(&preference_rank(b.voicing.shape, order))
    } else {
        a.distance.cmp(&b.distance)
    }
}

/// Stable sort: take the leading run (reversed if strictly descending),
/// then binary-insert the rest. The head under a non-transitive `cmp`
/// depends on this exact procedure.
fn run_insertion_sort<T>(items: &mut [T], cmp: impl Fn(&T, &T) -> Ordering) {
    let n = items.len();
    if n < 2 {
        return;
    }
    let descending = cmp(&items[1], &items[0]) == Ordering::Less;
    let mut run = 2;
    while run < n {
        let ord = cmp(&items[run], &items[run - 1]);
        if descending != (ord == Ordering::Less) {
            break;
        }
        run += 1;
    }
    if descending {
        items[..run].reverse();
    }

    for start in run..n {
        let (mut left, mut right) = (0, start);
        while left < right {
            let mid = left + (right - left) / 2;
            if cmp(&items[start], &items[mid]) == Ordering::Less {
                right = mid;
            } else {
                left = mid + 1;
            }
        }
        items[left..=start].rotate_right(1);
    }
}

/// Choose the winning candidate.
///
/// Without a preference order the closest candidate wins, the first one
/// on ties. With one, candidates are sorted by [`preference_order`] and the
/// head wins.
fn pick(mut candidates: Vec<Candidate>, preference: Option<&[CagedShape]>) -> Option<ChordVoicing> {
    match preference {
        None => candidates
            .into_iter()
            .min_by_key(|c| c.distance)
            .map(|c| c.voicing),
        Some(order) => {
            run_insertion_sort(&mut candidates, |a, b| preference_order(a, b, order));
            candidates.into_iter().next().map(|c| c.voicing)
        }
    }
}

/// Voicing of the scale's own chord in the CAGED shape assigned to
/// `position`, at the octave closest to the position window.
pub fn select_voicing_for_position(
    root: Note,
    scale_key: &str,
    position: usize,
    tuning: &[Note],
) -> Option<ChordVoicing> {
    let scale = scale(scale_key);
    let shape = scale.caged_shape(position);
    let quality = scale.quality();
    let target = window_target(scale, root, position, tuning)?;
    let max_fret = if position < 3 {
        MAX_FRET_LOW
    } else {
        MAX_FRET_HIGH
    };

    let candidates = octave_candidates(template(shape, quality), root, tuning, target, max_fret);
    let chosen = pick(candidates, None);
    match &chosen {
        Some(v) => debug!(
            "{}{} position {}: {} shape at fret {} (target {})",
            root,
            quality.suffix(),
            position + 1,
            shape,
            v.root_fret,
            target
        ),
        None => debug!(
            "{}{} position {}: no playable {} shape",
            root,
            quality.suffix(),
            position + 1,
            shape
        ),
    }
    chosen
}

/// Voicing of the progression chord that falls on `position`, searched
/// across all five shapes and every playable octave.
pub fn select_voicing_for_progression_step(
    root: Note,
    scale_key: &str,
    position: usize,
    progression_key: &str,
    tuning: &[Note],
) -> Option<ChordVoicing> {
    let progression = find_progression(progression_key)?;
    let scale = scale(scale_key);
    let step = resolve_step_in(root, scale, position, progression)?;
    let target = window_target(scale, root, position, tuning)?;

    let candidates: Vec<Candidate> = SEARCH_ORDER
        .iter()
        .flat_map(|&shape| {
            octave_candidates(
                template(shape, step.quality),
                step.root,
                tuning,
                target,
                MAX_FRET_LOW,
            )
        })
        .collect();

    let chosen = pick(candidates, Some(&SHAPE_PREFERENCE));
    if let Some(v) = &chosen {
        debug!(
            "{} step {} ({}): {} shape at fret {} (target {})",
            progression.name,
            position + 1,
            step.name(),
            v.shape,
            v.root_fret,
            target
        );
    }
    chosen
}

/// Fixed-shape voicings for every position of the scale, skipping
/// positions without a playable voicing.
pub fn all_position_voicings(root: Note, scale_key: &str, tuning: &[Note]) -> Vec<ChordVoicing> {
    (0..position_count(scale_key))
        .filter_map(|p| select_voicing_for_position(root, scale_key, p, tuning))
        .collect()
}

/// Progression voicings for every position of the scale.
pub fn all_progression_voicings(
    root: Note,
    scale_key: &str,
    progression_key: &str,
    tuning: &[Note],
) -> Vec<ChordVoicing> {
    (0..position_count(scale_key))
        .filter_map(|p| {
            select_voicing_for_progression_step(root, scale_key, p, progression_key, tuning)
        })
        .collect()
}
