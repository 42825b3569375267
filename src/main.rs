use caged_fretboard::diagram::{render_chord, render_neck};
use caged_fretboard::fretboard::{DisplayMode, FretboardState, ViewMode};
use caged_fretboard::pitch::root_fret;
use caged_fretboard::progressions::{
    chord_name_for_position, lookup_progression, resolve_step, PROGRESSIONS,
};
use caged_fretboard::scales::{lookup_scale, DEFAULT_FRET_COUNT, DEFAULT_SCALE_KEY, SCALES};
use caged_fretboard::selector::{
    select_voicing_for_position, select_voicing_for_progression_step,
};
use caged_fretboard::tunings::{load_custom, lookup_tuning, DEFAULT_TUNING_KEY, TUNINGS};
use caged_fretboard::types::*;
use caged_fretboard::FretboardError;

use clap::{Args, Parser, Subcommand, ValueEnum};
use log::{debug, error, info, warn};
use serde::Serialize;
use std::path::PathBuf;
use std::process;

#[derive(Parser)]
#[command(name = "caged-fretboard")]
#[command(about = "CAGED chord voicings and scale positions on the fretboard")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Args)]
struct Common {
    /// Root note (C, C#, Db, ... B)
    #[arg(long, default_value = "A")]
    root: String,

    /// Scale key, e.g. minorPentatonic, major, dorian
    #[arg(long, default_value = DEFAULT_SCALE_KEY)]
    scale: String,

    /// Built-in tuning key
    #[arg(long, default_value = DEFAULT_TUNING_KEY)]
    tuning: String,

    /// JSON tuning file; overrides --tuning
    #[arg(long)]
    tuning_file: Option<PathBuf>,

    /// Scale position, starting at 1. Omit for every position.
    #[arg(long)]
    position: Option<usize>,

    /// Number of frets on the neck
    #[arg(long, default_value_t = DEFAULT_FRET_COUNT)]
    frets: u8,

    /// Emit JSON instead of diagrams
    #[arg(long)]
    json: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Print the neck with the scale's notes
    Scale {
        #[command(flatten)]
        common: Common,

        /// What each note marker shows
        #[arg(long, value_enum, default_value_t = Labels::Notes)]
        display: Labels,

        /// Only show root, third and fifth
        #[arg(long)]
        chord_tones: bool,
    },
    /// Fixed-shape chord voicing per position
    Chord {
        #[command(flatten)]
        common: Common,
    },
    /// Progression chord and voicing per position
    Progression {
        #[command(flatten)]
        common: Common,

        /// Progression key, e.g. 1-4-5 or 2-5-1
        #[arg(long, default_value = "1-4-5")]
        progression: String,
    },
    /// List scales, tunings and progressions
    Catalog {
        #[arg(long)]
        json: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Labels {
    Notes,
    Intervals,
    Degrees,
}

impl From<Labels> for DisplayMode {
    fn from(d: Labels) -> Self {
        match d {
            Labels::Notes => DisplayMode::Notes,
            Labels::Intervals => DisplayMode::Intervals,
            Labels::Degrees => DisplayMode::Degrees,
        }
    }
}

// ─── Resolved arguments ─────────────────────────────────────────────────────

struct Context {
    root: Note,
    scale: &'static Scale,
    tuning_name: String,
    tuning: Vec<Note>,
    /// 0-based.
    position: Option<usize>,
    frets: u8,
    json: bool,
}

impl Context {
    fn resolve(common: &Common) -> Result<Self, FretboardError> {
        let root: Note = common.root.parse()?;
        let scale = lookup_scale(&common.scale)?;
        let (tuning_name, tuning) = match &common.tuning_file {
            Some(path) => {
                let t = load_custom(path)?;
                (t.name, t.notes)
            }
            None => {
                let t = lookup_tuning(&common.tuning)?;
                (t.name.to_string(), t.notes.to_vec())
            }
        };
        let count = scale.positions.len();
        let position = match common.position {
            None => None,
            Some(p) if (1..=count).contains(&p) => Some(p - 1),
            Some(p) => {
                return Err(FretboardError::PositionOutOfRange {
                    scale: scale.key.to_string(),
                    position: p,
                    count,
                })
            }
        };
        debug!(
            "root {} scale {} tuning {:?} position {:?}",
            root, scale.key, tuning_name, position
        );
        Ok(Self {
            root,
            scale,
            tuning_name,
            tuning,
            position,
            frets: common.frets,
            json: common.json,
        })
    }

    fn positions(&self) -> Vec<usize> {
        match self.position {
            Some(p) => vec![p],
            None => (0..self.scale.positions.len()).collect(),
        }
    }

    fn state(&self, view: ViewMode) -> FretboardState {
        FretboardState {
            root: self.root,
            scale: self.scale.key.to_string(),
            tuning: self.tuning.clone(),
            position: self.position,
            frets: self.frets,
            view,
            ..FretboardState::default()
        }
    }

    fn title(&self) -> String {
        format!("{} {} ({})", self.root, self.scale.name, self.tuning_name)
    }
}

// ─── JSON reports ───────────────────────────────────────────────────────────

#[derive(Serialize)]
struct ChordReport {
    position: usize,
    name: String,
    voicing: Option<ChordVoicing>,
}

#[derive(Serialize)]
struct ProgressionReport {
    position: usize,
    degree: usize,
    chord: String,
    voicing: Option<ChordVoicing>,
}

#[derive(Serialize)]
struct ScaleReport {
    state: FretboardState,
    window: Option<(i32, i32)>,
    notes: Vec<caged_fretboard::fretboard::Cell>,
}

#[derive(Serialize)]
struct Catalog {
    scales: Vec<CatalogEntry>,
    tunings: Vec<CatalogEntry>,
    progressions: Vec<CatalogEntry>,
}

#[derive(Serialize)]
struct CatalogEntry {
    key: &'static str,
    name: &'static str,
    detail: String,
}

fn print_json<T: Serialize>(value: &T) -> Result<(), FretboardError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

// ─── Subcommands ────────────────────────────────────────────────────────────

fn run_scale(ctx: &Context, display: Labels, chord_tones: bool) -> Result<(), FretboardError> {
    let state = FretboardState {
        display: display.into(),
        chord_tones_only: chord_tones,
        ..ctx.state(ViewMode::Scale)
    };
    if !state.has_visible_notes() {
        warn!("No chord tones visible in this window");
    }
    let window = ctx
        .position
        .and_then(|p| ctx.scale.window(p, root_fret(ctx.root, &ctx.tuning)));

    if ctx.json {
        let notes = state.grid().into_iter().flatten().filter(|c| c.visible).collect();
        return print_json(&ScaleReport {
            state,
            window,
            notes,
        });
    }

    println!("{}", ctx.title());
    if let (Some(p), Some((start, end))) = (ctx.position, window) {
        println!(
            "Position {}: frets {}-{}, {}",
            p + 1,
            start.max(0),
            end,
            chord_name_for_position(ctx.root, ctx.scale.key, p)
        );
    }
    println!();
    println!("{}", render_neck(&state));
    Ok(())
}

fn run_chord(ctx: &Context) -> Result<(), FretboardError> {
    let reports: Vec<ChordReport> = ctx
        .positions()
        .into_iter()
        .map(|p| ChordReport {
            position: p + 1,
            name: chord_name_for_position(ctx.root, ctx.scale.key, p),
            voicing: select_voicing_for_position(ctx.root, ctx.scale.key, p, &ctx.tuning),
        })
        .collect();

    if ctx.json {
        return print_json(&reports);
    }

    println!("{}", ctx.title());
    for r in &reports {
        println!();
        println!("Position {}: {}", r.position, r.name);
        match &r.voicing {
            Some(v) => {
                println!("{}", v);
                println!("{}", render_chord(v, &ctx.tuning));
            }
            None => println!("  (no voicing fits this position)"),
        }
    }
    Ok(())
}

fn run_progression(ctx: &Context, key: &str) -> Result<(), FretboardError> {
    let progression = lookup_progression(key)?;
    info!("{} {}: {}", progression.name, ctx.title(), progression.description);

    let reports: Vec<ProgressionReport> = ctx
        .positions()
        .into_iter()
        .filter_map(|p| {
            let step = resolve_step(ctx.root, ctx.scale.key, p, progression)?;
            Some(ProgressionReport {
                position: p + 1,
                degree: step.degree,
                chord: step.name(),
                voicing: select_voicing_for_progression_step(
                    ctx.root,
                    ctx.scale.key,
                    p,
                    key,
                    &ctx.tuning,
                ),
            })
        })
        .collect();

    if ctx.json {
        return print_json(&reports);
    }

    println!("{} in {}", progression.name, ctx.title());
    for r in &reports {
        println!();
        println!("Position {}: {} (degree {})", r.position, r.chord, r.degree);
        match &r.voicing {
            Some(v) => {
                println!("{}", v);
                println!("{}", render_chord(v, &ctx.tuning));
            }
            None => println!("  (no voicing fits this position)"),
        }
    }
    Ok(())
}

fn run_catalog(json: bool) -> Result<(), FretboardError> {
    let catalog = Catalog {
        scales: SCALES
            .iter()
            .map(|s| CatalogEntry {
                key: s.key,
                name: s.name,
                detail: format!("{} positions", s.positions.len()),
            })
            .collect(),
        tunings: TUNINGS
            .iter()
            .map(|t| CatalogEntry {
                key: t.key,
                name: t.name,
                detail: InstrumentType::from_string_count(t.string_count())
                    .map(|i| i.display_name().to_string())
                    .unwrap_or_default(),
            })
            .collect(),
        progressions: PROGRESSIONS
            .iter()
            .map(|p| CatalogEntry {
                key: p.key,
                name: p.name,
                detail: p.description.to_string(),
            })
            .collect(),
    };

    if json {
        return print_json(&catalog);
    }
    for (title, entries) in [
        ("Scales", &catalog.scales),
        ("Tunings", &catalog.tunings),
        ("Progressions", &catalog.progressions),
    ] {
        println!("{}:", title);
        for e in entries {
            println!("  {:<22} {:<40} {}", e.key, e.name, e.detail);
        }
        println!();
    }
    Ok(())
}

fn run(cli: Cli) -> Result<(), FretboardError> {
    match cli.command {
        Command::Scale {
            common,
            display,
            chord_tones,
        } => run_scale(&Context::resolve(&common)?, display, chord_tones),
        Command::Chord { common } => run_chord(&Context::resolve(&common)?),
        Command::Progression {
            common,
            progression,
        } => run_progression(&Context::resolve(&common)?, &progression),
        Command::Catalog { json } => run_catalog(json),
    }
}

fn main() {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("info"),
    )
    .format_timestamp_millis()
    .init();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        error!("{}", e);
        process::exit(1);
    }
}
