//! Plays an external UCI engine against a random mover.
//!
//! This project is grouped in a few broad modules:
//! - The board with its move generation and legality checks (`games`)
//! - The `Searcher`s that choose moves: a random mover and a UCI engine connector (`search`)
//! - The `Graphics` that show the game on their own thread (`ui`)
//! - The `BuiltInMatch` that owns the board and organizes all of this (`play`)

use std::fmt::{Display, Formatter};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};

use crate::games::chess::Chessboard;
use crate::general::common::Res;
use crate::output::{display_message, set_log_stream, Message, TextStream};
use crate::play::run_match::{BuiltInMatch, MatchConfig};
use crate::play::AnySearcher;
use crate::search::perft::split_perft;
use crate::search::random_mover::RandomMover;
use crate::search::uci_engine::UciEngine;
use crate::ui::no_graphic::NoGraphics;
use crate::ui::pretty::PrettyUI;
use crate::ui::text_ui::{DisplayType, TextUI};
use crate::ui::{AnyGraphics, Presentation};

pub mod games;
pub mod general;
pub mod output;
pub mod play;
pub mod search;
pub mod ui;

/// Lets a UCI engine play against a random mover, or counts positions with perft.
#[derive(Parser, Debug)]
#[command(name = "chess_duel", author = "ToTheAnd", version, about, long_about = None)]
pub struct CommandLineArgs {
    #[command(subcommand)]
    mode: Option<Mode>,
    #[command(flatten)]
    options: PlayOptions,
    /// Where to write diagnostics: 'stderr', 'stdout', or a file name.
    #[arg(long, default_value = "stderr", global = true)]
    log: String,
    /// Also print debug messages.
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Copy, Clone, Eq, PartialEq, Debug)]
pub enum Mode {
    /// Play one game. This is the default.
    Play,
    /// Count the leaves of the legal move tree of the start position.
    Perft {
        #[arg(long, default_value_t = 3)]
        depth: usize,
    },
}

#[derive(clap::Args, Debug, Clone)]
pub struct PlayOptions {
    #[arg(value_enum, long, global = true, default_value_t = PlayerKind::Engine)]
    white: PlayerKind,
    #[arg(value_enum, long, global = true, default_value_t = PlayerKind::Random)]
    black: PlayerKind,
    /// Path of the engine executable.
    #[arg(long, global = true, default_value = "stockfish")]
    engine: PathBuf,
    /// Additional arguments for the engine process, can be given multiple times.
    #[arg(long = "engine-arg", global = true, allow_hyphen_values = true)]
    engine_args: Vec<String>,
    /// Thinking time of the engine per move, in milliseconds.
    #[arg(long, global = true, default_value_t = 1000)]
    movetime: u64,
    /// Pause between two plies, in milliseconds.
    #[arg(long, global = true, default_value_t = 500)]
    delay: u64,
    /// End the game after this many plies.
    #[arg(long, global = true)]
    max_plies: Option<usize>,
    #[arg(value_enum, long, global = true, default_value_t = UiKind::Pretty)]
    ui: UiKind,
    /// Seed for the random mover. Without a seed, every game is different.
    #[arg(long, global = true)]
    seed: Option<u64>,
}

#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, ValueEnum, Default, Debug)]
pub enum PlayerKind {
    /// The external UCI engine.
    #[default]
    Engine,
    /// Chooses uniformly among all legal moves.
    Random,
}

#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, ValueEnum, Default, Debug)]
pub enum UiKind {
    None,
    Ascii,
    Unicode,
    Indices,
    Uci,
    #[default]
    Pretty,
}

impl Display for PlayerKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            PlayerKind::Engine => write!(f, "engine"),
            PlayerKind::Random => write!(f, "random"),
        }
    }
}

impl UiKind {
    fn create(self) -> AnyGraphics {
        match self {
            UiKind::None => Box::new(NoGraphics::default()),
            UiKind::Ascii => Box::new(TextUI::new(DisplayType::Ascii)),
            UiKind::Unicode => Box::new(TextUI::new(DisplayType::Unicode)),
            UiKind::Indices => Box::new(TextUI::new(DisplayType::Indices)),
            UiKind::Uci => Box::new(TextUI::new(DisplayType::Uci)),
            UiKind::Pretty => Box::new(PrettyUI::default()),
        }
    }
}

impl PlayOptions {
    fn create_player(&self, kind: PlayerKind, seed: Option<u64>) -> Res<AnySearcher> {
        Ok(match kind {
            PlayerKind::Random => match seed {
                Some(seed) => Box::new(RandomMover::seeded(seed)),
                None => Box::new(RandomMover::from_entropy()),
            },
            PlayerKind::Engine => Box::new(
                UciEngine::start(
                    &self.engine,
                    &self.engine_args,
                    Duration::from_millis(self.movetime),
                )
                .with_context(|| format!("Couldn't start the engine '{}'", self.engine.display()))?,
            ),
        })
    }

    fn match_config(&self) -> MatchConfig {
        MatchConfig {
            delay: Duration::from_millis(self.delay),
            max_plies: self.max_plies,
        }
    }
}

fn play(options: &PlayOptions) -> Res<()> {
    display_message(
        Message::Debug,
        &format!("White: {0}, black: {1}", options.white, options.black),
    );
    // if both sides play randomly with a fixed seed, they still shouldn't play the same moves
    let white = options.create_player(options.white, options.seed)?;
    let black = options.create_player(options.black, options.seed.map(|s| s.wrapping_add(1)))?;
    let presentation = Presentation::spawn(options.ui.create())?;
    let mut the_match = BuiltInMatch::new(white, black, presentation, options.match_config());
    let outcome = the_match.run()?;
    println!("{outcome}");
    Ok(())
}

fn perft(depth: usize) {
    let mut board = Chessboard::default();
    let color = board.active_player();
    println!("{}", split_perft(depth, &mut board, color));
}

pub fn run_program_with_args(args: CommandLineArgs) -> Res<()> {
    let stream = TextStream::from_name(&args.log)?;
    set_log_stream(stream, args.verbose);
    match args.mode.unwrap_or(Mode::Play) {
        Mode::Play => play(&args.options),
        Mode::Perft { depth } => {
            perft(depth);
            Ok(())
        }
    }
}

pub fn run_program() -> Res<()> {
    run_program_with_args(CommandLineArgs::parse())
}

/// Logs the error and returns the exit code.
pub fn report_error(err: &anyhow::Error) -> i32 {
    display_message(Message::Error, &format!("{err:#}"));
    1
}
