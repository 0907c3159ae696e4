//! Headless driver: protocol commands in as JSON lines, protocol events out as JSON lines.

use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::PathBuf;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::{Mutex, PoisonError};
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use sweeper_core::{CellCount, Coord, Difficulty, NewGame};
use sweeper_protocol::{Command, Driver, Event, Hints, RejectReason, from_json, to_json};

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq)]
enum Preset {
    #[default]
    Beginner,
    Intermediate,
    Expert,
}

impl Preset {
    fn difficulty(self) -> Difficulty {
        match self {
            Self::Beginner => Difficulty::Beginner,
            Self::Intermediate => Difficulty::Intermediate,
            Self::Expert => Difficulty::Expert,
        }
    }
}

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// What log level to use
    #[command(flatten)]
    verbose: clap_verbosity_flag::Verbosity,

    /// Board of the first game
    #[arg(short, long, value_enum, default_value_t)]
    difficulty: Preset,

    /// Rows of a custom board, the rest defaults to the chosen preset
    #[arg(long)]
    rows: Option<Coord>,

    /// Columns of a custom board
    #[arg(long)]
    cols: Option<Coord>,

    /// Mines of a custom board
    #[arg(long)]
    mines: Option<CellCount>,

    /// Force a seed instead of one from the clock
    #[arg(short, long)]
    seed: Option<u64>,

    /// Emit tick events from the wall clock every this many milliseconds
    #[arg(long)]
    tick_ms: Option<u64>,

    /// File with one JSON command per line, stdin when omitted
    input: Option<PathBuf>,
}

impl Args {
    fn difficulty(&self) -> Result<Difficulty> {
        let preset = self.difficulty.difficulty();
        if self.rows.is_none() && self.cols.is_none() && self.mines.is_none() {
            return Ok(preset);
        }

        let base = preset.config();
        let size = (
            self.rows.unwrap_or(base.rows()),
            self.cols.unwrap_or(base.cols()),
        );
        let mines = self.mines.unwrap_or(base.mines);
        Difficulty::custom(size, mines)
            .with_context(|| format!("Invalid custom board {size:?} with {mines} mines"))
    }

    fn new_game(&self) -> Result<NewGame> {
        let difficulty = self.difficulty()?;
        Ok(match self.seed {
            Some(seed) => NewGame::new(difficulty, seed),
            None => NewGame::seeded_from_clock(difficulty),
        })
    }
}

/// Serializes writers from the command loop and the ticker.
struct Output<W: Write> {
    writer: Mutex<W>,
}

impl<W: Write> Output<W> {
    fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    fn emit(&self, events: &[Event]) -> Result<()> {
        let mut writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        for event in events {
            writeln!(writer, "{}", to_json(event)?)?;
        }
        writer.flush().context("Could not write events")
    }

    fn into_inner(self) -> W {
        self.writer.into_inner().unwrap_or_else(PoisonError::into_inner)
    }
}

fn initial_events(driver: &Driver) -> Vec<Event> {
    driver.session().read(|session| {
        Vec::from([
            Event::Status {
                status: session.status(),
            },
            Event::Counters {
                moves: session.moves(),
                flags: session.flags(),
                mines_left: session.mines_left(),
            },
        ])
    })
}

/// Feeds every line of `input` to the driver. Blank lines are skipped, unparsable ones rejected.
fn run<W: Write>(driver: &Driver, input: impl BufRead, output: &Output<W>) -> Result<()> {
    output.emit(&initial_events(driver))?;
    for (number, line) in input.lines().enumerate() {
        let line = line.with_context(|| format!("Could not read line {}", number + 1))?;
        if line.trim().is_empty() {
            continue;
        }
        let events = match from_json::<Command>(&line) {
            Ok(command) => driver.handle(command),
            Err(err) => {
                log::warn!("Line {}: {err}", number + 1);
                Vec::from([Event::rejected(RejectReason::Malformed, err)])
            }
        };
        output.emit(&events)?;
    }
    Ok(())
}

/// Like [`run`], with a thread ticking the clock in the background until the input ends.
fn run_with_ticker<W: Write + Send>(
    driver: &Driver,
    input: impl BufRead,
    output: &Output<W>,
    interval: Duration,
) -> Result<()> {
    let (stop, stopped) = mpsc::channel::<()>();
    thread::scope(|scope| {
        let ticker = scope.spawn(move || -> Result<()> {
            while let Err(RecvTimeoutError::Timeout) = stopped.recv_timeout(interval) {
                if let Some(elapsed) = driver.session().tick_now() {
                    output.emit(&[Event::Tick {
                        elapsed_ms: elapsed.as_millis() as u64,
                    }])?;
                }
            }
            Ok(())
        });

        let result = run(driver, input, output);
        drop(stop);
        let ticked = ticker
            .join()
            .unwrap_or_else(|_| Err(anyhow::anyhow!("Ticker thread panicked")));
        result.and(ticked)
    })
}

fn main() -> Result<()> {
    let args = Args::parse();
    env_logger::Builder::new()
        .filter_level(args.verbose.log_level_filter())
        .init();

    let new_game = args.new_game()?;
    log::debug!(
        "Starting {} game with seed {}",
        new_game.difficulty.name(),
        new_game.seed
    );
    let driver = Driver::start(new_game, Hints::Absent)?;

    let input: Box<dyn BufRead> = match &args.input {
        Some(path) => Box::new(BufReader::new(
            File::open(path).with_context(|| format!("Could not open {}", path.display()))?,
        )),
        None => Box::new(io::stdin().lock()),
    };
    let output = Output::new(BufWriter::new(io::stdout()));

    match args.tick_ms {
        Some(millis) => run_with_ticker(&driver, input, &output, Duration::from_millis(millis)),
        None => run(&driver, input, &output),
    }
}
