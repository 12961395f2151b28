//! Bingo Roulette CLI

use bingo_roulette::app::App;
use bingo_roulette::clock::ManualClock;
use bingo_roulette::config::Config;
use bingo_roulette::draw::{DrawOrchestrator, TriggerOutcome};
use bingo_roulette::export::export_cues;
use bingo_roulette::game::GameRange;
use bingo_roulette::rng::SeededSource;
use bingo_roulette::scene::Scene;
use bingo_roulette::tone::ToneGenerator;
use clap::{Parser, Subcommand};
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::Level;

#[derive(Parser)]
#[command(name = "bingo")]
#[command(about = "Bingo number caller with a roulette reveal", long_about = None)]
struct Cli {
    /// Config file (default: <config dir>/bingo-roulette/config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Write logs to this file (the interactive game logs nowhere otherwise)
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Play in the terminal (default)
    Play {
        /// Never open the audio device
        #[arg(long)]
        mute: bool,
    },

    /// Run draws headless on a simulated clock and print each number
    Simulate {
        /// Number of draw attempts (default: 75)
        #[arg(short, long, default_value = "75")]
        draws: usize,

        /// Seed for a reproducible sequence
        #[arg(short, long)]
        seed: Option<u64>,
    },

    /// Render the sound cues to WAV files
    Cues {
        /// Output directory
        out_dir: PathBuf,

        /// Sample rate in Hz (default: 44100)
        #[arg(short, long, default_value = "44100")]
        sample_rate: u32,
    },

    /// Print the effective configuration
    Config,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::Play { mute: false });
    let interactive = matches!(command, Commands::Play { .. });

    init_logging(cli.verbose, cli.log_file.as_deref(), interactive)?;

    let mut config = Config::load(cli.config.as_deref())?;

    match command {
        Commands::Play { mute } => {
            if mute {
                config.audio.enabled = false;
            }
            let mut app = App::from_config(&config);
            app.run()?;
        }

        Commands::Simulate { draws, seed } => simulate(&config, draws, seed),

        Commands::Cues {
            out_dir,
            sample_rate,
        } => {
            let files = export_cues(&out_dir, sample_rate)?;
            for file in files {
                println!("{}", file.display());
            }
        }

        Commands::Config => {
            print!("{}", config.to_toml()?);
        }
    }

    Ok(())
}

/// The terminal UI owns stdout, so interactive sessions only log to a file
fn init_logging(
    verbosity: u8,
    log_file: Option<&Path>,
    interactive: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let level = match verbosity {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };

    match log_file {
        Some(path) => {
            let file = File::create(path)?;
            tracing_subscriber::fmt()
                .with_max_level(level)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init()
                .map_err(|e| e.to_string())?;
        }
        None if interactive => {}
        None => {
            tracing_subscriber::fmt()
                .with_max_level(level)
                .with_writer(std::io::stderr)
                .try_init()
                .map_err(|e| e.to_string())?;
        }
    }
    Ok(())
}

/// Drive whole draw cycles by jumping a manual clock from deadline to deadline
fn simulate(config: &Config, draws: usize, seed: Option<u64>) {
    let clock = ManualClock::new();
    let rng = match seed {
        Some(seed) => SeededSource::from_seed(seed),
        None => SeededSource::from_entropy(),
    };
    let mut game = DrawOrchestrator::new(
        config.phase_table(),
        Box::new(clock.clone()),
        Box::new(rng),
    );
    let mut scene = Scene::new(
        GameRange::standard(),
        false,
        Box::new(SeededSource::from_seed(seed.unwrap_or(0))),
    );
    let tones = ToneGenerator::silent();

    for attempt in 1..=draws {
        let started_at = game.now();
        match game.trigger(&mut scene, &tones) {
            TriggerOutcome::Started { .. } => {}
            TriggerOutcome::Exhausted | TriggerOutcome::Ignored => break,
        }

        let mut committed = None;
        while committed.is_none() {
            let Some(due) = game.next_deadline() else {
                break;
            };
            clock.set(due);
            scene.advance(due);
            committed = game.poll(&mut scene, &tones);
        }

        if let Some(number) = committed {
            let took = game.now() - started_at;
            println!(
                "{:>3}: {:>2}   ({:.2}s reveal)",
                attempt,
                number,
                took.as_secs_f64()
            );
        }
    }

    // Let any delayed notice fire
    while let Some(due) = game.next_deadline() {
        clock.set(due);
        scene.advance(due);
        game.poll(&mut scene, &tones);
    }
    while let Some(notice) = scene.dismiss_notice() {
        println!("{}", notice.message());
    }

    let state = game.state();
    println!(
        "Drawn {} of {}, {} remaining",
        state.drawn().len(),
        state.range().max(),
        state.remaining()
    );
}
