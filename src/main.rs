//! Pipe Dream CLI - terminal front end for the pipe puzzle
//!
//! Usage:
//!   pipe-dream play [--size N] [--seed S] [--config game.json]
//!   pipe-dream generate [--size N] [--seed S] [--solved]
//!   pipe-dream check <board.txt>

use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::PathBuf;
use std::thread;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use log::{info, LevelFilter};
use rand::rngs::StdRng;
use rand::SeedableRng;

use pipe_dream::{
    read_board, write_board, BoardGenerator, Command, GameConfig, Response, Session, P,
};

/// Rotate pipes until water can run from S to E
#[derive(Parser, Debug)]
#[command(name = "pipe-dream")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Play in the terminal
    Play {
        /// Board edge length (overrides the config file)
        #[arg(long)]
        size: Option<i32>,

        /// Random seed (overrides the config file)
        #[arg(long)]
        seed: Option<u64>,

        /// Game configuration file (JSON)
        #[arg(short, long, value_name = "CONFIG")]
        config: Option<PathBuf>,
    },
    /// Print a freshly generated board in the text format
    Generate {
        /// Board edge length (overrides the config file)
        #[arg(long)]
        size: Option<i32>,

        /// Random seed (overrides the config file)
        #[arg(long)]
        seed: Option<u64>,

        /// Game configuration file (JSON)
        #[arg(short, long, value_name = "CONFIG")]
        config: Option<PathBuf>,

        /// Print the board with the generated solution applied
        #[arg(long)]
        solved: bool,
    },
    /// Check whether a board file lets the water through
    Check {
        #[arg(value_name = "BOARD")]
        input: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.debug {
        LevelFilter::Debug
    } else if cli.verbose {
        LevelFilter::Info
    } else {
        LevelFilter::Warn
    };

    env_logger::Builder::new()
        .filter_level(log_level)
        .format_timestamp(None)
        .init();

    match cli.command {
        Commands::Play { size, seed, config } => cmd_play(size, seed, config),
        Commands::Generate {
            size,
            seed,
            config,
            solved,
        } => cmd_generate(size, seed, config, solved),
        Commands::Check { input } => cmd_check(input),
    }
}

/// Loads `config` (or the defaults) and applies the command line overrides.
fn load_config(config: Option<PathBuf>, size: Option<i32>, seed: Option<u64>) -> Result<GameConfig> {
    let mut config = match config {
        Some(path) => GameConfig::from_json_file(&path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => GameConfig::default(),
    };
    if let Some(size) = size {
        config.grid_size = size;
    }
    if seed.is_some() {
        config.seed = seed;
    }
    config.validate()?;
    Ok(config)
}

fn seeded_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

fn cmd_generate(
    size: Option<i32>,
    seed: Option<u64>,
    config: Option<PathBuf>,
    solved: bool,
) -> Result<()> {
    let config = load_config(config, size, seed)?;
    let generator = BoardGenerator::new(config.generator_option())?;
    let board = generator.generate(&mut seeded_rng(config.seed))?;
    let board = if solved {
        board.with_solution_rotations()
    } else {
        board
    };
    print!("{}", write_board(&board));
    Ok(())
}

fn cmd_check(input: PathBuf) -> Result<()> {
    let file = File::open(&input).with_context(|| format!("Failed to open {}", input.display()))?;
    let board = read_board(&mut BufReader::new(file))
        .with_context(|| format!("Failed to read board from {}", input.display()))?;

    print!("{}", board);
    match board.flow_path() {
        Some(path) => {
            let cells = path
                .iter()
                .map(|p| format!("({},{})", p.y(), p.x()))
                .collect::<Vec<_>>();
            println!("Connected: {}", cells.join(" -> "));
        }
        None => println!("Leak! The pipes don't connect to the end."),
    }
    Ok(())
}

fn cmd_play(size: Option<i32>, seed: Option<u64>, config: Option<PathBuf>) -> Result<()> {
    let config = load_config(config, size, seed)?;
    let interval = config.animation_interval();
    let mut session = Session::from_config(config)?;

    println!("Commands: r <row> <col> to rotate, flow, new, quit");
    print_session(&session)?;

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line?;
        let command = match parse_command(&line) {
            Ok(Some(command)) => command,
            Ok(None) => break,
            Err(err) => {
                println!("{}", err);
                continue;
            }
        };

        let mut response = session.handle(command)?;
        while let Some(index) = response.next_tick() {
            if let Response::Flowed(frame) = &response {
                println!("~ water reaches ({},{})", frame.pos.y(), frame.pos.x());
            }
            thread::sleep(interval);
            response = session.handle(Command::AnimationTick(index))?;
        }
        if response == Response::Ignored {
            info!("{:?} ignored", command);
        }
        print_session(&session)?;
    }
    Ok(())
}

/// `Ok(None)` means quit.
fn parse_command(line: &str) -> Result<Option<Command>> {
    let words = line.split_whitespace().collect::<Vec<_>>();
    let command = match words.as_slice() {
        ["q"] | ["quit"] => return Ok(None),
        ["flow"] | ["f"] => Command::StartFlow,
        ["new"] | ["n"] => Command::NewGame,
        ["r", row, col] | ["rotate", row, col] => {
            let row = row.parse::<i32>().with_context(|| format!("bad row {:?}", row))?;
            let col = col.parse::<i32>().with_context(|| format!("bad column {:?}", col))?;
            Command::RotateCell(P(row, col))
        }
        _ => bail!("unknown command {:?}", line.trim()),
    };
    Ok(Some(command))
}

fn print_session<R: rand::Rng>(session: &Session<R>) -> Result<()> {
    let board = session.board();
    let header = (0..board.size())
        .map(|x| (x % 10).to_string())
        .collect::<String>();
    println!("   {}", header);
    for (y, row) in board.to_string().lines().enumerate() {
        println!("{:2} {}", y, row);
    }
    println!("{}", session.status_text());
    io::stdout().flush()?;
    Ok(())
}
