mod commands;
mod config;
mod headless;
mod scene;

use std::error::Error;
use std::fs::File;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use simplelog::{
    ColorChoice, CombinedLogger, Config, LevelFilter, SharedLogger, TermLogger, TerminalMode,
    WriteLogger,
};

use crate::commands::{CoronaArgs, PackArgs, SampleArgs, StylesArgs};
use crate::config::LumenConfig;

#[derive(Parser)]
#[command(
    name = "lumen",
    about = "Light grid sampling, lightmap atlasing and coronas over a synthetic scene"
)]
struct Cli {
    /// TOML file with [lighting], [lightmaps] and [corona] sections
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,
    /// More log output (-v debug, -vv trace)
    #[arg(long, short, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    /// Only warnings and errors
    #[arg(long, short, global = true, conflicts_with = "verbose")]
    quiet: bool,
    /// Also write the log to this file
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Pack noise lightmap blocks into atlas textures
    Pack(PackArgs),
    /// Sample the light grid and dynamic lights at a point
    Sample(SampleArgs),
    /// Run the corona pass against a headless tracer
    Coronas(CoronaArgs),
    /// Register and sort super light styles for synthetic surfaces
    Styles(StylesArgs),
}

fn init_logging(verbose: u8, quiet: bool, log_file: Option<&PathBuf>) -> Result<(), Box<dyn Error>> {
    let level = match (quiet, verbose) {
        (true, _) => LevelFilter::Warn,
        (false, 0) => LevelFilter::Info,
        (false, 1) => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )];
    if let Some(path) = log_file {
        loggers.push(WriteLogger::new(
            level.max(LevelFilter::Debug),
            Config::default(),
            File::create(path)?,
        ));
    }
    CombinedLogger::init(loggers)?;
    Ok(())
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    init_logging(cli.verbose, cli.quiet, cli.log_file.as_ref())?;
    let mut config = match &cli.config {
        Some(path) => LumenConfig::load(path)?,
        None => LumenConfig::default(),
    };
    match &cli.command {
        Command::Pack(args) => commands::pack(&mut config, args),
        Command::Sample(args) => commands::sample(&config, args),
        Command::Coronas(args) => commands::coronas(&mut config, args),
        Command::Styles(args) => commands::styles(&mut config, args),
    }
}

fn main() {
    let cli = Cli::parse();
    if let Err(err) = run(cli) {
        eprintln!("error: {}", err);
        std::process::exit(1);
    }
}
