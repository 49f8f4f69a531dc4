mod common;
mod logic;

use anyhow::{Context, Result, bail};
use chrono::Utc;
use clap::{Parser, ValueEnum};
use colored::Colorize;
use std::fs::File;
use std::io::{BufWriter, Write, stdout};
use std::path::PathBuf;
use std::time::Instant;

use common::{report_stamp, split_csv};
use hopeless_catch_game::{
    AnglerSettings, BaitKind, DEFAULT_ROOM, EmbeddedCatalog, FishingEngine, TimeOfDay,
    WeatherModifiers,
};
use logic::{SimulationConfig, SimulationResult, Strategy, resolve_seed_inputs, run_simulation};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    Console,
    Json,
    Markdown,
}

#[derive(Debug, Parser)]
#[command(name = "hopeless-catch-tester", version = "0.1.0")]
#[command(about = "Automated anglers that playtest the Hopeless Catch fishing core")]
struct Args {
    /// Strategies to run (comma-separated, or `all`)
    #[arg(long, default_value = "all")]
    strategies: String,

    /// List all available strategies and exit
    #[arg(long)]
    list_strategies: bool,

    /// Seeds to run (comma-separated, ranges as `start..end`)
    #[arg(long, default_value = "1337")]
    seeds: String,

    /// Casts per seed and strategy
    #[arg(long, default_value_t = 25)]
    attempts: u32,

    /// Bait to fish with, or `none` for an empty bait box
    #[arg(long, default_value = "worms")]
    bait: String,

    /// Room to fish in
    #[arg(long, default_value = DEFAULT_ROOM)]
    room: String,

    /// Fish at night
    #[arg(long)]
    night: bool,

    /// Peaceful mode (no horror species)
    #[arg(long)]
    peaceful: bool,

    /// Fish in the rain
    #[arg(long)]
    rain: bool,

    /// Wind speed for bite timing
    #[arg(long, default_value_t = 0.0)]
    wind: f32,

    /// Output report format
    #[arg(long, value_enum, default_value_t = ReportFormat::Console)]
    report: ReportFormat,

    /// Optional path to write the report output instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    if maybe_list_strategies(&args)? {
        return Ok(());
    }

    announce_banner(&args);

    let start_time = Instant::now();
    let strategies = expand_strategies(&args.strategies)?;
    let seeds = resolve_seed_inputs(&split_csv(&args.seeds))?;
    let settings = build_settings(&args)?;
    let engine = FishingEngine::new(EmbeddedCatalog).context("loading embedded fishing data")?;

    let mut results = Vec::with_capacity(strategies.len() * seeds.len());
    for strategy in &strategies {
        for &seed in &seeds {
            let config = SimulationConfig::new(*strategy, seed, settings.clone())
                .with_attempts(args.attempts);
            let result = run_simulation(&engine, &config)?;
            if args.verbose {
                print_run_line(&result);
            }
            results.push(result);
        }
    }

    write_report(&args, &results, start_time)?;

    if results.iter().any(|r| !r.passed()) {
        std::process::exit(1);
    }

    Ok(())
}

fn maybe_list_strategies(args: &Args) -> Result<bool> {
    if !args.list_strategies {
        return Ok(false);
    }
    let mut output_target = OutputTarget::new(args.output.clone())?;
    writeln!(output_target.writer(), "Available strategies:")?;
    for strategy in Strategy::ALL {
        writeln!(
            output_target.writer(),
            "  {:12} - {}",
            strategy.key(),
            strategy.description()
        )?;
    }
    output_target.flush_inner()?;
    Ok(true)
}

fn announce_banner(args: &Args) {
    println!("{}", "🎣 Hopeless Catch Automated Tester".bright_cyan().bold());
    println!("{}", "==================================".cyan());
    println!(
        "Room: {}  Time: {}  Peaceful: {}",
        args.room,
        if args.night { "night" } else { "day" },
        args.peaceful
    );
}

fn expand_strategies(arg: &str) -> Result<Vec<Strategy>> {
    let mut strategies = Vec::new();
    for token in split_csv(arg) {
        if token.eq_ignore_ascii_case("all") {
            strategies.extend(Strategy::ALL);
            continue;
        }
        match token.parse::<Strategy>() {
            Ok(strategy) => strategies.push(strategy),
            Err(err) => bail!(err),
        }
    }
    strategies.sort_unstable();
    strategies.dedup();
    if strategies.is_empty() {
        bail!("no strategies selected");
    }
    Ok(strategies)
}

fn build_settings(args: &Args) -> Result<AnglerSettings> {
    let selected_bait = if args.bait.eq_ignore_ascii_case("none") {
        None
    } else {
        Some(args.bait.parse::<BaitKind>()?)
    };
    let weather = WeatherModifiers {
        is_raining: args.rain,
        wind_speed: args.wind,
    };
    Ok(AnglerSettings {
        room: args.room.clone(),
        time_of_day: if args.night {
            TimeOfDay::Night
        } else {
            TimeOfDay::Day
        },
        peaceful: args.peaceful,
        selected_bait,
        weather,
    })
}

fn print_run_line(result: &SimulationResult) {
    let status = if result.passed() {
        "✅".green()
    } else {
        "❌".red()
    };
    println!(
        "{status} {:10} seed {:>6}: {} caught / {} cast, {} broken, {} abandoned",
        result.strategy.label(),
        result.seed,
        result.stats.catches,
        result.stats.casts,
        result.stats.lines_broken,
        result.abandoned
    );
}

fn write_report(args: &Args, results: &[SimulationResult], start_time: Instant) -> Result<()> {
    let mut output_target = OutputTarget::new(args.output.clone())?;
    match args.report {
        ReportFormat::Json => logic::reports::generate_json_report(&mut output_target, results)?,
        ReportFormat::Markdown => logic::reports::generate_markdown_report(
            &mut output_target,
            results,
            &report_stamp(Utc::now()),
        )?,
        ReportFormat::Console => logic::reports::generate_console_report(
            &mut output_target,
            results,
            start_time.elapsed(),
        )?,
    }
    output_target.flush_inner()?;
    Ok(())
}

enum OutputTarget {
    Stdout(BufWriter<std::io::Stdout>),
    File(BufWriter<File>),
}

impl OutputTarget {
    fn new(path: Option<PathBuf>) -> Result<Self> {
        if let Some(path) = path {
            let file = File::create(&path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            Ok(Self::File(BufWriter::new(file)))
        } else {
            Ok(Self::Stdout(BufWriter::new(stdout())))
        }
    }

    fn writer(&mut self) -> &mut dyn Write {
        match self {
            Self::Stdout(w) => w,
            Self::File(w) => w,
        }
    }

    fn flush_inner(&mut self) -> std::io::Result<()> {
        match self {
            Self::Stdout(w) => w.flush(),
            Self::File(w) => w.flush(),
        }
    }
}

impl Write for OutputTarget {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.writer().write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.flush_inner()
    }
}
