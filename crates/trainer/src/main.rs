//! Trainer CLI
//!
//! Drill opening lines from the terminal and keep the repertoire on disk.

use std::env;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process;

use anyhow::{bail, Context};
use drill_core::fen::is_likely_fen;
use drill_core::{compute_factors, Orientation, ShakmatyRules, TrainingSession};
use repertoire::{
    epoch, merge_variants, record_completed_round, store, to_variants, Clock, RepertoireSummary,
    SystemClock,
};
use tracing::info;
use tracing_subscriber::EnvFilter;
use trainer::{
    MoveSource, RoundDriver, RoundEvent, RoundOutcome, TrainerConfig, TrainingFilter,
    DEFAULT_CONFIG_PATH,
};

fn print_usage() {
    println!("ML-chess Opening Trainer");
    println!();
    println!("Usage:");
    println!("  trainer drill [--config F] [--seed N] [--orientation white|black] [--filter TEXT|FEN]");
    println!("  trainer stats [--config F] [--orientation white|black]");
    println!("  trainer add <pgn> [--config F] [--orientation white|black]");
    println!("  trainer remove <pgn> [--config F] [--orientation white|black]");
    println!();
    println!("While drilling, type moves as UCI (e2e4) or SAN (e4).");
    println!("Type 'quit' or send EOF to stop.");
    println!();
    println!("Examples:");
    println!("  trainer add \"1. e4 e5 2. Nf3 Nc6 3. Bb5\"");
    println!("  trainer drill --seed 7");
    println!("  trainer drill --filter \"Sicilian\"");
}

/// Flags shared by every command.
#[derive(Debug, Default)]
struct Args {
    config: Option<PathBuf>,
    seed: Option<u64>,
    orientation: Option<Orientation>,
    filter: Option<TrainingFilter>,
    positional: Vec<String>,
}

impl Args {
    fn parse(args: &[String]) -> anyhow::Result<Self> {
        let mut parsed = Args::default();
        let mut iter = args.iter();
        while let Some(arg) = iter.next() {
            match arg.as_str() {
                "--config" | "-c" => {
                    let value = iter.next().context("--config requires a path")?;
                    parsed.config = Some(PathBuf::from(value));
                }
                "--seed" => {
                    let value = iter.next().context("--seed requires a number")?;
                    parsed.seed = Some(
                        value
                            .parse()
                            .with_context(|| format!("invalid seed '{}'", value))?,
                    );
                }
                "--orientation" | "-o" => {
                    let value = iter.next().context("--orientation requires a side")?;
                    parsed.orientation = Some(value.parse().map_err(anyhow::Error::msg)?);
                }
                "--filter" | "-f" => {
                    let value = iter.next().context("--filter requires a classification or FEN")?;
                    parsed.filter = TrainingFilter::parse(value);
                }
                flag if flag.starts_with("--") => bail!("unknown option {}", flag),
                _ => parsed.positional.push(arg.clone()),
            }
        }
        Ok(parsed)
    }

    /// Configuration file merged with command-line overrides.
    fn config(&self) -> anyhow::Result<TrainerConfig> {
        let path = self
            .config
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));
        let mut config = TrainerConfig::load(&path)?;
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        if self.orientation.is_some() {
            config.orientation = self.orientation;
        }
        Ok(config)
    }
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Learner moves read line by line from stdin.
struct StdinSource {
    lines: io::Lines<io::StdinLock<'static>>,
}

impl StdinSource {
    fn new() -> Self {
        Self {
            lines: io::stdin().lock().lines(),
        }
    }
}

impl MoveSource for StdinSource {
    fn next_move(&mut self, position: &str, ply: usize) -> Option<String> {
        println!("{}", position);
        print!("{}{} your move: ", ply / 2 + 1, if ply % 2 == 0 { "." } else { "..." });
        io::stdout().flush().ok()?;

        let line = self.lines.next()?.ok()?;
        let line = line.trim();
        if line.eq_ignore_ascii_case("quit") {
            None
        } else {
            Some(line.to_string())
        }
    }

    fn notify(&mut self, event: RoundEvent<'_>) {
        match event {
            RoundEvent::OpponentMoved { mv, .. } => println!("Opponent plays {}", mv.san),
            RoundEvent::Hints(hints) => {
                for hint in hints {
                    match &hint.dest {
                        Some(dest) => println!("  hint: {}-{}", hint.orig, dest),
                        None => println!("  hint: {}", hint.orig),
                    }
                }
            }
            RoundEvent::Rejected { input } => {
                println!("'{}' is not in your repertoire, try again", input)
            }
            RoundEvent::Completed(completion) => {
                if completion.succeeded {
                    println!("Line complete, no mistakes.");
                } else {
                    println!(
                        "Line complete with mistakes; {} line(s) will come back sooner.",
                        completion.penalized.len()
                    );
                }
                println!();
            }
        }
    }
}

fn drill(args: &Args) -> anyhow::Result<()> {
    let config = args.config()?;
    init_logging(&config.log_level);

    let mut snapshot = store::load(&config.repertoire)?;
    epoch::normalize(&mut snapshot, SystemClock.today());

    let learner = config.orientation.unwrap_or_default();
    let mut variants = to_variants(&snapshot, Some(learner));
    if variants.is_empty() {
        println!(
            "No {} lines in {}. Add some with `trainer add`.",
            learner,
            config.repertoire.display()
        );
        return Ok(());
    }
    if let Some(filter) = &args.filter {
        variants = filter
            .apply(&ShakmatyRules, variants)
            .context("repertoire contains a broken line")?;
        if variants.is_empty() {
            println!("No {} lines match the filter.", learner);
            return Ok(());
        }
        info!(?filter, lines = variants.len(), "training set filtered");
    }

    let mut builder = TrainingSession::builder(variants)
        .with_weights(config.weights.unwrap_or(snapshot.weight_settings));
    if let Some(seed) = config.seed {
        builder = builder.with_seed(seed);
    }
    let mut session = builder.build().context("repertoire contains a broken line")?;

    let mut source = StdinSource::new();
    loop {
        let outcome = RoundDriver::new(&mut session, learner).play(&mut source)?;
        match outcome {
            RoundOutcome::Completed(_) => {
                merge_variants(&mut snapshot, session.variants());
                record_completed_round(&mut snapshot);
                store::save(&snapshot, &config.repertoire)?;
            }
            RoundOutcome::Abandoned => break,
            RoundOutcome::Reset(e) => println!("Round dropped ({}), starting over.", e),
        }
    }

    store::save(&snapshot, &config.repertoire)?;
    println!("Played {} line(s) today.", snapshot.daily_play_count);
    Ok(())
}

fn stats(args: &Args) -> anyhow::Result<()> {
    let config = args.config()?;
    init_logging(&config.log_level);

    let mut snapshot = store::load(&config.repertoire)?;
    epoch::normalize(&mut snapshot, SystemClock.today());
    if let Some(side) = config.orientation {
        snapshot.data.retain(|r| r.orientation == side);
    }

    let summary = RepertoireSummary::from_snapshot(&snapshot);
    println!("=== Repertoire: {} ===", config.repertoire.display());
    println!("Epoch:        {}", snapshot.current_epoch);
    println!("Lines:        {}", summary.total);
    println!("Played today: {}", summary.daily_count);
    println!(
        "Oldest:       {} day(s), {} line(s)",
        summary.oldest, summary.oldest_count
    );
    println!(
        "80th pct:     {} day(s), replay {} to improve",
        summary.eightieth, summary.eightieth_count
    );
    println!("Struggling:   {}", summary.errors_count);
    println!();

    let settings = config.weights.unwrap_or(snapshot.weight_settings).sanitized();
    let mut rows: Vec<_> = snapshot
        .data
        .iter()
        .map(|r| (compute_factors(&r.stats(), snapshot.current_epoch, &settings), r))
        .collect();
    rows.sort_by(|a, b| b.0.weight.total_cmp(&a.0.weight));

    println!("{:>10}  {:>6}  {:>6}  {}", "weight", "played", "errors", "line");
    for (factors, record) in rows {
        println!(
            "{:>10.1}  {:>6}  {:>6.2}  [{}] {}",
            factors.weight,
            record.number_of_times_played,
            record.error_ema,
            record.orientation,
            record.pgn
        );
    }
    Ok(())
}

fn add(args: &Args) -> anyhow::Result<()> {
    let config = args.config()?;
    init_logging(&config.log_level);

    let [pgn] = args.positional.as_slice() else {
        bail!("add takes exactly one line of moves, quote it");
    };
    if is_likely_fen(pgn) {
        bail!("expected move text such as \"1. e4 e5\", got a position");
    }
    let orientation = config.orientation.unwrap_or_default();

    let mut snapshot = store::load(&config.repertoire)?;
    if snapshot.add_variant(&ShakmatyRules, pgn, orientation)? {
        store::save(&snapshot, &config.repertoire)?;
        println!("Added {} line: {}", orientation, pgn.trim());
    } else {
        println!("Already in the repertoire: {}", pgn.trim());
    }
    Ok(())
}

fn remove(args: &Args) -> anyhow::Result<()> {
    let config = args.config()?;
    init_logging(&config.log_level);

    let [pgn] = args.positional.as_slice() else {
        bail!("remove takes exactly one line of moves, quote it");
    };
    let orientation = config.orientation.unwrap_or_default();

    let mut snapshot = store::load(&config.repertoire)?;
    match snapshot.remove_variant(pgn, orientation) {
        Some(record) => {
            store::save(&snapshot, &config.repertoire)?;
            println!(
                "Removed {} line: {} (played {} time(s))",
                orientation, record.pgn, record.number_of_times_played
            );
        }
        None => println!("Not in the repertoire: [{}] {}", orientation, pgn.trim()),
    }
    Ok(())
}

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        print_usage();
        return;
    }

    let command = args[1].as_str();
    let result = Args::parse(&args[2..]).and_then(|parsed| match command {
        "drill" => drill(&parsed),
        "stats" => stats(&parsed),
        "add" => add(&parsed),
        "remove" => remove(&parsed),
        "help" | "--help" | "-h" => {
            print_usage();
            Ok(())
        }
        _ => {
            print_usage();
            bail!("unknown command: {}", command)
        }
    });

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}
