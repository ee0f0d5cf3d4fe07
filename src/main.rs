//! Unbiased CSPRNG CLI
//!
//! Draws bounded values from the operating system CSPRNG and runs the
//! uniformity self-check. Results go to stdout, logs to stderr.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use tracing::{error, info, warn};
use unbiased_csprng::{
    analysis::{AnalysisError, UniformityCheck},
    config::FileConfig,
    metrics::{MetricsRegistry, MetricsSnapshot},
    BoundedWord, CountingRng, EntropyError, OsRng, RandomError, SecureRandom,
};

const EXIT_CHECK_FAILED: u8 = 1;
const EXIT_INVALID_ARGUMENT: u8 = 2;
const EXIT_ENTROPY_FAILURE: u8 = 3;

/// Uniform bounded random integers without modulo bias
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// TOML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print one uniform value in [0, BOUND]
    Generate {
        /// Inclusive upper bound, 0 to 2147483647
        #[arg(allow_hyphen_values = true)]
        bound: i64,

        /// Print -1 for an invalid bound instead of failing
        #[arg(long)]
        sentinel: bool,
    },

    /// Print one uniform value in [0, MAX] for a fixed-width word
    UpTo {
        /// Word width
        #[arg(short, long, value_enum, default_value_t = Width::U32)]
        width: Width,

        /// Inclusive upper bound, must fit the width
        max: u64,
    },

    /// Run the uniformity self-check against the OS entropy source
    Check {
        /// Inclusive bound to sample (overrides config)
        #[arg(long)]
        bound: Option<u32>,

        /// Number of generator calls (overrides config)
        #[arg(long)]
        draws: Option<u64>,

        /// Also print Prometheus metrics
        #[arg(long)]
        prometheus: bool,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Width {
    U8,
    U16,
    U32,
    U64,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => match FileConfig::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Failed to load config {}: {}", path.display(), e);
                return ExitCode::from(EXIT_INVALID_ARGUMENT);
            }
        },
        None => FileConfig::default(),
    };

    // RUST_LOG takes precedence over the config file
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.logging.filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match args.command {
        Commands::Generate { bound, sentinel } => run_generate(&config, bound, sentinel),
        Commands::UpTo { width, max } => run_up_to(&config, width, max),
        Commands::Check {
            bound,
            draws,
            prometheus,
        } => run_check(&config, bound, draws, prometheus),
    }
}

fn run_generate(config: &FileConfig, bound: i64, sentinel: bool) -> ExitCode {
    let mut rng = SecureRandom::with_config(OsRng, config.generator.clone());

    if sentinel {
        return match rng.generate_or_sentinel(bound) {
            Ok(value) => {
                println!("{}", value);
                ExitCode::SUCCESS
            }
            Err(e) => entropy_failure(&e),
        };
    }

    match rng.generate(bound) {
        Ok(value) => {
            println!("{}", value);
            ExitCode::SUCCESS
        }
        Err(RandomError::InvalidBound { .. }) => {
            eprintln!("Invalid bound: {}", bound);
            ExitCode::from(EXIT_INVALID_ARGUMENT)
        }
        Err(RandomError::Entropy(e)) => entropy_failure(&e),
    }
}

fn run_up_to(config: &FileConfig, width: Width, max: u64) -> ExitCode {
    let mut rng = SecureRandom::with_config(OsRng, config.generator.clone());

    let narrowed = match width {
        Width::U8 => u8::try_from(max).map(|max| print_up_to(&mut rng, max)),
        Width::U16 => u16::try_from(max).map(|max| print_up_to(&mut rng, max)),
        Width::U32 => u32::try_from(max).map(|max| print_up_to(&mut rng, max)),
        Width::U64 => Ok(print_up_to(&mut rng, max)),
    };

    narrowed.unwrap_or_else(|_| {
        eprintln!("Max {} does not fit in {:?}", max, width);
        ExitCode::from(EXIT_INVALID_ARGUMENT)
    })
}

fn print_up_to<T: BoundedWord>(rng: &mut SecureRandom<OsRng>, max: T) -> ExitCode {
    match rng.up_to(max) {
        Ok(value) => {
            println!("{}", value);
            ExitCode::SUCCESS
        }
        Err(e) => entropy_failure(&e),
    }
}

fn run_check(
    config: &FileConfig,
    bound: Option<u32>,
    draws: Option<u64>,
    prometheus: bool,
) -> ExitCode {
    let mut check_config = config.check.clone();
    if let Some(bound) = bound {
        check_config.bound = bound;
    }
    if let Some(draws) = draws {
        check_config.draws = draws;
    }
    if let Err(e) = check_config.validate() {
        eprintln!("Invalid check settings: {}", e);
        return ExitCode::from(EXIT_INVALID_ARGUMENT);
    }

    info!(
        bound = check_config.bound,
        draws = check_config.draws,
        "Running uniformity check against OS entropy"
    );

    let mut rng = SecureRandom::with_config(CountingRng::new(OsRng), config.generator.clone());
    let check = UniformityCheck::new(check_config.thresholds.clone());

    let report = match check.run(&mut rng, check_config.bound, check_config.draws) {
        Ok(report) => report,
        Err(AnalysisError::Random(RandomError::Entropy(e))) => return entropy_failure(&e),
        Err(e) => {
            eprintln!("Uniformity check could not run: {}", e);
            return ExitCode::from(EXIT_INVALID_ARGUMENT);
        }
    };

    println!("{}", report);

    let snapshot = MetricsSnapshot::from_components(&report, rng.source());
    info!(
        entropy_draws = snapshot.entropy_draws,
        rejection_ratio = snapshot.rejection_ratio(),
        "Entropy consumption"
    );

    if prometheus {
        let encoded = MetricsRegistry::new().and_then(|registry| {
            registry.update(&snapshot);
            registry.encode()
        });
        match encoded {
            Ok(text) => print!("\n{}", text),
            Err(e) => warn!("Failed to encode metrics: {}", e),
        }
    }

    if report.is_uniform() {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(EXIT_CHECK_FAILED)
    }
}

fn entropy_failure(e: &EntropyError) -> ExitCode {
    error!(error = %e, "Secure entropy source unavailable; refusing to fall back");
    eprintln!("{}", e);
    ExitCode::from(EXIT_ENTROPY_FAILURE)
}
