//! Benchmark runner for the matrix-vector kernels.

use std::io::IsTerminal;
use std::process::ExitCode;

use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use matvec::harness::{self, BenchConfig, OutputFormat};
use matvec::kernels::UnrollWidth;
use matvec::simd::IsaChoice;
use matvec::{Precision, VectorForm};

#[derive(Parser, Debug)]
#[command(name = "matvec")]
#[command(version)]
#[command(about = "Time one dense matrix-vector multiply under a chosen loop strategy")]
#[command(override_usage = "matvec [OPTIONS] [VARIANT] <N>\n       matvec [OPTIONS] --sizes <N>,<N>,...")]
#[command(allow_negative_numbers = true)]
#[command(after_help = "Variants:
  baseline     i-k loop order
  interchange  k-i loop order (demonstrates cache effects)
  unroll       manual loop unrolling (--unroll 4|8)
  vectorized   SIMD lanes, also accepted as 'avx2' (default)")]
struct Cli {
    /// Optional variant followed by the matrix dimension N
    #[arg(
        value_name = "[VARIANT] N",
        required_unless_present = "sizes",
        conflicts_with = "sizes",
        num_args = 1..=2
    )]
    args: Vec<String>,

    /// Compare every variant at each of these dimensions, e.g. 256,512,1024
    #[arg(long, value_name = "N,...", value_delimiter = ',')]
    sizes: Vec<String>,

    /// Element precision
    #[arg(long, value_enum, default_value_t = Precision::F64)]
    precision: Precision,

    /// Unroll width for the unroll variant
    #[arg(long, value_enum, default_value_t = UnrollWidth::Eight)]
    unroll: UnrollWidth,

    /// Instruction set for the vectorized variant
    #[arg(long, value_enum, default_value_t = IsaChoice::Auto)]
    isa: IsaChoice,

    /// Input vector formula: harmonic is 1/(i+1), shifted is 1/(i+2)
    #[arg(long, value_enum, default_value_t = VectorForm::Harmonic)]
    vector: VectorForm,

    /// Repeat the timed call R times and report the fastest
    #[arg(long, value_name = "R", default_value_t = 1)]
    repeat: usize,

    /// Run every variant on the same input and compare them
    #[arg(long)]
    compare: bool,

    /// Print results as JSON
    #[arg(long)]
    json: bool,

    /// Log to stderr (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn into_config(self) -> matvec::Result<BenchConfig> {
        let mut config = if self.sizes.is_empty() {
            BenchConfig::from_positionals(&self.args)?
        } else {
            BenchConfig::from_sizes(&self.sizes)?
        };
        config.precision = self.precision;
        config.unroll = self.unroll;
        config.isa = self.isa;
        config.vector = self.vector;
        config.repeat = self.repeat;
        config.compare |= self.compare;
        config.format = if self.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        };
        Ok(config)
    }
}

fn init_tracing(verbose: u8) -> Result<(), String> {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| format!("failed to set tracing subscriber: {e}"))
}

/// Runs the benchmark and writes results to stdout.
fn execute(config: &BenchConfig) -> matvec::Result<()> {
    if !config.sizes.is_empty() {
        let sweep = harness::sweep(config)?;
        println!("{}", sweep.render(config.format)?);
        sweep.verify()
    } else if config.compare {
        let comparison = harness::compare(config)?;
        println!("{}", comparison.render(config.format)?);
        comparison.verify()
    } else {
        let report = harness::run(config)?;
        println!("{}", report.render(config.format)?);
        Ok(())
    }
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            let _ = e.print();
            return ExitCode::SUCCESS;
        }
        Err(e) => {
            let _ = e.print();
            return ExitCode::from(1);
        }
    };

    if let Err(e) = init_tracing(cli.verbose) {
        eprintln!("{e}");
        return ExitCode::from(1);
    }

    let result = cli.into_config().and_then(|config| execute(&config));
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            if e.is_usage() {
                eprintln!("\n{}", Cli::command().render_usage());
            }
            ExitCode::from(1)
        }
    }
}
