use clap::{Parser, Subcommand};

use quadlane::conformance::{self, ConformanceConfig};
use quadlane::simd_abstraction::{ActiveEngine, LaneEngine};
use quadlane::{ALIGNMENT, LANES, RCP_REL_TOLERANCE, SQRT_REL_TOLERANCE, backend_description};

#[derive(Parser)]
#[command(name = "quadlane")]
#[command(about = "quadlane - 4-lane f32/i32 vector vocabulary (SSE2 / NEON)", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the backend compiled into this binary
    Info,

    /// Check the compiled backend against the portable reference
    Selftest {
        /// Number of 4-lane samples
        #[arg(short = 'n', long, value_name = "INT", default_value = "100000")]
        samples: usize,

        /// RNG seed for sample generation
        #[arg(short = 's', long, value_name = "INT", default_value = "104372000528974")]
        seed: u64,

        /// Samples per parallel work unit
        #[arg(short = 'c', long, value_name = "INT", default_value = "4096")]
        chunk_size: usize,

        /// Number of threads (0 = all cores)
        #[arg(short = 't', long, value_name = "INT", default_value = "0")]
        threads: usize,
    },
}

fn init_logging(verbose: bool) {
    let level = if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    env_logger::Builder::from_default_env()
        .filter_level(level)
        .format_timestamp(None)
        .format_target(false)
        .init();
}

fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Info => {
            log::info!("Backend: {} [{}]", backend_description(), ActiveEngine::NAME);
            log::info!("Lanes: {} x f32 / {} x i32", LANES, LANES);
            log::info!("Aligned load/store boundary: {} bytes", ALIGNMENT);
            log::info!(
                "Estimate tolerance (relative): rcp {:e}, rsqrt/sqrt {:e}",
                RCP_REL_TOLERANCE,
                SQRT_REL_TOLERANCE
            );
            Ok(())
        }
        Commands::Selftest {
            samples,
            seed,
            chunk_size,
            threads,
        } => {
            let config = ConformanceConfig::new()
                .with_samples(samples)
                .with_seed(seed)
                .with_chunk_size(chunk_size)
                .with_threads(threads);

            let report = conformance::run(&config)
                .map_err(|e| anyhow::anyhow!("Self-test failed on {}: {}", ActiveEngine::NAME, e))?;

            log::info!(
                "{}: {} samples, {} lane checks OK",
                report.backend,
                report.samples,
                report.lane_checks
            );
            Ok(())
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli) {
        log::error!("{:#}", e);
        std::process::exit(1);
    }
}
