//! freqmod - FM synthesis image overlay
//!
//! Treats each image row as a modulating signal and writes the frequency
//! modulated result as PNG.

use clap::{ArgAction, Parser, Subcommand};
use freqmod_spec::params::{DEFAULT_OMEGA, DEFAULT_PHASE};
use freqmod_spec::SourceRange;
use std::process::ExitCode;

use freqmod_cli::commands;
use freqmod_cli::commands::params::ParamOverrides;

/// freqmod - Frequency modulation image overlay
#[derive(Parser)]
#[command(name = "freqmod")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace); RUST_LOG overrides
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply the FM overlay to an image and write a PNG
    Apply {
        /// Path to the input image
        #[arg(short, long)]
        input: String,

        /// Path of the output PNG
        #[arg(short, long)]
        output: String,

        /// Carrier frequency control in [0, 1] (default 0.1)
        #[arg(long)]
        omega: Option<f64>,

        /// Phase deviation control in [0, 1] (default 0.1)
        #[arg(long)]
        phase: Option<f64>,

        /// Lowpass amount; 0 disables, must stay below 0.5 (default 0)
        #[arg(long)]
        lowpass: Option<f64>,

        /// Post-quantization levels; 0 disables (default 0)
        #[arg(long)]
        pquantize: Option<u32>,

        /// Threshold in standard deviations; 0 disables (default 0)
        #[arg(long)]
        numdevs: Option<f64>,

        /// Process R, G and B independently instead of luminance
        #[arg(long)]
        colour: bool,

        /// Range intensities are mapped from (observed, full)
        #[arg(long)]
        source_range: Option<SourceRange>,

        /// JSON parameter file; explicit flags take precedence
        #[arg(long)]
        params: Option<String>,

        /// Output machine-readable JSON diagnostics (no colored output)
        #[arg(long)]
        json: bool,
    },

    /// Print the carrier and phase deviation parameters map to for a width
    Describe {
        /// Row width in pixels
        #[arg(short, long)]
        width: u32,

        /// Carrier frequency control
        #[arg(long, default_value_t = DEFAULT_OMEGA)]
        omega: f64,

        /// Phase deviation control
        #[arg(long, default_value_t = DEFAULT_PHASE)]
        phase: f64,

        /// Output machine-readable JSON diagnostics (no colored output)
        #[arg(long)]
        json: bool,
    },
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Apply {
            input,
            output,
            omega,
            phase,
            lowpass,
            pquantize,
            numdevs,
            colour,
            source_range,
            params,
            json,
        } => {
            let overrides = ParamOverrides {
                omega,
                phase,
                lowpass,
                pquantize,
                numdevs,
                colour,
                source_range,
            };
            commands::apply::run(&input, &output, params.as_deref(), &overrides, json)
        }
        Commands::Describe {
            width,
            omega,
            phase,
            json,
        } => commands::describe::run(width, omega, phase, json),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {:#}", colored::Colorize::red("error"), e);
            ExitCode::from(1)
        }
    }
}
