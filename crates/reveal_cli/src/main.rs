//! Reveal CLI
//!
//! - `reveal ease <name>` prints an easing curve as tab-separated samples
//! - `reveal run` plays a scroll scenario against a headless scene and
//!   emits a JSON report

mod report;
mod runner;
mod scenario;
mod scene;

use anyhow::Result;
use clap::{Parser, Subcommand};
use reveal_animation::Easing;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Scroll-entry animation tools
#[derive(Parser, Debug)]
#[command(name = "reveal")]
#[command(about = "Inspect easing curves and run headless reveal scenarios")]
#[command(version)]
struct Cli {
    /// Raise log verbosity (-v debug, -vv trace). RUST_LOG takes precedence.
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print samples of an easing curve
    Ease {
        /// Easing name (linear, easeIn, easeOut, easeInOut, spring, bounce)
        name: String,

        /// Number of intervals between 0 and 1
        #[arg(short, long, default_value_t = 10)]
        samples: u32,
    },

    /// Run a scenario against a scene
    Run {
        /// Scene file (TOML)
        #[arg(long)]
        scene: PathBuf,

        /// Scenario file (JSON)
        #[arg(long)]
        scenario: PathBuf,

        /// Write the report to this file instead of stdout
        #[arg(long)]
        report: Option<PathBuf>,

        /// Simulated frame interval in milliseconds
        #[arg(long, default_value_t = 16.0)]
        frame_ms: f64,
    },
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Ease { name, samples } => {
            let easing: Easing = name.parse()?;
            let mut stdout = io::stdout().lock();
            print_curve(&mut stdout, easing, samples)?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Run {
            scene: scene_path,
            scenario: scenario_path,
            report,
            frame_ms,
        } => {
            let loaded_scene = scene::Scene::from_path(&scene_path)?;
            let loaded_scenario = scenario::Scenario::from_path(&scenario_path)?;
            tracing::info!(
                scene = %scene_path.display(),
                steps = loaded_scenario.steps.len(),
                "running scenario"
            );

            let outcome = runner::run(
                &loaded_scene,
                &loaded_scenario,
                runner::RunConfig { frame_ms },
            )?;

            match report {
                Some(path) => outcome.write_to_path(&path)?,
                None => outcome.write_to_writer(&mut io::stdout().lock())?,
            }

            if outcome.is_failed() {
                tracing::warn!(
                    step = outcome.failed_step_index,
                    reason = outcome.message.as_deref(),
                    "scenario failed"
                );
                Ok(ExitCode::FAILURE)
            } else {
                Ok(ExitCode::SUCCESS)
            }
        }
    }
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Write `samples + 1` evenly spaced points of `easing`
fn print_curve<W: Write>(out: &mut W, easing: Easing, samples: u32) -> Result<()> {
    let samples = samples.max(1);
    writeln!(out, "# {easing}")?;
    for i in 0..=samples {
        let t = i as f32 / samples as f32;
        writeln!(out, "{t:.3}\t{:.4}", easing.apply(t))?;
    }
    Ok(())
}
