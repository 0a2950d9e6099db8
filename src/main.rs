use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use deltacurve::{export_samples, read_breakpoints, Curve};

#[derive(Parser, Debug)]
#[command(name = "deltacurve", about = "Piecewise-linear curve algebra over breakpoint files")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Evaluate a curve at one or more points.
    Eval {
        /// Breakpoint file (`x delta` per line).
        curve: PathBuf,
        /// Points to evaluate.
        #[arg(required = true)]
        points: Vec<f64>,
    },
    /// Report the minimum and maximum of a curve over an interval.
    Extrema {
        /// Breakpoint file (`x delta` per line).
        curve: PathBuf,
        /// Interval start.
        t_inf: f64,
        /// Interval end.
        t_sup: f64,
    },
    /// Clamp a curve against a constant and print the resulting breakpoints.
    Clamp {
        /// Breakpoint file (`x delta` per line).
        curve: PathBuf,
        /// Clamp level.
        level: f64,
        /// Clamp from below (`max(f, c)`) instead of from above.
        #[arg(long)]
        from_below: bool,
    },
    /// Export `(x, cumulative value)` samples for plotting.
    Export {
        /// Breakpoint file (`x delta` per line).
        curve: PathBuf,
        /// Output file, one `x y` pair per line.
        output: PathBuf,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Eval { curve, points } => {
            let curve = load_curve(&curve)?;
            for x in points {
                println!("{x}\t{}", curve.eval(x));
            }
        }
        Commands::Extrema { curve, t_inf, t_sup } => {
            let curve = load_curve(&curve)?;
            println!("min\t{}", curve.evaluate_min(t_inf, t_sup));
            println!("max\t{}", curve.evaluate_max(t_inf, t_sup));
        }
        Commands::Clamp {
            curve,
            level,
            from_below,
        } => {
            let mut curve = load_curve(&curve)?;
            if from_below {
                curve.max_assign(level);
            } else {
                curve.min_assign(level);
            }
            for (x, y) in curve.to_points() {
                println!("{x}\t{y}");
            }
        }
        Commands::Export { curve, output } => {
            let curve = load_curve(&curve)?;
            export_samples(&curve, &output)
                .with_context(|| format!("failed to export to {}", output.display()))?;
        }
    }

    Ok(())
}

fn load_curve(path: &PathBuf) -> Result<Curve> {
    read_breakpoints(path)
        .with_context(|| format!("failed to load curve from {}", path.display()))
}
