//! Report runner: load a housing CSV, run the analysis, render markdown.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;

use hedonic_core::data::Dataset;
use hedonic_core::pipeline::run_analysis;
use hedonic_core::{AnalysisOptions, LassoCvOptions, SelectionOptions};

mod render;

#[derive(Parser, Debug)]
#[command(
    name = "hedonic-report",
    version,
    about = "Bootstrap lasso variable selection and regression diagnostics for housing prices"
)]
struct Args {
    /// Path to the housing CSV file
    data: PathBuf,

    /// Response column name
    #[arg(short, long, default_value = "price")]
    response: String,

    /// Markdown output path (stdout if omitted)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Random seed for the split and the bootstrap
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Number of bootstrap resamples
    #[arg(short = 'b', long, default_value_t = 200)]
    bootstrap: usize,

    /// Survival frequency a predictor needs to be selected
    #[arg(short = 't', long, default_value_t = 0.8)]
    threshold: f64,

    /// Fraction of rows held out for evaluation
    #[arg(long, default_value_t = 0.2)]
    test_fraction: f64,

    /// Cross-validation folds within each resample
    #[arg(long, default_value_t = 5)]
    folds: usize,

    /// Significance cutoff for interaction partial F-tests
    #[arg(long, default_value_t = 0.05)]
    alpha: f64,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let options = AnalysisOptions {
        test_fraction: args.test_fraction,
        selection: SelectionOptions {
            n_bootstrap: args.bootstrap,
            survival_threshold: args.threshold,
            seed: args.seed,
            cv: LassoCvOptions {
                n_folds: args.folds,
                seed: args.seed,
                ..Default::default()
            },
        },
        interaction_alpha: args.alpha,
        confidence_level: 0.95,
        seed: args.seed,
    };

    let dataset = Dataset::from_csv(&args.data, &args.response)
        .with_context(|| format!("loading {}", args.data.display()))?;
    tracing::info!(rows = dataset.n_rows(), "dataset loaded");

    let report = run_analysis(&dataset, &options).context("analysis failed")?;
    let markdown = render::render_markdown(&report);

    match &args.output {
        Some(path) => std::fs::write(path, markdown)
            .with_context(|| format!("writing {}", path.display()))?,
        None => print!("{markdown}"),
    }

    Ok(())
}
