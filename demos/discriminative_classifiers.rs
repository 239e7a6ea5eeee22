//! Fits binary and multinomial logistic regression, a perceptron and a
//! one-component LDA, then prints both training accuracies and whether the
//! breast-cancer classes separate along Fisher's discriminant.
//!
//!
//! Without `--wine`, `data/wine_data.csv` is used when present and a fixed
//! synthetic three-class dataset otherwise.
//!
//! ```text
//! cargo run --example discriminative_classifiers -- --wine data/wine_data.csv
//! ```

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use linclass::walkthrough::{self, WalkthroughConfig};
use linclass::{Dataset, load_breast_cancer, load_wine};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "discriminative_classifiers")]
#[command(about = "Logistic regression, perceptron and Fisher's LDA on two classic datasets", long_about = None)]
struct Cli {
    /// Wine recognition data (bundled CSV layout or UCI wine.data)
    #[arg(long)]
    wine: Option<PathBuf>,

    /// Output path for the LDA projection histogram
    #[arg(long, default_value = "lda_projection.svg")]
    histogram: PathBuf,

    /// Number of histogram bins
    #[arg(long, default_value_t = 30)]
    bins: usize,

    /// Iteration cap for the binary logistic regression
    #[arg(long, default_value_t = 10_000)]
    binary_max_iter: usize,

    /// Iteration cap for the multinomial logistic regression
    #[arg(long, default_value_t = 1_000)]
    multiclass_max_iter: usize,

    /// Inverse regularization strength for both logistic regressions
    #[arg(short, default_value_t = 1e5)]
    c: f64,
}

const DEFAULT_WINE: &str = "data/wine_data.csv";

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn multiclass_dataset(wine: Option<&Path>) -> linclass::Result<Dataset> {
    match wine {
        Some(path) => load_wine(path),
        None if Path::new(DEFAULT_WINE).is_file() => load_wine(DEFAULT_WINE),
        None => {
            warn!(path = DEFAULT_WINE, "wine data not found, using the offline three-class dataset");
            walkthrough::offline_multiclass()
        }
    }
}

fn run(cli: Cli) -> linclass::Result<()> {
    let breast_cancer = load_breast_cancer()?;
    let multiclass = multiclass_dataset(cli.wine.as_deref())?;
    info!(
        breast_cancer = breast_cancer.n_samples(),
        multiclass = multiclass.n_samples(),
        "datasets loaded"
    );

    let config = WalkthroughConfig {
        binary_c: cli.c,
        binary_max_iter: cli.binary_max_iter,
        multiclass_c: cli.c,
        multiclass_max_iter: cli.multiclass_max_iter,
        histogram_bins: cli.bins,
        histogram_path: Some(cli.histogram),
        ..WalkthroughConfig::default()
    };

    let report = walkthrough::run(&breast_cancer, &multiclass, &config)?;
    for line in report.summary_lines() {
        println!("{line}");
    }

    if let Some(path) = &report.projection.histogram {
        info!(path = %path.display(), "histogram written");
    }

    Ok(())
}
