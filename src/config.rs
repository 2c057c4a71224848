use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use product_dashboard::data::filter::RatingRange;

/// Dataset opened at startup when no path is given and the file exists.
pub const DEFAULT_DATASET: &str = "dashboard/cleaned_amazon.csv";

// ---------------------------------------------------------------------------
// Command line
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(name = "product-dashboard")]
#[command(about = "Explore product listings by rating and category", long_about = None)]
pub struct Cli {
    /// Product dataset (.csv, .json or .parquet). Defaults to
    /// dashboard/cleaned_amazon.csv when that file exists.
    pub path: Option<PathBuf>,

    /// Lower bound of the initial rating filter.
    #[arg(long, default_value_t = 3.0)]
    pub min_rating: f64,

    /// Upper bound of the initial rating filter.
    #[arg(long, default_value_t = 5.0)]
    pub max_rating: f64,
}

impl Cli {
    /// The rating range the side panel starts with.
    pub fn initial_range(&self) -> anyhow::Result<RatingRange> {
        RatingRange::new(self.min_rating, self.max_rating)
            .context("invalid --min-rating/--max-rating")
    }

    /// Explicit path, else the default dataset if it is on disk.
    pub fn dataset_path(&self) -> Option<PathBuf> {
        self.path.clone().or_else(|| {
            let default = PathBuf::from(DEFAULT_DATASET);
            default.is_file().then_some(default)
        })
    }
}
