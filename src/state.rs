use std::collections::BTreeSet;
use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use product_dashboard::data::error::{DataLoadError, FilterSpecError};
use product_dashboard::data::filter::{FilterSpec, RatingRange};
use product_dashboard::data::model::LoadedDataset;
use product_dashboard::data::pipeline::{self, DashboardSnapshot};
use product_dashboard::data::store::DatasetStore;

use crate::color::ColorMap;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Load cache; reopening an unchanged file is free.
    pub store: DatasetStore,

    /// Loaded dataset (None until a file is opened).
    pub dataset: Option<Arc<LoadedDataset>>,

    /// Rating slider positions. Kept so that `min <= max`.
    pub min_rating: f64,
    pub max_rating: f64,

    /// Ticked categories. Empty means every category is shown.
    pub selected_categories: BTreeSet<String>,

    /// Pipeline output for the current filters.
    pub snapshot: Option<DashboardSnapshot>,

    /// Category colours, fixed per dataset.
    pub color_map: Option<ColorMap>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(RatingRange::default())
    }
}

impl AppState {
    pub fn new(range: RatingRange) -> Self {
        Self {
            store: DatasetStore::new(),
            dataset: None,
            min_rating: range.min(),
            max_rating: range.max(),
            selected_categories: BTreeSet::new(),
            snapshot: None,
            color_map: None,
            status_message: None,
        }
    }

    /// Load `path` through the store and make it the current dataset.
    /// On failure the previous dataset stays and the error is shown.
    pub fn open(&mut self, path: &Path) -> Result<(), DataLoadError> {
        match self.store.load(path) {
            Ok(dataset) => {
                self.set_dataset(dataset);
                Ok(())
            }
            Err(e) => {
                log::error!("Failed to load {}: {e}", path.display());
                self.status_message = Some(format!("Error: {e}"));
                Err(e)
            }
        }
    }

    /// Ingest a newly loaded dataset: select every category, rebuild colours
    /// and rerun the pipeline.
    pub fn set_dataset(&mut self, dataset: Arc<LoadedDataset>) {
        self.selected_categories = dataset.categories.iter().cloned().collect();
        self.color_map = Some(ColorMap::new(
            dataset.categories.iter().map(String::as_str),
        ));
        self.status_message = None;
        self.dataset = Some(dataset);
        self.rerun();
    }

    /// The filter request the widgets currently describe.
    pub fn filter_spec(&self) -> Result<FilterSpec, FilterSpecError> {
        FilterSpec::from_bounds(
            self.min_rating,
            self.max_rating,
            self.selected_categories.iter().cloned(),
        )
    }

    /// Recompute the snapshot from scratch after any input change.
    pub fn rerun(&mut self) {
        let Some(dataset) = &self.dataset else {
            return;
        };
        match self.filter_spec() {
            Ok(spec) => {
                self.snapshot = Some(pipeline::run(&dataset.records, &spec));
            }
            Err(e) => {
                log::warn!("Ignoring filter change: {e}");
                self.status_message = Some(format!("Invalid filter: {e}"));
            }
        }
    }

    /// Move the lower slider, dragging the upper one along if needed.
    pub fn set_min_rating(&mut self, value: f64) {
        self.min_rating = value;
        if self.max_rating < value {
            self.max_rating = value;
        }
        self.rerun();
    }

    /// Move the upper slider, dragging the lower one along if needed.
    pub fn set_max_rating(&mut self, value: f64) {
        self.max_rating = value;
        if self.min_rating > value {
            self.min_rating = value;
        }
        self.rerun();
    }

    /// Toggle a single category.
    pub fn toggle_category(&mut self, category: &str) {
        if !self.selected_categories.remove(category) {
            self.selected_categories.insert(category.to_string());
        }
        self.rerun();
    }

    /// Tick every category.
    pub fn select_all(&mut self) {
        if let Some(ds) = &self.dataset {
            self.selected_categories = ds.categories.iter().cloned().collect();
            self.rerun();
        }
    }

    /// Untick every category (which shows all of them).
    pub fn select_none(&mut self) {
        self.selected_categories.clear();
        self.rerun();
    }

    /// Write the current chart views as pretty-printed JSON.
    pub fn export_views(&self, path: &Path) -> anyhow::Result<()> {
        let snapshot = self
            .snapshot
            .as_ref()
            .context("no dataset loaded, nothing to export")?;
        let file = std::fs::File::create(path)
            .with_context(|| format!("creating {}", path.display()))?;
        serde_json::to_writer_pretty(file, &snapshot.views).context("writing chart views")?;
        log::info!("Exported chart views to {}", path.display());
        Ok(())
    }
}
