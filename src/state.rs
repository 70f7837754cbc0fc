use std::path::Path;
use std::sync::Arc;

use crate::color::ColorMap;
use crate::data::filter::{YearRange, filtered_indices, manufacturer_options, slider_bounds};
use crate::data::loader::DatasetCache;
use crate::data::model::VehicleDataset;
use crate::views::{ComparisonSelection, ViewToggles};

/// Fixed default dataset path, relative to the working directory.
pub const DEFAULT_DATA_PATH: &str = "vehicles_us.csv";

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full session state, independent of rendering: every control value
/// lives here explicitly, and each frame recomputes the derived views from
/// it.
pub struct AppState {
    /// Memoized datasets, keyed by source path.
    pub cache: DatasetCache,

    /// Loaded dataset (None until a load succeeds).
    pub dataset: Option<Arc<VehicleDataset>>,

    /// Selectable year bounds for the current dataset.
    pub slider_bounds: (i64, i64),

    /// User-chosen closed year interval.
    pub year_range: YearRange,

    /// Indices of listings passing the current year filter (cached).
    pub visible_indices: Vec<usize>,

    /// Sorted distinct manufacturers among the visible listings.
    pub manufacturer_options: Vec<String>,

    /// Dual-manufacturer comparison picks.
    pub selection: ComparisonSelection,

    /// Visibility toggles for the general-analysis views.
    pub toggles: ViewToggles,

    /// Colour per condition value.
    pub condition_colors: Option<ColorMap>,

    /// Load failure shown instead of the dashboard; rendering halts on it.
    pub load_error: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            cache: DatasetCache::new(),
            dataset: None,
            slider_bounds: (0, 0),
            year_range: YearRange { low: 0, high: 0 },
            visible_indices: Vec::new(),
            manufacturer_options: Vec::new(),
            selection: ComparisonSelection::default(),
            toggles: ViewToggles::default(),
            condition_colors: None,
            load_error: None,
        }
    }
}

impl AppState {
    /// Load the fixed default dataset.
    pub fn load_default(&mut self) {
        self.load_from(Path::new(DEFAULT_DATA_PATH));
    }

    /// Load (or re-fetch from cache) the dataset at `path`.
    pub fn load_from(&mut self, path: &Path) {
        match self.cache.load(path) {
            Ok(dataset) => {
                log::info!(
                    "Loaded {} listings from {}",
                    dataset.len(),
                    path.display()
                );
                self.set_dataset(dataset);
            }
            Err(e) => {
                log::error!("Failed to load dataset: {e}");
                self.dataset = None;
                self.load_error = Some(e.to_string());
            }
        }
    }

    /// Ingest a loaded dataset: reset the year range to the full selectable
    /// span, rebuild colours, refilter, and apply the default picks.
    pub fn set_dataset(&mut self, dataset: Arc<VehicleDataset>) {
        let malformed = dataset.malformed_count();
        if malformed > 0 {
            log::warn!("{malformed} listings have unparseable model text");
        }

        self.slider_bounds = slider_bounds(&dataset);
        self.year_range = YearRange::full(self.slider_bounds);
        self.condition_colors = Some(ColorMap::new(
            "condition",
            dataset.conditions.iter().map(|s| s.as_str()),
        ));
        self.dataset = Some(dataset);
        self.load_error = None;

        self.refilter();
        self.selection = ComparisonSelection::defaults(&self.manufacturer_options);
    }

    /// Apply new interval bounds; refilters only on an actual change.
    pub fn set_year_range(&mut self, low: i64, high: i64) {
        let range = YearRange::clamped(low, high, self.slider_bounds);
        if range != self.year_range {
            self.year_range = range;
            self.refilter();
        }
    }

    /// Recompute the visible rows and everything derived from them.
    pub fn refilter(&mut self) {
        if let Some(dataset) = &self.dataset {
            self.visible_indices = filtered_indices(dataset, self.year_range);
            self.manufacturer_options = manufacturer_options(dataset, &self.visible_indices);
            self.selection.retain_available(&self.manufacturer_options);
        }
    }

    /// Status line for the side panel.
    pub fn status_line(&self) -> Option<String> {
        self.dataset.as_ref().map(|dataset| {
            format!(
                "Showing {} of {} vehicles.",
                self.visible_indices.len(),
                dataset.len()
            )
        })
    }
}
