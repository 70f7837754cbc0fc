use crate::data::filter::comparison_indices;
use crate::data::model::VehicleDataset;

// ---------------------------------------------------------------------------
// View toggles
// ---------------------------------------------------------------------------

/// Visibility toggles for the general-analysis views.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewToggles {
    pub histogram: bool,
    pub scatter: bool,
    pub table: bool,
}

impl Default for ViewToggles {
    fn default() -> Self {
        ViewToggles {
            histogram: true,
            scatter: true,
            table: false,
        }
    }
}

// ---------------------------------------------------------------------------
// Dual-manufacturer selection
// ---------------------------------------------------------------------------

/// Two optional manufacturer picks for the price comparison. `None` is the
/// "none selected" sentinel shown first in each combo box.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComparisonSelection {
    pub first: Option<String>,
    pub second: Option<String>,
}

/// Selector phases. Transitions happen on any selector change; none are
/// blocked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComparisonPhase<'a> {
    /// Neither pick set.
    Idle,
    /// Exactly one pick set.
    Partial,
    /// Both picks set (they may be equal).
    Complete(&'a str, &'a str),
}

impl ComparisonSelection {
    /// First-render defaults: Chevrolet vs Hyundai when both occur among
    /// the options, sentinel otherwise (each pick independently).
    pub fn defaults(options: &[String]) -> Self {
        let pick = |name: &str| options.iter().find(|opt| opt.as_str() == name).cloned();
        ComparisonSelection {
            first: pick("Chevrolet"),
            second: pick("Hyundai"),
        }
    }

    pub fn phase(&self) -> ComparisonPhase<'_> {
        match (&self.first, &self.second) {
            (Some(a), Some(b)) => ComparisonPhase::Complete(a, b),
            (None, None) => ComparisonPhase::Idle,
            _ => ComparisonPhase::Partial,
        }
    }

    /// Reset any pick that is no longer among the offered options (the
    /// options track the filtered rows, so picks must too).
    pub fn retain_available(&mut self, options: &[String]) {
        let available = |pick: &Option<String>| {
            pick.as_ref()
                .map(|name| options.iter().any(|opt| opt == name))
                .unwrap_or(true)
        };
        if !available(&self.first) {
            self.first = None;
        }
        if !available(&self.second) {
            self.second = None;
        }
    }
}

// ---------------------------------------------------------------------------
// View requests
// ---------------------------------------------------------------------------

/// A view-request descriptor: what to draw over which rows. Pure data;
/// rendering is the `ui` layer's job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewRequest {
    /// Odometer distribution grouped/colored by condition, with a marginal
    /// per-condition box summary.
    OdometerHistogram { rows: Vec<usize> },
    /// Odometer (x) vs price (y) colored by condition; model year and
    /// model text surfaced as point-level detail.
    PriceScatter { rows: Vec<usize> },
    /// The filtered listings as a tabular grid.
    ListingTable { rows: Vec<usize> },
    /// Overlaid price distribution for two manufacturers.
    PriceComparison {
        first: String,
        second: String,
        rows: Vec<usize>,
    },
}

/// Outcome of the comparison section for the selector's three phases.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComparisonView {
    /// Nothing selected: no output.
    Hidden,
    /// One manufacturer picked: prompt for the second, no chart.
    ChooseSecond,
    Chart(ViewRequest),
}

/// Map the filtered rows and toggles to general-analysis view requests, in
/// stable presentation order: histogram, scatter, table.
pub fn compose_views(visible: &[usize], toggles: ViewToggles) -> Vec<ViewRequest> {
    let mut requests = Vec::new();
    if toggles.histogram {
        requests.push(ViewRequest::OdometerHistogram {
            rows: visible.to_vec(),
        });
    }
    if toggles.scatter {
        requests.push(ViewRequest::PriceScatter {
            rows: visible.to_vec(),
        });
    }
    if toggles.table {
        requests.push(ViewRequest::ListingTable {
            rows: visible.to_vec(),
        });
    }
    requests
}

/// Map the selector state to the comparison section's output. The chart is
/// produced if and only if both picks are set.
pub fn comparison_view(
    dataset: &VehicleDataset,
    visible: &[usize],
    selection: &ComparisonSelection,
) -> ComparisonView {
    match selection.phase() {
        ComparisonPhase::Idle => ComparisonView::Hidden,
        ComparisonPhase::Partial => ComparisonView::ChooseSecond,
        ComparisonPhase::Complete(first, second) => {
            let rows = comparison_indices(dataset, visible, first, second);
            ComparisonView::Chart(ViewRequest::PriceComparison {
                first: first.to_string(),
                second: second.to_string(),
                rows,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filter::{YearRange, filtered_indices, manufacturer_options};
    use crate::data::model::Listing;

    fn toy_dataset() -> VehicleDataset {
        VehicleDataset::from_listings(vec![
            Listing::new("toyota camry".into(), 2015, 12000.0, 50000.0, "good".into()),
            Listing::new("honda civic".into(), 2018, 15000.0, 30000.0, "excellent".into()),
            Listing::new("toyota corolla".into(), 2010, 8000.0, 90000.0, "fair".into()),
            Listing::new("ford f150".into(), 2020, 25000.0, 10000.0, "excellent".into()),
        ])
    }

    #[test]
    fn composed_views_keep_declaration_order() {
        let visible = vec![0, 1, 3];
        let all_on = ViewToggles {
            histogram: true,
            scatter: true,
            table: true,
        };
        let requests = compose_views(&visible, all_on);
        assert!(matches!(requests[0], ViewRequest::OdometerHistogram { .. }));
        assert!(matches!(requests[1], ViewRequest::PriceScatter { .. }));
        assert!(matches!(requests[2], ViewRequest::ListingTable { .. }));
    }

    #[test]
    fn toggles_gate_each_view_independently() {
        let visible = vec![0, 1];
        let only_table = ViewToggles {
            histogram: false,
            scatter: false,
            table: true,
        };
        let requests = compose_views(&visible, only_table);
        assert_eq!(
            requests,
            vec![ViewRequest::ListingTable { rows: vec![0, 1] }]
        );

        let none = ViewToggles {
            histogram: false,
            scatter: false,
            table: false,
        };
        assert!(compose_views(&visible, none).is_empty());
    }

    #[test]
    fn comparison_chart_requires_both_picks() {
        let ds = toy_dataset();
        let visible = filtered_indices(&ds, YearRange { low: 2015, high: 2020 });

        let idle = ComparisonSelection::default();
        assert_eq!(comparison_view(&ds, &visible, &idle), ComparisonView::Hidden);

        let partial = ComparisonSelection {
            first: Some("Toyota".into()),
            second: None,
        };
        assert_eq!(
            comparison_view(&ds, &visible, &partial),
            ComparisonView::ChooseSecond
        );
        // Same prompt regardless of which pick is missing.
        let partial = ComparisonSelection {
            first: None,
            second: Some("Ford".into()),
        };
        assert_eq!(
            comparison_view(&ds, &visible, &partial),
            ComparisonView::ChooseSecond
        );
    }

    #[test]
    fn complete_selection_yields_the_union_subset() {
        let ds = toy_dataset();
        let visible = filtered_indices(&ds, YearRange { low: 2015, high: 2020 });
        assert_eq!(visible.len(), 3);

        let both = ComparisonSelection {
            first: Some("Toyota".into()),
            second: Some("Ford".into()),
        };
        match comparison_view(&ds, &visible, &both) {
            ComparisonView::Chart(ViewRequest::PriceComparison { first, second, rows }) => {
                assert_eq!(first, "Toyota");
                assert_eq!(second, "Ford");
                assert_eq!(rows, vec![0, 3]); // camry + f150
            }
            other => panic!("expected a comparison chart, got {other:?}"),
        }
    }

    #[test]
    fn defaults_pick_chevrolet_and_hyundai_when_present() {
        let options: Vec<String> = ["Chevrolet", "Ford", "Hyundai", "Toyota"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let selection = ComparisonSelection::defaults(&options);
        assert_eq!(selection.first.as_deref(), Some("Chevrolet"));
        assert_eq!(selection.second.as_deref(), Some("Hyundai"));

        let selection = ComparisonSelection::defaults(&["Ford".to_string()]);
        assert_eq!(selection, ComparisonSelection::default());
    }

    #[test]
    fn stale_picks_reset_to_the_sentinel() {
        let ds = toy_dataset();

        // Ford only exists in 2020; narrow the filter past it.
        let narrowed = filtered_indices(&ds, YearRange { low: 2015, high: 2018 });
        let options = manufacturer_options(&ds, &narrowed);
        assert_eq!(options, vec!["Honda", "Toyota"]);

        let mut selection = ComparisonSelection {
            first: Some("Toyota".into()),
            second: Some("Ford".into()),
        };
        selection.retain_available(&options);
        assert_eq!(selection.first.as_deref(), Some("Toyota"));
        assert_eq!(selection.second, None);
        assert_eq!(selection.phase(), ComparisonPhase::Partial);
    }

    #[test]
    fn equal_picks_are_a_valid_complete_state() {
        let ds = toy_dataset();
        let visible = filtered_indices(&ds, YearRange { low: 2010, high: 2020 });
        let same = ComparisonSelection {
            first: Some("Toyota".into()),
            second: Some("Toyota".into()),
        };
        match comparison_view(&ds, &visible, &same) {
            ComparisonView::Chart(ViewRequest::PriceComparison { rows, .. }) => {
                assert_eq!(rows, vec![0, 2]);
            }
            other => panic!("expected a comparison chart, got {other:?}"),
        }
    }
}
