use super::model::VehicleDataset;

// ---------------------------------------------------------------------------
// Year-range filter
// ---------------------------------------------------------------------------

/// Selectable floor substituted when the observed minimum year is 0 or
/// negative (listings with a missing model year).
pub const YEAR_FLOOR: i64 = 1950;

/// Closed `model_year` interval chosen with the year controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearRange {
    pub low: i64,
    pub high: i64,
}

impl YearRange {
    /// The full selectable range for the given slider bounds.
    pub fn full(bounds: (i64, i64)) -> Self {
        YearRange {
            low: bounds.0,
            high: bounds.1,
        }
    }

    pub fn contains(&self, year: i64) -> bool {
        self.low <= year && year <= self.high
    }

    /// Clamp both ends into `bounds` and keep `low <= high`, pushing `high`
    /// up when the lower handle overtakes it.
    pub fn clamped(low: i64, high: i64, bounds: (i64, i64)) -> Self {
        let low = low.clamp(bounds.0, bounds.1);
        let high = high.clamp(low, bounds.1);
        YearRange { low, high }
    }
}

/// Bounds offered by the year controls: the observed min/max of
/// `model_year`, except that an observed minimum at or below zero is
/// replaced by [`YEAR_FLOOR`]. The substitution affects the selectable
/// range only; [`filtered_indices`] stays a strict interval test.
pub fn slider_bounds(dataset: &VehicleDataset) -> (i64, i64) {
    let (min, max) = dataset.observed_year_bounds();
    let low = if min <= 0 { YEAR_FLOOR } else { min };
    (low, max.max(low))
}

/// Indices of listings with `low <= model_year <= high`. Always a subset of
/// the dataset; recomputed whenever the range changes.
pub fn filtered_indices(dataset: &VehicleDataset, range: YearRange) -> Vec<usize> {
    dataset
        .listings
        .iter()
        .enumerate()
        .filter(|(_, listing)| range.contains(listing.model_year))
        .map(|(i, _)| i)
        .collect()
}

// ---------------------------------------------------------------------------
// Manufacturer views over the filtered rows
// ---------------------------------------------------------------------------

/// Sorted distinct manufacturer names among the given rows. Malformed
/// derivations contribute nothing.
pub fn manufacturer_options(dataset: &VehicleDataset, rows: &[usize]) -> Vec<String> {
    let mut options: Vec<String> = rows
        .iter()
        .filter_map(|&i| dataset.listings[i].manufacturer.name())
        .map(|name| name.to_string())
        .collect();
    options.sort();
    options.dedup();
    options
}

/// Rows (out of `rows`) whose manufacturer is `first` OR `second`.
pub fn comparison_indices(
    dataset: &VehicleDataset,
    rows: &[usize],
    first: &str,
    second: &str,
) -> Vec<usize> {
    rows.iter()
        .copied()
        .filter(|&i| {
            dataset.listings[i]
                .manufacturer
                .name()
                .is_some_and(|name| name == first || name == second)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
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
    fn filter_is_a_subset_matching_the_interval() {
        let ds = toy_dataset();
        let rows = filtered_indices(&ds, YearRange { low: 2015, high: 2020 });
        assert_eq!(rows, vec![0, 1, 3]); // 2010 corolla excluded
        assert!(rows.len() <= ds.len());
        for &i in &rows {
            assert!((2015..=2020).contains(&ds.listings[i].model_year));
        }
    }

    #[test]
    fn degenerate_interval_matches_exact_year() {
        let ds = toy_dataset();
        let rows = filtered_indices(&ds, YearRange { low: 2018, high: 2018 });
        assert_eq!(rows, vec![1]);
    }

    #[test]
    fn true_bounds_yield_the_whole_dataset() {
        let ds = toy_dataset();
        let (min, max) = ds.observed_year_bounds();
        let rows = filtered_indices(&ds, YearRange { low: min, high: max });
        assert_eq!(rows.len(), ds.len());
    }

    #[test]
    fn slider_floor_substitutes_for_missing_years() {
        let ds = VehicleDataset::from_listings(vec![
            Listing::new("gmc sierra".into(), 0, 7000.0, 150000.0, "fair".into()),
            Listing::new("ram 1500".into(), 2012, 14000.0, 80000.0, "good".into()),
        ]);
        assert_eq!(slider_bounds(&ds), (YEAR_FLOOR, 2012));

        // The floor changes the selectable range, not the filter: a range
        // that includes 0 still admits the 0-year row.
        let rows = filtered_indices(&ds, YearRange { low: 0, high: 2012 });
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn slider_bounds_follow_observed_years_when_positive() {
        let ds = toy_dataset();
        assert_eq!(slider_bounds(&ds), (2010, 2020));
    }

    #[test]
    fn range_clamping_keeps_low_at_most_high() {
        let bounds = (2010, 2020);
        let r = YearRange::clamped(2018, 2014, bounds);
        assert_eq!((r.low, r.high), (2018, 2018));
        let r = YearRange::clamped(1900, 2100, bounds);
        assert_eq!((r.low, r.high), (2010, 2020));
    }

    #[test]
    fn options_are_sorted_distinct_and_follow_the_filter() {
        let ds = toy_dataset();
        let all = filtered_indices(&ds, YearRange { low: 2010, high: 2020 });
        assert_eq!(
            manufacturer_options(&ds, &all),
            vec!["Ford", "Honda", "Toyota"]
        );

        // Narrowing the filter drops options that no longer occur.
        let narrowed = filtered_indices(&ds, YearRange { low: 2015, high: 2020 });
        assert_eq!(
            manufacturer_options(&ds, &narrowed),
            vec!["Ford", "Honda", "Toyota"]
        );
        let only_2010 = filtered_indices(&ds, YearRange { low: 2010, high: 2010 });
        assert_eq!(manufacturer_options(&ds, &only_2010), vec!["Toyota"]);
    }

    #[test]
    fn malformed_rows_never_become_options() {
        let ds = VehicleDataset::from_listings(vec![
            Listing::new("  ".into(), 2015, 9000.0, 60000.0, "fair".into()),
            Listing::new("kia rio".into(), 2016, 9500.0, 55000.0, "good".into()),
        ]);
        let rows = filtered_indices(&ds, YearRange { low: 2015, high: 2016 });
        assert_eq!(rows.len(), 2);
        assert_eq!(manufacturer_options(&ds, &rows), vec!["Kia"]);
    }

    #[test]
    fn comparison_selects_either_manufacturer() {
        let ds = toy_dataset();
        let rows = filtered_indices(&ds, YearRange { low: 2015, high: 2020 });
        let comp = comparison_indices(&ds, &rows, "Toyota", "Ford");
        assert_eq!(comp, vec![0, 3]); // camry + f150

        // Equal picks degenerate to a single-manufacturer subset.
        let same = comparison_indices(&ds, &rows, "Toyota", "Toyota");
        assert_eq!(same, vec![0]);
    }
}
