use std::collections::BTreeMap;

use eframe::egui::{Color32, Stroke, Ui};
use egui_plot::{Bar, BarChart, BoxElem, BoxPlot, BoxSpread, Legend, Plot, Points};

use crate::color::generate_palette;
use crate::state::AppState;
use crate::ui::table;
use crate::views::ViewRequest;

// ---------------------------------------------------------------------------
// View-request dispatch
// ---------------------------------------------------------------------------

/// Render one composed view request into the central panel.
pub fn render_view(ui: &mut Ui, state: &AppState, request: &ViewRequest) {
    match request {
        ViewRequest::OdometerHistogram { rows } => odometer_histogram(ui, state, rows),
        ViewRequest::PriceScatter { rows } => price_scatter(ui, state, rows),
        ViewRequest::ListingTable { rows } => {
            ui.add_space(8.0);
            ui.strong("Filtered listings");
            table::listing_table(ui, state, rows);
        }
        ViewRequest::PriceComparison {
            first,
            second,
            rows,
        } => price_comparison(ui, state, first, second, rows),
    }
}

// ---------------------------------------------------------------------------
// Odometer histogram by condition, with marginal box summary
// ---------------------------------------------------------------------------

fn odometer_histogram(ui: &mut Ui, state: &AppState, rows: &[usize]) {
    let Some(dataset) = &state.dataset else {
        return;
    };

    // Group finite odometer readings by condition.
    let mut groups: BTreeMap<&str, Vec<f64>> = BTreeMap::new();
    for &i in rows {
        let listing = &dataset.listings[i];
        if listing.odometer.is_finite() {
            groups
                .entry(listing.condition.as_str())
                .or_default()
                .push(listing.odometer);
        }
    }

    ui.add_space(8.0);
    ui.strong("Odometer distribution by condition");

    let all: Vec<f64> = groups.values().flatten().copied().collect();
    let Some(layout) = BinLayout::from_values(&all, 40) else {
        ui.label("No odometer data in the current filter.");
        return;
    };

    let color_for = |condition: &str| {
        state
            .condition_colors
            .as_ref()
            .map(|cm| cm.color_for(condition))
            .unwrap_or(Color32::LIGHT_BLUE)
    };

    // Marginal per-condition box summary above the histogram.
    Plot::new("odometer_marginal")
        .height(26.0 + 26.0 * groups.len() as f32)
        .show_axes([true, false])
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            for (k, (condition, values)) in groups.iter().enumerate() {
                let Some((min, q1, median, q3, max)) = five_number_summary(values) else {
                    continue;
                };
                let color = color_for(condition);
                let elem = BoxElem::new(k as f64, BoxSpread::new(min, q1, median, q3, max))
                    .name(*condition)
                    .fill(color.gamma_multiply(0.4))
                    .stroke(Stroke::new(1.5, color));
                plot_ui.box_plot(BoxPlot::new(vec![elem]).name(*condition).horizontal());
            }
        });

    Plot::new("odometer_histogram")
        .legend(Legend::default())
        .x_axis_label("Odometer")
        .y_axis_label("Listings")
        .height(260.0)
        .show(ui, |plot_ui| {
            for (condition, values) in &groups {
                let color = color_for(condition);
                let bars = bars_for(&layout, values, color.gamma_multiply(0.75));
                plot_ui.bar_chart(BarChart::new(bars).name(*condition).color(color));
            }
        });
}

// ---------------------------------------------------------------------------
// Price vs odometer scatter
// ---------------------------------------------------------------------------

fn price_scatter(ui: &mut Ui, state: &AppState, rows: &[usize]) {
    let Some(dataset) = &state.dataset else {
        return;
    };

    // Points grouped by condition, plus per-point detail for hover labels.
    let mut groups: BTreeMap<&str, Vec<[f64; 2]>> = BTreeMap::new();
    let mut detail: Vec<(f64, f64, i64, String)> = Vec::new();
    for &i in rows {
        let listing = &dataset.listings[i];
        if listing.odometer.is_finite() && listing.price.is_finite() {
            groups
                .entry(listing.condition.as_str())
                .or_default()
                .push([listing.odometer, listing.price]);
            detail.push((
                listing.odometer,
                listing.price,
                listing.model_year,
                listing.model.clone(),
            ));
        }
    }

    ui.add_space(8.0);
    ui.strong("Price vs odometer");

    if detail.is_empty() {
        ui.label("No price/odometer data in the current filter.");
        return;
    }

    let (x_span, y_span) = spans(&detail);

    let color_for = |condition: &str| {
        state
            .condition_colors
            .as_ref()
            .map(|cm| cm.color_for(condition))
            .unwrap_or(Color32::LIGHT_BLUE)
    };

    Plot::new("price_scatter")
        .legend(Legend::default())
        .x_axis_label("Odometer")
        .y_axis_label("Price")
        .height(280.0)
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .label_formatter(move |name, value| {
            // Surface the nearest listing's model and year as hover detail.
            let nearest = detail
                .iter()
                .map(|p| {
                    let dx = (p.0 - value.x) / x_span;
                    let dy = (p.1 - value.y) / y_span;
                    (dx * dx + dy * dy, p)
                })
                .min_by(|(a, _), (b, _)| a.total_cmp(b));
            match nearest {
                Some((d2, (odometer, price, year, model))) if d2.sqrt() < 0.02 => {
                    format!("{model} ({year})\nodometer: {odometer:.0}\nprice: {price:.0}")
                }
                _ if !name.is_empty() => {
                    format!("{name}\nodometer: {:.0}\nprice: {:.0}", value.x, value.y)
                }
                _ => format!("odometer: {:.0}\nprice: {:.0}", value.x, value.y),
            }
        })
        .show(ui, |plot_ui| {
            for (condition, points) in groups {
                let color = color_for(condition);
                plot_ui.points(Points::new(points).name(condition).color(color).radius(2.0));
            }
        });
}

fn spans(detail: &[(f64, f64, i64, String)]) -> (f64, f64) {
    let mut x_min = f64::INFINITY;
    let mut x_max = f64::NEG_INFINITY;
    let mut y_min = f64::INFINITY;
    let mut y_max = f64::NEG_INFINITY;
    for (x, y, _, _) in detail {
        x_min = x_min.min(*x);
        x_max = x_max.max(*x);
        y_min = y_min.min(*y);
        y_max = y_max.max(*y);
    }
    let x_span = (x_max - x_min).max(f64::EPSILON);
    let y_span = (y_max - y_min).max(f64::EPSILON);
    (x_span, y_span)
}

// ---------------------------------------------------------------------------
// Overlaid price comparison for two manufacturers
// ---------------------------------------------------------------------------

fn price_comparison(ui: &mut Ui, state: &AppState, first: &str, second: &str, rows: &[usize]) {
    let Some(dataset) = &state.dataset else {
        return;
    };

    // Equal picks degenerate to a single group.
    let names: Vec<&str> = if first == second {
        vec![first]
    } else {
        vec![first, second]
    };

    let mut groups: Vec<(&str, Vec<f64>)> = names.iter().map(|n| (*n, Vec::new())).collect();
    for &i in rows {
        let listing = &dataset.listings[i];
        if !listing.price.is_finite() {
            continue;
        }
        if let Some(name) = listing.manufacturer.name() {
            if let Some((_, values)) = groups.iter_mut().find(|(n, _)| *n == name) {
                values.push(listing.price);
            }
        }
    }

    ui.add_space(4.0);
    ui.strong(format!("Price distribution: {first} vs {second}"));

    let all: Vec<f64> = groups.iter().flat_map(|(_, v)| v.iter().copied()).collect();
    let Some(layout) = BinLayout::from_values(&all, 40) else {
        ui.label("No priced listings for this comparison in the current filter.");
        return;
    };

    let palette = generate_palette(groups.len());

    Plot::new("price_comparison")
        .legend(Legend::default())
        .x_axis_label("Price")
        .y_axis_label("Listings")
        .height(260.0)
        .show(ui, |plot_ui| {
            for ((name, values), color) in groups.iter().zip(palette) {
                // Overlapping translucent bars, one chart per manufacturer.
                let bars = bars_for(&layout, values, color.gamma_multiply(0.6));
                plot_ui.bar_chart(BarChart::new(bars).name(*name).color(color));
            }
        });
}

// ---------------------------------------------------------------------------
// Binning and summary helpers
// ---------------------------------------------------------------------------

/// Shared equal-width bin layout so overlaid groups line up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct BinLayout {
    pub start: f64,
    pub width: f64,
    pub bins: usize,
}

impl BinLayout {
    /// Layout covering the finite values; `None` when there are none.
    pub(crate) fn from_values(values: &[f64], bins: usize) -> Option<Self> {
        let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
        if finite.is_empty() || bins == 0 {
            return None;
        }
        let min = finite.iter().copied().fold(f64::INFINITY, f64::min);
        let max = finite.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let span = max - min;
        let width = if span > 0.0 { span / bins as f64 } else { 1.0 };
        Some(BinLayout {
            start: min,
            width,
            bins,
        })
    }

    fn bin_of(&self, value: f64) -> usize {
        let raw = ((value - self.start) / self.width).floor();
        (raw.max(0.0) as usize).min(self.bins - 1)
    }

    fn center_of(&self, bin: usize) -> f64 {
        self.start + (bin as f64 + 0.5) * self.width
    }
}

/// Per-bin counts of the finite values.
pub(crate) fn bin_counts(layout: &BinLayout, values: &[f64]) -> Vec<usize> {
    let mut counts = vec![0usize; layout.bins];
    for &v in values {
        if v.is_finite() {
            counts[layout.bin_of(v)] += 1;
        }
    }
    counts
}

fn bars_for(layout: &BinLayout, values: &[f64], fill: Color32) -> Vec<Bar> {
    bin_counts(layout, values)
        .into_iter()
        .enumerate()
        .filter(|(_, count)| *count > 0)
        .map(|(bin, count)| {
            Bar::new(layout.center_of(bin), count as f64)
                .width(layout.width)
                .fill(fill)
        })
        .collect()
}

/// (min, q1, median, q3, max) of the finite values, with linear
/// interpolation between order statistics.
pub(crate) fn five_number_summary(values: &[f64]) -> Option<(f64, f64, f64, f64, f64)> {
    let mut sorted: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if sorted.is_empty() {
        return None;
    }
    sorted.sort_by(|a, b| a.total_cmp(b));

    let quantile = |q: f64| -> f64 {
        let pos = q * (sorted.len() - 1) as f64;
        let lo = pos.floor() as usize;
        let hi = pos.ceil() as usize;
        let frac = pos - lo as f64;
        sorted[lo] + (sorted[hi] - sorted[lo]) * frac
    };

    Some((
        sorted[0],
        quantile(0.25),
        quantile(0.5),
        quantile(0.75),
        sorted[sorted.len() - 1],
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bin_layout_spans_the_data() {
        let layout = BinLayout::from_values(&[0.0, 10.0, 100.0], 10).unwrap();
        assert_eq!(layout.start, 0.0);
        assert_eq!(layout.width, 10.0);

        let counts = bin_counts(&layout, &[0.0, 10.0, 100.0]);
        assert_eq!(counts.iter().sum::<usize>(), 3);
        assert_eq!(counts[0], 1); // 0.0
        assert_eq!(counts[1], 1); // 10.0
        assert_eq!(counts[9], 1); // max lands in the last bin
    }

    #[test]
    fn bin_layout_handles_constant_and_empty_data() {
        assert_eq!(BinLayout::from_values(&[], 10), None);
        assert_eq!(BinLayout::from_values(&[f64::NAN], 10), None);

        let layout = BinLayout::from_values(&[5.0, 5.0], 10).unwrap();
        let counts = bin_counts(&layout, &[5.0, 5.0]);
        assert_eq!(counts[0], 2);
    }

    #[test]
    fn nan_values_are_ignored_in_counts() {
        let layout = BinLayout::from_values(&[0.0, 10.0], 2).unwrap();
        let counts = bin_counts(&layout, &[0.0, f64::NAN, 10.0]);
        assert_eq!(counts.iter().sum::<usize>(), 2);
    }

    #[test]
    fn five_number_summary_is_ordered() {
        let (min, q1, median, q3, max) =
            five_number_summary(&[9.0, 1.0, 5.0, 3.0, 7.0]).unwrap();
        assert_eq!(min, 1.0);
        assert_eq!(median, 5.0);
        assert_eq!(max, 9.0);
        assert!(min <= q1 && q1 <= median && median <= q3 && q3 <= max);

        assert_eq!(five_number_summary(&[]), None);
        assert_eq!(
            five_number_summary(&[4.0]),
            Some((4.0, 4.0, 4.0, 4.0, 4.0))
        );
    }
}
