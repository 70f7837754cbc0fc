use std::collections::BTreeSet;
use std::fmt;

// ---------------------------------------------------------------------------
// Manufacturer – categorical field derived from the model text
// ---------------------------------------------------------------------------

/// Manufacturer derived from the leading token of a listing's model text.
///
/// Derivation never drops a listing: model text without a usable token
/// (empty or all whitespace) is tagged [`Manufacturer::Malformed`] and kept
/// verbatim so the row stays visible in counts and the table, while never
/// contributing a selector option.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum Manufacturer {
    /// First whitespace-delimited token, first letter upper-cased, rest
    /// lower-cased (`"chevrolet silverado"` → `"Chevrolet"`).
    Derived(String),
    /// Raw model text that produced no token.
    Malformed(String),
}

impl Manufacturer {
    /// Derive the manufacturer from model text. Deterministic: the same
    /// input always yields the same tag.
    pub fn from_model(model: &str) -> Self {
        match model.split_whitespace().next() {
            Some(token) => Manufacturer::Derived(capitalize(token)),
            None => Manufacturer::Malformed(model.to_string()),
        }
    }

    /// The derived name, if derivation succeeded.
    pub fn name(&self) -> Option<&str> {
        match self {
            Manufacturer::Derived(name) => Some(name.as_str()),
            Manufacturer::Malformed(_) => None,
        }
    }
}

impl fmt::Display for Manufacturer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Manufacturer::Derived(name) => write!(f, "{name}"),
            Manufacturer::Malformed(_) => write!(f, "(malformed)"),
        }
    }
}

/// Upper-case the first letter, lower-case the rest.
fn capitalize(token: &str) -> String {
    let mut chars = token.chars();
    match chars.next() {
        Some(first) => {
            let mut out: String = first.to_uppercase().collect();
            out.push_str(&chars.as_str().to_lowercase());
            out
        }
        None => String::new(),
    }
}

// ---------------------------------------------------------------------------
// Listing – one row of the source table
// ---------------------------------------------------------------------------

/// A single vehicle listing (one row of the source table).
#[derive(Debug, Clone)]
pub struct Listing {
    /// Free-text model, e.g. `"toyota camry"`.
    pub model: String,
    /// Model year; 0 when the source cell is missing.
    pub model_year: i64,
    pub price: f64,
    pub odometer: f64,
    /// Categorical condition, e.g. `"good"`, `"excellent"`.
    pub condition: String,
    /// Derived exactly once, at construction.
    pub manufacturer: Manufacturer,
}

impl Listing {
    pub fn new(
        model: String,
        model_year: i64,
        price: f64,
        odometer: f64,
        condition: String,
    ) -> Self {
        let manufacturer = Manufacturer::from_model(&model);
        Listing {
            model,
            model_year,
            price,
            odometer,
            condition,
            manufacturer,
        }
    }
}

// ---------------------------------------------------------------------------
// VehicleDataset – the complete loaded dataset
// ---------------------------------------------------------------------------

/// The full parsed dataset. Immutable after load; filtering downstream
/// works on index vectors and never mutates the listings.
#[derive(Debug, Clone)]
pub struct VehicleDataset {
    /// All listings (rows), in source order.
    pub listings: Vec<Listing>,
    /// Sorted set of distinct condition values.
    pub conditions: BTreeSet<String>,
    year_min: i64,
    year_max: i64,
}

impl VehicleDataset {
    /// Build the dataset indices from the loaded listings.
    pub fn from_listings(listings: Vec<Listing>) -> Self {
        let mut conditions = BTreeSet::new();
        let mut year_min = i64::MAX;
        let mut year_max = i64::MIN;

        for listing in &listings {
            conditions.insert(listing.condition.clone());
            year_min = year_min.min(listing.model_year);
            year_max = year_max.max(listing.model_year);
        }
        if listings.is_empty() {
            year_min = 0;
            year_max = 0;
        }

        VehicleDataset {
            listings,
            conditions,
            year_min,
            year_max,
        }
    }

    /// Number of listings.
    pub fn len(&self) -> usize {
        self.listings.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.listings.is_empty()
    }

    /// Observed `model_year` min/max over all listings, including 0-years.
    pub fn observed_year_bounds(&self) -> (i64, i64) {
        (self.year_min, self.year_max)
    }

    /// Listings whose model text produced no manufacturer token.
    pub fn malformed_count(&self) -> usize {
        self.listings
            .iter()
            .filter(|l| matches!(l.manufacturer, Manufacturer::Malformed(_)))
            .count()
    }
}
