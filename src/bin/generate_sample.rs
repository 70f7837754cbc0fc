/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn next_range(&mut self, n: usize) -> usize {
        (self.next_u64() % n as u64) as usize
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

/// (model text, approximate list price when new)
const MODELS: &[(&str, f64)] = &[
    ("chevrolet silverado 1500", 34000.0),
    ("chevrolet malibu", 23000.0),
    ("chevrolet equinox", 26000.0),
    ("hyundai elantra", 20000.0),
    ("hyundai santa fe", 28000.0),
    ("hyundai sonata", 23000.0),
    ("toyota camry", 26000.0),
    ("toyota corolla", 21000.0),
    ("ford f-150", 38000.0),
    ("ford focus", 19000.0),
    ("honda civic", 22000.0),
    ("honda cr-v", 27000.0),
    ("nissan altima", 24000.0),
    ("ram 1500", 36000.0),
];

/// (condition, cumulative weight, price multiplier)
const CONDITIONS: &[(&str, f64, f64)] = &[
    ("new", 0.04, 1.10),
    ("like new", 0.20, 1.00),
    ("excellent", 0.52, 0.92),
    ("good", 0.82, 0.80),
    ("fair", 0.95, 0.60),
    ("salvage", 1.00, 0.30),
];

/// Newest model year in the synthetic catalog.
const LATEST_YEAR: i64 = 2024;

fn pick_condition(rng: &mut SimpleRng) -> (&'static str, f64) {
    let roll = rng.next_f64();
    for &(name, cumulative, multiplier) in CONDITIONS {
        if roll <= cumulative {
            return (name, multiplier);
        }
    }
    let &(name, _, multiplier) = CONDITIONS.last().unwrap();
    (name, multiplier)
}

fn main() {
    let mut rng = SimpleRng::new(42);
    let n_rows = 500;

    let output_path = "vehicles_us.csv";
    let mut writer = csv::Writer::from_path(output_path).expect("Failed to create output file");
    writer
        .write_record(["model", "model_year", "price", "odometer", "condition"])
        .expect("Failed to write header");

    let mut missing_years = 0usize;
    for _ in 0..n_rows {
        let (model, base_price) = MODELS[rng.next_range(MODELS.len())];
        let model_year = 1998 + rng.next_range((LATEST_YEAR - 1998 + 1) as usize) as i64;
        let age = (LATEST_YEAR - model_year) as f64;
        let (condition, multiplier) = pick_condition(&mut rng);

        let odometer = rng.gauss(12_000.0 * (age + 0.5), 9_000.0).clamp(0.0, 400_000.0);
        let price = (base_price * 0.88_f64.powf(age) * multiplier
            + rng.gauss(0.0, 900.0))
        .max(500.0);

        // A small share of listings has no model year.
        let year_cell = if rng.next_f64() < 0.02 {
            missing_years += 1;
            String::new()
        } else {
            model_year.to_string()
        };

        let price_cell = format!("{price:.0}");
        let odometer_cell = format!("{odometer:.0}");
        writer
            .write_record([
                model,
                year_cell.as_str(),
                price_cell.as_str(),
                odometer_cell.as_str(),
                condition,
            ])
            .expect("Failed to write row");
    }
    writer.flush().expect("Failed to flush output file");

    println!(
        "Wrote {n_rows} listings ({missing_years} with a missing model year) to {output_path}"
    );
}
