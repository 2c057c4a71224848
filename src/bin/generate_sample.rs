use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{Float64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use clap::Parser;
use parquet::arrow::ArrowWriter;

/// Write a synthetic product dataset (CSV and Parquet) for the dashboard.
#[derive(Parser)]
#[command(name = "generate-sample")]
struct Args {
    /// Number of product rows.
    #[arg(long, default_value_t = 600)]
    rows: usize,
    /// PRNG seed; the same seed always produces the same files.
    #[arg(long, default_value_t = 42)]
    seed: u64,
    /// Directory receiving products.csv and products.parquet.
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,
}

/// (category, relative frequency). More than ten so the top-10 cap shows.
const CATEGORIES: [(&str, u32); 13] = [
    ("Electronics|Mobiles&Accessories", 30),
    ("Computers&Accessories|Cables", 26),
    ("Home&Kitchen|Kitchen&Dining", 18),
    ("Electronics|Headphones", 14),
    ("Computers&Accessories|Keyboards&Mice", 12),
    ("Home&Kitchen|Heating,Cooling&AirQuality", 10),
    ("OfficeProducts|WritingSupplies", 8),
    ("Electronics|WearableTechnology", 7),
    ("MusicalInstruments|Microphones", 5),
    ("HomeImprovement|Electrical", 4),
    ("Toys&Games|Arts&Crafts", 3),
    ("Car&Motorbike|Accessories", 2),
    ("Health&PersonalCare|HomeMedicalSupplies", 1),
];

/// Every this many rows one cell is deliberately malformed.
const MALFORMED_EVERY: usize = 97;

/// SplitMix64 stream. Only reproducibility matters here, not quality.
struct SampleRng(u64);

impl SampleRng {
    fn new(seed: u64) -> Self {
        SampleRng(seed)
    }

    /// Uniform in `[0, 1)`.
    fn unit(&mut self) -> f64 {
        self.0 = self.0.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.0;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^= z >> 31;
        (z >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Normal sample via the polar Box-Muller method.
    fn normal(&mut self, mean: f64, sd: f64) -> f64 {
        loop {
            let u = 2.0 * self.unit() - 1.0;
            let v = 2.0 * self.unit() - 1.0;
            let s = u * u + v * v;
            if s > 0.0 && s < 1.0 {
                return mean + sd * u * (-2.0 * s.ln() / s).sqrt();
            }
        }
    }

    fn pick_weighted<'a>(&mut self, choices: &[(&'a str, u32)]) -> &'a str {
        let total: u32 = choices.iter().map(|(_, w)| w).sum();
        let mut remaining = self.unit() * f64::from(total);
        for (name, weight) in choices {
            remaining -= f64::from(*weight);
            if remaining < 0.0 {
                return *name;
            }
        }
        choices[choices.len() - 1].0
    }
}

/// One generated row, already in the raw text form the loader reads.
struct Row {
    product_id: String,
    product_name: String,
    category: String,
    rating: Option<f64>,
    rating_text: String,
    actual_price: f64,
    discounted_price: f64,
    discount_percentage: String,
}

fn generate_row(i: usize, rng: &mut SampleRng) -> Row {
    let category = rng.pick_weighted(&CATEGORIES).to_string();
    let leaf = category.rsplit('|').next().unwrap_or(&category).to_string();

    // Prices span several orders of magnitude (₹99 … ₹99,999).
    let actual_price = (10f64.powf(2.0 + rng.unit() * 3.0)).round().max(99.0);
    let discount = (rng.unit() * 90.0).round();
    let discounted_price = (actual_price * (1.0 - discount / 100.0)).round().max(1.0);
    let rating = ((rng.normal(4.1, 0.35).clamp(1.0, 5.0)) * 10.0).round() / 10.0;

    let mut row = Row {
        product_id: format!("P{:06}", i + 1),
        product_name: format!("{leaf} item #{}", i + 1),
        category,
        rating: Some(rating),
        rating_text: format!("{rating:.1}"),
        actual_price,
        discounted_price,
        discount_percentage: format!("{discount:.0}%"),
    };

    if i % MALFORMED_EVERY == MALFORMED_EVERY - 1 {
        if (i / MALFORMED_EVERY) % 2 == 0 {
            row.rating = None;
            row.rating_text = "|".to_string();
        } else {
            row.discount_percentage = format!("{discount:.0}");
        }
    }
    row
}

fn write_csv(path: &Path, rows: &[Row]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("creating {}", path.display()))?;
    writer.write_record([
        "product_id",
        "product_name",
        "category",
        "rating",
        "actual_price",
        "discounted_price",
        "discount_percentage",
    ])?;
    for r in rows {
        let actual = r.actual_price.to_string();
        let discounted = r.discounted_price.to_string();
        writer.write_record([
            r.product_id.as_str(),
            r.product_name.as_str(),
            r.category.as_str(),
            r.rating_text.as_str(),
            actual.as_str(),
            discounted.as_str(),
            r.discount_percentage.as_str(),
        ])?;
    }
    writer.flush().context("flushing CSV")?;
    Ok(())
}

fn write_parquet(path: &Path, rows: &[Row]) -> Result<()> {
    let strings = |f: fn(&Row) -> &str| -> StringArray {
        rows.iter().map(|r| Some(f(r))).collect()
    };

    let schema = Arc::new(Schema::new(vec![
        Field::new("product_id", DataType::Utf8, false),
        Field::new("product_name", DataType::Utf8, false),
        Field::new("category", DataType::Utf8, false),
        Field::new("rating", DataType::Float64, true),
        Field::new("actual_price", DataType::Float64, false),
        Field::new("discounted_price", DataType::Float64, false),
        Field::new("discount_percentage", DataType::Utf8, false),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(strings(|r| r.product_id.as_str())),
            Arc::new(strings(|r| r.product_name.as_str())),
            Arc::new(strings(|r| r.category.as_str())),
            Arc::new(rows.iter().map(|r| r.rating).collect::<Float64Array>()),
            Arc::new(Float64Array::from_iter_values(rows.iter().map(|r| r.actual_price))),
            Arc::new(Float64Array::from_iter_values(rows.iter().map(|r| r.discounted_price))),
            Arc::new(strings(|r| r.discount_percentage.as_str())),
        ],
    )
    .context("building record batch")?;

    let file = std::fs::File::create(path)
        .with_context(|| format!("creating {}", path.display()))?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing parquet batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    let mut rng = SampleRng::new(args.seed);

    let rows: Vec<Row> = (0..args.rows).map(|i| generate_row(i, &mut rng)).collect();

    std::fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("creating {}", args.out_dir.display()))?;
    let csv_path = args.out_dir.join("products.csv");
    let parquet_path = args.out_dir.join("products.parquet");

    write_csv(&csv_path, &rows)?;
    write_parquet(&parquet_path, &rows)?;

    let malformed = (0..args.rows)
        .filter(|i| i % MALFORMED_EVERY == MALFORMED_EVERY - 1)
        .count();
    log::info!("{malformed} row(s) carry a malformed cell on purpose");
    println!(
        "Wrote {} products to {} and {}",
        rows.len(),
        csv_path.display(),
        parquet_path.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_gives_same_rows() {
        let mut a = SampleRng::new(7);
        let mut b = SampleRng::new(7);
        for i in 0..50 {
            let (ra, rb) = (generate_row(i, &mut a), generate_row(i, &mut b));
            assert_eq!(ra.category, rb.category);
            assert_eq!(ra.rating_text, rb.rating_text);
            assert_eq!(ra.actual_price, rb.actual_price);
        }
    }

    #[test]
    fn unit_stays_in_half_open_interval() {
        let mut rng = SampleRng::new(0);
        assert!((0..10_000).map(|_| rng.unit()).all(|x| (0.0..1.0).contains(&x)));
    }

    #[test]
    fn weighted_pick_only_returns_known_categories() {
        let mut rng = SampleRng::new(42);
        for _ in 0..1_000 {
            let name = rng.pick_weighted(&CATEGORIES);
            assert!(CATEGORIES.iter().any(|(c, _)| *c == name));
        }
    }

    #[test]
    fn malformed_rows_appear_on_schedule() {
        let mut rng = SampleRng::new(1);
        let rows: Vec<Row> = (0..MALFORMED_EVERY * 2).map(|i| generate_row(i, &mut rng)).collect();
        assert_eq!(rows[MALFORMED_EVERY - 1].rating, None);
        assert!(!rows[2 * MALFORMED_EVERY - 1].discount_percentage.ends_with('%'));
        assert!(rows[0].discount_percentage.ends_with('%'));
    }
}
