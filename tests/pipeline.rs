use std::collections::BTreeSet;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use arrow::array::{Float64Array, StringArray};
use arrow::datatypes::{DataType, Field as ArrowField, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use tempfile::NamedTempFile;

use product_dashboard::data::chart::TOP_CATEGORY_LIMIT;
use product_dashboard::data::filter::{apply, FilterSpec, RatingRange};
use product_dashboard::data::loader::load_file;
use product_dashboard::data::model::{ProductRecord, RecordSet};
use product_dashboard::data::pipeline::run;
use product_dashboard::data::rank::{top_n, CategoryCount};
use product_dashboard::data::store::DatasetStore;

fn record(category: &str, rating: f64) -> ProductRecord {
    ProductRecord {
        product_id: None,
        product_name: None,
        category: category.to_string(),
        rating,
        actual_price: 1200.0,
        discounted_price: 900.0,
        discount_percentage: 25.0,
    }
}

/// 12 records: A×5, B×4, C×3. With ratings in [3, 5] A keeps 3, B keeps 3
/// and C keeps 2.
fn twelve_records() -> RecordSet {
    RecordSet::new(vec![
        record("A", 4.0),
        record("B", 4.0),
        record("C", 3.1),
        record("A", 4.5),
        record("B", 3.0),
        record("A", 3.5),
        record("C", 4.2),
        record("B", 4.9),
        record("A", 2.0),
        record("B", 2.5),
        record("C", 1.5),
        record("A", 1.0),
    ])
}

#[test]
fn test_ranking_is_recomputed_on_the_filtered_records() {
    let records = twelve_records();
    let spec = FilterSpec::new(RatingRange::new(3.0, 5.0).unwrap(), BTreeSet::new());

    let snap = run(&records, &spec);

    assert_eq!(snap.filtered.len(), 8);
    assert_eq!(
        snap.top_categories,
        vec![
            CategoryCount::new("A", 3),
            CategoryCount::new("B", 3),
            CategoryCount::new("C", 2),
        ]
    );
    // On the unfiltered 12 the counts would have been 5/4/3.
    assert_eq!(top_n(&records, TOP_CATEGORY_LIMIT)[0].count, 5);
    assert_eq!(snap.views.rating_distribution.values.len(), 8);
    assert_eq!(snap.views.price_comparison.points.len(), 8);
}

#[test]
fn test_unknown_category_empties_every_view() {
    let records = twelve_records();
    let spec = FilterSpec::from_bounds(0.0, 5.0, vec!["X".to_string()]).unwrap();

    let snap = run(&records, &spec);

    assert!(snap.filtered.is_empty());
    assert!(snap.top_categories.is_empty());
    assert!(snap.views.price_comparison.points.is_empty());
    assert!(snap.views.rating_distribution.values.is_empty());
    assert!(snap.views.discount_vs_rating.points.is_empty());
    assert!(snap.views.top_categories.entries.is_empty());
}

#[test]
fn test_empty_category_set_equals_no_category_predicate() {
    let records = twelve_records();
    let range = RatingRange::new(2.0, 4.5).unwrap();

    let empty = apply(&records, &FilterSpec::new(range, BTreeSet::new()));
    let every_category = apply(&records, &FilterSpec::new(range, records.categories()));

    assert_eq!(empty, every_category);
    assert_eq!(empty.len(), 9);
}

#[test]
fn test_filter_is_idempotent_across_specs() {
    let records = twelve_records();
    let specs = [
        FilterSpec::default(),
        FilterSpec::new(RatingRange::full(), BTreeSet::new()),
        FilterSpec::from_bounds(1.0, 3.0, vec!["A".into(), "C".into()]).unwrap(),
        FilterSpec::from_bounds(5.0, 5.0, Vec::new()).unwrap(),
    ];
    for spec in &specs {
        let once = apply(&records, spec);
        assert_eq!(apply(&once, spec), once);
        assert!(once.iter().all(|r| records.iter().any(|orig| orig == r)));
    }
}

// ---------------------------------------------------------------------------
// Loading through files
// ---------------------------------------------------------------------------

const CSV: &str = "\
product_id,product_name,category,rating,actual_price,discounted_price,discount_percentage
p1,Cable,Electronics,4.2,1099,399,64%
p2,Mug,Home,3.9,500,450,10%
p3,Broken,Home,4.1,500,450,ten%
p4,Charger,Electronics,4.4,1999,999,50%
";

fn temp_with(suffix: &str, contents: &str) -> NamedTempFile {
    let mut tmp = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
    write!(tmp, "{contents}").unwrap();
    tmp
}

fn write_parquet(path: &Path) {
    let schema = Arc::new(Schema::new(vec![
        ArrowField::new("product_id", DataType::Utf8, true),
        ArrowField::new("product_name", DataType::Utf8, true),
        ArrowField::new("category", DataType::Utf8, false),
        ArrowField::new("rating", DataType::Float64, true),
        ArrowField::new("actual_price", DataType::Float64, false),
        ArrowField::new("discounted_price", DataType::Float64, false),
        ArrowField::new("discount_percentage", DataType::Utf8, false),
    ]));
    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(StringArray::from(vec!["p1", "p2", "p3", "p4"])),
            Arc::new(StringArray::from(vec!["Cable", "Mug", "Broken", "Charger"])),
            Arc::new(StringArray::from(vec!["Electronics", "Home", "Home", "Electronics"])),
            Arc::new(Float64Array::from(vec![4.2, 3.9, 4.1, 4.4])),
            Arc::new(Float64Array::from(vec![1099.0, 500.0, 500.0, 1999.0])),
            Arc::new(Float64Array::from(vec![399.0, 450.0, 450.0, 999.0])),
            Arc::new(StringArray::from(vec!["64%", "10%", "ten%", "50%"])),
        ],
    )
    .unwrap();

    let file = std::fs::File::create(path).unwrap();
    let mut writer = ArrowWriter::try_new(file, schema, None).unwrap();
    writer.write(&batch).unwrap();
    writer.close().unwrap();
}

#[test]
fn test_csv_json_and_parquet_load_the_same_records() {
    let csv = temp_with(".csv", CSV);
    let json = temp_with(
        ".json",
        r#"[
          {"product_id": "p1", "product_name": "Cable", "category": "Electronics",
           "rating": 4.2, "actual_price": 1099, "discounted_price": 399, "discount_percentage": "64%"},
          {"product_id": "p2", "product_name": "Mug", "category": "Home",
           "rating": 3.9, "actual_price": 500, "discounted_price": 450, "discount_percentage": "10%"},
          {"product_id": "p3", "product_name": "Broken", "category": "Home",
           "rating": 4.1, "actual_price": 500, "discounted_price": 450, "discount_percentage": "ten%"},
          {"product_id": "p4", "product_name": "Charger", "category": "Electronics",
           "rating": 4.4, "actual_price": 1999, "discounted_price": 999, "discount_percentage": "50%"}
        ]"#,
    );
    let dir = tempfile::tempdir().unwrap();
    let parquet = dir.path().join("products.parquet");
    write_parquet(&parquet);

    let from_csv = load_file(csv.path()).unwrap();
    let from_json = load_file(json.path()).unwrap();
    let from_parquet = load_file(&parquet).unwrap();

    assert_eq!(from_csv.len(), 3);
    assert_eq!(from_csv.dropped_count(), 1);
    assert_eq!(from_csv.dropped[0].row, 3);
    assert_eq!(from_csv.records, from_json.records);
    assert_eq!(from_csv.records, from_parquet.records);
    assert_eq!(from_parquet.dropped, from_csv.dropped);
}

#[test]
fn test_store_feeds_the_pipeline() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("products.csv");
    std::fs::write(&path, CSV).unwrap();

    let mut store = DatasetStore::new();
    let dataset = store.load(&path).unwrap();
    let again = store.load(&path).unwrap();
    assert!(Arc::ptr_eq(&dataset, &again));

    let spec = FilterSpec::from_bounds(4.0, 5.0, Vec::new()).unwrap();
    let snap = run(&dataset.records, &spec);

    assert_eq!(snap.filtered.len(), 2);
    assert_eq!(snap.top_categories, vec![CategoryCount::new("Electronics", 2)]);
    let discounts: Vec<f64> = snap
        .views
        .discount_vs_rating
        .points
        .iter()
        .map(|p| p.x)
        .collect();
    assert_eq!(discounts, vec![64.0, 50.0]);
}
