//! Data layer: core types, loading, filtering, ranking and chart views.
//!
//! Architecture:
//! ```text
//!  .csv / .json / .parquet
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  loader   │  parse file → raw cells → ProductRecord (rows that fail are dropped)
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  store    │  keyed cache: source identity → Arc<LoadedDataset>
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  filter   │  rating range + category membership → RecordSet
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  rank     │  category frequencies → top N
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  chart    │  four named views for the renderer
//!   └──────────┘
//! ```
//!
//! [`pipeline::run`] chains filter → rank → chart and is what a host calls on
//! every interaction.

pub mod chart;
pub mod error;
pub mod filter;
pub mod loader;
pub mod model;
pub mod pipeline;
pub mod rank;
pub mod store;
