//! Product listing explorer core.
//!
//! Everything with logic lives under [`data`]: loading and normalizing the
//! listings, filtering, category ranking and the chart-ready views. The
//! `product-dashboard` binary is only a renderer for what [`data::pipeline`]
//! produces.

pub mod data;
