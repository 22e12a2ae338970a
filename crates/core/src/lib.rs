//! `colorqc-core` - Color test extraction engine.
//!
//! Pure engine crate: receives raw sheets, returns reshaped result tables.
//! No file IO dependencies.

pub mod aggregate;
pub mod classify;
pub mod config;
pub mod error;
pub mod labels;
pub mod layout;
pub mod model;
pub mod normalize;

pub use aggregate::concat;
pub use classify::Classifier;
pub use config::ExtractConfig;
pub use error::ExtractError;
pub use labels::ColorTestNames;
pub use layout::LayoutPolicy;
pub use model::{AggregateTable, Cell, ResultTable, Sheet, Table, PART_NUMBER_HEADER};
pub use normalize::normalize;
