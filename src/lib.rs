//! # imdb-top-ratings
//!
//! Scrapes the IMDb Top 250 chart, looks up how many Oscars each movie won and
//! writes two re-weighted rankings to CSV.
//!
//! ## Stages
//!
//! 1. [`listing`] - extract rank, title, link, rating and vote count from the chart
//! 2. [`enrich`] - fetch every detail page concurrently and read the Oscar count
//! 3. [`adjust`] - add an Oscar bonus; subtract a vote-count penalty relative to
//!    the most-voted movie of the batch
//! 4. [`output`] - select columns and write CSV files
//!
//! [`Pipeline`] drives all four.
//!
//! ## Quick Start
//!
//! ```no_run
//! use imdb_top_ratings::{Config, Pipeline};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let pipeline = Pipeline::new(Config::default())?;
//!     let report = pipeline.run(20).await?;
//!
//!     for record in &report.records {
//!         println!(
//!             "{:>3} {} {:.1} -> {:?}",
//!             record.rank, record.title, record.original_rating, record.oscar_adjusted_rating
//!         );
//!     }
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// Rating adjustments
pub mod adjust;
/// Configuration types
pub mod config;
/// Detail page enrichment
pub mod enrich;
/// Error types
pub mod error;
/// HTTP page retrieval
pub mod fetcher;
/// Chart extraction
pub mod listing;
/// Column selection and CSV output
pub mod output;
/// End-to-end run
pub mod pipeline;
/// Core types
pub mod types;

// Re-export commonly used types
pub use config::{Config, OutputConfig, OutputFile, ScrapeConfig, validate_limit};
pub use enrich::DetailEnricher;
pub use error::{Error, ExtractionError, PageKind, Result, TransportError};
pub use fetcher::{HttpFetcher, PageFetcher};
pub use listing::ListingExtractor;
pub use output::{Column, CsvSink, OutputStage, Table, assemble};
pub use pipeline::{Pipeline, RunReport};
pub use types::MovieRecord;
