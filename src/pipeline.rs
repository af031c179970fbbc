//! End-to-end run: listing -> enrichment -> adjustments -> CSV files

use crate::adjust::{oscar_adjustment, vote_adjustment};
use crate::config::{Config, validate_limit};
use crate::enrich::DetailEnricher;
use crate::error::{PageKind, Result};
use crate::fetcher::{HttpFetcher, PageFetcher};
use crate::listing::ListingExtractor;
use crate::output::{CsvSink, assemble};
use crate::types::MovieRecord;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

/// Outcome of [`Pipeline::run`]
#[derive(Clone, Debug)]
pub struct RunReport {
    /// Enriched and adjusted records in chart order
    pub records: Vec<MovieRecord>,
    /// Files written, in configuration order
    pub written: Vec<PathBuf>,
}

/// Runs the whole scrape for one configuration
///
/// By default every stage opens its own [`HttpFetcher`]: the listing request
/// uses one client, and the enrichment stage creates a fresh client (one
/// connection pool) that is dropped when the stage ends, whether it succeeded
/// or not. [`Pipeline::with_fetcher`] routes every request through a caller
/// supplied fetcher instead.
pub struct Pipeline {
    config: Config,
    fetcher: Option<Arc<dyn PageFetcher>>,
}

impl Pipeline {
    /// Create a pipeline that talks HTTP to `config.scrape.base_url`
    ///
    /// # Errors
    /// Returns [`crate::Error::Config`] if the configuration is invalid
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            fetcher: None,
        })
    }

    /// Create a pipeline whose requests all go through `fetcher`
    pub fn with_fetcher(config: Config, fetcher: Arc<dyn PageFetcher>) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            fetcher: Some(fetcher),
        })
    }

    /// The configuration this pipeline runs with
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Scrape, enrich and adjust the first `n` movies without writing anything
    ///
    /// # Errors
    /// - [`crate::Error::InvalidParameter`] if `n` is outside `1..=250`; no
    ///   request is made in that case
    /// - [`crate::Error::Transport`] if the listing cannot be fetched
    /// - [`crate::Error::Extraction`] if the listing has an unexpected shape
    /// - [`crate::Error::Enrichment`] if any detail page fails
    pub async fn collect(&self, n: i64) -> Result<Vec<MovieRecord>> {
        let limit = validate_limit(n)?;
        let scrape = &self.config.scrape;

        info!(limit, "processing top movies chart");
        let listing_url = scrape.listing_url()?;
        let page = match &self.fetcher {
            Some(fetcher) => fetcher.fetch(&listing_url, PageKind::Listing).await?,
            None => {
                HttpFetcher::new(scrape)?
                    .fetch(&listing_url, PageKind::Listing)
                    .await?
            }
        };

        let records = ListingExtractor::new(scrape)?.extract(&page, limit)?;
        info!(records = records.len(), "extracted chart");

        let mut records = match &self.fetcher {
            Some(fetcher) => {
                DetailEnricher::new(fetcher.as_ref(), scrape)?
                    .enrich(records)
                    .await?
            }
            None => {
                let session = HttpFetcher::new(scrape)?;
                DetailEnricher::new(&session, scrape)?
                    .enrich(records)
                    .await?
            }
        };

        oscar_adjustment(&mut records)?;
        vote_adjustment(&mut records);

        Ok(records)
    }

    /// [`Pipeline::collect`], then write every configured output file
    ///
    /// Every table is assembled before the first file is written. If a write
    /// fails, files already written by this run are removed again.
    ///
    /// # Errors
    /// Everything [`Pipeline::collect`] returns, plus I/O and CSV errors from
    /// writing the files.
    pub async fn run(&self, n: i64) -> Result<RunReport> {
        let records = self.collect(n).await?;

        let tables = self
            .config
            .output
            .files
            .iter()
            .map(|file| Ok((file.name.as_str(), assemble(&records, file.stage)?)))
            .collect::<Result<Vec<_>>>()?;

        let sink = CsvSink::new(&self.config.output.directory);
        let mut written = Vec::with_capacity(tables.len());
        for (name, table) in &tables {
            match sink.write(name, table) {
                Ok(path) => written.push(path),
                Err(e) => {
                    discard(&written);
                    return Err(e);
                }
            }
        }

        info!(files = written.len(), "run complete");
        Ok(RunReport { records, written })
    }
}

/// Best-effort removal of the files of a failed run
fn discard(paths: &[PathBuf]) {
    for path in paths {
        if let Err(e) = std::fs::remove_file(path) {
            warn!(path = %path.display(), error = %e, "could not remove partial output");
        }
    }
}
