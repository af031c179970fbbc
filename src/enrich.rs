//! Detail page enrichment
//!
//! [`DetailEnricher`] fetches the detail page of every distinct movie in a batch
//! and attaches the number of Oscars won to each record.
//!
//! All requests are issued against one shared [`PageFetcher`]. They are
//! created up front and joined in input order, so completion order never
//! affects the result and nothing is merged until every request has resolved.
//! The first failure aborts the batch and drops the requests still in flight.

use crate::config::ScrapeConfig;
use crate::error::{Error, ExtractionError, PageKind, Result};
use crate::fetcher::PageFetcher;
use crate::listing::compile;
use crate::types::MovieRecord;
use futures::future::try_join_all;
use futures::{StreamExt, TryStreamExt, stream};
use scraper::{Html, Selector};
use std::collections::HashMap;
use tracing::{debug, info, warn};
use url::Url;

const AWARDS_SELECTOR: &str = r#"a[aria-label="See more awards and nominations"]"#;

/// Word in the awards summary that precedes the number of Oscars won
const WON_MARKER: &str = "Won";

/// One detail page to fetch, shared by every record with the same link
struct Target {
    title: String,
    link: String,
}

/// Attaches Oscar counts to chart records
pub struct DetailEnricher<'a> {
    fetcher: &'a dyn PageFetcher,
    awards: Selector,
    max_concurrent: Option<usize>,
}

impl<'a> DetailEnricher<'a> {
    /// Create an enricher issuing its requests through `fetcher`
    ///
    /// # Errors
    /// Returns [`Error::Config`] if `max_concurrent_fetches` is `Some(0)`.
    pub fn new(fetcher: &'a dyn PageFetcher, config: &ScrapeConfig) -> Result<Self> {
        if config.max_concurrent_fetches == Some(0) {
            return Err(Error::Config {
                message: "max_concurrent_fetches must be at least 1".to_string(),
                key: Some("scrape.max_concurrent_fetches".to_string()),
            });
        }

        Ok(Self {
            fetcher,
            awards: compile(AWARDS_SELECTOR)?,
            max_concurrent: config.max_concurrent_fetches,
        })
    }

    /// Populate `oscar_count` on every record
    ///
    /// Records sharing a detail link are fetched once and all receive that
    /// page's count. Record order and every other field are preserved.
    ///
    /// # Errors
    /// Returns [`Error::Enrichment`] naming the first movie whose page could not
    /// be fetched or read. No record is updated in that case.
    pub async fn enrich(&self, mut records: Vec<MovieRecord>) -> Result<Vec<MovieRecord>> {
        let (targets, slots) = plan(&records);
        info!(
            records = records.len(),
            pages = targets.len(),
            "fetching detail pages"
        );

        let fetches: Vec<_> = targets
            .iter()
            .map(|target| self.fetch_award_count(target))
            .collect();

        let counts: Vec<u32> = match self.max_concurrent {
            None => try_join_all(fetches).await?,
            Some(limit) => {
                stream::iter(fetches)
                    .buffered(limit)
                    .try_collect()
                    .await?
            }
        };

        for (record, slot) in records.iter_mut().zip(slots) {
            record.oscar_count = Some(counts[slot]);
        }

        Ok(records)
    }

    async fn fetch_award_count(&self, target: &Target) -> Result<u32> {
        info!(title = %target.title, "processing detail page");

        let outcome = async {
            let url = Url::parse(&target.link).map_err(|e| ExtractionError::InvalidLink {
                page: PageKind::Detail,
                href: target.link.clone(),
                reason: e.to_string(),
            })?;
            let page = self.fetcher.fetch(&url, PageKind::Detail).await?;
            self.parse_award_count(&page)
        }
        .await;

        match outcome {
            Ok(count) => {
                debug!(title = %target.title, oscars = count, "read awards summary");
                Ok(count)
            }
            Err(source) => {
                warn!(title = %target.title, url = %target.link, error = %source, "detail page failed");
                Err(Error::Enrichment {
                    title: target.title.clone(),
                    url: target.link.clone(),
                    source: Box::new(source),
                })
            }
        }
    }

    fn parse_award_count(&self, page: &str) -> Result<u32> {
        let document = Html::parse_document(page);
        let summary = document
            .select(&self.awards)
            .next()
            .ok_or_else(|| ExtractionError::MissingElement {
                page: PageKind::Detail,
                what: format!("awards summary ({AWARDS_SELECTOR})"),
            })?;

        award_count(&summary.text().collect::<String>())
    }
}

/// Number of Oscars in an awards summary such as `"Won 3 Oscars"`
///
/// The count is the whitespace-delimited token right after the `Won` marker.
/// Punctuation trailing the marker (`"Won: 3"`) is ignored, but a word merely
/// containing it (`"Wonder"`) is not a marker. A summary without the marker
/// (e.g. `"Nominated for 7 Oscars"`) counts as zero.
pub fn award_count(summary: &str) -> Result<u32> {
    let mut tokens = summary.split_whitespace();
    let is_marker =
        |token: &str| token.trim_end_matches(|c: char| c.is_ascii_punctuation()) == WON_MARKER;
    if !tokens.any(is_marker) {
        return Ok(0);
    }

    let token = tokens.next().unwrap_or_default();
    token.parse::<u32>().map_err(|_| {
        ExtractionError::MalformedValue {
            page: PageKind::Detail,
            field: "award count",
            value: summary.trim().to_string(),
        }
        .into()
    })
}

/// Deduplicate records by detail link
///
/// Returns the distinct pages in first-seen order and, for each record, the
/// index of the page it reads from.
fn plan(records: &[MovieRecord]) -> (Vec<Target>, Vec<usize>) {
    let mut targets = Vec::new();
    let mut seen: HashMap<&str, usize> = HashMap::new();

    let slots = records
        .iter()
        .map(|record| {
            *seen.entry(record.detail_link.as_str()).or_insert_with(|| {
                targets.push(Target {
                    title: record.title.clone(),
                    link: record.detail_link.clone(),
                });
                targets.len() - 1
            })
        })
        .collect();

    (targets, slots)
}
