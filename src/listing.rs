//! Ranked chart extraction
//!
//! Turns the markup of the chart page into [`MovieRecord`] stubs carrying rank,
//! title, detail link, rating and rating count. Ranks come from row position,
//! never from the ratings themselves.

use crate::config::ScrapeConfig;
use crate::error::{ExtractionError, PageKind, Result};
use crate::types::MovieRecord;
use scraper::{ElementRef, Html, Selector};
use tracing::debug;
use url::Url;

const TABLE_SELECTOR: &str = "tbody.lister-list";
const ROW_SELECTOR: &str = "tr";
const TITLE_LINK_SELECTOR: &str = "td.titleColumn a";
const RATING_SELECTOR: &str = "td.ratingColumn.imdbRating strong";

/// Whitespace-separated token of the rating tooltip holding the vote count,
/// e.g. `"9.2 based on 2,712,879 user ratings"`.
const RATING_COUNT_TOKEN: usize = 3;

/// Bounds of an IMDb user rating
const MIN_RATING: f64 = 0.0;
const MAX_RATING: f64 = 10.0;

/// Extracts chart rows from the listing page
#[derive(Debug)]
pub struct ListingExtractor {
    base: Url,
    table: Selector,
    row: Selector,
    title_link: Selector,
    rating: Selector,
}

impl ListingExtractor {
    /// Create an extractor resolving relative detail links against `config.base_url`
    pub fn new(config: &ScrapeConfig) -> Result<Self> {
        Ok(Self {
            base: config.base()?,
            table: compile(TABLE_SELECTOR)?,
            row: compile(ROW_SELECTOR)?,
            title_link: compile(TITLE_LINK_SELECTOR)?,
            rating: compile(RATING_SELECTOR)?,
        })
    }

    /// Extract the first `limit` rows of the ranked table in document order
    ///
    /// `limit` is expected to have passed [`crate::config::validate_limit`].
    /// Returns `min(limit, rows in table)` records ranked `1..=len`.
    ///
    /// # Errors
    /// Returns [`ExtractionError`] if the table, a cell or an attribute is
    /// missing, or a rating cannot be parsed or lies outside `0.0..=10.0`.
    pub fn extract(&self, page: &str, limit: usize) -> Result<Vec<MovieRecord>> {
        let document = Html::parse_document(page);

        let table = document
            .select(&self.table)
            .next()
            .ok_or_else(|| missing(format!("ranked table ({TABLE_SELECTOR})")))?;

        let rows: Vec<ElementRef<'_>> = table.select(&self.row).take(limit).collect();
        if rows.is_empty() {
            return Err(ExtractionError::EmptyListing.into());
        }

        let records = rows
            .iter()
            .enumerate()
            .map(|(idx, row)| self.extract_row(row, idx as u32 + 1))
            .collect::<Result<Vec<_>>>()?;

        debug!(
            requested = limit,
            extracted = records.len(),
            "extracted chart rows"
        );
        Ok(records)
    }

    fn extract_row(&self, row: &ElementRef<'_>, rank: u32) -> Result<MovieRecord> {
        let link = row
            .select(&self.title_link)
            .next()
            .ok_or_else(|| missing(format!("title link in row {rank}")))?;

        let title = link.text().collect::<String>().trim().to_string();
        if title.is_empty() {
            return Err(missing(format!("title text in row {rank}")).into());
        }

        let href = link
            .value()
            .attr("href")
            .ok_or_else(|| missing(format!("href of title link in row {rank}")))?;
        let detail_link = self
            .base
            .join(href)
            .map_err(|e| ExtractionError::InvalidLink {
                page: PageKind::Listing,
                href: href.to_string(),
                reason: e.to_string(),
            })?;

        let rating = row
            .select(&self.rating)
            .next()
            .ok_or_else(|| missing(format!("rating in row {rank}")))?;

        let rating_text = rating.text().collect::<String>();
        let original_rating = rating_text
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|value| (MIN_RATING..=MAX_RATING).contains(value))
            .ok_or_else(|| ExtractionError::MalformedValue {
                page: PageKind::Listing,
                field: "rating",
                value: rating_text.clone(),
            })?;

        let tooltip = rating
            .value()
            .attr("title")
            .ok_or_else(|| missing(format!("rating tooltip in row {rank}")))?;
        let number_of_ratings = parse_rating_count(tooltip)?;

        Ok(MovieRecord::new(
            rank,
            title,
            detail_link.to_string(),
            original_rating,
            number_of_ratings,
        ))
    }
}

/// Read the vote count out of a rating tooltip such as
/// `"9.2 based on 2,712,879 user ratings"`.
pub(crate) fn parse_rating_count(tooltip: &str) -> Result<u64> {
    let malformed = || ExtractionError::MalformedValue {
        page: PageKind::Listing,
        field: "number of ratings",
        value: tooltip.to_string(),
    };

    let token = tooltip
        .split_whitespace()
        .nth(RATING_COUNT_TOKEN)
        .ok_or_else(malformed)?;

    token
        .replace(',', "")
        .parse::<u64>()
        .map_err(|_| malformed().into())
}

pub(crate) fn compile(selector: &str) -> Result<Selector> {
    Selector::parse(selector).map_err(|e| {
        ExtractionError::Selector {
            selector: selector.to_string(),
            reason: e.to_string(),
        }
        .into()
    })
}

fn missing(what: String) -> ExtractionError {
    ExtractionError::MissingElement {
        page: PageKind::Listing,
        what,
    }
}
