//! Core record type flowing through the pipeline

use serde::{Deserialize, Serialize};

/// One movie of the ranked chart
///
/// Created by the listing extractor, then filled in place by the enricher
/// (`oscar_count`) and the rating adjuster (`*_adjusted_rating`).
/// `original_rating` is never modified after extraction.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MovieRecord {
    /// 1-based position in the chart
    pub rank: u32,

    /// Display title (not unique across the chart)
    pub title: String,

    /// Absolute URL of the movie's own page
    pub detail_link: String,

    /// Chart rating, 0.0 to 10.0
    pub original_rating: f64,

    /// Number of user ratings behind `original_rating`
    pub number_of_ratings: u64,

    /// Oscars won, set by enrichment
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub oscar_count: Option<u32>,

    /// Rating after the Oscar bonus
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub oscar_adjusted_rating: Option<f64>,

    /// Rating after the vote-count penalty
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vote_adjusted_rating: Option<f64>,
}

impl MovieRecord {
    /// Create a freshly extracted record (nothing enriched or adjusted yet)
    pub fn new(
        rank: u32,
        title: impl Into<String>,
        detail_link: impl Into<String>,
        original_rating: f64,
        number_of_ratings: u64,
    ) -> Self {
        Self {
            rank,
            title: title.into(),
            detail_link: detail_link.into(),
            original_rating,
            number_of_ratings,
            oscar_count: None,
            oscar_adjusted_rating: None,
            vote_adjusted_rating: None,
        }
    }
}
