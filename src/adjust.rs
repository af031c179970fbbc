//! Rating adjustments
//!
//! Two independent transforms over an enriched batch:
//! - [`oscar_adjustment`] adds a bonus bucketed by Oscars won;
//! - [`vote_adjustment`] subtracts a penalty proportional to how far a movie's
//!   vote count trails the most-voted movie *of the same batch*.
//!
//! Both read only `original_rating`, so running either one again yields the
//! same result.

use crate::error::{Error, Result};
use crate::types::MovieRecord;
use tracing::debug;

/// Votes per 0.1 penalty step in [`vote_adjustment`]
pub const VOTES_PER_PENALTY_STEP: u64 = 100_000;

/// Rating lost per penalty step in [`vote_adjustment`]
pub const PENALTY_STEP: f64 = 0.1;

/// Bonus for a given number of Oscars won
pub fn oscar_bonus(oscars: u32) -> f64 {
    match oscars {
        0 => 0.0,
        1..=2 => 0.3,
        3..=5 => 0.5,
        6..=10 => 1.0,
        _ => 1.5,
    }
}

/// Set `oscar_adjusted_rating` on every record
///
/// A movie without Oscars keeps its rating exactly; otherwise the bonus is added
/// and the sum rounded to one decimal.
///
/// # Errors
/// Returns [`Error::MissingField`] if a record has not been enriched.
pub fn oscar_adjustment(records: &mut [MovieRecord]) -> Result<()> {
    for record in records.iter_mut() {
        let oscars = record.oscar_count.ok_or(Error::MissingField {
            rank: record.rank,
            field: "oscar_count",
        })?;

        let adjusted = match oscars {
            0 => record.original_rating,
            n => round1(record.original_rating + oscar_bonus(n)),
        };
        record.oscar_adjusted_rating = Some(adjusted);
    }

    debug!(records = records.len(), "applied oscar adjustment");
    Ok(())
}

/// Set `vote_adjusted_rating` on every record
///
/// The reference maximum is taken from `records` itself, so adjusting a
/// different subset of movies gives different penalties.
pub fn vote_adjustment(records: &mut [MovieRecord]) {
    let Some(max_ratings) = records.iter().map(|r| r.number_of_ratings).max() else {
        return;
    };

    for record in records.iter_mut() {
        let penalty = vote_penalty(max_ratings, record.number_of_ratings);
        record.vote_adjusted_rating = Some(round1(record.original_rating - penalty));
    }

    debug!(
        records = records.len(),
        max_ratings, "applied vote adjustment"
    );
}

/// Penalty for trailing the batch maximum by `max_ratings - ratings` votes
pub fn vote_penalty(max_ratings: u64, ratings: u64) -> f64 {
    let deficit = max_ratings.saturating_sub(ratings);
    (deficit / VOTES_PER_PENALTY_STEP) as f64 * PENALTY_STEP
}

/// Round to one decimal place, halves away from zero
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
