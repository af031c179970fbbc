//! Result assembly and CSV persistence
//!
//! [`assemble`] picks and orders the columns for one output stage;
//! [`CsvSink`] writes the resulting [`Table`] to `<name>.csv` and can read it back.

use crate::error::{Error, Result};
use crate::types::MovieRecord;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

/// One output column
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Column {
    /// 1-based chart position
    Rank,
    /// Movie title
    Title,
    /// Chart rating
    Rating,
    /// Vote count
    NumberOfRatings,
    /// Oscars won
    Oscars,
    /// Rating with the Oscar bonus
    OscarAdjustedRating,
    /// Rating with the vote-count penalty
    VoteAdjustedRating,
}

impl Column {
    /// Header text
    pub fn header(self) -> &'static str {
        match self {
            Column::Rank => "Rank",
            Column::Title => "Title",
            Column::Rating => "Rating",
            Column::NumberOfRatings => "Number of Ratings",
            Column::Oscars => "Oscars",
            Column::OscarAdjustedRating => "Oscar Adjusted Rating",
            Column::VoteAdjustedRating => "Vote Adjusted Rating",
        }
    }
}

/// Which view of the records a file holds
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputStage {
    /// Scraped values: rank, title, rating, rating count, Oscars
    Original,
    /// Ratings with the Oscar bonus
    OscarAdjusted,
    /// Ratings with the vote-count penalty
    VoteAdjusted,
    /// Every column
    Full,
}

impl OutputStage {
    /// Columns, in output order
    pub fn columns(self) -> &'static [Column] {
        use Column::*;

        match self {
            OutputStage::Original => &[Rank, Title, Rating, NumberOfRatings, Oscars],
            OutputStage::OscarAdjusted => &[Rank, Title, Oscars, Rating, OscarAdjustedRating],
            OutputStage::VoteAdjusted => &[Rank, Title, NumberOfRatings, Rating, VoteAdjustedRating],
            OutputStage::Full => &[
                Rank,
                Title,
                Oscars,
                NumberOfRatings,
                Rating,
                OscarAdjustedRating,
                VoteAdjustedRating,
            ],
        }
    }
}

/// Header row plus string cells, ready for a tabular sink
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Table {
    /// Column names
    pub headers: Vec<String>,
    /// One entry per record, same length as `headers`
    pub rows: Vec<Vec<String>>,
}

/// Select and order the columns of `stage` for every record
///
/// # Errors
/// Returns [`Error::MissingField`] if a record lacks a value the stage needs
/// (e.g. an Oscar count before enrichment).
pub fn assemble(records: &[MovieRecord], stage: OutputStage) -> Result<Table> {
    let columns = stage.columns();
    let rows = records
        .iter()
        .map(|record| {
            columns
                .iter()
                .map(|column| cell(record, *column))
                .collect::<Result<Vec<_>>>()
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(Table {
        headers: columns.iter().map(|c| c.header().to_string()).collect(),
        rows,
    })
}

fn cell(record: &MovieRecord, column: Column) -> Result<String> {
    let missing = |field| Error::MissingField {
        rank: record.rank,
        field,
    };

    Ok(match column {
        Column::Rank => record.rank.to_string(),
        Column::Title => record.title.clone(),
        Column::Rating => format_rating(record.original_rating),
        Column::NumberOfRatings => record.number_of_ratings.to_string(),
        Column::Oscars => record
            .oscar_count
            .ok_or_else(|| missing("oscar_count"))?
            .to_string(),
        Column::OscarAdjustedRating => format_rating(
            record
                .oscar_adjusted_rating
                .ok_or_else(|| missing("oscar_adjusted_rating"))?,
        ),
        Column::VoteAdjustedRating => format_rating(
            record
                .vote_adjusted_rating
                .ok_or_else(|| missing("vote_adjusted_rating"))?,
        ),
    })
}

fn format_rating(rating: f64) -> String {
    format!("{rating:.1}")
}

/// Writes tables as `<directory>/<name>.csv`
#[derive(Clone, Debug)]
pub struct CsvSink {
    directory: PathBuf,
}

impl CsvSink {
    /// Create a sink writing into `directory` (created on first write)
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    /// Path a table called `name` is written to
    pub fn path_for(&self, name: &str) -> PathBuf {
        self.directory.join(format!("{name}.csv"))
    }

    /// Write `table` to `<name>.csv`, replacing any existing file
    pub fn write(&self, name: &str, table: &Table) -> Result<PathBuf> {
        std::fs::create_dir_all(&self.directory)?;
        let path = self.path_for(name);

        let mut writer = csv::Writer::from_path(&path)?;
        writer.write_record(&table.headers)?;
        for row in &table.rows {
            writer.write_record(row)?;
        }
        writer.flush()?;

        info!(path = %path.display(), rows = table.rows.len(), "wrote CSV");
        Ok(path)
    }

    /// Read `<name>.csv` back into a table
    pub fn read(&self, name: &str) -> Result<Table> {
        read_table(&self.path_for(name))
    }
}

fn read_table(path: &Path) -> Result<Table> {
    let mut reader = csv::Reader::from_path(path)?;
    let headers = reader.headers()?.iter().map(str::to_string).collect();
    let rows = reader
        .records()
        .map(|record| -> Result<Vec<String>> {
            Ok(record?.iter().map(str::to_string).collect())
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(Table { headers, rows })
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn complete(rank: u32, title: &str) -> MovieRecord {
        MovieRecord {
            oscar_count: Some(3),
            oscar_adjusted_rating: Some(9.7),
            vote_adjusted_rating: Some(8.4),
            ..MovieRecord::new(rank, title, "https://x/1", 9.2, 1_884_969)
        }
    }

    #[test]
    fn original_columns_in_order() {
        let table = assemble(&[complete(2, "The Godfather")], OutputStage::Original).unwrap();

        assert_eq!(
            table.headers,
            vec!["Rank", "Title", "Rating", "Number of Ratings", "Oscars"]
        );
        assert_eq!(
            table.rows,
            vec![vec!["2", "The Godfather", "9.2", "1884969", "3"]]
        );
    }

    #[test]
    fn full_stage_has_every_column() {
        let table = assemble(&[complete(1, "A")], OutputStage::Full).unwrap();

        assert_eq!(table.headers.len(), 7);
        assert_eq!(
            table.rows[0],
            vec!["1", "A", "3", "1884969", "9.2", "9.7", "8.4"]
        );
    }

    #[test]
    fn ratings_keep_one_decimal() {
        let mut record = complete(1, "A");
        record.oscar_adjusted_rating = Some(10.0);

        let table = assemble(&[record], OutputStage::OscarAdjusted).unwrap();
        assert_eq!(table.rows[0], vec!["1", "A", "3", "9.2", "10.0"]);
    }

    #[test]
    fn detail_link_is_never_written() {
        for stage in [
            OutputStage::Original,
            OutputStage::OscarAdjusted,
            OutputStage::VoteAdjusted,
            OutputStage::Full,
        ] {
            let table = assemble(&[complete(1, "A")], stage).unwrap();
            assert!(table.rows[0].iter().all(|cell| !cell.contains("https://")));
        }
    }

    #[test]
    fn assembling_before_enrichment_fails() {
        let raw = MovieRecord::new(7, "Raw", "https://x/7", 8.0, 10);

        match assemble(&[raw], OutputStage::Original) {
            Err(Error::MissingField { rank, field }) => {
                assert_eq!(rank, 7);
                assert_eq!(field, "oscar_count");
            }
            other => panic!("expected MissingField, got {other:?}"),
        }
    }

    #[test]
    fn assembling_before_vote_adjustment_fails() {
        let mut record = complete(1, "A");
        record.vote_adjusted_rating = None;

        assert!(assemble(&[record.clone()], OutputStage::OscarAdjusted).is_ok());
        assert!(matches!(
            assemble(&[record], OutputStage::VoteAdjusted),
            Err(Error::MissingField {
                field: "vote_adjusted_rating",
                ..
            })
        ));
    }

    #[test]
    fn write_then_read_round_trips() {
        let dir = TempDir::new().unwrap();
        let sink = CsvSink::new(dir.path().join("out"));
        let table = assemble(
            &[complete(1, "The Good, the Bad and the Ugly"), complete(2, "\"Quoted\"")],
            OutputStage::Full,
        )
        .unwrap();

        let path = sink.write("ratings", &table).unwrap();
        assert_eq!(path, dir.path().join("out").join("ratings.csv"));

        let restored = sink.read("ratings").unwrap();
        assert_eq!(restored, table);
    }

    #[test]
    fn written_file_starts_with_rank_header() {
        let dir = TempDir::new().unwrap();
        let sink = CsvSink::new(dir.path());
        let table = assemble(&[complete(1, "A")], OutputStage::VoteAdjusted).unwrap();

        let path = sink.write("vote", &table).unwrap();
        let content = std::fs::read_to_string(path).unwrap();

        assert_eq!(
            content,
            "Rank,Title,Number of Ratings,Rating,Vote Adjusted Rating\n1,A,1884969,9.2,8.4\n"
        );
    }

    #[test]
    fn reading_missing_file_fails() {
        let dir = TempDir::new().unwrap();
        let sink = CsvSink::new(dir.path());
        assert!(matches!(sink.read("absent"), Err(Error::Csv(_))));
    }

    #[test]
    fn stage_names_are_snake_case() {
        assert_eq!(
            serde_json::to_string(&OutputStage::OscarAdjusted).unwrap(),
            "\"oscar_adjusted\""
        );
    }
}
