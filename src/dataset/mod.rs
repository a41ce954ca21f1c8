//! In-memory view of the movies CSV.
//!
//! Each record maps onto [`MovieRow`]. The `Genre`, `Director`, `Stars` and
//! `Description` columns hold serialized list literals and are kept as
//! [`ListCell`]s until a loader pass asks for their contents.

pub mod literal;

use serde::{Deserialize, Deserializer};
use std::io::Read;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

pub use literal::{ListLiteralError, parse_list_literal};

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("Failed to open dataset {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Dataset is missing the `{column}` column")]
    MissingColumn { column: &'static str },

    #[error("Malformed CSV header: {0}")]
    Header(#[source] csv::Error),

    #[error("Malformed CSV record {record}: {source}")]
    Record {
        record: usize,
        #[source]
        source: csv::Error,
    },
}

/// Header names every dataset must carry.
pub const COLUMNS: [&str; 12] = [
    "Movie Name",
    "Year of Release",
    "Certification",
    "Run Time in minutes",
    "Genre",
    "Description",
    "Director",
    "Stars",
    "Movie Rating",
    "Votes",
    "MetaScore",
    "Gross",
];

/// A list-valued cell.
///
/// Cells read from the CSV arrive as [`ListCell::Literal`]. Rows built in code
/// may carry an already structured [`ListCell::Items`], which is used as-is.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "Option<String>")]
pub enum ListCell {
    #[default]
    Missing,
    Literal(String),
    Items(Vec<String>),
}

impl From<Option<String>> for ListCell {
    fn from(value: Option<String>) -> Self {
        match value {
            Some(s) if !s.trim().is_empty() => Self::Literal(s),
            _ => Self::Missing,
        }
    }
}

impl ListCell {
    pub fn items<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Items(items.into_iter().map(Into::into).collect())
    }

    /// Raw entries, untrimmed. A missing cell is an empty list.
    pub fn entries(&self) -> Result<Vec<String>, ListLiteralError> {
        match self {
            Self::Missing => Ok(Vec::new()),
            Self::Literal(raw) => parse_list_literal(raw),
            Self::Items(items) => Ok(items.clone()),
        }
    }

    /// Whitespace-trimmed names, in cell order. Blank entries are dropped.
    pub fn names(&self) -> Result<Vec<String>, ListLiteralError> {
        Ok(self
            .entries()?
            .into_iter()
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty())
            .collect())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct MovieRow {
    #[serde(rename = "Movie Name")]
    pub title: String,

    #[serde(rename = "Year of Release", default, deserialize_with = "lenient_int")]
    pub release_year: Option<i32>,

    #[serde(rename = "Certification", default)]
    pub certification: Option<String>,

    #[serde(rename = "Run Time in minutes", default, deserialize_with = "lenient_int")]
    pub duration_minutes: Option<i32>,

    #[serde(rename = "Genre", default)]
    pub genres: ListCell,

    #[serde(rename = "Description", default)]
    pub description: ListCell,

    #[serde(rename = "Director", default)]
    pub directors: ListCell,

    #[serde(rename = "Stars", default)]
    pub stars: ListCell,

    #[serde(rename = "Movie Rating", default, deserialize_with = "lenient_float")]
    pub rating: Option<f64>,

    #[serde(rename = "Votes", default, deserialize_with = "lenient_int")]
    pub votes: Option<i64>,

    #[serde(rename = "MetaScore", default, deserialize_with = "lenient_float")]
    pub metascore: Option<f64>,

    #[serde(rename = "Gross", default, deserialize_with = "lenient_float")]
    pub gross: Option<f64>,
}

impl MovieRow {
    /// Trimmed certification, `None` when blank.
    #[must_use]
    pub fn certification(&self) -> Option<&str> {
        self.certification
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
    }

    /// Description sentences joined with single spaces. An empty list gives
    /// an empty string; a missing or malformed cell degrades to `None`.
    #[must_use]
    pub fn description(&self) -> Option<String> {
        if self.description == ListCell::Missing {
            return None;
        }

        match self.description.entries() {
            Ok(sentences) => Some(sentences.join(" ")),
            Err(e) => {
                debug!(title = %self.title, error = %e, "Unparsable description");
                None
            }
        }
    }

    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn metascore(&self) -> Option<i32> {
        self.metascore.map(|m| m.round() as i32)
    }

    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn revenue(&self) -> Option<i64> {
        self.gross.map(|g| g.round() as i64)
    }
}

/// The whole CSV, read eagerly. Row positions are load-bearing: a movie's id
/// is its 0-based position plus one.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    rows: Vec<MovieRow>,
}

impl Dataset {
    #[must_use]
    pub fn new(rows: Vec<MovieRow>) -> Self {
        Self { rows }
    }

    /// # Errors
    ///
    /// Fails if the file cannot be opened or any record does not fit the
    /// expected header.
    pub fn from_path(path: &Path) -> Result<Self, DatasetError> {
        let file = std::fs::File::open(path).map_err(|source| DatasetError::Open {
            path: path.to_path_buf(),
            source,
        })?;

        let dataset = Self::from_reader(std::io::BufReader::new(file))?;
        info!(path = %path.display(), rows = dataset.len(), "Dataset loaded");
        Ok(dataset)
    }

    /// # Errors
    ///
    /// Fails when a required column is absent from the header, or on the
    /// first record that cannot be deserialized.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, DatasetError> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(false)
            .from_reader(reader);

        let headers = rdr.headers().map_err(DatasetError::Header)?;
        if let Some(column) = COLUMNS
            .into_iter()
            .find(|column| !headers.iter().any(|h| h == *column))
        {
            return Err(DatasetError::MissingColumn { column });
        }

        let rows = rdr
            .deserialize()
            .enumerate()
            .map(|(record, result)| {
                result.map_err(|source| DatasetError::Record {
                    record: record + 1,
                    source,
                })
            })
            .collect::<Result<Vec<MovieRow>, _>>()?;

        Ok(Self { rows })
    }

    #[must_use]
    pub fn rows(&self) -> &[MovieRow] {
        &self.rows
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows paired with their movie ids.
    pub fn iter_with_ids(&self) -> impl Iterator<Item = (i32, &MovieRow)> {
        self.rows.iter().enumerate().map(|(index, row)| {
            #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
            let id = index as i32 + 1;
            (id, row)
        })
    }
}

/// Numeric cells as exported by spreadsheet tooling: `"2023"`, `"2023.0"`,
/// `"1,234"`, blank. Anything unparsable is treated as absent.
fn parse_number(raw: &str) -> Option<f64> {
    let cleaned: String = raw.trim().chars().filter(|c| *c != ',').collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

fn lenient_float<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(parse_number))
}

fn lenient_int<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: TryFrom<i64>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    #[allow(clippy::cast_possible_truncation)]
    let value = raw
        .as_deref()
        .and_then(parse_number)
        .map(|v| v.round() as i64)
        .and_then(|v| T::try_from(v).ok());
    Ok(value)
}
