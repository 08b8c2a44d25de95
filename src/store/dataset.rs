use std::collections::{HashMap, HashSet};
use std::io;
use std::path::Path;

use csv::{Reader, ReaderBuilder, StringRecord, Trim};

use crate::{error::StartupError, models::MovieRecord};

pub const ID_COLUMN: &str = "id";
pub const TITLE_COLUMN: &str = "title";
pub const VOTE_AVERAGE_COLUMN: &str = "vote_average";

const REQUIRED_COLUMNS: [&str; 3] = [ID_COLUMN, TITLE_COLUMN, VOTE_AVERAGE_COLUMN];

/// How the feature columns of a dataset are determined
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FeatureSchema {
    /// Every column other than id, title and vote_average, in file order
    #[default]
    Inferred,
    /// Exactly these columns, in this order; any other column is rejected
    Explicit(Vec<String>),
}

/// Immutable in-memory movie table
#[derive(Debug)]
pub struct Dataset {
    records: Vec<MovieRecord>,
    feature_columns: Vec<String>,
    /// Normalized title -> index of the first record carrying it
    title_index: HashMap<String, usize>,
}

/// Column positions resolved from the header row
struct Layout {
    id: usize,
    title: usize,
    vote_average: usize,
    features: Vec<(usize, String)>,
}

impl Dataset {
    /// Loads and validates the dataset at `path`
    pub fn load<P: AsRef<Path>>(path: P, schema: &FeatureSchema) -> Result<Self, StartupError> {
        let path = path.as_ref();
        let reader = reader_builder()
            .from_path(path)
            .map_err(|source| StartupError::Open {
                path: path.to_path_buf(),
                source,
            })?;

        Self::from_csv(reader, schema)
    }

    /// Loads the dataset from any CSV source
    pub fn from_reader<R: io::Read>(reader: R, schema: &FeatureSchema) -> Result<Self, StartupError> {
        Self::from_csv(reader_builder().from_reader(reader), schema)
    }

    fn from_csv<R: io::Read>(
        mut reader: Reader<R>,
        schema: &FeatureSchema,
    ) -> Result<Self, StartupError> {
        let headers = reader.headers().map_err(csv_error)?.clone();
        let layout = Layout::resolve(&headers, schema)?;

        let mut records = Vec::new();
        let mut title_index = HashMap::new();

        for (row, result) in reader.records().enumerate() {
            let record = result.map_err(csv_error)?;
            // Header occupies line 1
            let line = record
                .position()
                .map(|p| p.line())
                .unwrap_or(row as u64 + 2);

            let vote_average = parse_cell(
                &record,
                line,
                layout.vote_average,
                VOTE_AVERAGE_COLUMN,
                parse_number,
            )?;
            let features = layout
                .features
                .iter()
                .map(|(idx, name)| parse_cell(&record, line, *idx, name, parse_feature))
                .collect::<Result<Vec<_>, _>>()?;

            let movie = MovieRecord::new(
                cell(&record, layout.id).to_string(),
                cell(&record, layout.title),
                vote_average,
                features,
            );

            title_index.entry(movie.title.clone()).or_insert(records.len());
            records.push(movie);
        }

        if records.is_empty() {
            return Err(StartupError::Empty);
        }

        Ok(Self {
            records,
            feature_columns: layout.features.into_iter().map(|(_, name)| name).collect(),
            title_index,
        })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// All records in file order
    pub fn records(&self) -> &[MovieRecord] {
        &self.records
    }

    pub fn feature_columns(&self) -> &[String] {
        &self.feature_columns
    }

    /// Looks up an already-normalized title; the first matching row wins
    pub fn find_by_title(&self, normalized_title: &str) -> Option<&MovieRecord> {
        self.title_index
            .get(normalized_title)
            .map(|&idx| &self.records[idx])
    }
}

impl Layout {
    fn resolve(headers: &StringRecord, schema: &FeatureSchema) -> Result<Self, StartupError> {
        let mut seen = HashSet::new();
        for header in headers.iter() {
            if !seen.insert(header) {
                return Err(StartupError::DuplicateColumn(header.to_string()));
            }
        }

        let position = |name: &str| {
            headers
                .iter()
                .position(|h| h == name)
                .ok_or_else(|| StartupError::MissingColumn(name.to_string()))
        };

        let id = position(ID_COLUMN)?;
        let title = position(TITLE_COLUMN)?;
        let vote_average = position(VOTE_AVERAGE_COLUMN)?;

        let features: Vec<(usize, String)> = match schema {
            FeatureSchema::Inferred => headers
                .iter()
                .enumerate()
                .filter(|(_, h)| !REQUIRED_COLUMNS.contains(h))
                .map(|(idx, h)| (idx, h.to_string()))
                .collect(),
            FeatureSchema::Explicit(columns) => {
                let listed = |h: &str| columns.iter().any(|c| c == h);
                if let Some(extra) = headers
                    .iter()
                    .find(|h| !REQUIRED_COLUMNS.contains(h) && !listed(h))
                {
                    return Err(StartupError::UnexpectedColumn(extra.to_string()));
                }
                columns
                    .iter()
                    .map(|name| position(name).map(|idx| (idx, name.clone())))
                    .collect::<Result<Vec<_>, _>>()?
            }
        };

        if features.is_empty() {
            return Err(StartupError::NoFeatureColumns);
        }

        Ok(Self {
            id,
            title,
            vote_average,
            features,
        })
    }
}

fn reader_builder() -> ReaderBuilder {
    let mut builder = ReaderBuilder::new();
    // Cells stay as written; numeric parsers trim for themselves
    builder.trim(Trim::Headers);
    builder
}

fn csv_error(source: csv::Error) -> StartupError {
    let line = source.position().map(|p| p.line()).unwrap_or(1);
    StartupError::Csv { line, source }
}

fn cell(record: &StringRecord, idx: usize) -> &str {
    record.get(idx).unwrap_or_default()
}

fn parse_cell(
    record: &StringRecord,
    line: u64,
    idx: usize,
    column: &str,
    parse: fn(&str) -> Option<f64>,
) -> Result<f64, StartupError> {
    let value = cell(record, idx);
    parse(value).ok_or_else(|| StartupError::InvalidValue {
        line,
        column: column.to_string(),
        value: value.to_string(),
    })
}

fn parse_number(value: &str) -> Option<f64> {
    value.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Numbers, or the boolean flags one-hot encoders tend to write
fn parse_feature(value: &str) -> Option<f64> {
    let value = value.trim();
    if value.eq_ignore_ascii_case("true") {
        Some(1.0)
    } else if value.eq_ignore_ascii_case("false") {
        Some(0.0)
    } else {
        parse_number(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const MOVIES: &str = "\
id,title,vote_average,Action,Drama,Sci-Fi
1,Inception,8.8,1,0,1
2,The Notebook,7.9,0,1,0
3,Avatar,7.5,1,0,1
";

    fn load(csv: &str) -> Result<Dataset, StartupError> {
        Dataset::from_reader(csv.as_bytes(), &FeatureSchema::Inferred)
    }

    #[test]
    fn test_loads_records_in_file_order() {
        let dataset = load(MOVIES).unwrap();

        assert_eq!(dataset.len(), 3);
        assert_eq!(dataset.feature_columns(), ["Action", "Drama", "Sci-Fi"]);
        assert_eq!(dataset.records()[0].title, "inception");
        assert_eq!(dataset.records()[0].features, vec![1.0, 0.0, 1.0]);
        assert_eq!(dataset.records()[1].vote_average, 7.9);
    }

    #[test]
    fn test_find_by_title_uses_normalized_key() {
        let dataset = load(MOVIES).unwrap();

        assert_eq!(dataset.find_by_title("avatar").unwrap().id, "3");
        assert!(dataset.find_by_title("Avatar").is_none());
        assert!(dataset.find_by_title("titanic").is_none());
    }

    #[test]
    fn test_duplicate_titles_resolve_to_first_row() {
        let dataset = load(
            "id,title,vote_average,Horror\n10,It,7.3,1\n11,IT,5.1,1\n",
        )
        .unwrap();

        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.find_by_title("it").unwrap().id, "10");
    }

    #[test]
    fn test_titles_keep_padding_but_numbers_are_trimmed() {
        let dataset = load("id,title,vote_average,Action\n1, Up , 8.0 , 1 \n2,Heat,8.3,1\n").unwrap();

        assert_eq!(dataset.records()[0].title, " up ");
        assert_eq!(dataset.records()[0].vote_average, 8.0);
        assert_eq!(dataset.records()[0].features, vec![1.0]);
        assert!(dataset.find_by_title(" up ").is_some());
        assert!(dataset.find_by_title("up").is_none());
    }

    #[test]
    fn test_headers_are_trimmed() {
        let dataset = load(" id , title , vote_average , Action \n1,Up,8.0,1\n").unwrap();
        assert_eq!(dataset.feature_columns(), ["Action"]);
    }

    #[test]
    fn test_boolean_features_are_accepted() {
        let dataset = load("id,title,vote_average,Comedy,Drama\n1,Up,7.9,True,false\n").unwrap();
        assert_eq!(dataset.records()[0].features, vec![1.0, 0.0]);
    }

    #[test]
    fn test_missing_required_column() {
        let err = load("id,title,Action\n1,Inception,1\n").unwrap_err();
        assert!(matches!(err, StartupError::MissingColumn(ref c) if c == "vote_average"));
    }

    #[test]
    fn test_duplicate_column() {
        let err = load("id,title,vote_average,Action,Action\n1,Inception,8.8,1,1\n").unwrap_err();
        assert!(matches!(err, StartupError::DuplicateColumn(ref c) if c == "Action"));
    }

    #[test]
    fn test_no_feature_columns() {
        let err = load("id,title,vote_average\n1,Inception,8.8\n").unwrap_err();
        assert!(matches!(err, StartupError::NoFeatureColumns));
    }

    #[test]
    fn test_invalid_feature_value_reports_line_and_column() {
        let err = load("id,title,vote_average,Action\n1,Inception,8.8,1\n2,Heat,8.3,yes\n").unwrap_err();
        match err {
            StartupError::InvalidValue { line, column, value } => {
                assert_eq!(line, 3);
                assert_eq!(column, "Action");
                assert_eq!(value, "yes");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_empty_vote_average_is_invalid() {
        let err = load("id,title,vote_average,Action\n1,Inception,,1\n").unwrap_err();
        assert!(matches!(err, StartupError::InvalidValue { ref column, .. } if column == "vote_average"));
    }

    #[test]
    fn test_non_finite_values_are_invalid() {
        let err = load("id,title,vote_average,Action\n1,Inception,8.8,NaN\n").unwrap_err();
        assert!(matches!(err, StartupError::InvalidValue { .. }));
    }

    #[test]
    fn test_ragged_row_is_malformed() {
        let err = load("id,title,vote_average,Action\n1,Inception,8.8\n").unwrap_err();
        assert!(matches!(err, StartupError::Csv { .. }));
    }

    #[test]
    fn test_header_only_is_empty() {
        let err = load("id,title,vote_average,Action\n").unwrap_err();
        assert!(matches!(err, StartupError::Empty));
    }

    #[test]
    fn test_explicit_schema_orders_features() {
        let schema = FeatureSchema::Explicit(vec!["Sci-Fi".to_string(), "Action".to_string(), "Drama".to_string()]);
        let dataset = Dataset::from_reader(MOVIES.as_bytes(), &schema).unwrap();

        assert_eq!(dataset.feature_columns(), ["Sci-Fi", "Action", "Drama"]);
        assert_eq!(dataset.records()[1].features, vec![0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_explicit_schema_rejects_unlisted_column() {
        let schema = FeatureSchema::Explicit(vec!["Action".to_string(), "Drama".to_string()]);
        let err = Dataset::from_reader(MOVIES.as_bytes(), &schema).unwrap_err();
        assert!(matches!(err, StartupError::UnexpectedColumn(ref c) if c == "Sci-Fi"));
    }

    #[test]
    fn test_explicit_schema_rejects_missing_column() {
        let schema = FeatureSchema::Explicit(vec![
            "Action".to_string(),
            "Drama".to_string(),
            "Sci-Fi".to_string(),
            "Western".to_string(),
        ]);
        let err = Dataset::from_reader(MOVIES.as_bytes(), &schema).unwrap_err();
        assert!(matches!(err, StartupError::MissingColumn(ref c) if c == "Western"));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().expect("temp file");
        write!(file, "{MOVIES}").expect("write rows");

        let dataset = Dataset::load(file.path(), &FeatureSchema::Inferred).expect("load CSV");
        assert_eq!(dataset.len(), 3);
    }

    #[test]
    fn test_load_missing_file() {
        let err = Dataset::load("/nonexistent/GenerosListo.csv", &FeatureSchema::Inferred).unwrap_err();
        assert!(matches!(err, StartupError::Open { .. }));
    }
}
