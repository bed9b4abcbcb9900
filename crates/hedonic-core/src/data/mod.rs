//! Tabular dataset handling
//!
//! - CSV loading with per-column type inference
//! - Dummy encoding of categorical predictors into a design matrix
//! - Row subsetting for partitions and resamples

mod resample;
mod split;

pub use resample::bootstrap_indices;
pub use split::train_test_split;

use crate::errors::{StatsError, StatsResult};
use std::collections::BTreeSet;
use std::path::Path;

/// Values of a single dataset column
#[derive(Debug, Clone)]
pub enum ColumnData {
    /// Numeric values; unparseable/empty cells are carried as NaN
    Numeric(Vec<f64>),
    /// Categorical levels kept as raw strings
    Categorical(Vec<String>),
}

impl ColumnData {
    pub fn len(&self) -> usize {
        match self {
            ColumnData::Numeric(v) => v.len(),
            ColumnData::Categorical(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A named dataset column
#[derive(Debug, Clone)]
pub struct Column {
    pub name: String,
    pub data: ColumnData,
}

/// In-memory tabular dataset with one designated response column
#[derive(Debug, Clone)]
pub struct Dataset {
    columns: Vec<Column>,
    response: String,
}

/// Encoded design matrix: numeric predictors plus dummy-coded categoricals
///
/// Encoding happens once over the full dataset so that dummy columns stay
/// consistent across partitions; partitions are taken by row subsetting.
#[derive(Debug, Clone)]
pub struct DesignMatrix {
    /// Design column names; dummies are named `predictor=level`
    pub column_names: Vec<String>,
    /// Column-major design values
    pub columns: Vec<Vec<f64>>,
    /// Response values
    pub response: Vec<f64>,
    /// Source predictor names, in dataset column order
    pub predictor_names: Vec<String>,
    /// For each design column, the index of its source predictor
    pub groups: Vec<usize>,
}

impl Dataset {
    /// Build a dataset from pre-constructed columns
    pub fn new(columns: Vec<Column>, response: &str) -> StatsResult<Self> {
        if columns.is_empty() {
            return Err(StatsError::EmptyInput { field: "columns" });
        }
        let n = columns[0].data.len();
        for col in &columns {
            if col.data.len() != n {
                return Err(StatsError::DimensionMismatchMsg(format!(
                    "column {} has {} rows, expected {}",
                    col.name,
                    col.data.len(),
                    n
                )));
            }
        }
        if !columns.iter().any(|c| c.name == response) {
            return Err(StatsError::MissingColumn(response.to_string()));
        }
        Ok(Self {
            columns,
            response: response.to_string(),
        })
    }

    /// Load a CSV file, inferring each column as numeric or categorical
    ///
    /// A column is numeric iff every non-empty cell parses as f64; empty
    /// cells in numeric columns become NaN and are dropped at fit time.
    pub fn from_csv<P: AsRef<Path>>(path: P, response: &str) -> StatsResult<Self> {
        let path = path.as_ref();
        let mut reader = csv::Reader::from_path(path).map_err(|e| StatsError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        let headers: Vec<String> = reader
            .headers()
            .map_err(|e| StatsError::CsvParse {
                line: 1,
                message: format!("failed to read headers: {e}"),
            })?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();

        if headers.is_empty() {
            return Err(StatsError::EmptyInput { field: "headers" });
        }

        let mut cells: Vec<Vec<String>> = vec![Vec::new(); headers.len()];
        for (i, record) in reader.records().enumerate() {
            let line = i + 2; // 1-based, after the header row
            let record = record.map_err(|e| StatsError::CsvParse {
                line,
                message: e.to_string(),
            })?;
            if record.len() != headers.len() {
                return Err(StatsError::CsvParse {
                    line,
                    message: format!(
                        "expected {} fields, found {}",
                        headers.len(),
                        record.len()
                    ),
                });
            }
            for (j, field) in record.iter().enumerate() {
                cells[j].push(field.trim().to_string());
            }
        }

        if cells[0].is_empty() {
            return Err(StatsError::EmptyInput { field: "rows" });
        }

        let columns = headers
            .into_iter()
            .zip(cells)
            .map(|(name, raw)| {
                let numeric = raw
                    .iter()
                    .filter(|s| !s.is_empty())
                    .all(|s| s.parse::<f64>().is_ok());
                let has_value = raw.iter().any(|s| !s.is_empty());
                let data = if numeric && has_value {
                    ColumnData::Numeric(
                        raw.iter()
                            .map(|s| s.parse::<f64>().unwrap_or(f64::NAN))
                            .collect(),
                    )
                } else {
                    ColumnData::Categorical(raw)
                };
                Column { name, data }
            })
            .collect();

        Dataset::new(columns, response)
    }

    pub fn n_rows(&self) -> usize {
        self.columns[0].data.len()
    }

    pub fn response_name(&self) -> &str {
        &self.response
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// New dataset containing the given rows, in order (repeats allowed)
    pub fn select_rows(&self, indices: &[usize]) -> StatsResult<Self> {
        let n = self.n_rows();
        if let Some(&bad) = indices.iter().find(|&&i| i >= n) {
            return Err(StatsError::InvalidInput(format!(
                "row index {bad} out of bounds for {n} rows"
            )));
        }
        let columns = self
            .columns
            .iter()
            .map(|col| Column {
                name: col.name.clone(),
                data: match &col.data {
                    ColumnData::Numeric(v) => {
                        ColumnData::Numeric(indices.iter().map(|&i| v[i]).collect())
                    }
                    ColumnData::Categorical(v) => {
                        ColumnData::Categorical(indices.iter().map(|&i| v[i].clone()).collect())
                    }
                },
            })
            .collect();
        Ok(Self {
            columns,
            response: self.response.clone(),
        })
    }

    /// Encode predictors into a design matrix
    ///
    /// Numeric predictors pass through; categorical predictors expand into
    /// drop-first dummy indicators over their sorted levels. Encoding order
    /// is deterministic: dataset column order, then sorted levels.
    pub fn design_matrix(&self) -> StatsResult<DesignMatrix> {
        let response_column = self
            .column(&self.response)
            .ok_or_else(|| StatsError::MissingColumn(self.response.clone()))?;
        let response = match &response_column.data {
            ColumnData::Numeric(v) => v.clone(),
            ColumnData::Categorical(_) => {
                return Err(StatsError::InvalidInput(format!(
                    "response column {} is not numeric",
                    self.response
                )))
            }
        };

        let mut column_names = Vec::new();
        let mut columns: Vec<Vec<f64>> = Vec::new();
        let mut predictor_names = Vec::new();
        let mut groups = Vec::new();

        for col in self.columns.iter().filter(|c| c.name != self.response) {
            let predictor_idx = predictor_names.len();
            predictor_names.push(col.name.clone());
            match &col.data {
                ColumnData::Numeric(v) => {
                    column_names.push(col.name.clone());
                    columns.push(v.clone());
                    groups.push(predictor_idx);
                }
                ColumnData::Categorical(v) => {
                    let levels: BTreeSet<&String> = v.iter().collect();
                    // Drop the first (reference) level
                    for level in levels.into_iter().skip(1) {
                        column_names.push(format!("{}={}", col.name, level));
                        columns.push(
                            v.iter()
                                .map(|x| if x == level { 1.0 } else { 0.0 })
                                .collect(),
                        );
                        groups.push(predictor_idx);
                    }
                }
            }
        }

        Ok(DesignMatrix {
            column_names,
            columns,
            response,
            predictor_names,
            groups,
        })
    }
}

impl DesignMatrix {
    pub fn n_rows(&self) -> usize {
        self.response.len()
    }

    pub fn n_columns(&self) -> usize {
        self.columns.len()
    }

    /// Row subset of the design matrix (repeats allowed)
    pub fn select_rows(&self, indices: &[usize]) -> DesignMatrix {
        DesignMatrix {
            column_names: self.column_names.clone(),
            columns: self
                .columns
                .iter()
                .map(|col| indices.iter().map(|&i| col[i]).collect())
                .collect(),
            response: indices.iter().map(|&i| self.response[i]).collect(),
            predictor_names: self.predictor_names.clone(),
            groups: self.groups.clone(),
        }
    }

    /// Subset of the design columns, preserving order
    pub fn select_columns(&self, col_indices: &[usize]) -> DesignMatrix {
        DesignMatrix {
            column_names: col_indices
                .iter()
                .map(|&j| self.column_names[j].clone())
                .collect(),
            columns: col_indices.iter().map(|&j| self.columns[j].clone()).collect(),
            response: self.response.clone(),
            predictor_names: self.predictor_names.clone(),
            groups: col_indices.iter().map(|&j| self.groups[j]).collect(),
        }
    }

    /// Design-column indices belonging to the given predictors
    pub fn columns_for_predictors(&self, predictor_indices: &[usize]) -> Vec<usize> {
        (0..self.columns.len())
            .filter(|&j| predictor_indices.contains(&self.groups[j]))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;

    fn toy_dataset() -> Dataset {
        Dataset::new(
            vec![
                Column {
                    name: "price".into(),
                    data: ColumnData::Numeric(vec![100.0, 200.0, 150.0, 300.0]),
                },
                Column {
                    name: "area".into(),
                    data: ColumnData::Numeric(vec![50.0, 80.0, 60.0, 120.0]),
                },
                Column {
                    name: "zone".into(),
                    data: ColumnData::Categorical(vec![
                        "a".into(),
                        "b".into(),
                        "c".into(),
                        "b".into(),
                    ]),
                },
            ],
            "price",
        )
        .unwrap()
    }

    #[test]
    fn test_design_matrix_encoding() {
        let design = toy_dataset().design_matrix().unwrap();

        // area passes through; zone expands into b and c dummies (a dropped)
        assert_eq!(design.column_names, vec!["area", "zone=b", "zone=c"]);
        assert_eq!(design.columns[1], vec![0.0, 1.0, 0.0, 1.0]);
        assert_eq!(design.columns[2], vec![0.0, 0.0, 1.0, 0.0]);
        assert_eq!(design.groups, vec![0, 1, 1]);
        assert_eq!(design.predictor_names, vec!["area", "zone"]);
    }

    #[test]
    fn test_select_rows_repeats() {
        let ds = toy_dataset();
        let sub = ds.select_rows(&[0, 0, 3]).unwrap();
        assert_eq!(sub.n_rows(), 3);
        match &sub.column("area").unwrap().data {
            ColumnData::Numeric(v) => assert_eq!(v, &vec![50.0, 50.0, 120.0]),
            _ => panic!("area should stay numeric"),
        }
    }

    #[test]
    fn test_select_rows_out_of_bounds() {
        let ds = toy_dataset();
        assert!(ds.select_rows(&[4]).is_err());
    }

    #[test]
    fn test_columns_for_predictors() {
        let design = toy_dataset().design_matrix().unwrap();
        assert_eq!(design.columns_for_predictors(&[1]), vec![1, 2]);
        assert_eq!(design.columns_for_predictors(&[0, 1]), vec![0, 1, 2]);
    }

    #[test]
    fn test_categorical_response_rejected() {
        let ds = Dataset::new(
            vec![
                Column {
                    name: "y".into(),
                    data: ColumnData::Categorical(vec!["lo".into(), "hi".into()]),
                },
                Column {
                    name: "x".into(),
                    data: ColumnData::Numeric(vec![1.0, 2.0]),
                },
            ],
            "y",
        )
        .unwrap();
        assert!(ds.design_matrix().is_err());
    }

    #[test]
    fn test_from_csv_inference() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "price,area,mainroad").unwrap();
        writeln!(file, "13300000,7420,yes").unwrap();
        writeln!(file, "12250000,8960,no").unwrap();
        writeln!(file, "12250000,9960,yes").unwrap();
        file.flush().unwrap();

        let ds = Dataset::from_csv(file.path(), "price").unwrap();
        assert_eq!(ds.n_rows(), 3);
        assert!(matches!(
            ds.column("area").unwrap().data,
            ColumnData::Numeric(_)
        ));
        assert!(matches!(
            ds.column("mainroad").unwrap().data,
            ColumnData::Categorical(_)
        ));

        let design = ds.design_matrix().unwrap();
        // "no" is the reference level
        assert_eq!(design.column_names, vec!["area", "mainroad=yes"]);
        assert_eq!(design.columns[1], vec![1.0, 0.0, 1.0]);
    }

    #[test]
    fn test_from_csv_missing_response() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "a,b").unwrap();
        writeln!(file, "1,2").unwrap();
        file.flush().unwrap();

        assert!(matches!(
            Dataset::from_csv(file.path(), "price"),
            Err(StatsError::MissingColumn(_))
        ));
    }
}
