//! CSV ingest and cleaning
//!
//! Reads a headered, comma-delimited listing file, drops every row that has
//! a missing value in any field, and keeps the configured columns by name.
//! Categorical columns stay as strings until they are label encoded; all
//! other retained columns must be finite numbers.

use crate::config::DataParams;
use crate::errors::{Result, TrainerError};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

/// Tokens treated as a missing value (compared after trimming)
const NA_TOKENS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

pub fn is_missing(value: &str) -> bool {
    NA_TOKENS.contains(&value.trim())
}

#[derive(Clone, Debug, PartialEq)]
pub enum ColumnData {
    Numeric(Vec<f64>),
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

#[derive(Clone, Debug, PartialEq)]
pub struct Column {
    pub name: String,
    pub data: ColumnData,
}

/// Retained columns of the input after incomplete rows were dropped
#[derive(Clone, Debug, PartialEq)]
pub struct CleanedTable {
    pub columns: Vec<Column>,
    pub rows_read: usize,
    pub rows_dropped: usize,
}

impl CleanedTable {
    pub fn from_csv<P: AsRef<Path>>(path: P, params: &DataParams) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| {
            TrainerError::Dataset(format!("failed to open {}: {}", path.display(), e))
        })?;
        Self::from_reader(file, params)
    }

    pub fn from_reader<R: Read>(reader: R, params: &DataParams) -> Result<Self> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let headers = rdr.headers()?.clone();
        let positions = params
            .columns
            .iter()
            .map(|name| {
                headers
                    .iter()
                    .position(|h| h.trim() == name.as_str())
                    .ok_or_else(|| TrainerError::MissingColumn(name.clone()))
            })
            .collect::<Result<Vec<usize>>>()?;

        let mut columns: Vec<Column> = params
            .columns
            .iter()
            .map(|name| Column {
                name: name.clone(),
                data: if params.is_categorical(name) {
                    ColumnData::Categorical(Vec::new())
                } else {
                    ColumnData::Numeric(Vec::new())
                },
            })
            .collect();

        let mut rows_read = 0;
        let mut rows_dropped = 0;

        for record in rdr.records() {
            let record = record?;
            rows_read += 1;

            // Header is line 1.
            let line = record
                .position()
                .map(|p| p.line())
                .unwrap_or(rows_read as u64 + 1);

            if record.len() > headers.len() {
                return Err(TrainerError::Dataset(format!(
                    "line {}: expected {} fields, found {}",
                    line,
                    headers.len(),
                    record.len()
                )));
            }

            // Short rows are padded with missing values, so they drop too.
            if record.len() < headers.len() || record.iter().any(is_missing) {
                rows_dropped += 1;
                continue;
            }

            for (column, &pos) in columns.iter_mut().zip(&positions) {
                let raw = &record[pos];
                match &mut column.data {
                    ColumnData::Categorical(values) => values.push(raw.to_string()),
                    ColumnData::Numeric(values) => {
                        let value = raw.trim().parse::<f64>().ok().filter(|v| v.is_finite());
                        let value = value.ok_or_else(|| {
                            TrainerError::Dataset(format!(
                                "line {}, column `{}`: `{}` is not a finite number",
                                line, column.name, raw
                            ))
                        })?;
                        values.push(value);
                    }
                }
            }
        }

        let table = Self {
            columns,
            rows_read,
            rows_dropped,
        };

        if table.is_empty() {
            return Err(TrainerError::Dataset(format!(
                "no complete rows remain after dropping {rows_dropped} of {rows_read}"
            )));
        }

        debug!(
            "Retained {} columns, {} rows",
            table.columns.len(),
            table.len()
        );
        Ok(table)
    }

    pub fn len(&self) -> usize {
        self.columns.first().map(|c| c.data.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Split off the target and lay the remaining columns out row by row.
    ///
    /// Every column must be numeric by now, i.e. categoricals are encoded.
    pub fn into_dataset(self, target: &str) -> Result<Dataset> {
        let n = self.len();
        let mut feature_names = Vec::new();
        let mut feature_columns = Vec::new();
        let mut targets = None;

        for column in self.columns {
            let values = match column.data {
                ColumnData::Numeric(values) => values,
                ColumnData::Categorical(_) => {
                    return Err(TrainerError::Dataset(format!(
                        "column `{}` is still categorical",
                        column.name
                    )))
                }
            };

            if column.name == target {
                targets = Some(values);
            } else {
                feature_names.push(column.name);
                feature_columns.push(values);
            }
        }

        let targets = targets.ok_or_else(|| TrainerError::MissingColumn(target.to_string()))?;
        if feature_columns.is_empty() {
            return Err(TrainerError::Dataset("no feature columns".to_string()));
        }

        let features = (0..n)
            .map(|row| feature_columns.iter().map(|col| col[row]).collect())
            .collect();

        Ok(Dataset {
            features,
            targets,
            feature_names,
        })
    }
}

/// Feature matrix and target vector ready for fitting
#[derive(Clone, Debug, PartialEq)]
pub struct Dataset {
    pub features: Vec<Vec<f64>>,
    pub targets: Vec<f64>,
    pub feature_names: Vec<String>,
}

impl Dataset {
    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn feature_count(&self) -> usize {
        self.feature_names.len()
    }

    /// Rows at `indices`, in that order
    pub fn subset(&self, indices: &[usize]) -> Dataset {
        Dataset {
            features: indices.iter().map(|&i| self.features[i].clone()).collect(),
            targets: indices.iter().map(|&i| self.targets[i]).collect(),
            feature_names: self.feature_names.clone(),
        }
    }

    /// (min, max) of every feature column
    pub fn feature_stats(&self) -> Vec<(f64, f64)> {
        let mut stats = vec![(f64::INFINITY, f64::NEG_INFINITY); self.feature_count()];

        for row in &self.features {
            for (i, &val) in row.iter().enumerate() {
                stats[i].0 = stats[i].0.min(val);
                stats[i].1 = stats[i].1.max(val);
            }
        }

        stats
    }

    pub fn log_feature_stats(&self) {
        info!("Feature statistics:");
        for (name, (min, max)) in self.feature_names.iter().zip(self.feature_stats()) {
            info!("  {}: min={}, max={}", name, min, max);
        }
    }
}

/// Count of distinct values per categorical column, for logging
pub fn category_counts(table: &CleanedTable) -> BTreeMap<String, usize> {
    table
        .columns
        .iter()
        .filter_map(|c| match &c.data {
            ColumnData::Categorical(values) => {
                let mut distinct: Vec<&String> = values.iter().collect();
                distinct.sort_unstable();
                distinct.dedup();
                Some((c.name.clone(), distinct.len()))
            }
            ColumnData::Numeric(_) => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn params() -> DataParams {
        DataParams {
            columns: vec!["city".into(), "price".into(), "Area Size".into()],
            target: "price".into(),
            categorical: vec!["city".into()],
        }
    }

    const CSV: &str = "\
id,city,agent,price,Area Size
1,Lahore,Ali,100,5
2,Karachi,,200,10
3,Lahore,Sara,150,7.5
4,,Omar,120,6
5,Islamabad,Zain,NaN,8
6,Karachi,Hina,300,12
";

    #[test]
    fn test_load_drops_incomplete_rows() -> Result<()> {
        let table = CleanedTable::from_reader(CSV.as_bytes(), &params())?;

        assert_eq!(table.rows_read, 6);
        assert_eq!(table.rows_dropped, 3);
        assert_eq!(table.len(), 3);
        assert_eq!(
            table.column("city").unwrap().data,
            ColumnData::Categorical(vec!["Lahore".into(), "Lahore".into(), "Karachi".into()])
        );
        assert_eq!(
            table.column("price").unwrap().data,
            ColumnData::Numeric(vec![100.0, 150.0, 300.0])
        );
        Ok(())
    }

    #[test]
    fn test_missing_in_unretained_column_still_drops() -> Result<()> {
        // Row 2 only lacks `agent`, which is not retained.
        let table = CleanedTable::from_reader(CSV.as_bytes(), &params())?;
        let areas = &table.column("Area Size").unwrap().data;
        assert_eq!(*areas, ColumnData::Numeric(vec![5.0, 7.5, 12.0]));
        Ok(())
    }

    #[test]
    fn test_short_row_is_dropped() -> Result<()> {
        let csv = "city,price,Area Size,agent\nLahore,100,5,A\nKarachi,200,10\nLahore,150,7,B\n";
        let table = CleanedTable::from_reader(csv.as_bytes(), &params())?;

        assert_eq!(table.rows_read, 3);
        assert_eq!(table.rows_dropped, 1);
        assert_eq!(
            table.column("price").unwrap().data,
            ColumnData::Numeric(vec![100.0, 150.0])
        );
        Ok(())
    }

    #[test]
    fn test_long_row_is_an_error() {
        let csv = "city,price,Area Size\nLahore,100,5\nKarachi,200,10,extra\n";
        let err = CleanedTable::from_reader(csv.as_bytes(), &params()).unwrap_err();
        let msg = err.to_string();
        assert!(matches!(err, TrainerError::Dataset(_)));
        assert!(msg.contains("line 3"), "{msg}");
    }

    #[test]
    fn test_columns_selected_by_name_not_position() -> Result<()> {
        let shuffled = "price,Area Size,city\n100,5,Lahore\n200,10,Karachi\n";
        let table = CleanedTable::from_reader(shuffled.as_bytes(), &params())?;

        let names: Vec<&str> = table.columns.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["city", "price", "Area Size"]);
        assert_eq!(
            table.column("price").unwrap().data,
            ColumnData::Numeric(vec![100.0, 200.0])
        );
        Ok(())
    }

    #[test]
    fn test_missing_column_fails_fast() {
        let csv = "city,price\nLahore,100\n";
        let err = CleanedTable::from_reader(csv.as_bytes(), &params()).unwrap_err();
        assert!(matches!(err, TrainerError::MissingColumn(c) if c == "Area Size"));
    }

    #[test]
    fn test_non_numeric_value_is_reported() {
        let csv = "city,price,Area Size\nLahore,100,5\nKarachi,lots,10\n";
        let err = CleanedTable::from_reader(csv.as_bytes(), &params()).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("line 3"), "{msg}");
        assert!(msg.contains("price"), "{msg}");
    }

    #[test]
    fn test_all_rows_incomplete_is_an_error() {
        let csv = "city,price,Area Size\n,100,5\nKarachi,NA,10\n";
        assert!(matches!(
            CleanedTable::from_reader(csv.as_bytes(), &params()),
            Err(TrainerError::Dataset(_))
        ));
    }

    #[test]
    fn test_into_dataset_removes_target() -> Result<()> {
        let csv = "city,price,Area Size\n0,100,5\n1,200,10\n";
        let mut data = params();
        data.categorical.clear();

        let dataset = CleanedTable::from_reader(csv.as_bytes(), &data)?.into_dataset("price")?;

        assert_eq!(dataset.feature_names, vec!["city", "Area Size"]);
        assert_eq!(dataset.features, vec![vec![0.0, 5.0], vec![1.0, 10.0]]);
        assert_eq!(dataset.targets, vec![100.0, 200.0]);
        Ok(())
    }

    #[test]
    fn test_into_dataset_rejects_unencoded_columns() -> Result<()> {
        let table = CleanedTable::from_reader(CSV.as_bytes(), &params())?;
        assert!(table.into_dataset("price").is_err());
        Ok(())
    }

    #[test]
    fn test_feature_stats_and_subset() {
        let dataset = Dataset {
            features: vec![vec![1.0, 9.0], vec![3.0, 4.0], vec![2.0, 6.0]],
            targets: vec![10.0, 30.0, 20.0],
            feature_names: vec!["a".into(), "b".into()],
        };

        assert_eq!(dataset.feature_stats(), vec![(1.0, 3.0), (4.0, 9.0)]);

        let subset = dataset.subset(&[2, 0]);
        assert_eq!(subset.features, vec![vec![2.0, 6.0], vec![1.0, 9.0]]);
        assert_eq!(subset.targets, vec![20.0, 10.0]);
    }

    #[test]
    fn test_from_csv_file() -> Result<()> {
        let mut file = NamedTempFile::new()?;
        file.write_all(CSV.as_bytes())?;
        file.flush()?;

        let table = CleanedTable::from_csv(file.path(), &params())?;
        assert_eq!(table.len(), 3);
        assert_eq!(category_counts(&table)["city"], 2);
        Ok(())
    }
}
