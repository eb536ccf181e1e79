//! Fit label encoders on the categorical columns and apply them in place

use crate::dataset::{CleanedTable, ColumnData};
use crate::errors::{Result, TrainerError};
use pricing_core::LabelEncoder;
use std::collections::BTreeMap;
use tracing::debug;

/// Replace each named categorical column with its integer codes.
///
/// Returns the fitted encoder for every column, keyed by column name.
pub fn encode_categoricals(
    table: &mut CleanedTable,
    categorical: &[String],
) -> Result<BTreeMap<String, LabelEncoder>> {
    let mut encoders = BTreeMap::new();

    for name in categorical {
        let column = table
            .columns
            .iter_mut()
            .find(|c| c.name == *name)
            .ok_or_else(|| TrainerError::MissingColumn(name.clone()))?;

        let values = match &column.data {
            ColumnData::Categorical(values) => values,
            ColumnData::Numeric(_) => {
                return Err(TrainerError::Dataset(format!(
                    "column `{name}` is not categorical"
                )))
            }
        };

        let encoder = LabelEncoder::fit(values)?;
        let codes = encoder
            .transform_all(values)?
            .into_iter()
            .map(|code| code as f64)
            .collect();

        debug!("Encoded `{}` with {} classes", name, encoder.len());
        column.data = ColumnData::Numeric(codes);
        encoders.insert(name.clone(), encoder);
    }

    Ok(encoders)
}
