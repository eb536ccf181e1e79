//! Label encoding for categorical columns.
//!
//! Maps each distinct string value of a column to an integer code. Codes are
//! assigned in sorted order of the values observed at fit time, so a value's
//! code is its position in [`LabelEncoder::classes`].

use crate::errors::ModelError;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

/// Fitted label encoder.
///
/// Serializes as the ordered class list, e.g. `["Flat","House","Plot"]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct LabelEncoder {
    classes: Vec<String>,
    index: HashMap<String, usize>,
}

impl LabelEncoder {
    /// Fit an encoder on the observed values of one column.
    pub fn fit<I, S>(values: I) -> Result<Self, ModelError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let distinct: BTreeSet<String> = values
            .into_iter()
            .map(|v| v.as_ref().to_string())
            .collect();

        if distinct.is_empty() {
            return Err(ModelError::EmptyEncoder);
        }

        Ok(Self::from_sorted(distinct.into_iter().collect()))
    }

    fn from_sorted(classes: Vec<String>) -> Self {
        let index = classes
            .iter()
            .enumerate()
            .map(|(code, class)| (class.clone(), code))
            .collect();
        Self { classes, index }
    }

    /// Classes in code order
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Code for a value seen at fit time
    pub fn transform(&self, value: &str) -> Result<usize, ModelError> {
        self.index
            .get(value)
            .copied()
            .ok_or_else(|| ModelError::UnknownCategory(value.to_string()))
    }

    /// Encode a whole column, failing on the first unseen value
    pub fn transform_all<S: AsRef<str>>(&self, values: &[S]) -> Result<Vec<usize>, ModelError> {
        values.iter().map(|v| self.transform(v.as_ref())).collect()
    }

    /// Original value for a code
    pub fn inverse_transform(&self, code: usize) -> Result<&str, ModelError> {
        self.classes
            .get(code)
            .map(String::as_str)
            .ok_or(ModelError::UnknownCode {
                code,
                classes: self.classes.len(),
            })
    }
}

impl TryFrom<Vec<String>> for LabelEncoder {
    type Error = String;

    fn try_from(classes: Vec<String>) -> Result<Self, Self::Error> {
        if classes.is_empty() {
            return Err("encoder has no classes".to_string());
        }
        if let Some(pair) = classes.windows(2).find(|w| w[0] >= w[1]) {
            return Err(format!(
                "encoder classes must be strictly sorted, found `{}` before `{}`",
                pair[0], pair[1]
            ));
        }
        Ok(Self::from_sorted(classes))
    }
}

impl From<LabelEncoder> for Vec<String> {
    fn from(encoder: LabelEncoder) -> Self {
        encoder.classes
    }
}
