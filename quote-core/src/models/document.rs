use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::calculations::recalculate;
use crate::lenient;
use crate::models::{ComplementaryRows, GeneralInfo, LineItem, QuoteTotals};

/// A repair estimate: the unit of persistence and of recalculation.
///
/// Reading is lenient: any JSON object deserializes, with missing or
/// malformed parts replaced by their defaults. Derived fields are read as
/// stored and are only brought up to date by [`recalculate`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuoteDocument {
    #[serde(deserialize_with = "lenient::or_default")]
    pub general: GeneralInfo,
    /// Insertion order is display order.
    #[serde(deserialize_with = "lenient_items")]
    pub items: Vec<LineItem>,
    pub complementary: ComplementaryRows,

    // Calculated values
    #[serde(deserialize_with = "lenient::or_default")]
    pub totals: QuoteTotals,
}

impl QuoteDocument {
    /// A blank quote dated today, already recalculated.
    pub fn new() -> Self {
        let mut document = Self {
            general: GeneralInfo::dated_today(),
            ..Default::default()
        };
        recalculate(&mut document);
        document
    }

    /// Reads a document from any JSON value. Never fails: a value that is
    /// not an object yields the default document.
    pub fn from_value(value: Value) -> Self {
        serde_json::from_value(value).unwrap_or_default()
    }

    /// Parses JSON text. Only syntax errors are reported; shape problems
    /// are absorbed the same way as [`QuoteDocument::from_value`].
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        let value: Value = serde_json::from_str(text)?;
        Ok(Self::from_value(value))
    }

    /// Two-space indented JSON, the on-disk format.
    pub fn to_pretty_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

fn lenient_items<'de, D>(deserializer: D) -> Result<Vec<LineItem>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Array(entries) => entries
            .into_iter()
            .map(|entry| serde_json::from_value(entry).unwrap_or_default())
            .collect(),
        _ => Vec::new(),
    })
}
