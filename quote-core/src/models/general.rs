use chrono::Local;
use serde::{Deserialize, Serialize};

use crate::lenient;

/// Client and vehicle details printed at the top of a quote.
///
/// None of these fields take part in any calculation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GeneralInfo {
    #[serde(deserialize_with = "lenient::text")]
    pub client: String,
    #[serde(deserialize_with = "lenient::text")]
    pub license_plate: String,
    #[serde(deserialize_with = "lenient::text")]
    pub model: String,
    #[serde(deserialize_with = "lenient::text")]
    pub year: String,
    #[serde(deserialize_with = "lenient::text")]
    pub chassis: String,
    #[serde(deserialize_with = "lenient::text")]
    pub insurance: String,
    /// ISO `YYYY-MM-DD` when set from a fresh quote.
    #[serde(deserialize_with = "lenient::text")]
    pub quote_date: String,
}

impl GeneralInfo {
    /// Empty details dated today (local time).
    pub fn dated_today() -> Self {
        Self {
            quote_date: Local::now().date_naive().format("%Y-%m-%d").to_string(),
            ..Default::default()
        }
    }

    pub fn get(
        &self,
        field: GeneralField,
    ) -> &str {
        match field {
            GeneralField::Client => &self.client,
            GeneralField::LicensePlate => &self.license_plate,
            GeneralField::Model => &self.model,
            GeneralField::Year => &self.year,
            GeneralField::Chassis => &self.chassis,
            GeneralField::Insurance => &self.insurance,
            GeneralField::QuoteDate => &self.quote_date,
        }
    }

    pub fn set(
        &mut self,
        field: GeneralField,
        value: impl Into<String>,
    ) {
        let slot = match field {
            GeneralField::Client => &mut self.client,
            GeneralField::LicensePlate => &mut self.license_plate,
            GeneralField::Model => &mut self.model,
            GeneralField::Year => &mut self.year,
            GeneralField::Chassis => &mut self.chassis,
            GeneralField::Insurance => &mut self.insurance,
            GeneralField::QuoteDate => &mut self.quote_date,
        };
        *slot = value.into();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GeneralField {
    Client,
    LicensePlate,
    Model,
    Year,
    Chassis,
    Insurance,
    QuoteDate,
}

impl GeneralField {
    pub const ALL: [GeneralField; 7] = [
        Self::Client,
        Self::LicensePlate,
        Self::Model,
        Self::Year,
        Self::Chassis,
        Self::Insurance,
        Self::QuoteDate,
    ];

    /// JSON key of the field inside `general`.
    pub fn key(&self) -> &'static str {
        match self {
            Self::Client => "client",
            Self::LicensePlate => "licensePlate",
            Self::Model => "model",
            Self::Year => "year",
            Self::Chassis => "chassis",
            Self::Insurance => "insurance",
            Self::QuoteDate => "quoteDate",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.key() == s)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn parse_accepts_json_keys() {
        assert_eq!(
            GeneralField::parse("licensePlate"),
            Some(GeneralField::LicensePlate)
        );
        assert_eq!(GeneralField::parse("quoteDate"), Some(GeneralField::QuoteDate));
        assert_eq!(GeneralField::parse("license_plate"), None);
    }

    #[test]
    fn set_then_get_round_trips_every_field() {
        let mut general = GeneralInfo::default();

        for field in GeneralField::ALL {
            general.set(field, field.key());
        }

        for field in GeneralField::ALL {
            assert_eq!(general.get(field), field.key());
        }
    }

    #[test]
    fn dated_today_sets_iso_date() {
        let general = GeneralInfo::dated_today();

        assert_eq!(general.quote_date.len(), 10);
        assert_eq!(&general.quote_date[4..5], "-");
        assert!(general.client.is_empty());
    }

    #[test]
    fn deserializes_camel_case_keys() {
        let general: GeneralInfo = serde_json::from_str(
            r#"{ "client": "Rossi", "licensePlate": "AB123CD", "year": 2015 }"#,
        )
        .unwrap();

        assert_eq!(general.client, "Rossi");
        assert_eq!(general.license_plate, "AB123CD");
        assert_eq!(general.year, "2015");
        assert_eq!(general.model, "");
    }
}
