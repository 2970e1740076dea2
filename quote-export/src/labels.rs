use std::fmt;
use std::str::FromStr;

use quote_core::{GeneralField, RowKind};
use serde::{Deserialize, Serialize};

use crate::ExportError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    It,
    En,
}

impl Language {
    pub fn code(&self) -> &'static str {
        match self {
            Self::It => "it",
            Self::En => "en",
        }
    }

    pub fn labels(&self) -> &'static Labels {
        match self {
            Self::It => &ITALIAN,
            Self::En => &ENGLISH,
        }
    }

    /// `(thousands, decimal)` separators.
    pub(crate) fn separators(&self) -> (char, char) {
        match self {
            Self::It => ('.', ','),
            Self::En => (',', '.'),
        }
    }
}

impl FromStr for Language {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "it" | "ita" | "italiano" => Ok(Self::It),
            "en" | "eng" | "english" => Ok(Self::En),
            _ => Err(ExportError::UnknownLanguage(s.to_string())),
        }
    }
}

impl fmt::Display for Language {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Printed captions of a quote.
#[derive(Debug, PartialEq, Eq)]
pub struct Labels {
    pub title: &'static str,

    // General info
    pub client: &'static str,
    pub license_plate: &'static str,
    pub model: &'static str,
    pub year: &'static str,
    pub chassis: &'static str,
    pub insurance: &'static str,
    pub quote_date: &'static str,

    // Line items
    pub source: &'static str,
    pub description: &'static str,
    pub quantity: &'static str,
    pub price: &'static str,
    pub total: &'static str,

    // Complementary rows
    pub parts_total: &'static str,
    pub parts: &'static str,
    pub bodywork: &'static str,
    pub mechanics: &'static str,
    pub consumables: &'static str,
    pub taxable: &'static str,
    pub tax_percentage: &'static str,
    pub tax_amount: &'static str,
    pub total_with_tax: &'static str,

    // Totals
    pub subtotal: &'static str,
    pub total_tax: &'static str,
    pub final_total: &'static str,
    pub page: &'static str,
}

static ITALIAN: Labels = Labels {
    title: "Preventivo",
    client: "Cliente",
    license_plate: "Targa",
    model: "Modello",
    year: "Anno",
    chassis: "Telaio",
    insurance: "Assicurazione",
    quote_date: "Data Preventivo",
    source: "Citaz. fonte",
    description: "Descrizione",
    quantity: "Q.tà",
    price: "Prezzo",
    total: "Totale",
    parts_total: "Totale ricambi",
    parts: "Voci complementari",
    bodywork: "Manodopera Carrozzeria",
    mechanics: "Manodopera Meccanica",
    consumables: "Materiale di consumo",
    taxable: "Imponibile",
    tax_percentage: "IVA %",
    tax_amount: "Imposta",
    total_with_tax: "Totale IVA inclusa",
    subtotal: "Totale imponibile",
    total_tax: "Totale IVA",
    final_total: "Totale Preventivo",
    page: "Pagina",
};

static ENGLISH: Labels = Labels {
    title: "Quote",
    client: "Client",
    license_plate: "License Plate",
    model: "Model",
    year: "Year",
    chassis: "Chassis",
    insurance: "Insurance",
    quote_date: "Quote Date",
    source: "Source",
    description: "Description",
    quantity: "Qty",
    price: "Price",
    total: "Total",
    parts_total: "Parts Total",
    parts: "Complementary Items",
    bodywork: "Bodywork Labour",
    mechanics: "Mechanical Labour",
    consumables: "Consumable Materials",
    taxable: "Taxable Amount",
    tax_percentage: "VAT %",
    tax_amount: "VAT Amount",
    total_with_tax: "Total incl. VAT",
    subtotal: "Total excl. VAT",
    total_tax: "Total VAT",
    final_total: "Final Quote Total",
    page: "Page",
};

impl Labels {
    pub fn row(
        &self,
        kind: RowKind,
    ) -> &'static str {
        match kind {
            RowKind::PartsTotal => self.parts_total,
            RowKind::Parts => self.parts,
            RowKind::Bodywork => self.bodywork,
            RowKind::Mechanics => self.mechanics,
            RowKind::Consumables => self.consumables,
        }
    }

    pub fn general(
        &self,
        field: GeneralField,
    ) -> &'static str {
        match field {
            GeneralField::Client => self.client,
            GeneralField::LicensePlate => self.license_plate,
            GeneralField::Model => self.model,
            GeneralField::Year => self.year,
            GeneralField::Chassis => self.chassis,
            GeneralField::Insurance => self.insurance,
            GeneralField::QuoteDate => self.quote_date,
        }
    }
}
