use quote_core::QuoteDocument;

/// Placeholder printed instead of personal details.
pub const MASK: &str = "***";

/// Copy of `quote` with client, plate, chassis and insurer masked.
///
/// Blank fields stay blank. Model, year, date and all amounts are kept.
pub fn anonymized(quote: &QuoteDocument) -> QuoteDocument {
    let mut copy = quote.clone();
    let general = &mut copy.general;
    for field in [
        &mut general.client,
        &mut general.license_plate,
        &mut general.chassis,
        &mut general.insurance,
    ] {
        if !field.trim().is_empty() {
            *field = MASK.to_string();
        }
    }
    copy
}
