use quote_core::GeneralInfo;

const RESERVED: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Suggested PDF file name: `client - plate - date.pdf`, skipping blank
/// parts, or `quote.pdf` when all are blank. Runs of control characters
/// and others not allowed in file names collapse to one `_`.
pub fn default_pdf_name(general: &GeneralInfo) -> String {
    let parts: Vec<&str> = [&general.client, &general.license_plate, &general.quote_date]
        .into_iter()
        .map(|part| part.trim())
        .filter(|part| !part.is_empty())
        .collect();

    let base = parts.join(" - ");
    let base = if base.is_empty() { "quote" } else { base.as_str() };

    let mut name = String::with_capacity(base.len() + 4);
    let mut in_reserved_run = false;
    for ch in base.chars() {
        if RESERVED.contains(&ch) || ch.is_control() {
            if !in_reserved_run {
                name.push('_');
            }
            in_reserved_run = true;
        } else {
            name.push(ch);
            in_reserved_run = false;
        }
    }
    name.push_str(".pdf");
    name
}
