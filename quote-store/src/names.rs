use quote_core::StoreError;

/// Longest stored name, in characters, excluding the extension.
pub const MAX_NAME_LEN: usize = 120;

const RESERVED: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Turns a user-supplied quote name into a safe file stem.
///
/// Trailing `.json` extensions are dropped, path separators and other
/// characters reserved on common filesystems become `_`, and surrounding
/// whitespace and dots are removed, so a name can never leave the store
/// directory. Cleaning repeats until nothing changes, so a sanitized name
/// sanitizes to itself.
pub fn sanitize_name(name: &str) -> Result<String, StoreError> {
    let mut cleaned = clean_once(name);
    loop {
        let next = clean_once(&cleaned);
        if next == cleaned {
            break;
        }
        cleaned = next;
    }

    if cleaned.is_empty() {
        return Err(StoreError::InvalidName(name.to_string()));
    }
    Ok(cleaned)
}

fn clean_once(name: &str) -> String {
    let mut stem = name.trim();
    while let Some(rest) = stem.strip_suffix(".json") {
        stem = rest.trim_end();
    }

    let replaced: String = stem
        .chars()
        .map(|c| {
            if RESERVED.contains(&c) || c.is_control() {
                '_'
            } else {
                c
            }
        })
        .collect();

    let capped: String = trim_edges(&replaced).chars().take(MAX_NAME_LEN).collect();
    // The cut can expose a trailing dot or space.
    trim_edges(&capped).to_string()
}

fn trim_edges(name: &str) -> &str {
    name.trim_matches(|c: char| c == '.' || c.is_whitespace())
}
