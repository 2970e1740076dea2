use std::path::Path;

use quote_core::{QuoteDocument, recalculated};
use tracing::info;

use crate::ExportError;

/// Writes the recalculated quote as pretty JSON to exactly `path`.
///
/// The parent directory must already exist.
pub fn export_json(
    quote: &QuoteDocument,
    path: &Path,
) -> Result<(), ExportError> {
    let json = recalculated(quote.clone()).to_pretty_json()?;
    std::fs::write(path, json).map_err(|source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    info!(file = %path.display(), "Exported quote as JSON");
    Ok(())
}
