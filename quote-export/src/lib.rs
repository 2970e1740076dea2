//! Exporting quotes outside the store: JSON copies and printable PDFs.

mod anonymize;
mod error;
mod json;
mod labels;
mod money;
mod naming;
mod pdf;

pub use anonymize::{MASK, anonymized};
pub use error::ExportError;
pub use json::export_json;
pub use labels::{Labels, Language};
pub use money::{format_money, format_quantity};
pub use naming::default_pdf_name;
pub use pdf::{PdfOptions, export_pdf, render_pdf};
