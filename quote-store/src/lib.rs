mod names;
mod repository;

pub use names::{MAX_NAME_LEN, sanitize_name};
pub use repository::{DEFAULT_DIR_NAME, FsQuoteRepository};
