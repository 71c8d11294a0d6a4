//! CSV export of a user's transactions.
//!
//! Rows are streamed from the database straight into a file in the user's
//! export directory, and the file's URL is handed back so the client can
//! download it. Only the owner of an export can download it.

mod artifact;
mod endpoint;
mod rows;

pub use artifact::{
    EXPORT_HEADER, ExportArtifact, ExportConfig, ExportNamer, export_transactions,
    is_export_file_name, timestamped_file_name, write_export_csv,
};
pub use endpoint::{export_transactions_endpoint, get_export_file_endpoint};
pub use rows::{ExportRow, ExportRows};
