//! Writing a user's transactions to a CSV file in the export directory.

use std::{
    fs::{self, File},
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use rusqlite::Connection;
use serde::Serialize;
use time::OffsetDateTime;

use crate::{
    Error, UserID, endpoints,
    export::{ExportRow, ExportRows},
};

/// The header line of every export file.
pub const EXPORT_HEADER: [&str; 6] = ["ID", "Amount", "Type", "Category", "Date", "Description"];

/// Chooses the file name of an export from the user and the time of the export.
pub type ExportNamer = fn(UserID, OffsetDateTime) -> String;

/// Where export files are written and how they are named.
///
/// Each user's exports go in their own subdirectory, e.g. `static/1/`, and
/// are served from the matching URL path, e.g. `/static/1/`.
#[derive(Debug, Clone)]
pub struct ExportConfig {
    /// The directory export files are written to.
    pub directory: PathBuf,
    /// Picks the file name for each export.
    pub file_name: ExportNamer,
}

impl ExportConfig {
    /// Write exports to `directory` with timestamped file names.
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            file_name: timestamped_file_name,
        }
    }

    /// The directory holding the export files of `user_id`.
    pub fn user_directory(&self, user_id: UserID) -> PathBuf {
        self.directory.join(user_id.to_string())
    }
}

/// Whether `file_name` could name a finished export file.
///
/// Rejects anything that could escape the user's export directory, as well as
/// hidden and partially written files.
pub fn is_export_file_name(file_name: &str) -> bool {
    file_name.ends_with(".csv")
        && !file_name.starts_with('.')
        && !file_name.contains(['/', '\\'])
}

/// Name an export after the user and the time, e.g. `transactions_1_20240305_134501.csv`.
pub fn timestamped_file_name(user_id: UserID, now: OffsetDateTime) -> String {
    format!(
        "transactions_{}_{:04}{:02}{:02}_{:02}{:02}{:02}.csv",
        user_id,
        now.year(),
        u8::from(now.month()),
        now.day(),
        now.hour(),
        now.minute(),
        now.second()
    )
}

/// A finished export file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportArtifact {
    /// Where the file was written on disk.
    #[serde(skip)]
    pub path: PathBuf,
    /// The URL path the file can be downloaded from.
    #[serde(rename = "file")]
    pub url: String,
    /// The number of transactions in the file, not counting the header.
    pub rows: usize,
}

pub(crate) fn export_failed(error: impl std::fmt::Display) -> Error {
    Error::ExportFailed(error.to_string())
}

/// Write the export header followed by `rows` as CSV.
///
/// Returns the number of rows written, not counting the header.
///
/// # Errors
/// Returns the first error yielded by `rows`, or [Error::ExportFailed] if
/// writing fails.
pub fn write_export_csv<W: Write>(
    rows: impl Iterator<Item = Result<ExportRow, Error>>,
    writer: W,
) -> Result<usize, Error> {
    let mut csv_writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);

    csv_writer.write_record(EXPORT_HEADER).map_err(export_failed)?;

    let mut count = 0;
    for row in rows {
        csv_writer.serialize(row?).map_err(export_failed)?;
        count += 1;
    }

    csv_writer.flush().map_err(export_failed)?;

    Ok(count)
}

/// Export all of the user's transactions to a new CSV file.
///
/// The file is first written under a temporary name and only renamed to its
/// final name once complete. On failure the temporary file is removed.
///
/// # Errors
/// Returns [Error::ExportFailed] if the file cannot be written, or
/// [Error::SqlError] if reading the transactions fails.
pub fn export_transactions(
    user_id: UserID,
    now: OffsetDateTime,
    config: &ExportConfig,
    connection: &Connection,
) -> Result<ExportArtifact, Error> {
    let file_name = (config.file_name)(user_id, now);
    let directory = config.user_directory(user_id);
    let path = directory.join(&file_name);
    let partial_path = path.with_extension("csv.partial");

    fs::create_dir_all(&directory)
        .inspect_err(|error| {
            tracing::error!(
                "could not create export directory {}: {error}",
                directory.display()
            )
        })
        .map_err(export_failed)?;

    let rows = write_partial_file(user_id, &partial_path, &path, connection).inspect_err(|error| {
        tracing::error!("could not export transactions for user {user_id}: {error}");

        if partial_path.exists() {
            let _ = fs::remove_file(&partial_path);
        }
    })?;

    tracing::info!("exported {rows} transactions for user {user_id} to {}", path.display());

    Ok(ExportArtifact {
        url: format!(
            "{}/{}",
            endpoints::format_endpoint(endpoints::EXPORT_FILES, user_id.as_i64()),
            file_name
        ),
        path,
        rows,
    })
}

fn write_partial_file(
    user_id: UserID,
    partial_path: &Path,
    path: &Path,
    connection: &Connection,
) -> Result<usize, Error> {
    let mut export_rows = ExportRows::prepare(user_id, connection)?;
    let file = File::create(partial_path).map_err(export_failed)?;

    let rows = write_export_csv(export_rows.iter()?, BufWriter::new(file))?;
    fs::rename(partial_path, path).map_err(export_failed)?;

    Ok(rows)
}
