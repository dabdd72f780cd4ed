use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum KiraError {
    #[error("batch size must be at least one, got {0}")]
    InvalidBatchSize(usize),

    #[error("invalid UniProt accession: {0}")]
    InvalidUniprotId(String),

    #[error("invalid Pfam accession: {0}")]
    InvalidPfamId(String),

    #[error("invalid Rhea reaction id: {0}")]
    InvalidRheaId(String),

    #[error("failed to read config file at {0}")]
    ConfigRead(PathBuf),

    #[error("failed to parse JSON config: {0}")]
    ConfigParse(String),

    #[error("SPARQL request failed: {0}")]
    SparqlHttp(String),

    #[error("SPARQL endpoint returned status {status}: {message}")]
    SparqlStatus { status: u16, message: String },

    #[error("malformed CSV response: {0}")]
    CsvParse(String),

    #[error("malformed URI: {0}")]
    MalformedUri(String),

    #[error("expected a non-empty list cell, got {0:?}")]
    EmptyList(String),

    #[error("column not found: {0}")]
    MissingColumn(String),

    #[error("tables have different columns: {0}")]
    SchemaMismatch(String),

    #[error("unsupported output format for {0} (expected .csv or .xlsx)")]
    UnsupportedOutputFormat(PathBuf),

    #[error("spreadsheet error: {0}")]
    Spreadsheet(String),

    #[error("filesystem error: {0}")]
    Filesystem(String),
}
