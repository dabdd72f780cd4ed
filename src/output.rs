use std::fs::{self, File};
use std::io::{self, Write};
use std::path::Path;

use rust_xlsxwriter::{Format, Workbook};
use serde::Serialize;
use tempfile::NamedTempFile;

use crate::app::RunResult;
use crate::domain::OutputFormat;
use crate::error::KiraError;
use crate::table::Table;

#[derive(Debug, Clone, Copy)]
pub enum OutputMode {
    Interactive,
    NonInteractive,
}

pub struct JsonOutput;

impl JsonOutput {
    pub fn print_run(result: &RunResult) -> io::Result<()> {
        Self::print_json(result)
    }

    fn print_json<T: Serialize>(value: &T) -> io::Result<()> {
        let json = serde_json::to_string_pretty(value).map_err(io::Error::other)?;
        let mut stdout = io::stdout();
        stdout.write_all(json.as_bytes())?;
        stdout.write_all(b"\n")?;
        Ok(())
    }
}

// Extensions other than csv/xlsx are rejected before anything is written.
pub fn save(table: &Table, path: &Path) -> Result<(), KiraError> {
    let format = OutputFormat::from_path(path)
        .ok_or_else(|| KiraError::UnsupportedOutputFormat(path.to_path_buf()))?;
    let bytes = match format {
        OutputFormat::Csv => csv_bytes(table)?,
        OutputFormat::Xlsx => xlsx_bytes(table)?,
    };
    write_atomic(path, &bytes)
}

pub fn load_csv(path: &Path) -> Result<Table, KiraError> {
    let file = File::open(path)
        .map_err(|err| KiraError::Filesystem(format!("open {}: {err}", path.display())))?;
    let mut table = Table::from_csv(file)?;
    if let Some(first) = table.columns().first().cloned() {
        table.set_index(&first)?;
    }
    Ok(table)
}

fn csv_bytes(table: &Table) -> Result<Vec<u8>, KiraError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record(table.columns())
        .map_err(|err| KiraError::Filesystem(err.to_string()))?;
    for row in table.rows() {
        writer
            .write_record(row)
            .map_err(|err| KiraError::Filesystem(err.to_string()))?;
    }
    writer
        .into_inner()
        .map_err(|err| KiraError::Filesystem(err.to_string()))
}

fn xlsx_bytes(table: &Table) -> Result<Vec<u8>, KiraError> {
    let mut workbook = Workbook::new();
    let header = Format::new().set_bold();
    let worksheet = workbook.add_worksheet();

    for (col, name) in table.columns().iter().enumerate() {
        let col = u16::try_from(col).map_err(|err| KiraError::Spreadsheet(err.to_string()))?;
        worksheet
            .write_string_with_format(0, col, name, &header)
            .map_err(|err| KiraError::Spreadsheet(err.to_string()))?;
    }
    for (row_idx, row) in table.rows().iter().enumerate() {
        let row_num =
            u32::try_from(row_idx + 1).map_err(|err| KiraError::Spreadsheet(err.to_string()))?;
        for (col, cell) in row.iter().enumerate() {
            let col = u16::try_from(col).map_err(|err| KiraError::Spreadsheet(err.to_string()))?;
            worksheet
                .write_string(row_num, col, cell)
                .map_err(|err| KiraError::Spreadsheet(err.to_string()))?;
        }
    }

    workbook
        .save_to_buffer()
        .map_err(|err| KiraError::Spreadsheet(err.to_string()))
}

fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), KiraError> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent).map_err(|err| KiraError::Filesystem(err.to_string()))?;
    let mut temp =
        NamedTempFile::new_in(parent).map_err(|err| KiraError::Filesystem(err.to_string()))?;
    temp.write_all(bytes)
        .map_err(|err| KiraError::Filesystem(err.to_string()))?;
    temp.persist(path)
        .map_err(|err| KiraError::Filesystem(err.to_string()))?;
    Ok(())
}
