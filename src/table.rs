use std::collections::{HashMap, HashSet};
use std::io::Read;

use crate::error::KiraError;

const RIGHT_SUFFIX: &str = "_right";

// When an index is set it is always the first column.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
    index: Option<String>,
}

impl Table {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
            index: None,
        }
    }

    pub fn with_rows(columns: Vec<String>, rows: Vec<Vec<String>>) -> Result<Self, KiraError> {
        if let Some(row) = rows.iter().find(|row| row.len() != columns.len()) {
            return Err(KiraError::SchemaMismatch(format!(
                "row has {} cells, expected {}",
                row.len(),
                columns.len()
            )));
        }
        Ok(Self {
            columns,
            rows,
            index: None,
        })
    }

    pub fn from_csv<R: Read>(reader: R) -> Result<Self, KiraError> {
        Self::parse_csv(reader, |cell| cell.to_string())
    }

    // SPARQL endpoints may pad cells after the delimiter.
    pub fn from_sparql_csv<R: Read>(reader: R) -> Result<Self, KiraError> {
        Self::parse_csv(reader, |cell| cell.trim_start().to_string())
    }

    fn parse_csv<R, F>(reader: R, cell: F) -> Result<Self, KiraError>
    where
        R: Read,
        F: Fn(&str) -> String,
    {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(reader);
        let columns = reader
            .headers()
            .map_err(|err| KiraError::CsvParse(err.to_string()))?
            .iter()
            .map(&cell)
            .collect::<Vec<_>>();
        let rows = reader
            .records()
            .map(|record| {
                record
                    .map(|record| record.iter().map(&cell).collect::<Vec<_>>())
                    .map_err(|err| KiraError::CsvParse(err.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::with_rows(columns, rows)
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn index(&self) -> Option<&str> {
        self.index.as_deref()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn position(&self, column: &str) -> Result<usize, KiraError> {
        self.columns
            .iter()
            .position(|name| name == column)
            .ok_or_else(|| KiraError::MissingColumn(column.to_string()))
    }

    pub fn column(&self, column: &str) -> Result<Vec<&str>, KiraError> {
        let pos = self.position(column)?;
        Ok(self.rows.iter().map(|row| row[pos].as_str()).collect())
    }

    /// Rewrites every cell of `column`. The table is untouched if any cell
    /// fails.
    pub fn map_column<F>(&mut self, column: &str, f: F) -> Result<(), KiraError>
    where
        F: Fn(&str) -> Result<String, KiraError>,
    {
        let pos = self.position(column)?;
        let mapped = self
            .rows
            .iter()
            .map(|row| f(&row[pos]))
            .collect::<Result<Vec<_>, _>>()?;
        for (row, value) in self.rows.iter_mut().zip(mapped) {
            row[pos] = value;
        }
        Ok(())
    }

    pub fn set_index(&mut self, column: &str) -> Result<(), KiraError> {
        let pos = self.position(column)?;
        if pos != 0 {
            let name = self.columns.remove(pos);
            self.columns.insert(0, name);
            for row in &mut self.rows {
                let cell = row.remove(pos);
                row.insert(0, cell);
            }
        }
        self.index = Some(column.to_string());
        Ok(())
    }

    pub fn unique(&self, column: &str) -> Result<Vec<String>, KiraError> {
        let mut seen = HashSet::new();
        Ok(self
            .column(column)?
            .into_iter()
            .filter(|value| seen.insert(*value))
            .map(str::to_string)
            .collect())
    }

    pub fn concat<I>(tables: I) -> Result<Table, KiraError>
    where
        I: IntoIterator<Item = Table>,
    {
        let mut tables = tables.into_iter();
        let Some(mut result) = tables.next() else {
            return Ok(Table::default());
        };
        for table in tables {
            if table.columns != result.columns || table.index != result.index {
                return Err(KiraError::SchemaMismatch(format!(
                    "[{}] vs [{}]",
                    result.columns.join(", "),
                    table.columns.join(", ")
                )));
            }
            result.rows.extend(table.rows);
        }
        Ok(result)
    }

    /// Left join of `self.on` against the index of `other`. A key matching
    /// several rows repeats the left row; unmatched keys get empty cells.
    pub fn join(&self, other: &Table, on: &str) -> Result<Table, KiraError> {
        let key_pos = self.position(on)?;
        let other_index = other
            .index()
            .ok_or_else(|| KiraError::MissingColumn(format!("index of table joined on {on}")))?;
        let other_index_pos = other.position(other_index)?;

        let mut lookup = HashMap::<&str, Vec<&Vec<String>>>::new();
        for row in &other.rows {
            lookup
                .entry(row[other_index_pos].as_str())
                .or_default()
                .push(row);
        }

        let right_positions = (0..other.columns.len())
            .filter(|pos| *pos != other_index_pos)
            .collect::<Vec<_>>();
        let mut columns = self.columns.clone();
        for pos in &right_positions {
            let name = &other.columns[*pos];
            if self.columns.contains(name) {
                columns.push(format!("{name}{RIGHT_SUFFIX}"));
            } else {
                columns.push(name.clone());
            }
        }

        let mut rows = Vec::with_capacity(self.rows.len());
        for row in &self.rows {
            match lookup.get(row[key_pos].as_str()) {
                Some(matches) => {
                    for matched in matches {
                        let mut joined = row.clone();
                        joined.extend(right_positions.iter().map(|pos| matched[*pos].clone()));
                        rows.push(joined);
                    }
                }
                None => {
                    let mut joined = row.clone();
                    joined.extend(right_positions.iter().map(|_| String::new()));
                    rows.push(joined);
                }
            }
        }

        Ok(Table {
            columns,
            rows,
            index: self.index.clone(),
        })
    }
}
