//! CSV reader

use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::{CsvError, CsvResult};
use crate::options::CsvReadOptions;
use tablecalc_core::{Table, TableOptions};

/// Parsed content of one field
#[derive(Debug, Clone, PartialEq)]
enum Field {
    Empty,
    Number(f64),
    Formula(String),
}

/// CSV file reader
pub struct CsvReader;

impl CsvReader {
    /// Read a CSV file into a table
    pub fn read_file<P: AsRef<Path>>(path: P, options: &CsvReadOptions) -> CsvResult<Table> {
        let file = File::open(path)?;
        Self::read(file, options)
    }

    /// Read CSV from a reader into a table
    ///
    /// Formulas are stored without being evaluated.
    pub fn read<R: Read>(reader: R, options: &CsvReadOptions) -> CsvResult<Table> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .delimiter(options.delimiter)
            .quote(options.quote)
            .has_headers(options.has_header)
            .flexible(true)
            .trim(if options.trim {
                csv::Trim::All
            } else {
                csv::Trim::None
            })
            .from_reader(reader);

        // Parse everything first; the table size depends on the data
        let mut rows: Vec<Vec<Field>> = Vec::new();
        for (row_idx, result) in csv_reader.records().enumerate() {
            let record = result?;
            let fields = record
                .iter()
                .enumerate()
                .map(|(col_idx, field)| Self::parse_field(field, row_idx, col_idx))
                .collect::<CsvResult<Vec<_>>>()?;
            rows.push(fields);
        }

        let data_rows = u32::try_from(rows.len()).unwrap_or(u32::MAX);
        let data_cols = rows.iter().map(Vec::len).max().unwrap_or(0);
        let data_cols = u32::try_from(data_cols).unwrap_or(u32::MAX);
        let table_options = TableOptions {
            rows: options.table.rows.max(data_rows),
            cols: options.table.cols.max(data_cols),
        };

        let mut table = Table::with_options(&table_options)?;
        let mut formula_count = 0;

        for (row, fields) in (0u32..).zip(rows) {
            for (col, field) in (0u32..).zip(fields) {
                match field {
                    Field::Empty => {}
                    Field::Number(n) => table.set_cell_value_at(row, col, n)?,
                    Field::Formula(text) => {
                        table.store_formula_at(row, col, &text)?;
                        formula_count += 1;
                    }
                }
            }
        }

        tracing::debug!(
            rows = data_rows,
            cols = data_cols,
            formulas = formula_count,
            "read CSV table"
        );

        Ok(table)
    }

    /// Classify a field as empty, number or formula
    fn parse_field(field: &str, row_idx: usize, col_idx: usize) -> CsvResult<Field> {
        if field.is_empty() {
            return Ok(Field::Empty);
        }

        if field.starts_with('=') {
            return Ok(Field::Formula(field.to_string()));
        }

        field
            .parse::<f64>()
            .map(Field::Number)
            .map_err(|_| CsvError::Parse {
                row: row_idx + 1,
                column: col_idx + 1,
                message: format!("expected a number or a formula, found {:?}", field),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Cursor;

    fn read(data: &str) -> CsvResult<Table> {
        CsvReader::read(Cursor::new(data), &CsvReadOptions::default())
    }

    #[test]
    fn test_read_values_and_formulas() {
        let table = read("1,2\n3,=A1+B1\n").unwrap();
        assert_eq!(table.get_value("A1").unwrap(), 1.0);
        assert_eq!(table.get_value("B1").unwrap(), 2.0);
        assert_eq!(table.get_value("A2").unwrap(), 3.0);
        assert_eq!(table.get_formula("B2").unwrap(), Some("=A1+B1"));
        // Not evaluated yet
        assert_eq!(table.get_value("B2").unwrap(), 0.0);
    }

    #[test]
    fn test_read_empty_fields_and_ragged_rows() {
        let table = read("1\n,,5\n\n").unwrap();
        assert_eq!(table.get_value("A1").unwrap(), 1.0);
        assert_eq!(table.get_value("C2").unwrap(), 5.0);
        assert_eq!(table.formula_count(), 0);
    }

    #[test]
    fn test_read_trims_and_quotes() {
        let table = read(" 2.5 ,\"=SUM(A1, 1)\", 7 \n").unwrap();
        assert_eq!(table.get_value("A1").unwrap(), 2.5);
        assert_eq!(table.get_formula("B1").unwrap(), Some("=SUM(A1, 1)"));
        assert_eq!(table.get_value("C1").unwrap(), 7.0);
    }

    #[test]
    fn test_read_skips_header() {
        let options = CsvReadOptions {
            has_header: true,
            ..Default::default()
        };
        let table = CsvReader::read(Cursor::new("price,qty\n4,5\n"), &options).unwrap();
        assert_eq!(table.get_value("A1").unwrap(), 4.0);
        assert_eq!(table.get_value("B1").unwrap(), 5.0);
    }

    #[test]
    fn test_read_grows_table() {
        let options = CsvReadOptions {
            table: TableOptions { rows: 2, cols: 2 },
            ..Default::default()
        };
        let table = CsvReader::read(Cursor::new("1,2,3\n4\n5\n"), &options).unwrap();
        assert_eq!(table.rows(), 3);
        assert_eq!(table.cols(), 3);
        assert_eq!(table.get_value("A3").unwrap(), 5.0);

        let table = read("1\n").unwrap();
        assert_eq!(table.rows(), 100);
        assert_eq!(table.cols(), 26);
    }

    #[test]
    fn test_read_rejects_text() {
        match read("1,2\n3,hello\n") {
            Err(CsvError::Parse { row, column, .. }) => {
                assert_eq!((row, column), (2, 2));
            }
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_read_semicolon_delimiter() {
        let options = CsvReadOptions {
            delimiter: b';',
            ..Default::default()
        };
        let table = CsvReader::read(Cursor::new("1;=A1*2\n"), &options).unwrap();
        assert_eq!(table.get_value("A1").unwrap(), 1.0);
        assert_eq!(table.get_formula("B1").unwrap(), Some("=A1*2"));
    }
}
