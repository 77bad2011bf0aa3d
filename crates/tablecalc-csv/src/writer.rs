//! CSV writer

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::error::CsvResult;
use crate::options::{CsvWriteOptions, LineTerminator};
use tablecalc_core::Table;

/// CSV file writer
pub struct CsvWriter;

impl CsvWriter {
    /// Write a table to a CSV file
    pub fn write_file<P: AsRef<Path>>(
        table: &Table,
        path: P,
        options: &CsvWriteOptions,
    ) -> CsvResult<()> {
        let file = File::create(path)?;
        Self::write(table, file, options)
    }

    /// Write a table to a writer
    ///
    /// Covers A1 through the bottom-right corner of the used range, so cell positions
    /// survive a round trip. Zero values outside formula cells are written as empty fields.
    pub fn write<W: Write>(table: &Table, writer: W, options: &CsvWriteOptions) -> CsvResult<()> {
        let terminator = match options.line_terminator {
            LineTerminator::LF => csv::Terminator::Any(b'\n'),
            LineTerminator::CRLF => csv::Terminator::CRLF,
            LineTerminator::CR => csv::Terminator::Any(b'\r'),
        };

        let mut csv_writer = csv::WriterBuilder::new()
            .delimiter(options.delimiter)
            .quote(options.quote)
            .terminator(terminator)
            .from_writer(writer);

        if let Some(range) = table.used_range() {
            for row in 0..=range.end.row {
                let mut record = Vec::with_capacity(range.end.col as usize + 1);

                for col in 0..=range.end.col {
                    let formula = table.get_formula_at(row, col);
                    let value = table.get_value_at(row, col);

                    let field = match formula {
                        Some(text) if options.write_formulas => text.to_string(),
                        Some(_) => format_number(value),
                        None if value == 0.0 => String::new(),
                        None => format_number(value),
                    };
                    record.push(field);
                }

                csv_writer.write_record(&record)?;
            }

            tracing::debug!(range = %range, "wrote CSV table");
        }

        csv_writer.flush()?;
        Ok(())
    }
}

/// Format a number the way it reads back: no trailing `.0` on whole numbers
fn format_number(value: f64) -> String {
    value.to_string()
}
