//! Numeric cell storage

use crate::cell::{CellAddress, CellRange};
use crate::error::{Error, Result};
use crate::{DEFAULT_COLS, DEFAULT_ROWS};

/// Read access to numeric cell values.
///
/// This is the only view of the table the formula engine gets. Positions are 0-based and
/// every position yields a number: unset or out-of-range cells read as `0.0`.
pub trait CellSource {
    /// Read the value at `(row, col)`
    fn read_cell(&self, row: u32, col: u32) -> f64;

    /// Extent as `(rows, cols)`; every cell outside it reads as `0.0`
    fn dimensions(&self) -> (u32, u32);
}

impl<S: CellSource + ?Sized> CellSource for &S {
    fn read_cell(&self, row: u32, col: u32) -> f64 {
        (**self).read_cell(row, col)
    }

    fn dimensions(&self) -> (u32, u32) {
        (**self).dimensions()
    }
}

/// Fixed-size, row-major store of cell values
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    rows: u32,
    cols: u32,
    values: Vec<f64>,
}

impl Grid {
    /// Create a grid with every cell set to zero
    pub fn new(rows: u32, cols: u32) -> Result<Self> {
        let len = slot_count(rows, cols)?;
        Ok(Self {
            rows,
            cols,
            values: vec![0.0; len],
        })
    }

    /// Number of rows
    pub fn rows(&self) -> u32 {
        self.rows
    }

    /// Number of columns
    pub fn cols(&self) -> u32 {
        self.cols
    }

    /// Whether `(row, col)` lies inside the grid
    pub fn contains(&self, row: u32, col: u32) -> bool {
        row < self.rows && col < self.cols
    }

    /// Value at `(row, col)`, or `None` outside the grid
    pub fn get(&self, row: u32, col: u32) -> Option<f64> {
        self.index(row, col).map(|idx| self.values[idx])
    }

    /// Set the value at `(row, col)`
    pub fn set(&mut self, row: u32, col: u32, value: f64) -> Result<()> {
        let idx = self.checked_index(row, col)?;
        self.values[idx] = value;
        Ok(())
    }

    /// Iterate over `(address, value)` in row-major order
    pub fn iter(&self) -> impl Iterator<Item = (CellAddress, f64)> + '_ {
        let cols = self.cols as usize;
        self.values.iter().enumerate().map(move |(idx, &value)| {
            let addr = CellAddress::new((idx / cols) as u32, (idx % cols) as u32);
            (addr, value)
        })
    }

    /// Bounds of all non-zero cells
    pub fn used_range(&self) -> Option<CellRange> {
        bounding_range(
            self.iter()
                .filter(|(_, value)| *value != 0.0)
                .map(|(addr, _)| addr),
        )
    }

    pub(crate) fn checked_index(&self, row: u32, col: u32) -> Result<usize> {
        if row >= self.rows {
            return Err(Error::RowOutOfBounds(row, self.rows - 1));
        }
        if col >= self.cols {
            return Err(Error::ColumnOutOfBounds(col, self.cols - 1));
        }
        Ok(row as usize * self.cols as usize + col as usize)
    }

    fn index(&self, row: u32, col: u32) -> Option<usize> {
        self.checked_index(row, col).ok()
    }
}

impl Default for Grid {
    fn default() -> Self {
        Self {
            rows: DEFAULT_ROWS,
            cols: DEFAULT_COLS,
            values: vec![0.0; DEFAULT_ROWS as usize * DEFAULT_COLS as usize],
        }
    }
}

impl CellSource for Grid {
    fn read_cell(&self, row: u32, col: u32) -> f64 {
        match self.get(row, col) {
            Some(value) => value,
            None => {
                tracing::trace!(row, col, "read outside grid, using 0");
                0.0
            }
        }
    }

    fn dimensions(&self) -> (u32, u32) {
        (self.rows, self.cols)
    }
}

/// Row-major store of optional formula text, parallel to a [`Grid`]
#[derive(Debug, Clone, PartialEq)]
pub struct FormulaTable {
    cols: u32,
    slots: Vec<Option<String>>,
}

impl FormulaTable {
    /// Create an empty formula table
    pub fn new(rows: u32, cols: u32) -> Result<Self> {
        let len = slot_count(rows, cols)?;
        Ok(Self {
            cols,
            slots: vec![None; len],
        })
    }

    /// Formula text at `(row, col)`
    pub fn get(&self, row: u32, col: u32) -> Option<&str> {
        self.index(row, col)
            .and_then(|idx| self.slots[idx].as_deref())
    }

    /// Store formula text at `(row, col)`, returning the previous text
    ///
    /// Positions outside the table are ignored.
    pub fn set(&mut self, row: u32, col: u32, formula: String) -> Option<String> {
        let idx = self.index(row, col)?;
        self.slots[idx].replace(formula)
    }

    /// Clear the slot at `(row, col)`, returning the removed text
    pub fn clear(&mut self, row: u32, col: u32) -> Option<String> {
        let idx = self.index(row, col)?;
        self.slots[idx].take()
    }

    /// Iterate over formula-bearing cells in row-major order
    pub fn iter(&self) -> impl Iterator<Item = (CellAddress, &str)> + '_ {
        let cols = self.cols as usize;
        self.slots.iter().enumerate().filter_map(move |(idx, slot)| {
            slot.as_deref().map(|formula| {
                let addr = CellAddress::new((idx / cols) as u32, (idx % cols) as u32);
                (addr, formula)
            })
        })
    }

    /// Number of stored formulas
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    /// Whether no formula is stored
    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    fn index(&self, row: u32, col: u32) -> Option<usize> {
        if col >= self.cols {
            return None;
        }
        let idx = row as usize * self.cols as usize + col as usize;
        (idx < self.slots.len()).then_some(idx)
    }
}

impl Default for FormulaTable {
    fn default() -> Self {
        Self {
            cols: DEFAULT_COLS,
            slots: vec![None; DEFAULT_ROWS as usize * DEFAULT_COLS as usize],
        }
    }
}

fn slot_count(rows: u32, cols: u32) -> Result<usize> {
    if rows == 0 || cols == 0 {
        return Err(Error::InvalidDimensions { rows, cols });
    }
    (rows as usize)
        .checked_mul(cols as usize)
        .ok_or(Error::InvalidDimensions { rows, cols })
}

pub(crate) fn bounding_range(addrs: impl Iterator<Item = CellAddress>) -> Option<CellRange> {
    addrs.fold(None, |bounds: Option<CellRange>, addr| {
        Some(match bounds {
            None => CellRange::single(addr),
            Some(range) => CellRange::from_indices(
                range.start.row.min(addr.row),
                range.start.col.min(addr.col),
                range.end.row.max(addr.row),
                range.end.col.max(addr.col),
            ),
        })
    })
}
