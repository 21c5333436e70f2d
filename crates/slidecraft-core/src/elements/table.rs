//! Table element.

use super::ElementBase;
use crate::geometry::BBox;
use crate::style::{Border, Fill, TextRun, VerticalAlign};
use serde::{Deserialize, Serialize};

fn default_span() -> u32 {
    1
}

fn default_cell_padding() -> f64 {
    8.0
}

/// One grid cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableCell {
    #[serde(default)]
    pub runs: Vec<TextRun>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill: Option<Fill>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border: Option<Border>,
    #[serde(default = "default_cell_padding")]
    pub padding: f64,
    #[serde(default)]
    pub vertical_align: VerticalAlign,
    #[serde(default = "default_span")]
    pub row_span: u32,
    #[serde(default = "default_span")]
    pub col_span: u32,
}

impl Default for TableCell {
    fn default() -> Self {
        Self {
            runs: Vec::new(),
            fill: None,
            border: None,
            padding: default_cell_padding(),
            vertical_align: VerticalAlign::Top,
            row_span: default_span(),
            col_span: default_span(),
        }
    }
}

/// A grid of text cells.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableElement {
    #[serde(flatten)]
    pub base: ElementBase,
    pub rows: usize,
    pub cols: usize,
    /// Row-major cells, `rows` rows of `cols` cells each.
    pub cells: Vec<Vec<TableCell>>,
    #[serde(default)]
    pub header_row: bool,
}

impl TableElement {
    /// An empty `rows` x `cols` table.
    pub fn new(bbox: BBox, rows: usize, cols: usize) -> Self {
        Self {
            base: ElementBase::new(bbox),
            rows,
            cols,
            cells: vec![vec![TableCell::default(); cols]; rows],
            header_row: false,
        }
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&TableCell> {
        self.cells.get(row).and_then(|r| r.get(col))
    }

    /// Whether the grid matches the declared row and column counts.
    pub fn is_consistent(&self) -> bool {
        self.cells.len() == self.rows && self.cells.iter().all(|r| r.len() == self.cols)
    }
}
