//! Grid placement of parallel copies.

use nalgebra::{Point3, Vector3};
use scenario_types::DisplayConfig;

/// Grid position of one copy.
///
/// Copies fill a column top to bottom (`display_rows` per column) before
/// moving to the next column. Every `copies_per_floor` copies start a new
/// floor, stacked along Z.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct GridCell {
    /// Row within the column.
    pub row: usize,
    /// Column.
    pub column: usize,
    /// Floor.
    pub floor: usize,
}

impl GridCell {
    /// Cell of copy `copy`.
    ///
    /// # Example
    ///
    /// ```
    /// use scenario_core::GridCell;
    /// use scenario_types::DisplayConfig;
    ///
    /// let display = DisplayConfig::new(2, 100.0, 200.0, 1000.0, 4);
    /// let cell = GridCell::for_copy(5, &display);
    /// assert_eq!((cell.row, cell.column, cell.floor), (1, 2, 1));
    /// ```
    #[must_use]
    pub fn for_copy(copy: usize, display: &DisplayConfig) -> Self {
        let rows = display.display_rows.max(1);
        Self {
            row: copy % rows,
            column: copy / rows,
            floor: copy / display.copies_per_floor.max(1),
        }
    }

    /// World offset added to every template pose of the copy.
    #[must_use]
    pub fn offset(&self, display: &DisplayConfig) -> Vector3<f64> {
        Vector3::new(
            self.column as f64 * display.column_offset,
            self.row as f64 * display.row_offset,
            self.floor as f64 * display.floor_offset,
        )
    }
}

/// Origin of floor `floor`.
#[must_use]
pub fn floor_origin(floor: usize, display: &DisplayConfig) -> Point3<f64> {
    Point3::new(0.0, 0.0, floor as f64 * display.floor_offset)
}
