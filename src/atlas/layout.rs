//! Square grid sizing for uniformly sized atlas cells.

use crate::error::{AtlasError, Result};

/// Grid dimensions derived from element count and cell size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutPlan {
    /// Nominal element size, excluding border.
    pub cell_size: u32,
    /// Padding on each side of a cell.
    pub border: u32,
    /// `cell_size + 2 * border`.
    pub cell_stride: u32,
    /// Cells per row, `ceil(sqrt(count))`.
    pub columns: u32,
    /// Rows actually occupied.
    pub rows: u32,
    /// Number of cells in use.
    pub element_count: u32,
    /// Edge of the square canvas, rounded up to the block alignment.
    pub canvas_edge: u32,
}

impl LayoutPlan {
    /// Plan a square grid for `element_count` cells of `cell_size` pixels.
    pub fn plan(element_count: usize, cell_size: u32, border: u32, block_align: u32) -> Result<Self> {
        if element_count == 0 {
            return Err(AtlasError::InvalidLayout("element count is zero".to_string()));
        }
        if cell_size == 0 {
            return Err(AtlasError::InvalidLayout("cell size is zero".to_string()));
        }
        if block_align == 0 {
            return Err(AtlasError::InvalidLayout("block alignment is zero".to_string()));
        }

        let element_count = u32::try_from(element_count).map_err(|_| {
            AtlasError::InvalidLayout(format!("{} elements is too many", element_count))
        })?;

        let columns = ceil_sqrt(element_count);
        let rows = element_count.div_ceil(columns);
        let cell_stride = border
            .checked_mul(2)
            .and_then(|b| b.checked_add(cell_size))
            .ok_or_else(|| overflow(cell_size, border))?;
        let raw_edge = columns
            .checked_mul(cell_stride)
            .ok_or_else(|| overflow(cell_size, border))?;
        let canvas_edge = raw_edge
            .checked_next_multiple_of(block_align)
            .ok_or_else(|| overflow(cell_size, border))?;

        Ok(Self {
            cell_size,
            border,
            cell_stride,
            columns,
            rows,
            element_count,
            canvas_edge,
        })
    }

    /// Grid edge before block alignment, `columns * cell_stride`.
    pub fn raw_edge(&self) -> u32 {
        self.columns * self.cell_stride
    }

    /// Grid position of the `index`-th cell, as (row, column).
    pub fn cell_position(&self, index: usize) -> (u32, u32) {
        let index = index as u32;
        (index / self.columns, index % self.columns)
    }

    /// Top-left pixel of the `index`-th cell's content area (inside the border).
    pub fn cell_origin(&self, index: usize) -> (u32, u32) {
        let (row, col) = self.cell_position(index);
        (
            col * self.cell_stride + self.border,
            row * self.cell_stride + self.border,
        )
    }

    /// UV span shared by every cell, `cell_size / canvas_edge`.
    pub fn uv_span(&self) -> f32 {
        self.cell_size as f32 / self.canvas_edge as f32
    }
}

fn overflow(cell_size: u32, border: u32) -> AtlasError {
    AtlasError::InvalidLayout(format!(
        "canvas for {}px cells with {}px border overflows",
        cell_size, border
    ))
}

/// Smallest `c` with `c * c >= n`.
fn ceil_sqrt(n: u32) -> u32 {
    let n = n as u64;
    let mut c = (n as f64).sqrt() as u64;
    while c * c < n {
        c += 1;
    }
    while c > 1 && (c - 1) * (c - 1) >= n {
        c -= 1;
    }
    c.max(1) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Row-major cursor walk that wraps once x reaches the unaligned edge.
    fn cursor_origins(plan: &LayoutPlan) -> Vec<(u32, u32)> {
        let mut origins = Vec::new();
        let (mut x, mut y) = (plan.border, plan.border);
        for _ in 0..plan.element_count {
            origins.push((x, y));
            x += plan.cell_stride;
            if x >= plan.raw_edge() {
                x = plan.border;
                y += plan.cell_stride;
            }
        }
        origins
    }

    #[test]
    fn test_four_elements_with_border() {
        let plan = LayoutPlan::plan(4, 8, 1, 4).unwrap();
        assert_eq!(plan.columns, 2);
        assert_eq!(plan.rows, 2);
        assert_eq!(plan.cell_stride, 10);
        assert_eq!(plan.raw_edge(), 20);
        assert_eq!(plan.canvas_edge, 20);
        assert!((plan.uv_span() - 0.4).abs() < 1e-6);
    }

    #[test]
    fn test_five_elements_no_border() {
        let plan = LayoutPlan::plan(5, 8, 0, 4).unwrap();
        assert_eq!(plan.columns, 3);
        assert_eq!(plan.rows, 2);
        assert_eq!(plan.cell_stride, 8);
        assert_eq!(plan.canvas_edge, 24);
        assert_eq!(plan.cell_position(4), (1, 1));
        assert_eq!(plan.cell_origin(4), (8, 8));
    }

    #[test]
    fn test_edge_rounded_to_block() {
        // 3 columns of 7 + 2 = 27, rounded to 28
        let plan = LayoutPlan::plan(9, 7, 1, 4).unwrap();
        assert_eq!(plan.raw_edge(), 27);
        assert_eq!(plan.canvas_edge, 28);

        let unaligned = LayoutPlan::plan(9, 7, 1, 1).unwrap();
        assert_eq!(unaligned.canvas_edge, 27);
    }

    #[test]
    fn test_single_element() {
        let plan = LayoutPlan::plan(1, 16, 0, 4).unwrap();
        assert_eq!(plan.columns, 1);
        assert_eq!(plan.rows, 1);
        assert_eq!(plan.canvas_edge, 16);
        assert_eq!(plan.uv_span(), 1.0);
    }

    #[test]
    fn test_columns_are_ceil_sqrt() {
        for count in 1..=200usize {
            let plan = LayoutPlan::plan(count, 4, 1, 4).unwrap();
            let expected = (count as f64).sqrt().ceil() as u32;
            assert_eq!(plan.columns, expected, "count {}", count);
            assert!(plan.canvas_edge >= plan.raw_edge());
            assert_eq!(plan.canvas_edge % 4, 0);
            assert!(plan.canvas_edge - plan.raw_edge() < 4);
        }
    }

    #[test]
    fn test_index_mapping_matches_cursor_wrap() {
        for &(count, cell, border) in &[(5, 8, 0), (7, 8, 1), (10, 3, 2), (17, 5, 4), (1, 1, 0)] {
            let plan = LayoutPlan::plan(count, cell, border, 4).unwrap();
            let by_index: Vec<_> = (0..count).map(|i| plan.cell_origin(i)).collect();
            assert_eq!(by_index, cursor_origins(&plan));
        }
    }

    #[test]
    fn test_invalid_inputs() {
        assert!(matches!(LayoutPlan::plan(0, 8, 1, 4), Err(AtlasError::InvalidLayout(_))));
        assert!(matches!(LayoutPlan::plan(4, 0, 1, 4), Err(AtlasError::InvalidLayout(_))));
        assert!(matches!(LayoutPlan::plan(4, 8, 1, 0), Err(AtlasError::InvalidLayout(_))));
        assert!(matches!(
            LayoutPlan::plan(4, u32::MAX, 1, 4),
            Err(AtlasError::InvalidLayout(_))
        ));
    }

    #[test]
    fn test_span_ignores_border() {
        let thin = LayoutPlan::plan(4, 8, 0, 4).unwrap();
        let thick = LayoutPlan::plan(4, 8, 3, 4).unwrap();
        assert_eq!(thin.uv_span(), 8.0 / thin.canvas_edge as f32);
        assert_eq!(thick.uv_span(), 8.0 / thick.canvas_edge as f32);
    }
}
