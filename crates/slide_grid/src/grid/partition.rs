use super::planner::GridSpec;

/// Slide canvas size in inches.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Canvas {
    pub width: f32,
    pub height: f32,
}

impl Canvas {
    /// 16:9 slide, 13.333" x 7.5".
    pub fn widescreen() -> Self {
        Self { width: 13.333, height: 7.5 }
    }

    /// 4:3 slide, 10" x 7.5".
    pub fn standard() -> Self {
        Self { width: 10.0, height: 7.5 }
    }
}

impl Default for Canvas {
    fn default() -> Self {
        Self::widescreen()
    }
}

/// Rectangle in inches, origin at the top-left corner of the canvas.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CellBox {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl CellBox {
    pub fn right(&self) -> f32 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.top + self.height
    }
}

/// Splits the canvas into `rows * columns` equally sized cells in row-major order.
///
/// Every cell is separated from its neighbours and from the canvas edge by `margin`.
pub fn partition(canvas: Canvas, margin: f32, spec: GridSpec) -> Vec<CellBox> {
    let columns = spec.columns.max(1);
    let rows = spec.rows.max(1);
    let column_gutters = f32::from(columns) + 1.0;
    let row_gutters = f32::from(rows) + 1.0;

    // A margin that would eat the whole canvas is shrunk until cells have zero size.
    let max_margin = (canvas.width / column_gutters).min(canvas.height / row_gutters);
    let margin = margin.clamp(0.0, max_margin.max(0.0));

    let cell_width = ((canvas.width - column_gutters * margin) / f32::from(columns)).max(0.0);
    let cell_height = ((canvas.height - row_gutters * margin) / f32::from(rows)).max(0.0);

    let mut cells = Vec::with_capacity(usize::from(rows) * usize::from(columns));
    for row in 0..rows {
        let top = margin + f32::from(row) * (cell_height + margin);
        for column in 0..columns {
            let left = margin + f32::from(column) * (cell_width + margin);
            cells.push(CellBox { left, top, width: cell_width, height: cell_height });
        }
    }

    cells
}
