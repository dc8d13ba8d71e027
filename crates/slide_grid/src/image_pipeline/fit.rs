use crate::grid::partition::CellBox;
use crate::LayoutError;

/// Resolution assumed when an image carries no usable density metadata.
pub const DEFAULT_DPI: f32 = 96.0;

/// Final position and size of one image on the slide, in inches.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Placement {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

/// Whether images smaller than their cell are enlarged.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ScalePolicy {
    /// Always scale so the limiting axis fills the cell.
    #[default]
    Fit,
    /// Only ever shrink; small images keep their physical size.
    ShrinkOnly,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct CellFitter {
    pub scale: ScalePolicy,
}

impl CellFitter {
    pub fn new(scale: ScalePolicy) -> Self {
        Self { scale }
    }

    /// Scales a `width_px` x `height_px` image into `cell`, preserving aspect ratio, and
    /// centers it.
    ///
    /// `dpi` values of 1 or less (or none at all) fall back to [`DEFAULT_DPI`].
    pub fn fit(
        &self,
        cell: CellBox,
        width_px: u32,
        height_px: u32,
        dpi: Option<f32>,
    ) -> Result<Placement, LayoutError> {
        if width_px == 0 || height_px == 0 {
            return Err(LayoutError::InvalidInput(format!(
                "image dimensions must be positive, got {width_px}x{height_px}"
            )));
        }
        if !(cell.width > 0.0 && cell.height > 0.0) {
            return Err(LayoutError::InvalidInput(format!(
                "cell dimensions must be positive, got {}x{}",
                cell.width, cell.height
            )));
        }

        let dpi = effective_dpi(dpi);
        let native_width = width_px as f32 / dpi;
        let native_height = height_px as f32 / dpi;

        let mut scale = (cell.width / native_width).min(cell.height / native_height);
        if self.scale == ScalePolicy::ShrinkOnly {
            scale = scale.min(1.0);
        }

        // Rounding must never push the limiting axis past the cell.
        let width = (native_width * scale).min(cell.width);
        let height = (native_height * scale).min(cell.height);

        Ok(Placement {
            left: cell.left + (cell.width - width) / 2.0,
            top: cell.top + (cell.height - height) / 2.0,
            width,
            height,
        })
    }
}

/// Fits with the default [`ScalePolicy`].
pub fn fit(
    cell: CellBox,
    width_px: u32,
    height_px: u32,
    dpi: Option<f32>,
) -> Result<Placement, LayoutError> {
    CellFitter::default().fit(cell, width_px, height_px, dpi)
}

pub fn effective_dpi(dpi: Option<f32>) -> f32 {
    match dpi {
        Some(dpi) if dpi.is_finite() && dpi > 1.0 => dpi,
        _ => DEFAULT_DPI,
    }
}
