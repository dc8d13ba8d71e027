mod deck;
mod grid;
mod image_pipeline;

use std::path::PathBuf;

use image::imageops::FilterType;
use image::{Rgb, RgbImage};
use log::{debug, warn};

pub use deck::{SlideDeck, SlideGroup};
pub use grid::{
    partition::{partition, Canvas, CellBox},
    planner::{plan, GridPolicy, GridSpec},
};
pub use image_pipeline::{
    fit::{effective_dpi, fit, CellFitter, Placement, ScalePolicy, DEFAULT_DPI},
    loader::{is_supported_image, ImageAsset},
    resolution::{jfif_dpi, png_dpi},
};

#[derive(Debug, thiserror::Error)]
pub enum LayoutError {
    #[error("invalid layout input: {0}")]
    InvalidInput(String),
}

/// One image that could not be opened or measured.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("failed to decode {}: {reason}", .path.display())]
pub struct DecodeFailure {
    pub path: PathBuf,
    pub reason: String,
}

#[derive(Clone, Debug)]
pub struct LayoutOptions {
    pub canvas: Canvas,
    /// Gap in inches between cells and around the canvas edge.
    pub margin: f32,
    pub grid: GridPolicy,
    pub scale: ScalePolicy,
    /// Raster density used by [`SlideComposer::render_slide`].
    pub pixels_per_inch: f32,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            canvas: Canvas::default(),
            margin: 0.2,
            grid: GridPolicy::default(),
            scale: ScalePolicy::default(),
            pixels_per_inch: 144.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct PlacedImage {
    pub path: PathBuf,
    /// Row-major cell index, equal to the image's position in its group.
    pub cell: usize,
    pub placement: Placement,
}

pub type ImageOutcome = Result<PlacedImage, DecodeFailure>;

#[derive(Clone, Debug)]
pub struct SlideLayout {
    pub title: Option<String>,
    pub grid: GridSpec,
    pub cells: Vec<CellBox>,
    /// One entry per input image, in input order.
    pub images: Vec<ImageOutcome>,
}

impl SlideLayout {
    pub fn placed(&self) -> impl Iterator<Item = &PlacedImage> {
        self.images.iter().filter_map(|outcome| outcome.as_ref().ok())
    }

    pub fn failures(&self) -> impl Iterator<Item = &DecodeFailure> {
        self.images.iter().filter_map(|outcome| outcome.as_ref().err())
    }
}

#[derive(Clone, Debug)]
pub struct RenderedSlide {
    pub title: Option<String>,
    pub image: RgbImage,
    /// Images that measured fine but failed to decode for pasting.
    pub skipped: Vec<DecodeFailure>,
}

#[derive(Default)]
pub struct SlideComposer;

impl SlideComposer {
    /// Probes every image in `group` and lays the slide out.
    ///
    /// Images that fail to probe are reported in [`SlideLayout::images`] and their cell stays
    /// empty; the remaining images are still placed.
    pub fn layout_slide(
        &self,
        group: &SlideGroup,
        options: &LayoutOptions,
    ) -> Result<SlideLayout, LayoutError> {
        let probed = group.images.iter().map(ImageAsset::probe).collect();
        self.layout_probed(group.title.clone(), probed, options)
    }

    /// Lays out images whose dimensions are already known.
    pub fn layout_assets(
        &self,
        assets: &[ImageAsset],
        options: &LayoutOptions,
    ) -> Result<SlideLayout, LayoutError> {
        let probed = assets.iter().cloned().map(Ok).collect();
        self.layout_probed(None, probed, options)
    }

    fn layout_probed(
        &self,
        title: Option<String>,
        probed: Vec<Result<ImageAsset, DecodeFailure>>,
        options: &LayoutOptions,
    ) -> Result<SlideLayout, LayoutError> {
        let grid = options.grid.plan(probed.len())?;
        let cells = partition(options.canvas, options.margin, grid);
        if cells[0].width <= 0.0 || cells[0].height <= 0.0 {
            return Err(LayoutError::InvalidInput(format!(
                "margin {} leaves no room for a {}x{} grid on a {}x{} canvas",
                options.margin, grid.rows, grid.columns, options.canvas.width, options.canvas.height
            )));
        }
        debug!("{} images -> {}x{} grid", probed.len(), grid.rows, grid.columns);

        let fitter = CellFitter::new(options.scale);
        let mut images = Vec::with_capacity(probed.len());
        for (index, asset) in probed.into_iter().enumerate() {
            match asset {
                Ok(asset) => {
                    let placement = fitter.fit(cells[index], asset.width, asset.height, asset.dpi)?;
                    images.push(Ok(PlacedImage { path: asset.path, cell: index, placement }));
                },
                Err(failure) => {
                    warn!("skipping image: {failure}");
                    images.push(Err(failure));
                },
            }
        }

        Ok(SlideLayout { title, grid, cells, images })
    }

    /// Rasterizes a laid-out slide onto a white canvas.
    pub fn render_slide(&self, layout: &SlideLayout, options: &LayoutOptions) -> RenderedSlide {
        let ppi = options.pixels_per_inch.max(1.0);
        let to_px = |inches: f32| (inches * ppi).round().max(0.0) as u32;

        let mut canvas = RgbImage::from_pixel(
            to_px(options.canvas.width).max(1),
            to_px(options.canvas.height).max(1),
            Rgb([255, 255, 255]),
        );
        let mut skipped = Vec::new();

        for placed in layout.placed() {
            // Decoded pixels are dropped at the end of each iteration.
            let source = match image::open(&placed.path) {
                Ok(source) => source,
                Err(err) => {
                    let failure =
                        DecodeFailure { path: placed.path.clone(), reason: err.to_string() };
                    warn!("skipping image: {failure}");
                    skipped.push(failure);
                    continue;
                },
            };

            let width = to_px(placed.placement.width).max(1);
            let height = to_px(placed.placement.height).max(1);
            let resized = source.resize_exact(width, height, FilterType::CatmullRom).to_rgb8();
            image::imageops::overlay(
                &mut canvas,
                &resized,
                i64::from(to_px(placed.placement.left)),
                i64::from(to_px(placed.placement.top)),
            );
        }

        RenderedSlide { title: layout.title.clone(), image: canvas, skipped }
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::approx_eq;

    use super::*;

    fn asset(name: &str, width: u32, height: u32) -> ImageAsset {
        ImageAsset { path: PathBuf::from(name), width, height, dpi: None }
    }

    #[test]
    fn assets_fill_cells_in_order() {
        let composer = SlideComposer::default();
        let options = LayoutOptions::default();
        let assets = [asset("a.png", 400, 300), asset("b.png", 300, 400), asset("c.png", 10, 10)];

        let layout = composer.layout_assets(&assets, &options).unwrap();
        assert_eq!(layout.grid, GridSpec { rows: 2, columns: 2 });
        assert_eq!(layout.cells.len(), 4);

        let placed: Vec<_> = layout.placed().collect();
        assert_eq!(placed.len(), 3);
        for (index, image) in placed.iter().enumerate() {
            let cell = layout.cells[index];
            assert_eq!(image.cell, index);
            assert_eq!(image.path, assets[index].path);
            assert!(image.placement.left >= cell.left - 1e-4);
            assert!(image.placement.left + image.placement.width <= cell.right() + 1e-4);
        }
    }

    #[test]
    fn empty_slide_is_invalid() {
        let composer = SlideComposer::default();
        let result = composer.layout_assets(&[], &LayoutOptions::default());
        assert!(matches!(result, Err(LayoutError::InvalidInput(_))));
    }

    #[test]
    fn threshold_policy_leaves_spare_cells() {
        let options = LayoutOptions { grid: GridPolicy::Threshold, ..LayoutOptions::default() };
        let layout =
            SlideComposer::default().layout_assets(&[asset("a.png", 50, 50)], &options).unwrap();
        assert_eq!(layout.cells.len(), 4);

        let only = layout.placed().next().unwrap();
        let cell = layout.cells[0];
        assert!(approx_eq!(f32, only.placement.height, cell.height, epsilon = 1e-4));
    }

    #[test]
    fn margin_that_swallows_cells_names_the_margin() {
        let options = LayoutOptions { margin: 5.0, ..LayoutOptions::default() };
        let result = SlideComposer::default()
            .layout_assets(&[asset("a.png", 10, 10), asset("b.png", 10, 10)], &options);

        match result {
            Err(LayoutError::InvalidInput(message)) => assert!(message.contains("margin 5")),
            other => panic!("expected margin error, got {other:?}"),
        }
    }

    #[test]
    fn rendered_slide_keeps_title() {
        let layout = SlideLayout {
            title: Some("kitchen".into()),
            grid: GridSpec { rows: 1, columns: 1 },
            cells: Vec::new(),
            images: Vec::new(),
        };
        let options = LayoutOptions::default();
        let rendered = SlideComposer::default().render_slide(&layout, &options);
        assert_eq!(rendered.title.as_deref(), Some("kitchen"));
        assert!(rendered.skipped.is_empty());
    }
}
