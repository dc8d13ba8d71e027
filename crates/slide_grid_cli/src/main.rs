use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use log::{info, warn};
use slide_grid::{
    Canvas, GridPolicy, LayoutOptions, ScalePolicy, SlideComposer, SlideDeck, SlideLayout,
};

#[derive(Parser, Debug)]
#[command(author, version, about = "Arrange folders of photos into grid slides")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show the grid chosen for a number of images
    Plan(PlanArgs),
    /// Print image placements for every slide folder
    Layout(LayoutArgs),
    /// Render every slide folder to a PNG file
    Render(RenderArgs),
}

#[derive(Parser, Debug)]
struct PlanArgs {
    /// Number of images on the slide
    count: usize,
    /// Grid heuristic
    #[arg(long, value_enum, default_value = "square")]
    grid: GridChoice,
}

#[derive(Parser, Debug)]
struct LayoutArgs {
    /// Directory whose sub-directories each hold one slide's images
    root: PathBuf,
    #[command(flatten)]
    settings: LayoutSettings,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Directory whose sub-directories each hold one slide's images
    root: PathBuf,
    /// Output directory for slide images
    #[arg(short, long)]
    out_dir: PathBuf,
    #[command(flatten)]
    settings: LayoutSettings,
}

#[derive(Parser, Debug, Clone)]
struct LayoutSettings {
    /// Slide size preset
    #[arg(long, value_enum, default_value = "widescreen")]
    canvas: CanvasPreset,
    /// Gap between cells and around the slide edge, in inches
    #[arg(long, default_value_t = 0.2)]
    margin: f32,
    /// Grid heuristic
    #[arg(long, value_enum, default_value = "square")]
    grid: GridChoice,
    /// Whether images smaller than their cell are enlarged
    #[arg(long, value_enum, default_value = "fit")]
    scale: ScaleChoice,
    /// Pixels per inch of rendered slides
    #[arg(long, default_value_t = 144.0)]
    ppi: f32,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum CanvasPreset {
    Widescreen,
    Standard,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum GridChoice {
    Square,
    Threshold,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum ScaleChoice {
    Fit,
    ShrinkOnly,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Plan(args) => plan(args),
        Commands::Layout(args) => layout(args),
        Commands::Render(args) => render(args),
    }
}

fn plan(args: PlanArgs) -> Result<()> {
    let spec = args.grid.to_policy().plan(args.count)?;
    println!("{} images -> {} rows x {} columns", args.count, spec.rows, spec.columns);
    Ok(())
}

fn layout(args: LayoutArgs) -> Result<()> {
    let composer = SlideComposer::default();
    let options = args.settings.to_options()?;
    let deck = load_deck(&args.root)?;

    for (index, group) in deck.groups().iter().enumerate() {
        let slide = composer
            .layout_slide(group, &options)
            .with_context(|| format!("failed to lay out slide {}", index + 1))?;
        print_layout(index, &slide);
    }

    Ok(())
}

fn render(args: RenderArgs) -> Result<()> {
    let composer = SlideComposer::default();
    let options = args.settings.to_options()?;
    let deck = load_deck(&args.root)?;
    std::fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("failed to create output directory {:?}", args.out_dir))?;

    let progress = ProgressBar::new(deck.len() as u64);
    progress.set_style(
        ProgressStyle::with_template(
            "{spinner} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} slides",
        )?
        .progress_chars("=> "),
    );

    let mut skipped = 0;
    for (index, group) in deck.groups().iter().enumerate() {
        let slide = composer
            .layout_slide(group, &options)
            .with_context(|| format!("failed to lay out slide {}", index + 1))?;
        let rendered = composer.render_slide(&slide, &options);
        skipped += slide.failures().count() + rendered.skipped.len();

        let slide_path = args.out_dir.join(format!("slide_{:04}.png", index + 1));
        rendered
            .image
            .save(&slide_path)
            .with_context(|| format!("failed to write {:?}", slide_path))?;
        progress.inc(1);
    }

    if skipped > 0 {
        warn!("{skipped} image(s) could not be added");
    }
    progress.finish_with_message(format!("Slides written to {:?}", args.out_dir));
    Ok(())
}

fn load_deck(root: &Path) -> Result<SlideDeck> {
    let deck = SlideDeck::from_directory(root)
        .with_context(|| format!("failed to read slide folders in {:?}", root))?;
    if deck.is_empty() {
        anyhow::bail!("no slide folders with images found in {:?}", root);
    }
    info!("found {} slides in {:?}", deck.len(), root);
    Ok(deck)
}

fn print_layout(index: usize, slide: &SlideLayout) {
    let title = slide.title.as_deref().unwrap_or("untitled");
    println!(
        "Slide {} ({title}): {} rows x {} columns",
        index + 1,
        slide.grid.rows,
        slide.grid.columns
    );

    for outcome in &slide.images {
        match outcome {
            Ok(placed) => {
                let p = placed.placement;
                println!(
                    "  [{}] {}: left {:.2}in top {:.2}in size {:.2}x{:.2}in",
                    placed.cell,
                    placed.path.display(),
                    p.left,
                    p.top,
                    p.width,
                    p.height
                );
            },
            Err(failure) => println!("  warning: {failure}"),
        }
    }
}

impl LayoutSettings {
    fn to_options(&self) -> Result<LayoutOptions> {
        let canvas = self.canvas.to_canvas();
        let shortest_side = canvas.width.min(canvas.height);
        if !self.margin.is_finite() || self.margin < 0.0 || self.margin * 2.0 >= shortest_side {
            anyhow::bail!(
                "--margin {} must be at least 0 and below {} for a {}x{} canvas",
                self.margin,
                shortest_side / 2.0,
                canvas.width,
                canvas.height
            );
        }

        Ok(LayoutOptions {
            canvas,
            margin: self.margin,
            grid: self.grid.to_policy(),
            scale: self.scale.to_policy(),
            pixels_per_inch: self.ppi.max(1.0),
        })
    }
}

impl CanvasPreset {
    fn to_canvas(self) -> Canvas {
        match self {
            CanvasPreset::Widescreen => Canvas::widescreen(),
            CanvasPreset::Standard => Canvas::standard(),
        }
    }
}

impl GridChoice {
    fn to_policy(self) -> GridPolicy {
        match self {
            GridChoice::Square => GridPolicy::Square,
            GridChoice::Threshold => GridPolicy::Threshold,
        }
    }
}

impl ScaleChoice {
    fn to_policy(self) -> ScalePolicy {
        match self {
            ScaleChoice::Fit => ScalePolicy::Fit,
            ScaleChoice::ShrinkOnly => ScalePolicy::ShrinkOnly,
        }
    }
}
