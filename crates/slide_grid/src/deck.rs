use std::collections::HashSet;
use std::io;
use std::path::{Path, PathBuf};

use log::debug;
use walkdir::WalkDir;

use crate::image_pipeline::loader::is_supported_image;

/// Images assigned to one slide, in placement order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SlideGroup {
    /// Caption carried through to [`crate::SlideLayout`] and [`crate::RenderedSlide`] for the
    /// document writer; the source folder name in directory mode.
    pub title: Option<String>,
    pub images: Vec<PathBuf>,
}

impl SlideGroup {
    pub fn new(images: Vec<PathBuf>) -> Self {
        Self { title: None, images }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}

/// Caller-owned list of slides.
///
/// Repeating an image across slides is allowed; [`SlideDeck::duplicates_of`] lets the caller
/// decide what to do about it.
#[derive(Clone, Debug, Default)]
pub struct SlideDeck {
    groups: Vec<SlideGroup>,
}

impl SlideDeck {
    pub fn new() -> Self {
        Self::default()
    }

    /// One slide per sub-directory of `root`, in name order.
    ///
    /// Each slide holds the supported images directly inside its directory, sorted by name.
    /// Directories without images are skipped.
    pub fn from_directory(root: &Path) -> io::Result<Self> {
        let folders = WalkDir::new(root)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
            .into_iter()
            .collect::<Result<Vec<_>, _>>()
            .map_err(io::Error::from)?
            .into_iter()
            .filter(|entry| entry.file_type().is_dir())
            .map(|entry| entry.into_path());

        let mut deck = Self::new();
        for folder in folders {
            let images: Vec<PathBuf> = WalkDir::new(&folder)
                .min_depth(1)
                .max_depth(1)
                .sort_by_file_name()
                .into_iter()
                .filter_map(|entry| entry.ok())
                .filter(|entry| entry.file_type().is_file())
                .map(|entry| entry.into_path())
                .filter(|path| is_supported_image(path))
                .collect();

            if images.is_empty() {
                debug!("skipping {}: no images", folder.display());
                continue;
            }

            let mut group = SlideGroup::new(images);
            if let Some(name) = folder.file_name() {
                group = group.with_title(name.to_string_lossy());
            }
            deck.push_group(group);
        }

        Ok(deck)
    }

    pub fn push_group(&mut self, group: SlideGroup) {
        self.groups.push(group);
    }

    pub fn groups(&self) -> &[SlideGroup] {
        &self.groups
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn clear(&mut self) {
        self.groups.clear();
    }

    /// Paths in `candidate` that an existing slide already uses, in candidate order.
    pub fn duplicates_of(&self, candidate: &SlideGroup) -> Vec<PathBuf> {
        let used: HashSet<&Path> =
            self.groups.iter().flat_map(|group| group.images.iter().map(PathBuf::as_path)).collect();
        candidate.images.iter().filter(|path| used.contains(path.as_path())).cloned().collect()
    }
}
