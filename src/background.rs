//! Background image loading, aspect-preserving placement and preset discovery.

use std::fs;
use std::path::{Path, PathBuf};

use image::DynamicImage;
use thiserror::Error;

/// Logical size of the drawing surface inside the 800×600 window.
pub const SURFACE_WIDTH: f32 = 800.0;
pub const SURFACE_HEIGHT: f32 = 500.0;

/// Folder scanned for preset images, relative to the working directory.
pub const PRESET_DIR: &str = "preset_images";

/// Extensions accepted for backgrounds, compared case-insensitively.
pub const IMAGE_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "bmp"];

/// The only failure in the system: a background image that cannot be read or
/// decoded. Callers report it once and keep whatever state they had.
#[derive(Debug, Error)]
#[error("failed to load image {path:?}: {source}")]
pub struct BackgroundError {
    path: PathBuf,
    #[source]
    source: image::ImageError,
}

/// Where a scaled background lands on the surface: centering offset plus
/// scaled dimensions.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Placement {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// A loaded background: the original bitmap, its native dimensions and the
/// placement that fits it onto the surface.
#[derive(Debug)]
pub struct Background {
    pub image: DynamicImage,
    pub width: u32,
    pub height: u32,
    pub placement: Placement,
}

impl Background {
    pub fn load(path: &Path, surface_w: f32, surface_h: f32) -> Result<Self, BackgroundError> {
        let image = image::open(path).map_err(|source| BackgroundError {
            path: path.to_path_buf(),
            source,
        })?;
        let (width, height) = (image.width(), image.height());
        let placement = fit(width, height, surface_w, surface_h);
        Ok(Self {
            image,
            width,
            height,
            placement,
        })
    }
}

/// Scales `image_w`×`image_h` to maximally fill the surface while preserving
/// aspect ratio, letterboxing the shorter axis and centering the result.
/// Scaled dimensions are truncated to whole pixels.
pub fn fit(image_w: u32, image_h: u32, surface_w: f32, surface_h: f32) -> Placement {
    let image_ratio = image_w as f64 / image_h as f64;
    let surface_ratio = surface_w as f64 / surface_h as f64;

    let (scaled_w, scaled_h) = if image_ratio > surface_ratio {
        let w = surface_w as f64;
        (w, (w / image_ratio).floor())
    } else {
        let h = surface_h as f64;
        ((h * image_ratio).floor(), h)
    };

    Placement {
        x: ((surface_w as f64 - scaled_w) / 2.0) as f32,
        y: ((surface_h as f64 - scaled_h) / 2.0) as f32,
        width: scaled_w as f32,
        height: scaled_h as f32,
    }
}

/// Names of the image files in the preset folder, sorted for a stable
/// dropdown. The folder is created if absent; an unreadable folder yields an
/// empty list.
pub fn preset_images(dir: &Path) -> Vec<String> {
    if let Err(err) = fs::create_dir_all(dir) {
        log::warn!("could not create preset folder {dir:?}: {err}");
        return Vec::new();
    }
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(err) => {
            log::warn!("could not read preset folder {dir:?}: {err}");
            return Vec::new();
        }
    };

    let mut names: Vec<String> = entries
        .filter_map(|entry| entry.ok())
        .filter(|entry| has_image_extension(&entry.path()))
        .filter_map(|entry| entry.file_name().into_string().ok())
        .collect();
    names.sort();
    names
}

fn has_image_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            IMAGE_EXTENSIONS
                .iter()
                .any(|allowed| ext.eq_ignore_ascii_case(allowed))
        })
}
