//! Logo normalization: vector logos are rasterized so the PDF writer only
//! ever embeds bitmaps.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Local;
use log::{debug, info, warn};
use printpdf::image_crate::{self, DynamicImage, GenericImageView, RgbImage};
use resvg::{tiny_skia, usvg};
use thiserror::Error;

use crate::storage::{LogoFormat, StagedFile};

#[derive(Debug, Error)]
pub enum LogoError {
    #[error("failed to read logo: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse SVG: {0}")]
    Svg(String),
    #[error("SVG has an empty canvas ({0}x{1})")]
    EmptyCanvas(u32, u32),
    #[error("failed to encode PNG: {0}")]
    Encode(String),
    #[error("failed to decode image: {0}")]
    Decode(String),
}

/// A raster logo ready for the renderer.
#[derive(Debug)]
pub enum NormalizedLogo<'a> {
    /// The staged upload was already a bitmap.
    Original(&'a Path),
    /// An SVG converted into a scratch PNG, removed when this value drops.
    Converted(StagedFile),
}

impl NormalizedLogo<'_> {
    pub fn path(&self) -> &Path {
        match self {
            Self::Original(path) => path,
            Self::Converted(staged) => staged.path(),
        }
    }
}

/// Returns the raster path to embed, or `None` when an SVG could not be
/// converted. Never fails: the invoice renders without a logo instead.
pub fn normalize<'a>(staged: &'a StagedFile, work_dir: &Path) -> Option<NormalizedLogo<'a>> {
    if !staged.format().is_vector() {
        return Some(NormalizedLogo::Original(staged.path()));
    }

    let target = conversion_path(work_dir);
    match convert_svg_file(staged.path(), &target) {
        Ok(()) => {
            info!("Converted SVG logo to {}", target.display());
            Some(NormalizedLogo::Converted(StagedFile::adopt(target, LogoFormat::Png)))
        }
        Err(e) => {
            warn!("SVG conversion failed, rendering without logo: {}", e);
            let _ = fs::remove_file(&target);
            None
        }
    }
}

fn conversion_path(work_dir: &Path) -> PathBuf {
    let stamp = Local::now().format("%Y%m%d%H%M%S%6f");
    work_dir.join(format!("conv_{}_{}.png", stamp, uuid::Uuid::new_v4().simple()))
}

fn convert_svg_file(svg_path: &Path, png_path: &Path) -> Result<(), LogoError> {
    let data = fs::read(svg_path)?;
    let png = svg_to_png(&data)?;
    fs::write(png_path, png)?;
    Ok(())
}

/// Longest edge, in pixels, of a rasterized SVG logo.
pub const MAX_SVG_EDGE: f32 = 1024.0;

/// Rasterizes an SVG document at its intrinsic size, scaled down so the
/// longer edge is at most [`MAX_SVG_EDGE`] pixels.
pub fn svg_to_png(svg: &[u8]) -> Result<Vec<u8>, LogoError> {
    let mut opt = usvg::Options::default();
    opt.fontdb_mut().load_system_fonts();

    let tree = usvg::Tree::from_data(svg, &opt).map_err(|e| LogoError::Svg(e.to_string()))?;

    let size = tree.size();
    let longest = size.width().max(size.height());
    let scale = if longest > MAX_SVG_EDGE {
        MAX_SVG_EDGE / longest
    } else {
        1.0
    };
    // Tolerance keeps float drift from adding a pixel on exact edges.
    let fit = |edge: f32| (edge * scale - 1e-3).ceil().max(1.0) as u32;
    let (width, height) = (fit(size.width()), fit(size.height()));
    if scale < 1.0 {
        debug!(
            "Scaling SVG logo from {}x{} down to {}x{}",
            size.width(),
            size.height(),
            width,
            height
        );
    } else {
        debug!("Rasterizing SVG logo at {}x{}", width, height);
    }

    let mut pixmap =
        tiny_skia::Pixmap::new(width, height).ok_or(LogoError::EmptyCanvas(width, height))?;
    resvg::render(
        &tree,
        tiny_skia::Transform::from_scale(scale, scale),
        &mut pixmap.as_mut(),
    );

    pixmap.encode_png().map_err(|e| LogoError::Encode(e.to_string()))
}

/// A decoded logo bitmap without alpha.
#[derive(Debug, Clone)]
pub struct LogoImage {
    pub image: DynamicImage,
}

impl LogoImage {
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }
}

/// Decodes a raster logo and composites transparency onto white.
pub fn load_logo(path: &Path) -> Result<LogoImage, LogoError> {
    let image = image_crate::open(path).map_err(|e| LogoError::Decode(e.to_string()))?;
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return Err(LogoError::Decode(format!("empty image {}x{}", width, height)));
    }

    Ok(LogoImage {
        image: flatten_on_white(&image),
    })
}

fn flatten_on_white(image: &DynamicImage) -> DynamicImage {
    let rgba = image.to_rgba8();
    let mut rgb = RgbImage::new(rgba.width(), rgba.height());

    for (x, y, pixel) in rgba.enumerate_pixels() {
        let [r, g, b, a] = pixel.0;
        let alpha = a as u32;
        let blend = |c: u8| ((c as u32 * alpha + 255 * (255 - alpha) + 127) / 255) as u8;
        rgb.put_pixel(x, y, image_crate::Rgb([blend(r), blend(g), blend(b)]));
    }

    DynamicImage::ImageRgb8(rgb)
}
