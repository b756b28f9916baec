//! Pure Rust image processing backend.
//!
//! Everything is statically linked into the binary.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode (JPEG, PNG, GIF, TIFF, WebP) | `image` crate (pure Rust decoders) |
//! | Fit-within resize | `image::DynamicImage::resize` with `Lanczos3` filter |
//! | Softening | `image::DynamicImage::blur` |
//! | Effects | [`effects`](super::effects) on `RgbaImage` |
//! | Encode | `image` crate, format chosen by the output extension |

use super::backend::{BackendError, ImageBackend};
use super::effects::Effect;
use super::params::{Background, EffectParams, RasterizeParams};
use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat, ImageReader, Rgb, RgbImage};
use std::path::{Path, PathBuf};

/// Pure Rust backend using the `image` crate ecosystem.
///
/// See the [module docs](self) for the crate-to-operation mapping.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

/// Load and decode an image from disk.
fn load_image(path: &Path) -> Result<DynamicImage, BackendError> {
    ImageReader::open(path)
        .map_err(BackendError::Io)?
        .with_guessed_format()
        .map_err(BackendError::Io)?
        .decode()
        .map_err(|e| {
            BackendError::ProcessingFailed(format!("Failed to decode {}: {}", path.display(), e))
        })
}

/// Hidden sibling the encoder writes to before it is renamed into place.
fn partial_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    path.with_file_name(format!(".{name}.partial"))
}

/// Composite onto an opaque color for formats without alpha.
fn flatten(img: &DynamicImage, rgb: [u8; 3]) -> RgbImage {
    let rgba = img.to_rgba8();
    RgbImage::from_fn(rgba.width(), rgba.height(), |x, y| {
        let [r, g, b, a] = rgba.get_pixel(x, y).0;
        let alpha = a as u32;
        let mix = |fg: u8, bg: u8| ((fg as u32 * alpha + bg as u32 * (255 - alpha)) / 255) as u8;
        Rgb([mix(r, rgb[0]), mix(g, rgb[1]), mix(b, rgb[2])])
    })
}

/// Save in the format implied by the extension, atomically.
fn save_image(img: &DynamicImage, path: &Path, background: Background) -> Result<(), BackendError> {
    let format = ImageFormat::from_path(path).map_err(|e| {
        BackendError::ProcessingFailed(format!(
            "Unsupported output format {}: {}",
            path.display(),
            e
        ))
    })?;

    let partial = partial_path(path);
    let written = if format == ImageFormat::Jpeg {
        DynamicImage::ImageRgb8(flatten(img, background.flatten_rgb()))
            .save_with_format(&partial, format)
    } else {
        img.save_with_format(&partial, format)
    };
    if let Err(e) = written {
        let _ = std::fs::remove_file(&partial);
        return Err(BackendError::ProcessingFailed(format!(
            "Failed to encode {}: {}",
            path.display(),
            e
        )));
    }
    std::fs::rename(&partial, path)?;
    Ok(())
}

impl ImageBackend for RustBackend {
    fn rasterize(&self, params: &RasterizeParams) -> Result<(), BackendError> {
        let img = load_image(&params.source)?;
        let resized = img.resize(params.max_width, params.max_height, FilterType::Lanczos3);
        let softened = if params.blur > 0.0 {
            resized.blur(params.blur)
        } else {
            resized
        };
        if let Some(parent) = params.output.parent() {
            std::fs::create_dir_all(parent)?;
        }
        save_image(&softened, &params.output, Background::Transparent)
    }

    fn apply_effect(&self, params: &EffectParams) -> Result<(), BackendError> {
        let effect = Effect::from_name(&params.effect)
            .ok_or_else(|| BackendError::UnknownEffect(params.effect.clone()))?;
        let img = load_image(&params.path)?;
        let (width, height) = (img.width(), img.height());

        let transformed = effect.apply(&img.to_rgba8(), params.background);
        let fitted =
            DynamicImage::ImageRgba8(transformed).resize(width, height, FilterType::Lanczos3);
        save_image(&fitted, &params.path, params.background)
    }
}
