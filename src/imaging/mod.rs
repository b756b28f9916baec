//! Image processing, pure Rust.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Rasterize** | `image` decode, `resize` (fit within) + light `blur` |
//! | **Effects** | pixel work on `RgbaImage` ([`effects`]) |
//! | **Capture info** | `kamadak-exif` ([`capture`]) |
//!
//! The module is split into:
//! - **Parameters**: Data structures describing image operations
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]
//! - **Effects**: the named thumbnail transforms
//! - **Capture**: capture date and camera settings for page rendering

pub mod backend;
pub mod capture;
pub mod effects;
mod params;
pub mod rust_backend;

pub use backend::{BackendError, ImageBackend};
pub use capture::{CaptureInfo, read_capture_info};
pub use params::{Background, EffectParams, RasterizeParams};
pub use rust_backend::RustBackend;
