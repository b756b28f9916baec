//! Thumbnail effects.
//!
//! Every effect works on an RGBA image with a transparent surround. The
//! caller trims the result to its visible pixels, fills the chosen
//! background behind it and scales it back into the original bounds.
//!
//! | Name | Result |
//! |---|---|
//! | `shadow` | drop shadow offset down-right |
//! | `glow` | image shrunk onto a soft halo of itself |
//! | `reflection` | fading mirror image below |
//! | `polaroid` | light border, slight tilt, drop shadow |
//! | `rotate` | slight tilt, drop shadow |
//! | `stack` | five tilted copies piled up |
//! | `polaroid_stack` | five tilted polaroids piled up |
//!
//! Tilts are fixed so repeated builds produce identical thumbnails.

use super::params::Background;
use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};

/// Tilt of single `rotate` and `polaroid` effects, in degrees clockwise.
const SINGLE_TILT: f32 = -4.0;
const STACK_TILTS: [f32; 5] = [-8.0, 6.0, -3.0, 9.0, -1.0];
const POLAROID_STACK_TILTS: [f32; 5] = [-13.0, 10.0, -6.0, 12.0, -2.0];
const POLAROID_BORDER: u32 = 14;
const POLAROID_COLOR: [u8; 4] = [0xf0, 0xf0, 0xff, 0xff];
const SHADOW_OFFSET: u32 = 5;
const SHADOW_SIGMA: f32 = 2.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    Shadow,
    Glow,
    Reflection,
    Polaroid,
    Rotate,
    Stack,
    PolaroidStack,
}

impl Effect {
    pub const ALL: [Effect; 7] = [
        Effect::Shadow,
        Effect::Glow,
        Effect::Reflection,
        Effect::Polaroid,
        Effect::Rotate,
        Effect::Stack,
        Effect::PolaroidStack,
    ];

    pub fn from_name(name: &str) -> Option<Effect> {
        Self::ALL.into_iter().find(|e| e.name() == name.trim())
    }

    pub fn name(self) -> &'static str {
        match self {
            Effect::Shadow => "shadow",
            Effect::Glow => "glow",
            Effect::Reflection => "reflection",
            Effect::Polaroid => "polaroid",
            Effect::Rotate => "rotate",
            Effect::Stack => "stack",
            Effect::PolaroidStack => "polaroid_stack",
        }
    }

    /// Apply the effect, trim the transparent surround and fill the background.
    pub fn apply(self, img: &RgbaImage, background: Background) -> RgbaImage {
        let raw = match self {
            Effect::Shadow => shadow(img),
            Effect::Glow => glow(img),
            Effect::Reflection => reflection(img),
            Effect::Polaroid => polaroid(img, SINGLE_TILT),
            Effect::Rotate => shadow(&rotate(img, SINGLE_TILT)),
            Effect::Stack => pile(img, &STACK_TILTS, |copy, tilt| {
                shadow(&rotate(copy, tilt))
            }),
            Effect::PolaroidStack => pile(img, &POLAROID_STACK_TILTS, polaroid),
        };
        fill_background(&trim(&raw), background)
    }
}

fn shadow(img: &RgbaImage) -> RgbaImage {
    let margin = SHADOW_OFFSET * 3;
    let (w, h) = img.dimensions();
    let mut layer = RgbaImage::new(w + margin, h + margin);
    imageops::overlay(
        &mut layer,
        &silhouette(img, [0, 0, 0], 0.5),
        SHADOW_OFFSET as i64,
        SHADOW_OFFSET as i64,
    );
    let mut out = imageops::blur(&layer, SHADOW_SIGMA);
    imageops::overlay(&mut out, img, 0, 0);
    out
}

fn glow(img: &RgbaImage) -> RgbaImage {
    let (w, h) = img.dimensions();
    let inner_w = ((w as f32 * 0.89) as u32).max(1);
    let inner_h = ((h as f32 * 0.89) as u32).max(1);
    let inner = imageops::resize(img, inner_w, inner_h, FilterType::Triangle);
    let x = ((w - inner_w) / 2) as i64;
    let y = ((h - inner_h) / 2) as i64;

    let mut halo = RgbaImage::new(w, h);
    imageops::overlay(&mut halo, &inner, x, y);
    let mut out = imageops::blur(&halo, 10.0);
    imageops::overlay(&mut out, &inner, x, y);
    out
}

fn reflection(img: &RgbaImage) -> RgbaImage {
    let framed = pad(img, 5, [0, 0, 0, 0]);
    let (w, h) = framed.dimensions();

    let mut mirror = imageops::flip_vertical(&framed);
    for (_, y, px) in mirror.enumerate_pixels_mut() {
        let fade = 0.7 * (1.0 - y as f32 / h as f32);
        px.0[3] = (px.0[3] as f32 * fade) as u8;
    }
    let mirror = imageops::blur(&mirror, 3.0);

    let mut out = RgbaImage::new(w, h * 2);
    imageops::overlay(&mut out, &framed, 0, 0);
    imageops::overlay(&mut out, &mirror, 0, h as i64);
    out
}

fn polaroid(img: &RgbaImage, tilt: f32) -> RgbaImage {
    let framed = pad(img, POLAROID_BORDER, POLAROID_COLOR);
    shadow(&rotate(&framed, tilt))
}

/// Overlay one transformed copy per tilt, centered on a double-size canvas.
fn pile(img: &RgbaImage, tilts: &[f32], transform: impl Fn(&RgbaImage, f32) -> RgbaImage) -> RgbaImage {
    let (w, h) = img.dimensions();
    let mut out = RgbaImage::new(w * 2, h * 2);
    for &tilt in tilts {
        let copy = transform(img, tilt);
        let x = (out.width() as i64 - copy.width() as i64) / 2;
        let y = (out.height() as i64 - copy.height() as i64) / 2;
        imageops::overlay(&mut out, &copy, x, y);
    }
    out
}

/// Same shape as `img`, painted in a single color at the given opacity.
fn silhouette(img: &RgbaImage, rgb: [u8; 3], opacity: f32) -> RgbaImage {
    RgbaImage::from_fn(img.width(), img.height(), |x, y| {
        let alpha = img.get_pixel(x, y).0[3] as f32 * opacity;
        Rgba([rgb[0], rgb[1], rgb[2], alpha as u8])
    })
}

/// Surround `img` with a border of `width` pixels in `color`.
fn pad(img: &RgbaImage, width: u32, color: [u8; 4]) -> RgbaImage {
    let mut out = RgbaImage::from_pixel(
        img.width() + width * 2,
        img.height() + width * 2,
        Rgba(color),
    );
    imageops::overlay(&mut out, img, width as i64, width as i64);
    out
}

/// Rotate clockwise by `degrees` onto a transparent canvas that fits the result.
pub(crate) fn rotate(img: &RgbaImage, degrees: f32) -> RgbaImage {
    let (w, h) = img.dimensions();
    let (sin, cos) = degrees.to_radians().sin_cos();
    let out_w = (w as f32 * cos.abs() + h as f32 * sin.abs()).ceil().max(1.0) as u32;
    let out_h = (w as f32 * sin.abs() + h as f32 * cos.abs()).ceil().max(1.0) as u32;
    let (cx, cy) = (w as f32 / 2.0, h as f32 / 2.0);
    let (out_cx, out_cy) = (out_w as f32 / 2.0, out_h as f32 / 2.0);

    RgbaImage::from_fn(out_w, out_h, |x, y| {
        let dx = x as f32 + 0.5 - out_cx;
        let dy = y as f32 + 0.5 - out_cy;
        let sx = dx * cos + dy * sin + cx - 0.5;
        let sy = -dx * sin + dy * cos + cy - 0.5;
        sample_bilinear(img, sx, sy)
    })
}

/// Bilinear sample with premultiplied alpha; outside pixels are transparent.
fn sample_bilinear(img: &RgbaImage, x: f32, y: f32) -> Rgba<u8> {
    let (x0, y0) = (x.floor(), y.floor());
    let (fx, fy) = (x - x0, y - y0);
    let taps = [
        (0, 0, (1.0 - fx) * (1.0 - fy)),
        (1, 0, fx * (1.0 - fy)),
        (0, 1, (1.0 - fx) * fy),
        (1, 1, fx * fy),
    ];

    let mut acc = [0.0f32; 4];
    for (ox, oy, weight) in taps {
        let px = x0 as i64 + ox;
        let py = y0 as i64 + oy;
        if px < 0 || py < 0 || px >= img.width() as i64 || py >= img.height() as i64 {
            continue;
        }
        let p = img.get_pixel(px as u32, py as u32).0;
        let alpha = p[3] as f32 / 255.0 * weight;
        for c in 0..3 {
            acc[c] += p[c] as f32 * alpha;
        }
        acc[3] += alpha;
    }

    if acc[3] <= f32::EPSILON {
        return Rgba([0, 0, 0, 0]);
    }
    Rgba([
        (acc[0] / acc[3]).round().clamp(0.0, 255.0) as u8,
        (acc[1] / acc[3]).round().clamp(0.0, 255.0) as u8,
        (acc[2] / acc[3]).round().clamp(0.0, 255.0) as u8,
        (acc[3] * 255.0).round().clamp(0.0, 255.0) as u8,
    ])
}

/// Crop to the bounding box of non-transparent pixels.
pub(crate) fn trim(img: &RgbaImage) -> RgbaImage {
    let mut bounds: Option<(u32, u32, u32, u32)> = None;
    for (x, y, px) in img.enumerate_pixels() {
        if px.0[3] == 0 {
            continue;
        }
        bounds = Some(match bounds {
            None => (x, y, x, y),
            Some((x0, y0, x1, y1)) => (x0.min(x), y0.min(y), x1.max(x), y1.max(y)),
        });
    }
    match bounds {
        Some((x0, y0, x1, y1)) => {
            imageops::crop_imm(img, x0, y0, x1 - x0 + 1, y1 - y0 + 1).to_image()
        }
        None => img.clone(),
    }
}

fn fill_background(img: &RgbaImage, background: Background) -> RgbaImage {
    match background {
        Background::Transparent => img.clone(),
        Background::Color(fill) => {
            RgbaImage::from_fn(img.width(), img.height(), |x, y| {
                over(*img.get_pixel(x, y), fill)
            })
        }
    }
}

/// `src` composited over `dst`. An opaque `dst` gives an opaque result.
fn over(src: Rgba<u8>, dst: [u8; 4]) -> Rgba<u8> {
    let [sr, sg, sb, sa] = src.0;
    match (sa, dst[3]) {
        (255, _) => return src,
        (0, _) => return Rgba(dst),
        _ => {}
    }
    let src_a = sa as f32 / 255.0;
    let dst_a = dst[3] as f32 / 255.0 * (1.0 - src_a);
    let out_a = src_a + dst_a;
    let channel = |s: u8, d: u8| {
        ((s as f32 * src_a + d as f32 * dst_a) / out_a)
            .round()
            .clamp(0.0, 255.0) as u8
    };
    let alpha = if dst[3] == 255 {
        255
    } else {
        (out_a * 255.0).round().clamp(0.0, 255.0) as u8
    };
    Rgba([channel(sr, dst[0]), channel(sg, dst[1]), channel(sb, dst[2]), alpha])
}
