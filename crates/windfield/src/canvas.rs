// Drawing surface contract and a software RGBA implementation

use glam::DVec2;
use serde::{Deserialize, Serialize};

/// How last frame's trails are weakened before new segments are drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FadeMode {
    /// destination-out: reduce coverage, keeps the overlay transparent
    Erase,
    /// source-over black: darken toward an opaque background
    Darken,
}

/// Compositing for new segments
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlendMode {
    /// "lighter": overlapping trails brighten
    Additive,
    /// source-over
    Normal,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub from: DVec2,
    pub to: DVec2,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokeStyle {
    /// Straight (non-premultiplied) RGBA
    pub color: [u8; 4],
    pub line_width: f64,
    pub blend: BlendMode,
}

/// Surface the renderer draws trails on
pub trait TrailCanvas {
    fn size(&self) -> (u32, u32);
    fn resize(&mut self, width: u32, height: u32);
    fn clear(&mut self);
    fn fade(&mut self, alpha: f64, mode: FadeMode);
    fn stroke_segments(&mut self, segments: &[Segment], style: &StrokeStyle);
}

/// RGBA8 raster with premultiplied alpha
#[derive(Debug, Clone)]
pub struct PixelCanvas {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl PixelCanvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; width as usize * height as usize * 4],
        }
    }

    /// Premultiplied RGBA bytes, row-major from the top-left
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let off = (y as usize * self.width as usize + x as usize) * 4;
        Some([self.pixels[off], self.pixels[off + 1], self.pixels[off + 2], self.pixels[off + 3]])
    }

    /// Copy into a straight-alpha RGBA buffer of the same size (texture upload)
    pub fn write_straight_rgba(&self, out: &mut [u8]) {
        for (dst, src) in out.chunks_exact_mut(4).zip(self.pixels.chunks_exact(4)) {
            let a = src[3];
            if a == 0 {
                dst.copy_from_slice(&[0, 0, 0, 0]);
                continue;
            }
            for c in 0..3 {
                dst[c] = ((src[c] as u32 * 255 + a as u32 / 2) / a as u32).min(255) as u8;
            }
            dst[3] = a;
        }
    }

    pub fn coverage(&self) -> usize {
        self.pixels.chunks_exact(4).filter(|px| px[3] > 0).count()
    }

    fn plot(&mut self, x: i64, y: i64, src: [f64; 4], blend: BlendMode) {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return;
        }
        let off = (y as usize * self.width as usize + x as usize) * 4;
        let px = &mut self.pixels[off..off + 4];
        match blend {
            // dst + src, saturating
            BlendMode::Additive => {
                for c in 0..4 {
                    px[c] = (px[c] as f64 + src[c]).min(255.0) as u8;
                }
            }
            // src + dst * (1 - src_a)
            BlendMode::Normal => {
                let keep = 1.0 - src[3] / 255.0;
                for c in 0..4 {
                    px[c] = (src[c] + px[c] as f64 * keep).round().min(255.0) as u8;
                }
            }
        }
    }

    /// Bresenham line stamped with a square brush of `brush` pixels
    fn draw_line(&mut self, from: DVec2, to: DVec2, src: [f64; 4], brush: i64, blend: BlendMode) {
        let (mut x0, mut y0) = (from.x.round() as i64, from.y.round() as i64);
        let (x1, y1) = (to.x.round() as i64, to.y.round() as i64);
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;
        let lo = -(brush - 1) / 2;
        let hi = lo + brush;

        loop {
            for by in lo..hi {
                for bx in lo..hi {
                    self.plot(x0 + bx, y0 + by, src, blend);
                }
            }
            if x0 == x1 && y0 == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x0 += sx;
            }
            if e2 <= dx {
                err += dx;
                y0 += sy;
            }
        }
    }
}

impl TrailCanvas for PixelCanvas {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.pixels = vec![0; width as usize * height as usize * 4];
    }

    fn clear(&mut self) {
        self.pixels.fill(0);
    }

    fn fade(&mut self, alpha: f64, mode: FadeMode) {
        let keep = (1.0 - alpha).clamp(0.0, 1.0);
        // floor so every non-zero channel strictly decreases
        for px in self.pixels.chunks_exact_mut(4) {
            match mode {
                FadeMode::Erase => {
                    for c in px.iter_mut() {
                        *c = (*c as f64 * keep).floor() as u8;
                    }
                }
                FadeMode::Darken => {
                    for c in px[..3].iter_mut() {
                        *c = (*c as f64 * keep).floor() as u8;
                    }
                    px[3] = (px[3] as f64 + (255.0 - px[3] as f64) * alpha).ceil().min(255.0) as u8;
                }
            }
        }
    }

    fn stroke_segments(&mut self, segments: &[Segment], style: &StrokeStyle) {
        let a = style.color[3] as f64 / 255.0;
        let src = [
            style.color[0] as f64 * a,
            style.color[1] as f64 * a,
            style.color[2] as f64 * a,
            style.color[3] as f64,
        ];
        let brush = style.line_width.round().max(1.0) as i64;
        for segment in segments {
            if !(segment.from.is_finite() && segment.to.is_finite()) {
                continue;
            }
            self.draw_line(segment.from, segment.to, src, brush, style.blend);
        }
    }
}
