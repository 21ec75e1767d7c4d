//! Looping circle visuals decoded from animated GIFs.
//!
//! Frames are downsampled to a small pixel grid that the terminal draws with
//! half-block cells (two pixel rows per cell row). A visual that fails to
//! load degrades to [`VisualState::Fallback`], drawn as a flat fill; nothing
//! is retried and nothing reaches the user.

use crate::log_debug;
use anyhow::{bail, Context, Result};
use image::codecs::gif::GifDecoder;
use image::imageops::{self, FilterType};
use image::AnimationDecoder;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::time::Duration;

/// Fill colour used when a visual is missing (`#4d4436`).
pub const FALLBACK_FILL: [u8; 3] = [0x4d, 0x44, 0x36];

// Browsers clamp tiny GIF delays the same way.
const MIN_FRAME_DELAY: Duration = Duration::from_millis(20);
const DEFAULT_FRAME_DELAY: Duration = Duration::from_millis(100);

/// Whether pixel (`x`, `y`) of a `width` x `height` grid lies inside the
/// inscribed ellipse.
pub fn circle_mask(width: u16, height: u16, x: u16, y: u16) -> bool {
    if width == 0 || height == 0 {
        return false;
    }
    let rx = width as f32 / 2.0;
    let ry = height as f32 / 2.0;
    let dx = (x as f32 + 0.5 - rx) / rx;
    let dy = (y as f32 + 0.5 - ry) / ry;
    dx * dx + dy * dy <= 1.0
}

#[derive(Debug, Clone)]
struct VisualFrame {
    pixels: Vec<Option<[u8; 3]>>,
    delay: Duration,
}

#[derive(Debug, Clone)]
pub struct Visual {
    width: u16,
    height: u16,
    frames: Vec<VisualFrame>,
    cycle: Duration,
}

impl Visual {
    /// Decode `path` into frames of `width` x `height` pixels.
    pub fn load(path: &Path, width: u16, height: u16) -> Result<Self> {
        let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
        let decoder = GifDecoder::new(BufReader::new(file))
            .with_context(|| format!("failed to read GIF header of {}", path.display()))?;
        let frames = decoder
            .into_frames()
            .collect_frames()
            .with_context(|| format!("failed to decode frames of {}", path.display()))?;
        if frames.is_empty() {
            bail!("{} has no frames", path.display());
        }
        if width == 0 || height == 0 {
            bail!("visual size must be non-zero");
        }

        let mut decoded = Vec::with_capacity(frames.len());
        for frame in frames {
            let (numer, denom) = frame.delay().numer_denom_ms();
            let delay = if denom == 0 || numer == 0 {
                DEFAULT_FRAME_DELAY
            } else {
                Duration::from_millis(u64::from(numer / denom)).max(MIN_FRAME_DELAY)
            };
            let buffer = frame.into_buffer();
            let scaled = imageops::resize(
                &buffer,
                u32::from(width),
                u32::from(height),
                FilterType::Triangle,
            );
            let mut pixels = Vec::with_capacity(usize::from(width) * usize::from(height));
            for y in 0..height {
                for x in 0..width {
                    let [r, g, b, a] = scaled.get_pixel(u32::from(x), u32::from(y)).0;
                    let inside = circle_mask(width, height, x, y);
                    pixels.push((inside && a > 0).then_some([r, g, b]));
                }
            }
            decoded.push(VisualFrame { pixels, delay });
        }

        let cycle = decoded.iter().map(|frame| frame.delay).sum();
        Ok(Self {
            width,
            height,
            frames: decoded,
            cycle,
        })
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// Frame index shown after `elapsed` of looping playback.
    pub fn frame_at(&self, elapsed: Duration) -> usize {
        if self.frames.len() <= 1 || self.cycle.is_zero() {
            return 0;
        }
        let cycle_ms = self.cycle.as_millis().max(1);
        let mut remaining = elapsed.as_millis() % cycle_ms;
        for (idx, frame) in self.frames.iter().enumerate() {
            let delay = frame.delay.as_millis();
            if remaining < delay {
                return idx;
            }
            remaining -= delay;
        }
        self.frames.len() - 1
    }

    /// Colour of a pixel, or `None` when it is outside the circle or transparent.
    pub fn pixel(&self, frame: usize, x: u16, y: u16) -> Option<[u8; 3]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let frame = self.frames.get(frame)?;
        let idx = usize::from(y) * usize::from(self.width) + usize::from(x);
        frame.pixels.get(idx).copied().flatten()
    }
}

#[derive(Debug, Clone)]
pub enum VisualState {
    Animated(Visual),
    /// Image hidden; the circle is drawn with [`FALLBACK_FILL`].
    Fallback,
}

impl VisualState {
    /// Load a visual, silently degrading to the flat fill on any error.
    pub fn load_or_fallback(path: &Path, width: u16, height: u16) -> Self {
        match Visual::load(path, width, height) {
            Ok(visual) => VisualState::Animated(visual),
            Err(err) => {
                log_debug(&format!("visual fallback: {err:#}"));
                VisualState::Fallback
            }
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, VisualState::Fallback)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::codecs::gif::GifEncoder;
    use image::{Delay, Frame, Rgba, RgbaImage};
    use std::env;
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_path(name: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos();
        env::temp_dir().join(format!("sonicterm_{name}_{}_{nanos}.gif", std::process::id()))
    }

    fn write_two_frame_gif(path: &Path) {
        let file = File::create(path).expect("create gif");
        let mut encoder = GifEncoder::new(file);
        let red = RgbaImage::from_pixel(16, 16, Rgba([255, 0, 0, 255]));
        let blue = RgbaImage::from_pixel(16, 16, Rgba([0, 0, 255, 255]));
        let frames = vec![
            Frame::from_parts(red, 0, 0, Delay::from_numer_denom_ms(100, 1)),
            Frame::from_parts(blue, 0, 0, Delay::from_numer_denom_ms(300, 1)),
        ];
        encoder.encode_frames(frames).expect("encode gif");
    }

    #[test]
    fn circle_mask_excludes_corners() {
        assert!(circle_mask(10, 10, 5, 5));
        assert!(!circle_mask(10, 10, 0, 0));
        assert!(!circle_mask(10, 10, 9, 9));
        assert!(!circle_mask(0, 10, 0, 0));
    }

    #[test]
    fn missing_gif_falls_back_to_fill() {
        let state = VisualState::load_or_fallback(Path::new("/nonexistent/term-1.gif"), 8, 8);
        assert!(state.is_fallback());
    }

    #[test]
    fn garbage_file_falls_back_to_fill() {
        let path = temp_path("garbage");
        std::fs::write(&path, b"definitely not a gif").expect("write garbage");
        let state = VisualState::load_or_fallback(&path, 8, 8);
        assert!(state.is_fallback());
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn decodes_frames_and_loops_by_delay() {
        let path = temp_path("frames");
        write_two_frame_gif(&path);
        let visual = Visual::load(&path, 8, 8).expect("load gif");
        let _ = std::fs::remove_file(&path);

        assert_eq!(visual.frame_count(), 2);
        assert_eq!(visual.frame_at(Duration::from_millis(50)), 0);
        assert_eq!(visual.frame_at(Duration::from_millis(150)), 1);
        // 400ms cycle: 450ms wraps back into the first frame.
        assert_eq!(visual.frame_at(Duration::from_millis(450)), 0);

        let center = visual.pixel(0, 4, 4).expect("center pixel inside circle");
        assert!(center[0] > 200 && center[2] < 50);
        assert_eq!(visual.pixel(0, 0, 0), None);
        let center = visual.pixel(1, 4, 4).expect("center pixel inside circle");
        assert!(center[2] > 200 && center[0] < 50);
    }
}
