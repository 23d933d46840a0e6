/// Full-resolution image viewer state
///
/// Holds one decoded image plus zoom, pan offset, rotation and the size of
/// the frame it is shown in. The UI only ever displays [`Viewport::compose`].
///
/// Rotation works on the unscaled base image and does not re-apply the
/// zoom level: after a rotate the image is shown at 100% of the new base
/// while `zoom_level` keeps its previous value, and the next zoom multiplies
/// from there.
///
/// The zoomed image is never materialised beyond the base size: zooming out
/// keeps a reduced copy, zooming in samples the base directly while the
/// frame is composed, so memory stays bounded whatever the zoom level.
use cgmath::Vector2;
use image::imageops::{self, FilterType};
use image::{Pixel, Rgba, RgbaImage};
use log::{debug, info};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::state::settings::Settings;

/// Frame colour behind the image
const BACKGROUND: Rgba<u8> = Rgba([32, 32, 32, 255]);

/// Sizing rules for the viewer frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameLimits {
    /// Pixels added to each axis around the displayed image
    pub padding: u32,
    /// Upper bound of the frame per axis
    pub max: Vector2<u32>,
}

impl FrameLimits {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            padding: settings.window_padding,
            max: Vector2::new(settings.max_window[0], settings.max_window[1]),
        }
    }

    fn frame_for(&self, image: Vector2<u64>) -> Vector2<u32> {
        let axis = |extent: u64, max: u32| {
            let framed = extent.saturating_add(u64::from(self.padding)).min(u64::from(max));
            u32::try_from(framed).unwrap_or(max)
        };
        Vector2::new(axis(image.x, self.max.x), axis(image.y, self.max.y))
    }
}

#[derive(Debug, Clone)]
pub struct Viewport {
    path: PathBuf,
    /// Current full-resolution pixels, after any rotation
    base: RgbaImage,
    /// Scale of `base` on screen: `zoom_level` after a zoom, 1.0 after open/rotate
    display_scale: f64,
    /// `base` resized down, present only while `display_scale < 1`
    reduced: Option<RgbaImage>,
    zoom_level: f64,
    /// Top-left of the displayed image inside the frame
    offset: Vector2<f64>,
    window_size: Vector2<u32>,
    limits: FrameLimits,
}

impl Viewport {
    /// Decode `path` at full resolution and open it at 100%
    pub fn open(path: &Path, limits: FrameLimits) -> Result<Self> {
        let base = image::open(path)
            .map_err(|e| Error::decode(path, e))?
            .to_rgba8();
        info!(
            "🖼️  Opened {} ({}x{})",
            path.display(),
            base.width(),
            base.height()
        );
        Ok(Self::with_image(path.to_path_buf(), base, limits))
    }

    /// Open an already decoded image
    pub fn with_image(path: PathBuf, base: RgbaImage, limits: FrameLimits) -> Self {
        let mut viewport = Self {
            path,
            base,
            display_scale: 1.0,
            reduced: None,
            zoom_level: 1.0,
            offset: Vector2::new(0.0, 0.0),
            window_size: Vector2::new(0, 0),
            limits,
        };
        viewport.refit();
        viewport
    }

    /// Multiply the zoom level by `factor` and rescale from the base image.
    ///
    /// There is no minimum or maximum zoom. Non-positive or non-finite
    /// factors are ignored and return false, as is any factor that would push
    /// the level out of the finite positive range of `f64`.
    pub fn zoom(&mut self, factor: f64) -> bool {
        let level = self.zoom_level * factor;
        if !(factor.is_finite() && factor > 0.0 && level.is_finite() && level > 0.0) {
            debug!("Ignoring zoom factor {factor}");
            return false;
        }

        self.zoom_level = level;
        self.display_scale = level;
        self.reduced = (level < 1.0).then(|| {
            let size = self.displayed_size();
            // Below 100% the extents are at most the base size
            let width = u32::try_from(size.x).unwrap_or(self.base.width());
            let height = u32::try_from(size.y).unwrap_or(self.base.height());
            imageops::resize(&self.base, width, height, FilterType::Triangle)
        });
        self.refit();
        true
    }

    /// Rotate the base image by `angle_degrees` (positive is counter-clockwise),
    /// expanding the canvas to fit the rotated bounds.
    ///
    /// The displayed image becomes the new base at 100%; `zoom_level` is left as is.
    pub fn rotate(&mut self, angle_degrees: f32) {
        self.base = rotate_expand(&self.base, angle_degrees);
        self.display_scale = 1.0;
        self.reduced = None;
        self.refit();
    }

    /// Drag the image by a screen delta, clamped so the frame never shows
    /// space beyond the image edges
    pub fn pan(&mut self, dx: f32, dy: f32) {
        let image = self.displayed_size();
        self.offset.x = clamp_axis(self.offset.x + f64::from(dx), image.x, self.window_size.x);
        self.offset.y = clamp_axis(self.offset.y + f64::from(dy), image.y, self.window_size.y);
    }

    /// Render the frame: the displayed image drawn at the current offset.
    ///
    /// Only the part of the image inside the frame is ever produced.
    pub fn compose(&self) -> RgbaImage {
        let mut frame = RgbaImage::from_pixel(self.window_size.x, self.window_size.y, BACKGROUND);
        let origin = (self.offset.x.round() as i64, self.offset.y.round() as i64);

        if self.display_scale > 1.0 {
            self.magnify_into(&mut frame, origin);
        } else {
            let source = self.reduced.as_ref().unwrap_or(&self.base);
            imageops::overlay(&mut frame, source, origin.0, origin.1);
        }
        frame
    }

    /// Nearest-neighbour sampling of `base` for every frame pixel the
    /// magnified image covers
    fn magnify_into(&self, frame: &mut RgbaImage, origin: (i64, i64)) {
        let extent = self.displayed_size();
        let (base_w, base_h) = (self.base.width(), self.base.height());

        for (x, y, pixel) in frame.enumerate_pixels_mut() {
            let dx = i64::from(x) - origin.0;
            let dy = i64::from(y) - origin.1;
            let (Ok(dx), Ok(dy)) = (u64::try_from(dx), u64::try_from(dy)) else {
                continue;
            };
            if dx >= extent.x || dy >= extent.y {
                continue;
            }
            let sx = source_index(dx, extent.x, base_w);
            let sy = source_index(dy, extent.y, base_h);
            let source = self.base.get_pixel(sx, sy);
            if source[3] == u8::MAX {
                *pixel = *source;
            } else {
                pixel.blend(source);
            }
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn filename(&self) -> String {
        self.path
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string()
    }

    #[cfg(test)]
    pub fn zoom_level(&self) -> f64 {
        self.zoom_level
    }

    /// Zoom label value, e.g. 121 for 1.21
    pub fn zoom_percent(&self) -> u32 {
        (self.zoom_level * 100.0).round() as u32
    }

    #[cfg(test)]
    pub fn offset(&self) -> Vector2<f64> {
        self.offset
    }

    pub fn window_size(&self) -> Vector2<u32> {
        self.window_size
    }

    pub fn base_size(&self) -> Vector2<u32> {
        Vector2::new(self.base.width(), self.base.height())
    }

    /// On-screen extent of the image, which may be far larger than the frame
    pub fn displayed_size(&self) -> Vector2<u64> {
        Vector2::new(
            scaled_extent(self.base.width(), self.display_scale),
            scaled_extent(self.base.height(), self.display_scale),
        )
    }

    /// Offset that centres the displayed image in the frame
    pub fn centered_offset(&self) -> Vector2<f64> {
        let image = self.displayed_size();
        Vector2::new(
            centered(image.x, self.window_size.x),
            centered(image.y, self.window_size.y),
        )
    }

    /// Resize the frame around the displayed image and recentre it
    fn refit(&mut self) {
        self.window_size = self.limits.frame_for(self.displayed_size());
        self.offset = self.centered_offset();
    }
}

fn scaled_extent(extent: u32, scale: f64) -> u64 {
    // Float to int casts saturate
    (f64::from(extent) * scale).round().max(1.0) as u64
}

/// Base pixel under position `at` of an axis stretched from `base` to `extent`
fn source_index(at: u64, extent: u64, base: u32) -> u32 {
    let index = (at as f64 + 0.5) * f64::from(base) / extent as f64;
    (index as u32).min(base.saturating_sub(1))
}

fn centered(image: u64, window: u32) -> f64 {
    (f64::from(window) - image as f64) / 2.0
}

fn clamp_axis(offset: f64, image: u64, window: u32) -> f64 {
    if image <= u64::from(window) {
        centered(image, window)
    } else {
        offset.clamp(f64::from(window) - image as f64, 0.0)
    }
}

/// Rotate counter-clockwise by any angle into an expanded bounding box.
///
/// Right angles are exact pixel transpositions; other angles sample the
/// nearest source pixel and leave uncovered corners transparent.
fn rotate_expand(src: &RgbaImage, angle_degrees: f32) -> RgbaImage {
    let normalized = angle_degrees.rem_euclid(360.0);
    if normalized.abs() < f32::EPSILON {
        return src.clone();
    }
    if (normalized - 90.0).abs() < f32::EPSILON {
        return imageops::rotate270(src);
    }
    if (normalized - 180.0).abs() < f32::EPSILON {
        return imageops::rotate180(src);
    }
    if (normalized - 270.0).abs() < f32::EPSILON {
        return imageops::rotate90(src);
    }

    let (sin, cos) = normalized.to_radians().sin_cos();
    let (w, h) = (src.width() as f32, src.height() as f32);
    let new_w = (w * cos.abs() + h * sin.abs()).ceil().max(1.0) as u32;
    let new_h = (w * sin.abs() + h * cos.abs()).ceil().max(1.0) as u32;
    let (cx, cy) = (w / 2.0, h / 2.0);
    let (ncx, ncy) = (new_w as f32 / 2.0, new_h as f32 / 2.0);

    RgbaImage::from_fn(new_w, new_h, |x, y| {
        let dx = x as f32 + 0.5 - ncx;
        let dy = y as f32 + 0.5 - ncy;
        // Inverse of a counter-clockwise turn in y-down screen space
        let sx = cos * dx - sin * dy + cx;
        let sy = sin * dx + cos * dy + cy;
        if sx >= 0.0 && sy >= 0.0 && sx < w && sy < h {
            *src.get_pixel(sx as u32, sy as u32)
        } else {
            Rgba([0, 0, 0, 0])
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{assert_relative_eq, solid_image, write_jpeg_with_capture_date, write_png};

    fn limits() -> FrameLimits {
        FrameLimits {
            padding: 100,
            max: Vector2::new(4000, 4000),
        }
    }

    fn open_solid(width: u32, height: u32, limits: FrameLimits) -> Viewport {
        Viewport::with_image(PathBuf::from("/photos/a.png"), solid_image(width, height), limits)
    }

    #[test]
    fn test_open_initial_state() {
        let viewport = open_solid(300, 200, limits());

        assert_eq!(viewport.zoom_level(), 1.0);
        assert_eq!(viewport.zoom_percent(), 100);
        assert_eq!(viewport.displayed_size(), Vector2::new(300, 200));
        assert_eq!(viewport.window_size(), Vector2::new(400, 300));
        assert_eq!(viewport.offset(), Vector2::new(50.0, 50.0));
        assert_eq!(viewport.filename(), "a.png");
    }

    #[test]
    fn test_open_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("full.png");
        write_png(&path, 64, 48);

        let viewport = Viewport::open(&path, limits()).unwrap();
        assert_eq!(viewport.base_size(), Vector2::new(64, 48));
        assert_eq!(viewport.path(), path.as_path());
    }

    #[test]
    fn test_open_undecodable_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("exif_only.jpg");
        write_jpeg_with_capture_date(&path, "2020:01:01 00:00:00");

        assert!(matches!(
            Viewport::open(&path, limits()),
            Err(Error::Decode { .. })
        ));
    }

    #[test]
    fn test_zoom_scales_from_base() {
        let mut viewport = open_solid(200, 100, limits());
        assert!(viewport.zoom(1.5));

        assert_eq!(viewport.displayed_size(), Vector2::new(300, 150));
        assert_eq!(viewport.window_size(), Vector2::new(400, 250));
        assert_eq!(viewport.zoom_percent(), 150);
        assert_eq!(viewport.offset(), viewport.centered_offset());

        assert!(viewport.zoom(0.5));
        assert_eq!(viewport.displayed_size(), Vector2::new(150, 75));
        assert_eq!(viewport.zoom_percent(), 75);
    }

    #[test]
    fn test_zoom_rejects_invalid_factors() {
        let mut viewport = open_solid(100, 100, limits());
        assert!(!viewport.zoom(0.0));
        assert!(!viewport.zoom(-2.0));
        assert!(!viewport.zoom(f64::NAN));
        assert!(!viewport.zoom(f64::INFINITY));
        assert_eq!(viewport.zoom_level(), 1.0);
    }

    #[test]
    fn test_zoom_rotate_zoom_keeps_numeric_level() {
        let mut viewport = open_solid(200, 100, limits());

        viewport.zoom(1.1);
        assert_eq!(viewport.displayed_size(), Vector2::new(220, 110));

        viewport.rotate(90.0);
        // Display reverts to 100% of the rotated base, the level does not
        assert_eq!(viewport.base_size(), Vector2::new(100, 200));
        assert_eq!(viewport.displayed_size(), Vector2::new(100, 200));
        assert_relative_eq!(viewport.zoom_level(), 1.1, epsilon = 1e-6);
        assert_eq!(viewport.zoom_percent(), 110);

        viewport.zoom(1.1);
        assert_relative_eq!(viewport.zoom_level(), 1.21, epsilon = 1e-6);
        assert_eq!(viewport.zoom_percent(), 121);
        assert_eq!(viewport.displayed_size(), Vector2::new(121, 242));
    }

    #[test]
    fn test_rotate_right_angles() {
        let mut viewport = open_solid(300, 200, limits());

        viewport.rotate(90.0);
        assert_eq!(viewport.base_size(), Vector2::new(200, 300));
        assert_eq!(viewport.window_size(), Vector2::new(300, 400));
        assert_eq!(viewport.offset(), viewport.centered_offset());

        viewport.rotate(180.0);
        assert_eq!(viewport.base_size(), Vector2::new(200, 300));

        viewport.rotate(-90.0);
        assert_eq!(viewport.base_size(), Vector2::new(300, 200));
    }

    #[test]
    fn test_rotate_ninety_is_counter_clockwise() {
        let mut base = RgbaImage::from_pixel(2, 1, Rgba([0, 0, 0, 255]));
        base.put_pixel(1, 0, Rgba([255, 0, 0, 255]));
        let mut viewport = Viewport::with_image(PathBuf::from("/p.png"), base, limits());

        viewport.rotate(90.0);
        let frame = viewport.compose();
        let offset = viewport.offset();
        // The right-hand pixel ends up on top
        let top = frame.get_pixel(offset.x as u32, offset.y as u32);
        assert_eq!(*top, Rgba([255, 0, 0, 255]));
    }

    #[test]
    fn test_rotate_arbitrary_angle_expands() {
        let mut viewport = open_solid(100, 100, limits());
        viewport.rotate(45.0);

        let size = viewport.base_size();
        assert!(size.x >= 141 && size.x <= 142, "width {}", size.x);
        assert!(size.y >= 141 && size.y <= 142, "height {}", size.y);

        let frame = viewport.compose();
        let centre = frame.get_pixel(frame.width() / 2, frame.height() / 2);
        assert_eq!(*centre, Rgba([200, 40, 40, 255]));
    }

    #[test]
    fn test_pan_small_image_stays_centered() {
        let mut viewport = open_solid(100, 80, limits());
        let centre = viewport.centered_offset();

        viewport.pan(35.0, -60.0);
        assert_eq!(viewport.offset(), centre);

        viewport.pan(-1000.0, 1000.0);
        assert_eq!(viewport.offset(), centre);
    }

    #[test]
    fn test_pan_large_image_clamped_to_edges() {
        let small_frame = FrameLimits {
            padding: 100,
            max: Vector2::new(150, 150),
        };
        let mut viewport = open_solid(400, 300, small_frame);
        assert_eq!(viewport.window_size(), Vector2::new(150, 150));
        assert_eq!(viewport.offset(), Vector2::new(-125.0, -75.0));

        viewport.pan(20.0, -10.0);
        assert_eq!(viewport.offset(), Vector2::new(-105.0, -85.0));

        viewport.pan(1000.0, 1000.0);
        assert_eq!(viewport.offset(), Vector2::new(0.0, 0.0));

        viewport.pan(-1000.0, -1000.0);
        assert_eq!(viewport.offset(), Vector2::new(-250.0, -150.0));
    }

    #[test]
    fn test_pan_mixed_axes() {
        let frame = FrameLimits {
            padding: 100,
            max: Vector2::new(200, 4000),
        };
        // Wider than the frame, shorter than it
        let mut viewport = open_solid(500, 100, frame);
        let centre_y = viewport.centered_offset().y;

        viewport.pan(40.0, 40.0);
        assert_eq!(viewport.offset().y, centre_y);
        assert_eq!(viewport.offset().x, -110.0);
    }

    #[test]
    fn test_zoom_recenters_after_pan() {
        let frame = FrameLimits {
            padding: 100,
            max: Vector2::new(150, 150),
        };
        let mut viewport = open_solid(400, 300, frame);
        viewport.pan(100.0, 100.0);
        viewport.zoom(1.1);
        assert_eq!(viewport.offset(), viewport.centered_offset());
    }

    #[test]
    fn test_extreme_zoom_keeps_frame_bounded() {
        let frame_limits = FrameLimits {
            padding: 100,
            max: Vector2::new(1600, 1000),
        };
        let mut viewport = open_solid(100, 100, frame_limits);

        assert!(viewport.zoom(1.0e6));
        assert_eq!(viewport.displayed_size(), Vector2::new(100_000_000, 100_000_000));
        assert_eq!(viewport.window_size(), Vector2::new(1600, 1000));

        viewport.pan(-250.0, 40.0);
        let frame = viewport.compose();
        assert_eq!(frame.dimensions(), (1600, 1000));
        assert_eq!(*frame.get_pixel(800, 500), Rgba([200, 40, 40, 255]));
        assert_eq!(*frame.get_pixel(0, 0), Rgba([200, 40, 40, 255]));
    }

    #[test]
    fn test_magnified_compose_samples_base() {
        // Left half black, right half white
        let base = RgbaImage::from_fn(4, 2, |x, _| {
            if x < 2 {
                Rgba([0, 0, 0, 255])
            } else {
                Rgba([255, 255, 255, 255])
            }
        });
        let mut viewport = Viewport::with_image(PathBuf::from("/p.png"), base, limits());
        viewport.zoom(10.0);
        assert_eq!(viewport.displayed_size(), Vector2::new(40, 20));

        let frame = viewport.compose();
        let offset = viewport.offset();
        let (left, top) = (offset.x as u32, offset.y as u32);
        assert_eq!(*frame.get_pixel(left + 5, top + 5), Rgba([0, 0, 0, 255]));
        assert_eq!(*frame.get_pixel(left + 35, top + 5), Rgba([255, 255, 255, 255]));
        assert_eq!(*frame.get_pixel(left.saturating_sub(1), top), BACKGROUND);
    }

    #[test]
    fn test_long_zoom_round_trip_returns_to_base() {
        let mut viewport = open_solid(300, 200, limits());

        for _ in 0..1200 {
            viewport.zoom(1.0 / 1.1);
        }
        assert!(viewport.zoom_level() > 0.0);
        assert_eq!(viewport.displayed_size(), Vector2::new(1, 1));

        for _ in 0..1200 {
            viewport.zoom(1.1);
        }
        assert_relative_eq!(viewport.zoom_level(), 1.0, epsilon = 1e-9);
        assert_eq!(viewport.zoom_percent(), 100);
        assert_eq!(viewport.displayed_size(), Vector2::new(300, 200));
    }

    #[test]
    fn test_compose_matches_frame() {
        let viewport = open_solid(10, 10, limits());
        let frame = viewport.compose();

        assert_eq!(frame.dimensions(), (110, 110));
        assert_eq!(*frame.get_pixel(0, 0), BACKGROUND);
        assert_eq!(*frame.get_pixel(55, 55), Rgba([200, 40, 40, 255]));
    }
}
