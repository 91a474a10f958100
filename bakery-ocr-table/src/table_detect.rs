//! Cheap gate deciding whether a page is ruled like a table.
//!
//! Edges come from Canny, candidate lines from a Hough accumulator, and each
//! candidate is walked over the edge map to recover the actual segments it
//! covers (gaps up to `max_line_gap` are bridged, segments shorter than
//! `min_line_length` dropped). Segments are then counted by orientation.

use image::GrayImage;
use imageproc::edges::canny;
use imageproc::hough::{LineDetectionOptions, PolarLine, detect_lines};
use tracing::debug;

use crate::config::DetectorConfig;
use crate::model::LayoutClass;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment {
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Horizontal,
    Vertical,
    Oblique,
}

impl Segment {
    #[must_use]
    pub fn orientation(&self, tolerance: u32) -> Orientation {
        if (self.y2 - self.y1).unsigned_abs() < tolerance {
            Orientation::Horizontal
        } else if (self.x2 - self.x1).unsigned_abs() < tolerance {
            Orientation::Vertical
        } else {
            Orientation::Oblique
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LineStats {
    pub total: usize,
    pub horizontal: usize,
    pub vertical: usize,
}

impl LineStats {
    #[must_use]
    pub fn from_segments(segments: &[Segment], tolerance: u32) -> Self {
        let mut stats = Self {
            total: segments.len(),
            ..Self::default()
        };
        for segment in segments {
            match segment.orientation(tolerance) {
                Orientation::Horizontal => stats.horizontal += 1,
                Orientation::Vertical => stats.vertical += 1,
                Orientation::Oblique => {}
            }
        }
        stats
    }

    #[must_use]
    pub fn classify(&self, config: &DetectorConfig) -> LayoutClass {
        if self.total > config.min_segments
            && self.horizontal > config.min_horizontal
            && self.vertical > config.min_vertical
        {
            LayoutClass::Table
        } else {
            LayoutClass::FreeText
        }
    }
}

fn is_edge(edges: &GrayImage, x: i64, y: i64) -> bool {
    let (width, height) = edges.dimensions();
    if x < 0 || y < 0 || x >= i64::from(width) || y >= i64::from(height) {
        return false;
    }
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let pixel = edges.get_pixel(x as u32, y as u32);
    pixel.0[0] > 0
}

/// Walks `line` across the edge map and returns the runs it actually covers.
#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
fn segments_along(edges: &GrayImage, line: PolarLine, config: &DetectorConfig) -> Vec<Segment> {
    let (width, height) = edges.dimensions();
    let reach = (f64::from(width).hypot(f64::from(height))).ceil() as i64;
    let theta = f64::from(line.angle_in_degrees).to_radians();
    let (sin, cos) = theta.sin_cos();
    let r = f64::from(line.r);
    let (base_x, base_y) = (r * cos, r * sin);

    let point_at = |t: i64| -> (i64, i64) {
        let t = t as f64;
        ((base_x - t * sin).round() as i64, (base_y + t * cos).round() as i64)
    };
    // One pixel of slack across the line, matching the accumulator bin width.
    let hit = |t: i64| -> bool {
        let (x, y) = point_at(t);
        let (nx, ny) = (cos.round() as i64, sin.round() as i64);
        is_edge(edges, x, y) || is_edge(edges, x + nx, y + ny) || is_edge(edges, x - nx, y - ny)
    };

    let max_gap = i64::from(config.max_line_gap);
    let min_length = f64::from(config.min_line_length);
    let mut segments = Vec::new();
    let mut run: Option<(i64, i64)> = None;

    let flush = |start: i64, end: i64, segments: &mut Vec<Segment>| {
        let (x1, y1) = point_at(start);
        let (x2, y2) = point_at(end);
        let length = ((x2 - x1) as f64).hypot((y2 - y1) as f64);
        if length >= min_length {
            segments.push(Segment {
                x1: x1 as i32,
                y1: y1 as i32,
                x2: x2 as i32,
                y2: y2 as i32,
            });
        }
    };

    for t in -reach..=reach {
        if !hit(t) {
            continue;
        }
        run = match run {
            Some((start, last)) if t - last <= max_gap + 1 => Some((start, t)),
            Some((start, last)) => {
                flush(start, last, &mut segments);
                Some((t, t))
            }
            None => Some((t, t)),
        };
    }
    if let Some((start, last)) = run {
        flush(start, last, &mut segments);
    }

    segments
}

/// Straight segments found in a grayscale page.
#[must_use]
pub fn detect_segments(gray: &GrayImage, config: &DetectorConfig) -> Vec<Segment> {
    let edges = canny(gray, config.canny_low, config.canny_high);
    let options = LineDetectionOptions {
        vote_threshold: config.hough_votes,
        suppression_radius: config.suppression_radius,
    };

    detect_lines(&edges, options)
        .into_iter()
        .flat_map(|line| segments_along(&edges, line, config))
        .collect()
}

#[must_use]
pub fn detect_layout(gray: &GrayImage, config: &DetectorConfig) -> LayoutClass {
    let segments = detect_segments(gray, config);
    let stats = LineStats::from_segments(&segments, config.axis_tolerance);
    let layout = stats.classify(config);
    debug!(
        total = stats.total,
        horizontal = stats.horizontal,
        vertical = stats.vertical,
        ?layout,
        "line detection finished"
    );
    layout
}
