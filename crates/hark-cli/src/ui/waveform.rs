//! Waveform rendering: byte snapshot in, smoothed braille trace out.
//!
//! The snapshot from the analyser is a row of bytes centred on 128. Adjacent
//! points are joined with cubic Bézier curves whose control points sit at the
//! horizontal midpoint between the samples, which rounds off the corners a
//! plain polyline would have. Curves are tessellated into short line segments
//! and drawn on a braille canvas in (index, byte) space, so a silent snapshot
//! renders as one flat midline.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Color;
use ratatui::symbols::Marker;
use ratatui::widgets::Widget;
use ratatui::widgets::canvas::{Canvas, Line as CanvasLine};

/// Line segments per curve when tessellating for the canvas.
const SEGMENTS_PER_CURVE: usize = 3;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A cubic Bézier curve between two snapshot points.
#[derive(Clone, Copy, Debug)]
pub struct CubicBezier {
    /// Control points: [start, control1, control2, end]
    pub points: [Point; 4],
}

impl CubicBezier {
    /// Evaluate the curve at parameter t (0.0 to 1.0).
    pub fn evaluate(&self, t: f64) -> Point {
        let t2 = t * t;
        let t3 = t2 * t;
        let mt = 1.0 - t;
        let mt2 = mt * mt;
        let mt3 = mt2 * mt;

        let [p0, p1, p2, p3] = self.points;

        Point::new(
            mt3 * p0.x + 3.0 * mt2 * t * p1.x + 3.0 * mt * t2 * p2.x + t3 * p3.x,
            mt3 * p0.y + 3.0 * mt2 * t * p1.y + 3.0 * mt * t2 * p2.y + t3 * p3.y,
        )
    }

    /// Tessellate the curve into `segments` line segments.
    pub fn tessellate(&self, segments: usize) -> Vec<(Point, Point)> {
        if segments == 0 {
            return vec![];
        }

        let mut result = Vec::with_capacity(segments);
        let mut prev = self.evaluate(0.0);
        for i in 1..=segments {
            let t = i as f64 / segments as f64;
            let curr = self.evaluate(t);
            result.push((prev, curr));
            prev = curr;
        }
        result
    }
}

/// Join adjacent snapshot bytes with midpoint-control cubics.
///
/// For each pair of neighbours the two control points share the horizontal
/// midpoint, one at the previous sample's height and one at the current
/// sample's, so the trace leaves and enters each sample horizontally.
pub fn smooth_path(snapshot: &[u8]) -> Vec<CubicBezier> {
    let mut curves = Vec::with_capacity(snapshot.len().saturating_sub(1));
    for i in 1..snapshot.len() {
        let x0 = (i - 1) as f64;
        let x1 = i as f64;
        let y0 = snapshot[i - 1] as f64;
        let y1 = snapshot[i] as f64;
        let mid_x = (x0 + x1) / 2.0;
        curves.push(CubicBezier {
            points: [
                Point::new(x0, y0),
                Point::new(mid_x, y0),
                Point::new(mid_x, y1),
                Point::new(x1, y1),
            ],
        });
    }
    curves
}

/// Live waveform trace over the latest analyser snapshot.
pub struct WaveformWidget<'a> {
    snapshot: &'a [u8],
}

impl<'a> WaveformWidget<'a> {
    pub fn new(snapshot: &'a [u8]) -> Self {
        Self { snapshot }
    }
}

impl Widget for WaveformWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.is_empty() || self.snapshot.len() < 2 {
            return;
        }

        let curves = smooth_path(self.snapshot);
        let max_x = (self.snapshot.len() - 1) as f64;

        Canvas::default()
            .marker(Marker::Braille)
            .x_bounds([0.0, max_x])
            .y_bounds([0.0, 255.0])
            .paint(|ctx| {
                for curve in &curves {
                    for (start, end) in curve.tessellate(SEGMENTS_PER_CURVE) {
                        ctx.draw(&CanvasLine {
                            x1: start.x,
                            y1: start.y,
                            x2: end.x,
                            y2: end.y,
                            color: Color::Cyan,
                        });
                    }
                }
            })
            .render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hark_core::audio::SNAPSHOT_LEN;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    #[test]
    fn evaluate_hits_the_anchor_points() {
        let curve = CubicBezier {
            points: [
                Point::new(0.0, 10.0),
                Point::new(0.5, 10.0),
                Point::new(0.5, 30.0),
                Point::new(1.0, 30.0),
            ],
        };
        let start = curve.evaluate(0.0);
        let end = curve.evaluate(1.0);
        assert!((start.x - 0.0).abs() < 1e-9);
        assert!((start.y - 10.0).abs() < 1e-9);
        assert!((end.x - 1.0).abs() < 1e-9);
        assert!((end.y - 30.0).abs() < 1e-9);
    }

    #[test]
    fn tessellate_produces_connected_segments() {
        let curve = CubicBezier {
            points: [
                Point::new(0.0, 0.0),
                Point::new(0.5, 0.0),
                Point::new(0.5, 100.0),
                Point::new(1.0, 100.0),
            ],
        };
        let segments = curve.tessellate(8);
        assert_eq!(segments.len(), 8);
        for pair in segments.windows(2) {
            assert_eq!(pair[0].1, pair[1].0);
        }
    }

    #[test]
    fn smooth_path_joins_every_neighbour_pair() {
        let snapshot = [128u8, 150, 100, 128];
        let curves = smooth_path(&snapshot);
        assert_eq!(curves.len(), 3);
        // Each curve starts where the previous one ended.
        for pair in curves.windows(2) {
            assert_eq!(pair[0].points[3], pair[1].points[0]);
        }
        // Control points sit on the horizontal midpoint.
        assert!((curves[0].points[1].x - 0.5).abs() < 1e-9);
        assert!((curves[0].points[2].x - 0.5).abs() < 1e-9);
        assert!((curves[0].points[1].y - 128.0).abs() < 1e-9);
        assert!((curves[0].points[2].y - 150.0).abs() < 1e-9);
    }

    #[test]
    fn silence_stays_exactly_on_the_midline() {
        let snapshot = vec![128u8; SNAPSHOT_LEN];
        for curve in smooth_path(&snapshot) {
            for (start, end) in curve.tessellate(4) {
                assert_eq!(start.y, 128.0);
                assert_eq!(end.y, 128.0);
            }
        }
    }

    #[test]
    fn silent_snapshot_renders_one_flat_row() {
        let snapshot = vec![128u8; SNAPSHOT_LEN];
        let mut terminal = Terminal::new(TestBackend::new(40, 9)).unwrap();
        terminal
            .draw(|f| f.render_widget(WaveformWidget::new(&snapshot), f.area()))
            .unwrap();

        let buffer = terminal.backend().buffer();
        let area = buffer.area;
        let mut rows_with_content = Vec::new();
        for y in 0..area.height {
            let has_content = (0..area.width)
                .any(|x| buffer[(x, y)].symbol() != " ");
            if has_content {
                rows_with_content.push(y);
            }
        }

        // A flat midline occupies a single row near the vertical centre.
        assert_eq!(rows_with_content.len(), 1, "rows: {rows_with_content:?}");
        let row = rows_with_content[0];
        assert!((3..=5).contains(&row), "midline landed on row {row}");
    }

    #[test]
    fn empty_area_renders_nothing() {
        let snapshot = vec![128u8; SNAPSHOT_LEN];
        let mut terminal = Terminal::new(TestBackend::new(20, 4)).unwrap();
        terminal
            .draw(|f| {
                f.render_widget(WaveformWidget::new(&snapshot), Rect::new(0, 0, 0, 0));
            })
            .unwrap();
        let buffer = terminal.backend().buffer();
        let area = buffer.area;
        for y in 0..area.height {
            for x in 0..area.width {
                assert_eq!(buffer[(x, y)].symbol(), " ");
            }
        }
    }
}
