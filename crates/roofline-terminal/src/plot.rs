//! Log-log roofline diagram rendering.
//!
//! Layout, top to bottom: title, y-axis label and colorbar legend, the
//! plot area, the x axis with its ticks, the x-axis label. The y ticks sit
//! left of the plot area and the colorbar right of it.

use crate::buffer::CellBuffer;
use crate::color::Color;
use crate::error::RenderError;
use crate::scale::{format_tick, LogScale};
use crate::style::PlotStyle;
use crate::theme::Theme;
use roofline_core::{Diagram, LineSeries};
use unicode_width::UnicodeWidthStr;

/// Smallest buffer a diagram is rendered into.
pub const MIN_WIDTH: u16 = 40;
pub const MIN_HEIGHT: u16 = 12;

/// Marker for one loop.
pub const POINT_MARKER: char = '•';

const COLORBAR_CELL: char = '█';
// Dot pattern of compute ceilings: DASH_ON lit, then gap, per DASH_PERIOD.
const DASH_PERIOD: usize = 6;
const DASH_ON: usize = 4;

/// Cell rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Area {
    x: u16,
    y: u16,
    width: u16,
    height: u16,
}

#[derive(Debug, Clone, Copy)]
struct Layout {
    plot: Area,
    colorbar_x: u16,
    tick_label_width: u16,
}

/// Renders one [`Diagram`] into a [`CellBuffer`].
#[derive(Debug, Clone)]
pub struct RooflinePlot<'a> {
    diagram: &'a Diagram,
    style: &'a PlotStyle,
    theme: Theme,
}

impl<'a> RooflinePlot<'a> {
    #[must_use]
    pub fn new(diagram: &'a Diagram, style: &'a PlotStyle) -> Self {
        Self {
            diagram,
            style,
            theme: Theme::default(),
        }
    }

    #[must_use]
    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    /// Draw the diagram into a fresh `width × height` buffer.
    pub fn render(&self, width: u16, height: u16) -> Result<CellBuffer, RenderError> {
        if width < MIN_WIDTH || height < MIN_HEIGHT {
            return Err(RenderError::PlotTooSmall {
                width,
                height,
                min_width: MIN_WIDTH,
                min_height: MIN_HEIGHT,
            });
        }
        let x_scale = LogScale::new("x", self.style.x_bounds[0], self.style.x_bounds[1])?;
        let y_scale = LogScale::new("y", self.style.y_bounds[0], self.style.y_bounds[1])?;
        let weights = self.diagram.weight_range();
        let layout = Self::layout(width, height, &y_scale, weights);

        let mut buf = CellBuffer::new(width, height);
        let mapper = Mapper {
            area: layout.plot,
            x: x_scale,
            y: y_scale,
        };

        self.draw_frame(&mut buf, &layout, &mapper);
        for line in &self.diagram.memory_lines {
            draw_series(&mut buf, &mapper, line, self.theme.memory_line, false);
        }
        for line in &self.diagram.compute_lines {
            draw_series(&mut buf, &mapper, line, self.theme.compute_line, true);
        }
        self.draw_annotations(&mut buf, &mapper);
        let skipped = self.draw_points(&mut buf, &mapper, weights);
        self.draw_colorbar(&mut buf, &layout, weights);

        tracing::debug!(
            cohort = %self.diagram.cohort,
            points = self.diagram.points.len(),
            skipped,
            memory_lines = self.diagram.memory_lines.len(),
            compute_lines = self.diagram.compute_lines.len(),
            "Rendered roofline diagram"
        );
        Ok(buf)
    }

    fn layout(
        width: u16,
        height: u16,
        y_scale: &LogScale,
        weights: Option<(f64, f64)>,
    ) -> Layout {
        let tick_label_width = y_scale
            .ticks()
            .into_iter()
            .map(|t| format_tick(t).width() as u16)
            .max()
            .unwrap_or(1);
        let weight_label_width = weights.map_or(0, |(lo, hi)| {
            format_weight(lo).width().max(format_weight(hi).width()) as u16
        });
        // Axis column, gap, bar, gap, labels.
        let plot_x = tick_label_width + 1;
        let plot_width = width.saturating_sub(plot_x + 3 + weight_label_width).max(2);
        Layout {
            plot: Area {
                x: plot_x,
                y: 2,
                width: plot_width,
                height: height - 5,
            },
            colorbar_x: plot_x + plot_width + 1,
            tick_label_width,
        }
    }

    fn draw_frame(&self, buf: &mut CellBuffer, layout: &Layout, mapper: &Mapper) {
        let fg = Some(self.theme.foreground);
        let dim = Some(self.theme.dim);
        let plot = layout.plot;
        let axis_x = plot.x - 1;
        let axis_y = plot.y + plot.height;

        let width = buf.width();

        put_centered(buf, 0, 0, width, &self.style.title, fg);
        buf.put_text(0, 1, &self.style.y_label, fg);
        let legend_width = self.style.colorbar_label.width() as u16;
        buf.put_text(width.saturating_sub(legend_width), 1, &self.style.colorbar_label, fg);
        put_centered(buf, plot.x, axis_y + 2, plot.width, &self.style.x_label, fg);

        for row in plot.y..axis_y {
            buf.put_char(axis_x, row, '│', dim);
        }
        for col in plot.x..plot.x + plot.width {
            buf.put_char(col, axis_y, '─', dim);
        }
        buf.put_char(axis_x, axis_y, '└', dim);

        for tick in mapper.y.ticks() {
            let Some(row) = mapper.cell_row(tick) else {
                continue;
            };
            let label = format_tick(tick);
            let start = layout.tick_label_width - label.width() as u16;
            buf.put_text(start, row, &label, fg);
            buf.put_char(axis_x, row, '┤', dim);
        }

        let mut next_free = 0;
        for tick in mapper.x.ticks() {
            let Some(col) = mapper.cell_col(tick) else {
                continue;
            };
            buf.put_char(col, axis_y, '┬', dim);
            let label = format_tick(tick);
            let half = label.width() as u16 / 2;
            let start = col.saturating_sub(half).max(next_free);
            next_free = start + buf.put_text(start, axis_y + 1, &label, fg) + 1;
        }
    }

    fn draw_annotations(&self, buf: &mut CellBuffer, mapper: &Mapper) {
        let color = Some(self.theme.annotation);
        for note in &self.style.annotations {
            if let (Some(col), Some(row)) = (mapper.cell_col(note.x), mapper.cell_row(note.y)) {
                buf.put_text(col, row, &note.text, color);
            }
        }
    }

    /// Coldest loop first so the hottest ends up on top. Returns how many
    /// points fell outside the axes.
    fn draw_points(
        &self,
        buf: &mut CellBuffer,
        mapper: &Mapper,
        weights: Option<(f64, f64)>,
    ) -> usize {
        let (lo, hi) = weights.unwrap_or((0.0, 0.0));
        let mut skipped = 0;
        for point in self.diagram.points.iter().rev() {
            match (mapper.cell_col(point.x), mapper.cell_row(point.y)) {
                (Some(col), Some(row)) => {
                    let color = self.theme.weight.sample_range(point.weight, lo, hi);
                    buf.put_char(col, row, POINT_MARKER, Some(color));
                }
                _ => skipped += 1,
            }
        }
        skipped
    }

    fn draw_colorbar(&self, buf: &mut CellBuffer, layout: &Layout, weights: Option<(f64, f64)>) {
        let plot = layout.plot;
        let last = f64::from(plot.height.saturating_sub(1).max(1));
        for i in 0..plot.height {
            let t = 1.0 - f64::from(i) / last;
            let color = self.theme.weight.sample(t);
            buf.put_char(layout.colorbar_x, plot.y + i, COLORBAR_CELL, Some(color));
        }
        if let Some((lo, hi)) = weights {
            let fg = Some(self.theme.foreground);
            let label_x = layout.colorbar_x + 2;
            buf.put_text(label_x, plot.y, &format_weight(hi), fg);
            buf.put_text(label_x, plot.y + plot.height - 1, &format_weight(lo), fg);
        }
    }
}

/// Seconds label for the colorbar.
#[must_use]
pub fn format_weight(seconds: f64) -> String {
    if seconds >= 100.0 {
        format!("{seconds:.0}")
    } else if seconds >= 1.0 {
        format!("{seconds:.2}")
    } else {
        format!("{seconds:.3}")
    }
}

fn put_centered(buf: &mut CellBuffer, x: u16, y: u16, span: u16, text: &str, color: Option<Color>) {
    let width = text.width() as u16;
    let start = x + span.saturating_sub(width) / 2;
    buf.put_text(start, y, text, color);
}

/// Data coordinates to cell and dot coordinates of the plot area.
struct Mapper {
    area: Area,
    x: LogScale,
    y: LogScale,
}

impl Mapper {
    fn cell_col(&self, x: f64) -> Option<u16> {
        let t = self.x.normalize(x)?;
        Some(self.area.x + (t * f64::from(self.area.width - 1)).round() as u16)
    }

    fn cell_row(&self, y: f64) -> Option<u16> {
        let t = self.y.normalize(y)?;
        Some(self.area.y + ((1.0 - t) * f64::from(self.area.height - 1)).round() as u16)
    }

    /// Normalised position, unbounded; `None` only for values a log axis
    /// cannot place at all.
    fn unit(&self, (x, y): (f64, f64)) -> Option<(f64, f64)> {
        Some((self.x.normalize_unclamped(x)?, self.y.normalize_unclamped(y)?))
    }

    fn dot(&self, (u, v): (f64, f64)) -> (isize, isize) {
        let dots_w = f64::from(self.area.width) * 2.0 - 1.0;
        let dots_h = f64::from(self.area.height) * 4.0 - 1.0;
        let x = f64::from(self.area.x) * 2.0 + (u * dots_w).round();
        let y = f64::from(self.area.y) * 4.0 + ((1.0 - v) * dots_h).round();
        (x as isize, y as isize)
    }

    fn contains_dot(&self, (x, y): (isize, isize)) -> bool {
        let x0 = self.area.x as isize * 2;
        let y0 = self.area.y as isize * 4;
        let x1 = x0 + self.area.width as isize * 2;
        let y1 = y0 + self.area.height as isize * 4;
        (x0..x1).contains(&x) && (y0..y1).contains(&y)
    }
}

/// Join consecutive samples; segments are straight in log-log space and
/// clipped to the plot area.
fn draw_series(buf: &mut CellBuffer, mapper: &Mapper, line: &LineSeries, color: Color, dashed: bool) {
    let samples: Vec<(f64, f64)> = line.points().collect();
    let mut step = 0;
    for pair in samples.windows(2) {
        let start = enter_left_edge(pair[0], pair[1], mapper.x.min());
        let (Some(a), Some(b)) = (mapper.unit(start), mapper.unit(pair[1])) else {
            continue;
        };
        if let Some((a, b)) = clip_unit(a, b) {
            draw_line(buf, mapper, mapper.dot(a), mapper.dot(b), color, dashed, &mut step);
        }
    }
}

/// A sample at `x <= 0` has no log position. Ceiling lines are linear in
/// data space, so the segment is cut where it crosses `x_min` instead.
fn enter_left_edge(a: (f64, f64), b: (f64, f64), x_min: f64) -> (f64, f64) {
    if a.0 > 0.0 || b.0 <= x_min {
        return a;
    }
    let t = (x_min - a.0) / (b.0 - a.0);
    (x_min, t.mul_add(b.1 - a.1, a.1))
}

/// Liang-Barsky clip of segment `a → b` against the unit square.
/// Endpoints cut by an edge lie exactly on it.
fn clip_unit(a: (f64, f64), b: (f64, f64)) -> Option<((f64, f64), (f64, f64))> {
    let (dx, dy) = (b.0 - a.0, b.1 - a.1);
    let (mut t0, mut t1) = (0.0_f64, 1.0_f64);
    // (axis, edge value) that set t0 / t1.
    let (mut enter, mut leave): (Option<(usize, f64)>, Option<(usize, f64)>) = (None, None);
    let edges = [
        (-dx, a.0, 0, 0.0),
        (dx, 1.0 - a.0, 0, 1.0),
        (-dy, a.1, 1, 0.0),
        (dy, 1.0 - a.1, 1, 1.0),
    ];
    for (p, q, axis, edge) in edges {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let r = q / p;
        if p < 0.0 {
            if r > t1 {
                return None;
            }
            if r > t0 {
                t0 = r;
                enter = Some((axis, edge));
            }
        } else {
            if r < t0 {
                return None;
            }
            if r < t1 {
                t1 = r;
                leave = Some((axis, edge));
            }
        }
    }

    let at = |t: f64, snap: Option<(usize, f64)>| {
        let mut point = (
            t.mul_add(dx, a.0).clamp(0.0, 1.0),
            t.mul_add(dy, a.1).clamp(0.0, 1.0),
        );
        match snap {
            Some((0, edge)) => point.0 = edge,
            Some((_, edge)) => point.1 = edge,
            None => {}
        }
        point
    };
    let start = if enter.is_some() { at(t0, enter) } else { a };
    let end = if leave.is_some() { at(t1, leave) } else { b };
    Some((start, end))
}

/// Bresenham between two dots. `step` carries the dash phase across
/// segments of one series.
fn draw_line(
    buf: &mut CellBuffer,
    mapper: &Mapper,
    (x0, y0): (isize, isize),
    (x1, y1): (isize, isize),
    color: Color,
    dashed: bool,
    step: &mut usize,
) {
    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;
    let (mut x, mut y) = (x0, y0);

    loop {
        let lit = !dashed || *step % DASH_PERIOD < DASH_ON;
        if lit && mapper.contains_dot((x, y)) {
            buf.set_dot(x as usize, y as usize, color);
        }
        *step += 1;

        if x == x1 && y == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            err += dx;
            y += sy;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roofline_core::{Cohort, ScatterPoint};

    fn line(name: &str, x: Vec<f64>, y: Vec<f64>) -> LineSeries {
        LineSeries {
            name: name.to_string(),
            x,
            y,
        }
    }

    fn diagram(points: Vec<ScatterPoint>) -> Diagram {
        Diagram {
            cohort: Cohort::Scalar,
            points,
            memory_lines: vec![line("DRAM", vec![0.0, 0.5, 1.0], vec![0.0, 5.0, 10.0])],
            compute_lines: vec![line("Peak", vec![0.0, 50.0, 100.0], vec![2.0, 2.0, 2.0])],
            memory_domain_max: 1.0,
        }
    }

    fn point(location: &str, x: f64, y: f64, weight: f64) -> ScatterPoint {
        ScatterPoint {
            location: location.to_string(),
            x,
            y,
            weight,
        }
    }

    fn count(buf: &CellBuffer, ch: char) -> usize {
        (0..buf.height())
            .flat_map(|y| buf.row(y).iter())
            .filter(|c| c.symbol == ch)
            .count()
    }

    #[test]
    fn test_rejects_small_buffers() {
        let d = diagram(vec![]);
        let style = PlotStyle::scalar();
        let err = RooflinePlot::new(&d, &style).render(39, 20).unwrap_err();
        assert!(matches!(err, RenderError::PlotTooSmall { width: 39, .. }));
        assert!(RooflinePlot::new(&d, &style).render(80, 11).is_err());
        assert!(RooflinePlot::new(&d, &style).render(40, 12).is_ok());
    }

    #[test]
    fn test_rejects_invalid_axis() {
        let d = diagram(vec![]);
        let style = PlotStyle::scalar().with_y_bounds(0.0, 10.0);
        let err = RooflinePlot::new(&d, &style).render(80, 24).unwrap_err();
        assert!(matches!(err, RenderError::InvalidAxis { axis: "y", .. }));
    }

    #[test]
    fn test_title_and_labels() {
        let d = diagram(vec![]);
        let style = PlotStyle::scalar();
        let buf = RooflinePlot::new(&d, &style).render(80, 24).unwrap();
        let text = buf.to_plain_text();
        assert!(buf.row_text(0).contains("Roofline for Scalar loops"));
        assert!(buf.row_text(1).starts_with("Performance (GFLOPS)"));
        assert!(buf.row_text(1).ends_with("Self Time"));
        assert!(buf.row_text(23).contains("Arithmetic Intensity (FLOPS/Byte)"));
        assert!(text.contains("0.001"));
        assert!(text.contains("Scalar Add Peak"));
    }

    #[test]
    fn test_lines_are_drawn_in_braille() {
        let d = diagram(vec![]);
        let style = PlotStyle::scalar();
        let buf = RooflinePlot::new(&d, &style).render(80, 24).unwrap();
        let braille = (0..buf.height())
            .flat_map(|y| buf.row(y).iter())
            .filter(|c| c.dots() != 0)
            .count();
        assert!(braille > 20, "expected braille line cells, got {braille}");
    }

    #[test]
    fn test_points_colored_by_weight() {
        let d = diagram(vec![
            point("hot", 0.1, 1.0, 10.0),
            point("cold", 0.01, 0.1, 1.0),
        ]);
        let style = PlotStyle::scalar().with_annotations(vec![]);
        let theme = Theme::default();
        let buf = RooflinePlot::new(&d, &style)
            .with_theme(theme.clone())
            .render(80, 24)
            .unwrap();
        let markers: Vec<_> = (0..buf.height())
            .flat_map(|y| buf.row(y).iter())
            .filter(|c| c.symbol == POINT_MARKER)
            .collect();
        assert_eq!(markers.len(), 2);
        let colors: Vec<_> = markers.iter().filter_map(|c| c.fg).collect();
        assert!(colors.contains(&theme.weight.sample(1.0)));
        assert!(colors.contains(&theme.weight.sample(0.0)));
    }

    #[test]
    fn test_unplottable_points_are_skipped() {
        let d = diagram(vec![
            point("zero", 0.0, 1.0, 3.0),
            point("above", 0.1, 1e6, 2.0),
            point("ok", 0.1, 1.0, 1.0),
        ]);
        let style = PlotStyle::scalar();
        let buf = RooflinePlot::new(&d, &style).render(80, 24).unwrap();
        assert_eq!(count(&buf, POINT_MARKER), 1);
    }

    #[test]
    fn test_colorbar_labels() {
        let d = diagram(vec![point("a", 0.1, 1.0, 0.25), point("b", 0.1, 2.0, 12.5)]);
        let style = PlotStyle::scalar();
        let buf = RooflinePlot::new(&d, &style).render(80, 24).unwrap();
        assert!(buf.row_text(2).ends_with("12.50"));
        assert!(buf.row_text(20).ends_with("0.250"));
        assert_eq!(count(&buf, COLORBAR_CELL), 19);
    }

    #[test]
    fn test_clip_unit() {
        assert_eq!(clip_unit((0.2, 0.2), (0.8, 0.8)), Some(((0.2, 0.2), (0.8, 0.8))));
        let ((ax, ay), (bx, by)) = clip_unit((-1.0, 0.5), (2.0, 0.5)).unwrap();
        assert_eq!((ax, ay, bx, by), (0.0, 0.5, 1.0, 0.5));
        assert_eq!(clip_unit((-1.0, 2.0), (-0.5, 3.0)), None);
        assert_eq!(clip_unit((0.5, 1.5), (0.7, 1.5)), None);
        // Rounding in the parametric form must not leak past the edges.
        let ((ax, ay), (bx, by)) = clip_unit((-0.3, -0.7), (1.9, 2.3)).unwrap();
        for v in [ax, ay, bx, by] {
            assert!((0.0..=1.0).contains(&v), "{v} outside the unit square");
        }
        assert_eq!(ay, 0.0);
        assert_eq!(by, 1.0);
    }

    #[test]
    fn test_enter_left_edge() {
        // Diagonal through the origin keeps its slope.
        let (x, y) = enter_left_edge((0.0, 0.0), (2.0, 20.0), 0.001);
        assert_eq!(x, 0.001);
        assert!((y - 0.01).abs() < 1e-12);
        // Horizontal keeps its height.
        assert_eq!(enter_left_edge((0.0, 7.3), (2.0, 7.3), 0.001), (0.001, 7.3));
        // Positive starts and segments left of the axis are untouched.
        assert_eq!(enter_left_edge((0.5, 1.0), (1.0, 2.0), 0.001), (0.5, 1.0));
        assert_eq!(enter_left_edge((0.0, 0.0), (0.0005, 1.0), 0.001), (0.0, 0.0));
    }

    #[test]
    fn test_compute_line_sampled_past_the_axis_is_drawn() {
        let mut d = diagram(vec![]);
        d.memory_lines.clear();
        d.compute_lines = vec![line("Peak", vec![0.0, 50.0, 100.0], vec![2.0, 2.0, 2.0])];
        let style = PlotStyle::scalar().with_annotations(vec![]);
        let buf = RooflinePlot::new(&d, &style).render(80, 24).unwrap();
        let dotted_rows: Vec<u16> = (0..buf.height())
            .filter(|&y| buf.row(y).iter().any(|c| c.dots() != 0))
            .collect();
        assert_eq!(dotted_rows.len(), 1);
        let cells = buf.row(dotted_rows[0]).iter().filter(|c| c.dots() != 0).count();
        assert!(cells > 30, "dashed horizontal should span the plot, got {cells}");
    }

    #[test]
    fn test_format_weight() {
        assert_eq!(format_weight(250.0), "250");
        assert_eq!(format_weight(12.5), "12.50");
        assert_eq!(format_weight(0.25), "0.250");
    }
}
