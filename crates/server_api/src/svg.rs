//! Minimal SVG rendering for [`ChartSpec`] values.

use std::f64::consts::PI;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use shared::protocol::{ChartKind, ChartSeries, ChartSpec};

const WIDTH: f64 = 600.0;
const HEIGHT: f64 = 500.0;
const MARGIN_LEFT: f64 = 80.0;
const MARGIN_RIGHT: f64 = 24.0;
const MARGIN_TOP: f64 = 56.0;
const MARGIN_BOTTOM: f64 = 64.0;
const Y_TICKS: usize = 5;
const DEFAULT_COLOR: &str = "steelblue";

struct Plot {
    x_min: f64,
    x_max: f64,
    y_min: f64,
    y_max: f64,
}

impl Plot {
    fn left() -> f64 {
        MARGIN_LEFT
    }

    fn right() -> f64 {
        WIDTH - MARGIN_RIGHT
    }

    fn top() -> f64 {
        MARGIN_TOP
    }

    fn bottom() -> f64 {
        HEIGHT - MARGIN_BOTTOM
    }

    fn sx(&self, x: f64) -> f64 {
        let span = self.x_max - self.x_min;
        if span <= 0.0 {
            return (Self::left() + Self::right()) / 2.0;
        }
        Self::left() + (x - self.x_min) / span * (Self::right() - Self::left())
    }

    fn sy(&self, y: f64) -> f64 {
        let span = self.y_max - self.y_min;
        Self::bottom() - (y - self.y_min) / span * (Self::bottom() - Self::top())
    }
}

pub fn render_svg(spec: &ChartSpec) -> String {
    let mut svg = format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{WIDTH}" height="{HEIGHT}" viewBox="0 0 {WIDTH} {HEIGHT}" font-family="sans-serif">"#
    );
    svg.push_str(&format!(
        r#"<rect width="{WIDTH}" height="{HEIGHT}" fill="white"/><text x="{}" y="32" font-size="16" text-anchor="middle">{}</text>"#,
        WIDTH / 2.0,
        escape_xml(&spec.title)
    ));

    if spec.is_empty() {
        svg.push_str(&format!(
            r#"<text x="{}" y="{}" font-size="14" text-anchor="middle" fill="gray">Sin datos</text>"#,
            WIDTH / 2.0,
            HEIGHT / 2.0
        ));
    } else {
        match spec.kind {
            ChartKind::Bar => render_bars(&mut svg, spec),
            ChartKind::Pie => render_pie(&mut svg, spec),
            ChartKind::Line => render_lines(&mut svg, spec, false),
            ChartKind::Area => render_lines(&mut svg, spec, true),
        }
    }

    svg.push_str("</svg>");
    svg
}

pub fn chart_data_uri(svg: &str) -> String {
    format!("data:image/svg+xml;base64,{}", STANDARD.encode(svg))
}

fn render_bars(svg: &mut String, spec: &ChartSpec) {
    let points: Vec<_> = spec.series.iter().flat_map(|s| s.points.iter()).collect();
    let plot = Plot {
        x_min: 0.0,
        x_max: points.len() as f64,
        y_min: 0.0,
        y_max: nice_max(points.iter().map(|p| p.y)),
    };
    render_axes(svg, spec, &plot);

    let slot = (Plot::right() - Plot::left()) / points.len() as f64;
    let bar_width = slot * 0.8;
    for (index, point) in points.iter().enumerate() {
        let x = Plot::left() + slot * index as f64 + (slot - bar_width) / 2.0;
        let y = plot.sy(point.y.max(0.0));
        let color = point.color.as_deref().unwrap_or(DEFAULT_COLOR);
        svg.push_str(&format!(
            r#"<rect x="{x:.1}" y="{y:.1}" width="{bar_width:.1}" height="{:.1}" fill="{}"/>"#,
            Plot::bottom() - y,
            escape_xml(color)
        ));
        svg.push_str(&format!(
            r#"<text x="{:.1}" y="{:.1}" font-size="11" text-anchor="middle">{}</text>"#,
            x + bar_width / 2.0,
            Plot::bottom() + 16.0,
            escape_xml(&point.label)
        ));
    }
}

fn render_pie(svg: &mut String, spec: &ChartSpec) {
    let points: Vec<_> = spec
        .series
        .iter()
        .flat_map(|s| s.points.iter())
        .filter(|p| p.y > 0.0)
        .collect();
    let total: f64 = points.iter().map(|p| p.y).sum();
    if total <= 0.0 {
        return;
    }

    let cx = WIDTH / 2.0;
    let cy = (HEIGHT + MARGIN_TOP) / 2.0;
    let radius = (HEIGHT - MARGIN_TOP - MARGIN_BOTTOM) / 2.0;
    let mut angle = -PI / 2.0;

    for point in points {
        let fraction = point.y / total;
        let sweep = fraction * 2.0 * PI;
        let color = escape_xml(point.color.as_deref().unwrap_or(DEFAULT_COLOR));
        if fraction >= 1.0 {
            svg.push_str(&format!(
                r#"<circle cx="{cx:.1}" cy="{cy:.1}" r="{radius:.1}" fill="{color}"/>"#
            ));
        } else {
            let (x0, y0) = (cx + radius * angle.cos(), cy + radius * angle.sin());
            let end = angle + sweep;
            let (x1, y1) = (cx + radius * end.cos(), cy + radius * end.sin());
            let large_arc = u8::from(sweep > PI);
            svg.push_str(&format!(
                r#"<path d="M{cx:.1},{cy:.1} L{x0:.1},{y0:.1} A{radius:.1},{radius:.1} 0 {large_arc} 1 {x1:.1},{y1:.1} Z" fill="{color}" stroke="white"/>"#
            ));
        }

        let middle = angle + sweep / 2.0;
        let (lx, ly) = (
            cx + radius * 1.12 * middle.cos(),
            cy + radius * 1.12 * middle.sin(),
        );
        let (px, py) = (
            cx + radius * 0.6 * middle.cos(),
            cy + radius * 0.6 * middle.sin(),
        );
        svg.push_str(&format!(
            r#"<text x="{lx:.1}" y="{ly:.1}" font-size="12" text-anchor="middle">{}</text><text x="{px:.1}" y="{py:.1}" font-size="12" text-anchor="middle">{:.1}%</text>"#,
            escape_xml(&point.label),
            fraction * 100.0
        ));
        angle += sweep;
    }
}

fn render_lines(svg: &mut String, spec: &ChartSpec, filled: bool) {
    let all = || spec.series.iter().flat_map(|s| s.points.iter());
    let plot = Plot {
        x_min: all().map(|p| p.x).fold(f64::INFINITY, f64::min),
        x_max: all().map(|p| p.x).fold(f64::NEG_INFINITY, f64::max),
        y_min: 0.0,
        y_max: nice_max(all().map(|p| p.y)),
    };
    render_axes(svg, spec, &plot);
    render_x_ticks(svg, &plot);

    for series in spec.series.iter().filter(|s| !s.points.is_empty()) {
        let color = escape_xml(series.color.as_deref().unwrap_or(DEFAULT_COLOR));
        let coords: Vec<String> = series
            .points
            .iter()
            .map(|p| format!("{:.1},{:.1}", plot.sx(p.x), plot.sy(p.y)))
            .collect();

        if filled {
            let first = series.points.first().map(|p| plot.sx(p.x)).unwrap_or_default();
            let last = series.points.last().map(|p| plot.sx(p.x)).unwrap_or_default();
            svg.push_str(&format!(
                r#"<polygon points="{first:.1},{bottom:.1} {} {last:.1},{bottom:.1}" fill="{color}" fill-opacity="{}"/>"#,
                coords.join(" "),
                series.fill_opacity.unwrap_or(1.0),
                bottom = Plot::bottom()
            ));
        } else {
            svg.push_str(&format!(
                r#"<polyline points="{}" fill="none" stroke="{color}" stroke-width="2"/>"#,
                coords.join(" ")
            ));
            for coord in &coords {
                if let Some((x, y)) = coord.split_once(',') {
                    svg.push_str(&format!(r#"<circle cx="{x}" cy="{y}" r="3" fill="{color}"/>"#));
                }
            }
        }
    }

    render_legend(svg, &spec.series);
}

fn render_axes(svg: &mut String, spec: &ChartSpec, plot: &Plot) {
    svg.push_str(&format!(
        r#"<line x1="{l}" y1="{b}" x2="{r}" y2="{b}" stroke="black"/><line x1="{l}" y1="{t}" x2="{l}" y2="{b}" stroke="black"/>"#,
        l = Plot::left(),
        r = Plot::right(),
        t = Plot::top(),
        b = Plot::bottom()
    ));

    for tick in 0..=Y_TICKS {
        let value = plot.y_min + (plot.y_max - plot.y_min) * tick as f64 / Y_TICKS as f64;
        let y = plot.sy(value);
        svg.push_str(&format!(
            r##"<line x1="{l}" y1="{y:.1}" x2="{r}" y2="{y:.1}" stroke="#e0e0e0"/><text x="{:.1}" y="{:.1}" font-size="10" text-anchor="end">{}</text>"##,
            Plot::left() - 6.0,
            y + 4.0,
            format_tick(value),
            l = Plot::left(),
            r = Plot::right()
        ));
    }

    if let Some(label) = &spec.x_label {
        svg.push_str(&format!(
            r#"<text x="{:.1}" y="{:.1}" font-size="12" text-anchor="middle">{}</text>"#,
            (Plot::left() + Plot::right()) / 2.0,
            HEIGHT - 16.0,
            escape_xml(label)
        ));
    }
    if let Some(label) = &spec.y_label {
        svg.push_str(&format!(
            r#"<text x="18" y="{y:.1}" font-size="12" text-anchor="middle" transform="rotate(-90 18 {y:.1})">{}</text>"#,
            escape_xml(label),
            y = (Plot::top() + Plot::bottom()) / 2.0
        ));
    }
}

fn render_x_ticks(svg: &mut String, plot: &Plot) {
    let span = plot.x_max - plot.x_min;
    let steps = if span <= 0.0 { 0 } else { 5 };
    for tick in 0..=steps {
        let value = if steps == 0 {
            plot.x_min
        } else {
            plot.x_min + span * tick as f64 / steps as f64
        };
        svg.push_str(&format!(
            r#"<text x="{:.1}" y="{:.1}" font-size="10" text-anchor="middle">{}</text>"#,
            plot.sx(value),
            Plot::bottom() + 16.0,
            value.round()
        ));
    }
}

fn render_legend(svg: &mut String, series: &[ChartSeries]) {
    for (index, entry) in series.iter().enumerate() {
        let y = Plot::top() + 8.0 + index as f64 * 18.0;
        let color = escape_xml(entry.color.as_deref().unwrap_or(DEFAULT_COLOR));
        svg.push_str(&format!(
            r#"<rect x="{:.1}" y="{:.1}" width="12" height="12" fill="{color}"/><text x="{:.1}" y="{:.1}" font-size="11">{}</text>"#,
            Plot::left() + 12.0,
            y,
            Plot::left() + 30.0,
            y + 10.0,
            escape_xml(&entry.label)
        ));
    }
}

fn nice_max(values: impl Iterator<Item = f64>) -> f64 {
    let max = values.filter(|v| v.is_finite()).fold(0.0_f64, f64::max);
    if max <= 0.0 {
        return 1.0;
    }
    let magnitude = 10f64.powf(max.log10().floor());
    let scaled = max / magnitude;
    let step = [1.0, 2.0, 2.5, 5.0, 10.0]
        .into_iter()
        .find(|step| scaled <= *step)
        .unwrap_or(10.0);
    step * magnitude
}

fn format_tick(value: f64) -> String {
    if value.abs() >= 100.0 || value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value:.1}")
    }
}

pub fn escape_xml(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}
