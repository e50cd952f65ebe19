//! SVG rendering of composed series. Charts are built in memory and sent as `plot.svg`.

use chrono::NaiveDate;
use qmark_core::ImageArtifact;
use qmark_stats::{slice_annotation, PieSeries, TimeSeries};

pub const CHART_FILE_NAME: &str = "plot.svg";

const PALETTE: [&str; 10] = [
    "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f",
    "#bcbd22", "#17becf",
];

const PIE_WIDTH: f64 = 640.0;
const PIE_HEIGHT: f64 = 480.0;
const PIE_RADIUS: f64 = 180.0;
const PIE_CX: f64 = 220.0;
const PIE_CY: f64 = 240.0;

const LINE_WIDTH: f64 = 640.0;
const LINE_HEIGHT: f64 = 400.0;
const MARGIN_LEFT: f64 = 56.0;
const MARGIN_RIGHT: f64 = 24.0;
const MARGIN_TOP: f64 = 24.0;
const MARGIN_BOTTOM: f64 = 48.0;

/// Pie starting at 12 o'clock and running counter-clockwise. Each wedge carries its annotation;
/// the legend lists every slice, including an empty "Other".
pub fn render_pie(series: &PieSeries) -> ImageArtifact {
    let mut svg = open_svg(PIE_WIDTH, PIE_HEIGHT);
    let total = series.total();

    if total == 0 {
        no_data(&mut svg, PIE_CX, PIE_CY);
    } else {
        let mut start = 90.0_f64;
        for (i, slice) in series.slices.iter().enumerate() {
            if slice.value == 0 {
                continue;
            }
            let color = PALETTE[i % PALETTE.len()];
            let sweep = 360.0 * slice.value as f64 / total as f64;

            if slice.value == total {
                svg.push_str(&format!(
                    r#"<circle cx="{:.2}" cy="{:.2}" r="{:.2}" fill="{}" stroke="white"/>"#,
                    PIE_CX, PIE_CY, PIE_RADIUS, color
                ));
            } else {
                let (x0, y0) = polar(PIE_CX, PIE_CY, PIE_RADIUS, start);
                let (x1, y1) = polar(PIE_CX, PIE_CY, PIE_RADIUS, start + sweep);
                let large_arc = u8::from(sweep > 180.0);
                svg.push_str(&format!(
                    r#"<path d="M {:.2} {:.2} L {:.2} {:.2} A {:.2} {:.2} 0 {} 0 {:.2} {:.2} Z" fill="{}" stroke="white"/>"#,
                    PIE_CX, PIE_CY, x0, y0, PIE_RADIUS, PIE_RADIUS, large_arc, x1, y1, color
                ));
            }

            let (tx, ty) = polar(PIE_CX, PIE_CY, PIE_RADIUS * 0.6, start + sweep / 2.0);
            svg.push_str(&format!(
                r#"<text x="{:.2}" y="{:.2}" text-anchor="middle" dominant-baseline="middle">{}</text>"#,
                tx,
                ty,
                slice_annotation(slice.value)
            ));
            start += sweep;
        }
    }

    let legend_x = PIE_CX + PIE_RADIUS + 40.0;
    for (i, slice) in series.slices.iter().enumerate() {
        let y = 60.0 + 24.0 * i as f64;
        svg.push_str(&format!(
            r#"<rect x="{:.2}" y="{:.2}" width="14" height="14" fill="{}"/>"#,
            legend_x,
            y - 11.0,
            PALETTE[i % PALETTE.len()]
        ));
        svg.push_str(&format!(
            r#"<text x="{:.2}" y="{:.2}">{} ({})</text>"#,
            legend_x + 22.0,
            y,
            escape_xml(&slice.label),
            slice.value
        ));
    }

    close_svg(svg)
}

/// Daily line chart: one vertex per date, x spaced by calendar distance.
pub fn render_time_series(series: &TimeSeries) -> ImageArtifact {
    let mut svg = open_svg(LINE_WIDTH, LINE_HEIGHT);
    let plot_w = LINE_WIDTH - MARGIN_LEFT - MARGIN_RIGHT;
    let plot_h = LINE_HEIGHT - MARGIN_TOP - MARGIN_BOTTOM;
    let bottom = MARGIN_TOP + plot_h;

    svg.push_str(&format!(
        r#"<path d="M {:.2} {:.2} L {:.2} {:.2} L {:.2} {:.2}" fill="none" stroke="black"/>"#,
        MARGIN_LEFT,
        MARGIN_TOP,
        MARGIN_LEFT,
        bottom,
        MARGIN_LEFT + plot_w,
        bottom
    ));

    let (first, last) = match (series.points.first(), series.points.last()) {
        (Some(first), Some(last)) => (first.date, last.date),
        _ => {
            no_data(&mut svg, LINE_WIDTH / 2.0, LINE_HEIGHT / 2.0);
            return close_svg(svg);
        }
    };

    let span = (last - first).num_days();
    let max = series.points.iter().map(|p| p.count).max().unwrap_or(0).max(1);
    let x_of = |date: NaiveDate| {
        if span == 0 {
            MARGIN_LEFT + plot_w / 2.0
        } else {
            MARGIN_LEFT + plot_w * (date - first).num_days() as f64 / span as f64
        }
    };
    let y_of = |count: u64| bottom - plot_h * count as f64 / max as f64;

    let points: Vec<String> = series
        .points
        .iter()
        .map(|p| format!("{:.2},{:.2}", x_of(p.date), y_of(p.count)))
        .collect();
    svg.push_str(&format!(
        r#"<polyline points="{}" fill="none" stroke="{}" stroke-width="2"/>"#,
        points.join(" "),
        PALETTE[0]
    ));

    for (value, anchor_y) in [(0, bottom), (max, MARGIN_TOP)] {
        svg.push_str(&format!(
            r#"<text x="{:.2}" y="{:.2}" text-anchor="end" dominant-baseline="middle">{}</text>"#,
            MARGIN_LEFT - 8.0,
            anchor_y,
            value
        ));
    }

    let mut date_labels = vec![first];
    if last != first {
        date_labels.push(last);
    }
    for date in date_labels {
        svg.push_str(&format!(
            r#"<text x="{:.2}" y="{:.2}" text-anchor="middle">{}</text>"#,
            x_of(date),
            bottom + 24.0,
            date.format("%Y-%m-%d")
        ));
    }

    close_svg(svg)
}

fn open_svg(width: f64, height: f64) -> String {
    let mut svg = format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}" font-family="sans-serif" font-size="14">"#,
        w = width,
        h = height
    );
    svg.push_str(r#"<rect width="100%" height="100%" fill="white"/>"#);
    svg
}

fn close_svg(mut svg: String) -> ImageArtifact {
    svg.push_str("</svg>");
    ImageArtifact::new(CHART_FILE_NAME, svg.into_bytes())
}

fn no_data(svg: &mut String, x: f64, y: f64) {
    svg.push_str(&format!(
        r#"<text x="{:.2}" y="{:.2}" text-anchor="middle">No data</text>"#,
        x, y
    ));
}

/// Point on a circle; `degrees` counter-clockwise from 3 o'clock, SVG y pointing down.
fn polar(cx: f64, cy: f64, r: f64, degrees: f64) -> (f64, f64) {
    let rad = degrees.to_radians();
    (cx + r * rad.cos(), cy - r * rad.sin())
}

fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}
