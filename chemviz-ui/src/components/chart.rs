//! Chart Component
//!
//! Bar, doughnut and trend charts drawn on an HTML5 Canvas.

use leptos::*;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use chemviz::dashboard::{ChartData, ChartKind};
use chemviz::models::{TrendSeries, TypeShare};

/// Chart colors for different series
const SERIES_COLORS: [&str; 6] = [
    "#FF9800", // Orange (primary)
    "#4CAF50", // Green
    "#2196F3", // Blue
    "#9C27B0", // Purple
    "#F44336", // Red
    "#00BCD4", // Cyan
];

const BACKGROUND: &str = "#1f2937"; // gray-800
const GRID: &str = "#374151"; // gray-700
const LABEL: &str = "#9ca3af"; // gray-400

const MARGIN_LEFT: f64 = 60.0;
const MARGIN_RIGHT: f64 = 20.0;
const MARGIN_TOP: f64 = 20.0;
const MARGIN_BOTTOM: f64 = 40.0;

fn color(idx: usize) -> &'static str {
    SERIES_COLORS[idx % SERIES_COLORS.len()]
}

/// Canvas chart for one projection of the history
#[component]
pub fn Chart(kind: ChartKind, chart: ChartData) -> impl IntoView {
    let canvas_ref = create_node_ref::<html::Canvas>();
    let legend = legend_entries(&chart);

    create_effect(move |_| {
        if let Some(canvas) = canvas_ref.get() {
            draw_chart(&canvas, kind, &chart);
        }
    });

    view! {
        <div class="relative">
            <canvas
                node_ref=canvas_ref
                width="800"
                height="400"
                class="w-full h-64 md:h-96 rounded-lg"
            />

            // Legend
            <div class="flex justify-center flex-wrap gap-4 mt-4">
                {legend
                    .into_iter()
                    .enumerate()
                    .map(|(idx, label)| view! {
                        <div class="flex items-center space-x-2">
                            <div
                                class="w-3 h-3 rounded-full"
                                style=format!("background-color: {}", color(idx))
                            />
                            <span class="text-sm text-gray-300">{label}</span>
                        </div>
                    })
                    .collect_view()}
            </div>
        </div>
    }
}

fn legend_entries(chart: &ChartData) -> Vec<String> {
    match chart {
        ChartData::Distribution(shares) => shares
            .iter()
            .map(|s| format!("{} ({:.1}%)", s.name, s.percent()))
            .collect(),
        ChartData::Trend(trend) => trend.series().iter().map(|(name, _)| name.to_string()).collect(),
    }
}

/// Draw the chart on canvas
fn draw_chart(canvas: &HtmlCanvasElement, kind: ChartKind, chart: &ChartData) {
    let ctx = match canvas.get_context("2d") {
        Ok(Some(ctx)) => match ctx.dyn_into::<CanvasRenderingContext2d>() {
            Ok(ctx) => ctx,
            Err(_) => return,
        },
        _ => return,
    };

    let width = canvas.width() as f64;
    let height = canvas.height() as f64;

    // Clear canvas
    ctx.set_fill_style(&BACKGROUND.into());
    ctx.fill_rect(0.0, 0.0, width, height);

    match (kind, chart) {
        (ChartKind::Doughnut, ChartData::Distribution(shares)) => {
            draw_doughnut(&ctx, width, height, shares)
        }
        (_, ChartData::Distribution(shares)) => draw_bars(&ctx, width, height, shares),
        (_, ChartData::Trend(trend)) => draw_trend(&ctx, width, height, trend),
    }
}

/// Horizontal grid with value labels from 0 to `max`
fn draw_grid(ctx: &CanvasRenderingContext2d, width: f64, height: f64, min: f64, max: f64) {
    let chart_height = height - MARGIN_TOP - MARGIN_BOTTOM;

    ctx.set_stroke_style(&GRID.into());
    ctx.set_line_width(1.0);
    ctx.set_font("12px sans-serif");

    for i in 0..=5 {
        let y = MARGIN_TOP + (i as f64 / 5.0) * chart_height;
        ctx.begin_path();
        ctx.move_to(MARGIN_LEFT, y);
        ctx.line_to(width - MARGIN_RIGHT, y);
        ctx.stroke();

        let value = max - (i as f64 / 5.0) * (max - min);
        ctx.set_fill_style(&LABEL.into());
        let _ = ctx.fill_text(&format!("{:.1}", value), 5.0, y + 4.0);
    }
}

fn draw_bars(ctx: &CanvasRenderingContext2d, width: f64, height: f64, shares: &[TypeShare]) {
    if shares.is_empty() {
        draw_empty(ctx, width, height);
        return;
    }

    let chart_width = width - MARGIN_LEFT - MARGIN_RIGHT;
    let chart_height = height - MARGIN_TOP - MARGIN_BOTTOM;
    let max = shares.iter().map(|s| s.count).max().unwrap_or(0).max(1) as f64;

    draw_grid(ctx, width, height, 0.0, max);

    let slot = chart_width / shares.len() as f64;
    let bar_width = slot * 0.6;

    for (idx, share) in shares.iter().enumerate() {
        let bar_height = share.count as f64 / max * chart_height;
        let x = MARGIN_LEFT + idx as f64 * slot + (slot - bar_width) / 2.0;
        let y = MARGIN_TOP + chart_height - bar_height;

        ctx.set_fill_style(&color(idx).into());
        ctx.fill_rect(x, y, bar_width, bar_height);

        ctx.set_fill_style(&LABEL.into());
        let _ = ctx.fill_text(&share.name, x, height - 10.0);
    }
}

fn draw_doughnut(ctx: &CanvasRenderingContext2d, width: f64, height: f64, shares: &[TypeShare]) {
    let total: f64 = shares.iter().map(|s| s.share).sum();
    if total <= 0.0 {
        draw_empty(ctx, width, height);
        return;
    }

    let cx = width / 2.0;
    let cy = height / 2.0;
    let outer = (height.min(width) / 2.0) - MARGIN_TOP;
    let inner = outer * 0.55;

    let mut start = -std::f64::consts::FRAC_PI_2;
    for (idx, share) in shares.iter().enumerate() {
        let sweep = share.share / total * std::f64::consts::TAU;
        ctx.begin_path();
        let _ = ctx.arc(cx, cy, outer, start, start + sweep);
        let _ = ctx.arc_with_anticlockwise(cx, cy, inner, start + sweep, start, true);
        ctx.close_path();
        ctx.set_fill_style(&color(idx).into());
        ctx.fill();
        start += sweep;
    }
}

fn draw_trend(ctx: &CanvasRenderingContext2d, width: f64, height: f64, trend: &TrendSeries) {
    if trend.is_empty() {
        draw_empty(ctx, width, height);
        return;
    }

    let chart_width = width - MARGIN_LEFT - MARGIN_RIGHT;
    let chart_height = height - MARGIN_TOP - MARGIN_BOTTOM;

    // Find global min/max for y-axis
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for (_, values) in trend.series() {
        for value in values {
            min = min.min(*value);
            max = max.max(*value);
        }
    }

    // Add padding to y range
    let padding = if max > min { (max - min) * 0.1 } else { 1.0 };
    min -= padding;
    max += padding;

    draw_grid(ctx, width, height, min, max);

    let step = if trend.len() > 1 {
        chart_width / (trend.len() - 1) as f64
    } else {
        0.0
    };
    let point = |i: usize, value: f64| {
        let x = MARGIN_LEFT + i as f64 * step;
        let y = MARGIN_TOP + ((max - value) / (max - min)) * chart_height;
        (x, y)
    };

    for (idx, (_, values)) in trend.series().iter().enumerate() {
        ctx.set_stroke_style(&color(idx).into());
        ctx.set_line_width(2.0);
        ctx.begin_path();
        for (i, value) in values.iter().enumerate() {
            let (x, y) = point(i, *value);
            if i == 0 {
                ctx.move_to(x, y);
            } else {
                ctx.line_to(x, y);
            }
        }
        ctx.stroke();

        // Draw points
        ctx.set_fill_style(&color(idx).into());
        for (i, value) in values.iter().enumerate() {
            let (x, y) = point(i, *value);
            ctx.begin_path();
            let _ = ctx.arc(x, y, 3.0, 0.0, std::f64::consts::TAU);
            ctx.fill();
        }
    }

    // X-axis labels
    ctx.set_fill_style(&LABEL.into());
    ctx.set_font("12px sans-serif");
    for (i, label) in trend.labels.iter().enumerate() {
        let (x, _) = point(i, max);
        let _ = ctx.fill_text(label, x - 25.0, height - 10.0);
    }
}

fn draw_empty(ctx: &CanvasRenderingContext2d, width: f64, height: f64) {
    ctx.set_fill_style(&"#6b7280".into());
    ctx.set_font("16px sans-serif");
    let _ = ctx.fill_text("No equipment types recorded", width / 2.0 - 110.0, height / 2.0);
}
