//! Token and DAO statistics charts, drawn directly on 2D canvases.
//!
//! Four fixed charts: the token price line, the fund-allocation doughnut,
//! the voting-power bars and the treasury pie. Each is skipped silently
//! when its canvas is not in the current markup.

use std::f64::consts::TAU;

use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::dom;

const PRIMARY: &str = "#0073f5";
const SECONDARY: &str = "#5d15f5";
const PALETTE: [&str; 5] = [PRIMARY, SECONDARY, "#00c3ff", "#00ff9d", "#ffaa00"];

const GRID_COLOR: &str = "rgba(255, 255, 255, 0.05)";
const LABEL_COLOR: &str = "rgba(255, 255, 255, 0.5)";
const LEGEND_COLOR: &str = "#fff";

const PRICE_LABELS: [&str; 7] = [
    "00:00", "04:00", "08:00", "12:00", "16:00", "20:00", "00:00",
];
const PRICE_POINTS: [f64; 7] = [0.03, 0.035, 0.042, 0.038, 0.045, 0.048, 0.05];

pub fn init_charts() {
    if let Some((canvas, ctx)) = context_2d("price-chart") {
        draw_price_chart(&canvas, &ctx);
    }
    if let Some((canvas, ctx)) = context_2d("fund-allocation-chart") {
        draw_doughnut(
            &canvas,
            &ctx,
            &[("Liquidity Pool", 40.0), ("Development Fund", 60.0)],
            0.7,
        );
    }
    if let Some((canvas, ctx)) = context_2d("voting-power-chart") {
        draw_bars(
            &canvas,
            &ctx,
            &[
                ("Locked Tokens", 8_000.0),
                ("Staked Tokens", 3_000.0),
                ("Delegated Voting", 1_500.0),
            ],
        );
    }
    if let Some((canvas, ctx)) = context_2d("treasury-chart") {
        draw_doughnut(
            &canvas,
            &ctx,
            &[
                ("Protocol Development", 40.0),
                ("Marketing", 25.0),
                ("Security", 15.0),
                ("Community Grants", 10.0),
                ("Reserved", 10.0),
            ],
            0.0,
        );
    }
}

/// Resolve a canvas by id, match its bitmap to its CSS box and hand back
/// the 2D context.
fn context_2d(id: &str) -> Option<(HtmlCanvasElement, CanvasRenderingContext2d)> {
    let canvas = dom::by_id_typed::<HtmlCanvasElement>(id)?;
    let w = canvas.client_width().max(1) as u32;
    let h = canvas.client_height().max(1) as u32;
    canvas.set_width(w);
    canvas.set_height(h);
    let ctx = canvas
        .get_context("2d")
        .ok()??
        .dyn_into::<CanvasRenderingContext2d>()
        .ok()?;
    Some((canvas, ctx))
}

// ── Price line ──

fn draw_price_chart(canvas: &HtmlCanvasElement, ctx: &CanvasRenderingContext2d) {
    let w = canvas.width() as f64;
    let h = canvas.height() as f64;
    let pad_left = 48.0;
    let pad_bottom = 28.0;
    let pad_top = 16.0;
    let plot_w = w - pad_left - 16.0;
    let plot_h = h - pad_top - pad_bottom;

    let max = PRICE_POINTS.iter().cloned().fold(f64::MIN, f64::max) * 1.1;
    let min = PRICE_POINTS.iter().cloned().fold(f64::MAX, f64::min) * 0.9;
    let span = (max - min).max(f64::EPSILON);

    let xy = |i: usize| {
        let x = pad_left + plot_w * i as f64 / (PRICE_POINTS.len() - 1) as f64;
        let y = pad_top + plot_h * (1.0 - (PRICE_POINTS[i] - min) / span);
        (x, y)
    };

    // Horizontal grid and axis labels.
    ctx.set_stroke_style_str(GRID_COLOR);
    ctx.set_fill_style_str(LABEL_COLOR);
    ctx.set_font("11px sans-serif");
    ctx.set_line_width(1.0);
    let rows = 4;
    for row in 0..=rows {
        let y = pad_top + plot_h * row as f64 / rows as f64;
        ctx.begin_path();
        ctx.move_to(pad_left, y);
        ctx.line_to(pad_left + plot_w, y);
        ctx.stroke();
        let value = max - span * row as f64 / rows as f64;
        let _ = ctx.fill_text(&format!("${value:.3}"), 4.0, y + 4.0);
    }
    for (i, label) in PRICE_LABELS.iter().enumerate() {
        let (x, _) = xy(i);
        let _ = ctx.fill_text(label, x - 14.0, h - 8.0);
    }

    // Smoothed line through quadratic midpoints, filled down to the axis.
    let curve = |ctx: &CanvasRenderingContext2d| {
        let (x0, y0) = xy(0);
        ctx.move_to(x0, y0);
        for i in 1..PRICE_POINTS.len() {
            let (px, py) = xy(i - 1);
            let (x, y) = xy(i);
            ctx.quadratic_curve_to(px, py, (px + x) / 2.0, (py + y) / 2.0);
        }
        let (xl, yl) = xy(PRICE_POINTS.len() - 1);
        ctx.line_to(xl, yl);
    };

    ctx.set_fill_style_str("rgba(0, 115, 245, 0.1)");
    ctx.begin_path();
    curve(ctx);
    ctx.line_to(pad_left + plot_w, pad_top + plot_h);
    ctx.line_to(pad_left, pad_top + plot_h);
    ctx.close_path();
    ctx.fill();

    ctx.set_stroke_style_str(PRIMARY);
    ctx.set_line_width(2.0);
    ctx.begin_path();
    curve(ctx);
    ctx.stroke();

    ctx.set_fill_style_str(PRIMARY);
    for i in 0..PRICE_POINTS.len() {
        let (x, y) = xy(i);
        ctx.begin_path();
        let _ = ctx.arc(x, y, 4.0, 0.0, TAU);
        ctx.fill();
    }
}

// ── Doughnut / pie ──

/// Doughnut when `cutout > 0`, pie otherwise. A bottom legend lists the
/// segments with their palette dots.
fn draw_doughnut(
    canvas: &HtmlCanvasElement,
    ctx: &CanvasRenderingContext2d,
    segments: &[(&str, f64)],
    cutout: f64,
) {
    let w = canvas.width() as f64;
    let h = canvas.height() as f64;
    let legend_h = 28.0;
    let cx = w / 2.0;
    let cy = (h - legend_h) / 2.0;
    let radius = (cy.min(cx) - 8.0).max(8.0);

    let total: f64 = segments.iter().map(|(_, v)| v).sum();
    // Chart.js starts at twelve o'clock.
    let mut angle = -TAU / 4.0;
    for (i, &(_, value)) in segments.iter().enumerate() {
        let sweep = TAU * value / total;
        ctx.set_fill_style_str(PALETTE[i % PALETTE.len()]);
        ctx.begin_path();
        if cutout > 0.0 {
            let inner = radius * cutout;
            let _ = ctx.arc(cx, cy, radius, angle, angle + sweep);
            let _ = ctx.arc_with_anticlockwise(cx, cy, inner, angle + sweep, angle, true);
        } else {
            ctx.move_to(cx, cy);
            let _ = ctx.arc(cx, cy, radius, angle, angle + sweep);
        }
        ctx.close_path();
        ctx.fill();
        angle += sweep;
    }

    draw_legend(ctx, segments, w, h - legend_h / 2.0);
}

fn draw_legend(
    ctx: &CanvasRenderingContext2d,
    segments: &[(&str, f64)],
    width: f64,
    y: f64,
) {
    ctx.set_font("11px sans-serif");
    let dot = 4.0;
    let gap = 16.0;

    let mut widths = Vec::with_capacity(segments.len());
    let mut total = 0.0;
    for &(label, _) in segments {
        let text_w = ctx
            .measure_text(label)
            .map(|m| m.width())
            .unwrap_or(label.len() as f64 * 6.0);
        let entry = dot * 2.0 + 6.0 + text_w;
        widths.push(entry);
        total += entry + gap;
    }
    total -= gap;

    let mut x = (width - total) / 2.0;
    for (i, &(label, _)) in segments.iter().enumerate() {
        ctx.set_fill_style_str(PALETTE[i % PALETTE.len()]);
        ctx.begin_path();
        let _ = ctx.arc(x + dot, y, dot, 0.0, TAU);
        ctx.fill();

        ctx.set_fill_style_str(LEGEND_COLOR);
        let _ = ctx.fill_text(label, x + dot * 2.0 + 6.0, y + 4.0);
        x += widths[i] + gap;
    }
}

// ── Bars ──

fn draw_bars(
    canvas: &HtmlCanvasElement,
    ctx: &CanvasRenderingContext2d,
    bars: &[(&str, f64)],
) {
    let w = canvas.width() as f64;
    let h = canvas.height() as f64;
    let pad_left = 48.0;
    let pad_bottom = 28.0;
    let pad_top = 16.0;
    let plot_w = w - pad_left - 16.0;
    let plot_h = h - pad_top - pad_bottom;

    let max = bars.iter().map(|(_, v)| *v).fold(f64::MIN, f64::max) * 1.1;

    ctx.set_stroke_style_str(GRID_COLOR);
    ctx.set_fill_style_str(LABEL_COLOR);
    ctx.set_font("11px sans-serif");
    ctx.set_line_width(1.0);
    let rows = 4;
    for row in 0..=rows {
        let y = pad_top + plot_h * row as f64 / rows as f64;
        ctx.begin_path();
        ctx.move_to(pad_left, y);
        ctx.line_to(pad_left + plot_w, y);
        ctx.stroke();
        let value = max * (1.0 - row as f64 / rows as f64);
        let _ = ctx.fill_text(&format!("{}", value.round() as i64), 4.0, y + 4.0);
    }

    let slot = plot_w / bars.len() as f64;
    let bar_w = slot * 0.5;
    for (i, &(label, value)) in bars.iter().enumerate() {
        let x = pad_left + slot * i as f64 + (slot - bar_w) / 2.0;
        let bar_h = plot_h * value / max;
        ctx.set_fill_style_str(PALETTE[i % PALETTE.len()]);
        ctx.fill_rect(x, pad_top + plot_h - bar_h, bar_w, bar_h);

        ctx.set_fill_style_str("rgba(255, 255, 255, 0.7)");
        let text_w = ctx
            .measure_text(label)
            .map(|m| m.width())
            .unwrap_or(label.len() as f64 * 6.0);
        let _ = ctx.fill_text(label, x + (bar_w - text_w) / 2.0, h - 8.0);
    }
}
