//! SVG rendering for chart figures.

use dioxus::prelude::*;

use crate::charts::{Axis, BarFigure, Figure, GaugeFigure};

const CHART_WIDTH: f64 = 320.0;
const CHART_HEIGHT: f64 = 180.0;
const BASELINE: f64 = 150.0;
const PLOT_TOP: f64 = 16.0;
const LABEL_BASELINE: f64 = CHART_HEIGHT - 8.0;

#[component]
pub fn ChartView(figure: Figure) -> Element {
    match figure {
        Figure::Bars(bars) => render_bars(&bars),
        Figure::Gauges(gauges) => render_gauges(&gauges),
    }
}

fn render_bars(figure: &BarFigure) -> Element {
    let group_count = figure.groups.len().max(1) as f64;
    let group_width = CHART_WIDTH / group_count;

    let mut rects = Vec::new();
    let mut value_labels = Vec::new();
    let mut group_labels = Vec::new();

    for (group_index, group) in figure.groups.iter().enumerate() {
        let group_left = group_index as f64 * group_width;
        let bar_count = group.bars.len().max(1) as f64;
        let slot = group_width / bar_count;
        let bar_width = (slot * 0.55).min(48.0);

        for (bar_index, bar) in group.bars.iter().enumerate() {
            let max = match bar.axis {
                Axis::Primary => figure.max_y1,
                Axis::Secondary => figure.max_y2,
            };
            let scaled = if max > 0.0 {
                (bar.value.max(0.0) / max).min(1.0)
            } else {
                0.0
            };
            let height = scaled * (BASELINE - PLOT_TOP);
            let x = group_left + (bar_index as f64 + 0.5) * slot - bar_width / 2.0;
            let y = BASELINE - height;

            rects.push((x, y, bar_width, height, bar.series.css_class()));
            if bar.value != 0.0 {
                value_labels.push((x + bar_width / 2.0, (y - 4.0).max(10.0), bar.text.clone()));
            }
        }

        group_labels.push((group_left + group_width / 2.0, group.label.clone()));
    }

    rsx! {
        div { class: "chart",
            if figure.show_legend {
                div { class: "chart__legend",
                    span { class: "chart__legend-item chart__legend-item--left", "VÄ" }
                    span { class: "chart__legend-item chart__legend-item--right", "HÖ" }
                }
            }
            svg {
                class: "chart__svg",
                view_box: "0 0 {CHART_WIDTH} {CHART_HEIGHT}",
                preserve_aspect_ratio: "xMidYMid meet",

                line {
                    class: "chart__baseline",
                    x1: "0",
                    y1: "{BASELINE}",
                    x2: "{CHART_WIDTH}",
                    y2: "{BASELINE}",
                }

                for (x, y, width, height, class) in rects.into_iter() {
                    rect {
                        class: "chart__bar {class}",
                        x: "{x}",
                        y: "{y}",
                        width: "{width}",
                        height: "{height}",
                        rx: "2",
                    }
                }

                for (x, y, text) in value_labels.into_iter() {
                    text {
                        class: "chart__value",
                        x: "{x}",
                        y: "{y}",
                        text_anchor: "middle",
                        "{text}"
                    }
                }

                for (x, label) in group_labels.into_iter() {
                    text {
                        class: "chart__group-label",
                        x: "{x}",
                        y: "{LABEL_BASELINE}",
                        text_anchor: "middle",
                        "{label}"
                    }
                }
            }
            div { class: "chart__axes",
                span { class: "chart__axis-title", "{figure.y1_title}" }
                if let Some(y2) = figure.y2_title.as_ref() {
                    span { class: "chart__axis-title chart__axis-title--secondary", "{y2}" }
                }
            }
        }
    }
}

fn render_gauges(gauges: &[GaugeFigure]) -> Element {
    rsx! {
        div { class: "chart chart--gauges",
            for gauge in gauges.iter().cloned() {
                {render_gauge(gauge)}
            }
        }
    }
}

fn render_gauge(gauge: GaugeFigure) -> Element {
    // Circle of radius 36 → circumference ≈ 226.2; the dash pair draws
    // the filled share of the ring.
    let circumference = 2.0 * std::f64::consts::PI * 36.0;
    let filled = circumference * gauge.value / 100.0;
    let rest = circumference - filled;
    let display = crate::core::format::fmt_num(gauge.value);

    rsx! {
        div { class: "chart__gauge",
            svg {
                class: "chart__gauge-svg",
                view_box: "0 0 100 100",
                circle {
                    class: "chart__gauge-track",
                    cx: "50",
                    cy: "50",
                    r: "36",
                }
                circle {
                    class: "chart__gauge-fill",
                    cx: "50",
                    cy: "50",
                    r: "36",
                    stroke_dasharray: "{filled} {rest}",
                    transform: "rotate(-90 50 50)",
                }
                text {
                    class: "chart__gauge-value",
                    x: "50",
                    y: "55",
                    text_anchor: "middle",
                    "{display}%"
                }
            }
            p { class: "chart__gauge-label", "{gauge.label}" }
        }
    }
}
