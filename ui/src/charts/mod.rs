//! Declarative chart figures.
//!
//! Each test kind maps its live field values to a figure description
//! (bar groups on one or two axes, or a row of percentage gauges) which
//! a small SVG component renders. Re-building a figure from the same inputs
//! yields the same figure; rendering is idempotent.

use thiserror::Error;

use crate::core::catalog::{GraphKind, TestKind};
use crate::core::form::FormSection;
use crate::core::format::fmt_num;

#[derive(Debug, Error, PartialEq)]
pub enum ChartError {
    #[error("Okänd graftyp: {0}")]
    UnknownKind(String),
}

/// Which series a bar belongs to; decides color and legend label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeriesTag {
    Left,
    Right,
    Both,
    Primary,
}

impl SeriesTag {
    pub fn label(self) -> &'static str {
        match self {
            SeriesTag::Left => "VÄ",
            SeriesTag::Right => "HÖ",
            SeriesTag::Both => "TVÅ BEN",
            SeriesTag::Primary => "",
        }
    }

    pub fn css_class(self) -> &'static str {
        match self {
            SeriesTag::Left => "chart__bar--left",
            SeriesTag::Right => "chart__bar--right",
            SeriesTag::Both => "chart__bar--both",
            SeriesTag::Primary => "chart__bar--primary",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Primary,
    Secondary,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    pub series: SeriesTag,
    pub value: f64,
    pub text: String,
    pub axis: Axis,
}

impl Bar {
    fn new(series: SeriesTag, value: f64, decimals: usize) -> Self {
        Self {
            series,
            value,
            text: format!("{value:.decimals$}"),
            axis: Axis::Primary,
        }
    }

    fn secondary(mut self) -> Self {
        self.axis = Axis::Secondary;
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BarGroup {
    pub label: String,
    pub bars: Vec<Bar>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BarFigure {
    pub groups: Vec<BarGroup>,
    pub y1_title: String,
    pub y2_title: Option<String>,
    pub max_y1: f64,
    pub max_y2: f64,
    pub show_legend: bool,
}

/// A circular percentage gauge, clamped to 0–100.
#[derive(Debug, Clone, PartialEq)]
pub struct GaugeFigure {
    pub value: f64,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Figure {
    Bars(BarFigure),
    Gauges(Vec<GaugeFigure>),
}

fn axis_max(values: &[f64], floor: f64) -> f64 {
    let mut max = floor;
    for value in values {
        if *value > max {
            max = *value;
        }
    }
    max * 1.25
}

fn gauges(section: &FormSection, bases: [&str; 3], labels: [&str; 3]) -> Figure {
    Figure::Gauges(
        bases
            .iter()
            .zip(labels)
            .map(|(base, label)| GaugeFigure {
                value: section.num(base).clamp(0.0, 100.0),
                label: label.to_string(),
            })
            .collect(),
    )
}

/// Builds the figure for a rendered section from its current values.
/// `None` for kinds without a chart (manual measurements); an error for
/// unknown custom graph kinds, which the view renders as an inline
/// placeholder.
pub fn figure_for_section(section: &FormSection) -> Result<Option<Figure>, ChartError> {
    let figure = match &section.kind {
        TestKind::Balance => dual_axis_figure(
            section,
            ["p1_g1_va_score", "p1_g1_ho_score"],
            ["p1_g1_va_diff", "p1_g1_ho_diff"],
            ("Score", "Gj. diff"),
            ("Score", "cm"),
            (0, 2),
        ),
        TestKind::Tia => dual_axis_figure(
            section,
            ["p1_g3_va_jump", "p1_g3_ho_jump"],
            ["p1_g3_va_gct", "p1_g3_ho_gct"],
            ("Gj. hopp", "GCT"),
            ("cm", "s"),
            (1, 2),
        ),
        TestKind::Cmj => {
            let labels = ["Hopp 1", "Hopp 2", "Hopp 3"];
            let left = [
                section.num("p1_g2_va_1"),
                section.num("p1_g2_va_2"),
                section.num("p1_g2_va_3"),
            ];
            let right = [
                section.num("p1_g2_ho_1"),
                section.num("p1_g2_ho_2"),
                section.num("p1_g2_ho_3"),
            ];
            grouped_figure(&labels, &left, &right, "Hopphöjd (cm)")
        }
        TestKind::SideHop => {
            let left = section.num("p1_g4_va_count");
            let right = section.num("p1_g4_ho_count");
            Figure::Bars(BarFigure {
                groups: vec![BarGroup {
                    label: "Antall".into(),
                    bars: vec![
                        Bar::new(SeriesTag::Left, left, 0),
                        Bar::new(SeriesTag::Right, right, 0),
                    ],
                }],
                y1_title: "Antall (stk)".into(),
                y2_title: None,
                max_y1: axis_max(&[left, right], 10.0),
                max_y2: 0.0,
                show_legend: true,
            })
        }
        TestKind::SquatAnalytics => gauges(
            section,
            ["p1_g5_attempt_1", "p1_g5_attempt_2", "p1_g5_attempt_3"],
            ["Försök 1", "Försök 2", "Försök 3"],
        ),
        TestKind::Cmj2Ben => gauges(
            section,
            ["p1_g7_attempt_1", "p1_g7_attempt_2", "p1_g7_attempt_3"],
            ["Försök 1", "Försök 2", "Försök 3"],
        ),
        TestKind::NordicHamstring => gauges(
            section,
            ["p2_g6_attempt_1", "p2_g6_attempt_2", "p2_g6_attempt_3"],
            ["Försök 1", "Försök 2", "Försök 3"],
        ),
        TestKind::RepeatedBilateral => {
            let height = section.num("p1_g6_avg_height");
            let gct = section.num("p1_g6_avg_gct");
            bilateral_figure(height, gct, ("Gj. hopp", "Gj. GCT"), ("cm", "s"))
        }
        TestKind::HipThrust => paired_figure(section, "p2_g1", "KG"),
        TestKind::Quadriceps => paired_figure(section, "p2_g2", "KG"),
        TestKind::StaticSquatHand => paired_figure(section, "p2_g3", "KG"),
        TestKind::StaticSquatHip => paired_figure(section, "p2_g4", "KG"),
        TestKind::Hamstring => paired_figure(section, "p2_g5", "Newton"),
        TestKind::Manual => return Ok(None),
        TestKind::Custom(custom) => {
            // Manual-entry customs are text only, like the built-in manual
            // section.
            if matches!(custom.def.graph_type, GraphKind::ManualEntry) {
                return Ok(None);
            }
            return custom_figure(section, &custom.id, &custom.def).map(Some);
        }
    };
    Ok(Some(figure))
}

fn paired_figure(section: &FormSection, group: &str, y_title: &str) -> Figure {
    let left = section.num(&format!("{group}_va"));
    let right = section.num(&format!("{group}_ho"));
    Figure::Bars(BarFigure {
        groups: vec![BarGroup {
            label: "Force".into(),
            bars: vec![
                Bar::new(SeriesTag::Left, left, 1),
                Bar::new(SeriesTag::Right, right, 1),
            ],
        }],
        y1_title: y_title.into(),
        y2_title: None,
        max_y1: axis_max(&[left, right], 0.1),
        max_y2: 0.0,
        show_legend: true,
    })
}

#[allow(clippy::too_many_arguments)]
fn dual_axis_figure(
    section: &FormSection,
    primary: [&str; 2],
    secondary: [&str; 2],
    metric_names: (&str, &str),
    axis_titles: (&str, &str),
    decimals: (usize, usize),
) -> Figure {
    let left1 = section.num(primary[0]);
    let right1 = section.num(primary[1]);
    let left2 = section.num(secondary[0]);
    let right2 = section.num(secondary[1]);

    Figure::Bars(BarFigure {
        groups: vec![
            BarGroup {
                label: metric_names.0.into(),
                bars: vec![
                    Bar::new(SeriesTag::Left, left1, decimals.0),
                    Bar::new(SeriesTag::Right, right1, decimals.0),
                ],
            },
            BarGroup {
                label: metric_names.1.into(),
                bars: vec![
                    Bar::new(SeriesTag::Left, left2, decimals.1).secondary(),
                    Bar::new(SeriesTag::Right, right2, decimals.1).secondary(),
                ],
            },
        ],
        y1_title: axis_titles.0.into(),
        y2_title: Some(axis_titles.1.into()),
        max_y1: axis_max(&[left1, right1], 0.1),
        max_y2: axis_max(&[left2, right2], 0.1),
        show_legend: true,
    })
}

fn grouped_figure(labels: &[&str], left: &[f64], right: &[f64], y_title: &str) -> Figure {
    let groups = labels
        .iter()
        .enumerate()
        .map(|(i, label)| BarGroup {
            label: label.to_string(),
            bars: vec![
                Bar::new(SeriesTag::Left, left.get(i).copied().unwrap_or(0.0), 0),
                Bar::new(SeriesTag::Right, right.get(i).copied().unwrap_or(0.0), 0),
            ],
        })
        .collect();

    let mut all = left.to_vec();
    all.extend_from_slice(right);
    Figure::Bars(BarFigure {
        groups,
        y1_title: y_title.into(),
        y2_title: None,
        max_y1: axis_max(&all, 10.0),
        max_y2: 0.0,
        show_legend: true,
    })
}

fn bilateral_figure(
    value1: f64,
    value2: f64,
    metric_names: (&str, &str),
    axis_titles: (&str, &str),
) -> Figure {
    Figure::Bars(BarFigure {
        groups: vec![
            BarGroup {
                label: metric_names.0.into(),
                bars: vec![Bar::new(SeriesTag::Primary, value1, 1)],
            },
            BarGroup {
                label: metric_names.1.into(),
                bars: vec![Bar {
                    series: SeriesTag::Primary,
                    value: value2,
                    text: format!("{value2:.2}"),
                    axis: Axis::Secondary,
                }],
            },
        ],
        y1_title: axis_titles.0.into(),
        y2_title: Some(axis_titles.1.into()),
        max_y1: axis_max(&[value1], 0.1),
        max_y2: axis_max(&[value2], 0.1),
        show_legend: false,
    })
}

fn custom_figure(
    section: &FormSection,
    id: &str,
    def: &crate::core::catalog::TestDefinition,
) -> Result<Figure, ChartError> {
    let base = |field: &str| format!("custom_{id}_{field}");
    let config = &def.config;
    let y_title = config
        .y_axis_title
        .clone()
        .or_else(|| config.y_title.clone())
        .unwrap_or_default();

    let figure = match def.graph_type {
        GraphKind::SingleBar | GraphKind::PairedBar => {
            let left = section.num(&base("left"));
            let right = section.num(&base("right"));
            Figure::Bars(BarFigure {
                groups: vec![BarGroup {
                    label: config.input_label(0),
                    bars: vec![
                        Bar::new(SeriesTag::Left, left, 1),
                        Bar::new(SeriesTag::Right, right, 1),
                    ],
                }],
                y1_title: y_title,
                y2_title: None,
                max_y1: axis_max(&[left, right], 0.1),
                max_y2: 0.0,
                show_legend: true,
            })
        }
        GraphKind::ThreeBar => {
            let left = section.num(&base("val_L"));
            let right = section.num(&base("val_R"));
            let both = section.num(&base("val_Both"));
            Figure::Bars(BarFigure {
                groups: vec![
                    BarGroup {
                        label: "VÄ".into(),
                        bars: vec![Bar::new(SeriesTag::Left, left, 1)],
                    },
                    BarGroup {
                        label: "HÖ".into(),
                        bars: vec![Bar::new(SeriesTag::Right, right, 1)],
                    },
                    BarGroup {
                        label: "TVÅ BEN".into(),
                        bars: vec![Bar::new(SeriesTag::Both, both, 1)],
                    },
                ],
                y1_title: y_title,
                y2_title: None,
                max_y1: axis_max(&[left, right, both], 10.0),
                max_y2: 0.0,
                show_legend: false,
            })
        }
        GraphKind::DualAxis => {
            let left1 = section.num(&base("val1_L"));
            let right1 = section.num(&base("val1_R"));
            let left2 = section.num(&base("val2_L"));
            let right2 = section.num(&base("val2_R"));
            Figure::Bars(BarFigure {
                groups: vec![
                    BarGroup {
                        label: config.input_label(0),
                        bars: vec![
                            Bar::new(SeriesTag::Left, left1, 1),
                            Bar::new(SeriesTag::Right, right1, 1),
                        ],
                    },
                    BarGroup {
                        label: config.input_label(1),
                        bars: vec![
                            Bar::new(SeriesTag::Left, left2, 2).secondary(),
                            Bar::new(SeriesTag::Right, right2, 2).secondary(),
                        ],
                    },
                ],
                y1_title: y_title,
                y2_title: config.y2_title.clone(),
                max_y1: axis_max(&[left1, right1], 0.1),
                max_y2: axis_max(&[left2, right2], 0.1),
                show_legend: true,
            })
        }
        GraphKind::GroupedBar => {
            let labels = [
                config.input_label(0),
                config.input_label(1),
                config.input_label(2),
            ];
            let label_refs: Vec<&str> = labels.iter().map(String::as_str).collect();
            let left = [
                section.num(&base("g1_L")),
                section.num(&base("g2_L")),
                section.num(&base("g3_L")),
            ];
            let right = [
                section.num(&base("g1_R")),
                section.num(&base("g2_R")),
                section.num(&base("g3_R")),
            ];
            grouped_figure(&label_refs, &left, &right, &y_title)
        }
        GraphKind::Bilateral => {
            let label1 = config.input_label(0);
            let label2 = config.input_label(1);
            bilateral_figure(
                section.num(&base("val1")),
                section.num(&base("val2")),
                (label1.as_str(), label2.as_str()),
                (
                    config.y1_title.as_deref().unwrap_or("cm"),
                    config.y2_title.as_deref().unwrap_or("s"),
                ),
            )
        }
        GraphKind::Donut => Figure::Gauges(
            (1..=3)
                .map(|i| GaugeFigure {
                    value: section.num(&base(&format!("val{i}"))).clamp(0.0, 100.0),
                    label: config.input_label(i - 1),
                })
                .collect(),
        ),
        GraphKind::SingleBars3 => {
            let values = [
                section.num(&base("val1")),
                section.num(&base("val2")),
                section.num(&base("val3")),
            ];
            let groups = values
                .iter()
                .enumerate()
                .map(|(i, value)| BarGroup {
                    label: config.input_label(i),
                    bars: vec![Bar {
                        series: SeriesTag::Primary,
                        value: *value,
                        text: fmt_num(*value),
                        axis: Axis::Primary,
                    }],
                })
                .collect();
            Figure::Bars(BarFigure {
                groups,
                y1_title: y_title,
                y2_title: None,
                max_y1: axis_max(&values, 10.0),
                max_y2: 0.0,
                show_legend: false,
            })
        }
        GraphKind::ManualEntry | GraphKind::Unknown => {
            return Err(ChartError::UnknownKind(def.graph_type.wire_name().into()))
        }
    };

    Ok(figure)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::catalog::{Catalog, CustomTest, TestDefinition};
    use crate::core::form::FormState;

    #[test]
    fn paired_bar_carries_values_and_texts() {
        let ids = vec!["hipthrust".to_string()];
        let mut form = FormState::render_selection(&ids, &Catalog::new());
        form.set_field("p2_g1_va_0", "95");
        form.set_field("p2_g1_ho_0", "88.5");

        let figure = figure_for_section(&form.sections[0]).unwrap().unwrap();
        let Figure::Bars(bars) = figure else {
            panic!("expected a bar figure")
        };
        assert_eq!(bars.groups[0].bars[0].value, 95.0);
        assert_eq!(bars.groups[0].bars[0].text, "95.0");
        assert_eq!(bars.groups[0].bars[1].text, "88.5");
        assert_eq!(bars.max_y1, 95.0 * 1.25);
    }

    #[test]
    fn donut_kinds_produce_three_clamped_gauges() {
        let ids = vec!["squat".to_string()];
        let mut form = FormState::render_selection(&ids, &Catalog::new());
        form.set_field("p1_g5_attempt_1_0", "85");
        form.set_field("p1_g5_attempt_2_0", "120");

        let figure = figure_for_section(&form.sections[0]).unwrap().unwrap();
        let Figure::Gauges(gauges) = figure else {
            panic!("expected gauges")
        };
        assert_eq!(gauges.len(), 3);
        assert_eq!(gauges[0].value, 85.0);
        assert_eq!(gauges[1].value, 100.0);
        assert_eq!(gauges[2].value, 0.0);
        assert_eq!(gauges[0].label, "Försök 1");
    }

    #[test]
    fn manual_sections_have_no_chart() {
        let ids = vec!["manual".to_string()];
        let form = FormState::render_selection(&ids, &Catalog::new());
        assert_eq!(figure_for_section(&form.sections[0]).unwrap(), None);
    }

    #[test]
    fn unknown_custom_kind_is_a_chart_error() {
        let catalog = Catalog::with_custom(vec![CustomTest {
            id: "x1".into(),
            def: TestDefinition {
                name: "Mystisk".into(),
                graph_type: crate::core::catalog::GraphKind::Unknown,
                ..Default::default()
            },
        }]);
        let ids = vec!["custom_x1".to_string()];
        let form = FormState::render_selection(&ids, &catalog);
        assert!(figure_for_section(&form.sections[0]).is_err());
    }

    #[test]
    fn dual_axis_marks_the_second_metric_secondary() {
        let ids = vec!["tia".to_string()];
        let form = FormState::render_selection(&ids, &Catalog::new());
        let Figure::Bars(bars) = figure_for_section(&form.sections[0]).unwrap().unwrap() else {
            panic!("expected bars")
        };
        assert_eq!(bars.groups[1].bars[0].axis, Axis::Secondary);
        assert_eq!(bars.y2_title.as_deref(), Some("s"));
    }
}
