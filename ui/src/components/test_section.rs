//! One rendered test section: inputs, comment, asymmetry badge, chart.

use dioxus::prelude::*;

use crate::charts::{self, Figure};
use crate::components::ChartView;
use crate::core::animal;
use crate::core::catalog::TestKind;
use crate::core::collect;
use crate::core::form::{FormSection, FormState};
use crate::core::format;
use crate::core::record::PatientInfo;
use crate::core::schema::FieldKind;

#[component]
pub fn TestSectionCard(
    form: Signal<FormState>,
    index: usize,
    on_change: EventHandler<()>,
) -> Element {
    let mut form = form;
    let state = form();
    let Some(section) = state.sections.get(index).cloned() else {
        return rsx! {};
    };

    let figure = charts::figure_for_section(&section);
    let badge = section.badge.clone().filter(|badge| !badge.text.is_empty());
    let overlay = overlay_for(&section);
    let comment_id = section.comment_id.clone();

    rsx! {
        section { class: "test-section", id: "section-{section.section_type}-{section.position}",
            h3 { class: "test-section__title", "{section.title}" }

            div { class: "test-section__row",
                div { class: "test-section__inputs",
                    for field in section.fields.iter().cloned() {
                        {render_field(form, index, field, on_change)}
                    }

                    if let Some(comment_id) = comment_id {
                        div { class: "test-section__comment",
                            if let Some(badge) = badge {
                                {
                                    let badge_class =
                                        format!("asymmetry {}", badge.verdict().css_class());
                                    rsx! {
                                        div {
                                            class: "{badge_class}",
                                            "data-asymmetry-value": "{badge.value}",
                                            "{badge.text}"
                                        }
                                    }
                                }
                            }
                            label { r#for: "{comment_id}", "Kommentar:" }
                            textarea {
                                id: "{comment_id}",
                                value: "{section.comment}",
                                oninput: move |evt| {
                                    if let Some(section) = form.write().section_mut(index) {
                                        section.comment = evt.value();
                                    }
                                    on_change.call(());
                                },
                            }
                        }
                    }
                }

                div { class: "test-section__graph",
                    {render_chart(&section, figure)}
                    if let Some(overlay) = overlay {
                        p { class: "test-section__overlay", "{overlay}" }
                    }
                }
            }
        }
    }
}

fn render_field(
    mut form: Signal<FormState>,
    index: usize,
    field: crate::core::form::FieldState,
    on_change: EventHandler<()>,
) -> Element {
    let field_id = field.id.clone();
    let base_id = field.spec.base_id.clone();
    let input_type = match field.spec.kind {
        FieldKind::Number { .. } => "number",
        FieldKind::Text => "text",
    };
    let step = match field.spec.kind {
        FieldKind::Number { step } => format::fmt_num(step),
        FieldKind::Text => String::new(),
    };

    rsx! {
        div { class: "input-row",
            label { r#for: "{field_id}", "{field.spec.label}:" }
            div { class: "input-row__wrapper",
                input {
                    id: "{field_id}",
                    r#type: "{input_type}",
                    step: "{step}",
                    value: "{field.value}",
                    oninput: move |evt| {
                        if let Some(section) = form.write().section_mut(index) {
                            section.set_value(&base_id, evt.value());
                        }
                        on_change.call(());
                    },
                }
                if !field.spec.unit.is_empty() {
                    span { class: "input-row__unit", "{field.spec.unit}" }
                }
            }
        }
    }
}

fn render_chart(
    section: &FormSection,
    figure: Result<Option<Figure>, charts::ChartError>,
) -> Element {
    match figure {
        Ok(Some(figure)) => rsx! {
            ChartView { figure }
        },
        Ok(None) => render_manual_preview(section),
        Err(err) => rsx! {
            p { class: "chart__error", "Grafen kunde inte visas: {err}" }
        },
    }
}

/// Derived-results boxes for the manual measurement section.
fn render_manual_preview(section: &FormSection) -> Element {
    if !matches!(section.kind, TestKind::Manual) {
        return rsx! {};
    }

    let single = FormState {
        sections: vec![section.clone()],
    };
    let record = collect::collect(&single, &PatientInfo::default());
    let Some(manual) = record.page2.manual else {
        return rsx! {};
    };

    rsx! {
        div { class: "manual-preview",
            for summary in format::manual_summaries(&manual).into_iter() {
                div { class: "manual-preview__box",
                    h4 { "{summary.title}" }
                    p { "{summary.label}" }
                    b { "{summary.value}" }
                }
            }
        }
    }
}

/// Two-leg pull overlay text, when the section carries one.
fn overlay_for(section: &FormSection) -> Option<String> {
    let weight = match &section.kind {
        TestKind::HipThrust => section.num("p2_g1_tva"),
        TestKind::StaticSquatHand => section.num("p2_g3_tva"),
        TestKind::StaticSquatHip => section.num("p2_g4_tva"),
        TestKind::Custom(custom)
            if matches!(
                custom.def.graph_type,
                crate::core::catalog::GraphKind::ThreeBar
            ) =>
        {
            section.num(&format!("custom_{}_val_Both", custom.id))
        }
        _ => return None,
    };
    animal::overlay_text(weight)
}
