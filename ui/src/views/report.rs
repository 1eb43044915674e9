//! Printable report. Reads the one-shot record handoff from storage and
//! renders a read-only view of every section (charts, comments,
//! asymmetry) without any second lookup of custom definitions: the
//! record carries their metadata.

use dioxus::prelude::*;

use crate::charts;
use crate::components::ChartView;
use crate::core::catalog::{Catalog, CustomTest, TestDefinition, TestKind};
use crate::core::form::FormSection;
use crate::core::populate;
use crate::core::preview;
use crate::core::record::AssessmentRecord;
use crate::core::store;

/// Catalog for rendering a persisted record on its own: custom
/// definitions are rebuilt from the metadata the collector copied in.
fn catalog_from_record(record: &AssessmentRecord) -> Catalog {
    Catalog::with_custom(
        record
            .page2
            .custom
            .iter()
            .map(|(id, entry)| CustomTest {
                id: id.clone(),
                def: TestDefinition {
                    name: entry.title.clone(),
                    graph_type: entry.graph_type,
                    config: entry.config.clone(),
                },
            })
            .collect(),
    )
}

#[component]
pub fn Report() -> Element {
    let record = match store::load_report_handoff() {
        Ok(Some(record)) => record,
        Ok(None) => {
            return rsx! {
                section { class: "page page-report",
                    p { class: "report__empty",
                        "Ingen rapportdata. Skapa en rapport från arbetsytan först."
                    }
                }
            };
        }
        Err(err) => {
            return rsx! {
                section { class: "page page-report",
                    p { class: "report__empty", "Rapporten kunde inte läsas: {err}" }
                }
            };
        }
    };

    let catalog = catalog_from_record(&record);
    let mut form = populate::populate(&record, &catalog);
    preview::refresh_badges(&mut form, record.patient_info.dominant_side);

    let info = record.patient_info.clone();
    let reference_label = info.dominant_side.label();

    rsx! {
        section { class: "page page-report",
            header { class: "report__header",
                h1 { "Testrapport" }
                div { class: "report__info",
                    div { span { "Namn" } strong { "{info.name}" } }
                    div { span { "Datum" } strong { "{info.date}" } }
                    div { span { "Sport/Position" } strong { "{info.sport_position}" } }
                    div { span { "Referenssida" } strong { "{reference_label}" } }
                }
                button {
                    r#type: "button",
                    class: "button report__print",
                    onclick: move |_| print_page(),
                    "Skriv ut"
                }
            }

            for section in form.sections.iter().cloned() {
                {render_report_section(section)}
            }
        }
    }
}

fn render_report_section(section: FormSection) -> Element {
    let has_data = section
        .fields
        .iter()
        .any(|field| !field.value.trim().is_empty());
    let figure = charts::figure_for_section(&section);
    let badge = section
        .badge
        .clone()
        .filter(|badge| has_data && !badge.text.is_empty());
    let comment = if section.comment.is_empty() {
        "Ingen kommentar.".to_string()
    } else {
        section.comment.clone()
    };
    let overlay = overlay_for(&section);

    rsx! {
        article { class: "report__section",
            h3 { "{section.title}" }

            if !has_data {
                p { class: "report__no-data", "Test ej genomfört" }
            } else {
                div { class: "report__section-row",
                    div { class: "report__chart",
                        match figure {
                            Ok(Some(figure)) => rsx! { ChartView { figure } },
                            Ok(None) => render_manual_rows(&section),
                            Err(err) => rsx! {
                                p { class: "chart__error", "Grafen kunde inte visas: {err}" }
                            },
                        }
                        if let Some(overlay) = overlay {
                            p { class: "test-section__overlay", "{overlay}" }
                        }
                    }
                    div { class: "report__comment",
                        if let Some(badge) = badge {
                            {
                                let badge_class =
                                    format!("asymmetry {}", badge.verdict().css_class());
                                rsx! {
                                    span { class: "{badge_class}", "{badge.text}" }
                                }
                            }
                        }
                        p { "{comment}" }
                    }
                }
            }
        }
    }
}

fn render_manual_rows(section: &FormSection) -> Element {
    let rows: Vec<(String, String)> = section
        .fields
        .iter()
        .filter(|field| !field.value.trim().is_empty())
        .map(|field| {
            let unit = if field.spec.unit.is_empty() {
                String::new()
            } else {
                format!(" {}", field.spec.unit)
            };
            (field.spec.label.clone(), format!("{}{unit}", field.value))
        })
        .collect();

    rsx! {
        ul { class: "report__manual",
            for (label, value) in rows.into_iter() {
                li {
                    span { "{label}" }
                    strong { "{value}" }
                }
            }
        }
    }
}

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
    crate::core::animal::overlay_text(weight)
}

fn print_page() {
    #[cfg(target_arch = "wasm32")]
    {
        if let Some(window) = web_sys::window() {
            let _ = window.print();
        }
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        tracing::info!("print requested; use the system print dialog");
    }
}
