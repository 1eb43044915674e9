//! Export/import panel for the collected record.

use dioxus::prelude::*;

use crate::core::export;
use crate::core::record::AssessmentRecord;

#[derive(Clone, Debug, PartialEq)]
enum ExportStatus {
    Idle,
    Working,
    Done(String),
    Error(String),
}

#[component]
pub fn ExportPanel(record: AssessmentRecord, on_import: EventHandler<AssessmentRecord>) -> Element {
    let status = use_signal(|| ExportStatus::Idle);
    let mut import_text = use_signal(String::new);
    let mut show_import = use_signal(|| false);

    let feedback = match &status() {
        ExportStatus::Idle => None,
        ExportStatus::Working => Some(("export-panel__meta".to_string(), "Förbereder…".to_string())),
        ExportStatus::Done(message) => Some((
            "export-panel__meta export-panel__meta--success".to_string(),
            message.clone(),
        )),
        ExportStatus::Error(err) => Some((
            "export-panel__meta export-panel__meta--error".to_string(),
            format!("Fel: {err}"),
        )),
    };

    let csv_handler = {
        let mut status = status;
        let current = record.clone();
        move |_| {
            if status() == ExportStatus::Working {
                return;
            }
            status.set(ExportStatus::Working);

            let rows = export::flatten_record(&current);
            let csv = export::to_csv(&rows);
            let filename = export::export_filename(
                &current.patient_info.name,
                &current.patient_info.date,
            );

            spawn(async move {
                let copied = export::copy_to_clipboard(csv.clone()).await;
                let delivered = export::deliver_file(&filename, "text/csv", csv.into_bytes()).await;
                match (copied, delivered) {
                    (Ok(()), Ok(Some(path))) => {
                        status.set(ExportStatus::Done(format!("CSV kopierad och sparad till {path}")))
                    }
                    (Ok(()), Ok(None)) => {
                        status.set(ExportStatus::Done("CSV kopierad, nedladdning startad".into()))
                    }
                    (_, Err(err)) | (Err(err), _) => status.set(ExportStatus::Error(err)),
                }
            });
        }
    };

    let import_handler = {
        let mut status = status;
        move |_| {
            let rows = export::rows_from_csv(&import_text());
            if rows.is_empty() {
                status.set(ExportStatus::Error("Ingen data att importera.".into()));
                return;
            }
            let record = export::record_from_rows(&rows);
            on_import.call(record);
            import_text.set(String::new());
            show_import.set(false);
            status.set(ExportStatus::Done("Data importerad!".into()));
        }
    };

    rsx! {
        section { class: "export-panel",
            div { class: "export-panel__actions",
                button {
                    r#type: "button",
                    class: "button",
                    onclick: csv_handler,
                    "Exportera CSV"
                }
                button {
                    r#type: "button",
                    class: "button button--ghost",
                    onclick: move |_| {
                        let visible = show_import();
                        show_import.set(!visible);
                    },
                    "Importera CSV"
                }
            }

            if show_import() {
                div { class: "export-panel__import",
                    textarea {
                        placeholder: "Klistra in CSV-innehåll (Test,Verdi)…",
                        value: "{import_text}",
                        oninput: move |evt| import_text.set(evt.value()),
                    }
                    button {
                        r#type: "button",
                        class: "button button--primary",
                        onclick: import_handler,
                        "Läs in"
                    }
                }
            }

            if let Some((class_name, message)) = feedback {
                p { class: "{class_name}", "{message}" }
            }
        }
    }
}
