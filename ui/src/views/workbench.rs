//! The assessment workbench: patient, protocol selection, test sections,
//! history, save, export, and report handoff.

use dioxus::prelude::*;
use tracing::warn;

use crate::components::{ExportPanel, TestSectionCard};
use crate::core::catalog::{Catalog, TestKind};
use crate::core::collect;
use crate::core::debounce::{Debouncer, INPUT_DEBOUNCE_MS};
use crate::core::form::FormState;
use crate::core::format;
use crate::core::populate;
use crate::core::preview;
use crate::core::record::AssessmentRecord;
use crate::core::session::SessionContext;
use crate::core::store::{self, Patient, Protocol, Screening, Stamped};

fn persist_draft(session: Signal<SessionContext>, form: Signal<FormState>) {
    let current = session();
    let record = collect::collect(&form(), &current.patient_info());
    let draft = store::DraftState {
        patient: current.patient.clone(),
        data: record,
        selected_protocol_id: current.protocol_id.clone(),
    };
    if let Err(err) = store::save_draft(&draft) {
        warn!(%err, "draft save failed");
    }
}

fn refresh_preview(session: Signal<SessionContext>, mut form: Signal<FormState>) {
    let reference = session().reference_side();
    let mut state = form.write();
    preview::refresh_badges(&mut state, reference);
}

fn load_history(
    session: Signal<SessionContext>,
    mut history: Signal<Vec<Stamped<Screening>>>,
    mut status: Signal<String>,
) {
    let current = session();
    let (Some(user), Some(patient)) = (current.user.as_ref(), current.patient.as_ref()) else {
        history.set(Vec::new());
        return;
    };
    match store::screenings(&user.id, &patient.id).list() {
        Ok(list) => history.set(list),
        Err(err) => {
            warn!(%err, "history load failed");
            status.set(format!("Kunde inte ladda historik: {err}"));
        }
    }
}

/// The default ad hoc selection: one of every available test.
fn render_default_selection(
    catalog: Signal<Catalog>,
    mut form: Signal<FormState>,
    mut session: Signal<SessionContext>,
) {
    let cat = catalog();
    let ids: Vec<String> = cat
        .listings()
        .into_iter()
        .map(|listing| listing.section_type)
        .collect();
    let mut next = FormState::render_selection(&ids, &cat);
    next.apply_default_comments();
    form.set(next);
    session.write().protocol_id = None;
}

fn apply_protocol(
    protocol: &Stamped<Protocol>,
    catalog: Signal<Catalog>,
    mut form: Signal<FormState>,
    mut session: Signal<SessionContext>,
) {
    let cat = catalog();
    // Stored protocols keep raw custom ids; section types carry the prefix.
    let transformed: Vec<String> = protocol
        .doc
        .test_ids
        .iter()
        .map(|id| match cat.resolve(id) {
            Some(TestKind::Custom(custom)) if !id.starts_with("custom_") => custom.section_type(),
            _ => id.clone(),
        })
        .collect();

    let mut next = FormState::render_selection(&transformed, &cat);
    next.apply_default_comments();
    form.set(next);
    session.write().protocol_id = Some(protocol.id.clone());
    refresh_preview(session, form);
    persist_draft(session, form);
}

#[component]
pub fn Workbench() -> Element {
    let mut session = use_context::<Signal<SessionContext>>();
    let mut catalog = use_signal(Catalog::new);
    let mut form = use_signal(FormState::default);
    let mut protocols = use_signal(Vec::<Stamped<Protocol>>::new);
    let history = use_signal(Vec::<Stamped<Screening>>::new);
    let mut status = use_signal(String::new);
    let mut initialized = use_signal(|| false);
    let debouncer = use_hook(Debouncer::new);

    // One-time startup: catalog, protocols, and draft restoration.
    use_effect(move || {
        if initialized() {
            return;
        }
        initialized.set(true);

        let Some(user) = session().user.clone() else {
            return;
        };

        match store::load_custom_tests(&user.id) {
            Ok(custom) => catalog.set(Catalog::with_custom(custom)),
            Err(err) => warn!(%err, "custom test load failed"),
        }
        match store::protocols(&user.id).list() {
            Ok(list) => protocols.set(list),
            Err(err) => warn!(%err, "protocol load failed"),
        }

        match store::load_draft() {
            Ok(Some(draft)) => {
                {
                    let mut current = session.write();
                    if let Some(patient) = draft.patient {
                        current.select_patient(patient);
                    }
                    current.protocol_id = draft.selected_protocol_id;
                }
                form.set(populate::populate(&draft.data, &catalog()));
                refresh_preview(session, form);
                load_history(session, history, status);
            }
            Ok(None) => render_default_selection(catalog, form, session),
            Err(err) => {
                warn!(%err, "draft restore failed");
                render_default_selection(catalog, form, session);
            }
        }
    });

    let on_change = use_callback(move |()| {
        debouncer.debounce(INPUT_DEBOUNCE_MS, move || {
            refresh_preview(session, form);
            persist_draft(session, form);
        });
    });

    let save = move |_| {
        let current = session();
        let Some(user) = current.user.clone() else {
            status.set("Du måste logga in först.".into());
            return;
        };
        let Some(patient) = current.patient.clone() else {
            status.set("Du måste välja en patient först.".into());
            return;
        };

        let record = collect::collect(&form(), &current.patient_info());
        let screening = Screening {
            record,
            patient_id: patient.id.clone(),
            patient_name: patient.doc.full_name(),
            test_date: format::today(),
        };

        let collection = store::screenings(&user.id, &patient.id);
        let result = match current.screening_id.clone() {
            Some(id) => collection.upsert(&id, screening).map(|doc| doc.id),
            None => collection.insert(screening).map(|doc| doc.id),
        };

        match result {
            Ok(id) => {
                session.write().screening_id = Some(id);
                load_history(session, history, status);
                status.set("Data sparad!".into());
            }
            Err(err) => {
                warn!(%err, "screening save failed");
                status.set(format!("Ett fel uppstod vid sparning: {err}"));
            }
        }
    };

    let make_report = move |_| {
        let record = collect::collect(&form(), &session().patient_info());
        match store::save_report_handoff(&record) {
            Ok(()) => status.set("Rapporten är redo. Öppna sidan Rapport.".into()),
            Err(err) => status.set(format!("Kunde inte skapa rapporten: {err}")),
        }
    };

    let on_import = move |record: AssessmentRecord| {
        form.set(populate::populate(&record, &catalog()));
        refresh_preview(session, form);
        status.set("Data importerad!".into());
    };

    if session().user.is_none() {
        return rsx! {
            section { class: "page page-workbench",
                p { class: "workbench__status", "Logga in för att använda arbetsytan." }
            }
        };
    }

    let collected = collect::collect(&form(), &session().patient_info());
    let section_count = form().sections.len();
    let protocol_list = protocols();
    let active_protocol = session().protocol_id.clone();
    let history_entries = history();
    let has_patient = session().patient.is_some();

    rsx! {
        section { class: "page page-workbench",
            PatientPanel {
                on_selected: move |()| {
                    render_default_selection(catalog, form, session);
                    load_history(session, history, status);
                    persist_draft(session, form);
                },
            }

            if has_patient {
                div { class: "workbench__toolbar",
                    div { class: "protocol-row",
                        span { class: "protocol-row__label", "Protokoll:" }
                        button {
                            r#type: "button",
                            class: if active_protocol.is_none() { "protocol-chip protocol-chip--active" } else { "protocol-chip" },
                            onclick: move |_| {
                                render_default_selection(catalog, form, session);
                                persist_draft(session, form);
                            },
                            "Alla tester"
                        }
                        for protocol in protocol_list.into_iter() {
                            {
                                let is_active = active_protocol.as_deref() == Some(protocol.id.as_str());
                                let chip = protocol.clone();
                                rsx! {
                                    button {
                                        r#type: "button",
                                        class: if is_active { "protocol-chip protocol-chip--active" } else { "protocol-chip" },
                                        title: "{protocol.doc.name} ({protocol.doc.test_ids.len()} tester)",
                                        onclick: move |_| apply_protocol(&chip, catalog, form, session),
                                        "{protocol.doc.name}"
                                    }
                                }
                            }
                        }
                    }

                    div { class: "workbench__actions",
                        button { r#type: "button", class: "button button--primary", onclick: save, "Spara data" }
                        button { r#type: "button", class: "button", onclick: make_report, "Skapa rapport" }
                    }
                }

                if !status().is_empty() {
                    p { class: "workbench__status", "{status}" }
                }

                div { class: "workbench__layout",
                    div { class: "workbench__form",
                        for index in 0..section_count {
                            TestSectionCard {
                                form,
                                index,
                                on_change: move |()| on_change.call(()),
                            }
                        }
                    }

                    aside { class: "workbench__sidebar",
                        HistoryPanel {
                            entries: history_entries,
                            on_open: move |entry: Stamped<Screening>| {
                                session.write().screening_id = Some(entry.id.clone());
                                form.set(populate::populate(&entry.doc.record, &catalog()));
                                refresh_preview(session, form);
                            },
                            on_delete: move |entry: Stamped<Screening>| {
                                let current = session();
                                let (Some(user), Some(patient)) =
                                    (current.user.clone(), current.patient.clone())
                                else {
                                    return;
                                };
                                match store::screenings(&user.id, &patient.id).delete(&entry.id) {
                                    Ok(()) => {
                                        if current.screening_id.as_deref() == Some(entry.id.as_str()) {
                                            session.write().screening_id = None;
                                            status.set("Visat test raderades.".into());
                                        }
                                        load_history(session, history, status);
                                    }
                                    Err(err) => {
                                        status.set(format!("Kunde inte radera testet: {err}"))
                                    }
                                }
                            },
                        }

                        ExportPanel { record: collected, on_import }
                    }
                }
            }
        }
    }
}

#[derive(Clone, Copy, PartialEq)]
enum PatientPanelMode {
    Card,
    Search,
    Edit,
}

#[component]
fn PatientPanel(on_selected: EventHandler<()>) -> Element {
    let mut session = use_context::<Signal<SessionContext>>();
    let mut mode = use_signal(|| PatientPanelMode::Card);
    let mut search_term = use_signal(String::new);
    let mut results = use_signal(Vec::<Stamped<Patient>>::new);
    let mut panel_error = use_signal(String::new);

    // Edit form state; loaded from the selected patient when editing.
    let mut editing_id = use_signal(|| None::<String>);
    let mut first_name = use_signal(String::new);
    let mut last_name = use_signal(String::new);
    let mut internal_id = use_signal(String::new);
    let mut dob = use_signal(String::new);
    let mut gender = use_signal(|| "Man".to_string());
    let mut sport = use_signal(String::new);
    let mut injury = use_signal(String::new);
    let mut injured_side = use_signal(|| "Höger".to_string());
    let mut bodyweight = use_signal(String::new);

    let run_search = use_callback(move |()| {
        let current = session();
        let Ok(user) = current.require_user().cloned() else {
            panel_error.set("Du måste logga in först.".into());
            return;
        };
        match store::patients(&user.id).list() {
            Ok(all) => {
                let needle = search_term().to_lowercase();
                let filtered: Vec<Stamped<Patient>> = all
                    .into_iter()
                    .filter(|patient| {
                        needle.is_empty()
                            || patient.doc.full_name().to_lowercase().contains(&needle)
                            || patient.doc.internal_id.to_lowercase().contains(&needle)
                    })
                    .collect();
                results.set(filtered);
            }
            Err(err) => {
                warn!(%err, "patient search failed");
                panel_error.set(format!("Fel vid sökning: {err}"));
            }
        }
    });

    let open_edit = use_callback(move |patient: Option<Stamped<Patient>>| {
        match patient {
            Some(patient) => {
                editing_id.set(Some(patient.id.clone()));
                first_name.set(patient.doc.first_name.clone());
                last_name.set(patient.doc.last_name.clone());
                internal_id.set(patient.doc.internal_id.clone());
                dob.set(patient.doc.dob.clone());
                gender.set(patient.doc.gender.clone());
                sport.set(patient.doc.sport.clone());
                injury.set(patient.doc.injury.clone());
                injured_side.set(patient.doc.injured_side.clone());
                bodyweight.set(if patient.doc.bodyweight > 0.0 {
                    format::fmt_num(patient.doc.bodyweight)
                } else {
                    String::new()
                });
            }
            None => {
                editing_id.set(None);
                first_name.set(String::new());
                last_name.set(String::new());
                internal_id.set(String::new());
                dob.set(String::new());
                gender.set("Man".into());
                sport.set(String::new());
                injury.set(String::new());
                injured_side.set("Höger".into());
                bodyweight.set(String::new());
            }
        }
        panel_error.set(String::new());
        mode.set(PatientPanelMode::Edit);
    });

    let submit_patient = move |evt: FormEvent| {
        evt.prevent_default();
        let current = session();
        let Ok(user) = current.require_user().cloned() else {
            panel_error.set("Du måste logga in först.".into());
            return;
        };

        let age = birth_year(&dob())
            .map(|year| (current_year() - year).max(0) as u32)
            .unwrap_or(0);
        let patient = Patient {
            first_name: first_name(),
            last_name: last_name(),
            internal_id: internal_id(),
            dob: dob(),
            age,
            gender: gender(),
            sport: sport(),
            injury: injury(),
            injured_side: injured_side(),
            bodyweight: bodyweight().trim().parse().unwrap_or(0.0),
        };

        let collection = store::patients(&user.id);
        let saved = match editing_id() {
            Some(id) => collection.upsert(&id, patient),
            None => collection.insert(patient),
        };

        match saved {
            Ok(saved) => {
                session.write().select_patient(saved);
                mode.set(PatientPanelMode::Card);
                on_selected.call(());
            }
            Err(err) => {
                warn!(%err, "patient save failed");
                panel_error.set(format!("Kunde inte spara patienten: {err}"));
            }
        }
    };

    let selected = session().patient.clone();

    rsx! {
        section { class: "patient-panel",
            match (mode(), selected) {
                (PatientPanelMode::Card, Some(patient)) => rsx! {
                    div { class: "patient-card",
                        div { class: "patient-card__details",
                            h2 { "{patient.doc.full_name()}" }
                            dl {
                                dt { "Patient-ID" }
                                dd { "{patient.doc.internal_id}" }
                                dt { "Sport" }
                                dd { "{patient.doc.sport}" }
                                dt { "Födelsedatum" }
                                dd { "{patient.doc.dob}" }
                                dt { "Skadad sida" }
                                dd { "{patient.doc.injured_side}" }
                            }
                        }
                        div { class: "patient-card__actions",
                            button {
                                r#type: "button",
                                class: "button",
                                onclick: move |_| {
                                    let patient = session().patient.clone();
                                    open_edit.call(patient);
                                },
                                "Redigera"
                            }
                            button {
                                r#type: "button",
                                class: "button button--ghost",
                                onclick: move |_| {
                                    session.write().clear_patient();
                                    mode.set(PatientPanelMode::Search);
                                    run_search.call(());
                                },
                                "Byt patient"
                            }
                        }
                    }
                },
                (PatientPanelMode::Edit, _) => rsx! {
                    form { class: "patient-form", onsubmit: submit_patient,
                        h2 { if editing_id().is_some() { "Redigera Patient" } else { "Ny Patient" } }
                        div { class: "patient-form__grid",
                            label { "Förnamn"
                                input { value: "{first_name}", oninput: move |evt| first_name.set(evt.value()) }
                            }
                            label { "Efternamn"
                                input { value: "{last_name}", oninput: move |evt| last_name.set(evt.value()) }
                            }
                            label { "Patient-ID (internt)"
                                input { value: "{internal_id}", oninput: move |evt| internal_id.set(evt.value()) }
                            }
                            label { "Födelsedatum"
                                input { r#type: "date", value: "{dob}", oninput: move |evt| dob.set(evt.value()) }
                            }
                            label { "Kön"
                                select {
                                    value: "{gender}",
                                    onchange: move |evt| gender.set(evt.value()),
                                    option { value: "Man", "Man" }
                                    option { value: "Kvinna", "Kvinna" }
                                    option { value: "Annat", "Annat" }
                                }
                            }
                            label { "Sport"
                                input { value: "{sport}", oninput: move |evt| sport.set(evt.value()) }
                            }
                            label { "Skada"
                                input { value: "{injury}", oninput: move |evt| injury.set(evt.value()) }
                            }
                            label { "Skadad sida"
                                select {
                                    value: "{injured_side}",
                                    onchange: move |evt| injured_side.set(evt.value()),
                                    option { value: "Höger", "Höger" }
                                    option { value: "Vänster", "Vänster" }
                                    option { value: "Ingen", "Ingen" }
                                }
                            }
                            label { "Kroppsvikt (kg)"
                                input {
                                    r#type: "number",
                                    step: "0.1",
                                    value: "{bodyweight}",
                                    oninput: move |evt| bodyweight.set(evt.value()),
                                }
                            }
                        }
                        div { class: "patient-form__actions",
                            button { r#type: "submit", class: "button button--primary",
                                if editing_id().is_some() { "Spara Ändringar" } else { "Skapa Patient" }
                            }
                            button {
                                r#type: "button",
                                class: "button button--ghost",
                                onclick: move |_| mode.set(
                                    if session().patient.is_some() { PatientPanelMode::Card } else { PatientPanelMode::Search }
                                ),
                                "Avbryt"
                            }
                        }
                    }
                },
                _ => rsx! {
                    div { class: "patient-search",
                        h2 { "Välj patient" }
                        div { class: "patient-search__controls",
                            input {
                                placeholder: "Sök på namn eller ID…",
                                value: "{search_term}",
                                oninput: move |evt| {
                                    search_term.set(evt.value());
                                    run_search.call(());
                                },
                            }
                            button {
                                r#type: "button",
                                class: "button button--primary",
                                onclick: move |_| open_edit.call(None),
                                "Ny patient"
                            }
                            button {
                                r#type: "button",
                                class: "button",
                                onclick: move |_| run_search.call(()),
                                "Visa alla"
                            }
                        }
                        ul { class: "patient-search__results",
                            for patient in results().into_iter() {
                                {
                                    let chosen = patient.clone();
                                    rsx! {
                                        li {
                                            button {
                                                r#type: "button",
                                                class: "patient-search__item",
                                                onclick: move |_| {
                                                    session.write().select_patient(chosen.clone());
                                                    mode.set(PatientPanelMode::Card);
                                                    on_selected.call(());
                                                },
                                                strong { "{patient.doc.full_name()}" }
                                                span { class: "patient-search__meta", "ID: {patient.doc.internal_id}" }
                                            }
                                        }
                                    }
                                }
                            }
                        }
                        if results().is_empty() {
                            p { class: "patient-search__empty", "Inga patienter hittades." }
                        }
                    }
                },
            }

            if !panel_error().is_empty() {
                p { class: "patient-panel__error", "{panel_error}" }
            }
        }
    }
}

#[component]
fn HistoryPanel(
    entries: Vec<Stamped<Screening>>,
    on_open: EventHandler<Stamped<Screening>>,
    on_delete: EventHandler<Stamped<Screening>>,
) -> Element {
    rsx! {
        section { class: "history-panel",
            h3 { "Testhistorik" }
            if entries.is_empty() {
                p { class: "history-panel__empty", "Inga tester registrerade." }
            } else {
                ul { class: "history-panel__items",
                    for entry in entries.into_iter() {
                        {
                            let date = if entry.doc.test_date.is_empty() {
                                format::date_part(&entry.updated_at)
                            } else {
                                entry.doc.test_date.clone()
                            };
                            let open_entry = entry.clone();
                            let delete_entry = entry.clone();
                            rsx! {
                                li { class: "history-panel__item",
                                    span { class: "history-panel__date", "{date}" }
                                    div { class: "history-panel__buttons",
                                        button {
                                            r#type: "button",
                                            class: "button button--small",
                                            onclick: move |_| on_open.call(open_entry.clone()),
                                            "Öppna"
                                        }
                                        button {
                                            r#type: "button",
                                            class: "button button--small button--danger",
                                            onclick: move |_| on_delete.call(delete_entry.clone()),
                                            "Radera"
                                        }
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

fn current_year() -> i32 {
    time::OffsetDateTime::now_utc().year()
}

fn birth_year(dob: &str) -> Option<i32> {
    dob.get(0..4)?.parse().ok()
}
