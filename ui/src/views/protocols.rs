//! Protocol and custom-test management: build named ordered test lists,
//! author user-defined tests.

use dioxus::prelude::*;
use tracing::warn;

use crate::core::catalog::{Catalog, GraphConfig, GraphKind, TestDefinition};
use crate::core::session::SessionContext;
use crate::core::store::{self, Protocol, Stamped};

const GRAPH_CHOICES: [(GraphKind, &str); 9] = [
    (GraphKind::SingleBar, "Enkel stapel (VÄ/HÖ)"),
    (GraphKind::PairedBar, "Parade staplar (VÄ/HÖ)"),
    (GraphKind::ThreeBar, "Tre staplar (VÄ/HÖ/Två ben)"),
    (GraphKind::DualAxis, "Två mätvärden per sida"),
    (GraphKind::GroupedBar, "Grupperade staplar (3 försök per sida)"),
    (GraphKind::Bilateral, "Två mätvärden (två ben)"),
    (GraphKind::Donut, "Procent-mätare (3 försök)"),
    (GraphKind::SingleBars3, "Tre staplar (3 försök)"),
    (GraphKind::ManualEntry, "Manuell inmatning (text)"),
];

#[component]
pub fn ProtocolManager() -> Element {
    let session = use_context::<Signal<SessionContext>>();
    let mut catalog = use_signal(Catalog::new);
    let mut protocols = use_signal(Vec::<Stamped<Protocol>>::new);
    let mut status = use_signal(String::new);
    let mut initialized = use_signal(|| false);

    // Protocol builder state.
    let mut protocol_name = use_signal(String::new);
    let mut selected_ids = use_signal(Vec::<String>::new);

    // Custom-test editor state.
    let mut editing_custom = use_signal(|| None::<String>);
    let mut custom_name = use_signal(String::new);
    let mut custom_graph = use_signal(|| GraphKind::SingleBar);
    let mut custom_unit = use_signal(String::new);
    let mut custom_labels = use_signal(String::new);

    let reload = use_callback(move |()| {
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
    });

    use_effect(move || {
        if initialized() {
            return;
        }
        initialized.set(true);
        reload.call(());
    });

    let save_protocol = move |_| {
        let Some(user) = session().user.clone() else {
            status.set("Du måste logga in först.".into());
            return;
        };
        let name = protocol_name().trim().to_string();
        if name.is_empty() {
            status.set("Ge protokollet ett namn.".into());
            return;
        }
        if selected_ids().is_empty() {
            status.set("Lägg till minst ett test.".into());
            return;
        }

        match store::protocols(&user.id).insert(Protocol {
            name,
            test_ids: selected_ids(),
        }) {
            Ok(_) => {
                protocol_name.set(String::new());
                selected_ids.set(Vec::new());
                status.set("Protokoll sparat!".into());
                reload.call(());
            }
            Err(err) => {
                warn!(%err, "protocol save failed");
                status.set(format!("Kunde inte spara protokollet: {err}"));
            }
        }
    };

    let save_custom = move |evt: FormEvent| {
        evt.prevent_default();
        let Some(user) = session().user.clone() else {
            status.set("Du måste logga in först.".into());
            return;
        };
        let name = custom_name().trim().to_string();
        if name.is_empty() {
            status.set("Ge testet ett namn.".into());
            return;
        }

        let labels: Vec<String> = custom_labels()
            .split(',')
            .map(|label| label.trim().to_string())
            .filter(|label| !label.is_empty())
            .collect();
        let unit = custom_unit().trim().to_string();

        let def = TestDefinition {
            name,
            graph_type: custom_graph(),
            config: GraphConfig {
                input_labels: labels.clone(),
                metric_names: labels,
                unit: (!unit.is_empty()).then_some(unit),
                ..Default::default()
            },
        };

        let collection = store::custom_tests(&user.id);
        let result = match editing_custom() {
            Some(id) => collection.upsert(&id, def).map(|_| ()),
            None => collection.insert(def).map(|_| ()),
        };

        match result {
            Ok(()) => {
                editing_custom.set(None);
                custom_name.set(String::new());
                custom_unit.set(String::new());
                custom_labels.set(String::new());
                status.set("Eget test sparat!".into());
                reload.call(());
            }
            Err(err) => {
                warn!(%err, "custom test save failed");
                status.set(format!("Kunde inte spara testet: {err}"));
            }
        }
    };

    if session().user.is_none() {
        return rsx! {
            section { class: "page page-protocols",
                p { class: "workbench__status", "Logga in för att hantera protokoll." }
            }
        };
    }

    let listings = catalog().listings();
    let chosen = selected_ids();
    let protocol_list = protocols();
    let custom_list: Vec<_> = catalog().custom_tests().to_vec();

    rsx! {
        section { class: "page page-protocols",
            h1 { "Protokoll & egna tester" }

            if !status().is_empty() {
                p { class: "workbench__status", "{status}" }
            }

            div { class: "protocols__layout",
                div { class: "protocols__builder",
                    h2 { "Nytt protokoll" }
                    input {
                        placeholder: "Protokollnamn…",
                        value: "{protocol_name}",
                        oninput: move |evt| protocol_name.set(evt.value()),
                    }

                    h3 { "Tillgängliga tester" }
                    ul { class: "protocols__grid",
                        for listing in listings.into_iter() {
                            {
                                let add_id = listing.section_type.clone();
                                let category = listing.category.label();
                                rsx! {
                                    li {
                                        button {
                                            r#type: "button",
                                            class: "protocols__test-button",
                                            onclick: move |_| {
                                                let mut ids = selected_ids();
                                                // Protocols store raw ids; strip the
                                                // section prefix for custom tests.
                                                let raw = add_id
                                                    .strip_prefix("custom_")
                                                    .unwrap_or(&add_id)
                                                    .to_string();
                                                ids.push(raw);
                                                selected_ids.set(ids);
                                            },
                                            strong { "{listing.name}" }
                                            span { class: "protocols__category", "{category}" }
                                        }
                                    }
                                }
                            }
                        }
                    }

                    h3 { "Valda tester (i ordning)" }
                    if chosen.is_empty() {
                        p { class: "protocols__empty", "Inga tester valda ännu." }
                    } else {
                        ol { class: "protocols__chosen",
                            for (index, id) in chosen.iter().cloned().enumerate() {
                                {
                                    let name = catalog()
                                        .resolve(&id)
                                        .map(|kind| kind.display_name())
                                        .unwrap_or_else(|| id.clone());
                                    rsx! {
                                        li {
                                            span { "{name}" }
                                            button {
                                                r#type: "button",
                                                class: "button button--small",
                                                onclick: move |_| {
                                                    let mut ids = selected_ids();
                                                    if index < ids.len() {
                                                        ids.remove(index);
                                                    }
                                                    selected_ids.set(ids);
                                                },
                                                "Ta bort"
                                            }
                                        }
                                    }
                                }
                            }
                        }
                    }

                    button {
                        r#type: "button",
                        class: "button button--primary",
                        onclick: save_protocol,
                        "Spara protokoll"
                    }

                    h3 { "Sparade protokoll" }
                    ul { class: "protocols__saved",
                        for protocol in protocol_list.into_iter() {
                            {
                                let delete_id = protocol.id.clone();
                                let count = protocol.doc.test_ids.len();
                                rsx! {
                                    li {
                                        span { "{protocol.doc.name} ({count} tester)" }
                                        button {
                                            r#type: "button",
                                            class: "button button--small button--danger",
                                            onclick: move |_| {
                                                let Some(user) = session().user.clone() else {
                                                    return;
                                                };
                                                match store::protocols(&user.id).delete(&delete_id) {
                                                    Ok(()) => reload.call(()),
                                                    Err(err) => status.set(
                                                        format!("Kunde inte radera: {err}"),
                                                    ),
                                                }
                                            },
                                            "Radera"
                                        }
                                    }
                                }
                            }
                        }
                    }
                }

                div { class: "protocols__custom",
                    h2 {
                        if editing_custom().is_some() { "Redigera eget test" } else { "Nytt eget test" }
                    }
                    form { class: "custom-test-form", onsubmit: save_custom,
                        label { "Namn"
                            input {
                                value: "{custom_name}",
                                oninput: move |evt| custom_name.set(evt.value()),
                            }
                        }
                        label { "Graftyp"
                            select {
                                onchange: move |evt| {
                                    let chosen = GRAPH_CHOICES
                                        .iter()
                                        .find(|(kind, _)| kind.wire_name() == evt.value());
                                    if let Some((kind, _)) = chosen {
                                        custom_graph.set(*kind);
                                    }
                                },
                                for (kind, label) in GRAPH_CHOICES.into_iter() {
                                    option {
                                        value: "{kind.wire_name()}",
                                        selected: custom_graph() == kind,
                                        "{label}"
                                    }
                                }
                            }
                        }
                        label { "Enhet (t.ex. kg, cm)"
                            input {
                                value: "{custom_unit}",
                                oninput: move |evt| custom_unit.set(evt.value()),
                            }
                        }
                        label { "Fältetiketter (kommaseparerade)"
                            input {
                                placeholder: "Värde 1, Värde 2, Värde 3",
                                value: "{custom_labels}",
                                oninput: move |evt| custom_labels.set(evt.value()),
                            }
                        }
                        button { r#type: "submit", class: "button button--primary",
                            if editing_custom().is_some() { "Spara ändringar" } else { "Skapa test" }
                        }
                    }

                    h3 { "Dina egna tester" }
                    if custom_list.is_empty() {
                        p { class: "protocols__empty", "Inga egna tester ännu." }
                    } else {
                        ul { class: "protocols__saved",
                            for custom in custom_list.into_iter() {
                                {
                                    let edit = custom.clone();
                                    let delete_id = custom.id.clone();
                                    let graph_label = GRAPH_CHOICES
                                        .iter()
                                        .find(|(kind, _)| *kind == custom.def.graph_type)
                                        .map(|(_, label)| *label)
                                        .unwrap_or("Okänd graftyp");
                                    rsx! {
                                        li {
                                            span { "{custom.def.name} · {graph_label}" }
                                            div {
                                                button {
                                                    r#type: "button",
                                                    class: "button button--small",
                                                    onclick: move |_| {
                                                        editing_custom.set(Some(edit.id.clone()));
                                                        custom_name.set(edit.def.name.clone());
                                                        custom_graph.set(edit.def.graph_type);
                                                        custom_unit.set(
                                                            edit.def.config.unit.clone().unwrap_or_default(),
                                                        );
                                                        custom_labels.set(edit.def.config.input_labels.join(", "));
                                                    },
                                                    "Redigera"
                                                }
                                                button {
                                                    r#type: "button",
                                                    class: "button button--small button--danger",
                                                    onclick: move |_| {
                                                        let Some(user) = session().user.clone() else {
                                                            return;
                                                        };
                                                        match store::custom_tests(&user.id).delete(&delete_id) {
                                                            Ok(()) => reload.call(()),
                                                            Err(err) => status.set(
                                                                format!("Kunde inte radera: {err}"),
                                                            ),
                                                        }
                                                    },
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
    }
}
