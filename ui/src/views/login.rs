//! Email/password sign-in and sign-up.

use dioxus::prelude::*;

use crate::core::auth;
use crate::core::session::SessionContext;

#[component]
pub fn Login() -> Element {
    let mut session = use_context::<Signal<SessionContext>>();
    let mut email = use_signal(String::new);
    let mut password = use_signal(String::new);
    let mut login_mode = use_signal(|| true);
    let mut message = use_signal(String::new);
    let mut message_is_error = use_signal(|| false);

    if let Some(user) = session().user {
        return rsx! {
            section { class: "page page-login",
                h1 { "Inloggad" }
                p { "Du är inloggad som {user.email}." }
                button {
                    r#type: "button",
                    class: "button",
                    onclick: move |_| {
                        if let Err(err) = auth::sign_out() {
                            tracing::warn!(%err, "sign out failed");
                        }
                        session.write().user = None;
                        session.write().clear_patient();
                    },
                    "Logga ut"
                }
            }
        };
    }

    let submit = move |evt: FormEvent| {
        evt.prevent_default();
        message.set("Bearbetar…".into());
        message_is_error.set(false);

        let result = if login_mode() {
            auth::sign_in(&email(), &password())
        } else {
            auth::sign_up(&email(), &password())
        };

        match result {
            Ok(user) => {
                if !login_mode() {
                    message.set("Konto skapat! Loggar in…".into());
                }
                session.set(SessionContext::signed_in(user));
            }
            Err(err) => {
                message.set(err.to_string());
                message_is_error.set(true);
            }
        }
    };

    let title = if login_mode() { "Logga in" } else { "Skapa konto" };
    let submit_label = if login_mode() { "Logga in" } else { "Registrera" };
    let toggle_text = if login_mode() {
        "Har du inget konto?"
    } else {
        "Har du redan ett konto?"
    };
    let toggle_label = if login_mode() {
        "Registrera dig"
    } else {
        "Logga in"
    };
    let message_class = if message_is_error() {
        "login__message login__message--error"
    } else {
        "login__message"
    };

    rsx! {
        section { class: "page page-login",
            h1 { "{title}" }
            form { class: "login__form", onsubmit: submit,
                label { r#for: "email", "E-post" }
                input {
                    id: "email",
                    r#type: "email",
                    value: "{email}",
                    oninput: move |evt| email.set(evt.value()),
                }
                label { r#for: "password", "Lösenord" }
                input {
                    id: "password",
                    r#type: "password",
                    value: "{password}",
                    oninput: move |evt| password.set(evt.value()),
                }
                button { r#type: "submit", class: "button button--primary", "{submit_label}" }
            }

            if !message().is_empty() {
                p { class: "{message_class}", "{message}" }
            }

            p { class: "login__toggle",
                "{toggle_text} "
                button {
                    r#type: "button",
                    class: "button button--link",
                    onclick: move |_| {
                        let mode = login_mode();
                        login_mode.set(!mode);
                        message.set(String::new());
                    },
                    "{toggle_label}"
                }
            }
        }
    }
}
