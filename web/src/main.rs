use dioxus::prelude::*;

use ui::core::auth;
use ui::core::session::SessionContext;
use ui::views::{Home, Login, ProtocolManager, Report, Workbench};

#[derive(Debug, Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum Route {
    #[layout(WebNavbar)]
    #[route("/")]
    Home {},
    #[route("/login")]
    Login {},
    #[route("/workbench")]
    Workbench {},
    #[route("/protocols")]
    ProtocolManager {},
    #[route("/report")]
    Report {},
}

const MAIN_CSS: Asset = asset!("/assets/main.css");

fn main() {
    dioxus::launch(App);
}

#[component]
fn App() -> Element {
    // Restore a previous sign-in before the first render.
    let session = use_signal(|| {
        let user = auth::restore_session().ok().flatten();
        match user {
            Some(user) => SessionContext::signed_in(user),
            None => SessionContext::default(),
        }
    });
    use_context_provider(|| session);

    rsx! {
        document::Link { rel: "stylesheet", href: MAIN_CSS }

        Router::<Route> {}
    }
}

/// A web-specific layout around the shared views, using the web `Route`
/// enum for navigation.
#[component]
fn WebNavbar() -> Element {
    let session = use_context::<Signal<SessionContext>>();
    let account_label = match session().user {
        Some(user) => user.email,
        None => "Logga in".to_string(),
    };

    rsx! {
        nav { class: "navbar",
            span { class: "navbar__brand", "Fysioscreen" }
            Link { class: "navbar__link", to: Route::Home {}, "Hem" }
            Link { class: "navbar__link", to: Route::Workbench {}, "Arbetsyta" }
            Link { class: "navbar__link", to: Route::ProtocolManager {}, "Protokoll" }
            Link { class: "navbar__link", to: Route::Report {}, "Rapport" }
            Link { class: "navbar__link navbar__link--account", to: Route::Login {}, "{account_label}" }
        }
        Outlet::<Route> {}
    }
}
