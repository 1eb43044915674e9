#![cfg_attr(all(windows, not(debug_assertions)), windows_subsystem = "windows")]

#[cfg(feature = "desktop")]
use dioxus::desktop::{tao::window::WindowBuilder, Config};
use dioxus::prelude::*;

use ui::core::auth;
use ui::core::session::SessionContext;
use ui::views::{Home, Login, ProtocolManager, Report, Workbench};

#[derive(Debug, Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum Route {
    #[layout(DesktopNavbar)]
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

const MAIN_CSS_INLINE: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/../ui/assets/theme/main.css"
)); // Embedded shared theme (ui/assets/theme/main.css).

#[cfg(feature = "desktop")]
fn main() {
    LaunchBuilder::desktop()
        .with_cfg(
            Config::new().with_window(
                WindowBuilder::new()
                    .with_title(format!("Fysioscreen – v{}", env!("CARGO_PKG_VERSION")))
                    .with_maximized(true),
            ),
        )
        .launch(App);
}

#[cfg(all(feature = "server", not(feature = "desktop")))]
fn main() {
    LaunchBuilder::server().launch(App);
}

#[component]
fn App() -> Element {
    let session = use_signal(|| {
        let user = auth::restore_session().ok().flatten();
        match user {
            Some(user) => SessionContext::signed_in(user),
            None => SessionContext::default(),
        }
    });
    use_context_provider(|| session);

    rsx! {
        // Always inline embedded CSS (no external file dependency for
        // desktop builds).
        document::Style { "{MAIN_CSS_INLINE}" }

        Router::<Route> {}
    }
}

/// A desktop-specific layout around the shared views, using the desktop
/// `Route` enum for navigation.
#[component]
fn DesktopNavbar() -> Element {
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
