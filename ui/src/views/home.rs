use dioxus::prelude::*;

use crate::core::session::SessionContext;

#[component]
pub fn Home() -> Element {
    let session = use_context::<Signal<SessionContext>>();
    let signed_in = session().user.is_some();

    rsx! {
        section { class: "page page-home",
            h1 { "Fysioscreen" }
            p { "Testdataregistrering och rapportering för fysisk screening." }

            ul { class: "page-home__features",
                li { "Välj testbatteri eller protokoll och registrera mätvärden." }
                li { "Direktuppdaterade grafer och vänster/höger-asymmetri." }
                li { "Sparade tester per patient, CSV-export och utskrivbar rapport." }
            }

            if signed_in {
                p { class: "page-home__cta", "Öppna arbetsytan för att komma igång." }
            } else {
                p { class: "page-home__cta", "Logga in för att komma igång." }
            }
        }
    }
}
