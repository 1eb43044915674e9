//! The desktop build inlines the shared stylesheet; the web build ships a
//! copy under its own assets. These tests keep both embeddings honest.

const EMBEDDED: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/../ui/assets/theme/main.css"
));

const WEB_COPY: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/../web/assets/main.css"
));

#[test]
fn embedded_css_is_not_empty() {
    assert!(EMBEDDED.len() > 1_000, "theme css looks truncated");
}

#[test]
fn web_copy_matches_the_shared_theme() {
    assert_eq!(
        EMBEDDED, WEB_COPY,
        "web/assets/main.css has drifted from ui/assets/theme/main.css"
    );
}

#[test]
fn print_rules_are_present() {
    assert!(EMBEDDED.contains("@media print"));
    assert!(EMBEDDED.contains(".report__section"));
}
