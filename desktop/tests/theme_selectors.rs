//! Selector smoke tests: classes emitted by the shared components must
//! exist in the theme, so a rename in either place fails loudly.

const THEME: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/../ui/assets/theme/main.css"
));

fn assert_selector(selector: &str) {
    assert!(
        THEME.contains(selector),
        "missing selector in theme css: {selector}"
    );
}

#[test]
fn asymmetry_badge_selectors_exist() {
    assert_selector(".asymmetry--good");
    assert_selector(".asymmetry--attention");
}

#[test]
fn chart_selectors_exist() {
    for selector in [
        ".chart__bar--left",
        ".chart__bar--right",
        ".chart__bar--both",
        ".chart__bar--primary",
        ".chart__gauge-fill",
        ".chart__error",
    ] {
        assert_selector(selector);
    }
}

#[test]
fn form_and_panel_selectors_exist() {
    for selector in [
        ".test-section",
        ".input-row__unit",
        ".manual-preview__box",
        ".patient-card",
        ".protocol-chip--active",
        ".history-panel__item",
        ".export-panel__meta--error",
    ] {
        assert_selector(selector);
    }
}

#[test]
fn side_colors_stay_distinct() {
    let va = THEME
        .split("--va-color:")
        .nth(1)
        .and_then(|rest| rest.split(';').next())
        .map(str::trim)
        .expect("--va-color defined");
    let ho = THEME
        .split("--ho-color:")
        .nth(1)
        .and_then(|rest| rest.split(';').next())
        .map(str::trim)
        .expect("--ho-color defined");
    assert_ne!(va, ho, "left/right series colors must differ");
}
