use css_inliner::{
    matched_declarations, parse_stylesheet, specificity, CssSource, Inliner, InlinerOptions,
};
use kuchiki::traits::TendrilSink;
use proptest::prelude::*;
use std::collections::HashSet;

fn source(css: &str) -> CssSource {
    css.parse().unwrap()
}

fn winning_value(html: &str, source: &CssSource, property: &str) -> Option<String> {
    let document = kuchiki::parse_html().one(html);

    matched_declarations(&document, source.rule_sets())
        .into_iter()
        .find(|matched| matched.declaration.name() == property)
        .map(|matched| matched.declaration.value().to_owned())
}

#[test]
fn id_rule_wins_regardless_of_order() {
    let html = r#"<div id="myDiv"></div>"#;

    for css in &[
        "#myDiv { font-family: Arial; } div { font-family: Times New Roman; }",
        "div { font-family: Times New Roman; } #myDiv { font-family: Arial; }",
    ] {
        assert_eq!(
            winning_value(html, &source(css), "font-family").as_deref(),
            Some("Arial"),
            "{}",
            css
        );
    }
}

#[test]
fn important_element_rule_overrides_id_rule() {
    let html = r#"<div id="myDiv"></div>"#;
    let css = source("#myDiv { font-family: Arial; } div { font-family: Times New Roman !important; }");

    assert_eq!(
        winning_value(html, &css, "font-family").as_deref(),
        Some("Times New Roman")
    );
}

#[test]
fn inline_styles_survive_normal_rules_only() {
    let html = r#"<div style="font-family: Comic Sans MS;"></div>"#;

    let normal = source("div { font-family: Times New Roman; }")
        .inline_css(html)
        .unwrap();
    assert!(
        normal.contains(r#"<div style="font-family: Comic Sans MS;"></div>"#),
        "{}",
        normal
    );

    let important = source("div { font-family: Times New Roman !important; }")
        .inline_css(html)
        .unwrap();
    assert!(
        important.contains(r#"<div style="font-family: Times New Roman;"></div>"#),
        "{}",
        important
    );
}

#[test]
fn appends_after_existing_inline_declarations() {
    let html = r#"<p id="x" style="font-weight: bold; font-height: 14px;">hi</p>"#;
    let inlined = source("#x { font-family: Arial, Helvetica, sans-serif; }")
        .inline_css(html)
        .unwrap();

    assert!(
        inlined.contains(
            r#"<p style="font-weight: bold; font-height: 14px; font-family: Arial, Helvetica, sans-serif;">hi</p>"#
        ),
        "{}",
        inlined
    );
}

#[test]
fn tie_break_follows_merged_order() {
    let html = r#"<p class="a b"></p>"#;
    let first = source(".a { color: red; }");
    let second = source(".b { color: blue; }");

    assert_eq!(
        winning_value(html, &first.merge(&second), "color").as_deref(),
        Some("blue")
    );
    assert_eq!(
        winning_value(html, &second.merge(&first), "color").as_deref(),
        Some("red")
    );
}

#[test]
fn merged_duplicates_keep_the_primary_declarations() {
    let html = r#"<div id="myDiv"></div>"#;
    let primary = source("#myDiv { color: red; }");
    let other = source("#MYDIV { color: blue; } div { margin: 0; }");

    let merged = primary.merge(&other);

    assert_eq!(merged.len(), 2);
    assert_eq!(winning_value(html, &merged, "color").as_deref(), Some("red"));
    assert_eq!(winning_value(html, &merged, "margin").as_deref(), Some("0"));
}

#[test]
fn every_matched_element_gets_its_own_style() {
    let css = source("li { color: red; } li.first { color: green; } ul > li { margin: 0 }");
    let inlined = Inliner::new(InlinerOptions::default().keep_attributes())
        .unwrap()
        .inline_css(
            r#"<ul><li class="first">a</li><li>b</li></ul>"#,
            css.rule_sets(),
        )
        .unwrap();

    assert!(
        inlined.contains(r#"<li class="first" style="color: green; margin: 0;">a</li>"#),
        "{}",
        inlined
    );
    assert!(
        inlined.contains(r#"<li style="color: red; margin: 0;">b</li>"#),
        "{}",
        inlined
    );
}

#[test]
fn stylesheet_errors_fail_the_whole_source() {
    let err = "p { color red } div { margin: 0; } a, { color: blue; }"
        .parse::<CssSource>()
        .unwrap_err();

    let message = err.to_string();
    assert!(message.starts_with("CSS stylesheet has errors:"), "{}", message);
    assert!(message.contains("invalid selector"), "{}", message);
}

#[test]
fn commented_stylesheets_inline_like_plain_ones() {
    let css = source(
        "/* layout */
         @media print { p { color: black; } }
         div /* wrapper */ > p { margin: 0; }
         p, /* lead */ .lead { color: red; }
         .lead /* emphasis */ { font-weight: bold; }",
    );

    let inlined = css
        .inline_css(r#"<div><p class="lead">hi</p></div>"#)
        .unwrap();

    assert!(
        inlined.contains(r#"<p style="margin: 0; color: red; font-weight: bold;">hi</p>"#),
        "{}",
        inlined
    );
}

fn source_of(selectors: &[String]) -> CssSource {
    selectors
        .iter()
        .map(|selector| format!("{} {{ color: red; }}", selector))
        .collect::<Vec<_>>()
        .join("\n")
        .parse()
        .unwrap()
}

proptest! {
    #[test]
    fn identical_selector_text_has_identical_specificity(
        selector in "[a-z]{1,5}(\\.[a-z]{1,5}){0,2}(#[a-z]{1,5})?( > [a-z]{1,5}(:hover)?)?"
    ) {
        let css = format!("{0} {{ color: red; }} {0} {{ margin: 0; }}", selector);
        let rule_sets = parse_stylesheet(&css).unwrap();

        prop_assert_eq!(specificity(&rule_sets[0]), specificity(&rule_sets[1]));
    }

    #[test]
    fn merge_keeps_one_rule_set_per_equivalent_selector(
        primary in prop::collection::vec("[a-d]", 0..6),
        other in prop::collection::vec("[a-dA-D]", 0..6),
    ) {
        let distinct = primary
            .iter()
            .chain(&other)
            .map(|selector| selector.to_ascii_lowercase())
            .collect::<HashSet<_>>()
            .len();

        let merged = source_of(&primary).merge(&source_of(&other));

        prop_assert_eq!(merged.len(), distinct);
        prop_assert_eq!(merged.merge(&merged).len(), distinct);
    }
}
