//! Rewrites the rules of external stylesheets into the `style` attributes of
//! an HTML document, for consumers such as mail clients that ignore linked
//! and embedded stylesheets.
//!
//! ```no_run
//! use css_inliner::CssSource;
//!
//! let source: CssSource = "#main { color: red; } p { margin: 0; }".parse()?;
//! // the fragment is returned inside `<html><head></head><body>`
//! let html = source.inline_css(r#"<div id="main"><p>Hello</p></div>"#)?;
//! assert!(html.contains(r#"<div style="color: red;"><p style="margin: 0;">Hello</p></div>"#));
//! # Ok::<(), css_inliner::InlinerError>(())
//! ```

pub mod css;
pub mod error;
pub mod inline;

pub use css::source::CssSource;
pub use css::specificity::specificity;
pub use css::{parse_stylesheet, Declaration, RuleSet, RuleSetId};
pub use error::{InlinerError, Result};
pub use inline::{
    matched_declarations, update_inline_style, InlineStyle, Inliner, InlinerOptions,
    MatchedDeclaration,
};
