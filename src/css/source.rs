use crate::css::{parse_stylesheet, RuleSet};
use crate::error::{InlinerError, Result};
use crate::inline::{Inliner, InlinerOptions};
use log::debug;
use std::fs;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

/// An immutable, ordered collection of rule sets making up one logical
/// stylesheet.
///
/// A source is meant to be parsed once and shared between documents: clones
/// share their rule sets, and each freshly parsed rule set adds a permanent
/// entry to the specificity cache.
#[derive(Debug, Clone, Default)]
pub struct CssSource {
    rule_sets: Vec<Arc<RuleSet>>,
}

impl CssSource {
    pub fn from_rule_sets<I>(rule_sets: I) -> CssSource
    where
        I: IntoIterator<Item = RuleSet>,
    {
        CssSource {
            rule_sets: rule_sets.into_iter().map(Arc::new).collect(),
        }
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<CssSource> {
        let path = path.as_ref();
        if path.as_os_str().is_empty() {
            return Err(InlinerError::invalid_argument(
                "path",
                "a stylesheet path must not be empty",
            ));
        }

        debug!("Loading stylesheet from {}.", path.display());
        fs::read_to_string(path)?.parse()
    }

    /// Reads a stylesheet from a stream, e.g. an embedded resource.
    pub fn from_reader(mut reader: impl Read) -> Result<CssSource> {
        let mut css = String::new();
        reader.read_to_string(&mut css)?;
        css.parse()
    }

    pub fn rule_sets(&self) -> &[Arc<RuleSet>] {
        &self.rule_sets
    }

    pub fn len(&self) -> usize {
        self.rule_sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rule_sets.is_empty()
    }

    /// Returns the union of both sources without equivalent duplicates. Rule
    /// sets of `self` come first and win over equivalent rule sets of `other`;
    /// the remaining rule sets of `other` follow in their own order.
    pub fn merge(&self, other: &CssSource) -> CssSource {
        let mut rule_sets: Vec<Arc<RuleSet>> = Vec::with_capacity(self.len() + other.len());

        for candidate in self.rule_sets.iter().chain(&other.rule_sets) {
            if !rule_sets
                .iter()
                .any(|existing| existing.is_equivalent(candidate))
            {
                rule_sets.push(Arc::clone(candidate));
            }
        }

        debug!(
            "Merged {} and {} rule sets into {}.",
            self.len(),
            other.len(),
            rule_sets.len()
        );

        CssSource { rule_sets }
    }

    /// Inlines this source into an HTML document using the default options.
    pub fn inline_css(&self, html: &str) -> Result<String> {
        Inliner::new(InlinerOptions::default())?.inline_css(html, &self.rule_sets)
    }
}

impl FromStr for CssSource {
    type Err = InlinerError;

    fn from_str(css: &str) -> Result<CssSource> {
        Ok(CssSource::from_rule_sets(parse_stylesheet(css)?))
    }
}
