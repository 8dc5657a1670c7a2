use crate::css::selectors::{Component, CompoundSelector, Selector};
use crate::css::{RuleSet, RuleSetId};
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

const PSEUDO_ELEMENTS: [&str; 4] = ["before", "after", "first-line", "first-letter"];

static SPECIFICITY_CACHE: Lazy<RwLock<HashMap<RuleSetId, u32>>> =
    Lazy::new(|| RwLock::new(HashMap::new()));

/// Returns the cascade weight of a rule set: the sum of the weights of all of
/// its selectors. Results are cached per rule set identity for the lifetime of
/// the process and never evicted, so every parsed rule set keeps one entry.
/// Parse a stylesheet once and reuse it rather than parsing it per document.
pub fn specificity(rule_set: &RuleSet) -> u32 {
    if let Some(cached) = SPECIFICITY_CACHE
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .get(&rule_set.id())
    {
        return *cached;
    }

    let computed: u32 = rule_set.selectors().iter().map(selector_specificity).sum();

    *SPECIFICITY_CACHE
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .entry(rule_set.id())
        .or_insert(computed)
}

pub fn selector_specificity(selector: &Selector) -> u32 {
    compound_specificity(selector.head())
}

fn compound_specificity(compound: &CompoundSelector) -> u32 {
    let own: u32 = compound.components().iter().map(component_weight).sum();

    own + compound
        .child()
        .map_or(0, |(_, child)| compound_specificity(child))
}

fn component_weight(component: &Component) -> u32 {
    match component {
        Component::Id(_) => 100,
        Component::Class(_) | Component::Attribute(_) => 10,
        Component::Pseudo(name)
            if PSEUDO_ELEMENTS
                .iter()
                .any(|element| name.eq_ignore_ascii_case(element)) =>
        {
            1
        }
        // pseudo-classes weigh like a class
        Component::Pseudo(_) => 10,
        Component::Element(_) => 1,
        Component::Universal => 0,
    }
}

#[cfg(test)]
pub(crate) fn is_cached(rule_set: &RuleSet) -> bool {
    SPECIFICITY_CACHE
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .contains_key(&rule_set.id())
}
