mod options;
mod style;

pub use options::InlinerOptions;
pub use style::{update_inline_style, InlineStyle};

use crate::css::specificity::specificity;
use crate::css::{Declaration, RuleSet};
use crate::error::Result;
use kuchiki::iter::NodeIterator;
use kuchiki::traits::TendrilSink;
use kuchiki::{ElementData, Node, NodeDataRef, NodeRef};
use log::{debug, trace, warn};
use std::borrow::Borrow;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::io;
use std::rc::Rc;

/// The declaration that has to be written for one property of one element.
pub struct MatchedDeclaration<'a> {
    pub element: NodeDataRef<ElementData>,
    pub declaration: &'a Declaration,
}

/// Cascade priority of a candidate declaration; the greatest one wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct Rank {
    important: bool,
    specificity: u32,
    source_index: usize,
}

struct Candidate<'a> {
    element: NodeDataRef<ElementData>,
    declaration: &'a Declaration,
    rank: Rank,
}

/// Finds, for every element and property, the declaration that wins the
/// cascade. Inline declarations beat every external declaration that is not
/// `!important`, so those candidates are never produced.
pub fn matched_declarations<'a, R>(
    document: &NodeRef,
    rule_sets: &'a [R],
) -> Vec<MatchedDeclaration<'a>>
where
    R: Borrow<RuleSet>,
{
    let mut groups: HashMap<(*const Node, &'a str), usize> = HashMap::new();
    let mut winners: Vec<Candidate<'a>> = Vec::new();

    for (source_index, rule_set) in rule_sets.iter().enumerate() {
        let rule_set: &'a RuleSet = rule_set.borrow();
        let specificity = specificity(rule_set);

        for selector in rule_set.selectors() {
            let elements = match document.select(selector.text()) {
                Ok(elements) => elements,
                Err(()) => {
                    warn!("Selector \"{}\" cannot be matched, skipping it.", selector);
                    continue;
                }
            };

            for element in elements {
                let attributes = element.attributes.borrow();
                let inline_style = InlineStyle::parse(attributes.get("style").unwrap_or(""));
                let node = Rc::as_ptr(&element.as_node().0);

                for declaration in rule_set.declarations() {
                    if !declaration.is_important() && inline_style.defines(declaration.name()) {
                        trace!(
                            "Inline style of <{}> keeps \"{}\".",
                            element.name.local,
                            declaration.name()
                        );
                        continue;
                    }

                    let rank = Rank {
                        important: declaration.is_important(),
                        specificity,
                        source_index,
                    };

                    match groups.entry((node, declaration.name())) {
                        Entry::Occupied(slot) => {
                            let winner = &mut winners[*slot.get()];
                            if rank > winner.rank {
                                trace!(
                                    "\"{}\" replaces \"{}\" on <{}>.",
                                    declaration,
                                    winner.declaration,
                                    element.name.local
                                );
                                winner.declaration = declaration;
                                winner.rank = rank;
                            }
                        }
                        Entry::Vacant(slot) => {
                            slot.insert(winners.len());
                            winners.push(Candidate {
                                element: element.clone(),
                                declaration,
                                rank,
                            });
                        }
                    }
                }
            }
        }
    }

    winners
        .into_iter()
        .map(|candidate| MatchedDeclaration {
            element: candidate.element,
            declaration: candidate.declaration,
        })
        .collect()
}

/// Rewrites stylesheet rules into the `style` attributes of HTML documents.
#[derive(Debug, Clone)]
pub struct Inliner {
    options: InlinerOptions,
}

impl Inliner {
    pub fn new(options: InlinerOptions) -> Result<Inliner> {
        options.validate()?;
        Ok(Inliner { options })
    }

    pub fn options(&self) -> &InlinerOptions {
        &self.options
    }

    /// Parses `html`, inlines `rule_sets` into it and serializes it again.
    ///
    /// The input is parsed as a whole document, so a fragment comes back
    /// wrapped in `<html><head></head><body>` elements.
    pub fn inline_css<R>(&self, html: &str, rule_sets: &[R]) -> Result<String>
    where
        R: Borrow<RuleSet>,
    {
        let document = kuchiki::parse_html().one(html);
        self.inline_document(&document, rule_sets);

        let mut output = Vec::with_capacity(html.len());
        document.serialize(&mut output)?;

        String::from_utf8(output)
            .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err).into())
    }

    /// Inlines `rule_sets` into an already parsed document.
    pub fn inline_document<R>(&self, document: &NodeRef, rule_sets: &[R])
    where
        R: Borrow<RuleSet>,
    {
        let matched = matched_declarations(document, rule_sets);
        debug!(
            "Inlining {} declarations from {} rule sets.",
            matched.len(),
            rule_sets.len()
        );

        for MatchedDeclaration {
            element,
            declaration,
        } in &matched
        {
            update_inline_style(element, declaration);
        }

        self.strip_attributes(document);
    }

    fn strip_attributes(&self, document: &NodeRef) {
        let names = self.options.stripped_attributes();
        if names.is_empty() {
            return;
        }

        for element in document.inclusive_descendants().elements() {
            let mut attributes = element.attributes.borrow_mut();
            for name in names {
                attributes.remove(name.as_str());
            }
        }
    }
}

impl Default for Inliner {
    fn default() -> Self {
        Inliner {
            options: InlinerOptions::default(),
        }
    }
}
