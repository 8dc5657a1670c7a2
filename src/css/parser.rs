use crate::css::selectors::{Combinator, Component, CompoundSelector, Selector};
use pest::error::LineColLocation;
use pest::iterators::Pair;
use pest::Parser;
use pest_derive::Parser;

#[derive(Parser)]
#[grammar = "grammar/selector.pest"]
pub struct SelectorParser;

pub(crate) fn parse_selector_list(input: &str) -> Result<Vec<Selector>, String> {
    let pairs = SelectorParser::parse(Rule::selector_list, input).map_err(|err| {
        let column = match err.line_col {
            LineColLocation::Pos((_, column)) | LineColLocation::Span((_, column), _) => column,
        };
        format!(
            "invalid selector \"{}\" (unexpected input at column {})",
            input.trim(),
            column
        )
    })?;

    let mut selectors = Vec::new();

    for selector_list in pairs {
        for item in selector_list.into_inner() {
            match item.as_rule() {
                Rule::selector => selectors.push(handle_selector(item)),
                Rule::EOI => break,
                _ => unreachable!(),
            }
        }
    }

    Ok(selectors)
}

fn handle_selector(selector: Pair<'_, Rule>) -> Selector {
    let mut text = String::new();
    let mut compounds = Vec::new();
    let mut combinators: Vec<Combinator> = Vec::new();

    for part in selector.into_inner() {
        match part.as_rule() {
            Rule::compound => {
                if let Some(combinator) = combinators.last() {
                    text.push_str(&combinator.to_string());
                }
                text.push_str(part.as_str());
                compounds.push(handle_compound(part));
            }
            Rule::combinator => combinators.push(combinator_from_pair(part)),
            _ => unreachable!(),
        }
    }

    // link the compounds right to left so that each one owns the rest of the chain
    let mut compounds = compounds.into_iter().rev();
    let mut combinators = combinators.into_iter().rev();
    let mut head = compounds.next().unwrap_or_default();

    for previous in compounds {
        let combinator = combinators.next().unwrap_or(Combinator::Descendant);
        head = previous.with_child(combinator, head);
    }

    Selector::new(text, head)
}

fn handle_compound(compound: Pair<'_, Rule>) -> CompoundSelector {
    let components = compound
        .into_inner()
        .map(|component| {
            let span = component.as_str();

            match component.as_rule() {
                Rule::element_name if span == "*" => Component::Universal,
                Rule::element_name => Component::Element(span.to_owned()),
                // "#main"
                Rule::id => Component::Id(span[1..].to_owned()),
                // ".note"
                Rule::class => Component::Class(span[1..].to_owned()),
                // "[type = 'text']"
                Rule::attribute => Component::Attribute(span[1..span.len() - 1].trim().to_owned()),
                // ":hover", "::first-line", ":nth-child(2n)"
                Rule::pseudo => {
                    let name = span.trim_start_matches(':');
                    let name = name.find('(').map_or(name, |paren| &name[..paren]);
                    Component::Pseudo(name.to_owned())
                }
                _ => unreachable!(),
            }
        })
        .collect();

    CompoundSelector::new(components)
}

fn combinator_from_pair(combinator: Pair<'_, Rule>) -> Combinator {
    match combinator.into_inner().next().map(|explicit| explicit.as_str()) {
        Some(">") => Combinator::Child,
        Some("+") => Combinator::NextSibling,
        Some("~") => Combinator::SubsequentSibling,
        _ => Combinator::Descendant,
    }
}
