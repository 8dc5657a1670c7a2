use std::fmt;

/// One simple selector inside a compound selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Component {
    /// `*`
    Universal,
    Element(String),
    Id(String),
    Class(String),
    /// Everything between the brackets, e.g. `href` or `type="text"`.
    Attribute(String),
    /// Name of a pseudo-class or pseudo-element, without colons and arguments.
    Pseudo(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combinator {
    Descendant,
    Child,
    NextSibling,
    SubsequentSibling,
}

impl fmt::Display for Combinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Combinator::Descendant => " ",
            Combinator::Child => " > ",
            Combinator::NextSibling => " + ",
            Combinator::SubsequentSibling => " ~ ",
        })
    }
}

/// A run of simple selectors without a combinator, optionally chained to the
/// compound that follows it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompoundSelector {
    components: Vec<Component>,
    child: Option<(Combinator, Box<CompoundSelector>)>,
}

impl CompoundSelector {
    pub fn new(components: Vec<Component>) -> CompoundSelector {
        CompoundSelector {
            components,
            child: None,
        }
    }

    pub fn with_child(mut self, combinator: Combinator, child: CompoundSelector) -> CompoundSelector {
        self.child = Some((combinator, Box::new(child)));
        self
    }

    pub fn components(&self) -> &[Component] {
        &self.components
    }

    pub fn child(&self) -> Option<(Combinator, &CompoundSelector)> {
        self.child
            .as_ref()
            .map(|(combinator, child)| (*combinator, child.as_ref()))
    }
}

/// A complex selector: the chain of compounds plus the text handed to the
/// document query engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    text: String,
    head: CompoundSelector,
}

impl Selector {
    pub fn new(text: String, head: CompoundSelector) -> Selector {
        Selector { text, head }
    }

    /// Parses a comma separated selector list, e.g. a style rule prelude.
    pub fn parse_list(input: &str) -> Result<Vec<Selector>, String> {
        super::parser::parse_selector_list(input)
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn head(&self) -> &CompoundSelector {
        &self.head
    }

    /// Iterates over the compounds from left to right.
    pub fn compounds(&self) -> impl Iterator<Item = &CompoundSelector> {
        std::iter::successors(Some(&self.head), |compound| {
            compound.child().map(|(_, child)| child)
        })
    }

    /// Two selectors are equivalent when their text matches ignoring case.
    pub fn is_equivalent(&self, other: &Selector) -> bool {
        self.text.to_lowercase() == other.text.to_lowercase()
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compounds_follow_the_child_chain() {
        let head = CompoundSelector::new(vec![Component::Element("ul".to_owned())]).with_child(
            Combinator::Child,
            CompoundSelector::new(vec![Component::Element("li".to_owned())]),
        );
        let selector = Selector::new("ul > li".to_owned(), head);

        let names = selector
            .compounds()
            .map(|compound| compound.components()[0].clone())
            .collect::<Vec<_>>();

        assert_eq!(
            names,
            vec![
                Component::Element("ul".to_owned()),
                Component::Element("li".to_owned())
            ]
        );
    }

    #[test]
    fn equivalence_ignores_case() {
        let a = Selector::new("#MyDiv".to_owned(), CompoundSelector::default());
        let b = Selector::new("#mydiv".to_owned(), CompoundSelector::default());
        let c = Selector::new("#other".to_owned(), CompoundSelector::default());

        assert!(a.is_equivalent(&b));
        assert!(!a.is_equivalent(&c));
    }
}
