mod parser;
pub mod selectors;
pub mod source;
pub mod specificity;

use crate::error::{InlinerError, Result};
use cssparser::{
    AtRuleType, CowRcStr, DeclarationListParser, ParseError, ParseErrorKind, Parser, ParserInput,
    RuleListParser, SourceLocation, Token,
};
use log::debug;
use self::selectors::Selector;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_RULE_SET_ID: AtomicU64 = AtomicU64::new(0);

/// Identity of a parsed rule set, shared by its clones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RuleSetId(u64);

/// A single `name: value` pair of a style rule. The value is kept as the
/// literal source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    name: String,
    value: String,
    important: bool,
}

impl Declaration {
    pub fn new(name: impl Into<String>, value: impl Into<String>, important: bool) -> Declaration {
        Declaration {
            name: name.into(),
            value: value.into(),
            important,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn is_important(&self) -> bool {
        self.important
    }
}

impl fmt::Display for Declaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.value)?;
        if self.important {
            f.write_str(" !important")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct RuleSet {
    id: RuleSetId,
    selectors: Vec<Selector>,
    declarations: Vec<Declaration>,
}

impl RuleSet {
    pub fn new(selectors: Vec<Selector>, declarations: Vec<Declaration>) -> RuleSet {
        RuleSet {
            id: RuleSetId(NEXT_RULE_SET_ID.fetch_add(1, Ordering::Relaxed)),
            selectors,
            declarations,
        }
    }

    pub fn id(&self) -> RuleSetId {
        self.id
    }

    pub fn selectors(&self) -> &[Selector] {
        &self.selectors
    }

    pub fn declarations(&self) -> &[Declaration] {
        &self.declarations
    }

    /// Rule sets are equivalent when they have the same selectors, position for
    /// position, ignoring case. Declarations are not compared.
    pub fn is_equivalent(&self, other: &RuleSet) -> bool {
        self.id == other.id
            || (self.selectors.len() == other.selectors.len()
                && self
                    .selectors
                    .iter()
                    .zip(&other.selectors)
                    .all(|(a, b)| a.is_equivalent(b)))
    }
}

impl fmt::Display for RuleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, selector) in self.selectors.iter().enumerate() {
            if index > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", selector)?;
        }
        f.write_str(" {")?;
        for declaration in &self.declarations {
            write!(f, " {};", declaration)?;
        }
        f.write_str(" }")
    }
}

#[derive(Debug)]
enum StylesheetError {
    InvalidSelector(String),
    EmptyValue,
}

type StylesheetParseError<'i> = ParseError<'i, StylesheetError>;

enum ParsedRule {
    /// A style rule together with the declaration errors found inside its block.
    RuleSet(RuleSet, Vec<String>),
    Skipped,
}

struct StylesheetParser;

impl<'i> cssparser::AtRuleParser<'i> for StylesheetParser {
    type PreludeNoBlock = ();
    type PreludeBlock = ();
    type AtRule = ParsedRule;
    type Error = StylesheetError;

    fn parse_prelude<'t>(
        &mut self,
        name: CowRcStr<'i>,
        input: &mut Parser<'i, 't>,
    ) -> std::result::Result<AtRuleType<(), ()>, StylesheetParseError<'i>> {
        while input.next().is_ok() {}
        debug!("Skipping @{} rule.", &*name);

        if ["charset", "import", "namespace"]
            .iter()
            .any(|statement| name.eq_ignore_ascii_case(statement))
        {
            Ok(AtRuleType::WithoutBlock(()))
        } else {
            Ok(AtRuleType::WithBlock(()))
        }
    }

    fn rule_without_block(&mut self, _prelude: (), _location: SourceLocation) -> ParsedRule {
        ParsedRule::Skipped
    }

    fn parse_block<'t>(
        &mut self,
        _prelude: (),
        _location: SourceLocation,
        input: &mut Parser<'i, 't>,
    ) -> std::result::Result<ParsedRule, StylesheetParseError<'i>> {
        while input.next().is_ok() {}
        Ok(ParsedRule::Skipped)
    }
}

impl<'i> cssparser::QualifiedRuleParser<'i> for StylesheetParser {
    type Prelude = Vec<Selector>;
    type QualifiedRule = ParsedRule;
    type Error = StylesheetError;

    #[inline]
    fn parse_prelude<'t>(
        &mut self,
        input: &mut Parser<'i, 't>,
    ) -> std::result::Result<Self::Prelude, StylesheetParseError<'i>> {
        let location = input.current_source_location();
        let position = input.position();
        while input.next().is_ok() {}
        Selector::parse_list(input.slice_from(position))
            .map_err(|message| location.new_custom_error(StylesheetError::InvalidSelector(message)))
    }

    #[inline]
    fn parse_block<'t>(
        &mut self,
        selectors: Self::Prelude,
        _location: SourceLocation,
        input: &mut Parser<'i, 't>,
    ) -> std::result::Result<ParsedRule, StylesheetParseError<'i>> {
        let (declarations, errors) = parse_declarations(input);
        Ok(ParsedRule::RuleSet(
            RuleSet::new(selectors, declarations),
            errors,
        ))
    }
}

struct PropertyDeclarationParser;

impl<'i> cssparser::DeclarationParser<'i> for PropertyDeclarationParser {
    type Declaration = Declaration;
    type Error = StylesheetError;

    fn parse_value<'t>(
        &mut self,
        name: CowRcStr<'i>,
        input: &mut Parser<'i, 't>,
    ) -> std::result::Result<Declaration, StylesheetParseError<'i>> {
        let start = input.position();
        let mut value_end = None;
        let mut important = false;

        loop {
            let before = input.position();
            let location = input.current_source_location();
            let token = match input.next() {
                Ok(token) => token.clone(),
                Err(_) => break,
            };

            // nothing may follow `!important`
            if important {
                return Err(location.new_unexpected_token_error(token));
            }

            if let Token::Delim('!') = token {
                value_end = Some(before);
                let location = input.current_source_location();
                match input.next()?.clone() {
                    Token::Ident(ref word) if word.eq_ignore_ascii_case("important") => {
                        important = true
                    }
                    other => return Err(location.new_unexpected_token_error(other)),
                }
            }
        }

        let value = match value_end {
            Some(end) => input.slice(start..end),
            None => input.slice_from(start),
        }
        .trim();

        if value.is_empty() {
            return Err(input.new_custom_error(StylesheetError::EmptyValue));
        }

        Ok(Declaration::new(&*name, value, important))
    }
}

impl<'i> cssparser::AtRuleParser<'i> for PropertyDeclarationParser {
    type PreludeBlock = ();
    type PreludeNoBlock = ();
    type AtRule = Declaration;
    type Error = StylesheetError;

    // Default methods reject everything.
}

fn parse_declarations(input: &mut Parser<'_, '_>) -> (Vec<Declaration>, Vec<String>) {
    let mut declarations = Vec::new();
    let mut errors = Vec::new();

    for declaration in DeclarationListParser::new(input, PropertyDeclarationParser) {
        match declaration {
            Ok(declaration) => declarations.push(declaration),
            Err((err, slice)) => errors.push(describe_error(&err, slice)),
        }
    }

    (declarations, errors)
}

fn describe_error(err: &StylesheetParseError<'_>, slice: &str) -> String {
    let position = format!("{}:{}", err.location.line + 1, err.location.column);

    match &err.kind {
        ParseErrorKind::Custom(StylesheetError::InvalidSelector(message)) => {
            format!("{}: {}", position, message)
        }
        ParseErrorKind::Custom(StylesheetError::EmptyValue) => {
            format!("{}: declaration \"{}\" has no value", position, slice.trim())
        }
        ParseErrorKind::Basic(kind) => {
            format!("{}: {:?} in \"{}\"", position, kind, slice.trim())
        }
    }
}

/// Parses a whole stylesheet into rule sets in textual order.
///
/// At-rules are skipped. Every syntax error in the input is collected, and if
/// there were any, the parse fails with all of them.
pub fn parse_stylesheet(css: &str) -> Result<Vec<RuleSet>> {
    let mut parser_input = ParserInput::new(css);
    let mut parser = Parser::new(&mut parser_input);

    let mut rule_sets = Vec::new();
    let mut errors = Vec::new();

    for rule in RuleListParser::new_for_stylesheet(&mut parser, StylesheetParser) {
        match rule {
            Ok(ParsedRule::RuleSet(rule_set, declaration_errors)) => {
                errors.extend(declaration_errors);
                rule_sets.push(rule_set);
            }
            Ok(ParsedRule::Skipped) => {}
            Err((err, slice)) => errors.push(describe_error(&err, slice)),
        }
    }

    if !errors.is_empty() {
        return Err(InlinerError::Parse(errors));
    }

    debug!("Parsed {} rule sets.", rule_sets.len());

    Ok(rule_sets)
}
