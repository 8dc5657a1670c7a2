use crate::css::Declaration;
use kuchiki::ElementData;
use std::ops::Range;

#[derive(Debug, Clone, PartialEq, Eq)]
struct Entry {
    name: Range<usize>,
    value: Range<usize>,
}

/// The declarations of a `style` attribute, located by byte range so that a
/// single value can be replaced without touching the rest of the text.
#[derive(Debug, Clone)]
pub struct InlineStyle<'a> {
    text: &'a str,
    entries: Vec<Entry>,
}

impl<'a> InlineStyle<'a> {
    pub fn parse(text: &'a str) -> InlineStyle<'a> {
        let mut entries = Vec::new();
        let mut item_start = 0;
        let mut quote = None;
        let mut depth = 0usize;
        let mut escaped = false;

        for (index, character) in text.char_indices() {
            if escaped {
                escaped = false;
                continue;
            }

            match (quote, character) {
                (_, '\\') => escaped = true,
                (Some(open), _) if character == open => quote = None,
                (Some(_), _) => {}
                (None, '"') | (None, '\'') => quote = Some(character),
                (None, '(') => depth += 1,
                (None, ')') => depth = depth.saturating_sub(1),
                (None, ';') if depth == 0 => {
                    entries.extend(parse_entry(text, item_start..index));
                    item_start = index + 1;
                }
                _ => {}
            }
        }
        entries.extend(parse_entry(text, item_start..text.len()));

        InlineStyle { text, entries }
    }

    /// Whether a declaration for exactly this property name is present.
    pub fn defines(&self, name: &str) -> bool {
        self.find(name).is_some()
    }

    pub fn value(&self, name: &str) -> Option<&'a str> {
        let text = self.text;
        self.find(name).map(|entry| &text[entry.value.clone()])
    }

    pub fn names(&self) -> impl Iterator<Item = &'a str> + '_ {
        let text = self.text;
        self.entries
            .iter()
            .map(move |entry| &text[entry.name.clone()])
    }

    /// Returns the style text with `declaration` applied: the value of the
    /// first entry with the same name is replaced, otherwise the declaration
    /// is appended.
    pub fn with_declaration(&self, declaration: &Declaration) -> String {
        match self.find(declaration.name()) {
            Some(entry) => {
                let mut style = String::with_capacity(self.text.len() + declaration.value().len());
                style.push_str(&self.text[..entry.value.start]);
                style.push_str(declaration.value());
                style.push_str(&self.text[entry.value.end..]);
                style
            }
            None => {
                let mut style = self.text.to_owned();
                let content_len = style.trim_end().len();

                if content_len > 0 {
                    if !style[..content_len].ends_with(';') {
                        style.insert(content_len, ';');
                    }
                    if !style.ends_with(char::is_whitespace) {
                        style.push(' ');
                    }
                }

                style.push_str(declaration.name());
                style.push_str(": ");
                style.push_str(declaration.value());
                style.push(';');
                style
            }
        }
    }

    fn find(&self, name: &str) -> Option<&Entry> {
        self.entries
            .iter()
            .find(|entry| &self.text[entry.name.clone()] == name)
    }
}

fn parse_entry(text: &str, item: Range<usize>) -> Option<Entry> {
    let colon = text[item.clone()].find(':')?;
    let name = trim_range(text, item.start..item.start + colon);
    if name.is_empty() {
        return None;
    }

    Some(Entry {
        name,
        value: trim_range(text, item.start + colon + 1..item.end),
    })
}

fn trim_range(text: &str, range: Range<usize>) -> Range<usize> {
    let slice = &text[range.clone()];
    let start = range.start + (slice.len() - slice.trim_start().len());
    start..start + slice.trim().len()
}

/// Writes `declaration` into the element's `style` attribute.
pub fn update_inline_style(element: &ElementData, declaration: &Declaration) {
    let mut attributes = element.attributes.borrow_mut();
    let style = InlineStyle::parse(attributes.get("style").unwrap_or("")).with_declaration(declaration);
    attributes.insert("style", style);
}
