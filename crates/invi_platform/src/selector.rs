//! Simple CSS selectors
//!
//! Supports what widget configurations use: type (`li`), universal (`*`),
//! id (`#slides`), class (`.active`) and attribute (`[data-slide]`,
//! `[data-slide=2]`) selectors, combined into compounds and joined by the
//! descendant combinator (`section .item`).

/// Element data a selector is matched against
pub(crate) trait Matchable {
    fn tag(&self) -> &str;
    fn id(&self) -> Option<&str>;
    fn has_class(&self, class: &str) -> bool;
    fn attribute(&self, name: &str) -> Option<&str>;
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
struct Compound {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
    attributes: Vec<(String, Option<String>)>,
}

impl Compound {
    fn matches<M: Matchable + ?Sized>(&self, element: &M) -> bool {
        if let Some(tag) = &self.tag {
            if !tag.eq_ignore_ascii_case(element.tag()) {
                return false;
            }
        }
        if let Some(id) = &self.id {
            if element.id() != Some(id.as_str()) {
                return false;
            }
        }
        if !self.classes.iter().all(|class| element.has_class(class)) {
            return false;
        }
        self.attributes
            .iter()
            .all(|(name, expected)| match (element.attribute(name), expected) {
                (None, _) => false,
                (Some(_), None) => true,
                (Some(actual), Some(expected)) => actual == expected,
            })
    }
}

/// A parsed selector
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Selector {
    /// Compounds from outermost ancestor to subject
    parts: Vec<Compound>,
}

impl Selector {
    /// Parse a selector; `None` if it uses unsupported syntax
    pub fn parse(source: &str) -> Option<Self> {
        let parts = source
            .split_whitespace()
            .map(parse_compound)
            .collect::<Option<Vec<_>>>()?;
        if parts.is_empty() {
            return None;
        }
        Some(Self { parts })
    }

    /// Match `element`, whose ancestors are yielded nearest first
    pub(crate) fn matches<'a, M, I>(&self, element: &M, mut ancestors: I) -> bool
    where
        M: Matchable + ?Sized + 'a,
        I: Iterator<Item = &'a M>,
    {
        let Some((subject, rest)) = self.parts.split_last() else {
            return false;
        };
        if !subject.matches(element) {
            return false;
        }

        // Descendant combinators only, so greedy right-to-left matching is exact
        let mut pending = rest.iter().rev().peekable();
        while let Some(compound) = pending.peek() {
            match ancestors.next() {
                Some(ancestor) if compound.matches(ancestor) => {
                    pending.next();
                }
                Some(_) => {}
                None => return false,
            }
        }
        true
    }
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_'
}

fn take_ident(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) -> Option<String> {
    let mut ident = String::new();
    while let Some(&c) = chars.peek() {
        if !is_ident_char(c) {
            break;
        }
        ident.push(c);
        chars.next();
    }
    (!ident.is_empty()).then_some(ident)
}

fn parse_compound(source: &str) -> Option<Compound> {
    let mut compound = Compound::default();
    let mut chars = source.chars().peekable();

    match chars.peek() {
        Some('*') => {
            chars.next();
        }
        Some(&c) if is_ident_char(c) => compound.tag = take_ident(&mut chars),
        _ => {}
    }

    while let Some(c) = chars.next() {
        match c {
            '#' => compound.id = Some(take_ident(&mut chars)?),
            '.' => compound.classes.push(take_ident(&mut chars)?),
            '[' => {
                let name = take_ident(&mut chars)?;
                let value = match chars.next()? {
                    ']' => None,
                    '=' => {
                        let mut value = String::new();
                        loop {
                            match chars.next()? {
                                ']' => break,
                                '"' | '\'' => {}
                                c => value.push(c),
                            }
                        }
                        Some(value)
                    }
                    _ => return None,
                };
                compound.attributes.push((name, value));
            }
            _ => return None,
        }
    }
    Some(compound)
}
