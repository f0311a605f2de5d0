//! Compound selectors: `tag.class.other[attr="value"]`.
//!
//! Only a single compound selector is supported, no combinators or lists.
//! That covers what the document needs for delegation and correlation
//! lookups.

use std::fmt;
use std::str::FromStr;

use crate::DomError;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum AttrTest {
    Present(String),
    Equals(String, String),
}

/// A parsed compound selector.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Selector {
    tag: Option<String>,
    classes: Vec<String>,
    attributes: Vec<AttrTest>,
}

impl Selector {
    /// Parse a selector string.
    pub fn parse(source: &str) -> Result<Self, DomError> {
        Parser::new(source).parse()
    }

    /// Build the conjunctive class selector for a space separated class list.
    ///
    /// `"js-item  extra"` becomes `.js-item.extra`: an element must carry
    /// every listed class to match.
    pub fn from_classes(classes: &str) -> Self {
        Self {
            classes: classes.split_whitespace().map(str::to_string).collect(),
            ..Default::default()
        }
    }

    /// Test an element described by its tag, class list and attribute lookup.
    pub(crate) fn matches_parts<'a>(
        &self,
        tag: &str,
        classes: impl Fn(&str) -> bool,
        attr: impl Fn(&str) -> Option<&'a str>,
    ) -> bool {
        if let Some(expected) = &self.tag {
            if expected != tag {
                return false;
            }
        }
        if !self.classes.iter().all(|c| classes(c)) {
            return false;
        }
        self.attributes.iter().all(|test| match test {
            AttrTest::Present(name) => attr(name).is_some(),
            AttrTest::Equals(name, value) => attr(name) == Some(value.as_str()),
        })
    }
}

impl FromStr for Selector {
    type Err = DomError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(tag) = &self.tag {
            write!(f, "{tag}")?;
        }
        for class in &self.classes {
            write!(f, ".{class}")?;
        }
        for test in &self.attributes {
            match test {
                AttrTest::Present(name) => write!(f, "[{name}]")?,
                AttrTest::Equals(name, value) => {
                    write!(f, "[{name}=\"{}\"]", value.replace('"', "\\\""))?
                }
            }
        }
        if self.tag.is_none() && self.classes.is_empty() && self.attributes.is_empty() {
            write!(f, "*")?;
        }
        Ok(())
    }
}

struct Parser<'a> {
    source: &'a str,
    chars: std::iter::Peekable<std::str::Chars<'a>>,
}

impl<'a> Parser<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            source,
            chars: source.trim().chars().peekable(),
        }
    }

    fn error(&self, reason: impl Into<String>) -> DomError {
        DomError::InvalidSelector {
            selector: self.source.to_string(),
            reason: reason.into(),
        }
    }

    fn parse(mut self) -> Result<Selector, DomError> {
        let mut selector = Selector::default();

        if self.chars.peek().is_none() {
            return Err(self.error("empty selector"));
        }

        match self.chars.peek().copied() {
            Some('*') => {
                self.chars.next();
            }
            Some(c) if is_ident_char(c) => {
                selector.tag = Some(self.ident()?.to_ascii_lowercase());
            }
            _ => {}
        }

        while let Some(c) = self.chars.next() {
            match c {
                '.' => selector.classes.push(self.ident()?),
                '[' => selector.attributes.push(self.attribute()?),
                other => return Err(self.error(format!("unexpected character {other:?}"))),
            }
        }

        Ok(selector)
    }

    fn ident(&mut self) -> Result<String, DomError> {
        let mut ident = String::new();
        while let Some(&c) = self.chars.peek() {
            if !is_ident_char(c) {
                break;
            }
            ident.push(c);
            self.chars.next();
        }
        if ident.is_empty() {
            return Err(self.error("expected an identifier"));
        }
        Ok(ident)
    }

    fn attribute(&mut self) -> Result<AttrTest, DomError> {
        let name = self.ident()?.to_ascii_lowercase();
        match self.chars.next() {
            Some(']') => Ok(AttrTest::Present(name)),
            Some('=') => {
                let value = match self.chars.peek().copied() {
                    Some(quote @ ('"' | '\'')) => {
                        self.chars.next();
                        self.quoted(quote)?
                    }
                    _ => self.ident()?,
                };
                match self.chars.next() {
                    Some(']') => Ok(AttrTest::Equals(name, value)),
                    _ => Err(self.error("expected ']'")),
                }
            }
            _ => Err(self.error("expected ']' or '='")),
        }
    }

    fn quoted(&mut self, quote: char) -> Result<String, DomError> {
        let mut value = String::new();
        while let Some(c) = self.chars.next() {
            match c {
                '\\' => match self.chars.next() {
                    Some(escaped) => value.push(escaped),
                    None => break,
                },
                c if c == quote => return Ok(value),
                c => value.push(c),
            }
        }
        Err(self.error("unterminated string"))
    }
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '-' || c == '_'
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_classes_collapses_whitespace() {
        let selector = Selector::from_classes("  js-created-list__item   extra ");
        assert_eq!(selector.to_string(), ".js-created-list__item.extra");
    }

    #[test]
    fn test_parse_compound() {
        let selector = Selector::parse(r#"select.a.b[data-rel="3"][disabled]"#).unwrap();
        assert_eq!(selector.tag.as_deref(), Some("select"));
        assert_eq!(selector.classes, vec!["a", "b"]);
        assert_eq!(
            selector.attributes,
            vec![
                AttrTest::Equals("data-rel".into(), "3".into()),
                AttrTest::Present("disabled".into()),
            ]
        );
    }

    #[test]
    fn test_parse_roundtrips_display() {
        let source = r#"li.item[data-val="a b"]"#;
        assert_eq!(Selector::parse(source).unwrap().to_string(), source);
    }

    #[test]
    fn test_parse_rejects_combinators() {
        assert!(Selector::parse("ul li").is_err());
        assert!(Selector::parse("").is_err());
        assert!(Selector::parse(".").is_err());
        assert!(Selector::parse("[data-rel=\"1\"").is_err());
    }
}
