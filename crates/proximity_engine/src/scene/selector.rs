//! Candidate selectors
//!
//! A small subset of CSS-style selectors, enough to pick candidate entities
//! out of a scene:
//!
//! - `*` or an empty string matches every entity
//! - `[name]` matches entities carrying the attribute `name`
//! - `#id` matches the entity whose id is `id`
//! - `a, b` matches entities matching either alternative

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Attribute carried by entities that want to be tested against a probe
pub const LISTENER_ATTRIBUTE: &str = "box-collision-listener";

/// Attribute carried by probe entities
pub const COLLIDER_ATTRIBUTE: &str = "box-collider";

/// Selector parse errors
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SelectorError {
    /// `[]` with nothing inside
    #[error("empty attribute name in selector term `{0}`")]
    EmptyAttribute(String),

    /// `#` with nothing after it
    #[error("empty id in selector term `{0}`")]
    EmptyId(String),

    /// Anything outside the supported grammar
    #[error("unsupported selector term `{0}`")]
    Unsupported(String),
}

/// One alternative of a selector
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SelectorTerm {
    /// `*`
    Any,
    /// `[name]`
    Attribute(String),
    /// `#id`
    Id(String),
}

impl SelectorTerm {
    fn parse(term: &str) -> Result<Self, SelectorError> {
        if term == "*" {
            return Ok(Self::Any);
        }
        if let Some(inner) = term.strip_prefix('[').and_then(|t| t.strip_suffix(']')) {
            let name = inner.trim();
            if name.is_empty() {
                return Err(SelectorError::EmptyAttribute(term.to_string()));
            }
            if name.contains(['[', ']', '=', ' ']) {
                return Err(SelectorError::Unsupported(term.to_string()));
            }
            return Ok(Self::Attribute(name.to_string()));
        }
        if let Some(id) = term.strip_prefix('#') {
            if id.is_empty() {
                return Err(SelectorError::EmptyId(term.to_string()));
            }
            if id.contains(|c: char| c.is_whitespace() || "[]#.,".contains(c)) {
                return Err(SelectorError::Unsupported(term.to_string()));
            }
            return Ok(Self::Id(id.to_string()));
        }
        Err(SelectorError::Unsupported(term.to_string()))
    }

    fn matches(&self, id: Option<&str>, has_attribute: &dyn Fn(&str) -> bool) -> bool {
        match self {
            Self::Any => true,
            Self::Attribute(name) => has_attribute(name),
            Self::Id(wanted) => id == Some(wanted.as_str()),
        }
    }
}

impl fmt::Display for SelectorTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Any => f.write_str("*"),
            Self::Attribute(name) => write!(f, "[{name}]"),
            Self::Id(id) => write!(f, "#{id}"),
        }
    }
}

/// Parsed candidate query
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Selector {
    /// Alternatives; empty means "everything"
    terms: Vec<SelectorTerm>,
}

impl Default for Selector {
    fn default() -> Self {
        Self::attribute(LISTENER_ATTRIBUTE)
    }
}

impl Selector {
    /// Selector matching every entity
    pub fn all() -> Self {
        Self { terms: Vec::new() }
    }

    /// Selector matching entities carrying `name`
    pub fn attribute(name: impl Into<String>) -> Self {
        Self {
            terms: vec![SelectorTerm::Attribute(name.into())],
        }
    }

    /// Selector matching the entity with the given id
    pub fn id(id: impl Into<String>) -> Self {
        Self {
            terms: vec![SelectorTerm::Id(id.into())],
        }
    }

    /// Parse a selector string
    pub fn parse(source: &str) -> Result<Self, SelectorError> {
        let source = source.trim();
        if source.is_empty() {
            return Ok(Self::all());
        }
        let terms = source
            .split(',')
            .map(|term| SelectorTerm::parse(term.trim()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { terms })
    }

    /// True if this selector matches every entity
    pub fn is_all(&self) -> bool {
        self.terms.is_empty() || self.terms.contains(&SelectorTerm::Any)
    }

    /// The parsed alternatives
    pub fn terms(&self) -> &[SelectorTerm] {
        &self.terms
    }

    /// Test an entity described by its id and attribute lookup
    pub fn matches(&self, id: Option<&str>, has_attribute: impl Fn(&str) -> bool) -> bool {
        self.is_all()
            || self
                .terms
                .iter()
                .any(|term| term.matches(id, &has_attribute))
    }
}

impl FromStr for Selector {
    type Err = SelectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Selector {
    type Error = SelectorError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Selector> for String {
    fn from(selector: Selector) -> Self {
        selector.to_string()
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, term) in self.terms.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{term}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attrs(list: &'static [&'static str]) -> impl Fn(&str) -> bool {
        move |name: &str| list.iter().any(|candidate| *candidate == name)
    }

    #[test]
    fn test_default_selects_listeners() {
        let selector = Selector::default();
        assert_eq!(selector.to_string(), "[box-collision-listener]");
        assert!(selector.matches(None, attrs(&[LISTENER_ATTRIBUTE])));
        assert!(!selector.matches(None, attrs(&["visible"])));
    }

    #[test]
    fn test_empty_and_star_match_everything() {
        assert!(Selector::parse("").unwrap().is_all());
        assert!(Selector::parse("  ").unwrap().is_all());
        assert!(Selector::parse("*").unwrap().matches(None, attrs(&[])));
    }

    #[test]
    fn test_id_and_alternatives() {
        let selector = Selector::parse("#door, [pickup]").unwrap();
        assert_eq!(selector.terms().len(), 2);
        assert!(selector.matches(Some("door"), attrs(&[])));
        assert!(selector.matches(Some("coin"), attrs(&["pickup"])));
        assert!(!selector.matches(Some("wall"), attrs(&["static"])));
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(
            Selector::parse("[]"),
            Err(SelectorError::EmptyAttribute("[]".to_string()))
        );
        assert_eq!(Selector::parse("#"), Err(SelectorError::EmptyId("#".to_string())));
        assert!(matches!(
            Selector::parse("div > span"),
            Err(SelectorError::Unsupported(_))
        ));
        assert!(matches!(
            Selector::parse("[a=b]"),
            Err(SelectorError::Unsupported(_))
        ));
    }

    #[test]
    fn test_display_reparses_to_same_selector() {
        let selector = Selector::parse("[a],#b,*").unwrap();
        assert_eq!(Selector::parse(&selector.to_string()).unwrap(), selector);
    }
}
