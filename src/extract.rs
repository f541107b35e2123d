// src/extract.rs

use regex::Regex;
use scraper::ElementRef;
use std::fmt;

use crate::error::ScrapeError;

/// How a single attribute has to look for an element to match.
#[derive(Debug, Clone)]
pub enum AttrMatch {
    /// Whole attribute value equals.
    Equals(String),
    /// One of the whitespace-separated tokens equals (for `class`).
    Token(String),
    /// Attribute value matches the regex.
    Pattern(Regex),
}

impl AttrMatch {
    fn is_match(&self, value: &str) -> bool {
        match self {
            AttrMatch::Equals(v) => value == v,
            AttrMatch::Token(v) => value.split_whitespace().any(|t| t == v),
            AttrMatch::Pattern(re) => re.is_match(value),
        }
    }
}

/// A tag name plus attribute constraints, e.g.
/// `Query::tag("div").class("toctree-wrapper")`.
#[derive(Debug, Clone)]
pub struct Query {
    tag: &'static str,
    attrs: Vec<(&'static str, AttrMatch)>,
}

impl Query {
    pub fn tag(tag: &'static str) -> Self {
        Self {
            tag,
            attrs: Vec::new(),
        }
    }

    pub fn attr(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.attrs.push((name, AttrMatch::Equals(value.into())));
        self
    }

    pub fn class(mut self, class: impl Into<String>) -> Self {
        self.attrs.push(("class", AttrMatch::Token(class.into())));
        self
    }

    pub fn attr_matching(mut self, name: &'static str, pattern: Regex) -> Self {
        self.attrs.push((name, AttrMatch::Pattern(pattern)));
        self
    }

    pub fn matches(&self, el: &ElementRef) -> bool {
        let value = el.value();
        value.name() == self.tag
            && self
                .attrs
                .iter()
                .all(|(name, m)| value.attr(name).is_some_and(|v| m.is_match(v)))
    }

    fn missing(&self) -> ScrapeError {
        ScrapeError::MissingNode {
            tag: self.tag.to_string(),
            attrs: self.to_string(),
        }
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (name, m) in &self.attrs {
            match m {
                AttrMatch::Equals(v) => write!(f, "[{}={:?}]", name, v)?,
                AttrMatch::Token(v) => write!(f, "[{}~={:?}]", name, v)?,
                AttrMatch::Pattern(re) => write!(f, "[{}=/{}/]", name, re.as_str())?,
            }
        }
        Ok(())
    }
}

/// Descendants of `root` (not `root` itself) matching `query`, in document order.
pub fn find_all<'a>(root: ElementRef<'a>, query: &Query) -> Vec<ElementRef<'a>> {
    root.descendants()
        .skip(1)
        .filter_map(ElementRef::wrap)
        .filter(|el| query.matches(el))
        .collect()
}

/// First matching descendant, if any.
pub fn find<'a>(root: ElementRef<'a>, query: &Query) -> Option<ElementRef<'a>> {
    root.descendants()
        .skip(1)
        .filter_map(ElementRef::wrap)
        .find(|el| query.matches(el))
}

/// First matching descendant. Absence means the page layout changed, which
/// is not something a later retry would fix, so it is an error.
pub fn find_required<'a>(
    root: ElementRef<'a>,
    query: &Query,
) -> Result<ElementRef<'a>, ScrapeError> {
    find(root, query).ok_or_else(|| query.missing())
}

pub fn attr_required<'a>(el: ElementRef<'a>, name: &str) -> Result<&'a str, ScrapeError> {
    el.value().attr(name).ok_or_else(|| ScrapeError::MissingAttr {
        tag: el.value().name().to_string(),
        attr: name.to_string(),
    })
}

/// All text below `el`, concatenated as-is.
pub fn text_of(el: ElementRef) -> String {
    el.text().collect()
}
