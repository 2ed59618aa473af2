//! Route template compilation.
//!
//! A route template is a path with named placeholders:
//!
//! ```text
//! /gallery/{page}
//! /article/{id:number}/{title}.html
//! /files/{rest:any}
//! ```
//!
//! [`compile`] turns it into an anchored [`Regex`] with one capture group
//! per placeholder, plus the ordered placeholder list that maps capture
//! group *i* back to its name, plus the segments needed to rebuild a URL.
//!
//! Only `.`, `+`, `*` and `$` are escaped in literal text; every other
//! character reaches the regex engine untouched, so templates may carry
//! small regex fragments. A single trailing slash is always optional.

use crate::error::RouterError;
use crate::trace_log;
use regex::Regex;

/// Placeholder delimiters. Defaults to `{` and `}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delimiters {
    pub open: String,
    pub close: String,
}

impl Delimiters {
    /// Create custom delimiters, e.g. `Delimiters::new("<", ">")`.
    pub fn new(open: impl Into<String>, close: impl Into<String>) -> Self {
        Self {
            open: open.into(),
            close: close.into(),
        }
    }
}

impl Default for Delimiters {
    fn default() -> Self {
        Self::new("{", "}")
    }
}

/// The set of characters a placeholder accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParamRule {
    /// Slug characters `[0-9a-zA-Z_%+-]`, one or more. The default.
    #[default]
    Slug,
    /// Decimal digits, one or more.
    Number,
    /// Anything, one or more characters (slashes included).
    Any,
}

impl ParamRule {
    fn from_name(name: &str) -> Option<Self> {
        match name {
            "string" | "slug" => Some(Self::Slug),
            "number" => Some(Self::Number),
            "any" => Some(Self::Any),
            _ => None,
        }
    }

    /// The capture group inserted into the match pattern.
    pub fn capture_group(self) -> &'static str {
        match self {
            Self::Slug => "([0-9a-zA-Z_%+-]+)",
            Self::Number => "([0-9]+)",
            Self::Any => "(.+)",
        }
    }

    /// Whether an already-encoded value can be captured back by this rule.
    pub fn accepts(self, value: &str) -> bool {
        if value.is_empty() {
            return false;
        }
        match self {
            Self::Slug => value
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '%' | '+' | '-')),
            Self::Number => value.chars().all(|c| c.is_ascii_digit()),
            Self::Any => true,
        }
    }
}

/// A named placeholder of a template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder {
    pub name: String,
    pub rule: ParamRule,
}

/// One piece of a template, used for URL reconstruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Literal(String),
    /// Index into [`CompiledPattern::placeholders`].
    Param(usize),
}

/// A template compiled once at registration and matched many times.
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    regex: Regex,
    placeholders: Vec<Placeholder>,
    segments: Vec<Segment>,
}

impl CompiledPattern {
    /// The anchored match pattern.
    pub fn regex(&self) -> &Regex {
        &self.regex
    }

    /// Placeholders in template order; capture group `i + 1` holds placeholder `i`.
    pub fn placeholders(&self) -> &[Placeholder] {
        &self.placeholders
    }

    /// Literal and placeholder segments in template order.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Whether `name` is one of this template's placeholders.
    pub fn has_placeholder(&self, name: &str) -> bool {
        self.placeholders.iter().any(|p| p.name == name)
    }

    /// Match a full path and return captured values paired with their names.
    ///
    /// Group 0 (the whole match) is never returned.
    pub fn captures<'p>(&'p self, path: &str) -> Option<Vec<(&'p str, String)>> {
        let caps = self.regex.captures(path)?;
        Some(
            self.placeholders
                .iter()
                .enumerate()
                .filter_map(|(i, placeholder)| {
                    caps.get(i + 1)
                        .map(|m| (placeholder.name.as_str(), m.as_str().to_string()))
                })
                .collect(),
        )
    }
}

/// Compile a route template.
///
/// # Examples
///
/// ```
/// use page_navigator::pattern::{compile, Delimiters};
///
/// let pattern = compile("/gallery/{page}", &Delimiters::default()).unwrap();
/// assert_eq!(pattern.regex().as_str(), "^/gallery/([0-9a-zA-Z_%+-]+)/?$");
/// assert!(pattern.regex().is_match("/gallery/2/"));
/// ```
pub fn compile(template: &str, delimiters: &Delimiters) -> Result<CompiledPattern, RouterError> {
    if delimiters.open.is_empty() || delimiters.close.is_empty() {
        return Err(RouterError::InvalidTemplate {
            template: template.to_string(),
            message: "placeholder delimiters must not be empty".to_string(),
        });
    }

    let mut placeholders = Vec::new();
    let mut segments = Vec::new();
    let mut source = String::from("^");
    let mut rest = template;

    loop {
        let Some(start) = rest.find(delimiters.open.as_str()) else {
            break;
        };
        let after_open = &rest[start + delimiters.open.len()..];
        // An unterminated placeholder ends the scan; the remainder stays literal.
        let Some(end) = after_open.find(delimiters.close.as_str()) else {
            break;
        };

        let literal = &rest[..start];
        push_literal(&mut source, &mut segments, literal);

        let placeholder = parse_placeholder(template, &after_open[..end])?;
        source.push_str(placeholder.rule.capture_group());
        segments.push(Segment::Param(placeholders.len()));
        placeholders.push(placeholder);

        rest = &after_open[end + delimiters.close.len()..];
    }

    let tail = rest.strip_suffix('/').unwrap_or(rest);
    push_literal(&mut source, &mut segments, tail);
    if tail.len() != rest.len() {
        segments.push(Segment::Literal("/".to_string()));
    }
    source.push_str("/?$");

    let regex = Regex::new(&source).map_err(|err| RouterError::InvalidTemplate {
        template: template.to_string(),
        message: err.to_string(),
    })?;

    trace_log!(
        "Compiled template '{}' to '{}' ({} placeholders)",
        template,
        regex.as_str(),
        placeholders.len()
    );

    Ok(CompiledPattern {
        regex,
        placeholders,
        segments,
    })
}

fn push_literal(source: &mut String, segments: &mut Vec<Segment>, literal: &str) {
    if literal.is_empty() {
        return;
    }
    for ch in literal.chars() {
        if matches!(ch, '.' | '+' | '*' | '$') {
            source.push('\\');
        }
        source.push(ch);
    }
    segments.push(Segment::Literal(literal.to_string()));
}

fn parse_placeholder(template: &str, inner: &str) -> Result<Placeholder, RouterError> {
    let (name, rule) = match inner.split_once(':') {
        Some((name, rule_name)) => {
            let rule =
                ParamRule::from_name(rule_name).ok_or_else(|| RouterError::UnknownParamRule {
                    template: template.to_string(),
                    rule: rule_name.to_string(),
                })?;
            (name, rule)
        }
        None => (inner, ParamRule::Slug),
    };

    Ok(Placeholder {
        name: name.to_string(),
        rule,
    })
}
