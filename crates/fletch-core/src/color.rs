//! Color handling for connector diagrams
//!
//! Two kinds of color values flow through Fletch:
//!
//! - [`Color`] wraps `DynamicColor` from the color crate and is used wherever
//!   a concrete, validated CSS color is required (configuration, export
//!   backgrounds).
//! - [`ColorToken`] is what a connection carries: either a literal CSS color
//!   or a `var(--name)` reference into the host's resolved style variables.
//!   Tokens are resolved against a [`VariableLookup`] on every draw so that
//!   theme switches show up without rebuilding anything.

use std::{fmt, str::FromStr};

use color::DynamicColor;
use log::warn;
use serde::{Deserialize, Deserializer};
use thiserror::Error;
use winnow::{
    Parser as _,
    ascii::multispace0,
    combinator::{eof, opt, preceded, terminated},
    error::{ContextError, ErrMode},
    token::{rest, take_while},
};

/// Wrapper around the `DynamicColor` type from the color crate
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Color {
    color: DynamicColor,
}

impl Color {
    /// Create a new `Color` from a string
    /// This will parse CSS color strings such as "#ff0000", "rgb(255, 0, 0)", "red", etc.
    ///
    /// # Examples
    ///
    /// ```
    /// use fletch_core::color::Color;
    ///
    /// let red = Color::new("#ff0000").unwrap();
    /// let blue = Color::new("blue").unwrap();
    /// ```
    pub fn new(color_str: &str) -> Result<Self, String> {
        match DynamicColor::from_str(color_str) {
            Ok(color) => Ok(Self { color }),
            Err(err) => Err(format!("invalid color `{color_str}`: {err}")),
        }
    }

    /// Returns the alpha (transparency) component of this color.
    pub fn alpha(&self) -> f32 {
        self.color.components[3]
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::new("black").expect("'black' is a valid CSS color")
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.color)
    }
}

impl From<&Color> for svg::node::Value {
    fn from(color: &Color) -> Self {
        Self::from(color.to_string())
    }
}

/// Source of resolved style variables, such as the computed style of a
/// document root.
///
/// Names are passed with their leading `--`, exactly as they appear inside
/// `var(...)`.
pub trait VariableLookup {
    /// Returns the current value of the variable `name`, if registered.
    fn lookup(&self, name: &str) -> Option<String>;
}

impl<F> VariableLookup for F
where
    F: Fn(&str) -> Option<String>,
{
    fn lookup(&self, name: &str) -> Option<String> {
        self(name)
    }
}

/// Error returned when a color token cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorTokenError {
    #[error("empty color token")]
    Empty,

    #[error("malformed variable reference `{0}`, expected `var(--name)` or `var(--name, fallback)`")]
    MalformedVariable(String),
}

/// A connection color: a literal CSS color or a reference to a style variable.
///
/// # Examples
///
/// ```
/// use fletch_core::color::ColorToken;
///
/// let literal: ColorToken = "#f59e0b".parse().unwrap();
/// assert!(!literal.is_variable());
///
/// let variable: ColorToken = "var(--flow-yes)".parse().unwrap();
/// assert_eq!(variable.variable_name(), Some("--flow-yes"));
///
/// let lookup = |name: &str| (name == "--flow-yes").then(|| "#16a34a".to_string());
/// assert_eq!(variable.resolve(&lookup), "#16a34a");
/// assert_eq!(literal.resolve(&lookup), "#f59e0b");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColorToken {
    /// A color used as-is.
    Literal(String),
    /// A `var(--name)` reference with an optional fallback, which may itself
    /// be another `var(...)` reference.
    Variable {
        name: String,
        fallback: Option<Box<ColorToken>>,
    },
}

type IResult<O> = Result<O, ErrMode<ContextError>>;

fn variable_name<'s>(input: &mut &'s str) -> IResult<&'s str> {
    ("--", take_while(1.., |c: char| c.is_ascii_alphanumeric() || c == '-' || c == '_'))
        .take()
        .parse_next(input)
}

/// Parses the inside of `var( ... )`, with the closing parenthesis already removed.
fn variable_body<'s>(input: &mut &'s str) -> IResult<(&'s str, Option<&'s str>)> {
    terminated(
        (
            preceded(multispace0, variable_name),
            preceded(multispace0, opt(preceded(',', rest))),
        ),
        eof,
    )
    .parse_next(input)
}

impl ColorToken {
    /// Creates a literal token.
    pub fn literal(value: impl Into<String>) -> Self {
        Self::Literal(value.into())
    }

    /// Creates a variable reference token without fallback.
    ///
    /// The leading `--` is added when missing.
    pub fn variable(name: impl Into<String>) -> Self {
        let name = name.into();
        let name = if name.starts_with("--") {
            name
        } else {
            format!("--{name}")
        };
        Self::Variable {
            name,
            fallback: None,
        }
    }

    /// Returns true for `var(...)` tokens.
    pub fn is_variable(&self) -> bool {
        matches!(self, Self::Variable { .. })
    }

    /// Returns the referenced variable name, including its leading `--`.
    pub fn variable_name(&self) -> Option<&str> {
        match self {
            Self::Variable { name, .. } => Some(name),
            Self::Literal(_) => None,
        }
    }

    /// Returns the literal this token ends in once every variable along its
    /// fallback chain is unset, or `None` when the chain ends in a variable
    /// without fallback.
    ///
    /// ```
    /// use fletch_core::color::ColorToken;
    ///
    /// let token: ColorToken = "var(--flow-yes, var(--flow-link, #64748b))".parse().unwrap();
    /// assert_eq!(token.final_literal(), Some("#64748b"));
    /// assert_eq!(ColorToken::variable("--flow-no").final_literal(), None);
    /// ```
    pub fn final_literal(&self) -> Option<&str> {
        match self {
            Self::Literal(value) => Some(value),
            Self::Variable { fallback, .. } => fallback.as_deref()?.final_literal(),
        }
    }

    /// Resolves the token to a literal color string.
    ///
    /// Literals pass through unchanged. Variables resolve to the trimmed
    /// value reported by `lookup`; an unregistered or blank variable falls
    /// back to the token's fallback, resolved the same way, and to an empty
    /// string when there is none. An empty result is not an error: the caller draws with whatever
    /// the backend makes of it.
    pub fn resolve(&self, lookup: &impl VariableLookup) -> String {
        match self {
            Self::Literal(value) => value.clone(),
            Self::Variable { name, fallback } => {
                let value = lookup
                    .lookup(name)
                    .map(|value| value.trim().to_string())
                    .filter(|value| !value.is_empty());

                match (value, fallback) {
                    (Some(value), _) => value,
                    (None, Some(fallback)) => fallback.resolve(lookup),
                    (None, None) => {
                        warn!(variable = name.as_str(); "Style variable is not registered");
                        String::new()
                    }
                }
            }
        }
    }
}

impl FromStr for ColorToken {
    type Err = ColorTokenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(ColorTokenError::Empty);
        }

        let Some(after_prefix) = trimmed.strip_prefix("var(") else {
            return Ok(Self::Literal(trimmed.to_string()));
        };

        let malformed = || ColorTokenError::MalformedVariable(trimmed.to_string());
        let mut body = after_prefix.strip_suffix(')').ok_or_else(malformed)?;
        let (name, fallback) = variable_body(&mut body).map_err(|_| malformed())?;

        let fallback = match fallback.map(str::trim) {
            Some(fallback) if !fallback.is_empty() => {
                let fallback: ColorToken = fallback.parse().map_err(|_| malformed())?;
                Some(Box::new(fallback))
            }
            _ => None,
        };

        Ok(Self::Variable {
            name: name.to_string(),
            fallback,
        })
    }
}

impl fmt::Display for ColorToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(value) => f.write_str(value),
            Self::Variable {
                name,
                fallback: None,
            } => write!(f, "var({name})"),
            Self::Variable {
                name,
                fallback: Some(fallback),
            } => write!(f, "var({name}, {fallback})"),
        }
    }
}

impl<'de> Deserialize<'de> for ColorToken {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
