//! Format templates and call-site arguments.
//!
//! A template is parsed once, when its message code is registered, into a list
//! of literal segments and placeholder slots. Rendering then only has to look
//! up one value per slot.
//!
//! Placeholder syntax:
//! - `{name}`: named placeholder, `name` must be an identifier
//! - `{}`: anonymous placeholder, only fillable positionally
//! - `{{` and `}}`: literal braces

use std::collections::BTreeMap;
use std::fmt;

/// Error returned when a format template is malformed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateError {
    /// A `{` with no matching `}`
    UnterminatedPlaceholder { offset: usize },
    /// A single `}` that does not close a placeholder
    UnmatchedClosingBrace { offset: usize },
    /// Placeholder contents are not an identifier
    InvalidPlaceholder { name: String, offset: usize },
}

impl fmt::Display for TemplateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TemplateError::UnterminatedPlaceholder { offset } => {
                write!(f, "unterminated placeholder starting at byte {}", offset)
            }
            TemplateError::UnmatchedClosingBrace { offset } => {
                write!(f, "unmatched '}}' at byte {} (use '}}}}' for a literal brace)", offset)
            }
            TemplateError::InvalidPlaceholder { name, offset } => {
                write!(f, "invalid placeholder name '{}' at byte {}", name, offset)
            }
        }
    }
}

impl std::error::Error for TemplateError {}

/// Error returned when arguments do not fit a template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    /// No argument was supplied for a placeholder
    MissingPlaceholder { placeholder: String },
    /// Positional and named arguments were supplied for the same call
    AmbiguousArguments,
}

impl fmt::Display for FormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormatError::MissingPlaceholder { placeholder } => {
                write!(f, "no value supplied for placeholder {}", placeholder)
            }
            FormatError::AmbiguousArguments => {
                write!(f, "positional and named arguments cannot be mixed in one call")
            }
        }
    }
}

impl std::error::Error for FormatError {}

/// Arguments supplied at a log call site.
///
/// A call uses either positional values or named values, never both. Values
/// are converted to strings when the arguments are built.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Args {
    /// No arguments
    #[default]
    None,
    /// Values filling placeholders in order of first appearance
    Positional(Vec<String>),
    /// Values keyed by placeholder name
    Named(BTreeMap<String, String>),
}

impl Args {
    /// A single free-text value.
    pub fn text(text: impl ToString) -> Self {
        Args::Positional(vec![text.to_string()])
    }

    /// Positional values.
    pub fn positional<I, T>(values: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: ToString,
    {
        Args::Positional(values.into_iter().map(|v| v.to_string()).collect())
    }

    /// Named values.
    pub fn named<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: ToString,
    {
        Args::Named(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.to_string()))
                .collect(),
        )
    }

    /// Combine loosely-typed call-site parts.
    ///
    /// # Errors
    /// Returns `FormatError::AmbiguousArguments` if both parts are non-empty.
    pub fn from_parts(
        positional: Vec<String>,
        named: BTreeMap<String, String>,
    ) -> Result<Self, FormatError> {
        match (positional.is_empty(), named.is_empty()) {
            (true, true) => Ok(Args::None),
            (false, true) => Ok(Args::Positional(positional)),
            (true, false) => Ok(Args::Named(named)),
            (false, false) => Err(FormatError::AmbiguousArguments),
        }
    }

    /// Check if no values were supplied.
    pub fn is_empty(&self) -> bool {
        match self {
            Args::None => true,
            Args::Positional(values) => values.is_empty(),
            Args::Named(values) => values.is_empty(),
        }
    }

    /// First positional value, used as free text for codes without a format.
    pub fn free_text(&self) -> Option<&str> {
        match self {
            Args::Positional(values) => values.first().map(String::as_str),
            _ => None,
        }
    }
}

/// Build [`Args`] at a call site.
///
/// ```
/// use logaroo::{args, Args};
///
/// assert_eq!(args!(), Args::None);
/// assert_eq!(args!("disk full"), Args::text("disk full"));
/// assert_eq!(
///     args!(value1 = 10, value2 = 9),
///     Args::named([("value1", 10), ("value2", 9)]),
/// );
/// ```
#[macro_export]
macro_rules! args {
    () => {
        $crate::Args::None
    };
    ($($name:ident = $value:expr),+ $(,)?) => {
        $crate::Args::named([$((stringify!($name), ::std::string::ToString::to_string(&$value))),+])
    };
    ($($value:expr),+ $(,)?) => {
        $crate::Args::positional([$(::std::string::ToString::to_string(&$value)),+])
    };
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Slot(usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Slot {
    Named(String),
    Anonymous,
}

impl Slot {
    fn label(&self, index: usize) -> String {
        match self {
            Slot::Named(name) => format!("{{{}}}", name),
            Slot::Anonymous => format!("{{}} at position {}", index + 1),
        }
    }
}

/// A parsed format template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    source: String,
    segments: Vec<Segment>,
    slots: Vec<Slot>,
}

impl Template {
    /// Parse a template string.
    ///
    /// # Errors
    /// Returns `TemplateError` for unbalanced braces or non-identifier names.
    pub fn parse(source: &str) -> Result<Self, TemplateError> {
        let mut segments = Vec::new();
        let mut slots: Vec<Slot> = Vec::new();
        let mut literal = String::new();
        let mut chars = source.char_indices().peekable();

        while let Some((offset, c)) = chars.next() {
            match c {
                '{' if matches!(chars.peek(), Some((_, '{'))) => {
                    chars.next();
                    literal.push('{');
                }
                '{' => {
                    let mut name = String::new();
                    let mut closed = false;
                    for (_, inner) in chars.by_ref() {
                        if inner == '}' {
                            closed = true;
                            break;
                        }
                        name.push(inner);
                    }
                    if !closed {
                        return Err(TemplateError::UnterminatedPlaceholder { offset });
                    }

                    let index = if name.is_empty() {
                        slots.push(Slot::Anonymous);
                        slots.len() - 1
                    } else if !is_identifier(&name) {
                        return Err(TemplateError::InvalidPlaceholder { name, offset });
                    } else if let Some(existing) = slots
                        .iter()
                        .position(|slot| matches!(slot, Slot::Named(n) if *n == name))
                    {
                        existing
                    } else {
                        slots.push(Slot::Named(name));
                        slots.len() - 1
                    };

                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    segments.push(Segment::Slot(index));
                }
                '}' if matches!(chars.peek(), Some((_, '}'))) => {
                    chars.next();
                    literal.push('}');
                }
                '}' => return Err(TemplateError::UnmatchedClosingBrace { offset }),
                _ => literal.push(c),
            }
        }

        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        Ok(Self {
            source: source.to_string(),
            segments,
            slots,
        })
    }

    /// The template as written at registration.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Check if the template is the empty string.
    pub fn is_empty(&self) -> bool {
        self.source.is_empty()
    }

    /// Number of distinct placeholder slots.
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// Names of the named placeholders, in order of first appearance.
    pub fn placeholder_names(&self) -> impl Iterator<Item = &str> {
        self.slots.iter().filter_map(|slot| match slot {
            Slot::Named(name) => Some(name.as_str()),
            Slot::Anonymous => None,
        })
    }

    /// Substitute arguments into the template.
    ///
    /// Extra arguments are ignored.
    ///
    /// # Errors
    /// Returns `FormatError::MissingPlaceholder` for the first slot that has
    /// no matching argument.
    pub fn render(&self, args: &Args) -> Result<String, FormatError> {
        let values = self
            .slots
            .iter()
            .enumerate()
            .map(|(index, slot)| Self::resolve(index, slot, args))
            .collect::<Result<Vec<&str>, FormatError>>()?;

        let mut out = String::with_capacity(self.source.len());
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Slot(index) => out.push_str(values[*index]),
            }
        }
        Ok(out)
    }

    fn resolve<'a>(index: usize, slot: &Slot, args: &'a Args) -> Result<&'a str, FormatError> {
        let value = match (args, slot) {
            (Args::Positional(values), _) => values.get(index),
            (Args::Named(values), Slot::Named(name)) => values.get(name),
            (Args::Named(_), Slot::Anonymous) | (Args::None, _) => None,
        };
        value
            .map(String::as_str)
            .ok_or_else(|| FormatError::MissingPlaceholder {
                placeholder: slot.label(index),
            })
    }
}

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_alphabetic() || first == '_' => {
            chars.all(|c| c.is_alphanumeric() || c == '_')
        }
        _ => false,
    }
}
