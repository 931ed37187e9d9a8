//! Registered message definitions.
//!
//! A definition documents one message code: its severity, the template used
//! to render it and a human-written description for the catalog.

use crate::domain::severity::Severity;
use crate::domain::template::{Args, FormatError, Template, TemplateError};
use serde::{Serialize, Serializer};
use std::sync::Arc;

/// Immutable description of one message code.
///
/// # Example
/// ```
/// use logaroo::{args, MessageDefinition, Severity};
///
/// let definition = MessageDefinition::new(
///     "VAL-001",
///     Severity::Warning,
///     "Value comparison failed",
///     Some("Value {value1} is larger than {value2}"),
/// )
/// .unwrap();
///
/// let body = definition.render(&args!(value1 = 10, value2 = 9)).unwrap();
/// assert_eq!(body, "Value 10 is larger than 9");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MessageDefinition {
    code: Arc<str>,
    severity: Severity,
    verbosity: u32,
    #[serde(serialize_with = "serialize_template")]
    format: Template,
    description: String,
}

impl MessageDefinition {
    /// Create a definition, parsing its format template.
    ///
    /// `None` and `Some("")` both mean a free-text code.
    ///
    /// # Errors
    /// Returns `TemplateError` if the format is malformed.
    pub fn new(
        code: impl Into<String>,
        severity: Severity,
        description: impl Into<String>,
        format: Option<&str>,
    ) -> Result<Self, TemplateError> {
        let format = Template::parse(format.unwrap_or_default())?;
        Ok(Self {
            code: Arc::from(code.into()),
            severity,
            verbosity: 0,
            format,
            description: description.into(),
        })
    }

    /// Set the verbosity a logger must reach before this code is emitted.
    pub fn with_verbosity(mut self, verbosity: u32) -> Self {
        self.verbosity = verbosity;
        self
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    /// Shared handle to the code, used as the counter key.
    pub(crate) fn code_key(&self) -> Arc<str> {
        Arc::clone(&self.code)
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn verbosity(&self) -> u32 {
        self.verbosity
    }

    pub fn format(&self) -> &Template {
        &self.format
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Text shown in catalogs and summaries: the format, or the description
    /// when the code has no format.
    pub fn label(&self) -> &str {
        if self.format.is_empty() {
            &self.description
        } else {
            self.format.as_str()
        }
    }

    /// Render the message body for a call site.
    ///
    /// Free-text codes use the caller's first positional value, falling back
    /// to the description. Other arguments are ignored for them.
    ///
    /// # Errors
    /// Returns `FormatError` if a placeholder has no value.
    pub fn render(&self, args: &Args) -> Result<String, FormatError> {
        if self.format.is_empty() {
            return Ok(args
                .free_text()
                .unwrap_or(self.description.as_str())
                .to_string());
        }
        self.format.render(args)
    }
}

fn serialize_template<S>(template: &Template, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(template.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::args;

    fn free_text() -> MessageDefinition {
        MessageDefinition::new("ERR-001", Severity::Error, "basic error", None).unwrap()
    }

    #[test]
    fn test_accessors() {
        let definition = MessageDefinition::new(
            "TEST-001",
            Severity::Info,
            "This is a test message.",
            Some("Test message: {}"),
        )
        .unwrap()
        .with_verbosity(1);

        assert_eq!(definition.code(), "TEST-001");
        assert_eq!(definition.severity(), Severity::Info);
        assert_eq!(definition.verbosity(), 1);
        assert_eq!(definition.format().as_str(), "Test message: {}");
        assert_eq!(definition.description(), "This is a test message.");
        assert_eq!(definition.label(), "Test message: {}");
    }

    #[test]
    fn test_free_text_uses_caller_text() {
        let body = free_text().render(&args!("Something went wrong")).unwrap();
        assert_eq!(body, "Something went wrong");
    }

    #[test]
    fn test_free_text_falls_back_to_description() {
        let definition = free_text();
        assert_eq!(definition.render(&Args::None).unwrap(), "basic error");
        assert_eq!(
            definition.render(&args!(reason = "ignored")).unwrap(),
            "basic error"
        );
        assert_eq!(definition.label(), "basic error");
    }

    #[test]
    fn test_empty_format_is_free_text() {
        let definition =
            MessageDefinition::new("ERR-002", Severity::Error, "empty", Some("")).unwrap();
        assert!(definition.format().is_empty());
        assert_eq!(definition.render(&Args::None).unwrap(), "empty");
    }

    #[test]
    fn test_invalid_template_is_rejected() {
        let result = MessageDefinition::new("BAD-001", Severity::Info, "bad", Some("{oops"));
        assert!(matches!(
            result,
            Err(TemplateError::UnterminatedPlaceholder { .. })
        ));
    }

    #[test]
    fn test_serializes_format_as_string() {
        let definition = MessageDefinition::new(
            "VAL-001",
            Severity::Warning,
            "compare",
            Some("Value {value1}"),
        )
        .unwrap();
        let json = serde_json::to_value(&definition).unwrap();
        assert_eq!(json["code"], "VAL-001");
        assert_eq!(json["severity"], "WARNING");
        assert_eq!(json["verbosity"], 0);
        assert_eq!(json["format"], "Value {value1}");
        assert_eq!(json["description"], "compare");
    }
}
