use std::collections::HashMap;

use errors::ScanError;

use crate::{
    handler::TokenHandler, markers::Markers, scanner::TokenScanner, DEFAULT_CLOSE_TOKEN,
    PROPERTY_OPEN_TOKEN,
};

/// What to do with a property that isn't defined and has no default value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MissingProperty {
    /// Leave the expression in the output as `${name}`
    ///
    /// Escaped close tokens inside the expression are not escaped again, so
    /// `${a\}b}` is kept as `${a}b}`.
    #[default]
    Keep,
    /// Fail with [ScanError::UndefinedProperty]
    Reject,
}

/// Resolve `${name}` expressions from a set of variables
///
/// With a default separator, `${name:fallback}` resolves to `fallback` when
/// `name` isn't defined.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyHandler {
    markers: Markers,
    variables: HashMap<String, String>,
    default_separator: Option<String>,
    missing: MissingProperty,
}

impl PropertyHandler {
    pub fn new(variables: HashMap<String, String>) -> Self {
        Self {
            markers: Markers::from_static(PROPERTY_OPEN_TOKEN, DEFAULT_CLOSE_TOKEN),
            variables,
            default_separator: None,
            missing: MissingProperty::default(),
        }
    }

    /// Scan for properties between other tokens than `${` and `}`
    pub fn with_markers(mut self, markers: Markers) -> Self {
        self.markers = markers;
        self
    }

    /// Enable default values following `separator`. An empty separator disables them.
    pub fn with_default_separator(mut self, separator: impl Into<String>) -> Self {
        let separator = separator.into();
        self.default_separator = (!separator.is_empty()).then_some(separator);
        self
    }

    pub fn with_missing(mut self, missing: MissingProperty) -> Self {
        self.missing = missing;
        self
    }

    pub fn variables(&self) -> &HashMap<String, String> {
        &self.variables
    }
}

impl TokenHandler for PropertyHandler {
    type Error = ScanError;

    fn handle_token(&self, expression: &str) -> Result<String, ScanError> {
        let (name, default) = match &self.default_separator {
            Some(separator) => match expression.split_once(separator.as_str()) {
                Some((name, default)) => (name, Some(default)),
                None => (expression, None),
            },
            None => (expression, None),
        };

        if let Some(value) = self.variables.get(name) {
            return Ok(value.clone());
        }

        if let Some(default) = default {
            return Ok(default.to_string());
        }

        match self.missing {
            MissingProperty::Keep => Ok(format!(
                "{}{expression}{}",
                self.markers.open_token(),
                self.markers.close_token()
            )),
            MissingProperty::Reject => Err(ScanError::UndefinedProperty(name.to_string())),
        }
    }
}

/// Scanner replacing property expressions with their values
pub fn property_scanner(handler: PropertyHandler) -> TokenScanner<PropertyHandler> {
    TokenScanner::with_markers(handler.markers.clone(), handler)
}
