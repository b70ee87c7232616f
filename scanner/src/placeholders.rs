use std::{cell::RefCell, convert::Infallible};

use crate::{
    handler::TokenHandler, markers::Markers, scanner::TokenScanner, DEFAULT_CLOSE_TOKEN,
    PLACEHOLDER_OPEN_TOKEN,
};

/// Replaces each expression with a fixed placeholder and records its parameter name
///
/// The parameter name is the text before the first `,`, trimmed, so
/// `#{id, mode=IN}` records `id`. Names are recorded in order of appearance.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaceholderCollector {
    placeholder: String,
    names: RefCell<Vec<String>>,
}

impl PlaceholderCollector {
    pub fn new(placeholder: impl Into<String>) -> Self {
        Self {
            placeholder: placeholder.into(),
            names: RefCell::new(vec![]),
        }
    }

    /// Parameter names collected so far
    pub fn names(&self) -> Vec<String> {
        self.names.borrow().clone()
    }

    pub fn into_names(self) -> Vec<String> {
        self.names.into_inner()
    }
}

impl Default for PlaceholderCollector {
    fn default() -> Self {
        Self::new("?")
    }
}

impl TokenHandler for PlaceholderCollector {
    type Error = Infallible;

    fn handle_token(&self, expression: &str) -> Result<String, Infallible> {
        let name = expression.split(',').next().unwrap_or_default().trim();

        self.names.borrow_mut().push(name.to_string());

        Ok(self.placeholder.clone())
    }
}

/// Scanner replacing `#{name}` expressions with placeholders
pub fn placeholder_scanner(
    collector: PlaceholderCollector,
) -> TokenScanner<PlaceholderCollector> {
    TokenScanner::with_markers(
        Markers::from_static(PLACEHOLDER_OPEN_TOKEN, DEFAULT_CLOSE_TOKEN),
        collector,
    )
}
