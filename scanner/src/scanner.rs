use errors::ConfigError;
use tracing::trace;

use crate::{
    handler::TokenHandler,
    markers::{Event, Markers},
};

/// Replaces expressions delimited by [Markers] with the output of a [TokenHandler]
///
/// All scanning state lives in each [TokenScanner::parse] call, so one scanner
/// can be shared across threads as long as its handler can.
#[derive(Debug, Clone)]
pub struct TokenScanner<H> {
    markers: Markers,
    handler: H,
}

impl<H> TokenScanner<H> {
    pub fn new(
        open_token: impl Into<String>,
        close_token: impl Into<String>,
        handler: H,
    ) -> Result<Self, ConfigError> {
        Ok(Self::with_markers(
            Markers::new(open_token, close_token)?,
            handler,
        ))
    }

    pub fn with_markers(markers: Markers, handler: H) -> Self {
        Self { markers, handler }
    }

    pub fn markers(&self) -> &Markers {
        &self.markers
    }

    pub fn handler(&self) -> &H {
        &self.handler
    }

    pub fn into_handler(self) -> H {
        self.handler
    }
}

impl<H: TokenHandler> TokenScanner<H> {
    /// Replace every closed, unescaped expression in `text`
    ///
    /// Escaped tokens lose their backslash. An unterminated expression is
    /// copied through verbatim and ends the scan. The first handler error is
    /// returned as is.
    pub fn parse(&self, text: &str) -> Result<String, H::Error> {
        if text.is_empty() {
            return Ok(String::new());
        }

        let open = self.markers.open_token();

        let Some(start) = text.find(open) else {
            return Ok(text.to_string());
        };

        let mut builder = String::with_capacity(text.len());

        self.markers.walk_from(text, Some(start), |event| {
            match event {
                Event::Text(literal, _) | Event::Unterminated(literal, _) => {
                    builder.push_str(literal)
                }
                Event::EscapedOpen(_) => builder.push_str(open),
                Event::Expression(expression, span) => {
                    trace!(expression, ?span, "handling expression");
                    builder.push_str(&self.handler.handle_token(expression)?);
                }
            }

            Ok(())
        })?;

        Ok(builder)
    }
}
