use std::{convert::Infallible, fmt};

/// Produces the replacement for an expression captured between an open and
/// close token
///
/// The handler is called once per closed expression, left to right. Escaped
/// close tokens inside the expression are already unescaped. The returned
/// string is inserted as is and never scanned again.
pub trait TokenHandler {
    type Error;

    fn handle_token(&self, expression: &str) -> Result<String, Self::Error>;
}

impl<F, E> TokenHandler for F
where
    F: Fn(&str) -> Result<String, E>,
{
    type Error = E;

    fn handle_token(&self, expression: &str) -> Result<String, E> {
        self(expression)
    }
}

/// Handler built from a closure that can't fail
#[derive(Clone)]
pub struct FromFn<F>(F);

impl<F> fmt::Debug for FromFn<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FromFn").finish_non_exhaustive()
    }
}

/// Wrap an infallible closure as a [TokenHandler]
pub fn from_fn<F>(f: F) -> FromFn<F>
where
    F: Fn(&str) -> String,
{
    FromFn(f)
}

impl<F> TokenHandler for FromFn<F>
where
    F: Fn(&str) -> String,
{
    type Error = Infallible;

    fn handle_token(&self, expression: &str) -> Result<String, Infallible> {
        Ok((self.0)(expression))
    }
}
