use codespan_reporting::{
    diagnostic::{Diagnostic, Label, Severity},
    files::{self, SimpleFile},
    term::{self, termcolor::Buffer},
};
use errors::{ConfigError, ScanError, TokenError};
use line_col::LineColLookup;
use scanner::{Span, Spanned};
use serde::{Deserialize, Serialize};

/// Get a list of diagnostics from a list of errors
pub fn get_diagnostics(errs: &[Spanned<TokenError>], source: &str) -> Vec<Diagnosis> {
    let lookup = LineColLookup::new(source);

    errs.iter()
        .map(|(err, span)| Diagnosis {
            range: DiagnosisRange {
                start: get_position(&lookup, source, span.start),
                end: get_position(&lookup, source, span.end),
            },
            severity: Some(severity(err)),
            message: err.to_string(),
        })
        .collect()
}

/// Render errors against their source as plain text, one report per error
pub fn render(
    name: &str,
    source: &str,
    errs: &[Spanned<TokenError>],
) -> Result<String, files::Error> {
    let file = SimpleFile::new(name, source);
    let config = term::Config::default();
    let mut buffer = Buffer::no_color();

    for (err, span) in errs {
        term::emit(&mut buffer, &config, &file, &err.as_diagnostic(span))?;
    }

    Ok(String::from_utf8_lossy(buffer.as_slice()).into_owned())
}

fn severity(err: &TokenError) -> DiagnosisSeverity {
    match err {
        TokenError::ScanError(ScanError::UnterminatedExpression(_) | ScanError::EmptyExpression) => {
            DiagnosisSeverity::WARNING
        }
        _ => DiagnosisSeverity::ERROR,
    }
}

/// Zero based line and character of a byte index
fn get_position(lookup: &LineColLookup, source: &str, idx: usize) -> DiagnosisPosition {
    if source.is_empty() {
        return DiagnosisPosition::default();
    }

    let (line, character) = lookup.get(idx.min(source.len()));

    DiagnosisPosition {
        line: (line - 1) as u32,
        character: (character - 1) as u32,
    }
}

#[derive(Debug, Eq, PartialEq, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnosis {
    pub range: DiagnosisRange,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub severity: Option<DiagnosisSeverity>,

    pub message: String,
}

#[derive(Debug, Eq, PartialEq, Ord, PartialOrd, Clone, Copy, Deserialize, Serialize)]
#[serde(transparent)]
pub struct DiagnosisSeverity(i32);
impl DiagnosisSeverity {
    pub const ERROR: DiagnosisSeverity = DiagnosisSeverity(1);
    pub const WARNING: DiagnosisSeverity = DiagnosisSeverity(2);
}

#[derive(Debug, Eq, PartialEq, Ord, PartialOrd, Copy, Clone, Default, Deserialize, Serialize)]
pub struct DiagnosisPosition {
    pub line: u32,
    pub character: u32,
}

impl DiagnosisPosition {
    pub fn new(line: u32, character: u32) -> DiagnosisPosition {
        DiagnosisPosition { line, character }
    }
}

#[derive(Debug, Eq, PartialEq, Copy, Clone, Default, Deserialize, Serialize)]
pub struct DiagnosisRange {
    /// The range's start position (inclusive)
    pub start: DiagnosisPosition,
    /// The range's end position (exclusive)
    pub end: DiagnosisPosition,
}

impl DiagnosisRange {
    pub fn new(start: DiagnosisPosition, end: DiagnosisPosition) -> DiagnosisRange {
        DiagnosisRange { start, end }
    }
}

trait AsDiagnostic {
    fn as_diagnostic(&self, span: &Span) -> Diagnostic<()>;
}

macro_rules! impl_as_dianostic {
    ($($error:tt),+) => {$(
        impl AsDiagnostic for $error {
            fn as_diagnostic(&self, span: &Span) -> Diagnostic<()> {
                Diagnostic::error()
                    .with_code(stringify!($error))
                    .with_message(self.to_string())
                    .with_labels(vec![Label::primary((), span.clone())])
            }
        }
    )+};
}

impl_as_dianostic!(ConfigError, ScanError);

impl AsDiagnostic for TokenError {
    fn as_diagnostic(&self, span: &Span) -> Diagnostic<()> {
        let mut diagnostic = match self {
            TokenError::ConfigError(e) => e.as_diagnostic(span),
            TokenError::ScanError(e) => e.as_diagnostic(span),
        };

        if severity(self) == DiagnosisSeverity::WARNING {
            diagnostic.severity = Severity::Warning;
        }

        diagnostic
    }
}
