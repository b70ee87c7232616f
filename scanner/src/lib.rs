pub use handler::{from_fn, FromFn, TokenHandler};
pub use markers::{Markers, Segment};
pub use placeholders::{placeholder_scanner, PlaceholderCollector};
pub use properties::{property_scanner, MissingProperty, PropertyHandler};
pub use scanner::TokenScanner;
pub use span::{Span, Spanned};

mod handler;
mod markers;
mod placeholders;
mod properties;
mod scanner;
mod span;

/// Character that escapes an open or close token when placed directly before it
pub const ESCAPE: u8 = b'\\';

/// Open token used by [property_scanner]
pub const PROPERTY_OPEN_TOKEN: &str = "${";

/// Open token used by [placeholder_scanner]
pub const PLACEHOLDER_OPEN_TOKEN: &str = "#{";

/// Close token shared by the property and placeholder scanners
pub const DEFAULT_CLOSE_TOKEN: &str = "}";
