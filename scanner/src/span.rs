use std::ops::Range;

/// A pair of T and the span in the scanned text
pub type Spanned<T> = (T, Span);

/// A byte range in the scanned text
pub type Span = Range<usize>;
