//! Tests running the scanner over the template fixtures
