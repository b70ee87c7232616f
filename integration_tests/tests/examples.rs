use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use scanner::{Markers, PropertyHandler, Segment, property_scanner};

fn markers() -> Markers {
    Markers::new("${", "}").expect("default markers are valid")
}

#[rstest::rstest]
fn integration_valid(#[files("../fixtures/valid/*.txt")] path: PathBuf) {
    let source = fs::read_to_string(path).expect("unable to read test file");

    assert!(markers().check(&source).is_ok());
}

#[rstest::rstest]
fn integration_invalid(#[files("../fixtures/invalid/*.txt")] path: PathBuf) {
    let source = fs::read_to_string(path).expect("unable to read test file");

    assert!(markers().check(&source).is_err());
}

#[rstest::rstest]
fn integration_segments_match_parse(#[files("../fixtures/*/*.txt")] path: PathBuf) {
    let source = fs::read_to_string(path).expect("unable to read test file");
    let markers = markers();

    // Properties without values are kept as written
    let rebuilt: String = markers
        .scan(&source)
        .into_iter()
        .map(|(segment, _)| match segment {
            Segment::Text(text) | Segment::Unterminated(text) => text,
            Segment::EscapedOpen => markers.open_token().to_string(),
            Segment::Expression(expression) => format!("${{{expression}}}"),
        })
        .collect();

    let scanner = property_scanner(PropertyHandler::new(HashMap::new()));

    pretty_assertions::assert_eq!(Ok(rebuilt), scanner.parse(&source));
}
