use crate::{Features, Map, Reader, Value};

/// Runs a parse and returns the outcome flag, the root, and the reader (for
/// journal inspection). Panics on fatal errors; tests that expect them call
/// the reader directly.
pub fn parse_doc(doc: &str, features: Features) -> (bool, Value, Reader) {
    let mut reader = Reader::new(features);
    let mut root = Value::default();
    let ok = reader
        .parse(doc.as_bytes(), &mut root)
        .expect("unexpected fatal error");
    (ok, root, reader)
}

pub fn object(entries: Vec<(&str, Value)>) -> Value {
    Value::from(
        entries
            .into_iter()
            .map(|(key, value)| (key.to_owned(), value))
            .collect::<Map>(),
    )
}

pub fn array(elements: Vec<Value>) -> Value {
    Value::from(elements)
}
