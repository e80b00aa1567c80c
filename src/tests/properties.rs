use quickcheck::QuickCheck;

use crate::{Features, Payload, Reader, Value};

/// Property: serializing any comment-free tree and re-parsing it under the
/// default features reproduces an equal tree.
#[test]
fn serialization_round_trips() {
    fn prop(value: Value) -> bool {
        let text = value.to_string();
        match crate::parse(&text) {
            Ok(reparsed) => reparsed == value,
            Err(_) => false,
        }
    }

    QuickCheck::new()
        .tests(500)
        .quickcheck(prop as fn(Value) -> bool);
}

fn offsets_ok(value: &Value, len: usize) -> bool {
    if value.offset_start() > value.offset_limit() || value.offset_limit() > len {
        return false;
    }
    match value.payload() {
        Payload::Array(elements) => elements.iter().all(|element| offsets_ok(element, len)),
        Payload::Object(map) => map.values().all(|member| offsets_ok(member, len)),
        _ => true,
    }
}

/// Property: for arbitrary bytes the parse terminates and the outcome is
/// consistent with the journal; successful parses carry in-bounds offsets,
/// failed ones carry 1-based locations.
#[test]
fn arbitrary_bytes_terminate_consistently() {
    fn prop(bytes: Vec<u8>) -> bool {
        let mut reader = Reader::new(Features::default());
        let mut root = Value::default();
        match reader.parse(&bytes, &mut root) {
            Ok(true) => reader.errors().is_empty() && offsets_ok(&root, bytes.len()),
            Ok(false) => {
                !reader.errors().is_empty()
                    && reader
                        .errors()
                        .iter()
                        .all(|error| error.location.line >= 1 && error.location.column >= 1)
            }
            // The depth guard is the only fatal reachable from short inputs.
            Err(_) => true,
        }
    }

    QuickCheck::new()
        .tests(2000)
        .quickcheck(prop as fn(Vec<u8>) -> bool);
}

/// Property: parsing the same document twice gives the same tree and the
/// same journal.
#[test]
fn parsing_is_deterministic() {
    fn prop(bytes: Vec<u8>) -> bool {
        let mut first = Reader::new(Features::default());
        let mut second = Reader::new(Features::default());
        let mut root_a = Value::default();
        let mut root_b = Value::default();
        let a = first.parse(&bytes, &mut root_a);
        let b = second.parse(&bytes, &mut root_b);
        a == b && root_a == root_b && first.errors() == second.errors()
    }

    QuickCheck::new()
        .tests(500)
        .quickcheck(prop as fn(Vec<u8>) -> bool);
}
