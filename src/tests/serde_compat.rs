//! Cross-validation against `serde_json` on strict-JSON documents.

use super::util::parse_doc;
use crate::{Features, Payload, Value};

fn equivalent(ours: &Value, theirs: &serde_json::Value) -> bool {
    match (ours.payload(), theirs) {
        (Payload::Null, serde_json::Value::Null) => true,
        (Payload::Bool(a), serde_json::Value::Bool(b)) => a == b,
        (Payload::Int(a), serde_json::Value::Number(n)) => n.as_i64() == Some(*a),
        (Payload::UInt(a), serde_json::Value::Number(n)) => n.as_u64() == Some(*a),
        (Payload::Double(a), serde_json::Value::Number(n)) => n.as_f64() == Some(*a),
        (Payload::String(a), serde_json::Value::String(b)) => a == b,
        (Payload::Array(a), serde_json::Value::Array(b)) => {
            a.len() == b.len() && a.iter().zip(b).all(|(x, y)| equivalent(x, y))
        }
        (Payload::Object(a), serde_json::Value::Object(b)) => {
            a.len() == b.len()
                && a.iter()
                    .all(|(key, member)| b.get(key).is_some_and(|w| equivalent(member, w)))
        }
        _ => false,
    }
}

#[test]
fn agrees_with_serde_json_on_strict_documents() {
    let documents = [
        r#"{"a":1, "b":[true, false, null]}"#,
        r#"[]"#,
        r#"{}"#,
        r#"[1, -2, 3.5, 1e10, -0.25]"#,
        r#""plain""#,
        r#""A😀\n\t\"""#,
        r#"{"nested": {"deep": [{"x": "y"}, [[1]]]}}"#,
        r#"9223372036854775807"#,
        r#"18446744073709551615"#,
        r#"12345678901234567890"#,
        r#"{"":"empty key"}"#,
    ];
    for doc in documents {
        let (ok, ours, _) = parse_doc(doc, Features::default());
        assert!(ok, "jsonlax rejected {doc:?}");
        let theirs: serde_json::Value = serde_json::from_str(doc).expect("serde_json rejected");
        assert!(equivalent(&ours, &theirs), "trees differ for {doc:?}");
    }
}

#[test]
fn rejects_what_serde_json_rejects_on_structural_errors() {
    let documents = [r#"{"a""#, r#"[1,"#, r#"{"a":}"#, r#"[1 2]"#];
    for doc in documents {
        let (ok, _, _) = parse_doc(doc, Features::default());
        assert!(!ok, "jsonlax accepted {doc:?}");
        assert!(serde_json::from_str::<serde_json::Value>(doc).is_err());
    }
}
