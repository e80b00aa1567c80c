use quickcheck::{Arbitrary, Gen};

use crate::{Map, Payload, Value};

fn finite_f64(g: &mut Gen) -> f64 {
    let mut value = f64::arbitrary(g);
    while !value.is_finite() {
        value = f64::arbitrary(g);
    }
    value
}

fn arbitrary_payload(g: &mut Gen, depth: usize) -> Payload {
    let variants = if depth == 0 { 6 } else { 8 };
    match usize::arbitrary(g) % variants {
        0 => Payload::Null,
        1 => Payload::Bool(bool::arbitrary(g)),
        2 => Payload::Int(i64::arbitrary(g)),
        // The reader only produces UInt above the signed range.
        3 => Payload::UInt(u64::arbitrary(g) | (1 << 63)),
        4 => Payload::Double(finite_f64(g)),
        5 => Payload::String(String::arbitrary(g)),
        6 => {
            let len = usize::arbitrary(g) % 4;
            let elements = (0..len)
                .map(|_| Value::from(arbitrary_payload(g, depth - 1)))
                .collect();
            Payload::Array(elements)
        }
        _ => {
            let len = usize::arbitrary(g) % 4;
            let mut map = Map::new();
            for _ in 0..len {
                let key = String::arbitrary(g);
                map.insert(key, Value::from(arbitrary_payload(g, depth - 1)));
            }
            Payload::Object(map)
        }
    }
}

impl Arbitrary for Value {
    fn arbitrary(g: &mut Gen) -> Self {
        let depth = usize::arbitrary(g) % 3;
        Value::from(arbitrary_payload(g, depth))
    }
}
