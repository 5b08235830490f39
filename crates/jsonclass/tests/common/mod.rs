//! A small JSON value generator shared by the property and snapshot tests.
//!
//! Only ASCII alphanumeric strings and integer-valued numbers are generated
//! so that every rendered document is its own canonical form: no escaping
//! and no float-formatting ambiguity can sneak into the round-trip checks.

use quickcheck::{Arbitrary, Gen};

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i32),
    Str(String),
    Array(Vec<Value>),
    Object(Vec<(String, Value)>),
}

impl Value {
    pub fn render(&self) -> String {
        match self {
            Value::Null => "null".into(),
            Value::Bool(b) => b.to_string(),
            Value::Int(n) => n.to_string(),
            Value::Str(s) => format!("\"{s}\""),
            Value::Array(items) => {
                let body: Vec<String> = items.iter().map(Value::render).collect();
                format!("[{}]", body.join(","))
            }
            Value::Object(fields) => {
                let body: Vec<String> = fields
                    .iter()
                    .map(|(k, v)| format!("\"{k}\":{}", v.render()))
                    .collect();
                format!("{{{}}}", body.join(","))
            }
        }
    }
}

fn arbitrary_key(g: &mut Gen) -> String {
    const LETTERS: &[u8] = b"abcdefghijklmnopqrstuvwxyz";
    let len = 1 + usize::arbitrary(g) % 6;
    (0..len)
        .map(|_| LETTERS[usize::arbitrary(g) % LETTERS.len()] as char)
        .collect()
}

/// An object key restricted to lowercase ASCII so it never needs escaping
/// when rendered back into JSON text.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Key(pub String);

impl Arbitrary for Key {
    fn arbitrary(g: &mut Gen) -> Self {
        Key(arbitrary_key(g))
    }
}

fn gen_value(g: &mut Gen, depth: usize) -> Value {
    if depth == 0 {
        match usize::arbitrary(g) % 4 {
            0 => Value::Null,
            1 => Value::Bool(bool::arbitrary(g)),
            2 => Value::Int(i32::arbitrary(g)),
            _ => Value::Str(arbitrary_key(g)),
        }
    } else {
        match usize::arbitrary(g) % 6 {
            0 => Value::Null,
            1 => Value::Bool(bool::arbitrary(g)),
            2 => Value::Int(i32::arbitrary(g)),
            3 => Value::Str(arbitrary_key(g)),
            4 => {
                let len = usize::arbitrary(g) % 4;
                Value::Array((0..len).map(|_| gen_value(g, depth - 1)).collect())
            }
            _ => {
                let len = usize::arbitrary(g) % 4;
                // Duplicate keys would make the reference equality comparison
                // between a document and its own re-render ambiguous, so the
                // keys are deduplicated by construction.
                let mut seen = std::collections::BTreeSet::new();
                let mut fields = Vec::new();
                for _ in 0..len {
                    let key = arbitrary_key(g);
                    if seen.insert(key.clone()) {
                        fields.push((key, gen_value(g, depth - 1)));
                    }
                }
                Value::Object(fields)
            }
        }
    }
}

impl Arbitrary for Value {
    fn arbitrary(g: &mut Gen) -> Self {
        let depth = 1 + usize::arbitrary(g) % 3;
        gen_value(g, depth)
    }
}
