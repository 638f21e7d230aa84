//! Serde adapter for nbformat multi-line strings.
//!
//! nbformat stores long text either as one string or as a list of line
//! fragments. Both shapes load into one `String`; writes always use the list
//! form with line terminators kept, which is what Jupyter itself emits.

use serde::de::{self, Deserializer, SeqAccess, Visitor};
use serde::ser::{SerializeSeq, Serializer};
use serde_json::Value;
use std::fmt::{self, Formatter};

pub fn serialize<S: Serializer>(text: &str, serializer: S) -> Result<S::Ok, S::Error> {
    let lines = split_lines(text);
    let mut seq = serializer.serialize_seq(Some(lines.len()))?;
    for line in lines {
        seq.serialize_element(line)?;
    }
    seq.end()
}

pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    deserializer.deserialize_any(MultilineVisitor)
}

/// Splits text into line fragments, each keeping its trailing `\n`.
///
/// Empty text yields no fragments.
pub fn split_lines(text: &str) -> Vec<&str> {
    text.split_inclusive('\n').collect()
}

/// Reads a MIME bundle entry that is either a string or a list of strings.
///
/// Returns `None` for any other JSON shape.
pub fn text_from_value(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Array(parts) => parts
            .iter()
            .map(|part| part.as_str())
            .collect::<Option<Vec<_>>>()
            .map(|parts| parts.concat()),
        _ => None,
    }
}

struct MultilineVisitor;

impl<'de> Visitor<'de> for MultilineVisitor {
    type Value = String;

    fn expecting(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str("a string or a list of strings")
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<String, E> {
        Ok(value.to_string())
    }

    fn visit_string<E: de::Error>(self, value: String) -> Result<String, E> {
        Ok(value)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<String, A::Error> {
        let mut joined = String::new();
        while let Some(part) = seq.next_element::<String>()? {
            joined.push_str(&part);
        }
        Ok(joined)
    }
}
