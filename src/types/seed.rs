use serde_json::Value;
use tracing::warn;

/// A seed document entry that passed validation; ready to insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedCandidate {
    pub text: String,
    pub author: Option<String>,
    pub source: Option<String>,
}

impl SeedCandidate {
    /// Build a candidate from one array element.
    ///
    /// `None` unless the element is an object whose `text` is a string that
    /// is not blank. `text` is trimmed; `author`/`source` are kept verbatim
    /// when they are strings.
    pub fn from_value(value: &Value) -> Option<Self> {
        let obj = value.as_object()?;
        let text = obj.get("text")?.as_str()?.trim();
        if text.is_empty() {
            return None;
        }
        let optional = |key: &str| obj.get(key).and_then(Value::as_str).map(str::to_string);
        Some(Self {
            text: text.to_string(),
            author: optional("author"),
            source: optional("source"),
        })
    }
}

/// Parse a raw seed document into candidates.
///
/// Invalid elements are skipped. A root value that is not an array yields no
/// candidates. Only unparseable JSON is an error.
pub fn parse_candidates(body: &[u8]) -> Result<Vec<SeedCandidate>, serde_json::Error> {
    let root: Value = serde_json::from_slice(body)?;
    let Some(items) = root.as_array() else {
        warn!(kind = json_kind(&root), "seed document root is not an array; ignoring");
        return Ok(Vec::new());
    };
    Ok(items.iter().filter_map(SeedCandidate::from_value).collect())
}

fn json_kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn keeps_only_objects_with_nonblank_text() {
        let doc = json!([
            {"text": "  Stay hungry.  ", "author": "Steve Jobs", "source": "Stanford"},
            {"text": "   "},
            {"text": 42},
            {"author": "Nobody"},
            "just a string",
            7,
            null,
            {"text": "Know thyself."}
        ]);
        let got = parse_candidates(doc.to_string().as_bytes()).unwrap();
        assert_eq!(
            got,
            vec![
                SeedCandidate {
                    text: "Stay hungry.".to_string(),
                    author: Some("Steve Jobs".to_string()),
                    source: Some("Stanford".to_string()),
                },
                SeedCandidate {
                    text: "Know thyself.".to_string(),
                    author: None,
                    source: None,
                },
            ]
        );
    }

    #[test]
    fn non_string_optionals_become_absent() {
        let c = SeedCandidate::from_value(&json!({
            "text": "X",
            "author": 12,
            "source": {"book": "y"},
            "year": 1900
        }))
        .unwrap();
        assert_eq!(c.author, None);
        assert_eq!(c.source, None);
    }

    #[test]
    fn optionals_are_not_trimmed() {
        let c = SeedCandidate::from_value(&json!({"text": "X", "author": " Anon "})).unwrap();
        assert_eq!(c.author.as_deref(), Some(" Anon "));
    }

    #[test]
    fn non_array_root_is_empty_not_error() {
        let got = parse_candidates(br#"{"text": "not in an array"}"#).unwrap();
        assert!(got.is_empty());
        assert!(parse_candidates(b"\"hello\"").unwrap().is_empty());
    }

    #[test]
    fn empty_array_is_empty() {
        assert!(parse_candidates(b"[]").unwrap().is_empty());
    }

    #[test]
    fn malformed_json_is_error() {
        assert!(parse_candidates(b"[{\"text\": ").is_err());
        assert!(parse_candidates(b"").is_err());
    }
}
