use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

/// Root of a `canonical-data.json` document.
#[derive(Debug, Clone, Deserialize)]
pub struct CanonicalData {
    #[serde(default)]
    pub exercise: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub comments: Option<Text>,
    pub cases: Vec<CaseNode>,
}

/// A string, or a list of strings meant to be printed one per line.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum Text {
    Line(String),
    Lines(Vec<String>),
}

impl Text {
    pub fn lines(&self) -> Vec<&str> {
        match self {
            Text::Line(line) => vec![line.as_str()],
            Text::Lines(lines) => lines.iter().map(String::as_str).collect(),
        }
    }

    /// Single-line form, used where a name has to be derived from the text.
    pub fn joined(&self) -> String {
        self.lines().join(" ")
    }
}

/// One node of the case tree.
///
/// Nodes are not strictly leaves or groups: a node may carry leaf fields
/// (`description` + `expected`), a nested `cases` list, or both.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CaseNode {
    #[serde(default)]
    pub description: Option<Text>,
    #[serde(default)]
    pub comments: Option<Text>,
    #[serde(default)]
    pub property: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub input: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    pub expected: Option<Value>,
    #[serde(default)]
    pub cases: Option<Vec<CaseNode>>,
    /// Every other key, in document order. Old-style documents put the
    /// inputs of a case here instead of under `input`.
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl CaseNode {
    pub fn is_leaf(&self) -> bool {
        self.description.is_some() && self.expected.is_some()
    }

    pub fn property_name(&self) -> &str {
        self.property.as_deref().unwrap_or("")
    }

    /// Loose field names, sorted. This is the order reconstructed inputs use.
    pub fn loose_field_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.fields.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

// Keeps an explicit `null` distinct from a missing key.
fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn node(value: Value) -> CaseNode {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn null_expected_counts_as_present() {
        let case = node(json!({"description": "nothing", "expected": null}));
        assert_eq!(case.expected, Some(Value::Null));
        assert!(case.is_leaf());
    }

    #[test]
    fn missing_expected_is_not_a_leaf() {
        let case = node(json!({"description": "group", "cases": []}));
        assert!(case.expected.is_none());
        assert!(!case.is_leaf());
        assert_eq!(case.cases.as_ref().map(Vec::len), Some(0));
    }

    #[test]
    fn loose_fields_exclude_known_keys() {
        let case = node(json!({
            "description": "adds",
            "property": "add",
            "comments": ["one", "two"],
            "b": 2,
            "a": 1,
            "expected": 3
        }));
        assert_eq!(case.loose_field_names(), vec!["a", "b"]);
        assert_eq!(case.property_name(), "add");
        assert_eq!(case.comments, Some(Text::Lines(vec!["one".into(), "two".into()])));
    }

    #[test]
    fn description_may_be_a_list() {
        let case = node(json!({"description": ["first line", "second line"]}));
        let description = case.description.unwrap();
        assert_eq!(description.lines(), vec!["first line", "second line"]);
        assert_eq!(description.joined(), "first line second line");
    }

    #[test]
    fn document_requires_cases() {
        let result: Result<CanonicalData, _> =
            serde_json::from_value(json!({"exercise": "leap", "version": "1.0.0"}));
        assert!(result.is_err());
    }
}
