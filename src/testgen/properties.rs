use std::collections::HashMap;
use std::fmt;

use serde_json::Value;

use crate::api::types::CaseNode;

/// The sorted field names making up one case's input.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct InputShape(pub Vec<String>);

impl InputShape {
    /// Shape of a leaf case, or `None` if the node is not a leaf.
    pub fn of(case: &CaseNode) -> Option<Self> {
        if !case.is_leaf() {
            return None;
        }
        let names = match &case.input {
            Some(Value::Object(fields)) => {
                let mut names: Vec<String> = fields.keys().cloned().collect();
                names.sort_unstable();
                names
            }
            Some(_) => vec!["input".to_string()],
            None => case
                .loose_field_names()
                .into_iter()
                .map(str::to_string)
                .collect(),
        };
        Some(InputShape(names))
    }
}

impl fmt::Display for InputShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({})", self.0.join(", "))
    }
}

/// Properties under test and the input shapes their cases use.
///
/// Both orders are first-seen, so the same document always yields the
/// same stubs in the same order.
#[derive(Debug, Default)]
pub struct PropertyIndex {
    properties: Vec<String>,
    shapes: HashMap<String, Vec<InputShape>>,
}

impl PropertyIndex {
    pub fn build(cases: &[CaseNode]) -> Self {
        let mut index = Self::default();
        index.index_shapes(cases);
        index.discover(cases);
        index
    }

    fn index_shapes(&mut self, cases: &[CaseNode]) {
        for case in cases {
            if let (Some(property), Some(shape)) = (&case.property, InputShape::of(case)) {
                let shapes = self.shapes.entry(property.clone()).or_default();
                if !shapes.contains(&shape) {
                    shapes.push(shape);
                }
            }
            if let Some(children) = &case.cases {
                self.index_shapes(children);
            }
        }
    }

    fn discover(&mut self, cases: &[CaseNode]) {
        for case in cases {
            if let (Some(property), Some(_)) = (&case.property, &case.expected) {
                if !self.properties.contains(property) {
                    self.properties.push(property.clone());
                }
            }
            if let Some(children) = &case.cases {
                self.discover(children);
            }
        }
    }

    pub fn properties(&self) -> impl Iterator<Item = &str> {
        self.properties.iter().map(String::as_str)
    }

    pub fn shapes(&self, property: &str) -> &[InputShape] {
        self.shapes.get(property).map(Vec::as_slice).unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn cases(value: Value) -> Vec<CaseNode> {
        serde_json::from_value(value).unwrap()
    }

    fn shape(names: &[&str]) -> InputShape {
        InputShape(names.iter().map(|s| s.to_string()).collect())
    }

    #[test]
    fn explicit_input_shape_is_sorted_keys() {
        let cases = cases(json!([
            {"description": "d", "property": "p", "input": {"y": 1, "x": 2}, "expected": 0}
        ]));
        assert_eq!(InputShape::of(&cases[0]), Some(shape(&["x", "y"])));
    }

    #[test]
    fn loose_fields_make_up_the_shape() {
        let cases = cases(json!([
            {"description": "d", "property": "p", "comments": "c", "year": 1996, "expected": true}
        ]));
        assert_eq!(InputShape::of(&cases[0]), Some(shape(&["year"])));
    }

    #[test]
    fn group_nodes_have_no_shape() {
        let cases = cases(json!([{"description": "group", "cases": []}]));
        assert_eq!(InputShape::of(&cases[0]), None);
    }

    #[test]
    fn shape_display() {
        assert_eq!(shape(&["a", "b"]).to_string(), "(a, b)");
        assert_eq!(shape(&[]).to_string(), "()");
    }

    #[test]
    fn nested_groups_are_transparent() {
        let index = PropertyIndex::build(&cases(json!([
            {"description": "outer", "cases": [
                {"description": "inner", "cases": [
                    {"description": "deep", "property": "score", "input": {"rolls": []}, "expected": 0}
                ]},
                {"description": "shallow", "property": "roll", "input": {"pins": 1}, "expected": null}
            ]}
        ])));

        assert_eq!(index.properties().collect::<Vec<_>>(), vec!["score", "roll"]);
        assert_eq!(index.shapes("score"), &[shape(&["rolls"])]);
        assert_eq!(index.shapes("roll"), &[shape(&["pins"])]);
    }

    #[test]
    fn distinct_shapes_are_recorded_once() {
        let index = PropertyIndex::build(&cases(json!([
            {"description": "one", "property": "add", "input": {"a": 1, "b": 2}, "expected": 3},
            {"description": "two", "property": "add", "input": {"b": 1, "a": 2}, "expected": 3},
            {"description": "three", "property": "add", "input": {"a": 1, "b": 2, "c": 3}, "expected": 6}
        ])));

        assert_eq!(
            index.shapes("add"),
            &[shape(&["a", "b"]), shape(&["a", "b", "c"])]
        );
    }

    #[test]
    fn cases_without_property_are_not_discovered() {
        let index = PropertyIndex::build(&cases(json!([
            {"description": "anonymous", "input": {"a": 1}, "expected": 1}
        ])));
        assert_eq!(index.properties().count(), 0);
        assert!(index.shapes("").is_empty());
    }

    #[test]
    fn empty_document() {
        let index = PropertyIndex::build(&[]);
        assert_eq!(index.properties().count(), 0);
    }
}
