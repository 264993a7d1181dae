use tracing::trace;

use super::GenerateError;
use super::item_name::to_item_name;
use super::literal::{Literal, MapStyle};
use super::properties::InputShape;
use crate::api::types::{CaseNode, Text};

/// Output buffer plus the state carried across the case-tree walk.
pub struct Emitter {
    out: String,
    map_style: MapStyle,
    first_case: bool,
    tests: usize,
}

impl Emitter {
    pub fn new(map_style: MapStyle) -> Self {
        Self {
            out: String::new(),
            map_style,
            first_case: true,
            tests: 0,
        }
    }

    pub fn tests_emitted(&self) -> usize {
        self.tests
    }

    pub fn finish(self) -> String {
        self.out
    }

    fn line(&mut self, line: &str) {
        self.out.push_str(line);
        self.out.push('\n');
    }

    fn comment_lines(&mut self, prefix: &str, text: &Text) {
        for line in text.lines() {
            self.line(&format!("{prefix} {line}"));
        }
    }

    /// Placeholder helper shared by every case of `property`.
    pub fn emit_stub(&mut self, property: &str, shapes: &[InputShape]) {
        let name = property.to_lowercase();
        self.line(&format!("/// Process a single test case for the property `{property}`"));
        self.line("///");
        self.line(&format!("/// All cases for the `{property}` property are implemented"));
        self.line("/// in terms of this function.");
        self.line("///");
        self.line("/// Note that you'll need to both name the expected transform which");
        self.line("/// the student needs to write, and name the types of the inputs and outputs.");
        self.line("/// While rustc _may_ be able to handle things properly given a working example,");
        self.line("/// students will face confusing errors if the `I` and `O` types are not concrete.");
        match shapes {
            [] => {}
            [shape] => {
                self.line("///");
                self.line(&format!("/// Expected input format: {shape}"));
            }
            _ => {
                self.line("///");
                self.line("/// CAUTION: Multiple input formats were detected in this test's cases:");
                for shape in shapes {
                    self.line(&format!("///    {shape}"));
                }
            }
        }
        self.line(&format!("fn process_{name}_case<I, O>(input: I, expected: O) {{"));
        self.line("    // typical implementation:");
        self.line("    // assert_eq!(");
        self.line(&format!("    //     student_{property}_func(input),"));
        self.line("    //     expected");
        self.line("    // )");
        self.line("    unimplemented!()");
        self.line("}");
        self.line("");
    }

    /// Depth-first walk over `cases` in document order.
    pub fn walk(&mut self, cases: &[CaseNode]) -> Result<(), GenerateError> {
        for case in cases {
            if case.expected.is_none() {
                if let Some(description) = &case.description {
                    self.comment_lines("//", description);
                }
                if let Some(comments) = &case.comments {
                    self.comment_lines("//", comments);
                }
                if case.description.is_some() || case.comments.is_some() {
                    self.line("");
                }
            }

            if case.is_leaf() {
                self.emit_case(case)?;
            }

            if let Some(children) = &case.cases {
                self.walk(children)?;
            }
        }
        Ok(())
    }

    fn emit_case(&mut self, case: &CaseNode) -> Result<(), GenerateError> {
        let (Some(description), Some(expected)) = (&case.description, &case.expected) else {
            return Ok(());
        };
        let description = description.joined();
        let item = to_item_name(&description)?;
        trace!(test = %item, property = case.property_name(), "emitting case");

        let input = match &case.input {
            Some(input) => Literal::from(input),
            None => Literal::Tuple(
                case.loose_field_names()
                    .into_iter()
                    .map(|name| Literal::from(&case.fields[name]))
                    .collect(),
            ),
        };
        let expected = Literal::from(expected);

        self.line("#[test]");
        if !self.first_case {
            self.line("#[ignore]");
        }
        self.line(&format!("/// {description}"));
        if let Some(comments) = &case.comments {
            self.line("///");
            self.comment_lines("///", comments);
        }
        self.line(&format!("fn test_{item}() {{"));
        self.line(&format!(
            "    process_{}_case({}, {});",
            case.property_name().to_lowercase(),
            input.render(self.map_style),
            expected.render(self.map_style)
        ));
        self.line("}");
        self.line("");

        self.first_case = false;
        self.tests += 1;
        Ok(())
    }
}
