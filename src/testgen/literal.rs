use serde_json::{Number, Value};

/// How map values are spelled in generated tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MapStyle {
    /// Build a `HashMap` in a block expression, one `insert` per entry.
    #[default]
    Insert,
    /// `hashmap!{…}` from the maplit crate.
    Maplit,
}

/// A value as it will be written into a test.
///
/// JSON has no tuples; `Tuple` only comes from inputs reconstructed out of a
/// case's loose fields.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Str(String),
    Number(Number),
    Bool(bool),
    Null,
    List(Vec<Literal>),
    Tuple(Vec<Literal>),
    Map(Vec<(Literal, Literal)>),
}

impl From<&Value> for Literal {
    fn from(value: &Value) -> Self {
        match value {
            Value::String(s) => Literal::Str(s.clone()),
            Value::Number(n) => Literal::Number(n.clone()),
            Value::Bool(b) => Literal::Bool(*b),
            Value::Null => Literal::Null,
            Value::Array(items) => Literal::List(items.iter().map(Literal::from).collect()),
            Value::Object(map) => Literal::Map(
                map.iter()
                    .map(|(k, v)| (Literal::Str(k.clone()), Literal::from(v)))
                    .collect(),
            ),
        }
    }
}

impl Literal {
    pub fn render(&self, style: MapStyle) -> String {
        match self {
            // Quotes and backslashes inside the string are written as-is.
            Literal::Str(s) => format!("\"{s}\""),
            Literal::Number(n) => n.to_string(),
            Literal::Bool(b) => b.to_string(),
            Literal::Null => "None".to_string(),
            Literal::List(items) => format!("vec![{}]", render_joined(items, style)),
            // `(x)` is just a parenthesized `x`
            Literal::Tuple(items) if items.len() == 1 => format!("({},)", items[0].render(style)),
            Literal::Tuple(items) => format!("({})", render_joined(items, style)),
            Literal::Map(entries) => match style {
                MapStyle::Maplit => {
                    let entries: Vec<String> = entries
                        .iter()
                        .map(|(k, v)| format!("{}=>{}", k.render(style), v.render(style)))
                        .collect();
                    format!("hashmap!{{{}}}", entries.join(","))
                }
                MapStyle::Insert => {
                    let inserts: String = entries
                        .iter()
                        .map(|(k, v)| format!("hm.insert({}, {});", k.render(style), v.render(style)))
                        .collect();
                    format!("{{let mut hm=::std::collections::HashMap::new();{inserts}hm}}")
                }
            },
        }
    }
}

fn render_joined(items: &[Literal], style: MapStyle) -> String {
    items
        .iter()
        .map(|item| item.render(style))
        .collect::<Vec<_>>()
        .join(", ")
}
