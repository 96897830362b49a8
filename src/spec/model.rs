use serde_json::{Map, Value};
use std::collections::HashSet;

use crate::spec::errors::SpecError;

/// Key that turns an object-valued field into a repeated group.
pub const ROOT_KEY: &str = "root";

/// How one output field is located in the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldSelector {
    /// First element matching the selector; the field value is its text.
    Scalar(String),
    /// One record per row matched by `root`, header row excluded.
    RepeatedGroup(GroupSelector),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupSelector {
    pub root: String,
    pub columns: Vec<Column>,
}

/// A sub-field of a repeated group, evaluated inside each row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub name: String,
    pub selector: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub name: String,
    pub selector: FieldSelector,
}

/// A validated extraction request: field names are unique, every selector is
/// non-empty and every repeated group has at least one column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorSpec {
    fields: Vec<Field>,
}

impl SelectorSpec {
    pub fn builder() -> SpecBuilder {
        SpecBuilder::default()
    }

    /// Decode a JSON payload such as
    /// `{"title": "h1", "prices": {"root": "tr", "price": "td.price"}}`.
    pub fn decode(raw: &[u8]) -> Result<Self, SpecError> {
        let value: Value = serde_json::from_slice(raw)
            .map_err(|err| SpecError::Payload(format!("invalid JSON: {err}")))?;
        Self::from_value(value)
    }

    pub fn from_value(value: Value) -> Result<Self, SpecError> {
        let Value::Object(fields) = value else {
            return Err(SpecError::Payload(format!(
                "expected an object of fields, got {}",
                json_kind(&value)
            )));
        };

        let mut builder = Self::builder();
        for (name, value) in fields {
            builder = match value {
                Value::String(selector) => builder.scalar(name, selector),
                Value::Object(group) => {
                    let (root, columns) = split_group(&name, group)?;
                    builder.group(name, root, columns)
                }
                other => {
                    return Err(SpecError::field(
                        name,
                        format!(
                            "expected a selector string or a group object, got {}",
                            json_kind(&other)
                        ),
                    ));
                }
            };
        }
        builder.build()
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl TryFrom<Value> for SelectorSpec {
    type Error = SpecError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Self::from_value(value)
    }
}

fn split_group(
    name: &str,
    mut group: Map<String, Value>,
) -> Result<(String, Vec<(String, String)>), SpecError> {
    let root = match group.remove(ROOT_KEY) {
        Some(Value::String(root)) => root,
        Some(other) => {
            return Err(SpecError::field(
                format!("{name}.{ROOT_KEY}"),
                format!("expected a selector string, got {}", json_kind(&other)),
            ));
        }
        None => {
            return Err(SpecError::field(
                name,
                format!("group object is missing the '{ROOT_KEY}' selector"),
            ));
        }
    };

    let mut columns = Vec::with_capacity(group.len());
    for (column, value) in group {
        match value {
            Value::String(selector) => columns.push((column, selector)),
            other => {
                return Err(SpecError::field(
                    format!("{name}.{column}"),
                    format!("expected a selector string, got {}", json_kind(&other)),
                ));
            }
        }
    }
    Ok((root, columns))
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Builds a [`SelectorSpec`] in code, applying the same validation as
/// [`SelectorSpec::decode`].
#[derive(Debug, Default)]
pub struct SpecBuilder {
    fields: Vec<Field>,
}

impl SpecBuilder {
    pub fn scalar(mut self, name: impl Into<String>, selector: impl Into<String>) -> Self {
        self.fields.push(Field {
            name: name.into(),
            selector: FieldSelector::Scalar(selector.into()),
        });
        self
    }

    pub fn group<I, K, V>(mut self, name: impl Into<String>, root: impl Into<String>, columns: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let columns = columns
            .into_iter()
            .map(|(name, selector)| Column {
                name: name.into(),
                selector: selector.into(),
            })
            .collect();
        self.fields.push(Field {
            name: name.into(),
            selector: FieldSelector::RepeatedGroup(GroupSelector {
                root: root.into(),
                columns,
            }),
        });
        self
    }

    pub fn build(self) -> Result<SelectorSpec, SpecError> {
        let mut seen = HashSet::new();
        for field in &self.fields {
            if !seen.insert(field.name.as_str()) {
                return Err(SpecError::field(&field.name, "duplicate field name"));
            }
            validate_field(field)?;
        }
        Ok(SelectorSpec {
            fields: self.fields,
        })
    }
}

fn validate_field(field: &Field) -> Result<(), SpecError> {
    match &field.selector {
        FieldSelector::Scalar(selector) => require_selector(&field.name, selector),
        FieldSelector::RepeatedGroup(group) => {
            require_selector(&format!("{}.{ROOT_KEY}", field.name), &group.root)?;
            if group.columns.is_empty() {
                return Err(SpecError::field(
                    &field.name,
                    format!("group needs at least one column besides '{ROOT_KEY}'"),
                ));
            }

            let mut seen = HashSet::new();
            for column in &group.columns {
                let path = format!("{}.{}", field.name, column.name);
                if column.name == ROOT_KEY || !seen.insert(column.name.as_str()) {
                    return Err(SpecError::field(path, "duplicate column name"));
                }
                require_selector(&path, &column.selector)?;
            }
            Ok(())
        }
    }
}

fn require_selector(path: &str, selector: &str) -> Result<(), SpecError> {
    if selector.trim().is_empty() {
        return Err(SpecError::field(path, "selector must not be empty"));
    }
    Ok(())
}
