//! Output schema descriptors for structured generation.
//!
//! A [`Schema`] declares the shape a generator response must take. It renders
//! to the OpenAPI subset accepted by Gemini's `responseSchema` (upper-case
//! type names, `required`, `propertyOrdering`, `enum`).

use serde_json::{json, Map, Value};

#[derive(Debug, Clone, PartialEq)]
pub enum Schema {
    String {
        description: Option<String>,
        enum_values: Vec<String>,
    },
    Integer {
        description: Option<String>,
    },
    Number {
        description: Option<String>,
    },
    Boolean {
        description: Option<String>,
    },
    Array {
        items: Box<Schema>,
        description: Option<String>,
    },
    Object {
        /// Declaration order is preserved and sent as `propertyOrdering`.
        properties: Vec<(String, Schema)>,
        required: Vec<String>,
        description: Option<String>,
    },
}

impl Schema {
    #[must_use]
    pub fn string() -> Self {
        Schema::String {
            description: None,
            enum_values: Vec::new(),
        }
    }

    #[must_use]
    pub fn integer() -> Self {
        Schema::Integer { description: None }
    }

    #[must_use]
    pub fn number() -> Self {
        Schema::Number { description: None }
    }

    #[must_use]
    pub fn boolean() -> Self {
        Schema::Boolean { description: None }
    }

    #[must_use]
    pub fn array(items: Schema) -> Self {
        Schema::Array {
            items: Box::new(items),
            description: None,
        }
    }

    #[must_use]
    pub fn string_list() -> Self {
        Self::array(Self::string())
    }

    /// String restricted to a fixed set of values.
    #[must_use]
    pub fn enumeration(values: &[&str]) -> Self {
        Schema::String {
            description: None,
            enum_values: values.iter().map(|v| (*v).to_string()).collect(),
        }
    }

    /// Object whose listed properties are all required.
    #[must_use]
    pub fn object<I, K>(properties: I) -> Self
    where
        I: IntoIterator<Item = (K, Schema)>,
        K: Into<String>,
    {
        let properties: Vec<(String, Schema)> = properties
            .into_iter()
            .map(|(name, schema)| (name.into(), schema))
            .collect();
        let required = properties.iter().map(|(name, _)| name.clone()).collect();
        Schema::Object {
            properties,
            required,
            description: None,
        }
    }

    /// Append a non-required property. No-op on non-object schemas.
    #[must_use]
    pub fn optional(mut self, name: &str, schema: Schema) -> Self {
        if let Schema::Object { properties, .. } = &mut self {
            properties.push((name.to_string(), schema));
        }
        self
    }

    /// Attach a description that the model sees next to the field.
    #[must_use]
    pub fn describe(mut self, text: &str) -> Self {
        let slot = match &mut self {
            Schema::String { description, .. }
            | Schema::Integer { description }
            | Schema::Number { description }
            | Schema::Boolean { description }
            | Schema::Array { description, .. }
            | Schema::Object { description, .. } => description,
        };
        *slot = Some(text.to_string());
        self
    }

    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Schema::String { .. } => "STRING",
            Schema::Integer { .. } => "INTEGER",
            Schema::Number { .. } => "NUMBER",
            Schema::Boolean { .. } => "BOOLEAN",
            Schema::Array { .. } => "ARRAY",
            Schema::Object { .. } => "OBJECT",
        }
    }

    /// Look up a direct property of an object schema.
    #[must_use]
    pub fn property(&self, name: &str) -> Option<&Schema> {
        match self {
            Schema::Object { properties, .. } => properties
                .iter()
                .find(|(prop, _)| prop == name)
                .map(|(_, schema)| schema),
            _ => None,
        }
    }

    /// Property names in declaration order.
    #[must_use]
    pub fn property_names(&self) -> Vec<&str> {
        match self {
            Schema::Object { properties, .. } => {
                properties.iter().map(|(name, _)| name.as_str()).collect()
            }
            _ => Vec::new(),
        }
    }

    #[must_use]
    pub fn is_required(&self, name: &str) -> bool {
        match self {
            Schema::Object { required, .. } => required.iter().any(|r| r == name),
            _ => false,
        }
    }

    /// Required top-level properties that `value` lacks or sets to null.
    ///
    /// A non-object value against an object schema is missing all of them.
    /// Non-object schemas require nothing.
    #[must_use]
    pub fn missing_required(&self, value: &Value) -> Vec<String> {
        let Schema::Object { required, .. } = self else {
            return Vec::new();
        };
        required
            .iter()
            .filter(|name| value.get(name.as_str()).is_none_or(Value::is_null))
            .cloned()
            .collect()
    }

    /// Item schema of an array.
    #[must_use]
    pub fn items(&self) -> Option<&Schema> {
        match self {
            Schema::Array { items, .. } => Some(items),
            _ => None,
        }
    }

    /// Render as a Gemini `responseSchema` JSON value.
    #[must_use]
    pub fn to_json(&self) -> Value {
        let mut out = Map::new();
        out.insert("type".to_string(), json!(self.type_name()));

        match self {
            Schema::String {
                description,
                enum_values,
            } => {
                insert_description(&mut out, description.as_ref());
                if !enum_values.is_empty() {
                    out.insert("format".to_string(), json!("enum"));
                    out.insert("enum".to_string(), json!(enum_values));
                }
            }
            Schema::Integer { description }
            | Schema::Number { description }
            | Schema::Boolean { description } => {
                insert_description(&mut out, description.as_ref());
            }
            Schema::Array { items, description } => {
                insert_description(&mut out, description.as_ref());
                out.insert("items".to_string(), items.to_json());
            }
            Schema::Object {
                properties,
                required,
                description,
            } => {
                insert_description(&mut out, description.as_ref());
                let mut props = Map::new();
                for (name, schema) in properties {
                    props.insert(name.clone(), schema.to_json());
                }
                out.insert("properties".to_string(), Value::Object(props));
                out.insert(
                    "propertyOrdering".to_string(),
                    json!(properties.iter().map(|(n, _)| n).collect::<Vec<_>>()),
                );
                if !required.is_empty() {
                    out.insert("required".to_string(), json!(required));
                }
            }
        }

        Value::Object(out)
    }
}

fn insert_description(out: &mut Map<String, Value>, description: Option<&String>) {
    if let Some(text) = description {
        out.insert("description".to_string(), json!(text));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn object_marks_all_listed_properties_required() {
        let schema = Schema::object([("title", Schema::string()), ("count", Schema::integer())])
            .optional("note", Schema::string());
        assert!(schema.is_required("title"));
        assert!(schema.is_required("count"));
        assert!(!schema.is_required("note"));
        assert_eq!(schema.property_names(), vec!["title", "count", "note"]);
    }

    #[test]
    fn to_json_renders_gemini_shape() {
        let schema = Schema::object([
            ("severity", Schema::enumeration(&["High", "Medium", "Low"])),
            ("tags", Schema::string_list().describe("short tags")),
        ]);
        let value = schema.to_json();
        assert_eq!(value["type"], "OBJECT");
        assert_eq!(value["properties"]["severity"]["type"], "STRING");
        assert_eq!(value["properties"]["severity"]["format"], "enum");
        assert_eq!(
            value["properties"]["severity"]["enum"],
            json!(["High", "Medium", "Low"])
        );
        assert_eq!(value["properties"]["tags"]["type"], "ARRAY");
        assert_eq!(value["properties"]["tags"]["items"]["type"], "STRING");
        assert_eq!(value["properties"]["tags"]["description"], "short tags");
        assert_eq!(value["propertyOrdering"], json!(["severity", "tags"]));
        assert_eq!(value["required"], json!(["severity", "tags"]));
    }

    #[test]
    fn optional_on_non_object_is_ignored() {
        let schema = Schema::string().optional("x", Schema::integer());
        assert_eq!(schema, Schema::string());
    }

    #[test]
    fn missing_required_lists_absent_and_null_fields() {
        let schema = Schema::object([("title", Schema::string()), ("count", Schema::integer())])
            .optional("note", Schema::string());

        assert!(schema
            .missing_required(&json!({"title": "Fever guide", "count": 3}))
            .is_empty());
        assert_eq!(
            schema.missing_required(&json!({"title": "Fever guide", "count": null})),
            vec!["count"]
        );
        assert_eq!(schema.missing_required(&json!({})), vec!["title", "count"]);
        assert_eq!(
            schema.missing_required(&json!({"error": "quota exceeded"})),
            vec!["title", "count"]
        );
        assert_eq!(schema.missing_required(&json!([])), vec!["title", "count"]);
        assert!(Schema::string().missing_required(&json!({})).is_empty());
    }

    #[test]
    fn items_returns_array_element_schema() {
        let schema = Schema::array(Schema::integer());
        assert_eq!(schema.items().map(Schema::type_name), Some("INTEGER"));
        assert!(Schema::string().items().is_none());
    }
}
