//! Name collection from GraphQL introspection results

use crate::error::*;
use crate::names::NameSet;
use serde::Deserialize;
use serde_json::Value as JsonValue;

/// Options for schema name collection
///
/// The default walk matches the long-standing baseline layout, so
/// baselines built elsewhere with the same walk stay code-compatible.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IntrospectionOpts {
    /// Also collect `inputFields[].name`. Changes every code position
    /// after the first input field name, so both ends must agree on it.
    pub input_fields: bool,
}

impl IntrospectionOpts {
    /// Options that also harvest input object field names
    pub fn with_input_fields() -> Self {
        Self { input_fields: true }
    }
}

/// The parts of `__schema` that carry names
///
/// Required lists are not defaulted: a result without them is rejected.
#[derive(Debug, Clone, Deserialize)]
pub struct IntrospectionSchema {
    pub directives: Vec<IntrospectionDirective>,
    pub types: Vec<IntrospectionType>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IntrospectionDirective {
    pub name: String,
    pub args: Vec<NamedItem>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntrospectionType {
    pub name: String,
    #[serde(default)]
    pub enum_values: Option<Vec<NamedItem>>,
    #[serde(default)]
    pub fields: Option<Vec<IntrospectionField>>,
    #[serde(default)]
    pub input_fields: Option<Vec<NamedItem>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IntrospectionField {
    pub name: String,
    pub args: Vec<NamedItem>,
}

/// Argument, enum value or input field; only the name matters here
#[derive(Debug, Clone, Deserialize)]
pub struct NamedItem {
    pub name: String,
}

impl IntrospectionSchema {
    /// Deserialize from an introspection result, unwrapping a
    /// `{"data": {"__schema": ..}}` or `{"__schema": ..}` envelope
    pub fn from_json(json: &JsonValue) -> Result<Self> {
        let schema = if let Some(data) = json.get("data") {
            data.get("__schema")
                .ok_or_else(|| CodecError::MissingField("data.__schema".to_string()))?
        } else if let Some(schema) = json.get("__schema") {
            schema
        } else {
            json
        };
        Ok(IntrospectionSchema::deserialize(schema)?)
    }

    /// Every directive, argument, type, enum value and field name, plus
    /// the reserved keywords
    pub fn names(&self) -> NameSet {
        self.names_with_opts(&IntrospectionOpts::default())
    }

    /// Collect names with custom options
    pub fn names_with_opts(&self, opts: &IntrospectionOpts) -> NameSet {
        let mut all = Vec::new();

        for directive in &self.directives {
            all.push(directive.name.as_str());
            all.extend(directive.args.iter().map(|a| a.name.as_str()));
        }

        for ty in &self.types {
            all.push(ty.name.as_str());
            if let Some(values) = &ty.enum_values {
                all.extend(values.iter().map(|v| v.name.as_str()));
            }
            if let Some(fields) = &ty.fields {
                for field in fields {
                    all.push(field.name.as_str());
                    all.extend(field.args.iter().map(|a| a.name.as_str()));
                }
            }
            if let Some(inputs) = ty.input_fields.as_ref().filter(|_| opts.input_fields) {
                all.extend(inputs.iter().map(|i| i.name.as_str()));
            }
        }

        NameSet::with_reserved(all)
    }
}

/// Collect the unique names of an introspection result
pub fn names_from_introspection(json: &JsonValue) -> Result<NameSet> {
    names_from_introspection_with_opts(json, &IntrospectionOpts::default())
}

/// Collect the unique names of an introspection result with custom options
pub fn names_from_introspection_with_opts(
    json: &JsonValue,
    opts: &IntrospectionOpts,
) -> Result<NameSet> {
    let names = IntrospectionSchema::from_json(json)?.names_with_opts(opts);
    tracing::trace!(
        count = names.len(),
        input_fields = opts.input_fields,
        "collected names from introspection"
    );
    Ok(names)
}

/// Parse introspection JSON text and collect its unique names
pub fn names_from_introspection_str(json_str: &str) -> Result<NameSet> {
    let json: JsonValue = serde_json::from_str(json_str)?;
    names_from_introspection(&json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn small_schema() -> JsonValue {
        json!({
            "directives": [
                {"name": "skip", "args": [{"name": "if"}]}
            ],
            "types": [
                {
                    "name": "Query",
                    "fields": [
                        {"name": "user", "args": [{"name": "id"}]}
                    ],
                    "enumValues": null
                },
                {
                    "name": "Role",
                    "fields": null,
                    "enumValues": [{"name": "ADMIN"}, {"name": "GUEST"}]
                },
                {
                    "name": "UserFilter",
                    "inputFields": [{"name": "role"}]
                }
            ]
        })
    }

    #[test]
    fn test_collects_schema_names() {
        let names = names_from_introspection(&small_schema()).unwrap();
        assert_eq!(
            names.as_slice(),
            &[
                "ADMIN", "GUEST", "Query", "Role", "UserFilter", "false", "fragment", "id", "if",
                "mutation", "on", "query", "skip", "subscription", "true", "user"
            ]
        );
    }

    #[test]
    fn test_input_fields_are_opt_in() {
        let schema = small_schema();
        assert!(!names_from_introspection(&schema).unwrap().contains("role"));

        let opts = IntrospectionOpts::with_input_fields();
        let names = names_from_introspection_with_opts(&schema, &opts).unwrap();
        assert!(names.contains("role"));
        assert_eq!(names.len(), 17);
    }

    #[test]
    fn test_envelopes() {
        let bare = names_from_introspection(&small_schema()).unwrap();
        let data = names_from_introspection(&json!({"data": {"__schema": small_schema()}})).unwrap();
        let schema = names_from_introspection(&json!({"__schema": small_schema()})).unwrap();
        assert_eq!(bare, data);
        assert_eq!(bare, schema);
    }

    #[test]
    fn test_missing_schema_in_envelope() {
        let err = names_from_introspection(&json!({"data": {}})).unwrap_err();
        assert!(matches!(err, CodecError::MissingField(f) if f == "data.__schema"));
    }

    #[test]
    fn test_missing_fields_fail_fast() {
        let no_types = json!({"directives": []});
        assert!(matches!(names_from_introspection(&no_types), Err(CodecError::Json(_))));

        let no_args = json!({
            "directives": [],
            "types": [{"name": "Query", "fields": [{"name": "user"}]}]
        });
        assert!(matches!(names_from_introspection(&no_args), Err(CodecError::Json(_))));
    }

    #[test]
    fn test_invalid_json_text() {
        assert!(matches!(names_from_introspection_str("{"), Err(CodecError::Json(_))));
    }
}
