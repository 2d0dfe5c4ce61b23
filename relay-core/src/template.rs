//! Placeholder interpolation
//!
//! Strings may contain `{NAME}` placeholders. They are filled from the
//! build metadata the CI engine exports (`BUILD_*`, `ATC_EXTERNAL_URL`) and
//! from the resource parameters themselves. `{{` and `}}` produce literal
//! braces. Unknown names and unbalanced braces are errors.

use serde_json::{Map, Value};
use std::collections::BTreeMap;

use crate::error::{CoreError, Result};

/// Prefix of the build metadata variables exported by the CI engine
pub const BUILD_VAR_PREFIX: &str = "BUILD_";

/// External URL of the CI engine, exported alongside the build metadata
pub const EXTERNAL_URL_VAR: &str = "ATC_EXTERNAL_URL";

/// Values available to `{NAME}` placeholders
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InterpolationValues {
    values: BTreeMap<String, String>,
}

impl InterpolationValues {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collects the build metadata variables out of a process environment
    pub fn from_environment<I>(vars: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let values = vars
            .into_iter()
            .filter(|(key, _)| is_build_variable(key))
            .collect();
        Self { values }
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    /// Adds every parameter as a value, overriding environment entries
    pub fn extend_params(&mut self, params: &Map<String, Value>) {
        for (key, value) in params {
            self.values.insert(key.clone(), stringify(value));
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Whether an environment variable is build metadata
pub fn is_build_variable(key: &str) -> bool {
    key.starts_with(BUILD_VAR_PREFIX) || key == EXTERNAL_URL_VAR
}

/// Text substituted for a JSON value inside a template
pub fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Render a single template string
pub fn render(template: &str, values: &InterpolationValues) -> Result<String> {
    let mut out = String::with_capacity(template.len());
    let mut chars = template.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '{' => {
                if chars.peek() == Some(&'{') {
                    chars.next();
                    out.push('{');
                    continue;
                }

                let mut name = String::new();
                let mut closed = false;
                for c in chars.by_ref() {
                    match c {
                        '}' => {
                            closed = true;
                            break;
                        }
                        '{' => return Err(CoreError::malformed(template, "nested '{'")),
                        c => name.push(c),
                    }
                }

                if !closed {
                    return Err(CoreError::malformed(template, "unclosed '{'"));
                }
                if name.is_empty() {
                    return Err(CoreError::malformed(template, "empty placeholder"));
                }

                let value = values
                    .get(&name)
                    .ok_or_else(|| CoreError::UnknownPlaceholder(name.clone()))?;
                out.push_str(value);
            }
            '}' => {
                if chars.peek() == Some(&'}') {
                    chars.next();
                    out.push('}');
                } else {
                    return Err(CoreError::malformed(template, "single '}'"));
                }
            }
            c => out.push(c),
        }
    }

    Ok(out)
}

/// Recursively render every string in a JSON value, object keys included
pub fn interpolate(value: &Value, values: &InterpolationValues) -> Result<Value> {
    match value {
        Value::String(s) => Ok(Value::String(render(s, values)?)),
        Value::Array(items) => items
            .iter()
            .map(|item| interpolate(item, values))
            .collect::<Result<Vec<_>>>()
            .map(Value::Array),
        Value::Object(map) => interpolate_map(map, values).map(Value::Object),
        other => Ok(other.clone()),
    }
}

/// [`interpolate`] for a top-level parameter map
pub fn interpolate_map(
    map: &Map<String, Value>,
    values: &InterpolationValues,
) -> Result<Map<String, Value>> {
    let mut rendered = Map::with_capacity(map.len());
    for (key, value) in map {
        rendered.insert(render(key, values)?, interpolate(value, values)?);
    }
    Ok(rendered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn values() -> InterpolationValues {
        let mut values = InterpolationValues::new();
        values.insert("BUILD_NAME", "1");
        values.insert("BUILD_JOB_NAME", "deploy");
        values
    }

    #[test]
    fn test_render_placeholders() {
        let rendered = render("job {BUILD_JOB_NAME} #{BUILD_NAME}", &values()).unwrap();
        assert_eq!(rendered, "job deploy #1");
    }

    #[test]
    fn test_render_escaped_braces() {
        let rendered = render("{{\"build\": {BUILD_NAME}}}", &values()).unwrap();
        assert_eq!(rendered, "{\"build\": 1}");
    }

    #[test]
    fn test_render_unknown_placeholder() {
        let err = render("{MISSING}", &values()).unwrap_err();
        assert!(matches!(err, CoreError::UnknownPlaceholder(name) if name == "MISSING"));
    }

    #[test]
    fn test_render_malformed() {
        assert!(matches!(
            render("open {BUILD_NAME", &values()),
            Err(CoreError::MalformedTemplate { .. })
        ));
        assert!(matches!(
            render("stray } brace", &values()),
            Err(CoreError::MalformedTemplate { .. })
        ));
        assert!(matches!(
            render("empty {}", &values()),
            Err(CoreError::MalformedTemplate { .. })
        ));
    }

    #[test]
    fn test_interpolate_recursively() {
        let input = json!({
            "json": {
                "object": {"test": "{BUILD_NAME}"},
                "array": ["{BUILD_NAME}", 42, true, null],
            },
            "{BUILD_JOB_NAME}-key": "value",
        });

        let output = interpolate(&input, &values()).unwrap();
        assert_eq!(output["json"]["object"]["test"], json!("1"));
        assert_eq!(output["json"]["array"], json!(["1", 42, true, null]));
        assert_eq!(output["deploy-key"], json!("value"));
    }

    #[test]
    fn test_from_environment_filters_build_vars() {
        let vars = vec![
            ("BUILD_ID".to_string(), "7".to_string()),
            ("ATC_EXTERNAL_URL".to_string(), "https://ci".to_string()),
            ("HOME".to_string(), "/root".to_string()),
        ];

        let values = InterpolationValues::from_environment(vars);
        assert_eq!(values.len(), 2);
        assert_eq!(values.get("BUILD_ID"), Some("7"));
        assert_eq!(values.get("ATC_EXTERNAL_URL"), Some("https://ci"));
        assert_eq!(values.get("HOME"), None);
    }

    #[test]
    fn test_extend_params_stringifies() {
        let mut values = InterpolationValues::new();
        let params = json!({"count": 3, "flag": false, "none": null, "list": [1, 2]});
        if let Value::Object(map) = params {
            values.extend_params(&map);
        }

        assert_eq!(values.get("count"), Some("3"));
        assert_eq!(values.get("flag"), Some("false"));
        assert_eq!(values.get("none"), Some(""));
        assert_eq!(values.get("list"), Some("[1,2]"));
    }
}
