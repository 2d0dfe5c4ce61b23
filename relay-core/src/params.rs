//! HTTP request parameters
//!
//! Built from the rendered parameter map. Unknown keys are ignored so the
//! same `source` block can carry settings for other tooling.

use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

use crate::error::{CoreError, Result};
use crate::pyjson::to_python_json;

/// Status codes accepted when `ok_responses` is not configured
pub const DEFAULT_OK_RESPONSES: [u16; 4] = [200, 201, 202, 204];

/// Certificate verification setting
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum SslVerify {
    /// Verify against system roots (`true`) or not at all (`false`)
    Enabled(bool),
    /// PEM bundle of additional trusted roots
    CaBundle(String),
}

impl Default for SslVerify {
    fn default() -> Self {
        Self::Enabled(true)
    }
}

/// Fully rendered description of the request to send
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct HttpParams {
    pub uri: String,
    #[serde(default = "default_method")]
    pub method: String,
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
    /// JSON request body
    #[serde(default)]
    pub json: Option<Value>,
    /// Url-encoded form body; each value is sent as JSON text
    #[serde(default)]
    pub form_data: Option<Map<String, Value>>,
    #[serde(default)]
    pub ssl_verify: SslVerify,
    #[serde(default = "default_ok_responses")]
    pub ok_responses: Vec<u16>,
}

fn default_method() -> String {
    "GET".to_string()
}

fn default_ok_responses() -> Vec<u16> {
    DEFAULT_OK_RESPONSES.to_vec()
}

impl HttpParams {
    /// Build from a rendered parameter map
    pub fn from_params(params: &Map<String, Value>) -> Result<Self> {
        if !params.contains_key("uri") {
            return Err(CoreError::MissingParameter("uri".to_string()));
        }

        serde_json::from_value(Value::Object(params.clone()))
            .map_err(|e| CoreError::invalid_parameter("params", e.to_string()))
    }

    /// Create parameters for a plain GET of `uri`
    pub fn get(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            method: default_method(),
            headers: BTreeMap::new(),
            json: None,
            form_data: None,
            ssl_verify: SslVerify::default(),
            ok_responses: default_ok_responses(),
        }
    }

    pub fn is_ok_status(&self, status: u16) -> bool {
        self.ok_responses.contains(&status)
    }

    /// Form fields to send, or `None` when no form data is configured
    pub fn form_fields(&self) -> Result<Option<Vec<(String, String)>>> {
        let Some(form_data) = self.form_data.as_ref().filter(|f| !f.is_empty()) else {
            return Ok(None);
        };

        form_data
            .iter()
            .map(|(key, value)| {
                to_python_json(value)
                    .map(|encoded| (key.clone(), encoded))
                    .map_err(|e| CoreError::invalid_parameter(key.as_str(), e.to_string()))
            })
            .collect::<Result<Vec<_>>>()
            .map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn params(value: Value) -> Result<HttpParams> {
        match value {
            Value::Object(map) => HttpParams::from_params(&map),
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn test_defaults() {
        let p = params(json!({"uri": "http://host/status/200"})).unwrap();
        assert_eq!(p, HttpParams::get("http://host/status/200"));
        assert!(p.is_ok_status(204));
        assert!(!p.is_ok_status(404));
        assert_eq!(p.form_fields().unwrap(), None);
    }

    #[test]
    fn test_missing_uri() {
        let err = params(json!({"method": "POST"})).unwrap_err();
        assert!(matches!(err, CoreError::MissingParameter(name) if name == "uri"));
    }

    #[test]
    fn test_full_params() {
        let p = params(json!({
            "uri": "http://host/post",
            "method": "POST",
            "headers": {"X-Token": "abc"},
            "json": {"test": 123},
            "ssl_verify": false,
            "ok_responses": [200, 418],
            "debug": true,
            "unrelated": "ignored",
        }))
        .unwrap();

        assert_eq!(p.method, "POST");
        assert_eq!(p.headers.get("X-Token").map(String::as_str), Some("abc"));
        assert_eq!(p.json, Some(json!({"test": 123})));
        assert_eq!(p.ssl_verify, SslVerify::Enabled(false));
        assert!(p.is_ok_status(418));
        assert!(!p.is_ok_status(201));
    }

    #[test]
    fn test_ssl_verify_bundle() {
        let p = params(json!({"uri": "https://h", "ssl_verify": "-----BEGIN CERTIFICATE-----"}))
            .unwrap();
        assert!(matches!(p.ssl_verify, SslVerify::CaBundle(_)));
    }

    #[test]
    fn test_invalid_shape() {
        let err = params(json!({"uri": "http://h", "ok_responses": "200"})).unwrap_err();
        assert!(matches!(err, CoreError::InvalidParameter { .. }));
    }

    #[test]
    fn test_form_fields_python_encoding() {
        let p = params(json!({
            "uri": "http://h",
            "form_data": {"field": {"test": 123}, "name": "日本語"},
        }))
        .unwrap();

        let fields = p.form_fields().unwrap().unwrap();
        assert_eq!(
            fields,
            vec![
                ("field".to_string(), r#"{"test": 123}"#.to_string()),
                ("name".to_string(), r#""日本語""#.to_string()),
            ]
        );
    }

    #[test]
    fn test_empty_form_is_skipped() {
        let p = params(json!({"uri": "http://h", "form_data": {}})).unwrap();
        assert_eq!(p.form_fields().unwrap(), None);
    }
}
