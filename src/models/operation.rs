use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Destination slot of a parameter binding in the outbound request.
///
/// Unrecognized or missing locations deserialize as `Query`, which is also the
/// routing fallback during template generation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ParamLocation {
    Path,
    Header,
    Body,
    #[default]
    #[serde(other)]
    Query,
}

/// A declared binding from an external input to one slot of an outbound request.
///
/// `required`, `default`, `example`, `type` and `description` are descriptive
/// metadata only; template generation never reads them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct Parameter {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Key under which the value arrives from the calling context; falls back to `name`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input_key: Option<String>,
    /// Key to place the value under in the destination section; falls back to `name`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    pub location: ParamLocation,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub param_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub example: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Parameter {
    /// The substitution source: `input_key` falling back to `name`, never empty
    pub fn source_key(&self) -> Option<&str> {
        non_empty(self.input_key.as_deref()).or_else(|| non_empty(Some(&self.name)))
    }

    /// The destination key: `target` falling back to `name`, never empty
    pub fn target_key(&self) -> Option<&str> {
        non_empty(self.target.as_deref()).or_else(|| non_empty(Some(&self.name)))
    }

    /// Whether this parameter binds the given path placeholder
    pub fn binds_placeholder(&self, placeholder: &str) -> bool {
        self.location == ParamLocation::Path && self.target_key() == Some(placeholder)
    }

    /// The default shape synthesized for an unbound path placeholder
    pub fn path_default(placeholder: &str) -> Self {
        Self {
            name: placeholder.to_string(),
            title: Some(placeholder.to_string()),
            input_key: Some(placeholder.to_string()),
            target: Some(placeholder.to_string()),
            location: ParamLocation::Path,
            param_type: Some("string".to_string()),
            ..Default::default()
        }
    }
}

fn non_empty(v: Option<&str>) -> Option<&str> {
    v.filter(|s| !s.is_empty())
}

/// Field-wise patch applied to a single path parameter; `None` leaves the field untouched
#[derive(Debug, Clone, Default)]
pub struct ParameterPatch {
    pub name: Option<String>,
    pub title: Option<String>,
    pub input_key: Option<String>,
    pub target: Option<String>,
    pub param_type: Option<String>,
}

impl ParameterPatch {
    pub fn apply(&self, param: &mut Parameter) {
        if let Some(name) = &self.name {
            param.name = name.clone();
        }
        if let Some(title) = &self.title {
            param.title = Some(title.clone());
        }
        if let Some(input_key) = &self.input_key {
            param.input_key = Some(input_key.clone());
        }
        if let Some(target) = &self.target {
            param.target = Some(target.clone());
        }
        if let Some(param_type) = &self.param_type {
            param.param_type = Some(param_type.clone());
        }
    }
}

/// Four-section structure of substitution expressions consumed by the connector
/// executor to build the literal outbound request. Values have the form
/// `{{<input_key>}}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct RequestTemplate {
    pub headers: BTreeMap<String, String>,
    pub query: BTreeMap<String, String>,
    pub body: BTreeMap<String, String>,
    pub path_params: BTreeMap<String, String>,
}

impl RequestTemplate {
    pub fn is_empty(&self) -> bool {
        self.headers.is_empty()
            && self.query.is_empty()
            && self.body.is_empty()
            && self.path_params.is_empty()
    }
}

/// One callable HTTP action exposed by a connector, as persisted
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Operation {
    pub id: Uuid,
    pub method: String,
    pub path: String,
    pub title: Option<String>,
    pub summary: Option<String>,
    pub scopes: Vec<String>,
    pub params: Vec<Parameter>,
    pub request_tmpl: RequestTemplate,
    pub enabled: bool,
}

/// Editable operation shape as submitted by the console.
///
/// `request_tmpl = None` means auto-generation is enabled; a supplied template
/// is persisted verbatim.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(default)]
pub struct OperationDraft {
    pub method: String,
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    pub scopes: Vec<String>,
    pub params: Vec<Parameter>,
    pub request_tmpl: Option<RequestTemplate>,
    pub enabled: Option<bool>,
}

impl Default for OperationDraft {
    fn default() -> Self {
        Self {
            method: "GET".to_string(),
            path: String::new(),
            title: None,
            summary: None,
            scopes: Vec::new(),
            params: Vec::new(),
            request_tmpl: None,
            enabled: None,
        }
    }
}

impl OperationDraft {
    pub const METHODS: [&'static str; 5] = ["GET", "POST", "PUT", "PATCH", "DELETE"];

    /// Uppercased method, or an error when it is not a supported verb
    pub fn normalized_method(&self) -> Result<String, String> {
        let method = self.method.trim().to_uppercase();
        if Self::METHODS.contains(&method.as_str()) {
            Ok(method)
        } else {
            Err(format!("unsupported HTTP method: {}", self.method))
        }
    }
}
