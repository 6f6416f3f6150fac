//! Request parameters from the query string or a JSON body.

use std::collections::HashMap;

use axum::{
    extract::{FromRequest, Query, Request},
    http::Method,
};
use bytes::Bytes;
use serde_json::{Map, Value};

use crate::error::ApiError;

/// Parameters of an integration call.
///
/// Every integration accepts its parameters either in the query string or
/// in a JSON object body; the query wins when both carry a value. Empty
/// strings count as absent, and JSON numbers and booleans are read as their
/// textual form.
///
/// Must be the last extractor of a handler since it consumes the body.
#[derive(Debug, Clone, Default)]
pub struct Params {
    query: HashMap<String, String>,
    body: Map<String, Value>,
}

impl Params {
    pub fn new(query: HashMap<String, String>, body: Map<String, Value>) -> Self {
        Self { query, body }
    }

    /// Value of `name`, query string first.
    pub fn get(&self, name: &str) -> Option<String> {
        self.query
            .get(name)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
            .map(String::from)
            .or_else(|| self.body.get(name).and_then(scalar_text))
    }

    /// First present value among several aliases, e.g. `query` or `q`.
    pub fn first_of(&self, names: &[&str]) -> Option<String> {
        names.iter().find_map(|name| self.get(name))
    }

    pub fn require(&self, name: &str) -> Result<String, ApiError> {
        self.get(name)
            .ok_or_else(|| ApiError::bad_request(format!("Parameter '{}' is required", name)))
    }

    /// Like [`Params::first_of`] but reports the first alias when all are missing.
    pub fn require_any(&self, names: &[&str]) -> Result<String, ApiError> {
        self.first_of(names).ok_or_else(|| {
            ApiError::bad_request(format!("Parameter '{}' is required", names[0]))
        })
    }

    /// Parses an optional numeric parameter.
    pub fn number<T: std::str::FromStr>(&self, name: &str) -> Result<Option<T>, ApiError> {
        match self.get(name) {
            None => Ok(None),
            Some(raw) => raw.parse().map(Some).map_err(|_| {
                ApiError::bad_request(format!("Parameter '{}' must be a number", name))
            }),
        }
    }

    /// Reads a boolean flag: `true`, `1`, `yes` and `on` are true.
    pub fn flag(&self, name: &str) -> bool {
        self.get(name).is_some_and(|v| {
            matches!(
                v.to_ascii_lowercase().as_str(),
                "true" | "1" | "yes" | "on"
            )
        })
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => return None,
    };
    (!text.is_empty()).then_some(text)
}

impl<S> FromRequest<S> for Params
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let query = Query::<HashMap<String, String>>::try_from_uri(req.uri())
            .map(|Query(q)| q)
            .unwrap_or_default();

        if req.method() == Method::GET || req.method() == Method::HEAD {
            return Ok(Self::new(query, Map::new()));
        }

        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|rejection| ApiError::bad_request(rejection.body_text()))?;

        let body = if bytes.iter().all(u8::is_ascii_whitespace) {
            Map::new()
        } else {
            match serde_json::from_slice::<Value>(&bytes) {
                Ok(Value::Object(map)) => map,
                Ok(_) => return Err(ApiError::bad_request("Request body must be a JSON object")),
                Err(_) => return Err(ApiError::bad_request("Request body is not valid JSON")),
            }
        };

        Ok(Self::new(query, body))
    }
}
