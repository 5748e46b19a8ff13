//! Validating extractors: every route input passes through its catalog
//! schema before a handler sees it, and every failure is classified the
//! same way, so the success and error paths can never disagree.

use std::collections::BTreeMap;

use axum::body::to_bytes;
use axum::extract::{FromRequest, FromRequestParts, Path, Request};
use axum::http::request::Parts;
use serde_json::{Map, Value};

use siakad_validation::{FieldReport, Issues, Schema};

use crate::error::ApiError;
use crate::schemas::Validated;

/// Which part of the request an input came from. Used to re-key issues that
/// address the input root itself (e.g. a non-object body).
#[derive(Debug, Clone, Copy)]
pub enum Source {
    Body,
    Query,
    Params,
}

impl Source {
    fn label(self) -> &'static str {
        match self {
            Self::Body => "body",
            Self::Query => "query",
            Self::Params => "params",
        }
    }
}

/// Turn validation issues into the client-facing errors object.
///
/// Structural failures (missing required keys or undeclared keys, judged
/// against the raw input) produce the field-report shape; anything else
/// produces per-field message lists. A schema declaring no fields cannot
/// describe its shape, so it always degrades to the per-field form.
fn classify(raw: &Value, schema: &Schema, issues: Issues, source: Source) -> ApiError {
    let report = FieldReport::analyze(raw, schema);
    if !report.expected.is_empty() && report.is_structural() {
        let mut errors = Map::new();
        errors.insert("expectedFields".to_owned(), report.expected.into());
        if !report.missing.is_empty() {
            errors.insert("missingFields".to_owned(), report.missing.into());
        }
        if !report.unexpected.is_empty() {
            errors.insert("unexpectedFields".to_owned(), report.unexpected.into());
        }
        return ApiError::Validation(Value::Object(errors));
    }

    let mut fields = Map::new();
    for issue in issues.0 {
        let key = if issue.path.is_empty() {
            source.label().to_owned()
        } else {
            issue.path
        };
        match fields.get_mut(&key) {
            Some(Value::Array(messages)) => messages.push(issue.message.into()),
            _ => {
                fields.insert(key, Value::Array(vec![issue.message.into()]));
            }
        }
    }
    ApiError::Validation(Value::Object(fields))
}

/// Validate `raw` against `T`'s schema and deserialize the coerced output.
fn run<T: Validated>(raw: &Value, source: Source) -> Result<T, ApiError> {
    let schema = T::schema();
    match schema.validate(raw) {
        Ok(out) => serde_json::from_value(out)
            .map_err(|e| anyhow::anyhow!("coerced output does not fit payload type: {e}").into()),
        Err(issues) => Err(classify(raw, schema, issues, source)),
    }
}

/// JSON body validated against `T`'s schema. An absent body validates as an
/// empty object; unparseable JSON is rejected before validation.
pub struct ValidBody<T>(pub T);

impl<S, T> FromRequest<S> for ValidBody<T>
where
    S: Send + Sync,
    T: Validated,
{
    type Rejection = ApiError;

    fn from_request(
        req: Request,
        _state: &S,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        async move {
            let bytes = to_bytes(req.into_body(), usize::MAX)
                .await
                .map_err(|e| anyhow::anyhow!("read request body: {e}"))?;
            let raw = if bytes.is_empty() {
                Value::Object(Map::new())
            } else {
                serde_json::from_slice(&bytes).map_err(|_| ApiError::InvalidJson)?
            };
            run(&raw, Source::Body).map(ValidBody)
        }
    }
}

/// Decode a raw query string into a flat string map, so the schema performs
/// the declared numeric coercion itself.
fn raw_query_map(query: Option<&str>) -> Result<Map<String, Value>, ApiError> {
    let Some(query) = query else {
        return Ok(Map::new());
    };
    let pairs: BTreeMap<String, String> = serde_qs::from_str(query)
        .map_err(|_| ApiError::Validation(serde_json::json!({"query": ["Invalid query string"]})))?;
    Ok(pairs
        .into_iter()
        .map(|(k, v)| (k, Value::String(v)))
        .collect())
}

/// Query string validated against `T`'s schema.
pub struct ValidQuery<T>(pub T);

impl<S, T> FromRequestParts<S> for ValidQuery<T>
where
    S: Send + Sync,
    T: Validated,
{
    type Rejection = ApiError;

    fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        // axum-core 0.5 defines this as `fn -> impl Future + Send` (not
        // `async fn`). Extract the query synchronously and return a
        // 'static block to sidestep E0195 lifetime mismatches.
        let raw = parts.uri.query().map(str::to_owned);
        async move {
            let map = raw_query_map(raw.as_deref())?;
            run(&Value::Object(map), Source::Query).map(ValidQuery)
        }
    }
}

/// Path parameters validated against `T`'s schema.
pub struct ValidParams<T>(pub T);

impl<S, T> FromRequestParts<S> for ValidParams<T>
where
    S: Send + Sync,
    T: Validated,
{
    type Rejection = ApiError;

    fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        async move {
            let Path(params) = Path::<BTreeMap<String, String>>::from_request_parts(parts, state)
                .await
                .map_err(|e| anyhow::anyhow!("path params unavailable: {e}"))?;
            let map: Map<String, Value> = params
                .into_iter()
                .map(|(k, v)| (k, Value::String(v)))
                .collect();
            run(&Value::Object(map), Source::Params).map(ValidParams)
        }
    }
}
