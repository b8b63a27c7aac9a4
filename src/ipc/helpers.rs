use chrono::{NaiveDate, NaiveDateTime};
use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;

use crate::ipc::error::HandlerErr;
use crate::ipc::types::Request;
use crate::models::{self, Labelled};

pub fn required_str(req: &Request, key: &str) -> Result<String, HandlerErr> {
    req.params
        .get(key)
        .and_then(|v| v.as_str())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| HandlerErr::bad_params(format!("missing {}", key)))
}

pub fn opt_str(req: &Request, key: &str) -> Result<Option<String>, HandlerErr> {
    match req.params.get(key) {
        None | Some(JsonValue::Null) => Ok(None),
        Some(JsonValue::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(HandlerErr::bad_params(format!("{} must be a string", key))),
    }
}

pub fn opt_bool(req: &Request, key: &str) -> Result<Option<bool>, HandlerErr> {
    match req.params.get(key) {
        None | Some(JsonValue::Null) => Ok(None),
        Some(JsonValue::Bool(b)) => Ok(Some(*b)),
        Some(_) => Err(HandlerErr::bad_params(format!("{} must be a boolean", key))),
    }
}

pub fn required_f64(req: &Request, key: &str) -> Result<f64, HandlerErr> {
    req.params
        .get(key)
        .and_then(|v| v.as_f64())
        .ok_or_else(|| HandlerErr::bad_params(format!("missing {}", key)))
}

/// The caller's "now", or the local clock when the UI leaves it out. This is
/// the only place the desk reads the clock.
pub fn now(req: &Request) -> Result<NaiveDateTime, HandlerErr> {
    match opt_str(req, "now")? {
        Some(raw) => Ok(models::parse_datetime(&raw)?),
        None => Ok(chrono::Local::now().naive_local()),
    }
}

pub fn opt_date(req: &Request, key: &str) -> Result<Option<NaiveDate>, HandlerErr> {
    match opt_str(req, key)? {
        Some(raw) if !raw.trim().is_empty() => Ok(Some(models::parse_date(&raw)?)),
        _ => Ok(None),
    }
}

/// A label filter where "all" (or nothing) means no filter.
pub fn label_filter<L: Labelled>(req: &Request, key: &str) -> Result<Option<L>, HandlerErr> {
    match opt_str(req, key)? {
        None => Ok(None),
        Some(raw) if raw.trim().is_empty() || raw.trim().eq_ignore_ascii_case("all") => Ok(None),
        Some(raw) => Ok(Some(L::from_label(&raw)?)),
    }
}

/// Create-form payloads come straight from params; unknown keys are ignored.
pub fn draft<D: DeserializeOwned>(req: &Request) -> Result<D, HandlerErr> {
    let params = if req.params.is_null() {
        JsonValue::Object(Default::default())
    } else {
        req.params.clone()
    };
    Ok(serde_json::from_value(params)?)
}
