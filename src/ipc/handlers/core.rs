use serde_json::json;

use crate::desk::Desk;
use crate::ipc::error::{respond, HandlerErr};
use crate::ipc::helpers::{now, opt_bool};
use crate::ipc::types::{AppState, Request};

fn handle_health(state: &mut AppState, _req: &Request) -> Result<serde_json::Value, HandlerErr> {
    Ok(json!({
        "version": env!("CARGO_PKG_VERSION"),
        "facultyId": state.desk.faculty_id,
        "studentCount": state.desk.students.len(),
    }))
}

/// Rebuild the desk: seeded demo data by default, or empty panels.
fn handle_desk_reset(state: &mut AppState, req: &Request) -> Result<serde_json::Value, HandlerErr> {
    let seed = match req.params.get("seed") {
        None => state.config.seed,
        Some(v) if v.is_null() => state.config.seed,
        Some(v) => v
            .as_u64()
            .ok_or_else(|| HandlerErr::bad_params("seed must be an unsigned integer"))?,
    };
    let empty = opt_bool(req, "empty")?.unwrap_or(!state.config.sample_data);
    let today = now(req)?.date();

    state.desk = if empty {
        Desk::empty(state.config.faculty_id.clone())
    } else {
        Desk::with_sample_data(seed, today, state.config.faculty_id.clone())
    };
    tracing::info!(seed, empty, %today, "desk reset");

    Ok(json!({
        "seed": seed,
        "sampleData": !empty,
        "today": today,
        "studentCount": state.desk.students.len(),
    }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    let res = match req.method.as_str() {
        "health" => handle_health(state, req),
        "desk.reset" => handle_desk_reset(state, req),
        _ => return None,
    };
    Some(respond(&req.id, res))
}
