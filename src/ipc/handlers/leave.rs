use serde_json::json;

use crate::ipc::error::{respond, HandlerErr};
use crate::ipc::helpers::{draft, label_filter, now};
use crate::ipc::types::{AppState, Request};
use crate::models::{LeaveDraft, LeaveRequest, LeaveStatus};
use crate::stats;

fn leave_view(r: &LeaveRequest) -> serde_json::Value {
    let mut v = json!(r);
    v["days"] = json!(stats::days_between(r.from_date, r.to_date));
    v
}

fn handle_list(state: &mut AppState, req: &Request) -> Result<serde_json::Value, HandlerErr> {
    let status = label_filter::<LeaveStatus>(req, "status")?;
    let rows: Vec<serde_json::Value> =
        stats::filter_leave_requests(state.desk.leave_requests.snapshot(), status)
            .iter()
            .map(leave_view)
            .collect();
    Ok(json!({ "requests": rows }))
}

fn handle_create(state: &mut AppState, req: &Request) -> Result<serde_json::Value, HandlerErr> {
    let d: LeaveDraft = draft(req)?;
    let today = now(req)?.date();
    Ok(match state.desk.add_leave_request(d, today) {
        Some(r) => json!({ "created": true, "request": leave_view(r) }),
        None => json!({ "created": false }),
    })
}

fn handle_stats(state: &mut AppState, _req: &Request) -> Result<serde_json::Value, HandlerErr> {
    Ok(json!(stats::leave_status_stats(state.desk.leave_requests.snapshot())))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    let res = match req.method.as_str() {
        "leave.list" => handle_list(state, req),
        "leave.create" => handle_create(state, req),
        "leave.stats" => handle_stats(state, req),
        _ => return None,
    };
    Some(respond(&req.id, res))
}
