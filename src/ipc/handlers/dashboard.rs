use serde_json::json;

use crate::ipc::error::{respond, HandlerErr};
use crate::ipc::helpers::now;
use crate::ipc::types::{AppState, Request};
use crate::schedule::format_clock;

fn handle_summary(state: &mut AppState, req: &Request) -> Result<serde_json::Value, HandlerErr> {
    let now = now(req)?;
    let summary = state.desk.dashboard(now);
    let mut out = json!(summary);
    out["clock"] = json!(format_clock(now.time()));
    Ok(out)
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    let res = match req.method.as_str() {
        "dashboard.summary" => handle_summary(state, req),
        _ => return None,
    };
    Some(respond(&req.id, res))
}
