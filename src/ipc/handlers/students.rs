use serde_json::json;

use crate::ipc::error::{respond, HandlerErr};
use crate::ipc::helpers::{draft, label_filter, now, opt_str};
use crate::ipc::types::{AppState, Request};
use crate::models::{StudentDraft, StudyYear};
use crate::stats;

fn handle_list(state: &mut AppState, req: &Request) -> Result<serde_json::Value, HandlerErr> {
    let year = label_filter::<StudyYear>(req, "year")?;
    let search = opt_str(req, "search")?.unwrap_or_default();
    let students = stats::filter_students(state.desk.students.snapshot(), year, &search);
    Ok(json!({
        "students": students,
        "matched": students.len(),
        "total": state.desk.students.len(),
    }))
}

fn handle_create(state: &mut AppState, req: &Request) -> Result<serde_json::Value, HandlerErr> {
    let d: StudentDraft = draft(req)?;
    let today = now(req)?.date();
    Ok(match state.desk.add_student(d, today) {
        Some(s) => json!({ "created": true, "student": s }),
        None => json!({ "created": false }),
    })
}

fn handle_stats(state: &mut AppState, _req: &Request) -> Result<serde_json::Value, HandlerErr> {
    Ok(json!(stats::roster_stats(state.desk.students.snapshot())))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    let res = match req.method.as_str() {
        "students.list" => handle_list(state, req),
        "students.create" => handle_create(state, req),
        "students.stats" => handle_stats(state, req),
        _ => return None,
    };
    Some(respond(&req.id, res))
}
