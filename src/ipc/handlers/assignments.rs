use chrono::NaiveDateTime;
use serde_json::json;

use crate::ipc::error::{respond, HandlerErr};
use crate::ipc::helpers::{draft, now, required_str};
use crate::ipc::types::{AppState, Request};
use crate::models::{Assignment, AssignmentDraft};
use crate::stats;

fn assignment_view(a: &Assignment, now: NaiveDateTime) -> serde_json::Value {
    let mut v = json!(a);
    v["stats"] = json!(stats::submission_stats(a));
    v["isOverdue"] = json!(stats::is_overdue(a.due_date, now));
    v["daysUntilDue"] = json!(stats::days_until(a.due_date, now));
    v
}

fn handle_list(state: &mut AppState, req: &Request) -> Result<serde_json::Value, HandlerErr> {
    let now = now(req)?;
    let rows: Vec<serde_json::Value> = state
        .desk
        .assignments
        .iter()
        .map(|a| assignment_view(a, now))
        .collect();
    Ok(json!({ "assignments": rows }))
}

fn handle_create(state: &mut AppState, req: &Request) -> Result<serde_json::Value, HandlerErr> {
    let d: AssignmentDraft = draft(req)?;
    let now = now(req)?;
    Ok(match state.desk.add_assignment(d, now.date()) {
        Some(a) => json!({ "created": true, "assignment": assignment_view(a, now) }),
        None => json!({ "created": false }),
    })
}

fn handle_toggle_submission(
    state: &mut AppState,
    req: &Request,
) -> Result<serde_json::Value, HandlerErr> {
    let assignment_id = required_str(req, "assignmentId")?;
    let student_id = required_str(req, "studentId")?;
    let now = now(req)?;
    if !state
        .desk
        .toggle_submission(&assignment_id, &student_id, now.date())
    {
        return Err(HandlerErr::not_found("assignment or submission not found").with_details(
            json!({ "assignmentId": assignment_id, "studentId": student_id }),
        ));
    }
    let a = state
        .desk
        .assignments
        .get(&assignment_id)
        .ok_or_else(|| HandlerErr::not_found("assignment not found"))?;
    Ok(json!({ "assignment": assignment_view(a, now) }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    let res = match req.method.as_str() {
        "assignments.list" => handle_list(state, req),
        "assignments.create" => handle_create(state, req),
        "assignments.toggleSubmission" => handle_toggle_submission(state, req),
        _ => return None,
    };
    Some(respond(&req.id, res))
}
