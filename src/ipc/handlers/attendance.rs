use serde_json::json;

use crate::desk::Desk;
use crate::ipc::error::{respond, HandlerErr};
use crate::ipc::helpers::{now, opt_bool, opt_date, opt_str, required_str};
use crate::ipc::types::{AppState, Request};
use crate::stats;

const DEFAULT_CLASS_TYPE: &str = "Computer Science - Theory";

fn sheet_json(desk: &Desk) -> serde_json::Value {
    let sheet = desk.attendance_sheet.snapshot();
    let present = sheet.iter().filter(|m| m.is_present).count();
    json!({
        "students": sheet,
        "presentCount": present,
        "absentCount": sheet.len() - present,
        "totalCount": sheet.len(),
        "percentage": stats::attendance_percentage(present, sheet.len()),
    })
}

fn handle_sheet(state: &mut AppState, _req: &Request) -> Result<serde_json::Value, HandlerErr> {
    Ok(sheet_json(&state.desk))
}

fn handle_toggle(state: &mut AppState, req: &Request) -> Result<serde_json::Value, HandlerErr> {
    let student_id = required_str(req, "studentId")?;
    if !state.desk.toggle_attendance(&student_id) {
        return Err(HandlerErr::not_found("student not on the attendance sheet"));
    }
    Ok(sheet_json(&state.desk))
}

fn handle_mark_all(state: &mut AppState, req: &Request) -> Result<serde_json::Value, HandlerErr> {
    let present = opt_bool(req, "present")?.ok_or_else(|| HandlerErr::bad_params("missing present"))?;
    state.desk.mark_all(present);
    Ok(sheet_json(&state.desk))
}

fn handle_save(state: &mut AppState, req: &Request) -> Result<serde_json::Value, HandlerErr> {
    let date = match opt_date(req, "date")? {
        Some(d) => d,
        None => now(req)?.date(),
    };
    let class_type = opt_str(req, "classType")?
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| DEFAULT_CLASS_TYPE.to_string());
    let record = state.desk.save_attendance(date, &class_type);
    Ok(json!({
        "record": record,
        "percentage": stats::attendance_percentage(record.present_count, record.total_count),
    }))
}

fn handle_history(state: &mut AppState, _req: &Request) -> Result<serde_json::Value, HandlerErr> {
    let history = state.desk.attendance_history.snapshot();
    let records: Vec<serde_json::Value> = history
        .iter()
        .map(|r| {
            let mut v = json!(r);
            v["percentage"] = json!(stats::attendance_percentage(r.present_count, r.total_count));
            v
        })
        .collect();
    Ok(json!({
        "records": records,
        "overallRate": stats::overall_attendance_rate(history),
    }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    let res = match req.method.as_str() {
        "attendance.sheet" => handle_sheet(state, req),
        "attendance.toggle" => handle_toggle(state, req),
        "attendance.markAll" => handle_mark_all(state, req),
        "attendance.save" => handle_save(state, req),
        "attendance.history" => handle_history(state, req),
        _ => return None,
    };
    Some(respond(&req.id, res))
}
