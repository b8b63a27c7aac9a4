use chrono::Datelike;
use serde_json::json;

use crate::ipc::error::{respond, HandlerErr};
use crate::ipc::helpers::{draft, now, required_str};
use crate::ipc::types::{AppState, Request};
use crate::models::{ClassDraft, MeetingDraft};
use crate::schedule::{self, format_clock, Scheduled};

fn handle_day(state: &mut AppState, req: &Request) -> Result<serde_json::Value, HandlerErr> {
    let day = match req.params.get("day") {
        Some(v) if !v.is_null() => v
            .as_u64()
            .filter(|d| *d < 7)
            .ok_or_else(|| HandlerErr::bad_params("day must be 0..=6 (0 = Sunday)"))?
            as u8,
        _ => schedule::weekday_index(now(req)?.weekday()),
    };
    let classes = schedule::classes_for_day(state.desk.classes.snapshot(), day);
    Ok(json!({
        "day": day,
        "dayName": schedule::day_name(day),
        "classes": classes,
    }))
}

fn handle_status(state: &mut AppState, req: &Request) -> Result<serde_json::Value, HandlerErr> {
    let now = now(req)?;
    let classes = state.desk.classes.snapshot();
    let current = schedule::current_item(classes, now).map(|c| {
        json!({
            "class": c,
            "startsAt": format_clock(c.start_time()),
            "endsAt": format_clock(c.end_time()),
        })
    });
    let next = schedule::next_item(classes, now).map(|o| {
        json!({
            "class": o.item,
            "date": o.date,
            "dayName": schedule::day_name(o.item.day_of_week()),
            "startsAt": format_clock(o.item.start_time()),
        })
    });
    Ok(json!({
        "now": now,
        "dayOrder": schedule::day_order(now.date()),
        "current": current,
        "next": next,
    }))
}

fn handle_class_create(state: &mut AppState, req: &Request) -> Result<serde_json::Value, HandlerErr> {
    let d: ClassDraft = draft(req)?;
    let today = now(req)?.date();
    Ok(match state.desk.add_class(d, today) {
        Some(c) => json!({ "created": true, "class": c }),
        None => json!({ "created": false }),
    })
}

fn handle_class_reminder(state: &mut AppState, req: &Request) -> Result<serde_json::Value, HandlerErr> {
    let class_id = required_str(req, "classId")?;
    if !state.desk.toggle_class_reminder(&class_id) {
        return Err(HandlerErr::not_found("class not found"));
    }
    let c = state
        .desk
        .classes
        .get(&class_id)
        .ok_or_else(|| HandlerErr::not_found("class not found"))?;
    Ok(json!({ "class": c }))
}

fn handle_meetings_list(state: &mut AppState, _req: &Request) -> Result<serde_json::Value, HandlerErr> {
    let mut meetings: Vec<_> = state.desk.meetings.iter().collect();
    meetings.sort_by_key(|m| (m.date, m.time));
    Ok(json!({ "meetings": meetings }))
}

fn handle_meeting_create(state: &mut AppState, req: &Request) -> Result<serde_json::Value, HandlerErr> {
    let d: MeetingDraft = draft(req)?;
    let today = now(req)?.date();
    Ok(match state.desk.add_meeting(d, today) {
        Some(m) => json!({ "created": true, "meeting": m }),
        None => json!({ "created": false }),
    })
}

fn handle_meeting_reminder(state: &mut AppState, req: &Request) -> Result<serde_json::Value, HandlerErr> {
    let meeting_id = required_str(req, "meetingId")?;
    if !state.desk.toggle_meeting_reminder(&meeting_id) {
        return Err(HandlerErr::not_found("meeting not found"));
    }
    let m = state
        .desk
        .meetings
        .get(&meeting_id)
        .ok_or_else(|| HandlerErr::not_found("meeting not found"))?;
    Ok(json!({ "meeting": m }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    let res = match req.method.as_str() {
        "schedule.day" => handle_day(state, req),
        "schedule.status" => handle_status(state, req),
        "classes.create" => handle_class_create(state, req),
        "classes.toggleReminder" => handle_class_reminder(state, req),
        "meetings.list" => handle_meetings_list(state, req),
        "meetings.create" => handle_meeting_create(state, req),
        "meetings.toggleReminder" => handle_meeting_reminder(state, req),
        _ => return None,
    };
    Some(respond(&req.id, res))
}
