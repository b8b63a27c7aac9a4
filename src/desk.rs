//! The faculty desk: one record store per panel and the operations the
//! panels perform on them.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde::Serialize;
use uuid::Uuid;

use crate::config::Config;
use crate::models::{
    Assignment, AssignmentDraft, AttendanceMark, AttendanceRecord, ClassDraft, ClassSession, Draft,
    DraftContext, LeaveDraft, LeaveRequest, LeaveStatus, Meeting, MeetingDraft, Student, StudentDraft,
    Test, TestDraft,
};
use crate::sample;
use crate::schedule::{self, Occurrence};
use crate::stats::{self, grade_letter};
use crate::store::{Placement, RecordStore};

#[derive(Debug, Clone, Default)]
pub struct Desk {
    pub faculty_id: String,
    pub students: RecordStore<Student>,
    pub attendance_sheet: RecordStore<AttendanceMark>,
    pub attendance_history: RecordStore<AttendanceRecord>,
    pub assignments: RecordStore<Assignment>,
    pub tests: RecordStore<Test>,
    pub classes: RecordStore<ClassSession>,
    pub meetings: RecordStore<Meeting>,
    pub leave_requests: RecordStore<LeaveRequest>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary<'a> {
    pub date: NaiveDate,
    pub day_order: u8,
    pub total_students: usize,
    pub open_assignments: usize,
    pub overdue_assignments: usize,
    pub tests_this_week: usize,
    pub attendance_rate: u32,
    pub pending_leave_requests: usize,
    pub upcoming_meetings: usize,
    pub current_class: Option<&'a ClassSession>,
    pub next_class: Option<Occurrence<'a, ClassSession>>,
}

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

impl Desk {
    pub fn empty(faculty_id: impl Into<String>) -> Self {
        Self {
            faculty_id: faculty_id.into(),
            ..Self::default()
        }
    }

    pub fn with_sample_data(seed: u64, today: NaiveDate, faculty_id: impl Into<String>) -> Self {
        let faculty_id = faculty_id.into();
        let data = sample::generate(seed, today, &faculty_id);
        Self {
            faculty_id,
            students: data.students.into(),
            attendance_sheet: data.attendance_sheet.into(),
            attendance_history: data.attendance_history.into(),
            assignments: data.assignments.into(),
            tests: data.tests.into(),
            classes: data.classes.into(),
            meetings: data.meetings.into(),
            leave_requests: data.leave_requests.into(),
        }
    }

    pub fn from_config(cfg: &Config, today: NaiveDate) -> Self {
        if cfg.sample_data {
            Self::with_sample_data(cfg.seed, today, cfg.faculty_id.clone())
        } else {
            Self::empty(cfg.faculty_id.clone())
        }
    }

    fn create<T, D>(&self, store: &RecordStore<T>, draft: D, today: NaiveDate, placement: Placement) -> (RecordStore<T>, bool)
    where
        T: Clone,
        D: Draft<Record = T>,
    {
        let ctx = DraftContext {
            id: new_id(),
            today,
            roster: self.students.snapshot(),
            faculty_id: &self.faculty_id,
        };
        store.create(draft, &ctx, placement)
    }

    // ---- students ----

    /// New students also join the attendance sheet, unmarked.
    pub fn add_student(&mut self, draft: StudentDraft, today: NaiveDate) -> Option<&Student> {
        let (next, created) = self.create(&self.students, draft, today, Placement::Back);
        if !created {
            tracing::debug!("student draft missing required fields; nothing created");
            return None;
        }
        self.students = next;
        let student = self.students.snapshot().last()?;
        self.attendance_sheet = self.attendance_sheet.add(
            AttendanceMark {
                id: student.id.clone(),
                name: student.name.clone(),
                roll_number: student.roll_number.clone(),
                year: student.year,
                is_present: false,
            },
            Placement::Back,
        );
        tracing::info!(student_id = %student.id, "student added");
        Some(student)
    }

    // ---- attendance ----

    pub fn toggle_attendance(&mut self, student_id: &str) -> bool {
        if !self.attendance_sheet.contains(student_id) {
            return false;
        }
        self.attendance_sheet = self.attendance_sheet.toggle_by_id(student_id, |m| &mut m.is_present);
        true
    }

    pub fn mark_all(&mut self, present: bool) {
        self.attendance_sheet = self.attendance_sheet.map_all(|m| m.is_present = present);
    }

    pub fn save_attendance(&mut self, date: NaiveDate, class_type: &str) -> &AttendanceRecord {
        let record = AttendanceRecord::from_sheet(date, class_type, self.attendance_sheet.snapshot());
        tracing::info!(
            %date,
            class_type,
            present = record.present_count,
            total = record.total_count,
            "attendance saved"
        );
        self.attendance_history = self.attendance_history.add(record, Placement::Front);
        &self.attendance_history.snapshot()[0]
    }

    // ---- assignments ----

    pub fn add_assignment(&mut self, draft: AssignmentDraft, today: NaiveDate) -> Option<&Assignment> {
        let (next, created) = self.create(&self.assignments, draft, today, Placement::Front);
        if !created {
            tracing::debug!("assignment draft missing title or due date; nothing created");
            return None;
        }
        self.assignments = next;
        self.assignments.snapshot().first()
    }

    // false when either id is unknown
    pub fn toggle_submission(&mut self, assignment_id: &str, student_id: &str, today: NaiveDate) -> bool {
        let known = self
            .assignments
            .get(assignment_id)
            .map(|a| a.submissions.iter().any(|s| s.student_id == student_id))
            .unwrap_or(false);
        if !known {
            return false;
        }
        self.assignments = self.assignments.update_by_id(assignment_id, |a| {
            for s in a.submissions.iter_mut().filter(|s| s.student_id == student_id) {
                s.is_submitted = !s.is_submitted;
                s.submission_date = if s.is_submitted { Some(today) } else { None };
            }
        });
        true
    }

    // ---- tests ----

    pub fn add_test(&mut self, draft: TestDraft, today: NaiveDate) -> Option<&Test> {
        let (next, created) = self.create(&self.tests, draft, today, Placement::Front);
        if !created {
            tracing::debug!("test draft missing title or date; nothing created");
            return None;
        }
        self.tests = next;
        self.tests.snapshot().first()
    }

    pub fn set_mark(&mut self, test_id: &str, student_id: &str, marks: f64) -> bool {
        let known = self
            .tests
            .get(test_id)
            .map(|t| t.student_marks.iter().any(|m| m.student_id == student_id))
            .unwrap_or(false);
        if !known {
            return false;
        }
        self.tests = self.tests.update_by_id(test_id, |t| {
            let grade = grade_letter(marks, t.max_marks);
            for m in t.student_marks.iter_mut().filter(|m| m.student_id == student_id) {
                m.marks = Some(marks);
                m.grade = Some(grade);
            }
        });
        true
    }

    // ---- schedule ----

    pub fn add_class(&mut self, draft: ClassDraft, today: NaiveDate) -> Option<&ClassSession> {
        let (next, created) = self.create(&self.classes, draft, today, Placement::Back);
        if !created {
            tracing::debug!("class draft missing topic or times; nothing created");
            return None;
        }
        self.classes = next;
        self.classes.snapshot().last()
    }

    pub fn toggle_class_reminder(&mut self, class_id: &str) -> bool {
        if !self.classes.contains(class_id) {
            return false;
        }
        self.classes = self.classes.toggle_by_id(class_id, |c| &mut c.reminder_enabled);
        true
    }

    pub fn add_meeting(&mut self, draft: MeetingDraft, today: NaiveDate) -> Option<&Meeting> {
        let (next, created) = self.create(&self.meetings, draft, today, Placement::Back);
        if !created {
            tracing::debug!("meeting draft missing title, date or time; nothing created");
            return None;
        }
        self.meetings = next;
        self.meetings.snapshot().last()
    }

    pub fn toggle_meeting_reminder(&mut self, meeting_id: &str) -> bool {
        if !self.meetings.contains(meeting_id) {
            return false;
        }
        self.meetings = self.meetings.toggle_by_id(meeting_id, |m| &mut m.reminder_enabled);
        true
    }

    // ---- leave ----

    pub fn add_leave_request(&mut self, draft: LeaveDraft, today: NaiveDate) -> Option<&LeaveRequest> {
        let (next, created) = self.create(&self.leave_requests, draft, today, Placement::Front);
        if !created {
            tracing::debug!("leave draft missing dates or reason; nothing created");
            return None;
        }
        self.leave_requests = next;
        self.leave_requests.snapshot().first()
    }

    // ---- dashboard ----

    pub fn dashboard(&self, now: NaiveDateTime) -> DashboardSummary<'_> {
        let today = now.date();
        let week_end = today + Duration::days(6);
        let overdue = self
            .assignments
            .iter()
            .filter(|a| stats::is_overdue(a.due_date, now))
            .count();
        DashboardSummary {
            date: today,
            day_order: schedule::day_order(today),
            total_students: self.students.len(),
            open_assignments: self.assignments.len() - overdue,
            overdue_assignments: overdue,
            tests_this_week: self
                .tests
                .iter()
                .filter(|t| t.date >= today && t.date <= week_end)
                .count(),
            attendance_rate: stats::overall_attendance_rate(self.attendance_history.snapshot()),
            pending_leave_requests: self
                .leave_requests
                .iter()
                .filter(|r| r.status == LeaveStatus::Pending)
                .count(),
            upcoming_meetings: self.meetings.iter().filter(|m| m.date >= today).count(),
            current_class: schedule::current_item(self.classes.snapshot(), now),
            next_class: schedule::next_item(self.classes.snapshot(), now),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 4).expect("date")
    }

    fn demo() -> Desk {
        Desk::with_sample_data(5, today(), "F001")
    }

    #[test]
    fn toggle_submission_stamps_and_clears_date() {
        let mut desk = demo();
        let a = desk.add_assignment(
            AssignmentDraft {
                title: Some("Graphs".to_string()),
                description: None,
                due_date: Some(today() + Duration::days(3)),
            },
            today(),
        );
        let id = a.map(|a| a.id.clone()).expect("created");

        assert!(desk.toggle_submission(&id, "2", today()));
        let sub = desk.assignments.get(&id).and_then(|a| a.submissions.iter().find(|s| s.student_id == "2")).cloned();
        assert_eq!(sub.as_ref().map(|s| s.is_submitted), Some(true));
        assert_eq!(sub.and_then(|s| s.submission_date), Some(today()));

        assert!(desk.toggle_submission(&id, "2", today()));
        let sub = desk.assignments.get(&id).and_then(|a| a.submissions.iter().find(|s| s.student_id == "2")).cloned();
        assert_eq!(sub.as_ref().map(|s| s.is_submitted), Some(false));
        assert_eq!(sub.and_then(|s| s.submission_date), None);

        assert!(!desk.toggle_submission(&id, "nope", today()));
        assert!(!desk.toggle_submission("nope", "2", today()));
    }

    #[test]
    fn set_mark_keeps_grade_in_step() {
        let mut desk = demo();
        assert!(desk.set_mark("1", "3", 46.0));
        let t = desk.tests.get("1").expect("test");
        let m = t.student_marks.iter().find(|m| m.student_id == "3").expect("mark");
        assert_eq!(m.marks, Some(46.0));
        assert_eq!(m.grade, Some(stats::GradeLetter::APlus));
        assert!(!desk.set_mark("1", "404", 10.0));
    }

    #[test]
    fn failed_create_keeps_the_same_snapshot() {
        let mut desk = demo();
        let before = desk.leave_requests.clone();
        let out = desk.add_leave_request(LeaveDraft::default(), today());
        assert!(out.is_none());
        assert!(desk.leave_requests.same_snapshot(&before));
    }

    #[test]
    fn new_student_joins_roster_and_sheet() {
        let mut desk = Desk::empty("F001");
        let draft = StudentDraft {
            name: Some("Ada Lovelace".to_string()),
            register_number: Some("R100".to_string()),
            roll_number: Some("100".to_string()),
            ..StudentDraft::default()
        };
        let id = desk.add_student(draft, today()).map(|s| s.id.clone()).expect("student");
        assert_eq!(desk.students.len(), 1);
        assert!(desk.attendance_sheet.contains(&id));

        let a = desk
            .add_assignment(
                AssignmentDraft {
                    title: Some("Essay".to_string()),
                    description: None,
                    due_date: Some(today()),
                },
                today(),
            )
            .expect("assignment");
        assert_eq!(a.submissions.len(), 1);
        assert_eq!(a.submissions[0].student_id, id);
    }

    #[test]
    fn save_attendance_freezes_the_sheet() {
        let mut desk = demo();
        desk.mark_all(true);
        assert!(desk.toggle_attendance("4"));
        let rec = desk.save_attendance(today(), "Computer Science - Lab").clone();
        assert_eq!(rec.total_count, 8);
        assert_eq!(rec.present_count, 7);
        assert_eq!(desk.attendance_history.snapshot()[0], rec);

        desk.mark_all(false);
        assert_eq!(desk.attendance_history.snapshot()[0].present_count, 7);
        assert!(!desk.toggle_attendance("missing"));
    }

    #[test]
    fn dashboard_on_demo_monday_morning() {
        let desk = demo();
        let now = today().and_hms_opt(9, 15, 0).expect("now");
        let d = desk.dashboard(now);
        assert_eq!(d.day_order, 1);
        assert_eq!(d.total_students, 8);
        assert_eq!(d.overdue_assignments, 1);
        assert_eq!(d.open_assignments, 2);
        assert_eq!(d.tests_this_week, 1);
        assert_eq!(d.pending_leave_requests, 1);
        assert_eq!(d.upcoming_meetings, 2);
        assert_eq!(d.current_class.map(|c| c.topic.as_str()), Some("Data Structures"));
        assert_eq!(d.next_class.map(|o| o.item.topic.as_str()), Some("Programming Lab"));
    }

    #[test]
    fn reminders_toggle_by_id() {
        let mut desk = demo();
        let before = desk.classes.get("3").map(|c| c.reminder_enabled);
        assert!(desk.toggle_class_reminder("3"));
        assert_eq!(desk.classes.get("3").map(|c| c.reminder_enabled), before.map(|b| !b));
        assert!(desk.toggle_meeting_reminder("1"));
        assert_eq!(desk.meetings.get("1").map(|m| m.reminder_enabled), Some(false));
        assert!(!desk.toggle_meeting_reminder("x"));
    }
}
