//! Seeded demo data for a fresh desk.
//!
//! Dates are laid out relative to `today` so the panels always have something
//! overdue, something upcoming and something running this week.

use chrono::{Duration, NaiveDate, NaiveTime};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::models::{
    Assignment, AttendanceMark, AttendanceRecord, ClassSession, LeaveRequest, LeaveStatus, LeaveType,
    Meeting, MeetingType, Residency, SessionType, Student, StudentMark, StudyYear, Submission, Test,
    TestType,
};
use crate::stats::grade_letter;

pub struct SampleData {
    pub students: Vec<Student>,
    pub attendance_sheet: Vec<AttendanceMark>,
    pub attendance_history: Vec<AttendanceRecord>,
    pub assignments: Vec<Assignment>,
    pub tests: Vec<Test>,
    pub classes: Vec<ClassSession>,
    pub meetings: Vec<Meeting>,
    pub leave_requests: Vec<LeaveRequest>,
}

const ROSTER: [(&str, u32, StudyYear, Residency); 8] = [
    ("John Doe", 20, StudyYear::First, Residency::DayScholar),
    ("Jane Smith", 21, StudyYear::Second, Residency::Hosteller),
    ("Mike Johnson", 22, StudyYear::Third, Residency::DayScholar),
    ("Sarah Wilson", 19, StudyYear::First, Residency::Hosteller),
    ("David Brown", 20, StudyYear::Second, Residency::DayScholar),
    ("Emily Davis", 21, StudyYear::Third, Residency::Hosteller),
    ("Alex Turner", 19, StudyYear::First, Residency::DayScholar),
    ("Lisa Chen", 20, StudyYear::Second, Residency::Hosteller),
];

struct Generator {
    rng: StdRng,
    today: NaiveDate,
}

impl Generator {
    fn day(&self, offset: i64) -> NaiveDate {
        self.today + Duration::days(offset)
    }

    fn chance(&mut self, p: f64) -> bool {
        self.rng.gen_bool(p)
    }

    fn students(&self) -> Vec<Student> {
        ROSTER
            .iter()
            .enumerate()
            .map(|(i, (name, age, year, status))| Student {
                id: (i + 1).to_string(),
                name: name.to_string(),
                age: *age,
                register_number: format!("R{:03}", i + 1),
                roll_number: format!("{:02}", i + 1),
                year: *year,
                class_name: "B.Sc Computer Science".to_string(),
                status: *status,
            })
            .collect()
    }

    fn sheet(&mut self, roster: &[Student], p: f64) -> Vec<AttendanceMark> {
        roster
            .iter()
            .map(|s| AttendanceMark {
                id: s.id.clone(),
                name: s.name.clone(),
                roll_number: s.roll_number.clone(),
                year: s.year,
                is_present: self.chance(p),
            })
            .collect()
    }

    fn history(&mut self, roster: &[Student]) -> Vec<AttendanceRecord> {
        [(1, "Computer Science - Theory", 0.7), (2, "Computer Science - Lab", 0.8)]
            .into_iter()
            .map(|(ago, class_type, p)| {
                let sheet = self.sheet(roster, p);
                AttendanceRecord::from_sheet(self.day(-ago), class_type, &sheet)
            })
            .collect()
    }

    fn submissions(&mut self, roster: &[Student], p: f64, days_back: i64, grade_floor: u32, grade_span: u32) -> Vec<Submission> {
        roster
            .iter()
            .map(|s| {
                let is_submitted = self.chance(p);
                let (submission_date, grade) = if is_submitted {
                    let back = self.rng.gen_range(0..=days_back);
                    let grade = self.rng.gen_range(grade_floor..grade_floor + grade_span);
                    (Some(self.day(-back)), Some(grade))
                } else {
                    (None, None)
                };
                Submission {
                    student_id: s.id.clone(),
                    student_name: s.name.clone(),
                    roll_number: s.roll_number.clone(),
                    is_submitted,
                    submission_date,
                    grade,
                    feedback: None,
                }
            })
            .collect()
    }

    fn assignments(&mut self, roster: &[Student]) -> Vec<Assignment> {
        vec![
            Assignment {
                id: "1".to_string(),
                title: "Data Structures Implementation".to_string(),
                description: "Implement stack, queue, and linked list data structures.".to_string(),
                due_date: self.day(7),
                created_date: self.today,
                submissions: self.submissions(roster, 0.6, 5, 60, 40),
            },
            Assignment {
                id: "2".to_string(),
                title: "Database Design Project".to_string(),
                description: "Design a normalized schema for a library management system.".to_string(),
                due_date: self.day(14),
                created_date: self.day(-3),
                submissions: self.submissions(roster, 0.4, 2, 65, 35),
            },
            Assignment {
                id: "3".to_string(),
                title: "Algorithm Analysis Report".to_string(),
                description: "Analyze the time and space complexity of sorting algorithms.".to_string(),
                due_date: self.day(-2),
                created_date: self.day(-10),
                submissions: self.submissions(roster, 0.8, 5, 70, 30),
            },
        ]
    }

    fn marks(&mut self, roster: &[Student], max_marks: f64, p: f64, floor: u32, span: u32) -> Vec<StudentMark> {
        roster
            .iter()
            .map(|s| {
                let marks = if self.chance(p) {
                    Some(f64::from(self.rng.gen_range(floor..floor + span)))
                } else {
                    None
                };
                StudentMark {
                    student_id: s.id.clone(),
                    student_name: s.name.clone(),
                    roll_number: s.roll_number.clone(),
                    marks,
                    grade: marks.map(|m| grade_letter(m, max_marks)),
                    remarks: None,
                }
            })
            .collect()
    }

    fn tests(&mut self, roster: &[Student]) -> Vec<Test> {
        vec![
            Test {
                id: "1".to_string(),
                subject: "Computer Science".to_string(),
                title: "Data Structures Quiz".to_string(),
                date: self.day(3),
                max_marks: 50.0,
                duration: "45 minutes".to_string(),
                kind: TestType::Quiz,
                student_marks: self.marks(roster, 50.0, 0.7, 30, 20),
            },
            Test {
                id: "2".to_string(),
                subject: "Mathematics".to_string(),
                title: "Calculus Mid-term".to_string(),
                date: self.day(7),
                max_marks: 100.0,
                duration: "2 hours".to_string(),
                kind: TestType::MidTerm,
                student_marks: self.marks(roster, 100.0, 0.5, 60, 30),
            },
            Test {
                id: "3".to_string(),
                subject: "Computer Science".to_string(),
                title: "Algorithm Analysis Test".to_string(),
                date: self.day(-5),
                max_marks: 75.0,
                duration: "90 minutes".to_string(),
                kind: TestType::AssignmentTest,
                student_marks: self.marks(roster, 75.0, 1.0, 50, 25),
            },
        ]
    }
}

fn hm(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap_or(NaiveTime::MIN)
}

#[allow(clippy::too_many_arguments)]
fn class(
    id: &str,
    subject: &str,
    topic: &str,
    start: NaiveTime,
    end: NaiveTime,
    day_of_week: u8,
    classroom: &str,
    kind: SessionType,
    reminder_enabled: bool,
    reminder_minutes: u32,
) -> ClassSession {
    ClassSession {
        id: id.to_string(),
        subject: subject.to_string(),
        topic: topic.to_string(),
        start_time: start,
        end_time: end,
        day_of_week,
        classroom: classroom.to_string(),
        kind,
        reminder_enabled,
        reminder_minutes,
    }
}

fn timetable() -> Vec<ClassSession> {
    use SessionType::*;
    vec![
        class("1", "Computer Science", "Data Structures", hm(9, 0), hm(10, 0), 1, "Room 101", Theory, true, 15),
        class("2", "Computer Science", "Programming Lab", hm(10, 30), hm(12, 30), 1, "Lab 1", Lab, true, 10),
        class("3", "Mathematics", "Calculus", hm(14, 0), hm(15, 0), 1, "Room 203", Theory, false, 15),
        class("4", "Computer Science", "Algorithms", hm(9, 0), hm(10, 0), 2, "Room 101", Theory, true, 15),
        class("5", "Physics", "Quantum Mechanics", hm(11, 0), hm(12, 0), 2, "Room 301", Theory, true, 20),
    ]
}

fn meetings(today: NaiveDate) -> Vec<Meeting> {
    vec![
        Meeting {
            id: "1".to_string(),
            title: "Department Faculty Meeting".to_string(),
            description: "Monthly department meeting to discuss curriculum updates and student progress.".to_string(),
            date: today + Duration::days(2),
            time: hm(14, 0),
            location: "Conference Room A".to_string(),
            kind: MeetingType::Department,
            reminder_enabled: true,
        },
        Meeting {
            id: "2".to_string(),
            title: "Academic Committee Review".to_string(),
            description: "Review of academic policies and examination procedures.".to_string(),
            date: today + Duration::days(5),
            time: hm(10, 30),
            location: "Main Hall".to_string(),
            kind: MeetingType::Committee,
            reminder_enabled: true,
        },
    ]
}

fn leave_requests(today: NaiveDate, faculty_id: &str) -> Vec<LeaveRequest> {
    let day = |offset: i64| today + Duration::days(offset);
    let base = |id: &str, from: i64, to: i64, reason: &str, kind, status, applied: i64| LeaveRequest {
        id: id.to_string(),
        faculty_id: faculty_id.to_string(),
        from_date: day(from),
        to_date: day(to),
        reason: reason.to_string(),
        kind,
        status,
        applied_date: day(applied),
        approved_by: None,
        approved_date: None,
        rejection_reason: None,
    };
    vec![
        base("1", 7, 9, "Family wedding ceremony", LeaveType::Personal, LeaveStatus::Pending, 0),
        LeaveRequest {
            approved_by: Some("Dr. Smith (HOD)".to_string()),
            approved_date: Some(day(-18)),
            ..base("2", -14, -12, "Medical checkup and treatment", LeaveType::Sick, LeaveStatus::Approved, -20)
        },
        LeaveRequest {
            rejection_reason: Some(
                "Insufficient advance notice. Please apply at least 7 days in advance for casual leave.".to_string(),
            ),
            ..base("3", -30, -25, "Personal vacation", LeaveType::Casual, LeaveStatus::Rejected, -32)
        },
        LeaveRequest {
            approved_by: Some("Dr. Johnson (Principal)".to_string()),
            approved_date: Some(day(-70)),
            ..base("4", -60, -58, "Conference attendance - International AI Symposium", LeaveType::Other, LeaveStatus::Approved, -75)
        },
    ]
}

/// Same `seed` and `today` always give the same desk.
pub fn generate(seed: u64, today: NaiveDate, faculty_id: &str) -> SampleData {
    let mut g = Generator {
        rng: StdRng::seed_from_u64(seed),
        today,
    };
    let students = g.students();
    let attendance_sheet = g.sheet(&students, 0.75);
    let attendance_history = g.history(&students);
    let assignments = g.assignments(&students);
    let tests = g.tests(&students);
    SampleData {
        attendance_sheet,
        attendance_history,
        assignments,
        tests,
        classes: timetable(),
        meetings: meetings(today),
        leave_requests: leave_requests(today, faculty_id),
        students,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 4).expect("date")
    }

    #[test]
    fn same_seed_same_desk() {
        let a = generate(7, today(), "F001");
        let b = generate(7, today(), "F001");
        assert_eq!(a.assignments, b.assignments);
        assert_eq!(a.tests, b.tests);
        assert_eq!(a.attendance_sheet, b.attendance_sheet);
    }

    #[test]
    fn grades_follow_the_marks_drawn() {
        let data = generate(99, today(), "F001");
        for t in &data.tests {
            for m in &t.student_marks {
                assert_eq!(m.grade, m.marks.map(|v| stats::grade_letter(v, t.max_marks)));
                if let Some(v) = m.marks {
                    assert!(v <= t.max_marks);
                }
            }
        }
    }

    #[test]
    fn submissions_cover_the_roster_and_dates_only_when_submitted() {
        let data = generate(3, today(), "F001");
        for a in &data.assignments {
            assert_eq!(a.submissions.len(), data.students.len());
            for s in &a.submissions {
                assert_eq!(s.is_submitted, s.submission_date.is_some());
            }
        }
    }

    #[test]
    fn history_counts_match_their_rows() {
        let data = generate(11, today(), "F001");
        assert_eq!(data.attendance_history.len(), 2);
        for r in &data.attendance_history {
            assert_eq!(r.total_count, 8);
            assert_eq!(r.present_count, r.students.iter().filter(|s| s.is_present).count());
            assert!(r.date < today());
        }
    }

    #[test]
    fn one_assignment_is_overdue_and_one_leave_is_pending() {
        let data = generate(1, today(), "F042");
        let now = today().and_hms_opt(8, 0, 0).expect("now");
        assert_eq!(data.assignments.iter().filter(|a| stats::is_overdue(a.due_date, now)).count(), 1);
        let leave = stats::leave_status_stats(&data.leave_requests);
        assert_eq!(leave.pending, 1);
        assert!(data.leave_requests.iter().all(|r| r.faculty_id == "F042"));
    }
}
