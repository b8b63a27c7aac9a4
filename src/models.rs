use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::DeskError;
use crate::store::Identified;

/// Enums whose wire form is the label shown in the UI ("1st Year", "Sick Leave").
pub trait Labelled: Sized + Copy + 'static {
    const KIND: &'static str;
    const ALL: &'static [Self];

    fn label(self) -> &'static str;

    fn from_label(raw: &str) -> Result<Self, DeskError> {
        let t = raw.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|v| v.label().eq_ignore_ascii_case(t))
            .ok_or_else(|| DeskError::UnknownVariant {
                kind: Self::KIND,
                value: t.to_string(),
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum StudyYear {
    #[serde(rename = "1st Year")]
    First,
    #[serde(rename = "2nd Year")]
    Second,
    #[serde(rename = "3rd Year")]
    Third,
}

impl Labelled for StudyYear {
    const KIND: &'static str = "year";
    const ALL: &'static [Self] = &[StudyYear::First, StudyYear::Second, StudyYear::Third];

    fn label(self) -> &'static str {
        match self {
            StudyYear::First => "1st Year",
            StudyYear::Second => "2nd Year",
            StudyYear::Third => "3rd Year",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Residency {
    #[serde(rename = "Day Scholar")]
    DayScholar,
    Hosteller,
}

impl Labelled for Residency {
    const KIND: &'static str = "status";
    const ALL: &'static [Self] = &[Residency::DayScholar, Residency::Hosteller];

    fn label(self) -> &'static str {
        match self {
            Residency::DayScholar => "Day Scholar",
            Residency::Hosteller => "Hosteller",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SessionType {
    Theory,
    Lab,
    Tutorial,
}

impl Labelled for SessionType {
    const KIND: &'static str = "class type";
    const ALL: &'static [Self] = &[SessionType::Theory, SessionType::Lab, SessionType::Tutorial];

    fn label(self) -> &'static str {
        match self {
            SessionType::Theory => "Theory",
            SessionType::Lab => "Lab",
            SessionType::Tutorial => "Tutorial",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MeetingType {
    #[serde(rename = "Faculty Meeting")]
    Faculty,
    #[serde(rename = "Department Meeting")]
    Department,
    #[serde(rename = "Committee Meeting")]
    Committee,
    Other,
}

impl Labelled for MeetingType {
    const KIND: &'static str = "meeting type";
    const ALL: &'static [Self] = &[
        MeetingType::Faculty,
        MeetingType::Department,
        MeetingType::Committee,
        MeetingType::Other,
    ];

    fn label(self) -> &'static str {
        match self {
            MeetingType::Faculty => "Faculty Meeting",
            MeetingType::Department => "Department Meeting",
            MeetingType::Committee => "Committee Meeting",
            MeetingType::Other => "Other",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LeaveType {
    #[serde(rename = "Sick Leave")]
    Sick,
    #[serde(rename = "Casual Leave")]
    Casual,
    #[serde(rename = "Emergency Leave")]
    Emergency,
    #[serde(rename = "Personal Leave")]
    Personal,
    Other,
}

impl Labelled for LeaveType {
    const KIND: &'static str = "leave type";
    const ALL: &'static [Self] = &[
        LeaveType::Sick,
        LeaveType::Casual,
        LeaveType::Emergency,
        LeaveType::Personal,
        LeaveType::Other,
    ];

    fn label(self) -> &'static str {
        match self {
            LeaveType::Sick => "Sick Leave",
            LeaveType::Casual => "Casual Leave",
            LeaveType::Emergency => "Emergency Leave",
            LeaveType::Personal => "Personal Leave",
            LeaveType::Other => "Other",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LeaveStatus {
    Pending,
    Approved,
    Rejected,
}

impl Labelled for LeaveStatus {
    const KIND: &'static str = "leave status";
    const ALL: &'static [Self] = &[LeaveStatus::Pending, LeaveStatus::Approved, LeaveStatus::Rejected];

    fn label(self) -> &'static str {
        match self {
            LeaveStatus::Pending => "Pending",
            LeaveStatus::Approved => "Approved",
            LeaveStatus::Rejected => "Rejected",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TestType {
    Quiz,
    #[serde(rename = "Mid-term")]
    MidTerm,
    Final,
    #[serde(rename = "Assignment Test")]
    AssignmentTest,
}

impl Labelled for TestType {
    const KIND: &'static str = "test type";
    const ALL: &'static [Self] = &[
        TestType::Quiz,
        TestType::MidTerm,
        TestType::Final,
        TestType::AssignmentTest,
    ];

    fn label(self) -> &'static str {
        match self {
            TestType::Quiz => "Quiz",
            TestType::MidTerm => "Mid-term",
            TestType::Final => "Final",
            TestType::AssignmentTest => "Assignment Test",
        }
    }
}

/// `HH:MM` wire format for times of day. Seconds are accepted on input and dropped.
pub mod clock {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    use crate::error::DeskError;

    pub fn parse(raw: &str) -> Result<NaiveTime, DeskError> {
        let t = raw.trim();
        NaiveTime::parse_from_str(t, "%H:%M")
            .or_else(|_| NaiveTime::parse_from_str(t, "%H:%M:%S"))
            .map_err(|_| DeskError::InvalidTime(t.to_string()))
    }

    pub fn serialize<S: Serializer>(t: &NaiveTime, s: S) -> Result<S::Ok, S::Error> {
        s.collect_str(&t.format("%H:%M"))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(d)?;
        parse(&raw).map_err(serde::de::Error::custom)
    }

    pub mod option {
        use chrono::NaiveTime;
        use serde::{Deserialize, Deserializer, Serializer};

        pub fn serialize<S: Serializer>(t: &Option<NaiveTime>, s: S) -> Result<S::Ok, S::Error> {
            match t {
                Some(t) => s.collect_str(&t.format("%H:%M")),
                None => s.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<NaiveTime>, D::Error> {
            let raw: Option<String> = Option::deserialize(d)?;
            match raw {
                None => Ok(None),
                Some(s) if s.trim().is_empty() => Ok(None),
                Some(s) => super::parse(&s).map(Some).map_err(serde::de::Error::custom),
            }
        }
    }
}

pub fn parse_date(raw: &str) -> Result<NaiveDate, DeskError> {
    let t = raw.trim();
    NaiveDate::parse_from_str(t, "%Y-%m-%d").map_err(|_| DeskError::InvalidDate(t.to_string()))
}

/// Accepts RFC3339 (offset kept as wall-clock time) or a bare local
/// `YYYY-MM-DDTHH:MM[:SS]`.
pub fn parse_datetime(raw: &str) -> Result<NaiveDateTime, DeskError> {
    let t = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(t) {
        return Ok(dt.naive_local());
    }
    ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(t, fmt).ok())
        .ok_or_else(|| DeskError::InvalidDateTime(t.to_string()))
}

// Empty form fields arrive as "" and count as missing.
fn blank_date<'de, D: Deserializer<'de>>(d: D) -> Result<Option<NaiveDate>, D::Error> {
    let raw: Option<String> = Option::deserialize(d)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => parse_date(s).map(Some).map_err(serde::de::Error::custom),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: String,
    pub name: String,
    pub age: u32,
    pub register_number: String,
    pub roll_number: String,
    pub year: StudyYear,
    pub class_name: String,
    pub status: Residency,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    pub student_id: String,
    pub student_name: String,
    pub roll_number: String,
    pub is_submitted: bool,
    pub submission_date: Option<NaiveDate>,
    pub grade: Option<u32>,
    pub feedback: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    pub id: String,
    pub title: String,
    pub description: String,
    pub due_date: NaiveDate,
    pub created_date: NaiveDate,
    pub submissions: Vec<Submission>,
}

/// One row of the sheet being filled in for today's class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceMark {
    pub id: String,
    pub name: String,
    pub roll_number: String,
    pub year: StudyYear,
    pub is_present: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceEntry {
    pub id: String,
    pub name: String,
    pub roll_number: String,
    pub is_present: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceRecord {
    pub date: NaiveDate,
    pub class_type: String,
    pub present_count: usize,
    pub total_count: usize,
    pub students: Vec<AttendanceEntry>,
}

impl AttendanceRecord {
    /// Freeze a sheet into a history record; counts come from the sheet, not the caller.
    pub fn from_sheet(date: NaiveDate, class_type: impl Into<String>, sheet: &[AttendanceMark]) -> Self {
        let students: Vec<AttendanceEntry> = sheet
            .iter()
            .map(|m| AttendanceEntry {
                id: m.id.clone(),
                name: m.name.clone(),
                roll_number: m.roll_number.clone(),
                is_present: m.is_present,
            })
            .collect();
        Self {
            date,
            class_type: class_type.into(),
            present_count: students.iter().filter(|s| s.is_present).count(),
            total_count: students.len(),
            students,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassSession {
    pub id: String,
    pub subject: String,
    pub topic: String,
    #[serde(with = "clock")]
    pub start_time: NaiveTime,
    #[serde(with = "clock")]
    pub end_time: NaiveTime,
    /// 0 = Sunday.
    pub day_of_week: u8,
    pub classroom: String,
    #[serde(rename = "type")]
    pub kind: SessionType,
    pub reminder_enabled: bool,
    pub reminder_minutes: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meeting {
    pub id: String,
    pub title: String,
    pub description: String,
    pub date: NaiveDate,
    #[serde(with = "clock")]
    pub time: NaiveTime,
    pub location: String,
    #[serde(rename = "type")]
    pub kind: MeetingType,
    pub reminder_enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaveRequest {
    pub id: String,
    pub faculty_id: String,
    pub from_date: NaiveDate,
    pub to_date: NaiveDate,
    pub reason: String,
    #[serde(rename = "type")]
    pub kind: LeaveType,
    pub status: LeaveStatus,
    pub applied_date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub approved_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub approved_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejection_reason: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentMark {
    pub student_id: String,
    pub student_name: String,
    pub roll_number: String,
    pub marks: Option<f64>,
    pub grade: Option<crate::stats::GradeLetter>,
    pub remarks: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Test {
    pub id: String,
    pub subject: String,
    pub title: String,
    pub date: NaiveDate,
    pub max_marks: f64,
    pub duration: String,
    #[serde(rename = "type")]
    pub kind: TestType,
    pub student_marks: Vec<StudentMark>,
}

macro_rules! identified_by_id {
    ($($t:ty),* $(,)?) => {
        $(impl Identified for $t {
            fn id(&self) -> &str {
                &self.id
            }
        })*
    };
}

identified_by_id!(Student, Assignment, AttendanceMark, ClassSession, Meeting, LeaveRequest, Test);

/// Everything a draft needs from the outside world to become a record.
#[derive(Debug, Clone)]
pub struct DraftContext<'a> {
    pub id: String,
    pub today: NaiveDate,
    pub roster: &'a [Student],
    pub faculty_id: &'a str,
}

/// A create-form payload. `None` means a required field was missing and nothing
/// should be created.
pub trait Draft {
    type Record;

    fn into_record(self, ctx: &DraftContext<'_>) -> Option<Self::Record>;
}

fn present(v: Option<String>) -> Option<String> {
    v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StudentDraft {
    pub name: Option<String>,
    pub age: Option<u32>,
    pub register_number: Option<String>,
    pub roll_number: Option<String>,
    pub year: Option<StudyYear>,
    pub class_name: Option<String>,
    pub status: Option<Residency>,
}

impl Draft for StudentDraft {
    type Record = Student;

    fn into_record(self, ctx: &DraftContext<'_>) -> Option<Student> {
        Some(Student {
            id: ctx.id.clone(),
            name: present(self.name)?,
            register_number: present(self.register_number)?,
            roll_number: present(self.roll_number)?,
            age: self.age.unwrap_or(18),
            year: self.year.unwrap_or(StudyYear::First),
            class_name: present(self.class_name).unwrap_or_else(|| "B.Sc Computer Science".to_string()),
            status: self.status.unwrap_or(Residency::DayScholar),
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AssignmentDraft {
    pub title: Option<String>,
    pub description: Option<String>,
    #[serde(deserialize_with = "blank_date")]
    pub due_date: Option<NaiveDate>,
}

impl Draft for AssignmentDraft {
    type Record = Assignment;

    fn into_record(self, ctx: &DraftContext<'_>) -> Option<Assignment> {
        let title = present(self.title)?;
        let due_date = self.due_date?;
        let submissions = ctx
            .roster
            .iter()
            .map(|s| Submission {
                student_id: s.id.clone(),
                student_name: s.name.clone(),
                roll_number: s.roll_number.clone(),
                is_submitted: false,
                submission_date: None,
                grade: None,
                feedback: None,
            })
            .collect();
        Some(Assignment {
            id: ctx.id.clone(),
            title,
            description: self.description.unwrap_or_default(),
            due_date,
            created_date: ctx.today,
            submissions,
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TestDraft {
    pub subject: Option<String>,
    pub title: Option<String>,
    #[serde(deserialize_with = "blank_date")]
    pub date: Option<NaiveDate>,
    pub max_marks: Option<f64>,
    /// Minutes, as typed into the form.
    pub duration: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<TestType>,
}

impl Draft for TestDraft {
    type Record = Test;

    fn into_record(self, ctx: &DraftContext<'_>) -> Option<Test> {
        let title = present(self.title)?;
        let date = self.date?;
        let duration = present(self.duration).unwrap_or_else(|| "60".to_string());
        let student_marks = ctx
            .roster
            .iter()
            .map(|s| StudentMark {
                student_id: s.id.clone(),
                student_name: s.name.clone(),
                roll_number: s.roll_number.clone(),
                marks: None,
                grade: None,
                remarks: None,
            })
            .collect();
        Some(Test {
            id: ctx.id.clone(),
            subject: present(self.subject).unwrap_or_else(|| "Computer Science".to_string()),
            title,
            date,
            max_marks: self.max_marks.unwrap_or(100.0),
            duration: format!("{} minutes", duration),
            kind: self.kind.unwrap_or(TestType::Quiz),
            student_marks,
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ClassDraft {
    pub subject: Option<String>,
    pub topic: Option<String>,
    #[serde(with = "clock::option")]
    pub start_time: Option<NaiveTime>,
    #[serde(with = "clock::option")]
    pub end_time: Option<NaiveTime>,
    pub day_of_week: Option<u8>,
    pub classroom: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<SessionType>,
    pub reminder_enabled: Option<bool>,
    pub reminder_minutes: Option<u32>,
}

impl Draft for ClassDraft {
    type Record = ClassSession;

    fn into_record(self, ctx: &DraftContext<'_>) -> Option<ClassSession> {
        let day_of_week = match self.day_of_week {
            None => 1,
            Some(d) if d < 7 => d,
            Some(_) => return None,
        };
        Some(ClassSession {
            id: ctx.id.clone(),
            topic: present(self.topic)?,
            start_time: self.start_time?,
            end_time: self.end_time?,
            subject: present(self.subject).unwrap_or_else(|| "Computer Science".to_string()),
            day_of_week,
            classroom: present(self.classroom).unwrap_or_else(|| "Room 101".to_string()),
            kind: self.kind.unwrap_or(SessionType::Theory),
            reminder_enabled: self.reminder_enabled.unwrap_or(true),
            reminder_minutes: self.reminder_minutes.unwrap_or(15),
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MeetingDraft {
    pub title: Option<String>,
    pub description: Option<String>,
    #[serde(deserialize_with = "blank_date")]
    pub date: Option<NaiveDate>,
    #[serde(with = "clock::option")]
    pub time: Option<NaiveTime>,
    pub location: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<MeetingType>,
    pub reminder_enabled: Option<bool>,
}

impl Draft for MeetingDraft {
    type Record = Meeting;

    fn into_record(self, ctx: &DraftContext<'_>) -> Option<Meeting> {
        Some(Meeting {
            id: ctx.id.clone(),
            title: present(self.title)?,
            date: self.date?,
            time: self.time?,
            description: self.description.unwrap_or_default(),
            location: present(self.location).unwrap_or_else(|| "Conference Room".to_string()),
            kind: self.kind.unwrap_or(MeetingType::Faculty),
            reminder_enabled: self.reminder_enabled.unwrap_or(true),
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LeaveDraft {
    #[serde(deserialize_with = "blank_date")]
    pub from_date: Option<NaiveDate>,
    #[serde(deserialize_with = "blank_date")]
    pub to_date: Option<NaiveDate>,
    pub reason: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<LeaveType>,
}

impl Draft for LeaveDraft {
    type Record = LeaveRequest;

    fn into_record(self, ctx: &DraftContext<'_>) -> Option<LeaveRequest> {
        Some(LeaveRequest {
            id: ctx.id.clone(),
            faculty_id: ctx.faculty_id.to_string(),
            from_date: self.from_date?,
            to_date: self.to_date?,
            reason: present(self.reason)?,
            kind: self.kind.unwrap_or(LeaveType::Casual),
            status: LeaveStatus::Pending,
            applied_date: ctx.today,
            approved_by: None,
            approved_date: None,
            rejection_reason: None,
        })
    }
}
