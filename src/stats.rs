use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

use crate::models::{
    Assignment, AttendanceRecord, LeaveRequest, LeaveStatus, Residency, Student, StudyYear,
    Submission, Test,
};

const MILLIS_PER_DAY: i64 = 86_400_000;

/// `floor(x + 0.5)`.
pub fn round_half_up(x: f64) -> i64 {
    (x + 0.5).floor() as i64
}

pub fn percentage(part: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    round_half_up(100.0 * part as f64 / total as f64) as u32
}

pub fn completion_percentage(submissions: &[Submission]) -> u32 {
    let submitted = submissions.iter().filter(|s| s.is_submitted).count();
    percentage(submitted, submissions.len())
}

pub fn attendance_percentage(present: usize, total: usize) -> u32 {
    percentage(present, total)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum GradeLetter {
    #[serde(rename = "A+")]
    APlus,
    A,
    #[serde(rename = "B+")]
    BPlus,
    B,
    #[serde(rename = "C+")]
    CPlus,
    C,
    F,
}

impl GradeLetter {
    /// Best to worst, with the lowest percentage each bucket accepts.
    pub const BANDS: [(GradeLetter, f64); 7] = [
        (GradeLetter::APlus, 90.0),
        (GradeLetter::A, 80.0),
        (GradeLetter::BPlus, 70.0),
        (GradeLetter::B, 60.0),
        (GradeLetter::CPlus, 50.0),
        (GradeLetter::C, 40.0),
        (GradeLetter::F, f64::NEG_INFINITY),
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            GradeLetter::APlus => "A+",
            GradeLetter::A => "A",
            GradeLetter::BPlus => "B+",
            GradeLetter::B => "B",
            GradeLetter::CPlus => "C+",
            GradeLetter::C => "C",
            GradeLetter::F => "F",
        }
    }

    fn index(self) -> usize {
        Self::BANDS
            .iter()
            .position(|(g, _)| *g == self)
            .unwrap_or(Self::BANDS.len() - 1)
    }
}

pub fn grade_letter(marks: f64, max_marks: f64) -> GradeLetter {
    let pct = if max_marks > 0.0 {
        marks / max_marks * 100.0
    } else {
        0.0
    };
    GradeLetter::BANDS
        .iter()
        .find(|(_, floor)| pct >= *floor)
        .map(|(g, _)| *g)
        .unwrap_or(GradeLetter::F)
}

/// Counts per letter. Every letter is always present, best first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GradeDistribution {
    counts: [usize; 7],
}

impl GradeDistribution {
    pub fn count(&self, grade: GradeLetter) -> usize {
        self.counts[grade.index()]
    }

    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (GradeLetter, usize)> + '_ {
        GradeLetter::BANDS
            .iter()
            .zip(self.counts.iter())
            .map(|((g, _), n)| (*g, *n))
    }
}

impl Serialize for GradeDistribution {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.counts.len()))?;
        for (g, n) in self.iter() {
            map.serialize_entry(g.as_str(), &n)?;
        }
        map.end()
    }
}

pub fn grade_distribution<I>(marks: I, max_marks: f64) -> GradeDistribution
where
    I: IntoIterator<Item = f64>,
{
    let mut dist = GradeDistribution::default();
    for m in marks {
        dist.counts[grade_letter(m, max_marks).index()] += 1;
    }
    dist
}

pub fn test_grade_distribution(test: &Test) -> GradeDistribution {
    grade_distribution(
        test.student_marks.iter().filter_map(|m| m.marks),
        test.max_marks,
    )
}

pub fn days_between(from: NaiveDate, to: NaiveDate) -> i64 {
    (to - from).num_days().abs() + 1
}

pub fn is_overdue(due: NaiveDate, now: NaiveDateTime) -> bool {
    due < now.date()
}

pub fn is_upcoming(date: NaiveDate, now: NaiveDateTime) -> bool {
    date > now.date()
}

/// Whole days until the start of `due`, rounded up. Negative once overdue.
pub fn days_until(due: NaiveDate, now: NaiveDateTime) -> i64 {
    let millis = (due.and_time(NaiveTime::MIN) - now).num_milliseconds();
    -(-millis).div_euclid(MILLIS_PER_DAY)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionStats {
    pub submitted: usize,
    pub total: usize,
    pub percentage: u32,
}

pub fn submission_stats(assignment: &Assignment) -> SubmissionStats {
    let submitted = assignment.submissions.iter().filter(|s| s.is_submitted).count();
    let total = assignment.submissions.len();
    SubmissionStats {
        submitted,
        total,
        percentage: completion_percentage(&assignment.submissions),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TestStats {
    pub graded_count: usize,
    pub total_count: usize,
    pub average_marks: i64,
    pub highest_marks: f64,
    pub lowest_marks: f64,
    pub grading_progress: u32,
}

pub fn test_stats(test: &Test) -> TestStats {
    let graded: Vec<f64> = test.student_marks.iter().filter_map(|m| m.marks).collect();
    let total_count = test.student_marks.len();
    if graded.is_empty() {
        return TestStats {
            graded_count: 0,
            total_count,
            average_marks: 0,
            highest_marks: 0.0,
            lowest_marks: 0.0,
            grading_progress: 0,
        };
    }
    let sum: f64 = graded.iter().sum();
    TestStats {
        graded_count: graded.len(),
        total_count,
        average_marks: round_half_up(sum / graded.len() as f64),
        highest_marks: graded.iter().copied().fold(f64::MIN, f64::max),
        lowest_marks: graded.iter().copied().fold(f64::MAX, f64::min),
        grading_progress: percentage(graded.len(), total_count),
    }
}

pub fn overall_attendance_rate(records: &[AttendanceRecord]) -> u32 {
    let (present, total) = records.iter().fold((0, 0), |(p, t), r| {
        (p + r.present_count, t + r.total_count)
    });
    attendance_percentage(present, total)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaveStatusStats {
    pub total: usize,
    pub pending: usize,
    pub approved: usize,
    pub rejected: usize,
}

pub fn leave_status_stats(requests: &[LeaveRequest]) -> LeaveStatusStats {
    let mut out = LeaveStatusStats {
        total: requests.len(),
        ..LeaveStatusStats::default()
    };
    for r in requests {
        match r.status {
            LeaveStatus::Pending => out.pending += 1,
            LeaveStatus::Approved => out.approved += 1,
            LeaveStatus::Rejected => out.rejected += 1,
        }
    }
    out
}

pub fn filter_leave_requests(requests: &[LeaveRequest], status: Option<LeaveStatus>) -> Vec<LeaveRequest> {
    let mut out: Vec<LeaveRequest> = requests
        .iter()
        .filter(|r| status.map_or(true, |s| r.status == s))
        .cloned()
        .collect();
    out.sort_by(|a, b| b.applied_date.cmp(&a.applied_date));
    out
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RosterStats {
    pub first_year: usize,
    pub second_year: usize,
    pub third_year: usize,
    pub day_scholars: usize,
    pub hostellers: usize,
}

pub fn roster_stats(students: &[Student]) -> RosterStats {
    let mut out = RosterStats::default();
    for s in students {
        match s.year {
            StudyYear::First => out.first_year += 1,
            StudyYear::Second => out.second_year += 1,
            StudyYear::Third => out.third_year += 1,
        }
        match s.status {
            Residency::DayScholar => out.day_scholars += 1,
            Residency::Hosteller => out.hostellers += 1,
        }
    }
    out
}

/// The search term is matched as typed, surrounding spaces included.
pub fn filter_students(students: &[Student], year: Option<StudyYear>, search: &str) -> Vec<Student> {
    let term = search;
    let lowered = term.to_lowercase();
    students
        .iter()
        .filter(|s| year.map_or(true, |y| s.year == y))
        .filter(|s| {
            term.is_empty()
                || s.name.to_lowercase().contains(&lowered)
                || s.roll_number.contains(term)
                || s.register_number.to_lowercase().contains(&lowered)
        })
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{LeaveType, StudentMark, TestType};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("date")
    }

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        date(y, m, d).and_hms_opt(h, min, 0).expect("time")
    }

    fn marked(marks: Option<f64>) -> StudentMark {
        StudentMark {
            student_id: "s".to_string(),
            student_name: "S".to_string(),
            roll_number: "01".to_string(),
            marks,
            grade: None,
            remarks: None,
        }
    }

    fn test_with(marks: Vec<Option<f64>>, max: f64) -> Test {
        Test {
            id: "t".to_string(),
            subject: "Maths".to_string(),
            title: "Quiz".to_string(),
            date: date(2024, 1, 1),
            max_marks: max,
            duration: "45 minutes".to_string(),
            kind: TestType::Quiz,
            student_marks: marks.into_iter().map(marked).collect(),
        }
    }

    #[test]
    fn percentage_rounds_half_up_and_guards_zero() {
        assert_eq!(percentage(0, 0), 0);
        assert_eq!(percentage(1, 8), 13);
        assert_eq!(percentage(1, 3), 33);
        assert_eq!(percentage(2, 3), 67);
        assert_eq!(percentage(6, 8), 75);
    }

    #[test]
    fn grade_bands_are_closed_below() {
        assert_eq!(grade_letter(45.0, 50.0), GradeLetter::APlus);
        assert_eq!(grade_letter(40.0, 50.0), GradeLetter::A);
        assert_eq!(grade_letter(70.0, 100.0), GradeLetter::BPlus);
        assert_eq!(grade_letter(60.0, 100.0), GradeLetter::B);
        assert_eq!(grade_letter(50.0, 100.0), GradeLetter::CPlus);
        assert_eq!(grade_letter(40.0, 100.0), GradeLetter::C);
        assert_eq!(grade_letter(39.99, 100.0), GradeLetter::F);
        assert_eq!(grade_letter(10.0, 0.0), GradeLetter::F);
    }

    #[test]
    fn distribution_serializes_all_letters_in_order() {
        let d = grade_distribution([95.0, 91.0, 12.0], 100.0);
        assert_eq!(d.count(GradeLetter::APlus), 2);
        assert_eq!(d.count(GradeLetter::F), 1);
        assert_eq!(d.total(), 3);
        let text = serde_json::to_string(&d).expect("json");
        assert_eq!(
            text,
            r#"{"A+":2,"A":0,"B+":0,"B":0,"C+":0,"C":0,"F":1}"#
        );
    }

    #[test]
    fn days_until_rounds_toward_the_due_day() {
        assert_eq!(days_until(date(2024, 3, 5), at(2024, 3, 4, 10, 0)), 1);
        assert_eq!(days_until(date(2024, 3, 4), at(2024, 3, 4, 10, 0)), 0);
        assert_eq!(days_until(date(2024, 3, 4), at(2024, 3, 4, 0, 0)), 0);
        assert_eq!(days_until(date(2024, 3, 2), at(2024, 3, 4, 10, 0)), -2);
        assert_eq!(days_until(date(2024, 3, 11), at(2024, 3, 4, 0, 0)), 7);
    }

    #[test]
    fn days_until_counts_the_last_half_second_before_midnight() {
        let now = NaiveDate::from_ymd_opt(2024, 3, 4)
            .and_then(|d| d.and_hms_milli_opt(23, 59, 59, 500))
            .expect("now");
        assert_eq!(days_until(date(2024, 3, 5), now), 1);
        assert_eq!(days_until(date(2024, 3, 4), now), 0);
    }

    #[test]
    fn overdue_is_strictly_before_today() {
        let now = at(2024, 3, 4, 23, 59);
        assert!(is_overdue(date(2024, 3, 3), now));
        assert!(!is_overdue(date(2024, 3, 4), now));
        assert!(!is_upcoming(date(2024, 3, 4), now));
        assert!(is_upcoming(date(2024, 3, 5), now));
    }

    #[test]
    fn days_between_ignores_argument_order() {
        assert_eq!(days_between(date(2024, 2, 27), date(2024, 3, 1)), 4);
        assert_eq!(days_between(date(2024, 3, 1), date(2024, 2, 27)), 4);
    }

    #[test]
    fn test_stats_over_partial_grading() {
        let t = test_with(vec![Some(30.0), None, Some(45.0), Some(40.0)], 50.0);
        let s = test_stats(&t);
        assert_eq!(s.graded_count, 3);
        assert_eq!(s.total_count, 4);
        assert_eq!(s.average_marks, 38);
        assert_eq!(s.highest_marks, 45.0);
        assert_eq!(s.lowest_marks, 30.0);
        assert_eq!(s.grading_progress, 75);
    }

    #[test]
    fn test_stats_with_nothing_graded_is_all_zero() {
        let s = test_stats(&test_with(vec![None, None], 100.0));
        assert_eq!(s.average_marks, 0);
        assert_eq!(s.highest_marks, 0.0);
        assert_eq!(s.lowest_marks, 0.0);
        assert_eq!(s.grading_progress, 0);
        let empty = test_stats(&test_with(vec![], 100.0));
        assert_eq!(empty.total_count, 0);
        assert_eq!(empty.grading_progress, 0);
    }

    #[test]
    fn overall_attendance_pools_counts() {
        let rec = |p, t| AttendanceRecord {
            date: date(2024, 1, 1),
            class_type: "Theory".to_string(),
            present_count: p,
            total_count: t,
            students: vec![],
        };
        assert_eq!(overall_attendance_rate(&[]), 0);
        assert_eq!(overall_attendance_rate(&[rec(6, 8), rec(7, 8)]), 81);
    }

    #[test]
    fn student_search_keeps_surrounding_spaces() {
        let roster = vec![
            Student {
                id: "1".to_string(),
                name: "John Doe".to_string(),
                age: 20,
                register_number: "R001".to_string(),
                roll_number: "01".to_string(),
                year: StudyYear::First,
                class_name: "B.Sc Computer Science".to_string(),
                status: Residency::DayScholar,
            },
        ];
        assert_eq!(filter_students(&roster, None, "01").len(), 1);
        assert!(filter_students(&roster, None, " 01").is_empty());
        assert!(filter_students(&roster, None, " john").is_empty());
        assert_eq!(filter_students(&roster, None, "john").len(), 1);
        assert_eq!(filter_students(&roster, None, "").len(), 1);
    }

    #[test]
    fn leave_filter_sorts_newest_first() {
        let req = |id: &str, status, applied| LeaveRequest {
            id: id.to_string(),
            faculty_id: "F001".to_string(),
            from_date: date(2024, 1, 1),
            to_date: date(2024, 1, 2),
            reason: "r".to_string(),
            kind: LeaveType::Sick,
            status,
            applied_date: applied,
            approved_by: None,
            approved_date: None,
            rejection_reason: None,
        };
        let all = vec![
            req("old", LeaveStatus::Approved, date(2023, 11, 1)),
            req("new", LeaveStatus::Pending, date(2024, 2, 1)),
            req("mid", LeaveStatus::Approved, date(2024, 1, 1)),
        ];
        let ids: Vec<String> = filter_leave_requests(&all, None).into_iter().map(|r| r.id).collect();
        assert_eq!(ids, vec!["new", "mid", "old"]);
        let approved = filter_leave_requests(&all, Some(LeaveStatus::Approved));
        assert_eq!(approved.len(), 2);
        assert_eq!(approved[0].id, "mid");

        let stats = leave_status_stats(&all);
        assert_eq!((stats.total, stats.pending, stats.approved, stats.rejected), (3, 1, 2, 0));
    }
}
