use super::Period;
use crate::timetable::Timetable;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttendanceStatus {
    OnTime,
    Late,
}

/// The minute after which a join counts as late.
pub fn cutoff(timetable: &Timetable, period: &Period) -> i32 {
    match period {
        Period::RollCall => timetable.start_time,
        Period::Dismissal => timetable.end_time,
        Period::Slot { index, .. } => timetable.times[*index],
    }
}

/// Joining exactly at the cutoff still counts as on time.
pub fn classify(timetable: &Timetable, minute_of_day: i32, period: &Period) -> AttendanceStatus {
    if minute_of_day <= cutoff(timetable, period) {
        AttendanceStatus::OnTime
    } else {
        AttendanceStatus::Late
    }
}
