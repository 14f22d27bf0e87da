use super::AttendanceError;
use crate::timetable::Timetable;

const OPENS_BEFORE: i32 = 10;
const ROLL_CALL_CLOSES_AFTER: i32 = 5;
const DISMISSAL_CLOSES_AFTER: i32 = 5;
const SLOT_CLOSES_AFTER: i32 = 30;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Period {
    RollCall,
    Dismissal,
    Slot { index: usize, subject: String },
}

/// Renders minutes since midnight as `H:MM`.
pub fn format_minutes(minute_of_day: i32) -> String {
    format!("{}:{:02}", minute_of_day / 60, minute_of_day % 60)
}

fn within(minute_of_day: i32, anchor: i32, closes_after: i32) -> bool {
    anchor - OPENS_BEFORE <= minute_of_day && minute_of_day <= anchor + closes_after
}

/// Finds the period a join at `minute_of_day` on ISO `weekday` belongs to.
///
/// Roll call is checked first, then dismissal, then the class slots. When
/// slot windows overlap the last matching slot is returned.
pub fn resolve_period(
    timetable: &Timetable,
    weekday: u32,
    minute_of_day: i32,
) -> Result<Period, AttendanceError> {
    let labels = timetable
        .labels_for(weekday)
        .ok_or(AttendanceError::WeekendNotTracked)?;

    if within(minute_of_day, timetable.start_time, ROLL_CALL_CLOSES_AFTER) {
        return Ok(Period::RollCall);
    }
    if within(minute_of_day, timetable.end_time, DISMISSAL_CLOSES_AFTER) {
        return Ok(Period::Dismissal);
    }

    let mut current = None;
    for (index, (&time, subject)) in timetable.times.iter().zip(labels).enumerate() {
        if within(minute_of_day, time, SLOT_CLOSES_AFTER) && !subject.is_empty() {
            current = Some(Period::Slot {
                index,
                subject: subject.clone(),
            });
        }
    }

    current.ok_or_else(|| AttendanceError::NoActiveWindow(format_minutes(minute_of_day)))
}
