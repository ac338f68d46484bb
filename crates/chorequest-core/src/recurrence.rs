use chrono::{Datelike, NaiveDate};

use crate::datetime::date_key;
use crate::mission::{Cadence, Mission, MissionKind};

pub fn occurs_on(mission: &Mission, day: NaiveDate) -> bool {
    if mission.archived {
        return false;
    }
    let Some(due) = mission.due_day else {
        return false;
    };

    match &mission.kind {
        MissionKind::OneOff { .. } => day == due,
        MissionKind::Recurring {
            cadence,
            skip_dates,
            ..
        } => {
            // An explicit exception always wins over the pattern.
            if skip_dates.contains(&date_key(day)) {
                return false;
            }
            // The series starts on its due day; nothing occurs before it.
            if due > day {
                return false;
            }
            match cadence {
                Cadence::Daily => true,
                Cadence::Weekly => day.weekday() == due.weekday(),
                // Day-of-month match without clamping: a series anchored on
                // the 31st simply never occurs in shorter months.
                Cadence::Monthly => day.day() == due.day(),
                Cadence::Unknown => false,
            }
        }
    }
}
