use chrono::NaiveDate;

use crate::datetime::date_key;
use crate::mission::{Mission, MissionKind};

pub fn is_done_on(mission: &Mission, day: NaiveDate) -> bool {
    match &mission.kind {
        // A one-off mission's completion is not day-scoped.
        MissionKind::OneOff { completed } => *completed,
        MissionKind::Recurring {
            completed_dates, ..
        } => {
            if completed_dates.contains(&date_key(day)) {
                return true;
            }
            // Legacy records marked completion with a bare timestamp before
            // per-occurrence tracking existed.
            mission
                .completed_at
                .map(|at| at.date() == day)
                .unwrap_or(false)
        }
    }
}
