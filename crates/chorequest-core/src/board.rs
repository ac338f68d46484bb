use chrono::NaiveDate;
use serde::Serialize;
use tracing::debug;

use crate::completion::is_done_on;
use crate::mission::Mission;
use crate::ownership::{Ownership, classify};
use crate::recurrence::occurs_on;

#[derive(Debug, Default, Serialize)]
pub struct DayBoard<'a> {
    pub mine_pending: Vec<&'a Mission>,
    pub mine_done: Vec<&'a Mission>,
    pub delegated_pending: Vec<&'a Mission>,
    pub delegated_done: Vec<&'a Mission>,
}

impl DayBoard<'_> {
    pub fn is_empty(&self) -> bool {
        self.mine_pending.is_empty()
            && self.mine_done.is_empty()
            && self.delegated_pending.is_empty()
            && self.delegated_done.is_empty()
    }
}

#[tracing::instrument(skip(missions))]
pub fn day_board<'a>(
    missions: &'a [Mission],
    day: NaiveDate,
    viewer_id: Option<&str>,
) -> DayBoard<'a> {
    let mut board = DayBoard::default();

    for mission in missions {
        if !occurs_on(mission, day) {
            continue;
        }
        let bucket = match (classify(mission, viewer_id), is_done_on(mission, day)) {
            (Ownership::Mine, false) => &mut board.mine_pending,
            (Ownership::Mine, true) => &mut board.mine_done,
            (Ownership::Delegated, false) => &mut board.delegated_pending,
            (Ownership::Delegated, true) => &mut board.delegated_done,
            (Ownership::Unrelated, _) => continue,
        };
        bucket.push(mission);
    }

    debug!(
        %day,
        mine_pending = board.mine_pending.len(),
        mine_done = board.mine_done.len(),
        delegated_pending = board.delegated_pending.len(),
        delegated_done = board.delegated_done.len(),
        "built day board"
    );
    board
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use chrono::NaiveDate;

    use super::day_board;
    use crate::mission::{Cadence, Mission, MissionKind, RoleRef};

    fn day(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
    }

    fn mission(id: &str, due: NaiveDate, assigned_to: Option<&str>, assigned_by: Option<&str>) -> Mission {
        Mission {
            id: id.to_string(),
            title: id.to_string(),
            due_day: Some(due),
            archived: false,
            exp_value: 1,
            completed_at: None,
            assigned_to: RoleRef::new(assigned_to.map(ToString::to_string), None),
            assigned_by: RoleRef::new(assigned_by.map(ToString::to_string), None),
            created_by: RoleRef::default(),
            completed_by: RoleRef::default(),
            kind: MissionKind::OneOff { completed: false },
        }
    }

    #[test]
    fn partitions_the_day_into_four_buckets() {
        let monday = day(2024, 6, 3);

        let mine_pending = mission("mine-pending", monday, Some("v"), None);

        let mut mine_done = mission("mine-done", monday, Some("v"), None);
        mine_done.kind = MissionKind::OneOff { completed: true };

        let delegated_pending = mission("delegated-pending", monday, Some("kid"), Some("v"));

        let mut delegated_done = mission("delegated-done", monday, Some("kid"), Some("v"));
        delegated_done.kind = MissionKind::Recurring {
            cadence: Cadence::Weekly,
            completed_dates: ["2024-06-03".to_string()].into_iter().collect::<BTreeSet<_>>(),
            skip_dates: BTreeSet::new(),
            legacy_completed: false,
        };

        let unrelated = mission("unrelated", monday, Some("kid"), Some("parent"));
        let other_day = mission("other-day", day(2024, 6, 4), Some("v"), None);

        let missions = [
            mine_pending,
            mine_done,
            delegated_pending,
            delegated_done,
            unrelated,
            other_day,
        ];
        let board = day_board(&missions, monday, Some("v"));

        let ids = |bucket: &[&Mission]| {
            bucket
                .iter()
                .map(|mission| mission.id.clone())
                .collect::<Vec<_>>()
        };
        assert_eq!(ids(&board.mine_pending), ["mine-pending"]);
        assert_eq!(ids(&board.mine_done), ["mine-done"]);
        assert_eq!(ids(&board.delegated_pending), ["delegated-pending"]);
        assert_eq!(ids(&board.delegated_done), ["delegated-done"]);
    }

    #[test]
    fn no_viewer_means_an_empty_board() {
        let monday = day(2024, 6, 3);
        let missions = [mission("m", monday, Some("v"), None)];
        let board = day_board(&missions, monday, None);
        assert!(board.is_empty());
    }
}
