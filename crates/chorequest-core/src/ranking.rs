use std::collections::HashMap;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::datetime::{
    end_of_day, end_of_month, end_of_week, start_of_day, start_of_month, start_of_week,
};
use crate::mission::{Member, Mission};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    Day,
    Week,
    Month,
    All,
}

impl Period {
    pub fn parse(token: &str) -> Option<Self> {
        match token.trim().to_ascii_lowercase().as_str() {
            "day" | "today" => Some(Self::Day),
            "week" => Some(Self::Week),
            "month" => Some(Self::Month),
            "all" | "all-time" | "alltime" => Some(Self::All),
            _ => None,
        }
    }

    pub fn window(self, anchor: NaiveDate) -> Option<PeriodWindow> {
        match self {
            Self::Day => Some(PeriodWindow {
                start: start_of_day(anchor),
                end: end_of_day(anchor),
            }),
            Self::Week => Some(PeriodWindow {
                start: start_of_day(start_of_week(anchor)),
                end: end_of_day(end_of_week(anchor)),
            }),
            Self::Month => Some(PeriodWindow {
                start: start_of_day(start_of_month(anchor)),
                end: end_of_day(end_of_month(anchor)),
            }),
            Self::All => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeriodWindow {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl PeriodWindow {
    pub fn contains(&self, at: NaiveDateTime) -> bool {
        self.start <= at && at <= self.end
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RankEntry<'a> {
    pub member: &'a Member,
    pub period_exp: u64,
}

#[tracing::instrument(skip(members, missions))]
pub fn rank<'a>(
    members: &'a [Member],
    missions: &[Mission],
    period: Period,
    anchor: NaiveDate,
) -> Vec<RankEntry<'a>> {
    let mut entries: Vec<RankEntry<'a>> = match period.window(anchor) {
        // All-time reads the cumulative counter verbatim; no mission scan.
        None => members
            .iter()
            .map(|member| RankEntry {
                member,
                period_exp: member.total_exp,
            })
            .collect(),
        Some(window) => {
            let mut positions: HashMap<&str, usize> = HashMap::with_capacity(members.len());
            for (position, member) in members.iter().enumerate() {
                positions.entry(member.id.as_str()).or_insert(position);
            }

            let mut scores = vec![0_u64; members.len()];
            for mission in missions {
                // Scoring reads the single flag/timestamp pair, not the
                // per-occurrence markers, so a recurring mission contributes
                // at most once per window.
                if !mission.completion_flag() {
                    continue;
                }
                let Some(assignee) = mission.assigned_to.id.as_deref() else {
                    continue;
                };
                let Some(done_at) = mission.completed_at else {
                    continue;
                };
                if !window.contains(done_at) {
                    continue;
                }
                if let Some(&position) = positions.get(assignee) {
                    scores[position] += u64::from(mission.exp_value);
                }
            }

            members
                .iter()
                .zip(scores)
                .map(|(member, period_exp)| RankEntry { member, period_exp })
                .collect()
        }
    };

    // Stable sort: ties keep the members' input order.
    entries.sort_by(|a, b| b.period_exp.cmp(&a.period_exp));
    debug!(?period, %anchor, entries = entries.len(), "ranked members");
    entries
}
