use std::collections::{BTreeMap, BTreeSet};

use anyhow::Context;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::datetime::{self, parse_date_key};
use crate::mission::{Cadence, Member, Mission, MissionKind, RoleRef, normalize_field};

#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RepeatType {
    #[default]
    None,
    Daily,
    Weekly,
    Monthly,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RepeatRule {
    #[serde(rename = "type")]
    pub repeat_type: RepeatType,
}

// Wire dates arrive in whatever shape the upstream store last wrote: epoch
// numbers, RFC 3339 text, bare calendar days, or Firestore timestamp maps.
// Anything unrecognized resolves to None, which downstream means the mission
// never occurs or is excluded from scoring.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawDate {
    Epoch(i64),
    Text(String),
    Stamp {
        #[serde(alias = "_seconds")]
        seconds: i64,
        #[serde(default, alias = "_nanoseconds")]
        nanoseconds: u32,
    },
    Other(Value),
}

const EPOCH_MILLIS_FLOOR: u64 = 100_000_000_000;

#[derive(Debug, Clone, Copy, PartialEq)]
enum WireDate {
    Day(NaiveDate),
    Instant(DateTime<Utc>),
}

impl RawDate {
    fn resolve(&self) -> Option<WireDate> {
        match self {
            Self::Epoch(raw) => epoch_instant(*raw).map(WireDate::Instant),
            Self::Text(text) => resolve_text(text),
            Self::Stamp {
                seconds,
                nanoseconds,
            } => Utc
                .timestamp_opt(*seconds, *nanoseconds)
                .single()
                .map(WireDate::Instant),
            Self::Other(value) => value
                .as_f64()
                .and_then(|secs| Utc.timestamp_opt(secs as i64, 0).single())
                .map(WireDate::Instant),
        }
    }
}

fn epoch_instant(raw: i64) -> Option<DateTime<Utc>> {
    if raw.unsigned_abs() >= EPOCH_MILLIS_FLOOR {
        Utc.timestamp_millis_opt(raw).single()
    } else {
        Utc.timestamp_opt(raw, 0).single()
    }
}

fn resolve_text(text: &str) -> Option<WireDate> {
    let token = text.trim();
    if token.is_empty() {
        return None;
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(token) {
        return Some(WireDate::Instant(parsed.with_timezone(&Utc)));
    }

    if let Some(day) = parse_date_key(token) {
        return Some(WireDate::Day(day));
    }

    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(token, fmt) {
            return Some(WireDate::Instant(DateTime::from_naive_utc_and_offset(
                naive, Utc,
            )));
        }
    }

    None
}

impl WireDate {
    fn local_day(self, tz: Tz) -> NaiveDate {
        match self {
            Self::Day(day) => day,
            Self::Instant(instant) => datetime::local_day(instant, tz),
        }
    }

    fn local_datetime(self, tz: Tz) -> NaiveDateTime {
        match self {
            Self::Day(day) => day.and_time(NaiveTime::MIN),
            Self::Instant(instant) => datetime::local_datetime(instant, tz),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MissionRecord {
    pub id: Option<String>,

    pub title: Option<String>,

    pub due_date: Option<RawDate>,

    pub repeat: Option<RepeatRule>,

    pub skip_dates: Vec<String>,

    pub completed_dates: Vec<String>,

    pub completed: bool,

    pub completed_at: Option<RawDate>,

    pub archived: bool,

    pub exp_value: Option<i64>,

    pub assigned_to_user_id: Option<String>,
    pub assigned_to_name: Option<String>,
    pub assigned_by_user_id: Option<String>,
    pub assigned_by_name: Option<String>,
    pub created_by_user_id: Option<String>,
    pub created_by_name: Option<String>,
    pub completed_by_user_id: Option<String>,
    pub completed_by_name: Option<String>,

    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl MissionRecord {
    pub fn into_mission(self, tz: Tz) -> Option<Mission> {
        let Some(id) = normalize_field(self.id) else {
            warn!("mission record without id; skipping");
            return None;
        };

        let due_day = self
            .due_date
            .as_ref()
            .and_then(RawDate::resolve)
            .map(|date| date.local_day(tz));
        if self.due_date.is_some() && due_day.is_none() {
            warn!(mission = %id, "unparseable dueDate; mission will never occur");
        }

        let completed_at = self
            .completed_at
            .as_ref()
            .and_then(RawDate::resolve)
            .map(|date| date.local_datetime(tz));
        if self.completed_at.is_some() && completed_at.is_none() {
            warn!(mission = %id, "unparseable completedAt; excluded from period scoring");
        }

        let exp_value = match self.exp_value.unwrap_or(0) {
            negative if negative < 0 => {
                warn!(mission = %id, exp_value = negative, "negative expValue treated as zero");
                0
            }
            value => u32::try_from(value).unwrap_or(u32::MAX),
        };

        let repeat_type = self
            .repeat
            .map(|rule| rule.repeat_type)
            .unwrap_or_default();
        let kind = match repeat_type {
            RepeatType::None => MissionKind::OneOff {
                completed: self.completed,
            },
            recurring => MissionKind::Recurring {
                cadence: match recurring {
                    RepeatType::Daily => Cadence::Daily,
                    RepeatType::Weekly => Cadence::Weekly,
                    RepeatType::Monthly => Cadence::Monthly,
                    RepeatType::None | RepeatType::Unknown => Cadence::Unknown,
                },
                completed_dates: canonical_keys(&self.completed_dates, &id, "completedDates"),
                skip_dates: canonical_keys(&self.skip_dates, &id, "skipDates"),
                legacy_completed: self.completed,
            },
        };

        Some(Mission {
            id,
            title: self.title.unwrap_or_default(),
            due_day,
            archived: self.archived,
            exp_value,
            completed_at,
            assigned_to: RoleRef::new(self.assigned_to_user_id, self.assigned_to_name),
            assigned_by: RoleRef::new(self.assigned_by_user_id, self.assigned_by_name),
            created_by: RoleRef::new(self.created_by_user_id, self.created_by_name),
            completed_by: RoleRef::new(self.completed_by_user_id, self.completed_by_name),
            kind,
        })
    }
}

fn canonical_keys(raw: &[String], mission: &str, field: &'static str) -> BTreeSet<String> {
    let mut keys = BTreeSet::new();
    for entry in raw {
        match parse_date_key(entry) {
            Some(day) => {
                keys.insert(datetime::date_key(day));
            }
            None => {
                warn!(mission = %mission, field, entry = %entry, "dropping non-canonical date key");
            }
        }
    }
    keys
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MemberRecord {
    pub id: Option<String>,
    pub uid: Option<String>,
    pub display_name: Option<String>,
    pub username: Option<String>,
    pub email: Option<String>,
    #[serde(alias = "photoURL")]
    pub photo_url: Option<String>,
    pub avatar_url: Option<String>,
    pub total_exp: Option<i64>,

    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl MemberRecord {
    pub fn into_member(self) -> Option<Member> {
        let id = normalize_field(self.id).or_else(|| normalize_field(self.uid));
        let Some(id) = id else {
            warn!("member record without id or uid; skipping");
            return None;
        };

        Some(Member {
            id,
            display_name: normalize_field(self.display_name),
            username: normalize_field(self.username),
            email: normalize_field(self.email),
            avatar_url: normalize_field(self.photo_url).or_else(|| normalize_field(self.avatar_url)),
            total_exp: u64::try_from(self.total_exp.unwrap_or(0).max(0)).unwrap_or(0),
        })
    }
}

#[tracing::instrument(skip(raw))]
pub fn decode_missions(raw: &str, tz: Tz) -> anyhow::Result<Vec<Mission>> {
    let documents: Vec<Value> =
        serde_json::from_str(raw).context("mission snapshot is not a JSON array")?;

    let mut missions = Vec::with_capacity(documents.len());
    for (index, document) in documents.into_iter().enumerate() {
        let record: MissionRecord = match serde_json::from_value(document) {
            Ok(record) => record,
            Err(err) => {
                warn!(index, error = %err, "skipping malformed mission document");
                continue;
            }
        };
        if let Some(mission) = record.into_mission(tz) {
            missions.push(mission);
        }
    }

    debug!(count = missions.len(), "decoded mission snapshot");
    Ok(missions)
}

#[tracing::instrument(skip(raw))]
pub fn decode_members(raw: &str) -> anyhow::Result<Vec<Member>> {
    let documents: Vec<Value> =
        serde_json::from_str(raw).context("member snapshot is not a JSON array")?;

    let mut members = Vec::with_capacity(documents.len());
    for (index, document) in documents.into_iter().enumerate() {
        let record: MemberRecord = match serde_json::from_value(document) {
            Ok(record) => record,
            Err(err) => {
                warn!(index, error = %err, "skipping malformed member document");
                continue;
            }
        };
        if let Some(member) = record.into_member() {
            members.push(member);
        }
    }

    debug!(count = members.len(), "decoded member snapshot");
    Ok(members)
}
