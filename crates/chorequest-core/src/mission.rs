use std::collections::BTreeSet;

use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Cadence {
    Daily,
    Weekly,
    Monthly,
    Unknown,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub enum MissionKind {
    OneOff {
        completed: bool,
    },
    Recurring {
        cadence: Cadence,
        completed_dates: BTreeSet<String>,
        skip_dates: BTreeSet<String>,
        legacy_completed: bool,
    },
}

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct RoleRef {
    pub id: Option<String>,
    pub name: Option<String>,
}

impl RoleRef {
    pub fn new(id: Option<String>, name: Option<String>) -> Self {
        Self {
            id: normalize_field(id),
            name: normalize_field(name),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.id.is_none() && self.name.is_none()
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Mission {
    pub id: String,

    pub title: String,

    pub due_day: Option<NaiveDate>,

    pub archived: bool,

    pub exp_value: u32,

    pub completed_at: Option<NaiveDateTime>,

    pub assigned_to: RoleRef,

    pub assigned_by: RoleRef,

    pub created_by: RoleRef,

    pub completed_by: RoleRef,

    pub kind: MissionKind,
}

impl Mission {
    pub fn is_recurring(&self) -> bool {
        matches!(self.kind, MissionKind::Recurring { .. })
    }

    // The single wire-level completion flag, as opposed to the per-occurrence
    // markers. The ranking path scores off this field for both variants.
    pub fn completion_flag(&self) -> bool {
        match &self.kind {
            MissionKind::OneOff { completed } => *completed,
            MissionKind::Recurring {
                legacy_completed, ..
            } => *legacy_completed,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Member {
    pub id: String,
    pub display_name: Option<String>,
    pub username: Option<String>,
    pub email: Option<String>,
    pub avatar_url: Option<String>,
    pub total_exp: u64,
}

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct Viewer {
    pub id: Option<String>,
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
}

pub(crate) fn normalize_field(value: Option<String>) -> Option<String> {
    value
        .map(|raw| raw.trim().to_string())
        .filter(|trimmed| !trimmed.is_empty())
}
