use serde::Serialize;

use crate::mission::Mission;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Ownership {
    Mine,
    Delegated,
    Unrelated,
}

pub fn classify(mission: &Mission, viewer_id: Option<&str>) -> Ownership {
    let Some(viewer) = viewer_id.map(str::trim).filter(|id| !id.is_empty()) else {
        return Ownership::Unrelated;
    };

    let assigned_to = mission.assigned_to.id.as_deref();
    let made_by_viewer = mission.assigned_by.id.as_deref() == Some(viewer)
        || mission.created_by.id.as_deref() == Some(viewer);

    match assigned_to {
        Some(assignee) if assignee == viewer => Ownership::Mine,
        // An unassigned mission belongs to whoever made it.
        None if made_by_viewer => Ownership::Mine,
        Some(_) if made_by_viewer => Ownership::Delegated,
        _ => Ownership::Unrelated,
    }
}
