use std::collections::HashMap;

use serde::Serialize;

use crate::mission::{Member, Mission, RoleRef, Viewer};

pub const SELF_LABEL: &str = "You";
pub const UNNAMED_LABEL: &str = "Unnamed";
pub const UNKNOWN_LABEL: &str = "Unknown";
pub const UNKNOWN_ID: &str = "unknown";

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct RoleLabel {
    pub id: String,
    pub label: String,
    pub avatar_url: Option<String>,
}

#[derive(Debug)]
pub struct MemberDirectory<'a> {
    by_id: HashMap<&'a str, &'a Member>,
}

impl<'a> MemberDirectory<'a> {
    pub fn new(members: &'a [Member]) -> Self {
        let mut by_id = HashMap::with_capacity(members.len());
        for member in members {
            // First record wins on duplicate ids.
            by_id.entry(member.id.as_str()).or_insert(member);
        }
        Self { by_id }
    }

    pub fn get(&self, id: &str) -> Option<&'a Member> {
        self.by_id.get(id).copied()
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}

pub fn resolve_creator(
    mission: &Mission,
    directory: &MemberDirectory<'_>,
    viewer: &Viewer,
) -> Option<RoleLabel> {
    let role = if mission.created_by.is_empty() {
        &mission.assigned_by
    } else {
        &mission.created_by
    };
    resolve_role(role, directory, viewer)
}

pub fn resolve_assignee(
    mission: &Mission,
    directory: &MemberDirectory<'_>,
    viewer: &Viewer,
) -> Option<RoleLabel> {
    resolve_role(&mission.assigned_to, directory, viewer)
}

pub fn resolve_completer(
    mission: &Mission,
    directory: &MemberDirectory<'_>,
    viewer: &Viewer,
) -> Option<RoleLabel> {
    // Absent an explicit completer, the assignee is assumed to be who
    // completed it.
    let role = if mission.completed_by.is_empty() {
        &mission.assigned_to
    } else {
        &mission.completed_by
    };
    resolve_role(role, directory, viewer)
}

fn resolve_role(
    role: &RoleRef,
    directory: &MemberDirectory<'_>,
    viewer: &Viewer,
) -> Option<RoleLabel> {
    let denormalized = role.name.as_deref();

    if let Some(id) = role.id.as_deref() {
        if viewer.id.as_deref() == Some(id) {
            // Prefer a directory-confirmed name over the raw profile name
            // over the literal placeholder.
            let confirmed = directory.get(id);
            let label = confirmed
                .and_then(member_name)
                .map(ToString::to_string)
                .or_else(|| viewer.display_name.clone())
                .unwrap_or_else(|| SELF_LABEL.to_string());
            let avatar_url = confirmed
                .and_then(|member| member.avatar_url.clone())
                .or_else(|| viewer.avatar_url.clone());
            return Some(RoleLabel {
                id: id.to_string(),
                label,
                avatar_url,
            });
        }

        if let Some(member) = directory.get(id) {
            let label = member_name(member)
                .or(denormalized)
                .unwrap_or(UNNAMED_LABEL)
                .to_string();
            return Some(RoleLabel {
                id: member.id.clone(),
                label,
                avatar_url: member.avatar_url.clone(),
            });
        }

        return Some(RoleLabel {
            id: id.to_string(),
            label: denormalized.unwrap_or(UNKNOWN_LABEL).to_string(),
            avatar_url: None,
        });
    }

    denormalized.map(|name| RoleLabel {
        id: UNKNOWN_ID.to_string(),
        label: name.to_string(),
        avatar_url: None,
    })
}

fn member_name(member: &Member) -> Option<&str> {
    member
        .display_name
        .as_deref()
        .or(member.username.as_deref())
}

#[cfg(test)]
mod tests {
    use super::{
        MemberDirectory, RoleLabel, SELF_LABEL, UNKNOWN_ID, UNKNOWN_LABEL, UNNAMED_LABEL,
        resolve_assignee, resolve_completer, resolve_creator,
    };
    use crate::mission::{Member, Mission, MissionKind, RoleRef, Viewer};

    fn member(id: &str, display_name: Option<&str>, username: Option<&str>) -> Member {
        Member {
            id: id.to_string(),
            display_name: display_name.map(ToString::to_string),
            username: username.map(ToString::to_string),
            email: None,
            avatar_url: Some(format!("https://img/{id}.png")),
            total_exp: 0,
        }
    }

    fn mission() -> Mission {
        Mission {
            id: "m1".to_string(),
            title: "Laundry".to_string(),
            due_day: None,
            archived: false,
            exp_value: 0,
            completed_at: None,
            assigned_to: RoleRef::default(),
            assigned_by: RoleRef::default(),
            created_by: RoleRef::default(),
            completed_by: RoleRef::default(),
            kind: MissionKind::OneOff { completed: false },
        }
    }

    fn viewer(id: &str) -> Viewer {
        Viewer {
            id: Some(id.to_string()),
            display_name: Some("Profile Name".to_string()),
            avatar_url: Some("https://img/profile.png".to_string()),
        }
    }

    #[test]
    fn self_shortcut_prefers_the_directory_confirmed_name() {
        let members = [member("v", Some("Ala"), None)];
        let directory = MemberDirectory::new(&members);
        let mut m = mission();
        m.assigned_to = RoleRef::new(Some("v".to_string()), None);

        let label = resolve_assignee(&m, &directory, &viewer("v")).expect("label");
        assert_eq!(label.label, "Ala");
        assert_eq!(label.id, "v");
        assert_eq!(label.avatar_url.as_deref(), Some("https://img/v.png"));
    }

    #[test]
    fn self_shortcut_falls_back_to_profile_then_placeholder() {
        let directory = MemberDirectory::new(&[]);
        let mut m = mission();
        m.assigned_to = RoleRef::new(Some("v".to_string()), None);

        let label = resolve_assignee(&m, &directory, &viewer("v")).expect("label");
        assert_eq!(label.label, "Profile Name");
        assert_eq!(label.avatar_url.as_deref(), Some("https://img/profile.png"));

        let bare = Viewer {
            id: Some("v".to_string()),
            display_name: None,
            avatar_url: None,
        };
        let label = resolve_assignee(&m, &directory, &bare).expect("label");
        assert_eq!(label.label, SELF_LABEL);
    }

    #[test]
    fn directory_hit_prefers_display_name_then_username() {
        let members = [
            member("u1", Some("Ala"), Some("ala99")),
            member("u2", None, Some("bartek")),
            member("u3", None, None),
        ];
        let directory = MemberDirectory::new(&members);
        let observer = viewer("someone-else");

        let mut m = mission();
        m.assigned_to = RoleRef::new(Some("u1".to_string()), None);
        let label = resolve_assignee(&m, &directory, &observer).expect("label");
        assert_eq!(label.label, "Ala");

        m.assigned_to = RoleRef::new(Some("u2".to_string()), None);
        let label = resolve_assignee(&m, &directory, &observer).expect("label");
        assert_eq!(label.label, "bartek");

        m.assigned_to = RoleRef::new(Some("u3".to_string()), Some("Denormalized".to_string()));
        let label = resolve_assignee(&m, &directory, &observer).expect("label");
        assert_eq!(label.label, "Denormalized");

        m.assigned_to = RoleRef::new(Some("u3".to_string()), None);
        let label = resolve_assignee(&m, &directory, &observer).expect("label");
        assert_eq!(label.label, UNNAMED_LABEL);
    }

    #[test]
    fn unresolvable_id_keeps_the_denormalized_name() {
        let directory = MemberDirectory::new(&[]);
        let observer = viewer("someone-else");

        let mut m = mission();
        m.assigned_to = RoleRef::new(Some("gone".to_string()), Some("Old Name".to_string()));
        let label = resolve_assignee(&m, &directory, &observer).expect("label");
        assert_eq!(
            label,
            RoleLabel {
                id: "gone".to_string(),
                label: "Old Name".to_string(),
                avatar_url: None,
            }
        );

        m.assigned_to = RoleRef::new(Some("gone".to_string()), None);
        let label = resolve_assignee(&m, &directory, &observer).expect("label");
        assert_eq!(label.label, UNKNOWN_LABEL);
    }

    #[test]
    fn name_only_roles_get_a_synthetic_id() {
        let directory = MemberDirectory::new(&[]);
        let observer = viewer("someone-else");

        let mut m = mission();
        m.created_by = RoleRef::new(None, Some("Grandma".to_string()));
        let label = resolve_creator(&m, &directory, &observer).expect("label");
        assert_eq!(label.id, UNKNOWN_ID);
        assert_eq!(label.label, "Grandma");
    }

    #[test]
    fn empty_roles_resolve_to_nothing() {
        let directory = MemberDirectory::new(&[]);
        let observer = viewer("someone-else");
        let m = mission();

        assert!(resolve_creator(&m, &directory, &observer).is_none());
        assert!(resolve_assignee(&m, &directory, &observer).is_none());
        assert!(resolve_completer(&m, &directory, &observer).is_none());
    }

    #[test]
    fn creator_falls_back_to_the_assigner_fields() {
        let directory = MemberDirectory::new(&[]);
        let observer = viewer("someone-else");

        let mut m = mission();
        m.assigned_by = RoleRef::new(None, Some("Mom".to_string()));
        let label = resolve_creator(&m, &directory, &observer).expect("label");
        assert_eq!(label.label, "Mom");
    }

    #[test]
    fn completer_falls_back_to_the_assignee() {
        let members = [member("kid", Some("Janek"), None)];
        let directory = MemberDirectory::new(&members);
        let observer = viewer("someone-else");

        let mut m = mission();
        m.assigned_to = RoleRef::new(Some("kid".to_string()), None);
        let label = resolve_completer(&m, &directory, &observer).expect("label");
        assert_eq!(label.id, "kid");
        assert_eq!(label.label, "Janek");

        m.completed_by = RoleRef::new(None, Some("Dad".to_string()));
        let label = resolve_completer(&m, &directory, &observer).expect("label");
        assert_eq!(label.label, "Dad");
    }

    #[test]
    fn duplicate_directory_ids_keep_the_first_record() {
        let members = [member("u1", Some("First"), None), member("u1", Some("Second"), None)];
        let directory = MemberDirectory::new(&members);
        assert_eq!(directory.len(), 1);
        let hit = directory.get("u1").expect("member");
        assert_eq!(hit.display_name.as_deref(), Some("First"));
    }
}
