pub mod board;
pub mod completion;
pub mod datetime;
pub mod label;
pub mod mission;
pub mod ownership;
pub mod ranking;
pub mod recurrence;
pub mod snapshot;

pub use board::{DayBoard, day_board};
pub use completion::is_done_on;
pub use label::{
    MemberDirectory, RoleLabel, resolve_assignee, resolve_completer, resolve_creator,
};
pub use mission::{Cadence, Member, Mission, MissionKind, RoleRef, Viewer};
pub use ownership::{Ownership, classify};
pub use ranking::{Period, PeriodWindow, RankEntry, rank};
pub use recurrence::occurs_on;
pub use snapshot::{MemberRecord, MissionRecord, decode_members, decode_missions};
