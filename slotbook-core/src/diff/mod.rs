//! Change detection between the edited schedule and the last saved one.

mod change_set;
mod diff_kind;
mod extra_changes;
mod slot_diff;

pub use change_set::{ChangeSet, build_payload, has_unsaved_changes};
pub use diff_kind::DiffKind;
pub use extra_changes::ExtraSlotChanges;
pub use slot_diff::SlotDiff;
