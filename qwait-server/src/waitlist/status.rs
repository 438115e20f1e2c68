//! Status Machine (状态机)
//!
//! ```text
//! WAITING ──▶ NOTIFIED ──▶ SERVED / CANCELLED / NO_SHOW
//!    │                         ▲
//!    └─────────────────────────┘
//! ```
//!
//! 终态是汇点，任何离开终态的转移都被拒绝。

use shared::models::EntryStatus;

/// Statuses a transition into `target` may start from
///
/// The repository turns this into a `status IN (...)` guard on the UPDATE,
/// which both enforces the graph and serializes concurrent transitions on
/// one entry.
pub fn valid_sources(target: EntryStatus) -> &'static [EntryStatus] {
    match target {
        // Nothing transitions back into the initial state
        EntryStatus::Waiting => &[],
        EntryStatus::Notified => &[EntryStatus::Waiting],
        EntryStatus::Served | EntryStatus::Cancelled | EntryStatus::NoShow => {
            &[EntryStatus::Waiting, EntryStatus::Notified]
        }
    }
}

/// Whether `from -> to` is a legal edge of the status graph
pub fn can_transition(from: EntryStatus, to: EntryStatus) -> bool {
    valid_sources(to).contains(&from)
}
