//! Channel history and thread loading, plus the scroll anchoring that keeps
//! the view steady while older pages arrive.

mod loader;
mod scroll;
mod thread;

pub use loader::{ChannelMessageLoader, LoadOutcome};
pub use scroll::{ScrollAnchor, ScrollContainer, ScrollOutcome, LOAD_OLDER_THRESHOLD};
pub use thread::{ThreadLoader, ThreadOutcome};
