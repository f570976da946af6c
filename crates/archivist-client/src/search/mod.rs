//! Structured search: query parsing, the suggestion-driven input box, the
//! auto-submit timer and the request session.

mod debounce;
pub mod query;
mod search_box;
mod session;

pub use debounce::AutoSubmit;
pub use query::{Catalog, SearchFilters, Suggestion, UserField};
pub use search_box::{InputChange, KeyOutcome, SearchBox, SearchKey};
pub use session::{SearchOutcome, SearchSession};
