//! Heading outlines: flat lists, the forest built from them, cascading
//! removal and search.

pub mod errors;
pub mod flat_list;
pub mod models;
pub mod search;
pub mod tree;

pub use errors::{OutlineError, OutlineResult, SearchError};
pub use flat_list::{cascade_remove, collect_descendants, normalize, renumber, Removal};
pub use models::{HeadingId, HeadingNode};
pub use search::{expansion_set, search, MatchField, SearchMatch, SearchOptions};
pub use tree::{DocumentTree, ParentPolicy};
