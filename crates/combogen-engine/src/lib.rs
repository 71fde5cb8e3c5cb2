//! Constrained combination generation for combogen.
//!
//! Expands pool counts into labeled items, enumerates every selection of the
//! requested length that takes at most one item per pool, and persists the
//! item catalog, the selection set, and an audit record in one transaction.

pub mod engine;
pub mod enumerate;
pub mod errors;
pub mod expand;
pub mod persist;

pub use engine::{GenerationEngine, generate_and_store};
pub use enumerate::enumerate;
pub use errors::GenerationError;
pub use expand::{distinct_types, expand};
pub use persist::PersistenceCoordinator;
