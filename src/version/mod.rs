//! Version ordering engine
//!
//! Pure, synchronous computations over already fetched version strings:
//! - `parser`: raw text to a totally ordered [`ParsedVersion`]
//! - `set`: ordered, deduplicated [`VersionSet`] with initial/latest/placement queries
//! - `comparator`: delta between two labeled sets ([`ComparisonResult`])
//! - `updates`: versions strictly newer than an installed one ([`UpdateSet`])
//! - `filter`: pre-release, yanked and cooldown rules applied before resolution

pub mod comparator;
pub mod filter;
pub mod parser;
pub mod set;
pub mod updates;

pub use comparator::{compare, compare_labeled, ComparisonResult, Side};
pub use filter::UpdateFilter;
pub use parser::{parse, Marker, MarkerKind, ParsedVersion, Segment};
pub use set::{Placement, VersionSet};
pub use updates::{resolve, UpdateOrder, UpdateSet};
