//! # Property Graph Model
//!
//! Plain DTOs shared by the host graph, the filter compiler, the traversal
//! engine and the result builder.
//!
//! This module is pure data: no I/O, no locks, no traversal state.

pub mod node;
pub mod relationship;
pub mod path;
pub mod value;
pub mod property_map;

pub use node::{Node, NodeId};
pub use relationship::{Relationship, RelId, Direction};
pub use path::Path;
pub use value::Value;
pub use property_map::{PropertyMap, props};
