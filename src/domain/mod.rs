//! Domain layer: records, tree nodes and the assembly algorithms
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod builder;
pub mod entities;
pub mod error;
pub mod node;
pub mod record;
pub mod resolver;

pub use builder::{
    generate_tree, BuildOptions, DuplicatePolicy, LookupStrategy, TreeBuilder, DEFAULT_MAX_DEPTH,
    MAX_DEPTH_LIMIT,
};
pub use entities::MenuRecord;
pub use error::{DomainError, TreeResult};
pub use node::{TreeIterator, TreeNode};
pub use record::Record;
pub use resolver::find_relation_nodes;
