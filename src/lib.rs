//! Assemble flat parent-referencing records into ordered trees.
//!
//! The core lives in [`domain`]: implement [`domain::Record`] for a row type,
//! then call [`domain::generate_tree`] for the forest or
//! [`domain::find_relation_nodes`] for the ancestor closure of some targets.
//!
//! ```
//! use rstree::domain::{find_relation_nodes, generate_tree, MenuRecord};
//!
//! let all = vec![
//!     MenuRecord::new(1, 0, "Overview"),
//!     MenuRecord::new(3, 1, "Asset"),
//!     MenuRecord::new(6, 3, "Device"),
//!     MenuRecord::new(4, 1, "PE"),
//! ];
//! let targets = vec![all[2].clone()];
//! let closure = find_relation_nodes(&targets, &all);
//! let forest = generate_tree(&closure, &[]).unwrap();
//! assert_eq!(forest[0].node_count(), 3);
//! ```

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod tree_traits;
pub mod util;
