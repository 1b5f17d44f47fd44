//! Ancestor closure: the records needed to render targets in context.

use std::collections::{HashMap, HashSet};

use itertools::Itertools;
use tracing::{debug, instrument, trace};

use crate::domain::record::Record;

/// Collect `targets` together with every ancestor found in `all`.
///
/// The result follows `all`'s order, one record per identity (its first
/// occurrence), so it can be fed straight back into the tree builder. Targets
/// absent from `all` are appended afterwards in target order and their
/// ancestors are not resolved. A walk ends at a root, at a missing parent, or
/// when an identity recurs within the same walk.
#[instrument(level = "debug", skip_all, fields(targets = targets.len(), records = all.len()))]
pub fn find_relation_nodes<'a, R: Record>(targets: &'a [R], all: &'a [R]) -> Vec<&'a R> {
    let mut by_id: HashMap<R::Id, &'a R> = HashMap::with_capacity(all.len());
    for record in all {
        by_id.entry(record.id()).or_insert(record);
    }

    let mut closure_ids: HashSet<R::Id> = HashSet::new();
    for target in targets.iter().filter(|t| by_id.contains_key(&t.id())) {
        walk_ancestors(target, &by_id, &mut closure_ids);
    }

    let mut result: Vec<&'a R> = all
        .iter()
        .filter(|record| closure_ids.contains(&record.id()))
        .unique_by(|record| record.id())
        .collect();

    let unmatched: Vec<&'a R> = targets
        .iter()
        .filter(|target| !by_id.contains_key(&target.id()))
        .unique_by(|target| target.id())
        .collect();
    if !unmatched.is_empty() {
        debug!("{} targets not present in universe", unmatched.len());
    }
    result.extend(unmatched);
    result
}

fn walk_ancestors<R: Record>(
    target: &R,
    by_id: &HashMap<R::Id, &R>,
    closure_ids: &mut HashSet<R::Id>,
) {
    let mut visited: HashSet<R::Id> = HashSet::new();
    visited.insert(target.id());
    closure_ids.insert(target.id());

    let mut current_is_root = target.is_root();
    let mut parent_id = target.parent_id();
    while !current_is_root {
        let Some(parent) = by_id.get(&parent_id) else {
            trace!("no parent {:?} in universe", parent_id);
            break;
        };
        if !visited.insert(parent.id()) {
            trace!("cycle at {:?}, stopping walk", parent.id());
            break;
        }
        closure_ids.insert(parent.id());
        current_is_root = parent.is_root();
        parent_id = parent.parent_id();
    }
}
