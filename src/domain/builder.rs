//! Tree builder for assembling flat records into root-anchored trees.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, trace};

use crate::domain::error::{DomainError, TreeResult};
use crate::domain::node::TreeNode;
use crate::domain::record::Record;

/// Deepest hierarchy accepted by default (a lone root has depth 1).
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Ceiling for `max_depth`. Assembly, cloning, serialization and rendering
/// all recurse per level, so deeper trees would exhaust the stack.
pub const MAX_DEPTH_LIMIT: usize = 1024;

/// How records sharing an identity are treated before assembly.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DuplicatePolicy {
    /// Keep every record. A duplicated parent id hands its children to each
    /// copy, producing structurally duplicated subtrees.
    #[default]
    Preserve,
    /// Keep only the first record per identity, in input order.
    FirstWins,
}

/// How children are located for a parent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LookupStrategy {
    /// Parent id to children index built once; input order kept per bucket.
    #[default]
    Index,
    /// Nested scan over all records for every node, O(n²).
    Scan,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildOptions {
    pub max_depth: usize,
    pub duplicates: DuplicatePolicy,
    pub strategy: LookupStrategy,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            duplicates: DuplicatePolicy::default(),
            strategy: LookupStrategy::default(),
        }
    }
}

/// Assembles a forest from flat records.
///
/// Roots are the records whose `is_root()` holds, in input order. Children of
/// a node with id `P` are the records with `parent_id == P` and `id != P`, in
/// input order. Records never reached from a root (orphans, rootless cycles)
/// are dropped without error.
#[derive(Debug, Clone, Default)]
pub struct TreeBuilder {
    options: BuildOptions,
}

impl TreeBuilder {
    /// `options.max_depth` is capped at [`MAX_DEPTH_LIMIT`].
    pub fn new(mut options: BuildOptions) -> Self {
        if options.max_depth > MAX_DEPTH_LIMIT {
            debug!(
                "max_depth {} capped at {}",
                options.max_depth, MAX_DEPTH_LIMIT
            );
            options.max_depth = MAX_DEPTH_LIMIT;
        }
        Self { options }
    }

    /// Build the forest for `all`, flagging nodes whose id appears in `selected`.
    ///
    /// Selected records missing from `all` are ignored. Fails only when a
    /// branch is deeper than `max_depth`, which for sane input means duplicate
    /// identities form a loop reachable from a root.
    #[instrument(level = "debug", skip_all, fields(records = all.len(), selected = selected.len()))]
    pub fn build<'a, R: Record>(
        &self,
        all: &'a [R],
        selected: &[R],
    ) -> TreeResult<Vec<TreeNode<'a, R>>> {
        let selected_ids: HashSet<R::Id> = selected.iter().map(Record::id).collect();
        let records = self.dedupe(all);
        let lookup = ChildLookup::new(self.options.strategy, &records);

        let mut roots = Vec::new();
        for record in records.iter().copied().filter(|r| r.is_root()) {
            let mut root = self.make_node(record, &selected_ids, 1)?;
            self.attach_children(&mut root, &records, &lookup, &selected_ids, 1)?;
            roots.push(root);
        }

        let placed: usize = roots.iter().map(TreeNode::node_count).sum();
        if placed < records.len() {
            debug!(
                "{} records not reachable from a root (orphans or rootless cycles)",
                records.len() - placed
            );
        }
        debug!("built {} trees from {} records", roots.len(), records.len());
        Ok(roots)
    }

    fn dedupe<'a, R: Record>(&self, all: &'a [R]) -> Vec<&'a R> {
        match self.options.duplicates {
            DuplicatePolicy::Preserve => all.iter().collect(),
            DuplicatePolicy::FirstWins => {
                let mut seen = HashSet::new();
                all.iter()
                    .filter(|record| {
                        let first = seen.insert(record.id());
                        if !first {
                            trace!("dropping duplicate record {:?}", record.id());
                        }
                        first
                    })
                    .collect()
            }
        }
    }

    fn make_node<'a, R: Record>(
        &self,
        record: &'a R,
        selected_ids: &HashSet<R::Id>,
        depth: usize,
    ) -> TreeResult<TreeNode<'a, R>> {
        if depth > self.options.max_depth {
            return Err(DomainError::DepthLimitExceeded {
                id: format!("{:?}", record.id()),
                limit: self.options.max_depth,
            });
        }
        let mut node = TreeNode::new(record);
        node.selected = selected_ids.contains(&node.id);
        Ok(node)
    }

    fn attach_children<'a, R: Record>(
        &self,
        parent: &mut TreeNode<'a, R>,
        records: &[&'a R],
        lookup: &ChildLookup<R::Id>,
        selected_ids: &HashSet<R::Id>,
        depth: usize,
    ) -> TreeResult<()> {
        for idx in lookup.children_of(&parent.id, records) {
            let mut child = self.make_node(records[idx], selected_ids, depth + 1)?;
            self.attach_children(&mut child, records, lookup, selected_ids, depth + 1)?;
            parent.add_child(child);
        }
        Ok(())
    }
}

/// Assemble `all` with default options.
pub fn generate_tree<'a, R: Record>(
    all: &'a [R],
    selected: &[R],
) -> TreeResult<Vec<TreeNode<'a, R>>> {
    TreeBuilder::default().build(all, selected)
}

enum ChildLookup<Id> {
    Scan,
    Index(HashMap<Id, Vec<usize>>),
}

impl<Id: Clone + Eq + std::hash::Hash> ChildLookup<Id> {
    fn new<R: Record<Id = Id>>(strategy: LookupStrategy, records: &[&R]) -> Self {
        match strategy {
            LookupStrategy::Scan => Self::Scan,
            LookupStrategy::Index => {
                let mut index: HashMap<Id, Vec<usize>> = HashMap::new();
                for (idx, record) in records.iter().enumerate() {
                    let (id, parent_id) = (record.id(), record.parent_id());
                    if id != parent_id {
                        index.entry(parent_id).or_default().push(idx);
                    }
                }
                Self::Index(index)
            }
        }
    }

    /// Positions of the children of `parent`, in input order.
    fn children_of<R: Record<Id = Id>>(&self, parent: &Id, records: &[&R]) -> Vec<usize> {
        match self {
            Self::Scan => records
                .iter()
                .enumerate()
                .filter(|(_, r)| &r.parent_id() == parent && &r.id() != parent)
                .map(|(idx, _)| idx)
                .collect(),
            Self::Index(index) => index.get(parent).cloned().unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::MenuRecord;
    use crate::util::testing::{init_test_setup, menu_fixture};
    use rstest::rstest;

    fn ids<R: Record>(nodes: &[TreeNode<'_, R>]) -> Vec<R::Id> {
        nodes.iter().map(|n| n.id.clone()).collect()
    }

    fn builder(strategy: LookupStrategy) -> TreeBuilder {
        TreeBuilder::new(BuildOptions {
            strategy,
            ..BuildOptions::default()
        })
    }

    #[rstest]
    fn given_menu_when_building_then_shapes_two_roots(
        #[values(LookupStrategy::Index, LookupStrategy::Scan)] strategy: LookupStrategy,
    ) {
        init_test_setup();
        let all = menu_fixture();
        let forest = builder(strategy).build(&all, &[]).unwrap();

        assert_eq!(ids(&forest), vec![1, 2]);
        assert_eq!(ids(&forest[0].children), vec![3, 4]);
        assert_eq!(ids(&forest[0].children[0].children), vec![6, 7]);
        assert!(forest[0].children[1].is_leaf());
        assert_eq!(ids(&forest[1].children), vec![5]);
        assert!(forest.iter().flat_map(|t| t.iter()).all(|n| !n.selected));
    }

    #[test]
    fn given_strategies_when_building_then_outputs_are_identical() {
        let mut all = menu_fixture();
        all.push(MenuRecord::new(8, 3, "Rack"));
        all.insert(0, MenuRecord::new(9, 1, "Alarm"));
        all.push(MenuRecord::new(10, 42, "Orphan"));

        let indexed = builder(LookupStrategy::Index).build(&all, &[]).unwrap();
        let scanned = builder(LookupStrategy::Scan).build(&all, &[]).unwrap();
        assert_eq!(indexed, scanned);
        assert_eq!(ids(&indexed[0].children), vec![9, 3, 4]);
    }

    #[test]
    fn given_selection_when_building_then_only_selected_ids_are_flagged() {
        let all = menu_fixture();
        let selected = vec![all[2].clone()];
        let forest = generate_tree(&all, &selected).unwrap();

        let flagged: Vec<i64> = forest
            .iter()
            .flat_map(|t| t.selected_nodes())
            .map(|n| n.id)
            .collect();
        assert_eq!(flagged, vec![3]);
        let unselected = generate_tree(&all, &[]).unwrap();
        assert_eq!(forest.len(), unselected.len());
        assert_eq!(forest[0].node_count(), unselected[0].node_count());
    }

    #[test]
    fn given_selected_record_absent_from_all_when_building_then_ignores_it() {
        let all = menu_fixture();
        let selected = vec![MenuRecord::new(99, 1, "Ghost")];
        let forest = generate_tree(&all, &selected).unwrap();
        assert!(forest.iter().flat_map(|t| t.iter()).all(|n| !n.selected));
        assert!(forest.iter().all(|t| t.find(&99).is_none()));
    }

    #[test]
    fn given_empty_input_when_building_then_returns_empty_forest() {
        let all: Vec<MenuRecord> = Vec::new();
        assert!(generate_tree(&all, &[]).unwrap().is_empty());
    }

    #[test]
    fn given_no_roots_when_building_then_returns_empty_forest() {
        let all = vec![MenuRecord::new(3, 1, "a"), MenuRecord::new(4, 3, "b")];
        assert!(generate_tree(&all, &[]).unwrap().is_empty());
    }

    #[test]
    fn given_orphan_when_building_then_drops_it() {
        let mut all = menu_fixture();
        all.push(MenuRecord::new(20, 77, "Orphan"));
        all.push(MenuRecord::new(21, 20, "Orphan child"));
        let forest = generate_tree(&all, &[]).unwrap();
        let total: usize = forest.iter().map(TreeNode::node_count).sum();
        assert_eq!(total, 7);
    }

    #[test]
    fn given_rootless_cycle_when_building_then_drops_both_records() {
        let mut all = menu_fixture();
        all.push(MenuRecord::new(30, 31, "A"));
        all.push(MenuRecord::new(31, 30, "B"));
        let forest = generate_tree(&all, &[]).unwrap();
        assert!(forest.iter().all(|t| t.find(&30).is_none() && t.find(&31).is_none()));
    }

    #[test]
    fn given_self_referencing_root_when_building_then_it_is_not_its_own_child() {
        let all = vec![MenuRecord::new(5, 5, "Self"), MenuRecord::new(6, 5, "Kid")];
        let forest = generate_tree(&all, &[]).unwrap();
        assert_eq!(ids(&forest), vec![5]);
        assert_eq!(ids(&forest[0].children), vec![6]);
    }

    #[test]
    fn given_duplicate_parent_ids_when_preserving_then_duplicates_subtrees() {
        let all = vec![
            MenuRecord::new(1, 0, "Root"),
            MenuRecord::new(2, 1, "First copy"),
            MenuRecord::new(2, 1, "Second copy"),
            MenuRecord::new(3, 2, "Shared child"),
        ];
        let forest = generate_tree(&all, &[]).unwrap();
        let copies = &forest[0].children;
        assert_eq!(copies.len(), 2);
        assert_eq!(ids(&copies[0].children), vec![3]);
        assert_eq!(ids(&copies[1].children), vec![3]);
    }

    #[test]
    fn given_duplicate_ids_when_first_wins_then_keeps_first_record() {
        let all = vec![
            MenuRecord::new(1, 0, "Root"),
            MenuRecord::new(2, 1, "First copy"),
            MenuRecord::new(2, 1, "Second copy"),
            MenuRecord::new(3, 2, "Shared child"),
        ];
        let builder = TreeBuilder::new(BuildOptions {
            duplicates: DuplicatePolicy::FirstWins,
            ..BuildOptions::default()
        });
        let forest = builder.build(&all, &[]).unwrap();
        assert_eq!(forest[0].children.len(), 1);
        assert_eq!(forest[0].children[0].title, "First copy");
        assert_eq!(forest[0].node_count(), 3);
    }

    #[rstest]
    fn given_duplicate_ids_forming_loop_when_building_then_hits_depth_limit(
        #[values(LookupStrategy::Index, LookupStrategy::Scan)] strategy: LookupStrategy,
    ) {
        // 1 -> 2 -> (duplicate) 1 -> 2 -> ...
        let all = vec![
            MenuRecord::new(1, 0, "Root"),
            MenuRecord::new(2, 1, "Child"),
            MenuRecord::new(1, 2, "Root again"),
        ];
        let result = builder(strategy).build(&all, &[]);
        assert!(matches!(
            result,
            Err(DomainError::DepthLimitExceeded { limit: DEFAULT_MAX_DEPTH, .. })
        ));
    }

    #[rstest]
    #[case(3, true)]
    #[case(2, false)]
    fn given_max_depth_when_building_then_enforces_limit(
        #[case] max_depth: usize,
        #[case] ok: bool,
    ) {
        let all = vec![
            MenuRecord::new(1, 0, "a"),
            MenuRecord::new(2, 1, "b"),
            MenuRecord::new(3, 2, "c"),
        ];
        let builder = TreeBuilder::new(BuildOptions {
            max_depth,
            ..BuildOptions::default()
        });
        let result = builder.build(&all, &[]);
        assert_eq!(result.is_ok(), ok);
        if let Err(err) = result {
            assert_eq!(
                err,
                DomainError::DepthLimitExceeded {
                    id: "3".to_string(),
                    limit: 2
                }
            );
        }
    }

    #[test]
    fn given_unbounded_max_depth_when_building_deep_chain_then_fails_at_ceiling() {
        let chain: Vec<MenuRecord> = (1..=MAX_DEPTH_LIMIT as i64 + 500)
            .map(|id| MenuRecord::new(id, id - 1, format!("n{}", id)))
            .collect();
        let builder = TreeBuilder::new(BuildOptions {
            max_depth: usize::MAX,
            ..BuildOptions::default()
        });

        let err = builder.build(&chain, &[]).unwrap_err();

        assert_eq!(
            err,
            DomainError::DepthLimitExceeded {
                id: (MAX_DEPTH_LIMIT + 1).to_string(),
                limit: MAX_DEPTH_LIMIT
            }
        );
    }
}
