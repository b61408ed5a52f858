//! Forest view over a flat heading list.
//!
//! The tree is an arena: headings live in a `Vec` in order-index order and
//! structure is kept as index lists. It is rebuilt from the flat list
//! whenever it is needed and never persisted.

use std::collections::HashMap;

use super::models::{HeadingId, HeadingNode};

/// How headings without a usable explicit parent are placed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParentPolicy {
    /// Only explicit `parent_id` links create structure; everything else
    /// becomes a root.
    #[default]
    Explicit,
    /// Headings that declare no parent attach to the nearest preceding
    /// heading with a smaller level.
    InferFromLevel,
}

#[derive(Debug, Clone, Default)]
pub struct DocumentTree {
    nodes: Vec<HeadingNode>,
    parents: Vec<Option<usize>>,
    children: Vec<Vec<usize>>,
    roots: Vec<usize>,
    index: HashMap<HeadingId, usize>,
}

impl DocumentTree {
    /// Build with [`ParentPolicy::Explicit`]
    pub fn build(headings: &[HeadingNode]) -> Self {
        Self::build_with(headings, ParentPolicy::Explicit)
    }

    /// Build a forest from a flat list.
    ///
    /// Headings are processed in order-index order. A heading whose declared
    /// parent has already been placed becomes that parent's child; a heading
    /// whose declared parent comes later or does not exist becomes a root.
    pub fn build_with(headings: &[HeadingNode], policy: ParentPolicy) -> Self {
        let mut nodes = headings.to_vec();
        nodes.sort_by_key(|h| h.order_index);

        let count = nodes.len();
        let mut parents = vec![None; count];
        let mut children = vec![Vec::new(); count];
        let mut roots = Vec::new();
        let mut index: HashMap<HeadingId, usize> = HashMap::with_capacity(count);

        // Monotonic stack of open headings for level inference
        let mut open: Vec<usize> = Vec::new();

        for (idx, node) in nodes.iter().enumerate() {
            while open.last().is_some_and(|&top| nodes[top].level >= node.level) {
                open.pop();
            }

            let parent = match node.parent_id {
                Some(pid) => index.get(&pid).copied(),
                None => match policy {
                    ParentPolicy::Explicit => None,
                    ParentPolicy::InferFromLevel => open.last().copied(),
                },
            };

            match parent {
                Some(p) => {
                    parents[idx] = Some(p);
                    children[p].push(idx);
                }
                None => roots.push(idx),
            }

            open.push(idx);
            index.entry(node.id).or_insert(idx);
        }

        Self {
            nodes,
            parents,
            children,
            roots,
            index,
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn roots(&self) -> &[usize] {
        &self.roots
    }

    pub fn node(&self, idx: usize) -> &HeadingNode {
        &self.nodes[idx]
    }

    pub fn children(&self, idx: usize) -> &[usize] {
        &self.children[idx]
    }

    pub fn parent(&self, idx: usize) -> Option<usize> {
        self.parents[idx]
    }

    pub fn index_of(&self, id: HeadingId) -> Option<usize> {
        self.index.get(&id).copied()
    }

    pub fn get(&self, id: HeadingId) -> Option<&HeadingNode> {
        self.index_of(id).map(|idx| &self.nodes[idx])
    }

    /// Number of edges between the node and its root
    pub fn depth(&self, idx: usize) -> usize {
        let mut depth = 0;
        let mut cursor = self.parents[idx];
        while let Some(p) = cursor {
            depth += 1;
            cursor = self.parents[p];
        }
        depth
    }

    /// Ancestors from the root down to the node's parent
    pub fn ancestors(&self, idx: usize) -> Vec<usize> {
        let mut path = Vec::new();
        let mut cursor = self.parents[idx];
        while let Some(p) = cursor {
            path.push(p);
            cursor = self.parents[p];
        }
        path.reverse();
        path
    }

    /// Node indices in pre-order, roots in forest order
    pub fn preorder(&self) -> Vec<usize> {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut stack: Vec<usize> = self.roots.iter().rev().copied().collect();

        while let Some(idx) = stack.pop() {
            order.push(idx);
            stack.extend(self.children[idx].iter().rev());
        }

        order
    }

    /// Pre-order `(id, level)` pairs
    pub fn flatten(&self) -> Vec<(HeadingId, u32)> {
        self.preorder()
            .into_iter()
            .map(|idx| (self.nodes[idx].id, self.nodes[idx].level))
            .collect()
    }

    /// Back to the persisted form: pre-order, parent links taken from the
    /// tree, order indices contiguous from 1.
    pub fn to_flat_list(&self) -> Vec<HeadingNode> {
        self.preorder()
            .into_iter()
            .enumerate()
            .map(|(position, idx)| {
                let mut node = self.nodes[idx].clone();
                node.parent_id = self.parents[idx].map(|p| self.nodes[p].id);
                node.order_index = position as u32 + 1;
                node
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn h(id: HeadingId, level: u32, order: u32) -> HeadingNode {
        HeadingNode::new(id, level, format!("Heading {}", id), order)
    }

    fn root_ids(tree: &DocumentTree) -> Vec<HeadingId> {
        tree.roots().iter().map(|&i| tree.node(i).id).collect()
    }

    fn child_ids(tree: &DocumentTree, id: HeadingId) -> Vec<HeadingId> {
        let idx = tree.index_of(id).unwrap();
        tree.children(idx).iter().map(|&i| tree.node(i).id).collect()
    }

    #[test]
    fn test_build_explicit_parents() {
        let list = vec![
            h(1, 1, 1),
            h(2, 2, 2).with_parent(1),
            h(3, 3, 3).with_parent(2),
            h(4, 2, 4).with_parent(1),
            h(5, 1, 5),
        ];
        let tree = DocumentTree::build(&list);

        assert_eq!(root_ids(&tree), vec![1, 5]);
        assert_eq!(child_ids(&tree, 1), vec![2, 4]);
        assert_eq!(child_ids(&tree, 2), vec![3]);
        assert_eq!(tree.depth(tree.index_of(3).unwrap()), 2);
    }

    #[test]
    fn test_build_forward_or_missing_parent_becomes_root() {
        let list = vec![
            h(1, 2, 1).with_parent(2), // parent appears later
            h(2, 1, 2),
            h(3, 2, 3).with_parent(99), // parent missing
        ];
        let tree = DocumentTree::build(&list);

        assert_eq!(root_ids(&tree), vec![1, 2, 3]);
        assert!(child_ids(&tree, 2).is_empty());
    }

    #[test]
    fn test_build_explicit_policy_ignores_levels() {
        let list = vec![h(1, 1, 1), h(2, 2, 2), h(3, 2, 3)];
        let tree = DocumentTree::build(&list);
        assert_eq!(root_ids(&tree), vec![1, 2, 3]);
    }

    #[test]
    fn test_build_infers_parents_from_levels() {
        let list = vec![h(1, 1, 1), h(2, 2, 2), h(3, 3, 3), h(4, 2, 4), h(5, 1, 5), h(6, 3, 6)];
        let tree = DocumentTree::build_with(&list, ParentPolicy::InferFromLevel);

        assert_eq!(root_ids(&tree), vec![1, 5]);
        assert_eq!(child_ids(&tree, 1), vec![2, 4]);
        assert_eq!(child_ids(&tree, 2), vec![3]);
        // skipped level attaches to the nearest shallower heading
        assert_eq!(child_ids(&tree, 5), vec![6]);
    }

    #[test]
    fn test_build_sorts_by_order_index() {
        let list = vec![h(3, 2, 3), h(1, 1, 1), h(2, 2, 2)];
        let tree = DocumentTree::build_with(&list, ParentPolicy::InferFromLevel);
        assert_eq!(child_ids(&tree, 1), vec![2, 3]);
    }

    #[test]
    fn test_flatten_reproduces_order() {
        let list = vec![h(1, 1, 1), h(2, 2, 2), h(3, 3, 3), h(4, 2, 4), h(5, 1, 5)];

        for policy in [ParentPolicy::Explicit, ParentPolicy::InferFromLevel] {
            let tree = DocumentTree::build_with(&list, policy);
            let flat = tree.flatten();
            let expected: Vec<(HeadingId, u32)> = list.iter().map(|n| (n.id, n.level)).collect();
            assert_eq!(flat, expected);
        }
    }

    #[test]
    fn test_to_flat_list_records_inferred_parents() {
        let list = vec![h(1, 1, 10), h(2, 2, 20), h(3, 1, 30)];
        let tree = DocumentTree::build_with(&list, ParentPolicy::InferFromLevel);
        let flat = tree.to_flat_list();

        assert_eq!(flat[1].parent_id, Some(1));
        assert_eq!(flat[2].parent_id, None);
        let order: Vec<u32> = flat.iter().map(|n| n.order_index).collect();
        assert_eq!(order, vec![1, 2, 3]);

        // rebuilding from the explicit links gives the same shape
        let rebuilt = DocumentTree::build(&flat);
        assert_eq!(rebuilt.flatten(), tree.flatten());
    }

    #[test]
    fn test_ancestors_root_first() {
        let list = vec![h(1, 1, 1), h(2, 2, 2), h(3, 3, 3)];
        let tree = DocumentTree::build_with(&list, ParentPolicy::InferFromLevel);
        let path: Vec<HeadingId> = tree
            .ancestors(tree.index_of(3).unwrap())
            .into_iter()
            .map(|i| tree.node(i).id)
            .collect();
        assert_eq!(path, vec![1, 2]);
    }

    #[test]
    fn test_empty_tree() {
        let tree = DocumentTree::build(&[]);
        assert!(tree.is_empty());
        assert!(tree.flatten().is_empty());
    }
}
