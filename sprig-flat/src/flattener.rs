use log::{debug, trace};

use sprig_control::ExpansionState;

use crate::children::Children;
use crate::policy::TreePolicy;
use crate::settings::FlattenSettings;
use crate::{FlatTreeError, Result};

/// Converts a nested forest into a flat pre-order list and derives the
/// visible subset of that list from expansion state.
///
/// The flattener keeps no state between calls; it only carries the policy
/// and its settings.
#[derive(Debug)]
pub struct TreeFlattener<P> {
    policy: P,
    settings: FlattenSettings,
}

impl<P: TreePolicy> TreeFlattener<P> {
    pub fn new(policy: P) -> Self {
        Self::with_settings(policy, FlattenSettings::default())
    }

    pub fn with_settings(policy: P, settings: FlattenSettings) -> Self {
        Self { policy, settings }
    }

    pub fn policy(&self) -> &P {
        &self.policy
    }

    pub fn settings(&self) -> FlattenSettings {
        self.settings
    }

    /// Flatten `roots` depth-first.
    ///
    /// Each node is emitted before its children, and children are only
    /// fetched for expandable flat nodes. A pending child source contributes
    /// its children only when they were already emitted; otherwise the branch
    /// is left out. The returned list is never touched again.
    pub fn flatten_nodes(&self, roots: &[P::Node]) -> Result<Vec<P::Flat>> {
        let mut nodes = Vec::new();
        let mut walk = Walk::new(roots);

        while let Some((entry, level)) = walk.pop() {
            let Some(children) =
                self.push_node(entry.node(), level, &mut nodes)?
            else {
                continue;
            };

            let children = match children {
                Children::Ready(children) => children,
                Children::Pending(source) => match source.try_take() {
                    Some(children) => children,
                    None => {
                        debug!("child source at level {level} not ready");
                        continue;
                    },
                },
            };
            walk.push_children(children, level + 1);
        }

        trace!("flattened {} roots into {} nodes", roots.len(), nodes.len());
        Ok(nodes)
    }

    /// Flatten `roots` depth-first, waiting on every pending child source.
    ///
    /// Resolves only after all branches settled, so the result keeps strict
    /// pre-order. A source whose sink was dropped without emitting
    /// contributes nothing; a source that never emits keeps the future
    /// pending.
    pub async fn flatten_nodes_async(
        &self,
        roots: &[P::Node],
    ) -> Result<Vec<P::Flat>> {
        let mut nodes = Vec::new();
        let mut walk = Walk::new(roots);

        while let Some((entry, level)) = walk.pop() {
            let Some(children) =
                self.push_node(entry.node(), level, &mut nodes)?
            else {
                continue;
            };

            let children = match children {
                Children::Ready(children) => children,
                Children::Pending(source) => match source.take().await {
                    Some(children) => children,
                    None => {
                        debug!("child source at level {level} closed empty");
                        continue;
                    },
                },
            };
            walk.push_children(children, level + 1);
        }

        trace!("flattened {} roots into {} nodes", roots.len(), nodes.len());
        Ok(nodes)
    }

    /// Select the nodes of a flattened list whose ancestors are all
    /// expanded.
    ///
    /// `nodes` must be in the order produced by [`Self::flatten_nodes`].
    /// Visibility is tracked with one flag per level in a single pass: a
    /// node is kept when the flags of levels `0..=level` are all set, and an
    /// expandable node writes its own expansion into the flag of
    /// `level + 1`. Unset flags read as collapsed.
    pub fn expand_flattened_nodes<S>(
        &self,
        nodes: &[P::Flat],
        state: &S,
    ) -> Vec<P::Flat>
    where
        P::Flat: Clone,
        S: ExpansionState<P::Flat> + ?Sized,
    {
        let mut visible = Vec::new();
        let mut current_expand = vec![true];

        for node in nodes {
            let level = self.policy.level(node);
            let shown = (0..=level).all(|index| {
                current_expand.get(index).copied().unwrap_or(false)
            });
            if shown {
                visible.push(node.clone());
            }

            // Filling every slot below `slot` takes one writer per slot, so a
            // slot past the list length can never be read as shown.
            let slot = match level.checked_add(1) {
                Some(slot) if slot <= nodes.len() => slot,
                _ => continue,
            };
            if self.policy.is_expandable(node) {
                if current_expand.len() <= slot {
                    current_expand.resize(slot + 1, false);
                }
                current_expand[slot] = state.is_expanded(node);
            }
        }

        visible
    }

    fn push_node(
        &self,
        node: &P::Node,
        level: usize,
        nodes: &mut Vec<P::Flat>,
    ) -> Result<Option<Children<P::Node>>> {
        if let Some(limit) = self.settings.max_depth {
            if level > limit {
                return Err(FlatTreeError::DepthLimitExceeded { level, limit });
            }
        }

        let flat = self.policy.transform(node, level);
        let expandable = self.policy.is_expandable(&flat);
        nodes.push(flat);

        if expandable {
            Ok(self.policy.children(node))
        } else {
            Ok(None)
        }
    }
}

enum Entry<'a, T> {
    Root(&'a T),
    Child(T),
}

impl<T> Entry<'_, T> {
    fn node(&self) -> &T {
        match self {
            Entry::Root(node) => *node,
            Entry::Child(node) => node,
        }
    }
}

/// Explicit depth-first work stack; deep trees do not grow the call stack.
struct Walk<'a, T> {
    stack: Vec<(Entry<'a, T>, usize)>,
}

impl<'a, T> Walk<'a, T> {
    fn new(roots: &'a [T]) -> Self {
        Self {
            stack: roots
                .iter()
                .rev()
                .map(|root| (Entry::Root(root), 0))
                .collect(),
        }
    }

    fn pop(&mut self) -> Option<(Entry<'a, T>, usize)> {
        self.stack.pop()
    }

    fn push_children(&mut self, children: Vec<T>, level: usize) {
        self.stack.extend(
            children
                .into_iter()
                .rev()
                .map(|child| (Entry::Child(child), level)),
        );
    }
}
