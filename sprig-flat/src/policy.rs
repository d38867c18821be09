use std::fmt;

use crate::children::Children;

/// The four accessors a [`crate::TreeFlattener`] needs to walk a forest.
pub trait TreePolicy {
    /// Caller's nested node type.
    type Node;
    /// Caller's flat, level-annotated node type.
    type Flat;

    /// Build the flat representation of `node` at `level`.
    fn transform(&self, node: &Self::Node, level: usize) -> Self::Flat;
    /// Read the level back from a flat node.
    fn level(&self, flat: &Self::Flat) -> usize;
    /// Whether a flat node has children.
    fn is_expandable(&self, flat: &Self::Flat) -> bool;
    /// Children of a nested node, if any.
    fn children(&self, node: &Self::Node) -> Option<Children<Self::Node>>;
}

type TransformFn<T, F> = Box<dyn Fn(&T, usize) -> F>;
type LevelFn<F> = Box<dyn Fn(&F) -> usize>;
type ExpandableFn<F> = Box<dyn Fn(&F) -> bool>;
type ChildrenFn<T> = Box<dyn Fn(&T) -> Option<Children<T>>>;

/// [`TreePolicy`] assembled from four closures.
pub struct FnPolicy<T, F> {
    transform: TransformFn<T, F>,
    level: LevelFn<F>,
    expandable: ExpandableFn<F>,
    children: ChildrenFn<T>,
}

impl<T, F> FnPolicy<T, F> {
    pub fn new(
        transform: impl Fn(&T, usize) -> F + 'static,
        level: impl Fn(&F) -> usize + 'static,
        expandable: impl Fn(&F) -> bool + 'static,
        children: impl Fn(&T) -> Option<Children<T>> + 'static,
    ) -> Self {
        Self {
            transform: Box::new(transform),
            level: Box::new(level),
            expandable: Box::new(expandable),
            children: Box::new(children),
        }
    }
}

impl<T, F> fmt::Debug for FnPolicy<T, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnPolicy").finish_non_exhaustive()
    }
}

impl<T, F> TreePolicy for FnPolicy<T, F> {
    type Node = T;
    type Flat = F;

    fn transform(&self, node: &T, level: usize) -> F {
        (self.transform)(node, level)
    }

    fn level(&self, flat: &F) -> usize {
        (self.level)(flat)
    }

    fn is_expandable(&self, flat: &F) -> bool {
        (self.expandable)(flat)
    }

    fn children(&self, node: &T) -> Option<Children<T>> {
        (self.children)(node)
    }
}
