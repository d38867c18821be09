use std::collections::HashSet;
use std::fmt;
use std::hash::Hash;

use log::debug;

use crate::expansion::{ExpansionEvents, ExpansionModel};
use crate::settings::ControlSettings;
use crate::store::{ExpansionState, ExpansionStore};

type LevelFn<F> = Box<dyn Fn(&F) -> usize>;
type ExpandableFn<F> = Box<dyn Fn(&F) -> bool>;
type TrackByFn<F, K> = Box<dyn Fn(&F) -> K>;

/// Expansion control over a flat, level-annotated node list.
///
/// Nodes are identified through `track_by`, so expansion survives data
/// replacement as long as keys stay stable.
pub struct FlatTreeControl<F, K> {
    data_nodes: Vec<F>,
    expansion: ExpansionModel<K>,
    level: LevelFn<F>,
    expandable: ExpandableFn<F>,
    track_by: TrackByFn<F, K>,
    settings: ControlSettings,
}

impl<F, K> FlatTreeControl<F, K>
where
    K: Eq + Hash + Clone,
{
    pub fn new(
        level: impl Fn(&F) -> usize + 'static,
        expandable: impl Fn(&F) -> bool + 'static,
        track_by: impl Fn(&F) -> K + 'static,
    ) -> Self {
        Self {
            data_nodes: Vec::new(),
            expansion: ExpansionModel::new(),
            level: Box::new(level),
            expandable: Box::new(expandable),
            track_by: Box::new(track_by),
            settings: ControlSettings::default(),
        }
    }

    pub fn with_settings(mut self, settings: ControlSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn settings(&self) -> ControlSettings {
        self.settings
    }

    /// Flat nodes last pushed by the data source.
    pub fn data_nodes(&self) -> &[F] {
        &self.data_nodes
    }

    pub fn set_data_nodes(&mut self, nodes: Vec<F>) {
        self.data_nodes = nodes;
        if self.settings.prune_stale {
            self.prune_stale();
        }
    }

    pub fn expansion(&self) -> &ExpansionModel<K> {
        &self.expansion
    }

    pub fn is_expanded(&self, node: &F) -> bool {
        self.expansion.is_expanded(&(self.track_by)(node))
    }

    pub fn expand(&mut self, node: &F) {
        let key = (self.track_by)(node);
        self.expansion.select([key]);
    }

    pub fn collapse(&mut self, node: &F) {
        let key = (self.track_by)(node);
        self.expansion.deselect([key]);
    }

    pub fn toggle(&mut self, node: &F) {
        let key = (self.track_by)(node);
        self.expansion.toggle(key);
    }

    /// Expand every known data node, leaves included.
    pub fn expand_all(&mut self) {
        let keys: Vec<K> =
            self.data_nodes.iter().map(|node| (self.track_by)(node)).collect();
        self.expansion.select(keys);
    }

    pub fn collapse_all(&mut self) {
        self.expansion.clear();
    }

    /// Nodes following `node` in the data list with a deeper level.
    ///
    /// The node is located by key; an unknown node has no descendants.
    pub fn descendants(&self, node: &F) -> Vec<&F> {
        let key = (self.track_by)(node);
        let Some(start) = self
            .data_nodes
            .iter()
            .position(|candidate| (self.track_by)(candidate) == key)
        else {
            return Vec::new();
        };

        let level = (self.level)(&self.data_nodes[start]);
        self.data_nodes[start + 1..]
            .iter()
            .take_while(|candidate| (self.level)(*candidate) > level)
            .collect()
    }

    /// Expand `node` together with all of its descendants.
    pub fn expand_descendants(&mut self, node: &F) {
        let keys = self.subtree_keys(node);
        self.expansion.select(keys);
    }

    /// Collapse `node` together with all of its descendants.
    pub fn collapse_descendants(&mut self, node: &F) {
        let keys = self.subtree_keys(node);
        self.expansion.deselect(keys);
    }

    /// Collapse the subtree when `node` is expanded, expand it otherwise.
    pub fn toggle_descendants(&mut self, node: &F) {
        if self.is_expanded(node) {
            self.collapse_descendants(node);
        } else {
            self.expand_descendants(node);
        }
    }

    /// Whether `node` reports children through the configured accessor.
    pub fn is_expandable(&self, node: &F) -> bool {
        (self.expandable)(node)
    }

    pub fn subscribe(&mut self) -> ExpansionEvents<K> {
        self.expansion.subscribe()
    }

    fn subtree_keys(&self, node: &F) -> Vec<K> {
        let mut keys = vec![(self.track_by)(node)];
        keys.extend(
            self.descendants(node)
                .into_iter()
                .map(|descendant| (self.track_by)(descendant)),
        );
        keys
    }

    fn prune_stale(&mut self) {
        let known: HashSet<K> = self
            .data_nodes
            .iter()
            .map(|node| (self.track_by)(node))
            .collect();
        let before = self.expansion.len();
        if self.expansion.retain(|key| known.contains(key)) {
            debug!(
                "pruned {} stale expansion entries",
                before - self.expansion.len()
            );
        }
    }
}

impl<F, K> fmt::Debug for FlatTreeControl<F, K>
where
    K: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FlatTreeControl")
            .field("data_nodes", &self.data_nodes.len())
            .field("expansion", &self.expansion)
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl<F, K> ExpansionState<F> for FlatTreeControl<F, K>
where
    K: Eq + Hash + Clone,
{
    fn is_expanded(&self, node: &F) -> bool {
        FlatTreeControl::is_expanded(self, node)
    }
}

impl<F, K> ExpansionStore<F> for FlatTreeControl<F, K>
where
    K: Eq + Hash + Clone,
{
    type Key = K;

    fn set_data_nodes(&mut self, nodes: Vec<F>) {
        FlatTreeControl::set_data_nodes(self, nodes);
    }

    fn subscribe(&mut self) -> ExpansionEvents<K> {
        FlatTreeControl::subscribe(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Debug, PartialEq)]
    struct Row {
        name: &'static str,
        level: usize,
        expandable: bool,
    }

    fn row(name: &'static str, level: usize, expandable: bool) -> Row {
        Row {
            name,
            level,
            expandable,
        }
    }

    fn control() -> FlatTreeControl<Row, &'static str> {
        let mut control = FlatTreeControl::new(
            |row: &Row| row.level,
            |row: &Row| row.expandable,
            |row: &Row| row.name,
        );
        // a
        //   b
        //     c
        //   d
        // e
        control.set_data_nodes(vec![
            row("a", 0, true),
            row("b", 1, true),
            row("c", 2, false),
            row("d", 1, false),
            row("e", 0, false),
        ]);
        control
    }

    fn names(rows: &[&Row]) -> Vec<&'static str> {
        rows.iter().map(|row| row.name).collect()
    }

    #[test]
    fn descendants_stop_at_first_shallower_node() {
        let control = control();

        assert_eq!(
            names(&control.descendants(&row("a", 0, true))),
            vec!["b", "c", "d"]
        );
        assert_eq!(names(&control.descendants(&row("b", 1, true))), vec!["c"]);
        assert!(control.descendants(&row("e", 0, false)).is_empty());
        assert!(control.descendants(&row("zz", 0, true)).is_empty());
    }

    #[test]
    fn expand_collapse_and_toggle_follow_keys() {
        let mut control = control();
        let a = row("a", 0, true);

        control.expand(&a);
        assert!(control.is_expanded(&a));

        control.toggle(&a);
        assert!(!control.is_expanded(&a));

        control.toggle(&a);
        control.collapse(&a);
        assert!(!control.is_expanded(&a));
    }

    #[test]
    fn expand_all_marks_every_data_node() {
        let mut control = control();
        control.expand_all();
        assert_eq!(control.expansion().len(), 5);

        control.collapse_all();
        assert!(control.expansion().is_empty());
    }

    #[test]
    fn descendant_operations_cover_the_whole_subtree() {
        let mut control = control();
        let b = row("b", 1, true);
        let events = control.subscribe();

        control.toggle_descendants(&b);
        assert!(control.is_expanded(&b));
        assert!(control.is_expanded(&row("c", 2, false)));
        assert!(!control.is_expanded(&row("a", 0, true)));

        control.toggle_descendants(&b);
        assert!(control.expansion().is_empty());
        assert_eq!(events.drain(), 2);
    }

    #[test]
    fn stale_entries_survive_without_pruning() {
        let mut control = control();
        control.expand(&row("b", 1, true));

        control.set_data_nodes(vec![row("a", 0, true)]);

        assert!(control.expansion().is_expanded(&"b"));
    }

    #[test]
    fn stale_entries_are_pruned_when_enabled() {
        let mut control = control()
            .with_settings(ControlSettings::default().with_prune_stale(true));
        control.expand(&row("a", 0, true));
        control.expand(&row("b", 1, true));
        let events = control.subscribe();

        control.set_data_nodes(vec![row("a", 0, true)]);

        assert!(control.expansion().is_expanded(&"a"));
        assert!(!control.expansion().is_expanded(&"b"));
        let change = events.try_recv().expect("prune change");
        assert_eq!(change.removed, vec!["b"]);
    }

    #[test]
    fn store_trait_delegates_to_control() {
        fn push<S: ExpansionStore<Row>>(store: &mut S, nodes: Vec<Row>) {
            store.set_data_nodes(nodes);
        }

        let mut control = control();
        push(&mut control, vec![row("x", 0, false)]);
        assert_eq!(control.data_nodes().len(), 1);
        assert!(!control.is_expandable(&control.data_nodes()[0]));
    }
}
