use crate::expansion::ExpansionEvents;

/// Read side of an expansion store.
pub trait ExpansionState<F: ?Sized> {
    /// Whether the children of `node` should currently be shown.
    fn is_expanded(&self, node: &F) -> bool;
}

impl<F, C> ExpansionState<F> for C
where
    F: ?Sized,
    C: Fn(&F) -> bool,
{
    fn is_expanded(&self, node: &F) -> bool {
        self(node)
    }
}

/// Expansion store shared between a flat data source and the render surface.
///
/// The data source only reads expansion state, pushes the list of known flat
/// nodes after every flatten, and listens for changes. Mutating the
/// expansion state is left to the render surface.
pub trait ExpansionStore<F>: ExpansionState<F> {
    /// Key type carried by change notifications.
    type Key;

    /// Replace the registry of flat nodes the store knows about.
    fn set_data_nodes(&mut self, nodes: Vec<F>);

    /// Register a listener that fires whenever expansion state changes.
    fn subscribe(&mut self) -> ExpansionEvents<Self::Key>;
}
