use std::cell::RefCell;
use std::rc::Rc;

use flume::{Receiver, Sender, TrySendError};
use log::{debug, trace, warn};

use sprig_control::{ExpansionEvents, ExpansionStore};

use crate::flattener::TreeFlattener;
use crate::policy::TreePolicy;
use crate::view::ViewChanges;
use crate::{FlatTreeError, Result};

/// Stream of visible node lists handed out by
/// [`FlatTreeDataSource::connect`].
#[derive(Debug)]
pub struct VisibleNodes<F> {
    receiver: Receiver<Vec<F>>,
}

impl<F> VisibleNodes<F> {
    /// Non-blocking receive of the oldest queued list.
    pub fn try_recv(&self) -> Option<Vec<F>> {
        self.receiver.try_recv().ok()
    }

    /// Async receive; `None` once the data source disconnected and the queue
    /// is empty.
    pub async fn recv_async(&self) -> Option<Vec<F>> {
        self.receiver.recv_async().await.ok()
    }

    /// Drop every queued list except the newest one and return it.
    pub fn drain_latest(&self) -> Option<Vec<F>> {
        self.receiver.drain().last()
    }

    /// Whether the data source released this stream.
    pub fn is_disconnected(&self) -> bool {
        self.receiver.is_disconnected()
    }
}

struct Connection<F, K> {
    viewers: Vec<ViewChanges>,
    expansion: ExpansionEvents<K>,
    subscribers: Vec<Sender<Vec<F>>>,
    backlog: usize,
}

impl<F: Clone, K> Connection<F, K> {
    /// Move queued view and expansion events into the backlog and return
    /// its new size.
    fn collect_triggers(&mut self) -> usize {
        let views: usize = self.viewers.iter().map(ViewChanges::drain).sum();
        self.backlog += views + self.expansion.drain();
        self.backlog
    }

    fn publish(&mut self, visible: &[F]) {
        self.subscribers.retain(|sender| {
            match sender.try_send(visible.to_vec()) {
                Ok(()) => true,
                Err(TrySendError::Full(_)) => {
                    warn!("visible subscriber is full, emission dropped");
                    true
                },
                Err(TrySendError::Disconnected(_)) => {
                    debug!("visible subscriber dropped");
                    false
                },
            }
        });
    }
}

/// Flat tree data source: owns the nested forest, keeps the flattened and
/// visible lists in sync, and publishes the visible list to subscribers.
///
/// The expansion store is shared with the render surface through
/// `Rc<RefCell<_>>`; the data source only reads expansion state and pushes
/// the flattened list into the store's registry.
pub struct FlatTreeDataSource<P, S>
where
    P: TreePolicy,
    S: ExpansionStore<P::Flat>,
{
    flattener: Rc<TreeFlattener<P>>,
    store: Rc<RefCell<S>>,
    data: Vec<P::Node>,
    flattened: Vec<P::Flat>,
    visible: Vec<P::Flat>,
    generation: u64,
    connection: Option<Connection<P::Flat, S::Key>>,
}

impl<P, S> FlatTreeDataSource<P, S>
where
    P: TreePolicy,
    P::Flat: Clone,
    S: ExpansionStore<P::Flat>,
{
    /// Create an empty data source.
    pub fn new(
        flattener: Rc<TreeFlattener<P>>,
        store: Rc<RefCell<S>>,
    ) -> Self {
        Self {
            flattener,
            store,
            data: Vec::new(),
            flattened: Vec::new(),
            visible: Vec::new(),
            generation: 0,
            connection: None,
        }
    }

    /// Create a data source with both derived lists computed for `data`.
    pub fn with_data(
        flattener: Rc<TreeFlattener<P>>,
        store: Rc<RefCell<S>>,
        data: Vec<P::Node>,
    ) -> Result<Self> {
        let mut source = Self::new(flattener, store);
        source.set_data(data)?;
        source.recompute()?;
        Ok(source)
    }

    pub fn data(&self) -> &[P::Node] {
        &self.data
    }

    /// Full flattened list of the current data.
    pub fn flattened(&self) -> &[P::Flat] {
        &self.flattened
    }

    /// Visible subset as of the last recomputation.
    pub fn visible(&self) -> &[P::Flat] {
        &self.visible
    }

    /// Number of data replacements so far.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_connected(&self) -> bool {
        self.connection.is_some()
    }

    pub fn store(&self) -> &Rc<RefCell<S>> {
        &self.store
    }

    pub fn flattener(&self) -> &Rc<TreeFlattener<P>> {
        &self.flattener
    }

    /// Replace the nested data and flatten it synchronously.
    ///
    /// Pending child sources that have not emitted yet are left out; use
    /// [`Self::load`] to wait for them. On a connected source the new
    /// flattened list triggers a visible-list emission.
    pub fn set_data(&mut self, data: Vec<P::Node>) -> Result<()> {
        let flattened = self.flattener.flatten_nodes(&data)?;
        self.install(flattened)?;
        self.generation += 1;
        self.data = data;
        self.refresh_connected()
    }

    /// Replace the nested data and return a load that flattens it
    /// asynchronously.
    ///
    /// The flattened list stays unchanged until the resolved load is passed
    /// to [`Self::apply`]. Any later `set_data` or `load` makes this one
    /// stale.
    pub fn load(&mut self, data: Vec<P::Node>) -> PendingLoad<P>
    where
        P::Node: Clone,
    {
        self.generation += 1;
        self.data = data;
        PendingLoad {
            generation: self.generation,
            flattener: Rc::clone(&self.flattener),
            data: self.data.clone(),
        }
    }

    /// Install the result of a resolved [`PendingLoad`].
    pub fn apply(&mut self, loaded: LoadedNodes<P::Flat>) -> Result<()> {
        if loaded.generation != self.generation {
            debug!(
                "rejecting stale load: loaded={} current={}",
                loaded.generation, self.generation
            );
            return Err(FlatTreeError::StaleLoad {
                loaded: loaded.generation,
                current: self.generation,
            });
        }
        self.install(loaded.nodes)?;
        self.refresh_connected()
    }

    /// Subscribe to visible-list updates.
    ///
    /// The returned stream receives the current visible list right away and
    /// then one list per processed trigger: a view change on `viewer`, an
    /// expansion change in the store, or a replaced flattened list.
    pub fn connect(
        &mut self,
        viewer: ViewChanges,
    ) -> Result<VisibleNodes<P::Flat>> {
        let capacity = self.flattener.settings().visible_capacity;
        let (sender, receiver) = match capacity {
            Some(capacity) => flume::bounded(capacity.max(1)),
            None => flume::unbounded(),
        };

        match self.connection.as_mut() {
            Some(connection) => {
                connection.viewers.push(viewer);
            },
            None => {
                let expansion = self
                    .store
                    .try_borrow_mut()
                    .map_err(|_| FlatTreeError::StoreBorrowed)?
                    .subscribe();
                self.connection = Some(Connection {
                    viewers: vec![viewer],
                    expansion,
                    subscribers: Vec::new(),
                    backlog: 0,
                });
                debug!("data source connected");
            },
        }

        self.recompute()?;
        sender.try_send(self.visible.clone()).ok();
        if let Some(connection) = self.connection.as_mut() {
            connection.subscribers.push(sender);
        }

        Ok(VisibleNodes { receiver })
    }

    /// Drain pending view and expansion changes, recomputing and publishing
    /// the visible list once per change. Returns the number of
    /// recomputations.
    ///
    /// Changes left unprocessed by an error stay queued for the next call.
    pub fn process_changes(&mut self) -> Result<usize> {
        let triggers = match self.connection.as_mut() {
            Some(connection) => connection.collect_triggers(),
            None => return Ok(0),
        };

        for _ in 0..triggers {
            self.refresh()?;
            if let Some(connection) = self.connection.as_mut() {
                connection.backlog -= 1;
            }
        }
        if triggers > 0 {
            trace!("processed {triggers} change triggers");
        }
        Ok(triggers)
    }

    /// Release the store subscription, view signals and subscriber streams.
    /// Cached lists are kept.
    pub fn disconnect(&mut self) {
        if self.connection.take().is_some() {
            debug!("data source disconnected");
        }
    }

    fn install(&mut self, flattened: Vec<P::Flat>) -> Result<()> {
        self.store
            .try_borrow_mut()
            .map_err(|_| FlatTreeError::StoreBorrowed)?
            .set_data_nodes(flattened.clone());
        self.flattened = flattened;
        Ok(())
    }

    fn refresh_connected(&mut self) -> Result<()> {
        if self.connection.is_some() {
            self.refresh()?;
        }
        Ok(())
    }

    fn recompute(&mut self) -> Result<()> {
        let store = self
            .store
            .try_borrow()
            .map_err(|_| FlatTreeError::StoreBorrowed)?;
        self.visible = self
            .flattener
            .expand_flattened_nodes(&self.flattened, &*store);
        Ok(())
    }

    fn refresh(&mut self) -> Result<()> {
        self.recompute()?;
        if let Some(connection) = self.connection.as_mut() {
            connection.publish(&self.visible);
        }
        Ok(())
    }
}

/// Asynchronous flatten started by [`FlatTreeDataSource::load`].
pub struct PendingLoad<P: TreePolicy> {
    generation: u64,
    flattener: Rc<TreeFlattener<P>>,
    data: Vec<P::Node>,
}

impl<P: TreePolicy> PendingLoad<P> {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Flatten the captured data, waiting on every pending child source.
    pub async fn resolve(self) -> Result<LoadedNodes<P::Flat>> {
        let nodes = self.flattener.flatten_nodes_async(&self.data).await?;
        Ok(LoadedNodes {
            generation: self.generation,
            nodes,
        })
    }
}

/// Flattened list produced by [`PendingLoad::resolve`], tagged with the
/// generation it was started for.
#[derive(Clone, Debug)]
pub struct LoadedNodes<F> {
    generation: u64,
    nodes: Vec<F>,
}

impl<F> LoadedNodes<F> {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn nodes(&self) -> &[F] {
        &self.nodes
    }
}
