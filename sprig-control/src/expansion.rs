use std::collections::HashSet;
use std::hash::Hash;

use flume::{Receiver, Sender};
use log::trace;

/// Keys that entered or left the expanded set in a single mutation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExpansionChange<K> {
    pub added: Vec<K>,
    pub removed: Vec<K>,
}

impl<K> ExpansionChange<K> {
    fn new() -> Self {
        Self {
            added: Vec::new(),
            removed: Vec::new(),
        }
    }

    /// Whether the mutation left the expanded set untouched.
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

/// Receiver for [`ExpansionChange`] notifications with sync + async helpers.
#[derive(Debug)]
pub struct ExpansionEvents<K> {
    receiver: Receiver<ExpansionChange<K>>,
}

impl<K> ExpansionEvents<K> {
    pub(crate) fn new(receiver: Receiver<ExpansionChange<K>>) -> Self {
        Self { receiver }
    }

    /// Non-blocking receive; `None` when nothing is queued or the model is
    /// gone.
    pub fn try_recv(&self) -> Option<ExpansionChange<K>> {
        self.receiver.try_recv().ok()
    }

    /// Async receive; `None` once the model was dropped and the queue is
    /// empty.
    pub async fn recv_async(&self) -> Option<ExpansionChange<K>> {
        self.receiver.recv_async().await.ok()
    }

    /// Discard every queued change and return how many there were.
    pub fn drain(&self) -> usize {
        self.receiver.drain().count()
    }
}

/// Set of expanded node keys.
///
/// Every call that actually changes the set sends exactly one
/// [`ExpansionChange`] to each live subscriber. Calls that change nothing
/// stay silent.
#[derive(Debug)]
pub struct ExpansionModel<K> {
    expanded: HashSet<K>,
    subscribers: Vec<Sender<ExpansionChange<K>>>,
}

impl<K> Default for ExpansionModel<K> {
    fn default() -> Self {
        Self {
            expanded: HashSet::new(),
            subscribers: Vec::new(),
        }
    }
}

impl<K> ExpansionModel<K>
where
    K: Eq + Hash + Clone,
{
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_expanded(&self, key: &K) -> bool {
        self.expanded.contains(key)
    }

    pub fn len(&self) -> usize {
        self.expanded.len()
    }

    pub fn is_empty(&self) -> bool {
        self.expanded.is_empty()
    }

    /// Iterate over expanded keys in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = &K> {
        self.expanded.iter()
    }

    /// Mark keys as expanded. Returns `true` when at least one key was new.
    pub fn select(&mut self, keys: impl IntoIterator<Item = K>) -> bool {
        let mut change = ExpansionChange::new();
        for key in keys {
            if self.expanded.insert(key.clone()) {
                change.added.push(key);
            }
        }
        self.emit(change)
    }

    /// Mark keys as collapsed. Returns `true` when at least one key was
    /// expanded before.
    pub fn deselect(&mut self, keys: impl IntoIterator<Item = K>) -> bool {
        let mut change = ExpansionChange::new();
        for key in keys {
            if self.expanded.remove(&key) {
                change.removed.push(key);
            }
        }
        self.emit(change)
    }

    /// Flip a single key and return its new state.
    pub fn toggle(&mut self, key: K) -> bool {
        if self.expanded.contains(&key) {
            self.deselect([key]);
            false
        } else {
            self.select([key]);
            true
        }
    }

    /// Collapse everything.
    pub fn clear(&mut self) -> bool {
        let change = ExpansionChange {
            added: Vec::new(),
            removed: self.expanded.drain().collect(),
        };
        self.emit(change)
    }

    /// Keep only keys matching `keep`; the rest are reported as removed.
    pub fn retain(&mut self, mut keep: impl FnMut(&K) -> bool) -> bool {
        let mut change = ExpansionChange::new();
        self.expanded.retain(|key| {
            let kept = keep(key);
            if !kept {
                change.removed.push(key.clone());
            }
            kept
        });
        self.emit(change)
    }

    /// Register a new change listener.
    pub fn subscribe(&mut self) -> ExpansionEvents<K> {
        let (sender, receiver) = flume::unbounded();
        self.subscribers.push(sender);
        ExpansionEvents::new(receiver)
    }

    fn emit(&mut self, change: ExpansionChange<K>) -> bool {
        if change.is_empty() {
            return false;
        }

        trace!(
            "expansion changed: added={} removed={}",
            change.added.len(),
            change.removed.len()
        );
        // Listeners whose receiver is gone are dropped here.
        self.subscribers
            .retain(|sender| sender.send(change.clone()).is_ok());
        true
    }
}
