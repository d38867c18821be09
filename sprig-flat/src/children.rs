use flume::{Receiver, Sender};

use crate::{FlatTreeError, Result};

/// Children of a nested node as returned by [`crate::TreePolicy::children`].
#[derive(Debug)]
pub enum Children<T> {
    /// Ordered list available right away.
    Ready(Vec<T>),
    /// Single-shot source that yields the list later.
    Pending(ChildSource<T>),
}

impl<T> From<Vec<T>> for Children<T> {
    fn from(children: Vec<T>) -> Self {
        Children::Ready(children)
    }
}

impl<T> From<ChildSource<T>> for Children<T> {
    fn from(source: ChildSource<T>) -> Self {
        Children::Pending(source)
    }
}

/// Create a connected sink/source pair for children produced later.
pub fn child_source<T>() -> (ChildSink<T>, ChildSource<T>) {
    let (sender, receiver) = flume::bounded(1);
    (ChildSink { sender }, ChildSource { receiver })
}

/// Producing half of a single-shot child source.
#[derive(Debug)]
pub struct ChildSink<T> {
    sender: Sender<Vec<T>>,
}

impl<T> ChildSink<T> {
    /// Deliver the children. The sink is consumed, so at most one list is
    /// ever emitted.
    pub fn emit(self, children: Vec<T>) -> Result<()> {
        self.sender
            .try_send(children)
            .map_err(|_| FlatTreeError::ChildSourceDropped)
    }
}

/// Consuming half of a single-shot child source.
///
/// Only the first emission is ever read; the source is discarded afterwards.
#[derive(Debug)]
pub struct ChildSource<T> {
    receiver: Receiver<Vec<T>>,
}

impl<T> ChildSource<T> {
    /// A source whose children are already emitted.
    pub fn ready(children: Vec<T>) -> Self {
        let (sink, source) = child_source();
        sink.emit(children).ok();
        source
    }

    /// Take the emission if it already happened.
    pub fn try_take(self) -> Option<Vec<T>> {
        self.receiver.try_recv().ok()
    }

    /// Wait for the emission. `None` when the sink was dropped without
    /// emitting.
    pub async fn take(self) -> Option<Vec<T>> {
        self.receiver.recv_async().await.ok()
    }
}
