use flume::{Receiver, Sender};

use crate::{FlatTreeError, Result};

/// Window of rows the render surface currently shows.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ViewRange {
    pub start: usize,
    pub end: usize,
}

impl ViewRange {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }
}

/// Create the signal a render surface uses to report view changes.
pub fn view_channel() -> (ViewNotifier, ViewChanges) {
    let (sender, receiver) = flume::unbounded();
    (ViewNotifier { sender }, ViewChanges { receiver })
}

/// Cloneable handle the render surface keeps to report view changes.
#[derive(Clone, Debug)]
pub struct ViewNotifier {
    sender: Sender<ViewRange>,
}

impl ViewNotifier {
    pub fn notify(&self, range: ViewRange) -> Result<()> {
        self.sender.send(range).map_err(|_| FlatTreeError::ViewClosed)
    }
}

/// Receiving side of the view-change signal, handed to
/// [`crate::FlatTreeDataSource::connect`].
#[derive(Debug)]
pub struct ViewChanges {
    receiver: Receiver<ViewRange>,
}

impl ViewChanges {
    /// Take the oldest queued range, if any.
    pub fn try_recv(&self) -> Option<ViewRange> {
        self.receiver.try_recv().ok()
    }

    /// Discard every queued change and return how many there were.
    pub fn drain(&self) -> usize {
        self.receiver.drain().count()
    }
}
