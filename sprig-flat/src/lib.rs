//! Tree flattening engine for linear and virtualized tree rendering.
//!
//! The crate turns a nested forest into a flat, level-annotated list and
//! derives the currently visible part of that list from expansion state:
//! - [`TreeFlattener`] does the pure work. [`TreeFlattener::flatten_nodes`]
//!   walks the forest in pre-order and
//!   [`TreeFlattener::expand_flattened_nodes`] keeps the nodes whose
//!   ancestors are all expanded.
//! - [`FlatTreeDataSource`] owns the forest, caches both derived lists and
//!   publishes the visible list whenever the data, the expansion store
//!   ([`control::ExpansionStore`]) or the render surface's view changes.
//!
//! Node shape is described by a [`TreePolicy`]: how to build a flat node,
//! read its level and expandability back, and fetch a nested node's
//! [`Children`]. Children may be ready right away or arrive later through a
//! single-shot [`ChildSource`].
//!
//! Front-ends usually:
//! 1. Build a [`TreeFlattener`] from a policy and share an expansion store
//!    such as [`control::FlatTreeControl`] through `Rc<RefCell<_>>`.
//! 2. Create a [`FlatTreeDataSource`], feed it data with `set_data` (or
//!    `load` + `apply` when children arrive asynchronously).
//! 3. `connect` a [`ViewChanges`] signal, render every list received on the
//!    returned [`VisibleNodes`], and call `process_changes` after mutating
//!    expansion state or reporting a view change.
//!
//! # Quick Example
//!
//! ```
//! use sprig_flat::{Children, FnPolicy, TreeFlattener};
//!
//! #[derive(Clone)]
//! struct Node {
//!     name: &'static str,
//!     children: Vec<Node>,
//! }
//!
//! #[derive(Clone)]
//! struct Row {
//!     name: &'static str,
//!     level: usize,
//!     expandable: bool,
//! }
//!
//! let flattener = TreeFlattener::new(FnPolicy::new(
//!     |node: &Node, level| Row {
//!         name: node.name,
//!         level,
//!         expandable: !node.children.is_empty(),
//!     },
//!     |row: &Row| row.level,
//!     |row: &Row| row.expandable,
//!     |node: &Node| Some(Children::Ready(node.children.clone())),
//! ));
//!
//! let forest = vec![Node {
//!     name: "src",
//!     children: vec![Node { name: "lib.rs", children: vec![] }],
//! }];
//! let rows = flattener.flatten_nodes(&forest).unwrap();
//! assert_eq!(rows.len(), 2);
//!
//! let collapsed = flattener.expand_flattened_nodes(&rows, &|_: &Row| false);
//! assert_eq!(collapsed.len(), 1);
//! ```

mod children;
mod data_source;
mod error;
mod flattener;
mod policy;
mod settings;
mod view;

pub use children::{ChildSink, ChildSource, Children, child_source};
pub use data_source::{
    FlatTreeDataSource, LoadedNodes, PendingLoad, VisibleNodes,
};
pub use error::{FlatTreeError, Result};
pub use flattener::TreeFlattener;
pub use policy::{FnPolicy, TreePolicy};
pub use settings::FlattenSettings;
pub use view::{ViewChanges, ViewNotifier, ViewRange, view_channel};

pub use sprig_control as control;
