//! Expansion state for flat tree rendering.
//!
//! This crate holds the pieces a tree flattener reads but never owns:
//! - [`ExpansionModel`], a set of expanded node keys that broadcasts an
//!   [`ExpansionChange`] to every subscriber after each effective mutation;
//! - [`FlatTreeControl`], which pairs an expansion model with the flat node
//!   list so callers can expand or collapse whole subtrees;
//! - the [`ExpansionState`] and [`ExpansionStore`] traits, the contract a
//!   flat data source reads visibility and change notifications through.
//!
//! # Quick Example
//!
//! ```
//! use sprig_control::FlatTreeControl;
//!
//! #[derive(Clone)]
//! struct Row {
//!     id: u32,
//!     level: usize,
//!     expandable: bool,
//! }
//!
//! let mut control = FlatTreeControl::new(
//!     |row: &Row| row.level,
//!     |row: &Row| row.expandable,
//!     |row: &Row| row.id,
//! );
//! let events = control.subscribe();
//!
//! let root = Row { id: 1, level: 0, expandable: true };
//! control.expand(&root);
//!
//! assert!(control.is_expanded(&root));
//! assert_eq!(events.drain(), 1);
//! ```

mod control;
mod expansion;
mod settings;
mod store;

pub use control::FlatTreeControl;
pub use expansion::{ExpansionChange, ExpansionEvents, ExpansionModel};
pub use settings::ControlSettings;
pub use store::{ExpansionState, ExpansionStore};
