#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use sprig_flat::control::FlatTreeControl;
use sprig_flat::{
    ChildSink, ChildSource, Children, FlattenSettings, FnPolicy, TreeFlattener,
    child_source,
};

pub type NodeRef = Rc<Node>;
pub type Flattener = TreeFlattener<FnPolicy<NodeRef, Row>>;
pub type Control = FlatTreeControl<Row, &'static str>;

pub enum Kind {
    Leaf,
    Branch(Vec<NodeRef>),
    Deferred(RefCell<Option<ChildSource<NodeRef>>>),
}

pub struct Node {
    pub name: &'static str,
    pub kind: Kind,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Row {
    pub name: &'static str,
    pub level: usize,
    pub expandable: bool,
}

pub fn leaf(name: &'static str) -> NodeRef {
    Rc::new(Node {
        name,
        kind: Kind::Leaf,
    })
}

pub fn branch(name: &'static str, children: Vec<NodeRef>) -> NodeRef {
    Rc::new(Node {
        name,
        kind: Kind::Branch(children),
    })
}

/// Node whose children arrive through the returned sink.
pub fn deferred(name: &'static str) -> (NodeRef, ChildSink<NodeRef>) {
    let (sink, source) = child_source();
    let node = Rc::new(Node {
        name,
        kind: Kind::Deferred(RefCell::new(Some(source))),
    });
    (node, sink)
}

pub fn flattener(settings: FlattenSettings) -> Flattener {
    TreeFlattener::with_settings(
        FnPolicy::new(
            |node: &NodeRef, level| Row {
                name: node.name,
                level,
                expandable: !matches!(node.kind, Kind::Leaf),
            },
            |row: &Row| row.level,
            |row: &Row| row.expandable,
            |node: &NodeRef| match &node.kind {
                Kind::Leaf => None,
                Kind::Branch(children) => {
                    Some(Children::Ready(children.clone()))
                },
                Kind::Deferred(slot) => {
                    slot.borrow_mut().take().map(Children::Pending)
                },
            },
        ),
        settings,
    )
}

pub fn control() -> Rc<RefCell<Control>> {
    Rc::new(RefCell::new(FlatTreeControl::new(
        |row: &Row| row.level,
        |row: &Row| row.expandable,
        |row: &Row| row.name,
    )))
}

pub fn names(rows: &[Row]) -> Vec<&'static str> {
    rows.iter().map(|row| row.name).collect()
}

pub fn levels(rows: &[Row]) -> Vec<usize> {
    rows.iter().map(|row| row.level).collect()
}
