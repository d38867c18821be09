use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use anyhow::Context;
use sprig_flat::control::FlatTreeControl;
use sprig_flat::{
    ChildSink, ChildSource, Children, FlatTreeDataSource, FnPolicy,
    TreeFlattener, ViewRange, child_source, view_channel,
};

enum Entry {
    File(&'static str),
    Dir(&'static str, Vec<Rc<Entry>>),
    /// Directory whose listing is fetched in the background.
    Remote(&'static str, RefCell<Option<ChildSource<Rc<Entry>>>>),
}

impl Entry {
    fn name(&self) -> &'static str {
        match self {
            Entry::File(name)
            | Entry::Dir(name, _)
            | Entry::Remote(name, _) => name,
        }
    }
}

#[derive(Clone, Debug)]
struct Row {
    name: &'static str,
    level: usize,
    is_dir: bool,
}

fn file(name: &'static str) -> Rc<Entry> {
    Rc::new(Entry::File(name))
}

fn dir(name: &'static str, children: Vec<Rc<Entry>>) -> Rc<Entry> {
    Rc::new(Entry::Dir(name, children))
}

fn remote(name: &'static str) -> (Rc<Entry>, ChildSink<Rc<Entry>>) {
    let (sink, source) = child_source();
    (Rc::new(Entry::Remote(name, RefCell::new(Some(source)))), sink)
}

fn print_rows(label: &str, rows: &[Row]) {
    println!("-- {label}");
    for row in rows {
        let marker = if row.is_dir { "+" } else { " " };
        println!("{}{marker} {}", "  ".repeat(row.level), row.name);
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let flattener = Rc::new(TreeFlattener::new(FnPolicy::new(
        |entry: &Rc<Entry>, level| Row {
            name: entry.name(),
            level,
            is_dir: !matches!(**entry, Entry::File(_)),
        },
        |row: &Row| row.level,
        |row: &Row| row.is_dir,
        |entry: &Rc<Entry>| match &**entry {
            Entry::File(_) => None,
            Entry::Dir(_, children) => Some(Children::Ready(children.clone())),
            Entry::Remote(_, slot) => {
                slot.borrow_mut().take().map(Children::Pending)
            },
        },
    )));
    let control = Rc::new(RefCell::new(FlatTreeControl::new(
        |row: &Row| row.level,
        |row: &Row| row.is_dir,
        |row: &Row| row.name,
    )));

    let mut source =
        FlatTreeDataSource::new(Rc::clone(&flattener), Rc::clone(&control));
    let (notifier, changes) = view_channel();
    let visible = source.connect(changes)?;

    let (vendor, sink) = remote("vendor");
    let pending = source.load(vec![
        dir(
            "src",
            vec![dir("bin", vec![file("main.rs")]), file("lib.rs")],
        ),
        vendor,
        file("Cargo.toml"),
    ]);

    let (loaded, emitted) = tokio::join!(pending.resolve(), async move {
        tokio::time::sleep(Duration::from_millis(10)).await;
        sink.emit(vec![file("flume"), file("log")])
    });
    emitted.context("vendor listing was dropped")?;
    source.apply(loaded?)?;
    print_rows(
        "collapsed",
        &visible.drain_latest().context("no visible list")?,
    );

    let src = source.flattened()[0].clone();
    control.borrow_mut().expand_descendants(&src);
    notifier.notify(ViewRange::new(0, source.flattened().len()))?;
    source.process_changes()?;
    print_rows(
        "src expanded",
        &visible.drain_latest().context("no visible list")?,
    );

    control.borrow_mut().expand_all();
    source.process_changes()?;
    print_rows(
        "everything expanded",
        &visible.drain_latest().context("no visible list")?,
    );

    source.disconnect();
    Ok(())
}
