mod common;

use std::time::Duration;

use common::{branch, deferred, flattener, leaf, levels, names};
use sprig_flat::FlattenSettings;

#[tokio::test]
async fn given_delayed_children_when_flattening_async_then_pre_order_is_kept()
{
    let (lazy, sink) = deferred("lazy");
    let roots = vec![lazy, branch("eager", vec![leaf("x")])];
    let flattener = flattener(FlattenSettings::default());

    let (flat, emitted) = tokio::join!(
        flattener.flatten_nodes_async(&roots),
        async move {
            tokio::time::sleep(Duration::from_millis(5)).await;
            sink.emit(vec![leaf("a"), branch("b", vec![leaf("c")])])
        }
    );

    emitted.expect("children emitted");
    let flat = flat.expect("flatten succeeds");
    assert_eq!(names(&flat), vec!["lazy", "a", "b", "c", "eager", "x"]);
    assert_eq!(levels(&flat), vec![0, 1, 1, 2, 0, 1]);
}

#[tokio::test]
async fn given_dropped_sink_when_flattening_async_then_branch_is_empty() {
    let (lazy, sink) = deferred("lazy");
    drop(sink);
    let roots = vec![lazy, leaf("after")];

    let flat = flattener(FlattenSettings::default())
        .flatten_nodes_async(&roots)
        .await
        .expect("flatten succeeds");

    assert_eq!(names(&flat), vec!["lazy", "after"]);
}

#[tokio::test]
async fn given_silent_source_when_flattening_async_then_future_stays_pending()
{
    let (lazy, _sink) = deferred("lazy");
    let roots = vec![lazy];
    let flattener = flattener(FlattenSettings::default());

    let outcome = tokio::time::timeout(
        Duration::from_millis(20),
        flattener.flatten_nodes_async(&roots),
    )
    .await;

    assert!(outcome.is_err());
}

#[test]
fn given_unemitted_source_when_flattening_sync_then_branch_is_omitted() {
    let (lazy, sink) = deferred("lazy");
    let roots = vec![lazy, leaf("after")];

    let flat = flattener(FlattenSettings::default())
        .flatten_nodes(&roots)
        .expect("flatten succeeds");
    assert_eq!(names(&flat), vec!["lazy", "after"]);

    // The source was consumed by the first attempt.
    assert!(sink.emit(vec![leaf("late")]).is_err());
}

#[test]
fn given_emitted_source_when_flattening_sync_then_children_are_used() {
    let (lazy, sink) = deferred("lazy");
    sink.emit(vec![leaf("child")]).expect("emit");
    let roots = vec![lazy];

    let flat = flattener(FlattenSettings::default())
        .flatten_nodes(&roots)
        .expect("flatten succeeds");

    assert_eq!(names(&flat), vec!["lazy", "child"]);
    assert_eq!(levels(&flat), vec![0, 1]);
}

#[test]
fn given_forest_when_flattening_then_length_matches_node_count() {
    let roots = vec![
        branch(
            "a",
            vec![branch("b", vec![leaf("c"), leaf("d")]), leaf("e")],
        ),
        leaf("f"),
        branch("g", vec![branch("h", vec![branch("i", vec![leaf("j")])])]),
    ];

    let flat = flattener(FlattenSettings::default())
        .flatten_nodes(&roots)
        .expect("flatten succeeds");

    assert_eq!(flat.len(), 10);
    assert_eq!(
        names(&flat),
        vec!["a", "b", "c", "d", "e", "f", "g", "h", "i", "j"]
    );
    assert_eq!(levels(&flat), vec![0, 1, 2, 2, 1, 0, 0, 1, 2, 3]);
}
