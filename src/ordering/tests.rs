use super::{
    SwapError, SwapOutcome, apply_bulk, has_duplicate_orders, next_order, reindex, reindex_plan,
    sorted_partition, swap,
};
use crate::config::Settings;
use crate::model::{CategoryId, Direction, Item, ItemId, MutationKind, PartitionKey, Section};
use crate::store::MemoryStore;

/// What: Build a catalog item fixture with the fields the ordering logic
/// reads.
///
/// Inputs:
/// - `id`/`category`/`section`: identity and partition shape.
/// - `order`/`created_at`: ordering fields under test.
///
/// Output:
/// - Active `Item` with a derived title.
fn item(id: &str, category: &str, section: Option<&str>, order: i64, created_at: i64) -> Item {
    Item {
        id: ItemId::new(id),
        category_id: CategoryId::new(category),
        section: section.map(Section::new),
        order,
        created_at,
        title: format!("{id} title"),
        active: true,
    }
}

/// Settings tuned for tests: no settle delay, no automatic repair.
fn fast_settings() -> Settings {
    Settings {
        settle_delay_ms: 0,
        auto_repair: false,
        ..Settings::default()
    }
}

/// Item ids in list order, for compact assertions.
fn ids(items: &[Item]) -> Vec<&str> {
    items.iter().map(|it| it.id.as_str()).collect()
}

#[test]
/// What: The accessor filters to the partition and sorts ascending by order.
///
/// Inputs:
/// - Snapshot mixing two categories, orders out of list order.
///
/// Output:
/// - Only the requested category, sorted `[a1, a2, a3]`.
fn accessor_filters_and_sorts() {
    let snapshot = vec![
        item("a2", "cables", None, 2, 0),
        item("b1", "chargers", None, 1, 0),
        item("a3", "cables", None, 3, 0),
        item("a1", "cables", None, 1, 0),
    ];
    let key = PartitionKey::category(CategoryId::new("cables"));
    assert_eq!(ids(&sorted_partition(&snapshot, &key)), ["a1", "a2", "a3"]);
}

#[test]
/// What: Equal order values keep their snapshot iteration order (stable sort).
///
/// Inputs:
/// - Two items sharing `order = 1`, `x` listed before `y`.
///
/// Output:
/// - `x` stays before `y`; the duplicate probe reports corruption.
fn accessor_ties_are_stable() {
    let snapshot = vec![
        item("x", "cables", None, 1, 5),
        item("y", "cables", None, 1, 3),
    ];
    let key = PartitionKey::category(CategoryId::new("cables"));
    let sorted = sorted_partition(&snapshot, &key);
    assert_eq!(ids(&sorted), ["x", "y"]);
    assert!(has_duplicate_orders(&sorted));
}

#[test]
fn next_order_appends_after_max() {
    let key = PartitionKey::category(CategoryId::new("cables"));
    assert_eq!(next_order(&[], &key), 1);
    let snapshot = vec![
        item("a", "cables", None, 4, 0),
        item("b", "cables", None, 2, 0),
        item("c", "chargers", None, 9, 0),
    ];
    assert_eq!(next_order(&snapshot, &key), 5);
}

#[test]
/// What: The plan rebuilds each partition as `1..N` in creation order.
///
/// Inputs:
/// - Corrupted partition `[x(2), y(2), z(1)]` created in order z, x, y,
///   plus a second partition to prove grouping.
///
/// Output:
/// - z -> 1, x -> 2, y -> 3 within the corrupted partition; the other
///   partition numbers independently.
fn reindex_plan_uses_creation_order() {
    let snapshot = vec![
        item("x", "cables", None, 2, 10),
        item("y", "cables", None, 2, 20),
        item("z", "cables", None, 1, 5),
        item("q1", "phones", Some("condition"), 7, 1),
    ];
    let plan = reindex_plan(&snapshot);
    let of = |id: &str| {
        plan.iter()
            .find(|(i, _)| i.as_str() == id)
            .map(|(_, o)| *o)
    };
    assert_eq!(of("z"), Some(1));
    assert_eq!(of("x"), Some(2));
    assert_eq!(of("y"), Some(3));
    assert_eq!(of("q1"), Some(1));
    assert_eq!(plan.len(), 4);
}

#[tokio::test]
/// What: Moving the first item up and the last item down are no-ops.
///
/// Inputs:
/// - Partition `[a(1), b(2)]`; move `a` up, then `b` down.
///
/// Output:
/// - Both calls return `Boundary` and the store sees zero order writes.
async fn swap_boundaries_issue_no_writes() {
    let items = vec![
        item("a", "cables", None, 1, 0),
        item("b", "cables", None, 2, 1),
    ];
    let store = MemoryStore::new(items.clone());
    let settings = fast_settings();
    let key = PartitionKey::category(CategoryId::new("cables"));
    let view = sorted_partition(&items, &key);

    let up = swap(&store, &settings, &view, &ItemId::new("a"), Direction::Up)
        .await
        .expect("swap up");
    assert!(matches!(up, SwapOutcome::Boundary));
    let down = swap(&store, &settings, &view, &ItemId::new("b"), Direction::Down)
        .await
        .expect("swap down");
    assert!(matches!(down, SwapOutcome::Boundary));
    assert_eq!(store.order_write_count(), 0);
}

#[tokio::test]
/// What: A neighbor from a different partition refuses the move.
///
/// Inputs:
/// - Stale view interleaving a sell-question from another section below the
///   moved item.
///
/// Output:
/// - `Refused`, zero order writes.
async fn swap_refuses_cross_partition_neighbor() {
    let view = vec![
        item("q1", "phones", Some("condition"), 1, 0),
        item("q2", "phones", Some("accessories"), 2, 1),
    ];
    let store = MemoryStore::new(view.clone());
    let settings = fast_settings();

    let out = swap(&store, &settings, &view, &ItemId::new("q1"), Direction::Down)
        .await
        .expect("swap runs");
    assert!(matches!(out, SwapOutcome::Refused));
    assert_eq!(store.order_write_count(), 0);
}

#[tokio::test]
async fn swap_unknown_id_is_an_error() {
    let store = MemoryStore::new(Vec::new());
    let settings = fast_settings();
    let err = swap(&store, &settings, &[], &ItemId::new("ghost"), Direction::Up).await;
    assert!(matches!(err, Err(SwapError::UnknownItem { .. })));
}

#[tokio::test]
/// What: A successful swap exchanges the two order values and returns the
/// refreshed partition.
///
/// Inputs:
/// - `[x(1), y(2), z(3)]`; move `y` up.
///
/// Output:
/// - Store holds `y(1), x(2), z(3)`; outcome lists `[y, x, z]` with no
///   repair flags.
async fn swap_exchanges_adjacent_orders() {
    let items = vec![
        item("x", "cables", None, 1, 0),
        item("y", "cables", None, 2, 1),
        item("z", "cables", None, 3, 2),
    ];
    let store = MemoryStore::new(items.clone());
    let settings = fast_settings();
    let key = PartitionKey::category(CategoryId::new("cables"));
    let view = sorted_partition(&items, &key);

    let out = swap(&store, &settings, &view, &ItemId::new("y"), Direction::Up)
        .await
        .expect("swap succeeds");
    let SwapOutcome::Applied {
        items: refreshed,
        needs_repair,
        repaired,
    } = out
    else {
        panic!("expected an applied swap");
    };
    assert_eq!(ids(&refreshed), ["y", "x", "z"]);
    assert!(!needs_repair);
    assert!(!repaired);
    assert_eq!(store.item(&ItemId::new("y")).map(|it| it.order), Some(1));
    assert_eq!(store.item(&ItemId::new("x")).map(|it| it.order), Some(2));
    assert_eq!(store.order_write_count(), 2);
}

#[tokio::test]
/// What: Moving an item down and moving its successor up are the same
/// exchange.
///
/// Inputs:
/// - Two stores seeded with `[x(1), y(2)]`; swap `x` down in one, `y` up
///   in the other.
///
/// Output:
/// - Both stores converge on `y(1), x(2)`.
async fn swap_down_matches_successor_swap_up() {
    let items = vec![
        item("x", "cables", None, 1, 0),
        item("y", "cables", None, 2, 1),
    ];
    let settings = fast_settings();
    let key = PartitionKey::category(CategoryId::new("cables"));
    let view = sorted_partition(&items, &key);

    let down_store = MemoryStore::new(items.clone());
    swap(&down_store, &settings, &view, &ItemId::new("x"), Direction::Down)
        .await
        .expect("swap down");
    let up_store = MemoryStore::new(items.clone());
    swap(&up_store, &settings, &view, &ItemId::new("y"), Direction::Up)
        .await
        .expect("swap up");

    let after_down = sorted_partition(&down_store.snapshot(), &key);
    let after_up = sorted_partition(&up_store.snapshot(), &key);
    assert_eq!(ids(&after_down), ["y", "x"]);
    assert_eq!(ids(&after_down), ids(&after_up));
}

#[tokio::test]
/// What: A failing second write surfaces as a torn swap with one order
/// changed.
///
/// Inputs:
/// - `[x(1), y(2)]`; writes for `x` fail; move `y` up.
///
/// Output:
/// - `SwapError::Torn`; `y` already holds order 1 while `x` kept 1 too,
///   leaving the duplicate the repair path exists for.
async fn swap_reports_torn_when_second_write_fails() {
    let items = vec![
        item("x", "cables", None, 1, 0),
        item("y", "cables", None, 2, 1),
    ];
    let store = MemoryStore::new(items.clone());
    store.fail_writes_for(&ItemId::new("x"));
    let settings = fast_settings();
    let key = PartitionKey::category(CategoryId::new("cables"));
    let view = sorted_partition(&items, &key);

    let err = swap(&store, &settings, &view, &ItemId::new("y"), Direction::Up).await;
    assert!(matches!(err, Err(SwapError::Torn { .. })));
    let snapshot = store.snapshot();
    assert!(has_duplicate_orders(&sorted_partition(&snapshot, &key)));
}

#[tokio::test]
/// What: With auto-repair on, a corrupt refetch triggers a partition
/// reindex.
///
/// Inputs:
/// - Corrupted partition `x(2), y(2), z(1)` created z, x, y; swap `z`
///   down with `auto_repair = true`.
///
/// Output:
/// - Outcome reports `repaired` with no remaining duplicates; orders are
///   dense `1..3` in creation order.
async fn swap_auto_repairs_corrupt_partition() {
    let items = vec![
        item("z", "cables", None, 1, 0),
        item("x", "cables", None, 2, 10),
        item("y", "cables", None, 2, 20),
    ];
    let store = MemoryStore::new(items.clone());
    let settings = Settings {
        auto_repair: true,
        ..fast_settings()
    };
    let key = PartitionKey::category(CategoryId::new("cables"));
    let view = sorted_partition(&items, &key);

    let out = swap(&store, &settings, &view, &ItemId::new("z"), Direction::Down)
        .await
        .expect("swap succeeds");
    let SwapOutcome::Applied {
        items: refreshed,
        needs_repair,
        repaired,
    } = out
    else {
        panic!("expected an applied swap");
    };
    assert!(repaired);
    assert!(!needs_repair);
    assert_eq!(ids(&refreshed), ["z", "x", "y"]);
    let orders: Vec<i64> = refreshed.iter().map(|it| it.order).collect();
    assert_eq!(orders, [1, 2, 3]);
}

#[tokio::test]
/// What: Reindex stops at the first failed write and reports progress.
///
/// Inputs:
/// - Two-partition snapshot; writes fail for an item midway through the
///   plan's write sequence.
///
/// Output:
/// - Error names the failing id and counts the writes already applied.
async fn reindex_stops_on_first_failure() {
    let snapshot = vec![
        item("a1", "cables", None, 3, 0),
        item("a2", "cables", None, 1, 1),
        item("b1", "chargers", None, 1, 0),
    ];
    let store = MemoryStore::new(snapshot.clone());
    store.fail_writes_for(&ItemId::new("a2"));

    let err = reindex(&store, &snapshot).await.expect_err("reindex fails");
    assert_eq!(err.id, ItemId::new("a2"));
    // a1 (created first) was already rewritten before a2 failed
    assert_eq!(err.updated, 1);
    assert_eq!(store.item(&ItemId::new("a1")).map(|it| it.order), Some(1));
    // b1 comes after the failing write in the plan and was never touched
    assert_eq!(store.item(&ItemId::new("b1")).map(|it| it.order), Some(1));
}

#[tokio::test]
/// What: Bulk mutation resolves every id independently.
///
/// Inputs:
/// - Delete over `[id1, id2, id3]` where `id2`'s remote call fails.
///
/// Output:
/// - Batch verdict is failure, yet `id1` and `id3` are reported applied and
///   are gone from the store.
async fn bulk_reports_per_id_outcomes() {
    let items = vec![
        item("id1", "cables", None, 1, 0),
        item("id2", "cables", None, 2, 1),
        item("id3", "cables", None, 3, 2),
    ];
    let store = MemoryStore::new(items);
    store.fail_writes_for(&ItemId::new("id2"));

    let ids_in = [ItemId::new("id1"), ItemId::new("id2"), ItemId::new("id3")];
    let report = apply_bulk(&store, &ids_in, MutationKind::Delete).await;

    assert!(!report.all_succeeded());
    assert_eq!(report.len(), 3);
    assert_eq!(
        report.succeeded(),
        [&ItemId::new("id1"), &ItemId::new("id3")]
    );
    let failed: Vec<&ItemId> = report.failed().into_iter().map(|(id, _)| id).collect();
    assert_eq!(failed, [&ItemId::new("id2")]);
    assert!(store.item(&ItemId::new("id1")).is_none());
    assert!(store.item(&ItemId::new("id2")).is_some());
    assert!(store.item(&ItemId::new("id3")).is_none());
}

#[tokio::test]
async fn bulk_activate_flips_the_flag() {
    let mut inactive = item("a", "cables", None, 1, 0);
    inactive.active = false;
    let store = MemoryStore::new(vec![inactive]);

    let report = apply_bulk(&store, &[ItemId::new("a")], MutationKind::Activate).await;
    assert!(report.all_succeeded());
    assert_eq!(store.item(&ItemId::new("a")).map(|it| it.active), Some(true));
}
