use datagrid::column::{ColumnDef, ROW_INDEX_ID, register_columns};
use datagrid::config::GridConfig;
use datagrid::grid::{EventResult, Grid, GridEvent, GridProps};
use datagrid::reorder::{DragSession, reconcile_order, splice};
use datagrid::value::Row;

fn ids(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

fn grid() -> Grid {
    let columns = vec![
        ColumnDef::new("a", "A"),
        ColumnDef::new("b", "B"),
        ColumnDef::new("c", "C"),
    ];
    Grid::new(GridProps::new(
        vec![Row::new().set("a", 1i64).set("b", 2i64).set("c", 3i64)],
        columns,
    ))
}

// ============================================================================
// splice
// ============================================================================

#[test]
fn test_splice_moves_one_identity() {
    let order = ids(&[ROW_INDEX_ID, "a", "b", "c"]);
    assert_eq!(
        splice(&order, 1, 3),
        Some(ids(&[ROW_INDEX_ID, "b", "c", "a"]))
    );
    assert_eq!(
        splice(&order, 3, 1),
        Some(ids(&[ROW_INDEX_ID, "c", "a", "b"]))
    );
    assert_eq!(splice(&order, 2, 2), Some(order.clone()));
}

#[test]
fn test_splice_pins_row_index() {
    let order = ids(&[ROW_INDEX_ID, "a", "b"]);
    assert_eq!(splice(&order, 0, 2), None);
    assert_eq!(splice(&order, 2, 0), Some(ids(&[ROW_INDEX_ID, "b", "a"])));
}

#[test]
fn test_splice_out_of_range_source() {
    assert_eq!(splice(&ids(&["a"]), 1, 0), None);
}

#[test]
fn test_session_rejects_row_index_and_unknown() {
    let order = ids(&[ROW_INDEX_ID, "a"]);
    assert!(DragSession::start(&order, ROW_INDEX_ID).is_none());
    assert!(DragSession::start(&order, "zzz").is_none());
    assert!(DragSession::start(&order, "a").is_some());
}

#[test]
fn test_reconcile_keeps_known_and_appends_new() {
    let previous = ids(&[ROW_INDEX_ID, "c", "a", "b"]);
    let columns = register_columns(
        &[
            ColumnDef::new("a", "A"),
            ColumnDef::new("b", "B"),
            ColumnDef::new("d", "D"),
        ],
        &GridConfig::default(),
    );
    assert_eq!(
        reconcile_order(&previous, &columns),
        ids(&[ROW_INDEX_ID, "a", "b", "d"])
    );
}

#[test]
fn test_session_update_moves_only_the_dragged_column() {
    let order = ids(&[ROW_INDEX_ID, "a", "b", "c"]);
    let session = DragSession::start(&order, "a").unwrap();
    assert_eq!(session.update(3, Some(1)), None);
    assert_eq!(
        session.update(1, Some(3)),
        Some(ids(&[ROW_INDEX_ID, "b", "c", "a"]))
    );
}

// ============================================================================
// Grid drag sessions
// ============================================================================

#[test]
fn test_update_pointing_at_another_column_is_ignored() {
    let grid = grid();
    assert!(grid.drag_start("a"));
    assert!(!grid.drag_update(3, Some(1)));
    assert_eq!(grid.column_order(), ids(&[ROW_INDEX_ID, "a", "b", "c"]));

    assert!(grid.drag_update(1, Some(2)));
    assert_eq!(grid.column_order(), ids(&[ROW_INDEX_ID, "b", "a", "c"]));
}

#[test]
fn test_update_without_session_is_noop() {
    let grid = grid();
    let before = grid.column_order();
    assert!(!grid.drag_update(1, Some(3)));
    assert_eq!(
        grid.handle(GridEvent::DragUpdate {
            source: 1,
            destination: Some(3)
        }),
        EventResult::Ignored
    );
    assert_eq!(grid.column_order(), before);
}

#[test]
fn test_updates_splice_the_snapshot() {
    let grid = grid();
    assert!(grid.drag_start("a"));

    assert!(grid.drag_update(1, Some(3)));
    assert_eq!(grid.column_order(), ids(&[ROW_INDEX_ID, "b", "c", "a"]));

    // A later update starts again from the order at drag start.
    assert!(grid.drag_update(1, Some(2)));
    assert_eq!(grid.column_order(), ids(&[ROW_INDEX_ID, "b", "a", "c"]));

    grid.drag_end();
    assert!(!grid.is_dragging());
    assert_eq!(grid.column_order(), ids(&[ROW_INDEX_ID, "b", "a", "c"]));
}

#[test]
fn test_update_without_destination_keeps_order() {
    let grid = grid();
    grid.drag_start("b");
    grid.drag_update(2, Some(1));
    let committed = grid.column_order();
    assert!(!grid.drag_update(2, None));
    assert_eq!(grid.column_order(), committed);
}

#[test]
fn test_row_index_cannot_be_dragged_or_displaced() {
    let grid = grid();
    assert!(!grid.drag_start(ROW_INDEX_ID));
    assert_eq!(
        grid.handle(GridEvent::DragStart {
            column_id: ROW_INDEX_ID.into()
        }),
        EventResult::Ignored
    );

    grid.drag_start("c");
    grid.drag_update(3, Some(0));
    assert_eq!(grid.column_order(), ids(&[ROW_INDEX_ID, "c", "a", "b"]));
}

#[test]
fn test_reorder_moves_rendered_cells() {
    let grid = grid();
    grid.drag_start("c");
    grid.drag_update(3, Some(1));
    grid.drag_end();

    let labels: Vec<String> = grid.columns().into_iter().map(|c| c.label).collect();
    assert_eq!(labels, vec!["#", "C", "A", "B"]);
}

#[test]
fn test_order_survives_schema_change() {
    let grid = grid();
    grid.drag_start("c");
    grid.drag_update(3, Some(1));
    grid.drag_end();

    grid.set_props(GridProps::new(
        vec![Row::new()],
        vec![
            ColumnDef::new("a", "A"),
            ColumnDef::new("c", "C"),
            ColumnDef::new("e", "E"),
        ],
    ));
    assert_eq!(grid.column_order(), ids(&[ROW_INDEX_ID, "c", "a", "e"]));
}
