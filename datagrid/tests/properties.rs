//! Property-based tests for the grid engines.

use std::cmp::Ordering;
use std::collections::HashSet;

use datagrid::column::{ColumnDef, ROW_INDEX_ID, register_columns};
use datagrid::config::GridConfig;
use datagrid::filter::filter_indices;
use datagrid::reorder::splice;
use datagrid::resize::resized_width;
use datagrid::sort::{SortDirection, compare, compare_natural, sort_indices};
use datagrid::value::{Row, Value};
use datagrid::window::{Viewport, compute_window, visible_range};
use proptest::prelude::*;

fn order_with_row_index(len: usize) -> Vec<String> {
    std::iter::once(ROW_INDEX_ID.to_string())
        .chain((0..len).map(|i| format!("col{}", i)))
        .collect()
}

// ============================================================================
// Column registry
// ============================================================================

proptest! {
    /// Registering any schema yields exactly one leading row-index column,
    /// and re-registering the output changes nothing.
    #[test]
    fn prop_register_is_idempotent(ids in prop::collection::hash_set("[a-z]{1,8}", 0..10)) {
        let config = GridConfig::default();
        let schema: Vec<ColumnDef> = ids.iter().map(|id| ColumnDef::new(id.clone(), id.clone())).collect();

        let first = register_columns(&schema, &config);
        prop_assert_eq!(first.len(), schema.len() + 1);
        prop_assert_eq!(first[0].id.as_str(), ROW_INDEX_ID);
        prop_assert_eq!(first.iter().filter(|c| c.synthetic).count(), 1);

        let defs: Vec<ColumnDef> = first.iter().map(ColumnDef::from).collect();
        let second = register_columns(&defs, &config);
        let a: Vec<(&str, u16, u16)> = first.iter().map(|c| (c.id.as_str(), c.width, c.min_width)).collect();
        let b: Vec<(&str, u16, u16)> = second.iter().map(|c| (c.id.as_str(), c.width, c.min_width)).collect();
        prop_assert_eq!(a, b);
    }
}

// ============================================================================
// Sorting
// ============================================================================

fn mixed_value() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<i64>().prop_map(Value::Int),
        (-1000.0f64..1000.0).prop_map(Value::Float),
        "[a-z0-9.]{0,6}".prop_map(Value::String),
    ]
}

proptest! {
    /// A column mixing numbers and text sorts the same whatever the input order.
    #[test]
    fn prop_mixed_sort_ignores_input_order(values in prop::collection::vec(mixed_value(), 0..30)) {
        let columns = register_columns(&[ColumnDef::new("v", "V")], &GridConfig::default());
        let rows: Vec<Row> = values.into_iter().map(|v| Row::new().set("v", v)).collect();

        let mut forward: Vec<usize> = (0..rows.len()).collect();
        sort_indices(&rows, &mut forward, &columns[1], SortDirection::Ascending, "%Y-%m-%d");
        let mut backward: Vec<usize> = (0..rows.len()).rev().collect();
        sort_indices(&rows, &mut backward, &columns[1], SortDirection::Ascending, "%Y-%m-%d");

        // Ties may keep input order; everything else must line up.
        for (&a, &b) in forward.iter().zip(&backward) {
            prop_assert_eq!(
                compare(&rows[a], &rows[b], &columns[1], false, "%Y-%m-%d"),
                Ordering::Equal
            );
        }
    }

    /// Natural comparison is a consistent ordering.
    #[test]
    fn prop_natural_compare_is_antisymmetric(a in "[a-zA-Z0-9 ]{0,12}", b in "[a-zA-Z0-9 ]{0,12}") {
        prop_assert_eq!(compare_natural(&a, &b), compare_natural(&b, &a).reverse());
        prop_assert_eq!(compare_natural(&a, &a), Ordering::Equal);
    }

    /// Appending a larger number always sorts later.
    #[test]
    fn prop_numeric_suffix_orders_by_value(prefix in "[a-z]{1,6}", x in 0u32..100_000, y in 0u32..100_000) {
        let a = format!("{}{}", prefix, x);
        let b = format!("{}{}", prefix, y);
        prop_assert_eq!(compare_natural(&a, &b), x.cmp(&y));
    }
}

// ============================================================================
// Filtering
// ============================================================================

proptest! {
    /// Filtering keeps a subsequence of the input, in order.
    #[test]
    fn prop_filter_is_ordered_subset(
        names in prop::collection::vec("[a-z]{0,6}", 0..30),
        query in "[a-z]{0,2}",
    ) {
        let columns = register_columns(&[ColumnDef::new("name", "Name")], &GridConfig::default());
        let rows: Vec<Row> = names.iter().map(|n| Row::new().set("name", n.as_str())).collect();
        let kept = filter_indices(&rows, &columns, &query);

        prop_assert!(kept.windows(2).all(|w| w[0] < w[1]));
        for (index, name) in names.iter().enumerate() {
            prop_assert_eq!(kept.contains(&index), name.contains(query.as_str()));
        }
    }
}

// ============================================================================
// Resizing and reordering
// ============================================================================

proptest! {
    /// Resizing never goes below the minimum.
    #[test]
    fn prop_resize_respects_min(current in 0u16..2000, delta in -5000i32..5000, min in 0u16..500) {
        let width = resized_width(current, delta, min);
        prop_assert!(width >= min);
        if i32::from(current) + delta >= i32::from(min) {
            prop_assert_eq!(i32::from(width), i32::from(current) + delta);
        }
    }

    /// A splice is a permutation that keeps the row-index column first.
    #[test]
    fn prop_splice_is_pinned_permutation(len in 1usize..12, source in 0usize..13, dest in 0usize..13) {
        let order = order_with_row_index(len);
        match splice(&order, source, dest) {
            Some(next) => {
                prop_assert_eq!(next.len(), order.len());
                prop_assert_eq!(next[0].as_str(), ROW_INDEX_ID);
                let a: HashSet<&String> = order.iter().collect();
                let b: HashSet<&String> = next.iter().collect();
                prop_assert_eq!(a, b);

                // Everything except the moved column keeps its relative order.
                let moved = &order[source];
                let rest_before: Vec<&String> = order.iter().filter(|id| *id != moved).collect();
                let rest_after: Vec<&String> = next.iter().filter(|id| *id != moved).collect();
                prop_assert_eq!(rest_before, rest_after);
            }
            None => prop_assert!(source == 0 || source >= order.len()),
        }
    }
}

// ============================================================================
// Windowing
// ============================================================================

proptest! {
    /// Windows stay in bounds, cover the viewport, and use unique slots.
    #[test]
    fn prop_window_bounds_and_slots(
        count in 0usize..5000,
        offset in 0u32..200_000,
        row_height in 1u16..60,
        height in 1u16..1000,
        overscan in 0usize..5,
    ) {
        let viewport = Viewport { row_height, height, overscan };
        let range = visible_range(count, offset, &viewport);
        prop_assert!(range.end <= count);
        prop_assert!(range.start <= range.end);

        let window = compute_window(count, offset, &viewport);
        prop_assert_eq!(window.items.len(), range.len());
        prop_assert!(window.items.len() <= viewport.slot_count());
        let slots: HashSet<usize> = window.items.iter().map(|i| i.slot).collect();
        prop_assert_eq!(slots.len(), window.items.len());

        if count > 0 {
            let first_visible = (window.scroll_offset / u32::from(row_height)) as usize;
            prop_assert!(range.start <= first_visible);
            // The last row touching the viewport's bottom edge is included.
            let bottom = window.scroll_offset + u32::from(height);
            let last_visible = bottom.div_ceil(u32::from(row_height)) as usize;
            prop_assert!(range.end >= count.min(last_visible));
        }
        prop_assert_eq!(window, compute_window(count, offset, &viewport));
    }
}
