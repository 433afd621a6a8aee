//! Tests for the query executor
//!
//! These tests verify:
//! - Rank-range pagination in both directions
//! - Score-range listings and filtered counts
//! - Count-only queries (size 0)
//! - Bulk hydration with missing-record slots

mod common;

use common::{post_repository, seed_posts, ORDER_BY_DISPLAY_ORDER};
use prismdb::{ScoreRange, Store, ORDER_BY_CREATED_ON};

// =============================================================================
// Pagination Tests
// =============================================================================

#[test]
fn test_first_page_ascending() {
    let (_connector, repository) = post_repository();
    seed_posts(&repository, 10);

    let result = repository
        .get_list(1, 3, ORDER_BY_DISPLAY_ORDER, true, None)
        .unwrap();

    assert_eq!(result.total, 10);
    let orders: Vec<i64> = result.into_found().iter().map(|p| p.display_order).collect();
    assert_eq!(orders, vec![0, 1, 2]);
}

#[test]
fn test_later_page_descending() {
    let (_connector, repository) = post_repository();
    seed_posts(&repository, 10);

    let result = repository
        .get_list(2, 3, ORDER_BY_DISPLAY_ORDER, false, None)
        .unwrap();

    assert_eq!(result.total, 10);
    let orders: Vec<i64> = result.into_found().iter().map(|p| p.display_order).collect();
    assert_eq!(orders, vec![6, 5, 4]);
}

#[test]
fn test_page_past_the_end_is_empty() {
    let (_connector, repository) = post_repository();
    seed_posts(&repository, 5);

    let result = repository
        .get_list(4, 2, ORDER_BY_DISPLAY_ORDER, true, None)
        .unwrap();

    assert_eq!(result.total, 5);
    assert!(result.items.is_empty());
}

#[test]
fn test_size_zero_returns_count_only() {
    let (_connector, repository) = post_repository();
    seed_posts(&repository, 7);

    let result = repository
        .get_list(1, 0, ORDER_BY_CREATED_ON, true, None)
        .unwrap();

    assert_eq!(result.total, 7);
    assert!(result.items.is_empty());
}

#[test]
fn test_pages_cover_the_set_exactly() {
    let (_connector, repository) = post_repository();
    seed_posts(&repository, 10);

    let size = 3;
    let mut seen = 0;
    for page in 1..=4 {
        let result = repository
            .get_list(page, size, ORDER_BY_DISPLAY_ORDER, true, None)
            .unwrap();
        assert!(result.items.len() <= size);
        seen += result.items.len() as u64;
    }

    let total = repository
        .get_list(1, 0, ORDER_BY_DISPLAY_ORDER, true, None)
        .unwrap()
        .total;
    assert_eq!(seen, total);
}

// =============================================================================
// Score Range Tests
// =============================================================================

#[test]
fn test_score_range_filters_items_and_count() {
    let (_connector, repository) = post_repository();
    seed_posts(&repository, 30);

    let range = Some(ScoreRange::new(10.0, 19.0));
    let result = repository
        .get_list(1, 5, ORDER_BY_DISPLAY_ORDER, true, range)
        .unwrap();

    // the count reflects the filtered cardinality, not the full set
    assert_eq!(result.total, 10);
    let orders: Vec<i64> = result.into_found().iter().map(|p| p.display_order).collect();
    assert_eq!(orders, vec![10, 11, 12, 13, 14]);
}

#[test]
fn test_score_range_descending_with_offset() {
    let (_connector, repository) = post_repository();
    seed_posts(&repository, 30);

    let range = Some(ScoreRange::new(10.0, 19.0));
    let result = repository
        .get_list(2, 3, ORDER_BY_DISPLAY_ORDER, false, range)
        .unwrap();

    assert_eq!(result.total, 10);
    let orders: Vec<i64> = result.into_found().iter().map(|p| p.display_order).collect();
    assert_eq!(orders, vec![16, 15, 14]);
}

#[test]
fn test_score_range_size_zero_counts_filtered() {
    let (_connector, repository) = post_repository();
    seed_posts(&repository, 30);

    let result = repository
        .get_list(1, 0, ORDER_BY_DISPLAY_ORDER, true, Some(ScoreRange::new(5.0, 7.0)))
        .unwrap();

    assert_eq!(result.total, 3);
    assert!(result.items.is_empty());
}

// =============================================================================
// Hydration Tests
// =============================================================================

#[test]
fn test_missing_record_yields_none_slot() {
    let (connector, repository) = post_repository();
    let created = seed_posts(&repository, 3);

    // drop the raw record while its index entries remain
    let store = connector.store();
    store
        .delete(&format!("BlogPost:{}", created[1].meta.id))
        .unwrap();

    let result = repository
        .get_list(1, 3, ORDER_BY_DISPLAY_ORDER, true, None)
        .unwrap();

    assert_eq!(result.total, 3);
    assert_eq!(result.items.len(), 3);
    assert!(result.items[0].is_some());
    assert!(result.items[1].is_none());
    assert!(result.items[2].is_some());
}

#[test]
fn test_get_by_ids_preserves_order_and_gaps() {
    let (_connector, repository) = post_repository();
    let created = seed_posts(&repository, 2);

    let ids = vec![
        created[1].meta.id.clone(),
        "no-such-id".to_string(),
        created[0].meta.id.clone(),
    ];
    let loaded = repository.get_by_ids(&ids).unwrap();

    assert_eq!(loaded.len(), 3);
    assert_eq!(loaded[0].as_ref().unwrap().display_order, 1);
    assert!(loaded[1].is_none());
    assert_eq!(loaded[2].as_ref().unwrap().display_order, 0);
}
