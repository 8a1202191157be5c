use chrono::{Duration, TimeZone, Utc};

use super::*;

fn catalog_with_color() -> (CatalogDb, u64, u64) {
    let mut db = CatalogDb::open_in_memory().unwrap();
    db.register_taxonomy("pa_color").unwrap();
    let red = db.insert_term("pa_color", "Red", "red", "").unwrap();
    let blue = db
        .insert_term("pa_color", "Blue", "blue", "A calm blue")
        .unwrap();
    (db, red, blue)
}

#[test]
fn test_taxonomies_in_registration_order() {
    let mut db = CatalogDb::open_in_memory().unwrap();
    db.register_taxonomy("pa_size").unwrap();
    db.register_taxonomy("product_cat").unwrap();
    db.register_taxonomy("pa_color").unwrap();
    db.register_taxonomy("pa_size").unwrap();

    assert_eq!(
        db.taxonomies().unwrap(),
        vec!["pa_size", "product_cat", "pa_color"]
    );
}

#[test]
fn test_terms_include_empty_controls_zero_usage() {
    let (mut db, red, _blue) = catalog_with_color();
    let p = db
        .insert_product("Shirt", ProductStatus::Publish, Utc::now())
        .unwrap();
    db.tag_product(p, red).unwrap();

    let all = db.terms("pa_color", TermQuery::all()).unwrap();
    assert_eq!(all.len(), 2);
    // ordered by name
    assert_eq!(all[0].name, "Blue");
    assert_eq!(all[1].name, "Red");
    assert_eq!(all[1].count, 1);

    let used = db.terms("pa_color", TermQuery::default()).unwrap();
    assert_eq!(used.len(), 1);
    assert_eq!(used[0].term_id, red);
}

#[test]
fn test_terms_unknown_taxonomy_is_error() {
    let db = CatalogDb::open_in_memory().unwrap();
    let err = db.terms("pa_missing", TermQuery::all()).unwrap_err();
    assert!(matches!(err, StoreError::UnknownTaxonomy(_)));
}

#[test]
fn test_sample_products_newest_first_and_published_only() {
    let (mut db, red, _) = catalog_with_color();
    let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    let mut ids = Vec::new();
    for i in 0..4 {
        let id = db
            .insert_product(
                &format!("Item {}", i),
                ProductStatus::Publish,
                base + Duration::days(i),
            )
            .unwrap();
        db.tag_product(id, red).unwrap();
        ids.push(id);
    }
    let draft = db
        .insert_product("Draft", ProductStatus::Draft, base + Duration::days(30))
        .unwrap();
    db.tag_product(draft, red).unwrap();

    let sample = db.sample_products("pa_color", red, 3).unwrap();
    assert_eq!(sample, vec![ids[3], ids[2], ids[1]]);

    let term = db.term(red).unwrap().unwrap();
    assert_eq!(term.count, 4);
}

#[test]
fn test_product_title_missing_is_empty() {
    let db = CatalogDb::open_in_memory().unwrap();
    assert_eq!(db.product_title(99).unwrap(), "");
}

#[test]
fn test_update_term_description() {
    let (mut db, red, _) = catalog_with_color();
    db.update_term_description(red, "pa_color", "Bright red hue")
        .unwrap();
    assert_eq!(db.term(red).unwrap().unwrap().description, "Bright red hue");
}

#[test]
fn test_update_term_wrong_taxonomy_fails() {
    let (mut db, red, _) = catalog_with_color();
    db.register_taxonomy("pa_size").unwrap();

    let err = db
        .update_term_description(red, "pa_size", "nope")
        .unwrap_err();
    assert!(matches!(err, StoreError::TermNotFound { .. }));

    let err = db
        .update_term_description(red, "pa_unknown", "nope")
        .unwrap_err();
    assert!(matches!(err, StoreError::UnknownTaxonomy(_)));

    assert_eq!(db.term(red).unwrap().unwrap().description, "");
}

#[test]
fn test_insert_term_generates_slug() {
    let mut db = CatalogDb::open_in_memory().unwrap();
    db.register_taxonomy("pa_color").unwrap();
    let id = db.insert_term("pa_color", "Forest Green", "", "").unwrap();
    assert_eq!(db.term(id).unwrap().unwrap().slug, "forest-green");
}

#[test]
fn test_open_on_disk_persists() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("nested/catalog.db");
    let id = {
        let mut db = CatalogDb::open(&path).unwrap();
        db.register_taxonomy("pa_color").unwrap();
        db.insert_term("pa_color", "Red", "red", "").unwrap()
    };

    let db = CatalogDb::open(&path).unwrap();
    assert_eq!(db.term(id).unwrap().unwrap().name, "Red");
}

#[test]
fn test_seed_demo() {
    let mut db = CatalogDb::open_in_memory().unwrap();
    assert_eq!(db.seed_demo().unwrap(), 7);
    assert_eq!(
        db.taxonomies().unwrap(),
        vec!["pa_color", "pa_size", "product_cat"]
    );
}

#[test]
fn test_slugify() {
    assert_eq!(slugify("Extra  Large!"), "extra-large");
    assert_eq!(slugify("  Navy "), "navy");
}
