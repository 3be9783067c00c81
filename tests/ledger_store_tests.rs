mod common;

use std::fs;

use asset_tracker::{
    config::Config,
    core::utils::PathResolver,
    errors::LedgerError,
    ledger::{LedgerState, RangeSelection, RawEntry, UpsertOutcome},
};
use common::{day, open_store, setup_test_env, temp_base};

#[test]
fn derived_series_follows_date_order() {
    let (mut store, _, _) = setup_test_env();
    store.upsert(RawEntry::new(day(1, 2), 110.0, 40.0)).unwrap();
    store.upsert(RawEntry::new(day(1, 1), 100.0, 50.0)).unwrap();
    store.upsert(RawEntry::new(day(1, 3), 130.0, 70.0)).unwrap();

    let derived = store.derived();
    let dates: Vec<_> = derived.iter().map(|entry| entry.date).collect();
    assert_eq!(dates, vec![day(1, 1), day(1, 2), day(1, 3)]);
    assert_eq!(derived[0].delta_total, 0.0);
    assert_eq!((derived[1].delta1, derived[1].delta2), (10.0, -10.0));
    assert_eq!(derived[1].delta_total, 0.0);
    assert_eq!(derived[2].total, 200.0);
    assert_eq!(derived[2].delta_total, 50.0);
}

#[test]
fn ratchet_keeps_the_highest_total_per_date() {
    let (mut store, _, base) = setup_test_env();
    assert_eq!(
        store.upsert(RawEntry::new(day(1, 1), 100.0, 50.0)).unwrap(),
        UpsertOutcome::Inserted
    );
    // Equal totals are rejected.
    assert!(matches!(
        store.upsert(RawEntry::new(day(1, 1), 50.0, 100.0)).unwrap(),
        UpsertOutcome::Rejected { .. }
    ));
    assert!(matches!(
        store.upsert(RawEntry::new(day(1, 1), 100.0, 60.0)).unwrap(),
        UpsertOutcome::Replaced { .. }
    ));

    let reopened = open_store(&base, day(1, 31));
    assert_eq!(reopened.ledger().len(), 1);
    assert_eq!(reopened.derived()[0].asset2, 60.0);
}

#[test]
fn load_is_idempotent() {
    let (mut store, _, _) = setup_test_env();
    store.upsert(RawEntry::new(day(1, 1), 1.0, 2.0)).unwrap();
    let first = store.load().unwrap().to_vec();
    let second = store.load().unwrap().to_vec();
    assert_eq!(first, second);
}

#[test]
fn delete_missing_date_is_a_no_op() {
    let (mut store, _, _) = setup_test_env();
    store.upsert(RawEntry::new(day(1, 1), 1.0, 2.0)).unwrap();
    assert!(!store.delete(day(1, 9)).unwrap());
    assert_eq!(store.ledger().len(), 1);
    assert!(store.delete(day(1, 1)).unwrap());
    assert_eq!(store.state(), LedgerState::Empty);
}

#[test]
fn clear_persists_an_empty_ledger() {
    let (mut store, _, base) = setup_test_env();
    store.upsert(RawEntry::new(day(1, 1), 1.0, 2.0)).unwrap();
    store.clear().unwrap();
    let reopened = open_store(&base, day(1, 31));
    assert!(reopened.ledger().is_empty());
    let raw = fs::read_to_string(PathResolver::slot_file_in(&base)).unwrap();
    assert_eq!(raw.trim(), "[]");
}

#[test]
fn export_then_import_reproduces_the_series() {
    let (mut store, _, _) = setup_test_env();
    store.upsert(RawEntry::new(day(1, 1), 0.0, 50.0)).unwrap();
    store.upsert(RawEntry::new(day(1, 5), 20.0, 55.5)).unwrap();
    let before = store.derived().to_vec();

    let export_dir = temp_base();
    let path = store.export_to_dir(&export_dir).unwrap();
    assert_eq!(
        path.file_name().and_then(|name| name.to_str()),
        Some("asset-records-2024-01-31.json")
    );

    let (mut other, _, _) = setup_test_env();
    assert_eq!(other.import_file(&path).unwrap(), 2);
    assert_eq!(other.derived(), before.as_slice());
}

#[test]
fn invalid_imports_are_rejected_without_side_effects() {
    let (mut store, _, _) = setup_test_env();
    store.upsert(RawEntry::new(day(1, 1), 1.0, 1.0)).unwrap();

    let cases = [
        "not json",
        r#"{"date":"2024-01-01","asset1":1,"asset2":1}"#,
        r#"[{"date":"2024-01-01","asset1":"1","asset2":1}]"#,
        r#"[{"date":"2024-01-01","asset2":1}]"#,
        r#"[{"date":"2024-01-02","asset1":-500,"asset2":5}]"#,
        r#"[{"date":"2024-01-01","asset1":1,"asset2":1},{"date":"2024-01-01","asset1":2,"asset2":2}]"#,
    ];
    for json in cases {
        assert!(
            matches!(store.import_json(json), Err(LedgerError::Import(_))),
            "expected {json} to be rejected"
        );
    }
    assert_eq!(store.ledger().len(), 1);
    assert!(store.list_backups().unwrap().is_empty());
}

#[test]
fn range_filter_counts_back_from_today() {
    let base = temp_base();
    let mut store = open_store(&base, day(3, 31));
    store.upsert(RawEntry::new(day(1, 1), 1.0, 0.0)).unwrap();
    store.upsert(RawEntry::new(day(3, 1), 2.0, 0.0)).unwrap();
    store.upsert(RawEntry::new(day(3, 24), 3.0, 0.0)).unwrap();
    store.upsert(RawEntry::new(day(4, 2), 4.0, 0.0)).unwrap();

    let week: Vec<_> = store
        .filter(RangeSelection::Days(7))
        .iter()
        .map(|entry| entry.date)
        .collect();
    assert_eq!(week, vec![day(3, 24), day(4, 2)]);
    assert_eq!(store.filter(RangeSelection::Days(30)).len(), 3);
    assert_eq!(store.filter(RangeSelection::All).len(), 4);

    // Deltas come from the full series, not the filtered window.
    assert_eq!(store.filter(RangeSelection::Days(7))[0].delta1, 1.0);
}

#[test]
fn failed_save_preserves_the_original_file() {
    let (mut store, _, base) = setup_test_env();
    store.upsert(RawEntry::new(day(1, 1), 1.0, 2.0)).unwrap();
    let slot = PathResolver::slot_file_in(&base);
    let original = fs::read_to_string(&slot).unwrap();

    // A directory at the temp path makes the write fail.
    let mut tmp = slot.clone();
    tmp.set_extension("json.tmp");
    fs::create_dir_all(&tmp).unwrap();

    assert!(store.upsert(RawEntry::new(day(1, 2), 5.0, 5.0)).is_err());
    assert_eq!(fs::read_to_string(&slot).unwrap(), original);
    assert_eq!(store.ledger().len(), 1);
}

#[test]
fn malformed_slot_loads_empty_and_keeps_a_copy() {
    let base = temp_base();
    fs::write(PathResolver::slot_file_in(&base), "{ not valid").unwrap();

    let store = open_store(&base, day(1, 31));
    assert!(store.ledger().is_empty());
    assert_eq!(store.warnings().len(), 1);
    let backups = store.list_backups().unwrap();
    assert_eq!(backups.len(), 1);
    assert!(backups[0].ends_with("_malformed.json"));
}

#[test]
fn reopening_a_malformed_slot_keeps_earlier_backups() {
    let (mut store, _, base) = setup_test_env();
    store.upsert(RawEntry::new(day(1, 1), 1.0, 1.0)).unwrap();
    store
        .import_json(r#"[{"date":"2024-01-02","asset1":1,"asset2":1}]"#)
        .unwrap();
    let before_import = store.list_backups().unwrap();
    assert_eq!(before_import.len(), 1);

    fs::write(PathResolver::slot_file_in(&base), "not json").unwrap();
    for _ in 0..5 {
        let reopened = open_store(&base, day(1, 31));
        assert!(reopened.ledger().is_empty());
    }

    let backups = open_store(&base, day(1, 31)).list_backups().unwrap();
    assert!(backups.contains(&before_import[0]), "{backups:?}");
    assert_eq!(backups.len(), 2);
}

#[test]
fn backups_are_pruned_to_the_retention_limit() {
    let (mut store, _, _) = setup_test_env();
    store.upsert(RawEntry::new(day(1, 1), 1.0, 1.0)).unwrap();
    for _ in 0..5 {
        store
            .import_json(r#"[{"date":"2024-01-02","asset1":1,"asset2":1}]"#)
            .unwrap();
    }
    assert_eq!(store.list_backups().unwrap().len(), 3);
}

#[test]
fn config_round_trips_through_its_manager() {
    let (_, manager, _) = setup_test_env();
    assert_eq!(manager.load().unwrap(), Config::default());

    let config = Config {
        currency: "USD".into(),
        chart_range: RangeSelection::Days(90),
        ..Config::default()
    };
    manager.save(&config).unwrap();
    assert_eq!(manager.load().unwrap(), config);
}
