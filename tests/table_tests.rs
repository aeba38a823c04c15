use logsieve::table::FreqTable;

#[test]
fn upsert_counts_and_assigns_sequential_ids() {
    let mut table = FreqTable::new(64, 1);
    let a = table.upsert("alpha");
    let b = table.upsert("beta");
    let a2 = table.upsert("alpha");
    assert_eq!(a, a2);
    assert_eq!(table.get(a).count, 2);
    assert_eq!(table.get(b).count, 1);
    assert_eq!(table.get(a).number, 1);
    assert_eq!(table.get(b).number, 2);
    assert_eq!(table.len(), 2);
}

#[test]
fn lookup_finds_without_counting() {
    let mut table = FreqTable::new(64, 1);
    let id = table.upsert("alpha");
    assert_eq!(table.lookup("alpha"), Some(id));
    assert_eq!(table.get(id).count, 1);
    assert_eq!(table.lookup("missing"), None);
}

#[test]
fn chains_survive_many_keys_in_few_buckets() {
    // Two slots force long chains; every key must stay reachable.
    let mut table = FreqTable::new(2, 9);
    let keys: Vec<String> = (0..50).map(|i| format!("word{i}")).collect();
    for key in &keys {
        table.upsert(key);
    }
    for key in &keys {
        let id = table.lookup(key).unwrap();
        assert_eq!(table.get(id).key(), key);
    }
    assert_eq!(table.len(), 50);
}

#[test]
fn unlink_removes_from_lookup_but_keeps_ids_distinct() {
    let mut table = FreqTable::new(8, 3);
    let a = table.upsert("alpha");
    let b = table.upsert("beta");
    table.unlink(a);
    assert_eq!(table.lookup("alpha"), None);
    assert_eq!(table.lookup("beta"), Some(b));
    assert_eq!(table.len(), 1);
    let c = table.upsert("gamma");
    assert_ne!(c, b);
}

#[test]
fn ids_iterates_live_entries_only() {
    let mut table = FreqTable::new(8, 3);
    let a = table.upsert("alpha");
    let b = table.upsert("beta");
    table.unlink(a);
    let live: Vec<_> = table.ids().collect();
    assert_eq!(live, vec![b]);
}
