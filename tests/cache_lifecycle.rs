mod common;

use std::fs;

use common::at;
use tempfile::tempdir;
use wordcloud_core::cache::{
    CacheError, CacheStore, ChangeDetector, CountryFrequencyRecord, DocumentCache, FingerprintEntry, FrequencyCache,
    JsonCacheStore, ITEMS_CACHE_FILE, PROCESSED_CACHE_FILE,
};
use wordcloud_core::document::{Country, DocumentId, Fingerprint, ItemSetId};
use wordcloud_core::types::TokenCounts;

fn sample_caches() -> (DocumentCache, FrequencyCache) {
    let mut documents = DocumentCache::new();
    documents.insert(
        ItemSetId::from(25304),
        DocumentId::from(4411),
        FingerprintEntry {
            fingerprint: Fingerprint::new("2024-05-02T09:12:44+00:00"),
            processed_at: chrono::DateTime::parse_from_rfc3339("2024-06-01T12:00:00.123456789Z")
                .unwrap()
                .with_timezone(&chrono::Utc),
        },
    );
    documents.insert(
        ItemSetId::from(62021),
        DocumentId::from(12),
        FingerprintEntry {
            fingerprint: Fingerprint::from_content("prière".as_bytes()),
            processed_at: at(1_700_000_000),
        },
    );

    let mut frequencies = FrequencyCache::new();
    frequencies.insert(
        Country::from("Togo"),
        CountryFrequencyRecord {
            frequencies: [("islam".to_string(), 52), ("mosquée".to_string(), 3)]
                .into_iter()
                .collect(),
            last_updated: at(1_700_000_100),
        },
    );
    frequencies.insert(
        Country::from("Côte d'Ivoire"),
        CountryFrequencyRecord {
            frequencies: [("abidjan".to_string(), u64::from(u32::MAX) + 7)].into_iter().collect(),
            last_updated: at(1_700_000_200),
        },
    );

    (documents, frequencies)
}

#[test]
fn first_run_loads_empty_caches() {
    let dir = tempdir().unwrap();
    let store = JsonCacheStore::new(dir.path().join("cache"));

    let snapshot = store.load().unwrap();
    assert!(snapshot.documents.is_empty());
    assert!(snapshot.frequencies.is_empty());
}

#[test]
fn save_then_load_round_trips_exactly() {
    let dir = tempdir().unwrap();
    let store = JsonCacheStore::new(dir.path().join("cache"));
    let (documents, frequencies) = sample_caches();

    store.save(&documents, &frequencies).unwrap();
    let snapshot = store.load().unwrap();

    assert_eq!(snapshot.documents, documents);
    assert_eq!(snapshot.frequencies, frequencies);
}

#[test]
fn saved_files_have_documented_shape() {
    let dir = tempdir().unwrap();
    let store = JsonCacheStore::new(dir.path());
    let (documents, frequencies) = sample_caches();
    store.save(&documents, &frequencies).unwrap();

    let items: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(dir.path().join(ITEMS_CACHE_FILE)).unwrap()).unwrap();
    assert_eq!(
        items["25304"]["4411"]["fingerprint"],
        "2024-05-02T09:12:44+00:00"
    );
    assert!(items["25304"]["4411"]["processed_at"].is_string());

    let processed = fs::read_to_string(dir.path().join(PROCESSED_CACHE_FILE)).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&processed).unwrap();
    assert_eq!(parsed["Togo"]["frequencies"]["islam"], 52);
    assert!(parsed["Togo"]["last_updated"].is_string());

    // Non-ASCII is written as-is, not as \u escapes.
    assert!(processed.contains("mosquée"));
    assert!(processed.contains("Côte d'Ivoire"));
    assert!(!processed.contains("\\u"));
}

#[test]
fn saving_twice_is_byte_identical() {
    let dir = tempdir().unwrap();
    let store = JsonCacheStore::new(dir.path());
    let (documents, frequencies) = sample_caches();

    store.save(&documents, &frequencies).unwrap();
    let first = fs::read(dir.path().join(PROCESSED_CACHE_FILE)).unwrap();
    store.save(&documents, &frequencies).unwrap();
    let second = fs::read(dir.path().join(PROCESSED_CACHE_FILE)).unwrap();

    assert_eq!(first, second);
}

#[test]
fn corrupt_cache_fails_fast() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join(PROCESSED_CACHE_FILE), "{\"Togo\": {\"frequencies\": ").unwrap();

    let store = JsonCacheStore::new(dir.path());
    match store.load() {
        Err(CacheError::Corrupt { path, .. }) => {
            assert!(path.ends_with(PROCESSED_CACHE_FILE));
        }
        other => panic!("expected corrupt cache error, got {other:?}"),
    }
}

#[test]
fn wrongly_typed_counts_are_corrupt() {
    let dir = tempdir().unwrap();
    fs::write(
        dir.path().join(PROCESSED_CACHE_FILE),
        r#"{"Togo": {"frequencies": {"islam": 2.5}, "last_updated": "2024-01-01T00:00:00Z"}}"#,
    )
    .unwrap();

    let result = JsonCacheStore::new(dir.path()).load();
    assert!(matches!(result, Err(CacheError::Corrupt { .. })));
}

#[test]
fn reset_policy_discards_corrupt_file() {
    let dir = tempdir().unwrap();
    let (documents, frequencies) = sample_caches();
    JsonCacheStore::new(dir.path()).save(&documents, &frequencies).unwrap();
    fs::write(dir.path().join(ITEMS_CACHE_FILE), "not json").unwrap();

    let snapshot = JsonCacheStore::new(dir.path())
        .with_reset_on_corrupt(true)
        .load()
        .unwrap();

    assert!(snapshot.documents.is_empty());
    assert_eq!(snapshot.frequencies, frequencies);
}

#[test]
fn reads_caches_written_by_previous_tool() {
    let dir = tempdir().unwrap();
    fs::write(
        dir.path().join(ITEMS_CACHE_FILE),
        r#"{
  "9458": {
    "301": {
      "modified_date": "2023-11-20T16:41:03+00:00",
      "processed_date": "2024-01-08T10:02:11.532811+00:00"
    }
  }
}"#,
    )
    .unwrap();
    fs::write(
        dir.path().join(PROCESSED_CACHE_FILE),
        r#"{
  "Togo": {
    "frequencies": {"islam": 50, "mosque": 3},
    "last_updated": "2024-01-08T10:05:00.000001+00:00"
  }
}"#,
    )
    .unwrap();

    let snapshot = JsonCacheStore::new(dir.path()).load().unwrap();
    let entry = snapshot
        .documents
        .get(&ItemSetId::from(9458), &DocumentId::from(301))
        .unwrap();
    assert_eq!(entry.fingerprint.as_str(), "2023-11-20T16:41:03+00:00");

    let togo = snapshot.frequencies.get(&Country::from("Togo")).unwrap();
    let expected: TokenCounts = [("islam".to_string(), 50), ("mosque".to_string(), 3)]
        .into_iter()
        .collect();
    assert_eq!(togo.frequencies, expected);
}

#[test]
fn null_modified_date_from_previous_tool_is_reprocessed() {
    let dir = tempdir().unwrap();
    fs::write(
        dir.path().join(ITEMS_CACHE_FILE),
        r#"{
  "9458": {
    "301": {"modified_date": null, "processed_date": "2024-01-08T10:02:11.532811+00:00"},
    "302": {"modified_date": "2023-11-20T16:41:03+00:00", "processed_date": "2024-01-08T10:02:11.532811+00:00"}
  }
}"#,
    )
    .unwrap();

    let mut snapshot = JsonCacheStore::new(dir.path()).load().unwrap();
    assert_eq!(snapshot.documents.len(), 2);

    let detector = ChangeDetector::new(common::clock(500));
    let set = ItemSetId::from(9458);
    assert!(detector.detect(
        &mut snapshot.documents,
        &set,
        &DocumentId::from(301),
        &Fingerprint::from_content(b"sermon du vendredi"),
    ));
    assert!(!detector.detect(
        &mut snapshot.documents,
        &set,
        &DocumentId::from(302),
        &Fingerprint::new("2023-11-20T16:41:03+00:00"),
    ));
}

#[test]
fn unsaved_run_leaves_previous_state() {
    let dir = tempdir().unwrap();
    let store = JsonCacheStore::new(dir.path());
    let (documents, frequencies) = sample_caches();
    store.save(&documents, &frequencies).unwrap();
    let before = fs::read(dir.path().join(PROCESSED_CACHE_FILE)).unwrap();

    // Mutate in memory, then "crash" without saving.
    let mut snapshot = store.load().unwrap();
    snapshot.frequencies.insert(
        Country::from("Niger"),
        CountryFrequencyRecord {
            frequencies: TokenCounts::from_tokens(["sahel", "sahel"]),
            last_updated: at(0),
        },
    );
    drop(snapshot);

    assert_eq!(fs::read(dir.path().join(PROCESSED_CACHE_FILE)).unwrap(), before);
    let leftovers: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
    assert_eq!(leftovers.len(), 2, "no temp files left behind");
}
