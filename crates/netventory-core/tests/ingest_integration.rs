mod common;

use std::collections::HashSet;
use std::sync::Arc;
use std::time::{Duration, Instant};

use netventory_core::*;
use netventory_probe::ProbeError;

use common::{Behavior, BlindLookupStore, FailingStore, MockProber, facts, record};

fn ingestor(prober: Arc<MockProber>, store: Arc<dyn InventoryStore>) -> Ingestor {
    Ingestor::new(prober, store, Classifier::builtin(), IngestConfig::default())
}

fn hostnames(report: &IngestionReport, status: IngestStatus) -> HashSet<String> {
    report
        .bucket(status)
        .iter()
        .filter_map(|o| o.hostname.clone())
        .collect()
}

fn addresses(report: &IngestionReport, status: IngestStatus) -> HashSet<String> {
    report.bucket(status).iter().map(|o| o.address.clone()).collect()
}

#[tokio::test]
async fn test_one_outcome_per_address() {
    let prober = Arc::new(
        MockProber::new()
            .with_device("10.0.0.1", "r1.example", "S1")
            .with_device("10.0.0.3", "r3.example", "S3"),
    );
    let store = Arc::new(MemoryStore::with_records([record("r3.example", "10.0.0.3", "S3")]).unwrap());
    let ingestor = ingestor(prober, store);

    let input = ["10.0.0.1", "10.0.0.2", "10.0.0.3"];
    let report = ingestor.ingest(input).await.unwrap();

    assert_eq!(report.len(), 3);
    let seen: HashSet<_> = report.outcomes().map(|o| o.address.as_str()).collect();
    assert_eq!(seen, input.into_iter().collect());
    assert_eq!(addresses(&report, IngestStatus::Success), HashSet::from(["10.0.0.1".to_string()]));
    assert_eq!(
        addresses(&report, IngestStatus::AlreadyPresent),
        HashSet::from(["10.0.0.3".to_string()])
    );
    assert_eq!(
        addresses(&report, IngestStatus::ConnectionFailure),
        HashSet::from(["10.0.0.2".to_string()])
    );
}

#[tokio::test]
async fn test_failure_isolation() {
    let prober = Arc::new(
        MockProber::new()
            .with_device("10.0.0.1", "r1.example", "S1")
            .with_behavior("10.0.0.2", Behavior::Fail(ProbeError::AuthFailure("bad password".into())))
            .with_device("10.0.0.3", "r3.example", "S3"),
    );
    let store = Arc::new(MemoryStore::new());
    let ingestor = ingestor(prober, store.clone());

    let report = ingestor
        .ingest(["10.0.0.1", "10.0.0.2", "10.0.0.3"])
        .await
        .unwrap();

    assert_eq!(
        hostnames(&report, IngestStatus::Success),
        HashSet::from(["r1.example".to_string(), "r3.example".to_string()])
    );

    let failed = report.outcome_for("10.0.0.2").unwrap();
    assert_eq!(failed.status, IngestStatus::ConnectionFailure);
    assert!(failed.hostname.is_none());
    assert!(failed.reason.as_deref().unwrap().contains("bad password"));

    assert_eq!(store.all().await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_existing_hostname_is_already_present() {
    let prober = Arc::new(MockProber::new().with_device("10.0.0.5", "r1.example", "S5"));
    let store = Arc::new(MemoryStore::with_records([record("r1.example", "10.0.0.1", "S1")]).unwrap());
    let ingestor = ingestor(prober, store.clone());

    let report = ingestor.ingest(["10.0.0.5"]).await.unwrap();

    let outcome = report.outcome_for("10.0.0.5").unwrap();
    assert_eq!(outcome.status, IngestStatus::AlreadyPresent);
    assert_eq!(outcome.hostname.as_deref(), Some("r1.example"));

    let all = store.all().await.unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].address, "10.0.0.1");
}

#[tokio::test]
async fn test_second_run_is_idempotent() {
    let prober = Arc::new(
        MockProber::new()
            .with_device("10.0.0.1", "r1.example", "S1")
            .with_device("10.0.0.2", "r2.example", "S2"),
    );
    let store = Arc::new(MemoryStore::new());
    let ingestor = ingestor(prober, store.clone());
    let input = ["10.0.0.1", "10.0.0.2"];

    let first = ingestor.ingest(input).await.unwrap();
    let second = ingestor.ingest(input).await.unwrap();

    assert_eq!(first.bucket(IngestStatus::Success).len(), 2);
    assert!(second.bucket(IngestStatus::Success).is_empty());
    assert_eq!(
        hostnames(&second, IngestStatus::AlreadyPresent),
        hostnames(&first, IngestStatus::Success)
    );
    assert_eq!(store.all().await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_lab_device_scenario() {
    let prober = Arc::new(MockProber::new().with_device("192.168.1.1", "wrcsmalbj4p1", "JN11AB"));
    let store = Arc::new(MemoryStore::new());
    let ingestor = ingestor(prober, store.clone());

    let report = ingestor.ingest(["192.168.1.1"]).await.unwrap();
    assert_eq!(
        report.outcome_for("192.168.1.1").map(|o| o.status),
        Some(IngestStatus::Success)
    );

    let stored = store.find_by_hostname("wrcsmalbj4p1").await.unwrap().unwrap();
    assert_eq!(stored.device_type, "LAB device");
    assert_eq!(stored.address, "192.168.1.1");
    assert_eq!(stored.vendor, "Juniper Networks");
    assert_eq!(stored.serial_number, "JN11AB");
}

#[tokio::test]
async fn test_unmatched_hostname_stored_as_unknown_type() {
    let prober = Arc::new(MockProber::new().with_device("10.9.9.9", "randomhost", "S9"));
    let store = Arc::new(MemoryStore::new());
    let ingestor = ingestor(prober, store.clone());

    let outcome = ingestor.ingest_one("10.9.9.9").await.unwrap();
    assert_eq!(outcome.status, IngestStatus::Success);

    let stored = store.find_by_hostname("randomhost").await.unwrap().unwrap();
    assert_eq!(stored.device_type, UNKNOWN_DEVICE_TYPE);
}

#[tokio::test]
async fn test_same_hostname_twice_in_one_run() {
    let prober = Arc::new(
        MockProber::new()
            .with_device("10.0.0.1", "r1.example", "S1")
            .with_device("10.0.1.1", "r1.example", "S1"),
    );
    let store = Arc::new(MemoryStore::new());
    let ingestor = ingestor(prober, store.clone());

    let report = ingestor.ingest(["10.0.0.1", "10.0.1.1"]).await.unwrap();

    assert_eq!(report.bucket(IngestStatus::Success).len(), 1);
    assert_eq!(report.bucket(IngestStatus::AlreadyPresent).len(), 1);
    assert_eq!(store.all().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_insert_collision_on_hostname_is_already_present() {
    let prober = Arc::new(MockProber::new().with_device("10.0.0.5", "r1.example", "S5"));
    let store = Arc::new(BlindLookupStore {
        inner: MemoryStore::with_records([record("r1.example", "10.0.0.1", "S1")]).unwrap(),
    });
    let ingestor = ingestor(prober, store.clone());

    let report = ingestor.ingest(["10.0.0.5"]).await.unwrap();

    let outcome = report.outcome_for("10.0.0.5").unwrap();
    assert_eq!(outcome.status, IngestStatus::AlreadyPresent);
    assert_eq!(outcome.hostname.as_deref(), Some("r1.example"));
    assert!(outcome.reason.is_none());

    let single = ingestor.ingest_one("10.0.0.5").await.unwrap();
    assert_eq!(single.status, IngestStatus::AlreadyPresent);

    let all = store.all().await.unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].address, "10.0.0.1");
}

#[tokio::test]
async fn test_shared_address_or_serial_is_already_present() {
    let prober = Arc::new(
        MockProber::new()
            .with_device("10.0.0.5", "new-name", "S9")
            .with_device("10.0.0.6", "other-name", "S5"),
    );
    let store = Arc::new(MemoryStore::with_records([record("old-name", "10.0.0.5", "S5")]).unwrap());
    let ingestor = ingestor(prober, store.clone());

    let report = ingestor.ingest(["10.0.0.5", "10.0.0.6"]).await.unwrap();

    let by_address = report.outcome_for("10.0.0.5").unwrap();
    assert_eq!(by_address.status, IngestStatus::AlreadyPresent);
    assert_eq!(by_address.hostname.as_deref(), Some("new-name"));

    let by_serial = report.outcome_for("10.0.0.6").unwrap();
    assert_eq!(by_serial.status, IngestStatus::AlreadyPresent);
    assert_eq!(by_serial.hostname.as_deref(), Some("other-name"));

    let all = store.all().await.unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].hostname, "old-name");
}

#[tokio::test]
async fn test_input_is_normalized() {
    let prober = Arc::new(MockProber::new().with_device("10.0.0.1", "r1.example", "S1"));
    let ingestor = ingestor(prober.clone(), Arc::new(MemoryStore::new()));

    let report = ingestor
        .ingest([" 10.0.0.1 ", "", "10.0.0.1", "   "])
        .await
        .unwrap();

    assert_eq!(report.len(), 1);
    assert_eq!(prober.calls(), 1);
}

#[tokio::test]
async fn test_empty_input_skips_store() {
    let ingestor = ingestor(Arc::new(MockProber::new()), Arc::new(FailingStore { down: true }));

    let report = ingestor.ingest(Vec::<String>::new()).await.unwrap();
    assert!(report.is_empty());
}

#[tokio::test]
async fn test_store_down_fails_whole_run() {
    let prober = Arc::new(MockProber::new());
    let ingestor = ingestor(prober.clone(), Arc::new(FailingStore { down: true }));

    let err = ingestor.ingest(["10.0.0.1", "10.0.0.2"]).await.unwrap_err();

    assert!(matches!(err, CoreError::StoreUnavailable(_)));
    assert_eq!(prober.calls(), 0);
}

#[tokio::test]
async fn test_store_failing_mid_run_returns_error() {
    let prober = Arc::new(
        MockProber::new()
            .with_device("10.0.0.1", "r1.example", "S1")
            .with_behavior("10.0.0.2", Behavior::Hang),
    );
    let ingestor = ingestor(prober, Arc::new(FailingStore { down: false }));

    let result = tokio::time::timeout(
        Duration::from_secs(5),
        ingestor.ingest(["10.0.0.1", "10.0.0.2"]),
    )
    .await
    .expect("hung pipeline must be aborted");

    assert!(matches!(result, Err(CoreError::StoreUnavailable(_))));
}

#[tokio::test]
async fn test_probe_failures_never_touch_store() {
    // every probe fails, so a broken store is never read
    let ingestor = ingestor(Arc::new(MockProber::new()), Arc::new(FailingStore { down: false }));

    let report = ingestor.ingest(["10.0.0.1", "10.0.0.2"]).await.unwrap();
    assert_eq!(report.bucket(IngestStatus::ConnectionFailure).len(), 2);
}

#[tokio::test]
async fn test_concurrency_is_bounded() {
    let mut prober = MockProber::new();
    let mut input = Vec::new();
    for i in 0..12 {
        let address = format!("10.0.0.{i}");
        prober = prober.with_behavior(
            &address,
            Behavior::Slow(facts(&format!("r{i}.example"), &format!("S{i}")), Duration::from_millis(20)),
        );
        input.push(address);
    }
    let prober = Arc::new(prober);

    let config = IngestConfig {
        concurrency: 3,
        deadline_secs: None,
    };
    let ingestor = Ingestor::new(prober.clone(), Arc::new(MemoryStore::new()), Classifier::builtin(), config);

    let report = ingestor.ingest(&input).await.unwrap();

    assert_eq!(report.bucket(IngestStatus::Success).len(), 12);
    assert!(prober.max_in_flight() <= 3);
    assert!(prober.max_in_flight() >= 2);
}

#[tokio::test]
async fn test_deadline_marks_hung_probe_failed() {
    let prober = Arc::new(
        MockProber::new()
            .with_device("10.0.0.1", "r1.example", "S1")
            .with_behavior("10.0.0.2", Behavior::Hang),
    );
    let config = IngestConfig {
        concurrency: 4,
        deadline_secs: Some(1),
    };
    let ingestor = Ingestor::new(prober, Arc::new(MemoryStore::new()), Classifier::builtin(), config);

    let started = Instant::now();
    let report = ingestor.ingest(["10.0.0.1", "10.0.0.2"]).await.unwrap();

    assert!(started.elapsed() < Duration::from_secs(5));
    assert_eq!(
        report.outcome_for("10.0.0.1").map(|o| o.status),
        Some(IngestStatus::Success)
    );
    let hung = report.outcome_for("10.0.0.2").unwrap();
    assert_eq!(hung.status, IngestStatus::ConnectionFailure);
    assert_eq!(hung.reason.as_deref(), Some(CANCELLED_REASON));
}

#[tokio::test]
async fn test_external_cancellation() {
    let prober = Arc::new(
        MockProber::new()
            .with_behavior("10.0.0.1", Behavior::Hang)
            .with_behavior("10.0.0.2", Behavior::Hang),
    );
    let ingestor = ingestor(prober, Arc::new(MemoryStore::new()));

    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        trigger.cancel();
    });

    let report = ingestor
        .ingest_with_cancel(["10.0.0.1", "10.0.0.2"], cancel)
        .await
        .unwrap();

    assert_eq!(report.bucket(IngestStatus::ConnectionFailure).len(), 2);
    assert!(
        report
            .outcomes()
            .all(|o| o.reason.as_deref() == Some(CANCELLED_REASON))
    );
}

#[tokio::test]
async fn test_ingest_one_matches_bulk_labelling() {
    let prober = Arc::new(
        MockProber::new()
            .with_device("10.0.0.1", "nyc01jn1", "S1")
            .with_behavior("10.0.0.2", Behavior::Fail(ProbeError::Unreachable("timed out".into()))),
    );
    let store = Arc::new(MemoryStore::new());
    let ingestor = ingestor(prober, store.clone());

    let added = ingestor.ingest_one("10.0.0.1").await.unwrap();
    assert_eq!(added.status, IngestStatus::Success);
    assert_eq!(
        store.find_by_hostname("nyc01jn1").await.unwrap().unwrap().device_type,
        "MPLS PE/BGP RR"
    );

    let again = ingestor.ingest_one("10.0.0.1").await.unwrap();
    assert_eq!(again.status, IngestStatus::AlreadyPresent);

    let failed = ingestor.ingest_one("10.0.0.2").await.unwrap();
    assert_eq!(failed.status, IngestStatus::ConnectionFailure);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_overlapping_runs_never_duplicate_hostnames() {
    let mut prober = MockProber::new();
    let mut input = Vec::new();
    for i in 0..20 {
        let address = format!("10.1.0.{i}");
        prober = prober.with_device(&address, &format!("r{i}.example"), &format!("S{i}"));
        input.push(address);
    }
    let prober = Arc::new(prober);
    let store: Arc<dyn InventoryStore> = Arc::new(MemoryStore::new());

    let a = ingestor(prober.clone(), store.clone());
    let b = ingestor(prober, store.clone());
    let mut reversed = input.clone();
    reversed.reverse();

    let (first, second) = tokio::join!(a.ingest(&input), b.ingest(&reversed));
    let (first, second) = (first.unwrap(), second.unwrap());

    let all = store.all().await.unwrap();
    let unique: HashSet<_> = all.iter().map(|r| r.hostname.clone()).collect();
    assert_eq!(all.len(), 20);
    assert_eq!(unique.len(), 20);

    // every hostname is reported as a new record exactly once across both runs
    let successes =
        first.bucket(IngestStatus::Success).len() + second.bucket(IngestStatus::Success).len();
    assert_eq!(successes, 20);
    assert_eq!(first.len(), 20);
    assert_eq!(second.len(), 20);
}

#[tokio::test]
async fn test_json_store_backed_run() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("inventory.json");

    let prober = Arc::new(MockProber::new().with_device("10.0.0.1", "nyc01jp1", "S1"));
    {
        let store = Arc::new(JsonFileStore::open(&path).await.unwrap());
        let report = ingestor(prober.clone(), store).ingest(["10.0.0.1"]).await.unwrap();
        assert_eq!(report.bucket(IngestStatus::Success).len(), 1);
    }

    let store = Arc::new(JsonFileStore::open(&path).await.unwrap());
    let report = ingestor(prober, store).ingest(["10.0.0.1"]).await.unwrap();
    assert_eq!(report.bucket(IngestStatus::AlreadyPresent).len(), 1);
}
