//! End-to-end tests for the firmware query runner
//!
//! Loads the test database from disk and drives the runner against the
//! mock transport.
//!
//! Run with: cargo test -p fwq-tests --test runner_e2e_test

mod common;

use std::sync::Arc;
use std::time::Duration;

use fwq_core::{
    queries, EcuAddress, EcuKind, FwQueryConfig, FwQueryRunner, FwVersion, MockQueryTransport,
};
use pretty_assertions::assert_eq;

use common::{TestDatabase, DATABASE};

/// Test harness with the database loaded and a mock bus
struct TestHarness {
    config: Arc<FwQueryConfig>,
    transport: Arc<MockQueryTransport>,
}

impl TestHarness {
    fn new(num_pandas: usize) -> Self {
        let db = TestDatabase::new(DATABASE);
        let config = FwQueryConfig::load(db.path()).unwrap();
        Self {
            config: Arc::new(config),
            transport: Arc::new(MockQueryTransport::new(num_pandas)),
        }
    }

    fn runner(&self) -> FwQueryRunner {
        FwQueryRunner::new(self.config.clone(), self.transport.clone())
            .with_timeout(Duration::from_millis(10))
    }
}

#[tokio::test]
async fn test_batches_issued_in_plan_order() {
    let harness = TestHarness::new(1);
    harness.runner().run().await;

    let issued: Vec<(u8, Vec<EcuAddress>)> = harness
        .transport
        .issued()
        .into_iter()
        .map(|q| (q.bus, q.batch))
        .collect();

    let everything = vec![
        EcuAddress::physical(0x700),
        EcuAddress::physical(0x7D2),
        EcuAddress::physical(0x7A1),
        EcuAddress::physical(0x7E0),
        EcuAddress::physical(0x7B0),
        EcuAddress::physical(0x791),
        EcuAddress::physical(0x730),
    ];
    assert_eq!(
        issued,
        vec![
            (
                0,
                vec![
                    EcuAddress::physical(0x700),
                    EcuAddress::physical(0x7D2),
                    EcuAddress::physical(0x7A1),
                    EcuAddress::physical(0x7E0),
                    EcuAddress::physical(0x7B0),
                ]
            ),
            // Empty parallel batch of the radar/camera request is skipped
            (0, vec![EcuAddress::functional(0x750, 0x0F)]),
            (0, vec![EcuAddress::functional(0x750, 0x6D)]),
            (1, everything),
            (1, vec![EcuAddress::functional(0x750, 0x0F)]),
            (1, vec![EcuAddress::functional(0x750, 0x6D)]),
        ]
    );
}

#[tokio::test]
async fn test_auxiliary_skipped_with_one_panda() {
    let harness = TestHarness::new(1);
    harness.runner().run().await;
    let buses: Vec<u8> = harness.transport.issued().iter().map(|q| q.bus).collect();
    assert!(!buses.contains(&4));

    let harness = TestHarness::new(2);
    harness.runner().run().await;
    let issued = harness.transport.issued();
    let last = issued.last().unwrap();
    assert_eq!(last.bus, 4);
    assert_eq!(last.batch.len(), 5);
}

#[tokio::test]
async fn test_multiplexing_follows_requests() {
    let harness = TestHarness::new(2);
    harness.runner().run().await;
    assert_eq!(
        harness.transport.multiplexing_changes(),
        vec![(0, true), (1, false), (4, true)]
    );
}

#[tokio::test]
async fn test_responses_attributed_to_ecus() {
    let harness = TestHarness::new(1);
    let transport = &harness.transport;
    transport.add_response(
        0,
        EcuAddress::physical(0x7E0),
        queries::OBD_VERSION_REQUEST,
        &b"ENG-A-1.0"[..],
    );
    transport.add_response(
        0,
        EcuAddress::functional(0x750, 0x6D),
        queries::UDS_VERSION_REQUEST,
        &b"CAM-4.0"[..],
    );
    transport.add_response(
        1,
        EcuAddress::physical(0x730),
        queries::MANUFACTURER_SOFTWARE_VERSION_REQUEST,
        &b"ADAS-0.1"[..],
    );
    // Scripted for the wrong bus, never answered
    transport.add_response(
        1,
        EcuAddress::physical(0x7B0),
        queries::OBD_VERSION_REQUEST,
        &b"ABS-7.4"[..],
    );

    let records = harness.runner().run().await;
    let summary: Vec<(Option<EcuKind>, u32, u8, usize, bool)> = records
        .iter()
        .map(|r| (r.kind, r.rx_addr, r.bus, r.request_index, r.logging))
        .collect();
    assert_eq!(
        summary,
        vec![
            (Some(EcuKind::Engine), 0x7E8, 0, 0, false),
            (Some(EcuKind::FwdCamera), 0x758, 0, 1, false),
            // Extra ECU keeps its configured kind
            (Some(EcuKind::Adas), 0x738, 1, 2, true),
        ]
    );
    assert_eq!(records[0].version, FwVersion::from(&b"ENG-A-1.0"[..]));
    assert_eq!(records[1].address, EcuAddress::functional(0x750, 0x6D));
}

#[tokio::test]
async fn test_disconnected_bus_yields_nothing() {
    let harness = TestHarness::new(1);
    harness.transport.set_connected(false);
    let records = harness.runner().run().await;
    assert!(records.is_empty());
    assert!(harness.transport.issued().is_empty());
}
