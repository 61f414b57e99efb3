//! # Confirmation Flows
//!
//! Status polling against the stub ledger through the HTTP ledger client:
//! background watches spawned by the pipeline, direct watches, and
//! cancellation on node shutdown.

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use shared_types::{DocumentId, DocumentMetadata, DocumentRecord, LedgerTxId};
    use tokio::sync::watch;

    use aw_02_ledger_client::{HttpLedgerClient, LedgerClient, LedgerConfig};
    use aw_03_index_store::{IndexStore, InMemoryIndexStore};
    use aw_05_publish_pipeline::{ConfirmationWatcher, PollPolicy, PublishError, WatchOutcome};
    use node_runtime::NodeConfig;

    use crate::fixtures::{container, StubArchive, StubLedger, PDF};

    fn fast_policy(max_attempts: u32) -> PollPolicy {
        PollPolicy {
            max_attempts,
            initial_delay: Duration::from_millis(10),
            max_delay: Duration::from_millis(20),
            multiplier: 2.0,
        }
    }

    fn watching(max_attempts: u32) -> impl FnOnce(&mut NodeConfig) {
        move |config| {
            config.pipeline.watch_confirmations = true;
            config.pipeline.poll_policy = fast_policy(max_attempts);
        }
    }

    fn id() -> DocumentId {
        DocumentId::parse("2101.00001").unwrap()
    }

    async fn wait_for_status(store: &Arc<dyn IndexStore>, expected: u16) -> bool {
        for _ in 0..200 {
            if let Ok(Some(record)) = store.get(&id()).await {
                if record.ledger_status == expected {
                    return true;
                }
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        false
    }

    #[tokio::test]
    async fn test_background_watch_records_confirmation() {
        let archive = StubArchive::new().with_document("2101.00001", PDF);
        let ledger = StubLedger::new();
        ledger.set_broadcast_status(208);
        ledger.queue_status_codes([202, 202, 200]);
        let node = container(&archive, &ledger, watching(10)).await;

        node.pipeline.publish(&id()).await.unwrap();

        assert!(wait_for_status(&node.store, 200).await);
        assert_eq!(ledger.poll_count(), 3);
    }

    #[tokio::test]
    async fn test_shutdown_stops_background_watch() {
        let archive = StubArchive::new().with_document("2101.00001", PDF);
        let ledger = StubLedger::new();
        let node = container(&archive, &ledger, watching(10_000)).await;

        node.pipeline.publish(&id()).await.unwrap();
        // 202 forever: the record moves from the broadcast code to pending.
        assert!(wait_for_status(&node.store, 202).await);

        node.shutdown();
        tokio::time::sleep(Duration::from_millis(100)).await;
        let settled = ledger.poll_count();
        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(ledger.poll_count(), settled);
    }

    #[tokio::test]
    async fn test_no_watch_when_disabled() {
        let archive = StubArchive::new().with_document("2101.00001", PDF);
        let ledger = StubLedger::new();
        let node = container(&archive, &ledger, |_| {}).await;

        node.pipeline.publish(&id()).await.unwrap();
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(ledger.poll_count(), 0);
    }

    // =========================================================================
    // DIRECT WATCHES
    // =========================================================================

    async fn direct_watcher(ledger: &StubLedger) -> (ConfirmationWatcher, Arc<dyn IndexStore>) {
        let url = ledger.spawn().await;
        let client: Arc<dyn LedgerClient> = Arc::new(
            HttpLedgerClient::new(LedgerConfig {
                gateway_url: url,
                request_timeout: Duration::from_secs(5),
            })
            .unwrap(),
        );
        let record = DocumentRecord::new(
            id(),
            DocumentMetadata {
                authors: Vec::new(),
                title: "On Graphs and Walks".into(),
                summary: "We study walks.".into(),
                published: "2021-01-01T00:00:00Z".into(),
                updated: "2021-01-02T00:00:00Z".into(),
                content_link: "http://arxiv.org/pdf/2101.00001v1".into(),
            },
            LedgerTxId("tx-1".into()),
            200,
        );
        let store: Arc<dyn IndexStore> = Arc::new(InMemoryIndexStore::with_records([record]));
        let watcher = ConfirmationWatcher::new(client, store.clone(), Duration::from_secs(5));
        (watcher, store)
    }

    #[tokio::test]
    async fn test_direct_watch_until_confirmed() {
        let ledger = StubLedger::new();
        ledger.queue_status_codes([202, 200]);
        let (watcher, store) = direct_watcher(&ledger).await;
        let (_tx, cancel) = watch::channel(false);

        let outcome = watcher
            .watch(&id(), &LedgerTxId("tx-1".into()), &fast_policy(5), cancel)
            .await
            .unwrap();

        let WatchOutcome::Confirmed(status) = outcome else {
            panic!("expected Confirmed");
        };
        assert_eq!(status.code, 200);
        assert_eq!(status.confirmation.unwrap().block_height, 7);
        assert_eq!(store.get(&id()).await.unwrap().unwrap().ledger_status, 200);
    }

    #[tokio::test]
    async fn test_direct_watch_reports_rejection() {
        let ledger = StubLedger::new();
        ledger.queue_status_codes([410]);
        let (watcher, store) = direct_watcher(&ledger).await;
        let (_tx, cancel) = watch::channel(false);

        let outcome = watcher
            .watch(&id(), &LedgerTxId("tx-1".into()), &fast_policy(5), cancel)
            .await
            .unwrap();

        assert_eq!(outcome, WatchOutcome::Rejected { code: 410 });
        assert_eq!(store.get(&id()).await.unwrap().unwrap().ledger_status, 410);
    }

    #[tokio::test]
    async fn test_direct_watch_gives_up_after_max_attempts() {
        let ledger = StubLedger::new();
        let (watcher, _store) = direct_watcher(&ledger).await;
        let (_tx, cancel) = watch::channel(false);

        let err = watcher
            .watch(&id(), &LedgerTxId("tx-1".into()), &fast_policy(3), cancel)
            .await
            .unwrap_err();

        assert!(matches!(err, PublishError::PollTimeout { attempts: 3, .. }));
        assert_eq!(ledger.poll_count(), 3);
    }
}
