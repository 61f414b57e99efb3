//! # Publish Flows
//!
//! The publish pipeline driven through the production HTTP adapters: the
//! arXiv fetcher downloads from the stub archive, the ledger client quotes
//! and broadcasts against the stub ledger, records land in the in-memory
//! index.
//!
//! ## Flow Tested:
//!
//! 1. **Fetcher (4) → Ledger (2)**: the fee is quoted for the exact payload
//!    that gets signed
//! 2. **Ledger (2) → Index (3)**: the index references the broadcast id
//! 3. **Index (3) → Pipeline (5)**: an existing record short-circuits every
//!    network call

#[cfg(test)]
mod tests {
    use base64::engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD};
    use base64::Engine;
    use shared_types::DocumentId;

    use aw_02_ledger_client::DocumentTags;
    use aw_03_index_store::IndexStore;
    use aw_05_publish_pipeline::{PublishError, PublishOutcome};

    use crate::fixtures::{container, StubArchive, StubLedger, PDF};

    fn id(raw: &str) -> DocumentId {
        DocumentId::parse(raw).unwrap()
    }

    // =========================================================================
    // HAPPY PATH
    // =========================================================================

    #[tokio::test]
    async fn test_publish_signs_fetched_pdf_and_indexes_broadcast_id() {
        let archive = StubArchive::new().with_document("2101.00001", PDF);
        let ledger = StubLedger::new();
        let node = container(&archive, &ledger, |_| {}).await;

        let outcome = node.pipeline.publish(&id("2101.00001")).await.unwrap();
        let PublishOutcome::Published(receipt) = outcome else {
            panic!("expected Published");
        };

        let received = ledger.received();
        assert_eq!(received.len(), 1);
        let envelope = &received[0];

        // Payload is the base64 text of the PDF, priced byte for byte.
        let payload = URL_SAFE_NO_PAD.decode(&envelope.data).unwrap();
        assert_eq!(payload, STANDARD.encode(PDF).into_bytes());
        assert_eq!(ledger.quoted_sizes(), vec![payload.len() as u64]);
        assert_eq!(envelope.data_size, payload.len().to_string());
        assert_eq!(
            envelope.reward,
            (payload.len() as u128 * ledger.fee_per_byte()).to_string()
        );
        assert_eq!(receipt.byte_size, payload.len() as u64);

        // Tags carry the fetched metadata.
        let tags = DocumentTags::parse(&envelope.decoded_tags().unwrap()).unwrap();
        assert_eq!(tags.document_id, id("2101.00001"));
        assert_eq!(tags.metadata.title, "On Graphs and Walks");
        assert_eq!(tags.metadata.authors.len(), 2);

        // Index references the broadcast transaction.
        let record = node.store.get(&id("2101.00001")).await.unwrap().unwrap();
        assert_eq!(record.ledger_tx_id.as_str(), envelope.id);
        assert_eq!(record.ledger_tx_id, receipt.tx_id);
        assert_eq!(record.ledger_status, 200);
        assert!(record.content_link.ends_with("/pdf/2101.00001v1"));
    }

    #[tokio::test]
    async fn test_duplicate_publish_makes_no_network_calls() {
        let archive = StubArchive::new().with_document("2101.00001", PDF);
        let ledger = StubLedger::new();
        let node = container(&archive, &ledger, |_| {}).await;

        node.pipeline.publish(&id("2101.00001")).await.unwrap();
        let queries = archive.query_count();

        let second = node.pipeline.publish(&id("2101.00001")).await.unwrap();
        assert!(matches!(second, PublishOutcome::AlreadyPublished(_)));
        assert_eq!(archive.query_count(), queries);
        assert_eq!(ledger.quoted_sizes().len(), 1);
        assert_eq!(ledger.received().len(), 1);
    }

    #[tokio::test]
    async fn test_old_style_identifier() {
        let archive = StubArchive::new().with_document("hep-th/9901001", PDF);
        let ledger = StubLedger::new();
        let node = container(&archive, &ledger, |_| {}).await;

        node.pipeline.publish(&id("hep-th/9901001")).await.unwrap();

        let record = node.store.get(&id("hep-th/9901001")).await.unwrap().unwrap();
        assert!(record.content_link.ends_with("/pdf/hep-th/9901001v1"));
        assert_eq!(archive.download_count(), 1);
    }

    // =========================================================================
    // REFUSALS AND RETRIES
    // =========================================================================

    #[tokio::test]
    async fn test_rejected_broadcast_is_retryable_with_same_transaction() {
        let archive = StubArchive::new().with_document("2101.00001", PDF);
        let ledger = StubLedger::new();
        ledger.set_broadcast_status(400);
        let node = container(&archive, &ledger, |_| {}).await;

        let err = node.pipeline.publish(&id("2101.00001")).await.unwrap_err();
        assert!(matches!(
            err,
            PublishError::BroadcastRejected { status: 400, .. }
        ));
        assert!(node.store.list().await.unwrap().is_empty());

        // Same content and key produce the same transaction on retry.
        ledger.set_broadcast_status(200);
        let outcome = node.pipeline.publish(&id("2101.00001")).await.unwrap();
        let PublishOutcome::Published(receipt) = outcome else {
            panic!("expected Published");
        };
        let received = ledger.received();
        assert_eq!(received.len(), 2);
        assert_eq!(received[0].id, received[1].id);
        assert_eq!(receipt.tx_id.as_str(), received[1].id);
    }

    #[tokio::test]
    async fn test_already_processed_broadcast_is_indexed_once() {
        let archive = StubArchive::new().with_document("2101.00001", PDF);
        let ledger = StubLedger::new();
        ledger.set_broadcast_status(208);
        let node = container(&archive, &ledger, |_| {}).await;

        let outcome = node.pipeline.publish(&id("2101.00001")).await.unwrap();
        let PublishOutcome::Published(receipt) = outcome else {
            panic!("expected Published");
        };
        assert_eq!(receipt.status, 208);

        let records = node.store.list().await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].ledger_status, 208);
    }

    #[tokio::test]
    async fn test_unknown_document_never_reaches_ledger() {
        let archive = StubArchive::new();
        let ledger = StubLedger::new();
        let node = container(&archive, &ledger, |_| {}).await;

        let err = node.pipeline.publish(&id("2101.99999")).await.unwrap_err();
        assert!(err.is_not_found());
        assert!(!err.is_reconciliation_gap());
        assert!(ledger.quoted_sizes().is_empty());
        assert!(ledger.received().is_empty());
        assert_eq!(archive.download_count(), 0);
    }

    #[tokio::test]
    async fn test_concurrent_publishes_index_once() {
        let archive = StubArchive::new().with_document("2101.00001", PDF);
        let ledger = StubLedger::new();
        let node = std::sync::Arc::new(container(&archive, &ledger, |_| {}).await);

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let node = node.clone();
                tokio::spawn(async move { node.pipeline.publish(&id("2101.00001")).await })
            })
            .collect();

        for handle in handles {
            assert!(handle.await.unwrap().is_ok());
        }

        let records = node.store.list().await.unwrap();
        assert_eq!(records.len(), 1);
        // Every run that reached the ledger broadcast the same transaction.
        let received = ledger.received();
        assert!(!received.is_empty());
        assert!(received.iter().all(|env| env.id == received[0].id));
        assert_eq!(records[0].ledger_tx_id.as_str(), received[0].id);
    }
}
