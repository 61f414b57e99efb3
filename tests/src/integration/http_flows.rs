//! # HTTP Flows
//!
//! A full node (production adapters, in-memory index) serving its HTTP
//! surface on a loopback port, exercised with a real HTTP client.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use shared_types::DocumentId;
    use tower::ServiceExt;

    use aw_02_ledger_client::MockLedgerClient;
    use aw_03_index_store::{InMemoryIndexStore, IndexStore};
    use aw_04_metadata_fetcher::MockMetadataFetcher;
    use node_runtime::{NodeConfig, SubsystemContainer};

    use crate::fixtures::{identity, StubArchive, StubLedger, TestNode, PDF};

    const ALREADY_UPLOADED: &str = "This arXiv entry is already uploaded.";

    async fn node() -> (TestNode, StubArchive, StubLedger) {
        let archive = StubArchive::new()
            .with_document("2101.00001", PDF)
            .with_document("hep-th/9901001", PDF);
        let ledger = StubLedger::new();
        let node = TestNode::start(&archive, &ledger).await;
        (node, archive, ledger)
    }

    async fn publish(client: &reqwest::Client, node: &TestNode, id: &str) -> (u16, Value) {
        let response = client
            .post(node.url("/new"))
            .json(&json!({ "arXivID": id }))
            .send()
            .await
            .unwrap();
        let status = response.status().as_u16();
        (status, response.json().await.unwrap())
    }

    // =========================================================================
    // PUBLISH
    // =========================================================================

    #[tokio::test]
    async fn test_publish_then_duplicate() {
        let (node, _archive, ledger) = node().await;
        let client = reqwest::Client::new();

        let (status, body) = publish(&client, &node, "2101.00001").await;
        assert_eq!(status, 200);
        assert_eq!(body["status"], "Success");
        assert_eq!(body["txStatus"], 200);
        let tx_id = body["txId"].as_str().unwrap().to_string();
        assert_eq!(tx_id, ledger.received()[0].id);
        assert!(body["msg"].as_str().unwrap().contains(&tx_id));

        let (status, body) = publish(&client, &node, "2101.00001").await;
        assert_eq!(status, 200);
        assert_eq!(body["status"], "Bad Request");
        assert_eq!(body["msg"], ALREADY_UPLOADED);
        assert_eq!(ledger.received().len(), 1);

        node.stop().await.unwrap();
    }

    #[tokio::test]
    async fn test_form_encoded_publish() {
        let (node, _archive, ledger) = node().await;
        let client = reqwest::Client::new();

        let response = client
            .post(node.url("/new"))
            .header("content-type", "application/x-www-form-urlencoded")
            .body("arXivID=hep-th%2F9901001")
            .send()
            .await
            .unwrap();
        assert_eq!(response.status().as_u16(), 200);
        let body: Value = response.json().await.unwrap();
        assert_eq!(body["status"], "Success");
        assert_eq!(ledger.received().len(), 1);
    }

    #[tokio::test]
    async fn test_unknown_document_is_not_found() {
        let (node, _archive, ledger) = node().await;
        let client = reqwest::Client::new();

        let (status, body) = publish(&client, &node, "2101.99999").await;
        assert_eq!(status, 404);
        assert_eq!(body["status"], "Error");
        assert_eq!(body["phase"], "fetch");
        assert!(ledger.received().is_empty());
    }

    #[tokio::test]
    async fn test_invalid_identifier_is_bad_request() {
        let (node, _archive, _ledger) = node().await;
        let client = reqwest::Client::new();

        let (status, _) = publish(&client, &node, "../etc/passwd").await;
        assert_eq!(status, 400);
    }

    #[tokio::test]
    async fn test_rejected_broadcast_is_bad_gateway() {
        let (node, _archive, ledger) = node().await;
        ledger.set_broadcast_status(400);
        let client = reqwest::Client::new();

        let (status, body) = publish(&client, &node, "2101.00001").await;
        assert_eq!(status, 502);
        assert_eq!(body["phase"], "broadcast");

        let exists: Value = client
            .get(node.url("/exists/2101.00001"))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(exists["exists"], false);
    }

    // =========================================================================
    // LOOKUPS
    // =========================================================================

    #[tokio::test]
    async fn test_exists_get_and_list() {
        let (node, _archive, _ledger) = node().await;
        let client = reqwest::Client::new();

        let before: Value = client
            .get(node.url("/exists/hep-th/9901001"))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(before, json!({ "arXivID": "hep-th/9901001", "exists": false }));

        publish(&client, &node, "hep-th/9901001").await;

        let after: Value = client
            .get(node.url("/exists/hep-th/9901001"))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(after["exists"], true);

        let record: Value = client
            .get(node.url("/arXivID/hep-th/9901001"))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(record["documentId"], "hep-th/9901001");
        assert_eq!(record["ledgerStatus"], "200");
        assert_eq!(record["title"], "On Graphs and Walks");
        // Authors persist as a JSON string.
        let authors: Value = serde_json::from_str(record["authors"].as_str().unwrap()).unwrap();
        assert_eq!(authors[0]["name"], "Ada Lovelace");

        let all: Value = client
            .get(node.url("/all"))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(all.as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_status_refresh_reads_ledger() {
        let (node, _archive, ledger) = node().await;
        let client = reqwest::Client::new();

        let response = client
            .post(node.url("/status/2101.00001"))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status().as_u16(), 404);

        publish(&client, &node, "2101.00001").await;
        ledger.queue_status_codes([202]);

        let record: Value = client
            .post(node.url("/status/2101.00001"))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(record["ledgerStatus"], "202");

        let stored = node
            .container
            .store
            .get(&DocumentId::parse("2101.00001").unwrap())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.ledger_status, 202);
    }

    // =========================================================================
    // ORIGIN POLICY AND OPERATIONS
    // =========================================================================

    #[tokio::test]
    async fn test_origin_policy() {
        let (node, _archive, _ledger) = node().await;
        let client = reqwest::Client::new();

        let allowed = client
            .get(node.url("/all"))
            .header("origin", "http://localhost:3000")
            .send()
            .await
            .unwrap();
        assert_eq!(allowed.status().as_u16(), 200);
        assert_eq!(
            allowed.headers()["access-control-allow-origin"],
            "http://localhost:3000"
        );

        let refused = client
            .get(node.url("/all"))
            .header("origin", "https://evil.example")
            .send()
            .await
            .unwrap();
        assert_eq!(refused.status().as_u16(), 403);
    }

    #[tokio::test]
    async fn test_health_and_metrics() {
        arxweave_telemetry::register_metrics().unwrap();
        let (node, _archive, _ledger) = node().await;
        let client = reqwest::Client::new();

        publish(&client, &node, "2101.00001").await;

        let health = client.get(node.url("/health")).send().await.unwrap();
        assert_eq!(health.status().as_u16(), 200);

        let metrics = client
            .get(node.url("/metrics"))
            .send()
            .await
            .unwrap()
            .text()
            .await
            .unwrap();
        assert!(metrics.contains("aw_pipeline_publish_total"));
    }

    #[tokio::test]
    async fn test_stop_is_graceful() {
        let (node, _archive, _ledger) = node().await;
        assert!(node.stop().await.is_ok());
    }

    // =========================================================================
    // ECHOED TRANSACTION ID
    // =========================================================================

    /// The index stores the id the network echoes, not the one computed
    /// locally.
    #[tokio::test]
    async fn test_echoed_transaction_id_is_indexed() {
        let ledger = Arc::new(MockLedgerClient::new().with_echo_tx_id("abc123"));
        let container = SubsystemContainer::from_parts(
            NodeConfig::default(),
            identity(),
            Arc::new(InMemoryIndexStore::new()),
            Arc::new(MockMetadataFetcher::new()),
            ledger.clone(),
        );
        let router = container.gateway().unwrap().router();

        let request = || {
            Request::post("/new")
                .header("content-type", "application/json")
                .body(Body::from(r#"{"arXivID":"2101.00001"}"#))
                .unwrap()
        };

        let response = router.clone().oneshot(request()).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body: Value =
            serde_json::from_slice(&to_bytes(response.into_body(), usize::MAX).await.unwrap())
                .unwrap();
        assert_eq!(body["status"], "Success");
        assert_eq!(body["txId"], "abc123");

        let record = container
            .store
            .get(&DocumentId::parse("2101.00001").unwrap())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(record.ledger_tx_id.as_str(), "abc123");
        assert_eq!(record.ledger_status, 200);

        let response = router.oneshot(request()).await.unwrap();
        let body: Value =
            serde_json::from_slice(&to_bytes(response.into_body(), usize::MAX).await.unwrap())
                .unwrap();
        assert_eq!(body["status"], "Bad Request");
        assert_eq!(body["msg"], ALREADY_UPLOADED);
        assert_eq!(ledger.broadcast_count(), 1);
    }
}
