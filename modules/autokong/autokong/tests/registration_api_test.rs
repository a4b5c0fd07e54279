use autokong::ApiRegistrarV1;
use autokong::test_support::{AppHarness, DECODE_FAILURE_MESSAGE, unreachable_base_url};
use http::Method;
use serde_json::json;

fn orders_body() -> serde_json::Value {
    json!({
        "url": "http://svc:9000",
        "name": "orders",
        "path": "/orders",
        "groups": "team-a"
    })
}

fn pairs(items: &[(&str, &str)]) -> Vec<(String, String)> {
    items
        .iter()
        .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
        .collect()
}

// Full happy path: four calls in order with the literal fields.
#[tokio::test]
async fn add_issues_four_calls_in_order() {
    let h = AppHarness::builder().build().await;

    h.relay_api()
        .add()
        .with_json(&orders_body())
        .expect_status(200)
        .await
        .assert_body_eq("Registered API autokong-orders");

    let calls = h.kong().recorded_requests().await;
    let summary: Vec<(&str, &str)> = calls
        .iter()
        .map(|c| (c.method.as_str(), c.path.as_str()))
        .collect();
    assert_eq!(
        summary,
        [
            ("DELETE", "/apis/autokong-orders"),
            ("POST", "/apis"),
            ("POST", "/apis/autokong-orders/plugins"),
            ("POST", "/apis/autokong-orders/plugins"),
        ]
    );

    assert!(calls[0].body.is_empty());
    assert_eq!(
        calls[1].form(),
        pairs(&[
            ("name", "autokong-orders"),
            ("request_path", "/orders"),
            ("strip_request_path", "true"),
            ("upstream_url", "http://svc:9000"),
        ])
    );
    assert_eq!(
        calls[2].form(),
        pairs(&[("config.key_names", "X-apikey"), ("name", "key-auth")])
    );
    assert_eq!(
        calls[3].form(),
        pairs(&[("config.whitelist", "team-a"), ("name", "acl")])
    );
}

#[tokio::test]
async fn every_call_is_form_encoded() {
    let h = AppHarness::builder().build().await;

    h.relay_api()
        .add()
        .with_json(&orders_body())
        .expect_status(200)
        .await;

    let calls = h.kong().recorded_requests().await;
    assert_eq!(calls.len(), 4);
    for call in &calls {
        assert_eq!(
            call.content_type.as_deref(),
            Some("application/x-www-form-urlencoded"),
            "{} {}",
            call.method,
            call.path
        );
    }
}

#[tokio::test]
async fn response_is_plain_text() {
    let h = AppHarness::builder().build().await;

    let resp = h
        .relay_api()
        .add()
        .with_json(&orders_body())
        .expect_status(200)
        .await;

    let content_type = resp
        .headers()
        .get(http::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap();
    assert!(content_type.starts_with("text/plain"), "{content_type}");
}

// Legacy quirk: undecodable body still runs the whole sequence against `autokong-`.
#[tokio::test]
async fn undecodable_body_still_registers_empty_entry() {
    let h = AppHarness::builder().build().await;

    let resp = h
        .relay_api()
        .add()
        .with_raw_body("{this is not json")
        .expect_status(200)
        .await;

    assert_eq!(
        resp.text(),
        format!("{DECODE_FAILURE_MESSAGE}Registered API autokong-")
    );

    let calls = h.kong().recorded_requests().await;
    assert_eq!(calls.len(), 4);
    assert_eq!(calls[0].path, "/apis/autokong-");
    assert_eq!(calls[1].form_value("name").as_deref(), Some("autokong-"));
    assert_eq!(calls[1].form_value("upstream_url").as_deref(), Some(""));
    assert_eq!(calls[3].form_value("config.whitelist").as_deref(), Some(""));
}

#[tokio::test]
async fn empty_body_is_a_decode_failure() {
    let h = AppHarness::builder().build().await;

    h.relay_api()
        .add()
        .expect_status(200)
        .await
        .assert_body_contains(DECODE_FAILURE_MESSAGE);

    assert_eq!(h.kong().recorded_requests().await.len(), 4);
}

// Deleting an entry that does not exist yet is not an error.
#[tokio::test]
async fn missing_entry_on_delete_is_fine() {
    let h = AppHarness::builder().build().await;
    h.kong().respond(
        "DELETE",
        "/apis/autokong-orders",
        404,
        r#"{"message":"Not found"}"#,
    );

    h.relay_api()
        .add()
        .with_json(&orders_body())
        .expect_status(200)
        .await
        .assert_body_eq("Registered API autokong-orders");
}

// Only the final call decides the message.
#[tokio::test]
async fn earlier_gateway_failures_do_not_change_the_result() {
    let h = AppHarness::builder().build().await;
    h.kong().respond(
        "POST",
        "/apis",
        409,
        r#"{"name":"already exists with value 'autokong-orders'"}"#,
    );

    h.relay_api()
        .add()
        .with_json(&orders_body())
        .expect_status(200)
        .await
        .assert_body_eq("Registered API autokong-orders");

    assert_eq!(h.kong().recorded_requests().await.len(), 4);
}

#[tokio::test]
async fn failing_acl_call_is_reported() {
    let h = AppHarness::builder().build().await;
    h.kong().respond(
        "POST",
        "/apis/autokong-orders/plugins",
        500,
        r#"{"message":"An unexpected error occurred"}"#,
    );

    let resp = h
        .relay_api()
        .add()
        .with_json(&orders_body())
        .expect_status(200)
        .await;

    let body = resp.text();
    assert!(
        body.starts_with("Failed to register the API with error POST"),
        "{body}"
    );
    assert!(body.contains("/apis/autokong-orders/plugins"), "{body}");
    assert!(body.contains("500"), "{body}");
    assert_eq!(h.kong().recorded_requests().await.len(), 4);
}

#[tokio::test]
async fn unreachable_gateway_is_reported() {
    let h = AppHarness::builder()
        .with_kong_url(unreachable_base_url().await)
        .build()
        .await;

    h.relay_api()
        .add()
        .with_json(&orders_body())
        .expect_status(200)
        .await
        .assert_body_contains("Failed to register the API with error POST");

    assert!(h.kong().recorded_requests().await.is_empty());
}

// Credentials in KONG_URL authenticate the relay but never show up in replies.
#[tokio::test]
async fn gateway_password_is_masked_in_failure_message() {
    let h = AppHarness::builder()
        .with_kong_credentials("admin", "hunter2")
        .build()
        .await;
    h.kong()
        .respond("POST", "/apis/autokong-orders/plugins", 500, "boom");

    let resp = h
        .relay_api()
        .add()
        .with_json(&orders_body())
        .expect_status(200)
        .await;

    let body = resp.text();
    assert!(!body.contains("hunter2"), "{body}");
    assert!(body.contains("admin:REDACTED@127.0.0.1"), "{body}");
    assert!(body.contains("gateway responded with 500: boom"), "{body}");
    assert_eq!(h.kong().recorded_requests().await.len(), 4);
}

#[tokio::test]
async fn unreachable_gateway_password_is_masked() {
    let base = unreachable_base_url().await;
    let h = AppHarness::builder()
        .with_kong_url(base.replacen("http://", "http://admin:hunter2@", 1))
        .build()
        .await;

    let resp = h
        .relay_api()
        .add()
        .with_json(&orders_body())
        .expect_status(200)
        .await;

    let body = resp.text();
    assert!(body.starts_with("Failed to register the API with error POST"), "{body}");
    assert!(!body.contains("hunter2"), "{body}");
}

// Bodies above axum's default 2 MB limit still run the full sequence.
#[tokio::test]
async fn large_body_still_registers() {
    let h = AppHarness::builder().build().await;
    let padding = "x".repeat(3 * 1024 * 1024);
    let body = json!({
        "url": "http://svc:9000",
        "name": "orders",
        "path": "/orders",
        "groups": "team-a",
        "padding": padding,
    });

    h.relay_api()
        .add()
        .with_json(&body)
        .expect_status(200)
        .await
        .assert_body_eq("Registered API autokong-orders");

    assert_eq!(h.kong().recorded_requests().await.len(), 4);
}

#[tokio::test]
async fn field_names_are_case_insensitive() {
    let h = AppHarness::builder().build().await;

    h.relay_api()
        .add()
        .with_raw_body(r#"{"URL":"http://svc:9000","Name":"orders","Path":"/orders","GROUPS":"team-a"}"#)
        .expect_status(200)
        .await
        .assert_body_eq("Registered API autokong-orders");

    let calls = h.kong().recorded_requests().await;
    assert_eq!(calls[0].path, "/apis/autokong-orders");
    assert_eq!(calls[1].form_value("upstream_url").as_deref(), Some("http://svc:9000"));
    assert_eq!(calls[3].form_value("config.whitelist").as_deref(), Some("team-a"));
}

// Re-registering a name runs the whole sequence again, delete first.
#[tokio::test]
async fn repeated_registration_replays_all_calls() {
    let h = AppHarness::builder().build().await;

    h.relay_api()
        .add()
        .with_json(&orders_body())
        .expect_status(200)
        .await;
    h.kong().clear_recorded().await;

    h.relay_api()
        .add()
        .with_json(&orders_body())
        .expect_status(200)
        .await
        .assert_body_eq("Registered API autokong-orders");

    let calls = h.kong().recorded_requests().await;
    assert_eq!(calls.len(), 4);
    assert_eq!(calls[0].method, "DELETE");
    assert_eq!(calls[0].path, "/apis/autokong-orders");
}

#[tokio::test]
async fn remove_is_a_noop_for_any_method() {
    let h = AppHarness::builder().build().await;

    for method in [Method::GET, Method::POST, Method::DELETE, Method::PUT] {
        let resp = h
            .relay_api()
            .remove(method.clone())
            .with_raw_body("anything")
            .expect_status(200)
            .await;
        assert!(resp.text().is_empty(), "{method}");
    }

    assert!(h.kong().recorded_requests().await.is_empty());
}

#[tokio::test]
async fn add_rejects_other_methods() {
    let h = AppHarness::builder().build().await;

    h.relay_api()
        .add_with_method(Method::GET)
        .expect_status(405)
        .await;

    assert!(h.kong().recorded_requests().await.is_empty());
}

#[tokio::test]
async fn in_process_registrar_matches_http_surface() {
    let h = AppHarness::builder().build().await;

    let outcome = h
        .registrar()
        .register(autokong::ApiRegistration::new(
            "http://svc:9000",
            "billing",
            "/billing",
            "team-b",
        ))
        .await;

    assert_eq!(outcome.message(), "Registered API autokong-billing");
    assert_eq!(outcome.steps().len(), 4);
    let calls = h.kong().recorded_requests().await;
    assert_eq!(calls[3].form_value("config.whitelist").as_deref(), Some("team-b"));
}
