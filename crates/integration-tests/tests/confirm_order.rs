//! Order confirmation: retries, failure classification, board updates.

use dryklin_admin::OrderBoard;
use dryklin_admin::api::ConfirmOrderError;
use dryklin_admin::http::ErrorCategory;
use dryklin_core::{OrderId, OrderStatus};
use dryklin_integration_tests::{TestContext, order_json};
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, ResponseTemplate};

#[tokio::test]
async fn test_confirm_succeeds_first_time() {
    let ctx = TestContext::new().await;
    ctx.sign_in("access-1", "refresh-1");

    Mock::given(method("PATCH"))
        .and(path(TestContext::api("/orders/o-1/confirm")))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "success": true, "data": order_json("o-1", "IN_PROGRESS") })),
        )
        .expect(1)
        .mount(&ctx.server)
        .await;

    let order = ctx.orders().confirm_order("o-1", None).await.unwrap();
    assert_eq!(order.id.as_str(), "o-1");
    assert_eq!(order.order_status, OrderStatus::InProgress);
}

#[tokio::test]
async fn test_two_failures_then_success_with_two_retries() {
    let ctx = TestContext::new().await;
    ctx.sign_in("access-1", "refresh-1");

    // Mounted first so it answers the first two attempts.
    Mock::given(method("PATCH"))
        .and(path(TestContext::api("/orders/o-1/confirm")))
        .respond_with(ResponseTemplate::new(503).set_body_json(json!({ "message": "upstream busy" })))
        .up_to_n_times(2)
        .expect(2)
        .mount(&ctx.server)
        .await;
    Mock::given(method("PATCH"))
        .and(path(TestContext::api("/orders/o-1/confirm")))
        .respond_with(ResponseTemplate::new(200).set_body_json(order_json("o-1", "PROCESSING")))
        .expect(1)
        .mount(&ctx.server)
        .await;

    let order = ctx.orders().confirm_order("o-1", Some(2)).await.unwrap();
    assert_eq!(order.order_status, OrderStatus::Processing);
}

#[tokio::test]
async fn test_default_policy_gives_up_after_two_attempts() {
    let ctx = TestContext::new().await;
    ctx.sign_in("access-1", "refresh-1");

    Mock::given(method("PATCH"))
        .and(path(TestContext::api("/orders/o-1/confirm")))
        .respond_with(ResponseTemplate::new(500))
        .expect(2)
        .mount(&ctx.server)
        .await;

    let err = ctx.orders().confirm_order("o-1", None).await.unwrap_err();
    assert_eq!(err.category(), ErrorCategory::Server);
    assert!(err.to_string().starts_with("Server error"));
    assert!(matches!(err, ConfirmOrderError::Failed { attempts: 2, .. }));
    assert_eq!(err.user_message(), "Server error: please try again later.");
}

#[tokio::test]
async fn test_unreachable_server_is_a_network_error() {
    let ctx = TestContext::unreachable().await;
    ctx.sign_in("access-1", "refresh-1");

    let err = ctx.orders().confirm_order("o-1", Some(0)).await.unwrap_err();
    assert_eq!(err.category(), ErrorCategory::Network);
    assert!(err.to_string().starts_with("Network error"));
    assert!(err.user_message().starts_with("Network error"));
    assert!(matches!(err, ConfirmOrderError::Failed { attempts: 1, .. }));
    assert_eq!(ctx.sign_in_redirects(), 0);
}

#[tokio::test]
async fn test_not_found_is_a_request_error() {
    let ctx = TestContext::new().await;
    ctx.sign_in("access-1", "refresh-1");

    Mock::given(method("PATCH"))
        .and(path(TestContext::api("/orders/o-404/confirm")))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({ "message": "Order not found" })))
        .mount(&ctx.server)
        .await;

    let err = ctx.orders().confirm_order("o-404", Some(0)).await.unwrap_err();
    assert_eq!(err.category(), ErrorCategory::Other);
    assert!(err.to_string().contains("Order not found"));
}

#[tokio::test]
async fn test_not_found_is_not_retried() {
    let ctx = TestContext::new().await;
    ctx.sign_in("access-1", "refresh-1");

    Mock::given(method("PATCH"))
        .and(path(TestContext::api("/orders/o-404/confirm")))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({ "message": "Order not found" })))
        .expect(1)
        .mount(&ctx.server)
        .await;

    let err = ctx.orders().confirm_order("o-404", Some(3)).await.unwrap_err();
    assert_eq!(err.category(), ErrorCategory::Other);
    assert!(err.to_string().starts_with("Request error"));
    assert!(matches!(err, ConfirmOrderError::Failed { attempts: 1, .. }));
}

#[tokio::test]
async fn test_no_confirmation_resent_after_forced_logout() {
    let ctx = TestContext::new().await;
    ctx.sign_in("stale", "revoked");

    Mock::given(method("PATCH"))
        .and(path(TestContext::api("/orders/o-1/confirm")))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&ctx.server)
        .await;
    Mock::given(method("POST"))
        .and(path(TestContext::api("/auth/tokens/refresh")))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&ctx.server)
        .await;

    let err = ctx.orders().confirm_order("o-1", None).await.unwrap_err();
    assert!(matches!(err, ConfirmOrderError::Failed { attempts: 1, .. }));
    assert_eq!(ctx.sign_in_redirects(), 1);
    assert!(ctx.store.is_empty());
    assert_eq!(ctx.server.received_requests().await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_blank_order_id_makes_no_request() {
    let ctx = TestContext::new().await;

    let err = ctx.orders().confirm_order("   ", Some(3)).await.unwrap_err();
    assert!(matches!(err, ConfirmOrderError::EmptyOrderId(_)));
    assert!(err.to_string().starts_with("Request error"));

    let received = ctx.server.received_requests().await.unwrap();
    assert!(received.is_empty());
}

#[tokio::test]
async fn test_still_pending_order_is_returned() {
    let ctx = TestContext::new().await;
    ctx.sign_in("access-1", "refresh-1");

    Mock::given(method("PATCH"))
        .and(path(TestContext::api("/orders/o-1/confirm")))
        .respond_with(ResponseTemplate::new(200).set_body_json(order_json("o-1", "PENDING")))
        .expect(1)
        .mount(&ctx.server)
        .await;

    let order = ctx.orders().confirm_order("o-1", None).await.unwrap();
    assert!(order.order_status.is_pending());
}

#[tokio::test]
async fn test_confirmation_after_session_refresh() {
    let ctx = TestContext::new().await;
    ctx.sign_in("stale", "refresh-1");

    Mock::given(method("PATCH"))
        .and(path(TestContext::api("/orders/o-1/confirm")))
        .and(wiremock::matchers::header("authorization", "Bearer stale"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&ctx.server)
        .await;
    Mock::given(method("POST"))
        .and(path(TestContext::api("/auth/tokens/refresh")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "accessToken": "fresh" })))
        .expect(1)
        .mount(&ctx.server)
        .await;
    Mock::given(method("PATCH"))
        .and(path(TestContext::api("/orders/o-1/confirm")))
        .and(wiremock::matchers::header("authorization", "Bearer fresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(order_json("o-1", "IN_PROGRESS")))
        .expect(1)
        .mount(&ctx.server)
        .await;

    // One attempt is enough: the refresh happens inside the attempt.
    let order = ctx.orders().confirm_order("o-1", Some(0)).await.unwrap();
    assert_eq!(order.order_status, OrderStatus::InProgress);
}

#[tokio::test]
async fn test_board_load_and_confirm() {
    let ctx = TestContext::new().await;
    ctx.sign_in("access-1", "refresh-1");

    Mock::given(method("GET"))
        .and(path(TestContext::api("/orders/pending")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [order_json("o-1", "PENDING"), order_json("o-2", "PENDING")]
        })))
        .mount(&ctx.server)
        .await;
    Mock::given(method("GET"))
        .and(path(TestContext::api("/orders")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "items": [order_json("o-1", "PENDING"), order_json("o-2", "PENDING")],
                "total": 2, "page": 1, "limit": 20
            }
        })))
        .mount(&ctx.server)
        .await;
    Mock::given(method("GET"))
        .and(path(TestContext::api("/orders/history")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "items": [order_json("o-7", "COMPLETED")], "total": 1, "page": 1, "limit": 20 }
        })))
        .mount(&ctx.server)
        .await;
    Mock::given(method("PATCH"))
        .and(path(TestContext::api("/orders/o-2/confirm")))
        .respond_with(ResponseTemplate::new(200).set_body_json(order_json("o-2", "IN_PROGRESS")))
        .mount(&ctx.server)
        .await;

    let orders = ctx.orders();
    let mut board = OrderBoard::new();
    board.load(&orders).await.unwrap();
    assert_eq!(board.pending.len(), 2);
    assert_eq!(board.all.len(), 2);
    assert_eq!(board.history.len(), 1);

    orders.confirm_into_board(&mut board, "o-2", None).await.unwrap();
    assert_eq!(board.pending.len(), 1);
    assert_eq!(board.history[0].id.as_str(), "o-2");
    let confirmed = board.find(&OrderId::parse("o-2").unwrap()).unwrap();
    assert_eq!(confirmed.order_status, OrderStatus::InProgress);
}

#[tokio::test]
async fn test_failed_confirmation_leaves_board_untouched() {
    let ctx = TestContext::new().await;
    ctx.sign_in("access-1", "refresh-1");

    Mock::given(method("PATCH"))
        .and(path(TestContext::api("/orders/o-1/confirm")))
        .respond_with(ResponseTemplate::new(502))
        .mount(&ctx.server)
        .await;

    let mut board = OrderBoard::new();
    board.pending.push(serde_json::from_value(order_json("o-1", "PENDING")).unwrap());
    let before = board.clone();

    let err = ctx
        .orders()
        .confirm_into_board(&mut board, "o-1", Some(1))
        .await
        .unwrap_err();
    assert_eq!(err.category(), ErrorCategory::Server);
    assert_eq!(board, before);
}
