//! Tests for the anonymous transport against a live gateway stub.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{Value, json};

use coverlink_protocol::{CallMode, Principal};
use coverlink_runtime::{AnonymousTransport, Network, Transport};

#[derive(Default)]
struct Gateway {
	status_calls: AtomicU64,
	fail_status: AtomicBool,
}

async fn handle(State(gateway): State<Arc<Gateway>>, Json(request): Json<Value>) -> Json<Value> {
	let id = request["id"].clone();
	let reply = match request["method"].as_str() {
		Some("status") => {
			gateway.status_calls.fetch_add(1, Ordering::SeqCst);
			if gateway.fail_status.load(Ordering::SeqCst) {
				json!({ "jsonrpc": "2.0", "id": id, "error": { "code": -32000, "message": "replica starting" } })
			} else {
				json!({ "jsonrpc": "2.0", "id": id, "result": { "root_key": "MIGCMB0GDSsGAQQBgg" } })
			}
		}
		Some("get_current_episode_id") => json!({ "jsonrpc": "2.0", "id": id, "result": 7 }),
		_ => json!({ "jsonrpc": "2.0", "id": id, "error": { "code": -32601, "message": "method not found" } }),
	};
	Json(reply)
}

async fn spawn_gateway() -> (String, Arc<Gateway>) {
	let gateway = Arc::new(Gateway::default());
	let app = Router::new().route("/", post(handle)).with_state(gateway.clone());
	let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
	let endpoint = format!("http://{}/", listener.local_addr().unwrap());
	tokio::spawn(async move {
		axum::serve(listener, app).await.unwrap();
	});
	(endpoint, gateway)
}

#[tokio::test]
async fn root_key_is_fetched_once_across_calls() {
	let (endpoint, gateway) = spawn_gateway().await;
	let transport = AnonymousTransport::new(&endpoint, Network::Local).unwrap();

	transport.ensure_ready().await.unwrap();
	transport.ensure_ready().await.unwrap();
	assert!(transport.is_ready());

	let service = Principal::from("ufxgi-4p777-77774-qaadq-cai");
	let first = transport.call(&service, "get_current_episode_id", CallMode::Query, json!({})).await.unwrap();
	let second = transport.call(&service, "get_current_episode_id", CallMode::Query, json!({})).await.unwrap();
	assert_eq!(first, json!(7));
	assert_eq!(second, json!(7));

	assert_eq!(gateway.status_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn failed_bootstrap_is_retried_until_the_gateway_answers() {
	let (endpoint, gateway) = spawn_gateway().await;
	gateway.fail_status.store(true, Ordering::SeqCst);

	let transport = AnonymousTransport::new(&endpoint, Network::Local).unwrap();
	let err = transport.ensure_ready().await.unwrap_err();
	assert!(err.to_string().starts_with("fetchRootKey failed"));
	assert!(!transport.is_ready());

	gateway.fail_status.store(false, Ordering::SeqCst);
	transport.ensure_ready().await.unwrap();
	assert!(transport.is_ready());
	assert_eq!(gateway.status_calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn rpc_error_objects_carry_code_and_message() {
	let (endpoint, _gateway) = spawn_gateway().await;
	let transport = AnonymousTransport::new(&endpoint, Network::Mainnet).unwrap();

	let service = Principal::from("ufxgi-4p777-77774-qaadq-cai");
	let err = transport.call(&service, "get_weather", CallMode::Query, json!({})).await.unwrap_err();
	assert_eq!(err.to_string(), "rpc error -32601: method not found");
}

#[tokio::test]
async fn public_networks_call_without_any_bootstrap() {
	let (endpoint, gateway) = spawn_gateway().await;
	let transport = AnonymousTransport::new(&endpoint, Network::Mainnet).unwrap();
	assert!(transport.is_ready());

	let service = Principal::from("3uh73-fiaaa-aaaam-qbmza-cai");
	let episode = transport.call(&service, "get_current_episode_id", CallMode::Query, json!({})).await.unwrap();
	assert_eq!(episode, json!(7));
	assert_eq!(gateway.status_calls.load(Ordering::SeqCst), 0);
}
