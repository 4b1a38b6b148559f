use std::sync::Arc;

use anyhow::Result;
use axum::{
    extract::State,
    http::{header, HeaderMap, Method, StatusCode, Uri},
    Router,
};
use serde_json::{json, Value};
use shared::domain::{Customer, CustomerId};
use tokio::{net::TcpListener, sync::Mutex};

use super::*;
use crate::fake_service::sample_customer;

#[derive(Debug, Clone)]
struct RecordedRequest {
    method: Method,
    path: String,
    accept: Option<String>,
    body: String,
}

impl RecordedRequest {
    fn json(&self) -> Value {
        serde_json::from_str(&self.body).expect("request body is json")
    }
}

#[derive(Clone)]
struct ServerState {
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    status: StatusCode,
    reply: String,
}

async fn record_request(
    State(state): State<ServerState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: String,
) -> (StatusCode, String) {
    state.requests.lock().await.push(RecordedRequest {
        method,
        path: uri.path().to_string(),
        accept: headers
            .get(header::ACCEPT)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        body,
    });
    (state.status, state.reply.clone())
}

async fn spawn_store(
    status: StatusCode,
    reply: impl Into<String>,
) -> Result<(HttpCustomerService, Arc<Mutex<Vec<RecordedRequest>>>)> {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let requests = Arc::new(Mutex::new(Vec::new()));
    let state = ServerState {
        requests: requests.clone(),
        status,
        reply: reply.into(),
    };
    let app = Router::new().fallback(record_request).with_state(state);
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    let service = HttpCustomerService::new(&format!("http://{addr}/"))?;
    Ok((service, requests))
}

async fn single_request(requests: &Mutex<Vec<RecordedRequest>>) -> RecordedRequest {
    let requests = requests.lock().await;
    assert_eq!(requests.len(), 1, "unexpected requests: {requests:?}");
    requests[0].clone()
}

#[test]
fn base_url_is_validated_once() {
    let service = HttpCustomerService::new("http://localhost:32831/api/").expect("valid");
    assert_eq!(service.base_url(), "http://localhost:32831/api");

    assert!(matches!(
        HttpCustomerService::new("not a url"),
        Err(ServiceError::InvalidBaseUrl { .. })
    ));
    assert!(matches!(
        HttpCustomerService::new("ftp://localhost/files"),
        Err(ServiceError::InvalidBaseUrl { .. })
    ));
}

#[tokio::test]
async fn fetch_decodes_the_customer() {
    let body = serde_json::to_string(&sample_customer(7)).expect("encode");
    let (service, requests) = spawn_store(StatusCode::OK, body).await.expect("spawn");

    let customer = service.fetch_customer(CustomerId(7)).await.expect("fetch");

    assert_eq!(customer, Some(sample_customer(7)));
    let request = single_request(&requests).await;
    assert_eq!(request.method, Method::GET);
    assert_eq!(request.path, "/cliente/7");
    assert_eq!(request.accept.as_deref(), Some("application/json"));
}

#[tokio::test]
async fn fetch_maps_404_to_not_found() {
    let (service, _requests) = spawn_store(StatusCode::NOT_FOUND, "").await.expect("spawn");
    assert_eq!(service.fetch_customer(CustomerId(999)).await, Ok(None));
}

#[tokio::test]
async fn fetch_without_a_record_is_not_found() {
    for reply in ["", "null", "{}", r#"{"message":"Cliente nao encontrado"}"#] {
        let (service, _requests) = spawn_store(StatusCode::OK, reply).await.expect("spawn");
        assert_eq!(
            service.fetch_customer(CustomerId(3)).await,
            Ok(None),
            "reply {reply:?}"
        );
    }
}

#[tokio::test]
async fn list_decodes_the_collection() {
    let body = serde_json::to_string(&vec![sample_customer(1), sample_customer(2)]).expect("encode");
    let (service, requests) = spawn_store(StatusCode::OK, body).await.expect("spawn");

    let customers = service.list_customers().await.expect("list");

    assert_eq!(customers, vec![sample_customer(1), sample_customer(2)]);
    let request = single_request(&requests).await;
    assert_eq!(request.method, Method::GET);
    assert_eq!(request.path, "/cliente/clientes");
}

#[tokio::test]
async fn list_with_garbage_body_is_a_decode_error() {
    let (service, _requests) = spawn_store(StatusCode::OK, "<html>").await.expect("spawn");
    assert!(matches!(
        service.list_customers().await,
        Err(ServiceError::Decode { .. })
    ));
}

#[tokio::test]
async fn create_posts_payload_with_null_email_and_no_ids() {
    let (service, requests) = spawn_store(StatusCode::CREATED, "Cliente cadastrado")
        .await
        .expect("spawn");
    let mut draft = Customer::blank();
    draft.name = "Ana".into();
    draft.social_name = "Aninha".into();

    let created = service.create_customer(&draft).await.expect("create");

    assert_eq!(created, None);
    let request = single_request(&requests).await;
    assert_eq!(request.method, Method::POST);
    assert_eq!(request.path, "/cliente/cadastrar");
    let body = request.json();
    assert_eq!(body["nome"], "Ana");
    assert_eq!(body["nomeSocial"], "Aninha");
    assert_eq!(body["email"], Value::Null);
    assert!(body.get("id").is_none());
    assert!(body["endereco"].get("id").is_none());
    assert_eq!(body["telefones"].as_array().map(Vec::len), Some(1));
}

#[tokio::test]
async fn create_returns_echoed_record() {
    let body = serde_json::to_string(&sample_customer(12)).expect("encode");
    let (service, _requests) = spawn_store(StatusCode::OK, body).await.expect("spawn");
    let created = service
        .create_customer(&Customer::blank())
        .await
        .expect("create");
    assert_eq!(created.and_then(|c| c.id), Some(CustomerId(12)));
}

#[tokio::test]
async fn update_puts_the_full_record() {
    let (service, requests) = spawn_store(StatusCode::OK, "").await.expect("spawn");

    service
        .update_customer(&sample_customer(4))
        .await
        .expect("update");

    let request = single_request(&requests).await;
    assert_eq!(request.method, Method::PUT);
    assert_eq!(request.path, "/cliente/atualizar");
    assert_eq!(
        request.json(),
        serde_json::to_value(sample_customer(4)).expect("encode")
    );
}

#[tokio::test]
async fn delete_sends_the_id_in_the_body() {
    let (service, requests) = spawn_store(StatusCode::NO_CONTENT, "").await.expect("spawn");

    service.delete_customer(CustomerId(5)).await.expect("delete");

    let request = single_request(&requests).await;
    assert_eq!(request.method, Method::DELETE);
    assert_eq!(request.path, "/cliente/excluir");
    assert_eq!(request.json(), json!({ "id": 5 }));
}

#[tokio::test]
async fn rejected_request_carries_status_and_reason() {
    let (service, _requests) = spawn_store(
        StatusCode::INTERNAL_SERVER_ERROR,
        r#"{"message":"constraint violated"}"#,
    )
    .await
    .expect("spawn");

    let err = service
        .update_customer(&sample_customer(4))
        .await
        .expect_err("rejected");

    assert_eq!(
        err,
        ServiceError::Status {
            route: "/cliente/atualizar".to_string(),
            status: 500,
            reason: "constraint violated".to_string(),
        }
    );
}

#[tokio::test]
async fn unreachable_store_is_a_transport_error() {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);
    let service = HttpCustomerService::new(&format!("http://{addr}")).expect("service");

    assert!(matches!(
        service.list_customers().await,
        Err(ServiceError::Transport { .. })
    ));
}
