use std::sync::{Arc, Mutex};

use axum::extract::{Path, State};
use axum::http::{HeaderMap, Method, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use chrono::NaiveDate;
use serde_json::{Value, json};

use bpcatalog_client::{
    ApiError, CatalogApi, ClientConfig, FormError, HttpCatalogClient, ProductFormController, ProductListController,
    Route,
};
use bpcatalog_core::{Field, PRODUCT_REMOVED, PRODUCT_UPDATED, Product, ProductId};

/// One request as seen by the stub backend.
#[derive(Debug, Clone)]
struct Seen {
    method: Method,
    path: String,
    bearer: Option<String>,
    body: Option<Value>,
}

struct Backend {
    products: Mutex<Vec<Value>>,
    seen: Mutex<Vec<Seen>>,
    /// Replaces the success message of PUT and DELETE answers.
    reply_message: Mutex<Option<String>>,
}

type Shared = Arc<Backend>;

impl Backend {
    fn record(&self, method: Method, path: String, headers: &HeaderMap, body: Option<Value>) {
        let bearer = headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .map(str::to_string);
        self.seen.lock().unwrap().push(Seen {
            method,
            path,
            bearer,
            body,
        });
    }

    fn reply(&self, default: &str) -> String {
        self.reply_message.lock().unwrap().clone().unwrap_or_else(|| default.to_string())
    }

    fn find(&self, id: &str) -> Option<Value> {
        self.products.lock().unwrap().iter().find(|p| p["id"] == id).cloned()
    }
}

/// Identifiers that make the stub answer with a failure status.
fn forced_failure(id: &str) -> Option<StatusCode> {
    match id {
        "boom" => Some(StatusCode::INTERNAL_SERVER_ERROR),
        "nope" => Some(StatusCode::FORBIDDEN),
        "teapot" => Some(StatusCode::IM_A_TEAPOT),
        _ => None,
    }
}

async fn list(State(backend): State<Shared>, headers: HeaderMap) -> Json<Value> {
    backend.record(Method::GET, "/bp/products".into(), &headers, None);
    let products = backend.products.lock().unwrap().clone();
    Json(json!({ "data": products }))
}

async fn create(State(backend): State<Shared>, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    backend.record(Method::POST, "/bp/products".into(), &headers, Some(body.clone()));
    let id = body["id"].as_str().unwrap_or_default().to_string();
    if backend.find(&id).is_some() {
        return (StatusCode::BAD_REQUEST, "duplicate identifier").into_response();
    }
    backend.products.lock().unwrap().push(body.clone());
    Json(json!({ "message": "Product added successfully", "data": body })).into_response()
}

async fn verify(State(backend): State<Shared>, headers: HeaderMap, Path(id): Path<String>) -> Json<bool> {
    backend.record(Method::GET, format!("/bp/products/verification/{id}"), &headers, None);
    Json(backend.find(&id).is_some())
}

async fn fetch(State(backend): State<Shared>, headers: HeaderMap, Path(id): Path<String>) -> Response {
    backend.record(Method::GET, format!("/bp/products/{id}"), &headers, None);
    if let Some(status) = forced_failure(&id) {
        return (status, "forced").into_response();
    }
    match backend.find(&id) {
        Some(product) => Json(product).into_response(),
        None => (StatusCode::NOT_FOUND, "Not product found with that identifier").into_response(),
    }
}

async fn replace(
    State(backend): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    backend.record(Method::PUT, format!("/bp/products/{id}"), &headers, Some(body.clone()));
    let mut products = backend.products.lock().unwrap();
    let Some(slot) = products.iter_mut().find(|p| p["id"] == id.as_str()) else {
        return StatusCode::NOT_FOUND.into_response();
    };
    let mut updated = body.clone();
    updated["id"] = json!(id);
    *slot = updated;
    // The echoed body carries no identifier.
    let message = backend.reply("Product updated successfully");
    Json(json!({ "message": message, "data": body })).into_response()
}

async fn remove(State(backend): State<Shared>, headers: HeaderMap, Path(id): Path<String>) -> Response {
    backend.record(Method::DELETE, format!("/bp/products/{id}"), &headers, None);
    let mut products = backend.products.lock().unwrap();
    let before = products.len();
    products.retain(|p| p["id"] != id.as_str());
    if products.len() == before {
        return StatusCode::NOT_FOUND.into_response();
    }
    let message = backend.reply("Product removed successfully");
    Json(json!({ "message": message })).into_response()
}

struct TestServer {
    base_url: String,
    backend: Shared,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn(products: Vec<Value>) -> Self {
        let backend: Shared = Arc::new(Backend {
            products: Mutex::new(products),
            seen: Mutex::new(Vec::new()),
            reply_message: Mutex::new(None),
        });

        let app = Router::new()
            .route("/bp/products", get(list).post(create))
            .route("/bp/products/verification/:id", get(verify))
            .route("/bp/products/:id", get(fetch).put(replace).delete(remove))
            .with_state(backend.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url,
            backend,
            handle,
        }
    }

    fn client(&self) -> HttpCatalogClient {
        HttpCatalogClient::from_config(&ClientConfig::new(&self.base_url).unwrap())
    }

    fn last(&self) -> Seen {
        self.backend.seen.lock().unwrap().last().cloned().expect("no request seen")
    }

    fn reply_with(&self, message: &str) {
        *self.backend.reply_message.lock().unwrap() = Some(message.to_string());
    }

    fn seen_count(&self) -> usize {
        self.backend.seen.lock().unwrap().len()
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn record(id: &str, name: &str, description: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "description": description,
        "logo": "test-logo.png",
        "date_release": "2030-02-20",
        "date_revision": "2031-02-20"
    })
}

fn seed() -> Vec<Value> {
    vec![
        record("test123", "Test Product", "Test Description"),
        record("prod-1", "Product 1", "Description 1"),
        record("prod-2", "Product 2", "Description 2"),
    ]
}

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

#[tokio::test]
async fn list_unwraps_data_envelope() {
    let server = TestServer::spawn(seed()).await;
    let products = server.client().list_products().await.unwrap();

    assert_eq!(products.len(), 3);
    assert_eq!(products[0].id.as_str(), "test123");
    assert_eq!(products[0].date_revision, date("2031-02-20"));

    let seen = server.last();
    assert_eq!(seen.method, Method::GET);
    assert_eq!(seen.path, "/bp/products");
    assert_eq!(seen.bearer, None);
}

#[tokio::test]
async fn verification_returns_boolean_flag() {
    let server = TestServer::spawn(seed()).await;
    let client = server.client();

    assert!(client.check_id_exists("test123").await.unwrap());
    assert_eq!(server.last().path, "/bp/products/verification/test123");

    assert!(!client.check_id_exists("  nuevo1 ").await.unwrap());
    assert_eq!(server.last().path, "/bp/products/verification/nuevo1");
}

#[tokio::test]
async fn create_posts_full_record_with_id() {
    let server = TestServer::spawn(Vec::new()).await;
    let product = Product {
        id: ProductId::new("trj-crd").unwrap(),
        name: "Tarjeta Credito".into(),
        description: "Tarjeta de consumo bajo modalidad de credito".into(),
        logo: "https://example.com/logo.png".into(),
        date_release: date("2030-01-01"),
        date_revision: date("2031-01-01"),
    };

    let created = server.client().create_product(&product).await.unwrap();
    assert_eq!(created, product);

    let seen = server.last();
    assert_eq!(seen.method, Method::POST);
    let body = seen.body.unwrap();
    assert_eq!(body["id"], "trj-crd");
    assert_eq!(body["date_release"], "2030-01-01");
}

#[tokio::test]
async fn update_puts_record_without_id() {
    let server = TestServer::spawn(seed()).await;
    let mut update = server.client().get_product("prod-1").await.unwrap().to_update();
    update.name = "Producto Uno".into();

    let ack = server.client().update_product("prod-1", &update).await.unwrap();
    assert!(ack.confirms(PRODUCT_UPDATED));
    let echoed = ack.data.unwrap();
    assert_eq!(echoed["name"], "Producto Uno");
    assert!(echoed.get("id").is_none());

    let seen = server.last();
    assert_eq!(seen.method, Method::PUT);
    assert_eq!(seen.path, "/bp/products/prod-1");
    assert!(seen.body.unwrap().get("id").is_none());
}

#[tokio::test]
async fn delete_returns_acknowledgment() {
    let server = TestServer::spawn(seed()).await;
    let ack = server.client().delete_product("prod-2").await.unwrap();

    assert!(ack.confirms(PRODUCT_REMOVED));
    assert_eq!(server.last().method, Method::DELETE);
    assert_eq!(server.client().get_product("prod-2").await.unwrap_err(), ApiError::NotFound);
}

#[tokio::test]
async fn failure_statuses_map_to_messages() {
    let server = TestServer::spawn(seed()).await;
    let client = server.client();

    let not_found = client.get_product("missing").await.unwrap_err();
    assert_eq!(not_found, ApiError::NotFound);
    assert_eq!(not_found.to_string(), "Recurso no encontrado.");

    assert_eq!(client.get_product("boom").await.unwrap_err(), ApiError::Server);
    assert_eq!(client.get_product("nope").await.unwrap_err(), ApiError::Forbidden);

    let other = client.get_product("teapot").await.unwrap_err();
    assert_eq!(other.status(), Some(418));
    assert!(other.to_string().starts_with("Error del servidor: 418"));
}

#[tokio::test]
async fn unreachable_backend_is_a_client_error() {
    let addr = std::net::TcpListener::bind("127.0.0.1:0").unwrap().local_addr().unwrap();
    let client = HttpCatalogClient::from_config(&ClientConfig::new(&format!("http://{addr}")).unwrap());

    match client.list_products().await.unwrap_err() {
        ApiError::Client(_) => {}
        other => panic!("expected client error, got {other:?}"),
    }
}

#[tokio::test]
async fn bearer_token_is_sent_when_configured() {
    let server = TestServer::spawn(seed()).await;
    let config = ClientConfig::new(&server.base_url).unwrap().with_token("s3cret");

    HttpCatalogClient::from_config(&config).list_products().await.unwrap();
    assert_eq!(server.last().bearer.as_deref(), Some("s3cret"));
}

#[tokio::test]
async fn list_controller_deletes_and_refetches() {
    let server = TestServer::spawn(seed()).await;
    let mut list = ProductListController::new(server.client());
    list.load().await.unwrap();
    list.set_search_text("product");
    assert_eq!(list.total_products(), 3);

    list.request_delete("prod-1", "Product 1");
    assert!(list.confirm_delete().await.unwrap());

    assert_eq!(list.products().len(), 2);
    assert_eq!(list.search_text(), "product");
    assert!(list.displayed().iter().all(|p| p.id.as_str() != "prod-1"));
}

#[tokio::test]
async fn form_blocks_duplicate_id_over_http() {
    let server = TestServer::spawn(seed()).await;
    let mut form = ProductFormController::new(server.client(), date("2030-01-01"));
    form.set_field(Field::Id, "test123");
    form.set_field(Field::Name, "Tarjeta Credito");
    form.set_field(Field::Description, "Tarjeta de consumo bajo modalidad de credito");
    form.set_field(Field::Logo, "https://example.com/logo.png");
    form.set_field(Field::DateRelease, "2030-01-01");
    form.set_field(Field::DateRevision, "2031-01-01");
    form.blur_id().await;

    let requests = server.seen_count();
    assert!(matches!(form.submit_create().await, Err(FormError::Invalid(_))));
    assert_eq!(server.seen_count(), requests);

    form.set_field(Field::Id, "trj-crd");
    form.blur_id().await;
    assert_eq!(form.submit_create().await.unwrap(), Route::Home);
    assert_eq!(server.last().method, Method::POST);
}

#[tokio::test]
async fn form_edit_round_trip_over_http() {
    let server = TestServer::spawn(seed()).await;
    let mut form = ProductFormController::new(server.client(), date("2030-01-01"));
    form.enter_edit("test123").await.unwrap();
    form.set_field(Field::Description, "Descripcion actualizada");

    assert_eq!(form.submit().await.unwrap(), Some(Route::Root));
    let stored = server.client().get_product("test123").await.unwrap();
    assert_eq!(stored.description, "Descripcion actualizada");
}

#[tokio::test]
async fn unacknowledged_delete_leaves_list_as_is() {
    let server = TestServer::spawn(seed()).await;
    let mut list = ProductListController::new(server.client());
    list.load().await.unwrap();
    server.reply_with("otro");

    list.request_delete("prod-1", "Product 1");
    let requests = server.seen_count();
    assert!(!list.confirm_delete().await.unwrap());

    assert_eq!(server.seen_count(), requests + 1);
    assert_eq!(server.last().method, Method::DELETE);
    assert!(!list.prompt().is_open());
    assert_eq!(list.products().len(), 3);
}

#[tokio::test]
async fn unacknowledged_update_does_not_navigate() {
    let server = TestServer::spawn(seed()).await;
    let mut form = ProductFormController::new(server.client(), date("2030-01-01"));
    form.enter_edit("prod-2").await.unwrap();
    form.set_field(Field::Name, "Producto Dos");
    server.reply_with("otro");

    assert_eq!(form.submit_update().await.unwrap(), None);
    assert_eq!(server.last().method, Method::PUT);
}
