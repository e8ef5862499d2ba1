//! Integration tests for Marketplace.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p marketplace-integration-tests
//! ```
//!
//! Every server is bound to `127.0.0.1:0`, so tests run in parallel and need
//! no external services.
//!
//! # Test Categories
//!
//! - `checkout_api` - The order endpoint over real HTTP
//! - `checkout_flow` - Checkout form + HTTP client against a live server
//! - `cms_wire` - CMS client against a stand-in data API

use std::net::SocketAddr;
use std::sync::{Arc, Mutex, PoisonError};

use axum::{
    Json, Router,
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode, Uri, header},
};
use marketplace_core::{Cart, CartItem, CheckoutForm, FormError, FormField, Price};
use marketplace_storefront::cms::{MemoryOrderStore, OrderStore};
use marketplace_storefront::config::{OrderStoreKind, SanityConfig, StorefrontConfig};
use marketplace_storefront::state::AppState;
use secrecy::SecretString;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Token used for every CMS client built by these tests.
pub const TEST_TOKEN: &str = "skQ7vR2mX9pL4nB8wK3jT6yH1cF5gD0sA";

// =============================================================================
// Servers
// =============================================================================

/// Serve `router` on an ephemeral local port.
///
/// # Errors
///
/// Returns an error if the listener cannot be bound.
pub async fn serve(router: Router) -> std::io::Result<(SocketAddr, JoinHandle<()>)> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let task = tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });
    Ok((addr, task))
}

/// A running storefront.
pub struct TestServer {
    pub base_url: String,
    task: JoinHandle<()>,
}

impl TestServer {
    /// Start a storefront backed by `orders`.
    ///
    /// # Errors
    ///
    /// Returns an error if the listener cannot be bound.
    pub async fn start(orders: Arc<dyn OrderStore>) -> std::io::Result<Self> {
        let state = AppState::new(memory_config(), orders);
        let (addr, task) = serve(marketplace_storefront::app(state)).await?;
        Ok(Self {
            base_url: format!("http://{addr}"),
            task,
        })
    }

    /// Start a storefront backed by a fresh in-memory store.
    ///
    /// # Errors
    ///
    /// Returns an error if the listener cannot be bound.
    pub async fn with_memory_store() -> std::io::Result<(Self, MemoryOrderStore)> {
        let store = MemoryOrderStore::new();
        let server = Self::start(Arc::new(store.clone())).await?;
        Ok((server, store))
    }

    /// Absolute URL for `path` on this server.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// A request received by [`FakeCms`].
#[derive(Debug, Clone)]
pub struct CapturedMutation {
    pub path_and_query: String,
    pub authorization: Option<String>,
    pub body: serde_json::Value,
}

struct FakeCmsState {
    status: StatusCode,
    reply: serde_json::Value,
    requests: Mutex<Vec<CapturedMutation>>,
}

/// Stand-in for the CMS data API. Records every request and answers each
/// with the same canned reply.
pub struct FakeCms {
    pub base_url: url::Url,
    state: Arc<FakeCmsState>,
    task: JoinHandle<()>,
}

impl FakeCms {
    /// Start a stand-in API that answers `status` with `reply`.
    ///
    /// # Errors
    ///
    /// Returns an error if the listener cannot be bound.
    pub async fn start(status: StatusCode, reply: serde_json::Value) -> std::io::Result<Self> {
        let state = Arc::new(FakeCmsState {
            status,
            reply,
            requests: Mutex::new(Vec::new()),
        });
        let router = Router::new()
            .fallback(record_mutation)
            .with_state(Arc::clone(&state));
        let (addr, task) = serve(router).await?;
        let base_url = url::Url::parse(&format!("http://{addr}/"))
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))?;

        Ok(Self {
            base_url,
            state,
            task,
        })
    }

    /// Every request received so far.
    #[must_use]
    pub fn requests(&self) -> Vec<CapturedMutation> {
        self.state
            .requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Drop for FakeCms {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn record_mutation(
    State(state): State<Arc<FakeCmsState>>,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> (StatusCode, Json<serde_json::Value>) {
    let captured = CapturedMutation {
        path_and_query: uri
            .path_and_query()
            .map_or_else(|| uri.path().to_string(), ToString::to_string),
        authorization: headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(String::from),
        body: serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null),
    };
    state
        .requests
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .push(captured);

    (state.status, Json(state.reply.clone()))
}

// =============================================================================
// Fixtures
// =============================================================================

/// Storefront configuration with the in-memory store and no Sentry.
#[must_use]
pub fn memory_config() -> StorefrontConfig {
    StorefrontConfig {
        host: [127, 0, 0, 1].into(),
        port: 0,
        order_store: OrderStoreKind::Memory,
        sanity: None,
        sentry_dsn: None,
        sentry_environment: None,
        sentry_sample_rate: 1.0,
        sentry_traces_sample_rate: 0.0,
    }
}

/// CMS settings for project `testproj`, dataset `production`.
#[must_use]
pub fn sanity_config() -> SanityConfig {
    SanityConfig {
        project_id: "testproj".to_string(),
        dataset: "production".to_string(),
        api_version: "2021-06-07".to_string(),
        token: SecretString::from(TEST_TOKEN),
    }
}

/// Two widgets at $10.
#[must_use]
pub fn widget_cart() -> Cart {
    Cart::from_items(vec![CartItem::new("p1", "Widget", 2, Price::whole(10))])
}

/// A checkout form over `cart` with every required field filled in.
///
/// # Errors
///
/// Never in practice; propagated from [`CheckoutForm::set_field`].
pub fn filled_form(cart: Cart) -> Result<CheckoutForm, FormError> {
    let mut form = CheckoutForm::new(cart);
    for (field, value) in [
        (FormField::Name, "Ada Lovelace"),
        (FormField::Email, "ada@shop.test"),
        (FormField::Phone, "555-0100"),
        (FormField::Address, "1 Loop Rd"),
        (FormField::City, "Springfield"),
        (FormField::State, "IL"),
        (FormField::Zip, "62701"),
        (FormField::Country, "US"),
    ] {
        form.set_field(field, value)?;
    }
    Ok(form)
}

/// The JSON body a browser sends for [`widget_cart`].
#[must_use]
pub fn widget_order_json() -> serde_json::Value {
    serde_json::json!({
        "name": "Ada Lovelace",
        "email": "ada@shop.test",
        "phone": "555-0100",
        "address": "1 Loop Rd",
        "city": "Springfield",
        "state": "IL",
        "zip": "62701",
        "country": "US",
        "paymentMethod": "cash-on-delivery",
        "cart": [
            { "_id": "p1", "title": "Widget", "quantity": 2, "price": 10 }
        ],
        "totalPrice": 20
    })
}
