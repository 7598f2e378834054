//! Fixtures for tests that talk to an in-process mock backend.

use std::sync::Arc;

use axum::Router;

use crate::api::ApiClient;
use crate::config::ClientConfig;
use crate::router::navigator::History;
use crate::session::{MemoryStorage, Role, SessionRecord, SessionStore};

pub(crate) struct TestClient {
    pub client: ApiClient,
    pub session: Arc<SessionStore>,
    pub history: Arc<History>,
    pub storage: Arc<MemoryStorage>,
}

/// Serve `router` on an ephemeral port and return its `/api` base URL.
pub(crate) async fn spawn_backend(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind mock backend");
    let addr = listener.local_addr().expect("mock backend addr");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("mock backend failed");
    });
    format!("http://{addr}/api")
}

/// Hydrated, anonymous client pointed at `base_url`.
pub(crate) fn client_for(base_url: &str) -> TestClient {
    let storage = Arc::new(MemoryStorage::new());
    let session = Arc::new(SessionStore::new(storage.clone()));
    session.hydrate();
    let history = Arc::new(History::new());
    let config = ClientConfig::new(Some(base_url), None, std::env::temp_dir());
    let client = ApiClient::new(config, session.clone(), history.clone()).expect("client builds");
    TestClient { client, session, history, storage }
}

pub(crate) fn record(id: i64, role: Role, token: &str) -> SessionRecord {
    SessionRecord {
        id,
        email: Some(format!("user{id}@acme.test")),
        username: Some(format!("user{id}")),
        role,
        firstname: Some("Test".into()),
        lastname: Some(format!("User{id}")),
        token: Some(token.to_owned()),
    }
}
