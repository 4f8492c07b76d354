use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, Method, StatusCode, Uri};
use axum::response::Html;
use axum::routing::{get, post};
use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::Mutex;

const FORM_PATH: &str = "/forms/d/e/test-form/viewform";
const RESPONSE_PATH: &str = "/forms/d/e/test-form/formResponse";

/// A request as the stub saw it.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub headers: HeaderMap,
    pub body: String,
}

impl RecordedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

#[derive(Clone)]
struct StubState {
    page: Arc<String>,
    post_status: StatusCode,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl StubState {
    async fn record(&self, method: Method, uri: Uri, headers: HeaderMap, body: Bytes) {
        self.requests.lock().await.push(RecordedRequest {
            method: method.to_string(),
            path: uri.path().to_string(),
            headers,
            body: String::from_utf8_lossy(&body).into_owned(),
        });
    }
}

/// Serves one canned form page and answers every submission with `post_status`.
pub struct StubFormServer {
    pub addr: SocketAddr,
    pub requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl StubFormServer {
    pub async fn start(page: String, post_status: u16) -> Self {
        let requests = Arc::new(Mutex::new(Vec::new()));
        let state = StubState {
            page: Arc::new(page),
            post_status: StatusCode::from_u16(post_status).unwrap(),
            requests: requests.clone(),
        };

        let app = Router::new()
            .route(FORM_PATH, get(serve_page))
            .route(RESPONSE_PATH, post(record_response))
            .with_state(state);

        // Start server on random port
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { addr, requests }
    }

    pub fn form_url(&self) -> String {
        format!("http://{}{}", self.addr, FORM_PATH)
    }

    pub async fn recorded(&self) -> Vec<RecordedRequest> {
        self.requests.lock().await.clone()
    }
}

async fn serve_page(
    State(state): State<StubState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Html<String> {
    state.record(method, uri, headers, body).await;
    Html(state.page.to_string())
}

async fn record_response(
    State(state): State<StubState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> (StatusCode, Html<&'static str>) {
    state.record(method, uri, headers, body).await;
    (state.post_status, Html("<html><body>Thanks</body></html>"))
}

/// Wraps a schema and token in a minimal form page.
pub fn form_page(schema: &serde_json::Value, token: &str) -> String {
    format!(
        r#"<html><head><script>var FB_PUBLIC_LOAD_DATA_ = {};
</script></head><body><form action="formResponse" method="POST" data-shuffle-seed="{}"></form></body></html>"#,
        schema, token
    )
}
