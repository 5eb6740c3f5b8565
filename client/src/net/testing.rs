//! Scripted transport for unit tests.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use futures::channel::oneshot;
use serde_json::Value;

use super::http::{ApiClient, ApiError, ApiRequest, ApiResponse, HttpTransport, Method};

pub(crate) const BASE_URL: &str = "http://backend.test/api";

type Reply = Result<ApiResponse, ApiError>;

/// Replays canned replies per `(method, path)` and records every request.
#[derive(Default)]
pub(crate) struct MockTransport {
    replies: Mutex<HashMap<(Method, String), VecDeque<Reply>>>,
    gates: Mutex<HashMap<(Method, String), oneshot::Receiver<()>>>,
    requests: Mutex<Vec<ApiRequest>>,
}

impl MockTransport {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Queue a JSON reply with `status` for `method path`.
    pub(crate) fn reply(&self, method: Method, path: &str, status: u16, body: Value) {
        self.push(method, path, Ok(ApiResponse { status, body: body.to_string() }));
    }

    /// Queue a reply with a verbatim (possibly non-JSON) body.
    pub(crate) fn push_raw(&self, method: Method, path: &str, response: ApiResponse) {
        self.push(method, path, Ok(response));
    }

    /// Queue a transport-level failure for `method path`.
    pub(crate) fn fail(&self, method: Method, path: &str, reason: &str) {
        self.push(method, path, Err(ApiError::Transport(reason.to_owned())));
    }

    /// Hold the next `method path` response until the returned sender fires.
    pub(crate) fn hold(&self, method: Method, path: &str) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.gates.lock().unwrap().insert((method, url(path)), rx);
        tx
    }

    pub(crate) fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub(crate) fn last_request(&self) -> ApiRequest {
        self.requests().pop().expect("no request recorded")
    }

    fn push(&self, method: Method, path: &str, reply: Reply) {
        self.replies
            .lock()
            .unwrap()
            .entry((method, url(path)))
            .or_default()
            .push_back(reply);
    }
}

#[async_trait(?Send)]
impl HttpTransport for MockTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, ApiError> {
        let key = (request.method, request.url.clone());
        self.requests.lock().unwrap().push(request);
        let gate = self.gates.lock().unwrap().remove(&key);
        if let Some(gate) = gate {
            let _ = gate.await;
        }
        self.replies
            .lock()
            .unwrap()
            .get_mut(&key)
            .and_then(VecDeque::pop_front)
            .unwrap_or_else(|| Err(ApiError::Transport(format!("no scripted reply for {key:?}"))))
    }
}

pub(crate) fn url(path: &str) -> String {
    format!("{BASE_URL}{path}")
}

pub(crate) fn client(transport: &Arc<MockTransport>) -> Arc<ApiClient> {
    Arc::new(ApiClient::new(BASE_URL, transport.clone()))
}
