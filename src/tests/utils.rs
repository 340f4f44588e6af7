use crate::api::{ApiRequest, Listing, Method, Transport};
use crate::errors::{ClientError, ClientResult};
use crate::store::LocalStore;
use serde_json::{json, Value};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

/// Scripted reply for one route.
#[derive(Clone, Debug)]
pub enum Reply {
    Json(Value),
    Status(u16),
    NetworkDown,
}

type SendHook = Box<dyn Fn(&ApiRequest) + Send + Sync>;

/// In-memory backend. Each route replays its queued replies in order and keeps
/// repeating the last one.
#[derive(Default)]
pub struct FakeTransport {
    routes: Mutex<HashMap<(Method, String), VecDeque<Reply>>>,
    sent: Mutex<Vec<ApiRequest>>,
    hook: Mutex<Option<SendHook>>,
}

impl FakeTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn reply(&self, method: Method, path: &str, reply: Reply) {
        self.routes
            .lock()
            .unwrap()
            .entry((method, path.to_string()))
            .or_default()
            .push_back(reply);
    }

    /// Drop anything queued for the route and always answer with `reply`.
    pub fn set(&self, method: Method, path: &str, reply: Reply) {
        let mut routes = self.routes.lock().unwrap();
        let queue = routes.entry((method, path.to_string())).or_default();
        queue.clear();
        queue.push_back(reply);
    }

    pub fn json(&self, method: Method, path: &str, body: Value) {
        self.reply(method, path, Reply::Json(body));
    }

    /// Runs on every request, before the reply is produced.
    pub fn on_send(&self, f: impl Fn(&ApiRequest) + Send + Sync + 'static) {
        *self.hook.lock().unwrap() = Some(Box::new(f));
    }

    pub fn sent(&self) -> Vec<ApiRequest> {
        self.sent.lock().unwrap().clone()
    }

    pub fn sent_to(&self, path: &str) -> Vec<ApiRequest> {
        self.sent().into_iter().filter(|r| r.path == path).collect()
    }
}

impl Transport for FakeTransport {
    fn send(&self, req: &ApiRequest) -> ClientResult<Value> {
        self.sent.lock().unwrap().push(req.clone());
        if let Some(hook) = self.hook.lock().unwrap().as_ref() {
            hook(req);
        }

        let reply = {
            let mut routes = self.routes.lock().unwrap();
            match routes.get_mut(&(req.method, req.path.clone())) {
                Some(queue) if queue.len() > 1 => queue.pop_front(),
                Some(queue) => queue.front().cloned(),
                None => None,
            }
        };

        match reply {
            Some(Reply::Json(v)) => Ok(v),
            Some(Reply::Status(status)) => Err(ClientError::Status {
                status,
                path: req.path.clone(),
                body: String::new(),
            }),
            Some(Reply::NetworkDown) => Err(ClientError::Network("connection refused".into())),
            None => Err(ClientError::Status {
                status: 404,
                path: req.path.clone(),
                body: "no route".into(),
            }),
        }
    }
}

pub fn listing_json(id: i64, title: &str) -> Value {
    json!({
        "id": id,
        "title": title,
        "description": format!("{title} description"),
        "price": 250000,
        "location": { "name": "Bonapriso", "locationId": 7 },
        "bedrooms": 3,
        "bathrooms": 2,
        "media": [
            { "kind": "image", "url": format!("https://cdn.example/{id}/1.jpg") },
            { "kind": "video", "url": format!("https://cdn.example/{id}/2.mp4") }
        ],
        "verification": "verified",
        "createdAt": "2024-03-01T10:00:00Z"
    })
}

pub fn listing(id: i64, title: &str) -> Listing {
    serde_json::from_value(listing_json(id, title)).unwrap()
}

/// A fresh store in its own temp directory. Keep the `TempDir` alive for the test.
pub fn temp_store() -> (TempDir, LocalStore) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("store.sqlite3");
    let store = LocalStore::open(path.to_string_lossy().to_string()).unwrap();
    (dir, store)
}
