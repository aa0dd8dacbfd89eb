use std::sync::{Arc, Mutex};
use std::time::Duration;

use bevy::prelude::*;
use thiserror::Error;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::{JsCast, JsValue};
#[cfg(target_arch = "wasm32")]
use wasm_bindgen_futures::JsFuture;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("network failure: {0}")]
    Network(String),
    #[error("backend answered with status {0}")]
    Status(u16),
    #[error("backend reported success = false")]
    Rejected,
    #[error("malformed payload: {0}")]
    Decode(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Challenges,
    Scoreboard,
    /// One-off load of every correct submission, used to seed the detector.
    SubmissionHistory,
    /// Periodic poll of correct submissions.
    Submissions,
}

impl Endpoint {
    pub fn path(self) -> &'static str {
        match self {
            Endpoint::Challenges => "/api/v1/challenges",
            Endpoint::Scoreboard => "/api/v1/scoreboard",
            Endpoint::SubmissionHistory | Endpoint::Submissions => {
                "/api/v1/submissions?type=correct"
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct FetchOutcome {
    pub endpoint: Endpoint,
    pub result: Result<String, FetchError>,
}

/// Outcomes delivered from async fetches, drained once per frame.
#[derive(Resource, Default, Clone)]
pub struct FetchQueue(Arc<Mutex<Vec<FetchOutcome>>>);

impl FetchQueue {
    pub fn sink(&self) -> FetchSink {
        FetchSink(self.0.clone())
    }

    pub fn take(&self) -> Vec<FetchOutcome> {
        match self.0.lock() {
            Ok(mut queue) => std::mem::take(&mut *queue),
            Err(_) => {
                error!("Fetch queue lock poisoned");
                Vec::new()
            }
        }
    }
}

/// Write half handed to a single request.
#[derive(Clone)]
pub struct FetchSink(Arc<Mutex<Vec<FetchOutcome>>>);

impl FetchSink {
    pub fn deliver(&self, outcome: FetchOutcome) {
        if let Ok(mut queue) = self.0.lock() {
            queue.push(outcome);
        }
    }
}

/// Source of scoreboard JSON. Requests must not block the caller; the
/// response is delivered later through the sink.
pub trait ScoreboardBackend: Send + Sync + 'static {
    fn request(&self, endpoint: Endpoint, sink: FetchSink);
}

#[derive(Resource)]
pub struct Backend(pub Box<dyn ScoreboardBackend>);

/// Same-origin HTTP backend. Uses `fetch` in the browser and a blocking
/// `ureq` agent on the IO task pool natively.
pub struct HttpBackend {
    base_url: String,
    #[cfg(not(target_arch = "wasm32"))]
    agent: ureq::Agent,
}

impl HttpBackend {
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        #[cfg(target_arch = "wasm32")]
        let _ = timeout;

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            #[cfg(not(target_arch = "wasm32"))]
            agent: ureq::AgentBuilder::new().timeout(timeout).build(),
        }
    }

    pub fn url_for(&self, endpoint: Endpoint) -> String {
        format!("{}{}", self.base_url, endpoint.path())
    }
}

impl ScoreboardBackend for HttpBackend {
    fn request(&self, endpoint: Endpoint, sink: FetchSink) {
        let url = self.url_for(endpoint);

        #[cfg(target_arch = "wasm32")]
        {
            wasm_bindgen_futures::spawn_local(async move {
                let result = fetch_text(&url).await;
                sink.deliver(FetchOutcome { endpoint, result });
            });
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            let agent = self.agent.clone();
            bevy::tasks::IoTaskPool::get()
                .spawn(async move {
                    let result = blocking_get(&agent, &url);
                    sink.deliver(FetchOutcome { endpoint, result });
                })
                .detach();
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn blocking_get(agent: &ureq::Agent, url: &str) -> Result<String, FetchError> {
    match agent.get(url).set("Accept", "application/json").call() {
        Ok(response) => response
            .into_string()
            .map_err(|err| FetchError::Decode(err.to_string())),
        Err(ureq::Error::Status(code, _)) => Err(FetchError::Status(code)),
        Err(ureq::Error::Transport(transport)) => Err(FetchError::Network(transport.to_string())),
    }
}

#[cfg(target_arch = "wasm32")]
async fn fetch_text(url: &str) -> Result<String, FetchError> {
    let window =
        web_sys::window().ok_or_else(|| FetchError::Network("no window object".to_string()))?;
    let response = JsFuture::from(window.fetch_with_str(url))
        .await
        .map_err(js_failure)?;
    let response: web_sys::Response = response.dyn_into().map_err(js_failure)?;

    if !response.ok() {
        return Err(FetchError::Status(response.status()));
    }

    let body = JsFuture::from(response.text().map_err(js_failure)?)
        .await
        .map_err(js_failure)?;
    body.as_string()
        .ok_or_else(|| FetchError::Decode("response body is not text".to_string()))
}

#[cfg(target_arch = "wasm32")]
fn js_failure(value: JsValue) -> FetchError {
    FetchError::Network(format!("{value:?}"))
}

#[cfg(test)]
pub mod scripted {
    //! In-memory backend answering from a per-endpoint script.

    use std::collections::{HashMap, VecDeque};

    use super::*;

    #[derive(Clone, Default)]
    pub struct ScriptedBackend {
        script: Arc<Mutex<HashMap<Endpoint, VecDeque<Result<String, FetchError>>>>>,
        requests: Arc<Mutex<Vec<Endpoint>>>,
    }

    impl ScriptedBackend {
        pub fn respond(&self, endpoint: Endpoint, result: Result<String, FetchError>) {
            self.script
                .lock()
                .unwrap()
                .entry(endpoint)
                .or_default()
                .push_back(result);
        }

        pub fn requests(&self, endpoint: Endpoint) -> usize {
            self.requests
                .lock()
                .unwrap()
                .iter()
                .filter(|e| **e == endpoint)
                .count()
        }
    }

    impl ScoreboardBackend for ScriptedBackend {
        fn request(&self, endpoint: Endpoint, sink: FetchSink) {
            self.requests.lock().unwrap().push(endpoint);
            let next = self
                .script
                .lock()
                .unwrap()
                .get_mut(&endpoint)
                .and_then(|queue| queue.pop_front());
            // Unscripted requests stay in flight forever.
            if let Some(result) = next {
                sink.deliver(FetchOutcome { endpoint, result });
            }
        }
    }
}
