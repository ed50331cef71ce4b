//! In-memory fetcher for testing.

use crate::error::{ErrorKind, Result};
use crate::fetcher::Fetcher;
use std::collections::{HashMap, VecDeque};
use std::io::Write;
use std::sync::Mutex;

/// In-memory [`Fetcher`] for testing.
///
/// Each URL maps to a queue of response bodies. Every request pops the front
/// of the queue, except the last body which is served forever, so a single
/// body behaves like a static resource while several bodies model a server
/// that changes between attempts. Unknown URLs answer HTTP 404.
///
/// Every request is recorded, whether it succeeded or not.
#[derive(Default)]
pub struct MockFetcher {
    responses: Mutex<HashMap<String, VecDeque<Vec<u8>>>>,
    requests: Mutex<Vec<String>>,
}

impl MockFetcher {
    /// Create a mock fetcher serving one static body per URL.
    pub fn with_resources(resources: impl IntoIterator<Item = (impl Into<String>, Vec<u8>)>) -> Self {
        let responses = resources.into_iter().map(|(url, body)| (url.into(), VecDeque::from([body]))).collect();
        Self {
            responses: Mutex::new(responses),
            requests: Mutex::default(),
        }
    }

    /// Create a mock fetcher that serves `bodies` for `url` in order.
    pub fn with_responses(url: impl Into<String>, bodies: impl IntoIterator<Item = Vec<u8>>) -> Self {
        Self {
            responses: Mutex::new(HashMap::from([(url.into(), bodies.into_iter().collect())])),
            requests: Mutex::default(),
        }
    }

    /// Every URL requested so far, in order.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }

    /// Number of times `url` has been requested.
    pub fn request_count(&self, url: &str) -> usize {
        self.requests().iter().filter(|r| *r == url).count()
    }

    fn next_body(&self, url: &str) -> Option<Vec<u8>> {
        let mut responses = self.responses.lock().ok()?;
        let queue = responses.get_mut(url)?;
        match queue.len() {
            0 => None,
            1 => queue.front().cloned(),
            _ => queue.pop_front(),
        }
    }
}

impl Fetcher for MockFetcher {
    fn fetch(&self, url: &str, sink: &mut dyn Write) -> Result<u64> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(url.to_string());
        }
        let Some(body) = self.next_body(url) else {
            exn::bail!(ErrorKind::Status {
                url: url.to_string(),
                status: 404,
            });
        };
        sink.write_all(&body).map_err(ErrorKind::Io)?;
        Ok(body.len() as u64)
    }
}
