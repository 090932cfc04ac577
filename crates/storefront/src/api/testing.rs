//! Scripted transport for unit tests.

#![allow(clippy::unwrap_used)]

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use serde_json::Value;

use super::{ApiRequest, Envelope, Transport};

/// Replays canned envelopes keyed by `action` and records every request.
///
/// Actions with no scripted reply behave like an unreachable server.
#[derive(Default)]
pub struct ScriptedTransport {
    replies: Mutex<HashMap<&'static str, VecDeque<Envelope>>>,
    requests: Mutex<Vec<ApiRequest>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a raw JSON reply for `action`.
    pub fn reply(&self, action: &'static str, body: Value) -> &Self {
        let envelope: Envelope = serde_json::from_value(body).unwrap();
        self.push(action, envelope)
    }

    /// Queue a transport failure for `action`.
    pub fn fail_network(&self, action: &'static str) -> &Self {
        self.push(action, Envelope::network_error())
    }

    fn push(&self, action: &'static str, envelope: Envelope) -> &Self {
        self.replies
            .lock()
            .unwrap()
            .entry(action)
            .or_default()
            .push_back(envelope);
        self
    }

    /// Every request sent so far.
    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// The `action` of every request sent so far.
    pub fn actions(&self) -> Vec<&'static str> {
        self.requests.lock().unwrap().iter().map(|r| r.action).collect()
    }
}

impl Transport for ScriptedTransport {
    async fn send(&self, request: ApiRequest) -> Envelope {
        let action = request.action;
        self.requests.lock().unwrap().push(request);
        self.replies
            .lock()
            .unwrap()
            .get_mut(action)
            .and_then(VecDeque::pop_front)
            .unwrap_or_else(Envelope::network_error)
    }
}
