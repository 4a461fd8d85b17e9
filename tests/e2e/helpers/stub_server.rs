use axum::http::StatusCode;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Scripted reply for POST /api/tts
#[derive(Debug, Clone)]
pub struct StubReply {
    pub status: StatusCode,
    pub content_type: &'static str,
    pub body: Vec<u8>,
}

impl StubReply {
    pub fn audio(body: &[u8]) -> Self {
        Self {
            status: StatusCode::OK,
            content_type: "audio/mpeg",
            body: body.to_vec(),
        }
    }

    pub fn error(status: StatusCode) -> Self {
        Self {
            status,
            content_type: "application/json",
            body: br#"{"detail":"ElevenLabs API error"}"#.to_vec(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ReceivedRequest {
    pub content_type: String,
    pub body: String,
}

/// In-process stand-in for the speech proxy
#[derive(Clone)]
pub struct StubServer {
    pub base_url: String,
    pub(crate) speakers: Arc<Mutex<(StatusCode, String)>>,
    pub(crate) replies: Arc<Mutex<VecDeque<StubReply>>>,
    pub(crate) received: Arc<Mutex<Vec<ReceivedRequest>>>,
}

impl StubServer {
    pub async fn start() -> Self {
        let mut stub = Self {
            base_url: String::new(),
            speakers: Arc::new(Mutex::new((
                StatusCode::OK,
                r#"{"success":true,"speakers":[]}"#.to_string(),
            ))),
            replies: Arc::new(Mutex::new(VecDeque::new())),
            received: Arc::new(Mutex::new(Vec::new())),
        };
        stub.base_url = super::serve(super::stub_router(stub.clone())).await;
        stub
    }

    pub fn set_speakers(&self, status: StatusCode, body: &str) {
        *self.speakers.lock().unwrap() = (status, body.to_string());
    }

    pub fn reply(&self, reply: StubReply) {
        self.replies.lock().unwrap().push_back(reply);
    }

    pub fn received(&self) -> Vec<ReceivedRequest> {
        self.received.lock().unwrap().clone()
    }
}
