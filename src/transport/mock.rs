//! Test doubles for [`HttpClient`] and [`Mailer`].

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use super::{EmailMessage, HttpClient, HttpError, HttpRequest, HttpResponse, Mailer, TransportError};

/// Mock HTTP client returning queued responses and capturing requests.
///
/// Answers `200 OK` with an empty JSON object once the queue is exhausted.
#[derive(Debug, Default)]
pub struct MockClient {
    responses: Mutex<Vec<Result<HttpResponse, HttpError>>>,
    requests: Mutex<Vec<HttpRequest>>,
    call_count: AtomicUsize,
}

impl MockClient {
    pub fn new(responses: Vec<Result<HttpResponse, HttpError>>) -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(responses),
            ..Self::default()
        })
    }

    pub fn ok() -> Arc<Self> {
        Self::new(Vec::new())
    }

    pub fn status(status: u16, body: &str) -> Arc<Self> {
        Self::new(vec![Ok(response(status, body))])
    }

    pub fn failing() -> Arc<Self> {
        Self::new(vec![Err(HttpError::Timeout)])
    }

    pub fn calls(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    pub fn captured_requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Body of the `n`th request parsed as JSON.
    pub fn json_body(&self, n: usize) -> serde_json::Value {
        let requests = self.requests.lock().unwrap();
        serde_json::from_slice(requests[n].body.as_deref().unwrap()).unwrap()
    }
}

pub fn response(status: u16, body: &str) -> HttpResponse {
    HttpResponse::new(
        http::StatusCode::from_u16(status).unwrap(),
        http::HeaderMap::new(),
        body.as_bytes().to_vec(),
    )
}

impl HttpClient for Arc<MockClient> {
    async fn request(&self, req: HttpRequest) -> Result<HttpResponse, HttpError> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(req);
        let mut responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            Ok(response(200, "{}"))
        } else {
            responses.remove(0)
        }
    }
}

/// Mock mailer capturing sent messages.
#[derive(Debug, Default)]
pub struct MockMailer {
    sent: Mutex<Vec<EmailMessage>>,
    fail: bool,
}

impl MockMailer {
    pub fn ok() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// A mailer whose every send fails with an invalid-address error.
    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            fail: true,
            ..Self::default()
        })
    }

    pub fn sent(&self) -> Vec<EmailMessage> {
        self.sent.lock().unwrap().clone()
    }
}

impl Mailer for Arc<MockMailer> {
    async fn send(&self, message: &EmailMessage) -> Result<(), TransportError> {
        self.sent.lock().unwrap().push(message.clone());
        if self.fail {
            let source = "not an address"
                .parse::<lettre::Address>()
                .unwrap_err();
            return Err(TransportError::Address {
                address: message.to.clone(),
                source,
            });
        }
        Ok(())
    }
}
