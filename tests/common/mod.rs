#![allow(dead_code)]

use hr_chat_client::message::Citation;
use hr_chat_client::services::chat_client::ChatClient;
use hr_chat_client::services::renderer::{Locale, RenderSink};

use axum::extract::State;
use axum::http::{StatusCode, header};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use reqwest::Url;
use serde_json::Value;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::Notify;

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    User(String),
    Bot(String, Vec<Citation>),
    ClearInput,
}

#[derive(Default)]
pub struct RecordingSink {
    events: Mutex<Vec<Event>>,
}

impl RecordingSink {
    pub fn events(&self) -> Vec<Event> {
        self.events.lock().unwrap().clone()
    }

    pub fn user_bubbles(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                Event::User(text) => Some(text),
                _ => None,
            })
            .collect()
    }

    pub fn bot_bubbles(&self) -> Vec<(String, Vec<Citation>)> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                Event::Bot(text, cites) => Some((text, cites)),
                _ => None,
            })
            .collect()
    }
}

impl RenderSink for RecordingSink {
    fn append_user_message(&self, text: &str) {
        self.events.lock().unwrap().push(Event::User(text.to_string()));
    }

    fn append_bot_message(&self, text: &str, citations: &[Citation]) {
        self.events
            .lock()
            .unwrap()
            .push(Event::Bot(text.to_string(), citations.to_vec()));
    }

    fn clear_input(&self) {
        self.events.lock().unwrap().push(Event::ClearInput);
    }
}

#[derive(Clone)]
pub struct MockBackend {
    pub status: StatusCode,
    pub body: String,
    pub hits: Arc<AtomicUsize>,
    pub received: Arc<Mutex<Vec<Value>>>,
    pub gate: Option<Arc<Notify>>,
    pub delay: Option<Duration>,
}

impl MockBackend {
    pub fn replying(status: StatusCode, body: &str) -> Self {
        Self {
            status,
            body: body.to_string(),
            hits: Arc::new(AtomicUsize::new(0)),
            received: Arc::new(Mutex::new(Vec::new())),
            gate: None,
            delay: None,
        }
    }

    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}

async fn chat_handler(State(mock): State<MockBackend>, Json(payload): Json<Value>) -> impl IntoResponse {
    mock.hits.fetch_add(1, Ordering::SeqCst);
    mock.received.lock().unwrap().push(payload);
    if let Some(gate) = &mock.gate {
        gate.notified().await;
    }
    if let Some(delay) = mock.delay {
        tokio::time::sleep(delay).await;
    }
    (mock.status, [(header::CONTENT_TYPE, "application/json")], mock.body.clone())
}

pub async fn serve(app: Router) -> Url {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    Url::parse(&format!("http://{addr}")).unwrap()
}

pub async fn spawn_backend(mock: MockBackend) -> Url {
    let app = Router::new()
        .route("/chat", post(chat_handler))
        .route("/health", get(|| async { Json(serde_json::json!({"status": "ok"})) }))
        .with_state(mock);
    serve(app).await
}

pub fn client(base: &Url, locale: Locale) -> (ChatClient<RecordingSink>, Arc<RecordingSink>) {
    let sink = Arc::new(RecordingSink::default());
    let client =
        ChatClient::new(reqwest::Client::new(), base, "sess123", locale, sink.clone()).unwrap();
    (client, sink)
}
