// src/state.rs
use std::sync::Arc;

use crate::config::Settings;
use crate::services::chat_client::ChatClient;
use crate::services::renderer::RenderSink;
use crate::services::session_store::{KeyValueStore, get_or_create_session_id};

pub type SharedClient<S> = Arc<ChatClient<S>>;

/// Everything a running client needs, built once at startup.
pub struct AppState<S: RenderSink + ?Sized> {
    pub client: SharedClient<S>,
}

impl<S: RenderSink + ?Sized> AppState<S> {
    /// Resolve the session id from `store` and build the client around it.
    pub fn new(
        settings: &Settings,
        store: Arc<dyn KeyValueStore>,
        sink: Arc<S>,
    ) -> anyhow::Result<Self> {
        let session_id = get_or_create_session_id(store.as_ref())?;
        let client = ChatClient::from_settings(settings, session_id, sink)?;
        Ok(Self { client: Arc::new(client) })
    }
}
