//! Caller-facing log client.
//!
//! A `LogClient` is constructed explicitly and shared by cloning. Every `log_*`
//! call runs the pipeline tag merge, encode, build, dispatch and returns before
//! any network I/O happens. Outcomes, including local failures, only ever reach
//! the caller through the completion handler.

use crate::domain::{LogEvent, ShipperError, TagSet};
use crate::sender::{
    ClientConfig, Completion, DispatchResult, DispatchStats, Dispatcher, EventSerializer,
    HttpClient, OutboundRequest, RequestBuilder,
};
use parking_lot::RwLock;
use serde::Serialize;
use std::iter;
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::sync::oneshot;

#[derive(Debug)]
struct Credentials {
    token: String,
    default_tags: TagSet,
}

#[derive(Debug, Clone)]
pub struct LogClient {
    credentials: Arc<RwLock<Credentials>>,
    serializer: EventSerializer,
    builder: RequestBuilder,
    dispatcher: Dispatcher,
}

impl LogClient {
    /// Build a client bound to the current tokio runtime.
    pub fn new(config: ClientConfig) -> Result<Self, ShipperError> {
        let runtime = Handle::try_current().map_err(|e| {
            ShipperError::Configuration(format!(
                "LogClient::new needs a tokio runtime, use LogClient::with_handle: {e}"
            ))
        })?;
        Self::with_handle(config, runtime)
    }

    /// Build a client that spawns dispatches on `runtime`; usable from any thread.
    pub fn with_handle(config: ClientConfig, runtime: Handle) -> Result<Self, ShipperError> {
        let builder = RequestBuilder::from_endpoint(&config.endpoint, &config.user_agent)?;
        let client = HttpClient::new(&config)?;

        Ok(Self {
            credentials: Arc::new(RwLock::new(Credentials {
                token: config.token,
                default_tags: config.tags.into_iter().collect(),
            })),
            serializer: EventSerializer::new(),
            builder,
            dispatcher: Dispatcher::new(client, runtime),
        })
    }

    pub fn token(&self) -> String {
        self.credentials.read().token.clone()
    }

    pub fn set_token(&self, token: impl Into<String>) {
        self.credentials.write().token = token.into();
    }

    pub fn default_tags(&self) -> TagSet {
        self.credentials.read().default_tags.clone()
    }

    pub fn set_default_tags<I, S>(&self, tags: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.credentials.write().default_tags = tags.into_iter().collect();
    }

    pub fn stats(&self) -> DispatchStats {
        self.dispatcher.client().stats()
    }

    pub fn log_message(&self, text: impl Into<String>) {
        self.log_event(LogEvent::message(text), iter::empty::<String>(), None);
    }

    pub fn log_message_with_tags<I, S>(&self, text: impl Into<String>, tags: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.log_event(LogEvent::message(text), tags, None);
    }

    pub fn log_message_with_completion<I, S, F>(
        &self,
        text: impl Into<String>,
        tags: I,
        on_complete: F,
    ) where
        I: IntoIterator<Item = S>,
        S: Into<String>,
        F: FnOnce(DispatchResult) + Send + 'static,
    {
        self.log_event(LogEvent::message(text), tags, Some(Box::new(on_complete)));
    }

    pub fn log_record<T>(&self, record: &T)
    where
        T: Serialize + ?Sized,
    {
        self.submit(
            LogEvent::from_serializable(record),
            iter::empty::<String>(),
            None,
        );
    }

    pub fn log_record_with_tags<T, I, S>(&self, record: &T, tags: I)
    where
        T: Serialize + ?Sized,
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.submit(LogEvent::from_serializable(record), tags, None);
    }

    pub fn log_record_with_completion<T, I, S, F>(&self, record: &T, tags: I, on_complete: F)
    where
        T: Serialize + ?Sized,
        I: IntoIterator<Item = S>,
        S: Into<String>,
        F: FnOnce(DispatchResult) + Send + 'static,
    {
        self.submit(
            LogEvent::from_serializable(record),
            tags,
            Some(Box::new(on_complete)),
        );
    }

    /// Entry point shared by every `log_*` wrapper.
    pub fn log_event<I, S>(&self, event: LogEvent, tags: I, completion: Option<Completion>)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.submit(Ok(event), tags, completion);
    }

    /// Dispatch `event` and wait for its outcome.
    pub async fn deliver<I, S>(&self, event: LogEvent, tags: I) -> DispatchResult
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let (tx, rx) = oneshot::channel();
        self.log_event(
            event,
            tags,
            Some(Box::new(move |result| {
                // Receiver gone means the caller stopped waiting.
                let _ = tx.send(result);
            })),
        );

        rx.await.unwrap_or_else(|_| {
            Err(ShipperError::Transport {
                message: "dispatch task ended before reporting an outcome".to_string(),
                timed_out: false,
            })
        })
    }

    /// Build the request for `event` without sending it.
    pub fn prepare<I, S>(&self, event: &LogEvent, tags: I) -> Result<OutboundRequest, ShipperError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let (token, merged) = self.snapshot(tags);
        RequestBuilder::validate_token(&token)?;
        let payload = self.serializer.encode(event)?;
        self.builder.build(&token, payload, &merged)
    }

    fn submit<I, S>(
        &self,
        event: Result<LogEvent, ShipperError>,
        tags: I,
        completion: Option<Completion>,
    ) where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        // A missing token outranks an unencodable record.
        let prepared = match event {
            Ok(event) => self.prepare(&event, tags),
            Err(err) => RequestBuilder::validate_token(&self.token()).and(Err(err)),
        };
        self.dispatcher.dispatch(prepared, completion);
    }

    fn snapshot<I, S>(&self, tags: I) -> (String, TagSet)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let credentials = self.credentials.read();
        (
            credentials.token.clone(),
            TagSet::merge(tags, &credentials.default_tags),
        )
    }
}
