pub mod client;
pub mod dispatcher;
pub mod request;
pub mod serialization;

pub use client::{ClientConfig, DispatchResponse, DispatchStats, HttpClient};
pub use dispatcher::{Completion, DispatchResult, Dispatcher};
pub use request::{DEFAULT_ENDPOINT, OutboundRequest, RequestBuilder, TAG_HEADER};
pub use serialization::EventSerializer;
