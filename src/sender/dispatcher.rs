use super::client::{DispatchResponse, HttpClient};
use super::request::OutboundRequest;
use crate::domain::ShipperError;
use tokio::runtime::Handle;
use tracing::{debug, warn};
use uuid::Uuid;

pub type DispatchResult = Result<DispatchResponse, ShipperError>;

/// Single-shot completion handler. `FnOnce` keeps it to at most one call.
pub type Completion = Box<dyn FnOnce(DispatchResult) + Send + 'static>;

/// Owns a dispatch's completion handler until the outcome is known.
///
/// If the dispatch task is dropped first (runtime shut down before or while it
/// ran), the handler still fires once, with a transport error.
struct CompletionGuard {
    dispatch_id: Uuid,
    handler: Option<Completion>,
}

impl CompletionGuard {
    fn new(dispatch_id: Uuid, handler: Option<Completion>) -> Self {
        Self {
            dispatch_id,
            handler,
        }
    }

    fn complete(mut self, result: DispatchResult) {
        let dispatch_id = self.dispatch_id;
        match self.handler.take() {
            Some(on_complete) => on_complete(result),
            None => {
                if let Err(err) = result {
                    debug!(%dispatch_id, error = %err, "dropping dispatch failure without completion handler");
                }
            }
        }
    }
}

impl Drop for CompletionGuard {
    fn drop(&mut self) {
        if let Some(on_complete) = self.handler.take() {
            debug!(dispatch_id = %self.dispatch_id, "dispatch abandoned before completing");
            on_complete(Err(ShipperError::Transport {
                message: "dispatch abandoned: runtime shut down before the request completed"
                    .to_string(),
                timed_out: false,
            }));
        }
    }
}

/// Hands each request to the runtime and returns immediately.
///
/// One network attempt per dispatch: no retry, queueing or deduplication.
/// Concurrent dispatches complete in whatever order the network allows.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    client: HttpClient,
    runtime: Handle,
}

impl Dispatcher {
    pub fn new(client: HttpClient, runtime: Handle) -> Self {
        Self { client, runtime }
    }

    /// Send `prepared` in the background. A request that already failed to
    /// build skips the network and reports its error through `completion`.
    pub fn dispatch(
        &self,
        prepared: Result<OutboundRequest, ShipperError>,
        completion: Option<Completion>,
    ) {
        let client = self.client.clone();
        let dispatch_id = Uuid::new_v4();
        let guard = CompletionGuard::new(dispatch_id, completion);

        self.runtime.spawn(async move {
            let result = match prepared {
                Ok(request) => {
                    debug!(%dispatch_id, url = %request.url, bytes = request.body.len(), "dispatching event");
                    client.send(request).await
                }
                Err(err) => Err(err),
            };

            if let Err(ShipperError::Server { status, .. }) = &result {
                warn!(%dispatch_id, status, "collector rejected event");
            }

            guard.complete(result);
        });
    }

    pub fn client(&self) -> &HttpClient {
        &self.client
    }
}
