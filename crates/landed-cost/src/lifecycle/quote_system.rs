use crate::clients::QuoteClient;
use crate::config::CostConfig;
use crate::quote_actor::QuoteError;
use crate::services::QuoteServices;
use std::sync::Arc;
use tracing::{error, info};

/// Runtime orchestrator for the quote desk.
///
/// Owns the quote actor's task and hands out the [`QuoteClient`] used to talk to it.
///
/// # Example
///
/// ```ignore
/// let config = Arc::new(load_config()?);
/// let system = QuoteSystem::new(config);
///
/// let id = system.quote_client.create_quote(params).await?;
/// let json = system.quote_client.export_json(id).await?;
///
/// system.shutdown().await?;
/// ```
pub struct QuoteSystem {
    /// Client for interacting with the Quote actor
    pub quote_client: QuoteClient,

    /// Task handles for the running actors (used for graceful shutdown)
    handles: Vec<tokio::task::JoinHandle<()>>,
}

impl QuoteSystem {
    /// Starts the quote actor with the offline services built from `config`.
    ///
    /// Must be called inside a Tokio runtime.
    pub fn new(config: Arc<CostConfig>) -> Self {
        Self::with_services(QuoteServices::local(config))
    }

    /// Starts the quote actor with caller-supplied collaborators.
    pub fn with_services(services: QuoteServices) -> Self {
        let (quote_actor, quote_client) = crate::quote_actor::new();
        let quote_handle = tokio::spawn(quote_actor.run(services));

        Self {
            quote_client: QuoteClient::new(quote_client),
            handles: vec![quote_handle],
        }
    }

    /// Drops the client so the actor's channel closes, then waits for the actor task.
    ///
    /// Clones of `quote_client` held elsewhere keep the actor alive; drop them first.
    pub async fn shutdown(self) -> Result<(), QuoteError> {
        info!("Shutting down quote system...");
        drop(self.quote_client);

        for handle in self.handles {
            if let Err(e) = handle.await {
                error!(error = %e, "Actor task failed");
                return Err(QuoteError::ActorCommunicationError(format!(
                    "Actor task failed: {e}"
                )));
            }
        }

        info!("Quote system shutdown complete.");
        Ok(())
    }
}
