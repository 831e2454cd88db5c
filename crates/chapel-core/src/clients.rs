//! Open application pages controlled by the worker.

use crate::error::ClientError;
use crate::message::ClientMessage;

/// Worker lifecycle controls and the set of open pages.
///
/// The router never owns the pages; it queries them transiently to
/// broadcast update notifications.
#[allow(async_fn_in_trait)]
pub trait ClientRegistry {
    type Client: ClientHandle;

    /// Activate this worker without waiting for the previous one to finish.
    /// Safe to call repeatedly.
    async fn skip_waiting(&self) -> Result<(), ClientError>;

    /// Take control of every open page.
    async fn claim(&self) -> Result<(), ClientError>;

    /// Every currently open page.
    async fn match_all(&self) -> Result<Vec<Self::Client>, ClientError>;
}

/// A single open page.
pub trait ClientHandle {
    fn id(&self) -> String;

    fn post_message(&self, message: &ClientMessage) -> Result<(), ClientError>;
}
