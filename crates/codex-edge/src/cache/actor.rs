//! Actor utilities
//!
//! A service runs as a long-lived async task that owns its state and
//! processes commands received over a channel.

use std::fmt;
use tokio::sync::{mpsc, oneshot};

/// Trait for actor messages - all commands sent to actors must implement this
pub trait ActorMessage: Send + 'static {}

/// Generic actor handle that can send commands to an actor
pub struct ActorHandle<C: ActorMessage> {
    sender: mpsc::Sender<C>,
}

// Manual Clone implementation that doesn't require C: Clone
impl<C: ActorMessage> Clone for ActorHandle<C> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}

impl<C: ActorMessage> ActorHandle<C> {
    pub fn new(sender: mpsc::Sender<C>) -> Self {
        Self { sender }
    }

    /// Send a command to the actor
    pub async fn send(&self, cmd: C) -> Result<(), ActorError> {
        self.sender.send(cmd).await.map_err(ActorError::from)
    }

    /// Send a command built around a reply channel and wait for the reply.
    pub async fn request<R: Send>(
        &self,
        build: impl FnOnce(oneshot::Sender<R>) -> C,
    ) -> Result<R, ActorError> {
        let (tx, rx) = oneshot::channel();
        self.send(build(tx)).await?;
        Ok(rx.await?)
    }

    /// Check if the actor is still alive (channel not closed)
    pub fn is_alive(&self) -> bool {
        !self.sender.is_closed()
    }
}

impl<C: ActorMessage> fmt::Debug for ActorHandle<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActorHandle")
            .field("is_alive", &self.is_alive())
            .finish()
    }
}

/// Spawn an actor task and return its handle
pub fn spawn_actor<C, F, Fut>(buffer_size: usize, actor_fn: F) -> ActorHandle<C>
where
    C: ActorMessage,
    F: FnOnce(mpsc::Receiver<C>) -> Fut + Send + 'static,
    Fut: std::future::Future<Output = ()> + Send + 'static,
{
    let (tx, rx) = mpsc::channel(buffer_size);
    tokio::spawn(actor_fn(rx));
    ActorHandle::new(tx)
}

/// Errors that can occur in actor operations
#[derive(Debug, thiserror::Error)]
pub enum ActorError {
    #[error("Actor channel closed")]
    ChannelClosed,
}

impl From<oneshot::error::RecvError> for ActorError {
    fn from(_: oneshot::error::RecvError) -> Self {
        ActorError::ChannelClosed
    }
}

impl<T> From<mpsc::error::SendError<T>> for ActorError {
    fn from(_: mpsc::error::SendError<T>) -> Self {
        ActorError::ChannelClosed
    }
}
