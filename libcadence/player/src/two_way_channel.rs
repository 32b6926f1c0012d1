use flume::{Receiver, Sender};
use thiserror::Error;
use tokio::sync::oneshot;

#[derive(Error, Debug, Clone)]
pub(crate) enum ChannelError {
    #[error("Receiver has shut down")]
    Disconnected,
    #[error("Responder was dropped before replying")]
    NoResponse,
}

#[derive(Debug)]
struct Request<TIn, TOut> {
    message: TIn,
    responder: Option<oneshot::Sender<TOut>>,
}

pub(crate) fn two_way_channel<TIn, TOut>() -> (TwoWaySender<TIn, TOut>, TwoWayReceiver<TIn, TOut>) {
    let (main_tx, main_rx) = flume::unbounded();
    (
        TwoWaySender { main_tx },
        TwoWayReceiver {
            main_rx,
            responder: None,
        },
    )
}

#[derive(Debug)]
pub(crate) struct TwoWaySender<TIn, TOut> {
    main_tx: Sender<Request<TIn, TOut>>,
}

// Derive would require TIn: Clone and TOut: Clone
impl<TIn, TOut> Clone for TwoWaySender<TIn, TOut> {
    fn clone(&self) -> Self {
        Self {
            main_tx: self.main_tx.clone(),
        }
    }
}

#[derive(Debug)]
pub(crate) struct TwoWayReceiver<TIn, TOut> {
    main_rx: Receiver<Request<TIn, TOut>>,
    responder: Option<oneshot::Sender<TOut>>,
}

impl<TIn, TOut> TwoWaySender<TIn, TOut> {
    pub(crate) async fn send_async(&self, message: TIn) -> Result<(), ChannelError> {
        self.main_tx
            .send_async(Request {
                message,
                responder: None,
            })
            .await
            .map_err(|_| ChannelError::Disconnected)
    }

    pub(crate) fn send(&self, message: TIn) -> Result<(), ChannelError> {
        self.main_tx
            .send(Request {
                message,
                responder: None,
            })
            .map_err(|_| ChannelError::Disconnected)
    }

    pub(crate) async fn get_response(&self, message: TIn) -> Result<TOut, ChannelError> {
        let (responder, response_rx) = oneshot::channel();
        self.main_tx
            .send_async(Request {
                message,
                responder: Some(responder),
            })
            .await
            .map_err(|_| ChannelError::Disconnected)?;
        response_rx.await.map_err(|_| ChannelError::NoResponse)
    }
}

impl<TIn, TOut> TwoWayReceiver<TIn, TOut> {
    /// Waits for the next message. Returns `None` once every sender is gone.
    pub(crate) async fn recv_async(&mut self) -> Option<TIn> {
        let request = self.main_rx.recv_async().await.ok()?;
        self.responder = request.responder;
        Some(request.message)
    }

    /// Replies to the most recently received message, if its sender asked for a response.
    pub(crate) fn respond(&mut self, response: TOut) -> Result<(), TOut> {
        match self.responder.take() {
            Some(responder) => responder.send(response),
            None => Ok(()),
        }
    }
}
