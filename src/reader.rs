//! Background read loop: keepalive replies and chat message dispatch.

use std::sync::Arc;

use futures_util::StreamExt;
use tokio::io::AsyncRead;
use tokio::sync::mpsc;
use tokio_util::codec::FramedRead;
use tracing::{debug, warn};

use crate::line::LineCodec;
use crate::message::Message;
use crate::sender::Sender;

pub(crate) type BoxedReader = Box<dyn AsyncRead + Send + Unpin>;

/// What the reader does when the consumer's queue is full.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Overflow {
    /// Wait for the consumer. Nothing is lost, but a slow consumer also
    /// delays keepalive replies.
    #[default]
    Block,
    /// Drop the incoming message and keep reading.
    DropNewest,
}

const PING: &str = "PING";
const PONG: &str = "PONG";

/// Keepalive reply for `frame`, if it is a keepalive probe.
pub(crate) fn keepalive_reply(frame: &str) -> Option<String> {
    frame
        .strip_prefix(PING)
        .map(|rest| format!("{}{}", PONG, rest))
}

pub(crate) struct Reader {
    frames: FramedRead<BoxedReader, LineCodec>,
    sender: Arc<Sender>,
    queue: mpsc::Sender<Message>,
    overflow: Overflow,
}

impl Reader {
    pub(crate) fn new(
        reader: BoxedReader,
        sender: Arc<Sender>,
        queue: mpsc::Sender<Message>,
        overflow: Overflow,
    ) -> Self {
        Self {
            frames: FramedRead::new(reader, LineCodec::new()),
            sender,
            queue,
            overflow,
        }
    }

    /// Read frames until the stream ends or fails.
    ///
    /// Returning drops the queue sender, which closes the consumer's
    /// message sequence.
    pub(crate) async fn run(mut self) {
        let mut consumer_gone = false;

        while let Some(frame) = self.frames.next().await {
            let frame = match frame {
                Ok(frame) => frame,
                Err(e) => {
                    warn!("read failed, closing connection: {}", e);
                    break;
                }
            };
            debug!("← {}", frame);

            if let Some(reply) = keepalive_reply(&frame) {
                if let Err(e) = self.sender.send(reply).await {
                    warn!("keepalive reply failed: {}", e);
                    break;
                }
                continue;
            }

            let Some(message) = Message::parse(&frame) else {
                continue;
            };
            if consumer_gone {
                continue;
            }
            consumer_gone = !publish(&self.queue, self.overflow, message).await;
        }

        debug!("reader finished");
    }
}

/// Hand a message to the consumer. Returns `false` once the consumer has
/// dropped its end of the queue.
async fn publish(queue: &mpsc::Sender<Message>, overflow: Overflow, message: Message) -> bool {
    match overflow {
        Overflow::Block => queue.send(message).await.is_ok(),
        Overflow::DropNewest => match queue.try_send(message) {
            Ok(()) => true,
            Err(mpsc::error::TrySendError::Full(dropped)) => {
                warn!(
                    "message queue full, dropping message from {}",
                    dropped.sender
                );
                true
            }
            Err(mpsc::error::TrySendError::Closed(_)) => false,
        },
    }
}
