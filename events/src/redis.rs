//! Redis pub/sub implementation of [`EventSource`].

use crate::error::{Error, ErrorKind};
use crate::subscriber::EventSource;
use async_trait::async_trait;
use futures::stream::{BoxStream, StreamExt};
use log::*;

/// Subscription to a single Redis pub/sub channel.
pub struct RedisEventSource {
    channel: String,
    messages: BoxStream<'static, ::redis::Msg>,
}

impl RedisEventSource {
    /// Connects to the Redis server at `url` and subscribes to `channel`.
    pub async fn connect(url: &str, channel: &str) -> Result<Self, Error> {
        let client = ::redis::Client::open(url)?;
        let mut pubsub = client.get_async_pubsub().await?;
        pubsub.subscribe(channel).await?;

        info!("Subscribed to event bus channel \"{channel}\"");

        Ok(Self {
            channel: channel.to_string(),
            messages: pubsub.into_on_message().boxed(),
        })
    }
}

#[async_trait]
impl EventSource for RedisEventSource {
    async fn next_payload(&mut self) -> Result<Option<String>, Error> {
        match self.messages.next().await {
            Some(message) => message.get_payload::<String>().map(Some).map_err(|e| Error {
                source: Some(Box::new(e)),
                error_kind: ErrorKind::Decode,
            }),
            // A Redis subscription only ends when the connection drops.
            None => {
                error!("Lost subscription to event bus channel \"{}\"", self.channel);
                Err(Error {
                    source: None,
                    error_kind: ErrorKind::Bus,
                })
            }
        }
    }
}
