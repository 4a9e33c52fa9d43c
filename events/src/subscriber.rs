use crate::error::{Error, ErrorKind};
use crate::{decode, EventPublisher};
use async_trait::async_trait;
use log::*;

/// A sequential stream of raw payloads read from one bus topic.
#[async_trait]
pub trait EventSource: Send {
    /// Waits for the next raw payload.
    ///
    /// Returns `Ok(None)` once the source is exhausted, an error of kind
    /// [`ErrorKind::Decode`] for a payload that cannot be read as text, and an
    /// error of kind [`ErrorKind::Bus`] if the bus connection is lost.
    async fn next_payload(&mut self) -> Result<Option<String>, Error>;
}

/// Reads payloads from `source` until it ends or fails, publishing every
/// decoded event in order.
///
/// A payload that fails to decode is logged and dropped as a whole; the loop
/// moves on to the next payload. Bus errors are returned to the caller.
pub async fn run_bus_reader<S: EventSource>(
    mut source: S,
    publisher: &EventPublisher,
) -> Result<(), Error> {
    info!("Event bus reader started");

    loop {
        let raw = match source.next_payload().await {
            Ok(Some(raw)) => raw,
            Ok(None) => break,
            Err(e) if e.error_kind == ErrorKind::Decode => {
                warn!("Dropping unreadable bus payload: {e}");
                continue;
            }
            Err(e) => return Err(e),
        };

        let events = match decode(&raw) {
            Ok(events) => events,
            Err(e) => {
                warn!("Dropping bus payload: {e}");
                continue;
            }
        };

        trace!("Decoded {} event(s) from bus payload", events.len());
        for event in &events {
            publisher.publish(event).await;
        }
    }

    info!("Event bus source exhausted, reader stopping");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::RecordingHandler;
    use std::collections::VecDeque;
    use std::sync::Arc;

    /// In-memory source that yields queued payloads, then optionally fails.
    struct QueuedSource {
        payloads: VecDeque<String>,
        fail_at_end: bool,
    }

    impl QueuedSource {
        fn new(payloads: &[&str]) -> Self {
            Self {
                payloads: payloads.iter().map(|p| p.to_string()).collect(),
                fail_at_end: false,
            }
        }
    }

    #[async_trait]
    impl EventSource for QueuedSource {
        async fn next_payload(&mut self) -> Result<Option<String>, Error> {
            match self.payloads.pop_front() {
                Some(payload) => Ok(Some(payload)),
                None if self.fail_at_end => Err(Error {
                    source: None,
                    error_kind: ErrorKind::Bus,
                }),
                None => Ok(None),
            }
        }
    }

    fn targets(handler: &RecordingHandler) -> Vec<String> {
        handler
            .seen
            .lock()
            .unwrap()
            .iter()
            .map(|e| e.target_identity.clone())
            .collect()
    }

    #[tokio::test]
    async fn publishes_events_across_payloads_in_order() {
        let handler = Arc::new(RecordingHandler::default());
        let publisher = EventPublisher::new().with_handler(handler.clone());
        let source = QueuedSource::new(&[
            r#"[{"user_id":"a","data":1},{"user_id":"b","data":2}]"#,
            r#"[{"user_id":"c","data":3}]"#,
        ]);

        run_bus_reader(source, &publisher).await.unwrap();

        assert_eq!(targets(&handler), vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn malformed_payload_is_skipped_and_reading_continues() {
        let handler = Arc::new(RecordingHandler::default());
        let publisher = EventPublisher::new().with_handler(handler.clone());
        let source = QueuedSource::new(&[
            r#"[{"user_id":"1","data":{}},{INVALID}]"#,
            r#"[{"user_id":"2","data":{}}]"#,
        ]);

        run_bus_reader(source, &publisher).await.unwrap();

        // Nothing from the broken payload leaks through, not even its valid first record.
        assert_eq!(targets(&handler), vec!["2"]);
    }

    #[tokio::test]
    async fn bus_failure_stops_the_reader() {
        let handler = Arc::new(RecordingHandler::default());
        let publisher = EventPublisher::new().with_handler(handler.clone());
        let mut source = QueuedSource::new(&[r#"[{"user_id":"1","data":{}}]"#]);
        source.fail_at_end = true;

        let err = run_bus_reader(source, &publisher).await.unwrap_err();

        assert_eq!(err.error_kind, ErrorKind::Bus);
        assert_eq!(targets(&handler), vec!["1"]);
    }
}
