use std::time::Duration;

use serde_json::Value;

use crate::api::{self, StatusClient};
use crate::error::{CycleError, FetchError};
use crate::status::parse_status;
use crate::telegram::TelegramBot;

/// How long to wait between poll cycles. A failed cycle waits the same fixed
/// interval: the interval itself is the retry delay, with no backoff.
pub const POLL_INTERVAL: Duration = Duration::from_secs(600);

/// Source of homework status responses.
pub trait StatusApi {
    async fn get_api_answer(&self, from_date: i64) -> Result<Value, FetchError>;
}

impl StatusApi for StatusClient {
    async fn get_api_answer(&self, from_date: i64) -> Result<Value, FetchError> {
        StatusClient::get_api_answer(self, from_date).await
    }
}

/// Sink for outbound notifications. Sending never fails from the loop's point
/// of view; the sink logs and swallows its own errors.
pub trait Notify {
    async fn send_message(&self, text: &str);
}

impl Notify for TelegramBot {
    async fn send_message(&self, text: &str) {
        TelegramBot::send_message(self, text).await;
    }
}

/// The polling loop: owns the cursor and applies the catch-log-continue
/// policy around each cycle.
pub struct Poller<A, N> {
    api: A,
    notifier: N,
    interval: Duration,
}

impl<A: StatusApi, N: Notify> Poller<A, N> {
    pub fn new(api: A, notifier: N) -> Self {
        Self {
            api,
            notifier,
            interval: POLL_INTERVAL,
        }
    }

    /// Run forever. Only process-level termination ends the loop.
    pub async fn run(&self, start_cursor: i64) {
        tracing::info!(interval = ?self.interval, "Polling loop started");
        let mut ticker = tokio::time::interval(self.interval);
        let mut cursor = start_cursor;
        loop {
            ticker.tick().await;
            cursor = self.run_cycle(cursor).await;
        }
    }

    /// One fetch → validate → interpret → notify cycle.
    ///
    /// Returns the cursor for the next cycle. The cursor moves only when the
    /// fetch itself succeeded and the server reported `current_date`; a failed
    /// fetch never reuses an earlier response.
    async fn run_cycle(&self, cursor: i64) -> i64 {
        let (next_cursor, outcome) = match self.api.get_api_answer(cursor).await {
            Ok(response) => {
                let next = api::current_date(&response).unwrap_or(cursor);
                (next, self.interpret(&response))
            }
            Err(err) => (cursor, Err(CycleError::Fetch(err))),
        };

        // Internal failures stay in the logs; the chat only ever sees genuine
        // status changes (and the one startup message).
        match outcome {
            Ok(Some(message)) => self.notifier.send_message(&message).await,
            Ok(None) => tracing::debug!("No status changes since last check"),
            Err(CycleError::Fetch(err)) => {
                tracing::error!(error = %err, "Status fetch failed, retrying next cycle");
            }
            Err(CycleError::Shape(err)) => {
                tracing::error!(error = %err, "Malformed status API response");
            }
            Err(CycleError::Record(err)) => {
                tracing::error!(error = %err, "Could not interpret homework record");
            }
        }

        next_cursor
    }

    /// Pick the message for the most recent record, if any. Older records in
    /// the same batch are skipped.
    fn interpret(&self, response: &Value) -> Result<Option<String>, CycleError> {
        let homeworks = api::check_response(response)?;
        let Some(latest) = homeworks.first() else {
            return Ok(None);
        };
        if homeworks.len() > 1 {
            tracing::debug!(
                skipped = homeworks.len() - 1,
                "Interpreting only the most recent record"
            );
        }
        Ok(Some(parse_status(latest)?))
    }
}

#[cfg(test)]
mod tests {
    use std::io;
    use std::sync::Mutex;

    use serde_json::json;

    use super::*;

    struct FakeApi {
        response: Mutex<Option<Result<Value, FetchError>>>,
    }

    impl FakeApi {
        fn ok(value: Value) -> Self {
            Self {
                response: Mutex::new(Some(Ok(value))),
            }
        }

        fn transport_error() -> Self {
            let err = FetchError::Transport {
                source: Box::new(io::Error::new(
                    io::ErrorKind::ConnectionReset,
                    "connection reset by peer",
                )),
            };
            Self {
                response: Mutex::new(Some(Err(err))),
            }
        }
    }

    impl StatusApi for FakeApi {
        async fn get_api_answer(&self, _from_date: i64) -> Result<Value, FetchError> {
            self.response
                .lock()
                .unwrap()
                .take()
                .expect("unexpected extra fetch")
        }
    }

    #[derive(Default)]
    struct FakeNotifier {
        sent: Mutex<Vec<String>>,
    }

    impl Notify for FakeNotifier {
        async fn send_message(&self, text: &str) {
            self.sent.lock().unwrap().push(text.to_string());
        }
    }

    fn sent(poller: &Poller<FakeApi, FakeNotifier>) -> Vec<String> {
        poller.notifier.sent.lock().unwrap().clone()
    }

    #[tokio::test]
    async fn status_change_is_notified_and_cursor_advances() {
        let api = FakeApi::ok(json!({
            "homeworks": [{ "homework_name": "hw1", "status": "approved" }],
            "current_date": 1000,
        }));
        let poller = Poller::new(api, FakeNotifier::default());

        let cursor = poller.run_cycle(0).await;

        assert_eq!(cursor, 1000);
        assert_eq!(
            sent(&poller),
            vec![
                "Изменился статус проверки работы \"hw1\". \
                 Работа проверена: ревьюеру всё понравилось. Ура!"
                    .to_string()
            ]
        );
    }

    #[tokio::test]
    async fn empty_batch_sends_nothing() {
        let api = FakeApi::ok(json!({ "homeworks": [] }));
        let poller = Poller::new(api, FakeNotifier::default());

        let cursor = poller.run_cycle(500).await;

        assert_eq!(cursor, 500);
        assert!(sent(&poller).is_empty());
    }

    #[tokio::test]
    async fn malformed_response_is_contained() {
        let api = FakeApi::ok(json!({ "status": "ok" }));
        let poller = Poller::new(api, FakeNotifier::default());

        let cursor = poller.run_cycle(500).await;

        assert_eq!(cursor, 500);
        assert!(sent(&poller).is_empty());
    }

    #[tokio::test]
    async fn fetch_failure_leaves_cursor_untouched() {
        let api = FakeApi::transport_error();
        let poller = Poller::new(api, FakeNotifier::default());

        let cursor = poller.run_cycle(500).await;

        assert_eq!(cursor, 500);
        assert!(sent(&poller).is_empty());
    }

    #[tokio::test]
    async fn cursor_advances_even_when_interpretation_fails() {
        // The fetch succeeded, so the window moves; only the bad record is lost.
        let api = FakeApi::ok(json!({
            "homeworks": [{ "homework_name": "hw1", "status": "lost" }],
            "current_date": 2000,
        }));
        let poller = Poller::new(api, FakeNotifier::default());

        let cursor = poller.run_cycle(500).await;

        assert_eq!(cursor, 2000);
        assert!(sent(&poller).is_empty());
    }

    #[tokio::test]
    async fn only_the_most_recent_record_is_notified() {
        let api = FakeApi::ok(json!({
            "homeworks": [
                { "homework_name": "hw2", "status": "reviewing" },
                { "homework_name": "hw1", "status": "approved" },
            ],
        }));
        let poller = Poller::new(api, FakeNotifier::default());

        poller.run_cycle(0).await;

        let messages = sent(&poller);
        assert_eq!(messages.len(), 1);
        assert!(messages[0].contains("hw2"));
    }
}
