//! Nullable ledger service: scripted streams, recorded publishes.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;
use atto_client::{ClientError, InstantResponse, LedgerApi, LineStream};
use atto_ledger::Transaction;
use atto_types::{Height, PublicKey, Timestamp};
use futures_util::stream::{self, StreamExt};

/// The three subscriptions the ledger serves.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StreamKind {
    Account,
    Receivable,
    Transaction,
}

/// What happens after the scripted lines were delivered.
#[derive(Clone, Debug)]
pub enum StreamEnd {
    /// The server closes the response.
    Close,
    /// The body fails mid-stream.
    Error(String),
    /// The stream stays open without further lines.
    Hang,
}

/// One connection attempt.
#[derive(Clone, Debug)]
pub enum StreamScript {
    /// Opening the stream fails.
    Refuse(String),
    Lines { lines: Vec<String>, end: StreamEnd },
}

impl StreamScript {
    pub fn lines<I, S>(lines: I, end: StreamEnd) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Lines {
            lines: lines.into_iter().map(Into::into).collect(),
            end,
        }
    }
}

#[derive(Default)]
struct State {
    scripts: HashMap<StreamKind, VecDeque<StreamScript>>,
    opens: HashMap<StreamKind, usize>,
    transaction_ranges: Vec<(Height, Height)>,
    published: Vec<Transaction>,
    publish_failure: Option<String>,
    clock_failure: Option<String>,
}

/// A ledger service that plays back scripted subscriptions.
///
/// Each subscription opening consumes the next script for its kind. Once the
/// scripts run out, streams hang until dropped.
pub struct NullLedger {
    difference_millis: i64,
    ack: String,
    state: Mutex<State>,
}

impl NullLedger {
    pub fn new() -> Self {
        Self {
            difference_millis: 0,
            ack: r#"{"status":"ACCEPTED"}"#.to_string(),
            state: Mutex::new(State::default()),
        }
    }

    /// Server clock ahead of the client by `millis`.
    pub fn with_clock_difference(mut self, millis: i64) -> Self {
        self.difference_millis = millis;
        self
    }

    pub fn with_ack(mut self, ack: impl Into<String>) -> Self {
        self.ack = ack.into();
        self
    }

    pub fn script(&self, kind: StreamKind, script: StreamScript) {
        self.state
            .lock()
            .unwrap()
            .scripts
            .entry(kind)
            .or_default()
            .push_back(script);
    }

    pub fn fail_publish(&self, message: impl Into<String>) {
        self.state.lock().unwrap().publish_failure = Some(message.into());
    }

    pub fn fail_clock(&self, message: impl Into<String>) {
        self.state.lock().unwrap().clock_failure = Some(message.into());
    }

    /// How many times a subscription of `kind` was opened.
    pub fn opens(&self, kind: StreamKind) -> usize {
        self.state
            .lock()
            .unwrap()
            .opens
            .get(&kind)
            .copied()
            .unwrap_or(0)
    }

    /// Height ranges requested from the transaction stream, in order.
    pub fn transaction_ranges(&self) -> Vec<(Height, Height)> {
        self.state.lock().unwrap().transaction_ranges.clone()
    }

    pub fn published(&self) -> Vec<Transaction> {
        self.state.lock().unwrap().published.clone()
    }

    fn open(&self, kind: StreamKind) -> Result<LineStream, ClientError> {
        let script = {
            let mut state = self.state.lock().unwrap();
            *state.opens.entry(kind).or_default() += 1;
            state.scripts.get_mut(&kind).and_then(VecDeque::pop_front)
        };

        match script {
            None => Ok(stream::pending().boxed()),
            Some(StreamScript::Refuse(message)) => Err(ClientError::Unreachable(message)),
            Some(StreamScript::Lines { lines, end }) => {
                let lines = stream::iter(lines.into_iter().map(Ok::<String, ClientError>));
                Ok(match end {
                    StreamEnd::Close => lines.boxed(),
                    StreamEnd::Error(message) => lines
                        .chain(stream::once(async move { Err(ClientError::Stream(message)) }))
                        .boxed(),
                    StreamEnd::Hang => lines.chain(stream::pending()).boxed(),
                })
            }
        }
    }
}

impl Default for NullLedger {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LedgerApi for NullLedger {
    async fn account_stream(&self, _public_key: &PublicKey) -> Result<LineStream, ClientError> {
        self.open(StreamKind::Account)
    }

    async fn receivable_stream(&self, _public_key: &PublicKey) -> Result<LineStream, ClientError> {
        self.open(StreamKind::Receivable)
    }

    async fn transaction_stream(
        &self,
        _public_key: &PublicKey,
        from: Height,
        to: Height,
    ) -> Result<LineStream, ClientError> {
        self.state
            .lock()
            .unwrap()
            .transaction_ranges
            .push((from, to));
        self.open(StreamKind::Transaction)
    }

    async fn instant(&self, client_time: Timestamp) -> Result<InstantResponse, ClientError> {
        if let Some(message) = self.state.lock().unwrap().clock_failure.clone() {
            return Err(ClientError::Unreachable(message));
        }
        Ok(InstantResponse {
            client_instant: client_time,
            server_instant: client_time.offset_by(self.difference_millis),
            difference_millis: self.difference_millis,
        })
    }

    async fn publish(&self, transaction: &Transaction) -> Result<String, ClientError> {
        let mut state = self.state.lock().unwrap();
        state.published.push(transaction.clone());
        if let Some(message) = state.publish_failure.clone() {
            return Err(ClientError::Timeout(message));
        }
        Ok(self.ack.clone())
    }
}
