#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use atto_crypto::{keypair_from_seed, KeySigner, Signer};
use atto_ledger::{AccountSnapshot, Block, Receivable, SendBlock, Transaction};
use atto_nullables::{NullClock, NullLedger, NullWorker};
use atto_types::{
    Algorithm, Amount, BlockHash, Height, NetworkId, PublicKey, Signature, Timestamp, Version,
    Work,
};
use atto_wallet_core::{
    AccountParams, AccountStateStore, Collaborators, MutationEngine, WalletMetrics,
};

pub const START: u64 = 1_700_000_000_000;
pub const SENDER: PublicKey = PublicKey([0x5E; 32]);
pub const RECIPIENT: PublicKey = PublicKey([0x2C; 32]);
pub const LAST_HASH: BlockHash = BlockHash::new([0x1A; 32]);

pub fn signer() -> Arc<KeySigner> {
    Arc::new(KeySigner::new(keypair_from_seed(&[7; 32])))
}

pub fn snapshot(public_key: PublicKey, height: u64, balance: u64) -> AccountSnapshot {
    AccountSnapshot {
        public_key,
        network: NetworkId::Local,
        version: Version::CURRENT,
        algorithm: Algorithm::V1,
        height: Height::new(height),
        balance: Amount::new(balance),
        last_transaction_hash: LAST_HASH,
        last_transaction_timestamp: Timestamp::from_millis(START - 1_000),
        representative_algorithm: Algorithm::V1,
        representative_public_key: public_key,
    }
}

pub fn receivable(hash: BlockHash, receiver: PublicKey, amount: u64) -> Receivable {
    Receivable {
        hash,
        version: Version::CURRENT,
        algorithm: Algorithm::V1,
        public_key: SENDER,
        timestamp: Timestamp::from_millis(START - 5_000),
        receiver_algorithm: Algorithm::V1,
        receiver_public_key: receiver,
        amount: Amount::new(amount),
    }
}

/// A confirmed send from [`SENDER`] to `receiver`, as the ledger pushes it.
pub fn sender_transaction(receiver: PublicKey, amount: u64) -> Transaction {
    Transaction {
        block: Block::Send(SendBlock {
            network: NetworkId::Local,
            version: Version::CURRENT,
            algorithm: Algorithm::V1,
            public_key: SENDER,
            height: Height::new(9),
            balance: Amount::new(1_000),
            timestamp: Timestamp::from_millis(START - 5_000),
            previous: BlockHash::new([0x33; 32]),
            receiver_algorithm: Algorithm::V1,
            receiver_public_key: receiver,
            amount: Amount::new(amount),
        }),
        signature: Signature([0; 64]),
        work: Work([0; 8]),
    }
}

pub fn json<T: serde::Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap()
}

pub struct Harness {
    pub ledger: Arc<NullLedger>,
    pub worker: Arc<NullWorker>,
    pub clock: Arc<NullClock>,
    pub signer: Arc<KeySigner>,
    pub account: Arc<AccountStateStore>,
    pub metrics: Arc<WalletMetrics>,
    pub engine: Arc<MutationEngine>,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_ledger(NullLedger::new())
    }

    pub fn with_ledger(ledger: NullLedger) -> Self {
        let ledger = Arc::new(ledger);
        let worker = Arc::new(NullWorker::default());
        let clock = Arc::new(NullClock::new(Timestamp::from_millis(START)));
        let signer = signer();
        let account = Arc::new(AccountStateStore::new());
        let metrics = Arc::new(WalletMetrics::new());
        let engine = Arc::new(MutationEngine::new(
            AccountParams {
                network: NetworkId::Local,
                algorithm: Algorithm::V1,
                representative: signer.public_key(),
            },
            account.clone(),
            ledger.clone(),
            worker.clone(),
            signer.clone(),
            clock.clone(),
            metrics.clone(),
        ));
        Self {
            ledger,
            worker,
            clock,
            signer,
            account,
            metrics,
            engine,
        }
    }

    pub fn me(&self) -> PublicKey {
        self.signer.public_key()
    }

    pub fn collaborators(&self) -> Collaborators {
        Collaborators {
            ledger: self.ledger.clone(),
            worker: self.worker.clone(),
            signer: self.signer.clone(),
            clock: self.clock.clone(),
        }
    }
}

/// Yield until `condition` holds; panics after five seconds.
pub async fn eventually(mut condition: impl FnMut() -> bool) {
    tokio::time::timeout(Duration::from_secs(5), async {
        while !condition() {
            tokio::task::yield_now().await;
        }
    })
    .await
    .expect("condition not reached in time");
}
