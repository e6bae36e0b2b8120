//! Unsigned blocks, the state transitions of an account chain.
//!
//! A block carries the full account state after the operation (height,
//! balance, timestamp), so a block and its predecessor are enough to check a
//! transition. The hash of a block is Blake2b-256 over its canonical bytes.

use atto_types::{Algorithm, Amount, BlockHash, Height, NetworkId, PublicKey, Timestamp, Version};
use serde::{Deserialize, Serialize};

/// The operation a block performs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BlockKind {
    /// First block of an account, created from a receivable.
    Open,
    /// Debits the balance towards a receiver.
    Send,
    /// Credits the balance from a receivable.
    Receive,
}

impl BlockKind {
    fn code(&self) -> u8 {
        match self {
            Self::Open => 0,
            Self::Send => 1,
            Self::Receive => 2,
        }
    }
}

/// First block of an account chain. Has no previous block; its height is 1.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenBlock {
    pub network: NetworkId,
    pub version: Version,
    pub algorithm: Algorithm,
    pub public_key: PublicKey,
    pub balance: Amount,
    pub timestamp: Timestamp,
    pub send_hash_algorithm: Algorithm,
    pub send_hash: BlockHash,
    pub representative_algorithm: Algorithm,
    pub representative_public_key: PublicKey,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendBlock {
    pub network: NetworkId,
    pub version: Version,
    pub algorithm: Algorithm,
    pub public_key: PublicKey,
    pub height: Height,
    pub balance: Amount,
    pub timestamp: Timestamp,
    pub previous: BlockHash,
    pub receiver_algorithm: Algorithm,
    pub receiver_public_key: PublicKey,
    pub amount: Amount,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiveBlock {
    pub network: NetworkId,
    pub version: Version,
    pub algorithm: Algorithm,
    pub public_key: PublicKey,
    pub height: Height,
    pub balance: Amount,
    pub timestamp: Timestamp,
    pub previous: BlockHash,
    pub send_hash_algorithm: Algorithm,
    pub send_hash: BlockHash,
}

/// Any block, tagged on the wire by `"type"`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "UPPERCASE")]
pub enum Block {
    Open(OpenBlock),
    Send(SendBlock),
    Receive(ReceiveBlock),
}

/// Big-endian byte sink for the canonical block layout.
struct CanonicalWriter(Vec<u8>);

impl CanonicalWriter {
    fn u8(&mut self, value: u8) -> &mut Self {
        self.0.push(value);
        self
    }

    fn u16(&mut self, value: u16) -> &mut Self {
        self.0.extend_from_slice(&value.to_be_bytes());
        self
    }

    fn u64(&mut self, value: u64) -> &mut Self {
        self.0.extend_from_slice(&value.to_be_bytes());
        self
    }

    fn bytes(&mut self, value: &[u8]) -> &mut Self {
        self.0.extend_from_slice(value);
        self
    }
}

impl Block {
    pub fn kind(&self) -> BlockKind {
        match self {
            Self::Open(_) => BlockKind::Open,
            Self::Send(_) => BlockKind::Send,
            Self::Receive(_) => BlockKind::Receive,
        }
    }

    pub fn network(&self) -> NetworkId {
        match self {
            Self::Open(b) => b.network,
            Self::Send(b) => b.network,
            Self::Receive(b) => b.network,
        }
    }

    pub fn public_key(&self) -> PublicKey {
        match self {
            Self::Open(b) => b.public_key,
            Self::Send(b) => b.public_key,
            Self::Receive(b) => b.public_key,
        }
    }

    pub fn height(&self) -> Height {
        match self {
            Self::Open(_) => Height::INITIAL,
            Self::Send(b) => b.height,
            Self::Receive(b) => b.height,
        }
    }

    pub fn balance(&self) -> Amount {
        match self {
            Self::Open(b) => b.balance,
            Self::Send(b) => b.balance,
            Self::Receive(b) => b.balance,
        }
    }

    pub fn timestamp(&self) -> Timestamp {
        match self {
            Self::Open(b) => b.timestamp,
            Self::Send(b) => b.timestamp,
            Self::Receive(b) => b.timestamp,
        }
    }

    /// Hash of the preceding block in the chain; `None` for open blocks.
    pub fn previous(&self) -> Option<BlockHash> {
        match self {
            Self::Open(_) => None,
            Self::Send(b) => Some(b.previous),
            Self::Receive(b) => Some(b.previous),
        }
    }

    /// Canonical byte layout: kind, network, version, algorithm, public key,
    /// height, balance, timestamp, then the kind-specific fields.
    pub fn canonical_bytes(&self) -> Vec<u8> {
        let mut w = CanonicalWriter(Vec::with_capacity(160));
        w.u8(self.kind().code())
            .u8(self.network().code());

        match self {
            Self::Open(b) => {
                w.u16(b.version.0)
                    .u8(b.algorithm.code())
                    .bytes(b.public_key.as_bytes())
                    .u64(Height::INITIAL.value())
                    .u64(b.balance.raw())
                    .u64(b.timestamp.as_millis())
                    .u8(b.send_hash_algorithm.code())
                    .bytes(b.send_hash.as_bytes())
                    .u8(b.representative_algorithm.code())
                    .bytes(b.representative_public_key.as_bytes());
            }
            Self::Send(b) => {
                w.u16(b.version.0)
                    .u8(b.algorithm.code())
                    .bytes(b.public_key.as_bytes())
                    .u64(b.height.value())
                    .u64(b.balance.raw())
                    .u64(b.timestamp.as_millis())
                    .bytes(b.previous.as_bytes())
                    .u8(b.receiver_algorithm.code())
                    .bytes(b.receiver_public_key.as_bytes())
                    .u64(b.amount.raw());
            }
            Self::Receive(b) => {
                w.u16(b.version.0)
                    .u8(b.algorithm.code())
                    .bytes(b.public_key.as_bytes())
                    .u64(b.height.value())
                    .u64(b.balance.raw())
                    .u64(b.timestamp.as_millis())
                    .bytes(b.previous.as_bytes())
                    .u8(b.send_hash_algorithm.code())
                    .bytes(b.send_hash.as_bytes());
            }
        }
        w.0
    }

    pub fn hash(&self) -> BlockHash {
        atto_crypto::hash_block(&self.canonical_bytes())
    }
}

impl From<OpenBlock> for Block {
    fn from(block: OpenBlock) -> Self {
        Self::Open(block)
    }
}

impl From<SendBlock> for Block {
    fn from(block: SendBlock) -> Self {
        Self::Send(block)
    }
}

impl From<ReceiveBlock> for Block {
    fn from(block: ReceiveBlock) -> Self {
        Self::Receive(block)
    }
}
