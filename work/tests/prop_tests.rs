use std::time::Duration;

use proptest::prelude::*;

use atto_ledger::{Block, ReceiveBlock};
use atto_types::{Algorithm, Amount, BlockHash, Height, NetworkId, PublicKey, Timestamp, Version};
use atto_work::{WorkTarget, DEFAULT_LEAD_TIME};

fn receive(timestamp: u64, previous: [u8; 32]) -> Block {
    Block::Receive(ReceiveBlock {
        network: NetworkId::Dev,
        version: Version::CURRENT,
        algorithm: Algorithm::V1,
        public_key: PublicKey([7; 32]),
        height: Height::new(2),
        balance: Amount::new(10),
        timestamp: Timestamp::from_millis(timestamp),
        previous: BlockHash::new(previous),
        send_hash_algorithm: Algorithm::V1,
        send_hash: BlockHash::new([8; 32]),
    })
}

proptest! {
    /// The deadline never lies after the block and never underflows.
    #[test]
    fn deadline_precedes_block(timestamp in any::<u64>(), lead_secs in 0u64..3_600) {
        let block = receive(timestamp, [1; 32]);
        let target = WorkTarget::for_block(&block, Duration::from_secs(lead_secs));
        prop_assert!(target.timestamp <= block.timestamp());
        prop_assert_eq!(
            target.timestamp.as_millis(),
            timestamp.saturating_sub(lead_secs * 1_000)
        );
    }

    /// Chained blocks always target their previous hash.
    #[test]
    fn chained_target_is_previous_hash(previous in prop::array::uniform32(0u8..)) {
        let target = WorkTarget::for_block(&receive(1_000_000, previous), DEFAULT_LEAD_TIME);
        prop_assert_eq!(target.target, hex::encode_upper(previous));
    }
}
