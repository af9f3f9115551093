//! The reveal sequence: the decorative strip the spin animation scrolls.

use cropcase_protocol::RewardItem;
use rand::Rng;

use crate::RevealConfig;

/// A fixed-length strip of reward items with the authoritative reward at
/// one fixed slot.
///
/// Everything except the reveal slot is a *decoy*, drawn uniformly at
/// random from the case's pool. Decoys exist purely so the spin looks like
/// a draw; they carry no economic effect and are forgotten after the
/// animation. The slot the marker stops on is decided before the strip is
/// built — by the server, not the spin.
#[derive(Debug, Clone)]
pub struct RevealSequence {
    items: Vec<RewardItem>,
    reveal_slot: usize,
}

impl RevealSequence {
    /// Builds a strip for `reward` using decoys from `pool`.
    ///
    /// The pool is the case's own reward list, so a well-formed case always
    /// has at least the winning item in it. Should the pool arrive empty
    /// anyway, every slot holds the reward itself: a boring strip beats a
    /// broken open.
    pub fn build(
        pool: &[RewardItem],
        reward: &RewardItem,
        config: &RevealConfig,
        rng: &mut impl Rng,
    ) -> Self {
        let mut items = Vec::with_capacity(config.sequence_len);
        for slot in 0..config.sequence_len {
            if slot == config.reveal_slot || pool.is_empty() {
                items.push(reward.clone());
            } else {
                items.push(pool[rng.random_range(0..pool.len())].clone());
            }
        }
        Self {
            items,
            reveal_slot: config.reveal_slot,
        }
    }

    /// The full strip, in display order.
    pub fn items(&self) -> &[RewardItem] {
        &self.items
    }

    /// The zero-based slot the marker stops on.
    pub fn reveal_slot(&self) -> usize {
        self.reveal_slot
    }

    /// The item at the reveal slot: always the authoritative reward.
    pub fn revealed(&self) -> &RewardItem {
        &self.items[self.reveal_slot]
    }

    /// Number of slots in the strip.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the strip is empty (it never is after `build`).
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use cropcase_protocol::{ItemId, Rarity};

    fn item(id: u64, name: &str) -> RewardItem {
        RewardItem {
            id: ItemId(id),
            name: name.into(),
            emoji: "🥬".into(),
            rarity: Rarity::Common,
            rarity_display: "🥔 Common".into(),
            description: String::new(),
            price: 10,
        }
    }

    fn pool() -> Vec<RewardItem> {
        vec![item(1, "Potato"), item(2, "Carrot"), item(3, "Tomato")]
    }

    fn config() -> RevealConfig {
        RevealConfig::default()
    }

    #[test]
    fn test_build_places_reward_at_reveal_slot() {
        let reward = item(2, "Carrot");
        let seq = RevealSequence::build(&pool(), &reward, &config(), &mut rand::rng());

        assert_eq!(seq.reveal_slot(), 30);
        assert_eq!(seq.items()[30], reward);
        assert_eq!(*seq.revealed(), reward);
    }

    #[test]
    fn test_build_produces_configured_length() {
        let reward = item(1, "Potato");
        let seq = RevealSequence::build(&pool(), &reward, &config(), &mut rand::rng());

        assert_eq!(seq.len(), 51);
        assert!(!seq.is_empty());
    }

    #[test]
    fn test_build_decoys_all_come_from_the_pool() {
        let pool = pool();
        let reward = item(2, "Carrot");
        let seq = RevealSequence::build(&pool, &reward, &config(), &mut rand::rng());

        for (slot, decoy) in seq.items().iter().enumerate() {
            if slot == seq.reveal_slot() {
                continue;
            }
            assert!(
                pool.contains(decoy),
                "slot {slot} holds an item not in the pool: {decoy:?}"
            );
        }
    }

    #[test]
    fn test_build_reward_need_not_be_pool_member() {
        // The server is authoritative; if it hands out something the cached
        // pool doesn't list (say, the catalog is stale), the strip still
        // reveals it.
        let reward = item(99, "Golden Pumpkin");
        let seq = RevealSequence::build(&pool(), &reward, &config(), &mut rand::rng());

        assert_eq!(*seq.revealed(), reward);
    }

    #[test]
    fn test_build_empty_pool_fills_with_reward() {
        let reward = item(2, "Carrot");
        let seq = RevealSequence::build(&[], &reward, &config(), &mut rand::rng());

        assert_eq!(seq.len(), 51);
        assert!(seq.items().iter().all(|i| *i == reward));
    }

    #[test]
    fn test_build_single_item_pool_is_degenerate_but_valid() {
        let only = item(1, "Potato");
        let seq = RevealSequence::build(
            std::slice::from_ref(&only),
            &only,
            &config(),
            &mut rand::rng(),
        );

        assert!(seq.items().iter().all(|i| *i == only));
    }

    #[test]
    fn test_build_respects_custom_config() {
        let custom = RevealConfig {
            sequence_len: 5,
            reveal_slot: 2,
            ..RevealConfig::default()
        };
        let reward = item(3, "Tomato");
        let seq = RevealSequence::build(&pool(), &reward, &custom, &mut rand::rng());

        assert_eq!(seq.len(), 5);
        assert_eq!(seq.reveal_slot(), 2);
        assert_eq!(*seq.revealed(), reward);
    }
}
