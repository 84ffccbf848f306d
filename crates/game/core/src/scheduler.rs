//! Turn scheduling: builds the ordered acting queue for one round.
//!
//! Combatants are partitioned into speed buckets, each bucket is shuffled
//! independently with a fresh sub-seed, and the buckets are concatenated
//! FAST then NORMAL then SLOW. The shuffle is re-drawn every round: order
//! within a tier is never stable across rounds.

use std::collections::VecDeque;

use crate::entity::{CharacterId, Entities, Speed};
use crate::rng::{compute_seed, shuffle, RngOracle};

/// Builds the round's total order over the living members of `combatants`.
///
/// Dead combatants are skipped; an empty result signals the caller that the
/// round loop has reached its terminal all-dead condition rather than a
/// queue to rebuild again.
pub fn prepare_queue(
    entities: &Entities,
    combatants: &[CharacterId],
    rng: &dyn RngOracle,
    seed: u64,
) -> VecDeque<CharacterId> {
    let mut fast = Vec::new();
    let mut normal = Vec::new();
    let mut slow = Vec::new();

    for &id in combatants {
        let Some(character) = entities.character(id) else {
            continue;
        };
        if !character.is_alive() {
            continue;
        }
        match character.speed {
            Speed::Fast => fast.push(id),
            Speed::Normal => normal.push(id),
            Speed::Slow => slow.push(id),
        }
    }

    let mut queue = VecDeque::with_capacity(fast.len() + normal.len() + slow.len());
    for (tier, bucket) in [(0u64, &mut fast), (1, &mut normal), (2, &mut slow)] {
        shuffle(bucket, rng, compute_seed(seed, tier, 0));
        queue.extend(bucket.iter().copied());
    }
    queue
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::Speed;
    use crate::rng::PcgRng;
    use crate::testutil::spawn_plain;

    fn spawn(entities: &mut Entities, name: &str, speed: Speed, hp: i32) -> CharacterId {
        spawn_plain(entities, name, hp, speed)
    }

    #[test]
    fn queue_is_fast_then_normal_then_slow() {
        let mut entities = Entities::new();
        let mut all = Vec::new();
        for i in 0..4 {
            all.push(spawn(&mut entities, &format!("f{i}"), Speed::Fast, 5));
        }
        for i in 0..3 {
            all.push(spawn(&mut entities, &format!("n{i}"), Speed::Normal, 5));
        }
        for i in 0..2 {
            all.push(spawn(&mut entities, &format!("s{i}"), Speed::Slow, 5));
        }

        let queue = prepare_queue(&entities, &all, &PcgRng, 99);
        assert_eq!(queue.len(), all.len());

        let speeds: Vec<Speed> = queue
            .iter()
            .map(|id| entities.character(*id).unwrap().speed)
            .collect();
        let first_normal = speeds.iter().position(|s| *s == Speed::Normal).unwrap();
        let first_slow = speeds.iter().position(|s| *s == Speed::Slow).unwrap();
        assert!(speeds[..first_normal].iter().all(|s| *s == Speed::Fast));
        assert!(speeds[first_normal..first_slow]
            .iter()
            .all(|s| *s == Speed::Normal));
        assert!(speeds[first_slow..].iter().all(|s| *s == Speed::Slow));

        // every living combatant exactly once
        let mut seen: Vec<CharacterId> = queue.iter().copied().collect();
        seen.sort();
        let mut expected = all.clone();
        expected.sort();
        assert_eq!(seen, expected);
    }

    #[test]
    fn dead_combatants_are_skipped() {
        let mut entities = Entities::new();
        let alive = spawn(&mut entities, "alive", Speed::Normal, 5);
        let dead = spawn(&mut entities, "dead", Speed::Fast, 5);
        entities.character_mut(dead).unwrap().apply_harm(5);

        let queue = prepare_queue(&entities, &[alive, dead], &PcgRng, 1);
        assert_eq!(queue, VecDeque::from([alive]));
    }

    #[test]
    fn all_dead_yields_empty_queue() {
        let mut entities = Entities::new();
        let a = spawn(&mut entities, "a", Speed::Normal, 5);
        entities.character_mut(a).unwrap().apply_harm(9);
        assert!(prepare_queue(&entities, &[a], &PcgRng, 1).is_empty());
    }

    #[test]
    fn tier_order_reshuffles_across_rounds() {
        let mut entities = Entities::new();
        let all: Vec<CharacterId> = (0..8)
            .map(|i| spawn(&mut entities, &format!("f{i}"), Speed::Fast, 5))
            .collect();

        // Distinct round seeds should eventually disagree on order.
        let base = prepare_queue(&entities, &all, &PcgRng, 0);
        let differs = (1..8u64).any(|round| prepare_queue(&entities, &all, &PcgRng, round) != base);
        assert!(differs);
    }
}
