//! Lottery winner selection.
//!
//! Every ticket is one entry, so a subject holding three tickets is three
//! times as likely to win as a subject holding one. Selection is uniform over
//! the ticket list fetched under the draw lock.

use rand::seq::IndexedRandom;
use rand::Rng;

use crate::types::DbId;

/// Pick the winning subject from the holders of each sold ticket.
///
/// Returns `None` when no ticket was sold.
pub fn pick_winner<R: Rng + ?Sized>(ticket_holders: &[DbId], rng: &mut R) -> Option<DbId> {
    ticket_holders.choose(rng).copied()
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    #[test]
    fn no_tickets_means_no_winner() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(pick_winner(&[], &mut rng), None);
    }

    #[test]
    fn single_ticket_always_wins() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..20 {
            assert_eq!(pick_winner(&[42], &mut rng), Some(42));
        }
    }

    #[test]
    fn winner_is_always_a_ticket_holder() {
        let holders = [1, 2, 3, 3];
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..100 {
            let winner = pick_winner(&holders, &mut rng).unwrap();
            assert!(holders.contains(&winner));
        }
    }

    #[test]
    fn selection_is_roughly_uniform_per_ticket() {
        let holders = [1, 2, 2, 2];
        let mut rng = StdRng::seed_from_u64(2024);
        let mut wins: HashMap<DbId, u32> = HashMap::new();
        for _ in 0..4000 {
            *wins.entry(pick_winner(&holders, &mut rng).unwrap()).or_default() += 1;
        }
        // Subject 2 holds three of four tickets.
        let share = f64::from(wins[&2]) / 4000.0;
        assert!((0.70..0.80).contains(&share), "share was {share}");
    }
}
