//! Proportional sampling among the best candidates.

use arrayvec::ArrayVec;

use crate::env::CombatRng;

/// Index chosen by [`pick_weighted`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pick {
    pub index: usize,
    /// `false` when a lone candidate was taken without a roll.
    pub sampled: bool,
}

/// Picks one of `weights`.
///
/// Non-positive weights are never picked. A single positive candidate is
/// returned outright without touching the RNG. Otherwise the top `pool`
/// candidates (at most `N`, ties to the lower index) are sampled with
/// probability proportional to their weight.
pub fn pick_weighted<const N: usize>(
    rng: &mut CombatRng,
    weights: &[f64],
    pool: usize,
) -> Option<Pick> {
    let mut order: Vec<usize> = (0..weights.len()).filter(|i| weights[*i] > 0.0).collect();
    match order.len() {
        0 => return None,
        1 => {
            return Some(Pick {
                index: order[0],
                sampled: false,
            });
        }
        _ => {}
    }

    order.sort_by(|a, b| weights[*b].total_cmp(&weights[*a]));
    let finalists: ArrayVec<usize, N> = order.into_iter().take(pool.clamp(1, N)).collect();
    let finalist_weights: ArrayVec<f64, N> = finalists.iter().map(|i| weights[*i]).collect();

    let chosen = rng.weighted_index(&finalist_weights)?;
    Some(Pick {
        index: finalists[chosen],
        sampled: true,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lone_candidate_skips_the_roll() {
        let mut rng = CombatRng::new(7);
        let pick = pick_weighted::<3>(&mut rng, &[0.0, 4.0, 0.0], 3);
        assert_eq!(
            pick,
            Some(Pick {
                index: 1,
                sampled: false
            })
        );
        assert_eq!(rng.draws(), 0);
    }

    #[test]
    fn nothing_positive_picks_nothing() {
        let mut rng = CombatRng::new(7);
        assert_eq!(pick_weighted::<3>(&mut rng, &[0.0, -1.0], 3), None);
        assert_eq!(pick_weighted::<3>(&mut rng, &[], 3), None);
    }

    #[test]
    fn fourth_best_is_never_picked() {
        let mut rng = CombatRng::new(99);
        let weights = [5.0, 1.0, 6.0, 7.0];
        for _ in 0..200 {
            let pick = pick_weighted::<3>(&mut rng, &weights, 3).unwrap();
            assert!(pick.sampled);
            assert_ne!(pick.index, 1);
        }
    }

    #[test]
    fn finalists_are_capped_by_pool() {
        let mut rng = CombatRng::new(3);
        let weights = [1.0, 9.0, 8.0];
        for _ in 0..100 {
            let pick = pick_weighted::<2>(&mut rng, &weights, 2).unwrap();
            assert!(pick.index == 1 || pick.index == 2);
        }
    }
}
