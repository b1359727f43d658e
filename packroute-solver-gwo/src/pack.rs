//! The wolf population and its leader ranking.

use packroute_core::{Instance, SolutionCodec, compare_fitness};
use rand::Rng;

use crate::Wolf;

/// Snapshots of the three best wolves.
#[derive(Debug, Clone, PartialEq)]
pub struct Leaders {
    /// Best solution seen so far in the run.
    pub alpha: Wolf,
    /// Second-ranked wolf.
    pub beta: Wolf,
    /// Third-ranked wolf.
    pub delta: Wolf,
}

impl Leaders {
    /// Leader snapshots in pull order: alpha, beta, delta.
    #[must_use]
    pub const fn in_pull_order(&self) -> [&Wolf; 3] {
        [&self.alpha, &self.beta, &self.delta]
    }
}

/// A fixed-size pack of wolves with its current leaders.
///
/// After every [`Pack::rank`] the leaders satisfy
/// `alpha ≤ beta ≤ delta ≤` every other wolf. The alpha is elitist: it is
/// replaced only by a strictly better wolf, so its fitness never increases.
#[derive(Debug, Clone)]
pub struct Pack {
    wolves: Vec<Wolf>,
    leaders: Leaders,
    iteration: u32,
}

impl Pack {
    /// Scatter `size` wolves uniformly over the codec's search space.
    ///
    /// Returns `None` when `size` is zero.
    pub fn spawn<C, R>(size: usize, instance: &Instance, codec: &C, rng: &mut R) -> Option<Self>
    where
        C: SolutionCodec + ?Sized,
        R: Rng + ?Sized,
    {
        let space = codec.search_space(instance);
        let dimensions = codec.dimensions(instance);
        let wolves = (0..size)
            .map(|_| {
                let position = (0..dimensions)
                    .map(|_| rng.gen_range(space.lower..=space.upper))
                    .collect();
                Wolf::new(position, codec, instance)
            })
            .collect();
        Self::from_wolves(wolves)
    }

    /// Build a pack from existing wolves and rank it.
    ///
    /// Packs smaller than three share leaders; `None` is returned only for an
    /// empty input.
    #[must_use]
    pub fn from_wolves(wolves: Vec<Wolf>) -> Option<Self> {
        let order = ranked(&wolves);
        let pick = |rank: usize| {
            order
                .get(rank)
                .or_else(|| order.last())
                .and_then(|index| wolves.get(*index))
                .cloned()
        };
        let leaders = Leaders {
            alpha: pick(0)?,
            beta: pick(1)?,
            delta: pick(2)?,
        };
        Some(Self {
            wolves,
            leaders,
            iteration: 0,
        })
    }

    /// Every wolf in spawn order.
    #[must_use]
    pub fn wolves(&self) -> &[Wolf] {
        &self.wolves
    }

    /// Mutable access for position updates.
    pub(crate) fn wolves_mut(&mut self) -> &mut [Wolf] {
        &mut self.wolves
    }

    /// Current leader snapshots.
    #[must_use]
    pub const fn leaders(&self) -> &Leaders {
        &self.leaders
    }

    /// Best wolf found so far.
    #[must_use]
    pub const fn alpha(&self) -> &Wolf {
        &self.leaders.alpha
    }

    /// Completed iterations.
    #[must_use]
    pub const fn iteration(&self) -> u32 {
        self.iteration
    }

    pub(crate) const fn advance(&mut self) {
        self.iteration = self.iteration.saturating_add(1);
    }

    /// Re-rank the pack after every wolf has moved.
    pub fn rank(&mut self) {
        let order = ranked(&self.wolves);
        let nth = |rank: usize| {
            order
                .get(rank)
                .or_else(|| order.last())
                .and_then(|index| self.wolves.get(*index))
        };
        let (Some(first), Some(second), Some(third)) = (nth(0), nth(1), nth(2)) else {
            return;
        };

        let leaders = if compare_fitness(self.leaders.alpha.fitness(), first.fitness()).is_lt() {
            Leaders {
                alpha: self.leaders.alpha.clone(),
                beta: first.clone(),
                delta: second.clone(),
            }
        } else {
            Leaders {
                alpha: first.clone(),
                beta: second.clone(),
                delta: third.clone(),
            }
        };
        self.leaders = leaders;
    }
}

/// Wolf indices sorted by fitness; the sort is stable so ties keep index order.
fn ranked(wolves: &[Wolf]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..wolves.len()).collect();
    order.sort_by(|lhs, rhs| {
        let lhs_fitness = wolves.get(*lhs).map_or(f64::NAN, Wolf::fitness);
        let rhs_fitness = wolves.get(*rhs).map_or(f64::NAN, Wolf::fitness);
        compare_fitness(lhs_fitness, rhs_fitness)
    });
    order
}
