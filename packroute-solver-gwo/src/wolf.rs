//! A single candidate solution.

use packroute_core::{Instance, Route, SolutionCodec, fitness};

/// One wolf: a continuous position plus the routes and fitness derived
/// from it.
///
/// Routes and fitness are recomputed whenever the position changes and
/// cannot be set independently.
#[derive(Debug, Clone, PartialEq)]
pub struct Wolf {
    position: Vec<f64>,
    routes: Vec<Route>,
    fitness: f64,
}

impl Wolf {
    /// Place a wolf at `position`, decoding and scoring it.
    #[must_use]
    pub fn new<C>(position: Vec<f64>, codec: &C, instance: &Instance) -> Self
    where
        C: SolutionCodec + ?Sized,
    {
        let routes = codec.decode(&position, instance);
        let fitness = fitness::evaluate(&routes, instance);
        Self {
            position,
            routes,
            fitness,
        }
    }

    /// Move the wolf and refresh its routes and fitness.
    ///
    /// The move is always accepted, even when the new fitness is worse.
    pub fn relocate<C>(&mut self, position: Vec<f64>, codec: &C, instance: &Instance)
    where
        C: SolutionCodec + ?Sized,
    {
        self.routes = codec.decode(&position, instance);
        self.fitness = fitness::evaluate(&self.routes, instance);
        self.position = position;
    }

    /// Current position.
    #[must_use]
    pub fn position(&self) -> &[f64] {
        &self.position
    }

    /// Routes decoded from the position.
    #[must_use]
    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    /// Fitness of the decoded routes; lower is better.
    #[must_use]
    pub const fn fitness(&self) -> f64 {
        self.fitness
    }
}
