//! Bounded step cursor shared by every workflow dialog.

use tracing::debug;

pub type Step = u8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepTransition {
    Moved { from: Step, to: Step },
    /// Retreated from the first editing step onto the lookup step. The owner
    /// is expected to drop whatever record the lookup produced.
    ReturnedToLookup { from: Step },
    Unchanged,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepBounds {
    pub min: Step,
    pub max: Step,
    pub lookup: Option<Step>,
}

impl StepBounds {
    /// Plain `1..=max` wizard without a lookup step.
    pub const fn sequential(max: Step) -> Self {
        Self {
            min: 1,
            max,
            lookup: None,
        }
    }

    /// `1..=max` wizard whose first step looks a record up by id.
    pub const fn with_lookup(max: Step) -> Self {
        Self {
            min: 1,
            max,
            lookup: Some(1),
        }
    }
}

#[derive(Debug, Clone)]
pub struct StepController {
    step: Step,
    bounds: StepBounds,
}

impl StepController {
    pub fn new(bounds: StepBounds) -> Self {
        Self {
            step: bounds.min,
            bounds,
        }
    }

    pub fn current(&self) -> Step {
        self.step
    }

    pub fn bounds(&self) -> StepBounds {
        self.bounds
    }

    pub fn is_first(&self) -> bool {
        self.step == self.bounds.min
    }

    pub fn is_last(&self) -> bool {
        self.step == self.bounds.max
    }

    pub fn is_lookup(&self) -> bool {
        self.bounds.lookup == Some(self.step)
    }

    pub fn advance(&mut self) -> StepTransition {
        if self.step >= self.bounds.max {
            return StepTransition::Unchanged;
        }
        let from = self.step;
        self.step += 1;
        debug!(from, to = self.step, "steps: advanced");
        StepTransition::Moved { from, to: self.step }
    }

    pub fn retreat(&mut self) -> StepTransition {
        if self.step <= self.bounds.min {
            return StepTransition::Unchanged;
        }
        let from = self.step;
        self.step -= 1;
        debug!(from, to = self.step, "steps: retreated");
        if self.is_lookup() {
            StepTransition::ReturnedToLookup { from }
        } else {
            StepTransition::Moved { from, to: self.step }
        }
    }

    pub fn reset(&mut self) -> StepTransition {
        let from = self.step;
        self.step = self.bounds.min;
        if from == self.step {
            StepTransition::Unchanged
        } else {
            StepTransition::Moved { from, to: self.step }
        }
    }
}

#[cfg(test)]
#[path = "tests/steps_tests.rs"]
mod tests;
