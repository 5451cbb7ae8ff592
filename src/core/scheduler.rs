//! Cooling schedules for the simulated-annealing driver.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CoolingSchedule {
    Linear,
    Exponential,
    Logarithmic,
    Adaptive,
}

/// Temperature schedule over a fixed iteration budget.
#[derive(Debug, Clone, Copy)]
pub struct Scheduler {
    pub schedule: CoolingSchedule,
    pub initial_temperature: f64,
    pub final_temperature: f64,
    pub max_iterations: u32,
    stagnation_threshold: u32,
}

impl Scheduler {
    pub fn new(
        schedule: CoolingSchedule,
        initial_temperature: f64,
        final_temperature: f64,
        max_iterations: u32,
    ) -> Scheduler {
        Scheduler {
            schedule,
            initial_temperature,
            final_temperature,
            max_iterations,
            stagnation_threshold: (max_iterations / 20).max(50),
        }
    }

    /// Temperature at `iteration`. `last_improvement_iter` only matters
    /// for the `Adaptive` schedule, where stagnation slows the cooldown.
    pub fn temperature(&self, iteration: u32, last_improvement_iter: u32) -> f64 {
        match self.schedule {
            CoolingSchedule::Linear => self.linear(iteration),
            CoolingSchedule::Exponential => self.exponential(iteration),
            CoolingSchedule::Logarithmic => self.logarithmic(iteration),
            CoolingSchedule::Adaptive => self.adaptive(iteration, last_improvement_iter),
        }
    }

    fn linear(&self, iteration: u32) -> f64 {
        let progress = iteration as f64 / self.max_iterations as f64;
        self.initial_temperature * (1.0 - progress)
    }

    fn exponential(&self, iteration: u32) -> f64 {
        let cooling_rate =
            (self.final_temperature / self.initial_temperature).powf(1.0 / self.max_iterations as f64);
        self.initial_temperature * cooling_rate.powi(iteration as i32)
    }

    fn logarithmic(&self, iteration: u32) -> f64 {
        if iteration == 0 {
            self.initial_temperature
        } else {
            self.initial_temperature / ((iteration + 1) as f64).ln()
        }
    }

    fn adaptive(&self, iteration: u32, last_improvement_iter: u32) -> f64 {
        let mut temp = self.exponential(iteration);

        let stagnation = iteration.saturating_sub(last_improvement_iter);
        if stagnation > self.stagnation_threshold {
            let slowdown = 1.5 + (stagnation - self.stagnation_threshold) as f64 / 100.0;
            temp *= slowdown;
        }

        temp.max(self.final_temperature)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linear_cooling_reaches_zero_at_max_iterations() {
        let s = Scheduler::new(CoolingSchedule::Linear, 10.0, 0.01, 100);
        assert_eq!(s.temperature(0, 0), 10.0);
        assert_eq!(s.temperature(100, 0), 0.0);
    }

    #[test]
    fn exponential_cooling_decreases_monotonically() {
        let s = Scheduler::new(CoolingSchedule::Exponential, 10.0, 0.01, 100);
        let t0 = s.temperature(0, 0);
        let t50 = s.temperature(50, 0);
        let t100 = s.temperature(100, 0);
        assert!(t0 > t50);
        assert!(t50 > t100);
    }

    #[test]
    fn adaptive_cooling_slows_down_during_stagnation() {
        let s = Scheduler::new(CoolingSchedule::Adaptive, 10.0, 0.01, 1000);
        let fresh = s.temperature(200, 199);
        let stagnant = s.temperature(200, 0);
        assert!(stagnant >= fresh);
    }

    #[test]
    fn logarithmic_cooling_handles_iteration_zero() {
        let s = Scheduler::new(CoolingSchedule::Logarithmic, 10.0, 0.01, 100);
        assert_eq!(s.temperature(0, 0), 10.0);
    }
}
