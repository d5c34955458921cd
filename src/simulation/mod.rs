//! Simulation - the per-tick cellular automaton update

mod step;

pub use step::step;
