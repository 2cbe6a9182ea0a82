//! Appflow Sim - Monte Carlo path confidence
//!
//! Estimates how likely a user is to get from one app to another by
//! replaying random walks over a directly-follows graph.
//!
//! # Overview
//!
//! - Requests are validated before any work ([`SimulationRequest`])
//! - One walk is a pure function of graph, parameters and RNG ([`Walk`])
//! - Batches run on rayon with one ChaCha20 stream per trial ([`Simulator`])
//! - Outcomes are grouped by exact path and ranked ([`SimulationResult`])
//!
//! # TigerStyle
//!
//! - All batches are deterministic given the same seed
//! - Always log the seed for reproducibility
//! - Bounded walks (explicit transition budget)

pub mod request;
pub mod result;
pub mod rng;
pub mod simulation;
pub mod tally;
pub mod trial;

pub use request::SimulationRequest;
pub use result::{PathConfidence, SimulationResult};
pub use rng::DeterministicRng;
pub use simulation::{SimulationConfig, Simulator};
pub use tally::PathTally;
pub use trial::{choose_next, TrialOutcome, Walk};
