//! Worker tasks that back the runtime orchestration.
//!
//! The simulation worker owns the pet and serializes every mutation, while
//! the persistence worker performs storage writes off the simulation path.

mod persistence;
mod simulation;
mod ticker;

pub(crate) use persistence::{PersistCommand, PersistJob, PersistenceWorker};
pub(crate) use simulation::{ActivityTally, Command, PetSession, SimulationWorker};
