//! Runtime orchestration for the pet life simulation.
//!
//! This crate wires together oracle access, repositories, and worker tasks
//! into a cohesive runtime API. Consumers embed [`Runtime`] to start a pet
//! session, subscribe to notifications, and drive activities through
//! [`RuntimeHandle`].
//!
//! Modules are organized by responsibility:
//! - [`runtime`] hosts the orchestrator and builder
//! - [`api`] exposes the types downstream clients interact with
//! - [`events`] provides the topic-based event bus for notifications
//! - [`workers`] keeps background tasks internal to the crate
//! - [`oracle`] and [`repository`] provide data adapters reused by other crates
pub mod api;
pub mod events;
pub mod oracle;
pub mod repository;
pub mod runtime;

mod workers;

pub use api::{ActivityReport, Result, RuntimeError, RuntimeHandle};
pub use events::{
    AchievementEvent, ChangeCause, Event, EventBus, LifecycleEvent, PetEvent, PetSnapshot, Topic,
};
pub use oracle::{AchievementOracleImpl, ActivityOracleImpl, OracleManager, SceneOracleImpl};
pub use repository::{
    ActivityLogEntry, FileRepository, InMemoryRepository, PetRepository, RepositoryError,
};
pub use runtime::{Runtime, RuntimeBuilder, RuntimeConfig};
