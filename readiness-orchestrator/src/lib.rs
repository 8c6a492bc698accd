pub mod error;
pub mod handler;
pub mod poller;
pub mod provider_manager;
pub mod routes;
pub mod settings;

pub use error::WaitError;
pub use poller::{PollOutcome, ReadinessPoller};
