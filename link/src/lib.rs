pub mod bringup;
pub mod config;
pub mod error;
pub mod monitor;
pub mod state;

pub use bringup::{bring_up, Platform, StorageStatus};
pub use config::JoinConfig;
pub use error::{Error, Result, Step};
pub use monitor::{Monitor, ServerControl, Station};
pub use state::{transition, Effect, LinkEvent, LinkState, Transition};
