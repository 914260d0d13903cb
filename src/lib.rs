pub mod aggregate;
pub mod cli;
pub mod config;
pub mod contributors;
pub mod error;
pub mod logging;
pub mod model;
pub mod output;
pub mod render;
pub mod report;
pub mod store;
pub mod trend;

pub use config::Settings;
pub use error::{PulseError, Result};
