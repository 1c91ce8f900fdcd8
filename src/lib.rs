// todostore - Single-user task tracker with a lossless flat-file store

pub mod codec;
pub mod config;
pub mod error;
pub mod factorial;
pub mod store;
pub mod task;

// Re-export main types for convenience
pub use codec::{Decoded, load, save};
pub use config::Config;
pub use error::{Field, LineError, MalformedLine, Oversized, Result, TodoError};
pub use factorial::factorial;
pub use store::TaskStore;
pub use task::{BoundedText, Task};
