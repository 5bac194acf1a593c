// ktx-common/src/lib.rs
pub mod ci;
pub mod config;
pub mod error;
pub mod model;

// Re-export key types
pub use ci::CiEnvironment;
pub use config::{Config, RawInputs};
pub use error::{KtxError, Result};
pub use model::{BuildManifest, BuildOutcome};
