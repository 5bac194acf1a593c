// ktx-common/src/model/mod.rs
// Declares the modules within the model directory.
pub mod artifact;
pub mod build;
pub mod test_record;

// Re-export
pub use artifact::{ArtifactCategory, ArtifactIdRef, PathPattern, UploadedArtifactRef};
pub use build::{BuildManifest, BuildOutcome};
pub use test_record::{TestRecordInput, TestRecordOutput, TestResult};
