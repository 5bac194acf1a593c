// ktx-core/src/lib.rs
pub mod assemble;
pub mod cache;
pub mod dry_run;
pub mod expand;
pub mod report;

#[cfg(test)]
pub(crate) mod test_support;

pub use assemble::{assemble_manifest, AssembledManifest};
pub use cache::{DedupKey, UploadCache};
pub use dry_run::DryRunUploader;
pub use expand::PatternExpander;
pub use report::{build_manifest, preview_build, report_build};
