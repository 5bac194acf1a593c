// ktx-net/src/lib.rs
pub mod http;
pub mod submit;
pub mod upload;
pub mod validation;

pub use http::KetryxClient;
pub use submit::BuildSubmitter;
pub use upload::ArtifactUploader;
pub use validation::validate_url;
