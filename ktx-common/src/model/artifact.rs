// ktx-common/src/model/artifact.rs
use std::fmt;

use serde::{Deserialize, Serialize};

pub const CONTENT_TYPE_JSON: &str = "application/json";
pub const CONTENT_TYPE_XML: &str = "application/xml";
pub const CONTENT_TYPE_OCTET_STREAM: &str = "application/octet-stream";

/// The kinds of build evidence the reporter knows how to upload.
///
/// Each category has a fixed default content type and a fixed tag under which
/// its uploads appear in the build manifest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ArtifactCategory {
    CucumberJson,
    JunitXml,
    CyclonedxJson,
    SpdxJson,
    #[serde(rename = "artifact")]
    Generic,
}

impl ArtifactCategory {
    /// Categories in the order the assembler walks them.
    pub const ORDERED: [ArtifactCategory; 5] = [
        ArtifactCategory::CucumberJson,
        ArtifactCategory::JunitXml,
        ArtifactCategory::CyclonedxJson,
        ArtifactCategory::SpdxJson,
        ArtifactCategory::Generic,
    ];

    pub fn default_content_type(self) -> &'static str {
        match self {
            Self::CucumberJson | Self::CyclonedxJson | Self::SpdxJson => CONTENT_TYPE_JSON,
            Self::JunitXml => CONTENT_TYPE_XML,
            Self::Generic => CONTENT_TYPE_OCTET_STREAM,
        }
    }

    /// Tag sent as the artifact `type` in the build manifest.
    pub fn tag(self) -> &'static str {
        match self {
            Self::CucumberJson => "cucumber-json",
            Self::JunitXml => "junit-xml",
            Self::CyclonedxJson => "cyclonedx-json",
            Self::SpdxJson => "spdx-json",
            Self::Generic => "artifact",
        }
    }

    /// Only generic artifacts may carry a per-pattern content type.
    pub fn allows_content_type_override(self) -> bool {
        matches!(self, Self::Generic)
    }
}

impl fmt::Display for ArtifactCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// A glob pattern with an optional explicit content type.
///
/// Configuration may spell a pattern as a bare string or as a
/// `{ path, contentType }` mapping; both land here.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(from = "PathPatternSpec")]
pub struct PathPattern {
    pub path: String,
    pub content_type: Option<String>,
}

impl PathPattern {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content_type: None,
        }
    }

    pub fn with_content_type(path: impl Into<String>, content_type: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content_type: Some(content_type.into()),
        }
    }

    /// The explicit content type, or `default` when none was given.
    pub fn content_type_or<'a>(&'a self, default: &'a str) -> &'a str {
        self.content_type.as_deref().unwrap_or(default)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PathPatternSpec {
    Glob(String),
    Detailed {
        path: String,
        #[serde(rename = "contentType", default)]
        content_type: Option<String>,
    },
}

impl From<PathPatternSpec> for PathPattern {
    fn from(spec: PathPatternSpec) -> Self {
        match spec {
            PathPatternSpec::Glob(path) => PathPattern::new(path),
            PathPatternSpec::Detailed { path, content_type } => PathPattern {
                path,
                // An empty contentType means "use the default".
                content_type: content_type.filter(|ct| !ct.trim().is_empty()),
            },
        }
    }
}

/// A successfully uploaded build-level artifact, as listed in the manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadedArtifactRef {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: ArtifactCategory,
}

impl UploadedArtifactRef {
    pub fn new(id: impl Into<String>, category: ArtifactCategory) -> Self {
        Self {
            id: id.into(),
            kind: category,
        }
    }
}

/// An artifact reference nested inside a test record (id only).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtifactIdRef {
    pub id: String,
}
