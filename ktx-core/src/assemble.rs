// ktx-core/src/assemble.rs
//! Walks every configured artifact category and test record, uploads each
//! distinct file once and collects the references for the build manifest.
use std::path::Path;

use ktx_common::config::Config;
use ktx_common::error::Result;
use ktx_common::model::artifact::{CONTENT_TYPE_JSON, CONTENT_TYPE_OCTET_STREAM, CONTENT_TYPE_XML};
use ktx_common::model::{ArtifactCategory, PathPattern, TestRecordOutput, UploadedArtifactRef};
use ktx_net::ArtifactUploader;
use tracing::{debug, error, info, warn};

use crate::cache::UploadCache;
use crate::expand::PatternExpander;

/// Artifact and test lists ready to be placed into a [`BuildManifest`].
///
/// [`BuildManifest`]: ktx_common::model::BuildManifest
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssembledManifest {
    pub artifacts: Vec<UploadedArtifactRef>,
    pub tests: Vec<TestRecordOutput>,
    /// Distinct uploads performed (after deduplication).
    pub upload_count: usize,
}

/// Expands and uploads everything `config` references.
///
/// Categories are visited in [`ArtifactCategory::ORDERED`], then test records
/// in input order. A file referenced more than once (by several categories,
/// patterns or tests) under the same content type is uploaded once and
/// referenced once per mention. Any failure aborts the whole assembly.
pub async fn assemble_manifest<U>(
    config: &Config,
    expander: &PatternExpander,
    uploader: &U,
) -> Result<AssembledManifest>
where
    U: ArtifactUploader + ?Sized,
{
    let mut cache = UploadCache::new();
    match assemble_with_cache(config, expander, uploader, &mut cache).await {
        Ok(assembled) => {
            info!(
                "Uploaded {} distinct file(s) for {} artifact reference(s) and {} test(s)",
                assembled.upload_count,
                assembled.artifacts.len(),
                assembled.tests.len()
            );
            Ok(assembled)
        }
        Err(e) => {
            error!("Aborting build report: {}", e);
            debug!("{} file(s) were uploaded before the failure", cache.len());
            Err(e)
        }
    }
}

async fn assemble_with_cache<U>(
    config: &Config,
    expander: &PatternExpander,
    uploader: &U,
    cache: &mut UploadCache,
) -> Result<AssembledManifest>
where
    U: ArtifactUploader + ?Sized,
{
    let mut artifacts = Vec::new();
    for category in ArtifactCategory::ORDERED {
        for pattern in config.patterns_for(category) {
            let content_type = if category.allows_content_type_override() {
                pattern.content_type_or(category.default_content_type())
            } else {
                category.default_content_type()
            };
            let ids = resolve_pattern(cache, expander, uploader, pattern, Some(content_type)).await?;
            artifacts.extend(ids.into_iter().map(|id| UploadedArtifactRef::new(id, category)));
        }
    }

    let mut tests = Vec::with_capacity(config.tests.len());
    for test in &config.tests {
        let mut ids = Vec::new();
        for pattern in &test.artifact_paths {
            ids.extend(
                resolve_pattern(cache, expander, uploader, pattern, pattern.content_type.as_deref())
                    .await?,
            );
        }
        debug!("Test '{}' references {} artifact(s)", test.tested_item, ids.len());
        tests.push(TestRecordOutput::from_input(test, ids));
    }

    Ok(AssembledManifest {
        artifacts,
        tests,
        upload_count: cache.len(),
    })
}

/// Resolves every file matched by `pattern`. Without an explicit content type
/// each file's type is guessed from its extension.
async fn resolve_pattern<U>(
    cache: &mut UploadCache,
    expander: &PatternExpander,
    uploader: &U,
    pattern: &PathPattern,
    content_type: Option<&str>,
) -> Result<Vec<String>>
where
    U: ArtifactUploader + ?Sized,
{
    let paths = expander.expand(&pattern.path)?;
    if paths.is_empty() {
        warn!("No files found matching '{}'", pattern.path);
        return Ok(Vec::new());
    }

    let mut ids = Vec::with_capacity(paths.len());
    for path in &paths {
        let content_type = content_type.unwrap_or_else(|| guess_content_type(path));
        ids.push(cache.resolve(path, content_type, uploader).await?);
    }
    Ok(ids)
}

fn guess_content_type(path: &Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("json") => CONTENT_TYPE_JSON,
        Some(ext) if ext.eq_ignore_ascii_case("xml") => CONTENT_TYPE_XML,
        _ => CONTENT_TYPE_OCTET_STREAM,
    }
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::PathBuf;

    use ktx_common::config::RawInputs;
    use ktx_common::model::ArtifactIdRef;
    use ktx_common::CiEnvironment;

    use super::*;
    use crate::test_support::RecordingUploader;

    struct Fixture {
        dir: tempfile::TempDir,
    }

    impl Fixture {
        fn new() -> Self {
            let dir = tempfile::tempdir().unwrap();
            fs::create_dir_all(dir.path().join("out")).unwrap();
            fs::write(dir.path().join("out/a.cucumber.json"), "[]").unwrap();
            fs::write(dir.path().join("out/report.bin"), [1u8, 2, 3]).unwrap();
            fs::write(dir.path().join("out/junit.xml"), "<testsuites/>").unwrap();
            fs::write(dir.path().join("out/sbom.spdx.json"), "{}").unwrap();
            Self { dir }
        }

        fn path(&self, rel: &str) -> PathBuf {
            self.dir.path().join(rel)
        }

        fn expander(&self) -> PatternExpander {
            PatternExpander::new(self.dir.path())
        }
    }

    fn config(raw: RawInputs) -> Config {
        let raw = RawInputs {
            project: Some("KXPRJ".to_string()),
            api_key: Some("KXTK_123".to_string()),
            ..raw
        };
        Config::from_inputs(raw, &CiEnvironment::default()).unwrap()
    }

    #[tokio::test]
    async fn scenario_cucumber_and_generic_artifact() {
        let fx = Fixture::new();
        let uploader = RecordingUploader::default();
        let config = config(RawInputs {
            test_cucumber_path: Some("out/*.cucumber.json".to_string()),
            artifact_path: Some("out/report.bin".to_string()),
            ..RawInputs::default()
        });

        let assembled = assemble_manifest(&config, &fx.expander(), &uploader).await.unwrap();

        assert_eq!(
            assembled.artifacts,
            vec![
                UploadedArtifactRef::new("ID1", ArtifactCategory::CucumberJson),
                UploadedArtifactRef::new("ID2", ArtifactCategory::Generic),
            ]
        );
        assert!(assembled.tests.is_empty());
        assert_eq!(
            uploader.calls(),
            vec![
                (fx.path("out/a.cucumber.json"), "application/json".to_string()),
                (fx.path("out/report.bin"), "application/octet-stream".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_record_reuses_category_upload() {
        let fx = Fixture::new();
        let uploader = RecordingUploader::default();
        let config = config(RawInputs {
            test_cucumber_path: Some("out/*.cucumber.json".to_string()),
            artifact_path: Some("out/report.bin".to_string()),
            tests: Some(
                "- testedItem: KXTEST-1\n  result: pass\n  title: Login\n  artifactPaths:\n    - out/a.cucumber.json\n"
                    .to_string(),
            ),
            ..RawInputs::default()
        });

        let assembled = assemble_manifest(&config, &fx.expander(), &uploader).await.unwrap();

        assert_eq!(uploader.calls().len(), 2);
        assert_eq!(assembled.upload_count, 2);
        assert_eq!(
            assembled.tests[0].artifacts,
            vec![ArtifactIdRef { id: "ID1".to_string() }]
        );
        assert_eq!(assembled.tests[0].result.as_str(), "PASS");
    }

    #[tokio::test]
    async fn same_file_in_two_categories_uploads_once() {
        let fx = Fixture::new();
        let uploader = RecordingUploader::default();
        let config = config(RawInputs {
            spdx_json_path: Some("out/sbom.spdx.json".to_string()),
            cyclonedx_json_path: Some("out/*.json\nout/sbom.spdx.json".to_string()),
            ..RawInputs::default()
        });

        let assembled = assemble_manifest(&config, &fx.expander(), &uploader).await.unwrap();

        // cyclonedx: a.cucumber.json, sbom.spdx.json, sbom.spdx.json again; then spdx.
        assert_eq!(uploader.calls().len(), 2);
        let tags: Vec<_> = assembled.artifacts.iter().map(|a| a.kind.tag()).collect();
        assert_eq!(tags, ["cyclonedx-json", "cyclonedx-json", "cyclonedx-json", "spdx-json"]);
        let sbom_id = &assembled.artifacts[1].id;
        assert_eq!(&assembled.artifacts[2].id, sbom_id);
        assert_eq!(&assembled.artifacts[3].id, sbom_id);
    }

    #[tokio::test]
    async fn generic_override_changes_dedup_key() {
        let fx = Fixture::new();
        let uploader = RecordingUploader::default();
        let config = config(RawInputs {
            test_junit_path: Some("out/junit.xml".to_string()),
            artifact_path: Some(
                "- path: out/junit.xml\n  contentType: text/xml\n- out/junit.xml\n".to_string(),
            ),
            ..RawInputs::default()
        });

        assemble_manifest(&config, &fx.expander(), &uploader).await.unwrap();

        let content_types: Vec<_> = uploader.calls().into_iter().map(|(_, ct)| ct).collect();
        assert_eq!(
            content_types,
            ["application/xml", "text/xml", "application/octet-stream"]
        );
    }

    #[tokio::test]
    async fn empty_patterns_contribute_nothing() {
        let fx = Fixture::new();
        let uploader = RecordingUploader::default();
        let config = config(RawInputs {
            test_junit_path: Some("reports/*.xml".to_string()),
            tests: Some(
                "- testedItem: KXTEST-2\n  result: FAIL\n  title: T\n  artifactPaths: [missing/*.png]\n"
                    .to_string(),
            ),
            ..RawInputs::default()
        });

        let assembled = assemble_manifest(&config, &fx.expander(), &uploader).await.unwrap();

        assert!(assembled.artifacts.is_empty());
        assert!(assembled.tests[0].artifacts.is_empty());
        assert!(uploader.calls().is_empty());
    }

    #[tokio::test]
    async fn one_failed_upload_aborts_assembly() {
        let fx = Fixture::new();
        let uploader = RecordingUploader::failing_on(fx.path("out/report.bin"));
        let config = config(RawInputs {
            test_cucumber_path: Some("out/*.cucumber.json".to_string()),
            artifact_path: Some("out/report.bin".to_string()),
            ..RawInputs::default()
        });

        let result = assemble_manifest(&config, &fx.expander(), &uploader).await;

        assert!(result.is_err());
        assert_eq!(uploader.calls().len(), 1);
    }

    #[test]
    fn guesses_content_type_from_extension() {
        assert_eq!(guess_content_type(Path::new("a.JSON")), "application/json");
        assert_eq!(guess_content_type(Path::new("r/junit.xml")), "application/xml");
        assert_eq!(guess_content_type(Path::new("shot.png")), "application/octet-stream");
        assert_eq!(guess_content_type(Path::new("Makefile")), "application/octet-stream");
    }
}
