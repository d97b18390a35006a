//! The author-supplied `extra.artifacts` block.
//!
//! [`ArtefactConfig`] mirrors the block as written: every field is an
//! optional template string. Resolution expands it with a
//! [`TokenSet`](crate::tokens::TokenSet) and then validates it into an
//! [`ArtefactStrategy`], which carries exactly the fields its strategy needs.

use serde::Deserialize;
use serde_json::Value;

use crate::error::{ConfigError, ResolveError};
use crate::tokens::TokenSet;

/// `source` value selecting a GitHub release asset lookup.
pub const GITHUB_RELEASE_ASSET: &str = "github-release-asset";

/// Archive type used when the block has no `type`.
pub const DEFAULT_ARCHIVE_TYPE: &str = "zip";

/// The `extra.artifacts` block, before validation.
///
/// Unknown keys are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ArtefactConfig {
    /// Download URL template, used when `source` is absent.
    pub url: Option<String>,
    /// Archive type template.
    #[serde(rename = "type")]
    pub archive_type: Option<String>,
    /// Alternative source strategy.
    pub source: Option<String>,
    /// GitHub repository in `owner/name` form.
    pub repo: Option<String>,
    /// Release tag.
    pub tag: Option<String>,
    /// Exact asset file name.
    pub file: Option<String>,
}

impl ArtefactConfig {
    /// Start a block that downloads from a URL template.
    #[must_use]
    pub fn with_url(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            ..Self::default()
        }
    }

    /// Start a block that looks up a GitHub release asset.
    #[must_use]
    pub fn github_release_asset(
        repo: impl Into<String>,
        tag: impl Into<String>,
        file: impl Into<String>,
    ) -> Self {
        Self {
            source: Some(GITHUB_RELEASE_ASSET.to_owned()),
            repo: Some(repo.into()),
            tag: Some(tag.into()),
            file: Some(file.into()),
            ..Self::default()
        }
    }

    /// Set the archive type template.
    #[must_use]
    pub fn with_archive_type(mut self, archive_type: impl Into<String>) -> Self {
        self.archive_type = Some(archive_type.into());
        self
    }

    /// Decode the raw `extra.artifacts` value.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MalformedBlock`] when the value is not an
    /// object or a known field is not a string.
    pub fn from_value(value: &Value) -> Result<Self, ConfigError> {
        if !value.is_object() {
            return Err(ConfigError::MalformedBlock {
                reason: format!("expected an object, found {}", value_kind(value)),
            });
        }
        Self::deserialize(value).map_err(|err| ConfigError::MalformedBlock {
            reason: err.to_string(),
        })
    }

    /// Return a copy with every field expanded through `tokens`.
    #[must_use]
    pub fn expand(&self, tokens: &TokenSet) -> Self {
        let expand = |field: &Option<String>| field.as_deref().map(|text| tokens.expand(text));
        Self {
            url: expand(&self.url),
            archive_type: expand(&self.archive_type),
            source: expand(&self.source),
            repo: expand(&self.repo),
            tag: expand(&self.tag),
            file: expand(&self.file),
        }
    }

    /// Validate the block into the strategy it selects.
    ///
    /// When `source` is set the `url` field is ignored.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::UnsupportedSource`] for an unknown `source`
    /// and [`ConfigError::MissingField`] when the selected strategy lacks a
    /// required field.
    pub fn strategy(&self) -> Result<ArtefactStrategy, ResolveError> {
        match self.source.as_deref() {
            None => {
                let url = require(self.url.as_deref(), "url", "when no source is set")?;
                Ok(ArtefactStrategy::DirectUrl { url })
            }
            Some(GITHUB_RELEASE_ASSET) => {
                let context = "for source github-release-asset";
                Ok(ArtefactStrategy::GithubReleaseAsset(ReleaseAssetRef {
                    repo: require(self.repo.as_deref(), "repo", context)?,
                    tag: require(self.tag.as_deref(), "tag", context)?,
                    file: require(self.file.as_deref(), "file", context)?,
                }))
            }
            Some(other) => Err(ResolveError::UnsupportedSource {
                value: other.to_owned(),
            }),
        }
    }

    /// The archive type, or [`DEFAULT_ARCHIVE_TYPE`] when absent.
    ///
    /// The value is not checked against known archive formats.
    #[must_use]
    pub fn archive_type_or_default(&self) -> &str {
        self.archive_type.as_deref().unwrap_or(DEFAULT_ARCHIVE_TYPE)
    }
}

/// A validated resolution strategy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArtefactStrategy {
    /// Download from a fixed (expanded) URL.
    DirectUrl {
        /// The expanded URL.
        url: String,
    },
    /// Download a named asset of a GitHub release.
    GithubReleaseAsset(ReleaseAssetRef),
}

/// Coordinates of a GitHub release asset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseAssetRef {
    /// Repository in `owner/name` form.
    pub repo: String,
    /// Release tag.
    pub tag: String,
    /// Exact asset file name.
    pub file: String,
}

fn require(
    field: Option<&str>,
    name: &'static str,
    context: &'static str,
) -> Result<String, ConfigError> {
    field.map(str::to_owned).ok_or(ConfigError::MissingField {
        field: name,
        context,
    })
}

const fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::package::PackageDescriptor;
    use rstest::{fixture, rstest};
    use serde_json::json;

    #[fixture]
    fn tokens() -> TokenSet {
        let package = PackageDescriptor::new("acme/widget")
            .with_version("1.2.0")
            .with_package_type("tar");
        TokenSet::from_package(&package).expect("valid pretty name")
    }

    #[rstest]
    fn decodes_known_fields_and_ignores_unknown_ones() {
        let config = ArtefactConfig::from_value(&json!({
            "url": "https://x/{name}.zip",
            "type": "tar",
            "comment": "ignored",
        }))
        .expect("valid block");
        assert_eq!(
            config,
            ArtefactConfig::with_url("https://x/{name}.zip").with_archive_type("tar")
        );
    }

    #[rstest]
    #[case::array(json!(["https://x"]), "an array")]
    #[case::string(json!("https://x"), "a string")]
    #[case::null(json!(null), "null")]
    fn rejects_non_object_blocks(#[case] value: Value, #[case] kind: &str) {
        let err = ArtefactConfig::from_value(&value).expect_err("not an object");
        assert!(err.to_string().contains(kind), "unexpected error: {err}");
    }

    #[rstest]
    fn rejects_non_string_fields() {
        let err = ArtefactConfig::from_value(&json!({"url": 42})).expect_err("not a string");
        assert!(matches!(err, ConfigError::MalformedBlock { .. }));
    }

    #[rstest]
    fn expands_every_field(tokens: TokenSet) {
        let config = ArtefactConfig {
            url: Some("https://x/{name}-{version}.zip".to_owned()),
            archive_type: Some("{type}".to_owned()),
            source: Some("{vendor-name}".to_owned()),
            repo: Some("{name}".to_owned()),
            tag: Some("v{version}".to_owned()),
            file: Some("{project-name}.tgz".to_owned()),
        };
        let expanded = config.expand(&tokens);
        assert_eq!(expanded.url.as_deref(), Some("https://x/acme/widget-1.2.0.zip"));
        assert_eq!(expanded.archive_type.as_deref(), Some("tar"));
        assert_eq!(expanded.source.as_deref(), Some("acme"));
        assert_eq!(expanded.repo.as_deref(), Some("acme/widget"));
        assert_eq!(expanded.tag.as_deref(), Some("v1.2.0"));
        assert_eq!(expanded.file.as_deref(), Some("widget.tgz"));
    }

    #[rstest]
    fn direct_url_strategy() {
        let strategy = ArtefactConfig::with_url("https://x/a.zip")
            .strategy()
            .expect("url present");
        assert_eq!(
            strategy,
            ArtefactStrategy::DirectUrl {
                url: "https://x/a.zip".to_owned()
            }
        );
    }

    #[rstest]
    fn missing_url_without_source_is_a_config_error() {
        let err = ArtefactConfig::default()
            .strategy()
            .expect_err("no url, no source");
        assert!(matches!(
            err,
            ResolveError::Config(ConfigError::MissingField { field: "url", .. })
        ));
    }

    #[rstest]
    fn release_asset_strategy() {
        let strategy = ArtefactConfig::github_release_asset("o/r", "v1", "pkg.tgz")
            .strategy()
            .expect("complete block");
        assert_eq!(
            strategy,
            ArtefactStrategy::GithubReleaseAsset(ReleaseAssetRef {
                repo: "o/r".to_owned(),
                tag: "v1".to_owned(),
                file: "pkg.tgz".to_owned(),
            })
        );
    }

    #[rstest]
    #[case::repo("repo")]
    #[case::tag("tag")]
    #[case::file("file")]
    fn release_asset_requires_each_field(#[case] missing: &str) {
        let mut config = ArtefactConfig::github_release_asset("o/r", "v1", "pkg.tgz");
        match missing {
            "repo" => config.repo = None,
            "tag" => config.tag = None,
            _ => config.file = None,
        }
        let err = config.strategy().expect_err("field missing");
        assert!(matches!(
            err,
            ResolveError::Config(ConfigError::MissingField { field, .. }) if field == missing
        ));
    }

    #[rstest]
    fn source_takes_precedence_over_url() {
        let mut config = ArtefactConfig::github_release_asset("o/r", "v1", "pkg.tgz");
        config.url = Some("https://ignored.test/a.zip".to_owned());
        assert!(matches!(
            config.strategy(),
            Ok(ArtefactStrategy::GithubReleaseAsset(_))
        ));
    }

    #[rstest]
    fn unknown_source_is_unsupported() {
        let config = ArtefactConfig {
            source: Some("unknown-value".to_owned()),
            url: Some("https://x/a.zip".to_owned()),
            ..ArtefactConfig::default()
        };
        let err = config.strategy().expect_err("unknown source");
        assert!(matches!(
            err,
            ResolveError::UnsupportedSource { ref value } if value == "unknown-value"
        ));
    }

    #[rstest]
    #[case::absent(None, "zip")]
    #[case::present(Some("tar"), "tar")]
    #[case::unrecognised_format_passes_through(Some("cpio"), "cpio")]
    fn archive_type_defaults_to_zip(#[case] archive_type: Option<&str>, #[case] expected: &str) {
        let config = ArtefactConfig {
            archive_type: archive_type.map(str::to_owned),
            ..ArtefactConfig::default()
        };
        assert_eq!(config.archive_type_or_default(), expected);
    }
}
