//! Release listing payload returned by the GitHub REST API.

use serde::Deserialize;

/// A release, reduced to the fields the resolver reads.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Release {
    /// Release tag, when reported.
    #[serde(default)]
    pub tag_name: Option<String>,
    /// Attached assets, in API order.
    #[serde(default)]
    pub assets: Vec<ReleaseAsset>,
}

/// A release attachment.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ReleaseAsset {
    /// Asset file name.
    pub name: String,
    /// API URL of the asset; downloading it needs an octet-stream `Accept`.
    pub url: String,
    /// Public browser URL, when reported.
    #[serde(default)]
    pub browser_download_url: Option<String>,
}

impl ReleaseAsset {
    /// Create an asset with a name and API URL.
    #[must_use]
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            browser_download_url: None,
        }
    }
}

impl Release {
    /// Create a release from a list of assets.
    #[must_use]
    pub const fn with_assets(assets: Vec<ReleaseAsset>) -> Self {
        Self {
            tag_name: None,
            assets,
        }
    }

    /// Return the first asset whose name equals `file` exactly.
    ///
    /// The comparison is case-sensitive.
    ///
    /// # Examples
    ///
    /// ```
    /// use artifact_install::github::{Release, ReleaseAsset};
    ///
    /// let release = Release::with_assets(vec![
    ///     ReleaseAsset::new("pkg.tgz", "U1"),
    ///     ReleaseAsset::new("other", "U2"),
    /// ]);
    /// assert_eq!(release.find_asset("pkg.tgz").map(|a| a.url.as_str()), Some("U1"));
    /// assert!(release.find_asset("PKG.tgz").is_none());
    /// ```
    #[must_use]
    pub fn find_asset(&self, file: &str) -> Option<&ReleaseAsset> {
        self.assets.iter().find(|asset| asset.name == file)
    }
}
