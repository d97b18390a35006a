//! Placeholder tokens derived from package metadata.
//!
//! A [`TokenSet`] maps each `{placeholder}` to a value taken from a
//! [`PackageDescriptor`]. Expansion is literal and single pass: text produced
//! by a replacement is never scanned again, and placeholders without a
//! matching token are copied through untouched.

use std::fmt;

use crate::error::ConfigError;
use crate::package::PackageDescriptor;

/// A recognised template placeholder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Token {
    /// `{vendor-name}`: the part of the pretty name before the first `/`.
    VendorName,
    /// `{project-name}`: the part of the pretty name after the first `/`.
    ProjectName,
    /// `{pretty-version}`: the author-written version.
    PrettyVersion,
    /// `{version}`: the normalised version.
    Version,
    /// `{name}`: the canonical name.
    Name,
    /// `{pretty-name}`: also the canonical name, not the pretty name.
    PrettyName,
    /// `{stability}`: the stability flag.
    Stability,
    /// `{type}`: the package type.
    Type,
    /// `{checksum}`: the registry dist checksum.
    Checksum,
}

impl Token {
    /// All tokens in table order.
    pub const ALL: [Self; 9] = [
        Self::VendorName,
        Self::ProjectName,
        Self::PrettyVersion,
        Self::Version,
        Self::Name,
        Self::PrettyName,
        Self::Stability,
        Self::Type,
        Self::Checksum,
    ];

    /// The literal placeholder text, braces included.
    #[must_use]
    pub const fn placeholder(self) -> &'static str {
        match self {
            Self::VendorName => "{vendor-name}",
            Self::ProjectName => "{project-name}",
            Self::PrettyVersion => "{pretty-version}",
            Self::Version => "{version}",
            Self::Name => "{name}",
            Self::PrettyName => "{pretty-name}",
            Self::Stability => "{stability}",
            Self::Type => "{type}",
            Self::Checksum => "{checksum}",
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.placeholder())
    }
}

/// Ordered placeholder table for one package.
///
/// # Examples
///
/// ```
/// use artifact_install::package::PackageDescriptor;
/// use artifact_install::tokens::TokenSet;
///
/// let package = PackageDescriptor::new("acme/widget").with_version("1.2.0");
/// let tokens = TokenSet::from_package(&package).expect("pretty name has a vendor");
/// assert_eq!(
///     tokens.expand("https://x/{name}-{version}.zip"),
///     "https://x/acme/widget-1.2.0.zip"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenSet {
    entries: [(Token, String); 9],
}

impl TokenSet {
    /// Build the token table for `package`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MalformedPrettyName`] when the pretty name has
    /// no `/` separating vendor and project.
    pub fn from_package(package: &PackageDescriptor) -> Result<Self, ConfigError> {
        let pretty_name = package.pretty_name();
        let (vendor, project) =
            pretty_name
                .split_once('/')
                .ok_or_else(|| ConfigError::MalformedPrettyName {
                    pretty_name: pretty_name.to_owned(),
                })?;
        let text = |value: Option<&str>| value.unwrap_or_default().to_owned();

        Ok(Self {
            entries: [
                (Token::VendorName, vendor.to_owned()),
                (Token::ProjectName, project.to_owned()),
                (Token::PrettyVersion, text(package.pretty_version())),
                (Token::Version, text(package.version())),
                (Token::Name, package.name().to_owned()),
                (Token::PrettyName, package.name().to_owned()),
                (Token::Stability, text(package.stability())),
                (Token::Type, text(package.package_type())),
                (Token::Checksum, text(package.dist_checksum())),
            ],
        })
    }

    /// Return the value bound to `token`.
    #[must_use]
    pub fn get(&self, token: Token) -> &str {
        self.entries
            .iter()
            .find(|(candidate, _)| *candidate == token)
            .map_or("", |(_, value)| value.as_str())
    }

    /// Iterate over `(token, value)` pairs in table order.
    pub fn iter(&self) -> impl Iterator<Item = (Token, &str)> {
        self.entries
            .iter()
            .map(|(token, value)| (*token, value.as_str()))
    }

    /// Substitute every known placeholder in `template`.
    #[must_use]
    pub fn expand(&self, template: &str) -> String {
        let mut output = String::with_capacity(template.len());
        let mut rest = template;
        while !rest.is_empty() {
            if let Some((value, tail)) = self.match_prefix(rest) {
                output.push_str(value);
                rest = tail;
                continue;
            }
            let mut chars = rest.chars();
            if let Some(ch) = chars.next() {
                output.push(ch);
            }
            rest = chars.as_str();
        }
        output
    }

    /// Placeholders all start with `{` and end with `}`, so at most one can
    /// match at a given position.
    fn match_prefix<'t>(&self, text: &'t str) -> Option<(&str, &'t str)> {
        if !text.starts_with('{') {
            return None;
        }
        self.entries.iter().find_map(|(token, value)| {
            text.strip_prefix(token.placeholder())
                .map(|tail| (value.as_str(), tail))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn package() -> PackageDescriptor {
        PackageDescriptor::new("acme/widget")
            .with_pretty_name("Acme/Widget")
            .with_version("1.2.0.0")
            .with_pretty_version("v1.2.0")
            .with_stability("stable")
            .with_package_type("library")
            .with_dist_checksum("da39a3ee")
    }

    #[rstest]
    fn splits_pretty_name_into_vendor_and_project(package: PackageDescriptor) {
        let tokens = TokenSet::from_package(&package).expect("valid pretty name");
        assert_eq!(tokens.get(Token::VendorName), "Acme");
        assert_eq!(tokens.get(Token::ProjectName), "Widget");
    }

    #[rstest]
    #[case::pretty_version(Token::PrettyVersion, "v1.2.0")]
    #[case::version(Token::Version, "1.2.0.0")]
    #[case::name(Token::Name, "acme/widget")]
    #[case::pretty_name_uses_name(Token::PrettyName, "acme/widget")]
    #[case::stability(Token::Stability, "stable")]
    #[case::package_type(Token::Type, "library")]
    #[case::checksum(Token::Checksum, "da39a3ee")]
    fn maps_package_fields(package: PackageDescriptor, #[case] token: Token, #[case] value: &str) {
        let tokens = TokenSet::from_package(&package).expect("valid pretty name");
        assert_eq!(tokens.get(token), value);
    }

    #[rstest]
    fn project_keeps_everything_after_first_separator() {
        let package = PackageDescriptor::new("acme/widget/extra");
        let tokens = TokenSet::from_package(&package).expect("valid pretty name");
        assert_eq!(tokens.get(Token::VendorName), "acme");
        assert_eq!(tokens.get(Token::ProjectName), "widget/extra");
    }

    #[rstest]
    fn rejects_pretty_name_without_separator() {
        let package = PackageDescriptor::new("widget");
        let err = TokenSet::from_package(&package).expect_err("no separator");
        assert!(matches!(
            err,
            ConfigError::MalformedPrettyName { ref pretty_name } if pretty_name == "widget"
        ));
    }

    #[rstest]
    fn absent_optional_fields_expand_to_empty() {
        let tokens =
            TokenSet::from_package(&PackageDescriptor::new("acme/widget")).expect("valid");
        assert_eq!(tokens.expand("[{version}|{checksum}]"), "[|]");
    }

    #[rstest]
    #[case::plain("https://example.test/archive.zip")]
    #[case::empty("")]
    #[case::braces_without_token("{unknown}/{}/{")]
    #[case::multibyte("naïve-ünïcode-{")]
    fn strings_without_tokens_are_unchanged(package: PackageDescriptor, #[case] text: &str) {
        let tokens = TokenSet::from_package(&package).expect("valid");
        assert_eq!(tokens.expand(text), text);
    }

    #[rstest]
    fn expands_every_occurrence(package: PackageDescriptor) {
        let tokens = TokenSet::from_package(&package).expect("valid");
        assert_eq!(
            tokens.expand("{vendor-name}/{project-name}/{vendor-name}"),
            "Acme/Widget/Acme"
        );
    }

    #[rstest]
    fn replaced_text_is_not_expanded_again() {
        let package = PackageDescriptor::new("acme/widget").with_pretty_version("{version}");
        let tokens = TokenSet::from_package(&package).expect("valid");
        assert_eq!(tokens.expand("{pretty-version}"), "{version}");
    }

    #[rstest]
    fn iter_follows_table_order(package: PackageDescriptor) {
        let tokens = TokenSet::from_package(&package).expect("valid");
        let order: Vec<Token> = tokens.iter().map(|(token, _)| token).collect();
        assert_eq!(order, Token::ALL);
    }

    #[rstest]
    fn display_renders_placeholder() {
        assert_eq!(Token::Checksum.to_string(), "{checksum}");
    }
}
