use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::Path;

use regex::Regex;

use crate::config::RunConfig;
use crate::error::{GitIncrementError, Result};

/// Build tag used when a version suffix carries no label of its own.
pub const DEFAULT_BUILD_TAG: &str = "jenkins";

/// A version tag with optional build suffix and packaging metadata.
///
/// The canonical string form is `MAJOR.MINOR.PATCH` followed by
/// `-BUILDTAG-BUILDNUMBER` when a build number is present, e.g.
/// `0.3.2-jenkins-3447876`.
#[derive(Debug, Clone, PartialEq)]
pub struct Version {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
    pub build_tag: String,
    pub build_number: Option<u32>,
    /// Whether tag creation should produce an annotated tag.
    pub annotated: bool,
    /// Changelog text, or a path to a file holding it.
    pub changelog: String,
    /// Arguments passed through unmodified to plugin calls.
    pub extra_args: Vec<String>,
    /// Opaque data a plugin may attach for its own use.
    pub user_data: HashMap<String, toml::Value>,
}

impl Version {
    /// Creates a version with the default build tag and no build suffix.
    pub fn new(major: u32, minor: u32, patch: u32) -> Self {
        Version {
            major,
            minor,
            patch,
            build_tag: DEFAULT_BUILD_TAG.to_string(),
            build_number: None,
            annotated: false,
            changelog: String::new(),
            extra_args: Vec::new(),
            user_data: HashMap::new(),
        }
    }

    /// Parses a version string of the form
    /// `MAJOR.MINOR[.PATCH][-BUILDTAG[-BUILDNUMBER]]`.
    ///
    /// A missing patch component defaults to 0. An empty build-tag segment
    /// falls back to `default_build_tag`; an absent or empty build-number
    /// segment means no build suffix.
    ///
    /// # Example
    /// ```ignore
    /// let v = Version::parse("0.3.2-jenkins-3447876", DEFAULT_BUILD_TAG)?;
    /// assert_eq!(v.build_number, Some(3447876));
    /// assert_eq!(Version::parse("0.1", DEFAULT_BUILD_TAG)?.to_string(), "0.1.0");
    /// ```
    pub fn parse(input: &str, default_build_tag: &str) -> Result<Self> {
        let re = Regex::new(r"^(\d+)\.(\d+)(?:\.(\d+))?(?:-([^-]*)(?:-(\d*))?)?$")
            .map_err(|_| GitIncrementError::version("invalid version pattern"))?;

        let captures = re
            .captures(input)
            .ok_or_else(|| GitIncrementError::malformed(input))?;

        let parse_component = |m: Option<regex::Match<'_>>| -> Result<u32> {
            match m {
                Some(m) => m
                    .as_str()
                    .parse::<u32>()
                    .map_err(|_| GitIncrementError::malformed(input)),
                None => Ok(0),
            }
        };

        let major = parse_component(captures.get(1))?;
        let minor = parse_component(captures.get(2))?;
        let patch = parse_component(captures.get(3))?;

        let build_tag = match captures.get(4) {
            Some(m) if !m.as_str().is_empty() => m.as_str().to_string(),
            _ => default_build_tag.to_string(),
        };

        let build_number = match captures.get(5) {
            Some(m) if !m.as_str().is_empty() => Some(
                m.as_str()
                    .parse::<u32>()
                    .map_err(|_| GitIncrementError::malformed(input))?,
            ),
            _ => None,
        };

        Ok(Version {
            build_tag,
            build_number,
            ..Version::new(major, minor, patch)
        })
    }

    /// Applies the increments requested in `config`, in fixed order:
    /// major (resets minor and patch), minor (resets patch), patch, build
    /// number, then an explicit build number, which always wins over the
    /// build increment.
    pub fn apply_increment(&mut self, config: &RunConfig, step: u32) {
        if config.increment_major {
            self.major += step;
            self.minor = 0;
            self.patch = 0;
        }
        if config.increment_minor {
            self.minor += step;
            self.patch = 0;
        }
        if config.increment_patch {
            self.patch += step;
        }
        if config.increment_build {
            self.build_number = Some(self.build_number.unwrap_or(0) + step);
        }
        if let Some(number) = config.explicit_build_number {
            self.build_number = Some(number);
        }
    }

    /// Resolves the changelog: file contents when the value names a
    /// readable file, the literal string otherwise.
    pub fn changelog_text(&self) -> Result<String> {
        let path = Path::new(&self.changelog);
        if path.is_file() {
            Ok(fs::read_to_string(path)?)
        } else {
            Ok(self.changelog.clone())
        }
    }

    /// Ordering key for picking the latest among parseable tags.
    pub fn sort_key(&self) -> (u32, u32, u32, u32) {
        (
            self.major,
            self.minor,
            self.patch,
            self.build_number.unwrap_or(0),
        )
    }

    /// Environment variables handed to packaging commands.
    ///
    /// Maps version fields to GITINCREMENT_* variables; optional fields are
    /// only present when set.
    pub fn to_env_vars(&self) -> Result<HashMap<String, String>> {
        let mut env = HashMap::new();

        env.insert("GITINCREMENT_VERSION".to_string(), self.to_string());
        env.insert(
            "GITINCREMENT_BASE_VERSION".to_string(),
            format!("{}.{}.{}", self.major, self.minor, self.patch),
        );
        env.insert("GITINCREMENT_BUILD_TAG".to_string(), self.build_tag.clone());

        if let Some(number) = self.build_number {
            env.insert("GITINCREMENT_BUILD_NUMBER".to_string(), number.to_string());
        }

        let changelog = self.changelog_text()?;
        if !changelog.is_empty() {
            env.insert("GITINCREMENT_CHANGELOG".to_string(), changelog);
        }

        Ok(env)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.build_number {
            Some(number) => write!(
                f,
                "{}.{}.{}-{}-{}",
                self.major, self.minor, self.patch, self.build_tag, number
            ),
            None => write!(f, "{}.{}.{}", self.major, self.minor, self.patch),
        }
    }
}
