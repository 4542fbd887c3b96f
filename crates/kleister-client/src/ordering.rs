//! Version-aware orderings over the Minecraft and Forge catalogs.
//!
//! Catalog version strings are semver-like but not strict semver: Forge uses
//! four numeric segments and Minecraft drops the patch level on `.0`
//! releases. Values are parsed as dotted numeric segments of any length
//! plus an optional pre-release tag, compared segment-wise with missing
//! segments read as zero. Values that do not parse (snapshots such as
//! `17w43a`) sort after every parsed value, lexicographically among
//! themselves.

use std::cmp::Ordering;
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use kleister_api_models::{Forge, Minecraft};
use semver::Prerelease;

use crate::error::{Error, Result};

/// Loosely parsed version number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LooseVersion {
    segments: Vec<u64>,
    pre: Prerelease,
}

impl LooseVersion {
    /// Parse `raw`, returning `None` when it is not version-shaped.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        let raw = raw.strip_prefix('v').unwrap_or(raw);
        let without_build = raw.split_once('+').map_or(raw, |(head, _)| head);
        let (core, pre) = match without_build.split_once('-') {
            Some((core, pre)) => (core, Prerelease::new(pre).ok()?),
            None => (without_build, Prerelease::EMPTY),
        };

        let segments = core
            .split('.')
            .map(|segment| {
                if segment.is_empty() || !segment.bytes().all(|byte| byte.is_ascii_digit()) {
                    None
                } else {
                    segment.parse::<u64>().ok()
                }
            })
            .collect::<Option<Vec<_>>>()?;

        Some(Self { segments, pre })
    }

    fn segment(&self, index: usize) -> u64 {
        self.segments.get(index).copied().unwrap_or(0)
    }
}

impl Ord for LooseVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        let width = self.segments.len().max(other.segments.len());
        (0..width)
            .map(|index| self.segment(index).cmp(&other.segment(index)))
            .find(|ordering| ordering.is_ne())
            .unwrap_or(Ordering::Equal)
            .then_with(|| match (self.pre.is_empty(), other.pre.is_empty()) {
                (true, true) => Ordering::Equal,
                (true, false) => Ordering::Greater,
                (false, true) => Ordering::Less,
                (false, false) => self.pre.cmp(&other.pre),
            })
    }
}

impl PartialOrd for LooseVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Total order over raw catalog strings.
///
/// Parsed values come first in version order; the raw string breaks ties so
/// `1.12` and `1.12.0` stay distinguishable.
#[must_use]
pub fn compare_versions(left: &str, right: &str) -> Ordering {
    match (LooseVersion::parse(left), LooseVersion::parse(right)) {
        (Some(a), Some(b)) => a.cmp(&b).then_with(|| left.cmp(right)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => left.cmp(right),
    }
}

/// Sortable Minecraft catalog fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MinecraftSort {
    /// Order by slug.
    Slug,
    /// Order by release number.
    #[default]
    Version,
    /// Order by release channel.
    Type,
}

impl MinecraftSort {
    /// Accepted field names.
    pub const NAMES: [&'static str; 3] = ["slug", "version", "type"];

    fn key(self, row: &Minecraft) -> &str {
        match self {
            Self::Slug => &row.slug,
            Self::Version => &row.version,
            Self::Type => &row.kind,
        }
    }
}

impl FromStr for MinecraftSort {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "slug" => Ok(Self::Slug),
            "version" => Ok(Self::Version),
            "type" => Ok(Self::Type),
            _ => Err(unknown_sort(value, &Self::NAMES)),
        }
    }
}

impl Display for MinecraftSort {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str(Self::NAMES[*self as usize])
    }
}

/// Sortable Forge catalog fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ForgeSort {
    /// Order by slug.
    Slug,
    /// Order by Forge release number.
    #[default]
    Version,
    /// Order by targeted Minecraft release.
    Minecraft,
}

impl ForgeSort {
    /// Accepted field names.
    pub const NAMES: [&'static str; 3] = ["slug", "version", "minecraft"];

    fn key(self, row: &Forge) -> &str {
        match self {
            Self::Slug => &row.slug,
            Self::Version => &row.version,
            Self::Minecraft => &row.minecraft,
        }
    }
}

impl FromStr for ForgeSort {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "slug" => Ok(Self::Slug),
            "version" => Ok(Self::Version),
            "minecraft" => Ok(Self::Minecraft),
            _ => Err(unknown_sort(value, &Self::NAMES)),
        }
    }
}

impl Display for ForgeSort {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str(Self::NAMES[*self as usize])
    }
}

fn unknown_sort(value: &str, allowed: &[&str]) -> Error {
    Error::validation(format!(
        "invalid sort field '{value}', expected one of {}",
        allowed.join(", ")
    ))
}

/// Stable in-place sort of Minecraft rows.
pub fn sort_minecraft(rows: &mut [Minecraft], by: MinecraftSort) {
    rows.sort_by(|left, right| compare_versions(by.key(left), by.key(right)));
}

/// Stable in-place sort of Forge rows.
pub fn sort_forge(rows: &mut [Forge], by: ForgeSort) {
    rows.sort_by(|left, right| compare_versions(by.key(left), by.key(right)));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minecraft(id: i64, version: &str, kind: &str) -> Minecraft {
        Minecraft {
            id,
            slug: version.replace('.', "-"),
            version: version.to_string(),
            kind: kind.to_string(),
            ..Minecraft::default()
        }
    }

    fn versions(rows: &[Minecraft]) -> Vec<&str> {
        rows.iter().map(|row| row.version.as_str()).collect()
    }

    #[test]
    fn numeric_segments_compare_numerically() {
        assert_eq!(compare_versions("1.7.10", "1.12.2"), Ordering::Less);
        assert_eq!(compare_versions("1.12.2", "1.10.2"), Ordering::Greater);
        assert_eq!(compare_versions("14.23.5.2847", "14.23.5.2860"), Ordering::Less);
        assert_eq!(compare_versions("1.12", "1.12.1"), Ordering::Less);
    }

    #[test]
    fn prerelease_sorts_before_release() {
        assert_eq!(compare_versions("1.13-pre7", "1.13"), Ordering::Less);
        assert_eq!(compare_versions("1.0.0-alpha", "1.0.0-alpha.1"), Ordering::Less);
        assert_eq!(compare_versions("1.0.0-beta.11", "1.0.0-beta.2"), Ordering::Greater);
    }

    #[test]
    fn unparsed_values_fall_back_to_lexicographic_after_parsed() {
        assert_eq!(compare_versions("17w43a", "1.12.2"), Ordering::Greater);
        assert_eq!(compare_versions("17w43a", "18w01a"), Ordering::Less);
        assert_eq!(compare_versions("release", "old_beta"), Ordering::Greater);
    }

    #[test]
    fn agrees_with_semver_on_strict_versions() {
        let mut raw = vec!["1.0.0", "1.0.0-rc.1", "0.9.12", "2.0.0", "1.0.0-alpha", "1.10.0"];
        let mut expected: Vec<semver::Version> = raw
            .iter()
            .map(|value| semver::Version::parse(value).expect("strict semver"))
            .collect();
        expected.sort();
        raw.sort_by(|left, right| compare_versions(left, right));
        let expected: Vec<String> = expected.iter().map(ToString::to_string).collect();
        assert_eq!(raw, expected);
    }

    #[test]
    fn sort_is_a_stable_permutation() {
        let mut rows = vec![
            minecraft(1, "1.7.10", "release"),
            minecraft(2, "1.12.2", "release"),
            minecraft(3, "17w43a", "snapshot"),
            minecraft(4, "1.10.2", "release"),
        ];
        sort_minecraft(&mut rows, MinecraftSort::Version);
        assert_eq!(versions(&rows), ["1.7.10", "1.10.2", "1.12.2", "17w43a"]);

        sort_minecraft(&mut rows, MinecraftSort::Type);
        let ids: Vec<i64> = rows.iter().map(|row| row.id).collect();
        assert_eq!(ids, [1, 4, 2, 3]);
    }

    #[test]
    fn forge_sorts_by_targeted_minecraft() {
        let mut rows = vec![
            Forge {
                id: 1,
                version: "14.23.5.2847".into(),
                minecraft: "1.12.2".into(),
                ..Forge::default()
            },
            Forge {
                id: 2,
                version: "10.13.4.1614".into(),
                minecraft: "1.7.10".into(),
                ..Forge::default()
            },
        ];
        sort_forge(&mut rows, ForgeSort::Minecraft);
        assert_eq!(rows[0].id, 2);
    }

    #[test]
    fn sort_fields_parse_case_insensitively() {
        assert_eq!("VERSION".parse::<MinecraftSort>().ok(), Some(MinecraftSort::Version));
        assert_eq!("Minecraft".parse::<ForgeSort>().ok(), Some(ForgeSort::Minecraft));
        let err = "type".parse::<ForgeSort>().expect_err("forge has no type");
        assert!(err.is_validation());
        assert_eq!(MinecraftSort::Type.to_string(), "type");
    }
}
