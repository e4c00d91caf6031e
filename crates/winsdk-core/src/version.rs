//! Dotted version comparison
//!
//! NuGet and Windows SDK versions are dotted numeric strings with an
//! arbitrary number of components (`10.0.26100.1742`, `2.0.250303.1`),
//! optionally followed by a `-prerelease` suffix. They are not semver, so
//! comparison is done component by component:
//!
//! - missing trailing components count as `0`
//! - non-numeric components count as `0`, so malformed input sorts low
//!   instead of failing
//! - for equal numeric parts a release sorts above any prerelease, and two
//!   prerelease suffixes are ordered by semver prerelease precedence

use std::cmp::Ordering;

/// Compare two dotted version strings
pub fn compare_versions(a: &str, b: &str) -> Ordering {
    let (a_core, a_pre) = split_prerelease(a);
    let (b_core, b_pre) = split_prerelease(b);

    let a_parts = numeric_components(a_core);
    let b_parts = numeric_components(b_core);
    let len = a_parts.len().max(b_parts.len());

    for i in 0..len {
        let x = a_parts.get(i).copied().unwrap_or(0);
        let y = b_parts.get(i).copied().unwrap_or(0);
        match x.cmp(&y) {
            Ordering::Equal => continue,
            other => return other,
        }
    }

    match (a_pre, b_pre) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(x), Some(y)) => compare_prerelease(x, y),
    }
}

/// Compare two versions and return -1, 0 or 1
pub fn compare(a: &str, b: &str) -> i32 {
    match compare_versions(a, b) {
        Ordering::Less => -1,
        Ordering::Equal => 0,
        Ordering::Greater => 1,
    }
}

/// Whether a version carries a prerelease suffix
pub fn is_prerelease(version: &str) -> bool {
    version.contains('-')
}

/// Parse a strictly numeric dotted version (`10.0.26100.0`)
///
/// Returns `None` when any component is not a number.
pub fn parse_numeric(version: &str) -> Option<Vec<u64>> {
    if version.is_empty() {
        return None;
    }
    version
        .split('.')
        .map(|part| part.parse::<u64>().ok())
        .collect()
}

/// Sort key for a version folder name: parse failures sort as `0.0.0.0`
pub fn folder_sort_key(version: &str) -> Vec<u64> {
    parse_numeric(version).unwrap_or_else(|| vec![0, 0, 0, 0])
}

/// Extract the trailing `parts` dotted components of a folder name
///
/// `Microsoft.Windows.SDK.BuildTools.10.0.26100.1742` with 4 parts yields
/// `10.0.26100.1742`. Returns `None` when the name is too short or the
/// trailing components are not numeric.
pub fn trailing_version(name: &str, parts: usize) -> Option<String> {
    let segments: Vec<&str> = name.split('.').collect();
    if parts == 0 || segments.len() < parts {
        return None;
    }
    let tail = segments[segments.len() - parts..].join(".");
    parse_numeric(&tail).map(|_| tail)
}

/// Pick the highest version from an iterator of version strings
pub fn latest<'a, I>(versions: I) -> Option<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    versions
        .into_iter()
        .max_by(|a, b| compare_versions(a, b))
}

fn split_prerelease(version: &str) -> (&str, Option<&str>) {
    let version = version.trim();
    let version = version.split('+').next().unwrap_or(version);
    match version.split_once('-') {
        Some((core, pre)) => (core, Some(pre)),
        None => (version, None),
    }
}

fn numeric_components(core: &str) -> Vec<u64> {
    core.split('.')
        .map(|part| part.trim().parse::<u64>().unwrap_or(0))
        .collect()
}

fn compare_prerelease(a: &str, b: &str) -> Ordering {
    match (semver::Prerelease::new(a), semver::Prerelease::new(b)) {
        (Ok(x), Ok(y)) => x.cmp(&y),
        _ => a.cmp(b),
    }
}
