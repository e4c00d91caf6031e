//! Dependency declarations from `.nuspec` files

use regex::Regex;
use std::sync::LazyLock;
use winsdk_core::version::compare_versions;

static DEPENDENCY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<dependency\s[^>]*?/?>").expect("dependency regex is valid")
});
static ID_ATTR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)\bid\s*=\s*["']([^"']*)["']"#).expect("id attribute regex is valid")
});
static VERSION_ATTR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)\bversion\s*=\s*["']([^"']*)["']"#).expect("version attribute regex is valid")
});

/// A dependency declared by a package
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dependency {
    /// Package id
    pub id: String,

    /// Version to install, `None` when the range has no lower bound
    pub version: Option<String>,
}

/// Parse every `<dependency>` of a nuspec document
///
/// Dependencies repeated across target-framework groups are reported once,
/// with the highest requested minimum version.
pub fn parse_dependencies(nuspec: &str) -> Vec<Dependency> {
    let mut deps: Vec<Dependency> = Vec::new();

    for element in DEPENDENCY_RE.find_iter(nuspec) {
        let element = element.as_str();
        let Some(id) = ID_ATTR_RE
            .captures(element)
            .map(|c| c[1].trim().to_string())
            .filter(|id| !id.is_empty())
        else {
            continue;
        };
        let version = VERSION_ATTR_RE
            .captures(element)
            .and_then(|c| minimum_version(&c[1]));

        match deps.iter_mut().find(|d| d.id.eq_ignore_ascii_case(&id)) {
            Some(existing) => {
                let newer = match (&existing.version, &version) {
                    (Some(a), Some(b)) => compare_versions(b, a).is_gt(),
                    (None, Some(_)) => true,
                    _ => false,
                };
                if newer {
                    existing.version = version;
                }
            }
            None => deps.push(Dependency { id, version }),
        }
    }

    deps
}

/// Lowest version satisfying a NuGet version range, in canonical form
///
/// `1.0`, `[1.0, )`, `[1.0,2.0)` and `(1.0, ]` all yield `1.0.0`;
/// `(, 2.0]` has no lower bound and yields `None`.
pub fn minimum_version(range: &str) -> Option<String> {
    let trimmed = range
        .trim()
        .trim_start_matches(['[', '('])
        .trim_end_matches([']', ')']);
    let lower = trimmed.split(',').next().unwrap_or("").trim();
    if lower.is_empty() {
        None
    } else {
        Some(normalize_version(lower))
    }
}

/// Canonical form of a NuGet version, as the feed lists and serves it
///
/// Lowercased, at least three numeric components, leading zeros stripped
/// and a zero fourth component dropped (`1.0` → `1.0.0`, `1.2.3.0` → `1.2.3`).
pub fn normalize_version(version: &str) -> String {
    let version = version.trim().to_lowercase();
    let (core, pre) = match version.split_once('-') {
        Some((core, pre)) => (core.to_string(), Some(pre.to_string())),
        None => (version.clone(), None),
    };

    let mut parts: Vec<String> = core
        .split('.')
        .map(|p| p.parse::<u64>().map(|n| n.to_string()).unwrap_or_else(|_| p.to_string()))
        .collect();
    while parts.len() < 3 {
        parts.push("0".to_string());
    }
    if parts.len() == 4 && parts[3] == "0" {
        parts.pop();
    }

    match pre {
        Some(pre) => format!("{}-{}", parts.join("."), pre),
        None => parts.join("."),
    }
}
