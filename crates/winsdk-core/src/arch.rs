//! Windows target architectures

use std::fmt;
use std::str::FromStr;

/// Architecture names used in SDK package folder layouts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Arch {
    X86,
    X64,
    Arm,
    Arm64,
}

/// Order in which BuildTools architecture folders are tried after the host's own
pub const BUILD_TOOLS_FALLBACK: [Arch; 3] = [Arch::X64, Arch::X86, Arch::Arm64];

impl Arch {
    /// Every architecture recognised in package layouts
    pub const ALL: [Arch; 4] = [Arch::X86, Arch::X64, Arch::Arm, Arch::Arm64];

    /// Folder name of this architecture (`x64`, `arm64`, ...)
    pub fn as_str(&self) -> &'static str {
        match self {
            Arch::X86 => "x86",
            Arch::X64 => "x64",
            Arch::Arm => "arm",
            Arch::Arm64 => "arm64",
        }
    }

    /// Architecture of the machine this binary was built for
    ///
    /// Unknown targets report `x64`, which is what Windows on ARM emulates.
    pub fn host() -> Self {
        Self::from_rust_arch(std::env::consts::ARCH)
    }

    /// Map a Rust target architecture name (`x86_64`, `aarch64`, ...)
    pub fn from_rust_arch(arch: &str) -> Self {
        match arch {
            "x86" | "i686" | "i586" => Arch::X86,
            "aarch64" => Arch::Arm64,
            "arm" => Arch::Arm,
            _ => Arch::X64,
        }
    }

    /// Candidate order for BuildTools binaries: the host first, then x64, x86, arm64
    pub fn build_tools_search_order(host: Arch) -> Vec<Arch> {
        let mut order = vec![host];
        order.extend(BUILD_TOOLS_FALLBACK.iter().copied().filter(|a| *a != host));
        order
    }
}

impl fmt::Display for Arch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Arch {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "x86" => Ok(Arch::X86),
            "x64" | "amd64" => Ok(Arch::X64),
            "arm" => Ok(Arch::Arm),
            "arm64" => Ok(Arch::Arm64),
            other => Err(format!("Unknown architecture: {}", other)),
        }
    }
}
