//! Shared constants for test infrastructure

// Package ids
pub const PKG_CPPWINRT: &str = "Microsoft.Windows.CppWinRT";
pub const PKG_APP_SDK: &str = "Microsoft.WindowsAppSDK";
pub const PKG_APP_SDK_BASE: &str = "Microsoft.WindowsAppSDK.Base";
pub const PKG_BUILD_TOOLS: &str = "Microsoft.Windows.SDK.BuildTools";
pub const PKG_UNRELATED: &str = "Contoso.Unrelated";

// Versions
pub const VERSION_1_0_0: &str = "1.0.0";
pub const VERSION_1_5_0: &str = "1.5.0";
pub const VERSION_2_0_0: &str = "2.0.0";
pub const VERSION_2_1_0_PREVIEW: &str = "2.1.0-preview1";
pub const CPPWINRT_VERSION: &str = "2.0.250303.1";

/// Versions listed in the default feed index, oldest first
pub const FEED_VERSIONS: &[&str] = &[VERSION_1_0_0, VERSION_1_5_0, VERSION_2_0_0, VERSION_2_1_0_PREVIEW];

pub const WINMD_CONTENT: &[u8] = b"fake winmd";
pub const HEADER_CONTENT: &str = "#pragma once\n";
