//! Well-known Windows SDK package ids

/// C++/WinRT projection tool
pub const CPPWINRT_PACKAGE: &str = "Microsoft.Windows.CppWinRT";

/// Native build tools (makeappx, makepri, mt, signtool)
pub const BUILD_TOOLS_PACKAGE: &str = "Microsoft.Windows.SDK.BuildTools";

/// Windows App SDK
pub const WINDOWS_APP_SDK_PACKAGE: &str = "Microsoft.WindowsAppSDK";

/// Packages installed by workspace setup, in install order
pub const SDK_PACKAGES: [&str; 7] = [
    CPPWINRT_PACKAGE,
    BUILD_TOOLS_PACKAGE,
    WINDOWS_APP_SDK_PACKAGE,
    "Microsoft.Windows.ImplementationLibrary",
    "Microsoft.Windows.SDK.CPP",
    "Microsoft.Windows.SDK.CPP.x64",
    "Microsoft.Windows.SDK.CPP.arm64",
];
