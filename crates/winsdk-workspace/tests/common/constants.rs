//! Test constants

use winsdk_core::sdk::{BUILD_TOOLS_PACKAGE, CPPWINRT_PACKAGE, WINDOWS_APP_SDK_PACKAGE};

/// Older C++/WinRT release
pub const CPPWINRT_OLD: &str = "2.0.240405.15";

/// Latest C++/WinRT release
pub const CPPWINRT_NEW: &str = "2.0.250303.1";

/// Older BuildTools release
pub const BUILD_TOOLS_OLD: &str = "10.0.22621.756";

/// Latest BuildTools release
pub const BUILD_TOOLS_NEW: &str = "10.0.26100.1742";

/// SDK folder under the BuildTools `bin` folder
pub const SDK_FOLDER: &str = "10.0.26100.0";

/// Older Windows App SDK release
pub const APP_SDK_OLD: &str = "1.6.250205002";

/// Latest Windows App SDK release
pub const APP_SDK_NEW: &str = "1.7.250310001";

/// Release of every other SDK package
pub const SDK_VERSION: &str = "10.0.26100.1742";

/// Release of the implementation library
pub const WIL_VERSION: &str = "1.0.250325.1";

/// Versions published for each package
pub fn published() -> Vec<(&'static str, Vec<&'static str>)> {
    vec![
        (CPPWINRT_PACKAGE, vec![CPPWINRT_OLD, CPPWINRT_NEW]),
        (BUILD_TOOLS_PACKAGE, vec![BUILD_TOOLS_OLD, BUILD_TOOLS_NEW]),
        (WINDOWS_APP_SDK_PACKAGE, vec![APP_SDK_OLD, APP_SDK_NEW]),
        ("Microsoft.Windows.ImplementationLibrary", vec![WIL_VERSION]),
        ("Microsoft.Windows.SDK.CPP", vec![SDK_VERSION]),
        ("Microsoft.Windows.SDK.CPP.x64", vec![SDK_VERSION]),
        ("Microsoft.Windows.SDK.CPP.arm64", vec![SDK_VERSION]),
    ]
}

/// Latest version of every SDK package, in install order
pub fn latest_versions() -> Vec<(&'static str, &'static str)> {
    vec![
        (CPPWINRT_PACKAGE, CPPWINRT_NEW),
        (BUILD_TOOLS_PACKAGE, BUILD_TOOLS_NEW),
        (WINDOWS_APP_SDK_PACKAGE, APP_SDK_NEW),
        ("Microsoft.Windows.ImplementationLibrary", WIL_VERSION),
        ("Microsoft.Windows.SDK.CPP", SDK_VERSION),
        ("Microsoft.Windows.SDK.CPP.x64", SDK_VERSION),
        ("Microsoft.Windows.SDK.CPP.arm64", SDK_VERSION),
    ]
}

/// Every SDK package pinned to its older release where one exists
pub fn old_pins() -> Vec<(&'static str, &'static str)> {
    vec![
        (CPPWINRT_PACKAGE, CPPWINRT_OLD),
        (BUILD_TOOLS_PACKAGE, BUILD_TOOLS_OLD),
        (WINDOWS_APP_SDK_PACKAGE, APP_SDK_OLD),
        ("Microsoft.Windows.ImplementationLibrary", WIL_VERSION),
        ("Microsoft.Windows.SDK.CPP", SDK_VERSION),
        ("Microsoft.Windows.SDK.CPP.x64", SDK_VERSION),
        ("Microsoft.Windows.SDK.CPP.arm64", SDK_VERSION),
    ]
}
