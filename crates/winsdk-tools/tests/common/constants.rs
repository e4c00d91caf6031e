//! Test constants

/// Older BuildTools package version
pub const BUILD_TOOLS_OLD: &str = "10.0.22621.756";

/// Newer BuildTools package version
pub const BUILD_TOOLS_NEW: &str = "10.0.26100.1742";

/// Pinned BuildTools version that is never installed
pub const BUILD_TOOLS_MISSING: &str = "10.0.26100.1000";

/// SDK folder under `bin`
pub const SDK_FOLDER: &str = "10.0.26100.0";

/// Older SDK folder under `bin`
pub const SDK_FOLDER_OLD: &str = "10.0.22621.0";

/// Executables shipped in every BuildTools fixture
pub const BUILD_TOOL_EXES: &[&str] = &["makeappx.exe", "makepri.exe", "mt.exe", "signtool.exe"];

/// C++/WinRT version used in projection tests
pub const CPPWINRT_VERSION: &str = "2.0.250303.1";

/// Manifest with a complete identity
pub const APP_MANIFEST: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<Package xmlns="http://schemas.microsoft.com/appx/manifest/foundation/windows10">
  <Identity Name="Contoso.Sample" Publisher="CN=Contoso" Version="1.0.0.0" />
  <Applications>
    <Application Id="SampleApp" Executable="sample.exe" EntryPoint="Windows.FullTrustApplication" />
  </Applications>
</Package>
"#;

/// Manifest embedded in an executable by a linker
pub const EMBEDDED_MANIFEST: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<assembly xmlns="urn:schemas-microsoft-com:asm.v1" manifestVersion="1.0">
  <trustInfo xmlns="urn:schemas-microsoft-com:asm.v3">
    <security>
      <requestedPrivileges>
        <requestedExecutionLevel level="asInvoker" uiAccess="false" />
      </requestedPrivileges>
    </security>
  </trustInfo>
</assembly>
"#;
