//! Error reporting and exit codes
//!
//! - `0`: success
//! - `1`: handled failure
//! - `2`: resolution failure (a package, tool or metadata could not be found)

use crate::output;

/// Exit code for handled failures
pub const EXIT_FAILURE: u8 = 1;

/// Exit code for resolution failures
pub const EXIT_RESOLUTION: u8 = 2;

/// Exit code for a failed command
pub fn exit_code(err: &anyhow::Error) -> u8 {
    if is_resolution(err) {
        EXIT_RESOLUTION
    } else {
        EXIT_FAILURE
    }
}

fn is_resolution(err: &anyhow::Error) -> bool {
    err.chain().any(|cause| {
        if let Some(e) = cause.downcast_ref::<winsdk_workspace::Error>() {
            e.is_resolution()
        } else if let Some(e) = cause.downcast_ref::<winsdk_tools::Error>() {
            e.is_resolution()
        } else if let Some(e) = cause.downcast_ref::<winsdk_core::Error>() {
            e.is_resolution()
        } else {
            false
        }
    })
}

/// Print the error chain; with `verbose`, also the captured tool output
pub fn report_error(err: &anyhow::Error, verbose: bool) {
    output::error(&format!("{:#}", err));
    if !verbose {
        return;
    }

    for cause in err.chain() {
        let tool_error = cause
            .downcast_ref::<winsdk_tools::Error>()
            .or_else(|| match cause.downcast_ref::<winsdk_workspace::Error>() {
                Some(winsdk_workspace::Error::Tools(e)) => Some(e),
                _ => None,
            });
        if let Some(winsdk_tools::Error::ToolFailed { stdout, stderr, .. }) = tool_error {
            if !stdout.trim().is_empty() {
                output::detail(stdout);
            }
            if !stderr.trim().is_empty() {
                output::detail(stderr);
            }
            return;
        }
    }
}
