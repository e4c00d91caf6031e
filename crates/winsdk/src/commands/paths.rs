//! Workspace path commands
//!
//! These print bare paths for scripts, so they write to stdout even in quiet
//! mode.

use anyhow::Result;
use winsdk_core::paths::WorkspaceLayout;

use crate::cli::GetWinsdkPathArgs;
use crate::context::{current_dir, global_layout};

pub fn get_winsdk_path(args: GetWinsdkPathArgs) -> Result<()> {
    let layout = if args.global {
        global_layout()?
    } else {
        WorkspaceLayout::discover(&current_dir()?)
    };
    println!("{}", layout.root().display());
    Ok(())
}

pub fn get_global_winsdk() -> Result<()> {
    println!("{}", global_layout()?.root().display());
    Ok(())
}
