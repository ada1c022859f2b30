//! Full cache reset (`prism clear`).

use prism_cache::store;

use crate::target::resolve_target;
use crate::{GlobalArgs, TargetArgs};

/// Runs the `prism clear` command.
///
/// Deletes the index and blob file of the selected pair. A pair that does not
/// exist is not an error.
pub fn run(args: &TargetArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let target = resolve_target(args, global)?;
    let removed = store::remove_pair(&target.paths)?;

    if !global.quiet {
        if removed == 0 {
            eprintln!("   Nothing to clear for {}", target.profile.token());
        } else {
            eprintln!(
                "   Cleared {} ({} files removed)",
                target.paths.index.with_extension("*").display(),
                removed
            );
        }
    }
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use prism_cache::CachePaths;
    use prism_common::TargetProfile;

    #[test]
    fn clear_removes_pair() {
        let dir = tempfile::tempdir().unwrap();
        let paths = CachePaths::new(dir.path(), &TargetProfile::default());
        std::fs::write(&paths.index, 1u32.to_le_bytes()).unwrap();
        std::fs::write(&paths.blob, b"").unwrap();

        let args = TargetArgs {
            dir: Some(dir.path().to_string_lossy().into_owned()),
            ..TargetArgs::default()
        };
        let global = GlobalArgs {
            quiet: true,
            config: None,
        };
        assert_eq!(run(&args, &global).unwrap(), 0);
        assert!(!paths.index.exists());
        assert!(!paths.blob.exists());

        assert_eq!(run(&args, &global).unwrap(), 0);
    }
}
