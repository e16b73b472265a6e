use crate::error::{ErrorKind, Result};
use directories::{BaseDirs, ProjectDirs};
use exn::OptionExt;
use std::path::{Path, PathBuf};

const CONFIG_FILE_NAME: &str = "config.toml";

/// Replace a leading `~` component with the user's home directory.
///
/// Paths without a leading `~` are returned unchanged. `~user/...` forms are
/// not supported and are also returned unchanged.
pub fn expand_home(path: impl AsRef<Path>) -> Result<PathBuf> {
    expand_with(path.as_ref(), || BaseDirs::new().map(|dirs| dirs.home_dir().to_path_buf()))
}

fn expand_with(path: &Path, home: impl FnOnce() -> Option<PathBuf>) -> Result<PathBuf> {
    match path.strip_prefix("~") {
        Ok(rest) => Ok(home().ok_or_raise(|| ErrorKind::HomeDirectory)?.join(rest)),
        Err(_) => Ok(path.to_path_buf()),
    }
}

/// Platform-specific location of the optional config file, e.g.
/// `~/.config/fkm/config.toml` on Linux.
pub fn default_config_file() -> Option<PathBuf> {
    ProjectDirs::from("", "", "fkm").map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("~/.config/.keymapp/keymapp.sqlite3", "/home/user/.config/.keymapp/keymapp.sqlite3")]
    #[case("~", "/home/user")]
    #[case("/var/lib/keymapp.sqlite3", "/var/lib/keymapp.sqlite3")]
    #[case("relative/keymapp.sqlite3", "relative/keymapp.sqlite3")]
    #[case("~user/keymapp.sqlite3", "~user/keymapp.sqlite3")]
    fn test_expand(#[case] input: &str, #[case] expected: &str) {
        let expanded = expand_with(Path::new(input), || Some(PathBuf::from("/home/user"))).unwrap();
        assert_eq!(expanded, PathBuf::from(expected));
    }

    #[test]
    fn test_expand_without_home() {
        let err = expand_with(Path::new("~/keymapp.sqlite3"), || None).unwrap_err();
        assert_eq!(*err, ErrorKind::HomeDirectory);
        // Doesn't need a home directory, so doesn't fail.
        assert!(expand_with(Path::new("/tmp/keymapp.sqlite3"), || None).is_ok());
    }
}
