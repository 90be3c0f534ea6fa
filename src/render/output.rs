#[cfg(unix)]
use std::fs;
use std::io::Write;
use std::path::Path;
use tracing::info;

#[cfg(unix)]
const DEFAULT_FILE_MODE: u32 = 0o644;

/// Writes a rendered dashboard to `output`, or to stdout when there is none.
///
/// Files go through a temp file and a rename so readers never see a
/// half-written page. The result keeps the mode of the file it replaces, or
/// gets 0644 so a web server running as another user can read it.
pub fn write_output(rendered: &str, output: Option<&Path>) -> std::io::Result<()> {
    match output {
        Some(path) => {
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."));
            let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
            tmp.write_all(rendered.as_bytes())?;
            #[cfg(unix)]
            tmp.as_file().set_permissions(target_permissions(path)?)?;
            tmp.persist(path).map_err(|e| e.error)?;
            info!(path = ?path, "Dashboard written.");
            Ok(())
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(rendered.as_bytes())?;
            stdout.flush()
        }
    }
}

#[cfg(unix)]
fn target_permissions(path: &Path) -> std::io::Result<fs::Permissions> {
    use std::os::unix::fs::PermissionsExt;

    match fs::metadata(path) {
        Ok(existing) => Ok(existing.permissions()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Ok(fs::Permissions::from_mode(DEFAULT_FILE_MODE))
        }
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_writes_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("status.html");

        write_output("<html></html>", Some(&path)).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "<html></html>");

        write_output("<html>v2</html>", Some(&path)).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "<html>v2</html>");
    }

    #[cfg(unix)]
    #[test]
    fn test_new_file_is_world_readable() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("status.html");

        write_output("<html></html>", Some(&path)).unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o644);
    }

    #[cfg(unix)]
    #[test]
    fn test_existing_file_mode_is_kept() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("status.html");
        fs::write(&path, "old").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o640)).unwrap();

        write_output("new", Some(&path)).unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o640);
        assert_eq!(fs::read_to_string(&path).unwrap(), "new");
    }
}
