//! Output side of the command-line tool: where extracted files go and how
//! listings are printed.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Component, Path, PathBuf};

use huffarc_core::ListEntry;
use tempfile::NamedTempFile;

/// Destination for an extracted entry: `out_dir/name`, or `name` in the
/// current directory when no folder was given.
///
/// # Errors
/// `InvalidInput` if the stored name is not a single plain path component
/// (e.g. contains a separator or is `..`), so entries can never escape the
/// output folder.
pub fn output_path(out_dir: Option<&Path>, name: &str) -> io::Result<PathBuf> {
    let mut components = Path::new(name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => {}
        _ => {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("unsafe entry name {name:?}"),
            ))
        }
    }

    Ok(match out_dir {
        Some(dir) => dir.join(name),
        None => PathBuf::from(name),
    })
}

/// Write one verified entry to its destination.
pub fn write_entry(out_dir: Option<&Path>, name: &str, bytes: &[u8]) -> io::Result<PathBuf> {
    let path = output_path(out_dir, name)?;
    fs::write(&path, bytes)?;
    Ok(path)
}

/// Create `path` from whatever `write` produces, all or nothing.
///
/// Output goes to a temporary file in the same folder, which replaces
/// `path` only once `write` succeeds. On error the temporary file is
/// removed and an existing `path` is left as it was.
pub fn write_atomically<T, F>(path: &Path, write: F) -> huffarc_core::Result<T>
where
    F: FnOnce(&mut BufWriter<&mut File>) -> huffarc_core::Result<T>,
{
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir)?;

    let value = {
        let mut out = BufWriter::new(tmp.as_file_mut());
        let value = write(&mut out)?;
        out.flush()?;
        value
    };

    tmp.persist(path).map_err(io::Error::from)?;
    Ok(value)
}

/// Render a listing: one `name size` line per entry, name padded to 30.
pub fn format_listing(entries: &[ListEntry]) -> String {
    entries
        .iter()
        .map(|e| format!("{:<30} {}\n", e.name, e.size))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_path() {
        assert_eq!(
            output_path(Some(Path::new("out")), "a.txt").unwrap(),
            Path::new("out").join("a.txt")
        );
        assert_eq!(output_path(None, "a.txt").unwrap(), PathBuf::from("a.txt"));
    }

    #[test]
    fn test_output_path_rejects_escapes() {
        for name in ["../evil", "/etc/passwd", "dir/file", "..", ""] {
            assert!(output_path(Some(Path::new("out")), name).is_err(), "{name}");
        }
    }

    #[test]
    fn test_write_entry() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_entry(Some(dir.path()), "x.bin", &[1, 2, 3]).unwrap();
        assert_eq!(fs::read(path).unwrap(), vec![1, 2, 3]);

        let missing = dir.path().join("no-such-folder");
        assert!(write_entry(Some(&missing), "x.bin", &[1]).is_err());
    }

    #[test]
    fn test_write_atomically_success() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("out.huff");

        let written = write_atomically(&target, |out| {
            out.write_all(b"archive")?;
            Ok(7)
        })
        .unwrap();

        assert_eq!(written, 7);
        assert_eq!(fs::read(&target).unwrap(), b"archive");
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_write_atomically_failure_leaves_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("out.huff");

        // Fails after some bytes are already written
        let result: huffarc_core::Result<()> = write_atomically(&target, |out| {
            out.write_all(b"partial")?;
            Err(huffarc_core::error::InputError::NoInputFiles.into())
        });

        assert!(result.is_err());
        assert!(!target.exists());
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_write_atomically_keeps_old_archive_on_failure() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("out.huff");
        fs::write(&target, b"previous").unwrap();

        let files = vec![huffarc_core::InputFile::new(
            "this-name-is-way-too-long-for-the-field.txt",
            "x",
        )];
        let result = write_atomically(&target, |out| huffarc_core::compress(&files, out));

        assert!(result.is_err());
        assert_eq!(fs::read(&target).unwrap(), b"previous");
    }

    #[test]
    fn test_format_listing() {
        let entries = vec![
            ListEntry {
                name: "a.txt".into(),
                size: 20,
            },
            ListEntry {
                name: "b.txt".into(),
                size: 10,
            },
        ];
        let text = format_listing(&entries);
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], format!("a.txt{} 20", " ".repeat(25)));
        assert!(lines[1].starts_with("b.txt "));
        assert!(lines[1].ends_with(" 10"));
    }
}
