//! Output file writer.
//!
//! ## `write_config` protocol
//!
//! 1. Serialize the mapping as 4-space indented JSON (already done by caller).
//! 2. Write to `<path>.wsops.tmp`.
//! 3. Rename over the final path (atomic on POSIX); a previous file is
//!    replaced unconditionally.
//! 4. SHA-256 the written bytes for the caller's summary.
//!
//! A crash before step 3 leaves the previous file untouched.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::ser::{Formatter, PrettyFormatter};
use sha2::{Digest, Sha256};

use crate::error::{io_err, LinkedError};

/// Outcome of writing the config file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteResult {
    /// No file existed at the path before.
    Created { path: PathBuf },
    /// A previous file was replaced.
    Replaced { path: PathBuf },
}

impl WriteResult {
    pub fn path(&self) -> &Path {
        match self {
            WriteResult::Created { path } | WriteResult::Replaced { path } => path,
        }
    }
}

/// Render `value` the way the config file is stored: 4-space indent, no
/// trailing newline, everything outside printable ASCII as `\uXXXX`.
pub fn render<T: Serialize>(value: &T) -> Result<Vec<u8>, LinkedError> {
    let mut out = Vec::new();
    let formatter = AsciiPretty(PrettyFormatter::with_indent(b"    "));
    let mut serializer = serde_json::Serializer::with_formatter(&mut out, formatter);
    value.serialize(&mut serializer)?;
    Ok(out)
}

/// `PrettyFormatter` that writes non-ASCII characters as UTF-16 escapes.
struct AsciiPretty<'a>(PrettyFormatter<'a>);

impl Formatter for AsciiPretty<'_> {
    fn begin_array<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.0.begin_array(writer)
    }

    fn end_array<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.0.end_array(writer)
    }

    fn begin_array_value<W: ?Sized + io::Write>(
        &mut self,
        writer: &mut W,
        first: bool,
    ) -> io::Result<()> {
        self.0.begin_array_value(writer, first)
    }

    fn end_array_value<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.0.end_array_value(writer)
    }

    fn begin_object<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.0.begin_object(writer)
    }

    fn end_object<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.0.end_object(writer)
    }

    fn begin_object_key<W: ?Sized + io::Write>(
        &mut self,
        writer: &mut W,
        first: bool,
    ) -> io::Result<()> {
        self.0.begin_object_key(writer, first)
    }

    fn begin_object_value<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.0.begin_object_value(writer)
    }

    fn end_object_value<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.0.end_object_value(writer)
    }

    fn write_string_fragment<W: ?Sized + io::Write>(
        &mut self,
        writer: &mut W,
        fragment: &str,
    ) -> io::Result<()> {
        let mut start = 0;
        for (i, c) in fragment.char_indices() {
            if (' '..='~').contains(&c) {
                continue;
            }
            writer.write_all(fragment[start..i].as_bytes())?;
            let mut units = [0u16; 2];
            for unit in c.encode_utf16(&mut units) {
                write!(writer, "\\u{unit:04x}")?;
            }
            start = i + c.len_utf8();
        }
        writer.write_all(fragment[start..].as_bytes())
    }
}

pub fn sha256_hex(bytes: &[u8]) -> String {
    let mut h = Sha256::new();
    h.update(bytes);
    hex::encode(h.finalize())
}

pub(crate) fn write_config(path: &Path, bytes: &[u8]) -> Result<WriteResult, LinkedError> {
    let tmp = PathBuf::from(format!("{}.wsops.tmp", path.display()));
    write_config_with_tmp(path, bytes, &tmp)
}

fn write_config_with_tmp(
    path: &Path,
    bytes: &[u8],
    tmp: &Path,
) -> Result<WriteResult, LinkedError> {
    let existed = path.exists();

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| io_err(parent, e))?;
    }
    std::fs::write(tmp, bytes).map_err(|e| io_err(tmp, e))?;

    if let Err(e) = std::fs::rename(tmp, path) {
        let _ = std::fs::remove_file(tmp);
        return Err(io_err(path, e));
    }

    tracing::info!(path = %path.display(), "linked service config file written");
    let path = path.to_path_buf();
    Ok(if existed {
        WriteResult::Replaced { path }
    } else {
        WriteResult::Created { path }
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::fs;

    use serde_json::json;
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn first_write_returns_created() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("linkedservice-config.json");
        let result = write_config(&path, b"{}").unwrap();
        assert!(matches!(result, WriteResult::Created { .. }));
        assert_eq!(fs::read(&path).unwrap(), b"{}");
    }

    #[test]
    fn existing_file_is_replaced_wholesale() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("out.json");
        fs::write(&path, "a much longer previous payload that must not linger").unwrap();
        let result = write_config(&path, b"{}").unwrap();
        assert!(matches!(result, WriteResult::Replaced { .. }));
        assert_eq!(fs::read_to_string(&path).unwrap(), "{}");
    }

    #[test]
    fn tmp_file_removed_after_write() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("clean.json");
        write_config(&path, b"{}").unwrap();
        let tmp_path = PathBuf::from(format!("{}.wsops.tmp", path.display()));
        assert!(!tmp_path.exists(), ".wsops.tmp must be cleaned up");
    }

    #[test]
    fn creates_parent_directories() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("deploy").join("params").join("cfg.json");
        write_config(&path, b"{}").unwrap();
        assert!(path.exists());
    }

    #[test]
    fn render_uses_four_space_indent_without_trailing_newline() {
        let bytes = render(&json!({"a": {"b": 1}})).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert_eq!(text, "{\n    \"a\": {\n        \"b\": 1\n    }\n}");
    }

    #[test]
    fn digest_is_stable() {
        assert_eq!(sha256_hex(b"{}"), sha256_hex(b"{}"));
        assert_eq!(
            sha256_hex(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn rename_failure_leaves_target_and_cleans_tmp() {
        let root = TempDir::new().unwrap();
        // A non-empty directory at the target path cannot be replaced by a file.
        let path = root.path().join("cfg.json");
        fs::create_dir_all(&path).unwrap();
        fs::write(path.join("keep.txt"), "original").unwrap();

        let tmp_path = root.path().join("cfg.json.wsops.tmp");
        let result = write_config_with_tmp(&path, b"new content", &tmp_path);

        assert!(matches!(result, Err(LinkedError::Io { .. })));
        assert_eq!(fs::read_to_string(path.join("keep.txt")).unwrap(), "original");
        assert!(!tmp_path.exists(), ".wsops.tmp should be cleaned up");
    }

    #[test]
    fn render_escapes_non_ascii_like_python_json() {
        let bytes = render(&json!({"Área": "é😀\u{7f}"})).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert!(text.is_ascii());
        assert_eq!(
            text,
            "{\n    \"\\u00c1rea\": \"\\u00e9\\ud83d\\ude00\\u007f\"\n}"
        );
    }
}
