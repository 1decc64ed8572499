use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use crate::errors::Result;

use super::paths::ensure_dir;

const TMP_SUFFIX: &str = "tmp";

/// Writes `data` to `path`, creating missing parent directories.
pub fn write_file(path: &Path, data: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}

/// Writes `data` next to `path` and renames it into place, so readers see
/// either the old or the new contents.
pub fn replace_file(path: &Path, data: &str) -> Result<()> {
    let tmp = tmp_path(path);
    write_file(&tmp, data)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

/// `list.json` -> `list.json.tmp`.
pub fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn tmp_path_keeps_the_original_extension() {
        assert_eq!(tmp_path(Path::new("/a/list.json")), PathBuf::from("/a/list.json.tmp"));
        assert_eq!(tmp_path(Path::new("/a/list")), PathBuf::from("/a/list.tmp"));
    }

    #[test]
    fn replace_file_creates_parents_and_leaves_no_tmp() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("nested").join("config.json");

        replace_file(&path, "{}").expect("first write");
        replace_file(&path, "{\"a\":1}").expect("overwrite");

        assert_eq!(fs::read_to_string(&path).expect("read"), "{\"a\":1}");
        assert!(!tmp_path(&path).exists());
    }
}
