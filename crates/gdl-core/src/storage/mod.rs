//! Disk I/O and file lifecycle for downloads.
//!
//! Bytes are streamed into `<destination>.part`; once the transfer succeeds
//! the part file is synced and renamed over the destination, replacing any
//! file already there.

mod part;

pub use part::PartFile;

/// Temporary file suffix used before atomic rename.
pub const TEMP_SUFFIX: &str = ".part";

/// Path for the temp file: appends `.part` to the final path (e.g. `ep01.mkv` → `ep01.mkv.part`).
pub fn temp_path(final_path: &std::path::Path) -> std::path::PathBuf {
    let mut o = final_path.as_os_str().to_owned();
    o.push(TEMP_SUFFIX);
    std::path::PathBuf::from(o)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn temp_path_appends_part() {
        let p = temp_path(Path::new("file.iso"));
        assert_eq!(p.to_string_lossy(), "file.iso.part");
        let p2 = temp_path(Path::new("/tmp/archive.zip"));
        assert_eq!(p2.to_string_lossy(), "/tmp/archive.zip.part");
    }

    #[test]
    fn create_write_finalize() {
        let dir = tempfile::tempdir().unwrap();
        let final_path = dir.path().join("output.bin");

        let mut part = PartFile::create(&final_path).unwrap();
        part.write(b"hello ").unwrap();
        part.write(b"world").unwrap();
        assert_eq!(part.written(), 11);
        let tp = part.temp_path().to_path_buf();
        part.finalize().unwrap();

        assert!(!tp.exists());
        assert_eq!(std::fs::read(&final_path).unwrap(), b"hello world");
    }

    #[test]
    fn finalize_overwrites_existing_destination() {
        let dir = tempfile::tempdir().unwrap();
        let final_path = dir.path().join("output.bin");
        std::fs::write(&final_path, b"old contents that are longer").unwrap();

        let mut part = PartFile::create(&final_path).unwrap();
        part.write(b"new").unwrap();
        part.finalize().unwrap();

        assert_eq!(std::fs::read(&final_path).unwrap(), b"new");
    }

    #[test]
    fn create_truncates_stale_part_file() {
        let dir = tempfile::tempdir().unwrap();
        let final_path = dir.path().join("output.bin");
        std::fs::write(temp_path(&final_path), b"stale partial bytes").unwrap();

        let mut part = PartFile::create(&final_path).unwrap();
        part.write(b"ok").unwrap();
        part.finalize().unwrap();

        assert_eq!(std::fs::read(&final_path).unwrap(), b"ok");
    }

    #[test]
    fn reset_discards_buffered_body() {
        let dir = tempfile::tempdir().unwrap();
        let final_path = dir.path().join("output.bin");

        let mut part = PartFile::create(&final_path).unwrap();
        part.write(b"<html>interstitial</html>").unwrap();
        part.reset().unwrap();
        assert_eq!(part.written(), 0);
        part.write(b"payload").unwrap();
        part.finalize().unwrap();

        assert_eq!(std::fs::read(&final_path).unwrap(), b"payload");
    }
}
