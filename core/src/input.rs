//! Turning text into input records.

use std::io;
use std::path::Path;

/// Split text into one record per line. Line terminators (`\n` or `\r\n`)
/// are stripped; empty lines are kept as empty records.
pub fn records_from_text(text: &str) -> Vec<String> {
    text.lines().map(str::to_owned).collect()
}

/// Read a text file into one record per line.
pub async fn read_records<P: AsRef<Path>>(path: P) -> io::Result<Vec<String>> {
    let text = tokio::fs::read_to_string(path).await?;
    Ok(records_from_text(&text))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_records_from_text() {
        assert_eq!(
            records_from_text("the cat sat\r\nthe dog ran\n\nend"),
            vec!["the cat sat", "the dog ran", "", "end"]
        );
        assert!(records_from_text("").is_empty());
    }

    #[tokio::test]
    async fn test_read_records_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "one\ntwo two\n").unwrap();

        let records = read_records(file.path()).await.unwrap();
        assert_eq!(records, vec!["one", "two two"]);
    }

    #[tokio::test]
    async fn test_read_records_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_records(dir.path().join("absent.txt")).await.unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}
