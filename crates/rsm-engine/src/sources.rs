//! Line-oriented source lists.
//!
//! One URL per line. Blank lines and lines starting with `#` are skipped, a
//! `#` later in a line starts a trailing comment, and surrounding whitespace
//! is trimmed.

use std::path::Path;

use crate::error::{EngineError, EngineResult};

/// Parse the URLs out of source-list text, in file order.
pub fn parse_source_list(text: &str) -> Vec<String> {
    text.lines()
        .filter_map(|line| {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                return None;
            }
            let url = match line.split_once('#') {
                Some((before, _)) => before.trim_end(),
                None => line,
            };
            (!url.is_empty()).then(|| url.to_string())
        })
        .collect()
}

/// Read a source-list file. Invalid UTF-8 sequences are replaced rather than
/// rejected.
pub fn read_source_list(path: &Path) -> EngineResult<Vec<String>> {
    let raw = std::fs::read(path).map_err(|source| EngineError::SourceList {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(parse_source_list(&String::from_utf8_lossy(&raw)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skips_comments_and_blanks() {
        let text = "\
# upstream lists
https://a.example/list.json

   https://b.example/list.json   # mirror
#https://disabled.example/list.json
";
        assert_eq!(
            parse_source_list(text),
            vec![
                "https://a.example/list.json".to_string(),
                "https://b.example/list.json".to_string(),
            ]
        );
    }

    #[test]
    fn handles_crlf_and_indented_comments() {
        let text = "https://a.example/x.yaml\r\n   # indented comment\r\n\r\n";
        assert_eq!(parse_source_list(text), vec!["https://a.example/x.yaml".to_string()]);
    }

    #[test]
    fn keeps_duplicates_in_order() {
        let text = "https://a\nhttps://b\nhttps://a\n";
        assert_eq!(parse_source_list(text), vec!["https://a", "https://b", "https://a"]);
    }

    #[test]
    fn empty_text() {
        assert!(parse_source_list("").is_empty());
        assert!(parse_source_list("\n\n  \n# only comments\n").is_empty());
    }

    #[test]
    fn reads_file_with_invalid_utf8() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Proxy.txt");
        std::fs::write(&path, b"https://a.example/x.json # caf\xE9\nhttps://b.example/y.json\n").unwrap();
        assert_eq!(
            read_source_list(&path).unwrap(),
            vec!["https://a.example/x.json", "https://b.example/y.json"]
        );
    }

    #[test]
    fn missing_file_is_an_error() {
        let err = read_source_list(Path::new("/definitely/not/here.txt")).unwrap_err();
        assert!(matches!(err, EngineError::SourceList { .. }));
    }
}
