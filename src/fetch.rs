use anyhow::{Context, Result};

/// Loads input bytes from a local file path or fetches them over HTTP.
#[tracing::instrument(fields(source = %source))]
pub fn fetch_bytes(source: &str) -> Result<Vec<u8>> {
    if source.starts_with("http://") || source.starts_with("https://") {
        let resp = reqwest::blocking::get(source)
            .and_then(|r| r.error_for_status())
            .with_context(|| format!("failed to fetch '{source}'"))?;
        Ok(resp.bytes()?.to_vec())
    } else {
        std::fs::read(source).with_context(|| format!("failed to read '{source}'"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::fs;

    #[test]
    fn test_fetch_local_file() {
        let path = format!("{}/scouting_report_test_fetch.csv", env::temp_dir().display());
        fs::write(&path, "a,b\n1,2\n").unwrap();

        let bytes = fetch_bytes(&path).unwrap();
        assert_eq!(bytes, b"a,b\n1,2\n");

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_fetch_missing_file() {
        assert!(fetch_bytes("/nonexistent/scouting_input.csv").is_err());
    }
}
