//! JSON and YAML encode/decode helpers
//!
//! Files written here are created owner read/write only (0600) since they
//! usually carry tracker credentials or issue content.

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Read, Write};
use std::path::Path;

use serde::Serialize;
use serde_json::Value as Json;
use tracing::{debug, error};

use crate::error::{Result, UtilError};

/// Decode a JSON document from `reader`
pub fn json_decode<R: Read>(mut reader: R) -> Result<Json> {
    let mut content = Vec::new();
    reader.read_to_end(&mut content)?;
    serde_json::from_slice(&content).map_err(|e| {
        error!("JSON Parse Error: {} from {}", e, String::from_utf8_lossy(&content));
        UtilError::from(e)
    })
}

/// Decode a YAML document from `reader`
pub fn yaml_decode<R: Read>(reader: R) -> Result<serde_yaml::Value> {
    serde_yaml::from_reader(reader).map_err(|e| {
        error!("YAML Parse Error: {}", e);
        UtilError::from(e)
    })
}

/// Compact JSON followed by a newline
pub fn json_encode<T: Serialize + ?Sized>(data: &T) -> Result<String> {
    let mut encoded = serde_json::to_string(data).map_err(|e| {
        error!("Failed to encode data: {}", e);
        UtilError::from(e)
    })?;
    encoded.push('\n');
    Ok(encoded)
}

fn create_private(path: &Path) -> Result<File> {
    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    options.open(path).map_err(|e| {
        error!("Failed to open {}: {}", path.display(), e);
        UtilError::fs(path, e)
    })
}

fn write_private(path: &Path, bytes: &[u8]) -> Result<()> {
    let mut writer = BufWriter::new(create_private(path)?);
    writer
        .write_all(bytes)
        .and_then(|_| writer.flush())
        .map_err(|e| UtilError::fs(path, e))
}

/// Write `data` to `path` as newline-terminated compact JSON
pub fn json_write<T: Serialize + ?Sized>(path: impl AsRef<Path>, data: &T) -> Result<()> {
    let path = path.as_ref();
    debug!(?path, "json_write: called");
    let encoded = json_encode(data)?;
    write_private(path, encoded.as_bytes())
}

/// Write `data` to `path` as YAML
pub fn yaml_write<T: Serialize + ?Sized>(path: impl AsRef<Path>, data: &T) -> Result<()> {
    let path = path.as_ref();
    debug!(?path, "yaml_write: called");
    let encoded = serde_yaml::to_string(data).map_err(|e| {
        error!("Failed to marshal yaml for {}: {}", path.display(), e);
        UtilError::from(e)
    })?;
    write_private(path, encoded.as_bytes())
}

/// `errorMessages` carried by a tracker error body
pub fn error_messages(body: &Json) -> Vec<String> {
    body.get("errorMessages")
        .and_then(Json::as_array)
        .map(|messages| {
            messages
                .iter()
                .map(|m| match m {
                    Json::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .collect()
        })
        .unwrap_or_default()
}

/// Decode a response body, logging tracker error messages on a 400
///
/// The decoded body is returned whatever the status code.
pub fn response_to_json<R: Read>(status: u16, body: R) -> Result<Json> {
    debug!(%status, "response_to_json: called");
    let data = json_decode(body)?;
    if status == 400 {
        for message in error_messages(&data) {
            error!("{}", message);
        }
    }
    Ok(data)
}

/// [`response_to_json`] for a blocking reqwest response
pub fn response_to_json_blocking(response: reqwest::Result<reqwest::blocking::Response>) -> Result<Json> {
    let response = response?;
    let status = response.status().as_u16();
    response_to_json(status, response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs;
    use std::sync::{Arc, Mutex};
    use tempfile::TempDir;

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl Write for Captured {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    fn capture_logs<T>(f: impl FnOnce() -> T) -> (T, String) {
        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .finish();
        let result = tracing::subscriber::with_default(subscriber, f);
        let logs = String::from_utf8_lossy(&captured.0.lock().unwrap()).into_owned();
        (result, logs)
    }

    #[test]
    fn test_json_decode() {
        let value = json_decode(r#"{"key": "ABC-1", "n": [1, 2]}"#.as_bytes()).unwrap();
        assert_eq!(value, json!({"key": "ABC-1", "n": [1, 2]}));
    }

    #[test]
    fn test_json_decode_error_is_logged_and_returned() {
        let (result, logs) = capture_logs(|| json_decode("{not json".as_bytes()));
        assert!(matches!(result, Err(UtilError::Json(_))));
        assert!(logs.contains("JSON Parse Error"));
        assert!(logs.contains("{not json"));
    }

    #[test]
    fn test_json_encode_compact_with_newline() {
        let out = json_encode(&json!({"a": [1, 2]})).unwrap();
        assert_eq!(out, "{\"a\":[1,2]}\n");
    }

    #[test]
    fn test_json_write_roundtrip() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("issue.json");

        json_write(&path, &json!({"summary": "first"})).unwrap();
        json_write(&path, &json!({"x": 1})).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "{\"x\":1}\n");
    }

    #[test]
    fn test_yaml_write() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.yml");

        yaml_write(&path, &json!({"endpoint": "https://tracker.example.com"})).unwrap();

        let back = yaml_decode(fs::File::open(&path).unwrap()).unwrap();
        assert_eq!(back["endpoint"].as_str(), Some("https://tracker.example.com"));
    }

    #[cfg(unix)]
    #[test]
    fn test_written_files_are_private() {
        use std::os::unix::fs::PermissionsExt;

        let temp = TempDir::new().unwrap();
        let json_path = temp.path().join("a.json");
        let yaml_path = temp.path().join("a.yml");
        json_write(&json_path, &json!(1)).unwrap();
        yaml_write(&yaml_path, &json!(1)).unwrap();

        for path in [json_path, yaml_path] {
            let mode = fs::metadata(&path).unwrap().permissions().mode();
            assert_eq!(mode & 0o777, 0o600, "{}", path.display());
        }
    }

    #[test]
    fn test_write_into_missing_directory_fails() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("missing").join("out.json");

        let err = json_write(&path, &json!({})).unwrap_err();
        assert!(matches!(err, UtilError::Filesystem { .. }));
        assert!(err.to_string().contains("out.json"));
    }

    #[test]
    fn test_error_messages() {
        let body = json!({"errorMessages": ["Issue does not exist", 7], "errors": {}});
        assert_eq!(error_messages(&body), vec!["Issue does not exist", "7"]);
        assert!(error_messages(&json!({"key": "X"})).is_empty());
        assert!(error_messages(&json!(["not", "an", "object"])).is_empty());
    }

    #[test]
    fn test_response_400_logs_messages() {
        let body = r#"{"errorMessages": ["Field 'foo' cannot be set"]}"#;
        let (result, logs) = capture_logs(|| response_to_json(400, body.as_bytes()));

        let data = result.unwrap();
        assert_eq!(error_messages(&data), vec!["Field 'foo' cannot be set"]);
        assert!(logs.contains("Field 'foo' cannot be set"));
    }

    #[test]
    fn test_response_other_status_returns_body_silently() {
        let body = r#"{"errorMessages": ["ignored"]}"#;
        let (result, logs) = capture_logs(|| response_to_json(500, body.as_bytes()));

        assert_eq!(result.unwrap(), json!({"errorMessages": ["ignored"]}));
        assert!(!logs.contains("ignored"));
    }
}
