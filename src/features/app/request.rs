use super::AppError;
use crate::data_model::settings::RequestSettings;
use crate::loader::{load_headers, merge_headers, parse_inline_headers};
use crate::probe_engine::ProbeRequest;

/// File headers first, then `-H` flags on top.
pub fn build_request(settings: &RequestSettings) -> Result<ProbeRequest, AppError> {
    let file_headers = settings
        .header_file
        .as_deref()
        .map(load_headers)
        .transpose()?
        .unwrap_or_default();
    let inline_headers = parse_inline_headers(&settings.inline_headers)?;

    let mut request = ProbeRequest::new(settings.url.as_str(), settings.method, settings.timeout);
    request.headers = merge_headers(&[file_headers, inline_headers]);
    Ok(request)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HttpMethod;
    use crate::loader::LoadError;
    use std::io::Write;
    use std::path::PathBuf;
    use std::time::Duration;
    use tempfile::NamedTempFile;

    fn settings(header_file: Option<PathBuf>, inline: &[&str]) -> RequestSettings {
        RequestSettings {
            url: "https://api.example.com".to_string(),
            method: HttpMethod::Get,
            timeout: Duration::from_secs(3),
            header_file,
            inline_headers: inline.iter().map(|h| h.to_string()).collect(),
        }
    }

    #[test]
    fn inline_headers_override_file_headers() {
        let mut file = NamedTempFile::new().expect("temp file");
        file.write_all(b"Authorization: Bearer old\nAccept: text/plain\n")
            .expect("write");

        let request = build_request(&settings(
            Some(file.path().to_path_buf()),
            &["Authorization: Bearer new"],
        ))
        .expect("request");

        let headers: Vec<(&str, &str)> = request
            .headers
            .iter()
            .map(|(name, value)| (name.as_str(), value.expose()))
            .collect();
        assert_eq!(
            headers,
            vec![("Authorization", "Bearer new"), ("Accept", "text/plain")]
        );
        assert_eq!(request.timeout, Duration::from_secs(3));
    }

    #[test]
    fn malformed_inline_header_is_a_setup_error() {
        let err = build_request(&settings(None, &["broken"])).expect_err("bad header");
        assert!(matches!(err, AppError::Load(LoadError::MalformedHeader(_))));
    }

    #[test]
    fn missing_header_file_is_a_setup_error() {
        let err = build_request(&settings(Some(PathBuf::from("/nonexistent/h.yml")), &[]))
            .expect_err("missing file");
        assert!(matches!(err, AppError::Load(LoadError::NotFound { .. })));
    }
}
