use crate::config::{
    DEFAULT_CONCURRENCY, DEFAULT_EXPECTED_STATUS, DEFAULT_TIMEOUT, EndpointSpec, Headers,
    HttpMethod, SecretString,
};
use serde::Deserialize;
use serde_yaml::{Mapping, Value};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("{kind} file not found: {}", path.display())]
    NotFound { kind: &'static str, path: PathBuf },
    #[error("failed to read {}: {source}", path.display())]
    Read { path: PathBuf, source: io::Error },
    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_yaml::Error,
    },
    #[error("no endpoints defined in batch config")]
    NoEndpoints,
    #[error("endpoint '{name}' has no URL")]
    MissingUrl { name: String },
    #[error("endpoint '{name}' has unsupported method '{method}'")]
    UnknownMethod { name: String, method: String },
    #[error("header '{name}' must have a text or number value")]
    HeaderValue { name: String },
    #[error("invalid header format: '{0}' (expected 'Key: Value')")]
    MalformedHeader(String),
    #[error("empty header key in: '{0}'")]
    EmptyHeaderKey(String),
}

/// A validated batch file with defaults applied.
#[derive(Clone, Debug)]
pub struct BatchFile {
    pub endpoints: Vec<EndpointSpec>,
    pub concurrency: usize,
    pub timeout: Duration,
}

#[derive(Debug, Default, Deserialize)]
struct RawBatchFile {
    #[serde(default)]
    endpoints: Vec<RawEndpoint>,
    #[serde(default)]
    concurrency: Option<usize>,
    #[serde(default, with = "humantime_serde")]
    timeout: Option<Duration>,
}

#[derive(Debug, Deserialize)]
struct RawEndpoint {
    #[serde(default)]
    name: String,
    #[serde(default)]
    url: String,
    #[serde(default)]
    method: Option<String>,
    #[serde(default)]
    headers: Mapping,
    #[serde(default)]
    body: Option<String>,
    #[serde(default)]
    expected_status: Option<u16>,
    #[serde(default, with = "humantime_serde")]
    timeout: Option<Duration>,
}

pub fn load_batch(path: &Path) -> Result<BatchFile, LoadError> {
    let content = read_file("batch config", path)?;
    parse_batch(&content, path)
}

/// `path` is only used in error messages.
pub fn parse_batch(content: &str, path: &Path) -> Result<BatchFile, LoadError> {
    if content.trim().is_empty() {
        return Err(LoadError::NoEndpoints);
    }
    let raw: RawBatchFile = serde_yaml::from_str(content).map_err(|source| LoadError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    if raw.endpoints.is_empty() {
        return Err(LoadError::NoEndpoints);
    }

    let endpoints = raw
        .endpoints
        .into_iter()
        .map(endpoint_from_raw)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(BatchFile {
        endpoints,
        concurrency: raw
            .concurrency
            .filter(|value| *value > 0)
            .unwrap_or(DEFAULT_CONCURRENCY),
        timeout: raw
            .timeout
            .filter(|value| !value.is_zero())
            .unwrap_or(DEFAULT_TIMEOUT),
    })
}

fn endpoint_from_raw(raw: RawEndpoint) -> Result<EndpointSpec, LoadError> {
    if raw.url.trim().is_empty() {
        return Err(LoadError::MissingUrl { name: raw.name });
    }

    let method = match raw.method.as_deref().map(str::trim) {
        None | Some("") => HttpMethod::Get,
        Some(text) => HttpMethod::parse(text).ok_or_else(|| LoadError::UnknownMethod {
            name: raw.name.clone(),
            method: text.to_string(),
        })?,
    };

    Ok(EndpointSpec {
        headers: headers_from_mapping(&raw.headers)?,
        name: raw.name,
        url: raw.url.trim().to_string(),
        method,
        body: raw.body.filter(|body| !body.is_empty()),
        expected_status: raw
            .expected_status
            .filter(|status| *status != 0)
            .unwrap_or(DEFAULT_EXPECTED_STATUS),
        timeout: raw.timeout.filter(|value| !value.is_zero()),
    })
}

/// Flat `Name: value` mapping. An empty file yields no headers.
pub fn load_headers(path: &Path) -> Result<Headers, LoadError> {
    let content = read_file("headers", path)?;
    if content.trim().is_empty() {
        return Ok(Headers::new());
    }
    let mapping: Mapping = serde_yaml::from_str(&content).map_err(|source| LoadError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    headers_from_mapping(&mapping)
}

fn headers_from_mapping(mapping: &Mapping) -> Result<Headers, LoadError> {
    let mut headers = Headers::new();
    for (key, value) in mapping {
        let name = scalar_text(key).unwrap_or_default();
        let value = scalar_text(value).ok_or_else(|| LoadError::HeaderValue { name: name.clone() })?;
        headers.push((name, SecretString::new(value)));
    }
    Ok(headers)
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        _ => None,
    }
}

/// Parses repeated `-H "Key: Value"` flags. Splits on the first colon.
pub fn parse_inline_headers(raw: &[String]) -> Result<Headers, LoadError> {
    let mut headers = Headers::new();
    for entry in raw {
        let Some((key, value)) = entry.split_once(':') else {
            return Err(LoadError::MalformedHeader(entry.clone()));
        };
        let key = key.trim();
        if key.is_empty() {
            return Err(LoadError::EmptyHeaderKey(entry.clone()));
        }
        headers.push((key.to_string(), SecretString::new(value.trim())));
    }
    Ok(headers)
}

/// Later layers replace earlier values for the same name; the first
/// occurrence keeps its position.
pub fn merge_headers(layers: &[Headers]) -> Headers {
    let mut merged = Headers::new();
    for (name, value) in layers.iter().flatten() {
        match merged.iter_mut().find(|(existing, _)| existing == name) {
            Some(slot) => slot.1 = value.clone(),
            None => merged.push((name.clone(), value.clone())),
        }
    }
    merged
}

fn read_file(kind: &'static str, path: &Path) -> Result<String, LoadError> {
    if !path.exists() {
        return Err(LoadError::NotFound {
            kind,
            path: path.to_path_buf(),
        });
    }
    fs::read_to_string(path).map_err(|source| LoadError::Read {
        path: path.to_path_buf(),
        source,
    })
}
