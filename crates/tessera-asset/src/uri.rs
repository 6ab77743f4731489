//! URIs found in `buffers[].uri` and `images[].uri`.

use std::path::{Component, Path};

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::error::{AssetError, Result};

/// A resource reference, classified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Uri<'a> {
    /// Inline `data:` payload.
    Data(DataUri<'a>),
    /// Path relative to the asset, percent-decoded.
    Relative(String),
}

impl<'a> Uri<'a> {
    /// Classify a URI string.
    ///
    /// `data:` URIs are split but not decoded. Any other scheme is refused,
    /// as are paths that do not stay below the asset's directory.
    pub fn parse(uri: &'a str) -> Result<Self> {
        if let Some(rest) = uri.strip_prefix("data:") {
            return DataUri::split(rest).map(Uri::Data);
        }
        if let Some(scheme) = scheme(uri) {
            return Err(AssetError::UnsupportedScheme { scheme: scheme.to_string() });
        }
        let path = percent_decode(uri);
        if !stays_inside(&path) {
            return Err(AssetError::EscapingPath { path });
        }
        Ok(Uri::Relative(path))
    }
}

/// The parts of `data:<mime>;<encoding>,<payload>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DataUri<'a> {
    /// Media type and parameters, without the encoding.
    pub mime: &'a str,
    /// Empty when the header names none.
    pub encoding: &'a str,
    pub payload: &'a str,
}

impl<'a> DataUri<'a> {
    /// Split the text after `data:` once on the first comma.
    fn split(rest: &'a str) -> Result<Self> {
        let (header, payload) = rest.split_once(',').ok_or_else(|| AssetError::UnsupportedDataUri {
            reason: "missing ',' before the payload".to_string(),
        })?;
        let (mime, encoding) = header.rsplit_once(';').unwrap_or((header, ""));
        Ok(Self { mime, encoding, payload })
    }

    /// Decode the payload. Only base64 is accepted.
    pub fn decode(&self) -> Result<Vec<u8>> {
        if self.encoding != "base64" {
            return Err(AssetError::UnsupportedDataUri {
                reason: format!("encoding {:?} is not base64", self.encoding),
            });
        }
        Ok(STANDARD.decode(self.payload)?)
    }
}

/// The scheme of an absolute URI (RFC 3986 §3.1), if any.
fn scheme(uri: &str) -> Option<&str> {
    let (scheme, _) = uri.split_once(':')?;
    let mut chars = scheme.chars();
    let first = chars.next()?;
    let valid = first.is_ascii_alphabetic()
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
    valid.then_some(scheme)
}

/// Whether `path`, joined onto a directory, names something inside it.
fn stays_inside(path: &str) -> bool {
    let mut depth = 0usize;
    for component in Path::new(path).components() {
        match component {
            Component::Normal(_) => depth += 1,
            Component::CurDir => {}
            Component::ParentDir => match depth.checked_sub(1) {
                Some(up) => depth = up,
                None => return false,
            },
            Component::RootDir | Component::Prefix(_) => return false,
        }
    }
    true
}

/// Decode `%XX` escapes. Malformed escapes are kept as written.
pub fn percent_decode(input: &str) -> String {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            if let (Some(hi), Some(lo)) = (hex(bytes[i + 1]), hex(bytes[i + 2])) {
                out.push((hi << 4) | lo);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}

fn hex(byte: u8) -> Option<u8> {
    (byte as char).to_digit(16).map(|d| d as u8)
}
