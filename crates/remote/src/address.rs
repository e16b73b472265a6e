//! Layout page addresses.
//!
//! The configurator's own web UI links to layouts as
//! `https://configure.zsa.io/<geometry>/layouts/<layout>/<revision>/...`.
//! Only the positions matter; nothing here checks that an identifier looks
//! like a hash.

use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use reqwest::Url;
use std::fmt;
use std::str::FromStr;

/// Identifiers decoded from a configuration page address.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct LayoutAddress {
    /// Keyboard shape family, e.g. `ErgoDox` or `voyager`.
    pub geometry: String,
    /// Layout hash identifier.
    pub layout: String,
    /// Revision hash identifier (may also be the literal `latest`).
    pub revision: String,
}

impl LayoutAddress {
    /// Decode a configuration page address.
    ///
    /// After trimming the leading slash, the path must have at least four
    /// non-empty segments: `0` is the geometry, `2` the layout and `3` the
    /// revision. Segment `1` (normally `layouts`) and anything past segment
    /// `3` is ignored.
    pub fn parse(address: &str) -> Result<Self> {
        let invalid = || ErrorKind::InvalidAddress(address.to_string());
        let url = Url::parse(address).or_raise(invalid)?;
        let segments: Vec<&str> = url.path().trim_start_matches('/').split('/').collect();
        let [geometry, kind, layout, revision, ..] = segments.as_slice() else {
            exn::bail!(invalid());
        };
        if [geometry, kind, layout, revision].iter().any(|segment| segment.is_empty()) {
            exn::bail!(invalid());
        }
        Ok(Self {
            geometry: geometry.to_string(),
            layout: layout.to_string(),
            revision: revision.to_string(),
        })
    }
}

impl FromStr for LayoutAddress {
    type Err = crate::error::Error;
    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for LayoutAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}@{}", self.geometry, self.layout, self.revision)
    }
}
