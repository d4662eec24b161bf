//! URI parsing for backend routing.
//!
//! A VFS URI is `scheme://path`, e.g. `file:///tmp/data` or `mem://b/d/f`.
//! Paths without a scheme resolve to the `file` backend, so plain filesystem
//! paths work unprefixed.

use std::fmt;

use crate::error::{Result, VfsError};

/// A parsed VFS URI: the backend scheme plus the backend-interpreted path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Uri {
    scheme: String,
    path: String,
}

impl Uri {
    /// Parse a URI string into scheme and path.
    ///
    /// `mem://a/b` → (`mem`, `/a/b`); `/tmp/x` → (`file`, `/tmp/x`).
    /// The path always carries a leading `/`.
    pub fn parse(uri: &str) -> Result<Self> {
        if uri.is_empty() {
            return Err(VfsError::InvalidUri {
                uri: uri.to_string(),
                reason: "empty URI",
            });
        }

        let (scheme, rest) = match uri.split_once("://") {
            Some((scheme, rest)) => {
                if scheme.is_empty() {
                    return Err(VfsError::InvalidUri {
                        uri: uri.to_string(),
                        reason: "empty scheme",
                    });
                }
                (scheme.to_string(), rest)
            }
            None => ("file".to_string(), uri),
        };

        let path = if rest.starts_with('/') {
            rest.to_string()
        } else {
            format!("/{rest}")
        };

        Ok(Self { scheme, path })
    }

    /// The backend scheme, e.g. `file` or `mem`.
    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    /// The backend-side path (always with a leading `/`).
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Rebuild a full URI string from this URI's scheme and a backend path.
    ///
    /// Used by `ls` to turn backend child paths into child URIs.
    pub fn sibling(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}://{path}", self.scheme)
        } else {
            format!("{}:///{path}", self.scheme)
        }
    }
}

impl fmt::Display for Uri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}://{}", self.scheme, self.path)
    }
}
