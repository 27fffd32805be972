use std::path::PathBuf;

use url::Url;

/// Decides which locations a data transfer must not upload.
pub trait LocationFilter: Send + Sync {
    fn excludes(&self, uri: &Url) -> bool;
}

/// Excludes nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoExclusion;

impl LocationFilter for NoExclusion {
    fn excludes(&self, _uri: &Url) -> bool {
        false
    }
}

/// Excludes `file://` locations under any of the workspace roots.
#[derive(Debug, Default, Clone)]
pub struct WorkspaceExclusion {
    roots: Vec<PathBuf>,
}

impl WorkspaceExclusion {
    pub fn new(roots: impl IntoIterator<Item = PathBuf>) -> Self {
        Self {
            roots: roots.into_iter().collect(),
        }
    }
}

impl LocationFilter for WorkspaceExclusion {
    fn excludes(&self, uri: &Url) -> bool {
        if uri.scheme() != "file" {
            return false;
        }
        match uri.to_file_path() {
            Ok(path) => self.roots.iter().any(|root| path.starts_with(root)),
            Err(()) => false,
        }
    }
}

impl<F> LocationFilter for F
where
    F: Fn(&Url) -> bool + Send + Sync,
{
    fn excludes(&self, uri: &Url) -> bool {
        self(uri)
    }
}
