use std::{
    fmt,
    path::{Path, PathBuf},
};

use crate::error::{Error, Result};

/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "WANDERLIST_DATA_DIR";

const CATALOG_FILE: &str = "catalog.redb";

/// Where the data directory location came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    Flag,
    Env,
    Xdg,
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Origin::Flag => "--data-dir",
            Origin::Env => DATA_DIR_ENV,
            Origin::Xdg => "xdg",
        })
    }
}

/// The directory holding the catalog database.
#[derive(Debug, Clone)]
pub struct DataDir {
    root: PathBuf,
    origin: Origin,
}

impl DataDir {
    /// Resolve and create the data directory.
    ///
    /// `--data-dir` wins over `WANDERLIST_DATA_DIR`, which wins over the XDG
    /// data home (`~/.local/share/wanderlist/`).
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        let env = std::env::var_os(DATA_DIR_ENV).map(PathBuf::from);
        Self::resolve_from(explicit, env)
    }

    /// Like [`DataDir::resolve`], with the environment value passed in.
    pub fn resolve_from(
        explicit: Option<&Path>,
        env: Option<PathBuf>,
    ) -> Result<Self> {
        let (root, origin) = match (explicit, env) {
            (Some(path), _) => (path.to_path_buf(), Origin::Flag),
            (None, Some(path)) if !path.as_os_str().is_empty() => {
                (path, Origin::Env)
            }
            _ => (xdg_data_home()?, Origin::Xdg),
        };

        std::fs::create_dir_all(&root)
            .map_err(|_| Error::DataDir(root.clone()))?;
        tracing::debug!(root = %root.display(), %origin, "using data directory");

        Ok(Self { root, origin })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn origin(&self) -> Origin {
        self.origin
    }

    pub fn catalog_db(&self) -> PathBuf {
        self.root.join(CATALOG_FILE)
    }
}

fn xdg_data_home() -> Result<PathBuf> {
    xdg::BaseDirectories::with_prefix("wanderlist")
        .get_data_home()
        .ok_or_else(|| {
            Error::Config("could not determine XDG data home directory".into())
        })
}
