//! crates/logging/src/paths.rs
//! Process directory layout used to compute default sink locations.

use std::path::{Path, PathBuf};

/// Directory roles a process knows about.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PathKind {
    /// Installation home.
    Home,
    /// Configuration files.
    Config,
    /// Persistent data.
    Data,
    /// Log files.
    Logs,
}

/// Directory layout rooted at a home directory.
///
/// Unset roles derive from the home directory: config lives in the home
/// itself, data in `<home>/data` and logs in `<home>/logs`. Relative
/// overrides are interpreted relative to the home directory.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Paths {
    home: PathBuf,
    config: Option<PathBuf>,
    data: Option<PathBuf>,
    logs: Option<PathBuf>,
}

impl Paths {
    /// Creates a layout rooted at `home`.
    pub fn new(home: impl Into<PathBuf>) -> Self {
        Self {
            home: home.into(),
            config: None,
            data: None,
            logs: None,
        }
    }

    /// Layout rooted at the directory holding the running executable, or the
    /// current directory when that cannot be determined.
    #[must_use]
    pub fn from_executable() -> Self {
        let home = std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(Path::to_path_buf))
            .unwrap_or_else(|| PathBuf::from("."));
        Self::new(home)
    }

    /// Overrides the configuration directory.
    #[must_use]
    pub fn with_config(mut self, config: impl Into<PathBuf>) -> Self {
        self.config = Some(config.into());
        self
    }

    /// Overrides the data directory.
    #[must_use]
    pub fn with_data(mut self, data: impl Into<PathBuf>) -> Self {
        self.data = Some(data.into());
        self
    }

    /// Overrides the log directory.
    #[must_use]
    pub fn with_logs(mut self, logs: impl Into<PathBuf>) -> Self {
        self.logs = Some(logs.into());
        self
    }

    /// Returns the home directory.
    #[must_use]
    pub fn home(&self) -> &Path {
        &self.home
    }

    /// Resolves `sub` beneath the directory for `kind`.
    ///
    /// Absolute `sub` paths are returned unchanged; an empty `sub` yields the
    /// role's root directory.
    ///
    /// # Examples
    ///
    /// ```
    /// use logging::{PathKind, Paths};
    /// use std::path::Path;
    ///
    /// let paths = Paths::new("/opt/agent");
    /// assert_eq!(paths.resolve(PathKind::Logs, ""), Path::new("/opt/agent/logs"));
    /// assert_eq!(paths.resolve(PathKind::Config, "agent.json"), Path::new("/opt/agent/agent.json"));
    /// assert_eq!(paths.resolve(PathKind::Data, "/srv/state"), Path::new("/srv/state"));
    /// ```
    pub fn resolve(&self, kind: PathKind, sub: impl AsRef<Path>) -> PathBuf {
        let sub = sub.as_ref();
        if sub.is_absolute() {
            return sub.to_path_buf();
        }

        let root = self.root(kind);
        if sub.as_os_str().is_empty() {
            root
        } else {
            root.join(sub)
        }
    }

    fn root(&self, kind: PathKind) -> PathBuf {
        let (configured, fallback) = match kind {
            PathKind::Home => return self.home.clone(),
            PathKind::Config => (&self.config, None),
            PathKind::Data => (&self.data, Some("data")),
            PathKind::Logs => (&self.logs, Some("logs")),
        };

        match (configured, fallback) {
            (Some(dir), _) => self.home.join(dir),
            (None, Some(name)) => self.home.join(name),
            (None, None) => self.home.clone(),
        }
    }
}

impl Default for Paths {
    fn default() -> Self {
        Self::from_executable()
    }
}
