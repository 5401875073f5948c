/// Immutable per-use configuration for a repository.
///
/// Built fluently before use; every builder step consumes the value and
/// returns a new one, so a configuration handed to a repository can never
/// change underneath it.
///
/// ```
/// use warden_core::repository::RepositoryConfig;
///
/// let config = RepositoryConfig::new()
///     .with(["author", "tags"])
///     .without_global_scopes();
///
/// assert_eq!(config.includes(), ["author", "tags"]);
/// assert!(config.bypasses_scoping());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepositoryConfig {
    includes: Vec<String>,
    bypass_scoping: bool,
}

impl RepositoryConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Relations to eagerly load on reads. Replaces any earlier list.
    pub fn with<I, S>(mut self, relations: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.includes = relations.into_iter().map(Into::into).collect();
        self
    }

    /// Skip default scoping and ownership checks on every read.
    pub fn without_global_scopes(mut self) -> Self {
        self.bypass_scoping = true;
        self
    }

    pub fn includes(&self) -> &[String] {
        &self.includes
    }

    pub fn has_includes(&self) -> bool {
        !self.includes.is_empty()
    }

    pub fn bypasses_scoping(&self) -> bool {
        self.bypass_scoping
    }
}
