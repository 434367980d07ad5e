use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, PoisonError, RwLock};

use gosling_common::{Error, Result};
use tracing::info;

use crate::dialect::{
    Dialect, MySqlDialect, PostgresDialect, RedshiftDialect, Sqlite3Dialect, TiDbDialect,
};

/// The built-in backends and the names they are registered under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DialectKind {
    Postgres,
    MySql,
    Sqlite3,
    Redshift,
    TiDb,
}

impl DialectKind {
    pub const ALL: [DialectKind; 5] = [
        DialectKind::Postgres,
        DialectKind::MySql,
        DialectKind::Sqlite3,
        DialectKind::Redshift,
        DialectKind::TiDb,
    ];

    pub fn name(self) -> &'static str {
        match self {
            DialectKind::Postgres => "postgres",
            DialectKind::MySql => "mysql",
            DialectKind::Sqlite3 => "sqlite3",
            DialectKind::Redshift => "redshift",
            DialectKind::TiDb => "tidb",
        }
    }

    /// A fresh instance of this backend's dialect.
    pub fn dialect(self) -> Arc<dyn Dialect> {
        match self {
            DialectKind::Postgres => Arc::new(PostgresDialect),
            DialectKind::MySql => Arc::new(MySqlDialect),
            DialectKind::Sqlite3 => Arc::new(Sqlite3Dialect),
            DialectKind::Redshift => Arc::new(RedshiftDialect),
            DialectKind::TiDb => Arc::new(TiDbDialect),
        }
    }
}

impl fmt::Display for DialectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DialectKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        DialectKind::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| Error::UnknownDialect(s.to_string()))
    }
}

/// Maps backend names to pre-built dialect instances.
///
/// Lookups hand out clones of the same `Arc`, so repeated selection of one
/// name yields the same instance.
#[derive(Clone)]
pub struct DialectRegistry {
    dialects: HashMap<String, Arc<dyn Dialect>>,
}

impl DialectRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self {
            dialects: HashMap::new(),
        }
    }

    /// A registry holding every [`DialectKind`].
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        for kind in DialectKind::ALL {
            registry.register(kind.name(), kind.dialect());
        }
        registry
    }

    /// Add `dialect` under `name`, replacing any previous entry.
    pub fn register(&mut self, name: impl Into<String>, dialect: Arc<dyn Dialect>) {
        self.dialects.insert(name.into(), dialect);
    }

    pub fn lookup(&self, name: &str) -> Result<Arc<dyn Dialect>> {
        self.dialects
            .get(name)
            .cloned()
            .ok_or_else(|| Error::UnknownDialect(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.dialects.contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.dialects.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl Default for DialectRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

impl fmt::Debug for DialectRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DialectRegistry")
            .field("names", &self.names())
            .finish()
    }
}

/// The dialect a migration run is using.
///
/// Owned by the caller and shared through `Arc` where several tasks need
/// it. Writers swap the whole `Arc`, so readers see either the old or the
/// new dialect, never a mix.
pub struct ActiveDialect {
    registry: DialectRegistry,
    current: RwLock<Arc<dyn Dialect>>,
}

impl ActiveDialect {
    /// Built-in registry with Postgres active.
    pub fn new() -> Self {
        let registry = DialectRegistry::with_builtins();
        let initial = registry
            .lookup(DialectKind::Postgres.name())
            .unwrap_or_else(|_| DialectKind::Postgres.dialect());
        Self::with_registry(registry, initial)
    }

    pub fn with_registry(registry: DialectRegistry, initial: Arc<dyn Dialect>) -> Self {
        Self {
            registry,
            current: RwLock::new(initial),
        }
    }

    pub fn registry(&self) -> &DialectRegistry {
        &self.registry
    }

    /// The active dialect.
    pub fn get(&self) -> Arc<dyn Dialect> {
        // A writer can only panic between taking the lock and storing an
        // already-built Arc, so a poisoned value is still whole.
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Activate the dialect registered as `name`. An unknown name leaves the
    /// active dialect untouched.
    pub fn set(&self, name: &str) -> Result<()> {
        let dialect = self.registry.lookup(name)?;
        self.replace(dialect);
        info!(dialect = name, "active dialect changed");
        Ok(())
    }

    /// Activate `dialect` without any name check.
    pub fn set_custom(&self, dialect: Arc<dyn Dialect>) {
        info!(dialect = ?dialect, "custom dialect installed");
        self.replace(dialect);
    }

    fn replace(&self, dialect: Arc<dyn Dialect>) {
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = dialect;
    }
}

impl Default for ActiveDialect {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ActiveDialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActiveDialect")
            .field("current", &self.get())
            .field("registry", &self.registry)
            .finish()
    }
}
