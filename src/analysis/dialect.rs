//! Dialect selection from project capabilities

use std::fmt;

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::parsers::GrammarId;

/// A dependency family a project may declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Capability {
    HibernateRuntime,
    MySqlDriver,
    PostgreSqlDriver,
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Capability::HibernateRuntime => "hibernate runtime",
            Capability::MySqlDriver => "MySQL driver",
            Capability::PostgreSqlDriver => "PostgreSQL driver",
        })
    }
}

/// Read-only project facts.
pub trait ProjectCapabilities: Send + Sync {
    fn has_capability(&self, capability: Capability) -> bool;
}

/// Capabilities derived from the artifact names on a project's classpath.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArtifactCapabilities {
    found: FxHashSet<Capability>,
}

impl ArtifactCapabilities {
    pub fn from_artifacts<I, S>(artifacts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut found = FxHashSet::default();
        for artifact in artifacts {
            let name = artifact.as_ref();
            if name.starts_with("hibernate-core") {
                found.insert(Capability::HibernateRuntime);
            }
            if name.starts_with("mysql-connector") || name.starts_with("mariadb-java-client") {
                found.insert(Capability::MySqlDriver);
            }
            if name.starts_with("postgresql") || name.starts_with("r2dbc-postgresql") {
                found.insert(Capability::PostgreSqlDriver);
            }
        }
        Self { found }
    }

    pub fn with(mut self, capability: Capability) -> Self {
        self.found.insert(capability);
        self
    }
}

impl ProjectCapabilities for ArtifactCapabilities {
    fn has_capability(&self, capability: Capability) -> bool {
        self.found.contains(&capability)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialectChoice {
    pub grammar: GrammarId,
    /// Capabilities that decided the choice; empty for the JPQL fallback.
    pub reason: Vec<Capability>,
}

impl DialectChoice {
    fn new(grammar: GrammarId, reason: &[Capability]) -> Self {
        Self { grammar, reason: reason.to_vec() }
    }
}

/// Picks the grammar for one query site. First match wins:
///
/// | native | capability         | grammar    |
/// |--------|--------------------|------------|
/// | yes    | MySQL driver       | MySQL      |
/// | yes    | PostgreSQL driver  | PostgreSQL |
/// | yes    | neither            | none       |
/// | no     | Hibernate runtime  | HQL        |
/// | no     | anything else      | JPQL       |
///
/// A native query with no known driver is not analysed at all.
pub fn select_dialect(project: &dyn ProjectCapabilities, is_native: bool) -> Option<DialectChoice> {
    if is_native {
        if project.has_capability(Capability::MySqlDriver) {
            return Some(DialectChoice::new(GrammarId::MySql, &[Capability::MySqlDriver]));
        }
        if project.has_capability(Capability::PostgreSqlDriver) {
            return Some(DialectChoice::new(GrammarId::PostgreSql, &[Capability::PostgreSqlDriver]));
        }
        return None;
    }
    if project.has_capability(Capability::HibernateRuntime) {
        return Some(DialectChoice::new(GrammarId::Hql, &[Capability::HibernateRuntime]));
    }
    Some(DialectChoice::new(GrammarId::Jpql, &[]))
}
