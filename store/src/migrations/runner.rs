//! Revision graph and the runner that walks it.

use std::collections::{BTreeSet, HashMap};

use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use tracing::info_span;

use crate::error::MigrationError;
use crate::migrations::revision::{Revision, RevisionMetadata};
use crate::schema::schema_revision;

const CREATE_VERSION_TABLE: &str =
    "CREATE TABLE IF NOT EXISTS schema_revision (revision_id TEXT NOT NULL PRIMARY KEY)";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Upgrade,
    Downgrade,
}

/// Validated set of revisions in apply order.
///
/// The graph must have exactly one root and one head, every parent must be a
/// known revision and there must be no cycles. Revisions are linearised
/// parents-first; where branches are independent, declaration order decides.
pub struct RevisionGraph {
    revisions: Vec<Box<dyn Revision>>,
}

impl std::fmt::Debug for RevisionGraph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.ids()).finish()
    }
}

impl RevisionGraph {
    pub fn new(revisions: Vec<Box<dyn Revision>>) -> Result<Self, MigrationError> {
        let metas: Vec<RevisionMetadata> = revisions.iter().map(|r| r.metadata()).collect();
        let n = metas.len();

        if n == 0 {
            return Err(MigrationError::InvalidGraph("no revisions".to_string()));
        }

        let mut index: HashMap<&'static str, usize> = HashMap::with_capacity(n);
        for (i, meta) in metas.iter().enumerate() {
            if index.insert(meta.id, i).is_some() {
                return Err(MigrationError::InvalidGraph(format!(
                    "duplicate revision {}",
                    meta.id
                )));
            }
        }

        let mut indegree = vec![0usize; n];
        let mut children: Vec<Vec<usize>> = vec![Vec::new(); n];
        for (i, meta) in metas.iter().enumerate() {
            for parent in meta.parents {
                let p = *index.get(parent).ok_or_else(|| {
                    MigrationError::InvalidGraph(format!(
                        "revision {} has unknown parent {}",
                        meta.id, parent
                    ))
                })?;
                indegree[i] += 1;
                children[p].push(i);
            }
        }

        let roots: Vec<_> = metas.iter().filter(|m| m.parents.is_empty()).collect();
        if roots.len() != 1 {
            return Err(MigrationError::InvalidGraph(format!(
                "expected exactly one root revision, found {}",
                roots.len()
            )));
        }

        let heads: Vec<_> = (0..n)
            .filter(|&i| children[i].is_empty())
            .map(|i| metas[i].id)
            .collect();
        if heads.len() != 1 {
            return Err(MigrationError::InvalidGraph(format!(
                "expected exactly one head revision, found {}",
                heads.join(", ")
            )));
        }

        // Kahn's algorithm; the ready set is ordered by declaration index.
        let mut ready: BTreeSet<usize> = (0..n).filter(|&i| indegree[i] == 0).collect();
        let mut order = Vec::with_capacity(n);
        while let Some(i) = ready.pop_first() {
            order.push(i);
            for &child in &children[i] {
                indegree[child] -= 1;
                if indegree[child] == 0 {
                    ready.insert(child);
                }
            }
        }
        if order.len() != n {
            return Err(MigrationError::InvalidGraph(
                "revision graph contains a cycle".to_string(),
            ));
        }

        let mut slots: Vec<Option<Box<dyn Revision>>> = revisions.into_iter().map(Some).collect();
        let revisions = order.iter().filter_map(|&i| slots[i].take()).collect();

        Ok(Self { revisions })
    }

    /// The revision chain shipped with this crate.
    pub fn standard() -> Result<Self, MigrationError> {
        Self::new(crate::migrations::revisions::all())
    }

    /// Revision ids in apply order.
    pub fn ids(&self) -> Vec<&'static str> {
        self.revisions.iter().map(|r| r.metadata().id).collect()
    }

    pub fn history(&self) -> Vec<RevisionMetadata> {
        self.revisions.iter().map(|r| r.metadata()).collect()
    }

    pub fn head(&self) -> &'static str {
        // new() rejects empty graphs
        self.revisions
            .last()
            .map(|r| r.metadata().id)
            .unwrap_or_default()
    }

    fn position(&self, id: &str) -> Result<usize, MigrationError> {
        self.revisions
            .iter()
            .position(|r| r.metadata().id == id)
            .ok_or_else(|| MigrationError::UnknownRevision(id.to_string()))
    }

    /// Revision the database is at, or `None` for an empty (base) database.
    pub fn current(&self, conn: &mut SqliteConnection) -> Result<Option<&'static str>, MigrationError> {
        Ok(self
            .current_position(conn)?
            .map(|i| self.revisions[i].metadata().id))
    }

    fn current_position(&self, conn: &mut SqliteConnection) -> Result<Option<usize>, MigrationError> {
        conn.batch_execute(CREATE_VERSION_TABLE)?;

        let stored: Option<String> = schema_revision::table
            .select(schema_revision::revision_id)
            .first(conn)
            .optional()?;

        stored.map(|id| self.position(&id)).transpose()
    }

    /// Revisions not yet applied, in apply order.
    pub fn pending(&self, conn: &mut SqliteConnection) -> Result<Vec<RevisionMetadata>, MigrationError> {
        let start = self.current_position(conn)?.map_or(0, |i| i + 1);
        Ok(self.revisions[start..].iter().map(|r| r.metadata()).collect())
    }

    pub fn upgrade_head(&self, conn: &mut SqliteConnection) -> Result<Vec<&'static str>, MigrationError> {
        self.upgrade_to(conn, self.head())
    }

    /// Apply every revision after the current one up to and including `target`.
    /// Returns the ids applied.
    pub fn upgrade_to(
        &self,
        conn: &mut SqliteConnection,
        target: &str,
    ) -> Result<Vec<&'static str>, MigrationError> {
        let target_pos = self.position(target)?;
        let current = self.current_position(conn)?;

        if let Some(cur) = current {
            if cur > target_pos {
                return Err(MigrationError::InvalidTarget(format!(
                    "{} is behind the current revision {}; downgrade instead",
                    target,
                    self.revisions[cur].metadata().id
                )));
            }
        }

        let start = current.map_or(0, |i| i + 1);
        let mut applied = Vec::new();
        for revision in &self.revisions[start..=target_pos] {
            let id = revision.metadata().id;
            self.apply(conn, revision.as_ref(), Direction::Upgrade, Some(id))?;
            applied.push(id);
        }

        Ok(applied)
    }

    pub fn downgrade_base(&self, conn: &mut SqliteConnection) -> Result<Vec<&'static str>, MigrationError> {
        self.downgrade_to(conn, None)
    }

    /// Revert revisions, newest first, until `target` is the current revision.
    /// `None` reverts everything. Returns the ids reverted.
    ///
    /// Fails without touching the database if any revision in the range is
    /// irreversible.
    pub fn downgrade_to(
        &self,
        conn: &mut SqliteConnection,
        target: Option<&str>,
    ) -> Result<Vec<&'static str>, MigrationError> {
        let Some(cur) = self.current_position(conn)? else {
            return match target {
                None => Ok(Vec::new()),
                Some(t) => Err(MigrationError::InvalidTarget(format!(
                    "{t} is ahead of an empty database; upgrade instead"
                ))),
            };
        };

        // Index of the first revision to revert.
        let stop = match target {
            None => 0,
            Some(t) => {
                let pos = self.position(t)?;
                if pos > cur {
                    return Err(MigrationError::InvalidTarget(format!(
                        "{} is ahead of the current revision {}; upgrade instead",
                        t,
                        self.revisions[cur].metadata().id
                    )));
                }
                pos + 1
            }
        };

        // Newest first, so the error names the step the downgrade would hit.
        if let Some(blocking) = self.revisions[stop..=cur]
            .iter()
            .rev()
            .map(|r| r.metadata())
            .find(|m| !m.reversible)
        {
            return Err(MigrationError::Irreversible {
                revision: blocking.id,
            });
        }

        let mut reverted = Vec::new();
        for i in (stop..=cur).rev() {
            let previous = i.checked_sub(1).map(|p| self.revisions[p].metadata().id);
            let revision = self.revisions[i].as_ref();
            self.apply(conn, revision, Direction::Downgrade, previous)?;
            reverted.push(revision.metadata().id);
        }

        Ok(reverted)
    }

    /// Run one revision and record the resulting version in a single transaction.
    fn apply(
        &self,
        conn: &mut SqliteConnection,
        revision: &dyn Revision,
        direction: Direction,
        version_after: Option<&'static str>,
    ) -> Result<(), MigrationError> {
        let meta = revision.metadata();
        let _span = info_span!("migration", revision = meta.id, direction = ?direction).entered();

        conn.transaction::<_, MigrationError, _>(|conn| {
            match direction {
                Direction::Upgrade => revision.upgrade(conn)?,
                Direction::Downgrade => revision.downgrade(conn)?,
            }
            set_version(conn, version_after)?;
            Ok(())
        })
        .inspect_err(|e| {
            tracing::error!(revision = meta.id, error = %e, "migration step failed");
        })?;

        match direction {
            Direction::Upgrade => {
                tracing::info!(revision = meta.id, "Upgraded: {}", meta.description)
            }
            Direction::Downgrade => {
                tracing::info!(revision = meta.id, "Downgraded: {}", meta.description)
            }
        }

        Ok(())
    }
}

fn set_version(conn: &mut SqliteConnection, version: Option<&str>) -> QueryResult<()> {
    diesel::delete(schema_revision::table).execute(conn)?;
    if let Some(id) = version {
        diesel::insert_into(schema_revision::table)
            .values(schema_revision::revision_id.eq(id))
            .execute(conn)?;
    }
    Ok(())
}
