use anyhow::{Context, Result};
use meal_planner_store::{establish, establish_existing, RevisionGraph, StoreConfig};

pub fn up(config: &StoreConfig, target: Option<&str>) -> Result<()> {
    let graph = RevisionGraph::standard()?;
    let mut conn = establish(config)?;

    let applied = match target {
        Some(target) => graph.upgrade_to(&mut conn, target),
        None => graph.upgrade_head(&mut conn),
    }
    .context("Upgrade failed")?;

    if applied.is_empty() {
        println!("Already up to date");
    }
    for id in applied {
        println!("Applied {id}");
    }
    Ok(())
}

/// Downgrade to `target`, or to an empty database when `None`.
pub fn down(config: &StoreConfig, target: Option<&str>) -> Result<()> {
    let graph = RevisionGraph::standard()?;
    let mut conn = establish(config)?;

    let reverted = graph
        .downgrade_to(&mut conn, target)
        .context("Downgrade failed")?;

    if reverted.is_empty() {
        println!("Nothing to downgrade");
    }
    for id in reverted {
        println!("Reverted {id}");
    }
    Ok(())
}

pub fn current(config: &StoreConfig) -> Result<()> {
    let graph = RevisionGraph::standard()?;
    let mut conn = establish_existing(config)?;

    match graph.current(&mut conn)? {
        Some(id) if id == graph.head() => println!("{id} (head)"),
        Some(id) => println!("{id}"),
        None => println!("<base>"),
    }
    Ok(())
}

pub fn history(config: &StoreConfig) -> Result<()> {
    let graph = RevisionGraph::standard()?;
    let mut conn = establish_existing(config)?;
    let current = graph.current(&mut conn)?;

    for meta in graph.history() {
        let marker = if Some(meta.id) == current { "*" } else { " " };
        let irreversible = if meta.reversible { "" } else { " [irreversible]" };
        println!(
            "{marker} {} <- {}: {}{irreversible}",
            meta.id,
            if meta.parents.is_empty() {
                "<base>".to_string()
            } else {
                meta.parents.join(", ")
            },
            meta.description
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_only_commands_leave_missing_database_alone() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.db");
        let config = StoreConfig::new(&path);

        assert!(current(&config).is_err());
        assert!(history(&config).is_err());
        assert!(!path.exists());
    }

    #[test]
    fn test_current_after_upgrade() {
        let dir = tempfile::tempdir().unwrap();
        let config = StoreConfig::new(dir.path().join("meals.db"));

        up(&config, None).unwrap();
        assert!(current(&config).is_ok());
        assert!(history(&config).is_ok());
    }
}
