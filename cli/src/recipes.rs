use anyhow::{bail, Result};
use meal_planner_store::{
    delete_all_recipes, establish_existing, find_incomplete_recipes, inspect_recipes,
    list_recipes, RevisionGraph, StoreConfig,
};

pub fn show(config: &StoreConfig) -> Result<()> {
    let mut conn = establish_existing(config)?;
    let rows = inspect_recipes(&mut conn)?;

    println!("Found {} rows:", rows.len());
    for row in rows {
        println!("{row:?}");
    }
    Ok(())
}

pub fn list(config: &StoreConfig) -> Result<()> {
    let mut conn = establish_existing(config)?;

    let graph = RevisionGraph::standard()?;
    let pending = graph.pending(&mut conn)?;
    if !pending.is_empty() {
        bail!(
            "database has {} pending migrations; run `meal-planner migrate up` first",
            pending.len()
        );
    }

    for recipe in list_recipes(&mut conn)? {
        match recipe.content.makes_label() {
            Some(label) => println!("{}  {} ({label})", recipe.id, recipe.content.name),
            None => println!("{}  {}", recipe.id, recipe.content.name),
        }
    }
    Ok(())
}

pub fn check(config: &StoreConfig) -> Result<()> {
    let mut conn = establish_existing(config)?;
    let issues = find_incomplete_recipes(&mut conn)?;

    for issue in &issues {
        let problems: Vec<String> = issue.problems.iter().map(ToString::to_string).collect();
        println!(
            "{} ({}): {}",
            issue.id,
            issue.name.as_deref().unwrap_or("<no name>"),
            problems.join("; ")
        );
    }
    println!("{} recipes need attention", issues.len());
    Ok(())
}

pub fn delete_all(config: &StoreConfig, confirmed: bool) -> Result<()> {
    if !confirmed {
        bail!("refusing to delete all recipes without --yes");
    }
    let mut conn = establish_existing(config)?;
    let deleted = delete_all_recipes(&mut conn)?;
    println!("Deleted {deleted} rows from recipes table.");
    Ok(())
}
