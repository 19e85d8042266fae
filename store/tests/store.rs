//! Store operations against a file-backed pool.

use meal_planner_core::RecipeDraft;
use meal_planner_store::{
    create_pool, create_recipe, establish_existing, find_incomplete_recipes, get_recipe,
    get_user_by_username, list_recipes, update_recipe, StoreConfig,
};

#[test]
fn test_pool_round_trip_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let config = StoreConfig::new(dir.path().join("meal_planner.db"));
    let pool = create_pool(&config).unwrap();

    let draft = RecipeDraft::new(
        "Pancakes",
        vec!["1 cup flour".into(), "1 egg".into()],
        vec!["Mix.".into(), "Fry.".into()],
    )
    .with_makes(Some(8), Some(10), Some("pancakes"));

    let created = {
        let mut conn = pool.get().unwrap();
        create_recipe(&mut conn, &draft).unwrap()
    };

    // A fresh connection sees the same data.
    let mut conn = establish_existing(&config).unwrap();
    let fetched = get_recipe(&mut conn, created.id).unwrap();
    assert_eq!(fetched, created);
    assert_eq!(
        fetched.content.makes_label(),
        Some("Makes: 8-10 pancakes".to_string())
    );

    let mut edited = draft.clone();
    edited.ingredients.push("1 cup milk".into());
    let updated = update_recipe(&mut conn, created.id, &edited).unwrap();
    assert_eq!(updated.created_at, created.created_at);

    assert_eq!(list_recipes(&mut conn).unwrap().len(), 1);
    assert!(find_incomplete_recipes(&mut conn).unwrap().is_empty());
    assert_eq!(
        get_user_by_username(&mut conn, "demo_user").unwrap().username,
        "demo_user"
    );
}

#[test]
fn test_reopening_pool_does_not_rerun_migrations() {
    let dir = tempfile::tempdir().unwrap();
    let config = StoreConfig::new(dir.path().join("meal_planner.db"));

    {
        let pool = create_pool(&config).unwrap();
        let mut conn = pool.get().unwrap();
        create_recipe(
            &mut conn,
            &RecipeDraft::new("Tea", vec!["tea".into()], vec!["Steep.".into()]),
        )
        .unwrap();
    }

    let pool = create_pool(&config).unwrap();
    let mut conn = pool.get().unwrap();
    assert_eq!(list_recipes(&mut conn).unwrap().len(), 1);
}
