use chrono::{DateTime, NaiveDateTime, SecondsFormat, SubsecRound, Utc};
use diesel::prelude::*;
use meal_planner_core::{Recipe, RecipeDraft, User};
use uuid::Uuid;

use crate::error::StoreError;

/// Current time at the precision timestamps are stored with.
pub fn current_timestamp() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

/// Format a timestamp the way the store writes it.
pub fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Parse a stored timestamp.
///
/// Accepts RFC 3339 (written by this crate) as well as the
/// `YYYY-MM-DD HH:MM:SS[.ffffff][+00:00]` forms produced by SQLite's
/// `CURRENT_TIMESTAMP` and by older writers. Values without an offset are UTC.
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();

    if let Ok(ts) = DateTime::parse_from_rfc3339(value) {
        return Some(ts.with_timezone(&Utc));
    }
    if let Ok(ts) = DateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S%.f%:z") {
        return Some(ts.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

fn bad_row(id: &str, reason: impl Into<String>) -> StoreError {
    StoreError::BadRow {
        id: id.to_string(),
        reason: reason.into(),
    }
}

fn decode_timestamp(id: &str, field: &str, value: &str) -> Result<DateTime<Utc>, StoreError> {
    parse_timestamp(value).ok_or_else(|| bad_row(id, format!("unparsable {field}: {value:?}")))
}

fn decode_lines(id: &str, field: &str, value: &str) -> Result<Vec<String>, StoreError> {
    serde_json::from_str(value).map_err(|e| bad_row(id, format!("invalid {field} JSON: {e}")))
}

#[derive(Queryable, Selectable, Debug)]
#[diesel(table_name = crate::schema::recipes)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct RecipeRow {
    pub id: String,
    pub name: String,
    pub ingredients: String,
    pub instructions: String,
    pub created_at: String,
    pub updated_at: String,
    pub makes_min: Option<i32>,
    pub makes_max: Option<i32>,
    pub makes_unit: Option<String>,
}

impl RecipeRow {
    pub fn into_recipe(self) -> Result<Recipe, StoreError> {
        let id = Uuid::parse_str(&self.id)
            .map_err(|e| bad_row(&self.id, format!("id is not a UUID: {e}")))?;

        Ok(Recipe {
            id,
            created_at: decode_timestamp(&self.id, "created_at", &self.created_at)?,
            updated_at: decode_timestamp(&self.id, "updated_at", &self.updated_at)?,
            content: RecipeDraft {
                ingredients: decode_lines(&self.id, "ingredients", &self.ingredients)?,
                instructions: decode_lines(&self.id, "instructions", &self.instructions)?,
                name: self.name,
                makes_min: self.makes_min,
                makes_max: self.makes_max,
                makes_unit: self.makes_unit,
            },
        })
    }
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::recipes)]
pub struct NewRecipe<'a> {
    pub id: String,
    pub name: &'a str,
    pub ingredients: String,
    pub instructions: String,
    pub created_at: String,
    pub updated_at: String,
    pub makes_min: Option<i32>,
    pub makes_max: Option<i32>,
    pub makes_unit: Option<&'a str>,
}

/// Content columns replaced on every save. Unset yield fields are written as
/// NULL rather than left untouched.
#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::recipes)]
#[diesel(treat_none_as_null = true)]
pub struct RecipeChanges<'a> {
    pub name: &'a str,
    pub ingredients: String,
    pub instructions: String,
    pub updated_at: String,
    pub makes_min: Option<i32>,
    pub makes_max: Option<i32>,
    pub makes_unit: Option<&'a str>,
}

#[derive(Queryable, Selectable, Debug)]
#[diesel(table_name = crate::schema::users)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct UserRow {
    pub id: String,
    pub username: String,
    pub created_at: String,
    pub updated_at: String,
}

impl UserRow {
    pub fn into_user(self) -> Result<User, StoreError> {
        let id = Uuid::parse_str(&self.id)
            .map_err(|e| bad_row(&self.id, format!("id is not a UUID: {e}")))?;

        Ok(User {
            id,
            created_at: decode_timestamp(&self.id, "created_at", &self.created_at)?,
            updated_at: decode_timestamp(&self.id, "updated_at", &self.updated_at)?,
            username: self.username,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_timestamp_round_trip() {
        let ts = Utc.with_ymd_and_hms(2025, 6, 22, 12, 0, 22).unwrap();
        assert_eq!(format_timestamp(ts), "2025-06-22T12:00:22.000000Z");
        assert_eq!(parse_timestamp(&format_timestamp(ts)), Some(ts));
    }

    #[test]
    fn test_current_timestamp_survives_storage() {
        let now = current_timestamp();
        assert_eq!(parse_timestamp(&format_timestamp(now)), Some(now));
    }

    #[test]
    fn test_parse_sqlite_timestamps() {
        let expected = Utc.with_ymd_and_hms(2025, 6, 5, 16, 2, 23).unwrap();
        assert_eq!(parse_timestamp("2025-06-05 16:02:23"), Some(expected));
        assert_eq!(parse_timestamp("2025-06-05 16:02:23+00:00"), Some(expected));
        assert_eq!(parse_timestamp("2025-06-05 18:02:23.000000+02:00"), Some(expected));
        assert_eq!(parse_timestamp("yesterday"), None);
    }

    #[test]
    fn test_recipe_row_decoding() {
        let row = RecipeRow {
            id: "92db039f-3d82-465a-a8a7-67f63aa8bf71".to_string(),
            name: "Toast".to_string(),
            ingredients: r#"["bread"]"#.to_string(),
            instructions: r#"["toast it"]"#.to_string(),
            created_at: "2025-06-05 16:02:23".to_string(),
            updated_at: "2025-06-05T16:02:23Z".to_string(),
            makes_min: Some(2),
            makes_max: None,
            makes_unit: Some("slices".to_string()),
        };
        let recipe = row.into_recipe().unwrap();
        assert_eq!(recipe.content.ingredients, vec!["bread"]);
        assert_eq!(recipe.content.makes_text(), Some("2+ slices".to_string()));
        assert_eq!(recipe.created_at, recipe.updated_at);
    }

    #[test]
    fn test_recipe_row_with_integer_id_is_rejected() {
        let row = RecipeRow {
            id: "17".to_string(),
            name: "Toast".to_string(),
            ingredients: "[]".to_string(),
            instructions: "[]".to_string(),
            created_at: "2025-06-05 16:02:23".to_string(),
            updated_at: "2025-06-05 16:02:23".to_string(),
            makes_min: None,
            makes_max: None,
            makes_unit: None,
        };
        assert!(matches!(row.into_recipe(), Err(StoreError::BadRow { .. })));
    }
}
