use diesel::prelude::*;
use meal_planner_core::User;
use uuid::Uuid;

use crate::error::StoreError;
use crate::models::UserRow;
use crate::schema::users;

pub fn get_user(conn: &mut SqliteConnection, id: Uuid) -> Result<User, StoreError> {
    users::table
        .find(id.to_string())
        .select(UserRow::as_select())
        .first(conn)
        .optional()?
        .ok_or_else(|| StoreError::UserNotFound(id.to_string()))?
        .into_user()
}

pub fn get_user_by_username(conn: &mut SqliteConnection, username: &str) -> Result<User, StoreError> {
    users::table
        .filter(users::username.eq(username))
        .select(UserRow::as_select())
        .first(conn)
        .optional()?
        .ok_or_else(|| StoreError::UserNotFound(username.to_string()))?
        .into_user()
}
