use super::schema::*;
use chrono::{DateTime, offset::Utc};
use serde::Serialize;

#[derive(Insertable)]
#[table_name="users"]
pub struct NewUser<'a> {
    pub name: &'a str,
    pub email: &'a str,
}

#[derive(Identifiable, Clone, Queryable, Debug, Serialize)]
pub struct User {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub joined: DateTime<Utc>,
}

// actually, the relationship is one-to-1..0
#[derive(Identifiable, Queryable, Debug, Insertable, Associations, AsChangeset)]
#[belongs_to(User, foreign_key = "id")]
#[table_name="passwords"]
pub struct Password {
    pub id: i32,
    pub password_hash: Vec<u8>,
    pub salt: Vec<u8>,
    pub initial_rounds: i16,
    pub extra_rounds: i16,
}

#[derive(Insertable, Debug)]
#[table_name="cards"]
pub struct NewCard<'a> {
    pub user_id: i32,
    pub word: &'a str,
    pub translation: &'a str,
    pub example: Option<&'a str>,
    pub level: i32,
    pub next_repeat: DateTime<Utc>,
}

#[derive(Identifiable, Clone, Queryable, Debug, Associations, Serialize, PartialEq)]
#[belongs_to(User, foreign_key = "user_id")]
#[table_name="cards"]
pub struct Card {
    pub id: i32,
    #[serde(skip)]
    pub user_id: i32,
    pub word: String,
    pub translation: String,
    pub example: Option<String>,
    pub level: i32,
    pub next_repeat: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

#[derive(AsChangeset, Debug)]
#[table_name="cards"]
#[changeset_options(treat_none_as_null = "true")]
pub struct UpdateCard<'a> {
    pub word: &'a str,
    pub translation: &'a str,
    pub example: Option<&'a str>,
}

/// The subset of the user's data that's safe to hand out to the browser.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct UserInfo {
    pub id: i32,
    pub name: String,
    pub email: String,
}

impl From<User> for UserInfo {
    fn from(user: User) -> Self {
        UserInfo {
            id: user.id,
            name: user.name,
            email: user.email,
        }
    }
}
