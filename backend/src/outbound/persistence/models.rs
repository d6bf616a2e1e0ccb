//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. Conversions back into domain types return
//! `Result<_, String>` so adapters can fold them into their query error.

use chrono::{DateTime, Utc};
use diesel::prelude::*;

use crate::domain::{
    Amount, Comment, CommentId, CookingTime, Email, Ingredient, IngredientId, MediaUrl,
    PersonName, RecipeId, RelationId, Tag, TagId, User, UserId, Username,
};

use super::schema::{
    comments, follows, ingredients, recipe_ingredients, recipe_tags, recipes, tags, users,
};

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: i64,
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub avatar: Option<String>,
    pub bio: Option<String>,
    pub date_joined: DateTime<Utc>,
}

/// User row together with the password digest column.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct CredentialsRow {
    #[diesel(embed)]
    pub user: UserRow,
    pub password: String,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub email: &'a str,
    pub username: &'a str,
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub password: &'a str,
    pub avatar: Option<&'a str>,
    pub bio: Option<&'a str>,
    pub date_joined: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = String;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let context = |field: &str| format!("stored user {} has invalid {field}", row.id);
        Ok(Self {
            id: UserId::new(row.id).map_err(|err| err.to_string())?,
            email: Email::new(&row.email).map_err(|_| context("email"))?,
            // Lookup shape only; stored names predate any reserved-name rule.
            username: Username::parse(&row.username).map_err(|_| context("username"))?,
            first_name: PersonName::first(&row.first_name).map_err(|_| context("first_name"))?,
            last_name: PersonName::last(&row.last_name).map_err(|_| context("last_name"))?,
            avatar: row.avatar.map(MediaUrl::new),
            bio: row.bio,
            date_joined: row.date_joined,
        })
    }
}

// ---------------------------------------------------------------------------
// Reference data
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = tags)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct TagRow {
    pub id: i64,
    pub name: String,
    pub slug: String,
}

impl TryFrom<TagRow> for Tag {
    type Error = String;

    fn try_from(row: TagRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: TagId::new(row.id).map_err(|err| err.to_string())?,
            name: row.name,
            slug: row.slug,
        })
    }
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = ingredients)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct IngredientRow {
    pub id: i64,
    pub name: String,
    pub measurement_unit: String,
}

impl TryFrom<IngredientRow> for Ingredient {
    type Error = String;

    fn try_from(row: IngredientRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: IngredientId::new(row.id).map_err(|err| err.to_string())?,
            name: row.name,
            measurement_unit: row.measurement_unit,
        })
    }
}

// ---------------------------------------------------------------------------
// Recipes
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = recipes)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct RecipeRow {
    pub id: i64,
    pub author_id: i64,
    pub name: String,
    pub text: String,
    pub cooking_time: i32,
    pub image: Option<String>,
    pub published_at: DateTime<Utc>,
}

impl RecipeRow {
    pub(crate) fn cooking_time(&self) -> Result<CookingTime, String> {
        CookingTime::new(i64::from(self.cooking_time)).map_err(|err| err.to_string())
    }
}

#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = recipes)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct RecipeChangeset<'a> {
    pub author_id: i64,
    pub name: &'a str,
    pub text: &'a str,
    pub cooking_time: i32,
    pub image: Option<&'a str>,
    pub published_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Insertable)]
#[diesel(table_name = recipe_tags)]
pub(crate) struct RecipeTagRow {
    pub recipe_id: i64,
    pub tag_id: i64,
}

#[derive(Debug, Clone, Copy, Insertable)]
#[diesel(table_name = recipe_ingredients)]
pub(crate) struct NewRecipeIngredientRow {
    pub recipe_id: i64,
    pub ingredient_id: i64,
    pub amount: i32,
}

/// Validate a stored ingredient amount.
pub(crate) fn stored_amount(ingredient: IngredientId, raw: i32) -> Result<Amount, String> {
    Amount::new(ingredient, i64::from(raw)).map_err(|err| err.to_string())
}

// ---------------------------------------------------------------------------
// Comments
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = comments)]
pub(crate) struct NewCommentRow<'a> {
    pub recipe_id: i64,
    pub author_id: i64,
    pub text: &'a str,
    pub pub_date: DateTime<Utc>,
}

/// Comment joined with its author's username.
#[derive(Debug, Clone, Queryable)]
pub(crate) struct CommentJoinRow {
    pub id: i64,
    pub recipe_id: i64,
    pub text: String,
    pub pub_date: DateTime<Utc>,
    pub author: String,
}

impl TryFrom<CommentJoinRow> for Comment {
    type Error = String;

    fn try_from(row: CommentJoinRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: CommentId::new(row.id).map_err(|err| err.to_string())?,
            recipe: RecipeId::new(row.recipe_id).map_err(|err| err.to_string())?,
            author: Username::parse(&row.author).map_err(|err| err.to_string())?,
            text: row.text,
            pub_date: row.pub_date,
        })
    }
}

// ---------------------------------------------------------------------------
// Relations
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Insertable)]
#[diesel(table_name = follows)]
pub(crate) struct NewFollowRow {
    pub user_id: i64,
    pub author_id: i64,
}

pub(crate) fn relation_id(raw: i64) -> Result<RelationId, String> {
    RelationId::new(raw).map_err(|err| err.to_string())
}

#[cfg(test)]
mod tests {
    //! Row-to-domain conversion coverage.
    use super::*;
    use chrono::TimeZone;
    use rstest::rstest;

    fn user_row(username: &str) -> UserRow {
        UserRow {
            id: 3,
            email: "ada@example.com".to_owned(),
            username: username.to_owned(),
            first_name: "Ada".to_owned(),
            last_name: "Lovelace".to_owned(),
            avatar: Some("/media/avatars/ab.png".to_owned()),
            bio: None,
            date_joined: Utc
                .with_ymd_and_hms(2026, 1, 2, 3, 4, 5)
                .single()
                .expect("valid timestamp"),
        }
    }

    #[rstest]
    fn user_rows_convert_to_domain_users() {
        let user = User::try_from(user_row("ada")).expect("valid row");

        assert_eq!(user.username.as_ref(), "ada");
        assert_eq!(user.avatar.as_ref().map(AsRef::as_ref), Some("/media/avatars/ab.png"));
    }

    #[rstest]
    fn corrupt_rows_name_the_offending_column() {
        let mut row = user_row("ada");
        row.email = "not-an-email".to_owned();

        let err = User::try_from(row).expect_err("invalid email");

        assert!(err.contains("email"), "unexpected message: {err}");
    }

    #[rstest]
    #[case(0)]
    #[case(-4)]
    fn non_positive_keys_are_rejected(#[case] id: i64) {
        let row = TagRow {
            id,
            name: "Lunch".to_owned(),
            slug: "lunch".to_owned(),
        };

        assert!(Tag::try_from(row).is_err());
    }
}
