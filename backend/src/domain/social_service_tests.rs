//! Tests for the social service.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{TimeZone, Utc};
use rstest::rstest;

use super::*;
use crate::domain::ports::{
    MockFollowRepository, MockRecipeListRepository, MockRecipeRepository, MockUserRepository,
};
use crate::domain::{Email, ErrorCode, PersonName, RelationId};

type Service = SocialService<
    MockUserRepository,
    MockFollowRepository,
    MockRecipeRepository,
    MockRecipeListRepository,
>;

fn user_id(raw: i64) -> UserId {
    UserId::new(raw).expect("valid user id")
}

fn recipe_id(raw: i64) -> RecipeId {
    RecipeId::new(raw).expect("valid recipe id")
}

fn username(raw: &str) -> Username {
    Username::new(raw).expect("valid username")
}

fn user(id: i64, name: &str) -> User {
    User {
        id: user_id(id),
        email: Email::new(format!("{name}@example.com")).expect("valid email"),
        username: username(name),
        first_name: PersonName::first("First").expect("valid name"),
        last_name: PersonName::last("Last").expect("valid name"),
        avatar: None,
        bio: None,
        date_joined: Utc
            .with_ymd_and_hms(2026, 1, 1, 0, 0, 0)
            .single()
            .expect("valid timestamp"),
    }
}

#[derive(Default)]
struct Mocks {
    users: MockUserRepository,
    follows: MockFollowRepository,
    recipes: MockRecipeRepository,
    lists: MockRecipeListRepository,
}

impl Mocks {
    fn build(self) -> Service {
        SocialService::new(
            Arc::new(self.users),
            Arc::new(self.follows),
            Arc::new(self.recipes),
            Arc::new(self.lists),
        )
    }
}

#[rstest]
#[tokio::test]
async fn following_yourself_is_rejected() {
    let mut mocks = Mocks::default();
    mocks
        .users
        .expect_find_by_username()
        .return_once(|_| Ok(Some(user(1, "anna"))));
    mocks.follows.expect_create().never();
    let service = mocks.build();

    let err = service
        .follow(user_id(1), &username("anna"))
        .await
        .expect_err("self-follow rejected");

    assert_eq!(err.code(), ErrorCode::InvalidRequest);
    assert_eq!(err.field(), Some("author"));
}

#[rstest]
#[tokio::test]
async fn second_identical_follow_is_a_duplicate() {
    let mut mocks = Mocks::default();
    mocks
        .users
        .expect_find_by_username()
        .return_once(|_| Ok(Some(user(2, "ben"))));
    mocks.follows.expect_exists().return_once(|_, _| Ok(true));
    let service = mocks.build();

    let err = service
        .follow(user_id(1), &username("ben"))
        .await
        .expect_err("duplicate rejected");

    assert_eq!(err.code(), ErrorCode::Conflict);
    assert_eq!(err.message(), "subscription must be unique");
}

#[rstest]
#[tokio::test]
async fn follow_race_maps_unique_violation_to_conflict() {
    let mut mocks = Mocks::default();
    mocks
        .users
        .expect_find_by_username()
        .return_once(|_| Ok(Some(user(2, "ben"))));
    mocks.follows.expect_exists().return_once(|_, _| Ok(false));
    mocks
        .follows
        .expect_create()
        .return_once(|_, _| Err(FollowRepositoryError::duplicate()));
    let service = mocks.build();

    let err = service
        .follow(user_id(1), &username("ben"))
        .await
        .expect_err("duplicate rejected");

    assert_eq!(err.code(), ErrorCode::Conflict);
}

#[rstest]
#[tokio::test]
async fn follow_of_unknown_author_is_not_found() {
    let mut mocks = Mocks::default();
    mocks
        .users
        .expect_find_by_username()
        .return_once(|_| Ok(None));
    let service = mocks.build();

    let err = service
        .follow(user_id(1), &username("ghost"))
        .await
        .expect_err("unknown author");

    assert_eq!(err.code(), ErrorCode::NotFound);
    assert_eq!(err.field(), Some("author"));
}

#[rstest]
#[tokio::test]
async fn follow_creates_subscription() {
    let mut mocks = Mocks::default();
    mocks
        .users
        .expect_find_by_username()
        .return_once(|_| Ok(Some(user(2, "ben"))));
    mocks.follows.expect_exists().return_once(|_, _| Ok(false));
    mocks
        .follows
        .expect_create()
        .withf(|follower, author| *follower == user_id(1) && *author == user_id(2))
        .return_once(|_, _| {
            Ok(Follow {
                id: RelationId::new(5).expect("valid id"),
                user: username("anna"),
                author: username("ben"),
            })
        });
    let service = mocks.build();

    let follow = service
        .follow(user_id(1), &username("ben"))
        .await
        .expect("follow created");

    assert_eq!(follow.author, username("ben"));
}

#[rstest]
#[tokio::test]
async fn favoriting_your_own_recipe_is_rejected() {
    let mut mocks = Mocks::default();
    mocks
        .recipes
        .expect_author_of()
        .return_once(|_| Ok(Some(user_id(1))));
    mocks.lists.expect_add().never();
    let service = mocks.build();

    let err = service
        .add_to_list(RecipeListKind::Favorites, user_id(1), recipe_id(10))
        .await
        .expect_err("self-favorite rejected");

    assert_eq!(err.code(), ErrorCode::InvalidRequest);
    assert_eq!(err.field(), Some("recipe"));
}

#[rstest]
#[tokio::test]
async fn carting_your_own_recipe_is_accepted() {
    let mut mocks = Mocks::default();
    mocks
        .recipes
        .expect_author_of()
        .return_once(|_| Ok(Some(user_id(1))));
    mocks
        .lists
        .expect_recipes_among()
        .return_once(|_, _, _| Ok(HashSet::new()));
    mocks
        .lists
        .expect_add()
        .times(1)
        .return_once(|kind, _, recipe| {
            Ok(RecipeListEntry {
                id: RelationId::new(1).expect("valid id"),
                kind,
                user: username("anna"),
                recipe,
            })
        });
    let service = mocks.build();

    let entry = service
        .add_to_list(RecipeListKind::ShoppingCart, user_id(1), recipe_id(10))
        .await
        .expect("own recipe may be carted");

    assert_eq!(entry.recipe, recipe_id(10));
}

#[rstest]
#[case(RecipeListKind::Favorites, "recipe")]
#[case(RecipeListKind::ShoppingCart, "purchase")]
#[tokio::test]
async fn listing_twice_is_a_duplicate(#[case] kind: RecipeListKind, #[case] field: &str) {
    let mut mocks = Mocks::default();
    mocks
        .recipes
        .expect_author_of()
        .return_once(|_| Ok(Some(user_id(9))));
    mocks
        .lists
        .expect_recipes_among()
        .return_once(|_, _, _| Ok(HashSet::from([recipe_id(10)])));
    let service = mocks.build();

    let err = service
        .add_to_list(kind, user_id(1), recipe_id(10))
        .await
        .expect_err("duplicate rejected");

    assert_eq!(err.code(), ErrorCode::Conflict);
    assert_eq!(err.field(), Some(field));
}

#[rstest]
#[tokio::test]
async fn listing_unknown_recipe_is_not_found() {
    let mut mocks = Mocks::default();
    mocks.recipes.expect_author_of().return_once(|_| Ok(None));
    let service = mocks.build();

    let err = service
        .add_to_list(RecipeListKind::ShoppingCart, user_id(1), recipe_id(77))
        .await
        .expect_err("unknown recipe");

    assert_eq!(err.code(), ErrorCode::NotFound);
    assert_eq!(err.field(), Some("purchase"));
}

#[rstest]
#[tokio::test]
async fn removing_absent_entry_is_not_found() {
    let mut mocks = Mocks::default();
    mocks.lists.expect_remove().return_once(|_, _, _| Ok(false));
    let service = mocks.build();

    let err = service
        .remove_from_list(RecipeListKind::Favorites, user_id(1), recipe_id(10))
        .await
        .expect_err("nothing to remove");

    assert_eq!(err.code(), ErrorCode::NotFound);
}
