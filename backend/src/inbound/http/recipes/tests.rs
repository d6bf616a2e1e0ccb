//! Handler tests for the recipe endpoints.

use actix_web::http::StatusCode;
use actix_web::test as actix_test;
use rstest::{fixture, rstest};
use serde_json::{Value, json};

use super::*;
use crate::domain::{
    Amount, CookingTime, Ingredient, MediaUrl, Recipe, RecipeFlags, RecipeIngredient, RecipeView,
    Tag, Viewer,
};
use crate::inbound::http::test_utils::{
    MockPorts, fixture_timestamp, fixture_user, session_cookie, sign_in_request, test_app,
};

fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(list_recipes)
        .service(create_recipe)
        .service(get_recipe)
        .service(update_recipe)
        .service(delete_recipe);
}

fn recipe_view(id: i64, flags: RecipeFlags) -> RecipeView {
    let sugar = IngredientId::new(7).expect("valid id");
    RecipeView {
        recipe: Recipe {
            id: RecipeId::new(id).expect("valid id"),
            author: fixture_user(2, "ada"),
            name: "Porridge".to_owned(),
            text: "Stir oats into milk.".to_owned(),
            cooking_time: CookingTime::new(10).expect("valid time"),
            image: Some(MediaUrl::new("/media/recipes/abc.png")),
            tags: vec![Tag {
                id: TagId::new(1).expect("valid id"),
                name: "Breakfast".to_owned(),
                slug: "breakfast".to_owned(),
            }],
            ingredients: vec![RecipeIngredient {
                ingredient: Ingredient {
                    id: sugar,
                    name: "sugar".to_owned(),
                    measurement_unit: "g".to_owned(),
                },
                amount: Amount::new(sugar, 15).expect("valid amount"),
            }],
            published_at: fixture_timestamp(),
        },
        flags,
    }
}

#[fixture]
fn recipe_body() -> Value {
    json!({
        "name": "Porridge",
        "text": "Stir oats into milk.",
        "cooking_time": 10,
        "tags": [1, 1],
        "ingredients": [{"id": 7, "amount": 15}]
    })
}

#[rstest]
#[actix_web::test]
async fn anonymous_listing_passes_an_anonymous_viewer() {
    let mut ports = MockPorts::default();
    ports
        .recipes
        .expect_list_recipes()
        .withf(|viewer, filter| {
            *viewer == Viewer::Anonymous
                && filter.tag_slugs == ["breakfast", "lunch"]
                && filter.author == Some(UserId::new(2).expect("valid id"))
                && !filter.is_favorited
        })
        .return_once(|_, _| Ok(vec![recipe_view(10, RecipeFlags::default())]));
    let app = actix_test::init_service(test_app(ports.into_state(), configure)).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/recipes?author=2&tags=breakfast,%20lunch")
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body[0]["id"], 10);
    assert_eq!(body[0]["author"]["username"], "ada");
    assert_eq!(body[0]["ingredients"][0]["measurement_unit"], "g");
    assert_eq!(body[0]["is_favorite"], false);
}

#[rstest]
#[case("1", true)]
#[case("true", true)]
#[case("0", false)]
#[actix_web::test]
async fn favorited_flag_reaches_the_filter(#[case] raw: &str, #[case] expected: bool) {
    let mut ports = MockPorts::default();
    ports
        .recipes
        .expect_list_recipes()
        .withf(move |viewer, filter| {
            *viewer == Viewer::User(UserId::new(5).expect("valid id"))
                && filter.is_favorited == expected
        })
        .return_once(|_, _| {
            Ok(vec![recipe_view(
                10,
                RecipeFlags {
                    is_favorite: true,
                    is_in_shopping_list: false,
                },
            )])
        });
    let app = actix_test::init_service(test_app(ports.into_state(), configure)).await;
    let signed_in = actix_test::call_service(&app, sign_in_request(5).to_request()).await;
    let cookie = session_cookie(&signed_in);

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri(&format!("/api/v1/recipes?is_favorited={raw}"))
            .cookie(cookie)
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body[0]["is_favorite"], true);
}

#[rstest]
#[actix_web::test]
async fn unknown_flag_values_are_rejected() {
    let mut ports = MockPorts::default();
    ports.recipes.expect_list_recipes().never();
    let app = actix_test::init_service(test_app(ports.into_state(), configure)).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/recipes?is_in_shopping_list=maybe")
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["details"]["field"], "is_in_shopping_list");
}

#[rstest]
#[actix_web::test]
async fn create_requires_a_session(recipe_body: Value) {
    let mut ports = MockPorts::default();
    ports.recipe_commands.expect_create_recipe().never();
    let app = actix_test::init_service(test_app(ports.into_state(), configure)).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/recipes")
            .set_json(recipe_body)
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[rstest]
#[actix_web::test]
async fn create_publishes_for_the_session_user(recipe_body: Value) {
    let mut ports = MockPorts::default();
    ports
        .recipe_commands
        .expect_create_recipe()
        .withf(|author, draft| {
            *author == UserId::new(2).expect("valid id")
                && draft.tags() == [TagId::new(1).expect("valid id")]
                && draft.ingredients().len() == 1
        })
        .return_once(|_, _| Ok(recipe_view(10, RecipeFlags::default())));
    let app = actix_test::init_service(test_app(ports.into_state(), configure)).await;
    let signed_in = actix_test::call_service(&app, sign_in_request(2).to_request()).await;
    let cookie = session_cookie(&signed_in);

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/recipes")
            .cookie(cookie)
            .set_json(recipe_body)
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::CREATED);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["tags"][0]["slug"], "breakfast");
    assert_eq!(body["image"], "/media/recipes/abc.png");
}

#[rstest]
#[case("cooking_time", json!(0), "cooking_time", "min_value")]
#[case("name", json!("   "), "name", "required")]
#[case("ingredients", json!([]), "ingredients", "required")]
#[case("ingredients", json!([{"id": 7, "amount": 1}, {"id": 7, "amount": 2}]), "ingredients", "duplicate_ingredient")]
#[case("ingredients", json!([{"id": 7, "amount": 0}]), "ingredients", "min_value")]
#[case("tags", json!([0]), "tags", "invalid_id")]
#[case("image", json!("data:image/png;base64,@@@"), "image", "invalid_base64")]
#[actix_web::test]
async fn create_rejects_invalid_drafts(
    recipe_body: Value,
    #[case] key: &str,
    #[case] value: Value,
    #[case] field: &str,
    #[case] code: &str,
) {
    let mut ports = MockPorts::default();
    ports.recipe_commands.expect_create_recipe().never();
    let app = actix_test::init_service(test_app(ports.into_state(), configure)).await;
    let signed_in = actix_test::call_service(&app, sign_in_request(2).to_request()).await;
    let cookie = session_cookie(&signed_in);
    let mut body = recipe_body;
    body[key] = value;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/recipes")
            .cookie(cookie)
            .set_json(body)
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let payload: Value = actix_test::read_body_json(res).await;
    assert_eq!(payload["details"]["field"], field);
    assert_eq!(payload["details"]["code"], code);
}

#[rstest]
#[actix_web::test]
async fn update_by_someone_else_is_forbidden(recipe_body: Value) {
    let mut ports = MockPorts::default();
    ports
        .recipe_commands
        .expect_update_recipe()
        .withf(|editor, id, _| {
            *editor == UserId::new(9).expect("valid id") && *id == RecipeId::new(10).expect("id")
        })
        .return_once(|_, _, _| Err(Error::forbidden("only the author may change this recipe")));
    let app = actix_test::init_service(test_app(ports.into_state(), configure)).await;
    let signed_in = actix_test::call_service(&app, sign_in_request(9).to_request()).await;
    let cookie = session_cookie(&signed_in);

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::put()
            .uri("/api/v1/recipes/10")
            .cookie(cookie)
            .set_json(recipe_body)
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::FORBIDDEN);
}

#[rstest]
#[actix_web::test]
async fn delete_returns_no_content() {
    let mut ports = MockPorts::default();
    ports
        .recipe_commands
        .expect_delete_recipe()
        .return_once(|_, _| Ok(()));
    let app = actix_test::init_service(test_app(ports.into_state(), configure)).await;
    let signed_in = actix_test::call_service(&app, sign_in_request(2).to_request()).await;
    let cookie = session_cookie(&signed_in);

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::delete()
            .uri("/api/v1/recipes/10")
            .cookie(cookie)
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::NO_CONTENT);
}

#[rstest]
#[actix_web::test]
async fn get_recipe_maps_missing_rows_to_not_found() {
    let mut ports = MockPorts::default();
    ports
        .recipes
        .expect_get_recipe()
        .return_once(|_, id| Err(Error::not_found(format!("recipe {id} not found"))));
    let app = actix_test::init_service(test_app(ports.into_state(), configure)).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/recipes/404")
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}
