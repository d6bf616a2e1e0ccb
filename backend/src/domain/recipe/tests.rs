//! Regression coverage for recipe draft validation.

use super::*;
use rstest::{fixture, rstest};

fn ingredient(raw: i64) -> IngredientId {
    IngredientId::new(raw).expect("valid ingredient id")
}

fn tag(raw: i64) -> TagId {
    TagId::new(raw).expect("valid tag id")
}

#[fixture]
fn parts() -> RecipeDraftParts {
    RecipeDraftParts {
        name: "Tea".to_owned(),
        text: "Boil water".to_owned(),
        cooking_time: 3,
        image: None,
        tags: vec![tag(1)],
        ingredients: vec![(ingredient(7), 2)],
    }
}

#[rstest]
fn valid_parts_build_a_draft(parts: RecipeDraftParts) {
    let draft = RecipeDraft::try_from_parts(parts).expect("valid draft");
    assert_eq!(draft.name(), "Tea");
    assert_eq!(draft.cooking_time().minutes(), 3);
    assert_eq!(draft.ingredients().len(), 1);
    assert_eq!(draft.ingredients()[0].amount.get(), 2);
}

#[rstest]
fn duplicate_tags_collapse(mut parts: RecipeDraftParts) {
    parts.tags = vec![tag(3), tag(1), tag(3)];
    let draft = RecipeDraft::try_from_parts(parts).expect("valid draft");
    assert_eq!(draft.tags(), &[tag(1), tag(3)]);
}

#[rstest]
fn empty_tags_are_allowed(mut parts: RecipeDraftParts) {
    parts.tags.clear();
    assert!(RecipeDraft::try_from_parts(parts).is_ok());
}

#[rstest]
#[case(0)]
#[case(-5)]
#[case(i64::from(i32::MAX) + 1)]
fn cooking_time_out_of_range(mut parts: RecipeDraftParts, #[case] minutes: i64) {
    parts.cooking_time = minutes;
    assert_eq!(
        RecipeDraft::try_from_parts(parts),
        Err(RecipeValidationError::CookingTimeOutOfRange { value: minutes })
    );
}

#[rstest]
fn zero_amount_is_rejected(mut parts: RecipeDraftParts) {
    parts.ingredients = vec![(ingredient(7), 0)];
    let err = RecipeDraft::try_from_parts(parts).expect_err("amount must be positive");
    assert_eq!(err.field(), "ingredients");
    assert_eq!(err.code(), "min_value");
}

#[rstest]
fn duplicate_ingredients_are_rejected(mut parts: RecipeDraftParts) {
    parts.ingredients = vec![(ingredient(7), 2), (ingredient(7), 5)];
    assert_eq!(
        RecipeDraft::try_from_parts(parts),
        Err(RecipeValidationError::DuplicateIngredient {
            ingredient: ingredient(7)
        })
    );
}

#[rstest]
fn missing_ingredients_are_rejected(mut parts: RecipeDraftParts) {
    parts.ingredients.clear();
    assert_eq!(
        RecipeDraft::try_from_parts(parts),
        Err(RecipeValidationError::NoIngredients)
    );
}

#[rstest]
#[case("   ", RecipeValidationError::EmptyName)]
fn blank_name_is_rejected(
    mut parts: RecipeDraftParts,
    #[case] name: &str,
    #[case] expected: RecipeValidationError,
) {
    parts.name = name.to_owned();
    assert_eq!(RecipeDraft::try_from_parts(parts), Err(expected));
}

#[rstest]
fn overlong_name_is_rejected(mut parts: RecipeDraftParts) {
    parts.name = "n".repeat(RECIPE_NAME_MAX + 1);
    assert_eq!(
        RecipeDraft::try_from_parts(parts),
        Err(RecipeValidationError::NameTooLong {
            max: RECIPE_NAME_MAX
        })
    );
}

#[rstest]
fn blank_text_is_rejected(mut parts: RecipeDraftParts) {
    parts.text = "\n".to_owned();
    assert_eq!(
        RecipeDraft::try_from_parts(parts),
        Err(RecipeValidationError::EmptyText)
    );
}

#[rstest]
fn bad_image_is_reported_on_image_field(mut parts: RecipeDraftParts) {
    parts.image = Some("ftp://nope".to_owned());
    let err = RecipeDraft::try_from_parts(parts).expect_err("bad image");
    assert_eq!(err.field(), "image");
}

#[rstest]
fn blank_image_means_no_image(mut parts: RecipeDraftParts) {
    parts.image = Some(String::new());
    let draft = RecipeDraft::try_from_parts(parts).expect("valid draft");
    assert!(draft.image().is_none());
}
