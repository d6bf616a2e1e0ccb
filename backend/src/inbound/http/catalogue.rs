//! Tag and ingredient read endpoints.
//!
//! ```text
//! GET /api/v1/tags
//! GET /api/v1/tags/{id}
//! GET /api/v1/ingredients?name=sug
//! GET /api/v1/ingredients/{id}
//! ```

use actix_web::{get, web};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::domain::{Error, IngredientId, IngredientNameFilter, TagId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::dto::{IngredientResponse, TagResponse};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_id};

/// Query string for the ingredient listing.
#[derive(Debug, Deserialize, IntoParams)]
pub struct IngredientListQuery {
    /// Case-insensitive name prefix; blank values are ignored.
    pub name: Option<String>,
}

/// Every tag.
#[utoipa::path(
    get,
    path = "/api/v1/tags",
    responses((status = 200, description = "Tags", body = [TagResponse])),
    tags = ["catalogue"],
    operation_id = "listTags",
    security([])
)]
#[get("/tags")]
pub async fn list_tags(state: web::Data<HttpState>) -> ApiResult<web::Json<Vec<TagResponse>>> {
    let tags = state.catalogue.list_tags().await?;
    Ok(web::Json(tags.into_iter().map(TagResponse::from).collect()))
}

/// One tag by id.
#[utoipa::path(
    get,
    path = "/api/v1/tags/{id}",
    params(("id" = i64, Path, description = "Tag id")),
    responses(
        (status = 200, description = "Tag", body = TagResponse),
        (status = 404, description = "No such tag", body = Error)
    ),
    tags = ["catalogue"],
    operation_id = "getTag",
    security([])
)]
#[get("/tags/{id}")]
pub async fn get_tag(
    state: web::Data<HttpState>,
    path: web::Path<i64>,
) -> ApiResult<web::Json<TagResponse>> {
    let id: TagId = parse_id(path.into_inner(), FieldName::new("id"))?;
    Ok(web::Json(state.catalogue.get_tag(id).await?.into()))
}

/// Ingredients, optionally filtered by name prefix.
#[utoipa::path(
    get,
    path = "/api/v1/ingredients",
    params(IngredientListQuery),
    responses((status = 200, description = "Ingredients", body = [IngredientResponse])),
    tags = ["catalogue"],
    operation_id = "listIngredients",
    security([])
)]
#[get("/ingredients")]
pub async fn list_ingredients(
    state: web::Data<HttpState>,
    query: web::Query<IngredientListQuery>,
) -> ApiResult<web::Json<Vec<IngredientResponse>>> {
    let filter = query
        .into_inner()
        .name
        .as_deref()
        .and_then(IngredientNameFilter::new);
    let ingredients = state.catalogue.list_ingredients(filter).await?;
    Ok(web::Json(
        ingredients
            .into_iter()
            .map(IngredientResponse::from)
            .collect(),
    ))
}

/// One ingredient by id.
#[utoipa::path(
    get,
    path = "/api/v1/ingredients/{id}",
    params(("id" = i64, Path, description = "Ingredient id")),
    responses(
        (status = 200, description = "Ingredient", body = IngredientResponse),
        (status = 404, description = "No such ingredient", body = Error)
    ),
    tags = ["catalogue"],
    operation_id = "getIngredient",
    security([])
)]
#[get("/ingredients/{id}")]
pub async fn get_ingredient(
    state: web::Data<HttpState>,
    path: web::Path<i64>,
) -> ApiResult<web::Json<IngredientResponse>> {
    let id: IngredientId = parse_id(path.into_inner(), FieldName::new("id"))?;
    Ok(web::Json(state.catalogue.get_ingredient(id).await?.into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Ingredient, Tag};
    use crate::inbound::http::test_utils::{MockPorts, test_app};
    use actix_web::http::StatusCode;
    use actix_web::test as actix_test;
    use rstest::rstest;
    use serde_json::Value;

    fn configure(cfg: &mut web::ServiceConfig) {
        cfg.service(list_tags)
            .service(get_tag)
            .service(list_ingredients)
            .service(get_ingredient);
    }

    fn sugar() -> Ingredient {
        Ingredient {
            id: IngredientId::new(7).expect("valid id"),
            name: "sugar".to_owned(),
            measurement_unit: "g".to_owned(),
        }
    }

    #[rstest]
    #[actix_web::test]
    async fn tags_render_id_name_and_slug() {
        let mut ports = MockPorts::default();
        ports.catalogue.expect_list_tags().return_once(|| {
            Ok(vec![Tag {
                id: TagId::new(1).expect("valid id"),
                name: "Breakfast".to_owned(),
                slug: "breakfast".to_owned(),
            }])
        });
        let app = actix_test::init_service(test_app(ports.into_state(), configure)).await;

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::get().uri("/api/v1/tags").to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::OK);
        let body: Value = actix_test::read_body_json(res).await;
        assert_eq!(
            body,
            serde_json::json!([{"id": 1, "name": "Breakfast", "slug": "breakfast"}])
        );
    }

    #[rstest]
    #[case("/api/v1/ingredients?name=SU", Some("su"))]
    #[case("/api/v1/ingredients?name=%20", None)]
    #[case("/api/v1/ingredients", None)]
    #[actix_web::test]
    async fn ingredient_name_filter_is_normalised(
        #[case] uri: &str,
        #[case] expected: Option<&'static str>,
    ) {
        let mut ports = MockPorts::default();
        ports
            .catalogue
            .expect_list_ingredients()
            .withf(move |filter| filter.as_ref().map(IngredientNameFilter::prefix) == expected)
            .return_once(|_| Ok(vec![sugar()]));
        let app = actix_test::init_service(test_app(ports.into_state(), configure)).await;

        let res =
            actix_test::call_service(&app, actix_test::TestRequest::get().uri(uri).to_request())
                .await;

        assert_eq!(res.status(), StatusCode::OK);
        let body: Value = actix_test::read_body_json(res).await;
        assert_eq!(body[0]["measurement_unit"], "g");
    }

    #[rstest]
    #[actix_web::test]
    async fn missing_ingredient_is_not_found() {
        let mut ports = MockPorts::default();
        ports
            .catalogue
            .expect_get_ingredient()
            .return_once(|id| Err(Error::not_found(format!("ingredient {id} not found"))));
        let app = actix_test::init_service(test_app(ports.into_state(), configure)).await;

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/api/v1/ingredients/99")
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }
}
