//! Response payloads shared by the HTTP handlers.
//!
//! Domain read models stay free of serde; these DTOs fix the wire shape.
//! Related users are rendered by username, related recipes by id.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{
    Comment, Follow, Ingredient, RecipeIngredient, RecipeListEntry, RecipeListKind, RecipeView,
    ShoppingListItem, Tag, User,
};

/// Public user profile. Never carries the password.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    /// User identifier.
    #[schema(example = 1)]
    pub id: i64,
    /// Login email.
    #[schema(example = "ada@example.com")]
    pub email: String,
    /// Public handle.
    #[schema(example = "ada")]
    pub username: String,
    /// Given name.
    #[schema(example = "Ada")]
    pub first_name: String,
    /// Family name.
    #[schema(example = "Lovelace")]
    pub last_name: String,
    /// Avatar URL.
    #[schema(example = "/media/avatars/3b1f.png")]
    pub avatar: Option<String>,
    /// Profile text.
    pub bio: Option<String>,
    /// Registration time.
    pub date_joined: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id.get(),
            email: user.email.as_ref().to_owned(),
            username: user.username.as_ref().to_owned(),
            first_name: user.first_name.as_ref().to_owned(),
            last_name: user.last_name.as_ref().to_owned(),
            avatar: user.avatar.map(|url| url.as_ref().to_owned()),
            bio: user.bio,
            date_joined: user.date_joined,
        }
    }
}

/// Recipe tag.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TagResponse {
    /// Tag identifier.
    #[schema(example = 1)]
    pub id: i64,
    /// Display name.
    #[schema(example = "Breakfast")]
    pub name: String,
    /// Filter key.
    #[schema(example = "breakfast")]
    pub slug: String,
}

impl From<Tag> for TagResponse {
    fn from(tag: Tag) -> Self {
        Self {
            id: tag.id.get(),
            name: tag.name,
            slug: tag.slug,
        }
    }
}

/// Ingredient and its unit.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct IngredientResponse {
    /// Ingredient identifier.
    #[schema(example = 7)]
    pub id: i64,
    /// Display name.
    #[schema(example = "sugar")]
    pub name: String,
    /// Unit amounts are given in.
    #[schema(example = "g")]
    pub measurement_unit: String,
}

impl From<Ingredient> for IngredientResponse {
    fn from(ingredient: Ingredient) -> Self {
        Self {
            id: ingredient.id.get(),
            name: ingredient.name,
            measurement_unit: ingredient.measurement_unit,
        }
    }
}

/// Ingredient line flattened with its ingredient row.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RecipeIngredientResponse {
    /// Ingredient identifier.
    #[schema(example = 7)]
    pub id: i64,
    /// Quantity in `measurement_unit`.
    #[schema(example = 200)]
    pub amount: i32,
    /// Ingredient name.
    #[schema(example = "sugar")]
    pub name: String,
    /// Unit of `amount`.
    #[schema(example = "g")]
    pub measurement_unit: String,
}

impl From<RecipeIngredient> for RecipeIngredientResponse {
    fn from(line: RecipeIngredient) -> Self {
        Self {
            id: line.ingredient.id.get(),
            amount: line.amount.get(),
            name: line.ingredient.name,
            measurement_unit: line.ingredient.measurement_unit,
        }
    }
}

/// Recipe as seen by the requester.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RecipeResponse {
    /// Recipe identifier.
    #[schema(example = 10)]
    pub id: i64,
    /// Image URL.
    #[schema(example = "/media/recipes/9f86d081.png")]
    pub image: Option<String>,
    /// Tags ordered by id.
    pub tags: Vec<TagResponse>,
    /// Author profile.
    pub author: UserResponse,
    /// Recipe name.
    #[schema(example = "Pancakes")]
    pub name: String,
    /// Description.
    pub text: String,
    /// Minutes.
    #[schema(example = 20)]
    pub cooking_time: i32,
    /// Ingredient lines.
    pub ingredients: Vec<RecipeIngredientResponse>,
    /// The requester favorited the recipe.
    pub is_favorite: bool,
    /// The recipe is in the requester's cart.
    pub is_in_shopping_list: bool,
}

impl From<RecipeView> for RecipeResponse {
    fn from(view: RecipeView) -> Self {
        let RecipeView { recipe, flags } = view;
        Self {
            id: recipe.id.get(),
            image: recipe.image.map(|url| url.as_ref().to_owned()),
            tags: recipe.tags.into_iter().map(TagResponse::from).collect(),
            author: recipe.author.into(),
            name: recipe.name,
            text: recipe.text,
            cooking_time: recipe.cooking_time.minutes(),
            ingredients: recipe
                .ingredients
                .into_iter()
                .map(RecipeIngredientResponse::from)
                .collect(),
            is_favorite: flags.is_favorite,
            is_in_shopping_list: flags.is_in_shopping_list,
        }
    }
}

/// Comment on a recipe.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CommentResponse {
    /// Comment identifier.
    #[schema(example = 3)]
    pub id: i64,
    /// Body.
    #[schema(example = "Lovely with lemon.")]
    pub text: String,
    /// Username of the commenter.
    #[schema(example = "ada")]
    pub author: String,
    /// Publication time.
    pub pub_date: DateTime<Utc>,
}

impl From<Comment> for CommentResponse {
    fn from(comment: Comment) -> Self {
        Self {
            id: comment.id.get(),
            text: comment.text,
            author: comment.author.as_ref().to_owned(),
            pub_date: comment.pub_date,
        }
    }
}

/// Subscription of `user` to `author`, both by username.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FollowResponse {
    /// Relation identifier.
    #[schema(example = 5)]
    pub id: i64,
    /// Subscriber.
    #[schema(example = "ada")]
    pub user: String,
    /// Followed author.
    #[schema(example = "charles")]
    pub author: String,
}

impl From<Follow> for FollowResponse {
    fn from(follow: Follow) -> Self {
        Self {
            id: follow.id.get(),
            user: follow.user.as_ref().to_owned(),
            author: follow.author.as_ref().to_owned(),
        }
    }
}

/// Favorite row.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FavoriteResponse {
    /// Relation identifier.
    #[schema(example = 1)]
    pub id: i64,
    /// Owner.
    #[schema(example = "ada")]
    pub user: String,
    /// Favorited recipe.
    #[schema(example = 10)]
    pub recipe: i64,
}

/// Cart row; the recipe travels as `purchase`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CartResponse {
    /// Relation identifier.
    #[schema(example = 1)]
    pub id: i64,
    /// Owner.
    #[schema(example = "ada")]
    pub user: String,
    /// Recipe in the cart.
    #[schema(example = 10)]
    pub purchase: i64,
}

/// Favorite or cart row rendered with the list's field naming.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecipeListEntryResponse {
    /// Row of the favorites list.
    Favorite(FavoriteResponse),
    /// Row of the shopping cart.
    Cart(CartResponse),
}

impl From<RecipeListEntry> for RecipeListEntryResponse {
    fn from(entry: RecipeListEntry) -> Self {
        let id = entry.id.get();
        let user = entry.user.as_ref().to_owned();
        let recipe = entry.recipe.get();
        match entry.kind {
            RecipeListKind::Favorites => Self::Favorite(FavoriteResponse { id, user, recipe }),
            RecipeListKind::ShoppingCart => Self::Cart(CartResponse {
                id,
                user,
                purchase: recipe,
            }),
        }
    }
}

/// One aggregated shopping list line.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ShoppingListItemResponse {
    /// Ingredient name.
    #[schema(example = "sugar")]
    pub name: String,
    /// Unit of `total_amount`.
    #[schema(example = "g")]
    pub measurement_unit: String,
    /// Summed amount.
    #[schema(example = 450)]
    pub total_amount: i64,
}

impl From<ShoppingListItem> for ShoppingListItemResponse {
    fn from(item: ShoppingListItem) -> Self {
        Self {
            name: item.name,
            measurement_unit: item.measurement_unit,
            total_amount: item.total_amount,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{RecipeId, RelationId, Username};
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case(RecipeListKind::Favorites, json!({"id": 2, "user": "ada", "recipe": 10}))]
    #[case(RecipeListKind::ShoppingCart, json!({"id": 2, "user": "ada", "purchase": 10}))]
    fn list_entries_use_their_list_field_name(
        #[case] kind: RecipeListKind,
        #[case] expected: serde_json::Value,
    ) {
        let entry = RecipeListEntry {
            id: RelationId::new(2).expect("valid id"),
            kind,
            user: Username::new("ada").expect("valid username"),
            recipe: RecipeId::new(10).expect("valid id"),
        };

        let value =
            serde_json::to_value(RecipeListEntryResponse::from(entry)).expect("serialises");

        assert_eq!(value, expected);
    }
}
