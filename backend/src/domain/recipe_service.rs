//! Recipe domain service implementing the read and write driving ports.
//!
//! Writes resolve tag and ingredient references up front so unknown ids
//! surface as field-scoped `not_found` errors rather than foreign-key
//! failures. Reads attach per-viewer flags in one batch per page.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{debug, info};

use super::flags::resolve_flags;
use super::port_error_mapping::{
    map_image_store_error, map_recipe_list_repository_error, map_recipe_repository_error,
};
use super::ports::{
    ImageStore, MediaCategory, RecipeCommand, RecipeListRepository, RecipeQuery,
    RecipeRepository, ReferenceRepository, ReferenceRepositoryError,
};
use super::{
    Error, ImageInput, MediaUrl, Recipe, RecipeDraft, RecipeFilter, RecipeId, RecipeSelection,
    RecipeView, RecipeWrite, UserId, Viewer,
};

/// Service implementing [`RecipeQuery`] and [`RecipeCommand`].
#[derive(Clone)]
pub struct RecipeService<R, F, L, S> {
    recipes: Arc<R>,
    reference: Arc<F>,
    lists: Arc<L>,
    images: Arc<S>,
    clock: Arc<dyn Clock>,
}

impl<R, F, L, S> RecipeService<R, F, L, S> {
    /// Create a new service with the given adapters.
    #[must_use]
    pub fn new(
        recipes: Arc<R>,
        reference: Arc<F>,
        lists: Arc<L>,
        images: Arc<S>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            recipes,
            reference,
            lists,
            images,
            clock,
        }
    }
}

fn first_missing<T, I>(requested: &[T], found: I) -> Option<T>
where
    T: Copy + Eq + std::hash::Hash,
    I: IntoIterator<Item = T>,
{
    let present: HashSet<T> = found.into_iter().collect();
    requested.iter().copied().find(|id| !present.contains(id))
}

impl<R, F, L, S> RecipeService<R, F, L, S>
where
    R: RecipeRepository,
    F: ReferenceRepository,
    L: RecipeListRepository,
    S: ImageStore,
{
    async fn ensure_references(&self, draft: &RecipeDraft) -> Result<(), Error> {
        if !draft.tags().is_empty() {
            let tags = self
                .reference
                .tags_by_ids(draft.tags())
                .await
                .map_err(ReferenceRepositoryError::into_domain_error)?;
            if let Some(missing) = first_missing(draft.tags(), tags.into_iter().map(|t| t.id)) {
                return Err(
                    Error::not_found(format!("tag {missing} not found")).for_field("tags", "not_found")
                );
            }
        }

        let requested = draft.ingredient_ids();
        let ingredients = self
            .reference
            .ingredients_by_ids(&requested)
            .await
            .map_err(ReferenceRepositoryError::into_domain_error)?;
        if let Some(missing) = first_missing(&requested, ingredients.into_iter().map(|i| i.id)) {
            return Err(Error::not_found(format!("ingredient {missing} not found"))
                .for_field("ingredients", "not_found"));
        }
        Ok(())
    }

    async fn store_image(&self, image: Option<&ImageInput>) -> Result<Option<MediaUrl>, Error> {
        match image {
            None => Ok(None),
            Some(ImageInput::Existing(url)) => Ok(Some(url.clone())),
            Some(ImageInput::Inline(upload)) => self
                .images
                .store(MediaCategory::Recipes, upload)
                .await
                .map(Some)
                .map_err(map_image_store_error),
        }
    }

    async fn load(&self, id: RecipeId) -> Result<Recipe, Error> {
        self.recipes
            .find_by_id(id)
            .await
            .map_err(map_recipe_repository_error)?
            .ok_or_else(|| Error::not_found(format!("recipe {id} not found")))
    }

    async fn ensure_author(&self, editor: UserId, id: RecipeId) -> Result<(), Error> {
        let author = self
            .recipes
            .author_of(id)
            .await
            .map_err(map_recipe_repository_error)?
            .ok_or_else(|| Error::not_found(format!("recipe {id} not found")))?;
        if author != editor {
            debug!(recipe_id = %id, user_id = %editor, "recipe edit rejected: not the author");
            return Err(Error::forbidden("only the author may change this recipe"));
        }
        Ok(())
    }

    async fn attach_flags(
        &self,
        viewer: Viewer,
        recipes: Vec<Recipe>,
    ) -> Result<Vec<RecipeView>, Error> {
        let ids: Vec<RecipeId> = recipes.iter().map(|recipe| recipe.id).collect();
        let flags = resolve_flags(self.lists.as_ref(), viewer, &ids)
            .await
            .map_err(map_recipe_list_repository_error)?;
        Ok(recipes
            .into_iter()
            .map(|recipe| RecipeView {
                flags: flags.flags_for(recipe.id),
                recipe,
            })
            .collect())
    }

    async fn view(&self, viewer: Viewer, id: RecipeId) -> Result<RecipeView, Error> {
        let recipe = self.load(id).await?;
        self.attach_flags(viewer, vec![recipe])
            .await?
            .pop()
            .ok_or_else(|| Error::internal("recipe view went missing"))
    }

    fn build_write(
        author: UserId,
        draft: &RecipeDraft,
        image: Option<MediaUrl>,
        published_at: chrono::DateTime<chrono::Utc>,
    ) -> RecipeWrite {
        RecipeWrite {
            author,
            name: draft.name().to_owned(),
            text: draft.text().to_owned(),
            cooking_time: draft.cooking_time(),
            image,
            tags: draft.tags().to_vec(),
            ingredients: draft.ingredients().to_vec(),
            published_at,
        }
    }
}

#[async_trait]
impl<R, F, L, S> RecipeQuery for RecipeService<R, F, L, S>
where
    R: RecipeRepository,
    F: ReferenceRepository,
    L: RecipeListRepository,
    S: ImageStore,
{
    async fn list_recipes(
        &self,
        viewer: Viewer,
        filter: RecipeFilter,
    ) -> Result<Vec<RecipeView>, Error> {
        let needs_viewer = filter.is_favorited || filter.is_in_shopping_list;
        if needs_viewer && viewer == Viewer::Anonymous {
            return Ok(Vec::new());
        }
        let selection = RecipeSelection {
            author: filter.author,
            tag_slugs: filter.tag_slugs,
            favorited_by: viewer.user_id().filter(|_| filter.is_favorited),
            in_cart_of: viewer.user_id().filter(|_| filter.is_in_shopping_list),
        };
        let recipes = self
            .recipes
            .list(&selection)
            .await
            .map_err(map_recipe_repository_error)?;
        self.attach_flags(viewer, recipes).await
    }

    async fn get_recipe(&self, viewer: Viewer, id: RecipeId) -> Result<RecipeView, Error> {
        self.view(viewer, id).await
    }
}

#[async_trait]
impl<R, F, L, S> RecipeCommand for RecipeService<R, F, L, S>
where
    R: RecipeRepository,
    F: ReferenceRepository,
    L: RecipeListRepository,
    S: ImageStore,
{
    async fn create_recipe(
        &self,
        author: UserId,
        draft: RecipeDraft,
    ) -> Result<RecipeView, Error> {
        self.ensure_references(&draft).await?;
        let image = self.store_image(draft.image()).await?;
        let write = Self::build_write(author, &draft, image, self.clock.utc());
        let id = self
            .recipes
            .create(&write)
            .await
            .map_err(map_recipe_repository_error)?;
        info!(recipe_id = %id, user_id = %author, "recipe created");
        self.view(Viewer::User(author), id).await
    }

    async fn update_recipe(
        &self,
        editor: UserId,
        id: RecipeId,
        draft: RecipeDraft,
    ) -> Result<RecipeView, Error> {
        let current = self.load(id).await?;
        if current.author.id != editor {
            debug!(recipe_id = %id, user_id = %editor, "recipe edit rejected: not the author");
            return Err(Error::forbidden("only the author may change this recipe"));
        }
        self.ensure_references(&draft).await?;
        let image = match draft.image() {
            Some(input) => self.store_image(Some(input)).await?,
            None => current.image,
        };
        let write = Self::build_write(editor, &draft, image, current.published_at);
        self.recipes
            .update(id, &write)
            .await
            .map_err(map_recipe_repository_error)?;
        info!(recipe_id = %id, user_id = %editor, "recipe updated");
        self.view(Viewer::User(editor), id).await
    }

    async fn delete_recipe(&self, editor: UserId, id: RecipeId) -> Result<(), Error> {
        self.ensure_author(editor, id).await?;
        self.recipes
            .delete(id)
            .await
            .map_err(map_recipe_repository_error)?;
        info!(recipe_id = %id, user_id = %editor, "recipe deleted");
        Ok(())
    }
}

#[cfg(test)]
#[path = "recipe_service_tests.rs"]
mod tests;
