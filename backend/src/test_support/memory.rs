//! In-memory implementations of every driven port.
//!
//! [`InMemoryBackend`] keeps all rows behind one mutex so cross-table reads
//! (recipe authors, shopping list totals) see a consistent snapshot. It honours
//! the same uniqueness and ordering rules as the PostgreSQL adapters.

use std::collections::HashSet;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use actix_web::web;
use async_trait::async_trait;
use chrono::{DateTime, Duration, Local, TimeZone, Utc};
use mockable::Clock;
use sha2::{Digest, Sha256};

use crate::domain::ports::{
    CommentRepository, CommentRepositoryError, FollowRepository, FollowRepositoryError,
    ImageStore, ImageStoreError, MediaCategory, NewUserRecord, RecipeListRepository,
    RecipeListRepositoryError, RecipeRepository, RecipeRepositoryError, ReferenceRepository,
    ReferenceRepositoryError, StoredCredentials, UserRepository, UserRepositoryError,
};
use crate::domain::{
    AccountService, CatalogueService, Comment, CommentId, CommentService, Email, Follow,
    ImageUpload, Ingredient, IngredientId, IngredientNameFilter, InvalidId, MediaUrl, NewComment,
    PasswordDigest, Recipe, RecipeId, RecipeIngredient, RecipeListEntry, RecipeListKind,
    RecipeSelection, RecipeService, RecipeWrite, RelationId, ShoppingListItem, SocialService,
    Tag, TagId, User, UserId, Username,
};
use crate::inbound::http::state::{HttpState, HttpStatePorts};

/// Clock advancing one second per reading from a fixed start.
///
/// Successive writes therefore get strictly increasing timestamps, which keeps
/// "newest first" orderings deterministic.
pub struct TickingClock {
    start: DateTime<Utc>,
    ticks: AtomicI64,
}

impl TickingClock {
    /// Clock whose first reading is `start`.
    #[must_use]
    pub const fn new(start: DateTime<Utc>) -> Self {
        Self {
            start,
            ticks: AtomicI64::new(0),
        }
    }
}

impl Default for TickingClock {
    fn default() -> Self {
        Self::new(
            Utc.with_ymd_and_hms(2026, 1, 1, 12, 0, 0)
                .single()
                .unwrap_or_default(),
        )
    }
}

impl Clock for TickingClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        let tick = self.ticks.fetch_add(1, Ordering::SeqCst);
        self.start + Duration::seconds(tick)
    }
}

struct UserRow {
    user: User,
    password: PasswordDigest,
}

struct RecipeRow {
    id: RecipeId,
    write: RecipeWrite,
}

struct CommentRow {
    id: CommentId,
    comment: NewComment,
}

struct RelationRow {
    id: RelationId,
    user: UserId,
    target: i64,
}

#[derive(Default)]
struct Tables {
    last_id: i64,
    users: Vec<UserRow>,
    tags: Vec<Tag>,
    ingredients: Vec<Ingredient>,
    recipes: Vec<RecipeRow>,
    comments: Vec<CommentRow>,
    follows: Vec<RelationRow>,
    favorites: Vec<RelationRow>,
    cart: Vec<RelationRow>,
}

impl Tables {
    fn next_id(&mut self) -> i64 {
        self.last_id += 1;
        self.last_id
    }

    fn user(&self, id: UserId) -> Option<&User> {
        self.users.iter().find(|row| row.user.id == id).map(|row| &row.user)
    }

    fn list(&self, kind: RecipeListKind) -> &Vec<RelationRow> {
        match kind {
            RecipeListKind::Favorites => &self.favorites,
            RecipeListKind::ShoppingCart => &self.cart,
        }
    }

    fn list_mut(&mut self, kind: RecipeListKind) -> &mut Vec<RelationRow> {
        match kind {
            RecipeListKind::Favorites => &mut self.favorites,
            RecipeListKind::ShoppingCart => &mut self.cart,
        }
    }

    fn missing_reference(&self, write: &RecipeWrite) -> Option<String> {
        if self.user(write.author).is_none() {
            return Some(format!("user {}", write.author));
        }
        if let Some(tag) = write
            .tags
            .iter()
            .find(|id| !self.tags.iter().any(|tag| tag.id == **id))
        {
            return Some(format!("tag {tag}"));
        }
        write
            .ingredients
            .iter()
            .find(|line| !self.ingredients.iter().any(|row| row.id == line.ingredient))
            .map(|line| format!("ingredient {}", line.ingredient))
    }

    fn expand(&self, row: &RecipeRow) -> Result<Recipe, String> {
        let write = &row.write;
        let author = self
            .user(write.author)
            .cloned()
            .ok_or_else(|| format!("recipe {} has no author", row.id))?;
        let mut tags: Vec<Tag> = self
            .tags
            .iter()
            .filter(|tag| write.tags.contains(&tag.id))
            .cloned()
            .collect();
        tags.sort_by_key(|tag| tag.id);
        let ingredients = write
            .ingredients
            .iter()
            .map(|line| {
                self.ingredients
                    .iter()
                    .find(|row| row.id == line.ingredient)
                    .cloned()
                    .map(|ingredient| RecipeIngredient {
                        ingredient,
                        amount: line.amount,
                    })
                    .ok_or_else(|| format!("ingredient {} vanished", line.ingredient))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Recipe {
            id: row.id,
            author,
            name: write.name.clone(),
            text: write.text.clone(),
            cooking_time: write.cooking_time,
            image: write.image.clone(),
            tags,
            ingredients,
            published_at: write.published_at,
        })
    }

    fn selected(&self, row: &RecipeRow, selection: &RecipeSelection) -> bool {
        let listed = |list: &Vec<RelationRow>, user: UserId| {
            list.iter()
                .any(|entry| entry.user == user && entry.target == row.id.get())
        };
        let author_ok = selection.author.is_none_or(|author| row.write.author == author);
        let tags_ok = selection.tag_slugs.is_empty()
            || self.tags.iter().any(|tag| {
                row.write.tags.contains(&tag.id) && selection.tag_slugs.contains(&tag.slug)
            });
        let favorite_ok = selection
            .favorited_by
            .is_none_or(|user| listed(&self.favorites, user));
        let cart_ok = selection
            .in_cart_of
            .is_none_or(|user| listed(&self.cart, user));
        author_ok && tags_ok && favorite_ok && cart_ok
    }
}

/// Shared in-memory storage implementing every repository port.
#[derive(Clone, Default)]
pub struct InMemoryBackend {
    tables: Arc<Mutex<Tables>>,
}

impl InMemoryBackend {
    /// Empty backend with no users, tags or ingredients.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn tables(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Insert a tag and return it.
    ///
    /// # Errors
    ///
    /// [`InvalidId`] only if the id counter has wrapped.
    pub fn seed_tag(&self, name: &str, slug: &str) -> Result<Tag, InvalidId> {
        let mut tables = self.tables();
        let raw = tables.next_id();
        let tag = Tag {
            id: TagId::new(raw)?,
            name: name.to_owned(),
            slug: slug.to_owned(),
        };
        tables.tags.push(tag.clone());
        Ok(tag)
    }

    /// Insert an ingredient and return it.
    ///
    /// # Errors
    ///
    /// [`InvalidId`] only if the id counter has wrapped.
    pub fn seed_ingredient(
        &self,
        name: &str,
        measurement_unit: &str,
    ) -> Result<Ingredient, InvalidId> {
        let mut tables = self.tables();
        let raw = tables.next_id();
        let ingredient = Ingredient {
            id: IngredientId::new(raw)?,
            name: name.to_owned(),
            measurement_unit: measurement_unit.to_owned(),
        };
        tables.ingredients.push(ingredient.clone());
        Ok(ingredient)
    }

    /// Build HTTP state whose services all run over this backend.
    #[must_use]
    pub fn http_state(&self, clock: Arc<dyn Clock>) -> web::Data<HttpState> {
        let backend = Arc::new(self.clone());
        let accounts = Arc::new(AccountService::new(
            backend.clone(),
            backend.clone(),
            clock.clone(),
        ));
        let recipes = Arc::new(RecipeService::new(
            backend.clone(),
            backend.clone(),
            backend.clone(),
            backend.clone(),
            clock.clone(),
        ));
        web::Data::new(HttpState::new(HttpStatePorts {
            accounts: accounts.clone(),
            users: accounts,
            catalogue: Arc::new(CatalogueService::new(backend.clone())),
            recipes: recipes.clone(),
            recipe_commands: recipes,
            comments: Arc::new(CommentService::new(backend.clone(), backend.clone(), clock)),
            social: Arc::new(SocialService::new(
                backend.clone(),
                backend.clone(),
                backend.clone(),
                backend,
            )),
        }))
    }
}

#[async_trait]
impl UserRepository for InMemoryBackend {
    async fn create(&self, record: &NewUserRecord) -> Result<User, UserRepositoryError> {
        let mut tables = self.tables();
        let profile = &record.profile;
        if tables.users.iter().any(|row| row.user.email == profile.email) {
            return Err(UserRepositoryError::duplicate_email());
        }
        if tables
            .users
            .iter()
            .any(|row| row.user.username == profile.username)
        {
            return Err(UserRepositoryError::duplicate_username());
        }
        let id = UserId::new(tables.next_id())
            .map_err(|err| UserRepositoryError::query(err.to_string()))?;
        let user = User {
            id,
            email: profile.email.clone(),
            username: profile.username.clone(),
            first_name: profile.first_name.clone(),
            last_name: profile.last_name.clone(),
            avatar: record.avatar.clone(),
            bio: profile.bio.clone(),
            date_joined: record.date_joined,
        };
        tables.users.push(UserRow {
            user: user.clone(),
            password: record.password.clone(),
        });
        Ok(user)
    }

    async fn email_exists(&self, email: &Email) -> Result<bool, UserRepositoryError> {
        Ok(self.tables().users.iter().any(|row| &row.user.email == email))
    }

    async fn username_exists(&self, username: &Username) -> Result<bool, UserRepositoryError> {
        Ok(self
            .tables()
            .users
            .iter()
            .any(|row| &row.user.username == username))
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserRepositoryError> {
        Ok(self.tables().user(id).cloned())
    }

    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<User>, UserRepositoryError> {
        Ok(self
            .tables()
            .users
            .iter()
            .find(|row| &row.user.username == username)
            .map(|row| row.user.clone()))
    }

    async fn find_credentials_by_email(
        &self,
        email: &Email,
    ) -> Result<Option<StoredCredentials>, UserRepositoryError> {
        Ok(self
            .tables()
            .users
            .iter()
            .find(|row| &row.user.email == email)
            .map(|row| StoredCredentials {
                user: row.user.clone(),
                password: row.password.clone(),
            }))
    }

    async fn find_credentials_by_id(
        &self,
        id: UserId,
    ) -> Result<Option<StoredCredentials>, UserRepositoryError> {
        Ok(self
            .tables()
            .users
            .iter()
            .find(|row| row.user.id == id)
            .map(|row| StoredCredentials {
                user: row.user.clone(),
                password: row.password.clone(),
            }))
    }

    async fn update_password(
        &self,
        id: UserId,
        password: &PasswordDigest,
    ) -> Result<(), UserRepositoryError> {
        let mut tables = self.tables();
        let row = tables
            .users
            .iter_mut()
            .find(|row| row.user.id == id)
            .ok_or_else(|| UserRepositoryError::query(format!("user {id} vanished")))?;
        row.password = password.clone();
        Ok(())
    }

    async fn list(&self) -> Result<Vec<User>, UserRepositoryError> {
        Ok(self.tables().users.iter().map(|row| row.user.clone()).collect())
    }
}

#[async_trait]
impl ReferenceRepository for InMemoryBackend {
    async fn list_tags(&self) -> Result<Vec<Tag>, ReferenceRepositoryError> {
        Ok(self.tables().tags.clone())
    }

    async fn tags_by_ids(&self, ids: &[TagId]) -> Result<Vec<Tag>, ReferenceRepositoryError> {
        Ok(self
            .tables()
            .tags
            .iter()
            .filter(|tag| ids.contains(&tag.id))
            .cloned()
            .collect())
    }

    async fn list_ingredients(
        &self,
        filter: Option<IngredientNameFilter>,
    ) -> Result<Vec<Ingredient>, ReferenceRepositoryError> {
        let mut found: Vec<Ingredient> = self
            .tables()
            .ingredients
            .iter()
            .filter(|row| filter.as_ref().is_none_or(|filter| filter.matches(&row.name)))
            .cloned()
            .collect();
        found.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(found)
    }

    async fn ingredients_by_ids(
        &self,
        ids: &[IngredientId],
    ) -> Result<Vec<Ingredient>, ReferenceRepositoryError> {
        Ok(self
            .tables()
            .ingredients
            .iter()
            .filter(|row| ids.contains(&row.id))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl RecipeRepository for InMemoryBackend {
    async fn create(&self, recipe: &RecipeWrite) -> Result<RecipeId, RecipeRepositoryError> {
        let mut tables = self.tables();
        if let Some(missing) = tables.missing_reference(recipe) {
            return Err(RecipeRepositoryError::missing_reference(missing));
        }
        let id = RecipeId::new(tables.next_id())
            .map_err(|err| RecipeRepositoryError::query(err.to_string()))?;
        tables.recipes.push(RecipeRow {
            id,
            write: recipe.clone(),
        });
        Ok(id)
    }

    async fn update(
        &self,
        id: RecipeId,
        recipe: &RecipeWrite,
    ) -> Result<(), RecipeRepositoryError> {
        let mut tables = self.tables();
        if let Some(missing) = tables.missing_reference(recipe) {
            return Err(RecipeRepositoryError::missing_reference(missing));
        }
        let row = tables
            .recipes
            .iter_mut()
            .find(|row| row.id == id)
            .ok_or_else(|| RecipeRepositoryError::not_found(id.get()))?;
        row.write = recipe.clone();
        Ok(())
    }

    async fn delete(&self, id: RecipeId) -> Result<(), RecipeRepositoryError> {
        let mut tables = self.tables();
        let before = tables.recipes.len();
        tables.recipes.retain(|row| row.id != id);
        if tables.recipes.len() == before {
            return Err(RecipeRepositoryError::not_found(id.get()));
        }
        tables.comments.retain(|row| row.comment.recipe != id);
        tables.favorites.retain(|row| row.target != id.get());
        tables.cart.retain(|row| row.target != id.get());
        Ok(())
    }

    async fn find_by_id(&self, id: RecipeId) -> Result<Option<Recipe>, RecipeRepositoryError> {
        let tables = self.tables();
        tables
            .recipes
            .iter()
            .find(|row| row.id == id)
            .map(|row| tables.expand(row).map_err(RecipeRepositoryError::query))
            .transpose()
    }

    async fn author_of(&self, id: RecipeId) -> Result<Option<UserId>, RecipeRepositoryError> {
        Ok(self
            .tables()
            .recipes
            .iter()
            .find(|row| row.id == id)
            .map(|row| row.write.author))
    }

    async fn list(&self, selection: &RecipeSelection) -> Result<Vec<Recipe>, RecipeRepositoryError> {
        let tables = self.tables();
        let mut rows: Vec<&RecipeRow> = tables
            .recipes
            .iter()
            .filter(|row| tables.selected(row, selection))
            .collect();
        rows.sort_by(|a, b| {
            b.write
                .published_at
                .cmp(&a.write.published_at)
                .then(b.id.cmp(&a.id))
        });
        rows.into_iter()
            .map(|row| tables.expand(row).map_err(RecipeRepositoryError::query))
            .collect()
    }
}

#[async_trait]
impl CommentRepository for InMemoryBackend {
    async fn add(&self, comment: &NewComment) -> Result<Comment, CommentRepositoryError> {
        let mut tables = self.tables();
        let author = tables
            .user(comment.author)
            .map(|user| user.username.clone())
            .ok_or_else(|| CommentRepositoryError::query("comment author missing"))?;
        let id = CommentId::new(tables.next_id())
            .map_err(|err| CommentRepositoryError::query(err.to_string()))?;
        tables.comments.push(CommentRow {
            id,
            comment: comment.clone(),
        });
        Ok(Comment {
            id,
            recipe: comment.recipe,
            author,
            text: comment.text.as_ref().to_owned(),
            pub_date: comment.pub_date,
        })
    }

    async fn list_for_recipe(
        &self,
        recipe: RecipeId,
    ) -> Result<Vec<Comment>, CommentRepositoryError> {
        let tables = self.tables();
        let mut rows: Vec<&CommentRow> = tables
            .comments
            .iter()
            .filter(|row| row.comment.recipe == recipe)
            .collect();
        rows.sort_by(|a, b| {
            a.comment
                .pub_date
                .cmp(&b.comment.pub_date)
                .then(a.id.cmp(&b.id))
        });
        rows.into_iter()
            .map(|row| {
                let author = tables
                    .user(row.comment.author)
                    .map(|user| user.username.clone())
                    .ok_or_else(|| CommentRepositoryError::query("comment author missing"))?;
                Ok(Comment {
                    id: row.id,
                    recipe: row.comment.recipe,
                    author,
                    text: row.comment.text.as_ref().to_owned(),
                    pub_date: row.comment.pub_date,
                })
            })
            .collect()
    }
}

fn follow_from(tables: &Tables, row: &RelationRow) -> Result<Follow, FollowRepositoryError> {
    let username = |id: i64| {
        tables
            .users
            .iter()
            .find(|user| user.user.id.get() == id)
            .map(|user| user.user.username.clone())
            .ok_or_else(|| FollowRepositoryError::query(format!("user {id} has no row")))
    };
    Ok(Follow {
        id: row.id,
        user: username(row.user.get())?,
        author: username(row.target)?,
    })
}

#[async_trait]
impl FollowRepository for InMemoryBackend {
    async fn create(&self, user: UserId, author: UserId) -> Result<Follow, FollowRepositoryError> {
        let mut tables = self.tables();
        if tables
            .follows
            .iter()
            .any(|row| row.user == user && row.target == author.get())
        {
            return Err(FollowRepositoryError::duplicate());
        }
        let id = RelationId::new(tables.next_id())
            .map_err(|err| FollowRepositoryError::query(err.to_string()))?;
        let row = RelationRow {
            id,
            user,
            target: author.get(),
        };
        let follow = follow_from(&tables, &row)?;
        tables.follows.push(row);
        Ok(follow)
    }

    async fn exists(&self, user: UserId, author: UserId) -> Result<bool, FollowRepositoryError> {
        Ok(self
            .tables()
            .follows
            .iter()
            .any(|row| row.user == user && row.target == author.get()))
    }

    async fn delete(&self, user: UserId, author: UserId) -> Result<bool, FollowRepositoryError> {
        let mut tables = self.tables();
        let before = tables.follows.len();
        tables
            .follows
            .retain(|row| !(row.user == user && row.target == author.get()));
        Ok(tables.follows.len() < before)
    }

    async fn list_for_user(&self, user: UserId) -> Result<Vec<Follow>, FollowRepositoryError> {
        let tables = self.tables();
        tables
            .follows
            .iter()
            .filter(|row| row.user == user)
            .map(|row| follow_from(&tables, row))
            .collect()
    }
}

#[async_trait]
impl RecipeListRepository for InMemoryBackend {
    async fn add(
        &self,
        kind: RecipeListKind,
        user: UserId,
        recipe: RecipeId,
    ) -> Result<RecipeListEntry, RecipeListRepositoryError> {
        let mut tables = self.tables();
        if tables
            .list(kind)
            .iter()
            .any(|row| row.user == user && row.target == recipe.get())
        {
            return Err(RecipeListRepositoryError::duplicate());
        }
        let username = tables
            .user(user)
            .map(|found| found.username.clone())
            .ok_or_else(|| RecipeListRepositoryError::query(format!("user {user} has no row")))?;
        let id = RelationId::new(tables.next_id())
            .map_err(|err| RecipeListRepositoryError::query(err.to_string()))?;
        tables.list_mut(kind).push(RelationRow {
            id,
            user,
            target: recipe.get(),
        });
        Ok(RecipeListEntry {
            id,
            kind,
            user: username,
            recipe,
        })
    }

    async fn remove(
        &self,
        kind: RecipeListKind,
        user: UserId,
        recipe: RecipeId,
    ) -> Result<bool, RecipeListRepositoryError> {
        let mut tables = self.tables();
        let list = tables.list_mut(kind);
        let before = list.len();
        list.retain(|row| !(row.user == user && row.target == recipe.get()));
        Ok(list.len() < before)
    }

    async fn recipes_among(
        &self,
        kind: RecipeListKind,
        user: UserId,
        recipes: &[RecipeId],
    ) -> Result<HashSet<RecipeId>, RecipeListRepositoryError> {
        let tables = self.tables();
        Ok(recipes
            .iter()
            .copied()
            .filter(|recipe| {
                tables
                    .list(kind)
                    .iter()
                    .any(|row| row.user == user && row.target == recipe.get())
            })
            .collect())
    }

    async fn shopping_list(
        &self,
        user: UserId,
    ) -> Result<Vec<ShoppingListItem>, RecipeListRepositoryError> {
        let tables = self.tables();
        let mut items: Vec<ShoppingListItem> = Vec::new();
        for entry in tables.cart.iter().filter(|row| row.user == user) {
            let Some(recipe) = tables.recipes.iter().find(|row| row.id.get() == entry.target)
            else {
                continue;
            };
            for line in &recipe.write.ingredients {
                let Some(ingredient) = tables
                    .ingredients
                    .iter()
                    .find(|row| row.id == line.ingredient)
                else {
                    continue;
                };
                let amount = i64::from(line.amount.get());
                match items.iter_mut().find(|item| {
                    item.name == ingredient.name
                        && item.measurement_unit == ingredient.measurement_unit
                }) {
                    Some(item) => item.total_amount += amount,
                    None => items.push(ShoppingListItem {
                        name: ingredient.name.clone(),
                        measurement_unit: ingredient.measurement_unit.clone(),
                        total_amount: amount,
                    }),
                }
            }
        }
        items.sort_by(|a, b| {
            a.name
                .cmp(&b.name)
                .then_with(|| a.measurement_unit.cmp(&b.measurement_unit))
        });
        Ok(items)
    }
}

#[async_trait]
impl ImageStore for InMemoryBackend {
    async fn store(
        &self,
        category: MediaCategory,
        upload: &ImageUpload,
    ) -> Result<MediaUrl, ImageStoreError> {
        let digest = hex::encode(Sha256::digest(&upload.bytes));
        Ok(MediaUrl::new(format!(
            "/media/{}/{digest}.{}",
            category.dir_name(),
            upload.format.extension()
        )))
    }
}
