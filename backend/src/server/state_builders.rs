//! Builders wiring repository adapters into the HTTP driving ports.

use std::sync::Arc;

use actix_web::web;
use mockable::Clock;

use recipe_backend::domain::{
    AccountService, CatalogueService, CommentService, RecipeService, SocialService,
};
use recipe_backend::inbound::http::state::{HttpState, HttpStatePorts};
use recipe_backend::outbound::media::FsImageStore;
use recipe_backend::outbound::persistence::{
    DbPool, DieselCommentRepository, DieselFollowRepository, DieselRecipeListRepository,
    DieselRecipeRepository, DieselReferenceRepository, DieselUserRepository,
};

/// Shared adapter instances; each service holds `Arc` clones of these.
struct Adapters {
    users: Arc<DieselUserRepository>,
    reference: Arc<DieselReferenceRepository>,
    recipes: Arc<DieselRecipeRepository>,
    comments: Arc<DieselCommentRepository>,
    follows: Arc<DieselFollowRepository>,
    lists: Arc<DieselRecipeListRepository>,
    images: Arc<FsImageStore>,
}

impl Adapters {
    fn new(pool: &DbPool, images: FsImageStore) -> Self {
        Self {
            users: Arc::new(DieselUserRepository::new(pool.clone())),
            reference: Arc::new(DieselReferenceRepository::new(pool.clone())),
            recipes: Arc::new(DieselRecipeRepository::new(pool.clone())),
            comments: Arc::new(DieselCommentRepository::new(pool.clone())),
            follows: Arc::new(DieselFollowRepository::new(pool.clone())),
            lists: Arc::new(DieselRecipeListRepository::new(pool.clone())),
            images: Arc::new(images),
        }
    }
}

/// Build the shared HTTP state over the PostgreSQL and filesystem adapters.
pub fn build_http_state(
    pool: &DbPool,
    images: FsImageStore,
    clock: Arc<dyn Clock>,
) -> web::Data<HttpState> {
    let adapters = Adapters::new(pool, images);

    let accounts = Arc::new(AccountService::new(
        adapters.users.clone(),
        adapters.images.clone(),
        clock.clone(),
    ));
    let recipes = Arc::new(RecipeService::new(
        adapters.recipes.clone(),
        adapters.reference.clone(),
        adapters.lists.clone(),
        adapters.images.clone(),
        clock.clone(),
    ));

    web::Data::new(HttpState::new(HttpStatePorts {
        accounts: accounts.clone(),
        users: accounts,
        catalogue: Arc::new(CatalogueService::new(adapters.reference)),
        recipes: recipes.clone(),
        recipe_commands: recipes,
        comments: Arc::new(CommentService::new(
            adapters.comments,
            adapters.recipes.clone(),
            clock,
        )),
        social: Arc::new(SocialService::new(
            adapters.users,
            adapters.follows,
            adapters.recipes,
            adapters.lists,
        )),
    }))
}
