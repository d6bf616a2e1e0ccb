//! Shared HTTP adapter state.
//!
//! Handlers accept this state via `actix_web::web::Data` so they depend only
//! on driving ports and stay testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    AccountCommand, CatalogueQuery, CommentCommand, RecipeCommand, RecipeQuery, SocialCommand,
    UsersQuery,
};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Registration and credential checks.
    pub accounts: Arc<dyn AccountCommand>,
    /// Profile reads.
    pub users: Arc<dyn UsersQuery>,
    /// Tag and ingredient reads.
    pub catalogue: Arc<dyn CatalogueQuery>,
    /// Recipe reads.
    pub recipes: Arc<dyn RecipeQuery>,
    /// Recipe writes.
    pub recipe_commands: Arc<dyn RecipeCommand>,
    /// Recipe comments.
    pub comments: Arc<dyn CommentCommand>,
    /// Follows, favorites and the cart.
    pub social: Arc<dyn SocialCommand>,
}

/// Parameter object naming every port [`HttpState`] needs.
pub struct HttpStatePorts {
    /// Registration and credential checks.
    pub accounts: Arc<dyn AccountCommand>,
    /// Profile reads.
    pub users: Arc<dyn UsersQuery>,
    /// Tag and ingredient reads.
    pub catalogue: Arc<dyn CatalogueQuery>,
    /// Recipe reads.
    pub recipes: Arc<dyn RecipeQuery>,
    /// Recipe writes.
    pub recipe_commands: Arc<dyn RecipeCommand>,
    /// Recipe comments.
    pub comments: Arc<dyn CommentCommand>,
    /// Follows, favorites and the cart.
    pub social: Arc<dyn SocialCommand>,
}

impl HttpState {
    /// Assemble state from a ports bundle.
    #[must_use]
    pub fn new(ports: HttpStatePorts) -> Self {
        let HttpStatePorts {
            accounts,
            users,
            catalogue,
            recipes,
            recipe_commands,
            comments,
            social,
        } = ports;
        Self {
            accounts,
            users,
            catalogue,
            recipes,
            recipe_commands,
            comments,
            social,
        }
    }
}

impl From<HttpStatePorts> for HttpState {
    fn from(ports: HttpStatePorts) -> Self {
        Self::new(ports)
    }
}
