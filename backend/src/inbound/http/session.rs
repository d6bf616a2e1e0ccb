//! Cookie session access for handlers.
//!
//! The session cookie holds one value: the id of the signed-in user.
//! [`SessionContext`] is the extractor handlers take instead of the raw
//! actix session, so they speak in terms of signing in, signing out and
//! who is viewing a page.

use actix_session::Session;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::LocalBoxFuture;

use crate::domain::{Error, UserId, Viewer};

pub(crate) const USER_ID_KEY: &str = "user_id";

/// Session extractor wrapping the actix cookie session.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    /// Wrap an actix session.
    #[must_use]
    pub const fn new(session: Session) -> Self {
        Self(session)
    }

    /// Record `user_id` as signed in.
    ///
    /// The session key is rotated so a cookie issued before sign-in cannot
    /// be replayed afterwards.
    pub fn sign_in(&self, user_id: UserId) -> Result<(), Error> {
        self.0.renew();
        self.0
            .insert(USER_ID_KEY, user_id.get())
            .map_err(|error| Error::internal(format!("failed to write session: {error}")))
    }

    /// Forget the user and expire the cookie.
    pub fn sign_out(&self) {
        self.0.purge();
    }

    /// Signed-in user, if any.
    ///
    /// A stored id that is no longer a valid [`UserId`] counts as signed
    /// out rather than as a server fault.
    pub fn user_id(&self) -> Result<Option<UserId>, Error> {
        let stored = self
            .0
            .get::<i64>(USER_ID_KEY)
            .map_err(|error| Error::internal(format!("failed to read session: {error}")))?;
        Ok(stored.and_then(|raw| {
            UserId::new(raw)
                .inspect_err(|error| tracing::warn!(%error, "discarding session user id"))
                .ok()
        }))
    }

    /// Signed-in user, or `unauthorized`.
    pub fn signed_in_user(&self) -> Result<UserId, Error> {
        self.user_id()?
            .ok_or_else(|| Error::unauthorized("authentication required"))
    }

    /// Identity flags are resolved for; anonymous when signed out.
    pub fn viewer(&self) -> Result<Viewer, Error> {
        self.user_id().map(Viewer::from)
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let session = Session::from_request(req, payload);
        Box::pin(async move { session.await.map(Self::new) })
    }
}
