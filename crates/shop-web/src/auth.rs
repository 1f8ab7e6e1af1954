//! Auth State
//!
//! Bearer token kept in `localStorage` so a reload keeps the user signed in.

use leptos::prelude::*;

use shop_core::{AuthSession, User};

const TOKEN_KEY: &str = "storefront_token";

fn storage() -> Option<web_sys::Storage> {
    web_sys::window().and_then(|w| w.local_storage().ok().flatten())
}

/// Signed-in user, shared through context
#[derive(Clone, Copy)]
pub struct Auth {
    token: RwSignal<Option<String>>,
    user: RwSignal<Option<User>>,
}

impl Auth {
    /// Restore the token saved by a previous visit
    fn restore() -> Self {
        let token = storage().and_then(|s| s.get_item(TOKEN_KEY).ok().flatten());
        Self {
            token: RwSignal::new(token),
            user: RwSignal::new(None),
        }
    }

    pub fn sign_in(&self, session: AuthSession) {
        if let Some(storage) = storage() {
            let _ = storage.set_item(TOKEN_KEY, &session.access_token);
        }
        self.token.set(Some(session.access_token));
        self.user.set(Some(session.user));
    }

    pub fn sign_out(&self) {
        if let Some(storage) = storage() {
            let _ = storage.remove_item(TOKEN_KEY);
        }
        self.token.set(None);
        self.user.set(None);
    }

    /// Current token, without subscribing
    pub fn token(&self) -> Option<String> {
        self.token.get_untracked()
    }

    pub fn is_signed_in(&self) -> bool {
        self.token.with(Option::is_some)
    }

    pub fn user(&self) -> Option<User> {
        self.user.get()
    }

    pub fn set_user(&self, user: User) {
        self.user.set(Some(user));
    }
}

/// Create the auth state and make it available to the tree
pub fn provide_auth() -> Auth {
    let auth = Auth::restore();
    provide_context(auth);
    auth
}

pub fn use_auth() -> Auth {
    expect_context::<Auth>()
}
