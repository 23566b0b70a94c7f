use std::sync::Arc;

use crate::identity::IdentityResolver;
use crate::onboarding::service::OnboardingService;
use crate::store::CareerStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn CareerStore>,
    /// Maps a request to the identity-provider user id, if any.
    pub identity: Arc<dyn IdentityResolver>,
    pub onboarding: OnboardingService,
}
