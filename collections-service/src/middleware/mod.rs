mod actor;

use service_core::auth::Actor;

/// Newtype around [`Actor`] implementing the axum extractor.
#[derive(Debug, Clone, Copy)]
pub struct ActorContext(pub Actor);
