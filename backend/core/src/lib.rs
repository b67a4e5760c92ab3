pub mod cache;
pub mod classifier;
pub mod error;
pub mod lifecycle;
pub mod normalizer;
pub mod reconciler;
pub mod traits;
pub mod types;
pub mod view;

#[cfg(test)]
mod testing;

pub use cache::{FileSessionCache, InMemorySessionCache, SessionCache};
pub use classifier::{AuthorizationClassifier, Privilege, DEFAULT_PRIVILEGED_IDENTIFIER};
pub use error::SessionError;
pub use lifecycle::{Collaborators, Phase, SessionLifecycle};
pub use normalizer::{html_escape, normalize};
pub use reconciler::{merge, ProbeOutcome, Reconciliation, SessionReconciler};
pub use traits::{
    AuthenticationService, LoginOutcome, ProbeReport, QueryResponse, QueryService,
    RemoteSessionProbe, SessionTerminationService,
};
pub use types::{login_identity, DisplayTuple, PersistedSession, ResultRecord, SessionState};
pub use view::{QueryView, ViewState};
