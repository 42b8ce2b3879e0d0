// src/auth/mod.rs
pub mod credential_store;
pub mod session;

pub use credential_store::{CredentialStore, RegistrationOutcome};
pub use session::{create_session_store, Session, SessionStore, SharedSessionStore};
