//! Application Layer
//!
//! Use cases and application services.

pub mod bootstrap;
pub mod check_session;
pub mod config;
pub mod recover;
pub mod sign_in;
pub mod sign_up;

// Re-exports
pub use bootstrap::BootstrapAdmin;
pub use check_session::{CheckSessionUseCase, CurrentUser};
pub use config::AuthConfig;
pub use recover::{RecoverInput, RecoverOutput, RecoverUseCase};
pub use sign_in::{SignInInput, SignInOutput, SignInUseCase};
pub use sign_up::{SignUpInput, SignUpOutput, SignUpUseCase};
