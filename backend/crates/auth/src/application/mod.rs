//! Application Layer
//!
//! Use cases and application services.

pub mod check_user_name;
pub mod config;
pub mod current_user;
pub mod sign_in;
pub mod sign_up;
pub mod update_profile;

// Re-exports
pub use check_user_name::CheckUserNameUseCase;
pub use config::AuthConfig;
pub use current_user::CurrentUserUseCase;
pub use sign_in::{SignInInput, SignInOutput, SignInUseCase};
pub use sign_up::{SignUpInput, SignUpOutput, SignUpUseCase};
pub use update_profile::UpdateProfileUseCase;
