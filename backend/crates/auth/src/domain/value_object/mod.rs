//! Value Object Module

pub mod email;
pub mod session_token;
pub mod user_name;

pub use email::{Email, EmailError};
pub use session_token::SessionToken;
pub use user_name::{UserName, UserNameError};
