//! Value Object Module

pub mod amount;
pub mod log_kind;
pub mod payout_method;
pub mod social_platform;
pub mod user_role;
pub mod user_status;
pub mod workflow_status;

pub use amount::Amount;
pub use log_kind::LogKind;
pub use payout_method::{PayoutMethod, PayoutTarget};
pub use social_platform::SocialPlatform;
pub use user_role::UserRole;
pub use user_status::UserStatus;
pub use workflow_status::{PayoutStatus, SubmissionStatus};
