//! Entity Module

pub mod app_log;
pub mod broadcast;
pub mod campaign;
pub mod cashflow;
pub mod payout_request;
pub mod report;
pub mod submission;
pub mod user;

pub use app_log::AppLog;
pub use broadcast::Broadcast;
pub use campaign::{Campaign, CampaignContent, CampaignTerms};
pub use cashflow::{CashflowConfig, PlatformConfig};
pub use payout_request::PayoutRequest;
pub use report::{Report, ReportStatus};
pub use submission::Submission;
pub use user::{Balances, NewUser, User};
