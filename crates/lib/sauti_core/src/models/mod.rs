//! Domain models.
//!
//! These are the canonical client-side entities. Field names carry
//! `#[serde(rename_all = "camelCase")]` because the backend is a JS API;
//! the Rust side stays snake_case throughout.

pub mod file;
pub mod payment;
pub mod question;
pub mod reward;
pub mod survey;
pub mod user;
pub mod video;

pub use file::FileRef;
pub use payment::{NewPayment, Payment, PaymentStatus, Provider, SubscriptionType};
pub use question::{Question, QuestionResponse, QuestionUpload, ResponseAuthor};
pub use reward::Reward;
pub use survey::{NewSurvey, Survey, SurveyUpdate};
pub use user::{SubscriptionStatus, User, UserUpdate};
pub use video::{Comment, Video};
