//! # sauti_stores
//!
//! Observable domain stores for the Sauti client.
//!
//! Each store owns a collection of domain entities plus a loading flag and
//! exposes async operations that call the backend, then reconcile the
//! in-memory collection pessimistically. Stores notify subscribed
//! listeners after every state transition. Everything is wired once into a
//! [`Stores`] registry and handed to the host at startup.

pub mod error;
pub mod listeners;
pub mod notification;
pub mod payment;
pub mod question;
pub mod registry;
pub mod session;
pub mod survey;
pub mod survey_form;
mod sync;
pub mod video;

#[cfg(test)]
pub(crate) mod testutil;

pub use error::{FormErrors, StoreError};
pub use listeners::ListenerId;
pub use notification::{NotificationRecord, NotificationStore};
pub use payment::PaymentStore;
pub use question::QuestionStore;
pub use registry::Stores;
pub use session::SessionStore;
pub use survey::SurveyStore;
pub use survey_form::{QuestionDraft, QuestionType, SurveyDraft, SurveyFormStore, validate_draft};
pub use video::{Playback, VideoStore};
