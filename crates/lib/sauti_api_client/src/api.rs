//! The remote API surface.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use sauti_core::models::{
    Comment, FileRef, NewPayment, Payment, PaymentStatus, Question, QuestionResponse,
    QuestionUpload, Reward, SubscriptionStatus, Survey, User, UserUpdate, Video,
};

use crate::error::ApiError;

/// Payload of a successful sign-in or sign-up.
///
/// Both fields may be absent on the wire; the session store only adopts
/// the pair when the token is present.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthPayload {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub user: Option<User>,
}

/// Payload of the subscription-status endpoints.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionStatusPayload {
    pub subscription_status: SubscriptionStatus,
}

/// Request capability of the Sauti backend, one method per operation.
///
/// All methods are pessimistic: callers reconcile state only from what the
/// server returns. Implementations must not retry.
#[async_trait]
pub trait RemoteApi: Send + Sync {
    // --- Auth (sign-in/sign-up are unauthenticated) ---

    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthPayload, ApiError>;

    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        first_name: &str,
        last_name: &str,
        phone: &str,
    ) -> Result<AuthPayload, ApiError>;

    async fn sign_out(&self) -> Result<(), ApiError>;

    /// Transition a user's subscription status server-side. When `status`
    /// is `None` the server applies its own transition; the echoed status
    /// is authoritative either way.
    async fn update_subscription_status(
        &self,
        user_id: &str,
        status: Option<SubscriptionStatus>,
    ) -> Result<SubscriptionStatusPayload, ApiError>;

    async fn check_subscription_status(
        &self,
        user_id: &str,
    ) -> Result<SubscriptionStatusPayload, ApiError>;

    // --- Users ---

    async fn update_user(&self, updates: &UserUpdate) -> Result<User, ApiError>;

    // --- Questions ---

    async fn submit_question(&self, text: &str, user_id: &str) -> Result<Question, ApiError>;

    async fn get_all_questions(&self) -> Result<Vec<Question>, ApiError>;

    async fn get_question(&self, question_id: &str) -> Result<Question, ApiError>;

    async fn upload_questions(
        &self,
        questions: &[QuestionUpload],
        user_id: &str,
    ) -> Result<Vec<Question>, ApiError>;

    async fn submit_response(
        &self,
        question_id: &str,
        response_text: &str,
        user_id: &str,
    ) -> Result<QuestionResponse, ApiError>;

    async fn get_responses(&self, question_id: &str) -> Result<Vec<QuestionResponse>, ApiError>;

    // --- Surveys ---

    async fn get_all_surveys(&self) -> Result<Vec<Survey>, ApiError>;

    async fn get_survey(&self, survey_id: &str) -> Result<Survey, ApiError>;

    /// Create a survey. The endpoint accepts both the builder shape
    /// ([`sauti_core::models::NewSurvey`]) and the drafted-questions shape
    /// submitted by the form flow, so the payload is passed as JSON.
    async fn create_survey(&self, payload: &serde_json::Value) -> Result<Survey, ApiError>;

    async fn update_survey(
        &self,
        survey_id: &str,
        payload: &serde_json::Value,
    ) -> Result<Survey, ApiError>;

    async fn delete_survey(&self, survey_id: &str) -> Result<(), ApiError>;

    async fn submit_survey_response(
        &self,
        survey_id: &str,
        responses: &serde_json::Value,
    ) -> Result<(), ApiError>;

    async fn get_survey_responses(
        &self,
        survey_id: &str,
    ) -> Result<Vec<serde_json::Value>, ApiError>;

    /// Upload a standalone survey file; returns the server-side reference.
    async fn upload_survey_file(&self, file: &FileRef) -> Result<String, ApiError>;

    // --- Videos (listing is unauthenticated) ---

    async fn get_all_videos(&self) -> Result<Vec<Video>, ApiError>;

    async fn like_video(&self, video_id: &str) -> Result<Video, ApiError>;

    async fn add_comment(&self, video_id: &str, text: &str) -> Result<Comment, ApiError>;

    async fn bookmark_video(&self, video_id: &str) -> Result<Video, ApiError>;

    async fn upload_video(
        &self,
        file: &FileRef,
        title: &str,
        user_id: &str,
    ) -> Result<Video, ApiError>;

    // --- Rewards ---

    async fn get_rewards(&self) -> Result<Vec<Reward>, ApiError>;

    async fn claim_reward(&self, reward_id: &str) -> Result<Reward, ApiError>;

    // --- Payments ---

    async fn initiate_payment(&self, payment: &NewPayment) -> Result<Payment, ApiError>;

    async fn get_all_payments(&self) -> Result<Vec<Payment>, ApiError>;

    async fn get_payment_history(&self, user_id: &str) -> Result<Vec<Payment>, ApiError>;

    async fn update_payment_status(
        &self,
        payment_id: &str,
        status: PaymentStatus,
    ) -> Result<Payment, ApiError>;
}
