//! Hand-rolled test doubles shared by the store tests.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;

use sauti_api_client::{ApiError, AuthPayload, RemoteApi, SubscriptionStatusPayload};
use sauti_core::models::{
    Comment, FileRef, NewPayment, Payment, PaymentStatus, Question, QuestionResponse,
    QuestionUpload, Reward, SubscriptionStatus, Survey, User, UserUpdate, Video,
};
use sauti_core::notify::{NotificationScheduler, NotifyError};
use sauti_core::storage::{KeyValueStorage, StorageError};

/// Wire timestamp used by minted records; formats as "Jan 5, 2026 03:04 PM".
pub const WIRE_TS: &str = "2026-01-05T15:04:00Z";

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

pub fn sample_user(id: &str) -> User {
    User {
        id: id.into(),
        email: format!("{id}@example.com"),
        first_name: "Amara".into(),
        last_name: "Okello".into(),
        phone: None,
        avatar: None,
        subscription_status: SubscriptionStatus::Inactive,
    }
}

pub fn sample_question(id: &str, text: &str) -> Question {
    Question {
        id: id.into(),
        text: text.into(),
        user_id: "u1".into(),
        created_at: WIRE_TS.into(),
        responses: Vec::new(),
    }
}

pub fn sample_survey(id: &str, user_id: &str) -> Survey {
    Survey {
        id: id.into(),
        title: format!("Survey {id}"),
        description: "A survey".into(),
        payment_option: "airtime".into(),
        user_id: user_id.into(),
        file: None,
    }
}

pub fn sample_video(id: &str, title: &str) -> Video {
    Video {
        id: id.into(),
        title: title.into(),
        likes: 3,
        views: 10,
        thumbnail: None,
        video_source: format!("videos/{id}.mp4"),
        user_id: "u1".into(),
        comments: Vec::new(),
        is_bookmarked: false,
    }
}

pub fn sample_payment(id: &str, user_id: &str) -> Payment {
    Payment {
        id: id.into(),
        amount: 2000,
        phone_number: "256700000000".into(),
        provider: sauti_core::models::Provider::Mtn,
        status: PaymentStatus::Pending,
        user_id: user_id.into(),
        subscription_type: sauti_core::models::SubscriptionType::Monthly,
        start_date: None,
        end_date: None,
    }
}

/// Programmable [`RemoteApi`] double.
///
/// Records every call by name; `fail_with` flips all subsequent calls into
/// server errors. Mutation methods mint records echoing their inputs, the
/// way the backend does.
#[derive(Default)]
pub struct MockApi {
    calls: Mutex<Vec<String>>,
    failure: Mutex<Option<String>>,
    auth_payload: Mutex<Option<AuthPayload>>,
    subscription_status: Mutex<Option<SubscriptionStatus>>,
    questions: Mutex<Vec<Question>>,
    responses: Mutex<Vec<QuestionResponse>>,
    surveys: Mutex<Vec<Survey>>,
    videos: Mutex<Vec<Video>>,
    payments: Mutex<Vec<Payment>>,
    rewards: Mutex<Vec<Reward>>,
}

impl MockApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<String> {
        lock(&self.calls).clone()
    }

    /// Make every subsequent call fail with a server error.
    pub fn fail_with(&self, message: &str) {
        *lock(&self.failure) = Some(message.to_string());
    }

    pub fn clear_failure(&self) {
        *lock(&self.failure) = None;
    }

    pub fn set_auth_payload(&self, token: &str, user: User) {
        *lock(&self.auth_payload) = Some(AuthPayload {
            token: Some(token.to_string()),
            user: Some(user),
        });
    }

    /// Status echoed by the subscription endpoints when no explicit
    /// transition is requested.
    pub fn set_subscription_status(&self, status: SubscriptionStatus) {
        *lock(&self.subscription_status) = Some(status);
    }

    pub fn set_questions(&self, questions: Vec<Question>) {
        *lock(&self.questions) = questions;
    }

    pub fn set_responses(&self, responses: Vec<QuestionResponse>) {
        *lock(&self.responses) = responses;
    }

    pub fn set_surveys(&self, surveys: Vec<Survey>) {
        *lock(&self.surveys) = surveys;
    }

    pub fn set_videos(&self, videos: Vec<Video>) {
        *lock(&self.videos) = videos;
    }

    pub fn set_payments(&self, payments: Vec<Payment>) {
        *lock(&self.payments) = payments;
    }

    fn record(&self, name: &str) -> Result<(), ApiError> {
        lock(&self.calls).push(name.to_string());
        match lock(&self.failure).clone() {
            Some(message) => Err(ApiError::Server {
                status: 500,
                message,
            }),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl RemoteApi for MockApi {
    async fn sign_in(&self, _email: &str, _password: &str) -> Result<AuthPayload, ApiError> {
        self.record("sign_in")?;
        Ok(lock(&self.auth_payload).clone().unwrap_or_default())
    }

    async fn sign_up(
        &self,
        _email: &str,
        _password: &str,
        _first_name: &str,
        _last_name: &str,
        _phone: &str,
    ) -> Result<AuthPayload, ApiError> {
        self.record("sign_up")?;
        Ok(lock(&self.auth_payload).clone().unwrap_or_default())
    }

    async fn sign_out(&self) -> Result<(), ApiError> {
        self.record("sign_out")
    }

    async fn update_subscription_status(
        &self,
        _user_id: &str,
        status: Option<SubscriptionStatus>,
    ) -> Result<SubscriptionStatusPayload, ApiError> {
        self.record("update_subscription_status")?;
        let echoed = status
            .or_else(|| *lock(&self.subscription_status))
            .unwrap_or(SubscriptionStatus::Inactive);
        Ok(SubscriptionStatusPayload {
            subscription_status: echoed,
        })
    }

    async fn check_subscription_status(
        &self,
        _user_id: &str,
    ) -> Result<SubscriptionStatusPayload, ApiError> {
        self.record("check_subscription_status")?;
        Ok(SubscriptionStatusPayload {
            subscription_status: lock(&self.subscription_status)
                .unwrap_or(SubscriptionStatus::Inactive),
        })
    }

    async fn update_user(&self, updates: &UserUpdate) -> Result<User, ApiError> {
        self.record("update_user")?;
        let mut user = sample_user("u1");
        user.apply(updates);
        Ok(user)
    }

    async fn submit_question(&self, text: &str, user_id: &str) -> Result<Question, ApiError> {
        self.record("submit_question")?;
        Ok(Question {
            id: "q-new".into(),
            text: text.into(),
            user_id: user_id.into(),
            created_at: WIRE_TS.into(),
            responses: Vec::new(),
        })
    }

    async fn get_all_questions(&self) -> Result<Vec<Question>, ApiError> {
        self.record("get_all_questions")?;
        Ok(lock(&self.questions).clone())
    }

    async fn get_question(&self, question_id: &str) -> Result<Question, ApiError> {
        self.record("get_question")?;
        lock(&self.questions)
            .iter()
            .find(|q| q.id == question_id)
            .cloned()
            .ok_or(ApiError::Server {
                status: 404,
                message: "question not found".into(),
            })
    }

    async fn upload_questions(
        &self,
        questions: &[QuestionUpload],
        _user_id: &str,
    ) -> Result<Vec<Question>, ApiError> {
        self.record("upload_questions")?;
        Ok(questions
            .iter()
            .enumerate()
            .map(|(i, upload)| Question {
                id: format!("q-up-{i}"),
                text: upload.text.clone(),
                user_id: upload.user_id.clone(),
                created_at: WIRE_TS.into(),
                responses: Vec::new(),
            })
            .collect())
    }

    async fn submit_response(
        &self,
        question_id: &str,
        response_text: &str,
        user_id: &str,
    ) -> Result<QuestionResponse, ApiError> {
        self.record("submit_response")?;
        Ok(QuestionResponse {
            id: "r-new".into(),
            response_text: response_text.into(),
            user_id: user_id.into(),
            question_id: question_id.into(),
            user: None,
            created_at: WIRE_TS.into(),
        })
    }

    async fn get_responses(&self, _question_id: &str) -> Result<Vec<QuestionResponse>, ApiError> {
        self.record("get_responses")?;
        Ok(lock(&self.responses).clone())
    }

    async fn get_all_surveys(&self) -> Result<Vec<Survey>, ApiError> {
        self.record("get_all_surveys")?;
        Ok(lock(&self.surveys).clone())
    }

    async fn get_survey(&self, survey_id: &str) -> Result<Survey, ApiError> {
        self.record("get_survey")?;
        lock(&self.surveys)
            .iter()
            .find(|s| s.id == survey_id)
            .cloned()
            .ok_or(ApiError::Server {
                status: 404,
                message: "survey not found".into(),
            })
    }

    async fn create_survey(&self, payload: &serde_json::Value) -> Result<Survey, ApiError> {
        self.record("create_survey")?;
        let title = payload["title"]
            .as_str()
            .or_else(|| payload["surveyTitle"].as_str())
            .unwrap_or_default();
        Ok(Survey {
            id: "s-new".into(),
            title: title.into(),
            description: payload["description"].as_str().unwrap_or_default().into(),
            payment_option: payload["paymentOption"].as_str().unwrap_or_default().into(),
            user_id: payload["userId"].as_str().unwrap_or_default().into(),
            file: payload["file"]["name"].as_str().map(String::from),
        })
    }

    async fn update_survey(
        &self,
        survey_id: &str,
        payload: &serde_json::Value,
    ) -> Result<Survey, ApiError> {
        self.record("update_survey")?;
        let mut survey = lock(&self.surveys)
            .iter()
            .find(|s| s.id == survey_id)
            .cloned()
            .ok_or(ApiError::Server {
                status: 404,
                message: "survey not found".into(),
            })?;
        if let Some(title) = payload["title"].as_str() {
            survey.title = title.into();
        }
        if let Some(description) = payload["description"].as_str() {
            survey.description = description.into();
        }
        if let Some(payment_option) = payload["paymentOption"].as_str() {
            survey.payment_option = payment_option.into();
        }
        Ok(survey)
    }

    async fn delete_survey(&self, _survey_id: &str) -> Result<(), ApiError> {
        self.record("delete_survey")
    }

    async fn submit_survey_response(
        &self,
        _survey_id: &str,
        _responses: &serde_json::Value,
    ) -> Result<(), ApiError> {
        self.record("submit_survey_response")
    }

    async fn get_survey_responses(
        &self,
        _survey_id: &str,
    ) -> Result<Vec<serde_json::Value>, ApiError> {
        self.record("get_survey_responses")?;
        Ok(Vec::new())
    }

    async fn upload_survey_file(&self, file: &FileRef) -> Result<String, ApiError> {
        self.record("upload_survey_file")?;
        Ok(format!("files/{}", file.name))
    }

    async fn get_all_videos(&self) -> Result<Vec<Video>, ApiError> {
        self.record("get_all_videos")?;
        Ok(lock(&self.videos).clone())
    }

    async fn like_video(&self, video_id: &str) -> Result<Video, ApiError> {
        self.record("like_video")?;
        let mut video = lock(&self.videos)
            .iter()
            .find(|v| v.id == video_id)
            .cloned()
            .ok_or(ApiError::Server {
                status: 404,
                message: "video not found".into(),
            })?;
        video.likes += 1;
        Ok(video)
    }

    async fn add_comment(&self, video_id: &str, text: &str) -> Result<Comment, ApiError> {
        self.record("add_comment")?;
        Ok(Comment {
            id: "c-new".into(),
            text: text.into(),
            user_id: "u1".into(),
            video_id: video_id.into(),
        })
    }

    async fn bookmark_video(&self, video_id: &str) -> Result<Video, ApiError> {
        self.record("bookmark_video")?;
        let mut video = lock(&self.videos)
            .iter()
            .find(|v| v.id == video_id)
            .cloned()
            .ok_or(ApiError::Server {
                status: 404,
                message: "video not found".into(),
            })?;
        video.is_bookmarked = !video.is_bookmarked;
        Ok(video)
    }

    async fn upload_video(
        &self,
        file: &FileRef,
        title: &str,
        user_id: &str,
    ) -> Result<Video, ApiError> {
        self.record("upload_video")?;
        Ok(Video {
            id: "v-new".into(),
            title: title.into(),
            likes: 0,
            views: 0,
            thumbnail: None,
            video_source: format!("videos/{}", file.name),
            user_id: user_id.into(),
            comments: Vec::new(),
            is_bookmarked: false,
        })
    }

    async fn get_rewards(&self) -> Result<Vec<Reward>, ApiError> {
        self.record("get_rewards")?;
        Ok(lock(&self.rewards).clone())
    }

    async fn claim_reward(&self, reward_id: &str) -> Result<Reward, ApiError> {
        self.record("claim_reward")?;
        Ok(Reward {
            id: reward_id.into(),
            title: "Reward".into(),
            points: 10,
            claimed: true,
        })
    }

    async fn initiate_payment(&self, payment: &NewPayment) -> Result<Payment, ApiError> {
        self.record("initiate_payment")?;
        Ok(Payment {
            id: "p-new".into(),
            amount: payment.amount,
            phone_number: payment.phone_number.clone(),
            provider: payment.provider,
            status: PaymentStatus::Successful,
            user_id: payment.user_id.clone(),
            subscription_type: payment.subscription_type,
            start_date: None,
            end_date: None,
        })
    }

    async fn get_all_payments(&self) -> Result<Vec<Payment>, ApiError> {
        self.record("get_all_payments")?;
        Ok(lock(&self.payments).clone())
    }

    async fn get_payment_history(&self, _user_id: &str) -> Result<Vec<Payment>, ApiError> {
        self.record("get_payment_history")?;
        Ok(lock(&self.payments).clone())
    }

    async fn update_payment_status(
        &self,
        payment_id: &str,
        status: PaymentStatus,
    ) -> Result<Payment, ApiError> {
        self.record("update_payment_status")?;
        let mut payment = lock(&self.payments)
            .iter()
            .find(|p| p.id == payment_id)
            .cloned()
            .ok_or(ApiError::Server {
                status: 404,
                message: "payment not found".into(),
            })?;
        payment.status = status;
        Ok(payment)
    }
}

/// Storage double whose every operation fails.
#[derive(Debug, Default)]
pub struct FailingStorage;

#[async_trait]
impl KeyValueStorage for FailingStorage {
    async fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
        Err(StorageError::Unavailable("storage offline".into()))
    }

    async fn set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
        Err(StorageError::Unavailable("storage offline".into()))
    }

    async fn remove(&self, _key: &str) -> Result<(), StorageError> {
        Err(StorageError::Unavailable("storage offline".into()))
    }
}

/// Scheduler double recording permission requests and deliveries.
#[derive(Default)]
pub struct MockScheduler {
    pub permission_requests: AtomicU32,
    scheduled: Mutex<Vec<(String, String)>>,
}

impl MockScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn scheduled(&self) -> Vec<(String, String)> {
        lock(&self.scheduled).clone()
    }
}

#[async_trait]
impl NotificationScheduler for MockScheduler {
    async fn request_permission(&self) -> Result<bool, NotifyError> {
        self.permission_requests.fetch_add(1, Ordering::SeqCst);
        Ok(true)
    }

    async fn schedule(&self, title: &str, body: &str) -> Result<String, NotifyError> {
        let mut scheduled = lock(&self.scheduled);
        scheduled.push((title.to_string(), body.to_string()));
        Ok(format!("n-{}", scheduled.len()))
    }
}
