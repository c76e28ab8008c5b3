//! HTTP implementation of [`RemoteApi`] backed by reqwest.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use reqwest::{Client, RequestBuilder, Response};
use serde::{Deserialize, Serialize};
use tracing::warn;
use url::Url;

use sauti_core::models::{
    Comment, FileRef, NewPayment, Payment, PaymentStatus, Question, QuestionResponse,
    QuestionUpload, Reward, SubscriptionStatus, Survey, User, UserUpdate, Video,
};
use sauti_core::storage::{KEY_TOKEN, KeyValueStorage};

use crate::api::{AuthPayload, RemoteApi, SubscriptionStatusPayload};
use crate::error::ApiError;

/// Default request deadline.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Whether a request attaches the `Authorization` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Auth {
    Bearer,
    Skip,
}

/// Connection settings for [`HttpApi`].
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// API root, e.g. `http://127.0.0.1:3000/api`.
    pub base_url: Url,
    pub timeout: Duration,
}

impl ApiConfig {
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            timeout: REQUEST_TIMEOUT,
        }
    }
}

/// Reqwest-backed API client.
///
/// The bearer token is read fresh from [`KeyValueStorage`] on every
/// authenticated call — storage is the source of truth, never an in-memory
/// copy. Failures are logged once here and propagated for the caller to
/// react to.
pub struct HttpApi {
    client: Client,
    config: ApiConfig,
    storage: Arc<dyn KeyValueStorage>,
}

impl HttpApi {
    pub fn new(config: ApiConfig, storage: Arc<dyn KeyValueStorage>) -> Result<Self, ApiError> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            client,
            config,
            storage,
        })
    }

    /// Build a full endpoint URL under the API root.
    fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.config.base_url.as_str().trim_end_matches('/'),
            path
        )
    }

    /// Attach auth, send, and map non-success responses to [`ApiError`].
    async fn send(&self, req: RequestBuilder, auth: Auth) -> Result<Response, ApiError> {
        let req = match auth {
            Auth::Skip => req,
            Auth::Bearer => match self.storage.get(KEY_TOKEN).await? {
                Some(token) => req.header(AUTHORIZATION, format!("Bearer {token}")),
                None => req,
            },
        };

        let resp = req.send().await.map_err(|e| {
            warn!(error = %e, "api request failed in transit");
            ApiError::Transport(e)
        })?;

        if resp.status().is_success() {
            return Ok(resp);
        }

        let status = resp.status().as_u16();
        let body = resp.text().await.unwrap_or_default();
        let message = server_message(&body);
        warn!(status, %message, "api request rejected");
        Err(ApiError::Server { status, message })
    }
}

/// Extract the server-supplied `{"message": …}` from an error body,
/// falling back to the raw body, then to a generic message.
fn server_message(body: &str) -> String {
    #[derive(Deserialize)]
    struct ServerError {
        message: String,
    }

    if let Ok(err) = serde_json::from_str::<ServerError>(body) {
        return err.message;
    }
    if body.trim().is_empty() {
        "An error occurred".to_string()
    } else {
        body.trim().to_string()
    }
}

/// Build the multipart part for a picked file.
fn file_part(file: &FileRef) -> Result<reqwest::multipart::Part, ApiError> {
    let part = reqwest::multipart::Part::bytes(file.data.clone())
        .file_name(file.name.clone())
        .mime_str(&file.mime)?;
    Ok(part)
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SignInRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SignUpRequest<'a> {
    email: &'a str,
    password: &'a str,
    first_name: &'a str,
    last_name: &'a str,
    phone: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SubmitQuestionRequest<'a> {
    text: &'a str,
    user_id: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct UploadQuestionsRequest<'a> {
    questions: &'a [QuestionUpload],
    user_id: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SubmitResponseRequest<'a> {
    response_text: &'a str,
    user_id: &'a str,
}

#[derive(Serialize)]
struct CommentRequest<'a> {
    text: &'a str,
}

#[derive(Serialize)]
struct StatusRequest {
    status: PaymentStatus,
}

#[derive(Serialize)]
struct SubscriptionStatusRequest {
    status: SubscriptionStatus,
}

#[derive(Serialize)]
struct SurveyResponsesRequest<'a> {
    responses: &'a serde_json::Value,
}

#[derive(Deserialize)]
struct UploadedFilePayload {
    file: String,
}

#[async_trait]
impl RemoteApi for HttpApi {
    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthPayload, ApiError> {
        let resp = self
            .send(
                self.client
                    .post(self.endpoint("auth/signin"))
                    .json(&SignInRequest { email, password }),
                Auth::Skip,
            )
            .await?;
        Ok(resp.json().await?)
    }

    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        first_name: &str,
        last_name: &str,
        phone: &str,
    ) -> Result<AuthPayload, ApiError> {
        let resp = self
            .send(
                self.client
                    .post(self.endpoint("auth/signup"))
                    .json(&SignUpRequest {
                        email,
                        password,
                        first_name,
                        last_name,
                        phone,
                    }),
                Auth::Skip,
            )
            .await?;
        Ok(resp.json().await?)
    }

    async fn sign_out(&self) -> Result<(), ApiError> {
        self.send(self.client.post(self.endpoint("auth/signout")), Auth::Bearer)
            .await?;
        Ok(())
    }

    async fn update_subscription_status(
        &self,
        user_id: &str,
        status: Option<SubscriptionStatus>,
    ) -> Result<SubscriptionStatusPayload, ApiError> {
        let req = self
            .client
            .put(self.endpoint(&format!("auth/{user_id}/subscription-status")));
        let req = match status {
            Some(status) => req.json(&SubscriptionStatusRequest { status }),
            None => req,
        };
        let resp = self.send(req, Auth::Bearer).await?;
        Ok(resp.json().await?)
    }

    async fn check_subscription_status(
        &self,
        user_id: &str,
    ) -> Result<SubscriptionStatusPayload, ApiError> {
        let resp = self
            .send(
                self.client
                    .get(self.endpoint(&format!("auth/{user_id}/subscription-status"))),
                Auth::Bearer,
            )
            .await?;
        Ok(resp.json().await?)
    }

    async fn update_user(&self, updates: &UserUpdate) -> Result<User, ApiError> {
        let resp = self
            .send(
                self.client.put(self.endpoint("users")).json(updates),
                Auth::Bearer,
            )
            .await?;
        Ok(resp.json().await?)
    }

    async fn submit_question(&self, text: &str, user_id: &str) -> Result<Question, ApiError> {
        let resp = self
            .send(
                self.client
                    .post(self.endpoint("questions/create"))
                    .json(&SubmitQuestionRequest { text, user_id }),
                Auth::Bearer,
            )
            .await?;
        Ok(resp.json().await?)
    }

    async fn get_all_questions(&self) -> Result<Vec<Question>, ApiError> {
        let resp = self
            .send(self.client.get(self.endpoint("questions/all")), Auth::Bearer)
            .await?;
        Ok(resp.json().await?)
    }

    async fn get_question(&self, question_id: &str) -> Result<Question, ApiError> {
        let resp = self
            .send(
                self.client
                    .get(self.endpoint(&format!("questions/{question_id}"))),
                Auth::Bearer,
            )
            .await?;
        Ok(resp.json().await?)
    }

    async fn upload_questions(
        &self,
        questions: &[QuestionUpload],
        user_id: &str,
    ) -> Result<Vec<Question>, ApiError> {
        let resp = self
            .send(
                self.client
                    .post(self.endpoint("questions/upload"))
                    .json(&UploadQuestionsRequest { questions, user_id }),
                Auth::Bearer,
            )
            .await?;
        Ok(resp.json().await?)
    }

    async fn submit_response(
        &self,
        question_id: &str,
        response_text: &str,
        user_id: &str,
    ) -> Result<QuestionResponse, ApiError> {
        let resp = self
            .send(
                self.client
                    .post(self.endpoint(&format!("questions/{question_id}/responses")))
                    .json(&SubmitResponseRequest {
                        response_text,
                        user_id,
                    }),
                Auth::Bearer,
            )
            .await?;
        // The backend omits the back-reference on creation; pin it here so
        // callers always see the owning question id.
        let mut response: QuestionResponse = resp.json().await?;
        response.question_id = question_id.to_string();
        Ok(response)
    }

    async fn get_responses(&self, question_id: &str) -> Result<Vec<QuestionResponse>, ApiError> {
        let resp = self
            .send(
                self.client
                    .get(self.endpoint(&format!("questions/{question_id}/responses"))),
                Auth::Bearer,
            )
            .await?;
        Ok(resp.json().await?)
    }

    async fn get_all_surveys(&self) -> Result<Vec<Survey>, ApiError> {
        let resp = self
            .send(self.client.get(self.endpoint("surveys")), Auth::Bearer)
            .await?;
        Ok(resp.json().await?)
    }

    async fn get_survey(&self, survey_id: &str) -> Result<Survey, ApiError> {
        let resp = self
            .send(
                self.client.get(self.endpoint(&format!("surveys/{survey_id}"))),
                Auth::Bearer,
            )
            .await?;
        Ok(resp.json().await?)
    }

    async fn create_survey(&self, payload: &serde_json::Value) -> Result<Survey, ApiError> {
        let resp = self
            .send(
                self.client.post(self.endpoint("surveys")).json(payload),
                Auth::Bearer,
            )
            .await?;
        Ok(resp.json().await?)
    }

    async fn update_survey(
        &self,
        survey_id: &str,
        payload: &serde_json::Value,
    ) -> Result<Survey, ApiError> {
        let resp = self
            .send(
                self.client
                    .put(self.endpoint(&format!("surveys/{survey_id}")))
                    .json(payload),
                Auth::Bearer,
            )
            .await?;
        Ok(resp.json().await?)
    }

    async fn delete_survey(&self, survey_id: &str) -> Result<(), ApiError> {
        self.send(
            self.client
                .delete(self.endpoint(&format!("surveys/{survey_id}"))),
            Auth::Bearer,
        )
        .await?;
        Ok(())
    }

    async fn submit_survey_response(
        &self,
        survey_id: &str,
        responses: &serde_json::Value,
    ) -> Result<(), ApiError> {
        self.send(
            self.client
                .post(self.endpoint(&format!("surveys/{survey_id}/responses")))
                .json(&SurveyResponsesRequest { responses }),
            Auth::Bearer,
        )
        .await?;
        Ok(())
    }

    async fn get_survey_responses(
        &self,
        survey_id: &str,
    ) -> Result<Vec<serde_json::Value>, ApiError> {
        let resp = self
            .send(
                self.client
                    .get(self.endpoint(&format!("surveys/{survey_id}/responses"))),
                Auth::Bearer,
            )
            .await?;
        Ok(resp.json().await?)
    }

    async fn upload_survey_file(&self, file: &FileRef) -> Result<String, ApiError> {
        let form = reqwest::multipart::Form::new().part("file", file_part(file)?);
        let resp = self
            .send(
                self.client.post(self.endpoint("surveys/upload")).multipart(form),
                Auth::Bearer,
            )
            .await?;
        let payload: UploadedFilePayload = resp.json().await?;
        Ok(payload.file)
    }

    async fn get_all_videos(&self) -> Result<Vec<Video>, ApiError> {
        // Public endpoint — no auth header.
        let resp = self
            .send(self.client.get(self.endpoint("videos")), Auth::Skip)
            .await?;
        Ok(resp.json().await?)
    }

    async fn like_video(&self, video_id: &str) -> Result<Video, ApiError> {
        let resp = self
            .send(
                self.client
                    .post(self.endpoint(&format!("videos/{video_id}/like"))),
                Auth::Bearer,
            )
            .await?;
        Ok(resp.json().await?)
    }

    async fn add_comment(&self, video_id: &str, text: &str) -> Result<Comment, ApiError> {
        let resp = self
            .send(
                self.client
                    .post(self.endpoint(&format!("videos/{video_id}/comments")))
                    .json(&CommentRequest { text }),
                Auth::Bearer,
            )
            .await?;
        Ok(resp.json().await?)
    }

    async fn bookmark_video(&self, video_id: &str) -> Result<Video, ApiError> {
        let resp = self
            .send(
                self.client
                    .post(self.endpoint(&format!("videos/{video_id}/bookmark"))),
                Auth::Bearer,
            )
            .await?;
        Ok(resp.json().await?)
    }

    async fn upload_video(
        &self,
        file: &FileRef,
        title: &str,
        user_id: &str,
    ) -> Result<Video, ApiError> {
        let form = reqwest::multipart::Form::new()
            .part("file", file_part(file)?)
            .text("title", title.to_string())
            .text("userId", user_id.to_string());
        let resp = self
            .send(
                self.client.post(self.endpoint("videos/upload")).multipart(form),
                Auth::Bearer,
            )
            .await?;
        Ok(resp.json().await?)
    }

    async fn get_rewards(&self) -> Result<Vec<Reward>, ApiError> {
        let resp = self
            .send(self.client.get(self.endpoint("rewards")), Auth::Bearer)
            .await?;
        Ok(resp.json().await?)
    }

    async fn claim_reward(&self, reward_id: &str) -> Result<Reward, ApiError> {
        let resp = self
            .send(
                self.client
                    .post(self.endpoint(&format!("rewards/{reward_id}/claim"))),
                Auth::Bearer,
            )
            .await?;
        Ok(resp.json().await?)
    }

    async fn initiate_payment(&self, payment: &NewPayment) -> Result<Payment, ApiError> {
        let resp = self
            .send(
                self.client
                    .post(self.endpoint("payments/initiate"))
                    .json(payment),
                Auth::Bearer,
            )
            .await?;
        Ok(resp.json().await?)
    }

    async fn get_all_payments(&self) -> Result<Vec<Payment>, ApiError> {
        let resp = self
            .send(self.client.get(self.endpoint("payments")), Auth::Bearer)
            .await?;
        Ok(resp.json().await?)
    }

    async fn get_payment_history(&self, user_id: &str) -> Result<Vec<Payment>, ApiError> {
        let resp = self
            .send(
                self.client
                    .get(self.endpoint(&format!("users/{user_id}/payments"))),
                Auth::Bearer,
            )
            .await?;
        Ok(resp.json().await?)
    }

    async fn update_payment_status(
        &self,
        payment_id: &str,
        status: PaymentStatus,
    ) -> Result<Payment, ApiError> {
        let resp = self
            .send(
                self.client
                    .put(self.endpoint(&format!("payments/{payment_id}/status")))
                    .json(&StatusRequest { status }),
                Auth::Bearer,
            )
            .await?;
        Ok(resp.json().await?)
    }
}
