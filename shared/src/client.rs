//! Typed access to the members REST API.
//!
//! Each operation builds one [`Call`]: the request plus how to read its
//! answer. The call goes out through the [`Api`] capability, and the result
//! comes back already normalized to an [`ApiError`](crate::error::ApiError).

use std::sync::Arc;

use crux_http::Http;
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, instrument, warn};
use url::Url;

use crate::capabilities::{Api, ApiOutput, ApiRequest, ApiResponse, ApiUrl, Method, Session};
use crate::config::{ClientConfig, ConfigError};
use crate::error::{
    normalize_decode_error, normalize_response_with, normalize_transport_error, ApiError,
    ApiResult,
};
use crate::model::{
    LikesMode, Message, MessageContainer, MessageDraft, MessageId, PhotoId, User, UserId,
    UserParams,
};
use crate::pagination::{paginate, PaginatedResult, QueryBuilder};

type Decode<T> = fn(&ApiResponse, &ClientConfig) -> ApiResult<T>;

/// One request and the way to turn its answer into `T`.
pub struct Call<T> {
    request: ApiRequest,
    expect: Expect<T>,
}

struct Expect<T> {
    method: Method,
    path: String,
    config: Arc<ClientConfig>,
    decode: Decode<T>,
}

impl<T: 'static> Call<T> {
    pub fn request(&self) -> &ApiRequest {
        &self.request
    }

    /// Interprets what the shell answered for this call.
    pub fn complete(self, output: ApiOutput) -> ApiResult<T> {
        self.expect.complete(output)
    }

    pub fn send<Ev, F>(self, api: &Api<Ev>, callback: F)
    where
        Ev: Send + 'static,
        F: FnOnce(ApiResult<T>) -> Ev + Send + 'static,
    {
        let Call { request, expect } = self;
        debug!(method = %expect.method, path = %expect.path, "sending request");
        api.execute(request, move |output| callback(expect.complete(output)));
    }
}

impl<T> Expect<T> {
    fn complete(self, output: ApiOutput) -> ApiResult<T> {
        let response = output.map_err(|e| normalize_transport_error(&e))?;

        if !response.is_success() {
            let err = normalize_response_with(&response, &self.config.application_error_header);
            warn!(
                method = %self.method,
                path = %self.path,
                status = response.status(),
                "request failed: {err}"
            );
            return Err(err);
        }

        (self.decode)(&response, &self.config)
    }
}

fn decode_json<T: DeserializeOwned>(response: &ApiResponse, _: &ClientConfig) -> ApiResult<T> {
    response.json().map_err(|e| normalize_decode_error(&e))
}

fn decode_page<T: DeserializeOwned>(
    response: &ApiResponse,
    config: &ClientConfig,
) -> ApiResult<PaginatedResult<T>> {
    paginate(response, &config.pagination_header).map_err(|e| normalize_decode_error(&e))
}

fn decode_nothing(_: &ApiResponse, _: &ClientConfig) -> ApiResult<()> {
    Ok(())
}

#[derive(Clone, Debug)]
pub struct ApiClient {
    root: Url,
    config: Arc<ClientConfig>,
    session: Arc<dyn Session>,
}

impl ApiClient {
    pub fn new(config: ClientConfig, session: Arc<dyn Session>) -> Result<Self, ConfigError> {
        config.validate()?;
        let root = config.api_root()?;
        Ok(Self {
            root,
            config: Arc::new(config),
            session,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn session(&self) -> &dyn Session {
        self.session.as_ref()
    }

    // --- Users ---

    #[instrument(skip(self))]
    pub fn list_users(
        &self,
        page: Option<u32>,
        items_per_page: Option<u32>,
        filter: Option<&UserParams>,
        likes: Option<LikesMode>,
    ) -> ApiResult<Call<PaginatedResult<Vec<User>>>> {
        let query = QueryBuilder::new()
            .page(page, items_per_page)
            .likes(likes)
            .filter(filter)
            .build();

        let request = self.request(Method::Get, "users")?.query(query.iter());
        Ok(self.call(request, decode_page))
    }

    #[instrument(skip(self))]
    pub fn get_user(&self, id: UserId) -> ApiResult<Call<User>> {
        let request = self.request(Method::Get, &format!("users/{id}"))?;
        Ok(self.call(request, decode_json))
    }

    #[instrument(skip(self, patch))]
    pub fn update_user<P>(&self, id: UserId, patch: &P) -> ApiResult<Call<()>>
    where
        P: Serialize + ?Sized,
    {
        let request = self
            .request(Method::Put, &format!("users/{id}"))?
            .json(patch)?;
        Ok(self.call(request, decode_nothing))
    }

    // --- Photos ---

    #[instrument(skip(self))]
    pub fn set_main_photo(&self, user_id: UserId, photo_id: PhotoId) -> ApiResult<Call<()>> {
        let request = self
            .request(
                Method::Post,
                &format!("users/{user_id}/photos/{photo_id}/setmain"),
            )?
            .json(&empty_body())?;
        Ok(self.call(request, decode_nothing))
    }

    /// Whether deleting an already-deleted photo succeeds is the server's call.
    #[instrument(skip(self))]
    pub fn delete_photo(&self, user_id: UserId, photo_id: PhotoId) -> ApiResult<Call<()>> {
        let request = self.request(Method::Delete, &format!("users/{user_id}/photos/{photo_id}"))?;
        Ok(self.call(request, decode_nothing))
    }

    // --- Likes ---

    #[instrument(skip(self))]
    pub fn send_like(&self, from_id: UserId, to_id: UserId) -> ApiResult<Call<()>> {
        let request = self
            .request(Method::Post, &format!("users/{from_id}/like/{to_id}"))?
            .json(&empty_body())?;
        Ok(self.call(request, decode_nothing))
    }

    // --- Messages ---

    #[instrument(skip(self))]
    pub fn list_messages(
        &self,
        user_id: UserId,
        page: Option<u32>,
        items_per_page: Option<u32>,
        container: MessageContainer,
    ) -> ApiResult<Call<PaginatedResult<Vec<Message>>>> {
        let query = QueryBuilder::new()
            .container(container)
            .page(page, items_per_page)
            .build();

        let request = self
            .request(Method::Get, &format!("users/{user_id}/messages"))?
            .query(query.iter());
        Ok(self.call(request, decode_page))
    }

    #[instrument(skip(self))]
    pub fn get_message_thread(
        &self,
        user_id: UserId,
        other_id: UserId,
    ) -> ApiResult<Call<Vec<Message>>> {
        let request = self.request(
            Method::Get,
            &format!("users/{user_id}/messages/thread/{other_id}"),
        )?;
        Ok(self.call(request, decode_json))
    }

    #[instrument(skip(self, draft), fields(recipient_id = ?draft.recipient_id))]
    pub fn send_message(&self, user_id: UserId, draft: &MessageDraft) -> ApiResult<Call<Message>> {
        let request = self
            .request(Method::Post, &format!("users/{user_id}/messages"))?
            .json(draft)?;
        Ok(self.call(request, decode_json))
    }

    /// The server hides the message from `user_id`'s side of the conversation.
    #[instrument(skip(self))]
    pub fn delete_message(&self, message_id: MessageId, user_id: UserId) -> ApiResult<Call<()>> {
        let request = self
            .request(Method::Post, &format!("users/{user_id}/messages/{message_id}"))?
            .json(&empty_body())?;
        Ok(self.call(request, decode_nothing))
    }

    /// Best-effort read receipt.
    ///
    /// Goes out on the shell's HTTP effect and nothing waits on it. `on_done`
    /// gets the outcome so the app can log it; a failed receipt is not retried.
    #[instrument(skip(self, http, on_done))]
    pub fn mark_read<Ev, F>(
        &self,
        http: &Http<Ev>,
        user_id: UserId,
        message_id: MessageId,
        on_done: F,
    ) -> ApiResult<()>
    where
        Ev: Send + 'static,
        F: FnOnce(Result<(), String>) -> Ev + Send + 'static,
    {
        let url = self.url(&format!("users/{user_id}/messages/{message_id}/read"))?;

        let mut builder = http.post(url.as_str());
        if let Some(token) = self.session.bearer_token() {
            let value = format!("Bearer {token}");
            builder = builder.header("Authorization", value.as_str());
        }
        let builder = builder
            .body_json(&empty_body())
            .map_err(|e| ApiError::new(e.to_string()))?;

        builder.send(move |result| on_done(result.map(drop).map_err(|e| e.to_string())));
        Ok(())
    }

    // --- Plumbing ---

    fn url(&self, path: &str) -> ApiResult<ApiUrl> {
        let url = self.root.join(path).map_err(|e| {
            ApiError::new(format!("invalid URL '{path}': {e}"))
        })?;
        Ok(ApiUrl::try_from(url)?)
    }

    fn request(&self, method: Method, path: &str) -> ApiResult<ApiRequest> {
        let mut request = ApiRequest::new(method, self.url(path)?);
        if let Some(token) = self.session.bearer_token() {
            request = request.header("Authorization", format!("Bearer {token}"))?;
        }
        Ok(request)
    }

    fn call<T>(&self, request: ApiRequest, decode: Decode<T>) -> Call<T> {
        let expect = Expect {
            method: request.method(),
            path: request.url().path().to_string(),
            config: Arc::clone(&self.config),
            decode,
        };
        Call { request, expect }
    }
}

fn empty_body() -> serde_json::Map<String, serde_json::Value> {
    serde_json::Map::new()
}
