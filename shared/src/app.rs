use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::capabilities::{Capabilities, TokenSession};
use crate::client::ApiClient;
use crate::config::ClientConfig;
use crate::error::{ApiError, ApiResult};
use crate::event::Event;
use crate::guard::{Deactivation, DirtyTracking, EditForm, PreventUnsavedChanges};
use crate::model::{Message, UserId};
use crate::thread::{MessageThread, ThreadViewModel};

pub const NOT_SIGNED_IN: &str = "Not signed in";

/// Where a request to leave the profile editor stands.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LeaveState {
    #[default]
    Idle,
    Confirming,
    Allowed,
    Declined,
}

#[derive(Default, Debug)]
pub struct Model {
    pub client: Option<ApiClient>,
    pub thread: Option<MessageThread>,
    pub profile: EditForm,
    pub guard: PreventUnsavedChanges,
    pub leave: LeaveState,
    pub error: Option<ApiError>,
}

impl Model {
    fn client(&self) -> ApiResult<&ApiClient> {
        self.client
            .as_ref()
            .ok_or_else(|| ApiError::new(NOT_SIGNED_IN))
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct ViewModel {
    pub user_id: Option<UserId>,
    pub thread: Option<ThreadViewModel>,
    pub profile_dirty: bool,
    pub leave: LeaveState,
    pub error: Option<String>,
}

#[derive(Default)]
pub struct App;

impl App {
    fn start_session(config: ClientConfig, token: String) -> ApiResult<ApiClient> {
        let session = TokenSession::from_jwt(token).map_err(|e| ApiError::new(e.to_string()))?;
        ApiClient::new(config, Arc::new(session)).map_err(|e| ApiError::new(e.to_string()))
    }

    fn open_thread(recipient_id: UserId, model: &mut Model, caps: &Capabilities) {
        let client = match model.client() {
            Ok(client) => client,
            Err(err) => {
                model.error = Some(err);
                return;
            }
        };

        let mut thread = MessageThread::new(recipient_id);
        let viewer = client.session().user_id();
        match client.get_message_thread(viewer, recipient_id) {
            Ok(call) => call.send(&caps.api, move |result| Event::ThreadLoaded {
                recipient_id,
                result,
            }),
            Err(err) => thread.record_error(err),
        }
        model.thread = Some(thread);
    }

    /// Stores the fetched thread and fires one read receipt per unread
    /// message addressed to the viewer.
    fn thread_loaded(
        recipient_id: UserId,
        result: ApiResult<Vec<Message>>,
        model: &mut Model,
        caps: &Capabilities,
    ) {
        let (Some(client), Some(thread)) = (&model.client, &mut model.thread) else {
            return;
        };
        if thread.recipient_id() != recipient_id {
            debug!(%recipient_id, "dropping response for a thread that is no longer open");
            return;
        }

        let viewer = client.session().user_id();
        for message_id in thread.thread_loaded(viewer, result) {
            let sent = client.mark_read(&caps.http, viewer, message_id, move |result| {
                Event::ReadReceiptSent { message_id, result }
            });
            if let Err(err) = sent {
                warn!(%message_id, "read receipt not sent: {err}");
            }
        }
    }

    fn send_message(model: &mut Model, caps: &Capabilities) {
        let (Some(client), Some(thread)) = (&model.client, &mut model.thread) else {
            return;
        };

        let viewer = client.session().user_id();
        let recipient_id = thread.recipient_id();
        match client.send_message(viewer, thread.outgoing()) {
            Ok(call) => call.send(&caps.api, move |result| Event::MessageSent {
                recipient_id,
                result,
            }),
            Err(err) => thread.record_error(err),
        }
    }

    fn save_profile(patch: &serde_json::Value, model: &mut Model, caps: &Capabilities) {
        let call = model.client().and_then(|client| {
            let user_id = client.session().user_id();
            client.update_user(user_id, patch)
        });
        match call {
            Ok(call) => call.send(&caps.api, Event::ProfileSaved),
            Err(err) => model.error = Some(err),
        }
    }
}

impl crux_core::App for App {
    type Event = Event;
    type Model = Model;
    type ViewModel = ViewModel;
    type Capabilities = Capabilities;

    fn update(&self, event: Event, model: &mut Model, caps: &Capabilities) {
        match event {
            Event::SessionStarted { config, token } => {
                match Self::start_session(config, token) {
                    Ok(client) => {
                        info!(user_id = %client.session().user_id(), "session started");
                        model.client = Some(client);
                        model.error = None;
                    }
                    Err(err) => {
                        warn!("could not start session: {err}");
                        model.client = None;
                        model.error = Some(err);
                    }
                }
                caps.render.render();
            }

            Event::SessionEnded => {
                *model = Model::default();
                caps.render.render();
            }

            Event::OpenThread { recipient_id } => {
                Self::open_thread(recipient_id, model, caps);
                caps.render.render();
            }

            Event::ThreadLoaded {
                recipient_id,
                result,
            } => {
                Self::thread_loaded(recipient_id, result, model, caps);
                caps.render.render();
            }

            Event::ReadReceiptSent { message_id, result } => match result {
                Ok(()) => debug!(%message_id, "message marked as read"),
                Err(err) => warn!(%message_id, "read receipt failed: {err}"),
            },

            Event::DraftChanged(content) => {
                if let Some(thread) = &mut model.thread {
                    thread.set_draft_content(content);
                }
                caps.render.render();
            }

            Event::SendMessage => {
                Self::send_message(model, caps);
                caps.render.render();
            }

            Event::MessageSent {
                recipient_id,
                result,
            } => {
                match &mut model.thread {
                    Some(thread) if thread.recipient_id() == recipient_id => {
                        thread.message_sent(result);
                    }
                    _ => debug!(%recipient_id, "dropping send result for a closed thread"),
                }
                caps.render.render();
            }

            Event::CloseThread => {
                model.thread = None;
                caps.render.render();
            }

            Event::ProfileEdited => {
                model.profile.mark_dirty();
                model.leave = LeaveState::Idle;
                caps.render.render();
            }

            Event::SaveProfile(patch) => {
                Self::save_profile(&patch, model, caps);
                caps.render.render();
            }

            Event::ProfileSaved(result) => {
                match result {
                    Ok(()) => {
                        model.profile.mark_pristine();
                        model.error = None;
                    }
                    Err(err) => model.error = Some(err),
                }
                caps.render.render();
            }

            Event::LeaveRequested => {
                model.leave =
                    match model
                        .guard
                        .can_deactivate(&model.profile, &caps.confirm, Event::LeaveDecided)
                    {
                        Deactivation::Allowed => LeaveState::Allowed,
                        Deactivation::AwaitingConfirmation => LeaveState::Confirming,
                    };
                caps.render.render();
            }

            Event::LeaveDecided(leave) => {
                model.leave = if leave {
                    LeaveState::Allowed
                } else {
                    LeaveState::Declined
                };
                caps.render.render();
            }
        }
    }

    fn view(&self, model: &Model) -> ViewModel {
        let user_id = model.client.as_ref().map(|c| c.session().user_id());
        ViewModel {
            user_id,
            thread: model
                .thread
                .as_ref()
                .zip(user_id)
                .map(|(thread, viewer)| thread.view(viewer)),
            profile_dirty: model.profile.is_dirty(),
            leave: model.leave,
            error: model.error.as_ref().map(|e| e.message().to_string()),
        }
    }
}
