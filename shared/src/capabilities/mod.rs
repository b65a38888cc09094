mod api;
mod confirm;
mod session;

pub use self::api::{
    Api, ApiOutput, ApiRequest, ApiResponse, ApiUrl, Headers, Method, RequestError,
    TransportError,
};
pub use self::confirm::{Confirm, ConfirmRequest};
pub use self::session::{FixedSession, Session, SessionError, TokenSession};

pub use crux_core::render::Render;
pub use crux_http::Http;

use crate::event::Event;

/// Effects the core asks the shell to perform.
///
/// `api` carries calls whose failures are shown to the user and so need the
/// full response. `http` carries read receipts, whose outcome is only logged.
#[derive(crux_core::macros::Effect)]
pub struct Capabilities {
    pub api: Api<Event>,
    pub http: Http<Event>,
    pub confirm: Confirm<Event>,
    pub render: Render<Event>,
}
