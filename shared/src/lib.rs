// lib.rs - member client core

#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::too_many_lines)]

pub mod app;
pub mod capabilities;
pub mod client;
pub mod config;
pub mod error;
pub mod event;
pub mod guard;
pub mod model;
pub mod pagination;
pub mod thread;

pub use app::{App, LeaveState, Model, ViewModel};
pub use capabilities::{
    ApiOutput, ApiRequest, ApiResponse, Capabilities, ConfirmRequest, Effect, Session,
    TokenSession, TransportError,
};
pub use client::{ApiClient, Call};
pub use config::{ClientConfig, ConfigError};
pub use error::{ApiError, ApiResult};
pub use event::Event;
pub use guard::{Deactivation, DirtyTracking, EditForm, PreventUnsavedChanges};
pub use model::{
    LikesMode, Message, MessageContainer, MessageDraft, MessageId, PhotoId, User, UserId,
    UserParams,
};
pub use pagination::{PaginatedResult, Pagination};
pub use thread::{MessageThread, ThreadViewModel};
