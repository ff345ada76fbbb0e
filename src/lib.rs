pub mod augment;
pub mod booking;
pub mod config;
pub mod conversation;
pub mod enrich;
pub mod error;
pub mod gateway;
pub mod intent;
pub mod locale;
pub mod models;
pub mod server;
pub mod service;
pub mod transport;

pub use crate::config::Config;
pub use crate::error::{AdvisorError, GatewayError, Result};
pub use crate::models::ConversationTurn;
pub use crate::service::AdvisorService;
