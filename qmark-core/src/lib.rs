//! # qmark-core
//!
//! Core types and traits for the question-mark stats bot: [`Bot`], [`Handler`], message/author/chat types,
//! the [`QmarkError`] taxonomy and tracing initialization. Transport-agnostic; used by qmark-stats,
//! handler-chain and qmark-bot.

pub mod bot;
pub mod error;
pub mod logger;
pub mod types;

pub use bot::{Bot, ImageArtifact, PinOutcome};
pub use error::{QmarkError, Result};
pub use logger::init_tracing;
pub use types::{
    Author, Chat, ChatType, Handler, HandlerResponse, Message, MessageKind, ToCoreMessage,
};
