//! # Handler chain
//!
//! Runs every handler's `before` in order, then `handle` until one returns Stop. Any `before`
//! returning false stops the chain.
//!
//! The two phases are also exposed separately ([`HandlerChain::run_before`], [`HandlerChain::run_handle`])
//! so a caller can finish the before phase inline and move the handle phase onto its own task.

use qmark_core::{Handler, HandlerResponse, Message, Result};
use std::sync::Arc;
use tracing::{debug, info, instrument};

#[derive(Clone, Default)]
pub struct HandlerChain {
    handlers: Vec<Arc<dyn Handler>>,
}

impl HandlerChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a handler; both phases visit handlers in insertion order.
    pub fn add_handler(mut self, handler: Arc<dyn Handler>) -> Self {
        self.handlers.push(handler);
        self
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    #[instrument(skip(self, message), fields(chat_id = message.chat.id, message_id = message.id))]
    pub async fn handle(&self, message: &Message) -> Result<HandlerResponse> {
        info!(author_id = message.author.id, "step: handler_chain started");

        if !self.run_before(message).await? {
            return Ok(HandlerResponse::Stop);
        }
        let response = self.run_handle(message).await?;

        info!("step: handler_chain finished");
        Ok(response)
    }

    /// Before phase. False when a handler stopped the chain.
    pub async fn run_before(&self, message: &Message) -> Result<bool> {
        for handler in &self.handlers {
            if !handler.before(message).await? {
                let name = std::any::type_name_of_val(handler.as_ref());
                info!(handler = %name, "step: handler before returned false, chain stopped");
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Handle phase, up to the first Stop.
    pub async fn run_handle(&self, message: &Message) -> Result<HandlerResponse> {
        for handler in &self.handlers {
            let name = std::any::type_name_of_val(handler.as_ref());
            let response = handler.handle(message).await?;
            debug!(handler = %name, response = ?response, "Handler processed");

            match response {
                HandlerResponse::Stop => {
                    info!(handler = %name, "step: handler chain stopped by handler");
                    return Ok(response);
                }
                HandlerResponse::Continue | HandlerResponse::Ignore => continue,
            }
        }
        Ok(HandlerResponse::Continue)
    }
}
