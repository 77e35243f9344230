//! Handing the finished block to the dialogue-generation collaborator.

/// Separator between an existing prompt and an appended block.
pub const PROMPT_SEPARATOR: &str = "\n\n";

/// The channels a dialogue request exposes.
///
/// The persistent context channel is preferred; the one-shot message channel
/// is the fallback.
pub trait PromptTarget {
    /// Slot for context that persists across turns, if the collaborator has one.
    fn context_channel(&mut self) -> Option<&mut String> {
        None
    }

    /// The prompt text of this one request.
    fn message_channel(&mut self) -> Option<&mut String>;
}

/// Which channel received a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryChannel {
    Context,
    Message,
}

/// Deliver `block`. The context channel is overwritten with the current
/// block; the message channel gets it appended.
pub fn deliver(target: &mut dyn PromptTarget, block: &str) -> Option<DeliveryChannel> {
    if let Some(context) = target.context_channel() {
        context.clear();
        context.push_str(block);
        tracing::debug!("Delivered situation block to context channel");
        return Some(DeliveryChannel::Context);
    }

    if let Some(message) = target.message_channel() {
        if !message.is_empty() {
            message.push_str(PROMPT_SEPARATOR);
        }
        message.push_str(block);
        tracing::debug!("Appended situation block to message channel");
        return Some(DeliveryChannel::Message);
    }

    tracing::warn!("Prompt target exposes no channel; situation block dropped");
    None
}

/// A plain dialogue request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TalkRequest {
    pub prompt: String,
    /// Present only when the collaborator supports persistent context.
    pub context: Option<String>,
}

impl TalkRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            context: None,
        }
    }

    pub fn with_context_channel(mut self) -> Self {
        self.context.get_or_insert_with(String::new);
        self
    }
}

impl PromptTarget for TalkRequest {
    fn context_channel(&mut self) -> Option<&mut String> {
        self.context.as_mut()
    }

    fn message_channel(&mut self) -> Option<&mut String> {
        Some(&mut self.prompt)
    }
}
