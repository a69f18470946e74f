use std::fmt::Write as _;

use crate::{
    card::WeatherCard,
    markdown::{MarkdownRenderer, escape_html},
    page::ids,
    style::{ScrollBehavior, Variant},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sender {
    User,
    Bot,
}

impl Sender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sender::User => "user",
            Sender::Bot => "bot",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum MessageBody {
    /// Literal text; escaped whenever it is turned into markup.
    Text(String),
    /// Bot markdown together with the HTML it rendered to.
    Markdown { source: String, html: String },
    Card(Box<WeatherCard>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChatMessage {
    pub sender: Sender,
    pub body: MessageBody,
}

pub const WELCOME_MESSAGE: &str = "Welcome to Atmos - AI Powered weather forecaster.\n\n\
     Please select a date (available until 18 February 2026) to get a weather forecast.";

/// Append-only list of chat messages, oldest first.
///
/// The only thing ever removed is the welcome placeholder, and only in layouts that use one.
#[derive(Debug)]
pub struct Transcript {
    variant: Variant,
    placeholder: Option<String>,
    messages: Vec<ChatMessage>,
    scroll: Option<Scroll>,
}

/// Where the view was last scrolled to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scroll {
    pub index: usize,
    pub behavior: ScrollBehavior,
}

impl Transcript {
    pub fn new(variant: Variant) -> Self {
        Self { variant, placeholder: None, messages: Vec::new(), scroll: None }
    }

    /// Start with a welcome text that goes away once the conversation is underway.
    pub fn with_placeholder(variant: Variant, text: impl Into<String>) -> Self {
        Self { placeholder: Some(text.into()), ..Self::new(variant) }
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn placeholder(&self) -> Option<&str> {
        self.placeholder.as_deref()
    }

    pub fn scroll(&self) -> Option<Scroll> {
        self.scroll
    }

    /// Bot text is markdown and becomes HTML; user text stays literal.
    pub fn append_message(
        &mut self,
        sender: Sender,
        content: &str,
        markdown: &dyn MarkdownRenderer,
    ) -> usize {
        // The placeholder counts as the first child; it goes once a real message is already there.
        if !self.messages.is_empty() {
            self.placeholder = None;
        }

        let body = match sender {
            Sender::Bot => MessageBody::Markdown {
                source: content.to_string(),
                html: markdown.to_html(content),
            },
            Sender::User => MessageBody::Text(content.to_string()),
        };
        self.push(ChatMessage { sender, body }, ScrollBehavior::Instant)
    }

    pub fn append_card(&mut self, card: WeatherCard, scroll: ScrollBehavior) -> usize {
        self.push(ChatMessage { sender: Sender::Bot, body: MessageBody::Card(Box::new(card)) }, scroll)
    }

    fn push(&mut self, message: ChatMessage, behavior: ScrollBehavior) -> usize {
        self.messages.push(message);
        let index = self.messages.len() - 1;
        self.scroll = Some(Scroll { index, behavior });
        index
    }

    pub fn card_mut(&mut self, index: usize) -> Option<&mut WeatherCard> {
        match self.messages.get_mut(index).map(|m| &mut m.body) {
            Some(MessageBody::Card(card)) => Some(card.as_mut()),
            _ => None,
        }
    }

    fn message_class(&self, sender: Sender) -> String {
        match self.variant {
            Variant::Classic => format!("chat-message {}", sender.as_str()),
            Variant::Chat => format!("message {}-message", sender.as_str()),
        }
    }

    pub fn to_html(&self) -> String {
        let mut out = format!(r#"<div id="{}" class="chat-container""#, ids::TRANSCRIPT);
        if let Some(scroll) = self.scroll {
            let _ = write!(
                out,
                r#" data-scroll-to="{}" data-scroll-behavior="{}""#,
                scroll.index,
                scroll.behavior.as_str()
            );
        }
        out.push('>');

        if let Some(welcome) = &self.placeholder {
            let _ = write!(
                out,
                r#"<div class="welcome-message">{}</div>"#,
                escape_html(welcome)
            );
        }

        for message in &self.messages {
            let inner = match &message.body {
                MessageBody::Text(text) => escape_html(text),
                MessageBody::Markdown { html, .. } => html.clone(),
                MessageBody::Card(card) => card.to_html(),
            };
            let _ = write!(
                out,
                r#"<div class="{}">{}</div>"#,
                self.message_class(message.sender),
                inner
            );
        }

        out.push_str("</div>");
        out
    }
}
