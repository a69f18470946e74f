use tracing::{error, info, instrument};

use crate::{
    card::WeatherCard,
    client::{ForecastClient, ForecastError},
    markdown::{CommonMark, MarkdownRenderer},
    model::ForecastRequest,
    report::ErrorReporter,
    style::{ClearPolicy, RenderStyle},
    toggle::ToggleState,
    transcript::{Sender, Transcript, WELCOME_MESSAGE},
};

/// Raw values of the two form fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormState {
    /// ISO date as produced by the picker; empty once cleared.
    pub date: String,
    /// Selected word count, unparsed.
    pub report_length: String,
}

/// One chat front end: form, transcript and error channel wired to a forecast client.
#[derive(Debug)]
pub struct ForecastSession {
    client: Box<dyn ForecastClient>,
    reporter: Box<dyn ErrorReporter>,
    markdown: Box<dyn MarkdownRenderer>,
    style: RenderStyle,
    transcript: Transcript,
    pub form: FormState,
}

impl ForecastSession {
    pub fn new(
        client: Box<dyn ForecastClient>,
        reporter: Box<dyn ErrorReporter>,
        style: RenderStyle,
    ) -> Self {
        Self::with_markdown(client, reporter, style, Box::new(CommonMark))
    }

    pub fn with_markdown(
        client: Box<dyn ForecastClient>,
        reporter: Box<dyn ErrorReporter>,
        style: RenderStyle,
        markdown: Box<dyn MarkdownRenderer>,
    ) -> Self {
        let transcript = if style.placeholder_welcome {
            Transcript::with_placeholder(style.variant, WELCOME_MESSAGE)
        } else {
            let mut t = Transcript::new(style.variant);
            t.append_message(Sender::Bot, WELCOME_MESSAGE, markdown.as_ref());
            t
        };

        Self { client, reporter, markdown, style, transcript, form: FormState::default() }
    }

    pub fn style(&self) -> &RenderStyle {
        &self.style
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn reporter(&self) -> &dyn ErrorReporter {
        self.reporter.as_ref()
    }

    /// Submit the current form.
    ///
    /// The user's summary line is appended before the request goes out. On success the
    /// forecast card is appended and its transcript index returned. Failures have already
    /// been shown through the reporter when they are returned.
    #[instrument(skip(self), fields(date = %self.form.date, report_length = %self.form.report_length))]
    pub async fn submit(&mut self) -> Result<usize, ForecastError> {
        let date = self.form.date.clone();
        let report_length = self.form.report_length.clone();

        self.reporter.clear();
        let summary = self.style.request_summary(&date, &report_length);
        self.transcript.append_message(Sender::User, &summary, self.markdown.as_ref());

        let request = ForecastRequest::from_form(date, &report_length);
        let result = self.client.submit_forecast(&request).await;

        let outcome = match result {
            Ok(response) => {
                info!(warnings = response.disaster_warnings.len(), "forecast received");
                let card = WeatherCard::build(&response, &self.style, self.markdown.as_ref());
                Ok(self.transcript.append_card(card, self.style.card_scroll))
            }
            Err(err) => {
                error!(error = %err, "forecast submission failed");
                self.reporter.show_error(&err.to_string());
                Err(err)
            }
        };

        let clear = match self.style.clear_date {
            ClearPolicy::Always => true,
            ClearPolicy::OnSuccess => outcome.is_ok(),
        };
        if clear {
            self.form.date.clear();
        }

        outcome
    }

    /// Flip the card at `index`; `None` when that message is not a card.
    pub fn toggle_card(&mut self, index: usize) -> Option<ToggleState> {
        self.transcript.card_mut(index).map(WeatherCard::toggle)
    }

    pub fn card(&self, index: usize) -> Option<&WeatherCard> {
        match self.transcript.messages().get(index).map(|m| &m.body) {
            Some(crate::transcript::MessageBody::Card(card)) => Some(card.as_ref()),
            _ => None,
        }
    }
}
