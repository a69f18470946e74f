//! Plain-text rendering of transcript entries for the terminal.

use atmos_core::{
    ErrorBanner, ErrorReporter, WeatherCard,
    transcript::{ChatMessage, MessageBody, Sender},
};

/// Prints errors as they arrive and keeps the banner state for the HTML export.
#[derive(Debug, Clone, Default)]
pub struct TerminalReporter {
    banner: ErrorBanner,
}

impl TerminalReporter {
    pub fn banner(&self) -> &ErrorBanner {
        &self.banner
    }
}

impl ErrorReporter for TerminalReporter {
    fn clear(&self) {
        self.banner.clear();
    }

    fn show_error(&self, message: &str) {
        self.banner.show_error(message);
        eprintln!("⚠️  {message}");
    }
}

pub fn format_message(message: &ChatMessage) -> String {
    let prefix = match message.sender {
        Sender::User => "you",
        Sender::Bot => "atmos",
    };

    match &message.body {
        MessageBody::Text(text) => format!("[{prefix}] {text}"),
        MessageBody::Markdown { source, .. } => format!("[{prefix}] {}", source.trim_end()),
        MessageBody::Card(card) => format!("[{prefix}]\n{}", format_card(card)),
    }
}

pub fn format_card(card: &WeatherCard) -> String {
    let mut lines = Vec::new();

    if let Some(heading) = card.heading() {
        lines.push(heading.to_string());
    }
    lines.push(format!("  ({})", card.icon().alt));

    for stat in card.stats() {
        lines.push(format!("  {:<14} {}", stat.label, stat.value));
    }

    if let Some(text) = card.toggle_text() {
        lines.push(format!("  {text}"));
    }

    if card.is_expanded() {
        lines.push(String::new());
        lines.push(card.narrative_markdown().trim().to_string());
        if let Some(warnings) = card.warnings_markdown() {
            lines.push(String::new());
            lines.push("⚠️ Weather Warnings".to_string());
            lines.push(warnings.trim().to_string());
        }
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use atmos_core::{
        CommonMark, ForecastResponse, RenderStyle, Variant, WeatherData, model::DisasterWarning,
    };

    fn card(variant: Variant) -> WeatherCard {
        let mut warnings = std::collections::BTreeMap::new();
        warnings.insert("heat".to_string(), DisasterWarning::default());

        let response = ForecastResponse {
            date: "2025-05-10".into(),
            forecast: "Hot and bright.\n\nWeather Warnings: stay hydrated".into(),
            disaster_warnings: warnings,
            data_used: WeatherData {
                temperature_2m: 35.0,
                relative_humidity_2m: 30.0,
                precipitation: 0.0,
                wind_speed_10m: 8.0,
            },
        };
        WeatherCard::build(&response, &RenderStyle::for_variant(variant), &CommonMark)
    }

    #[test]
    fn collapsed_card_hides_narrative() {
        let text = format_card(&card(Variant::Chat));
        assert!(text.starts_with("Weather forecast for Saturday, May 10, 2025"));
        assert!(text.contains("(Sunny Weather)"));
        assert!(text.contains("Temperature    35.0°C"));
        assert!(text.contains("Show Detailed Forecast ▼"));
        assert!(!text.contains("Hot and bright."));
    }

    #[test]
    fn expanded_card_shows_narrative_and_warnings() {
        let mut c = card(Variant::Chat);
        c.toggle();
        let text = format_card(&c);
        assert!(text.contains("Hide Detailed Forecast ▲"));
        assert!(text.contains("Hot and bright."));
        assert!(text.contains("⚠️ Weather Warnings\nstay hydrated"));
    }

    #[test]
    fn user_lines_are_prefixed() {
        let msg = ChatMessage {
            sender: Sender::User,
            body: MessageBody::Text("Date: 2025-05-10 (200 words report)".into()),
        };
        assert_eq!(format_message(&msg), "[you] Date: 2025-05-10 (200 words report)");
    }
}
