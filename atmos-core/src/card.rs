use chrono::NaiveDate;
use regex::Regex;
use std::{fmt::Write as _, sync::LazyLock};

use crate::{
    markdown::{MarkdownRenderer, escape_html},
    model::{ForecastResponse, WeatherData},
    style::{IconPolicy, RenderStyle, Variant, WarningLayout, WeatherIcon},
    toggle::{ToggleState, ToggleStyle},
};

const WARNINGS_HEADING: &str = "Weather Warnings:";

/// The warnings section runs from its heading to the next blank line or the end of the text.
/// The terminator is captured so replacements can put it back.
static WARNINGS_SECTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)(Weather Warnings:.*?)(\n\n|\z)").expect("warnings pattern is valid")
});

#[derive(Debug, Clone, PartialEq)]
pub struct Stat {
    pub label: &'static str,
    pub value: String,
}

/// Enough fractional digits to print any finite `f64` exactly.
const EXACT_DIGITS: usize = 1100;

/// Fixed-point text with exact halfway values rounded away from zero, the way a browser's
/// `Number.prototype.toFixed` does. `{:.N}` alone rounds those ties to even.
pub fn to_fixed(value: f64, precision: usize) -> String {
    let rounded = format!("{value:.precision$}");
    if !value.is_finite() || precision >= EXACT_DIGITS {
        return rounded;
    }

    let exact = format!("{:.*}", EXACT_DIGITS, value.abs());
    let Some((whole, frac)) = exact.split_once('.') else {
        return rounded;
    };
    let (kept, rest) = frac.split_at(precision);
    let tie = rest.starts_with('5') && rest[1..].bytes().all(|b| b == b'0');
    if !tie {
        return rounded;
    }

    let mut digits: Vec<u8> = whole.bytes().chain(kept.bytes()).collect();
    let mut carry = true;
    for d in digits.iter_mut().rev() {
        if *d == b'9' {
            *d = b'0';
        } else {
            *d += 1;
            carry = false;
            break;
        }
    }
    if carry {
        digits.insert(0, b'1');
    }

    let mut out = String::with_capacity(digits.len() + 2);
    if value.is_sign_negative() {
        out.push('-');
    }
    let split = digits.len() - precision;
    out.extend(digits[..split].iter().map(|&b| char::from(b)));
    if precision > 0 {
        out.push('.');
        out.extend(digits[split..].iter().map(|&b| char::from(b)));
    }
    out
}

/// Four stats in display order: temperature, humidity, precipitation, wind speed.
pub fn format_stats(data: &WeatherData, precision: usize) -> [Stat; 4] {
    let fmt = |v: f64, unit: &str| format!("{}{unit}", to_fixed(v, precision));
    [
        Stat { label: "Temperature", value: fmt(data.temperature_2m, "°C") },
        Stat { label: "Humidity", value: fmt(data.relative_humidity_2m, "%") },
        Stat { label: "Precipitation", value: fmt(data.precipitation, "mm") },
        Stat { label: "Wind Speed", value: fmt(data.wind_speed_10m, "km/h") },
    ]
}

#[derive(Debug, Clone, PartialEq)]
pub struct CardIcon {
    pub icon: WeatherIcon,
    pub src: String,
    pub alt: String,
}

/// Narrative split according to a [`WarningLayout`].
#[derive(Debug, Clone, PartialEq)]
struct SplitNarrative {
    /// Markdown for the main body, possibly with inline highlight markup.
    body: String,
    /// Markdown for a separate warnings block.
    warnings: Option<String>,
}

fn split_warnings(forecast: &str, has_warnings: bool, layout: WarningLayout) -> SplitNarrative {
    if !has_warnings {
        return SplitNarrative { body: forecast.to_string(), warnings: None };
    }

    match layout {
        WarningLayout::Inline => SplitNarrative {
            body: WARNINGS_SECTION
                .replace_all(forecast, r#"<div class="highlighted-warnings">${1}</div>${2}"#)
                .into_owned(),
            warnings: None,
        },
        WarningLayout::Separate => {
            let Some(first) = WARNINGS_SECTION.captures(forecast) else {
                return SplitNarrative { body: forecast.to_string(), warnings: None };
            };
            let section = first.get(1).map_or("", |m| m.as_str());
            let warnings = section.replacen(WARNINGS_HEADING, "", 1);

            SplitNarrative {
                body: WARNINGS_SECTION.replace_all(forecast, "${2}").into_owned(),
                warnings: Some(warnings),
            }
        }
    }
}

/// `Tuesday, February 18, 2026`, or the raw string when it is not an ISO date.
pub fn long_date(date: &str) -> String {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map(|d| d.format("%A, %B %-d, %Y").to_string())
        .unwrap_or_else(|_| date.to_string())
}

/// A rendered forecast: stats, icon and a collapsible narrative.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherCard {
    variant: Variant,
    toggle_style: ToggleStyle,
    state: ToggleState,
    heading: Option<String>,
    icon: CardIcon,
    stats: [Stat; 4],
    narrative_markdown: String,
    narrative_html: String,
    warnings_markdown: Option<String>,
    warnings_html: Option<String>,
}

impl WeatherCard {
    pub fn build(
        response: &ForecastResponse,
        style: &RenderStyle,
        markdown: &dyn MarkdownRenderer,
    ) -> Self {
        let data = &response.data_used;
        let icon = style.icon_for(data);
        let alt = match style.icon_policy {
            IconPolicy::Fixed(_) => "Weather Icon",
            IconPolicy::ByConditions => icon.alt_text(),
        };

        let split = split_warnings(&response.forecast, response.has_warnings(), style.warnings);
        let warnings_html = split.warnings.as_deref().map(|w| markdown.to_html(w));

        Self {
            variant: style.variant,
            toggle_style: style.toggle,
            state: ToggleState::Collapsed,
            heading: style
                .date_heading
                .then(|| format!("Weather forecast for {}", long_date(&response.date))),
            icon: CardIcon {
                icon,
                src: style.icons.path(icon).to_string(),
                alt: alt.to_string(),
            },
            stats: format_stats(data, style.precision),
            narrative_html: markdown.to_html(&split.body),
            narrative_markdown: split.body,
            warnings_markdown: split.warnings,
            warnings_html,
        }
    }

    pub fn toggle(&mut self) -> ToggleState {
        self.state = self.state.toggled();
        self.state
    }

    pub fn state(&self) -> ToggleState {
        self.state
    }

    pub fn is_expanded(&self) -> bool {
        self.state.is_expanded()
    }

    /// Hint or label currently shown on the toggle control.
    pub fn toggle_text(&self) -> Option<&'static str> {
        self.toggle_style.control_text(self.state)
    }

    pub fn heading(&self) -> Option<&str> {
        self.heading.as_deref()
    }

    pub fn icon(&self) -> &CardIcon {
        &self.icon
    }

    pub fn stats(&self) -> &[Stat; 4] {
        &self.stats
    }

    pub fn narrative_markdown(&self) -> &str {
        &self.narrative_markdown
    }

    pub fn narrative_html(&self) -> &str {
        &self.narrative_html
    }

    pub fn warnings_markdown(&self) -> Option<&str> {
        self.warnings_markdown.as_deref()
    }

    pub fn has_warning_block(&self) -> bool {
        self.warnings_html.is_some() || self.narrative_html.contains("highlighted-warnings")
    }

    pub fn to_html(&self) -> String {
        match self.variant {
            Variant::Classic => self.classic_html(),
            Variant::Chat => self.chat_html(),
        }
    }

    fn visible_class(&self, base: &str) -> String {
        if self.is_expanded() { format!("{base} visible") } else { base.to_string() }
    }

    fn icon_html(&self) -> String {
        format!(
            r#"<img src="{}" alt="{}" style="width: 64px; height: 64px;">"#,
            escape_html(&self.icon.src),
            escape_html(&self.icon.alt)
        )
    }

    fn classic_html(&self) -> String {
        let mut out = String::new();
        out.push_str(r#"<div class="weather-card" data-toggle="card">"#);
        let _ = write!(
            out,
            r#"<div class="weather-icon" style="text-align: center; margin-bottom: 20px;">{}</div>"#,
            self.icon_html()
        );

        out.push_str(r#"<div class="weather-grid">"#);
        for stat in &self.stats {
            let _ = write!(
                out,
                r#"<div class="weather-item"><span class="label">{}</span><span class="value">{}</span></div>"#,
                stat.label,
                escape_html(&stat.value)
            );
        }
        out.push_str("</div>");

        let display = if self.is_expanded() { "none" } else { "block" };
        let _ = write!(
            out,
            r#"<div class="card-hint" style="text-align: center; color: #666; font-size: 0.9rem; margin-top: 10px; display: {display};">{}</div>"#,
            crate::toggle::CARD_HINT
        );

        let _ = write!(
            out,
            r#"<div class="{}">{}</div>"#,
            self.visible_class("weather-response"),
            self.narrative_html
        );
        out.push_str("</div>");
        out
    }

    fn chat_html(&self) -> String {
        let mut out = String::new();
        if let Some(heading) = &self.heading {
            let _ = write!(out, "<p>{}</p>", escape_html(heading));
        }

        out.push_str(r#"<div class="weather-card">"#);
        let _ = write!(out, r#"<div class="weather-icon">{}</div>"#, self.icon_html());

        out.push_str(r#"<div class="weather-stats">"#);
        for stat in &self.stats {
            let _ = write!(
                out,
                r#"<div class="weather-stat"><span class="value">{}</span><span class="label">{}</span></div>"#,
                escape_html(&stat.value),
                stat.label
            );
        }
        out.push_str("</div>");

        if let Some(label) = self.toggle_text() {
            let _ = write!(out, r#"<div class="forecast-toggle">{label}</div>"#);
        }

        let _ = write!(
            out,
            r#"<div class="{}">{}"#,
            self.visible_class("weather-forecast"),
            self.narrative_html
        );
        if let Some(warnings) = &self.warnings_html {
            let _ = write!(
                out,
                r#"<div class="weather-warning"><h3>⚠️ Weather Warnings</h3>{warnings}</div>"#
            );
        }
        out.push_str("</div></div>");
        out
    }
}
