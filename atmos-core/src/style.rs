//! Knobs that distinguish the two chat front ends.
//!
//! Both front ends share one renderer; a [`Variant`] picks a preset [`RenderStyle`],
//! and individual knobs can be overridden from the config file.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{model::WeatherData, toggle::ToggleStyle};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    /// Single-icon card, two decimals, click-anywhere toggle, inline warning highlight.
    Classic,
    /// Condition icons, one decimal, labelled toggle, separate warning block.
    #[default]
    Chat,
}

impl Variant {
    pub fn as_str(&self) -> &'static str {
        match self {
            Variant::Classic => "classic",
            Variant::Chat => "chat",
        }
    }

    pub const fn all() -> &'static [Variant] {
        &[Variant::Classic, Variant::Chat]
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for Variant {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "classic" => Ok(Variant::Classic),
            "chat" => Ok(Variant::Chat),
            _ => Err(anyhow::anyhow!(
                "Unknown variant '{value}'. Supported variants: classic, chat."
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WeatherIcon {
    Sunny,
    Cloudy,
    Rainy,
    Thunder,
}

impl WeatherIcon {
    /// First matching rule wins; cloudy when nothing matches.
    pub fn select(data: &WeatherData) -> Self {
        if data.precipitation > 5.0 {
            WeatherIcon::Rainy
        } else if data.precipitation > 0.0 {
            WeatherIcon::Thunder
        } else if data.temperature_2m > 25.0 {
            WeatherIcon::Sunny
        } else {
            WeatherIcon::Cloudy
        }
    }

    pub fn alt_text(&self) -> &'static str {
        match self {
            WeatherIcon::Sunny => "Sunny Weather",
            WeatherIcon::Cloudy => "Cloudy Weather",
            WeatherIcon::Rainy => "Rainy Weather",
            WeatherIcon::Thunder => "Thunderstorm Weather",
        }
    }
}

const DEFAULT_ICON_ASSET: &str = "./cloudy-day-3.svg";

fn default_icon_asset() -> String {
    DEFAULT_ICON_ASSET.to_string()
}

/// Image path per icon. Every icon ships pointing at the same asset; set distinct
/// files in the `[icons]` table to tell them apart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IconAssets {
    #[serde(default = "default_icon_asset")]
    pub sunny: String,
    #[serde(default = "default_icon_asset")]
    pub cloudy: String,
    #[serde(default = "default_icon_asset")]
    pub rainy: String,
    #[serde(default = "default_icon_asset")]
    pub thunder: String,
}

impl Default for IconAssets {
    fn default() -> Self {
        Self {
            sunny: default_icon_asset(),
            cloudy: default_icon_asset(),
            rainy: default_icon_asset(),
            thunder: default_icon_asset(),
        }
    }
}

impl IconAssets {
    pub fn path(&self, icon: WeatherIcon) -> &str {
        match icon {
            WeatherIcon::Sunny => &self.sunny,
            WeatherIcon::Cloudy => &self.cloudy,
            WeatherIcon::Rainy => &self.rainy,
            WeatherIcon::Thunder => &self.thunder,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IconPolicy {
    /// Always the same icon, with a generic alt text.
    Fixed(WeatherIcon),
    ByConditions,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningLayout {
    /// Highlight the warning section where it sits in the narrative.
    Inline,
    /// Lift the warning section out into its own block after the narrative.
    Separate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollBehavior {
    Instant,
    /// Deferred to the next frame, animated.
    Smooth,
}

impl ScrollBehavior {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScrollBehavior::Instant => "instant",
            ScrollBehavior::Smooth => "smooth",
        }
    }
}

/// When the date field is emptied after a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClearPolicy {
    Always,
    OnSuccess,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderStyle {
    pub variant: Variant,
    /// Decimals for every stat value.
    pub precision: usize,
    pub icon_policy: IconPolicy,
    pub icons: IconAssets,
    pub toggle: ToggleStyle,
    pub warnings: WarningLayout,
    pub card_scroll: ScrollBehavior,
    pub clear_date: ClearPolicy,
    /// Prefix the card with a long-form date line.
    pub date_heading: bool,
    /// Show a welcome placeholder that is dropped once the conversation gets going.
    pub placeholder_welcome: bool,
}

impl RenderStyle {
    pub fn for_variant(variant: Variant) -> Self {
        match variant {
            Variant::Classic => Self {
                variant,
                precision: 2,
                icon_policy: IconPolicy::Fixed(WeatherIcon::Cloudy),
                icons: IconAssets::default(),
                toggle: ToggleStyle::WholeCard,
                warnings: WarningLayout::Inline,
                card_scroll: ScrollBehavior::Smooth,
                clear_date: ClearPolicy::Always,
                date_heading: false,
                placeholder_welcome: false,
            },
            Variant::Chat => Self {
                variant,
                precision: 1,
                icon_policy: IconPolicy::ByConditions,
                icons: IconAssets::default(),
                toggle: ToggleStyle::Label,
                warnings: WarningLayout::Separate,
                card_scroll: ScrollBehavior::Instant,
                clear_date: ClearPolicy::OnSuccess,
                date_heading: true,
                placeholder_welcome: true,
            },
        }
    }

    pub fn icon_for(&self, data: &WeatherData) -> WeatherIcon {
        match self.icon_policy {
            IconPolicy::Fixed(icon) => icon,
            IconPolicy::ByConditions => WeatherIcon::select(data),
        }
    }

    /// The user's transcript entry for a submission.
    pub fn request_summary(&self, date: &str, report_length: &str) -> String {
        match self.variant {
            Variant::Classic => format!("Date: {date} ({report_length} words report)"),
            Variant::Chat => {
                format!("Requesting weather forecast for {date} ({report_length} words)")
            }
        }
    }
}

impl Default for RenderStyle {
    fn default() -> Self {
        Self::for_variant(Variant::default())
    }
}
