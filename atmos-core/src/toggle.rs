/// Expand/collapse state of a card's detailed narrative. Always starts collapsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ToggleState {
    #[default]
    Collapsed,
    Expanded,
}

impl ToggleState {
    pub fn toggled(self) -> Self {
        match self {
            ToggleState::Collapsed => ToggleState::Expanded,
            ToggleState::Expanded => ToggleState::Collapsed,
        }
    }

    pub fn is_expanded(self) -> bool {
        self == ToggleState::Expanded
    }
}

/// Where the user clicks to flip a card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleStyle {
    /// Anywhere on the card; a hint is shown while collapsed.
    WholeCard,
    /// A dedicated label whose text follows the state.
    Label,
}

pub const CARD_HINT: &str = "Click to see detailed analysis";
pub const SHOW_LABEL: &str = "Show Detailed Forecast ▼";
pub const HIDE_LABEL: &str = "Hide Detailed Forecast ▲";

impl ToggleStyle {
    /// Text of the toggle control for `state`, or `None` when nothing is shown.
    pub fn control_text(self, state: ToggleState) -> Option<&'static str> {
        match (self, state) {
            (ToggleStyle::WholeCard, ToggleState::Collapsed) => Some(CARD_HINT),
            (ToggleStyle::WholeCard, ToggleState::Expanded) => None,
            (ToggleStyle::Label, ToggleState::Collapsed) => Some(SHOW_LABEL),
            (ToggleStyle::Label, ToggleState::Expanded) => Some(HIDE_LABEL),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn two_toggles_return_to_collapsed() {
        let state = ToggleState::default();
        assert_eq!(state, ToggleState::Collapsed);

        let once = state.toggled();
        assert!(once.is_expanded());
        assert_eq!(once.toggled(), ToggleState::Collapsed);
    }

    #[test]
    fn label_text_tracks_state() {
        assert_eq!(ToggleStyle::Label.control_text(ToggleState::Collapsed), Some(SHOW_LABEL));
        assert_eq!(ToggleStyle::Label.control_text(ToggleState::Expanded), Some(HIDE_LABEL));
        assert_eq!(ToggleStyle::WholeCard.control_text(ToggleState::Collapsed), Some(CARD_HINT));
        assert_eq!(ToggleStyle::WholeCard.control_text(ToggleState::Expanded), None);
    }
}
