use chrono::NaiveDate;

/// Storage format of the date field, which is what gets sent to the server.
pub const STORAGE_FORMAT: &str = "%Y-%m-%d";
/// `February 18, 2026`
pub const DISPLAY_FORMAT: &str = "%B %-d, %Y";

/// Bounds and formats for the date picker. Free text entry is never allowed;
/// the picker is the only way a date gets into the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DatePickerConfig {
    pub min_date: NaiveDate,
    pub max_date: NaiveDate,
}

impl Default for DatePickerConfig {
    fn default() -> Self {
        Self {
            min_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or(NaiveDate::MIN),
            max_date: NaiveDate::from_ymd_opt(2026, 2, 18).unwrap_or(NaiveDate::MAX),
        }
    }
}

impl DatePickerConfig {
    /// Preselected date: `today`, pulled into range.
    pub fn starting_date(&self, today: NaiveDate) -> NaiveDate {
        today.clamp(self.min_date, self.max_date)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        (self.min_date..=self.max_date).contains(&date)
    }

    pub fn storage_value(&self, date: NaiveDate) -> String {
        date.format(STORAGE_FORMAT).to_string()
    }

    pub fn display_value(&self, date: NaiveDate) -> String {
        date.format(DISPLAY_FORMAT).to_string()
    }
}
