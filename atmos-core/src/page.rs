//! Standalone HTML page holding the form, the transcript and the error region.

use std::fmt::Write as _;

use crate::{
    markdown::escape_html,
    picker::{DatePickerConfig, STORAGE_FORMAT},
    report::BannerState,
    session::FormState,
    transcript::Transcript,
};

/// Element ids a host page must provide.
pub mod ids {
    pub const DATE_INPUT: &str = "date";
    pub const REPORT_LENGTH: &str = "reportLength";
    pub const FORM: &str = "weatherForm";
    pub const TRANSCRIPT: &str = "chatContainer";
    pub const ERROR: &str = "error";
}

pub fn render_page(
    transcript: &Transcript,
    banner: &BannerState,
    form: &FormState,
    picker: &DatePickerConfig,
    report_lengths: &[u32],
) -> String {
    let mut out = String::from(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>Atmos - AI Powered weather forecaster</title>\n</head>\n<body>\n",
    );

    let _ = writeln!(
        out,
        r#"<form id="{}"><input type="date" id="{}" min="{}" max="{}" value="{}" readonly>"#,
        ids::FORM,
        ids::DATE_INPUT,
        picker.min_date.format(STORAGE_FORMAT),
        picker.max_date.format(STORAGE_FORMAT),
        escape_html(&form.date)
    );

    let _ = write!(out, r#"<select id="{}">"#, ids::REPORT_LENGTH);
    for len in report_lengths {
        let selected = if form.report_length == len.to_string() { " selected" } else { "" };
        let _ = write!(out, r#"<option value="{len}"{selected}>{len} words</option>"#);
    }
    out.push_str("</select><button type=\"submit\">Get forecast</button></form>\n");

    let class = if banner.visible { "error-message visible" } else { "error-message" };
    let _ = writeln!(
        out,
        r#"<div id="{}" class="{class}">{}</div>"#,
        ids::ERROR,
        escape_html(&banner.message)
    );

    out.push_str(&transcript.to_html());
    out.push_str("\n</body>\n</html>\n");
    out
}
