//! Rendering of comparison results into an HTML notification.

use crate::models::{ComparisonResult, DateWindow, Notification, DATE_FORMAT};
use crate::stats::confidence_percent;

/// Attributes applied to every rendered `<table>`.
const TABLE_ATTRIBUTES: &str =
    r#"border="1" cellpadding="5" style="border: 1px solid black; border-collapse: collapse;""#;

const NO_NEW_ERRORS: &str = "No new errors observed.<br/>";
const NO_ERRORS_INCREASED: &str = "No errors increased observed.<br/>";

// ── Notification ──────────────────────────────────────────────────────────────

/// Render the subject and HTML body for one comparison run.
pub fn render_notification(
    category: &str,
    target: &DateWindow,
    history: &DateWindow,
    result: &ComparisonResult,
    alpha: f64,
) -> Notification {
    Notification {
        subject: format_subject(category, target, history),
        body: format_body(result, alpha),
    }
}

/// `Error report for <category> for <target dates> v. <history dates>`.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use errwatch_core::formatting::format_subject;
/// use errwatch_core::models::DayInterval;
///
/// let day = |d| DayInterval::for_date(NaiveDate::from_ymd_opt(2018, 4, d).unwrap());
/// let subject = format_subject("Website", &vec![day(9)], &vec![day(6), day(5)]);
/// assert_eq!(subject, "Error report for Website for 2018-04-09 v. 2018-04-06|2018-04-05");
/// ```
pub fn format_subject(category: &str, target: &DateWindow, history: &DateWindow) -> String {
    format!(
        "Error report for {} for {} v. {}",
        category,
        join_dates(target),
        join_dates(history)
    )
}

/// Render both result sections, substituting a fixed sentence for an empty
/// section.
pub fn format_body(result: &ComparisonResult, alpha: f64) -> String {
    let mut body = String::new();

    if result.new_errors.is_empty() {
        body.push_str(NO_NEW_ERRORS);
    } else {
        body.push_str("New errors observed:<br/>");
        let rows: Vec<[String; 2]> = result
            .new_errors
            .iter()
            .map(|(key, counts)| [key.clone(), join_counts(counts)])
            .collect();
        body.push_str(&render_table(["Error key", "Occurrences"], &rows));
    }

    body.push_str("<br/><br/>");

    if result.errors_increased.is_empty() {
        body.push_str(NO_ERRORS_INCREASED);
    } else {
        body.push_str("Errors increased:<br/>");
        let rows: Vec<[String; 2]> = result
            .errors_increased
            .iter()
            .map(|(key, ci)| {
                [
                    key.clone(),
                    format!("{} - {}", round_bound(ci.low), round_bound(ci.high)),
                ]
            })
            .collect();
        body.push_str(&render_table(["Error key", "Increase rate*"], &rows));
        body.push_str(&format!(
            "<br/>* {}% confidence interval for the difference between medians",
            format_percent(confidence_percent(alpha))
        ));
    }

    body.push_str("<br/><br/>Thanks");
    body
}

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Round an interval bound to the nearest integer (half away from zero).
pub fn round_bound(value: f64) -> i64 {
    value.round() as i64
}

/// Format a percentage without trailing zeros: `95.0` → `"95"`, `99.9` →
/// `"99.9"`.
pub fn format_percent(value: f64) -> String {
    let rounded = (value * 100.0).round() / 100.0;
    if rounded.fract() == 0.0 {
        format!("{:.0}", rounded)
    } else {
        format!("{}", rounded)
    }
}

/// Escape the five HTML-significant characters.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            other => out.push(other),
        }
    }
    out
}

fn join_dates(window: &DateWindow) -> String {
    window
        .iter()
        .map(|interval| interval.start.format(DATE_FORMAT).to_string())
        .collect::<Vec<_>>()
        .join("|")
}

fn join_counts(counts: &[u64]) -> String {
    counts
        .iter()
        .map(u64::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Two-column HTML table; the first column is left-aligned.
fn render_table(headers: [&str; 2], rows: &[[String; 2]]) -> String {
    let mut html = format!("<table {}>\n", TABLE_ATTRIBUTES);
    html.push_str("    <thead>\n        <tr>\n");
    for header in headers {
        html.push_str(&format!("            <th>{}</th>\n", escape_html(header)));
    }
    html.push_str("        </tr>\n    </thead>\n    <tbody>\n");
    for [key, value] in rows {
        html.push_str("        <tr>\n");
        html.push_str(&format!(
            "            <td style=\"text-align: left\">{}</td>\n",
            escape_html(key)
        ));
        html.push_str(&format!("            <td>{}</td>\n", escape_html(value)));
        html.push_str("        </tr>\n");
    }
    html.push_str("    </tbody>\n</table>");
    html
}

// ── Tests ──────────────────────────────────────────────────────────────────────
