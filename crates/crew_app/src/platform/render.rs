use std::fmt::Write;

use crew_core::{CanonicalRecord, Event};

/// Placeholder the research crew writes when it found nothing.
const MISSING_MARKER: &str = "MISSING";

pub fn render_event(event: &Event) -> String {
    format!("[{}] {}", event.clock_label(), event.message())
}

/// Plain-text report grouped by company, in record order.
pub fn render_records(records: &[CanonicalRecord]) -> String {
    if records.is_empty() {
        return "No research results. Try different companies or positions.\n".to_string();
    }

    let mut out = String::new();
    let mut current_company: Option<&str> = None;
    for record in records {
        if current_company != Some(record.company.as_str()) {
            if current_company.is_some() {
                out.push('\n');
            }
            let _ = writeln!(out, "== {} ==", record.company);
            current_company = Some(record.company.as_str());
        }
        render_record(&mut out, record);
    }
    out
}

fn render_record(out: &mut String, record: &CanonicalRecord) {
    if record.person_name == MISSING_MARKER {
        let _ = writeln!(out, "{}", record.position);
    } else {
        let _ = writeln!(out, "{} • {}", record.position, record.person_name);
    }

    if !record.articles.is_empty() {
        let _ = writeln!(out, "  Blog articles ({}):", record.articles.len());
        for (index, url) in record.articles.iter().enumerate() {
            let _ = writeln!(out, "    {}. {}", index + 1, or_placeholder(url, "No URL"));
        }
    }
    if !record.interviews.is_empty() {
        let _ = writeln!(out, "  Interviews ({}):", record.interviews.len());
        for interview in &record.interviews {
            if interview.title == MISSING_MARKER {
                let _ = writeln!(out, "    - No title");
            } else {
                let _ = writeln!(
                    out,
                    "    - {} ({})",
                    interview.title,
                    or_placeholder(&interview.url, "no link")
                );
            }
        }
    }
}

fn or_placeholder<'a>(value: &'a str, placeholder: &'a str) -> &'a str {
    if value.is_empty() || value == MISSING_MARKER {
        placeholder
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crew_core::Interview;

    fn record(company: &str, name: &str) -> CanonicalRecord {
        CanonicalRecord {
            company: company.to_string(),
            position: "CTO".to_string(),
            person_name: name.to_string(),
            articles: vec!["http://a".to_string(), MISSING_MARKER.to_string()],
            interviews: vec![
                Interview {
                    url: "http://v".to_string(),
                    title: "Keynote".to_string(),
                },
                Interview {
                    url: String::new(),
                    title: MISSING_MARKER.to_string(),
                },
            ],
        }
    }

    #[test]
    fn groups_records_by_company() {
        let text = render_records(&[
            record("Acme", "Jane"),
            record("Acme", "Joe"),
            record("Globex", "Hank"),
        ]);
        assert_eq!(text.matches("== Acme ==").count(), 1);
        assert_eq!(text.matches("== Globex ==").count(), 1);
        assert!(text.contains("CTO • Jane"));
        assert!(text.contains("    2. No URL"));
        assert!(text.contains("    - Keynote (http://v)"));
        assert!(text.contains("    - No title"));
    }

    #[test]
    fn empty_records_render_notice() {
        assert!(render_records(&[]).starts_with("No research results"));
    }

    #[test]
    fn event_line_has_clock_prefix() {
        let event = Event::new(None, "Crew started");
        assert_eq!(render_event(&event), "[--:--:--] Crew started");
    }
}
