use crew_core::{normalize_result, normalize_text, CanonicalRecord, Interview};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

fn acme_cto() -> Value {
    json!({
        "Acme": {
            "CTO": {
                "name": "Jane",
                "blog_articles": ["http://x"],
                "youtube_interviews": [{"url": "http://y", "title": "T"}]
            }
        }
    })
}

#[test]
fn single_person_yields_one_record() {
    let records = normalize_result(&acme_cto());
    assert_eq!(
        records,
        vec![CanonicalRecord {
            company: "Acme".to_string(),
            position: "CTO".to_string(),
            person_name: "Jane".to_string(),
            articles: vec!["http://x".to_string()],
            interviews: vec![Interview {
                url: "http://y".to_string(),
                title: "T".to_string(),
            }],
        }]
    );
}

#[test]
fn accepts_string_envelope_and_structured_forms_alike() {
    let structured = normalize_result(&acme_cto());
    let text = acme_cto().to_string();
    let fenced = format!("```json\n{text}\n```");

    assert_eq!(normalize_result(&Value::String(text.clone())), structured);
    assert_eq!(normalize_result(&Value::String(fenced.clone())), structured);
    assert_eq!(normalize_result(&json!({ "result": fenced })), structured);
    assert_eq!(normalize_text(&text), structured);
}

#[test]
fn fence_stripping_is_exact() {
    assert_eq!(
        normalize_text("```json\n{\"A\":{}}\n```"),
        normalize_text("{\"A\":{}}")
    );
    let fenced = normalize_text("```json\n{\"A\":{\"CEO\":{\"name\":\"Al\"}}}\n```");
    assert_eq!(fenced.len(), 1);
    assert_eq!(fenced[0].person_name, "Al");
}

#[test]
fn malformed_input_yields_no_records() {
    for text in [
        "",
        "not json",
        "```json\n",
        "```json\n{\"A\": {\n```",
        "{\"A\": ",
        "\n```",
        "[1, 2, 3]",
        "null",
        "\"just a string\"",
    ] {
        assert!(normalize_text(text).is_empty(), "expected no records for {text:?}");
    }
    assert!(normalize_result(&Value::Null).is_empty());
    assert!(normalize_result(&json!(17)).is_empty());
    assert!(normalize_result(&json!({"result": "```json\n{broken"})).is_empty());
}

#[test]
fn array_position_expands_to_one_record_per_person() {
    let records = normalize_result(&json!({
        "Acme": {"Engineer": [{"name": "Ann"}, {"name": "Bob"}]}
    }));
    assert_eq!(records.len(), 2);
    assert!(records
        .iter()
        .all(|r| r.company == "Acme" && r.position == "Engineer"));
    let names: Vec<_> = records.iter().map(|r| r.person_name.as_str()).collect();
    assert_eq!(names, vec!["Ann", "Bob"]);
}

#[test]
fn article_objects_fall_back_from_url_to_title_to_placeholder() {
    let records = normalize_result(&json!({
        "Acme": {"CEO": {
            "blog_articles": [
                {"title": "Post"},
                {"url": "http://u", "title": "Ignored"},
                {"url": "", "title": ""},
                {},
                7,
                "plain"
            ]
        }}
    }));
    assert_eq!(
        records[0].articles,
        vec!["Post", "http://u", "Unknown", "Unknown", "Unknown", "plain"]
    );
}

#[test]
fn missing_fields_get_defaults() {
    let records = normalize_result(&json!({
        "Acme": {"CEO": {
            "name": "",
            "youtube_interviews": [{"title": "Talk"}, {"url": "http://v"}, {}]
        }}
    }));
    let record = &records[0];
    assert_eq!(record.person_name, "Unknown");
    assert!(record.articles.is_empty());
    assert_eq!(
        record.interviews,
        vec![
            Interview {
                url: String::new(),
                title: "Talk".to_string()
            },
            Interview {
                url: "http://v".to_string(),
                title: "Unknown".to_string()
            },
            Interview {
                url: String::new(),
                title: "Unknown".to_string()
            },
        ]
    );
}

#[test]
fn output_follows_key_order_then_array_order() {
    let text = r#"{
        "Zeta": {"CTO": {"name": "z1"}, "CEO": [{"name": "z2"}, {"name": "z3"}]},
        "Alpha": {"CFO": {"name": "a1"}}
    }"#;
    let order: Vec<String> = normalize_text(text)
        .into_iter()
        .map(|r| format!("{}/{}/{}", r.company, r.position, r.person_name))
        .collect();
    assert_eq!(
        order,
        vec!["Zeta/CTO/z1", "Zeta/CEO/z2", "Zeta/CEO/z3", "Alpha/CFO/a1"]
    );
}

#[test]
fn normalizing_twice_is_deterministic() {
    let raw = json!({ "result": format!("```json\n{}\n```", acme_cto()) });
    assert_eq!(normalize_result(&raw), normalize_result(&raw));
}

#[test]
fn non_string_result_field_is_treated_as_a_company() {
    let records = normalize_result(&json!({"result": {"CEO": {"name": "Rae"}}}));
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].company, "result");
}
