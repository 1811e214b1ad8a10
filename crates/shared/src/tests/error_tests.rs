use super::*;

#[test]
fn prefers_message_over_error_field() {
    let body = r#"{"code":"validation","message":"num_days must be positive","error":"bad"}"#;
    assert_eq!(
        extract_error_message(body).as_deref(),
        Some("num_days must be positive")
    );
}

#[test]
fn falls_back_to_error_field() {
    assert_eq!(
        extract_error_message(r#"{"error":"dataset not found"}"#).as_deref(),
        Some("dataset not found")
    );
}

#[test]
fn ignores_empty_and_html_bodies() {
    assert_eq!(extract_error_message(""), None);
    assert_eq!(extract_error_message("   \n"), None);
    assert_eq!(extract_error_message("<html><body>502</body></html>"), None);
    assert_eq!(extract_error_message(r#"{"message":"  "}"#), None);
}

#[test]
fn keeps_short_plain_text_bodies() {
    assert_eq!(
        extract_error_message("Failed to deserialize the JSON body\n").as_deref(),
        Some("Failed to deserialize the JSON body")
    );
    assert_eq!(extract_error_message(&"x".repeat(1000)), None);
}
