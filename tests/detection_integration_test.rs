//! Integration tests for the detection pipeline
//!
//! These tests verify that:
//! - Reference inputs redact to the expected text
//! - Accepted entities never overlap and always match the input
//! - Results are deterministic
//! - Every accepted entity leaves exactly one placeholder

use fake::faker::internet::en::SafeEmail;
use fake::faker::lorem::en::Words;
use fake::Fake;
use pii_redactor::detection::{
    DetectionConfig, DetectionEngine, NerConfig, RedactionResult, ValidationRule,
};
use pii_redactor::domain::EntityKind;
use std::sync::Arc;

fn engine() -> DetectionEngine {
    DetectionEngine::pattern_only().unwrap()
}

fn assert_well_formed(text: &str, result: &RedactionResult) {
    assert!(result.success, "unexpected failure: {:?}", result.error);
    assert_eq!(result.original_length, text.len());

    for pair in result.entities.windows(2) {
        assert!(
            pair[0].end <= pair[1].start,
            "entities overlap: {}..{} and {}..{}",
            pair[0].start,
            pair[0].end,
            pair[1].start,
            pair[1].end
        );
    }

    for entity in &result.entities {
        assert_eq!(&text[entity.start..entity.end], entity.text);
    }

    // Rebuild the redacted text from the entity list
    let mut expected = String::new();
    let mut cursor = 0;
    for entity in &result.entities {
        expected.push_str(&text[cursor..entity.start]);
        expected.push_str(&format!("<{}>", entity.kind));
        cursor = entity.end;
    }
    expected.push_str(&text[cursor..]);
    assert_eq!(result.redacted_text, expected);

    let total: usize = result.entity_summary.values().sum();
    assert_eq!(total, result.entities.len());
}

#[tokio::test]
async fn test_contact_details_are_redacted() {
    let text = "Contact John at john.doe@example.com or 555-123-4567.";
    let result = engine().detect(text).await;

    assert_well_formed(text, &result);
    assert_eq!(
        result.redacted_text,
        "Contact John at <EMAIL_ADDRESS> or <PHONE_NUMBER>."
    );

    let email = result
        .entities
        .iter()
        .find(|e| e.kind == EntityKind::EmailAddress)
        .unwrap();
    assert_eq!(email.text, "john.doe@example.com");

    let phone = result
        .entities
        .iter()
        .find(|e| e.kind == EntityKind::PhoneNumber)
        .unwrap();
    assert_eq!(phone.text, "555-123-4567");
}

#[tokio::test]
async fn test_labelled_ssn_is_redacted() {
    let text = "SSN: 123-45-6789";
    let result = engine().detect(text).await;

    assert_well_formed(text, &result);
    assert_eq!(result.entities.len(), 1);
    assert_eq!(result.entities[0].kind, EntityKind::UsSsn);
    assert_eq!(result.entities[0].text, "123-45-6789");
    assert_eq!(result.redacted_text, "SSN: <US_SSN>");
}

#[tokio::test]
async fn test_plain_text_passes_through() {
    let text = "The weather is lovely and the garden is in bloom.";
    let result = engine().detect(text).await;

    assert!(result.success);
    assert!(result.entities.is_empty());
    assert!(result.entity_summary.is_empty());
    assert_eq!(result.redacted_text, text);
    assert!(result.error.is_none());
}

#[tokio::test]
async fn test_passport_outranks_driver_license() {
    let text = "Document A12345678 on file";
    let result = engine().detect(text).await;

    assert_well_formed(text, &result);
    assert_eq!(result.entities.len(), 1);
    assert_eq!(result.entities[0].kind, EntityKind::UsPassport);
    assert_eq!(result.redacted_text, "Document <US_PASSPORT> on file");
}

#[tokio::test]
async fn test_priority_table_comes_from_config() {
    let mut detection = DetectionConfig::default();
    detection.priority.insert("US_DRIVER_LICENSE".to_string(), 10);

    let engine = DetectionEngine::new(
        &detection,
        &NerConfig::default(),
        Arc::new(pii_redactor::detection::DisabledRecognizer),
    )
    .unwrap();

    let result = engine.detect("A12345678").await;
    assert_eq!(result.entities.len(), 1);
    assert_eq!(result.entities[0].kind, EntityKind::UsDriverLicense);
}

#[tokio::test]
async fn test_validation_override_rejects_matches() {
    let mut detection = DetectionConfig::default();
    detection.validation.insert(
        "PHONE_NUMBER".to_string(),
        ValidationRule::DigitCountIn(vec![11]),
    );
    let engine = DetectionEngine::new(
        &detection,
        &NerConfig::default(),
        Arc::new(pii_redactor::detection::DisabledRecognizer),
    )
    .unwrap();

    let text = "call 555-123-4567 or +1 555 123 4567";
    let result = engine.detect(text).await;

    assert_well_formed(text, &result);
    let phones: Vec<&str> = result
        .entities
        .iter()
        .filter(|e| e.kind == EntityKind::PhoneNumber)
        .map(|e| e.text.as_str())
        .collect();
    assert_eq!(phones, vec!["+1 555 123 4567"]);
}

#[tokio::test]
async fn test_multibyte_text_keeps_offsets_valid() {
    let text = "Zoë écrit à zoe@example.fr, merci ☺";
    let result = engine().detect(text).await;

    assert_well_formed(text, &result);
    assert_eq!(result.redacted_text, "Zoë écrit à <EMAIL_ADDRESS>, merci ☺");
}

#[tokio::test]
async fn test_detection_is_deterministic() {
    let text = "Card 4111 1111 1111 1111, SSN 123-45-6789, call (555) 123-4567, \
                mail a.b@example.com, ZIP 90210, Routing: 021000021";
    let engine = engine();

    let first = engine.detect(text).await;
    assert_well_formed(text, &first);
    for _ in 0..5 {
        let again = engine.detect(text).await;
        assert_eq!(again, first);
        assert_eq!(again.format_json().unwrap(), first.format_json().unwrap());
    }
}

#[tokio::test]
async fn test_engine_is_shareable_across_tasks() {
    let engine = Arc::new(engine());
    let mut handles = Vec::new();

    for i in 0..8 {
        let engine = Arc::clone(&engine);
        handles.push(tokio::spawn(async move {
            let text = format!("user{i}@example.com called 555-123-456{i}");
            let result = engine.detect(&text).await;
            (text, result)
        }));
    }

    for handle in handles {
        let (text, result) = handle.await.unwrap();
        assert_well_formed(&text, &result);
        assert_eq!(result.total_entities(), 2);
    }
}

#[tokio::test]
async fn test_generated_text_properties() {
    let engine = engine();

    for _ in 0..50 {
        let before: Vec<String> = Words(2..6).fake();
        let after: Vec<String> = Words(2..6).fake();
        let email: String = SafeEmail().fake();
        let text = format!("{} {} {}", before.join(" "), email, after.join(" "));

        let result = engine.detect(&text).await;
        assert_well_formed(&text, &result);
        assert!(
            result
                .entities
                .iter()
                .any(|e| e.kind == EntityKind::EmailAddress && e.text == email),
            "email not detected in generated text"
        );
        assert_eq!(engine.detect(&text).await, result);
    }
}

#[tokio::test]
async fn test_json_report_shape() {
    let result = engine().detect("SSN: 123-45-6789").await;
    let json: serde_json::Value = serde_json::from_str(&result.format_json().unwrap()).unwrap();

    assert_eq!(json["success"], true);
    assert_eq!(json["original_length"], 16);
    assert_eq!(json["redacted_text"], "SSN: <US_SSN>");
    assert_eq!(json["entity_summary"]["US_SSN"], 1);
    assert_eq!(json["entities"][0]["kind"], "US_SSN");
    assert_eq!(json["entities"][0]["source"], "pattern");
    assert!(json.get("error").is_none());
}
