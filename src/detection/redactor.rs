//! Offset-safe placeholder substitution

use crate::domain::{CandidateSpan, RedactionError};

/// Splices `<KIND>` placeholders over accepted spans
#[derive(Debug, Clone, Copy, Default)]
pub struct Redactor;

impl Redactor {
    /// Create a redactor
    pub fn new() -> Self {
        Self
    }

    /// Replace every span of `text` with its kind's placeholder
    ///
    /// Spans are applied from the highest start offset down so earlier
    /// offsets stay valid while the string changes length.
    ///
    /// # Errors
    ///
    /// Returns an error if a span is empty, out of bounds, splits a
    /// character, or overlaps another span
    pub fn redact(&self, text: &str, spans: &[CandidateSpan]) -> Result<String, RedactionError> {
        let mut ordered: Vec<&CandidateSpan> = spans.iter().collect();
        ordered.sort_by(|a, b| b.start.cmp(&a.start).then_with(|| b.end.cmp(&a.end)));

        let mut redacted = text.to_string();
        let mut next_start: Option<usize> = None;

        for span in ordered {
            Self::check(text, span)?;
            if let Some(next) = next_start {
                if span.end > next {
                    return Err(RedactionError::Overlap {
                        start: span.start,
                        end: span.end,
                        next_start: next,
                    });
                }
            }

            redacted.replace_range(span.start..span.end, &span.kind.placeholder());
            next_start = Some(span.start);
        }

        Ok(redacted)
    }

    fn check(text: &str, span: &CandidateSpan) -> Result<(), RedactionError> {
        let (start, end) = (span.start, span.end);
        if start >= end {
            return Err(RedactionError::Empty { start, end });
        }
        if end > text.len() {
            return Err(RedactionError::OutOfBounds {
                start,
                end,
                len: text.len(),
            });
        }
        if !text.is_char_boundary(start) || !text.is_char_boundary(end) {
            return Err(RedactionError::NotCharBoundary { start, end });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{EntityKind, SourceKind};

    fn span(text: &str, start: usize, end: usize, kind: EntityKind) -> CandidateSpan {
        CandidateSpan {
            start,
            end,
            kind,
            text: text.get(start..end).unwrap_or_default().to_string(),
            confidence: 0.95,
            source: SourceKind::Pattern,
        }
    }

    #[test]
    fn test_redact_multiple_spans() {
        let text = "Call 555-123-4567 or mail a@b.io";
        let spans = vec![
            span(text, 5, 17, EntityKind::PhoneNumber),
            span(text, 26, 32, EntityKind::EmailAddress),
        ];

        let redacted = Redactor::new().redact(text, &spans).unwrap();
        assert_eq!(redacted, "Call <PHONE_NUMBER> or mail <EMAIL_ADDRESS>");
    }

    #[test]
    fn test_redact_ignores_input_order() {
        let text = "ab cd ef";
        let forward = vec![
            span(text, 0, 2, EntityKind::Person),
            span(text, 6, 8, EntityKind::Person),
        ];
        let backward: Vec<_> = forward.iter().rev().cloned().collect();

        let redactor = Redactor::new();
        assert_eq!(
            redactor.redact(text, &forward).unwrap(),
            redactor.redact(text, &backward).unwrap()
        );
    }

    #[test]
    fn test_redact_adjacent_spans() {
        let text = "abcdef";
        let spans = vec![
            span(text, 0, 3, EntityKind::Person),
            span(text, 3, 6, EntityKind::Location),
        ];
        assert_eq!(
            Redactor::new().redact(text, &spans).unwrap(),
            "<PERSON><LOCATION>"
        );
    }

    #[test]
    fn test_redact_multibyte_text() {
        let text = "Zoë lives in Köln";
        let spans = vec![
            span(text, 0, 4, EntityKind::Person),
            span(text, 14, 19, EntityKind::Location),
        ];
        assert_eq!(
            Redactor::new().redact(text, &spans).unwrap(),
            "<PERSON> lives in <LOCATION>"
        );
    }

    #[test]
    fn test_redact_nothing() {
        assert_eq!(Redactor::new().redact("plain", &[]).unwrap(), "plain");
    }

    #[test]
    fn test_rejects_overlap() {
        let text = "abcdefgh";
        let spans = vec![
            span(text, 0, 5, EntityKind::Person),
            span(text, 3, 8, EntityKind::Location),
        ];
        assert_eq!(
            Redactor::new().redact(text, &spans),
            Err(RedactionError::Overlap {
                start: 0,
                end: 5,
                next_start: 3
            })
        );
    }

    #[test]
    fn test_rejects_out_of_bounds() {
        let text = "short";
        let spans = vec![span(text, 2, 40, EntityKind::Person)];
        assert!(matches!(
            Redactor::new().redact(text, &spans),
            Err(RedactionError::OutOfBounds { len: 5, .. })
        ));
    }

    #[test]
    fn test_rejects_split_character() {
        let text = "Zoë";
        let spans = vec![span(text, 0, 3, EntityKind::Person)];
        assert_eq!(
            Redactor::new().redact(text, &spans),
            Err(RedactionError::NotCharBoundary { start: 0, end: 3 })
        );
    }

    #[test]
    fn test_rejects_empty_span() {
        let text = "abc";
        let spans = vec![span(text, 2, 2, EntityKind::Person)];
        assert_eq!(
            Redactor::new().redact(text, &spans),
            Err(RedactionError::Empty { start: 2, end: 2 })
        );
    }
}
