use serde::Deserialize;
use serde_json::Value;

use super::constants::{LogEventPhase, LogEventType, LogSourceType};

/// Identifier shared by every record logged against the same source.
pub type SourceId = u32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct LogSource {
    pub id: SourceId,
    #[serde(rename = "type")]
    pub source_type: LogSourceType,
}

/// One raw net-log record, exactly as received. Never mutated after parsing.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LogRecord {
    #[serde(default)]
    pub time: Option<String>,
    #[serde(rename = "type")]
    pub event_type: LogEventType,
    #[serde(default)]
    pub phase: LogEventPhase,
    pub source: LogSource,
    #[serde(default)]
    pub extra_parameters: Option<Value>,
}

impl LogRecord {
    pub fn new(event_type: LogEventType, source_id: SourceId, source_type: LogSourceType) -> Self {
        Self {
            time: None,
            event_type,
            phase: LogEventPhase::Unspecified,
            source: LogSource {
                id: source_id,
                source_type,
            },
            extra_parameters: None,
        }
    }

    #[allow(dead_code)] // Used in tests
    pub fn with_phase(mut self, phase: LogEventPhase) -> Self {
        self.phase = phase;
        self
    }

    pub fn with_params(mut self, params: Value) -> Self {
        self.extra_parameters = Some(params);
        self
    }

    /// Parse a single JSON line.
    pub fn parse_line(line: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(line)
    }

    /// `REQUEST_ALIVE` records wrap the real start event of a request and
    /// carry nothing worth displaying.
    pub fn is_wrapper(&self) -> bool {
        self.event_type == LogEventType::RequestAlive
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_full_record() {
        let line = r#"{"time":"1042","type":9,"phase":1,"source":{"id":7,"type":1},"extra_parameters":{"url":"http://a","load_flags":0}}"#;
        let record = LogRecord::parse_line(line).unwrap();

        assert_eq!(record.time.as_deref(), Some("1042"));
        assert_eq!(record.event_type, LogEventType::UrlRequestStart);
        assert_eq!(record.phase, LogEventPhase::Begin);
        assert_eq!(record.source.id, 7);
        assert_eq!(record.source.source_type, LogSourceType::UrlRequest);
        assert_eq!(
            record.extra_parameters,
            Some(json!({"url": "http://a", "load_flags": 0}))
        );
    }

    #[test]
    fn test_optional_fields_default() {
        let record = LogRecord::parse_line(r#"{"type":2,"source":{"id":1,"type":1}}"#).unwrap();
        assert!(record.is_wrapper());
        assert_eq!(record.phase, LogEventPhase::Unspecified);
        assert!(record.time.is_none());
        assert!(record.extra_parameters.is_none());
    }

    #[test]
    fn test_unknown_source_type_fails_parse() {
        let err = LogRecord::parse_line(r#"{"type":9,"source":{"id":1,"type":42}}"#).unwrap_err();
        assert!(err.to_string().contains("unknown source type value 42"));
    }
}
