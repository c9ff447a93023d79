use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Event name used by `log_default_event`, the generic "item selected"
/// category of the analytics backend.
pub const DEFAULT_EVENT_NAME: &str = "select_item";

/// Primitive value carried in an event payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PayloadValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl fmt::Display for PayloadValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PayloadValue::Bool(b) => write!(f, "{}", b),
            PayloadValue::Int(i) => write!(f, "{}", i),
            PayloadValue::Float(x) => write!(f, "{}", x),
            PayloadValue::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<bool> for PayloadValue {
    fn from(v: bool) -> Self {
        PayloadValue::Bool(v)
    }
}

impl From<i64> for PayloadValue {
    fn from(v: i64) -> Self {
        PayloadValue::Int(v)
    }
}

impl From<i32> for PayloadValue {
    fn from(v: i32) -> Self {
        PayloadValue::Int(v as i64)
    }
}

impl From<u32> for PayloadValue {
    fn from(v: u32) -> Self {
        PayloadValue::Int(v as i64)
    }
}

impl From<f64> for PayloadValue {
    fn from(v: f64) -> Self {
        PayloadValue::Float(v)
    }
}

impl From<&str> for PayloadValue {
    fn from(v: &str) -> Self {
        PayloadValue::Text(v.to_string())
    }
}

impl From<String> for PayloadValue {
    fn from(v: String) -> Self {
        PayloadValue::Text(v)
    }
}

/// Key/value parameters of an analytics event.
///
/// Keys are unique and kept sorted. There is no mutable access once built:
/// use [`EventPayload::builder`] or collect from an iterator.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct EventPayload {
    params: BTreeMap<String, PayloadValue>,
}

impl EventPayload {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn builder() -> EventPayloadBuilder {
        EventPayloadBuilder::default()
    }

    pub fn get(&self, key: &str) -> Option<&PayloadValue> {
        self.params.get(key)
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }
}

impl fmt::Display for EventPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (key, value)) in self.params.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}={}", key, value)?;
        }
        write!(f, "}}")
    }
}

impl<K, V> FromIterator<(K, V)> for EventPayload
where
    K: Into<String>,
    V: Into<PayloadValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            params: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

#[derive(Debug, Default)]
pub struct EventPayloadBuilder {
    params: BTreeMap<String, PayloadValue>,
}

impl EventPayloadBuilder {
    /// Adds a parameter. A repeated key replaces the earlier value.
    pub fn put(mut self, key: impl Into<String>, value: impl Into<PayloadValue>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    pub fn build(self) -> EventPayload {
        EventPayload { params: self.params }
    }
}

/// Validated analytics event name (non-empty, not just whitespace).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EventName(String);

impl EventName {
    pub fn parse(raw: &str) -> Option<Self> {
        if raw.trim().is_empty() {
            None
        } else {
            Some(EventName(raw.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EventName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Error value converted into a crash-reporter friendly shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExceptionReport {
    pub message: String,
    /// `source()` chain, outermost first.
    pub causes: Vec<String>,
    pub backtrace: Option<String>,
}

impl ExceptionReport {
    pub fn from_error(err: &(dyn std::error::Error + 'static)) -> Self {
        let mut causes = Vec::new();
        let mut source = err.source();
        while let Some(cause) = source {
            causes.push(cause.to_string());
            source = cause.source();
        }

        Self {
            message: err.to_string(),
            causes,
            backtrace: None,
        }
    }

    /// Keeps anyhow's captured backtrace when one was recorded.
    pub fn from_anyhow(err: &anyhow::Error) -> Self {
        let mut report = Self::from_error(err.as_ref());
        let backtrace = err.backtrace();
        if backtrace.status() == std::backtrace::BacktraceStatus::Captured {
            report.backtrace = Some(backtrace.to_string());
        }
        report
    }
}

impl fmt::Display for ExceptionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;
        for cause in &self.causes {
            write!(f, ": {}", cause)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExceptionReport {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_renders_sorted_pairs() {
        let payload = EventPayload::builder()
            .put("rows", 5)
            .put("table", "glucose")
            .put("ok", true)
            .build();

        assert_eq!(payload.to_string(), "{ok=true, rows=5, table=glucose}");
        assert_eq!(EventPayload::empty().to_string(), "{}");
    }

    #[test]
    fn payload_keys_are_unique() {
        let payload = EventPayload::builder().put("x", 1).put("x", 2).build();
        assert_eq!(payload.len(), 1);
        assert_eq!(payload.get("x"), Some(&PayloadValue::Int(2)));
    }

    #[test]
    fn payload_serializes_as_flat_object() {
        let payload: EventPayload = vec![("rows", 5)].into_iter().collect();
        let json = serde_json::to_string(&payload).unwrap();
        assert_eq!(json, r#"{"rows":5}"#);
    }

    #[test]
    fn blank_names_are_rejected() {
        assert!(EventName::parse("").is_none());
        assert!(EventName::parse("   ").is_none());
        assert_eq!(EventName::parse("sync").unwrap().as_str(), "sync");
    }

    #[test]
    fn exception_report_walks_source_chain() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "disk gone");
        let err = anyhow::Error::new(io).context("saving profile");
        let report = ExceptionReport::from_anyhow(&err);

        assert_eq!(report.message, "saving profile");
        assert_eq!(report.causes, vec!["disk gone".to_string()]);
        assert_eq!(report.to_string(), "saving profile: disk gone");
    }
}
