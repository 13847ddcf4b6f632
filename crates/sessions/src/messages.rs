use serde_json::Value;

/// Flash message input: a single message or a batch, appended in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Messages {
    One(String),
    Many(Vec<String>),
}

impl Messages {
    /// Interpret a dynamic value as flash input.
    ///
    /// Strings become [`Messages::One`], arrays become [`Messages::Many`]
    /// keeping only their string elements. Anything else yields `None`.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::String(s) => Some(Self::One(s)),
            Value::Array(items) => Some(Self::Many(
                items
                    .into_iter()
                    .filter_map(|v| match v {
                        Value::String(s) => Some(s),
                        _ => None,
                    })
                    .collect(),
            )),
            _ => None,
        }
    }

    pub fn into_vec(self) -> Vec<String> {
        match self {
            Self::One(s) => vec![s],
            Self::Many(v) => v,
        }
    }
}

impl From<String> for Messages {
    fn from(s: String) -> Self {
        Self::One(s)
    }
}

impl From<&str> for Messages {
    fn from(s: &str) -> Self {
        Self::One(s.to_string())
    }
}

impl From<Vec<String>> for Messages {
    fn from(v: Vec<String>) -> Self {
        Self::Many(v)
    }
}

impl From<Vec<&str>> for Messages {
    fn from(v: Vec<&str>) -> Self {
        Self::Many(v.into_iter().map(str::to_string).collect())
    }
}

impl<const N: usize> From<[&str; N]> for Messages {
    fn from(v: [&str; N]) -> Self {
        Self::Many(v.into_iter().map(str::to_string).collect())
    }
}

#[cfg(test)]
mod tests {
    use {super::*, serde_json::json};

    #[test]
    fn test_from_value_string() {
        assert_eq!(
            Messages::from_value(json!("oops")),
            Some(Messages::One("oops".into()))
        );
    }

    #[test]
    fn test_from_value_array_keeps_strings() {
        let m = Messages::from_value(json!(["a", 1, "b", null])).unwrap();
        assert_eq!(m.into_vec(), vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn test_from_value_rejects_scalars() {
        assert!(Messages::from_value(json!(42)).is_none());
        assert!(Messages::from_value(json!(true)).is_none());
        assert!(Messages::from_value(json!({"a": "b"})).is_none());
        assert!(Messages::from_value(Value::Null).is_none());
    }

    #[test]
    fn test_array_conversion() {
        assert_eq!(Messages::from(["x", "y"]).into_vec(), vec!["x", "y"]);
    }
}
