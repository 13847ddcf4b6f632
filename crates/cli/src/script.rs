//! JSON-lines driver for the session facade.
//!
//! Each non-blank line is one operation, e.g.
//! `{"op":"login","user_id":17}` or `{"op":"get_data","key":"cart"}`.
//! Lines starting with `#` are comments. Every operation prints one
//! `{"op": ..., "result": ...}` line.

use std::io::{BufRead, Write};

use {
    serde::Deserialize,
    serde_json::{Value, json},
    tracing::debug,
    ws_session::{MemoryStore, Session},
};

#[derive(Debug, thiserror::Error)]
pub enum ScriptError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("line {line}: invalid operation: {source}")]
    Parse {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("line {line}: {message}")]
    Op { line: usize, message: String },
}

/// One facade call.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Op {
    Start,
    Destroy,
    /// End the current request; values persist for the next `start`.
    Close,
    Login {
        user_id: i64,
    },
    Logout,
    IsLoggedIn,
    UserId,
    GetErrors,
    GetSuccess,
    AddErrors {
        messages: Value,
    },
    AddSuccess {
        messages: Value,
    },
    GetData {
        #[serde(default)]
        key: Option<String>,
    },
    SetData {
        key: String,
        value: Value,
    },
}

impl Op {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Destroy => "destroy",
            Self::Close => "close",
            Self::Login { .. } => "login",
            Self::Logout => "logout",
            Self::IsLoggedIn => "is_logged_in",
            Self::UserId => "user_id",
            Self::GetErrors => "get_errors",
            Self::GetSuccess => "get_success",
            Self::AddErrors { .. } => "add_errors",
            Self::AddSuccess { .. } => "add_success",
            Self::GetData { .. } => "get_data",
            Self::SetData { .. } => "set_data",
        }
    }
}

/// Runs operations against a single visitor's [`MemoryStore`].
pub struct ScriptRunner {
    store: MemoryStore,
}

impl ScriptRunner {
    pub fn new(store: MemoryStore) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &MemoryStore {
        &self.store
    }

    /// Apply one operation. Mutations return `null`.
    pub fn apply(&mut self, op: Op) -> anyhow::Result<Value> {
        let mut session = Session::new(&mut self.store);
        let result = match op {
            Op::Start => {
                session.start()?;
                Value::Null
            },
            Op::Destroy => {
                session.destroy()?;
                Value::Null
            },
            Op::Close => {
                session.into_store().close();
                Value::Null
            },
            Op::Login { user_id } => {
                session.login(user_id);
                Value::Null
            },
            Op::Logout => {
                session.logout();
                Value::Null
            },
            Op::IsLoggedIn => Value::Bool(session.is_logged_in()),
            Op::UserId => session.user_id().map_or(Value::Null, Value::from),
            Op::GetErrors => json!(session.take_errors()),
            Op::GetSuccess => json!(session.take_success()),
            Op::AddErrors { messages } => {
                session.add_errors_value(messages);
                Value::Null
            },
            Op::AddSuccess { messages } => {
                session.add_success_value(messages);
                Value::Null
            },
            Op::GetData { key } => session.get_data(key.as_deref()).unwrap_or(Value::Null),
            Op::SetData { key, value } => {
                session.set_data(&key, value);
                Value::Null
            },
        };
        Ok(result)
    }

    /// Execute every operation in `input`, writing one result line per
    /// operation to `out`. Returns the number of operations run.
    pub fn run(&mut self, input: impl BufRead, mut out: impl Write) -> Result<usize, ScriptError> {
        let mut count = 0;
        for (idx, line) in input.lines().enumerate() {
            let line_no = idx + 1;
            let line = line?;
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            let op: Op = serde_json::from_str(trimmed).map_err(|source| ScriptError::Parse {
                line: line_no,
                source,
            })?;
            let name = op.name();
            debug!(line = line_no, op = name, "applying");

            let result = self.apply(op).map_err(|e| ScriptError::Op {
                line: line_no,
                message: format!("{e:#}"),
            })?;
            writeln!(out, "{}", json!({ "op": name, "result": result }))?;
            count += 1;
        }
        out.flush()?;
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use {super::*, ws_session::SessionStore};

    fn run(script: &str) -> (Vec<Value>, ScriptRunner) {
        let mut runner = ScriptRunner::new(MemoryStore::new());
        let mut out = Vec::new();
        runner.run(script.as_bytes(), &mut out).unwrap();
        let lines = String::from_utf8(out)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        (lines, runner)
    }

    #[test]
    fn test_parse_ops() {
        let op: Op = serde_json::from_str(r#"{"op":"login","user_id":3}"#).unwrap();
        assert_eq!(op, Op::Login { user_id: 3 });
        let op: Op = serde_json::from_str(r#"{"op":"get_data"}"#).unwrap();
        assert_eq!(op, Op::GetData { key: None });
        assert!(serde_json::from_str::<Op>(r#"{"op":"explode"}"#).is_err());
    }

    #[test]
    fn test_comments_and_blanks_skipped() {
        let (lines, _) = run("# setup\n\n{\"op\":\"start\"}\n   \n");
        assert_eq!(lines, vec![json!({"op": "start", "result": null})]);
    }

    #[test]
    fn test_flash_round() {
        let (lines, _) = run(concat!(
            "{\"op\":\"start\"}\n",
            "{\"op\":\"add_errors\",\"messages\":\"a\"}\n",
            "{\"op\":\"add_errors\",\"messages\":[\"b\",\"c\"]}\n",
            "{\"op\":\"add_errors\",\"messages\":42}\n",
            "{\"op\":\"get_errors\"}\n",
            "{\"op\":\"get_errors\"}\n",
        ));
        assert_eq!(lines[4]["result"], json!(["a", "b", "c"]));
        assert_eq!(lines[5]["result"], json!([]));
    }

    #[test]
    fn test_close_persists_values() {
        let (lines, runner) = run(concat!(
            "{\"op\":\"start\"}\n",
            "{\"op\":\"set_data\",\"key\":\"foo\",\"value\":{\"n\":1}}\n",
            "{\"op\":\"close\"}\n",
            "{\"op\":\"start\"}\n",
            "{\"op\":\"get_data\",\"key\":\"foo\"}\n",
        ));
        assert_eq!(lines[4]["result"], json!({"n": 1}));
        assert_eq!(runner.store().values().len(), 1);
    }

    #[test]
    fn test_parse_error_reports_line() {
        let mut runner = ScriptRunner::new(MemoryStore::new());
        let err = runner
            .run("{\"op\":\"start\"}\nnot json\n".as_bytes(), Vec::new())
            .unwrap_err();
        assert!(matches!(err, ScriptError::Parse { line: 2, .. }));
    }
}
