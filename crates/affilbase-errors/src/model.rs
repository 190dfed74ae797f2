use crate::codes::ErrorCode;
use crate::retry::RetryClass;

/// The single error payload every crate-level error wraps. `message_user`
/// is safe to surface; `message_dev` may carry internal detail.
#[derive(Clone, Debug)]
pub struct ErrorObj {
    pub code: ErrorCode,
    pub message_user: String,
    pub message_dev: Option<String>,
    pub meta: serde_json::Map<String, serde_json::Value>,
}

impl ErrorObj {
    pub fn retry(&self) -> RetryClass {
        self.code.retry
    }

    pub fn is(&self, code: ErrorCode) -> bool {
        self.code == code
    }
}

impl std::fmt::Display for ErrorObj {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code.name, self.message_user)?;
        if let Some(dev) = &self.message_dev {
            write!(f, " ({dev})")?;
        }
        Ok(())
    }
}

pub struct ErrorBuilder {
    code: ErrorCode,
    message_user: Option<String>,
    message_dev: Option<String>,
    meta: serde_json::Map<String, serde_json::Value>,
}

impl ErrorBuilder {
    pub fn new(code: ErrorCode) -> Self {
        Self {
            code,
            message_user: None,
            message_dev: None,
            meta: serde_json::Map::new(),
        }
    }

    pub fn user_msg(mut self, msg: impl Into<String>) -> Self {
        self.message_user = Some(msg.into());
        self
    }

    pub fn dev_msg(mut self, msg: impl Into<String>) -> Self {
        self.message_dev = Some(msg.into());
        self
    }

    pub fn meta(mut self, key: &str, value: serde_json::Value) -> Self {
        self.meta.insert(key.to_string(), value);
        self
    }

    pub fn build(self) -> ErrorObj {
        ErrorObj {
            message_user: self
                .message_user
                .unwrap_or_else(|| self.code.name.to_string()),
            code: self.code,
            message_dev: self.message_dev,
            meta: self.meta,
        }
    }
}
