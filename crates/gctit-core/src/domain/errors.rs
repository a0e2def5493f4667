use std::error::Error;
use std::fmt::{Display, Formatter};

pub type GctitResult<T> = Result<T, GctitError>;
pub type SweepResult<T> = GctitResult<T>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GctitErrorCategory {
    Success,
    InputValidationError,
    IoSystemError,
    EngineRunError,
    InternalError,
}

impl GctitErrorCategory {
    pub const fn exit_code(self) -> i32 {
        match self {
            Self::Success => 0,
            Self::InputValidationError => 2,
            Self::IoSystemError => 3,
            Self::EngineRunError => 4,
            Self::InternalError => 5,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Success => "Success",
            Self::InputValidationError => "InputValidationError",
            Self::IoSystemError => "IoSystemError",
            Self::EngineRunError => "EngineRunError",
            Self::InternalError => "InternalError",
        }
    }

    pub const fn is_fatal(self) -> bool {
        !matches!(self, Self::Success)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GctitError {
    category: GctitErrorCategory,
    code: &'static str,
    message: String,
}

impl GctitError {
    pub fn new(
        category: GctitErrorCategory,
        code: &'static str,
        message: impl Into<String>,
    ) -> Self {
        Self {
            category,
            code,
            message: message.into(),
        }
    }

    pub fn input_validation(code: &'static str, message: impl Into<String>) -> Self {
        Self::new(GctitErrorCategory::InputValidationError, code, message)
    }

    pub fn io_system(code: &'static str, message: impl Into<String>) -> Self {
        Self::new(GctitErrorCategory::IoSystemError, code, message)
    }

    pub fn engine_run(code: &'static str, message: impl Into<String>) -> Self {
        Self::new(GctitErrorCategory::EngineRunError, code, message)
    }

    pub fn internal(code: &'static str, message: impl Into<String>) -> Self {
        Self::new(GctitErrorCategory::InternalError, code, message)
    }

    pub const fn category(&self) -> GctitErrorCategory {
        self.category
    }

    pub const fn code(&self) -> &'static str {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub const fn exit_code(&self) -> i32 {
        self.category.exit_code()
    }

    pub fn diagnostic_line(&self) -> String {
        let severity = if self.category.is_fatal() {
            "ERROR"
        } else {
            "INFO"
        };
        format!("{}: [{}] {}", severity, self.code, self.message)
    }

    pub fn fatal_exit_line(&self) -> Option<String> {
        self.category
            .is_fatal()
            .then(|| format!("FATAL EXIT CODE: {}", self.exit_code()))
    }
}

impl Display for GctitError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} [{}] {}",
            self.category.label(),
            self.code,
            self.message
        )
    }
}

impl Error for GctitError {}
