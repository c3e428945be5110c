use e2e_echo::echo::ReturnStatus;
use tonic::Code;

/// Status every call asks the backend to answer with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpectedStatus {
    pub code: Code,
    pub message: String,
}

impl ExpectedStatus {
    #[must_use]
    pub fn new(code: Code, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn ok() -> Self {
        Self::new(Code::Ok, "")
    }

    pub(crate) fn to_proto(&self) -> ReturnStatus {
        ReturnStatus {
            code: self.code as i32,
            message: self.message.clone(),
        }
    }
}

impl From<Code> for ExpectedStatus {
    fn from(code: Code) -> Self {
        Self::new(code, "")
    }
}

const MAX_CODE: i32 = Code::Unauthenticated as i32;

/// Parses a gRPC status code by number (`5`) or by name (`not_found`,
/// `NotFound`, `NOT-FOUND`).
pub fn parse_code(s: &str) -> Result<Code, String> {
    let s = s.trim();

    if let Ok(n) = s.parse::<i32>() {
        if (0..=MAX_CODE).contains(&n) {
            return Ok(Code::from_i32(n));
        }
        return Err(format!("status code out of range 0..={MAX_CODE}: {n}"));
    }

    let wanted = normalize(s);
    if wanted == "canceled" {
        return Ok(Code::Cancelled);
    }

    (0..=MAX_CODE)
        .map(Code::from_i32)
        .find(|code| normalize(&format!("{code:?}")) == wanted)
        .ok_or_else(|| format!("unknown status code: {s}"))
}

fn normalize(s: &str) -> String {
    s.chars()
        .filter(|c| *c != '_' && *c != '-')
        .map(|c| c.to_ascii_lowercase())
        .collect()
}
