use serde::{Deserialize, Serialize};

/// How a token was obtained. Only `Access` tokens come from a password check.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Anonymous,
}

/// JWT payload. Timestamps are seconds since the Unix epoch.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    pub sub: String, // username or any requested name
    pub iat: i64,    // issued at
    pub exp: i64,    // expires at
    pub kind: TokenKind,
}
