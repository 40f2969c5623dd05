use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppDomain {
    Config,
    Connection,
    Schema,
    Fetch,
    Decode,
    Persistence,
    Ack,
    HttpServer,
}

impl fmt::Display for AppDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AppDomain::Config => "config",
            AppDomain::Connection => "database connection",
            AppDomain::Schema => "database schema",
            AppDomain::Fetch => "kafka fetch",
            AppDomain::Decode => "message decode",
            AppDomain::Persistence => "database write",
            AppDomain::Ack => "kafka commit",
            AppDomain::HttpServer => "http server",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppError {
    pub domain: AppDomain,
    pub value: String,
}

impl AppError {
    pub fn new(domain: AppDomain, value: impl Into<String>) -> Self {
        AppError {
            domain,
            value: value.into(),
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} error: {}", self.domain, self.value)
    }
}

impl std::error::Error for AppError {}
