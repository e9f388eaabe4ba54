use std::fmt;

#[derive(Debug)]
pub enum ViewerError {
    NotFound(String),
    Io(String),
    Timeout,
    ConnectionFailed(String),
    ProxyError(String),
    HttpStatus(u16),
    JsonParse(String),
    UnexpectedShape(String),
    Config(String),
    Validation(String),
}

impl fmt::Display for ViewerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound(path) => write!(
                f,
                "failed to load flights: \"{path}\" does not exist. \
                 Pass --source or set source.location in flightview.toml"
            ),
            Self::Io(detail) => write!(f, "failed to load flights: {detail}"),
            Self::Timeout => write!(
                f,
                "failed to load flights: request timed out. \
                 Try increasing source.timeout_secs"
            ),
            Self::ConnectionFailed(detail) => write!(
                f,
                "failed to load flights: connection failed ({detail})"
            ),
            Self::ProxyError(detail) => write!(
                f,
                "failed to load flights: proxy error, check source.proxy ({detail})"
            ),
            Self::HttpStatus(status) => write!(
                f,
                "failed to load flights: unexpected HTTP status {status}"
            ),
            Self::JsonParse(detail) => write!(
                f,
                "failed to load flights: response is not valid JSON ({detail})"
            ),
            Self::UnexpectedShape(detail) => write!(
                f,
                "failed to load flights: expected {{ result: {{ flights: [...] }} }}, {detail}"
            ),
            Self::Config(detail) => write!(f, "invalid configuration: {detail}"),
            Self::Validation(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for ViewerError {}

impl From<figment::Error> for ViewerError {
    fn from(err: figment::Error) -> Self {
        Self::Config(err.to_string())
    }
}

pub fn from_io_error(err: std::io::Error, path: &str) -> ViewerError {
    match err.kind() {
        std::io::ErrorKind::NotFound => ViewerError::NotFound(path.to_string()),
        _ => ViewerError::Io(format!("{path}: {err}")),
    }
}

pub fn from_http_error(err: wreq::Error) -> ViewerError {
    let msg = err.to_string();
    let lower = msg.to_lowercase();

    if err.is_timeout() {
        return ViewerError::Timeout;
    }

    if err.is_connect() {
        return ViewerError::ConnectionFailed(msg);
    }

    if lower.contains("proxy") || lower.contains("socks") {
        return ViewerError::ProxyError(msg);
    }

    if lower.contains("builder error") && lower.contains("uri") {
        return ViewerError::ProxyError(msg);
    }

    ViewerError::ConnectionFailed(msg)
}
