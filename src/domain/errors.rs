use std::fmt;

// Which outbound call ran out of time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimeoutStage {
    Auth,
    Charge,
}

impl fmt::Display for TimeoutStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeoutStage::Auth => f.write_str("auth"),
            TimeoutStage::Charge => f.write_str("charge"),
        }
    }
}

// Failures reported by the gateway port, before use cases give them meaning.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GatewayCallError {
    Timeout,
    Transport(String),
    Rejected { status: u16, body: String },
    Malformed(String),
}

impl fmt::Display for GatewayCallError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GatewayCallError::Timeout => f.write_str("gateway call timed out"),
            GatewayCallError::Transport(err) => write!(f, "gateway transport error: {err}"),
            GatewayCallError::Rejected { status, body } => {
                write!(f, "gateway rejected call with status {status}: {body}")
            }
            GatewayCallError::Malformed(err) => write!(f, "gateway response malformed: {err}"),
        }
    }
}

impl std::error::Error for GatewayCallError {}

// Domain-level errors for the charge workflow.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PixError {
    Validation(String),
    Auth(String),
    // Gateway answered but did not give us a usable charge.
    Gateway { status: Option<u16>, detail: String },
    // Gateway could not be reached or answered with something unreadable.
    GatewayUnavailable(String),
    Timeout(TimeoutStage),
}

impl fmt::Display for PixError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PixError::Validation(message) => write!(f, "invalid request: {message}"),
            PixError::Auth(cause) => write!(f, "gateway authentication failed: {cause}"),
            PixError::Gateway {
                status: Some(status),
                detail,
            } => write!(f, "gateway error {status}: {detail}"),
            PixError::Gateway {
                status: None,
                detail,
            } => write!(f, "gateway error: {detail}"),
            PixError::GatewayUnavailable(cause) => write!(f, "gateway unavailable: {cause}"),
            PixError::Timeout(stage) => write!(f, "gateway {stage} call timed out"),
        }
    }
}

impl std::error::Error for PixError {}
