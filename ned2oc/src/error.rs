use thiserror::Error;

/// Fatal structural problems that abort a feature pass.
///
/// Problems local to one element (a single ACL rule, an unbound neighbor)
/// are recorded as notes instead and never surface here.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TranslateError {
    #[error("OSPF network statement {ip} has invalid wildcard mask {mask:?}")]
    InvalidMask { ip: String, mask: String },
    #[error("OSPF {process} throttle timers {timer} needs values for {required}")]
    PartialTimers {
        process: String,
        timer: &'static str,
        required: &'static str,
    },
    #[error("OSPF area id {0:?} is neither an integer nor a dotted quad")]
    InvalidAreaId(String),
    #[error("malformed configuration at {path}: {reason}")]
    Malformed { path: String, reason: String },
    #[error("{0} has not yet been implemented for XR")]
    NotImplemented(&'static str),
}
