pub use crate::features::probe::engine::{
    CurlProbe, EndpointProbe, ProbeClient, ProbeRequest, backoff_delay, ping_with_retry,
};
