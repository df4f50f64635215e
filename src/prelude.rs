pub use crate::base::{
    config::Config,
    types::{Err, EventKind, InboundEvent, Res, Void},
};
pub use crate::interaction::{listeners::Listeners, say::Say};
pub use anyhow::anyhow;
pub use tracing::{debug, error, info, instrument, warn};
