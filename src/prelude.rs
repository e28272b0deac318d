pub use {
    anyhow::{anyhow, bail, Error, Result},
    log::{debug, error, info, trace, warn},
};

pub use crate::config::{self, Config};
pub use crate::error::{FrameError, ReplayError};
pub use crate::sitop::frame::{Frame, FrameKind};
pub use crate::sitop::replay::{DumpPair, DroppedPair, ReplayStore};
