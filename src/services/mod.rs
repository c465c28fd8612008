pub mod adjuster;
pub use adjuster::{AbortReason, AdjustmentOutcome, Adjuster};

pub mod host;
pub use host::{Host, RatioLookup};

pub mod identify;
pub use identify::MediaIdentity;

pub mod listener;
pub use listener::{Listener, SettingsSource};

pub mod retry;
pub use retry::RetryPolicy;
