//! Runtime helpers called by colgen-generated encoders and test oracles.
//!
//! Generated modules import the submodules they need (`wire`, `oracle`, and on
//! demand `time`, `decimal`, `uuid`) and never touch the sink directly.

pub mod decimal;
pub mod oracle;
pub mod time;
pub mod wire;

pub use uuid;
