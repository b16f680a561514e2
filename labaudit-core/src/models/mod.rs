pub mod record;
pub mod session;

pub use record::RawRecord;
pub use session::{Session, SessionStatus, OVER_THRESHOLD_MINUTES};
