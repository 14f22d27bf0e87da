pub mod error;
pub mod handler;
pub mod identity;
pub mod ledger;
pub mod lock;
pub mod status;
pub mod window;

pub use self::error::AttendanceError;
pub use self::handler::{AttendanceService, AttendanceSettings, JoinEvent, JoinOutcome};
pub use self::identity::resolve_identity;
pub use self::ledger::{AttendanceLedger, WriteOutcome};
pub use self::status::{AttendanceStatus, classify};
pub use self::window::{Period, resolve_period};
