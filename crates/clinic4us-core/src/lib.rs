pub mod clock;
pub mod error;
pub mod events;
pub mod page;
pub mod role;
pub mod session;
pub mod time;

pub use clock::{remaining, remaining_at};
pub use error::{CoreError, Result};
pub use events::{SessionEvent, SessionEventBroadcaster};
pub use page::Page;
pub use role::Role;
pub use session::SessionRecord;
pub use crate::time::{from_epoch_millis, now_millis, now_utc, to_epoch_millis};
