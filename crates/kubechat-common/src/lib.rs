pub mod errors;
pub mod events;
pub mod id;

pub use errors::{ConfigError, KubechatError};
pub use events::{Event, EventBus};
pub use id::{is_temporary_id, new_id, new_temporary_id, TEMPORARY_ID_PREFIX};

pub type Result<T> = std::result::Result<T, KubechatError>;
