pub mod error;
pub mod file;
pub mod kv;
pub mod memory;
pub mod session_store;

pub use error::{StorageError, StorageResult};
pub use file::FileStorage;
pub use kv::KeyValueStorage;
pub use memory::MemoryStorage;
pub use session_store::{REMEMBER_ME_KEY, SESSION_KEY, SessionStore};
