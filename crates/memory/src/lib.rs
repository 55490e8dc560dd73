pub mod session_state;
pub mod types;
pub mod user_store;

pub use session_state::SessionStateStore;
pub use types::*;
pub use user_store::{InMemoryUserStore, UserStore, UserStoreError};
