pub mod error;
pub mod ids;
pub mod session;

pub use error::{Result, StoreError, StoreErrorKind};
pub use ids::SessionId;
pub use session::{Session, SessionStore};
