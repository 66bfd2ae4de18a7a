//! Authentication and session management

pub mod cookie;
pub mod guard;
pub mod models;
pub mod password;
pub mod session;
pub mod token;

pub use cookie::CookieOptions;
pub use guard::{AuthUser, MaybeAuthUser};
pub use models::{Identity, Role, SessionStatus};
pub use password::{hash_password, verify_password};
pub use session::{EstablishedSession, SessionService, SignupOutcome};
pub use token::{Claims, TokenCodec};
