/// Plain domain structs for the Pulse core.
///
/// The persistence mapping lives behind the repository traits in `crate::db`;
/// nothing in here knows how it is stored.
pub mod id;
pub mod models;
pub mod period;

pub use id::ObjectId;
pub use models::{Account, AccountView, AccountWithFollowers, Comment, Post, Profile};
pub use period::Period;
