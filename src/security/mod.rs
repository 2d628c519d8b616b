pub mod password;
pub mod registry;
pub mod tokens;

pub use registry::{InMemoryTokenRegistry, RedisTokenRegistry, RefreshTokenRegistry};
pub use tokens::{Claims, TokenService};
