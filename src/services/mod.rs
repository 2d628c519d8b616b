pub mod accounts;
pub mod engagement;
pub mod feed;
pub mod gateway;
pub mod graph;

pub use accounts::{AccountService, LoginResponse};
pub use engagement::{EngagementService, LikeOutcome};
pub use feed::FeedService;
pub use gateway::AuthGateway;
pub use graph::SocialGraphService;
