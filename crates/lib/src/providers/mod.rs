//! External collaborators: the video platform metadata client and the
//! streaming chat relay provider.

pub mod ai;
pub mod youtube;

pub use ai::{ChatProvider, ChatStream, OpenRouterProvider};
pub use youtube::YouTubeProvider;
