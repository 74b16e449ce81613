// Library surface for headless/integration tests and reuse.
// Keep this lean to avoid coupling to bin-only types in main.rs.
pub mod app_dirs;
pub mod celebration;
pub mod config;
pub mod editor;
pub mod error;
pub mod game;
pub mod game_config;
pub mod loader;
pub mod region;
pub mod results;
pub mod runtime;
pub mod samples;
pub mod session;
pub mod store;
pub mod timer;

pub use error::SpotError;
pub use game::{ClickOutcome, Feedback, Game, Phase};
pub use game_config::GameConfig;
pub use region::{Point, Region, RenderedBox};
