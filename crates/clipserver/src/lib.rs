//! Cuts a time range out of an X / Twitter video and serves it for a while.
//!
//! `POST /clip` downloads the post's video with yt-dlp, trims it with ffmpeg
//! (stream copy) and answers with a link under `/download/`. The clip is
//! deleted when its retention window runs out.

pub mod cleanup;
pub mod clip;
pub mod config;
pub mod error;
pub mod ids;
pub mod routes;
pub mod state;
pub mod tools;

pub use config::Config;
pub use routes::build_router;
pub use state::AppState;
