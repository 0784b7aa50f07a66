//! Comment sources.
//!
//! [`YtDlpSource`] talks to YouTube through the `yt-dlp` tool,
//! [`JsonLinesSource`] replays an exported comment dump and [`VecSource`]
//! serves comments already in memory.

mod jsonl;
mod memory;
mod ytdlp;

pub use jsonl::JsonLinesSource;
pub use memory::VecSource;
pub use ytdlp::{CommentSort, DEFAULT_PROGRAM, YtDlpSource};
