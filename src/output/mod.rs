pub mod slides;
pub mod srt;
