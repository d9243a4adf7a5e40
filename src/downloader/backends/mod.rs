// Platform downloader backends

pub mod instagram;
pub mod youtube;
pub mod ytdlp;

pub use instagram::InstagramBackend;
pub use youtube::YouTubeBackend;
pub use ytdlp::YtDlp;
