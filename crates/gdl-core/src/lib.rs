pub mod config;
pub mod logging;

pub mod downloader;
pub mod drive;
pub mod fetcher;
pub mod lister;
pub mod manifest;
pub mod progress;
pub mod retry;
pub mod storage;
