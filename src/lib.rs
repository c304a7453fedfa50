pub mod archive;
pub mod commands;
pub mod download;
pub mod http;
pub mod inspect;
pub mod pipeline;
pub mod registry;
pub mod repack;
pub mod resolve;
pub mod runlog;
pub mod runtime;
pub mod versions;
