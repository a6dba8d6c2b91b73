//! Integration tests for drive synchronization, the tag codec, and configuration

mod cli_commands;
mod config_loading;
mod drive_sync;
mod support;
mod tag_codec;
