//! `opendesk` application: CLI, logging bootstrap and the MCP stdio server.

pub mod cli;
pub mod doctor;
pub mod logging;
pub mod protocol;
pub mod server;

pub use server::McpServer;
