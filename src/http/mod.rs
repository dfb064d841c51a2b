//! HTTP Transport layer for the Model Context Protocol
//!
//! Provides the external API routing, including the base `/mcp` listener and
//! other endpoints.

pub mod handlers;
