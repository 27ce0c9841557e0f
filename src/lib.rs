// Library root
// -----------
// This crate exposes a small blocking client for the RPC-style API of a
// Lychee photo gallery, plus the plumbing the `lychee-upload` binary uses
// around it.
//
// Module responsibilities:
// - `dispatch`: builds and sends the single POST every remote function goes
//   through, form-encoded or multipart, on top of a cookie-carrying session.
// - `response`: status checks and body decoding (text, JSON, photo ids).
// - `client`: the authenticated `LycheeClient` and its album/photo calls.
// - `album` / `image`: small value types decoded from or sent to the server.
// - `config`: login data from a properties file and command-line overrides.
// - `ui`: the command handlers the binary dispatches to.
pub mod album;
pub mod client;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod image;
pub mod logging;
pub mod response;
pub mod ui;

pub use album::Album;
pub use client::LycheeClient;
pub use error::{ErrorKind, LycheeError, Result};
