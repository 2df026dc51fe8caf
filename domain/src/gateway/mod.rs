//! HTTP clients for third-party services.

pub mod groq;
