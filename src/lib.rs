//! Cinema Sócrates: turns ideas, documents, songs and voice notes into
//! philosophical movie posters and memes, critiques music, and chats with a
//! philosophy-professor persona, all through a generative-AI provider.

pub mod app;
pub mod audio;
pub mod config;
pub mod export;
pub mod genai;
pub mod media;
pub mod messages;
pub mod pipeline;
