//! Core engine types shared by the renderer and the application

pub mod config;

pub use config::{ApplicationConfig, EngineConfig, RendererConfig, WindowConfig};
