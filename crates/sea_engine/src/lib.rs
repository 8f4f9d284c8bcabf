//! # Sea Engine
//!
//! Vulkan presentation layer for the Sea Fight renderer.
//!
//! ## Features
//!
//! - **Swapchain management**: surface negotiation, depth attachments, framebuffers
//!   and recreation on resize
//! - **Frame orchestration**: begin/end-frame protocol with two frames in flight
//! - **RAII resources**: every Vulkan object is released exactly once, in reverse
//!   creation order
//! - **Configuration**: TOML/RON application settings
//!
//! ## Frame protocol
//!
//! ```rust,no_run
//! use std::rc::Rc;
//! use sea_engine::prelude::*;
//!
//! fn run() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut window = Window::new("Sea Fight", 800, 600)?;
//!     let context = Rc::new(VulkanContext::new(&mut window, "Sea Fight", false)?);
//!     let mut renderer = Renderer::new(context, &mut window)?;
//!
//!     while !window.should_close() {
//!         window.poll_events();
//!         if let Some(command_buffer) = renderer.begin_frame(&mut window)? {
//!             renderer.begin_swapchain_render_pass(command_buffer)?;
//!             // record draw commands here
//!             renderer.end_swapchain_render_pass(command_buffer)?;
//!             renderer.end_frame(&mut window)?;
//!         }
//!     }
//!     renderer.wait_idle()?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod config;
pub mod core;
pub mod foundation;
pub mod render;

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        config::{Config, ConfigError},
        core::config::{ApplicationConfig, EngineConfig, RendererConfig, WindowConfig},
        foundation::time::{FixedTimestep, RateCounter},
        render::vulkan::{
            Renderer, RenderDevice, Swapchain, SurfaceWindow, VulkanContext, VulkanError,
            VulkanResult, Window, WindowError, MAX_FRAMES_IN_FLIGHT,
        },
    };
}
