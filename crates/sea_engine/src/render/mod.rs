//! Rendering backends
//!
//! Only Vulkan is implemented. Scene content and pipelines live in the
//! application; this layer owns presentation and frame pacing.

pub mod vulkan;
