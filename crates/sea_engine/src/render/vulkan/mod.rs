//! Vulkan rendering backend
//!
//! Swapchain and frame orchestration on top of `ash`. Every GPU object is
//! wrapped in an RAII guard that releases it through a [`RenderDevice`].

/// Vulkan instance, device and error types
pub mod context;
/// Device collaborator interface consumed by the swapchain and renderer
pub mod device;
/// GLFW window and the window collaborator interface
pub mod window;
/// Semaphores, fences and per-frame synchronization sets
pub mod sync;
/// Swapchain-compatible render pass
pub mod render_pass;
/// Image views, depth buffers and framebuffers
pub mod framebuffer;
/// Command buffer pool for frames in flight
pub mod commands;
/// Presentable images and acquire/submit/present
pub mod swapchain;
/// Begin/end-frame state machine
pub mod renderer;

#[cfg(test)]
pub(crate) mod testing;

pub use context::{VulkanContext, VulkanResult, VulkanError, PhysicalDeviceInfo, LogicalDevice, VulkanInstance};
pub use device::{RenderDevice, SurfaceSupport, QueueFamilyIndices, FrameSubmission};
pub use window::{Window, WindowError, SurfaceWindow};
pub use sync::{Semaphore, Fence, FrameSync};
pub use render_pass::RenderPass;
pub use framebuffer::{Framebuffer, DepthBuffer, ImageView};
pub use commands::CommandBuffers;
pub use swapchain::{Swapchain, SwapchainFormats, AcquiredImage, PresentStatus, MAX_FRAMES_IN_FLIGHT};
pub use renderer::Renderer;
