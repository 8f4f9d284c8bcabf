//! Device collaborator interface
//!
//! The swapchain and renderer never touch `ash::Device` directly. They go
//! through [`RenderDevice`], which exposes exactly the calls presentation
//! needs: surface queries, object creation and destruction, fence handling,
//! queue submission and presentation. [`VulkanContext`](super::VulkanContext)
//! implements it on a real device.
//!
//! Create-info structures are passed through unchanged so implementations see
//! the same parameters `ash` would.

use ash::prelude::VkResult;
use ash::vk;

use crate::render::vulkan::VulkanResult;

/// Surface properties queried before building a swapchain
#[derive(Debug, Clone, Default)]
pub struct SurfaceSupport {
    /// Image count, extent and transform limits of the surface
    pub capabilities: vk::SurfaceCapabilitiesKHR,
    /// Supported color formats, in driver order
    pub formats: Vec<vk::SurfaceFormatKHR>,
    /// Supported presentation modes
    pub present_modes: Vec<vk::PresentModeKHR>,
}

/// Queue family indices for graphics and presentation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueueFamilyIndices {
    /// Family used for command submission
    pub graphics: u32,
    /// Family used for presentation
    pub present: u32,
}

impl QueueFamilyIndices {
    /// Whether graphics and presentation are served by different families
    pub fn is_split(&self) -> bool {
        self.graphics != self.present
    }
}

/// One frame's command buffer submission
#[derive(Debug, Clone, Copy)]
pub struct FrameSubmission {
    /// Recorded command buffer
    pub command_buffer: vk::CommandBuffer,
    /// Semaphore signalled when the target image is available
    pub wait_semaphore: vk::Semaphore,
    /// Stage that waits on `wait_semaphore`
    pub wait_stage: vk::PipelineStageFlags,
    /// Semaphore signalled when rendering completes
    pub signal_semaphore: vk::Semaphore,
    /// Fence signalled when the submission completes
    pub fence: vk::Fence,
}

/// Logical device operations used by presentation
pub trait RenderDevice {
    /// Surface that swapchains present to
    fn surface(&self) -> vk::SurfaceKHR;

    /// Query surface capabilities, formats and present modes
    fn surface_support(&self) -> VulkanResult<SurfaceSupport>;

    /// Graphics and present queue family indices
    fn queue_families(&self) -> QueueFamilyIndices;

    /// First format in `candidates` that supports `features` with `tiling`
    fn find_supported_format(
        &self,
        candidates: &[vk::Format],
        tiling: vk::ImageTiling,
        features: vk::FormatFeatureFlags,
    ) -> Option<vk::Format>;

    /// Create a swapchain
    fn create_swapchain(&self, create_info: &vk::SwapchainCreateInfoKHR) -> VkResult<vk::SwapchainKHR>;

    /// Destroy a swapchain
    fn destroy_swapchain(&self, swapchain: vk::SwapchainKHR);

    /// Presentable images owned by a swapchain
    fn swapchain_images(&self, swapchain: vk::SwapchainKHR) -> VkResult<Vec<vk::Image>>;

    /// Create an image view
    fn create_image_view(&self, create_info: &vk::ImageViewCreateInfo) -> VkResult<vk::ImageView>;

    /// Destroy an image view
    fn destroy_image_view(&self, image_view: vk::ImageView);

    /// Create an image and bind freshly allocated memory with `properties`
    fn create_image_with_memory(
        &self,
        create_info: &vk::ImageCreateInfo,
        properties: vk::MemoryPropertyFlags,
    ) -> VulkanResult<(vk::Image, vk::DeviceMemory)>;

    /// Destroy an image
    fn destroy_image(&self, image: vk::Image);

    /// Free device memory
    fn free_memory(&self, memory: vk::DeviceMemory);

    /// Create a render pass
    fn create_render_pass(&self, create_info: &vk::RenderPassCreateInfo) -> VkResult<vk::RenderPass>;

    /// Destroy a render pass
    fn destroy_render_pass(&self, render_pass: vk::RenderPass);

    /// Create a framebuffer
    fn create_framebuffer(&self, create_info: &vk::FramebufferCreateInfo) -> VkResult<vk::Framebuffer>;

    /// Destroy a framebuffer
    fn destroy_framebuffer(&self, framebuffer: vk::Framebuffer);

    /// Create a binary semaphore
    fn create_semaphore(&self) -> VkResult<vk::Semaphore>;

    /// Destroy a semaphore
    fn destroy_semaphore(&self, semaphore: vk::Semaphore);

    /// Create a fence, optionally already signalled
    fn create_fence(&self, signaled: bool) -> VkResult<vk::Fence>;

    /// Destroy a fence
    fn destroy_fence(&self, fence: vk::Fence);

    /// Block until `fence` is signalled or `timeout` nanoseconds pass
    fn wait_for_fence(&self, fence: vk::Fence, timeout: u64) -> VkResult<()>;

    /// Return `fence` to the unsignalled state
    fn reset_fence(&self, fence: vk::Fence) -> VkResult<()>;

    /// Acquire the next presentable image; the flag is `true` when suboptimal
    fn acquire_next_image(
        &self,
        swapchain: vk::SwapchainKHR,
        timeout: u64,
        semaphore: vk::Semaphore,
    ) -> VkResult<(u32, bool)>;

    /// Submit one command buffer to the graphics queue
    fn queue_submit(&self, submission: &FrameSubmission) -> VkResult<()>;

    /// Present `image_index` on the present queue; `true` when suboptimal
    fn queue_present(
        &self,
        swapchain: vk::SwapchainKHR,
        image_index: u32,
        wait_semaphore: vk::Semaphore,
    ) -> VkResult<bool>;

    /// Allocate primary command buffers from the device command pool
    fn allocate_command_buffers(&self, count: u32) -> VkResult<Vec<vk::CommandBuffer>>;

    /// Return command buffers to the device command pool
    fn free_command_buffers(&self, command_buffers: &[vk::CommandBuffer]);

    /// Begin recording; resets any previous contents
    fn begin_command_buffer(&self, command_buffer: vk::CommandBuffer) -> VkResult<()>;

    /// Finish recording
    fn end_command_buffer(&self, command_buffer: vk::CommandBuffer) -> VkResult<()>;

    /// Record a render pass begin with inline subpass contents
    fn cmd_begin_render_pass(&self, command_buffer: vk::CommandBuffer, begin_info: &vk::RenderPassBeginInfo);

    /// Record a dynamic viewport
    fn cmd_set_viewport(&self, command_buffer: vk::CommandBuffer, viewport: vk::Viewport);

    /// Record a dynamic scissor
    fn cmd_set_scissor(&self, command_buffer: vk::CommandBuffer, scissor: vk::Rect2D);

    /// Record a render pass end
    fn cmd_end_render_pass(&self, command_buffer: vk::CommandBuffer);

    /// Block until all queues are idle
    fn wait_idle(&self) -> VkResult<()>;
}
