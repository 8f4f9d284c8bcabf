//! Frame orchestration
//!
//! [`Renderer`] owns the live [`Swapchain`] and one command buffer per frame
//! slot, and drives the begin/end frame protocol:
//!
//! ```text
//! begin_frame -> begin_swapchain_render_pass -> (draws) -> end_swapchain_render_pass -> end_frame
//! ```
//!
//! The middle three steps are skipped when `begin_frame` returns `None`.
//! An out-of-date swapchain at acquire drops the frame; an out-of-date or
//! suboptimal present, or a window resize, recreates after the frame is
//! presented.

use std::rc::Rc;

use ash::vk;

use crate::render::vulkan::commands::CommandBuffers;
use crate::render::vulkan::swapchain::{AcquiredImage, Swapchain, MAX_FRAMES_IN_FLIGHT};
use crate::render::vulkan::window::SurfaceWindow;
use crate::render::vulkan::{RenderDevice, VulkanError, VulkanResult};

const CLEAR_COLOR: [f32; 4] = [0.01, 0.01, 0.01, 1.0];

/// Swapchain owner and frame state machine
pub struct Renderer<D: RenderDevice> {
    command_buffers: CommandBuffers<D>,
    swapchain: Option<Swapchain<D>>,
    device: Rc<D>,
    current_image_index: u32,
    current_frame_index: usize,
    frame_started: bool,
}

/// Block on window events until the drawable area is non-empty
fn wait_for_drawable_extent<W: SurfaceWindow>(window: &mut W) -> vk::Extent2D {
    let mut extent = window.extent();
    if extent.width == 0 || extent.height == 0 {
        log::warn!("Window minimized, waiting for it to be restored");
    }
    while extent.width == 0 || extent.height == 0 {
        window.wait_events();
        extent = window.extent();
    }
    extent
}

impl<D: RenderDevice> Renderer<D> {
    /// Build the first swapchain for `window` and allocate frame command buffers
    pub fn new<W: SurfaceWindow>(device: Rc<D>, window: &mut W) -> VulkanResult<Self> {
        let extent = wait_for_drawable_extent(window);
        let swapchain = Swapchain::new(Rc::clone(&device), extent, None)?;
        let command_buffers = CommandBuffers::allocate(Rc::clone(&device), MAX_FRAMES_IN_FLIGHT)?;

        Ok(Self {
            command_buffers,
            swapchain: Some(swapchain),
            device,
            current_image_index: 0,
            current_frame_index: 0,
            frame_started: false,
        })
    }

    fn swapchain(&self) -> VulkanResult<&Swapchain<D>> {
        self.swapchain.as_ref().ok_or(VulkanError::SwapchainUnavailable)
    }

    fn swapchain_mut(&mut self) -> VulkanResult<&mut Swapchain<D>> {
        self.swapchain.as_mut().ok_or(VulkanError::SwapchainUnavailable)
    }

    /// Replace the swapchain with one matching the window's current size
    ///
    /// Blocks while the window is minimized. The color and depth formats must
    /// not change; a change is fatal and leaves the renderer without a
    /// swapchain.
    pub fn recreate_swapchain<W: SurfaceWindow>(&mut self, window: &mut W) -> VulkanResult<()> {
        let extent = wait_for_drawable_extent(window);
        self.device.wait_idle().map_err(VulkanError::Api)?;

        let previous = self.swapchain.take().ok_or(VulkanError::SwapchainUnavailable)?;
        let previous_formats = previous.formats();
        let swapchain = Swapchain::new(Rc::clone(&self.device), extent, Some(previous))?;

        if swapchain.formats() != previous_formats {
            log::error!(
                "Swapchain formats changed from {:?} to {:?}",
                previous_formats,
                swapchain.formats()
            );
            return Err(VulkanError::FormatMismatch {
                previous: previous_formats,
                current: swapchain.formats(),
            });
        }

        log::debug!("Swapchain recreated at {}x{}", extent.width, extent.height);
        self.swapchain = Some(swapchain);
        Ok(())
    }

    /// Acquire an image and start recording the current slot's command buffer
    ///
    /// Returns `None` when the swapchain was out of date; it has been
    /// recreated and the caller should skip this frame.
    pub fn begin_frame<W: SurfaceWindow>(&mut self, window: &mut W) -> VulkanResult<Option<vk::CommandBuffer>> {
        if self.frame_started {
            return Err(VulkanError::InvalidOperation {
                reason: "Cannot begin a frame while one is already in progress".to_string(),
            });
        }

        let image_index = match self.swapchain_mut()?.acquire_next_image()? {
            AcquiredImage::Ready(index) => index,
            AcquiredImage::Suboptimal(index) => {
                log::trace!("Acquired image {} from a suboptimal swapchain", index);
                index
            }
            AcquiredImage::OutOfDate => {
                log::warn!("Swapchain out of date at acquire, skipping frame");
                self.recreate_swapchain(window)?;
                return Ok(None);
            }
        };

        let command_buffer = self.slot_command_buffer()?;
        self.device
            .begin_command_buffer(command_buffer)
            .map_err(VulkanError::Api)?;

        self.current_image_index = image_index;
        self.frame_started = true;
        Ok(Some(command_buffer))
    }

    /// Finish recording, submit and present, then recreate if needed
    pub fn end_frame<W: SurfaceWindow>(&mut self, window: &mut W) -> VulkanResult<()> {
        let command_buffer = self.current_command_buffer()?;
        self.device
            .end_command_buffer(command_buffer)
            .map_err(VulkanError::Api)?;

        let image_index = self.current_image_index;
        let status = self.swapchain_mut()?.submit_command_buffers(command_buffer, image_index)?;

        self.frame_started = false;
        self.current_frame_index = (self.current_frame_index + 1) % MAX_FRAMES_IN_FLIGHT;
        debug_assert_eq!(Some(self.current_frame_index), self.swapchain.as_ref().map(Swapchain::current_frame));

        if status.needs_recreation() || window.was_resized() {
            log::warn!("Recreating swapchain after present ({:?}, resized: {})", status, window.was_resized());
            window.reset_resized_flag();
            self.recreate_swapchain(window)?;
        }

        Ok(())
    }

    /// Begin the swapchain render pass on the current image
    ///
    /// Clears color and depth, and sets viewport and scissor to the full extent.
    pub fn begin_swapchain_render_pass(&self, command_buffer: vk::CommandBuffer) -> VulkanResult<()> {
        self.ensure_recording(command_buffer, "begin")?;

        let swapchain = self.swapchain()?;
        let extent = swapchain.extent();
        let framebuffer = swapchain
            .framebuffer(self.current_image_index as usize)
            .ok_or_else(|| VulkanError::InvalidOperation {
                reason: format!("No framebuffer for image {}", self.current_image_index),
            })?;

        let clear_values = [
            vk::ClearValue {
                color: vk::ClearColorValue { float32: CLEAR_COLOR },
            },
            vk::ClearValue {
                depth_stencil: vk::ClearDepthStencilValue { depth: 1.0, stencil: 0 },
            },
        ];

        let render_area = vk::Rect2D {
            offset: vk::Offset2D { x: 0, y: 0 },
            extent,
        };

        let begin_info = vk::RenderPassBeginInfo::builder()
            .render_pass(swapchain.render_pass())
            .framebuffer(framebuffer)
            .render_area(render_area)
            .clear_values(&clear_values);

        self.device.cmd_begin_render_pass(command_buffer, &begin_info);

        let viewport = vk::Viewport {
            x: 0.0,
            y: 0.0,
            width: extent.width as f32,
            height: extent.height as f32,
            min_depth: 0.0,
            max_depth: 1.0,
        };
        self.device.cmd_set_viewport(command_buffer, viewport);
        self.device.cmd_set_scissor(command_buffer, render_area);

        Ok(())
    }

    /// End the swapchain render pass
    pub fn end_swapchain_render_pass(&self, command_buffer: vk::CommandBuffer) -> VulkanResult<()> {
        self.ensure_recording(command_buffer, "end")?;
        self.device.cmd_end_render_pass(command_buffer);
        Ok(())
    }

    fn ensure_recording(&self, command_buffer: vk::CommandBuffer, action: &str) -> VulkanResult<()> {
        let current = self.current_command_buffer().map_err(|_| VulkanError::InvalidOperation {
            reason: format!("Cannot {} render pass when no frame is in progress", action),
        })?;

        if command_buffer != current {
            return Err(VulkanError::InvalidOperation {
                reason: format!("Cannot {} render pass on a command buffer from another frame", action),
            });
        }
        Ok(())
    }

    fn slot_command_buffer(&self) -> VulkanResult<vk::CommandBuffer> {
        self.command_buffers
            .get(self.current_frame_index)
            .ok_or_else(|| VulkanError::InvalidOperation {
                reason: format!("No command buffer for frame slot {}", self.current_frame_index),
            })
    }

    /// Command buffer being recorded for the frame in progress
    pub fn current_command_buffer(&self) -> VulkanResult<vk::CommandBuffer> {
        if !self.frame_started {
            return Err(VulkanError::InvalidOperation {
                reason: "Cannot get command buffer when no frame is in progress".to_string(),
            });
        }
        self.slot_command_buffer()
    }

    /// Current frame slot in `[0, MAX_FRAMES_IN_FLIGHT)`
    pub fn frame_index(&self) -> usize {
        self.current_frame_index
    }

    /// Whether `begin_frame` succeeded without a matching `end_frame` yet
    pub fn is_frame_in_progress(&self) -> bool {
        self.frame_started
    }

    /// Render pass of the live swapchain, null if none is available
    pub fn render_pass(&self) -> vk::RenderPass {
        self.swapchain
            .as_ref()
            .map_or_else(vk::RenderPass::null, Swapchain::render_pass)
    }

    /// Extent of the live swapchain, zero if none is available
    pub fn swapchain_extent(&self) -> vk::Extent2D {
        self.swapchain
            .as_ref()
            .map(Swapchain::extent)
            .unwrap_or_default()
    }

    /// Width over height of the swapchain extent
    pub fn aspect_ratio(&self) -> f32 {
        self.swapchain
            .as_ref()
            .map_or(1.0, Swapchain::extent_aspect_ratio)
    }

    /// Block until the device has finished all submitted work
    pub fn wait_idle(&self) -> VulkanResult<()> {
        self.device.wait_idle().map_err(VulkanError::Api)
    }
}
