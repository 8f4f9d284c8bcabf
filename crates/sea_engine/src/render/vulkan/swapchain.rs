//! Swapchain management
//!
//! A [`Swapchain`] owns everything needed to render into presentable images:
//! the swapchain itself, one color view, depth buffer and framebuffer per
//! image, the render pass they share, and one set of synchronization
//! primitives per frame in flight.
//!
//! Resources are released in exact reverse creation order. Creation runs
//! swapchain, views, render pass, depth buffers, framebuffers, sync objects;
//! the struct declares its fields the other way round and per-image
//! collections drop from the back.
//!
//! Recreation chains: the predecessor is moved into [`Swapchain::new`], its
//! handle passed as `old_swapchain`, and dropped once the new one is complete.

use std::ops::Deref;
use std::rc::Rc;

use ash::vk;

use crate::render::vulkan::device::FrameSubmission;
use crate::render::vulkan::framebuffer::{DepthBuffer, Framebuffer, ImageView};
use crate::render::vulkan::render_pass::RenderPass;
use crate::render::vulkan::sync::FrameSync;
use crate::render::vulkan::{RenderDevice, VulkanError, VulkanResult};

/// Frames the host may record ahead of the GPU
pub const MAX_FRAMES_IN_FLIGHT: usize = 2;

const DEPTH_FORMAT_CANDIDATES: [vk::Format; 3] = [
    vk::Format::D32_SFLOAT,
    vk::Format::D32_SFLOAT_S8_UINT,
    vk::Format::D24_UNORM_S8_UINT,
];

/// Color and depth formats chosen for a swapchain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwapchainFormats {
    /// Presentable image format
    pub color: vk::Format,
    /// Depth attachment format
    pub depth: vk::Format,
}

/// Outcome of acquiring a presentable image
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AcquiredImage {
    /// Image ready for rendering
    Ready(u32),
    /// Image usable, but the swapchain no longer matches the surface exactly
    Suboptimal(u32),
    /// Swapchain can no longer present to the surface
    OutOfDate,
}

/// Outcome of presenting a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresentStatus {
    /// Presented to a matching surface
    Optimal,
    /// Presented, but the swapchain should be recreated
    Suboptimal,
    /// Not presentable; the swapchain must be recreated
    OutOfDate,
}

impl PresentStatus {
    /// Whether the swapchain should be recreated before the next frame
    pub fn needs_recreation(self) -> bool {
        !matches!(self, Self::Optimal)
    }
}

/// Swapchain handle with RAII cleanup
///
/// The presentable images belong to the swapchain and are never destroyed
/// individually.
pub struct SwapchainHandle<D: RenderDevice> {
    device: Rc<D>,
    swapchain: vk::SwapchainKHR,
}

impl<D: RenderDevice> SwapchainHandle<D> {
    /// Get the swapchain handle
    pub fn handle(&self) -> vk::SwapchainKHR {
        self.swapchain
    }
}

impl<D: RenderDevice> Drop for SwapchainHandle<D> {
    fn drop(&mut self) {
        self.device.destroy_swapchain(self.swapchain);
    }
}

/// Owned resources released last-created-first
struct ResourceStack<T>(Vec<T>);

impl<T> ResourceStack<T> {
    fn with_capacity(capacity: usize) -> Self {
        Self(Vec::with_capacity(capacity))
    }

    fn push(&mut self, resource: T) {
        self.0.push(resource);
    }
}

impl<T> Deref for ResourceStack<T> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        &self.0
    }
}

impl<T> Drop for ResourceStack<T> {
    fn drop(&mut self) {
        while let Some(resource) = self.0.pop() {
            drop(resource);
        }
    }
}

/// Pick `B8G8R8A8_SRGB` with sRGB nonlinear color space, else the first format
pub fn choose_surface_format(formats: &[vk::SurfaceFormatKHR]) -> VulkanResult<vk::SurfaceFormatKHR> {
    formats
        .iter()
        .find(|sf| sf.format == vk::Format::B8G8R8A8_SRGB && sf.color_space == vk::ColorSpaceKHR::SRGB_NONLINEAR)
        .or_else(|| formats.first())
        .copied()
        .ok_or_else(|| VulkanError::InitializationFailed("Surface reports no formats".to_string()))
}

/// Pick mailbox when available, else FIFO, which every device supports
pub fn choose_present_mode(present_modes: &[vk::PresentModeKHR]) -> vk::PresentModeKHR {
    present_modes
        .iter()
        .copied()
        .find(|&mode| mode == vk::PresentModeKHR::MAILBOX)
        .unwrap_or(vk::PresentModeKHR::FIFO)
}

/// Use the surface's current extent, or clamp `requested` when the surface leaves it to us
pub fn choose_extent(capabilities: &vk::SurfaceCapabilitiesKHR, requested: vk::Extent2D) -> vk::Extent2D {
    if capabilities.current_extent.width != u32::MAX {
        return capabilities.current_extent;
    }

    vk::Extent2D {
        width: requested.width.clamp(
            capabilities.min_image_extent.width,
            capabilities.max_image_extent.width,
        ),
        height: requested.height.clamp(
            capabilities.min_image_extent.height,
            capabilities.max_image_extent.height,
        ),
    }
}

/// One more than the minimum, capped at the maximum when the surface has one
pub fn choose_image_count(capabilities: &vk::SurfaceCapabilitiesKHR) -> u32 {
    let desired = capabilities.min_image_count + 1;
    if capabilities.max_image_count > 0 {
        desired.min(capabilities.max_image_count)
    } else {
        desired
    }
}

/// Presentable images plus everything needed to render and present into them
pub struct Swapchain<D: RenderDevice> {
    frame_syncs: ResourceStack<FrameSync<D>>,
    framebuffers: ResourceStack<Framebuffer<D>>,
    depth_buffers: ResourceStack<DepthBuffer<D>>,
    render_pass: RenderPass<D>,
    image_views: ResourceStack<ImageView<D>>,
    swapchain: SwapchainHandle<D>,
    images: Vec<vk::Image>,
    /// Frame slot whose fence guards the last submission to each image
    images_in_flight: Vec<Option<usize>>,
    formats: SwapchainFormats,
    present_mode: vk::PresentModeKHR,
    extent: vk::Extent2D,
    current_frame: usize,
    device: Rc<D>,
}

impl<D: RenderDevice> Swapchain<D> {
    /// Create a swapchain for `window_extent`, optionally replacing `previous`
    ///
    /// `previous` is retired through `old_swapchain` and released before this
    /// returns. The frame slot counter carries over from it.
    pub fn new(device: Rc<D>, window_extent: vk::Extent2D, previous: Option<Self>) -> VulkanResult<Self> {
        let support = device.surface_support()?;

        let surface_format = choose_surface_format(&support.formats)?;
        let present_mode = choose_present_mode(&support.present_modes);
        let extent = choose_extent(&support.capabilities, window_extent);
        let image_count = choose_image_count(&support.capabilities);

        let families = device.queue_families();
        let family_indices = [families.graphics, families.present];
        let old_swapchain = previous
            .as_ref()
            .map_or_else(vk::SwapchainKHR::null, |old| old.swapchain.handle());

        let mut create_info = vk::SwapchainCreateInfoKHR::builder()
            .surface(device.surface())
            .min_image_count(image_count)
            .image_format(surface_format.format)
            .image_color_space(surface_format.color_space)
            .image_extent(extent)
            .image_array_layers(1)
            .image_usage(vk::ImageUsageFlags::COLOR_ATTACHMENT)
            .pre_transform(support.capabilities.current_transform)
            .composite_alpha(vk::CompositeAlphaFlagsKHR::OPAQUE)
            .present_mode(present_mode)
            .clipped(true)
            .old_swapchain(old_swapchain);

        create_info = if families.is_split() {
            create_info
                .image_sharing_mode(vk::SharingMode::CONCURRENT)
                .queue_family_indices(&family_indices)
        } else {
            create_info.image_sharing_mode(vk::SharingMode::EXCLUSIVE)
        };

        let swapchain = SwapchainHandle {
            swapchain: device.create_swapchain(&create_info).map_err(VulkanError::Api)?,
            device: Rc::clone(&device),
        };

        // The implementation may create more images than requested
        let images = device.swapchain_images(swapchain.handle()).map_err(VulkanError::Api)?;

        log::info!(
            "Swapchain: {} images, {:?} {:?}, {:?}, {}x{}",
            images.len(),
            surface_format.format,
            surface_format.color_space,
            present_mode,
            extent.width,
            extent.height
        );

        let mut image_views = ResourceStack::with_capacity(images.len());
        for &image in &images {
            image_views.push(ImageView::new_2d(
                Rc::clone(&device),
                image,
                surface_format.format,
                vk::ImageAspectFlags::COLOR,
            )?);
        }

        let depth_format = device
            .find_supported_format(
                &DEPTH_FORMAT_CANDIDATES,
                vk::ImageTiling::OPTIMAL,
                vk::FormatFeatureFlags::DEPTH_STENCIL_ATTACHMENT,
            )
            .ok_or(VulkanError::NoSupportedDepthFormat)?;

        let render_pass = RenderPass::new_swapchain_pass(Rc::clone(&device), surface_format.format, depth_format)?;

        let mut depth_buffers = ResourceStack::with_capacity(images.len());
        for _ in &images {
            depth_buffers.push(DepthBuffer::new(Rc::clone(&device), depth_format, extent)?);
        }

        let mut framebuffers = ResourceStack::with_capacity(images.len());
        for (view, depth) in image_views.iter().zip(depth_buffers.iter()) {
            framebuffers.push(Framebuffer::new(
                Rc::clone(&device),
                render_pass.handle(),
                &[view.handle(), depth.view()],
                extent,
            )?);
        }

        let mut frame_syncs = ResourceStack::with_capacity(MAX_FRAMES_IN_FLIGHT);
        for _ in 0..MAX_FRAMES_IN_FLIGHT {
            frame_syncs.push(FrameSync::new(&device)?);
        }

        let current_frame = previous.as_ref().map_or(0, |old| old.current_frame);
        drop(previous);

        Ok(Self {
            frame_syncs,
            framebuffers,
            depth_buffers,
            render_pass,
            image_views,
            swapchain,
            images_in_flight: vec![None; images.len()],
            images,
            formats: SwapchainFormats {
                color: surface_format.format,
                depth: depth_format,
            },
            present_mode,
            extent,
            current_frame,
            device,
        })
    }

    /// Wait for the current slot to retire, then acquire the next image
    ///
    /// Does not advance the frame slot.
    pub fn acquire_next_image(&mut self) -> VulkanResult<AcquiredImage> {
        let sync = &self.frame_syncs[self.current_frame];
        sync.in_flight.wait(u64::MAX)?;

        match self.device.acquire_next_image(
            self.swapchain.handle(),
            u64::MAX,
            sync.image_available.handle(),
        ) {
            Ok((index, false)) => Ok(AcquiredImage::Ready(index)),
            Ok((index, true)) => Ok(AcquiredImage::Suboptimal(index)),
            Err(vk::Result::ERROR_OUT_OF_DATE_KHR) => Ok(AcquiredImage::OutOfDate),
            Err(e) => Err(VulkanError::Api(e)),
        }
    }

    /// Submit `command_buffer` rendering into `image_index`, then present it
    ///
    /// Waits first if an earlier frame still renders into the same image.
    /// Advances the frame slot once presentation has been queued.
    pub fn submit_command_buffers(
        &mut self,
        command_buffer: vk::CommandBuffer,
        image_index: u32,
    ) -> VulkanResult<PresentStatus> {
        let image = image_index as usize;
        if image >= self.images.len() {
            return Err(VulkanError::InvalidOperation {
                reason: format!("Image index {} out of range for {} images", image_index, self.images.len()),
            });
        }

        if let Some(slot) = self.images_in_flight[image] {
            self.frame_syncs[slot].in_flight.wait(u64::MAX)?;
        }
        self.images_in_flight[image] = Some(self.current_frame);

        let sync = &self.frame_syncs[self.current_frame];
        sync.in_flight.reset()?;
        self.device
            .queue_submit(&FrameSubmission {
                command_buffer,
                wait_semaphore: sync.image_available.handle(),
                wait_stage: vk::PipelineStageFlags::COLOR_ATTACHMENT_OUTPUT,
                signal_semaphore: sync.render_finished.handle(),
                fence: sync.in_flight.handle(),
            })
            .map_err(VulkanError::Api)?;

        let presented = self.device.queue_present(
            self.swapchain.handle(),
            image_index,
            sync.render_finished.handle(),
        );

        self.current_frame = (self.current_frame + 1) % MAX_FRAMES_IN_FLIGHT;

        match presented {
            Ok(false) => Ok(PresentStatus::Optimal),
            Ok(true) => Ok(PresentStatus::Suboptimal),
            Err(vk::Result::ERROR_OUT_OF_DATE_KHR) => Ok(PresentStatus::OutOfDate),
            Err(e) => Err(VulkanError::Api(e)),
        }
    }

    /// Render pass compatible with every framebuffer of this swapchain
    pub fn render_pass(&self) -> vk::RenderPass {
        self.render_pass.handle()
    }

    /// Framebuffer targeting presentable image `index`
    pub fn framebuffer(&self, index: usize) -> Option<vk::Framebuffer> {
        self.framebuffers.get(index).map(Framebuffer::handle)
    }

    /// Raw swapchain handle
    pub fn handle(&self) -> vk::SwapchainKHR {
        self.swapchain.handle()
    }

    /// Chosen image extent
    pub fn extent(&self) -> vk::Extent2D {
        self.extent
    }

    /// Chosen color and depth formats
    pub fn formats(&self) -> SwapchainFormats {
        self.formats
    }

    /// Chosen presentation mode
    pub fn present_mode(&self) -> vk::PresentModeKHR {
        self.present_mode
    }

    /// Number of presentable images
    pub fn image_count(&self) -> usize {
        self.images.len()
    }

    /// Current frame slot in `[0, MAX_FRAMES_IN_FLIGHT)`
    pub fn current_frame(&self) -> usize {
        self.current_frame
    }

    /// Width over height of the image extent
    pub fn extent_aspect_ratio(&self) -> f32 {
        self.extent.width as f32 / self.extent.height as f32
    }
}
