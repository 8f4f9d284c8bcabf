//! Framebuffer and attachment management
//!
//! RAII wrappers for the per-image resources of a swapchain: color image views,
//! depth buffers and the framebuffers that bind them to the render pass.

use std::rc::Rc;

use ash::vk;

use crate::render::vulkan::{RenderDevice, VulkanError, VulkanResult};

/// Image view wrapper with RAII cleanup
///
/// Does not own the underlying image.
pub struct ImageView<D: RenderDevice> {
    device: Rc<D>,
    image_view: vk::ImageView,
}

impl<D: RenderDevice> ImageView<D> {
    /// Create a single-level 2D view of `image`
    pub fn new_2d(
        device: Rc<D>,
        image: vk::Image,
        format: vk::Format,
        aspect_mask: vk::ImageAspectFlags,
    ) -> VulkanResult<Self> {
        let create_info = vk::ImageViewCreateInfo::builder()
            .image(image)
            .view_type(vk::ImageViewType::TYPE_2D)
            .format(format)
            .subresource_range(vk::ImageSubresourceRange {
                aspect_mask,
                base_mip_level: 0,
                level_count: 1,
                base_array_layer: 0,
                layer_count: 1,
            });

        let image_view = device.create_image_view(&create_info).map_err(VulkanError::Api)?;
        Ok(Self { device, image_view })
    }

    /// Get the image view handle
    pub fn handle(&self) -> vk::ImageView {
        self.image_view
    }
}

impl<D: RenderDevice> Drop for ImageView<D> {
    fn drop(&mut self) {
        self.device.destroy_image_view(self.image_view);
    }
}

/// Framebuffer wrapper with RAII cleanup
pub struct Framebuffer<D: RenderDevice> {
    device: Rc<D>,
    framebuffer: vk::Framebuffer,
}

impl<D: RenderDevice> Framebuffer<D> {
    /// Create a new framebuffer
    pub fn new(
        device: Rc<D>,
        render_pass: vk::RenderPass,
        attachments: &[vk::ImageView],
        extent: vk::Extent2D,
    ) -> VulkanResult<Self> {
        let framebuffer_create_info = vk::FramebufferCreateInfo::builder()
            .render_pass(render_pass)
            .attachments(attachments)
            .width(extent.width)
            .height(extent.height)
            .layers(1);

        let framebuffer = device
            .create_framebuffer(&framebuffer_create_info)
            .map_err(VulkanError::Api)?;

        Ok(Self {
            device,
            framebuffer,
        })
    }

    /// Get the framebuffer handle
    pub fn handle(&self) -> vk::Framebuffer {
        self.framebuffer
    }
}

impl<D: RenderDevice> Drop for Framebuffer<D> {
    fn drop(&mut self) {
        self.device.destroy_framebuffer(self.framebuffer);
    }
}

/// Depth buffer wrapper with RAII cleanup
///
/// Owns the image, its memory and its view. They are released in reverse
/// creation order: view, memory, image.
pub struct DepthBuffer<D: RenderDevice> {
    device: Rc<D>,
    image: vk::Image,
    memory: vk::DeviceMemory,
    image_view: vk::ImageView,
}

impl<D: RenderDevice> DepthBuffer<D> {
    /// Create a device-local depth attachment of `extent` in `format`
    pub fn new(device: Rc<D>, format: vk::Format, extent: vk::Extent2D) -> VulkanResult<Self> {
        let image_create_info = vk::ImageCreateInfo::builder()
            .image_type(vk::ImageType::TYPE_2D)
            .extent(vk::Extent3D {
                width: extent.width,
                height: extent.height,
                depth: 1,
            })
            .mip_levels(1)
            .array_layers(1)
            .format(format)
            .tiling(vk::ImageTiling::OPTIMAL)
            .initial_layout(vk::ImageLayout::UNDEFINED)
            .usage(vk::ImageUsageFlags::DEPTH_STENCIL_ATTACHMENT)
            .sharing_mode(vk::SharingMode::EXCLUSIVE)
            .samples(vk::SampleCountFlags::TYPE_1);

        let (image, memory) = device
            .create_image_with_memory(&image_create_info, vk::MemoryPropertyFlags::DEVICE_LOCAL)?;

        let image_view_create_info = vk::ImageViewCreateInfo::builder()
            .image(image)
            .view_type(vk::ImageViewType::TYPE_2D)
            .format(format)
            .subresource_range(vk::ImageSubresourceRange {
                aspect_mask: vk::ImageAspectFlags::DEPTH,
                base_mip_level: 0,
                level_count: 1,
                base_array_layer: 0,
                layer_count: 1,
            });

        let image_view = match device.create_image_view(&image_view_create_info) {
            Ok(view) => view,
            Err(e) => {
                device.free_memory(memory);
                device.destroy_image(image);
                return Err(VulkanError::Api(e));
            }
        };

        Ok(Self {
            device,
            image,
            memory,
            image_view,
        })
    }

    /// Get the depth image view
    pub fn view(&self) -> vk::ImageView {
        self.image_view
    }

    /// Get the depth image
    pub fn image(&self) -> vk::Image {
        self.image
    }
}

impl<D: RenderDevice> Drop for DepthBuffer<D> {
    fn drop(&mut self) {
        self.device.destroy_image_view(self.image_view);
        self.device.free_memory(self.memory);
        self.device.destroy_image(self.image);
    }
}
