//! Vulkan synchronization primitives for GPU/CPU coordination
//!
//! RAII wrappers for semaphores and fences, and [`FrameSync`], the set of
//! primitives owned by one frame-in-flight slot.

use std::rc::Rc;

use ash::vk;

use crate::render::vulkan::{RenderDevice, VulkanError, VulkanResult};

/// GPU-GPU synchronization primitive with automatic resource management
///
/// Signalled by one queue operation and waited on by another:
/// - Image acquisition signals, rendering waits
/// - Rendering signals, presentation waits
pub struct Semaphore<D: RenderDevice> {
    device: Rc<D>,
    semaphore: vk::Semaphore,
}

impl<D: RenderDevice> Semaphore<D> {
    /// Create a new semaphore
    pub fn new(device: Rc<D>) -> VulkanResult<Self> {
        let semaphore = device.create_semaphore().map_err(VulkanError::Api)?;
        Ok(Self { device, semaphore })
    }

    /// Get the semaphore handle
    pub fn handle(&self) -> vk::Semaphore {
        self.semaphore
    }
}

impl<D: RenderDevice> Drop for Semaphore<D> {
    fn drop(&mut self) {
        self.device.destroy_semaphore(self.semaphore);
    }
}

/// Fence wrapper with RAII cleanup
pub struct Fence<D: RenderDevice> {
    device: Rc<D>,
    fence: vk::Fence,
}

impl<D: RenderDevice> Fence<D> {
    /// Create a new fence
    pub fn new(device: Rc<D>, signaled: bool) -> VulkanResult<Self> {
        let fence = device.create_fence(signaled).map_err(VulkanError::Api)?;
        Ok(Self { device, fence })
    }

    /// Wait for fence
    pub fn wait(&self, timeout: u64) -> VulkanResult<()> {
        self.device.wait_for_fence(self.fence, timeout).map_err(VulkanError::Api)
    }

    /// Reset fence
    pub fn reset(&self) -> VulkanResult<()> {
        self.device.reset_fence(self.fence).map_err(VulkanError::Api)
    }

    /// Get the fence handle
    pub fn handle(&self) -> vk::Fence {
        self.fence
    }
}

impl<D: RenderDevice> Drop for Fence<D> {
    fn drop(&mut self) {
        self.device.destroy_fence(self.fence);
    }
}

/// Synchronization objects for one frame-in-flight slot
///
/// Fields are declared in reverse creation order so they drop in reverse.
pub struct FrameSync<D: RenderDevice> {
    /// Signalled when the slot's submission completes; created signalled
    pub in_flight: Fence<D>,
    /// Signalled when rendering finishes, waited on by presentation
    pub render_finished: Semaphore<D>,
    /// Signalled when the acquired image is ready to be rendered to
    pub image_available: Semaphore<D>,
}

impl<D: RenderDevice> FrameSync<D> {
    /// Create frame synchronization objects
    pub fn new(device: &Rc<D>) -> VulkanResult<Self> {
        let image_available = Semaphore::new(Rc::clone(device))?;
        let render_finished = Semaphore::new(Rc::clone(device))?;
        let in_flight = Fence::new(Rc::clone(device), true)?;

        Ok(Self {
            in_flight,
            render_finished,
            image_available,
        })
    }
}
