//! Command buffer pool for frames in flight

use std::rc::Rc;

use ash::vk;

use crate::render::vulkan::{RenderDevice, VulkanError, VulkanResult};

/// Primary command buffers allocated from the device pool, freed on drop
pub struct CommandBuffers<D: RenderDevice> {
    device: Rc<D>,
    command_buffers: Vec<vk::CommandBuffer>,
}

impl<D: RenderDevice> CommandBuffers<D> {
    /// Allocate `count` primary command buffers
    pub fn allocate(device: Rc<D>, count: usize) -> VulkanResult<Self> {
        let count = u32::try_from(count).map_err(|_| VulkanError::InvalidOperation {
            reason: format!("Cannot allocate {} command buffers", count),
        })?;
        let command_buffers = device.allocate_command_buffers(count).map_err(VulkanError::Api)?;
        log::debug!("Allocated {} command buffers", command_buffers.len());

        Ok(Self {
            device,
            command_buffers,
        })
    }

    /// Command buffer at `index`, if allocated
    pub fn get(&self, index: usize) -> Option<vk::CommandBuffer> {
        self.command_buffers.get(index).copied()
    }

    /// Number of allocated command buffers
    pub fn len(&self) -> usize {
        self.command_buffers.len()
    }

    /// Whether no command buffers are allocated
    pub fn is_empty(&self) -> bool {
        self.command_buffers.is_empty()
    }
}

impl<D: RenderDevice> Drop for CommandBuffers<D> {
    fn drop(&mut self) {
        if !self.command_buffers.is_empty() {
            self.device.free_command_buffers(&self.command_buffers);
        }
    }
}
