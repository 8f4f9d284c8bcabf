//! Test doubles for the device and window collaborators
//!
//! [`MockDevice`] mints handles, records every call in order and models fence
//! state the way a GPU that only finishes work when the host waits would:
//! a submitted fence stays pending until it is waited on or the device idles.
//! Rendering to an image whose previous submission is still pending is
//! recorded as a hazard.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet, VecDeque};

use ash::prelude::VkResult;
use ash::vk::{self, Handle};

use crate::render::vulkan::device::{FrameSubmission, QueueFamilyIndices, RenderDevice, SurfaceSupport};
use crate::render::vulkan::window::SurfaceWindow;
use crate::render::vulkan::{VulkanError, VulkanResult};

/// One recorded device call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Call {
    CreateSwapchain {
        swapchain: vk::SwapchainKHR,
        old_swapchain: vk::SwapchainKHR,
        sharing_mode: vk::SharingMode,
        queue_family_count: u32,
        min_image_count: u32,
        width: u32,
        height: u32,
        format: vk::Format,
        present_mode: vk::PresentModeKHR,
    },
    DestroySwapchain(vk::SwapchainKHR),
    CreateImageView { view: vk::ImageView, image: vk::Image },
    DestroyImageView(vk::ImageView),
    CreateImage { image: vk::Image, memory: vk::DeviceMemory, format: vk::Format },
    DestroyImage(vk::Image),
    FreeMemory(vk::DeviceMemory),
    CreateRenderPass(vk::RenderPass),
    DestroyRenderPass(vk::RenderPass),
    CreateFramebuffer(vk::Framebuffer),
    DestroyFramebuffer(vk::Framebuffer),
    CreateSemaphore(vk::Semaphore),
    DestroySemaphore(vk::Semaphore),
    CreateFence(vk::Fence),
    DestroyFence(vk::Fence),
    WaitFence(vk::Fence),
    ResetFence(vk::Fence),
    Acquire { swapchain: vk::SwapchainKHR, semaphore: vk::Semaphore },
    Submit { command_buffer: vk::CommandBuffer, fence: vk::Fence, image_index: Option<u32> },
    Present { swapchain: vk::SwapchainKHR, image_index: u32 },
    AllocateCommandBuffers(u32),
    FreeCommandBuffers(usize),
    BeginCommandBuffer(vk::CommandBuffer),
    EndCommandBuffer(vk::CommandBuffer),
    BeginRenderPass {
        command_buffer: vk::CommandBuffer,
        render_pass: vk::RenderPass,
        framebuffer: vk::Framebuffer,
        width: u32,
        height: u32,
    },
    SetViewport(vk::CommandBuffer),
    SetScissor(vk::CommandBuffer),
    EndRenderPass(vk::CommandBuffer),
    WaitIdle,
}

impl Call {
    /// Raw handle this call releases, if it is a destroy call
    pub(crate) fn released(&self) -> Option<u64> {
        match *self {
            Self::DestroySwapchain(h) => Some(h.as_raw()),
            Self::DestroyImageView(h) => Some(h.as_raw()),
            Self::DestroyImage(h) => Some(h.as_raw()),
            Self::FreeMemory(h) => Some(h.as_raw()),
            Self::DestroyRenderPass(h) => Some(h.as_raw()),
            Self::DestroyFramebuffer(h) => Some(h.as_raw()),
            Self::DestroySemaphore(h) => Some(h.as_raw()),
            Self::DestroyFence(h) => Some(h.as_raw()),
            _ => None,
        }
    }

    /// Raw handles this call creates
    pub(crate) fn created(&self) -> Vec<u64> {
        match *self {
            Self::CreateSwapchain { swapchain, .. } => vec![swapchain.as_raw()],
            Self::CreateImageView { view, .. } => vec![view.as_raw()],
            Self::CreateImage { image, memory, .. } => vec![image.as_raw(), memory.as_raw()],
            Self::CreateRenderPass(h) => vec![h.as_raw()],
            Self::CreateFramebuffer(h) => vec![h.as_raw()],
            Self::CreateSemaphore(h) => vec![h.as_raw()],
            Self::CreateFence(h) => vec![h.as_raw()],
            _ => Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FenceState {
    Signaled,
    Unsignaled,
    Pending,
}

/// Clear values and dynamic state captured from the last render pass begin
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub(crate) struct RecordedPass {
    pub color: [f32; 4],
    pub depth: f32,
    pub stencil: u32,
    pub viewport: (f32, f32, f32, f32, f32, f32),
    pub scissor: (i32, i32, u32, u32),
}

struct MockState {
    next_handle: u64,
    support: SurfaceSupport,
    families: QueueFamilyIndices,
    depth_formats: Vec<vk::Format>,
    image_count_override: Option<u32>,
    swapchain_images: HashMap<u64, Vec<vk::Image>>,
    acquire_script: VecDeque<VkResult<(u32, bool)>>,
    present_script: VecDeque<VkResult<bool>>,
    next_image: u32,
    acquired_image: Option<u32>,
    failures: HashMap<&'static str, usize>,
    calls: Vec<Call>,
    live: HashSet<u64>,
    fences: HashMap<u64, FenceState>,
    image_fences: HashMap<u32, vk::Fence>,
    hazards: Vec<String>,
    recorded_pass: RecordedPass,
}

/// Recording implementation of [`RenderDevice`]
pub(crate) struct MockDevice {
    state: RefCell<MockState>,
}

impl MockDevice {
    /// Device with a 2..=3 image surface that leaves extent choice to the swapchain
    pub(crate) fn new() -> Self {
        let capabilities = vk::SurfaceCapabilitiesKHR {
            min_image_count: 2,
            max_image_count: 3,
            current_extent: vk::Extent2D { width: u32::MAX, height: u32::MAX },
            min_image_extent: vk::Extent2D { width: 1, height: 1 },
            max_image_extent: vk::Extent2D { width: 4096, height: 4096 },
            current_transform: vk::SurfaceTransformFlagsKHR::IDENTITY,
            ..Default::default()
        };

        Self {
            state: RefCell::new(MockState {
                next_handle: 0x1000,
                support: SurfaceSupport {
                    capabilities,
                    formats: vec![
                        vk::SurfaceFormatKHR {
                            format: vk::Format::R8G8B8A8_UNORM,
                            color_space: vk::ColorSpaceKHR::SRGB_NONLINEAR,
                        },
                        vk::SurfaceFormatKHR {
                            format: vk::Format::B8G8R8A8_SRGB,
                            color_space: vk::ColorSpaceKHR::SRGB_NONLINEAR,
                        },
                    ],
                    present_modes: vec![vk::PresentModeKHR::FIFO, vk::PresentModeKHR::MAILBOX],
                },
                families: QueueFamilyIndices { graphics: 0, present: 0 },
                depth_formats: vec![
                    vk::Format::D32_SFLOAT,
                    vk::Format::D32_SFLOAT_S8_UINT,
                    vk::Format::D24_UNORM_S8_UINT,
                ],
                image_count_override: None,
                swapchain_images: HashMap::new(),
                acquire_script: VecDeque::new(),
                present_script: VecDeque::new(),
                next_image: 0,
                acquired_image: None,
                failures: HashMap::new(),
                calls: Vec::new(),
                live: HashSet::new(),
                fences: HashMap::new(),
                image_fences: HashMap::new(),
                hazards: Vec::new(),
                recorded_pass: RecordedPass::default(),
            }),
        }
    }

    pub(crate) fn set_capabilities(&self, capabilities: vk::SurfaceCapabilitiesKHR) {
        self.state.borrow_mut().support.capabilities = capabilities;
    }

    pub(crate) fn set_formats(&self, formats: Vec<vk::SurfaceFormatKHR>) {
        self.state.borrow_mut().support.formats = formats;
    }

    pub(crate) fn set_present_modes(&self, present_modes: Vec<vk::PresentModeKHR>) {
        self.state.borrow_mut().support.present_modes = present_modes;
    }

    pub(crate) fn set_queue_families(&self, graphics: u32, present: u32) {
        self.state.borrow_mut().families = QueueFamilyIndices { graphics, present };
    }

    pub(crate) fn set_depth_formats(&self, formats: Vec<vk::Format>) {
        self.state.borrow_mut().depth_formats = formats;
    }

    /// Hand out exactly `count` images per swapchain regardless of the request
    pub(crate) fn set_image_count(&self, count: u32) {
        self.state.borrow_mut().image_count_override = Some(count);
    }

    /// Queue results for upcoming acquires; unscripted acquires cycle through images
    pub(crate) fn script_acquire(&self, results: impl IntoIterator<Item = VkResult<(u32, bool)>>) {
        self.state.borrow_mut().acquire_script.extend(results);
    }

    /// Queue results for upcoming presents; unscripted presents are optimal
    pub(crate) fn script_present(&self, results: impl IntoIterator<Item = VkResult<bool>>) {
        self.state.borrow_mut().present_script.extend(results);
    }

    /// Make the `nth` (0-based) upcoming call of `operation` fail
    pub(crate) fn fail_on(&self, operation: &'static str, nth: usize) {
        self.state.borrow_mut().failures.insert(operation, nth);
    }

    pub(crate) fn calls(&self) -> Vec<Call> {
        self.state.borrow().calls.clone()
    }

    pub(crate) fn clear_calls(&self) {
        self.state.borrow_mut().calls.clear();
    }

    pub(crate) fn count(&self, predicate: impl Fn(&Call) -> bool) -> usize {
        self.state.borrow().calls.iter().filter(|call| predicate(call)).count()
    }

    /// Number of created objects not yet released
    pub(crate) fn live_objects(&self) -> usize {
        self.state.borrow().live.len()
    }

    pub(crate) fn hazards(&self) -> Vec<String> {
        self.state.borrow().hazards.clone()
    }

    pub(crate) fn is_fence_signalled(&self, fence: vk::Fence) -> bool {
        self.state.borrow().fences.get(&fence.as_raw()) == Some(&FenceState::Signaled)
    }

    pub(crate) fn recorded_pass(&self) -> RecordedPass {
        self.state.borrow().recorded_pass
    }

    fn mint<H: Handle>(state: &mut MockState) -> H {
        state.next_handle += 1;
        H::from_raw(state.next_handle)
    }

    fn should_fail(state: &mut MockState, operation: &'static str) -> bool {
        match state.failures.get_mut(operation) {
            Some(0) => {
                state.failures.remove(operation);
                true
            }
            Some(remaining) => {
                *remaining -= 1;
                false
            }
            None => false,
        }
    }

    fn create<H: Handle + Copy>(
        &self,
        operation: &'static str,
        record: impl FnOnce(H) -> Call,
    ) -> VkResult<H> {
        let mut state = self.state.borrow_mut();
        if Self::should_fail(&mut state, operation) {
            return Err(vk::Result::ERROR_OUT_OF_DEVICE_MEMORY);
        }
        let handle: H = Self::mint(&mut state);
        state.live.insert(handle.as_raw());
        state.calls.push(record(handle));
        Ok(handle)
    }

    fn destroy(&self, raw: u64, call: Call) {
        let mut state = self.state.borrow_mut();
        assert!(state.live.remove(&raw), "{:?} released twice or never created", call);
        state.calls.push(call);
    }
}

impl RenderDevice for MockDevice {
    fn surface(&self) -> vk::SurfaceKHR {
        vk::SurfaceKHR::from_raw(0x1)
    }

    fn surface_support(&self) -> VulkanResult<SurfaceSupport> {
        Ok(self.state.borrow().support.clone())
    }

    fn queue_families(&self) -> QueueFamilyIndices {
        self.state.borrow().families
    }

    fn find_supported_format(
        &self,
        candidates: &[vk::Format],
        _tiling: vk::ImageTiling,
        _features: vk::FormatFeatureFlags,
    ) -> Option<vk::Format> {
        let state = self.state.borrow();
        candidates.iter().copied().find(|format| state.depth_formats.contains(format))
    }

    fn create_swapchain(&self, create_info: &vk::SwapchainCreateInfoKHR) -> VkResult<vk::SwapchainKHR> {
        let swapchain = self.create("create_swapchain", |swapchain| Call::CreateSwapchain {
            swapchain,
            old_swapchain: create_info.old_swapchain,
            sharing_mode: create_info.image_sharing_mode,
            queue_family_count: create_info.queue_family_index_count,
            min_image_count: create_info.min_image_count,
            width: create_info.image_extent.width,
            height: create_info.image_extent.height,
            format: create_info.image_format,
            present_mode: create_info.present_mode,
        })?;

        let mut state = self.state.borrow_mut();
        let count = state.image_count_override.unwrap_or(create_info.min_image_count);
        let images: Vec<vk::Image> = (0..count).map(|_| Self::mint(&mut state)).collect();
        state.swapchain_images.insert(swapchain.as_raw(), images);
        state.next_image = 0;
        state.image_fences.clear();
        Ok(swapchain)
    }

    fn destroy_swapchain(&self, swapchain: vk::SwapchainKHR) {
        self.destroy(swapchain.as_raw(), Call::DestroySwapchain(swapchain));
    }

    fn swapchain_images(&self, swapchain: vk::SwapchainKHR) -> VkResult<Vec<vk::Image>> {
        self.state
            .borrow()
            .swapchain_images
            .get(&swapchain.as_raw())
            .cloned()
            .ok_or(vk::Result::ERROR_SURFACE_LOST_KHR)
    }

    fn create_image_view(&self, create_info: &vk::ImageViewCreateInfo) -> VkResult<vk::ImageView> {
        let image = create_info.image;
        self.create("create_image_view", |view| Call::CreateImageView { view, image })
    }

    fn destroy_image_view(&self, image_view: vk::ImageView) {
        self.destroy(image_view.as_raw(), Call::DestroyImageView(image_view));
    }

    fn create_image_with_memory(
        &self,
        create_info: &vk::ImageCreateInfo,
        _properties: vk::MemoryPropertyFlags,
    ) -> VulkanResult<(vk::Image, vk::DeviceMemory)> {
        let mut state = self.state.borrow_mut();
        if Self::should_fail(&mut state, "create_image") {
            return Err(VulkanError::NoSuitableMemoryType);
        }
        let image: vk::Image = Self::mint(&mut state);
        let memory: vk::DeviceMemory = Self::mint(&mut state);
        state.live.insert(image.as_raw());
        state.live.insert(memory.as_raw());
        state.calls.push(Call::CreateImage { image, memory, format: create_info.format });
        Ok((image, memory))
    }

    fn destroy_image(&self, image: vk::Image) {
        self.destroy(image.as_raw(), Call::DestroyImage(image));
    }

    fn free_memory(&self, memory: vk::DeviceMemory) {
        self.destroy(memory.as_raw(), Call::FreeMemory(memory));
    }

    fn create_render_pass(&self, _create_info: &vk::RenderPassCreateInfo) -> VkResult<vk::RenderPass> {
        self.create("create_render_pass", Call::CreateRenderPass)
    }

    fn destroy_render_pass(&self, render_pass: vk::RenderPass) {
        self.destroy(render_pass.as_raw(), Call::DestroyRenderPass(render_pass));
    }

    fn create_framebuffer(&self, _create_info: &vk::FramebufferCreateInfo) -> VkResult<vk::Framebuffer> {
        self.create("create_framebuffer", Call::CreateFramebuffer)
    }

    fn destroy_framebuffer(&self, framebuffer: vk::Framebuffer) {
        self.destroy(framebuffer.as_raw(), Call::DestroyFramebuffer(framebuffer));
    }

    fn create_semaphore(&self) -> VkResult<vk::Semaphore> {
        self.create("create_semaphore", Call::CreateSemaphore)
    }

    fn destroy_semaphore(&self, semaphore: vk::Semaphore) {
        self.destroy(semaphore.as_raw(), Call::DestroySemaphore(semaphore));
    }

    fn create_fence(&self, signaled: bool) -> VkResult<vk::Fence> {
        let fence = self.create("create_fence", Call::CreateFence)?;
        let initial = if signaled { FenceState::Signaled } else { FenceState::Unsignaled };
        self.state.borrow_mut().fences.insert(fence.as_raw(), initial);
        Ok(fence)
    }

    fn destroy_fence(&self, fence: vk::Fence) {
        self.destroy(fence.as_raw(), Call::DestroyFence(fence));
        self.state.borrow_mut().fences.remove(&fence.as_raw());
    }

    fn wait_for_fence(&self, fence: vk::Fence, _timeout: u64) -> VkResult<()> {
        let mut state = self.state.borrow_mut();
        state.calls.push(Call::WaitFence(fence));
        match state.fences.get_mut(&fence.as_raw()) {
            Some(fence_state @ FenceState::Pending) => *fence_state = FenceState::Signaled,
            Some(FenceState::Signaled) => {}
            Some(FenceState::Unsignaled) => panic!("waiting on {:?}, which nothing will signal", fence),
            None => panic!("waiting on unknown {:?}", fence),
        }
        Ok(())
    }

    fn reset_fence(&self, fence: vk::Fence) -> VkResult<()> {
        let mut state = self.state.borrow_mut();
        state.calls.push(Call::ResetFence(fence));
        match state.fences.get_mut(&fence.as_raw()) {
            Some(FenceState::Pending) => panic!("resetting {:?} while its submission is pending", fence),
            Some(fence_state) => *fence_state = FenceState::Unsignaled,
            None => panic!("resetting unknown {:?}", fence),
        }
        Ok(())
    }

    fn acquire_next_image(
        &self,
        swapchain: vk::SwapchainKHR,
        _timeout: u64,
        semaphore: vk::Semaphore,
    ) -> VkResult<(u32, bool)> {
        let mut state = self.state.borrow_mut();
        state.calls.push(Call::Acquire { swapchain, semaphore });
        let result = match state.acquire_script.pop_front() {
            Some(result) => result,
            None => {
                let count = state
                    .swapchain_images
                    .get(&swapchain.as_raw())
                    .map_or(1, |images| images.len().max(1) as u32);
                let index = state.next_image % count;
                state.next_image += 1;
                Ok((index, false))
            }
        };
        state.acquired_image = result.as_ref().ok().map(|&(index, _)| index);
        result
    }

    fn queue_submit(&self, submission: &FrameSubmission) -> VkResult<()> {
        let mut state = self.state.borrow_mut();
        let image_index = state.acquired_image.take();
        state.calls.push(Call::Submit {
            command_buffer: submission.command_buffer,
            fence: submission.fence,
            image_index,
        });
        if Self::should_fail(&mut state, "queue_submit") {
            return Err(vk::Result::ERROR_DEVICE_LOST);
        }

        if let Some(index) = image_index {
            if let Some(previous) = state.image_fences.get(&index).copied() {
                if state.fences.get(&previous.as_raw()) == Some(&FenceState::Pending) {
                    let hazard = format!("image {} submitted while {:?} still pending", index, previous);
                    state.hazards.push(hazard);
                }
            }
            state.image_fences.insert(index, submission.fence);
        }

        match state.fences.get_mut(&submission.fence.as_raw()) {
            Some(fence_state @ FenceState::Unsignaled) => *fence_state = FenceState::Pending,
            other => panic!("submitting with {:?} in state {:?}", submission.fence, other),
        }
        Ok(())
    }

    fn queue_present(
        &self,
        swapchain: vk::SwapchainKHR,
        image_index: u32,
        _wait_semaphore: vk::Semaphore,
    ) -> VkResult<bool> {
        let mut state = self.state.borrow_mut();
        state.calls.push(Call::Present { swapchain, image_index });
        state.present_script.pop_front().unwrap_or(Ok(false))
    }

    fn allocate_command_buffers(&self, count: u32) -> VkResult<Vec<vk::CommandBuffer>> {
        let mut state = self.state.borrow_mut();
        if Self::should_fail(&mut state, "allocate_command_buffers") {
            return Err(vk::Result::ERROR_OUT_OF_HOST_MEMORY);
        }
        state.calls.push(Call::AllocateCommandBuffers(count));
        let buffers: Vec<vk::CommandBuffer> = (0..count).map(|_| Self::mint(&mut state)).collect();
        for buffer in &buffers {
            state.live.insert(buffer.as_raw());
        }
        Ok(buffers)
    }

    fn free_command_buffers(&self, command_buffers: &[vk::CommandBuffer]) {
        let mut state = self.state.borrow_mut();
        for buffer in command_buffers {
            assert!(state.live.remove(&buffer.as_raw()), "{:?} freed twice", buffer);
        }
        state.calls.push(Call::FreeCommandBuffers(command_buffers.len()));
    }

    fn begin_command_buffer(&self, command_buffer: vk::CommandBuffer) -> VkResult<()> {
        let mut state = self.state.borrow_mut();
        if Self::should_fail(&mut state, "begin_command_buffer") {
            return Err(vk::Result::ERROR_OUT_OF_HOST_MEMORY);
        }
        state.calls.push(Call::BeginCommandBuffer(command_buffer));
        Ok(())
    }

    fn end_command_buffer(&self, command_buffer: vk::CommandBuffer) -> VkResult<()> {
        self.state.borrow_mut().calls.push(Call::EndCommandBuffer(command_buffer));
        Ok(())
    }

    fn cmd_begin_render_pass(&self, command_buffer: vk::CommandBuffer, begin_info: &vk::RenderPassBeginInfo) {
        let mut state = self.state.borrow_mut();
        state.calls.push(Call::BeginRenderPass {
            command_buffer,
            render_pass: begin_info.render_pass,
            framebuffer: begin_info.framebuffer,
            width: begin_info.render_area.extent.width,
            height: begin_info.render_area.extent.height,
        });

        assert_eq!(begin_info.clear_value_count, 2, "expected color and depth clear values");
        // SAFETY: the caller keeps the clear value array alive for the duration of the call
        let clear_values = unsafe {
            std::slice::from_raw_parts(begin_info.p_clear_values, begin_info.clear_value_count as usize)
        };
        // SAFETY: attachment 0 is color and attachment 1 is depth/stencil
        unsafe {
            state.recorded_pass.color = clear_values[0].color.float32;
            state.recorded_pass.depth = clear_values[1].depth_stencil.depth;
            state.recorded_pass.stencil = clear_values[1].depth_stencil.stencil;
        }
    }

    fn cmd_set_viewport(&self, command_buffer: vk::CommandBuffer, viewport: vk::Viewport) {
        let mut state = self.state.borrow_mut();
        state.calls.push(Call::SetViewport(command_buffer));
        state.recorded_pass.viewport = (
            viewport.x,
            viewport.y,
            viewport.width,
            viewport.height,
            viewport.min_depth,
            viewport.max_depth,
        );
    }

    fn cmd_set_scissor(&self, command_buffer: vk::CommandBuffer, scissor: vk::Rect2D) {
        let mut state = self.state.borrow_mut();
        state.calls.push(Call::SetScissor(command_buffer));
        state.recorded_pass.scissor = (
            scissor.offset.x,
            scissor.offset.y,
            scissor.extent.width,
            scissor.extent.height,
        );
    }

    fn cmd_end_render_pass(&self, command_buffer: vk::CommandBuffer) {
        self.state.borrow_mut().calls.push(Call::EndRenderPass(command_buffer));
    }

    fn wait_idle(&self) -> VkResult<()> {
        let mut state = self.state.borrow_mut();
        state.calls.push(Call::WaitIdle);
        for fence_state in state.fences.values_mut() {
            if *fence_state == FenceState::Pending {
                *fence_state = FenceState::Signaled;
            }
        }
        Ok(())
    }
}

/// Scripted implementation of [`SurfaceWindow`]
pub(crate) struct MockWindow {
    extent: vk::Extent2D,
    upcoming: VecDeque<vk::Extent2D>,
    resized: bool,
    pub(crate) waits: usize,
}

impl MockWindow {
    pub(crate) fn new(width: u32, height: u32) -> Self {
        Self {
            extent: vk::Extent2D { width, height },
            upcoming: VecDeque::new(),
            resized: false,
            waits: 0,
        }
    }

    /// Extents reported after each successive `wait_events`
    pub(crate) fn after_waits(mut self, extents: impl IntoIterator<Item = (u32, u32)>) -> Self {
        self.upcoming
            .extend(extents.into_iter().map(|(width, height)| vk::Extent2D { width, height }));
        self
    }

    /// Change the drawable size and raise the resize flag
    pub(crate) fn resize(&mut self, width: u32, height: u32) {
        self.extent = vk::Extent2D { width, height };
        self.resized = true;
    }
}

impl SurfaceWindow for MockWindow {
    fn extent(&self) -> vk::Extent2D {
        self.extent
    }

    fn was_resized(&self) -> bool {
        self.resized
    }

    fn reset_resized_flag(&mut self) {
        self.resized = false;
    }

    fn wait_events(&mut self) {
        self.waits += 1;
        if let Some(extent) = self.upcoming.pop_front() {
            self.extent = extent;
        }
    }
}
