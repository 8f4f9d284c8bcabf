//! Sea Fight
//!
//! Opens a window and drives the engine's frame loop: logical updates at a
//! fixed rate, rendering as often as the swapchain allows.

use std::process::ExitCode;
use std::rc::Rc;
use std::time::Instant;

use sea_engine::foundation::logging;
use sea_engine::prelude::*;
use thiserror::Error;

const CONFIG_PATH: &str = "sea_fight.toml";

/// Errors that end the application
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Window error: {0}")]
    Window(#[from] WindowError),

    #[error("Vulkan error: {0}")]
    Vulkan(#[from] VulkanError),
}

pub struct SeaFightApp {
    // Drop order matters: the renderer releases swapchain resources before the
    // context destroys the device, and the window outlives its surface.
    renderer: Renderer<VulkanContext>,
    context: Rc<VulkanContext>,
    window: Window,
    timestep: FixedTimestep,
    rates: RateCounter,
    report_rates: bool,
    frames_per_slot: [u64; MAX_FRAMES_IN_FLIGHT],
}

impl SeaFightApp {
    pub fn new(config: &ApplicationConfig) -> Result<Self, AppError> {
        log::info!("Creating window...");
        let mut window = Window::new(&config.window.title, config.window.width, config.window.height)?;

        log::info!("Creating Vulkan context...");
        let context = Rc::new(VulkanContext::new(
            &mut window,
            &config.renderer.application_name,
            config.renderer.validation_enabled(),
        )?);

        let renderer = Renderer::new(Rc::clone(&context), &mut window)?;
        log::info!(
            "Renderer ready, swapchain extent {}x{}",
            renderer.swapchain_extent().width,
            renderer.swapchain_extent().height
        );

        Ok(Self {
            renderer,
            context,
            window,
            timestep: FixedTimestep::new(config.engine.update_rate_hz),
            rates: RateCounter::new(),
            report_rates: config.engine.report_rates,
            frames_per_slot: [0; MAX_FRAMES_IN_FLIGHT],
        })
    }

    pub fn run(&mut self) -> Result<(), AppError> {
        log::info!("Starting main loop at {} updates per second", 1.0 / self.timestep.step_seconds());

        let result = self.main_loop();

        // Leave no work in flight whether the loop ended cleanly or not
        if let Err(e) = self.renderer.wait_idle() {
            log::error!("Failed to wait for device idle: {}", e);
        }
        result
    }

    fn main_loop(&mut self) -> Result<(), AppError> {
        while !self.window.should_close() {
            let updates = self.timestep.tick();
            for _ in 0..updates {
                self.update();
            }
            self.rates.record_updates(updates);

            self.render()?;
            self.rates.record_frame();

            if let Some(report) = self.rates.report(Instant::now()) {
                if self.report_rates {
                    log::info!("FPS: {} Updates: {}", report.frames, report.updates);
                }
            }
        }
        Ok(())
    }

    fn update(&mut self) {
        self.window.poll_events();
    }

    fn render(&mut self) -> Result<(), AppError> {
        let Some(command_buffer) = self.renderer.begin_frame(&mut self.window)? else {
            return Ok(());
        };

        let slot = self.renderer.frame_index();
        self.frames_per_slot[slot] += 1;
        log::trace!("Recording frame {} in slot {}", self.frames_per_slot[slot], slot);

        self.renderer.begin_swapchain_render_pass(command_buffer)?;
        self.renderer.end_swapchain_render_pass(command_buffer)?;
        self.renderer.end_frame(&mut self.window)?;
        Ok(())
    }

    pub fn context(&self) -> &VulkanContext {
        &self.context
    }
}

fn main() -> ExitCode {
    let config = match ApplicationConfig::load_or_default(CONFIG_PATH).and_then(|config| {
        config.validate()?;
        Ok(config)
    }) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Invalid configuration in {}: {}", CONFIG_PATH, e);
            return ExitCode::FAILURE;
        }
    };

    logging::init(config.engine.level_filter());
    log::info!("Sea Fight starting");

    let result = SeaFightApp::new(&config).and_then(|mut app| {
        log::debug!("Running on {:?}", app.context().physical_device().device);
        app.run()
    });

    match result {
        Ok(()) => {
            log::info!("Sea Fight shut down cleanly");
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
