//! Core application state and lifecycle.
//!
//! One window, one fixed-size map surface. Vello draws the map layers,
//! egui draws the page shell and tooltip on top, winit feeds pointer
//! events into the widget.

use kurbo::{BezPath, Point, Size};
use statemap_core::dataset::MapDataset;
use statemap_core::input::{InputState, MouseButton, PointerEvent};
use statemap_core::projection::AlbersUsa;
use statemap_core::topology::TopologyError;
use statemap_core::widget::{MapWidget, TooltipContent};
use statemap_render::{MapScene, MapStyle, PathGenerator, RenderContext, Renderer};
use std::sync::Arc;
use vello::util::RenderSurface;
use vello::wgpu::PresentMode;
use vello::{AaConfig, RenderParams, RendererOptions};
use winit::application::ApplicationHandler;
#[cfg(not(target_arch = "wasm32"))]
use winit::dpi::LogicalSize;
use winit::event::{ElementState, WindowEvent};
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::window::{Window, WindowId};

use crate::ui::{render_ui, UiAction, UiState};

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub title: String,
    /// Logical surface width. The map is laid out at this fixed size
    /// regardless of the viewport.
    pub width: u32,
    /// Logical surface height.
    pub height: u32,
    /// What the tooltip displays for a hovered region.
    pub tooltip_content: TooltipContent,
    /// Map layer styling.
    pub style: MapStyle,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: "World Map".to_string(),
            width: 1000,
            height: 600,
            tooltip_content: TooltipContent::default(),
            style: MapStyle::default(),
        }
    }
}

/// The fully projected map, rebuilt wholesale on (re)initialization.
struct MapLayers {
    widget: MapWidget,
    nation_outline: BezPath,
    state_outline: BezPath,
}

/// Decode the dataset and project it for a surface. This is the single
/// initialization path: running it again yields a fresh widget and fresh
/// layer paths, so re-initialization can never accumulate duplicates.
fn build_map(config: &AppConfig) -> Result<MapLayers, TopologyError> {
    let dataset = MapDataset::bundled()?;
    let projection = AlbersUsa::fitted(config.width as f64, config.height as f64);
    let layers = PathGenerator::new(projection).layers(&dataset);
    log::info!("map initialized: {} regions", layers.regions.len());
    Ok(MapLayers {
        widget: MapWidget::new(layers.regions, config.tooltip_content),
        nation_outline: layers.nation_outline,
        state_outline: layers.state_outline,
    })
}

/// Runtime state for the application.
struct AppState {
    // Windowing
    window: Arc<Window>,
    surface: RenderSurface<'static>,

    // Rendering
    vello_renderer: vello::Renderer,
    map_scene: MapScene,
    /// Texture blitter for RGBA->surface format conversion (needed for WebGPU/WASM)
    texture_blitter: vello::wgpu::util::TextureBlitter,

    // egui
    egui_ctx: egui::Context,
    egui_state: egui_winit::State,
    egui_renderer: egui_wgpu::Renderer,
    ui_state: UiState,

    // Map state
    map: MapLayers,
    input: InputState,
    config: AppConfig,
}

/// Main application struct.
pub struct App {
    config: AppConfig,
    state: Option<AppState>,
    render_cx: Option<vello::util::RenderContext>,
    /// Window waiting for async surface creation (WASM only)
    pending_window: Option<Arc<Window>>,
    /// Flag to indicate async init is in progress
    #[cfg(target_arch = "wasm32")]
    init_in_progress: std::cell::Cell<bool>,
}

impl App {
    /// Create a new application with default configuration.
    pub fn new() -> Self {
        Self::with_config(AppConfig::default())
    }

    /// Create a new application with custom configuration.
    pub fn with_config(config: AppConfig) -> Self {
        Self {
            config,
            state: None,
            render_cx: None,
            pending_window: None,
            #[cfg(target_arch = "wasm32")]
            init_in_progress: std::cell::Cell::new(false),
        }
    }

    /// Run the application.
    pub async fn run() {
        let event_loop = EventLoop::new().expect("Failed to create event loop");
        let app = App::new();

        #[cfg(target_arch = "wasm32")]
        {
            use winit::platform::web::EventLoopExtWebSys;
            event_loop.spawn_app(app);
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            let mut app = app;
            event_loop.run_app(&mut app).expect("Event loop error");
        }
    }

    /// Finish initialization after the surface is created.
    fn finish_init(&mut self, window: Arc<Window>, surface: RenderSurface<'static>) {
        let render_cx = self.render_cx.as_ref().expect("RenderContext not initialized");
        let device = &render_cx.devices[surface.dev_id].device;

        let vello_renderer = vello::Renderer::new(device, RendererOptions::default())
            .expect("Failed to create Vello renderer");

        // Create texture blitter for RGBA->surface format conversion.
        // Vello renders to Rgba8Unorm (for compute shader compatibility)
        // but the surface format on WebGPU is typically Bgra8Unorm.
        let texture_blitter =
            vello::wgpu::util::TextureBlitter::new(device, surface.config.format);

        // Initialize egui
        let egui_ctx = egui::Context::default();
        let egui_state = egui_winit::State::new(
            egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(
            device,
            surface.config.format,
            egui_wgpu::RendererOptions::default(),
        );

        // Decode and project the map. The dataset is static and trusted;
        // a decode failure is a packaging defect, fatal at startup.
        let map = build_map(&self.config).expect("Failed to decode bundled map dataset");

        let mut ui_state = UiState::default();
        ui_state.title = self.config.title.clone();
        ui_state.tooltip_content = self.config.tooltip_content;

        log::info!(
            "statemap initialized - {}x{} logical, {}x{} surface",
            self.config.width,
            self.config.height,
            surface.config.width,
            surface.config.height
        );

        self.state = Some(AppState {
            window: window.clone(),
            surface,
            vello_renderer,
            map_scene: MapScene::new(),
            texture_blitter,
            egui_ctx,
            egui_state,
            egui_renderer,
            ui_state,
            map,
            input: InputState::new(),
            config: self.config.clone(),
        });

        self.pending_window = None;

        // Request initial redraw
        window.request_redraw();
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

fn convert_button(button: winit::event::MouseButton) -> Option<MouseButton> {
    match button {
        winit::event::MouseButton::Left => Some(MouseButton::Left),
        winit::event::MouseButton::Right => Some(MouseButton::Right),
        winit::event::MouseButton::Middle => Some(MouseButton::Middle),
        _ => None,
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() || self.pending_window.is_some() {
            return;
        }

        log::info!("Creating window...");

        // The surface is a fixed logical size; the window matches it.
        #[cfg(not(target_arch = "wasm32"))]
        let window_attrs = Window::default_attributes()
            .with_title(&self.config.title)
            .with_inner_size(LogicalSize::new(self.config.width, self.config.height))
            .with_resizable(false);

        // On WASM, attach a fixed-size canvas to the DOM.
        #[cfg(target_arch = "wasm32")]
        let window_attrs = {
            use wasm_bindgen::JsCast;
            use winit::platform::web::WindowAttributesExtWebSys;

            let web_window = web_sys::window().expect("No window");
            let document = web_window.document().expect("No document");

            // Remove loading indicator
            if let Some(loading) = document.get_element_by_id("loading") {
                loading.remove();
            }

            let canvas = document
                .get_element_by_id("statemap-canvas")
                .and_then(|e| e.dyn_into::<web_sys::HtmlCanvasElement>().ok())
                .or_else(|| {
                    let app_div = document.get_element_by_id("app")?;
                    let canvas = document.create_element("canvas").ok()?;
                    canvas.set_id("statemap-canvas");
                    app_div.append_child(&canvas).ok()?;
                    canvas.dyn_into::<web_sys::HtmlCanvasElement>().ok()
                })
                .expect("Failed to create canvas");

            // Fixed logical size regardless of viewport; physical pixels
            // account for the device pixel ratio for sharp rendering.
            let dpr = web_window.device_pixel_ratio();
            canvas.set_width((self.config.width as f64 * dpr) as u32);
            canvas.set_height((self.config.height as f64 * dpr) as u32);
            let style = canvas.style();
            let _ = style.set_property("width", &format!("{}px", self.config.width));
            let _ = style.set_property("height", &format!("{}px", self.config.height));
            let _ = style.set_property("display", "block");

            log::info!(
                "Canvas created: {}x{} (dpr: {})",
                self.config.width,
                self.config.height,
                dpr
            );

            Window::default_attributes()
                .with_title(&self.config.title)
                .with_canvas(Some(canvas))
        };

        let window = Arc::new(
            event_loop
                .create_window(window_attrs)
                .expect("Failed to create window"),
        );

        log::info!("Window created, initializing renderer...");

        let size = window.inner_size();
        let (width, height) = if size.width == 0 || size.height == 0 {
            (self.config.width, self.config.height)
        } else {
            (size.width, size.height)
        };

        // On native, block on async surface creation
        #[cfg(not(target_arch = "wasm32"))]
        {
            let render_cx = self
                .render_cx
                .get_or_insert_with(vello::util::RenderContext::new);

            let surface = pollster::block_on(render_cx.create_surface(
                window.clone(),
                width,
                height,
                PresentMode::AutoVsync,
            ))
            .expect("Failed to create surface");

            // Transmute lifetime to 'static - safe because App owns everything
            let surface: RenderSurface<'static> = unsafe { std::mem::transmute(surface) };
            self.finish_init(window, surface);
        }

        // On WASM, store window for later async initialization
        #[cfg(target_arch = "wasm32")]
        {
            let _ = (width, height);
            self.pending_window = Some(window);
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        // On WASM, handle async initialization
        #[cfg(target_arch = "wasm32")]
        if self.state.is_none() {
            if let Some(window) = self.pending_window.clone() {
                if !self.init_in_progress.get() {
                    self.init_in_progress.set(true);

                    let web_window = web_sys::window().expect("No window");
                    let dpr = web_window.device_pixel_ratio();
                    let width = (self.config.width as f64 * dpr) as u32;
                    let height = (self.config.height as f64 * dpr) as u32;

                    // Get raw pointer to self for the async callback
                    let self_ptr = self as *mut Self;
                    let window_clone = window.clone();

                    wasm_bindgen_futures::spawn_local(async move {
                        log::info!("Creating surface asynchronously...");

                        let mut render_cx = vello::util::RenderContext::new();

                        match render_cx
                            .create_surface(window_clone.clone(), width, height, PresentMode::AutoVsync)
                            .await
                        {
                            Ok(surface) => {
                                log::info!("Surface created successfully");

                                let surface: RenderSurface<'static> =
                                    unsafe { std::mem::transmute(surface) };

                                // SAFETY: WASM is single-threaded and the App
                                // is kept alive by the event loop
                                let app = unsafe { &mut *self_ptr };
                                app.render_cx = Some(render_cx);
                                app.finish_init(window_clone, surface);
                            }
                            Err(e) => {
                                log::error!("Failed to create surface: {:?}", e);
                                let app = unsafe { &mut *self_ptr };
                                app.init_in_progress.set(false);
                            }
                        }
                    });
                }

                window.request_redraw();
            }
            return;
        }

        let Some(state) = &mut self.state else {
            return;
        };

        // Let egui process the event first
        let egui_response = state.egui_state.on_window_event(&state.window, &event);
        let egui_wants_input = egui_response.consumed
            || state.egui_ctx.is_pointer_over_area()
            || state.egui_ctx.wants_pointer_input();

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }

            WindowEvent::Resized(size) => {
                if size.width == 0 || size.height == 0 {
                    return;
                }
                if let Some(render_cx) = self.render_cx.as_mut() {
                    render_cx.resize_surface(&mut state.surface, size.width, size.height);
                }
                state.window.request_redraw();
            }

            WindowEvent::CursorMoved { position, .. } => {
                // Hit testing happens in the map's logical coordinates.
                let logical = position.to_logical::<f64>(state.window.scale_factor());
                let point = Point::new(logical.x, logical.y);
                state
                    .input
                    .handle_pointer_event(PointerEvent::Move { position: point });

                // The tooltip anchor tracks every move; hover only applies
                // while the pointer is not captured by an overlay.
                state.map.widget.pointer_moved(point);
                if egui_wants_input {
                    state.map.widget.pointer_left();
                }
                state.window.request_redraw();
            }

            WindowEvent::CursorLeft { .. } => {
                if state.map.widget.pointer_left() {
                    state.window.request_redraw();
                }
            }

            WindowEvent::MouseInput { state: element_state, button, .. } => {
                let Some(button) = convert_button(button) else {
                    return;
                };
                match element_state {
                    ElementState::Pressed => {
                        state
                            .input
                            .handle_pointer_event(PointerEvent::Down { button });
                        if button == MouseButton::Left && !egui_wants_input {
                            // Outline-layer click: placeholder, logs only.
                            state.map.widget.pointer_clicked(state.input.position());
                        }
                    }
                    ElementState::Released => {
                        state.input.handle_pointer_event(PointerEvent::Up { button });
                    }
                }
            }

            WindowEvent::RedrawRequested => {
                // Run egui first so UI actions apply to this frame.
                let egui_input = state.egui_state.take_egui_input(&state.window);
                let tooltip = state
                    .map
                    .widget
                    .tooltip()
                    .map(|(text, anchor)| {
                        (text.to_string(), egui::Pos2::new(anchor.x as f32, anchor.y as f32))
                    });
                let mut ui_action = None;
                let egui_output = state.egui_ctx.run(egui_input, |ctx| {
                    ui_action = render_ui(
                        ctx,
                        &mut state.ui_state,
                        tooltip.as_ref().map(|(text, pos)| (text.as_str(), *pos)),
                    );
                });

                if let Some(UiAction::SetTooltipContent(content)) = ui_action {
                    state.map.widget.set_tooltip_content(content);
                    state.ui_state.tooltip_content = content;
                    log::info!("tooltip content set to {:?}", content);
                }

                // Build the map scene for this frame.
                let viewport = Size::new(
                    state.surface.config.width as f64,
                    state.surface.config.height as f64,
                );
                let ctx = RenderContext::new(
                    &state.map.widget,
                    &state.map.nation_outline,
                    &state.map.state_outline,
                    viewport,
                )
                .with_scale_factor(state.window.scale_factor())
                .with_style(state.config.style);
                state.map_scene.build_scene(&ctx);

                let Some(render_cx) = self.render_cx.as_ref() else {
                    return;
                };
                let device_handle = &render_cx.devices[state.surface.dev_id];
                let device = &device_handle.device;
                let queue = &device_handle.queue;

                let surface_texture = match state.surface.surface.get_current_texture() {
                    Ok(t) => t,
                    Err(e) => {
                        log::warn!("Failed to get surface texture: {:?}", e);
                        return;
                    }
                };

                let width = state.surface.config.width;
                let height = state.surface.config.height;

                let params = RenderParams {
                    base_color: state.map_scene.background_color(&ctx),
                    width,
                    height,
                    antialiasing_method: AaConfig::Area,
                };

                // Vello needs an Rgba8Unorm texture with StorageBinding for
                // its compute shaders; the result is blitted to the surface
                // texture (which may be Bgra8Unorm).
                let render_texture = device.create_texture(&vello::wgpu::TextureDescriptor {
                    label: Some("vello render texture"),
                    size: vello::wgpu::Extent3d {
                        width,
                        height,
                        depth_or_array_layers: 1,
                    },
                    mip_level_count: 1,
                    sample_count: 1,
                    dimension: vello::wgpu::TextureDimension::D2,
                    format: vello::wgpu::TextureFormat::Rgba8Unorm,
                    usage: vello::wgpu::TextureUsages::STORAGE_BINDING
                        | vello::wgpu::TextureUsages::COPY_SRC
                        | vello::wgpu::TextureUsages::TEXTURE_BINDING,
                    view_formats: &[],
                });
                let render_texture_view =
                    render_texture.create_view(&vello::wgpu::TextureViewDescriptor::default());

                if let Err(e) = state.vello_renderer.render_to_texture(
                    device,
                    queue,
                    state.map_scene.scene(),
                    &render_texture_view,
                    &params,
                ) {
                    log::error!("Failed to render: {:?}", e);
                    return;
                }

                let surface_view = surface_texture
                    .texture
                    .create_view(&vello::wgpu::TextureViewDescriptor::default());

                // Blit the RGBA intermediate texture to the surface texture
                {
                    let mut blit_encoder =
                        device.create_command_encoder(&vello::wgpu::CommandEncoderDescriptor {
                            label: Some("blit encoder"),
                        });
                    state.texture_blitter.copy(
                        device,
                        &mut blit_encoder,
                        &render_texture_view,
                        &surface_view,
                    );
                    queue.submit(std::iter::once(blit_encoder.finish()));
                }

                // Update egui textures
                for (id, image_delta) in &egui_output.textures_delta.set {
                    state
                        .egui_renderer
                        .update_texture(device, queue, *id, image_delta);
                }

                // Render egui on top
                state
                    .egui_state
                    .handle_platform_output(&state.window, egui_output.platform_output);
                let egui_primitives = state
                    .egui_ctx
                    .tessellate(egui_output.shapes, egui_output.pixels_per_point);
                let screen_descriptor = egui_wgpu::ScreenDescriptor {
                    size_in_pixels: [width, height],
                    pixels_per_point: egui_output.pixels_per_point,
                };

                {
                    let mut egui_encoder =
                        device.create_command_encoder(&vello::wgpu::CommandEncoderDescriptor {
                            label: Some("egui encoder"),
                        });
                    state.egui_renderer.update_buffers(
                        device,
                        queue,
                        &mut egui_encoder,
                        &egui_primitives,
                        &screen_descriptor,
                    );

                    let render_pass =
                        egui_encoder.begin_render_pass(&vello::wgpu::RenderPassDescriptor {
                            label: Some("egui render pass"),
                            color_attachments: &[Some(vello::wgpu::RenderPassColorAttachment {
                                view: &surface_view,
                                resolve_target: None,
                                ops: vello::wgpu::Operations {
                                    load: vello::wgpu::LoadOp::Load, // Keep Vello content
                                    store: vello::wgpu::StoreOp::Store,
                                },
                                depth_slice: None,
                            })],
                            depth_stencil_attachment: None,
                            timestamp_writes: None,
                            occlusion_query_set: None,
                        });

                    // Use forget_lifetime to satisfy egui-wgpu's 'static requirement
                    let mut render_pass = render_pass.forget_lifetime();
                    state
                        .egui_renderer
                        .render(&mut render_pass, &egui_primitives, &screen_descriptor);
                    drop(render_pass);

                    queue.submit(std::iter::once(egui_encoder.finish()));
                }

                // Free egui textures
                for id in &egui_output.textures_delta.free {
                    state.egui_renderer.free_texture(id);
                }
                surface_texture.present();

                state.input.begin_frame();
                state.window.request_redraw();
            }

            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults_to_fixed_surface() {
        let config = AppConfig::default();
        assert_eq!((config.width, config.height), (1000, 600));
        assert_eq!(config.title, "World Map");
        assert_eq!(config.tooltip_content, TooltipContent::RegionName);
    }

    #[test]
    fn test_build_map_is_idempotent() {
        let config = AppConfig::default();
        let first = build_map(&config).unwrap();
        let second = build_map(&config).unwrap();
        // Re-initialization yields exactly one copy of each layer.
        assert_eq!(first.widget.regions().len(), second.widget.regions().len());
        assert_eq!(
            first.nation_outline.elements().len(),
            second.nation_outline.elements().len()
        );
        assert_eq!(
            first.state_outline.elements().len(),
            second.state_outline.elements().len()
        );
        assert_eq!(second.widget.hovered(), None);
    }

    #[test]
    fn test_fitted_projection_scale_rule() {
        let config = AppConfig::default();
        let projection =
            AlbersUsa::fitted(config.width as f64, config.height as f64);
        // scale = default * height / 600, centered in the surface
        assert!((projection.scale_factor() - 1070.0).abs() < 1e-9);
        assert_eq!(projection.translate_point(), (500.0, 300.0));
    }
}
