use std::path::{Path, PathBuf};

use eframe::egui;

use crate::background::{self, IMAGE_EXTENSIONS, PRESET_DIR, SURFACE_HEIGHT, SURFACE_WIDTH};
use crate::session::{Annotation, Session};
use crate::tools::Tool;

const PRESET_PLACEHOLDER: &str = "Select Preset Image";

pub struct MapmarkApp {
    session: Session,
    presets: Vec<String>,
    selected_preset: Option<String>,
    texture: Option<egui::TextureHandle>,
}

impl MapmarkApp {
    pub fn new(image: Option<PathBuf>, tool_key: Option<String>) -> Self {
        let mut session = Session::new();
        if let Some(key) = tool_key {
            session.select_tool_key(&key);
        }
        let presets = background::preset_images(Path::new(PRESET_DIR));

        let mut app = Self {
            session,
            presets,
            selected_preset: None,
            texture: None,
        };
        if let Some(path) = image {
            app.load_background(&path);
        }
        app
    }

    /// Load boundary: failures are reported once and the session keeps
    /// whatever state it had.
    fn load_background(&mut self, path: &Path) {
        match self.session.load_background(path) {
            Ok(()) => self.texture = None,
            Err(err) => log::error!("{err}"),
        }
    }

    fn load_preset(&mut self, name: &str) {
        let path = Path::new(PRESET_DIR).join(name);
        if path.exists() {
            self.load_background(&path);
        } else {
            log::debug!("preset {name:?} no longer exists, ignoring");
        }
    }

    fn ensure_texture(&mut self, ctx: &egui::Context) {
        if self.texture.is_some() {
            return;
        }
        if let Some(bg) = self.session.background() {
            let rgba = bg.image.to_rgba8();
            let size = [rgba.width() as usize, rgba.height() as usize];
            let pixels = rgba.as_flat_samples();
            let color_image = egui::ColorImage::from_rgba_unmultiplied(size, pixels.as_slice());
            self.texture =
                Some(ctx.load_texture("background", color_image, egui::TextureOptions::LINEAR));
        }
    }

    /// Repaints the annotation log in recorded order, so later annotations
    /// cover earlier ones and the background image.
    fn replay_annotations(&self, painter: &egui::Painter, origin: egui::Pos2) {
        for ann in self.session.annotations() {
            match *ann {
                Annotation::Line {
                    x1,
                    y1,
                    end: Some((x2, y2)),
                    color,
                    width,
                } => {
                    painter.line_segment(
                        [origin + egui::vec2(x1, y1), origin + egui::vec2(x2, y2)],
                        egui::Stroke::new(width, color),
                    );
                }
                // A press that never moved leaves no visible segment.
                Annotation::Line { end: None, .. } => {}
                Annotation::Stamp {
                    x1,
                    y1,
                    x2,
                    y2,
                    color,
                    ..
                } => {
                    let center = origin + egui::vec2((x1 + x2) / 2.0, (y1 + y2) / 2.0);
                    painter.circle_filled(center, (x2 - x1) / 2.0, color);
                }
            }
        }
    }
}

impl eframe::App for MapmarkApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.ensure_texture(ctx);

        // ── Menu bar ────────────────────────────────────────────────────────
        egui::TopBottomPanel::top("menu").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui.button("Load Image").clicked() {
                        ui.close_menu();
                        if let Some(path) = rfd::FileDialog::new()
                            .add_filter("Image files", &IMAGE_EXTENSIONS)
                            .pick_file()
                        {
                            self.load_background(&path);
                        }
                    }
                    if ui.button("Clear Canvas").clicked() {
                        ui.close_menu();
                        self.session.clear();
                        self.texture = None;
                    }
                    ui.separator();
                    if ui.button("Exit").clicked() {
                        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                    }
                });
            });
        });

        // ── Toolbar ─────────────────────────────────────────────────────────
        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                for tool in Tool::ALL {
                    let active = self.session.active_tool() == tool;
                    if ui.selectable_label(active, tool.label()).clicked() {
                        self.session.select_tool(tool);
                    }
                }
                ui.separator();

                let mut clicked_preset = None;
                egui::ComboBox::from_id_salt("preset")
                    .selected_text(self.selected_preset.as_deref().unwrap_or(PRESET_PLACEHOLDER))
                    .show_ui(ui, |ui| {
                        for name in &self.presets {
                            let selected = self.selected_preset.as_deref() == Some(name.as_str());
                            if ui.selectable_label(selected, name.as_str()).clicked() {
                                clicked_preset = Some(name.clone());
                            }
                        }
                    });
                if let Some(name) = clicked_preset {
                    self.selected_preset = Some(name.clone());
                    self.load_preset(&name);
                }
            });
        });

        // ── Canvas ──────────────────────────────────────────────────────────
        egui::CentralPanel::default().show(ctx, |ui| {
            let (response, painter) = ui.allocate_painter(
                egui::vec2(SURFACE_WIDTH, SURFACE_HEIGHT),
                egui::Sense::click_and_drag(),
            );
            let surface_rect = response.rect;
            let origin = surface_rect.min;

            painter.rect_filled(surface_rect, 0.0, egui::Color32::WHITE);

            if let (Some(bg), Some(tex)) = (self.session.background(), &self.texture) {
                let p = bg.placement;
                let image_rect = egui::Rect::from_min_size(
                    origin + egui::vec2(p.x, p.y),
                    egui::vec2(p.width, p.height),
                );
                painter.image(
                    tex.id(),
                    image_rect,
                    egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                    egui::Color32::WHITE,
                );
            }

            self.replay_annotations(&painter, origin);

            // A stationary press comes back as a click, a moving one as a
            // drag; both press the surface.
            if response.clicked() {
                if let Some(pos) = response.interact_pointer_pos() {
                    self.session.pointer_down(pos.x - origin.x, pos.y - origin.y);
                    self.session.pointer_up();
                }
            }
            if response.drag_started_by(egui::PointerButton::Primary) {
                if let Some(pos) = response.interact_pointer_pos() {
                    self.session.pointer_down(pos.x - origin.x, pos.y - origin.y);
                }
            } else if response.dragged_by(egui::PointerButton::Primary) {
                if let Some(pos) = response.interact_pointer_pos() {
                    self.session.pointer_drag(pos.x - origin.x, pos.y - origin.y);
                }
            }
            if response.drag_stopped_by(egui::PointerButton::Primary) {
                self.session.pointer_up();
            }
        });
    }
}
