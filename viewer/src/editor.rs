use kernel::model::LineId;
use kernel::region::{self, RegionShape};
use kernel::{GraphEngine, PointerMode, PointerOutcome};

use eframe::egui;

use std::path::PathBuf;

/// A point of a line, by line and index.
type Handle = (LineId, usize);

enum DragState {
    None,
    Started(Handle),
    Active(Handle),
}

fn line_color(id: LineId) -> egui::Color32 {
    match id {
        LineId::Line1 => egui::Color32::from_rgb(37, 99, 235),
        LineId::Line2 => egui::Color32::from_rgb(220, 38, 38),
    }
}

fn shade_color(id: Option<LineId>) -> egui::Color32 {
    match id {
        Some(LineId::Line1) => egui::Color32::from_rgba_unmultiplied(37, 99, 235, 50),
        Some(LineId::Line2) => egui::Color32::from_rgba_unmultiplied(220, 38, 38, 50),
        None => egui::Color32::from_rgba_unmultiplied(124, 58, 237, 60),
    }
}

pub struct GraphEditor {
    engine: GraphEngine,
    mode: PointerMode,
    dragged_point: DragState,
    snapshot_path: Option<PathBuf>,
    status: String,
}

impl GraphEditor {
    pub fn new(engine: GraphEngine, snapshot_path: Option<PathBuf>) -> Self {
        Self {
            engine,
            mode: PointerMode::PlacePoint,
            dragged_point: DragState::None,
            snapshot_path,
            status: String::new(),
        }
    }

    fn save(&mut self) {
        let path = match &self.snapshot_path {
            Some(path) => path.clone(),
            None => return,
        };

        let res = self.engine.to_json()
            .map_err(anyhow::Error::from)
            .and_then(|json| Ok(std::fs::write(&path, json)?));

        self.status = match res {
            Ok(()) => format!("Saved to {}", path.display()),
            Err(e) => {
                log::error!("saving {}: {}", path.display(), e);
                format!("Save failed: {}", e)
            }
        };
    }

    fn point_at(&self, p: na::Point2<f64>, radius: f64) -> Option<Handle> {
        self.engine.lines().iter()
            .flat_map(|l| l.points.iter().enumerate().map(move |(i, q)| ((l.id, i), q.position())))
            .find(|(_, q)| (*q - p).norm() < radius)
            .map(|(h, _)| h)
    }

    pub fn show(&mut self, ui: &mut egui::Ui) {
        ui.input_mut(|input| {
            if input.consume_shortcut(&egui::KeyboardShortcut::new(egui::Modifiers::NONE, egui::Key::Escape)) {
                self.mode = PointerMode::PlacePoint;
            }

            if input.consume_shortcut(&egui::KeyboardShortcut::new(egui::Modifiers::SHIFT, egui::Key::S)) {
                self.mode = PointerMode::ShadeRegion;
            }

            if input.consume_shortcut(&egui::KeyboardShortcut::new(egui::Modifiers::NONE, egui::Key::Delete)) {
                self.engine.clear_all();
            }
        });

        egui::SidePanel::left("editor_panel")
            .show_separator_line(false)
            .resizable(false)
            .show_inside(ui, |ui| self.side_panel(ui));

        egui::CentralPanel::default().show_inside(ui, |ui| self.canvas(ui));
    }

    fn side_panel(&mut self, ui: &mut egui::Ui) {
        ui.heading("Tool");
        ui.selectable_value(&mut self.mode, PointerMode::PlacePoint, "Place points");
        ui.selectable_value(&mut self.mode, PointerMode::ShadeRegion, "Shade region");
        ui.add_space(10.0);

        let mut dash = None;
        let mut open = None;
        let mut removed = None;

        for line in self.engine.lines() {
            ui.collapsing(line.id.to_string(), |ui| {
                for (i, p) in line.points.iter().enumerate() {
                    ui.label(egui::RichText::new(format!("Point {}: ({}, {})", i, p.x, p.y)).weak().small());
                }

                if let Some(shade) = line.shade {
                    ui.label(format!("Shaded {:?}", shade).to_lowercase());
                }

                ui.horizontal(|ui| {
                    if ui.selectable_label(line.is_dashed, "Dashed").clicked() {
                        dash = Some(line.id);
                    }
                    if ui.button("Open/closed").clicked() {
                        open = Some(line.id);
                    }
                    if ui.button("🗑").clicked() {
                        removed = Some(line.id);
                    }
                });
            });
        }

        if let Some(id) = dash {
            self.engine.toggle_dash(id);
        }
        if let Some(id) = open {
            self.engine.toggle_point_openness(id);
        }
        if let Some(id) = removed {
            self.engine.remove_line(id);
        }

        ui.add_space(10.0);
        ui.label(format!("{} shaded regions", self.engine.regions().len()));

        if ui.button("Clear shading").clicked() {
            self.engine.clear_regions();
        }
        if ui.button("Clear all").clicked() {
            self.engine.clear_all();
        }
        if self.snapshot_path.is_some() && ui.button("Save").clicked() {
            self.save();
        }

        if !self.status.is_empty() {
            ui.label(egui::RichText::new(&self.status).small());
        }
    }

    fn canvas(&mut self, ui: &mut egui::Ui) {
        let size = ui.available_size();
        let bounds = self.engine.bounds().rect();

        crate::canvas::Canvas::new("graph_canvas")
            .size(size)
            .initial_transform(crate::canvas::Canvas::fit_transform(size, &bounds, 2.0))
            .show(ui, |canvas| {
                canvas.grid(&bounds);

                let lines = region::complete_lines(self.engine.lines());

                for r in self.engine.regions().iter() {
                    match &r.shape {
                        RegionShape::HalfPlane { line, shade } => {
                            if let Some((_, l)) = lines.iter().find(|(id, _)| id == line) {
                                canvas.polygon(&region::half_plane_polygon(l, *shade, &bounds), shade_color(Some(*line)));
                            }
                        }
                        RegionShape::Polygon(vertices) => canvas.polygon(vertices, shade_color(None)),
                    }
                }

                for line in self.engine.lines() {
                    if let Some(l) = line.geometry() {
                        canvas.line(&l, &bounds, line.is_dashed, (2.0_f32, line_color(line.id)));
                    }
                }

                // Drag handling, each step is committed to the engine right away.
                if !canvas.response().dragged_by(egui::PointerButton::Primary) {
                    self.dragged_point = DragState::None;
                } else if let DragState::Active((id, idx)) = self.dragged_point {
                    match canvas.mouse_pos() {
                        Some(p) => {
                            self.engine.on_drag_point(id, idx, p.x, p.y);
                        }
                        // Pointer left the canvas, the point stays where it was last dropped.
                        None => self.dragged_point = DragState::None,
                    }
                } else if let DragState::Started((id, idx)) = self.dragged_point {
                    if let Some(p) = canvas.mouse_pos()
                        .filter(|p| {
                            let too_far = canvas.ui().input(|i| i.pointer.press_origin())
                                .map(|o| o.distance(canvas.gui_point(*p)) > 6.0).unwrap_or(false);
                            let too_long = canvas.ui().input(|i| i.pointer.press_start_time()
                                .map(|t| i.time - t > 0.6)).unwrap_or(false);

                            too_far || too_long
                        })
                    {
                        self.dragged_point = DragState::Active((id, idx));
                        self.engine.on_drag_point(id, idx, p.x, p.y);
                    }
                }

                let hovered = canvas.mouse_pos()
                    .filter(|_| self.mode == PointerMode::PlacePoint)
                    .and_then(|p| self.point_at(p, 6.0 / canvas.scale_factor()));

                for line in self.engine.lines() {
                    for (i, p) in line.points.iter().enumerate() {
                        let color = if hovered == Some((line.id, i)) {
                            egui::Color32::BLACK
                        } else {
                            line_color(line.id)
                        };

                        if p.is_open {
                            canvas.hollow_point(p.position(), color);
                        } else {
                            canvas.point(p.position(), color);
                        }
                    }
                }

                if let Some(h) = hovered {
                    if canvas.response().drag_started_by(egui::PointerButton::Primary) {
                        self.dragged_point = DragState::Started(h);
                    }
                } else if let Some(p) = canvas.mouse_pos() {
                    if canvas.response().clicked() {
                        let outcome = self.engine.on_pointer_down(p.x, p.y, self.mode);
                        log::debug!("click at ({:.2}, {:.2}): {:?}", p.x, p.y, outcome);
                        if outcome == PointerOutcome::Ignored {
                            self.status = "Nothing to do there".to_owned();
                        } else {
                            self.status.clear();
                        }
                    }
                }
            });
    }
}
