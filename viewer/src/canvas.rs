use kernel::geometry;

use eframe::egui;

use std::hash::Hash;

/// A pannable, zoomable drawing surface in graph coordinates (y up).
pub struct Canvas {
    id_source: egui::Id,
    size: egui::Vec2,
    initial_mem: CanvasMemory,
    bg_color: egui::Color32,
}

impl Canvas {
    pub fn new(id_source: impl Hash) -> Self {
        Self {
            id_source: egui::Id::new(id_source),
            size: egui::Vec2::splat(100.0),
            initial_mem: CanvasMemory {
                transform: na::Similarity2::identity()
            },
            bg_color: egui::Color32::WHITE,
        }
    }

    pub fn size(mut self, size: egui::Vec2) -> Self {
        self.size = size;
        self
    }

    /// Transform from graph coordinates to pixels from the bottom left corner, used until the
    /// user pans or zooms.
    pub fn initial_transform(mut self, transform: na::Similarity2<f64>) -> Self {
        self.initial_mem.transform = transform;
        self
    }

    /// A transform showing `rect` centered in a canvas of `size` pixels, with `margin` graph units
    /// around it.
    pub fn fit_transform(size: egui::Vec2, rect: &geometry::Rect, margin: f64) -> na::Similarity2<f64> {
        let extent = (rect.max - rect.min).add_scalar(2.0 * margin);
        let scale = (size.x as f64 / extent.x).min(size.y as f64 / extent.y).max(1e-3);
        let center = na::center(&rect.min, &rect.max);
        let translation = na::Vector2::new(size.x as f64, size.y as f64) / 2.0 - center.coords * scale;
        na::Similarity2::new(translation, 0.0, scale)
    }

    pub fn show<'a, R, F: FnOnce(CanvasUi<'a>) -> R>(self, ui: &'a mut egui::Ui, f: F) -> Option<R> {
        let id = ui.make_persistent_id(self.id_source);
        let (res, painter) = ui.allocate_painter(self.size, egui::Sense::click_and_drag());

        if ui.is_rect_visible(res.rect) {
            painter.rect_filled(res.rect, 0.0, self.bg_color);

            let mut mem = ui.memory_mut(|m| m.data.get_temp::<CanvasMemory>(id))
                .unwrap_or(self.initial_mem);

            let mut canvas = CanvasUi {
                painter,
                rect: res.rect,
                transform: mem.transform,
                res,
                ui,
            };

            if canvas.res.dragged_by(egui::PointerButton::Secondary) {
                canvas.transform.append_translation_mut(&(canvas.transform.scaling() * canvas.canvas_vec(canvas.res.drag_delta())).into());
                mem.transform = canvas.transform;
                canvas.ui.memory_mut(|m| m.data.insert_temp(id, mem.clone()));
            }

            let scroll = canvas.ui.input(|i| i.scroll_delta.y) as f64;
            if let Some(pos) = canvas.mouse_pos().filter(|_| scroll != 0.0) {
                let zoom = f64::exp(scroll * 0.01);
                canvas.transform =
                    canvas.transform
                    * na::Translation2::from(pos.coords)
                    * na::Similarity2::from_scaling(zoom)
                    * na::Translation2::from(-pos.coords);
                mem.transform = canvas.transform;
                canvas.ui.memory_mut(|m| m.data.insert_temp(id, mem.clone()));
            }

            Some(f(canvas))
        } else {
            None
        }
    }
}

#[derive(Clone)]
pub struct CanvasMemory {
    transform: na::Similarity2<f64>,
}

pub struct CanvasUi<'a> {
    painter: egui::Painter,
    rect: egui::Rect,
    transform: na::Similarity2<f64>,
    res: egui::Response,
    ui: &'a mut egui::Ui,
}

impl<'a> CanvasUi<'a> {
    pub fn response(&self) -> &egui::Response {
        &self.res
    }

    pub fn ui(&self) -> &egui::Ui {
        self.ui
    }

    fn origin(&self) -> na::Point2<f64> {
        na::Point2::from(<[f32; 2]>::from(self.rect.left_bottom())).cast()
    }

    pub fn gui_point(&self, p: na::Point2<f64>) -> egui::Pos2 {
        let p = self.transform * p;
        let o = self.origin();
        egui::Pos2::new((p.x + o.x) as f32, (o.y - p.y) as f32)
    }

    pub fn canvas_point(&self, p: egui::Pos2) -> na::Point2<f64> {
        let o = self.origin();
        self.transform.inverse() * na::Point2::new(p.x as f64 - o.x, o.y - p.y as f64)
    }

    pub fn canvas_vec(&self, p: egui::Vec2) -> na::Vector2<f64> {
        self.transform.inverse() * na::Vector2::new(p.x as f64, -p.y as f64)
    }

    pub fn mouse_pos(&self) -> Option<na::Point2<f64>> {
        self.res.hover_pos().map(|p| self.canvas_point(p))
    }

    pub fn scale_factor(&self) -> f64 {
        self.transform.scaling()
    }

    /// Unit grid lines and the two axes over `rect`.
    pub fn grid(&self, rect: &geometry::Rect) {
        let minor = (1.0_f32, egui::Color32::from_gray(225));
        let axis = (1.5_f32, egui::Color32::DARK_GRAY);

        let mut x = rect.min.x.ceil();
        while x <= rect.max.x {
            let stroke = if x == 0.0 { axis } else { minor };
            self.line_segment(na::Point2::new(x, rect.min.y), na::Point2::new(x, rect.max.y), stroke);
            x += 1.0;
        }

        let mut y = rect.min.y.ceil();
        while y <= rect.max.y {
            let stroke = if y == 0.0 { axis } else { minor };
            self.line_segment(na::Point2::new(rect.min.x, y), na::Point2::new(rect.max.x, y), stroke);
            y += 1.0;
        }
    }

    /// Draws the part of an infinite line inside `rect`.
    pub fn line(&self, line: &geometry::Line, rect: &geometry::Rect, dashed: bool, stroke: impl Into<egui::Stroke>) {
        let xs = geometry::dedup_points(&line.box_intersections(rect), geometry::DEDUP_EPSILON);

        if let [sp, ep, ..] = xs.as_slice() {
            let stroke = stroke.into();
            if dashed {
                self.painter.extend(egui::Shape::dashed_line(
                    &[self.gui_point(*sp), self.gui_point(*ep)], stroke, 8.0, 6.0));
            } else {
                self.painter.line_segment([self.gui_point(*sp), self.gui_point(*ep)], stroke);
            }
        }
    }

    pub fn polygon(&self, vertices: &[na::Point2<f64>], fill: egui::Color32) {
        if vertices.len() < 3 {
            return
        }

        let points = vertices.iter().map(|p| self.gui_point(*p)).collect();
        self.painter.add(egui::Shape::convex_polygon(points, fill, egui::Stroke::NONE));
    }

    pub fn point(&self, p: na::Point2<f64>, color: egui::Color32) {
        self.painter.circle_filled(self.gui_point(p), 4.0, color);
    }

    pub fn hollow_point(&self, p: na::Point2<f64>, color: egui::Color32) {
        let center = self.gui_point(p);
        self.painter.circle_filled(center, 4.0, egui::Color32::WHITE);
        self.painter.circle_stroke(center, 4.0, (1.5_f32, color));
    }

    pub fn line_segment(&self, p1: na::Point2<f64>, p2: na::Point2<f64>, stroke: impl Into<egui::Stroke>) {
        let p1 = self.gui_point(p1);
        let p2 = self.gui_point(p2);
        self.painter.line_segment([p1, p2], stroke);
    }
}
