// ui.rs - Board drawing and controls for the torus puzzle
// The display grid is one tile wider on every side; the clip rect hides that ring
// until a slide drags it into view

use eframe::egui;
use egui::{Color32, Rect, Stroke, Vec2};
use std::time::Instant;
use torus_core::{Direction, PhaseState, PieceColor};

use crate::{TILE_SIZE, TorusPuzzle, puzzles};

fn piece_color(color: Option<PieceColor>) -> Color32 {
    match color {
        Some(PieceColor::Red) => Color32::from_rgb(220, 60, 60),
        Some(PieceColor::Green) => Color32::from_rgb(60, 190, 90),
        Some(PieceColor::Blue) => Color32::from_rgb(60, 110, 220),
        Some(PieceColor::Yellow) => Color32::from_rgb(235, 200, 60),
        Some(PieceColor::Purple) => Color32::from_rgb(160, 80, 200),
        None => Color32::from_gray(60),
    }
}

impl eframe::App for TorusPuzzle {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Advance tweens, then give the running phase its tick
        let now = Instant::now();
        let dt = now.duration_since(self.last_frame).as_secs_f32();
        self.last_frame = now;
        self.stage.borrow_mut().advance(dt);
        self.drive();

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading("Torus Slide Puzzle");

            let state = self.state();
            let ready = !self.is_busy() && state == Some(PhaseState::Ready);

            // Board selection
            ui.horizontal(|ui| {
                ui.label("Board:");
                egui::ComboBox::from_id_source("preset_selector")
                    .selected_text(puzzles::PRESETS[self.selected_preset].name)
                    .show_ui(ui, |ui| {
                        for (i, preset) in puzzles::PRESETS.iter().enumerate() {
                            ui.selectable_value(&mut self.selected_preset, i, preset.name);
                        }
                    });

                if ui.button("Load").clicked() {
                    match puzzles::preset_grid(&puzzles::PRESETS[self.selected_preset]) {
                        Ok(grid) => self.load(grid),
                        Err(err) => self.status = err.to_string(),
                    }
                }

                if ui.add_enabled(ready, egui::Button::new("🎲 Next puzzle")).clicked() {
                    self.next_puzzle();
                }

                if ui.add_enabled(self.is_busy(), egui::Button::new("⏹ Abort")).clicked() {
                    self.abort();
                }
            });

            ui.separator();

            // Pivot and slide controls
            let columns = self.logical.columns();
            let rows = self.logical.rows();
            ui.horizontal(|ui| {
                ui.label("Column:");
                ui.add(egui::Slider::new(&mut self.pivot_column, 0..=columns - 1));
                ui.label("Row:");
                ui.add(egui::Slider::new(&mut self.pivot_row, 0..=rows - 1));
            });

            ui.horizontal(|ui| {
                for (label, direction) in [
                    ("⬆ Up", Direction::Up),
                    ("⬇ Down", Direction::Down),
                    ("⬅ Left", Direction::Left),
                    ("➡ Right", Direction::Right),
                ] {
                    if ui.add_enabled(ready, egui::Button::new(label)).clicked() {
                        self.slide(direction);
                    }
                }

                // Recovery after an aborted phase
                if !self.is_busy() && state == Some(PhaseState::Idle) && ui.button("Initialize").clicked() {
                    self.initialize();
                }
                if !self.is_busy() && state == Some(PhaseState::Hidden) && ui.button("Reveal").clicked() {
                    self.reveal();
                }
            });

            ui.separator();

            // Draw the board: only the logical area is visible
            let board_size = Vec2::new(columns as f32 * TILE_SIZE, rows as f32 * TILE_SIZE);
            let (response, painter) = ui.allocate_painter(board_size, egui::Sense::hover());
            let board = response.rect;
            let painter = painter.with_clip_rect(board);

            painter.rect_filled(board, 0.0, Color32::from_gray(20));

            let stage = self.stage.borrow();
            let alpha = stage.container_alpha();
            for piece in stage.pieces() {
                let node = piece.node();
                let size = Vec2::new(piece.width(), piece.height());
                // Container y grows upwards, screen y grows downwards
                let min = board.min + Vec2::new(node.position.x, -node.position.y);
                let cell = Rect::from_min_size(min, size);
                if !cell.intersects(board) {
                    continue;
                }

                let tile = Rect::from_center_size(cell.center(), size * node.scale * 0.94);
                let color = piece_color(node.color).gamma_multiply(alpha * node.alpha);
                painter.rect_filled(tile, 6.0, color);
                painter.rect_stroke(tile, 6.0, Stroke::new(1.0, Color32::from_gray(30)));
            }

            // Flash the frame while the move sound plays
            let flash = stage.sound_flash();
            if flash > 0.0 {
                let stroke = Stroke::new(3.0, Color32::WHITE.gamma_multiply(flash));
                ui.painter().rect_stroke(board.expand(2.0), 0.0, stroke);
            }
            let animating = stage.is_animating();
            drop(stage);

            ui.separator();

            ui.horizontal(|ui| {
                ui.label(format!("State: {}", state.map_or("running".to_string(), |s| s.to_string())));
                ui.label(format!("Moves: {}", self.moves));
                ui.label(format!("Status: {}", self.status));
            });

            if animating || self.is_busy() {
                ctx.request_repaint();
            }
        });
    }
}
