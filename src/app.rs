use eframe::egui;
use std::path::PathBuf;
use std::time::Instant;

use crate::config::UserConfig;
use crate::layout;
use crate::loader::BankLoader;
use crate::session::{Phase, QuizMachine};
use crate::ui::QuizUI;

/// Where the primary button went down this frame, if it went down on the
/// canvas. Answers act on the press point; the release is ignored.
fn press_position(ctx: &egui::Context, canvas: egui::Rect) -> Option<egui::Pos2> {
    ctx.input(|i| {
        if !i.pointer.primary_pressed() {
            return None;
        }
        i.pointer.press_origin().filter(|p| canvas.contains(*p))
    })
}

pub struct QuizApp {
    config: UserConfig,
    ui: QuizUI,
    quiz: QuizMachine,
    loader: Option<BankLoader>,
}

impl QuizApp {
    pub fn new(cc: &eframe::CreationContext<'_>, config: UserConfig, bank_path: PathBuf) -> Self {
        let visuals = if config.dark_mode {
            egui::Visuals::dark()
        } else {
            egui::Visuals::light()
        };
        cc.egui_ctx.set_visuals(visuals);

        let ui = QuizUI::new(config.dark_mode);
        let quiz = QuizMachine::new(config.questions_to_pick, config.advance_delay());
        Self {
            config,
            ui,
            quiz,
            loader: Some(BankLoader::spawn(bank_path)),
        }
    }

    fn poll_loader(&mut self, now: Instant) {
        let Some(loader) = self.loader.as_mut() else {
            return;
        };
        let Some(result) = loader.poll() else {
            return;
        };
        let path = loader.path().clone();
        self.loader = None;

        if result.is_ok() {
            self.config
                .update_file_history(path.to_string_lossy().into_owned());
            if let Err(e) = self.config.save() {
                log::warn!("Could not save config: {}", e);
            }
        }
        self.quiz.finish_loading(result, now);
    }

    fn handle_press(&mut self, pos: egui::Pos2, canvas: egui::Rect, now: Instant) {
        match self.quiz.phase() {
            Phase::Active => {
                if self.quiz.is_awaiting_advance() {
                    log::debug!("Press ignored while the answer is shown");
                    return;
                }
                let Some(count) = self
                    .quiz
                    .session()
                    .and_then(|s| s.current_question())
                    .map(|q| q.options.len())
                else {
                    return;
                };
                let viewport = canvas.size();
                let local = pos - canvas.min.to_vec2();
                let rects = layout::option_bounds(viewport, count);
                let Some(index) = layout::hit_test(local, &rects) else {
                    return;
                };

                let region = layout::feedback_region(viewport, count);
                match self.quiz.submit_answer(index, region, now) {
                    Ok(_) => self.ui.on_answer(pos, now),
                    Err(e) => log::warn!("Answer rejected: {}", e),
                }
            }
            Phase::Finished => {
                if self.ui.restart_ready(now, self.config.restart_unlock()) && self.quiz.restart(now) {
                    self.ui.leave_results();
                }
            }
            Phase::Loading | Phase::Error => {}
        }
    }
}

impl eframe::App for QuizApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = Instant::now();
        self.poll_loader(now);
        self.quiz.tick(now);

        egui::CentralPanel::default()
            .frame(egui::Frame::none().inner_margin(10.0))
            .show(ctx, |ui| {
                let (response, painter) =
                    ui.allocate_painter(ui.available_size(), egui::Sense::hover());
                let canvas = response.rect;
                let pointer = ctx.input(|i| i.pointer.hover_pos());

                if let Some(pos) = press_position(ctx, canvas) {
                    self.handle_press(pos, canvas, now);
                }

                match self.quiz.phase() {
                    Phase::Loading => self.ui.show_loading(&painter, canvas),
                    Phase::Error => self.ui.show_error(&painter, canvas),
                    Phase::Active => {
                        self.ui.track_pointer(pointer);
                        if let Some(session) = self.quiz.session() {
                            self.ui.show_question(
                                ctx,
                                &painter,
                                canvas,
                                session,
                                self.quiz.feedback(),
                                pointer,
                                now,
                            );
                        }
                    }
                    Phase::Finished => {
                        self.ui.track_pointer(pointer);
                        let ready = self.ui.restart_ready(now, self.config.restart_unlock());
                        if let Some(session) = self.quiz.session() {
                            self.ui.show_results(&painter, canvas, session, now, ready);
                        }
                    }
                }
            });

        ctx.request_repaint();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::{pos2, Event, Modifiers, PointerButton, RawInput};

    fn canvas() -> egui::Rect {
        egui::Rect::from_min_max(pos2(10.0, 10.0), pos2(790.0, 590.0))
    }

    fn button(pos: egui::Pos2, pressed: bool) -> Event {
        Event::PointerButton {
            pos,
            button: PointerButton::Primary,
            pressed,
            modifiers: Modifiers::default(),
        }
    }

    fn frame(ctx: &egui::Context, events: Vec<Event>) -> Option<egui::Pos2> {
        let mut seen = None;
        let _ = ctx.run(
            RawInput {
                events,
                ..RawInput::default()
            },
            |ctx| seen = press_position(ctx, canvas()),
        );
        seen
    }

    #[test]
    fn press_acts_on_the_press_point() {
        let ctx = egui::Context::default();
        let down = pos2(100.0, 250.0);
        assert_eq!(frame(&ctx, vec![Event::PointerMoved(down), button(down, true)]), Some(down));

        let up = pos2(600.0, 400.0);
        assert_eq!(frame(&ctx, vec![Event::PointerMoved(up), button(up, false)]), None);
    }

    #[test]
    fn press_outside_the_canvas_is_ignored() {
        let ctx = egui::Context::default();
        let outside = pos2(5.0, 5.0);
        assert_eq!(frame(&ctx, vec![Event::PointerMoved(outside), button(outside, true)]), None);
    }

    #[test]
    fn hover_alone_is_not_a_press() {
        let ctx = egui::Context::default();
        assert_eq!(frame(&ctx, vec![Event::PointerMoved(pos2(100.0, 250.0))]), None);
    }
}
