use std::time::{Duration, Instant};

use egui::{Align2, Color32, Context, CursorIcon, FontId, Painter, Pos2, Rect, Stroke, Vec2};

use crate::effects::{self, ClickRipple, CursorTrail, ParticleField};
use crate::layout;
use crate::session::{Feedback, Session, Tier};

/// Text and colours of the results screen for one scoring bracket.
struct TierStyle {
    title: &'static str,
    message: String,
    base: Color32,
    particle: Color32,
}

fn tier_style(tier: Tier, score: usize) -> TierStyle {
    match tier {
        Tier::Perfect => TierStyle {
            title: "Perfect score!",
            message: "You know this material inside out.".to_string(),
            base: Color32::from_rgb(100, 255, 100),
            particle: Color32::from_rgb(255, 255, 0),
        },
        Tier::Excellent => TierStyle {
            title: "Excellent work!",
            message: format!("{} correct, keep it up!", score),
            base: Color32::from_rgb(100, 200, 255),
            particle: Color32::WHITE,
        },
        Tier::Fair => TierStyle {
            title: "Keep going!",
            message: format!("{} correct. You have the basics, review a little more.", score),
            base: Color32::from_rgb(255, 200, 100),
            particle: Color32::from_rgb(255, 150, 50),
        },
        Tier::NeedsWork => TierStyle {
            title: "Needs more practice.",
            message: format!("{} correct. Don't give up, go over the ones you missed.", score),
            base: Color32::from_rgb(255, 100, 100),
            particle: Color32::from_rgb(150, 150, 150),
        },
    }
}

fn format_elapsed(elapsed: Duration) -> String {
    let secs = elapsed.as_secs();
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

pub struct QuizUI {
    pub dark_mode: bool,
    trail: CursorTrail,
    ripple: Option<ClickRipple>,
    particles: ParticleField,
    results_started: Option<Instant>,
}

impl Default for QuizUI {
    fn default() -> Self {
        Self {
            dark_mode: false,
            trail: CursorTrail::default(),
            ripple: None,
            particles: ParticleField::default(),
            results_started: None,
        }
    }
}

impl QuizUI {
    pub fn new(dark_mode: bool) -> Self {
        Self {
            dark_mode,
            ..Self::default()
        }
    }

    fn background(&self) -> Color32 {
        if self.dark_mode {
            Color32::from_gray(30)
        } else {
            Color32::from_gray(240)
        }
    }

    fn ink(&self) -> Color32 {
        if self.dark_mode {
            Color32::from_gray(220)
        } else {
            Color32::from_gray(50)
        }
    }

    pub fn track_pointer(&mut self, pointer: Option<Pos2>) {
        if let Some(p) = pointer {
            self.trail.push(p);
        }
    }

    pub fn on_answer(&mut self, at: Pos2, now: Instant) {
        self.ripple = Some(ClickRipple::new(at, now));
    }

    /// Starts the results clock the first frame the results screen is up.
    pub fn enter_results(&mut self, now: Instant) {
        self.results_started.get_or_insert(now);
    }

    pub fn leave_results(&mut self) {
        self.results_started = None;
        self.ripple = None;
    }

    pub fn restart_ready(&self, now: Instant, unlock: Duration) -> bool {
        self.results_started
            .map_or(false, |start| now.saturating_duration_since(start) > unlock)
    }

    pub fn show_loading(&self, painter: &Painter, canvas: Rect) {
        painter.rect_filled(canvas, 0.0, self.background());
        painter.text(
            canvas.center(),
            Align2::CENTER_CENTER,
            "Loading quiz...",
            FontId::proportional(32.0),
            self.ink(),
        );
    }

    pub fn show_error(&self, painter: &Painter, canvas: Rect) {
        painter.rect_filled(canvas, 0.0, self.background());
        painter.text(
            canvas.center(),
            Align2::CENTER_CENTER,
            "Could not load the quiz. Check the question file and its format.",
            FontId::proportional(20.0),
            self.ink(),
        );
    }

    pub fn show_question(
        &mut self,
        ctx: &Context,
        painter: &Painter,
        canvas: Rect,
        session: &Session,
        feedback: Option<&Feedback>,
        pointer: Option<Pos2>,
        now: Instant,
    ) {
        painter.rect_filled(canvas, 0.0, self.background());
        let Some(question) = session.current_question() else {
            return;
        };

        let origin = canvas.min.to_vec2();
        let viewport = canvas.size();
        let width = viewport.x;
        let margin = layout::LayoutMetrics::for_width(width).margin;
        let ink = self.ink();

        painter.text(
            canvas.min + Vec2::splat(margin),
            Align2::LEFT_TOP,
            format!(
                "Question {} / {} | Score: {}",
                session.current_index() + 1,
                session.len(),
                session.score()
            ),
            FontId::proportional(layout::text_scale(width, 16.0, 20.0)),
            ink,
        );

        let prompt_box = layout::question_rect(viewport).translate(origin);
        let prompt = painter.layout(
            question.prompt.clone(),
            FontId::proportional(layout::text_scale(width, 22.0, 30.0)),
            ink,
            prompt_box.width(),
        );
        painter.galley(prompt_box.min, prompt);

        let rects = layout::option_bounds(viewport, question.options.len());
        let hovered = pointer.and_then(|p| layout::hit_test(p - origin, &rects));
        let option_font = FontId::proportional(layout::text_scale(width, 16.0, 18.0));

        for (i, (option, rect)) in question.options.iter().zip(&rects).enumerate() {
            let rect = rect.translate(origin);
            if hovered == Some(i) {
                painter.rect(
                    rect,
                    12.0,
                    Color32::from_rgb(180, 200, 255),
                    Stroke::new(4.0, Color32::from_rgb(0, 100, 255)),
                );
            } else {
                painter.rect(
                    rect,
                    12.0,
                    Color32::WHITE,
                    Stroke::new(1.0, Color32::from_gray(150)),
                );
            }

            let text_color = Color32::from_gray(50);
            painter.text(
                rect.left_center() + Vec2::new(15.0, 0.0),
                Align2::LEFT_CENTER,
                format!("{}:", option.key),
                option_font.clone(),
                text_color,
            );
            let galley = painter.layout(
                option.text.clone(),
                option_font.clone(),
                text_color,
                rect.width() - 55.0,
            );
            let top = rect.center().y - galley.size().y / 2.0;
            painter.galley(Pos2::new(rect.min.x + 45.0, top.max(rect.min.y)), galley);
        }

        if hovered.is_some() {
            ctx.output_mut(|o| o.cursor_icon = CursorIcon::PointingHand);
        }

        if let Some(feedback) = feedback.filter(|f| now < f.expires_at) {
            let text = match (feedback.correct, feedback.correct_key_if_wrong) {
                (true, _) => "Correct!".to_string(),
                (false, Some(key)) => format!("Wrong, the correct answer is {}", key),
                (false, None) => "Wrong, none of the options was marked correct".to_string(),
            };
            painter.text(
                feedback.position + origin,
                Align2::CENTER_TOP,
                text,
                FontId::proportional(24.0),
                Color32::from_rgb(50, 50, 200),
            );
        }

        self.trail.paint(painter, hovered.is_some());
        if let Some(ripple) = self.ripple {
            if ripple.is_done(now) {
                self.ripple = None;
            } else {
                ripple.paint(painter, canvas, pointer, now);
            }
        }
    }

    pub fn show_results(
        &mut self,
        painter: &Painter,
        canvas: Rect,
        session: &Session,
        now: Instant,
        restart_ready: bool,
    ) {
        self.enter_results(now);
        let frames = self
            .results_started
            .map_or(0.0, |start| effects::frames_since(start, now));
        let style = tier_style(session.tier(), session.score());
        let c = canvas.center();

        painter.rect_filled(canvas, 0.0, self.background());
        painter.rect_filled(
            canvas,
            0.0,
            Color32::from_rgba_unmultiplied(style.base.r(), style.base.g(), style.base.b(), 200),
        );
        effects::paint_results_wave(painter, canvas, frames);

        let black = Color32::BLACK;
        painter.text(c - Vec2::new(0.0, 50.0), Align2::CENTER_CENTER, style.title, FontId::proportional(50.0), black);
        painter.text(c + Vec2::new(0.0, 20.0), Align2::CENTER_CENTER, style.message, FontId::proportional(24.0), black);
        painter.text(
            c + Vec2::new(0.0, 80.0),
            Align2::CENTER_CENTER,
            format!("Final score: {}/{}", session.score(), session.len()),
            FontId::proportional(36.0),
            black,
        );
        painter.text(
            c + Vec2::new(0.0, 125.0),
            Align2::CENTER_CENTER,
            format!("Time: {}", format_elapsed(session.elapsed(now))),
            FontId::proportional(18.0),
            black,
        );

        self.particles.paint(painter, canvas, style.particle, frames);

        if restart_ready {
            painter.text(
                Pos2::new(c.x, canvas.max.y - 50.0),
                Align2::CENTER_CENTER,
                "Click anywhere to restart",
                FontId::proportional(18.0),
                Color32::from_gray(50),
            );
        }

        self.trail.paint(painter, false);
    }
}
