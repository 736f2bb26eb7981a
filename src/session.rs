use std::time::{Duration, Instant};

use egui::{pos2, Pos2, Rect};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::{LoadError, SubmitError};
use crate::quiz::{OptionKey, QuestionBank};
use crate::sampler::{self, SessionQuestion};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Loading,
    Active,
    Finished,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(u64);

/// One playthrough. Replaced wholesale on restart.
#[derive(Debug)]
pub struct Session {
    id: SessionId,
    questions: Vec<SessionQuestion>,
    current_index: usize,
    score: usize,
    started_at: Instant,
    finished_at: Option<Instant>,
}

impl Session {
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn score(&self) -> usize {
        self.score
    }

    pub fn current_question(&self) -> Option<&SessionQuestion> {
        self.questions.get(self.current_index)
    }

    pub fn is_complete(&self) -> bool {
        self.current_index >= self.questions.len()
    }

    /// Time from the first question to the last advance, or until `now` while
    /// the session is still running.
    pub fn elapsed(&self, now: Instant) -> Duration {
        self.finished_at
            .unwrap_or(now)
            .saturating_duration_since(self.started_at)
    }

    pub fn tier(&self) -> Tier {
        Tier::for_score(self.score, self.questions.len())
    }
}

/// Outcome of an answer, shown until the scheduled advance fires.
#[derive(Debug, Clone, PartialEq)]
pub struct Feedback {
    pub correct: bool,
    /// Display label of the right answer, only set when the guess was wrong.
    pub correct_key_if_wrong: Option<OptionKey>,
    pub position: Pos2,
    pub expires_at: Instant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ScheduledAdvance {
    session: SessionId,
    due: Instant,
}

/// Scoring bracket used by the results screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    Perfect,
    Excellent,
    Fair,
    NeedsWork,
}

impl Tier {
    pub fn for_score(score: usize, total: usize) -> Self {
        if total == 0 {
            Tier::NeedsWork
        } else if score >= total {
            Tier::Perfect
        } else if score * 4 >= total * 3 {
            Tier::Excellent
        } else if score * 2 >= total {
            Tier::Fair
        } else {
            Tier::NeedsWork
        }
    }
}

pub struct QuizMachine {
    phase: Phase,
    bank: Option<QuestionBank>,
    session: Option<Session>,
    feedback: Option<Feedback>,
    pending: Option<ScheduledAdvance>,
    next_session: u64,
    questions_to_pick: usize,
    advance_delay: Duration,
    rng: StdRng,
}

impl QuizMachine {
    pub fn new(questions_to_pick: usize, advance_delay: Duration) -> Self {
        Self::with_rng(questions_to_pick, advance_delay, StdRng::from_entropy())
    }

    /// Same as [`QuizMachine::new`] with a caller supplied gameplay generator.
    pub fn with_rng(questions_to_pick: usize, advance_delay: Duration, rng: StdRng) -> Self {
        Self {
            phase: Phase::Loading,
            bank: None,
            session: None,
            feedback: None,
            pending: None,
            next_session: 0,
            questions_to_pick,
            advance_delay,
            rng,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn feedback(&self) -> Option<&Feedback> {
        self.feedback.as_ref()
    }

    /// True while an answer is on screen and the next question has not come up.
    pub fn is_awaiting_advance(&self) -> bool {
        self.pending.is_some()
    }

    pub fn finish_loading(&mut self, result: Result<QuestionBank, LoadError>, now: Instant) {
        if self.phase != Phase::Loading {
            log::warn!("Ignoring load result in phase {:?}", self.phase);
            return;
        }
        match result {
            Ok(bank) => {
                log::info!("Question bank ready with {} questions", bank.len());
                self.bank = Some(bank);
                self.start_session(now);
            }
            Err(e) => {
                log::error!("Question bank failed to load: {}", e);
                self.phase = Phase::Error;
            }
        }
    }

    pub fn submit_answer(
        &mut self,
        option_index: usize,
        feedback_region: Rect,
        now: Instant,
    ) -> Result<&Feedback, SubmitError> {
        if self.phase != Phase::Active {
            return Err(SubmitError::NotActive);
        }
        if self.pending.is_some() {
            return Err(SubmitError::AwaitingAdvance);
        }
        let session = self.session.as_mut().ok_or(SubmitError::NotActive)?;
        let question = session
            .questions
            .get(session.current_index)
            .ok_or(SubmitError::NotActive)?;
        let option = question
            .options
            .get(option_index)
            .ok_or(SubmitError::NoSuchOption(option_index))?;

        let correct = option.is_correct;
        let correct_key_if_wrong = if correct { None } else { question.correct_key() };
        if correct {
            session.score += 1;
        }
        log::debug!(
            "Question {} answered {} ({}), score {}",
            session.current_index + 1,
            option.key,
            if correct { "correct" } else { "wrong" },
            session.score
        );

        let due = now + self.advance_delay;
        self.pending = Some(ScheduledAdvance {
            session: session.id,
            due,
        });
        let position = random_point(&mut self.rng, feedback_region);
        Ok(&*self.feedback.insert(Feedback {
            correct,
            correct_key_if_wrong,
            position,
            expires_at: due,
        }))
    }

    /// Fires the scheduled advance once it is due. Returns true when the
    /// current question changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        let Some(advance) = self.pending else {
            return false;
        };
        if now < advance.due {
            return false;
        }
        self.pending = None;
        self.feedback = None;

        let Some(session) = self.session.as_mut().filter(|s| s.id == advance.session) else {
            log::debug!("Dropping advance for superseded session {:?}", advance.session);
            return false;
        };
        if session.is_complete() {
            return false;
        }
        session.current_index += 1;
        if session.is_complete() {
            session.finished_at = Some(now);
            self.phase = Phase::Finished;
            log::info!("Quiz finished with {}/{}", session.score, session.len());
        }
        true
    }

    /// Starts a fresh session from the bank. Only valid once a session ended.
    pub fn restart(&mut self, now: Instant) -> bool {
        if self.phase != Phase::Finished {
            return false;
        }
        self.start_session(now);
        true
    }

    fn start_session(&mut self, now: Instant) {
        let Some(bank) = self.bank.as_ref() else {
            return;
        };
        self.pending = None;
        self.feedback = None;

        let questions = sampler::sample(bank, self.questions_to_pick, &mut self.rng);
        let id = SessionId(self.next_session);
        self.next_session += 1;
        let empty = questions.is_empty();

        self.session = Some(Session {
            id,
            questions,
            current_index: 0,
            score: 0,
            started_at: now,
            finished_at: empty.then_some(now),
        });
        self.phase = if empty { Phase::Finished } else { Phase::Active };
        log::info!("Started session {:?} in phase {:?}", id, self.phase);
    }
}

fn random_point(rng: &mut StdRng, region: Rect) -> Pos2 {
    let mut pick = |lo: f32, hi: f32| if hi > lo { rng.gen_range(lo..hi) } else { lo };
    let x = pick(region.min.x, region.max.x);
    let y = pick(region.min.y, region.max.y);
    pos2(x, y)
}
