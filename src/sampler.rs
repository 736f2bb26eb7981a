use rand::seq::SliceRandom;
use rand::Rng;

use crate::quiz::{OptionKey, QuestionBank, QuestionRecord};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionOption {
    /// Label shown on screen, by position after the shuffle.
    pub key: OptionKey,
    /// Label the option had in the source row.
    pub source_key: OptionKey,
    pub text: String,
    pub is_correct: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionQuestion {
    pub prompt: String,
    pub options: Vec<SessionOption>,
}

impl SessionQuestion {
    fn from_record<R: Rng + ?Sized>(record: &QuestionRecord, rng: &mut R) -> Self {
        let mut options: Vec<SessionOption> = OptionKey::ALL
            .into_iter()
            .map(|source_key| SessionOption {
                key: source_key,
                source_key,
                text: record.options[source_key.index()].clone(),
                is_correct: record.correct_key == Some(source_key),
            })
            .collect();

        options.shuffle(rng);
        for (option, key) in options.iter_mut().zip(OptionKey::ALL) {
            option.key = key;
        }

        Self {
            prompt: record.prompt.clone(),
            options,
        }
    }

    /// Display label of the correct option, if the question has one.
    pub fn correct_key(&self) -> Option<OptionKey> {
        self.options.iter().find(|o| o.is_correct).map(|o| o.key)
    }
}

/// Picks `min(k, bank.len())` questions uniformly at random and shuffles the
/// options of each one.
pub fn sample<R: Rng + ?Sized>(bank: &QuestionBank, k: usize, rng: &mut R) -> Vec<SessionQuestion> {
    let mut pool: Vec<&QuestionRecord> = bank.records().iter().collect();
    pool.shuffle(rng);
    pool.truncate(k);

    let mut questions = Vec::with_capacity(pool.len());
    for record in pool {
        questions.push(SessionQuestion::from_record(record, rng));
    }
    questions
}
