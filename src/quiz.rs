use std::fmt;
use std::path::Path;

use csv::ReaderBuilder;

use crate::error::LoadError;

/// Number of columns in a data row: prompt, four options, correct key.
pub const FIELDS_PER_ROW: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OptionKey {
    A,
    B,
    C,
    D,
}

impl OptionKey {
    pub const ALL: [OptionKey; 4] = [OptionKey::A, OptionKey::B, OptionKey::C, OptionKey::D];

    /// Parses a single upper-case letter. Anything else, including lower case,
    /// is not a key.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "A" => Some(OptionKey::A),
            "B" => Some(OptionKey::B),
            "C" => Some(OptionKey::C),
            "D" => Some(OptionKey::D),
            _ => None,
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn as_str(self) -> &'static str {
        match self {
            OptionKey::A => "A",
            OptionKey::B => "B",
            OptionKey::C => "C",
            OptionKey::D => "D",
        }
    }
}

impl fmt::Display for OptionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of the bank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionRecord {
    pub prompt: String,
    /// Option texts in source order, A through D.
    pub options: [String; 4],
    /// `None` when the key cell held something other than A-D. Such a
    /// question can never be answered correctly.
    pub correct_key: Option<OptionKey>,
}

#[derive(Debug, Clone, Default)]
pub struct QuestionBank {
    records: Vec<QuestionRecord>,
}

impl QuestionBank {
    pub fn load_from_path(path: &Path) -> Result<Self, LoadError> {
        log::info!("Loading question bank from: {}", path.display());
        let text = std::fs::read_to_string(path).map_err(|source| LoadError::Fetch {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text)
    }

    /// Parses a header line followed by comma separated rows. The first
    /// physical line is always the header, even when it is blank.
    ///
    /// Quotes carry no meaning while splitting: every `"` is dropped from a
    /// field after the split, so a field with an embedded comma shifts the
    /// columns and the row gets rejected. Rows with the wrong column count are
    /// skipped with a warning; blank lines are skipped silently.
    pub fn parse(text: &str) -> Result<Self, LoadError> {
        let body = text.split_once('\n').map_or("", |(_, rest)| rest);
        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .quoting(false)
            .trim(csv::Trim::All)
            .from_reader(body.as_bytes());

        let mut records = Vec::new();

        for (i, result) in reader.records().enumerate() {
            let row = match result {
                Ok(r) => r,
                Err(e) => {
                    log::warn!("Skipping unreadable row {}: {}", i + 2, e);
                    continue;
                }
            };
            // The header was cut off before parsing, so shift by one.
            let line = row.position().map_or(i as u64 + 2, |p| p.line() + 1);

            if row.len() == 1 && row[0].trim().is_empty() {
                continue;
            }

            if row.len() != FIELDS_PER_ROW {
                log::warn!(
                    "Line {} has {} fields instead of {}, skipped",
                    line,
                    row.len(),
                    FIELDS_PER_ROW
                );
                continue;
            }

            let field = |n: usize| clean_field(&row[n]);
            let key_cell = field(5);
            let correct_key = OptionKey::parse(&key_cell);
            if correct_key.is_none() {
                log::debug!("Line {} has unknown answer key {:?}", line, key_cell);
            }

            records.push(QuestionRecord {
                prompt: field(0),
                options: [field(1), field(2), field(3), field(4)],
                correct_key,
            });
        }

        if records.is_empty() {
            log::error!("Question source read, but no question survived parsing");
            return Err(LoadError::Empty);
        }

        log::info!("Loaded {} questions", records.len());
        Ok(Self { records })
    }

    pub fn records(&self) -> &[QuestionRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }
}

impl From<Vec<QuestionRecord>> for QuestionBank {
    fn from(records: Vec<QuestionRecord>) -> Self {
        Self { records }
    }
}

fn clean_field(raw: &str) -> String {
    raw.replace('"', "").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "question,a,b,c,d,answer";

    #[test]
    fn parses_quoted_rows_and_strips_quotes() {
        let text = format!("{HEADER}\n\"What is 2+2?\", \"3\" ,\"4\",\"5\",\"22\",\"B\"\n");
        let bank = QuestionBank::parse(&text).unwrap();
        assert_eq!(bank.len(), 1);
        let q = &bank.records()[0];
        assert_eq!(q.prompt, "What is 2+2?");
        assert_eq!(q.options, ["3", "4", "5", "22"].map(String::from));
        assert_eq!(q.correct_key, Some(OptionKey::B));
    }

    #[test]
    fn bank_size_counts_only_well_formed_rows() {
        let text = format!(
            "{HEADER}\nQ1,a,b,c,d,A\nbroken,row\nQ2,a,b,c,d,C\nQ3,a,b,c,d,e,f,A\nQ4,a,b,c,d,D\n"
        );
        let bank = QuestionBank::parse(&text).unwrap();
        let prompts: Vec<_> = bank.records().iter().map(|r| r.prompt.as_str()).collect();
        assert_eq!(prompts, ["Q1", "Q2", "Q4"]);
    }

    #[test]
    fn malformed_quoting_that_splits_into_five_fields_is_rejected() {
        let text = format!("{HEADER}\n\"Q1\",\"A\",\"B\",\"C\"\"D\",\"B\"\nQ2,a,b,c,d,A\n");
        let bank = QuestionBank::parse(&text).unwrap();
        assert_eq!(bank.len(), 1);
        assert!(bank.records().iter().all(|r| r.prompt != "Q1"));
    }

    #[test]
    fn blank_lines_and_crlf_are_tolerated() {
        let text = format!("{HEADER}\r\n\r\nQ1,a,b,c,d,A\r\n   \r\nQ2,a,b,c,d,B\r\n");
        let bank = QuestionBank::parse(&text).unwrap();
        assert_eq!(bank.len(), 2);
        assert_eq!(bank.records()[1].options[3], "d");
    }

    #[test]
    fn first_line_is_the_header_even_when_blank() {
        let bank = QuestionBank::parse("\nQ1,a,b,c,d,A\n").unwrap();
        assert_eq!(bank.len(), 1);
        assert_eq!(bank.records()[0].prompt, "Q1");

        let bank = QuestionBank::parse("   \r\nQ1,a,b,c,d,A\r\nQ2,a,b,c,d,B").unwrap();
        assert_eq!(bank.len(), 2);
    }

    #[test]
    fn a_question_on_the_first_line_is_treated_as_header() {
        let text = "Q0,a,b,c,d,A\nQ1,a,b,c,d,B\n";
        let bank = QuestionBank::parse(text).unwrap();
        let prompts: Vec<_> = bank.records().iter().map(|r| r.prompt.as_str()).collect();
        assert_eq!(prompts, ["Q1"]);
        assert!(matches!(QuestionBank::parse("Q0,a,b,c,d,A"), Err(LoadError::Empty)));
    }

    #[test]
    fn empty_sources_fail() {
        let all_malformed = format!("{HEADER}\nonly,five,fields,in,row\n\n");
        for text in ["", HEADER, all_malformed.as_str()] {
            assert!(
                matches!(QuestionBank::parse(text), Err(LoadError::Empty)),
                "expected failure for {text:?}"
            );
        }
    }

    #[test]
    fn unknown_answer_key_is_kept_unanswerable() {
        let text = format!("{HEADER}\nQ1,a,b,c,d,E\nQ2,a,b,c,d,b\n");
        let bank = QuestionBank::parse(&text).unwrap();
        assert_eq!(bank.len(), 2);
        assert!(bank.records().iter().all(|r| r.correct_key.is_none()));
    }

    #[test]
    fn missing_file_is_a_fetch_error() {
        let path = std::env::temp_dir().join("quiz_canvas_definitely_missing.csv");
        let err = QuestionBank::load_from_path(&path).unwrap_err();
        assert!(matches!(err, LoadError::Fetch { .. }));
    }

    #[test]
    fn loads_from_disk() {
        let path = std::env::temp_dir().join(format!("quiz_canvas_bank_{}.csv", std::process::id()));
        std::fs::write(&path, format!("{HEADER}\nQ1,a,b,c,d,A\n")).unwrap();
        let bank = QuestionBank::load_from_path(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(bank.len(), 1);
    }

    #[test]
    fn option_keys_parse_their_own_labels() {
        for (i, key) in OptionKey::ALL.into_iter().enumerate() {
            assert_eq!(key.index(), i);
            assert_eq!(OptionKey::parse(key.as_str()), Some(key));
            assert_eq!(OptionKey::parse(&format!(" {key} ")), Some(key));
        }
        assert_eq!(OptionKey::parse("a"), None);
        assert_eq!(OptionKey::parse("AB"), None);
    }
}
