//! Trigger word matching.

use regex::Regex;
use tempo_core::error::TempoError;

/// Compiled whole-word, case-insensitive matcher for the trigger keyword.
///
/// Word boundaries are Unicode-aware, so a Cyrillic trigger inside a longer
/// word (e.g. "Рома" vs "программа") does not fire.
pub(super) struct TriggerWord {
    word: String,
    re: Regex,
}

impl TriggerWord {
    pub(super) fn new(word: &str) -> Result<Self, TempoError> {
        let word = word.trim();
        if word.is_empty() {
            return Err(TempoError::Config("trigger word is empty".into()));
        }
        let pattern = format!(r"(?i)\b{}\b", regex::escape(word));
        let re = Regex::new(&pattern)
            .map_err(|e| TempoError::Config(format!("invalid trigger word '{word}': {e}")))?;
        Ok(Self {
            word: word.to_string(),
            re,
        })
    }

    pub(super) fn word(&self) -> &str {
        &self.word
    }

    /// Whether the text contains the trigger as a whole word.
    pub(super) fn matches(&self, text: &str) -> bool {
        self.re.is_match(text)
    }
}

#[cfg(test)]
mod tests {
    use super::TriggerWord;

    #[test]
    fn test_whole_word_match() {
        let trigger = TriggerWord::new("Рома").unwrap();
        assert!(trigger.matches("Рома, поставь таймер на минуту"));
        assert!(trigger.matches("эй рома, 30 секунд"));
        assert!(trigger.matches("таймер, Рома!"));
    }

    #[test]
    fn test_substring_does_not_match() {
        let trigger = TriggerWord::new("Рома").unwrap();
        assert!(!trigger.matches("программа"));
        assert!(!trigger.matches("Романов запустил таймер"));
    }

    #[test]
    fn test_latin_trigger() {
        let trigger = TriggerWord::new("Roma").unwrap();
        assert!(trigger.matches("hey ROMA set a timer"));
        assert!(!trigger.matches("Romania is nice"));
    }

    #[test]
    fn test_no_trigger_no_match() {
        let trigger = TriggerWord::new("Рома").unwrap();
        assert!(!trigger.matches("поставь таймер на минуту"));
        assert!(!trigger.matches(""));
    }

    #[test]
    fn test_regex_metacharacters_are_escaped() {
        let trigger = TriggerWord::new("r.m").unwrap();
        assert!(trigger.matches("ping r.m please"));
        // An unescaped '.' would match any character here.
        assert!(!trigger.matches("ping ram please"));
    }

    #[test]
    fn test_empty_word_rejected() {
        assert!(TriggerWord::new("   ").is_err());
    }
}
