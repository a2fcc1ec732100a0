//! Trigger-phrase matching over recognized transcripts
//!
//! Matching is deliberately loose: lowercase substring containment with
//! first-match-wins, no ranking. The debounce window downstream bounds the
//! cost of an accidental match.

/// Case-insensitive substring matcher over a configured phrase set.
#[derive(Debug, Clone)]
pub struct PhraseSet {
    phrases: Vec<String>,
}

impl PhraseSet {
    /// Phrases are normalized to lowercase; blank entries are dropped.
    pub fn new<I, S>(phrases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            phrases: phrases
                .into_iter()
                .map(|phrase| phrase.as_ref().trim().to_lowercase())
                .filter(|phrase| !phrase.is_empty())
                .collect(),
        }
    }

    /// First configured phrase contained in the transcript, if any.
    pub fn matches(&self, transcript: &str) -> Option<&str> {
        let transcript = transcript.to_lowercase();
        self.phrases
            .iter()
            .find(|phrase| transcript.contains(phrase.as_str()))
            .map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.phrases.is_empty()
    }
}
