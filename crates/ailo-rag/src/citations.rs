use serde::Serialize;
use tracing::{info, warn};

/// Case-insensitive marker every grounded answer is expected to carry.
pub const CITATION_MARKER: &str = "kilde:";

/// Contexts shorter than this are too thin to demand citations for.
pub const MIN_CONTEXT_CHARS: usize = 100;

pub const MISSING_CITATION_NOTE: &str = "\n\n⚠️ Merk: All informasjon i dette svaret er basert på data fra utdanning.no. \
Jeg burde ha oppgitt spesifikke kilder for hver påstand.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CitationCheck {
    pub answer: String,
    pub citations: usize,
    pub note_added: bool,
}

pub fn count_citations(answer: &str) -> usize { answer.to_lowercase().matches(CITATION_MARKER).count() }

/// Append [`MISSING_CITATION_NOTE`] when an answer built on a real context cites nothing.
pub fn check_citations(answer: String, context_chars: usize) -> CitationCheck {
    let citations = count_citations(&answer);
    info!(citations, "citations in answer");
    if citations == 0 && context_chars > MIN_CONTEXT_CHARS {
        warn!("answer is missing source citations");
        return CitationCheck { answer: answer + MISSING_CITATION_NOTE, citations, note_added: true };
    }
    CitationCheck { answer, citations, note_added: false }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_any_case() {
        assert_eq!(count_citations("Lønn (Kilde: a). Ledighet (kilde: b). KILDE: c"), 3);
        assert_eq!(count_citations("Ingen kilder her"), 0);
    }

    #[test]
    fn note_only_for_uncited_answers_with_context() {
        let cited = check_citations("Svar (Kilde: https://utdanning.no)".into(), 500);
        assert!(!cited.note_added);
        assert_eq!(cited.citations, 1);

        let uncited = check_citations("Svar uten kilde".into(), 500);
        assert!(uncited.note_added);
        assert!(uncited.answer.starts_with("Svar uten kilde"));
        assert!(uncited.answer.ends_with(MISSING_CITATION_NOTE));

        assert!(!check_citations("Svar".into(), 50).note_added);
    }
}
