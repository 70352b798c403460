/// Terms shorter than this are dropped unless listed in [`SHORT_TERMS`].
pub const MIN_TERM_CHARS: usize = 3;

pub const STOP_WORDS: &[&str] = &[
	"hva","er","det","som","en","et","ei","til","for","på","i","med","av","om","å","kan","må","skal","vil","ville","blir","bli","har","hvor","når","hvordan","hvem","hvilken","hvilke","hvilket","man","jeg","du","meg","deg","og","eller","den","de","seg","sin","mye","mange","noen","ikke","være","fra","ved","hos","enn","så","da","nå","litt","får","the","and","what","how",
];

/// Short words that carry meaning in this domain.
pub const SHORT_TERMS: &[&str] = &["år", "it"];

/// Lower-case, fold punctuation to spaces and collapse whitespace.
/// Hyphens and slashes survive so identifiers like `id-y` stay whole.
pub fn normalize(text: &str) -> String {
	let folded: String = text
		.to_lowercase()
		.chars()
		.map(|c| if c.is_alphanumeric() || c == '-' || c == '/' { c } else { ' ' })
		.collect();
	folded.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Query terms used for lexical matching, in first-occurrence order.
///
/// Stop words and short words are removed; if nothing survives, every word of
/// the question is used instead.
pub fn extract_key_terms(question: &str) -> Vec<String> {
	let normalized = normalize(question);
	let words: Vec<&str> = normalized.split_whitespace().collect();
	let keep = |w: &&str| !STOP_WORDS.contains(w) && (w.chars().count() >= MIN_TERM_CHARS || SHORT_TERMS.contains(w));
	let mut terms = dedup(words.iter().copied().filter(keep));
	if terms.is_empty() { terms = dedup(words.iter().copied()); }
	terms
}

fn dedup<'a>(words: impl Iterator<Item = &'a str>) -> Vec<String> {
	let mut out: Vec<String> = Vec::new();
	for w in words { if !out.iter().any(|t| t == w) { out.push(w.to_string()); } }
	out
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn normalize_folds_punctuation() {
		assert_eq!(normalize("  Hvor mye tjener en Lærer?! "), "hvor mye tjener en lærer");
		assert_eq!(normalize("sammenligning/uno/id-y"), "sammenligning/uno/id-y");
	}

	#[test]
	fn stop_words_and_short_words_are_removed() {
		assert_eq!(extract_key_terms("Hvor mye tjener en lærer?"), vec!["tjener", "lærer"]);
		assert_eq!(extract_key_terms("Hvor mange år tar det å bli lege"), vec!["år", "tar", "lege"]);
	}

	#[test]
	fn duplicates_keep_first_occurrence() {
		assert_eq!(extract_key_terms("lege lege sykepleier lege"), vec!["lege", "sykepleier"]);
	}

	#[test]
	fn empty_key_terms_fall_back_to_all_words() {
		assert_eq!(extract_key_terms("hva er det"), vec!["hva", "er", "det"]);
		assert!(extract_key_terms("   ?! ").is_empty());
	}
}
