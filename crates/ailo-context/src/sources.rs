//! Citable references for documents.
//!
//! Resolution order, first match wins:
//! 1. a metadata value under a key containing `url` (keys in sorted order)
//! 2. endpoint rules that rebuild a page URL from identifiers in the endpoint
//! 3. the top-level site section the endpoint belongs to
//! 4. the bare site origin
//!
//! [`SourceResolver::resolve`] therefore never returns an empty string.

use ailo_core::config::SourceSettings;
use ailo_core::{Document, Metadata};

const COMPARISON_ID_MARKER: &str = "/uno/id-";
const DESCRIPTION_MARKER: &str = "beskrivelse/";

type EndpointRule = fn(&str, &str) -> Option<String>;

/// Page-level rules, applied to the endpoint with any `param/` prefix removed.
const ENDPOINT_RULES: &[(&str, EndpointRule)] = &[("comparison", comparison_page), ("occupation", occupation_page)];

/// Endpoint marker → site section, in priority order.
const SECTIONS: &[(&[&str], &str)] = &[
	(&["sammenligning"], "sammenligning"),
	(&["yrke", "onet"], "yrker"),
	(&["utdanning", "studievelgeren"], "utdanning"),
	(&["finnlarebedrift", "larebedrift", "lærebedrift"], "nb/finn-larebedrift"),
	(&["veientilfagbrev"], "nb/vei-til-fagbrev"),
	(&["arbeidsmarked", "jobbkompasset"], "arbeidsmarked"),
	(&["regionalkompetanse"], "regionalkompetanse"),
	(&["search", "søk"], "sok"),
];

#[derive(Debug, Clone)]
pub struct SourceResolver {
	origin: String,
	api_origin: String,
}

impl Default for SourceResolver {
	fn default() -> Self { Self::new(&SourceSettings::default()) }
}

impl SourceResolver {
	pub fn new(settings: &SourceSettings) -> Self {
		Self {
			origin: settings.site_origin.trim_end_matches('/').to_string(),
			api_origin: settings.api_origin.trim_end_matches('/').to_string(),
		}
	}

	pub fn origin(&self) -> &str { &self.origin }

	/// Web page a document should be cited with.
	pub fn resolve(&self, doc: &Document) -> String {
		self.from_metadata(&doc.metadata)
			.or_else(|| self.from_endpoint(&doc.source_endpoint))
			.or_else(|| self.from_section(&doc.source_endpoint))
			.unwrap_or_else(|| self.origin.clone())
	}

	/// API query the document's data came from, e.g. `api.utdanning.no/sammenligning/lonn`.
	pub fn api_reference(&self, doc: &Document) -> String {
		let endpoint = doc.source_endpoint.trim_matches('/');
		if endpoint.is_empty() { self.api_origin.clone() } else { format!("{}/{}", self.api_origin, endpoint) }
	}

	fn from_metadata(&self, metadata: &Metadata) -> Option<String> {
		metadata
			.iter()
			.filter(|(key, _)| key.to_lowercase().contains("url"))
			.filter_map(|(_, value)| value.as_str())
			.find_map(|value| {
				if value.starts_with('/') { Some(format!("{}{}", self.origin, value)) }
				else if value.starts_with("http") { Some(value.to_string()) }
				else { None }
			})
	}

	fn from_endpoint(&self, endpoint: &str) -> Option<String> {
		let endpoint = strip_params(endpoint);
		ENDPOINT_RULES.iter().find_map(|(_, rule)| rule(&endpoint, &self.origin))
	}

	fn from_section(&self, endpoint: &str) -> Option<String> {
		let lower = strip_params(endpoint).to_lowercase();
		SECTIONS
			.iter()
			.find(|(markers, _)| markers.iter().any(|m| lower.contains(m)))
			.map(|(_, section)| format!("{}/{}", self.origin, section))
	}
}

fn strip_params(endpoint: &str) -> String {
	endpoint.replace("param/", "").trim_matches('/').to_string()
}

/// `sammenligning/lonn/uno/id-y/sykepleier` → `{origin}/sammenligning/y/sykepleier`
fn comparison_page(endpoint: &str, origin: &str) -> Option<String> {
	if !endpoint.to_lowercase().contains("sammenligning") { return None; }
	let (_, ids) = endpoint.split_once(COMPARISON_ID_MARKER)?;
	let mut segments = ids.split('/').filter(|s| !s.is_empty());
	let (kind, name) = (segments.next()?, segments.next()?);
	Some(format!("{origin}/sammenligning/{kind}/{name}"))
}

/// `yrker/beskrivelse/lege` → `{origin}/yrker/beskrivelse/lege`
fn occupation_page(endpoint: &str, origin: &str) -> Option<String> {
	let lower = endpoint.to_lowercase();
	if !lower.contains("yrke") { return None; }
	let (_, name) = lower.split_once(DESCRIPTION_MARKER)?;
	if name.split('/').next().map_or(true, str::is_empty) { return None; }
	Some(format!("{origin}/{}", endpoint.replace("//", "/")))
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn comparison_needs_two_segments() {
		assert_eq!(comparison_page("sammenligning/lonn/uno/id-y/sykepleier", "o").as_deref(), Some("o/sammenligning/y/sykepleier"));
		assert_eq!(comparison_page("sammenligning/lonn/uno/id-y", "o"), None);
		assert_eq!(comparison_page("yrker/uno/id-y/lege", "o"), None);
	}

	#[test]
	fn occupation_needs_a_name() {
		assert_eq!(occupation_page("yrker/beskrivelse/lege", "o").as_deref(), Some("o/yrker/beskrivelse/lege"));
		assert_eq!(occupation_page("yrker/beskrivelse/", "o"), None);
		assert_eq!(occupation_page("utdanning/beskrivelse/medisin", "o"), None);
	}

	#[test]
	fn params_prefix_is_removed() {
		assert_eq!(strip_params("param/sammenligning/lonn/"), "sammenligning/lonn");
	}
}
