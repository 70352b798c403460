//! Domain types shared by the search, context and chat crates.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

pub type DocId = String;

/// Auxiliary metadata value carried next to a document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetaValue {
    Text(String),
    Number(serde_json::Number),
}

impl MetaValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            MetaValue::Text(s) => Some(s),
            MetaValue::Number(_) => None,
        }
    }
}

/// Open key/value mapping. Keys iterate in sorted order, which is the order
/// URL lookups scan them in.
pub type Metadata = BTreeMap<String, MetaValue>;

/// Coarse bucket derived from a document's source endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Salary,
    Comparison,
    LaborMarket,
    Apprenticeship,
    Occupation,
    Education,
    School,
    Other,
}

const CATEGORY_MARKERS: &[(&[&str], Category)] = &[
    (&["lonn", "lønn"], Category::Salary),
    (&["sammenligning"], Category::Comparison),
    (&["arbeidsmarked", "jobbkompasset", "regionalkompetanse"], Category::LaborMarket),
    (&["finnlarebedrift", "larebedrift", "lærebedrift", "veientilfagbrev"], Category::Apprenticeship),
    (&["yrke", "onet"], Category::Occupation),
    (&["utdanning", "studievelgeren", "studie"], Category::Education),
    (&["skole", "vgs", "videregaende", "videregående"], Category::School),
];

impl Category {
    pub const ALL: [Category; 8] = [
        Category::Salary,
        Category::Comparison,
        Category::LaborMarket,
        Category::Apprenticeship,
        Category::Occupation,
        Category::Education,
        Category::School,
        Category::Other,
    ];

    /// First matching marker wins; unmatched endpoints land in `Other`.
    pub fn from_endpoint(endpoint: &str) -> Self {
        let endpoint = endpoint.to_lowercase();
        CATEGORY_MARKERS
            .iter()
            .find(|(markers, _)| markers.iter().any(|m| endpoint.contains(m)))
            .map_or(Category::Other, |(_, category)| *category)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Salary => "salary",
            Category::Comparison => "comparison",
            Category::LaborMarket => "labor_market",
            Category::Apprenticeship => "apprenticeship",
            Category::Occupation => "occupation",
            Category::Education => "education",
            Category::School => "school",
            Category::Other => "other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Question-type tag guiding the scorer's alignment bonus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    Salary,
    EducationPath,
    JobDuties,
    Comparison,
    Definition,
    Location,
    Duration,
    General,
}

impl Intent {
    pub fn as_str(self) -> &'static str {
        match self {
            Intent::Salary => "salary",
            Intent::EducationPath => "education_path",
            Intent::JobDuties => "job_duties",
            Intent::Comparison => "comparison",
            Intent::Definition => "definition",
            Intent::Location => "location",
            Intent::Duration => "duration",
            Intent::General => "general",
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lower-cased copies of the matchable fields, computed once at load.
#[derive(Debug, Clone, Default)]
pub struct Folded {
    pub title: String,
    pub text: String,
    pub endpoint: String,
    pub text_chars: usize,
}

/// A normalized corpus document.
///
/// - `id`: unique within a store, stable for the process lifetime
/// - `source_endpoint`: slash-delimited API query that produced the record,
///   e.g. `sammenligning/lonn/uno/id-y/sykepleier`
/// - `category`: derived from `source_endpoint`, never changed afterwards
#[derive(Debug, Clone, Serialize)]
pub struct Document {
    pub id: DocId,
    pub title: String,
    pub text: String,
    pub source_endpoint: String,
    pub category: Category,
    pub metadata: Metadata,
    #[serde(skip)]
    folded: Folded,
}

impl Document {
    pub fn new(
        id: impl Into<DocId>,
        title: impl Into<String>,
        text: impl Into<String>,
        source_endpoint: impl Into<String>,
        metadata: Metadata,
    ) -> Self {
        let (id, title, text, source_endpoint) = (id.into(), title.into(), text.into(), source_endpoint.into());
        let folded = Folded {
            title: title.to_lowercase(),
            text: text.to_lowercase(),
            endpoint: source_endpoint.to_lowercase(),
            text_chars: text.chars().count(),
        };
        let category = Category::from_endpoint(&source_endpoint);
        Self { id, title, text, source_endpoint, category, metadata, folded }
    }

    pub fn folded(&self) -> &Folded {
        &self.folded
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_follows_marker_order() {
        assert_eq!(Category::from_endpoint("sammenligning/lonn/uno/id-y/sykepleier"), Category::Salary);
        assert_eq!(Category::from_endpoint("sammenligning/arbeidsmarked"), Category::Comparison);
        assert_eq!(Category::from_endpoint("yrker/beskrivelse/lege"), Category::Occupation);
        assert_eq!(Category::from_endpoint("studievelgeren/studier"), Category::Education);
        assert_eq!(Category::from_endpoint("legacy-lopet/sted"), Category::Other);
    }

    #[test]
    fn document_folds_fields() {
        let doc = Document::new("1", "Sykepleier", "Pleie og OMSORG", "Yrker/Beskrivelse", Metadata::new());
        assert_eq!(doc.folded().title, "sykepleier");
        assert_eq!(doc.folded().text, "pleie og omsorg");
        assert_eq!(doc.folded().endpoint, "yrker/beskrivelse");
        assert_eq!(doc.folded().text_chars, 15);
        assert_eq!(doc.category, Category::Occupation);
    }
}
