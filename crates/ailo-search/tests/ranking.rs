use ailo_core::{Document, DocumentStore, Intent, Metadata};
use ailo_search::{classify, score, select, Query, Ranker, Scorer};
use serde_json::json;

fn doc(id: &str, title: &str, text: &str, endpoint: &str) -> Document {
    Document::new(id, title, text, endpoint, Metadata::new())
}

fn ids<'a>(hits: &[ailo_search::ScoredDocument<'a>]) -> Vec<&'a str> {
    hits.iter().map(|h| h.document.id.as_str()).collect()
}

fn career_store() -> DocumentStore {
    let records = vec![
        json!({"id": "lonn-sykepleier", "title": "Lønn for sykepleier", "text": "Sykepleier har en gjennomsnittlig månedslønn som varierer med ansiennitet og sektor. Lønnen for sykepleier er høyere i privat sektor.", "source_endpoint": "sammenligning/lonn/uno/id-y/sykepleier"}),
        json!({"id": "yrke-lege", "title": "Lege", "text": "En lege undersøker pasienter, stiller diagnoser og gir behandling. Legen samarbeider med sykepleier og annet helsepersonell.", "source_endpoint": "yrker/beskrivelse/lege"}),
        json!({"id": "utd-lege", "title": "Medisin", "text": "Profesjonsstudiet i medisin tar seks år og gir grunnlag for autorisasjon som lege.", "source_endpoint": "utdanningsbeskrivelse/medisin"}),
        json!({"id": "skole-oslo", "title": "Videregående skoler i Oslo", "text": "Oversikt over skoler med helse- og oppvekstfag.", "source_endpoint": "skoler/vgs/oslo"}),
    ];
    let (store, report) = DocumentStore::load(records);
    assert_eq!(report.loaded, 4);
    store
}

#[test]
fn intent_follows_priority_order() {
    assert_eq!(classify("Hvor mye tjener en lærer?"), Intent::Salary);
    assert_eq!(classify("Hva koster det å studere til lege?"), Intent::Salary);
    assert_eq!(classify("Hvordan bli sykepleier?"), Intent::EducationPath);
    assert_eq!(classify("Hva gjør en elektriker?"), Intent::JobDuties);
    assert_eq!(classify("Forskjell på lege og sykepleier"), Intent::Comparison);
    assert_eq!(classify("Hva er en bachelorgrad?"), Intent::Definition);
    assert_eq!(classify("Hvilke skoler tilbyr IT?"), Intent::Location);
    assert_eq!(classify("Hvor lenge varer studiet?"), Intent::Duration);
    assert_eq!(classify("Fortell om fiske"), Intent::General);
    assert_eq!(classify(""), Intent::General);
}

#[test]
fn title_match_outweighs_capped_text_matches() {
    let titled = doc("a", "Sykepleier", "Et yrke i helsesektoren.", "yrker/helse");
    let mentions = doc("b", "Helsearbeid", &"sykepleier ".repeat(20), "yrker/helse");
    let query = Query::new("sykepleier", Intent::General);
    let scorer = Scorer::default();

    assert_eq!(scorer.score(&query, &titled), 10.0);
    let breakdown = scorer.breakdown(&query, &mentions);
    assert_eq!(breakdown.text, 5.0);
    assert_eq!(breakdown.quality, 2.0);
    assert_eq!(breakdown.total(), 7.0);

    let docs = vec![mentions, titled];
    assert_eq!(ids(&select("sykepleier", Intent::General, &docs, 5, 0.0)), vec!["a", "b"]);
}

#[test]
fn intent_alignment_bonus_crosses_over_small_lexical_gaps() {
    let question = "Hvor mye tjener en lærer?";
    let intent = classify(question);
    assert_eq!(intent, Intent::Salary);

    let aligned = doc("aligned", "Lønnsstatistikk", "Gjennomsnittlig månedslønn for yrket.", "sammenligning/lonn/uno/id-y/sykepleier");
    let seven = doc("seven", "Skoleliv", "lærer lærer lærer lærer tjener tjener tjener", "artikler/hverdag");
    let nine = doc("nine", "Skoleliv", "lærer lærer lærer lærer lærer tjener tjener tjener tjener", "artikler/hverdag");

    assert_eq!(score(question, intent, &aligned), 8.0);
    assert_eq!(score(question, intent, &seven), 7.0);
    assert_eq!(score(question, intent, &nine), 9.0);

    let docs = vec![seven, aligned, nine];
    assert_eq!(ids(&select(question, intent, &docs, 5, 0.0)), vec!["nine", "aligned", "seven"]);
}

#[test]
fn extra_occurrences_never_lower_the_score() {
    let scores: Vec<f32> = (1..=8).map(|k| score("lege", Intent::General, &doc("d", "Helse", &"lege ".repeat(k), "x"))).collect();
    assert!(scores.windows(2).all(|w| w[1] >= w[0]));
    assert_eq!(scores[1] - scores[0], 1.0);
    assert_eq!(scores[6] - scores[5], 0.0);

    // crossing the informativeness threshold only ever adds
    let short = score("lege", Intent::General, &doc("s", "Helse", &format!("lege {}", "x".repeat(91)), "x"));
    let long = score("lege", Intent::General, &doc("l", "Helse", &format!("lege lege {}", "x".repeat(91)), "x"));
    assert!(long > short);
}

#[test]
fn equal_scores_keep_store_order() {
    let docs: Vec<Document> = ["b", "a", "c"].iter().map(|id| doc(id, "Lege", "Om yrket.", "yrker/x")).collect();
    let hits = select("lege", Intent::General, &docs, 5, 0.0);
    assert_eq!(ids(&hits), vec!["b", "a", "c"]);
    assert!(hits.iter().all(|h| h.score == 10.0));
}

#[test]
fn unrelated_documents_score_zero_and_are_excluded() {
    let long = doc("long", "Fiske", &"Kysttorsk og makrell langs kysten. ".repeat(10), "artikler/fiske");
    assert_eq!(score("sykepleier", Intent::General, &long), 0.0);
    let docs = vec![long];
    assert!(select("sykepleier", Intent::General, &docs, 5, 0.0).is_empty());
}

#[test]
fn unknown_topic_yields_empty_selection() {
    let store = career_store();
    let question = "Fremtidsutsikter for astronauter";
    let intent = classify(question);
    assert_eq!(intent, Intent::General);
    assert!(select(question, intent, store.documents(), 5, 0.0).is_empty());
}

#[test]
fn selection_is_deterministic() {
    let store = career_store();
    let question = "Hvor mye tjener en sykepleier?";
    let intent = classify(question);
    let run = || select(question, intent, store.documents(), 5, 0.0).iter().map(|h| (h.document.id.clone(), h.score)).collect::<Vec<_>>();
    let first = run();
    assert!(!first.is_empty());
    assert_eq!(first[0].0, "lonn-sykepleier");
    for _ in 0..5 { assert_eq!(run(), first); }
}

#[test]
fn top_n_and_min_score_bound_the_result() {
    let store = career_store();
    let hits = select("lege", Intent::General, store.documents(), 1, 0.0);
    assert_eq!(ids(&hits), vec!["yrke-lege"]);

    let all = select("lege", Intent::General, store.documents(), 10, 0.0);
    assert_eq!(all.len(), 2);
    assert!(all.windows(2).all(|w| w[0].score >= w[1].score));

    let strict = Ranker::new(Scorer::default(), 10, 10.0).select("lege", Intent::General, store.documents());
    assert_eq!(ids(&strict), vec!["yrke-lege"]);
    assert!(select("lege", Intent::General, store.documents(), 0, 0.0).is_empty());
}
