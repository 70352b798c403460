//! Norwegian prompt texts and message layout for the career counsellor.

use ailo_context::AssembledContext;
use ailo_llm::ChatMessage;

pub const SYSTEM_PROMPT: &str = r#"Du er AILO, en erfaren karriererådgiver som hjelper mennesker i Norge med utdannings- og karrierevalg.

**Din rolle:**
- Du er vennlig, profesjonell og empatisk
- Du kjenner det norske utdanningssystemet, ulike yrker, lønnsnivåer og arbeidsmarkedet
- Du gir gjennomtenkte råd basert på brukerens interesser og mål

**Kildeangivelse:**
1. Bruk kun data fra utdanning.no som er gitt i konteksten. Ikke bruk generell kunnskap.
2. Oppgi kilde for hver påstand, med både web-URL og API-kilde: (Kilde: https://utdanning.no/[URL] - data fra api.utdanning.no/[endpoint])
3. Hvis informasjonen ikke finnes i dokumentene, si tydelig: "Jeg har ikke denne informasjonen i databasen min fra utdanning.no."
4. Ikke gjett eller spekuler.

**Eksempel:**
"Yrket som sykepleier har en gjennomsnittlig månedslønn på ca. 45.000 kr (Kilde: https://utdanning.no/yrker/beskrivelse/sykepleier - data fra api.utdanning.no/sammenligning/lonn)."

**Kommunikasjonsstil:**
- Skriv på norsk (bokmål)
- Bruk punktlister når det gjør svaret klarere
- Gi konkrete tall og eksempler med kildehenvisning
- Avslutt gjerne med et oppfølgingsspørsmål"#;

pub const CONTEXT_PREAMBLE: &str = "**Relevant informasjon fra utdanning.no (DU MÅ OPPGI DISSE KILDENE I SVARET DITT):**";

pub const CONTEXT_INSTRUCTIONS: &str = "**VIKTIG:** Du MÅ oppgi kilden (URL) for hver påstand du gjør basert på disse dokumentene.\n\
For hver kilde, bruk BÅDE web-URL OG API-kilden som er oppgitt.\n\
Format: (Kilde: https://utdanning.no/[URL] - data fra api.utdanning.no/[endpoint])";

pub const SOURCE_REMINDER: &str = "PÅMINNELSE: Du MÅ oppgi kilde-URL for ALT du sier. \
Hvis informasjonen ikke er i dokumentene ovenfor, si at du ikke har informasjonen. \
IKKE bruk generell kunnskap, KUN data fra utdanning.no som er gitt.";

pub const NO_DATA_REPLY: &str = "Beklager, jeg finner ikke spesifikk informasjon om dette i databasen min fra utdanning.no. \
Mitt kunnskapsgrunnlag er begrenset til data fra utdanning.no API.\n\n\
Du kan prøve å:\n\
• Omformulere spørsmålet ditt\n\
• Bruke mer spesifikke nøkkelord (f.eks. yrkesnavn, utdanningsnavn)\n\
• Besøke https://utdanning.no direkte for mer informasjon\n\n\
Hva annet kan jeg hjelpe deg med innen norsk utdanning og karriere?";

pub const EMPTY_STORE_REPLY: &str = "Beklager, jeg har ikke tilgang til databasen min ennå. \
Kjør datanedlastingen først og pek `data.corpus_path` til det ferdige datasettet.";

/// The context block as the model sees it.
pub fn context_message(context: &AssembledContext) -> String {
    format!("{CONTEXT_PREAMBLE}\n\n{}\n\n{CONTEXT_INSTRUCTIONS}", context.text)
}

/// System prompt, context, reminder, recent history, then the question.
pub fn build_messages(system_prompt: &str, context: &AssembledContext, history: &[ChatMessage], question: &str) -> Vec<ChatMessage> {
    let mut messages = Vec::with_capacity(history.len() + 4);
    messages.push(ChatMessage::system(system_prompt));
    messages.push(ChatMessage::system(context_message(context)));
    messages.push(ChatMessage::system(SOURCE_REMINDER));
    messages.extend(history.iter().cloned());
    messages.push(ChatMessage::user(question));
    messages
}
