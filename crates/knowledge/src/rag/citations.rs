//! Source attribution for generated answers.

const REFERENCED_FOOTER: &str = "\n\n📚 *Referenced from knowledge base*";

/// Append a citation footer when context was used.
///
/// If the text already names any used source (case-insensitive), a generic
/// note is added. Otherwise the distinct sources are listed in first-seen
/// order. No sources leaves the text untouched.
pub fn attach_citations(mut response: String, sources: &[String]) -> String {
    if sources.is_empty() {
        return response;
    }

    if mentions_any_source(&response, sources) {
        response.push_str(REFERENCED_FOOTER);
        return response;
    }

    let unique = distinct_sources(sources);
    if let [only] = unique.as_slice() {
        response.push_str(&format!("\n\n📚 *Source: {}*", only));
    } else {
        response.push_str(&format!("\n\n📚 *Sources: {}*", unique.join(", ")));
    }
    response
}

/// Whether `text` contains any of `sources`, ignoring case.
pub fn mentions_any_source(text: &str, sources: &[String]) -> bool {
    let text = text.to_lowercase();
    sources
        .iter()
        .any(|source| text.contains(&source.to_lowercase()))
}

fn distinct_sources(sources: &[String]) -> Vec<&str> {
    let mut unique: Vec<&str> = Vec::with_capacity(sources.len());
    for source in sources {
        if !unique.contains(&source.as_str()) {
            unique.push(source);
        }
    }
    unique
}
