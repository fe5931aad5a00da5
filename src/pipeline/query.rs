/// Max claim characters carried into a search query.
pub const QUERY_CLAIM_CHARS: usize = 200;

const CURRENT_EVENTS_WORDS: &[&str] = &["president", "prime minister", "pm", "leader", "current", "elected"];
const CONSPIRACY_WORDS: &[&str] = &["vaccine", "autism", "flat", "5g", "covid", "hoax"];

/// Shapes the web query by claim type: current events get the date context,
/// conspiracy-flavoured claims go looking for fact-checks.
pub fn plan_search_query(claim: &str, date_context: &str) -> String {
    let claim: String = claim.trim().chars().take(QUERY_CLAIM_CHARS).collect();
    let lower = claim.to_lowercase();
    if mentions_any(&lower, CURRENT_EVENTS_WORDS) {
        format!("{claim} {date_context} current")
    } else if mentions_any(&lower, CONSPIRACY_WORDS) {
        format!("fact check debunk: {claim}")
    } else {
        format!("verify: {claim}")
    }
}

/// Keywords of two characters or fewer must stand alone ("pm" should not fire
/// on "development"); longer ones match as substrings.
fn mentions_any(lower: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|kw| {
        if kw.len() <= 2 {
            lower
                .split(|c: char| !c.is_alphanumeric())
                .any(|word| word == *kw)
        } else {
            lower.contains(kw)
        }
    })
}
