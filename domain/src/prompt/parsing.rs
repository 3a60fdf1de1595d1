//! Reply parsing for rankings and judge rulings.
//!
//! Pure text handling: find the JSON object in a free-form model reply and
//! map the names in it onto the roster. Parsing never repairs a ranking;
//! omitted or duplicated names are passed through so that validation can
//! disqualify the vote.
//!
//! | Function | Expected JSON |
//! |----------|---------------|
//! | [`parse_ranking_response`] | `{"rankings": [...], "reasoning": "..."}` |
//! | [`parse_judge_response`] | `{"decision": "confirm"\|"override", "winner", "reasoning", "summary"}` |

use crate::arbitration::verdict::JudgeRuling;
use crate::core::participant::{ParticipantId, Roster};
use serde_json::Value;

/// Ranking extracted from a model reply
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedRanking {
    pub order: Vec<ParticipantId>,
    pub reasoning: String,
}

/// Locate the outermost `{ ... }` in `text` and parse it.
fn extract_json(text: &str) -> Option<Value> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end < start {
        return None;
    }
    serde_json::from_str(&text[start..=end]).ok()
}

/// Map a model-written name onto the roster, keeping unknown names verbatim.
fn resolve(name: &str, roster: &Roster) -> ParticipantId {
    roster
        .find_loosely(name)
        .cloned()
        .unwrap_or_else(|| ParticipantId::new(name))
}

/// Parse a voting reply.
///
/// Returns `None` when the reply has no JSON object with a `rankings` array.
///
/// # Examples
///
/// ```
/// use agora_domain::{Roster, parse_ranking_response};
///
/// let ballot = Roster::new(vec!["Optimist".into(), "Skeptic".into()]).unwrap();
/// let reply = r#"Here is my vote: {"rankings": ["skeptic", "Optimist"], "reasoning": "Sharper"}"#;
/// let parsed = parse_ranking_response(reply, &ballot).unwrap();
/// assert_eq!(parsed.order[0].as_str(), "Skeptic");
/// assert_eq!(parsed.reasoning, "Sharper");
///
/// assert!(parse_ranking_response("I refuse to vote", &ballot).is_none());
/// ```
pub fn parse_ranking_response(text: &str, ballot: &Roster) -> Option<ParsedRanking> {
    let json = extract_json(text)?;
    let rankings = json.get("rankings")?.as_array()?;

    let order = rankings
        .iter()
        .filter_map(|entry| match entry {
            Value::String(name) => Some(name.as_str()),
            Value::Object(obj) => obj
                .get("participant")
                .or_else(|| obj.get("name"))
                .and_then(Value::as_str),
            _ => None,
        })
        .map(|name| resolve(name, ballot))
        .collect();

    let reasoning = json
        .get("reasoning")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    Some(ParsedRanking { order, reasoning })
}

/// Parse a judge reply.
///
/// Without a JSON object the whole reply is taken as a confirming
/// commentary. An `override` decision carries the named winner as written
/// (loosely matched against the roster) and the given reasoning.
pub fn parse_judge_response(text: &str, roster: &Roster) -> JudgeRuling {
    let Some(json) = extract_json(text) else {
        let trimmed = text.trim();
        return if trimmed.is_empty() {
            JudgeRuling::confirm()
        } else {
            JudgeRuling::confirm_with(trimmed)
        };
    };

    let field = |key: &str| {
        json.get(key)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
    };

    let decision = field("decision").unwrap_or("confirm").to_lowercase();
    let reasoning = field("reasoning");
    let summary = field("summary");

    if decision == "override"
        && let Some(winner) = field("winner")
    {
        return JudgeRuling::override_with(
            resolve(winner, roster),
            reasoning.unwrap_or_default(),
        );
    }

    let commentary = match (summary, reasoning) {
        (Some(s), Some(r)) => Some(format!("{}\n\n{}", s, r)),
        (Some(s), None) => Some(s.to_string()),
        (None, Some(r)) => Some(r.to_string()),
        (None, None) => None,
    };
    JudgeRuling::Confirm { commentary }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ballot() -> Roster {
        Roster::new(vec!["Optimist".into(), "Skeptic".into(), "Critic".into()]).unwrap()
    }

    #[test]
    fn test_parse_ranking_with_surrounding_text() {
        let reply = "After consideration:\n```json\n{\"rankings\": [\"Critic\", \"optimist\", \"SKEPTIC\"], \"reasoning\": \"ok\"}\n```";
        let parsed = parse_ranking_response(reply, &ballot()).unwrap();
        let names: Vec<&str> = parsed.order.iter().map(|p| p.as_str()).collect();
        assert_eq!(names, vec!["Critic", "Optimist", "Skeptic"]);
    }

    #[test]
    fn test_parse_ranking_keeps_omissions_and_unknowns() {
        let reply = r#"{"rankings": ["Critic", "Nobody"]}"#;
        let parsed = parse_ranking_response(reply, &ballot()).unwrap();
        assert_eq!(parsed.order.len(), 2);
        assert_eq!(parsed.order[1].as_str(), "Nobody");
        assert!(parsed.reasoning.is_empty());
    }

    #[test]
    fn test_parse_ranking_object_entries() {
        let reply = r#"{"rankings": [{"name": "Skeptic"}, {"participant": "Critic"}, "Optimist"]}"#;
        let parsed = parse_ranking_response(reply, &ballot()).unwrap();
        assert_eq!(parsed.order[0].as_str(), "Skeptic");
        assert_eq!(parsed.order[1].as_str(), "Critic");
    }

    #[test]
    fn test_parse_ranking_without_json() {
        assert!(parse_ranking_response("Critic > Skeptic > Optimist", &ballot()).is_none());
        assert!(parse_ranking_response(r#"{"votes": []}"#, &ballot()).is_none());
    }

    #[test]
    fn test_parse_judge_confirm() {
        let reply = r#"{"decision": "confirm", "reasoning": "Scores reflect quality", "summary": "Adopt it"}"#;
        match parse_judge_response(reply, &ballot()) {
            JudgeRuling::Confirm { commentary } => {
                assert_eq!(commentary.as_deref(), Some("Adopt it\n\nScores reflect quality"));
            }
            other => panic!("unexpected ruling: {:?}", other),
        }
    }

    #[test]
    fn test_parse_judge_override() {
        let reply = r#"{"decision": "Override", "winner": "critic", "reasoning": "Risks ignored"}"#;
        assert_eq!(
            parse_judge_response(reply, &ballot()),
            JudgeRuling::override_with("Critic".into(), "Risks ignored")
        );
    }

    #[test]
    fn test_parse_judge_override_without_reasoning_is_passed_through() {
        let reply = r#"{"decision": "override", "winner": "Critic"}"#;
        assert_eq!(
            parse_judge_response(reply, &ballot()),
            JudgeRuling::override_with("Critic".into(), "")
        );
    }

    #[test]
    fn test_parse_judge_free_text() {
        assert_eq!(
            parse_judge_response("The optimist is right.", &ballot()),
            JudgeRuling::confirm_with("The optimist is right.")
        );
    }
}
