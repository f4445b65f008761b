//! Static rule table for canned health-advice replies.
//!
//! Rules are evaluated in order and the first match wins. Emergency and
//! self-harm rules always run first; short open questions ("what is X?")
//! are then deferred to the generative backend before the topic rules get a
//! chance to answer them tersely.

use once_cell::sync::Lazy;
use regex::Regex;

static BUILTIN: Lazy<RuleMatcher> = Lazy::new(RuleMatcher::builtin);

static INTERROGATIVE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(?:what|who|where|when|why|how)\b").expect("valid regex"));

/// Maximum whitespace-separated tokens for a message to count as a short query.
const SHORT_QUERY_TOKENS: usize = 3;

pub const EMERGENCY_REPLY: &str = "⚠️ If someone has sudden chest pain, severe difficulty breathing, \
loss of consciousness, seizure or heavy bleeding — call emergency services immediately (e.g., 112). \
This is not a diagnosis. Seek urgent medical attention.";

pub const SELF_HARM_REPLY: &str = "If you are thinking about harming yourself, please seek help immediately. \
Contact local emergency services or a crisis hotline right now and tell someone you trust. \
You are not alone. If you are in India, dial 112, or contact a local crisis helpline.";

pub const GREETING_REPLY: &str =
    "👋 Hello! I can help with symptoms, vaccine info, and image checks. How can I assist you?";

const EMERGENCY_PHRASES: &[&str] = &[
    "chest pain",
    "difficulty breathing",
    "shortness of breath",
    "severe bleeding",
    "unconscious",
    "loss of consciousness",
    "sudden weakness",
    "sudden numbness",
    "slurred speech",
    "severe abdominal pain",
    "severe headache",
    "seizure",
    "fainting",
    "not breathing",
    "no pulse",
];

/// (category, pattern, reply) for the regex-driven rules after the
/// emergency phrase list, in priority order.
const SELF_HARM_RULE: (&str, &str, &str) = (
    "self_harm",
    r"\b(?:suicid\w*|kill myself|end my life|self[- ]harm\w*|hurting myself|harm myself)\b",
    SELF_HARM_REPLY,
);

const TOPIC_RULES: &[(&str, &str, &str)] = &[
    (
        "greeting",
        r"\b(?:hi|hello|hey|good morning|good afternoon|good evening|namaste)\b",
        GREETING_REPLY,
    ),
    (
        "fever",
        r"\b(?:feve?r\w*|temperature|febrile)\b",
        "Fever often indicates infection. Rest, keep hydrated, and measure temperature. \
If temperature is very high (>39°C), persistent, or the person is very unwell, seek medical care.",
    ),
    (
        "respiratory",
        r"\b(?:cough\w*|sore throat|hoarseness|shortness of breath|wheez\w*)\b",
        "Coughs have many causes (viral, bacterial, allergies). If cough lasts >2 weeks, \
is getting worse, or there's blood or severe breathlessness, see a clinician.",
    ),
    (
        "gastrointestinal",
        r"\b(?:diarrh\w*|vomit\w*|nausea|stomach pain|stomach ache)\b",
        "For vomiting/diarrhoea: stay hydrated (oral rehydration), rest, and seek care if symptoms \
are severe, include high fever, blood, or signs of dehydration.",
    ),
    (
        "rash",
        r"\b(?:rash\w*|skin rash|hives|itch\w*)\b",
        "Rashes can be due to infections, allergies or other causes. Keep the area clean, avoid \
irritants, and seek medical advice if it spreads rapidly or is accompanied by fever.",
    ),
    (
        "vaccination",
        r"\b(?:vaccin\w*|immuni[sz]\w*|schedule)\b",
        "Vaccination protects against many diseases. For children, follow your national \
immunization schedule — commonly including vaccines like BCG, DTP, Polio, Measles. For specific \
schedules in your country, check local health authority guidance or ask for details.",
    ),
    (
        "pregnancy",
        r"\b(?:pregnan\w*|deliver\w*|labou?r|contractions?)\b",
        "Pregnancy-related questions are important — please consult an obstetrician/midwife or \
your local health clinic for personalized care.",
    ),
    (
        "poisoning",
        r"\b(?:poison\w*|ingest\w*|swallowed)\b",
        "If someone swallowed a poisonous substance, call your local poison control number or \
emergency services immediately.",
    ),
    (
        "first_aid",
        r"\b(?:burn(?:s|ed)?|scald\w*|snake ?bites?|dog bites?|animal bites?|bitten|fractur\w*|broken bones?|sprain\w*)\b",
        "For burns, cool the area under clean running water for 20 minutes and cover loosely. \
For bites, wash the wound and keep the person still; a snake bite needs emergency care right \
away. For a suspected fracture, immobilise the limb and seek medical attention.",
    ),
    (
        "medication",
        r"\b(?:side effects?|allergic|reactions?|rash after|medication\w*)\b",
        "If you suspect a medication side-effect, stop the medication if severe and contact a \
healthcare professional or poison control for advice.",
    ),
    (
        "chronic_disease",
        r"\b(?:diabet\w*|blood sugar|insulin|hypertension|high blood pressure|blood pressure|asthma\w*|inhaler)\b",
        "Long-term conditions like diabetes, high blood pressure and asthma need regular check-ups. \
Take prescribed medicines as directed, monitor your readings, and see your doctor if readings stay \
out of range or symptoms get worse.",
    ),
    (
        "mental_health",
        r"\b(?:anxi\w*|depress\w*|stress\w*|panic|insomnia|can'?t sleep|lonely|loneliness)\b",
        "Feeling anxious, low or stressed is common and you deserve support. Talk to someone you \
trust, keep a regular sleep and activity routine, and reach out to a doctor or counsellor if these \
feelings last more than two weeks or affect daily life.",
    ),
    (
        "lifestyle",
        r"\b(?:diet\w*|nutrition|healthy eating|exercis\w*|workout|physical activity|weight loss|lose weight|drink water|hydrat\w*|smok\w*|alcohol)\b",
        "A balanced diet with vegetables, fruit and whole grains, at least 150 minutes of moderate \
activity a week, enough water, and avoiding tobacco and excess alcohol all lower the risk of many \
diseases.",
    ),
];

/// How a rule decides it applies to a normalised message.
#[derive(Debug)]
enum Trigger {
    /// Plain substring containment.
    Phrases(&'static [&'static str]),
    Pattern(Regex),
}

#[derive(Debug)]
pub struct Rule {
    category: &'static str,
    trigger: Trigger,
    reply: &'static str,
}

impl Rule {
    fn phrases(
        category: &'static str,
        phrases: &'static [&'static str],
        reply: &'static str,
    ) -> Self {
        Self {
            category,
            trigger: Trigger::Phrases(phrases),
            reply,
        }
    }

    fn pattern(
        category: &'static str,
        pattern: &str,
        reply: &'static str,
    ) -> Result<Self, regex::Error> {
        Ok(Self {
            category,
            trigger: Trigger::Pattern(Regex::new(pattern)?),
            reply,
        })
    }

    pub fn category(&self) -> &'static str {
        self.category
    }

    pub fn reply(&self) -> &'static str {
        self.reply
    }

    /// `text` must already be lowercased.
    fn matches(&self, text: &str) -> bool {
        match &self.trigger {
            Trigger::Phrases(phrases) => phrases.iter().any(|p| text.contains(p)),
            Trigger::Pattern(re) => re.is_match(text),
        }
    }
}

/// Ordered rule table.
#[derive(Debug)]
pub struct RuleMatcher {
    /// Safety rules; never deferred.
    priority: Vec<Rule>,
    topics: Vec<Rule>,
}

impl RuleMatcher {
    /// The process-wide table, compiled on first use.
    pub fn shared() -> &'static RuleMatcher {
        &BUILTIN
    }

    fn builtin() -> Self {
        Self::compile().expect("built-in rule patterns are valid regexes")
    }

    fn compile() -> Result<Self, regex::Error> {
        let (category, pattern, reply) = SELF_HARM_RULE;
        let priority = vec![
            Rule::phrases("emergency", EMERGENCY_PHRASES, EMERGENCY_REPLY),
            Rule::pattern(category, pattern, reply)?,
        ];

        let topics = TOPIC_RULES
            .iter()
            .map(|&(category, pattern, reply)| Rule::pattern(category, pattern, reply))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { priority, topics })
    }

    /// First matching rule for `text`, if any.
    pub fn find(&self, text: &str) -> Option<&Rule> {
        let normalized = text.to_lowercase();

        if let Some(rule) = self.priority.iter().find(|r| r.matches(&normalized)) {
            return Some(rule);
        }

        if is_short_question(&normalized) {
            return None;
        }

        self.topics.iter().find(|r| r.matches(&normalized))
    }

    /// Canned reply for `text`, or `None` to let the generative backend answer.
    pub fn match_reply(&self, text: &str) -> Option<&'static str> {
        self.find(text).map(Rule::reply)
    }

    pub fn len(&self) -> usize {
        self.priority.len() + self.topics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn is_short_question(normalized: &str) -> bool {
    normalized.split_whitespace().count() <= SHORT_QUERY_TOKENS
        && INTERROGATIVE.is_match(normalized)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn category(text: &str) -> Option<&'static str> {
        RuleMatcher::shared().find(text).map(Rule::category)
    }

    #[test]
    fn test_builtin_table_compiles() {
        let matcher = RuleMatcher::compile().unwrap();
        assert_eq!(matcher.len(), 2 + TOPIC_RULES.len());
    }

    #[test]
    fn test_emergency_phrases_win_over_everything() {
        for text in [
            "Hello, my father has CHEST PAIN",
            "hi, fever and difficulty breathing since morning",
            "she is unconscious after the vaccine",
            "what is a seizure",
        ] {
            assert_eq!(
                RuleMatcher::shared().match_reply(text),
                Some(EMERGENCY_REPLY),
                "{text}"
            );
        }
    }

    #[test]
    fn test_every_emergency_phrase_matches() {
        for phrase in EMERGENCY_PHRASES {
            assert_eq!(category(&format!("help: {phrase} now")), Some("emergency"));
        }
    }

    #[test]
    fn test_self_harm_precedes_greeting() {
        assert_eq!(category("hi, I want to kill myself"), Some("self_harm"));
        assert_eq!(category("I have suicidal thoughts"), Some("self_harm"));
        assert_eq!(category("thinking about self-harm"), Some("self_harm"));
    }

    #[test]
    fn test_greeting() {
        let reply = RuleMatcher::shared().match_reply("hello").unwrap();
        assert!(reply.starts_with("👋 Hello!"));
        assert_eq!(category("Good Morning doctor"), Some("greeting"));
        // "hi" must be a whole word
        assert_ne!(category("this thing"), Some("greeting"));
    }

    #[test]
    fn test_topic_categories() {
        let cases = [
            ("my child has a high fever since yesterday", "fever"),
            ("dry cough for three days now", "respiratory"),
            ("I keep wheezing at night", "respiratory"),
            ("diarrhea after eating street food", "gastrointestinal"),
            ("there is an itchy rash on my arm", "rash"),
            ("polio vaccine for my baby please", "vaccination"),
            ("I am pregnant and feel tired", "pregnancy"),
            ("my son swallowed some pills", "poisoning"),
            ("I burned my hand on the stove", "first_aid"),
            ("a snake bite on the leg", "first_aid"),
            ("side effects of this medication", "medication"),
            ("my blood sugar is 250 today", "chronic_disease"),
            ("I feel anxious all the time lately", "mental_health"),
            ("best diet to lose weight fast", "lifestyle"),
        ];

        for (text, expected) in cases {
            assert_eq!(category(text), Some(expected), "{text}");
        }
    }

    #[test]
    fn test_first_match_wins() {
        // fever precedes respiratory in the table
        assert_eq!(category("fever with a bad cough for days"), Some("fever"));
    }

    #[test]
    fn test_short_questions_are_deferred() {
        assert_eq!(category("What is malaria?"), None);
        assert_eq!(category("what is fever"), None);
        assert_eq!(category("how are you"), None);
    }

    #[test]
    fn test_short_questions_skip_greeting() {
        // deferral runs before the greeting rule
        assert_eq!(category("hi, how?"), None);
        assert_eq!(category("hello, what?"), None);
        assert_eq!(category("hi"), Some("greeting"));
    }

    #[test]
    fn test_short_questions_never_skip_safety_rules() {
        assert_eq!(category("why chest pain?"), Some("emergency"));
        assert_eq!(category("how suicide?"), Some("self_harm"));
    }

    #[test]
    fn test_longer_questions_still_match_topics() {
        assert_eq!(
            category("how do I bring down a fever at home"),
            Some("fever")
        );
    }

    #[test]
    fn test_no_match() {
        assert_eq!(RuleMatcher::shared().match_reply(""), None);
        assert_eq!(
            RuleMatcher::shared().match_reply("tell me about malaria in children"),
            None
        );
    }
}
