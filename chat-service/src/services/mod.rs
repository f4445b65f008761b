pub mod chat;
pub mod generator;
pub mod metrics;
pub mod providers;
pub mod rules;
pub mod translation;

pub use chat::{append_disclaimer, ChatOrchestrator, DEFAULT_REPLY, DISCLAIMER};
pub use generator::GenerativeFallback;
pub use rules::RuleMatcher;
pub use translation::{DisabledTranslator, GoogleTranslator, Translator};
