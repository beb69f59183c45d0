//! Supportive reply and journal suggestion selection.
//!
//! Every chat category and journal sentiment owns a non-empty [`ResponsePool`].
//! Completeness is checked when the catalog is built, so a lookup can never miss.

use rand::Rng;
use serde::Serialize;

use crate::context::ConversationContext;
use crate::sentiment::{ChatSentiment, JournalSentiment, Sentiment};
use crate::{Error, Result};

/// Pool key for the chat assistant after context has been taken into account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ChatCategory {
    Initial,
    Anxiety,
    Depression,
    Sleep,
    General(ChatSentiment),
}

impl ChatCategory {
    /// Topic context overrides sentiment; sentiment only matters for general conversation.
    pub fn resolve(sentiment: ChatSentiment, context: ConversationContext) -> Self {
        match context {
            ConversationContext::Initial => ChatCategory::Initial,
            ConversationContext::Anxiety => ChatCategory::Anxiety,
            ConversationContext::Depression => ChatCategory::Depression,
            ConversationContext::Sleep => ChatCategory::Sleep,
            ConversationContext::General => ChatCategory::General(sentiment),
        }
    }
}

/// Ordered, non-empty list of candidate texts.
#[derive(Debug, Clone)]
pub struct ResponsePool {
    entries: Vec<String>,
}

impl ResponsePool {
    pub fn new<I, S>(name: &str, entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let entries: Vec<String> = entries.into_iter().map(Into::into).collect();
        if entries.is_empty() || entries.iter().any(|e| e.trim().is_empty()) {
            return Err(Error::Config(format!(
                "Response pool '{}' must contain only non-empty entries and at least one",
                name
            )));
        }
        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn contains(&self, text: &str) -> bool {
        self.entries.iter().any(|e| e == text)
    }

    fn pick<R: Rng + ?Sized>(&self, rng: &mut R) -> &str {
        &self.entries[rng.gen_range(0..self.entries.len())]
    }
}

/// Pools used by the chat assistant.
#[derive(Debug, Clone)]
pub struct ChatPools {
    pub initial: ResponsePool,
    pub anxiety: ResponsePool,
    pub depression: ResponsePool,
    pub sleep: ResponsePool,
    pub positive: ResponsePool,
    pub negative: ResponsePool,
    pub neutral: ResponsePool,
}

/// Pools used for journal suggestions.
#[derive(Debug, Clone)]
pub struct JournalPools {
    pub positive: ResponsePool,
    pub negative: ResponsePool,
    pub neutral: ResponsePool,
    pub anxious: ResponsePool,
    pub depressed: ResponsePool,
}

/// Immutable set of response pools loaded at cold start.
#[derive(Debug, Clone)]
pub struct ResponseCatalog {
    chat: ChatPools,
    journal: JournalPools,
}

impl ResponseCatalog {
    pub fn new(chat: ChatPools, journal: JournalPools) -> Self {
        Self { chat, journal }
    }

    /// The built-in copy shipped with the functions.
    pub fn builtin() -> Result<Self> {
        let chat = ChatPools {
            initial: ResponsePool::new("chat.initial", CHAT_INITIAL)?,
            anxiety: ResponsePool::new("chat.anxiety", CHAT_ANXIETY)?,
            depression: ResponsePool::new("chat.depression", CHAT_DEPRESSION)?,
            sleep: ResponsePool::new("chat.sleep", CHAT_SLEEP)?,
            positive: ResponsePool::new("chat.general.positive", CHAT_POSITIVE)?,
            negative: ResponsePool::new("chat.general.negative", CHAT_NEGATIVE)?,
            neutral: ResponsePool::new("chat.general.neutral", CHAT_NEUTRAL)?,
        };
        let journal = JournalPools {
            positive: ResponsePool::new("journal.positive", JOURNAL_POSITIVE)?,
            negative: ResponsePool::new("journal.negative", JOURNAL_NEGATIVE)?,
            neutral: ResponsePool::new("journal.neutral", JOURNAL_NEUTRAL)?,
            anxious: ResponsePool::new("journal.anxious", JOURNAL_ANXIOUS)?,
            depressed: ResponsePool::new("journal.depressed", JOURNAL_DEPRESSED)?,
        };
        Ok(Self::new(chat, journal))
    }

    pub fn chat_pool(&self, category: ChatCategory) -> &ResponsePool {
        match category {
            ChatCategory::Initial => &self.chat.initial,
            ChatCategory::Anxiety => &self.chat.anxiety,
            ChatCategory::Depression => &self.chat.depression,
            ChatCategory::Sleep => &self.chat.sleep,
            ChatCategory::General(ChatSentiment::Positive) => &self.chat.positive,
            ChatCategory::General(ChatSentiment::Negative) => &self.chat.negative,
            ChatCategory::General(ChatSentiment::Neutral) => &self.chat.neutral,
        }
    }

    pub fn journal_pool(&self, sentiment: JournalSentiment) -> &ResponsePool {
        match sentiment {
            JournalSentiment::Positive => &self.journal.positive,
            JournalSentiment::Negative => &self.journal.negative,
            JournalSentiment::Neutral => &self.journal.neutral,
            JournalSentiment::Anxious => &self.journal.anxious,
            JournalSentiment::Depressed => &self.journal.depressed,
        }
    }

    /// Pool for a classified text. Journal selection ignores `context`.
    pub fn pool_for(&self, sentiment: Sentiment, context: ConversationContext) -> &ResponsePool {
        match sentiment {
            Sentiment::Chat(s) => self.chat_pool(ChatCategory::resolve(s, context)),
            Sentiment::Journal(s) => self.journal_pool(s),
        }
    }

    /// Pick a reply uniformly at random from the pool for `sentiment` and `context`.
    pub fn select_response(&self, sentiment: Sentiment, context: ConversationContext) -> &str {
        self.select_response_with(&mut rand::thread_rng(), sentiment, context)
    }

    pub fn select_response_with<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        sentiment: Sentiment,
        context: ConversationContext,
    ) -> &str {
        self.pool_for(sentiment, context).pick(rng)
    }

    pub fn chat_response(&self, sentiment: ChatSentiment, context: ConversationContext) -> &str {
        self.select_response(Sentiment::Chat(sentiment), context)
    }

    pub fn journal_suggestion(&self, sentiment: JournalSentiment) -> &str {
        self.select_response(Sentiment::Journal(sentiment), ConversationContext::General)
    }
}

const CHAT_INITIAL: [&str; 3] = [
    "Welcome! I'm here to support your mental wellbeing journey. How are you feeling today?",
    "Hi there! I'm your mental wellness assistant. What brings you here today?",
    "Hello! I'm here to chat about mental wellbeing. How can I support you today?",
];

const CHAT_ANXIETY: [&str; 3] = [
    "It sounds like you're feeling anxious. Let's try a quick grounding technique: name 5 things you can see, 4 things you can touch, 3 things you can hear, 2 things you can smell, and 1 thing you can taste.",
    "Deep breathing can help in moments of anxiety. Try breathing in for 4 counts, hold for 2, and exhale for 6. Would you like to try this together?",
    "Anxiety affects our mind and body. What physical sensations are you noticing right now? Sometimes being aware of them can help us manage them better.",
];

const CHAT_DEPRESSION: [&str; 3] = [
    "On difficult days, even small accomplishments matter. What's one small thing you did today that you can acknowledge?",
    "Depression can make everything feel overwhelming. Let's break things down into smaller, manageable steps. What's one tiny thing you could do for yourself today?",
    "Your feelings are valid, and you're not alone in experiencing them. Many people go through similar struggles with their mental health.",
];

const CHAT_SLEEP: [&str; 3] = [
    "Sleep troubles can significantly impact our mental wellbeing. Have you established a consistent bedtime routine?",
    "Some find that limiting screen time before bed and practicing gentle stretching helps improve sleep quality. Would these be options for you to try?",
    "If racing thoughts keep you awake, writing them down in a journal before bed might help clear your mind. It's like giving your thoughts a place to rest outside your head.",
];

const CHAT_POSITIVE: [&str; 3] = [
    "It's wonderful to hear you're feeling good! What specific things have been contributing to your positive mood?",
    "Those moments of positivity are worth celebrating. How might you extend this good feeling into other areas of your life?",
    "I'm glad things are going well. Building on positive experiences can help strengthen our resilience for more challenging times.",
];

const CHAT_NEGATIVE: [&str; 3] = [
    "I'm sorry to hear you're having a difficult time. Would you like to tell me more about what's been challenging for you?",
    "It takes courage to acknowledge when we're struggling. Remember that seeking support, like you're doing now, is a sign of strength.",
    "These feelings won't last forever, even though they might feel overwhelming right now. What's one small thing that might bring you a moment of relief?",
];

const CHAT_NEUTRAL: [&str; 3] = [
    "How have you been taking care of your mental wellbeing lately?",
    "Sometimes checking in with ourselves helps us notice patterns in our thoughts and feelings. Have you noticed any patterns recently?",
    "What's one small thing you could do today that might support your mental health?",
];

const JOURNAL_POSITIVE: [&str; 3] = [
    "It's great to see you're feeling positive! Consider building on this good energy by planning an activity you enjoy for tomorrow.",
    "Your positive mood is wonderful. Taking a moment to appreciate what's going well can help reinforce these good feelings.",
    "This positive energy is valuable! Think about what contributed to these good feelings, so you can create more moments like this.",
];

const JOURNAL_NEGATIVE: [&str; 3] = [
    "I notice you may be feeling frustrated. Taking a few deep breaths or going for a short walk might help shift your perspective.",
    "When negative emotions arise, it can help to talk to someone you trust about what you're experiencing.",
    "It sounds like today has been challenging. Remember that all emotions are temporary, and treating yourself with kindness during difficult times is important.",
];

const JOURNAL_ANXIOUS: [&str; 3] = [
    "I'm noticing some anxiety in your entry. Grounding exercises like the 5-4-3-2-1 technique (notice 5 things you see, 4 things you feel, 3 things you hear, 2 things you smell, and 1 thing you taste) might help you feel more present.",
    "Anxiety can feel overwhelming. Consider taking a few minutes for some deep breathing - breathing in for 4 counts, holding for 2, and exhaling for 6 can help activate your body's relaxation response.",
    "When anxious thoughts arise, sometimes writing them down and asking 'What's the evidence for and against this thought?' can help put things in perspective.",
];

const JOURNAL_DEPRESSED: [&str; 3] = [
    "I notice some signs of low mood in your entry. Even small activities like taking a shower, stepping outside for fresh air, or calling a friend can sometimes help break the cycle.",
    "Remember that you don't have to face difficult feelings alone. Reaching out to a trusted friend, family member, or mental health professional is a sign of strength.",
    "When motivation is low, try breaking tasks into very small steps. Even accomplishing one tiny thing can help build momentum.",
];

const JOURNAL_NEUTRAL: [&str; 3] = [
    "Regular journaling like you're doing now is a great way to track patterns in your thoughts and emotions over time.",
    "Consider setting an intention for tomorrow. What's one small thing you could do to support your mental wellbeing?",
    "Reflection is a powerful tool for self-awareness. You might try adding a gratitude practice to your journaling routine by noting three things you appreciate each day.",
];

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const CONTEXTS: [ConversationContext; 5] = [
        ConversationContext::Initial,
        ConversationContext::Anxiety,
        ConversationContext::Depression,
        ConversationContext::Sleep,
        ConversationContext::General,
    ];

    fn catalog() -> ResponseCatalog {
        ResponseCatalog::builtin().unwrap()
    }

    #[test]
    fn test_empty_pool_rejected() {
        let err = ResponsePool::new("chat.sleep", Vec::<String>::new()).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_blank_entry_rejected() {
        assert!(ResponsePool::new("journal.neutral", ["ok", "  "]).is_err());
    }

    #[test]
    fn test_context_overrides_sentiment() {
        for sentiment in ChatSentiment::ALL {
            assert_eq!(
                ChatCategory::resolve(sentiment, ConversationContext::Sleep),
                ChatCategory::Sleep
            );
            assert_eq!(
                ChatCategory::resolve(sentiment, ConversationContext::Initial),
                ChatCategory::Initial
            );
            assert_eq!(
                ChatCategory::resolve(sentiment, ConversationContext::General),
                ChatCategory::General(sentiment)
            );
        }
    }

    #[test]
    fn test_chat_selection_is_member_of_resolved_pool() {
        let catalog = catalog();
        let mut rng = StdRng::seed_from_u64(7);
        for sentiment in ChatSentiment::ALL {
            for context in CONTEXTS {
                let pool = catalog.chat_pool(ChatCategory::resolve(sentiment, context));
                for _ in 0..20 {
                    let picked =
                        catalog.select_response_with(&mut rng, Sentiment::Chat(sentiment), context);
                    assert!(!picked.is_empty());
                    assert!(pool.contains(picked));
                }
            }
        }
    }

    #[test]
    fn test_journal_selection_is_member_of_pool() {
        let catalog = catalog();
        for sentiment in JournalSentiment::ALL {
            let pool = catalog.journal_pool(sentiment);
            for _ in 0..20 {
                assert!(pool.contains(catalog.journal_suggestion(sentiment)));
            }
        }
    }

    #[test]
    fn test_journal_ignores_context() {
        let catalog = catalog();
        let pool = catalog.journal_pool(JournalSentiment::Anxious);
        for context in CONTEXTS {
            let picked = catalog.select_response(Sentiment::Journal(JournalSentiment::Anxious), context);
            assert!(pool.contains(picked));
        }
    }

    #[test]
    fn test_pools_are_disjoint() {
        let catalog = catalog();
        let initial = catalog.chat_pool(ChatCategory::Initial);
        let anxiety = catalog.chat_pool(ChatCategory::Anxiety);
        assert!(initial.entries().iter().all(|e| !anxiety.contains(e)));

        let picked = catalog.chat_response(ChatSentiment::Positive, ConversationContext::Initial);
        assert!(initial.contains(picked));
        assert!(!catalog
            .chat_pool(ChatCategory::General(ChatSentiment::Positive))
            .contains(picked));
    }
}
