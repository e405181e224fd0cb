/// First message of every fresh transcript
pub const GREETING: &str = "Hello! I'm CURA, your mental health companion. How are you feeling today? You can share anything with me - I'm here to listen and support you.";

/// Persona sent as the system instruction with every remote request
pub const PERSONA: &str = "You are CURA, a compassionate AI mental health companion designed specifically for Indian college students. Your role is to:

1. Provide empathetic, supportive responses to mental health concerns
2. Offer practical coping strategies and techniques
3. Recognize when professional help is needed
4. Be culturally sensitive to Indian student experiences
5. Maintain a warm, non-judgmental tone
6. Focus on immediate support and practical advice

Guidelines:
- Always prioritize safety - if someone mentions self-harm or suicide, immediately direct them to crisis resources
- Be encouraging and validate their feelings
- Suggest practical, actionable steps
- Keep responses concise but meaningful (2-3 sentences)
- Use a supportive, friendly tone
- Avoid giving medical diagnoses or treatment advice
- Encourage professional help when appropriate

Crisis Resources to mention:
- KIRAN Helpline: 1800-599-0019
- Emergency Services: 100
- Campus counseling services

Remember: You're here to support, not replace professional mental health care.";

/// Starter prompts offered to the user
pub const QUICK_PROMPTS: [&str; 6] = [
    "I'm feeling overwhelmed",
    "I'm having trouble sleeping",
    "I feel lonely",
    "I'm stressed about exams",
    "I need someone to talk to",
    "I'm feeling anxious",
];

/// A canned reply used when the remote model is unavailable
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Topic {
    pub name: &'static str,
    pub keywords: &'static [&'static str],
    pub reply: &'static str,
}

/// Checked in order; the first topic with a matching keyword wins.
pub const TOPICS: [Topic; 8] = [
    Topic {
        name: "anxiety",
        keywords: &["anxious", "anxiety", "worried", "nervous"],
        reply: "I understand that anxiety can feel overwhelming. Let's try a breathing exercise together. Breathe in for 4 counts, hold for 4, and breathe out for 6. Would you like to talk about what's making you feel anxious?",
    },
    Topic {
        name: "sadness",
        keywords: &["depressed", "sad", "down", "empty"],
        reply: "I hear that you're going through a difficult time. It's okay to feel sad, and your feelings are valid. Remember that this feeling is temporary, even if it doesn't feel that way. What's one small thing that might bring you comfort today?",
    },
    Topic {
        name: "academic",
        keywords: &["study", "exam", "assignment", "academic", "grades"],
        reply: "Academic pressure can be really overwhelming. Let's break this down together. What specific aspect of your studies is causing the most stress right now? Sometimes talking through it can help us find a manageable approach.",
    },
    Topic {
        name: "stress",
        keywords: &["stress", "overwhelmed"],
        reply: "Stress can feel overwhelming, especially in college. Let's break this down together. What specific aspect is causing you the most stress right now? Sometimes identifying the main source can help us find manageable solutions.",
    },
    Topic {
        name: "family",
        keywords: &["family", "parents", "pressure", "expectations"],
        reply: "Family expectations can feel like a heavy weight. It's okay to feel overwhelmed by what others expect of you. Your feelings are valid. What would you like your family to understand about what you're going through?",
    },
    Topic {
        name: "sleep",
        keywords: &["sleep", "tired", "insomnia", "exhausted"],
        reply: "Sleep is so important for your mental health. Try creating a bedtime routine: turn off screens 1 hour before bed, keep your room cool and dark, and practice relaxation techniques. How many hours of sleep are you getting?",
    },
    Topic {
        name: "loneliness",
        keywords: &["lonely", "alone", "isolated"],
        reply: "Feeling lonely is more common than you think, especially in college. Consider joining student clubs, study groups, or a peer support community. Connection with others is vital for mental well-being. Would you like to talk about it?",
    },
    Topic {
        name: "support",
        keywords: &["help", "support", "struggling"],
        reply: "I'm glad you reached out. It takes courage to ask for help. You're not alone in this. What would be most helpful for you right now - talking through your feelings, getting some practical advice, or just having someone listen?",
    },
];

/// Used in rotation when no topic matches
pub const GENERIC_REPLIES: [&str; 4] = [
    "Thank you for sharing that with me. I'm here to listen and support you. How does that make you feel?",
    "I appreciate you opening up to me. Your feelings are valid and important. What would help you feel better right now?",
    "I'm listening, and I care about what you're going through. Sometimes just talking about it can help. What else is on your mind?",
    "Thank you for trusting me with this. You're being very brave by sharing. How can I best support you right now?",
];

/// Finds the first topic whose keywords occur in the message
pub fn match_topic(message: &str) -> Option<&'static Topic> {
    let lower = message.to_lowercase();
    TOPICS
        .iter()
        .find(|topic| topic.keywords.iter().any(|keyword| lower.contains(keyword)))
}

/// Generic reply for a rotation position
pub fn generic_reply(cursor: usize) -> &'static str {
    GENERIC_REPLIES[cursor % GENERIC_REPLIES.len()]
}
