/// Phrases that flag a message as crisis-indicating. Plain substrings, matched
/// case-insensitively with no negation handling, so "I am not suicidal" matches.
pub const CRISIS_KEYWORDS: [&str; 16] = [
    "suicide",
    "kill myself",
    "end it all",
    "not worth living",
    "better off dead",
    "self harm",
    "hurt myself",
    "cut myself",
    "harm myself",
    "die",
    "death",
    "hopeless",
    "no point",
    "give up",
    "can't go on",
    "end my life",
];

pub const KIRAN_HELPLINE: &str = "1800-599-0019";
pub const EMERGENCY_NUMBER: &str = "100";

/// Reply sent instead of anything else when a message is flagged
pub const CRISIS_RESPONSE: &str = "I'm deeply concerned about what you're sharing. Your safety is the most important thing right now. Please reach out for immediate help:

🚨 **Crisis Support:**
- **KIRAN Helpline**: 1800-599-0019 (24/7)
- **Emergency Services**: 100
- **Campus Security**: Available 24/7

You are not alone, and there are people who want to help you. Please don't hesitate to reach out to someone you trust or these crisis resources immediately.";

/// Returns true if the text contains any crisis keyword
pub fn detect(text: &str) -> bool {
    let lower = text.to_lowercase();
    CRISIS_KEYWORDS.iter().any(|keyword| lower.contains(keyword))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Helpline {
    pub name: &'static str,
    pub number: &'static str,
    pub description: &'static str,
}

/// Shown with the crisis alert. The first two entries are the ones in [`CRISIS_RESPONSE`].
pub const HELPLINES: [Helpline; 6] = [
    Helpline {
        name: "KIRAN Helpline",
        number: KIRAN_HELPLINE,
        description: "24/7 national mental health rehabilitation helpline",
    },
    Helpline {
        name: "Emergency Services",
        number: EMERGENCY_NUMBER,
        description: "Immediate emergency response",
    },
    Helpline {
        name: "National Suicide Prevention Lifeline",
        number: "9152987821",
        description: "24/7 crisis support in Hindi and English",
    },
    Helpline {
        name: "AASRA Suicide Prevention",
        number: "9820466726",
        description: "24x7 helpline for suicide prevention",
    },
    Helpline {
        name: "Sneha Suicide Prevention",
        number: "044-24640050",
        description: "Chennai-based 24x7 suicide prevention helpline",
    },
    Helpline {
        name: "iCall Psychosocial Helpline",
        number: "9152987821",
        description: "Professional counselors available 8 AM - 10 PM",
    },
];
