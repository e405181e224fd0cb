use serde::{Deserialize, Serialize};

/// Speaker of a turn in the conversation sent to the model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Model,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Model => "model",
        }
    }
}

/// One prior utterance carried as conversation context
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Turn {
    pub role: Role,
    pub text: String,
}

impl Turn {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
        }
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self {
            role: Role::Model,
            text: text.into(),
        }
    }
}

/// Everything the model sees for one reply: persona, recent turns, and the new message.
#[derive(Debug, Clone)]
pub struct Prompt {
    pub system_instruction: String,
    pub history: Vec<Turn>,
    pub message: String,
}

/// Request to Gemini API to generate content
#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationConfig>,
}

impl GenerateContentRequest {
    /// Lays the prompt out as Gemini contents: history first, then the current message.
    pub fn from_prompt(prompt: &Prompt, temperature: f32) -> Self {
        let mut contents: Vec<Content> = prompt
            .history
            .iter()
            .map(|turn| Content::with_role(turn.role, turn.text.clone()))
            .collect();
        contents.push(Content::with_role(Role::User, prompt.message.clone()));

        let system_instruction = if prompt.system_instruction.trim().is_empty() {
            None
        } else {
            Some(Content {
                parts: vec![Part::text(prompt.system_instruction.clone())],
                role: None,
            })
        };

        Self {
            contents,
            system_instruction,
            generation_config: Some(GenerationConfig {
                temperature: Some(temperature),
                ..Default::default()
            }),
        }
    }
}

/// Content structure for requests and responses
#[derive(Serialize, Clone, Debug, Deserialize)]
pub struct Content {
    pub parts: Vec<Part>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

impl Content {
    pub fn with_role(role: Role, text: String) -> Self {
        Self {
            parts: vec![Part::text(text)],
            role: Some(role.as_str().to_string()),
        }
    }
}

/// Part structure for a piece of content
#[derive(Serialize, Clone, Debug, Deserialize)]
pub struct Part {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl Part {
    pub fn text(text: String) -> Self {
        Self { text: Some(text) }
    }
}

/// Generation configuration options
#[derive(Serialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_k: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_output_tokens: Option<i32>,
}

/// Response from Gemini API
#[derive(Deserialize, Debug, Serialize)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

/// Candidate in the response
#[derive(Deserialize, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub content: Option<ContentResponsePart>,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// Content part in the response
#[derive(Deserialize, Debug, Serialize)]
pub struct ContentResponsePart {
    #[serde(default)]
    pub parts: Vec<PartResponse>,
    pub role: Option<String>,
}

/// Part response from the API
#[derive(Deserialize, Debug, Serialize)]
pub struct PartResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_layout() {
        let prompt = Prompt {
            system_instruction: "Be kind.".to_string(),
            history: vec![Turn::user("hi"), Turn::model("hello")],
            message: "I can't sleep".to_string(),
        };

        let request = GenerateContentRequest::from_prompt(&prompt, 0.7);
        let json = serde_json::to_value(&request).unwrap();

        let contents = json["contents"].as_array().unwrap();
        assert_eq!(contents.len(), 3);
        assert_eq!(contents[0]["role"], "user");
        assert_eq!(contents[1]["role"], "model");
        assert_eq!(contents[2]["parts"][0]["text"], "I can't sleep");
        assert_eq!(json["systemInstruction"]["parts"][0]["text"], "Be kind.");
        assert!(json["generationConfig"]["temperature"].is_number());
    }

    #[test]
    fn test_blank_system_instruction_is_omitted() {
        let prompt = Prompt {
            system_instruction: "  ".to_string(),
            history: Vec::new(),
            message: "hello".to_string(),
        };

        let json = serde_json::to_value(GenerateContentRequest::from_prompt(&prompt, 0.7)).unwrap();
        assert!(json.get("systemInstruction").is_none());
    }
}
