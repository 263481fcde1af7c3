use serde::Serialize;

/// Prompt layout handed to the chat model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PromptTemplate {
    /// Arabic "context / question" labels.
    #[default]
    ContextQuestion,
    /// Alpaca-style instruction, input and response sections.
    Instruction,
}

impl PromptTemplate {
    pub fn render(self, question: &str, context: &str) -> String {
        match self {
            PromptTemplate::ContextQuestion => {
                format!("السياق:\n{context}\n\nالسؤال:\n{question}")
            }
            PromptTemplate::Instruction => format!(
                "### Instruction:\n{question}\n\n### Input:\n{context}\n\n{RESPONSE_MARKER}\n"
            ),
        }
    }
}

impl std::str::FromStr for PromptTemplate {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "context_question" => Ok(PromptTemplate::ContextQuestion),
            "instruction" => Ok(PromptTemplate::Instruction),
            other => Err(format!("unknown prompt template: {other}")),
        }
    }
}

const INST_MARKER: &str = "[/INST]";
const RESPONSE_MARKER: &str = "### Response:";

/// Drops an echoed prompt from generated text.
///
/// Everything up to the first `[/INST]`, or else the last `### Response:`,
/// is removed before trimming.
pub fn clean_generation(raw: &str) -> String {
    let answer = if let Some((_, after)) = raw.split_once(INST_MARKER) {
        after
    } else if let Some((_, after)) = raw.rsplit_once(RESPONSE_MARKER) {
        after
    } else {
        raw
    };

    answer.trim().to_string()
}
