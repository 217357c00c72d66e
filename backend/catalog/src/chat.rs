//! # Chat
//!
//! Answer generation behind the search widget. The shipped responder is canned: it echoes the
//! query into a fixed summary and always returns the same answer, sources and next steps. A real
//! model plugs in by implementing [`Responder`].
use serde::Serialize;

pub const CANNED_CONFIDENCE: f64 = 0.78;

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ChatSource {
    pub title: String,
    pub url: String,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChatAnswer {
    pub summary: String,
    pub answer: String,
    pub confidence: f64,
    pub sources: Vec<ChatSource>,
    pub next_steps: Vec<String>,
}

pub trait Responder: Send + Sync {
    fn generate(&self, query: &str) -> ChatAnswer;

    /// Pieces streamed to the client one event at a time.
    fn tokenize(&self, text: &str) -> Vec<String>;
}

#[derive(Default)]
pub struct CannedResponder;

impl Responder for CannedResponder {
    fn generate(&self, query: &str) -> ChatAnswer {
        ChatAnswer {
            summary: format!("已理解你的問題：「{query}」。我會先給你結論，再補上依據與下一步。"),
            answer: "建議先釐清需求範圍與限制條件，接著找出 2-3 個可信來源交叉驗證，最後整理成可執行的行動清單。這樣可以在資訊量龐大的情境下，依然快速做出正確判斷。".to_string(),
            confidence: CANNED_CONFIDENCE,
            sources: vec![
                ChatSource {
                    title: "Remix 官方文件".to_string(),
                    url: "https://remix.run/docs".to_string(),
                },
                ChatSource {
                    title: "AI 搜尋最佳實務".to_string(),
                    url: "https://ai-search-portal.local/guide".to_string(),
                },
            ],
            next_steps: vec![
                "補充你目前的情境限制或目標".to_string(),
                "選擇一個來源作為主要依據".to_string(),
                "把答案轉成可執行任務清單".to_string(),
            ],
        }
    }

    fn tokenize(&self, text: &str) -> Vec<String> {
        text.split(' ')
            .filter(|token| !token.is_empty())
            .map(str::to_string)
            .collect()
    }
}
