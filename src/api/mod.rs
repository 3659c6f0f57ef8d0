use serde::Serialize;

/// Body of the single POST issued per turn.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct QuestionRequest {
    pub question: String,
}

impl QuestionRequest {
    pub fn new(question: impl Into<String>) -> Self {
        Self {
            question: question.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn question_request_serializes_single_field() {
        let body = serde_json::to_string(&QuestionRequest::new("What is in the handbook?")).unwrap();
        assert_eq!(body, r#"{"question":"What is in the handbook?"}"#);
    }
}
