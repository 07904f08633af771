//! Deterministic keyword classifier used in mock mode and whenever the
//! remote classifier fails.

use super::{Category, ClassificationResult};

/// Substrings that mark an email as productive.
pub const PRODUCTIVE_KEYWORDS: &[&str] = &[
    "requisito",
    "erro",
    "bug",
    "projeto",
    "reunião",
    "prazo",
    "anexo",
    "dúvida",
    "invoice",
    "pagamento",
];

/// Fixed confidence of keyword classification.
pub const MOCK_CONFIDENCE: f64 = 0.85;

pub const MOCK_SUMMARY: &str = "Classificação simulada (Mock Mode) baseada em palavras-chave.";

pub const PRODUCTIVE_REPLY: &str = "Prezado(a), obrigado pelo contato. Recebemos sua solicitação \
     e nossa equipe técnica irá analisar o caso. Retornaremos em breve.";

pub const IMPRODUCTIVE_REPLY: &str = "Olá! Agradecemos a mensagem e desejamos o mesmo para você.";

/// Classify by keyword presence. Pure and deterministic.
pub fn mock_classify(text: &str) -> ClassificationResult {
    let lower = text.to_lowercase();
    let is_productive = PRODUCTIVE_KEYWORDS
        .iter()
        .any(|keyword| lower.contains(keyword));

    let (category, reply) = if is_productive {
        (Category::Productive, PRODUCTIVE_REPLY)
    } else {
        (Category::Improductive, IMPRODUCTIVE_REPLY)
    };

    ClassificationResult {
        category,
        confidence: MOCK_CONFIDENCE,
        summary: MOCK_SUMMARY.to_string(),
        suggested_response: reply.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bug_report_is_productive() {
        let result = mock_classify("Temos um bug no sistema");
        assert_eq!(result.category, Category::Productive);
        assert_eq!(result.suggested_response, PRODUCTIVE_REPLY);
    }

    #[test]
    fn birthday_greeting_is_improductive() {
        let result = mock_classify("Feliz aniversário!");
        assert_eq!(result.category, Category::Improductive);
        assert_eq!(result.suggested_response, IMPRODUCTIVE_REPLY);
    }

    #[test]
    fn matching_ignores_case_and_handles_accents() {
        assert_eq!(mock_classify("REUNIÃO amanhã").category, Category::Productive);
        assert_eq!(mock_classify("Tenho uma Dúvida").category, Category::Productive);
        assert_eq!(mock_classify("Segue a INVOICE").category, Category::Productive);
    }

    #[test]
    fn keywords_match_as_substrings() {
        // "erros" contains "erro"
        assert_eq!(mock_classify("vários erros").category, Category::Productive);
    }

    #[test]
    fn empty_text_is_improductive() {
        assert_eq!(mock_classify("").category, Category::Improductive);
    }

    #[test]
    fn result_is_deterministic() {
        let a = mock_classify("Prazo do projeto");
        let b = mock_classify("Prazo do projeto");
        assert_eq!(a, b);
        assert_eq!(a.confidence, 0.85);
        assert_eq!(a.summary, MOCK_SUMMARY);
    }
}
