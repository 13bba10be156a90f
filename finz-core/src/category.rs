//! Category inference: best-effort labels, independent of direction.
//!
//! First matching rule wins; no match falls back to `outros`. Assignment
//! never fails and never blocks a transaction.

use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};

/// Fallback category for text no rule matches.
pub const FALLBACK_CATEGORY: &str = "outros";

/// One ordered rule: any keyword hit assigns `category`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryRule {
    pub category: String,
    pub keywords: Vec<String>,
}

impl CategoryRule {
    pub fn new(category: impl Into<String>, keywords: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            category: category.into(),
            keywords: keywords.into_iter().map(|k| k.into().to_lowercase()).collect(),
        }
    }
}

/// Ordered rule table. Configuration data, not logic: tune the vocabulary
/// without touching the classifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryRules {
    rules: Vec<CategoryRule>,
}

impl CategoryRules {
    pub fn new(rules: Vec<CategoryRule>) -> Result<Self> {
        if rules.is_empty() {
            bail!("category rule table is empty");
        }
        Ok(Self { rules })
    }

    /// Default Brazilian vocabulary. Order matters: earlier rules win.
    pub fn brazilian_defaults() -> Self {
        let rules = vec![
            CategoryRule::new(
                "alimentação",
                ["comida", "alimentação", "alimentacao", "restaurante", "mercado",
                 "supermercado", "lanche", "padaria", "ifood"],
            ),
            CategoryRule::new(
                "transporte",
                ["transporte", "uber", "ônibus", "onibus", "gasolina",
                 "combustível", "combustivel", "passagem"],
            ),
            CategoryRule::new(
                "moradia",
                ["aluguel", "condomínio", "condominio", "apartamento"],
            ),
            CategoryRule::new(
                "contas",
                ["internet", "telefone", "conta", "luz", "água", "agua",
                 "energia", "boleto", "fatura"],
            ),
            CategoryRule::new(
                "saúde",
                ["farmácia", "farmacia", "médico", "medico", "remédio",
                 "remedio", "consulta"],
            ),
            CategoryRule::new(
                "lazer",
                ["cinema", "show", "viagem", "jogo", "bar", "festa"],
            ),
            CategoryRule::new(
                "renda",
                ["salário", "salario", "renda", "freela", "venda"],
            ),
        ];
        Self { rules }
    }

    /// Append rules for caller-supplied categories (user-defined ones
    /// beyond the defaults). Each is matched by its own name; defaults
    /// keep precedence.
    pub fn with_extensions(mut self, categories: &[String]) -> Self {
        for name in categories {
            let lower = name.to_lowercase();
            if self.rules.iter().any(|r| r.category == lower) {
                continue;
            }
            self.rules.push(CategoryRule::new(lower.clone(), [lower]));
        }
        self
    }

    /// Assign a category to `text`. Never fails: unmatched text gets
    /// [`FALLBACK_CATEGORY`].
    pub fn classify(&self, text: &str) -> String {
        let lower = text.to_lowercase();
        for rule in &self.rules {
            if rule.keywords.iter().any(|k| lower.contains(k.as_str())) {
                return rule.category.clone();
            }
        }
        FALLBACK_CATEGORY.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_categories() {
        let rules = CategoryRules::brazilian_defaults();
        assert_eq!(rules.classify("gastei 45,90 em comida"), "alimentação");
        assert_eq!(rules.classify("paguei 50 na conta de luz"), "contas");
        assert_eq!(rules.classify("recebi 800 do salário"), "renda");
        assert_eq!(rules.classify("uber para o centro 25"), "transporte");
    }

    #[test]
    fn test_fallback_is_outros() {
        let rules = CategoryRules::brazilian_defaults();
        assert_eq!(rules.classify("uma coisa qualquer 10"), "outros");
    }

    #[test]
    fn test_first_match_wins() {
        // "mercado" (alimentação) appears before "conta" (contas) in the
        // rule order, so a sentence with both stays alimentação
        let rules = CategoryRules::brazilian_defaults();
        assert_eq!(rules.classify("paguei a conta do mercado"), "alimentação");
    }

    #[test]
    fn test_extension_categories() {
        let rules = CategoryRules::brazilian_defaults()
            .with_extensions(&["educação".to_string()]);
        assert_eq!(rules.classify("mensalidade de educação 300"), "educação");
        // defaults still win over extensions
        assert_eq!(rules.classify("mercado e educação 50"), "alimentação");
    }

    #[test]
    fn test_empty_table_rejected() {
        assert!(CategoryRules::new(vec![]).is_err());
    }
}
