//! Usage cost estimates from per-provider token rates.

use crate::registry::ProviderDescriptor;

/// Estimated cost of a token count on one provider.
#[derive(Debug, Clone, PartialEq)]
pub struct CostEstimate {
    pub cost_usd: f64,
    pub description: String,
}

/// Cost of `tokens` on `descriptor`: `(tokens / 1000) * rate`.
///
/// A zero rate is always described as `"Free (local)"`.
pub fn estimate_cost(descriptor: &ProviderDescriptor, tokens: u64) -> CostEstimate {
    let rate = descriptor.cost_per_1k_tokens;
    if rate == 0.0 {
        return CostEstimate {
            cost_usd: 0.0,
            description: "Free (local)".to_string(),
        };
    }

    let cost_usd = tokens as f64 / 1000.0 * rate;
    CostEstimate {
        cost_usd,
        description: format!("${cost_usd:.4} for {} tokens", group_thousands(tokens)),
    }
}

/// Short rate label, e.g. `"FREE"` or `"~$0.015/1K tokens"`.
pub fn rate_label(descriptor: &ProviderDescriptor) -> String {
    if descriptor.cost_per_1k_tokens == 0.0 {
        "FREE".to_string()
    } else {
        format!("~${}/1K tokens", descriptor.cost_per_1k_tokens)
    }
}

fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
