use serde_json::Value;

/// Fields that carry the answer, most specific first.
const PRIORITY_KEYS: [&str; 5] = [
    "decision",
    "monthly_installment",
    "average_rate",
    "listings_used",
    "summary",
];

/// Print just the key answer value from the output.
pub fn print_minimal(value: &Value) {
    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    println!("{}", minimal_line(result_obj));
}

fn minimal_line(result: &Value) -> String {
    let Value::Object(map) = result else {
        return format_minimal(result);
    };

    // city summaries nest the decision in the evaluation
    let decision = map
        .get("evaluation")
        .and_then(|e| e.get("decision"))
        .filter(|d| !d.is_null());
    if let Some(d) = decision {
        return format_minimal(d);
    }

    for key in PRIORITY_KEYS {
        if let Some(val) = map.get(key).filter(|v| !v.is_null()) {
            return format_minimal(val);
        }
    }

    match map.iter().next() {
        Some((key, val)) => format!("{}: {}", key, format_minimal(val)),
        None => String::new(),
    }
}

fn format_minimal(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        Value::Object(map) => map
            .iter()
            .map(|(k, v)| format!("{}={}", k, format_minimal(v)))
            .collect::<Vec<_>>()
            .join(" "),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decision_wins() {
        let v = json!({"monthly_installment": "65087", "decision": "RENT"});
        assert_eq!(minimal_line(&v), "RENT");
    }

    #[test]
    fn test_batch_summary() {
        let v = json!({"summary": {"buy": 1, "rent": 2}, "reports": []});
        assert_eq!(minimal_line(&v), "buy=1 rent=2");
    }

    #[test]
    fn test_city_decision() {
        let v = json!({"city": "Pune", "evaluation": {"decision": "BUY"}});
        assert_eq!(minimal_line(&v), "BUY");
    }
}
