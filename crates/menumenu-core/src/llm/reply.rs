//! Parsing and validation of the model's menu reply.
//!
//! The model is asked for bare JSON but often wraps it in markdown fences.
//! After unwrapping, the reply must match the dish schema exactly: a dish
//! with an empty required field fails the whole analysis rather than
//! reaching the client half-formed.

use crate::types::{Dish, DishId, MenuAnalysis};
use serde::Deserialize;

/// The reply as the model writes it, before ids are assigned.
#[derive(Debug, Deserialize)]
struct RawAnalysis {
    dishes: Vec<RawDish>,
    #[serde(default)]
    language: Option<String>,
    #[serde(default)]
    currency: Option<String>,
    #[serde(default)]
    restaurant_vibe: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawDish {
    original_name: String,
    translated_name: String,
    description: String,
    #[serde(default)]
    price: Option<String>,
    search_query: String,
}

/// Remove markdown code fences (```` ```json ```` and ```` ``` ````) and
/// surrounding whitespace.
pub fn strip_code_fences(text: &str) -> String {
    text.replace("```json", "")
        .replace("```JSON", "")
        .replace("```", "")
        .trim()
        .to_string()
}

/// Parse a model reply into a validated `MenuAnalysis`.
///
/// Every dish gets a fresh `DishId`. The error string carries enough detail
/// for server-side logs; it is never shown to clients.
pub fn parse_analysis(text: &str) -> Result<MenuAnalysis, String> {
    let cleaned = strip_code_fences(text);
    let raw: RawAnalysis = serde_json::from_str(&cleaned)
        .map_err(|e| format!("model reply is not valid menu JSON: {e}"))?;

    let dishes = raw
        .dishes
        .into_iter()
        .enumerate()
        .map(|(idx, dish)| into_dish(idx, dish))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(MenuAnalysis {
        dishes,
        detected_language: raw.language.map(|l| l.trim().to_string()).unwrap_or_default(),
        currency: non_blank(raw.currency),
        restaurant_vibe: non_blank(raw.restaurant_vibe),
    })
}

fn into_dish(idx: usize, raw: RawDish) -> Result<Dish, String> {
    let required = [
        ("originalName", &raw.original_name),
        ("translatedName", &raw.translated_name),
        ("description", &raw.description),
        ("searchQuery", &raw.search_query),
    ];
    if let Some((field, _)) = required.iter().find(|(_, v)| v.trim().is_empty()) {
        return Err(format!("dish {idx} has an empty {field}"));
    }

    Ok(Dish {
        id: DishId::new(),
        original_name: raw.original_name.trim().to_string(),
        translated_name: raw.translated_name.trim().to_string(),
        description: raw.description.trim().to_string(),
        price: non_blank(raw.price),
        search_query: raw.search_query.trim().to_string(),
    })
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    const REPLY: &str = r#"{
        "restaurant_vibe": "Traditional Spanish Taberna",
        "language": "Spanish",
        "currency": "EUR",
        "dishes": [
            {
                "originalName": "Pulpo a la gallega",
                "translatedName": "ガリシア風タコ",
                "description": "パプリカとオリーブオイルで仕上げた柔らかいタコ",
                "price": "18.50€",
                "searchQuery": "Pulpo a la gallega Spanish tapas plated professional photography"
            },
            {
                "originalName": "Croquetas de jamón",
                "translatedName": "生ハムのコロッケ",
                "description": "クリーミーな生ハム入りコロッケ",
                "price": "",
                "searchQuery": "Croquetas de jamon Spanish tapas close up delicious"
            }
        ]
    }"#;

    #[test]
    fn test_strip_code_fences() {
        assert_eq!(strip_code_fences("```json\n{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(strip_code_fences("```\n{}\n```\n"), "{}");
        assert_eq!(strip_code_fences("  {}  "), "{}");
    }

    #[test]
    fn test_parse_valid_reply() {
        let analysis = parse_analysis(REPLY).unwrap();
        assert_eq!(analysis.dishes.len(), 2);
        assert_eq!(analysis.detected_language, "Spanish");
        assert_eq!(analysis.currency.as_deref(), Some("EUR"));
        assert_eq!(
            analysis.restaurant_vibe.as_deref(),
            Some("Traditional Spanish Taberna")
        );
        assert_eq!(analysis.dishes[0].original_name, "Pulpo a la gallega");
        assert_eq!(analysis.dishes[0].price.as_deref(), Some("18.50€"));
        // Blank prices normalize to absent
        assert_eq!(analysis.dishes[1].price, None);
        assert_ne!(analysis.dishes[0].id, analysis.dishes[1].id);
    }

    #[test]
    fn test_parse_fenced_reply() {
        let fenced = format!("```json\n{REPLY}\n```");
        let analysis = parse_analysis(&fenced).unwrap();
        assert_eq!(analysis.dishes.len(), 2);
    }

    #[test]
    fn test_missing_language_is_accepted() {
        let analysis = parse_analysis(r#"{"dishes": []}"#).unwrap();
        assert!(analysis.dishes.is_empty());
        assert_eq!(analysis.detected_language, "");
        assert!(analysis.restaurant_vibe.is_none());
    }

    #[test]
    fn test_model_supplied_ids_are_ignored() {
        let reply = r#"{"dishes": [{
            "id": "from-model",
            "originalName": "Tortilla",
            "translatedName": "トルティージャ",
            "description": "スペイン風オムレツ",
            "searchQuery": "Spanish tortilla tapas bar plated"
        }]}"#;
        let analysis = parse_analysis(reply).unwrap();
        assert_ne!(analysis.dishes[0].id.as_str(), "from-model");
    }

    #[test]
    fn test_malformed_json_fails() {
        let err = parse_analysis("Sorry, I can't read this menu.").unwrap_err();
        assert!(err.contains("not valid menu JSON"));
    }

    #[test]
    fn test_missing_dishes_fails() {
        assert!(parse_analysis(r#"{"language": "French"}"#).is_err());
    }

    #[test]
    fn test_missing_required_field_fails() {
        let reply = r#"{"dishes": [{
            "originalName": "Tortilla",
            "translatedName": "トルティージャ",
            "description": "スペイン風オムレツ"
        }]}"#;
        assert!(parse_analysis(reply).is_err());
    }

    #[test]
    fn test_empty_required_field_fails() {
        let reply = r#"{"dishes": [{
            "originalName": "Tortilla",
            "translatedName": "  ",
            "description": "スペイン風オムレツ",
            "searchQuery": "Spanish tortilla plated"
        }]}"#;
        let err = parse_analysis(reply).unwrap_err();
        assert!(err.contains("translatedName"), "got: {err}");
    }
}
