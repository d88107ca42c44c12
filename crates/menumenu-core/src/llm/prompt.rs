//! The fixed instruction prompt sent with every menu photo.

/// Build the menu-reading instruction for a given target language.
pub fn menu_prompt(target_language: &str) -> String {
    format!(
        r#"You are a "Visual Culinary Curator" and an expert menu translator.
Analyze the provided menu image deeply. The menu may contain multiple sections (e.g. Tasting Menu, A La Carte).

1. **Identify the vibe**: First, infer the restaurant's style (e.g. Authentic Italian Trattoria, Modern Fusion, Street Food, High-end French).
2. **Extract & translate**: Extract every dish name and description. Translate them into appetizing {lang}.
   - If it's a course menu, keep the order.
   - If an entry is only a list of ingredients, describe what the dish is.
3. **Visualize (search query engineering)**: For each dish, write a specific English search query for an image search engine.
   - INJECT CONTEXT: never output the bare dish name. Add the cuisine style or visual cues ("Spanish tapas style", "fine dining plating", "rustic presentation").
   - OPTIMIZE FOR APPEARANCE: add keywords like "delicious", "restaurant plated", "professional photography", "close up".
   - AVOID GENERIC: if the dish is "Steak" but the menu is Japanese, query for "Wagyu Steak Teppanyaki style plated".

Output valid JSON only, with no markdown code fences:
{{
  "restaurant_vibe": "Brief description of the inferred restaurant style",
  "language": "Detected language of the menu",
  "currency": "Currency code or symbol if prices are shown (optional)",
  "dishes": [
    {{
      "originalName": "The dish name exactly as written on the menu",
      "translatedName": "The dish name in {lang}",
      "description": "A short, tasty description in {lang}",
      "price": "Price as printed (optional)",
      "searchQuery": "The optimized English image search query"
    }}
  ]
}}"#,
        lang = target_language
    )
}
