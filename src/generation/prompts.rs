//! Prompt construction.
//!
//! `Catalog` and `TryOn` build one fidelity-focused prompt that is reused on
//! every attempt. `Generic` walks a ladder: attempt 0 sends the base prompt
//! verbatim and later attempts send progressively shorter, less specific
//! templates, reusing the last one once the ladder runs out.

use std::sync::OnceLock;

use regex::Regex;

use super::{GenerationMode, GenerationRequest};

/// Garment description used in catalog mode when none is supplied
pub const DEFAULT_CATALOG_GARMENT: &str = "elegant high-quality garment";

/// Person description used in try-on mode when none is supplied
pub const DEFAULT_TRYON_PERSON: &str = "person with unique features";

/// Garment description used in try-on mode when none is supplied
pub const DEFAULT_TRYON_GARMENT: &str = "specific catalog garment";

/// Translation of an absent generic description
pub const DEFAULT_GENERIC_DESCRIPTION: &str = "professional fashion model wearing elegant clothing";

/// Rungs 1.. of the generic ladder. Rung 0 is the caller's base prompt.
const LADDER_TEMPLATES: [&str; 4] = [
    "Create a fashion editorial composition featuring the garment elements from the references. \
     Focus on professional catalog presentation, styling and studio lighting.",
    "Generate high-end fashion photography combining the clothing elements. \
     Commercial catalog quality.",
    "Compose a clean fashion editorial featuring the garment design.",
    "A fashion catalog image of the clothing.",
];

/// Number of rungs, including the base prompt
pub const LADDER_LENGTH: usize = LADDER_TEMPLATES.len() + 1;

/// Spanish to English word table for generic descriptions
const TRANSLATIONS: [(&str, &str); 27] = [
    // Garments
    ("camiseta", "t-shirt"),
    ("blusa", "blouse"),
    ("suéter", "sweater"),
    ("chaqueta", "jacket"),
    ("pantalón", "pants"),
    ("falda", "skirt"),
    ("vestido", "dress"),
    ("camisa", "shirt"),
    ("prenda", "garment"),
    // Colors
    ("rojo", "red"),
    ("azul", "blue"),
    ("verde", "green"),
    ("negro", "black"),
    ("blanco", "white"),
    ("gris", "gray"),
    ("rosa", "pink"),
    ("amarillo", "yellow"),
    // Descriptive
    ("modelo", "model"),
    ("profesional", "professional"),
    ("elegante", "elegant"),
    ("moderno", "modern"),
    ("clásico", "classic"),
    ("ajustado", "fitted"),
    ("holgado", "loose"),
    ("portando", "wearing"),
    ("usando", "wearing"),
    ("con", "with"),
];

fn translation_table() -> &'static [(Regex, &'static str)] {
    static TABLE: OnceLock<Vec<(Regex, &'static str)>> = OnceLock::new();
    TABLE.get_or_init(|| {
        TRANSLATIONS
            .iter()
            .filter_map(|(spanish, english)| {
                Regex::new(&format!(r"\b{}\b", regex::escape(spanish)))
                    .ok()
                    .map(|re| (re, *english))
            })
            .collect()
    })
}

/// Word-level Spanish to English translation for prompt text.
///
/// Lowercases the input and replaces known whole words. Unknown words pass
/// through unchanged. `None` or blank input yields
/// [`DEFAULT_GENERIC_DESCRIPTION`].
pub fn translate_to_english(text: Option<&str>) -> String {
    let Some(text) = text.filter(|t| !t.trim().is_empty()) else {
        return DEFAULT_GENERIC_DESCRIPTION.to_string();
    };

    translation_table()
        .iter()
        .fold(text.to_lowercase(), |acc, (re, english)| {
            re.replace_all(&acc, *english).into_owned()
        })
}

/// Garment-fidelity prompt for catalog shots.
pub fn catalog_prompt(garment_description: &str) -> String {
    format!(
        "Create a professional fashion catalog photograph combining the two reference images.\n\
         \n\
         COMPOSITION:\n\
         - The model from the FIRST reference image\n\
         - Wearing the garment from the SECOND reference image\n\
         - Studio lighting and professional presentation\n\
         \n\
         GARMENT ACCURACY (second reference):\n\
         - Exact colors, patterns and design\n\
         - Exact fabric texture and material\n\
         - Exact cut, fit and silhouette\n\
         - Exact details: buttons, seams, neckline, sleeves\n\
         - Natural draping on the model's body\n\
         \n\
         OUTPUT: catalog photo of the model wearing the garment.\n\
         \n\
         Garment: {}",
        garment_description
    )
}

/// Identity-preserving prompt for dressing a specific person.
pub fn tryon_prompt(person_description: &str, garment_description: &str) -> String {
    format!(
        "PERSON IDENTITY PRESERVATION AND GARMENT REPLACEMENT.\n\
         \n\
         IDENTITY (highest priority):\n\
         - The exact same person as the reference photo\n\
         - Identical face, skin tone, hair, eye color and body proportions\n\
         - Keep the person's pose and positioning\n\
         - The same person in different clothes, never a different person\n\
         \n\
         GARMENT REPLACEMENT:\n\
         - Remove the original clothing\n\
         - Dress the person only in the catalog garment\n\
         - Exact color, fabric, pattern and details of the garment reference\n\
         - Cut adapted naturally to this person's build\n\
         \n\
         Person (must preserve): {}\n\
         Garment (must apply): {}\n\
         \n\
         Same exact person plus the new garment. Identity comes first.",
        person_description, garment_description
    )
}

/// Editorial composition prompt used as the default generic base.
pub fn editorial_prompt(description: &str) -> String {
    format!(
        "Create a professional fashion editorial composition combining visual elements from the provided references.\n\
         \n\
         STYLE:\n\
         - Fashion editorial photography with studio lighting\n\
         - Clean commercial catalog composition\n\
         - Focus on garment details and textures\n\
         - Magazine-quality presentation\n\
         \n\
         Context: {}\n\
         \n\
         Generate a fashion editorial composition suitable for commercial catalog use.",
        description
    )
}

/// Base prompt of the generic ladder for this request.
pub fn generic_base_prompt(request: &GenerationRequest) -> String {
    match &request.base_prompt {
        Some(base) => base.clone(),
        None => editorial_prompt(&translate_to_english(
            request.garment_description.as_deref(),
        )),
    }
}

/// Select a ladder rung: `min(attempt, LADDER_LENGTH - 1)`.
pub fn ladder_prompt(base: &str, attempt: u32) -> String {
    let rung = (attempt as usize).min(LADDER_LENGTH - 1);
    if rung == 0 {
        base.to_string()
    } else {
        LADDER_TEMPLATES[rung - 1].to_string()
    }
}

/// Prompt text for a given attempt (0-indexed).
pub fn build_prompt(request: &GenerationRequest, attempt: u32) -> String {
    match request.mode {
        GenerationMode::Catalog => catalog_prompt(
            request
                .garment_description
                .as_deref()
                .unwrap_or(DEFAULT_CATALOG_GARMENT),
        ),
        GenerationMode::TryOn => tryon_prompt(
            request
                .person_description
                .as_deref()
                .unwrap_or(DEFAULT_TRYON_PERSON),
            request
                .garment_description
                .as_deref()
                .unwrap_or(DEFAULT_TRYON_GARMENT),
        ),
        GenerationMode::Generic => ladder_prompt(&generic_base_prompt(request), attempt),
    }
}
