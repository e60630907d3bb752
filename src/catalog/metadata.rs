//! Keyword-based metadata inference for catalog items.
//!
//! Title and description are lowercased, concatenated and scanned for
//! English and Spanish keywords. The first matching rule wins for each
//! single-valued field; colors collect every match.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GarmentType {
    Shirt,
    Pants,
    Dress,
    Skirt,
    Jacket,
    Sweater,
    Shorts,
    #[default]
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GarmentStyle {
    Formal,
    #[default]
    Casual,
    Sport,
    Elegant,
    Evening,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Female,
    Male,
    #[default]
    Unisex,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Season {
    Spring,
    Summer,
    Autumn,
    Winter,
    #[default]
    AllYear,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Occasion {
    #[default]
    Casual,
    Work,
    Party,
    Sport,
    Night,
}

/// Color name used when no color keyword matches
pub const UNSPECIFIED_COLOR: &str = "unspecified";

const GARMENT_RULES: [(GarmentType, &[&str]); 7] = [
    (GarmentType::Shirt, &["camisa", "blusa", "shirt", "blouse"]),
    (GarmentType::Pants, &["pantalon", "pantalón", "pants", "trousers", "jeans"]),
    (GarmentType::Dress, &["vestido", "dress"]),
    (GarmentType::Skirt, &["falda", "skirt"]),
    (GarmentType::Jacket, &["chaqueta", "jacket", "blazer"]),
    (GarmentType::Sweater, &["sueter", "suéter", "sweater"]),
    (GarmentType::Shorts, &["shorts"]),
];

const COLOR_RULES: [(&str, &[&str]); 10] = [
    ("red", &["rojo", "red", "carmesi", "escarlata", "crimson", "scarlet"]),
    ("blue", &["azul", "blue", "marino", "celeste", "navy"]),
    ("green", &["verde", "green", "esmeralda", "oliva", "olive", "emerald"]),
    ("black", &["negro", "black"]),
    ("white", &["blanco", "white"]),
    ("gray", &["gris", "gray", "grey"]),
    ("pink", &["rosa", "pink", "rosado"]),
    ("yellow", &["amarillo", "yellow"]),
    ("purple", &["morado", "purple", "violeta", "violet"]),
    ("brown", &["marron", "marrón", "brown", "cafe"]),
];

const STYLE_RULES: [(GarmentStyle, &[&str]); 4] = [
    (GarmentStyle::Formal, &["formal", "profesional", "professional"]),
    (GarmentStyle::Sport, &["deportivo", "sport"]),
    (GarmentStyle::Elegant, &["elegante", "elegant", "sofisticado", "sophisticated"]),
    (GarmentStyle::Evening, &["noche", "night", "evening"]),
];

const GENDER_RULES: [(Gender, &[&str]); 2] = [
    (
        Gender::Female,
        &["mujer", "femenino", "woman", "women", "female", "vestido", "falda", "dress", "skirt"],
    ),
    (Gender::Male, &["hombre", "masculino", "men's", "male"]),
];

const OCCASION_RULES: [(Occasion, &[&str]); 4] = [
    (Occasion::Work, &["trabajo", "oficina", "office", "workwear"]),
    (Occasion::Party, &["fiesta", "party"]),
    (Occasion::Sport, &["deporte", "gym", "workout"]),
    (Occasion::Night, &["noche", "night"]),
];

/// Filterable attributes of a catalog item
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogMetadata {
    pub garment_type: GarmentType,
    pub colors: Vec<String>,
    pub style: GarmentStyle,
    pub gender: Gender,
    pub season: Season,
    pub occasion: Occasion,
}

fn first_match<T: Copy>(text: &str, rules: &[(T, &[&str])]) -> Option<T> {
    rules
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| text.contains(k)))
        .map(|(value, _)| *value)
}

impl CatalogMetadata {
    /// Infer metadata from an item's title and description.
    pub fn infer(title: &str, description: &str) -> Self {
        let text = format!("{} {}", title, description).to_lowercase();

        let garment_type = first_match(&text, &GARMENT_RULES).unwrap_or_default();
        let style = first_match(&text, &STYLE_RULES).unwrap_or_default();
        let gender = first_match(&text, &GENDER_RULES).unwrap_or_default();

        let occasion = match first_match(&text, &OCCASION_RULES) {
            Some(occasion) => occasion,
            None if style == GarmentStyle::Formal => Occasion::Work,
            None => Occasion::default(),
        };

        let mut colors: Vec<String> = COLOR_RULES
            .iter()
            .filter(|(_, keywords)| keywords.iter().any(|k| text.contains(k)))
            .map(|(name, _)| name.to_string())
            .collect();
        if colors.is_empty() {
            colors.push(UNSPECIFIED_COLOR.to_string());
        }

        Self {
            garment_type,
            colors,
            style,
            gender,
            season: Season::AllYear,
            occasion,
        }
    }
}
