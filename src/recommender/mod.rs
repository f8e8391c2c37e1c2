pub mod crop;
pub mod symptoms;

pub use crop::{
    Crop, CropRecommendation, DEFAULT_TOP_N, FARM_SOIL, FieldConditions, SoilProfile,
    recommend_from_field, recommend_manual,
};
pub use symptoms::{SymptomRecommendations, generate_recommendations, split_symptoms};
