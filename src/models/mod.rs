pub mod account;
pub mod entity;
pub mod saved_item;

pub use account::{
    Account, AccountResponse, LoginRequest, PreferenceRow, PreferenceUpdate, RegisterRequest,
    TokenResponse,
};
pub use entity::{
    ConvertRequest, ConvertResponse, EntityKind, EntityProperties, ExternalEntity, ExternalRefs,
    ImageRef, RecommendationRequest, RecommendationResponse, SearchRequest, SearchResponse,
};
pub use saved_item::{SaveItemRequest, SavedItemResponse, SavedItemRow};
