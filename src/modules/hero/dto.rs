use serde::Deserialize;
use utoipa::ToSchema;
use crate::modules::content::dto::ContentPatch;

/// The three hero layers. A missing field leaves the layer alone and `null`
/// clears it.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HeroArtRequest {
    #[serde(default, deserialize_with = "crate::common::nullable::deserialize")]
    #[schema(value_type = Option<String>)]
    pub hero_bg: Option<Option<String>>,
    #[serde(default, deserialize_with = "crate::common::nullable::deserialize")]
    #[schema(value_type = Option<String>)]
    pub hero_bg_public_id: Option<Option<String>>,
    #[serde(default, deserialize_with = "crate::common::nullable::deserialize")]
    #[schema(value_type = Option<String>)]
    pub hero_character: Option<Option<String>>,
    #[serde(default, deserialize_with = "crate::common::nullable::deserialize")]
    #[schema(value_type = Option<String>)]
    pub hero_character_public_id: Option<Option<String>>,
    #[serde(default, deserialize_with = "crate::common::nullable::deserialize")]
    #[schema(value_type = Option<String>)]
    pub hero_title: Option<Option<String>>,
    #[serde(default, deserialize_with = "crate::common::nullable::deserialize")]
    #[schema(value_type = Option<String>)]
    pub hero_title_public_id: Option<Option<String>>,
}

impl HeroArtRequest {
    pub fn to_patch(&self) -> ContentPatch {
        ContentPatch {
            hero_bg: self.hero_bg.clone(),
            hero_bg_public_id: self.hero_bg_public_id.clone(),
            hero_character: self.hero_character.clone(),
            hero_character_public_id: self.hero_character_public_id.clone(),
            hero_title: self.hero_title.clone(),
            hero_title_public_id: self.hero_title_public_id.clone(),
            ..ContentPatch::default()
        }
    }
}
