use utoipa::OpenApi;
use crate::modules::content::dto::*;
use crate::modules::content::model::{Content, ContentKind, ContentStatus, PopularItem};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::modules::content::handler::list_content,
        crate::modules::content::handler::get_content,
        crate::modules::content::events::catalog_events,
        crate::modules::content::handler::admin_list,
        crate::modules::content::handler::stats,
        crate::modules::content::handler::create_content,
        crate::modules::content::handler::update_content,
        crate::modules::content::handler::delete_content,
        crate::modules::popularity::handler::load_popular,
        crate::modules::popularity::handler::reorder_popular,
        crate::modules::popularity::handler::commit_popular,
        crate::modules::popularity::handler::toggle_popular,
        crate::modules::recommendation::handler::get_history,
        crate::modules::recommendation::handler::top_picks,
        crate::modules::hero::handler::save_hero,
        crate::modules::media::handler::upload_image,
        crate::modules::media::handler::delete_image,
    ),
    components(
        schemas(
            Content, ContentKind, ContentStatus, PopularItem,
            CreateContentRequest, ContentPatch, ContentDetailResponse, CatalogStats,
            TogglePopularRequest, DeletedResponse, AdminSort,
            crate::modules::popularity::dto::ReorderRequest,
            crate::modules::popularity::dto::CommitRequest,
            crate::modules::recommendation::history::ViewHistoryEntry,
            crate::modules::hero::dto::HeroArtRequest,
            crate::modules::media::dto::UploadedImage,
            crate::modules::media::dto::DeleteImageRequest,
        )
    ),
    tags(
        (name = "Health", description = "Liveness"),
        (name = "Content", description = "Public catalog"),
        (name = "Recommendations", description = "View history and Top Picks"),
        (name = "Admin", description = "Catalog management"),
        (name = "Popularity", description = "Popular ranking"),
        (name = "Hero", description = "Hero banner art"),
        (name = "Media", description = "Image storage")
    )
)]
pub struct ApiDoc;
