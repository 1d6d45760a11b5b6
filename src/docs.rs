use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::processing::handler::health,
        crate::modules::processing::handler::add_emoji,
    ),
    components(
        schemas(
            crate::modules::processing::dto::HealthResponse,
            crate::modules::processing::dto::AddEmojiForm,
        )
    ),
    tags(
        (name = "Processing", description = "Emoji overlay processing")
    )
)]
pub struct ApiDoc;
