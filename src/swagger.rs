use actix_web::web;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::handlers;
use crate::models::*;
use crate::sequencer::{Frame, Phase};

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::lottery::get_prizes,
        handlers::lottery::get_status,
        handlers::lottery::draw,
        handlers::lottery::stream_animation,
        handlers::lottery::spin_wheel,
        handlers::campaign::get_campaign,
        handlers::debug::clear_store,
    ),
    components(
        schemas(
            PrizeVariant,
            PrizeEntry,
            PrizeTable,
            PrizeListQuery,
            DrawRequest,
            DrawStatus,
            DrawResponse,
            ParticipationScope,
            ParticipationRecord,
            DeviceStatusResponse,
            AnimationQuery,
            AnimationComplete,
            Frame,
            Phase,
            WheelSpinRequest,
            WheelSpinResponse,
            ClearResponse,
            CampaignInfo,
            Slide,
            ApiError,
        )
    ),
    tags(
        (name = "lottery", description = "Lottery draw API"),
        (name = "campaign", description = "Campaign page API"),
        (name = "debug", description = "Debug API"),
    ),
    info(
        title = "Lottery Backend API",
        version = "1.0.0",
        description = "Promotional lottery REST API documentation"
    ),
    servers(
        (url = "/api/v1", description = "Local server")
    )
)]
pub struct ApiDoc;

pub fn swagger_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()),
    )
    .route(
        "/swagger-ui",
        web::get().to(|| async {
            actix_web::HttpResponse::Found()
                .append_header(("Location", "/swagger-ui/"))
                .finish()
        }),
    );
}
