use actix_web::{HttpResponse, Result, web};

use crate::models::{ApiResponse, CampaignInfo};

#[utoipa::path(
    get,
    path = "/campaign",
    tag = "campaign",
    responses(
        (status = 200, description = "获取活动信息成功", body = CampaignInfo)
    )
)]
/// 活动页面信息：轮播图、活动详情、规则、客服
pub async fn get_campaign(campaign: web::Data<CampaignInfo>) -> Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(ApiResponse::success(campaign.get_ref())))
}

pub fn campaign_config(cfg: &mut web::ServiceConfig) {
    cfg.route("/campaign", web::get().to(get_campaign));
}
