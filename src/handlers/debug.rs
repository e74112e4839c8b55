use actix_web::{HttpRequest, HttpResponse, ResponseError, Result, web};

use crate::config::DebugConfig;
use crate::error::AppError;
use crate::middlewares::{store_device_session, take_device_session};
use crate::models::{ApiResponse, ClearResponse};
use crate::services::LotteryService;

#[utoipa::path(
    post,
    path = "/debug/clear",
    tag = "debug",
    responses(
        (status = 200, description = "已清空当前设备的抽奖数据", body = ClearResponse),
        (status = 404, description = "调试接口未开启")
    )
)]
/// 清空当前设备的抽奖记录与设备状态，并过期设备 Cookie（无确认、无鉴权）
pub async fn clear_store(
    service: web::Data<LotteryService>,
    debug: web::Data<DebugConfig>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    if !debug.clear_enabled {
        return Ok(AppError::NotFound("Not found".to_string()).error_response());
    }

    let mut session = take_device_session(&req);
    service.clear_all(&mut session).await;
    store_device_session(&req, session);

    Ok(HttpResponse::Ok().json(ApiResponse::success_with_message(
        ClearResponse { cleared: true },
        "本设备抽奖数据已清空",
    )))
}

pub fn debug_config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/debug").route("/clear", web::post().to(clear_store)));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LotteryConfig;
    use crate::middlewares::DeviceMiddleware;
    use crate::storage::{DEVICE_ID_KEY, MemoryStore, shared_store};
    use actix_web::cookie::Cookie;
    use actix_web::http::StatusCode;
    use actix_web::{App, test};
    use serde_json::{Value, json};

    fn service() -> LotteryService {
        LotteryService::new(shared_store(MemoryStore::new()), &LotteryConfig::default()).unwrap()
    }

    #[actix_web::test]
    async fn test_clear_resets_device_and_expires_cookie() {
        let service = service();
        let app = test::init_service(
            App::new()
                .wrap(DeviceMiddleware)
                .app_data(web::Data::new(service.clone()))
                .app_data(web::Data::new(DebugConfig::default()))
                .service(
                    web::scope("/api/v1")
                        .configure(debug_config)
                        .configure(crate::handlers::lottery_config),
                ),
        )
        .await;

        let device = Cookie::new(DEVICE_ID_KEY, "device_1_abcdefghi");
        let neighbour = Cookie::new(DEVICE_ID_KEY, "device_2_jklmnopqr");
        for (cookie, phone) in [(&device, "13800000000"), (&neighbour, "13900000000")] {
            let req = test::TestRequest::post()
                .uri("/api/v1/lottery/draw")
                .cookie(cookie.clone())
                .set_json(json!({ "phone_number": phone }))
                .to_request();
            test::call_service(&app, req).await;
        }

        let req = test::TestRequest::post()
            .uri("/api/v1/debug/clear")
            .cookie(device.clone())
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let removal = resp
            .response()
            .cookies()
            .find(|c| c.name() == DEVICE_ID_KEY)
            .expect("removal cookie");
        assert_eq!(removal.value(), "");

        let req = test::TestRequest::get()
            .uri("/api/v1/lottery/status")
            .cookie(device)
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"]["has_drawn"], false);

        // 其它设备的记录不受影响
        let req = test::TestRequest::get()
            .uri("/api/v1/lottery/status")
            .cookie(neighbour)
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"]["has_drawn"], true);
        assert_eq!(body["data"]["result"], "谢谢参与");
    }

    #[actix_web::test]
    async fn test_clear_disabled_is_404() {
        let app = test::init_service(
            App::new()
                .wrap(DeviceMiddleware)
                .app_data(web::Data::new(service()))
                .app_data(web::Data::new(DebugConfig {
                    clear_enabled: false,
                }))
                .service(web::scope("/api/v1").configure(debug_config)),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/v1/debug/clear")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}
