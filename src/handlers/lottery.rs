use std::convert::Infallible;
use std::ops::ControlFlow;

use actix_web::web::Bytes;
use actix_web::{HttpRequest, HttpResponse, ResponseError, Result, web};
use serde::Serialize;
use serde_json::json;

use crate::middlewares::{store_device_session, take_device_session};
use crate::models::*;
use crate::sequencer::TokioScheduler;
use crate::services::LotteryService;

#[utoipa::path(
    get,
    path = "/lottery/prizes",
    tag = "lottery",
    params(
        ("variant" = Option<PrizeVariant>, Query, description = "grid (默认) 或 wheel")
    ),
    responses(
        (status = 200, description = "获取奖品列表成功", body = [PrizeEntry])
    )
)]
/// 获取奖品配置（九宫格或转盘）
pub async fn get_prizes(
    service: web::Data<LotteryService>,
    query: web::Query<PrizeListQuery>,
) -> Result<HttpResponse> {
    let variant = query.variant.unwrap_or_default();
    let list = service.list_prizes(variant);
    Ok(HttpResponse::Ok().json(json!({ "success": true, "data": list })))
}

#[utoipa::path(
    get,
    path = "/lottery/status",
    tag = "lottery",
    responses(
        (status = 200, description = "获取设备参与状态成功", body = DeviceStatusResponse)
    )
)]
/// 获取当前设备是否已参与及其结果；首次访问时分配设备ID
pub async fn get_status(
    service: web::Data<LotteryService>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    let mut session = take_device_session(&req);
    let status = service.device_status(&mut session).await;
    store_device_session(&req, session);
    Ok(HttpResponse::Ok().json(json!({ "success": true, "data": status })))
}

#[utoipa::path(
    post,
    path = "/lottery/draw",
    tag = "lottery",
    request_body = DrawRequest,
    responses(
        (status = 200, description = "抽奖完成或返回历史结果", body = DrawResponse),
        (status = 400, description = "手机号为空或格式错误")
    )
)]
/// 抽奖:
/// 1. 设备已参与则直接返回历史结果
/// 2. 校验手机号
/// 3. 手机号已参与则返回历史结果
/// 4. 抽奖并记录，返回奖品与九宫格动画帧
pub async fn draw(
    service: web::Data<LotteryService>,
    req: HttpRequest,
    request: web::Json<DrawRequest>,
) -> Result<HttpResponse> {
    let mut session = take_device_session(&req);
    let result = service.draw(&mut session, &request.phone_number).await;
    store_device_session(&req, session);

    match result {
        Ok(data) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": data }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/lottery/animation",
    tag = "lottery",
    params(
        ("winning_id" = i64, Query, description = "中奖奖品ID")
    ),
    responses(
        (status = 200, description = "按真实节奏推送的动画帧 (NDJSON)，最后一行为结果", content_type = "application/x-ndjson", body = Frame),
        (status = 404, description = "奖品不存在")
    )
)]
/// 以 NDJSON 流的形式实时推送九宫格动画帧，客户端断开即停止
pub async fn stream_animation(
    service: web::Data<LotteryService>,
    query: web::Query<AnimationQuery>,
) -> Result<HttpResponse> {
    let winning_id = query.winning_id;
    let sequencer = service.animation_sequencer();
    if let Err(e) = sequencer.stepper(winning_id) {
        return Ok(e.error_response());
    }

    let (tx, rx) = tokio::sync::mpsc::unbounded_channel::<Bytes>();

    tokio::spawn(async move {
        let complete_tx = tx.clone();
        let mut scheduler = TokioScheduler;
        let result = sequencer
            .run(
                winning_id,
                &mut scheduler,
                |frame| {
                    // 客户端断开后发送失败，停止动画
                    if ndjson_line(frame).is_some_and(|line| tx.send(line).is_ok()) {
                        ControlFlow::Continue(())
                    } else {
                        ControlFlow::Break(())
                    }
                },
                |text| {
                    let done = AnimationComplete {
                        complete: true,
                        result: text.to_string(),
                    };
                    if let Some(line) = ndjson_line(&done) {
                        let _ = complete_tx.send(line);
                    }
                },
            )
            .await;

        if let Err(e) = result {
            log::error!("Animation stream for prize {winning_id} failed: {e}");
        }
    });

    let body = futures_util::stream::unfold(rx, |mut rx| async move {
        rx.recv()
            .await
            .map(|line| (Ok::<_, Infallible>(line), rx))
    });

    Ok(HttpResponse::Ok()
        .content_type("application/x-ndjson")
        .streaming(body))
}

fn ndjson_line<T: Serialize>(value: &T) -> Option<Bytes> {
    match serde_json::to_vec(value) {
        Ok(mut line) => {
            line.push(b'\n');
            Some(Bytes::from(line))
        }
        Err(e) => {
            log::error!("Failed to encode animation line: {e}");
            None
        }
    }
}

#[utoipa::path(
    post,
    path = "/lottery/wheel/spin",
    tag = "lottery",
    request_body = WheelSpinRequest,
    responses(
        (status = 200, description = "转盘结果与目标角度", body = WheelSpinResponse),
        (status = 400, description = "起始角度非法")
    )
)]
/// 转盘抽奖（按权重随机，不做参与校验）
pub async fn spin_wheel(
    service: web::Data<LotteryService>,
    request: Option<web::Json<WheelSpinRequest>>,
) -> Result<HttpResponse> {
    let from_deg = request.and_then(|r| r.from_deg).unwrap_or(0.0);
    match service.spin_wheel(from_deg) {
        Ok(data) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": data }))),
        Err(e) => Ok(e.error_response()),
    }
}

/// 路由配置
pub fn lottery_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/lottery")
            .route("/prizes", web::get().to(get_prizes))
            .route("/status", web::get().to(get_status))
            .route("/draw", web::post().to(draw))
            .route("/animation", web::get().to(stream_animation))
            .route("/wheel/spin", web::post().to(spin_wheel)),
    );
}
