use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// 轮播图
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Slide {
    pub id: i64,
    pub image: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub subtitle: String,
}

/// 活动页面展示信息（轮播、活动详情、规则、客服）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct CampaignInfo {
    #[schema(example = "哈利波特 - 双人成行一人免单活动")]
    pub title: String,
    pub organizer: String,
    pub period: String,
    pub audience: String,
    pub participation: String,
    pub rules: Vec<String>,
    pub disclaimer: String,
    pub hotline: String,
    pub service_hours: String,
    pub slides: Vec<Slide>,
    /// 轮播自动切换间隔
    pub autoplay_interval_ms: u64,
}

impl Default for CampaignInfo {
    fn default() -> Self {
        let slide = |id: i64, image: &str| Slide {
            id,
            image: image.to_string(),
            title: String::new(),
            subtitle: String::new(),
        };

        Self {
            title: "哈利波特 - 双人成行一人免单活动".to_string(),
            organizer: "海马体照相馆".to_string(),
            period: "2025年10月1日 - 2025年11月30日".to_string(),
            audience: "所有用户（每人限参与一次）".to_string(),
            participation: "输入手机号码即可参与抽奖".to_string(),
            rules: vec![
                "活动期间，每个手机号码仅可参与一次抽奖".to_string(),
                "用户需提供真实有效的手机号码，如提供虚假信息导致无法核实身份或联系，视为自动放弃中奖资格".to_string(),
                "中奖用户可登录小程序领取奖品".to_string(),
                "奖品不可转让、不可兑换现金，逾期未领取视为自动放弃".to_string(),
                "如发现恶意刷奖、使用外挂软件等作弊行为，主办方有权取消其参与资格".to_string(),
            ],
            disclaimer: "本活动由海马体照相馆举办。参与用户需遵守国家相关法律法规，不得利用本活动从事任何违法违规行为。在法律允许的范围内，主办方保留对本活动的最终解释权。".to_string(),
            hotline: "400-028-7777".to_string(),
            service_hours: "09:00-21:00".to_string(),
            slides: vec![
                slide(1, "/img/img_v3_02r9_0e360b2b-0e13-43ae-87f9-6958c1de5c9g.jpg"),
                slide(2, "/img/img_v3_02r9_1fd88f52-4867-4695-a76f-1dc1b60fe1fg.jpg"),
                slide(3, "/img/img_v3_02r9_a5e8c4f0-dae9-4cf9-913f-1dcca5d3b75g.jpg"),
                slide(4, "/img/img_v3_02r9_e3728f96-8b69-4123-bf2f-eb468acc3abg.jpg"),
            ],
            autoplay_interval_ms: 3000,
        }
    }
}
