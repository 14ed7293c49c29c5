//! Seed data: demo projects, the extraction catalog, canned worldview,
//! episodes, and the back-office fixtures.

use crate::asset::AssetType;
use crate::permissions::{
    ASSET_MANAGE, PROMPT_READ, ROLE_ADMIN, ROLE_EDITOR, ROLE_VIEWER, SYS_VIEW, VIDEO_GEN,
};
use crate::project::ScriptType;

// ---------------------------------------------------------------------------
// Projects
// ---------------------------------------------------------------------------

pub struct SeedProject {
    pub name: &'static str,
    pub script_type: ScriptType,
    pub script_content: &'static str,
    /// `YYYY-MM-DD`
    pub created_at: &'static str,
    pub last_modified: &'static str,
}

pub const SEED_PROJECTS: &[SeedProject] = &[
    SeedProject {
        name: "赛博朋克诺瓦 v1",
        script_type: ScriptType::Narrative,
        script_content: "在一个被霓虹灯淹没的城市里，侦探Kael醒来，发现自己丢失了昨晚的记忆。窗外，巨大的全息广告牌正在播放着Tyrell公司的最新义体广告...",
        created_at: "2023-10-01",
        last_modified: "2023-10-25",
    },
    SeedProject {
        name: "火星救援行动",
        script_type: ScriptType::Plot,
        script_content: "第一幕：飞船坠毁。第二幕：寻找水源。第三幕：发现外星遗迹。",
        created_at: "2023-09-15",
        last_modified: "2023-09-20",
    },
    SeedProject {
        name: "魔法学院日常",
        script_type: ScriptType::Narrative,
        script_content: "艾米丽挥舞着魔杖，但是什么也没发生。教授叹了口气。",
        created_at: "2023-08-10",
        last_modified: "2023-08-12",
    },
];

// ---------------------------------------------------------------------------
// Asset extraction catalog
// ---------------------------------------------------------------------------

pub struct SeedState {
    pub name: &'static str,
    pub description: &'static str,
}

pub struct SeedAsset {
    pub name: &'static str,
    pub asset_type: AssetType,
    pub description: &'static str,
    pub in_master_lib: bool,
    pub states: &'static [SeedState],
}

/// Assets produced by script extraction. States carry no prompt or attributes yet.
pub const SKELETON_ASSETS: &[SeedAsset] = &[
    SeedAsset {
        name: "Kael (主角)",
        asset_type: AssetType::Character,
        description: "一位疲惫的赛博朋克侦探，寻找记忆碎片的流浪者。",
        in_master_lib: false,
        states: &[
            SeedState { name: "常规状态", description: "身穿灰色战术风衣，神情冷峻，站在雨夜的霓虹灯光下。" },
            SeedState { name: "战斗状态", description: "手持等离子手枪，衣衫略显凌乱，眼神犀利。" },
            SeedState { name: "重伤状态", description: "靠在墙角，风衣破损，义眼闪烁故障红光。" },
        ],
    },
    SeedAsset {
        name: "Nyx (黑客)",
        asset_type: AssetType::Character,
        description: "顶尖的网络行者，皮肤上有发光的神经回路纹身。",
        in_master_lib: false,
        states: &[
            SeedState { name: "潜入模式", description: "戴着AR眼镜，手指在虚空中操作全息键盘。" },
            SeedState { name: "逃亡装束", description: "穿着宽大的光学迷彩飞行员夹克，兜帽遮住半张脸。" },
        ],
    },
    SeedAsset {
        name: "Vesper (反派)",
        asset_type: AssetType::Character,
        description: "泰瑞尔公司的高级执行官，冷酷无情。",
        in_master_lib: true,
        states: &[
            SeedState { name: "会议室", description: "穿着剪裁完美的白色高科技面料西装，背景是巨大的落地窗。" },
            SeedState { name: "战斗义体", description: "西装撕裂，露出内部金色的战斗骨骼。" },
        ],
    },
    SeedAsset {
        name: "霓虹街道",
        asset_type: AssetType::Scene,
        description: "典型的赛博朋克城市底层街道。",
        in_master_lib: false,
        states: &[
            SeedState { name: "夜间雨景", description: "倾盆大雨，路面反光，全息广告牌闪烁。" },
            SeedState { name: "清晨雾气", description: "雨后的清晨，合成雾气弥漫。" },
        ],
    },
    SeedAsset {
        name: "虚空酒吧 (The Void)",
        asset_type: AssetType::Scene,
        description: "地下情报交易所，黑客和雇佣兵的聚集地。",
        in_master_lib: false,
        states: &[
            SeedState { name: "吧台视角", description: "机械调酒师正在擦拭义肢，吧台上放着发光的鸡尾酒。" },
            SeedState { name: "VIP包厢", description: "隔音玻璃后的私人空间，红丝绒沙发和全息投影屏。" },
        ],
    },
    SeedAsset {
        name: "荒坂塔顶层",
        asset_type: AssetType::Scene,
        description: "公司权力的象征，极简主义设计。",
        in_master_lib: true,
        states: &[
            SeedState { name: "日落时分", description: "金色的阳光洒在黑色大理石地面上。" },
            SeedState { name: "数据中心", description: "无数蓝色的服务器阵列，弥漫着液氮寒气。" },
        ],
    },
    SeedAsset {
        name: "废弃地铁站",
        asset_type: AssetType::Scene,
        description: "被帮派占据的旧时代遗迹。",
        in_master_lib: false,
        states: &[SeedState { name: "集会广场", description: "废弃的车厢被改造成临时住所，中央燃着全息篝火。" }],
    },
    SeedAsset {
        name: "旧式左轮",
        asset_type: AssetType::Prop,
        description: "备用武器，虽然老旧但威力巨大。",
        in_master_lib: false,
        states: &[SeedState { name: "常规视角", description: "放在金属桌面上的特写，展示枪身的磨损纹理。" }],
    },
    SeedAsset {
        name: "神经连接接口",
        asset_type: AssetType::Prop,
        description: "军用级神经接入装置，非法改装品。",
        in_master_lib: false,
        states: &[
            SeedState { name: "待机状态", description: "指示灯闪烁着危险的红光，放置在防静电盒中。" },
            SeedState { name: "连接中", description: "接口伸出探针，数据光流在表面疯狂涌动。" },
        ],
    },
    SeedAsset {
        name: "量子数据盘",
        asset_type: AssetType::Prop,
        description: "存储着核心机密的水晶状存储器。",
        in_master_lib: false,
        states: &[SeedState { name: "发光状态", description: "内部有蓝色数据流动的光效，晶莹剔透。" }],
    },
    SeedAsset {
        name: "浮空摩托",
        asset_type: AssetType::Prop,
        description: "经过改装的高速追击载具。",
        in_master_lib: false,
        states: &[SeedState { name: "街头停放", description: "停在涂鸦墙边，车身有刮痕，排气管冒着热气。" }],
    },
];

/// Prompt and attributes filled in by detail generation.
pub struct StateDetail {
    pub asset: &'static str,
    pub state: &'static str,
    pub prompt: &'static str,
    pub attributes: &'static [(&'static str, &'static str)],
}

pub const STATE_DETAILS: &[StateDetail] = &[
    StateDetail {
        asset: "Kael (主角)",
        state: "常规状态",
        prompt: "Cyberpunk detective, wearing trench coat, rainy night, neon lights, high detail face, cinematic lighting",
        attributes: &[("性别", "男"), ("年龄", "30s"), ("服装", "灰色战术风衣"), ("饰品", "电子义眼")],
    },
    StateDetail {
        asset: "Kael (主角)",
        state: "战斗状态",
        prompt: "Cyberpunk detective in combat stance, holding plasma pistol, dynamic pose, flying sparks, intense expression",
        attributes: &[("姿态", "射击"), ("武器", "等离子手枪"), ("表情", "愤怒")],
    },
    StateDetail {
        asset: "Kael (主角)",
        state: "重伤状态",
        prompt: "Injured cyberpunk detective, leaning on wall, torn clothes, glitching cybernetic eye, red warning light, gritty atmosphere",
        attributes: &[("伤势", "腹部流血"), ("义体", "故障中"), ("氛围", "绝望")],
    },
    StateDetail {
        asset: "Nyx (黑客)",
        state: "潜入模式",
        prompt: "Cyberpunk hacker, AR glasses, typing on holographic keyboard, floating code, neon green theme",
        attributes: &[("职业", "黑客"), ("风格", "街头赛博"), ("配色", "荧光绿")],
    },
    StateDetail {
        asset: "Nyx (黑客)",
        state: "逃亡装束",
        prompt: "Cyberpunk hacker hiding, optical camouflage jacket, hood up, nervous expression, dark alley",
        attributes: &[("服装", "迷彩夹克"), ("表情", "紧张")],
    },
    StateDetail {
        asset: "Vesper (反派)",
        state: "会议室",
        prompt: "Corporate executive, white high-tech suit, modern office, floor to ceiling window, city skyline view",
        attributes: &[("气质", "高贵"), ("服装", "白色西装"), ("背景", "公司顶层")],
    },
    StateDetail {
        asset: "Vesper (反派)",
        state: "战斗义体",
        prompt: "Cyborg combat mode, torn suit, golden endoskeleton, laser blade arm, action pose",
        attributes: &[("形态", "战斗"), ("武器", "激光刃")],
    },
    StateDetail {
        asset: "霓虹街道",
        state: "夜间雨景",
        prompt: "Cyberpunk street, night, heavy rain, reflections on wet asphalt, holographic billboards, crowd with umbrellas",
        attributes: &[("时间", "深夜"), ("天气", "暴雨"), ("氛围", "压抑但繁华")],
    },
    StateDetail {
        asset: "霓虹街道",
        state: "清晨雾气",
        prompt: "Cyberpunk street at dawn, heavy synthetic fog, closed shops, cold blue lighting, quiet atmosphere",
        attributes: &[("时间", "清晨"), ("天气", "大雾"), ("氛围", "寂静")],
    },
    StateDetail {
        asset: "虚空酒吧 (The Void)",
        state: "吧台视角",
        prompt: "Cyberpunk bar counter, robot bartender, glowing cocktails, purple neon lighting, smoky atmosphere",
        attributes: &[("光线", "昏暗"), ("色彩", "紫色调")],
    },
    StateDetail {
        asset: "虚空酒吧 (The Void)",
        state: "VIP包厢",
        prompt: "Cyberpunk VIP booth, red velvet sofa, holographic screen, private meeting, dim lighting",
        attributes: &[("隐私", "高"), ("装饰", "奢华复古")],
    },
    StateDetail {
        asset: "荒坂塔顶层",
        state: "日落时分",
        prompt: "Arasaka tower penthouse, sunset, golden light on black marble floor, minimalist interior, long shadows",
        attributes: &[("时间", "黄昏"), ("氛围", "肃穆")],
    },
    StateDetail {
        asset: "荒坂塔顶层",
        state: "数据中心",
        prompt: "Server room, blue LED lights, liquid nitrogen fog, high tech, cold atmosphere",
        attributes: &[("科技感", "极高")],
    },
    StateDetail {
        asset: "废弃地铁站",
        state: "集会广场",
        prompt: "Abandoned subway station, graffiti, subway car homes, holographic bonfire, wasteland punk style",
        attributes: &[("风格", "废土朋克")],
    },
    StateDetail {
        asset: "旧式左轮",
        state: "常规视角",
        prompt: "Old rusty revolver on metal table, dramatic lighting, 8k texture, macro shot",
        attributes: &[("材质", "金属"), ("成色", "磨损")],
    },
    StateDetail {
        asset: "神经连接接口",
        state: "待机状态",
        prompt: "Neural interface device, red warning light, anti-static box, macro photography",
        attributes: &[("状态", "待机"), ("危险级", "高")],
    },
    StateDetail {
        asset: "神经连接接口",
        state: "连接中",
        prompt: "Neural interface active, extending probes, glowing data stream, sparks",
        attributes: &[("特效", "数据流")],
    },
    StateDetail {
        asset: "量子数据盘",
        state: "发光状态",
        prompt: "Quantum data drive, crystal like, glowing blue internal light, valuable object, close up",
        attributes: &[("材质", "水晶")],
    },
    StateDetail {
        asset: "浮空摩托",
        state: "街头停放",
        prompt: "Hover bike parked on street, graffiti wall background, customized, scratches, exhaust heat",
        attributes: &[("车型", "竞速")],
    },
];

/// Look up the generated detail for a state by asset and state name.
pub fn find_state_detail(asset: &str, state: &str) -> Option<&'static StateDetail> {
    STATE_DETAILS
        .iter()
        .find(|d| d.asset == asset && d.state == state)
}

pub struct SeedWorldview {
    pub faction: &'static str,
    pub description: &'static str,
}

pub const SEED_WORLDVIEW: &[SeedWorldview] = &[
    SeedWorldview {
        faction: "巨型企业 (Corporations)",
        description: "视觉元素以极简主义、白色与金色为主，使用高科技复合材料。建筑呈现完美的几何线条，冷色调灯光，给人一种无菌、高压的秩序感。",
    },
    SeedWorldview {
        faction: "街头帮派 (Street)",
        description: "视觉元素以高饱和度霓虹色为主，充斥着拼凑的机械义肢、透明塑料雨衣和全息涂鸦。环境肮脏，有着生锈的金属质感和混乱的电线。",
    },
    SeedWorldview {
        faction: "荒野游牧 (Nomads)",
        description: "视觉元素融合了旧时代的工业残骸与沙漠生存装备。使用大地色系，车辆经过重度改装，带有防沙尘设计。",
    },
];

// ---------------------------------------------------------------------------
// Episodes
// ---------------------------------------------------------------------------

pub const SEED_EPISODES: &[&str] = &["第一集：觉醒", "第二集：追逐", "第三集：对决"];

// ---------------------------------------------------------------------------
// Back office
// ---------------------------------------------------------------------------

pub struct SeedRole {
    pub id: &'static str,
    pub name: &'static str,
    /// `None` grants the whole permission catalog.
    pub permissions: Option<&'static [&'static str]>,
}

pub const SEED_ROLES: &[SeedRole] = &[
    SeedRole { id: ROLE_ADMIN, name: "管理员 (Admin)", permissions: None },
    SeedRole {
        id: ROLE_EDITOR,
        name: "操作员 (Editor)",
        permissions: Some(&[SYS_VIEW, PROMPT_READ, ASSET_MANAGE, VIDEO_GEN]),
    },
    SeedRole { id: ROLE_VIEWER, name: "访客 (Viewer)", permissions: Some(&[SYS_VIEW, PROMPT_READ]) },
];

pub struct SeedUser {
    pub username: &'static str,
    pub email: &'static str,
    pub role_id: &'static str,
    pub active: bool,
    /// `YYYY-MM-DD HH:MM`
    pub last_login: &'static str,
    /// Only the administrator has a usable password out of the box.
    pub has_password: bool,
}

pub const SEED_USERS: &[SeedUser] = &[
    SeedUser {
        username: "admin",
        email: "admin@vidustudio.com",
        role_id: ROLE_ADMIN,
        active: true,
        last_login: "2023-10-27 10:00",
        has_password: true,
    },
    SeedUser {
        username: "Editor01",
        email: "editor@vidustudio.com",
        role_id: ROLE_EDITOR,
        active: true,
        last_login: "2023-10-26 15:30",
        has_password: false,
    },
    SeedUser {
        username: "Guest",
        email: "guest@vidustudio.com",
        role_id: ROLE_VIEWER,
        active: false,
        last_login: "2023-09-01 09:00",
        has_password: false,
    },
];

pub struct SeedConfigItem {
    pub id: &'static str,
    pub name: &'static str,
    pub code: &'static str,
    pub type_label: &'static str,
    pub model: &'static str,
    pub thinking: bool,
}

pub const SEED_PROMPT_CONFIGS: &[SeedConfigItem] = &[
    SeedConfigItem { id: "conf_script_01", name: "剧本分析-通用标准版", code: "script_analysis", type_label: "通用", model: "gemini-3-pro-preview", thinking: true },
    SeedConfigItem { id: "conf_script_02", name: "剧本分析-创意发散版", code: "script_analysis", type_label: "创意", model: "gemini-3-pro-preview", thinking: true },
    SeedConfigItem { id: "conf_idx_p_01", name: "道具提取-细粒度", code: "asset_index_props", type_label: "通用", model: "gemini-3-flash-preview", thinking: false },
    SeedConfigItem { id: "conf_idx_p_02", name: "道具提取-仅关键物品", code: "asset_index_props", type_label: "精简", model: "gemini-3-flash-preview", thinking: false },
    SeedConfigItem { id: "conf_idx_s_01", name: "场景提取-氛围优先", code: "asset_index_scenes", type_label: "通用", model: "gemini-3-flash-preview", thinking: false },
    SeedConfigItem { id: "conf_idx_c_01", name: "角色提取-外貌优先", code: "asset_index_chars", type_label: "通用", model: "gemini-3-flash-preview", thinking: false },
    SeedConfigItem { id: "conf_wv_01", name: "世界观-赛博朋克风", code: "worldview_extract", type_label: "风格化", model: "gemini-3-pro-preview", thinking: true },
    SeedConfigItem { id: "conf_wv_02", name: "世界观-通用设定", code: "worldview_extract", type_label: "通用", model: "gemini-3-flash-preview", thinking: false },
    SeedConfigItem { id: "conf_det_p_01", name: "道具详情-3D材质", code: "asset_detail_props", type_label: "3D渲染", model: "gemini-3-flash-preview", thinking: false },
    SeedConfigItem { id: "conf_det_p_02", name: "道具详情-2D手绘", code: "asset_detail_props", type_label: "2D动画", model: "gemini-3-flash-preview", thinking: false },
    SeedConfigItem { id: "conf_det_s_01", name: "场景详情-电影布光", code: "asset_detail_scenes", type_label: "写实", model: "gemini-3-pro-preview", thinking: false },
    SeedConfigItem { id: "conf_det_s_02", name: "场景详情-新海诚风", code: "asset_detail_scenes", type_label: "2D动画", model: "gemini-3-flash-preview", thinking: false },
    SeedConfigItem { id: "conf_det_c_01", name: "角色详情-真人写实", code: "asset_detail_chars", type_label: "写实", model: "gemini-3-pro-preview", thinking: false },
    SeedConfigItem { id: "conf_det_c_02", name: "角色详情-日漫风格", code: "asset_detail_chars", type_label: "2D动画", model: "gemini-3-flash-preview", thinking: false },
    SeedConfigItem { id: "conf_img_01", name: "生图-Midjourney V6适配", code: "image_gen_prompt", type_label: "MJ", model: "gemini-2.5-flash", thinking: false },
    SeedConfigItem { id: "conf_img_02", name: "生图-Stable Diffusion XL", code: "image_gen_prompt", type_label: "SD", model: "gemini-2.5-flash", thinking: false },
    SeedConfigItem { id: "conf_sb_01", name: "分镜-动态运镜描述", code: "storyboard_gen", type_label: "视频", model: "gemini-3-pro-preview", thinking: true },
    SeedConfigItem { id: "conf_sb_02", name: "分镜-静态构图描述", code: "storyboard_gen", type_label: "绘图", model: "gemini-3-flash-preview", thinking: false },
];

/// Back-office model options for prompt configurations and templates.
pub const ADMIN_MODEL_OPTIONS: &[&str] = &[
    "gemini-3-flash-preview",
    "gemini-3-pro-preview",
    "gemini-flash-lite-latest",
    "gemini-2.5-flash",
];

/// Template setting slot: key, label, and the prompt-config code it draws from.
pub struct TemplateKey {
    pub key: &'static str,
    pub label: &'static str,
    pub filter_code: &'static str,
}

pub const TEMPLATE_KEYS: &[TemplateKey] = &[
    TemplateKey { key: "script", label: "剧本分析", filter_code: "script_analysis" },
    TemplateKey { key: "indexProps", label: "索引提取-道具", filter_code: "asset_index_props" },
    TemplateKey { key: "indexScenes", label: "索引提取-场景", filter_code: "asset_index_scenes" },
    TemplateKey { key: "indexChars", label: "索引提取-人物", filter_code: "asset_index_chars" },
    TemplateKey { key: "worldview", label: "世界观提取", filter_code: "worldview_extract" },
    TemplateKey { key: "detailProps", label: "资产详情-道具", filter_code: "asset_detail_props" },
    TemplateKey { key: "detailScenes", label: "资产详情-场景", filter_code: "asset_detail_scenes" },
    TemplateKey { key: "detailChars", label: "资产详情-人物", filter_code: "asset_detail_chars" },
    TemplateKey { key: "imgPrompt", label: "生图提示词", filter_code: "image_gen_prompt" },
    TemplateKey { key: "storyboard", label: "分镜提示词", filter_code: "storyboard_gen" },
];

pub fn is_template_key(key: &str) -> bool {
    TEMPLATE_KEYS.iter().any(|k| k.key == key)
}

pub struct SeedTemplate {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    /// `(key, model, prompt_id)` in [`TEMPLATE_KEYS`] order.
    pub settings: &'static [(&'static str, &'static str, &'static str)],
}

pub const SEED_TEMPLATES: &[SeedTemplate] = &[
    SeedTemplate {
        id: "tpl_2d",
        name: "2D 动画模式",
        description: "适用于日式动漫、美式卡通等扁平化风格",
        settings: &[
            ("script", "gemini-3-flash-preview", "conf_script_01"),
            ("indexProps", "gemini-3-flash-preview", "conf_idx_p_01"),
            ("indexScenes", "gemini-3-flash-preview", "conf_idx_s_01"),
            ("indexChars", "gemini-3-flash-preview", "conf_idx_c_01"),
            ("worldview", "gemini-3-flash-preview", "conf_wv_02"),
            ("detailProps", "gemini-3-flash-preview", "conf_det_p_02"),
            ("detailScenes", "gemini-3-flash-preview", "conf_det_s_02"),
            ("detailChars", "gemini-3-flash-preview", "conf_det_c_02"),
            ("imgPrompt", "gemini-2.5-flash", "conf_img_01"),
            ("storyboard", "gemini-3-flash-preview", "conf_sb_02"),
        ],
    },
    SeedTemplate {
        id: "tpl_real",
        name: "真人实拍模式",
        description: "适用于电影质感、写实摄影风格",
        settings: &[
            ("script", "gemini-3-pro-preview", "conf_script_02"),
            ("indexProps", "gemini-3-flash-preview", "conf_idx_p_01"),
            ("indexScenes", "gemini-3-flash-preview", "conf_idx_s_01"),
            ("indexChars", "gemini-3-flash-preview", "conf_idx_c_01"),
            ("worldview", "gemini-3-pro-preview", "conf_wv_01"),
            ("detailProps", "gemini-3-pro-preview", "conf_det_p_01"),
            ("detailScenes", "gemini-3-pro-preview", "conf_det_s_01"),
            ("detailChars", "gemini-3-pro-preview", "conf_det_c_01"),
            ("imgPrompt", "gemini-2.5-flash", "conf_img_02"),
            ("storyboard", "gemini-3-pro-preview", "conf_sb_01"),
        ],
    },
    SeedTemplate {
        id: "tpl_3d",
        name: "3D 渲染模式",
        description: "适用于皮克斯风格、CGI、游戏引擎渲染风格",
        settings: &[
            ("script", "gemini-3-flash-preview", "conf_script_01"),
            ("indexProps", "gemini-3-flash-preview", "conf_idx_p_01"),
            ("indexScenes", "gemini-3-flash-preview", "conf_idx_s_01"),
            ("indexChars", "gemini-3-flash-preview", "conf_idx_c_01"),
            ("worldview", "gemini-3-flash-preview", "conf_wv_01"),
            ("detailProps", "gemini-3-flash-preview", "conf_det_p_01"),
            ("detailScenes", "gemini-3-flash-preview", "conf_det_s_01"),
            ("detailChars", "gemini-3-flash-preview", "conf_det_c_01"),
            ("imgPrompt", "gemini-2.5-flash", "conf_img_01"),
            ("storyboard", "gemini-3-flash-preview", "conf_sb_01"),
        ],
    },
];

pub const DEFAULT_TEMPLATE_ID: &str = "tpl_2d";
pub const CUSTOM_TEMPLATE_DESCRIPTION: &str = "自定义模板";

pub struct SeedPromptType {
    pub name: &'static str,
    pub code: &'static str,
    pub description: &'static str,
}

pub const SEED_PROMPT_TYPES: &[SeedPromptType] = &[
    SeedPromptType { name: "动漫生分镜", code: "TEXT_GENERATION", description: "动漫生分镜" },
    SeedPromptType { name: "vidu+真人", code: "VIDEO_GENERATION", description: "vidu生分镜" },
    SeedPromptType { name: "通用自动化生成", code: "UNIVERSAL_GENERATE", description: "自动化管线类型" },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skeleton_has_eleven_assets() {
        assert_eq!(SKELETON_ASSETS.len(), 11);
        assert!(SKELETON_ASSETS.iter().all(|a| !a.states.is_empty()));
    }

    #[test]
    fn every_skeleton_state_has_a_detail() {
        for asset in SKELETON_ASSETS {
            for state in asset.states {
                assert!(
                    find_state_detail(asset.name, state.name).is_some(),
                    "missing detail for {} / {}",
                    asset.name,
                    state.name
                );
            }
        }
    }

    #[test]
    fn unknown_state_has_no_detail() {
        assert!(find_state_detail("Kael (主角)", "不存在").is_none());
    }

    #[test]
    fn templates_cover_every_key() {
        for tpl in SEED_TEMPLATES {
            assert_eq!(tpl.settings.len(), TEMPLATE_KEYS.len());
            for (key, _, prompt_id) in tpl.settings {
                assert!(is_template_key(key));
                assert!(SEED_PROMPT_CONFIGS.iter().any(|c| c.id == *prompt_id));
            }
        }
    }

    #[test]
    fn only_admin_seeded_with_password() {
        let with_password: Vec<_> = SEED_USERS.iter().filter(|u| u.has_password).collect();
        assert_eq!(with_password.len(), 1);
        assert_eq!(with_password[0].username, "admin");
    }
}
