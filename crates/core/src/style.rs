//! Visual style detection for master-library items.

use rand::Rng;

use crate::asset::AssetType;

pub const STYLES: &[&str] = &[
    "真人写实",
    "3D 渲染",
    "赛博朋克插画",
    "二次元",
    "油画风格",
    "电影质感",
    "概念设计",
];

/// Mock style detection keyed on asset type. Characters pick one of two
/// styles at random; types without a fixed style draw from [`STYLES`].
pub fn detect_style<R: Rng + ?Sized>(asset_type: AssetType, rng: &mut R) -> &'static str {
    match asset_type {
        AssetType::Character => {
            if rng.random_bool(0.5) {
                "真人写实"
            } else {
                "赛博朋克插画"
            }
        }
        AssetType::Scene => "电影质感",
        AssetType::Prop => "3D 渲染",
        AssetType::World => STYLES[rng.random_range(0..STYLES.len())],
    }
}
